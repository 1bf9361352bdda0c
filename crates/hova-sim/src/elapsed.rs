//! Human-readable session durations.

/// Which unit labels to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElapsedStyle {
    /// "12 Sec", "1.50 Min", ... for the status line.
    Short,
    /// "12 Seconds", "1.50 Minutes", ... for end-of-session reports.
    Long,
}

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3600.0;
const DAY: f64 = 86_400.0;

/// Format `seconds` in the largest unit it has reached.
///
/// Whole seconds below a minute; two decimals for minutes, hours and days.
pub fn format_elapsed(seconds: f64, style: ElapsedStyle) -> String {
    let seconds = seconds.max(0.0);
    let (value, short, long) = if seconds < MINUTE {
        return match style {
            ElapsedStyle::Short => format!("{seconds:.0} Sec"),
            ElapsedStyle::Long => format!("{seconds:.0} Seconds"),
        };
    } else if seconds < HOUR {
        (seconds / MINUTE, "Min", "Minutes")
    } else if seconds < DAY {
        (seconds / HOUR, "Hr", "Hours")
    } else {
        (seconds / DAY, "Days", "Days")
    };

    match style {
        ElapsedStyle::Short => format!("{value:.2} {short}"),
        ElapsedStyle::Long => format!("{value:.2} {long}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds() {
        assert_eq!(format_elapsed(0.0, ElapsedStyle::Long), "0 Seconds");
        assert_eq!(format_elapsed(12.4, ElapsedStyle::Short), "12 Sec");
        assert_eq!(format_elapsed(59.4, ElapsedStyle::Long), "59 Seconds");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(format_elapsed(90.0, ElapsedStyle::Short), "1.50 Min");
        assert_eq!(format_elapsed(60.0, ElapsedStyle::Long), "1.00 Minutes");
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_elapsed(5400.0, ElapsedStyle::Short), "1.50 Hr");
        assert_eq!(format_elapsed(7200.0, ElapsedStyle::Long), "2.00 Hours");
    }

    #[test]
    fn test_days() {
        assert_eq!(format_elapsed(86_400.0, ElapsedStyle::Short), "1.00 Days");
        assert_eq!(format_elapsed(129_600.0, ElapsedStyle::Long), "1.50 Days");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_elapsed(-3.0, ElapsedStyle::Short), "0 Sec");
    }
}
