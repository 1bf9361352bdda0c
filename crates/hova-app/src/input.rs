//! Discrete commands delivered to the scheduler, and the sources they come from.

use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

/// A command the scheduler reacts to between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    /// End the current session and start a fresh one.
    NewSession,
    /// Print average frame and logic rates since the last report.
    ReportStats,
    /// Stop the loop after the current iteration.
    Quit,
}

impl FromStr for SimCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "new" => Ok(Self::NewSession),
            "f" | "fps" | "stats" => Ok(Self::ReportStats),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

/// Non-blocking command source, polled once per scheduler iteration until empty.
pub trait InputSource {
    /// Next pending command, or `None` if nothing is waiting.
    fn poll_command(&mut self) -> Option<SimCommand>;
}

impl InputSource for VecDeque<SimCommand> {
    fn poll_command(&mut self) -> Option<SimCommand> {
        self.pop_front()
    }
}

/// Commands arriving over a channel from another thread.
#[derive(Debug, Clone)]
pub struct ChannelInput {
    rx: Receiver<SimCommand>,
}

impl ChannelInput {
    /// Create a connected sender/input pair.
    pub fn channel() -> (Sender<SimCommand>, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (tx, Self { rx })
    }
}

impl InputSource for ChannelInput {
    fn poll_command(&mut self) -> Option<SimCommand> {
        self.rx.try_recv().ok()
    }
}

/// Read commands from stdin, one per line, on a helper thread.
///
/// End of input just stops the reader; it does not quit the simulation.
pub fn spawn_stdin_input() -> std::io::Result<ChannelInput> {
    let (tx, input) = ChannelInput::channel();
    std::thread::Builder::new()
        .name("stdin-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<SimCommand>() {
                    Ok(cmd) => {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{e}"),
                }
            }
            debug!("stdin closed");
        })?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("n".parse::<SimCommand>(), Ok(SimCommand::NewSession));
        assert_eq!(" F \n".parse::<SimCommand>(), Ok(SimCommand::ReportStats));
        assert_eq!("quit".parse::<SimCommand>(), Ok(SimCommand::Quit));
        assert!("jump".parse::<SimCommand>().is_err());
    }

    #[test]
    fn test_channel_input_is_non_blocking() {
        let (tx, mut input) = ChannelInput::channel();
        assert_eq!(input.poll_command(), None);
        tx.send(SimCommand::NewSession).unwrap();
        tx.send(SimCommand::Quit).unwrap();
        assert_eq!(input.poll_command(), Some(SimCommand::NewSession));
        assert_eq!(input.poll_command(), Some(SimCommand::Quit));
        assert_eq!(input.poll_command(), None);
    }

    #[test]
    fn test_queue_input_drains_in_order() {
        let mut queue: VecDeque<_> = [SimCommand::ReportStats, SimCommand::NewSession].into();
        assert_eq!(queue.poll_command(), Some(SimCommand::ReportStats));
        assert_eq!(queue.poll_command(), Some(SimCommand::NewSession));
        assert_eq!(queue.poll_command(), None);
    }
}
