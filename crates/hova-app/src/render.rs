//! The renderer seam. The scheduler never touches graphics objects; it hands
//! a [`FrameSnapshot`] to whatever implements [`Renderer`].

use hova_sim::FrameSnapshot;
use tracing::{debug, trace};

/// Consumer of rendered frames.
pub trait Renderer {
    /// Draw one frame from the snapshot.
    fn render(&mut self, frame: &FrameSnapshot<'_>);

    /// Show the human-readable elapsed-session line (a window title, say).
    fn show_status(&mut self, _status: &str) {}
}

/// Renderer with no display: logs each frame at `trace` and the status line at `debug`.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    msaa_samples: u32,
    frames: u64,
    status: String,
}

impl HeadlessRenderer {
    /// Create a headless renderer that reports the requested MSAA level.
    pub fn new(msaa_samples: u32) -> Self {
        debug!(msaa_samples, "headless renderer ready");
        Self {
            msaa_samples,
            ..Self::default()
        }
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Last status line shown.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// MSAA sample count this renderer was configured with.
    pub fn msaa_samples(&self) -> u32 {
        self.msaa_samples
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, frame: &FrameSnapshot<'_>) {
        self.frames += 1;
        let vehicle = frame.vehicle.w_axis.truncate();
        trace!(
            frame = frame.frame,
            sim_time = frame.sim_time,
            terrain_height = frame.terrain_height,
            vehicle = ?vehicle,
            points = frame.cosmos.len(),
            "frame"
        );
    }

    fn show_status(&mut self, status: &str) {
        debug!("{status}");
        self.status.clear();
        self.status.push_str(status);
    }
}
