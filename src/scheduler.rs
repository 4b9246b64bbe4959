/// Single repeating frame handle. A host asks [`FrameScheduler::tick`] once
/// per display frame and only schedules another frame while it returns `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameScheduler {
    running: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("frame loop started");
            self.running = true;
        }
    }

    pub fn cancel(&mut self) {
        if self.running {
            log::debug!("frame loop cancelled after {} frames", self.frames);
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Claims the next frame. Returns `false` once cancelled.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.frames += 1;
        }
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
