/// Elapsed tracking time, excluding paused intervals. Always derived from
/// absolute timestamps so late or skipped ticks cannot drift it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClock {
    accumulated_ms: i64,
    session_start_ms: Option<i64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.session_start_ms.is_some()
    }

    /// Pauses a running clock or (re)starts a stopped one.
    pub fn toggle(&mut self, now_ms: i64) {
        match self.session_start_ms.take() {
            Some(start) => self.accumulated_ms += (now_ms - start).max(0),
            None => self.session_start_ms = Some(now_ms),
        }
    }

    pub fn resume(&mut self, now_ms: i64) {
        if !self.is_running() {
            self.toggle(now_ms);
        }
    }

    pub fn pause(&mut self, now_ms: i64) {
        if self.is_running() {
            self.toggle(now_ms);
        }
    }

    pub fn elapsed(&self, now_ms: i64) -> i64 {
        let running = self
            .session_start_ms
            .map(|start| (now_ms - start).max(0))
            .unwrap_or(0);
        self.accumulated_ms + running
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
        self.session_start_ms = None;
    }
}
