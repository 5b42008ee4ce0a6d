use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PauseChange {
    Halted,
    Resumed,
}

/// Drives display refreshes at a fixed cadence. Stopping it halts frames entirely; the
/// caller then waits on input alone.
pub struct FrameScheduler {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        FrameScheduler { interval, next_frame: None }
    }

    /// Schedules a frame right away. Starting a running scheduler does nothing.
    pub fn start(&mut self, now: Instant) {
        if self.next_frame.is_none() {
            self.next_frame = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_frame.is_some()
    }

    /// Stops frames while paused and restarts them on resume. Returns what changed, if anything.
    pub fn follow_pause(&mut self, paused: bool, now: Instant) -> Option<PauseChange> {
        if paused && self.is_running() {
            self.stop();
            Some(PauseChange::Halted)
        } else if !paused && !self.is_running() {
            self.start(now);
            Some(PauseChange::Resumed)
        } else {
            None
        }
    }

    /// How long to wait for input before the next frame. `None` means wait indefinitely.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.next_frame.map(|next| next.saturating_duration_since(now))
    }

    /// Consumes the pending frame if it is due. A late frame is not followed by a burst of
    /// catch-up frames.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_frame {
            Some(next) if now >= next => {
                let following = next + self.interval;
                let catch_up = now + self.interval;
                self.next_frame = Some(if following > now { following } else { catch_up });
                true
            }
            _ => false,
        }
    }
}
