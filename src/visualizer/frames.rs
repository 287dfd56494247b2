use std::time::{Duration, Instant};

/// Identifies one outstanding frame request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// "Call me again next frame", with cancellation.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;

    fn cancel_frame(&mut self, id: FrameId);
}

/// Fixed-interval scheduler polled by the event loop.
///
/// At most one request is outstanding; a new request replaces the old one.
pub struct FrameClock {
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameId, Instant)>,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            pending: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hand out the pending request if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<FrameId> {
        match self.pending {
            Some((id, due)) if due <= now => {
                self.pending = None;
                Some(id)
            }
            _ => None,
        }
    }

    /// How long the caller may sleep before the pending frame is due.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, due)| due.saturating_duration_since(now))
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending = Some((id, Instant::now() + self.interval));
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending.is_some_and(|(pending, _)| pending == id) {
            self.pending = None;
        }
    }
}
