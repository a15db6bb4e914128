/// Single-slot guard that coalesces bursts of scroll events into at most one
/// recomputation per animation frame.
///
/// A scroll event calls [`request`](Self::request); only a `true` answer
/// should schedule a frame. The frame callback calls
/// [`complete`](Self::complete) before doing its work.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot. Returns `false` if a frame is already scheduled.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Release the slot. Also used when scheduling the frame failed.
    pub fn complete(&mut self) {
        self.pending = false;
    }

    /// Claim the slot and run `schedule`. A failed schedule releases the
    /// slot again so the next event can retry.
    ///
    /// Returns `None` without calling `schedule` if a frame is already pending.
    pub fn schedule<T, E>(
        &mut self,
        schedule: impl FnOnce() -> Result<T, E>,
    ) -> Option<Result<T, E>> {
        if !self.request() {
            return None;
        }
        let result = schedule();
        if result.is_err() {
            self.complete();
        }
        Some(result)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_coalesces_into_one_frame() {
        let mut throttle = FrameThrottle::new();
        let scheduled = (0..10).filter(|_| throttle.request()).count();
        assert_eq!(scheduled, 1);
        assert!(throttle.is_pending());
    }

    #[test]
    fn test_complete_reopens_slot() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.request());
        throttle.complete();
        assert!(!throttle.is_pending());
        assert!(throttle.request());
    }

    #[test]
    fn test_failed_schedule_releases_slot() {
        let mut throttle = FrameThrottle::new();
        let failed = throttle.schedule(|| Err::<i32, &str>("no frame"));
        assert_eq!(failed, Some(Err("no frame")));
        assert!(!throttle.is_pending());

        assert_eq!(throttle.schedule(|| Ok::<i32, &str>(7)), Some(Ok(7)));
        assert!(throttle.is_pending());
        // Pending: the second scheduler never runs.
        let mut ran = false;
        assert!(throttle
            .schedule(|| {
                ran = true;
                Ok::<i32, &str>(8)
            })
            .is_none());
        assert!(!ran);
    }
}
