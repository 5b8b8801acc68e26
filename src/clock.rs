/// Seconds since an arbitrary epoch (the board timer's power-on).
pub type Seconds = i64;

/// Tracks appliance uptime.
///
/// Unlike a monotonic clock the recorded start can be moved into the past,
/// which is how a sensor that was already warm skips the warmup countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RuntimeClock {
    start: Seconds,
    warmup_skipped: bool,
}

impl RuntimeClock {
    /// Starts counting from `now`
    pub fn new(now: Seconds) -> RuntimeClock {
        Self {
            start: now,
            warmup_skipped: false,
        }
    }

    /// Elapsed seconds between the recorded start and `now`
    pub fn runtime(&self, now: Seconds) -> Seconds {
        now - self.start
    }

    /// Moves the recorded start `credit` seconds back.
    /// Only the first call has any effect; returns whether it applied.
    pub fn skip_warmup(&mut self, credit: Seconds) -> bool {
        if self.warmup_skipped {
            return false;
        }
        self.start -= credit;
        self.warmup_skipped = true;
        true
    }

    pub fn warmup_skipped(&self) -> bool {
        self.warmup_skipped
    }
}
