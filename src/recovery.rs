use std::time::{Duration, Instant};

/// How long a lockout lasts before the automatic reset kicks in
pub const RECOVERY_DELAY: Duration = Duration::from_millis(300);

/// Cancellable recovery deadline, keyed by unit identity so a timer armed
/// for a replaced unit can never mutate its successor.
#[derive(Debug, Default)]
pub struct RecoveryTimer {
    pending: Option<(u64, Instant)>,
}

impl RecoveryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the timer for `unit_id`
    pub fn schedule(&mut self, unit_id: u64, now: Instant) {
        self.pending = Some((unit_id, now + RECOVERY_DELAY));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns true when the deadline for the given unit has elapsed. A due
    /// deadline belonging to any other unit is dropped silently.
    pub fn fire_if_due(&mut self, unit_id: u64, now: Instant) -> bool {
        match self.pending {
            Some((id, deadline)) if now >= deadline => {
                self.pending = None;
                id == unit_id
            }
            _ => false,
        }
    }
}
