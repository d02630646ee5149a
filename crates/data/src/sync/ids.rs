//! Millisecond-timestamp ids.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Hands out millisecond timestamps that never repeat within one clock.
///
/// Two ids requested in the same millisecond get consecutive values, so a
/// burst of creations never collides.
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicU64,
}

impl IdClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Next id: the current time in milliseconds, or one past the last id.
    pub fn next(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let clock = IdClock::new();
        let ids: Vec<u64> = (0..1000).map(|_| clock.next()).collect();
        assert!(ids.windows(2).all(|w| matches!(w, [a, b] if a < b)));
    }

    #[test]
    fn test_ids_track_wall_clock() {
        let clock = IdClock::new();
        let before = u64::try_from(Utc::now().timestamp_millis()).expect("positive");
        assert!(clock.next() >= before);
    }
}
