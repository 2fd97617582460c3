//! Creation-time identifiers for entries and messages.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out millisecond-timestamp ids that never repeat within one generator.
///
/// Two calls in the same millisecond (or after the wall clock stepped back)
/// get consecutive values instead of a duplicate. Uniqueness across processes
/// is not guaranteed.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::IdGenerator;
///
/// let ids = IdGenerator::new();
/// let first: i64 = ids.next_id().parse().unwrap();
/// let second: i64 = ids.next_id().parse().unwrap();
/// assert!(second > first);
/// ```
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next id, derived from the current wall clock.
    pub fn next_id(&self) -> String {
        self.next_at(Utc::now().timestamp_millis()).to_string()
    }

    fn next_at(&self, millis: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if millis > prev { millis } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_same_millisecond_is_bumped() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_at(1_000), 1_000);
        assert_eq!(ids.next_at(1_000), 1_001);
        assert_eq!(ids.next_at(1_000), 1_002);
        assert_eq!(ids.next_at(5_000), 5_000);
    }

    #[test]
    fn test_clock_step_back_stays_monotonic() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_at(2_000), 2_000);
        assert_eq!(ids.next_at(1_500), 2_001);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let ids = Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(seen.len(), 1_000);
    }
}
