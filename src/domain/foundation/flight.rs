//! Single-slot in-flight request token.
//!
//! Formalizes the "busy" indicator that serializes round-trips: acquiring
//! the slot is the only way to start a round-trip, and the slot is released
//! when the returned guard is dropped, on completion or failure alike.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token slot that admits at most one in-flight operation.
///
/// # Invariants
///
/// - At most one [`FlightGuard`] exists per slot at any time.
/// - The slot is released exactly when the guard is dropped.
#[derive(Debug, Clone, Default)]
pub struct FlightSlot {
    occupied: Arc<AtomicBool>,
}

impl FlightSlot {
    /// Creates a new, unoccupied slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to occupy the slot.
    ///
    /// Returns `None` if an operation is already in flight.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.occupied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                occupied: Arc::clone(&self.occupied),
            })
    }

    /// Returns true if an operation is currently in flight.
    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }
}

/// Guard representing an in-flight operation; releases the slot on drop.
#[derive(Debug)]
pub struct FlightGuard {
    occupied: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.occupied.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slot_is_unoccupied() {
        let slot = FlightSlot::new();
        assert!(!slot.is_occupied());
    }

    #[test]
    fn acquire_occupies_the_slot() {
        let slot = FlightSlot::new();
        let guard = slot.try_acquire();
        assert!(guard.is_some());
        assert!(slot.is_occupied());
    }

    #[test]
    fn second_acquire_fails_while_guard_held() {
        let slot = FlightSlot::new();
        let _guard = slot.try_acquire().unwrap();
        assert!(slot.try_acquire().is_none());
    }

    #[test]
    fn dropping_guard_releases_the_slot() {
        let slot = FlightSlot::new();
        {
            let _guard = slot.try_acquire().unwrap();
            assert!(slot.is_occupied());
        }
        assert!(!slot.is_occupied());
        assert!(slot.try_acquire().is_some());
    }

    #[test]
    fn clones_share_the_same_slot() {
        let slot = FlightSlot::new();
        let view = slot.clone();
        let _guard = slot.try_acquire().unwrap();
        assert!(view.is_occupied());
        assert!(view.try_acquire().is_none());
    }
}
