//! Sensor registration table: which sensor IDs the ingest ring currently
//! accepts samples from.

use crate::config::MAX_SENSORS;
use crate::invariants::debug_assert_registered_count_bounded;

/// A fixed-capacity `sensor_id -> registered` map, persisted for the process
/// lifetime. All methods here assume the caller already holds the platform's
/// critical section; the table has no locking of its own.
pub(crate) struct SensorTable {
    registered: [bool; MAX_SENSORS as usize],
    registered_count: u8,
}

impl SensorTable {
    pub(crate) const fn new() -> Self {
        Self {
            registered: [false; MAX_SENSORS as usize],
            registered_count: 0,
        }
    }

    #[inline]
    pub(crate) fn is_registered(&self, sensor_id: u8) -> bool {
        match self.registered.get(sensor_id as usize) {
            Some(flag) => *flag,
            None => false,
        }
    }

    #[inline]
    pub(crate) fn registered_count(&self) -> u8 {
        self.registered_count
    }

    /// Registers `sensor_id`. Returns `false` if the ID is out of range or the
    /// table is at capacity. Idempotent: registering an already-registered ID
    /// succeeds without double-counting.
    pub(crate) fn register(&mut self, sensor_id: u8) -> bool {
        let Some(slot) = self.registered.get_mut(sensor_id as usize) else {
            return false;
        };
        if !*slot {
            // Unreachable given MAX_SENSORS slots indexed by IDs < MAX_SENSORS,
            // but kept for symmetry with a table that might grow independently
            // of the ID space in the future.
            if self.registered_count >= MAX_SENSORS {
                return false;
            }
            *slot = true;
            self.registered_count += 1;
            debug_assert_registered_count_bounded!(self.registered_count, MAX_SENSORS);
        }
        true
    }

    /// Unregisters `sensor_id`. Idempotent; returns `false` only if the ID is
    /// out of range.
    pub(crate) fn unregister(&mut self, sensor_id: u8) -> bool {
        let Some(slot) = self.registered.get_mut(sensor_id as usize) else {
            return false;
        };
        if *slot {
            *slot = false;
            self.registered_count = self.registered_count.saturating_sub(1);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister_round_trip() {
        let mut t = SensorTable::new();
        assert!(!t.is_registered(3));
        assert!(t.register(3));
        assert!(t.is_registered(3));
        assert_eq!(t.registered_count(), 1);
        assert!(t.unregister(3));
        assert!(!t.is_registered(3));
        assert_eq!(t.registered_count(), 0);
    }

    #[test]
    fn register_is_idempotent() {
        let mut t = SensorTable::new();
        assert!(t.register(1));
        assert!(t.register(1));
        assert_eq!(t.registered_count(), 1);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut t = SensorTable::new();
        assert!(t.unregister(1));
        assert!(t.unregister(1));
        assert_eq!(t.registered_count(), 0);
    }

    #[test]
    fn out_of_range_id_is_rejected() {
        let mut t = SensorTable::new();
        assert!(!t.register(MAX_SENSORS));
        assert!(!t.unregister(MAX_SENSORS));
    }

    #[test]
    fn all_sensors_can_register() {
        let mut t = SensorTable::new();
        for id in 0..MAX_SENSORS {
            assert!(t.register(id));
        }
        assert_eq!(t.registered_count(), MAX_SENSORS);
    }
}
