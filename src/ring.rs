//! The ISR-safe ingest ring: a drop-oldest SPSC queue of [`SampleSlot`]s.

use crate::config::RING_CAPACITY;
use crate::diag::{DiagEvent, DiagLog};
use crate::invariants::{
    debug_assert_cursors_bounded, debug_assert_monotonic, debug_assert_valid_sample_size,
};
use crate::metrics::RingMetrics;
use crate::platform::Platform;
use crate::registration::SensorTable;
use crate::sample::{is_valid_sample_size, SampleSlot};

/// Bounded, drop-oldest single-producer/single-consumer ring buffer of
/// samples, with a sensor registration gate and its own metrics.
///
/// The producer is expected to be an interrupt handler calling [`Self::push`];
/// the consumer is a cooperative-context caller (typically a packetizer)
/// calling [`Self::peek_oldest`]/[`Self::pop_oldest`]. Both sides must be
/// given the *same* [`Platform`] so that the critical section actually masks
/// the producing interrupt.
///
/// Two free-running 64-bit cursors (`prod`, `cons`) track occupancy without a
/// separate full/empty flag: `cursor mod capacity` gives the backing index,
/// and at one push per nanosecond a 64-bit cursor does not wrap within any
/// plausible deployment lifetime.
pub struct IngestRing {
    cells: [SampleSlot; RING_CAPACITY],
    prod: u64,
    cons: u64,
    sensors: SensorTable,
    metrics: RingMetrics,
    diag: DiagLog,
}

impl IngestRing {
    /// Creates an empty ring with no sensors registered.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [SampleSlot::EMPTY; RING_CAPACITY],
            prod: 0,
            cons: 0,
            sensors: SensorTable::new(),
            metrics: RingMetrics {
                samples_received: 0,
                samples_dropped: 0,
                invalid_size_counter: 0,
                ring_high_water: 0,
            },
            diag: DiagLog::new(),
        }
    }

    /// Resets the ring to its just-constructed state. Call once at startup.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Fixed capacity of the ring, in samples.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        RING_CAPACITY
    }

    /// Number of samples currently buffered.
    #[inline]
    #[must_use]
    pub fn occupancy(&self) -> usize {
        (self.prod - self.cons) as usize
    }

    /// The largest occupancy observed since the last `init`.
    #[inline]
    #[must_use]
    pub fn high_water(&self) -> u32 {
        self.metrics.ring_high_water
    }

    /// The running count of rejected pushes (bad size, bad sensor ID, or
    /// unregistered sensor — all three share one counter).
    #[inline]
    #[must_use]
    pub fn invalid_counter(&self) -> u32 {
        self.metrics.invalid_size_counter
    }

    /// A snapshot of every counter this ring owns.
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> RingMetrics {
        self.metrics
    }

    /// The recent-events diagnostic log.
    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &DiagLog {
        &self.diag
    }

    /// Marks `sensor_id` as accepted. Returns `false` if the ID is out of
    /// range or the registration table is at capacity.
    pub fn register<P: Platform>(&mut self, platform: &mut P, sensor_id: u8) -> bool {
        platform.enter_critical();
        let ok = self.sensors.register(sensor_id);
        platform.exit_critical();
        ok
    }

    /// Stops accepting samples from `sensor_id`. Idempotent; returns `false`
    /// only if the ID is out of range.
    pub fn unregister<P: Platform>(&mut self, platform: &mut P, sensor_id: u8) -> bool {
        platform.enter_critical();
        let ok = self.sensors.unregister(sensor_id);
        platform.exit_critical();
        ok
    }

    /// Pushes one sample from interrupt context.
    ///
    /// Validates `size` and `sensor_id` before touching the critical section
    /// (no point masking interrupts just to reject malformed input). A
    /// registered, well-formed sample is admitted even if the ring is full —
    /// the oldest sample is dropped to make room.
    pub fn push<P: Platform>(&mut self, platform: &mut P, sensor_id: u8, data: &[u8], size: u8) {
        if !is_valid_sample_size(size) || sensor_id as u32 >= crate::config::MAX_SENSORS as u32 {
            platform.enter_critical();
            self.metrics.note_invalid();
            self.diag.record(DiagEvent::SampleRejected);
            platform.exit_critical();
            return;
        }
        if (data.len() as u32) < size as u32 {
            // Defensive: a short buffer can't supply the bytes it claims to.
            platform.enter_critical();
            self.metrics.note_invalid();
            self.diag.record(DiagEvent::SampleRejected);
            platform.exit_critical();
            return;
        }

        // The clock source is documented ISR-safe, so sample it before taking
        // the critical section to keep the masked region as short as possible.
        let ts = platform.now_ms();

        platform.enter_critical();

        if !self.sensors.is_registered(sensor_id) {
            self.metrics.note_invalid();
            self.diag.record(DiagEvent::SampleRejected);
            platform.exit_critical();
            return;
        }

        if self.occupancy() == RING_CAPACITY {
            let old_cons = self.cons;
            self.cons += 1;
            debug_assert_monotonic!("cons", old_cons, self.cons);
            self.metrics.note_dropped();
            self.diag.record(DiagEvent::SampleDropped);
        }

        debug_assert_valid_sample_size!(size);
        let idx = (self.prod as usize) % RING_CAPACITY;
        let cell = &mut self.cells[idx];
        cell.timestamp_ms = ts;
        cell.sensor_id = sensor_id;
        cell.size = size;
        cell.write_payload(&data[..size as usize]);

        let old_prod = self.prod;
        self.prod += 1;
        debug_assert_monotonic!("prod", old_prod, self.prod);
        debug_assert_cursors_bounded!(self.cons, self.prod, RING_CAPACITY);

        let occ = self.occupancy();
        self.metrics.note_received(occ);

        platform.exit_critical();
    }

    /// Copies the oldest sample out without removing it.
    pub fn peek_oldest<P: Platform>(&self, platform: &mut P) -> Option<SampleSlot> {
        platform.enter_critical();
        let out = if self.occupancy() == 0 {
            None
        } else {
            let idx = (self.cons as usize) % RING_CAPACITY;
            Some(self.cells[idx])
        };
        platform.exit_critical();
        out
    }

    /// Copies the oldest sample out and retires it.
    pub fn pop_oldest<P: Platform>(&mut self, platform: &mut P) -> Option<SampleSlot> {
        platform.enter_critical();
        let out = if self.occupancy() == 0 {
            None
        } else {
            let idx = (self.cons as usize) % RING_CAPACITY;
            let slot = self.cells[idx];
            let old_cons = self.cons;
            self.cons += 1;
            debug_assert_monotonic!("cons", old_cons, self.cons);
            Some(slot)
        };
        platform.exit_critical();
        out
    }
}

impl Default for IngestRing {
    fn default() -> Self {
        Self::new()
    }
}
