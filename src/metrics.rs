//! Diagnostic counters. Read for observability only — nothing in this crate
//! branches on a metrics value.

/// Counters owned by the ingest ring.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingMetrics {
    pub samples_received: u32,
    pub samples_dropped: u32,
    pub invalid_size_counter: u32,
    pub ring_high_water: u32,
}

impl RingMetrics {
    #[inline]
    pub(crate) fn note_received(&mut self, occupancy_after: usize) {
        self.samples_received = self.samples_received.saturating_add(1);
        let occ = occupancy_after.min(u32::MAX as usize) as u32;
        self.ring_high_water = self.ring_high_water.max(occ);
    }

    #[inline]
    pub(crate) fn note_dropped(&mut self) {
        self.samples_dropped = self.samples_dropped.saturating_add(1);
    }

    #[inline]
    pub(crate) fn note_invalid(&mut self) {
        self.invalid_size_counter = self.invalid_size_counter.saturating_add(1);
    }
}

/// Counters owned by the packetizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketizerMetrics {
    pub packets_sent: u32,
    pub packets_failed: u32,
}

impl PacketizerMetrics {
    #[inline]
    pub(crate) fn note_sent(&mut self) {
        self.packets_sent = self.packets_sent.saturating_add(1);
    }

    #[inline]
    pub(crate) fn note_failed(&mut self) {
        self.packets_failed = self.packets_failed.saturating_add(1);
    }
}

/// A combined snapshot of every counter in the pipeline, for callers that want
/// one value to log or export rather than reaching into both components.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics {
    pub samples_received: u32,
    pub samples_dropped: u32,
    pub invalid_size_counter: u32,
    pub ring_high_water: u32,
    pub packets_sent: u32,
    pub packets_failed: u32,
}

impl Metrics {
    #[must_use]
    pub const fn combine(ring: RingMetrics, packetizer: PacketizerMetrics) -> Self {
        Self {
            samples_received: ring.samples_received,
            samples_dropped: ring.samples_dropped,
            invalid_size_counter: ring.invalid_size_counter,
            ring_high_water: ring.ring_high_water,
            packets_sent: packetizer.packets_sent,
            packets_failed: packetizer.packets_failed,
        }
    }
}
