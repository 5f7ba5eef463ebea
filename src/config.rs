//! Compile-time tuning constants and the packetizer's small runtime-configurable
//! knobs.

/// Number of distinct sensor IDs the registration table can hold.
pub const MAX_SENSORS: u8 = 10;
/// Capacity of the ingest ring, in [`crate::sample::SampleSlot`] cells.
pub const RING_CAPACITY: usize = 1024;
/// Maximum wire packet size, header included.
pub const MAX_PACKET_BYTES: usize = 200;
/// Size of the fixed packet header (`seq_num`, `sample_count`, `flags`). The
/// `base_timestamp` field is four further bytes, added once per packet by the
/// packetizer rather than folded into this constant.
pub const PACKET_HEADER_BYTES: usize = 4;
/// Minimum spacing enforced between consecutive transport sends.
pub const MIN_TX_INTERVAL_MS: u32 = 10;
/// Default batch age budget: how long samples may sit together before a packet
/// is forced out.
pub const DEFAULT_AGE_MS: u32 = 20;
/// Number of attempts the send wrapper makes before giving up.
pub const MAX_RETRIES: u32 = 2;
/// Backoff between transient-failure retries.
pub const BACKOFF_MS: u32 = 5;

/// Runtime configuration for a [`crate::packetizer::Packetizer`].
///
/// Separate from the compile-time constants above: this is the handful of
/// knobs a main loop plausibly wants to change at startup (or between runs in
/// a test), without touching the wire-format or ring-capacity constants.
#[derive(Debug, Clone, Copy)]
pub struct PacketizerConfig {
    /// Upper bound, in ms, on how long a batch may accumulate before it is
    /// flushed regardless of remaining byte budget.
    pub age_threshold_ms: u32,
    /// Sequence number the first emitted packet will carry.
    pub start_seq: u16,
}

impl PacketizerConfig {
    /// Creates a new configuration.
    ///
    /// # Panics
    ///
    /// Panics if `age_threshold_ms` is zero — a zero age budget would force
    /// every batch to a single sample, which is never the intent of this
    /// knob and is almost certainly a misconfiguration.
    #[must_use]
    pub const fn new(age_threshold_ms: u32, start_seq: u16) -> Self {
        assert!(age_threshold_ms > 0, "age_threshold_ms must be non-zero");
        Self {
            age_threshold_ms,
            start_seq,
        }
    }
}

impl Default for PacketizerConfig {
    fn default() -> Self {
        Self {
            age_threshold_ms: DEFAULT_AGE_MS,
            start_seq: 0,
        }
    }
}

/// The age budget the production main loop actually runs with (tighter than
/// [`DEFAULT_AGE_MS`], trading a little batching efficiency for latency).
pub const PRODUCTION_CONFIG: PacketizerConfig = PacketizerConfig::new(10, 0);

/// The data model's default age budget, batching more aggressively at the
/// cost of added latency before the first packet of a quiet period.
pub const RELAXED_CONFIG: PacketizerConfig = PacketizerConfig::new(DEFAULT_AGE_MS, 0);
