//! The unit of data stored in the ingest ring.

/// Lower bound (inclusive) on a sample's payload size, in bytes.
pub const SAMPLE_SIZE_MIN: u8 = 2;
/// Upper bound (inclusive) on a sample's payload size, in bytes.
pub const SAMPLE_PAYLOAD_MAX: u8 = 6;

/// One timestamped observation from one sensor.
///
/// `payload` is a fixed-capacity buffer; only the first `size` bytes are
/// meaningful. The rest is indeterminate and must not be read.
#[derive(Debug, Clone, Copy)]
pub struct SampleSlot {
    pub timestamp_ms: u32,
    pub sensor_id: u8,
    pub size: u8,
    pub payload: [u8; SAMPLE_PAYLOAD_MAX as usize],
}

impl SampleSlot {
    /// An empty, all-zero slot. Never observed as "valid" by the ring — it only
    /// exists so cells can be default-initialized before the producer writes them.
    pub const EMPTY: Self = Self {
        timestamp_ms: 0,
        sensor_id: 0,
        size: 0,
        payload: [0; SAMPLE_PAYLOAD_MAX as usize],
    };

    /// The meaningful prefix of `payload`.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.size as usize]
    }

    #[inline]
    pub(crate) fn write_payload(&mut self, data: &[u8]) {
        self.payload[..data.len()].copy_from_slice(data);
    }
}

/// True if `size` falls within the wire-format payload bounds `[2, 6]`.
#[inline]
#[must_use]
pub fn is_valid_sample_size(size: u8) -> bool {
    (SAMPLE_SIZE_MIN..=SAMPLE_PAYLOAD_MAX).contains(&size)
}
