//! Batches samples out of the ingest ring into wire packets and hands each one
//! to the send wrapper.

use core::fmt;

use crate::config::{PacketizerConfig, MAX_PACKET_BYTES, MIN_TX_INTERVAL_MS, PACKET_HEADER_BYTES};
use crate::diag::{DiagEvent, DiagLog};
use crate::metrics::PacketizerMetrics;
use crate::platform::Platform;
use crate::ring::IngestRing;
use crate::sample::is_valid_sample_size;
use crate::send::send_with_retry;
use crate::transport::{Status, Transport};

/// Owns the sequence counter, minimum-interval clock, and age budget for one
/// stream of outgoing packets.
pub struct Packetizer {
    seq_num: u16,
    last_send_time_ms: u32,
    age_threshold_ms: u32,
    metrics: PacketizerMetrics,
    diag: DiagLog,
}

impl Packetizer {
    /// Builds a packetizer from `config`. The first packet it ever sends is
    /// immediately eligible (no warm-up wait against `last_send_time_ms`).
    #[must_use]
    pub const fn new(config: PacketizerConfig) -> Self {
        Self {
            seq_num: config.start_seq,
            last_send_time_ms: 0,
            age_threshold_ms: config.age_threshold_ms,
            metrics: PacketizerMetrics {
                packets_sent: 0,
                packets_failed: 0,
            },
            diag: DiagLog::new(),
        }
    }

    #[must_use]
    pub fn metrics(&self) -> PacketizerMetrics {
        self.metrics
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagLog {
        &self.diag
    }

    #[must_use]
    pub fn next_seq_num(&self) -> u16 {
        self.seq_num
    }

    /// Attempts to build and send exactly one packet, greedily draining the
    /// oldest samples from `ring` under the byte, delta, and age budgets.
    ///
    /// Returns `None` if there was nothing to send. Returns the transport
    /// [`Status`] of the attempted send otherwise (the packetizer's own
    /// `packets_sent`/`packets_failed` counters and diagnostic log have
    /// already been updated by the time this returns).
    pub fn run_once<P, T>(&mut self, ring: &mut IngestRing, platform: &mut P, transport: &mut T) -> Option<Status>
    where
        P: Platform,
        T: Transport,
    {
        let mut packet = [0u8; MAX_PACKET_BYTES];
        let mut packet_len = PACKET_HEADER_BYTES;
        let mut sample_count: u8 = 0;
        let mut base_ts: u32 = 0;

        loop {
            let Some(sample) = ring.peek_oldest(platform) else {
                break;
            };

            if sample_count == 0 {
                base_ts = sample.timestamp_ms;
            }
            let delta = sample.timestamp_ms.wrapping_sub(base_ts);
            if delta > 0xFF {
                self.diag.record(DiagEvent::BatchClosedByDelta);
                break;
            }

            let mut effective_len = packet_len + 3 + sample.size as usize;
            if sample_count == 0 {
                effective_len += 4;
            }
            if effective_len > MAX_PACKET_BYTES {
                if sample_count == 0 {
                    ring.pop_oldest(platform);
                    self.diag.record(DiagEvent::OversizedSampleDiscarded);
                    continue;
                }
                self.diag.record(DiagEvent::BatchClosedByBudget);
                break;
            }

            if sample_count > 0 {
                let now = platform.now_ms();
                if now.wrapping_sub(base_ts) >= self.age_threshold_ms {
                    self.diag.record(DiagEvent::BatchClosedByAge);
                    break;
                }
            }

            let Some(sample) = ring.pop_oldest(platform) else {
                break;
            };

            if sample_count == 0 {
                packet[4..8].copy_from_slice(&base_ts.to_le_bytes());
                packet_len += 4;
            }

            let size = sample.size as usize;
            packet[packet_len] = sample.sensor_id;
            packet[packet_len + 1] = delta as u8;
            packet[packet_len + 2] = sample.size;
            packet[packet_len + 3..packet_len + 3 + size].copy_from_slice(sample.payload());
            packet_len += 3 + size;
            sample_count += 1;
        }

        if sample_count == 0 {
            return None;
        }

        packet[0..2].copy_from_slice(&self.seq_num.to_le_bytes());
        packet[2] = sample_count;
        packet[3] = 0;

        let now = platform.now_ms();
        let elapsed = now.wrapping_sub(self.last_send_time_ms);
        if elapsed < MIN_TX_INTERVAL_MS {
            platform.wait_ms(MIN_TX_INTERVAL_MS - elapsed);
        }

        let (status, _attempts) = send_with_retry(transport, platform, &packet[..packet_len]);
        self.last_send_time_ms = platform.now_ms();

        if status == Status::Success {
            self.metrics.note_sent();
            self.diag.record(DiagEvent::PacketSent);
            self.seq_num = self.seq_num.wrapping_add(1);
        } else {
            self.metrics.note_failed();
            self.diag.record(DiagEvent::PacketFailed);
        }

        Some(status)
    }
}

/// Why a buffer handed to [`decode`] could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ends before a complete header or sample entry.
    Truncated,
    /// The buffer is long enough but its contents violate the wire format
    /// (e.g. a sample size outside `[2, 6]`, or `sample_count == 0`).
    Inconsistent,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Truncated => "truncated packet",
            Self::Inconsistent => "inconsistent packet contents",
        };
        f.write_str(s)
    }
}

/// One sample recovered from a decoded packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedSample<'a> {
    pub sensor_id: u8,
    pub timestamp_ms: u32,
    pub payload: &'a [u8],
}

/// A parsed, not-yet-iterated view of an encoded packet's header and body.
#[derive(Debug, Clone, Copy)]
pub struct DecodedPacket<'a> {
    pub seq_num: u16,
    pub sample_count: u8,
    pub flags: u8,
    pub base_timestamp: u32,
    body: &'a [u8],
}

impl<'a> DecodedPacket<'a> {
    /// An iterator over this packet's samples, oldest first. Yields a
    /// [`DecodeError`] and stops early if the body is internally inconsistent
    /// with the declared `sample_count`.
    #[must_use]
    pub fn samples(&self) -> DecodedSamples<'a> {
        DecodedSamples {
            body: self.body,
            remaining: self.sample_count,
            base_timestamp: self.base_timestamp,
        }
    }
}

/// Iterator returned by [`DecodedPacket::samples`].
pub struct DecodedSamples<'a> {
    body: &'a [u8],
    remaining: u8,
    base_timestamp: u32,
}

impl<'a> Iterator for DecodedSamples<'a> {
    type Item = Result<DecodedSample<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if self.body.len() < 3 {
            self.remaining = 0;
            return Some(Err(DecodeError::Truncated));
        }
        let sensor_id = self.body[0];
        let delta = self.body[1];
        let size = self.body[2];
        if !is_valid_sample_size(size) {
            self.remaining = 0;
            return Some(Err(DecodeError::Inconsistent));
        }
        let entry_len = 3 + size as usize;
        if self.body.len() < entry_len {
            self.remaining = 0;
            return Some(Err(DecodeError::Truncated));
        }
        let payload = &self.body[3..entry_len];
        let timestamp_ms = self.base_timestamp.wrapping_add(u32::from(delta));
        self.body = &self.body[entry_len..];
        self.remaining -= 1;
        Some(Ok(DecodedSample {
            sensor_id,
            timestamp_ms,
            payload,
        }))
    }
}

/// Parses a packet's header. Call [`DecodedPacket::samples`] to walk the body.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] if `packet` is shorter than a full
/// header, or [`DecodeError::Inconsistent`] if `sample_count` is zero (never
/// produced by [`Packetizer::run_once`], which only sends non-empty packets).
pub fn decode(packet: &[u8]) -> Result<DecodedPacket<'_>, DecodeError> {
    const HEADER_WITH_BASE_TS: usize = PACKET_HEADER_BYTES + 4;
    if packet.len() < HEADER_WITH_BASE_TS {
        return Err(DecodeError::Truncated);
    }
    let seq_num = u16::from_le_bytes([packet[0], packet[1]]);
    let sample_count = packet[2];
    let flags = packet[3];
    let base_timestamp = u32::from_le_bytes([packet[4], packet[5], packet[6], packet[7]]);
    if sample_count == 0 {
        return Err(DecodeError::Inconsistent);
    }
    Ok(DecodedPacket {
        seq_num,
        sample_count,
        flags,
        base_timestamp,
        body: &packet[HEADER_WITH_BASE_TS..],
    })
}
