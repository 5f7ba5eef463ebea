//! sensor-pipe-rs - an ISR-safe sensor ingest pipeline for a resource-constrained MCU
//!
//! Sensors deliver small, timestamped samples asynchronously from interrupt
//! context. This crate buffers them in a drop-oldest ring, batches them into
//! delta-encoded wire packets under a strict size and timing budget, and
//! hands each packet to a caller-supplied radio transport through a bounded
//! retry wrapper.
//!
//! `no_std`, no dynamic allocation. Everything that touches a clock or masks
//! an interrupt goes through the [`Platform`] trait; everything that talks to
//! the radio goes through the [`Transport`] trait, so the core is testable on
//! a host and portable to any MCU target that can implement both.
//!
//! # Example
//!
//! ```
//! use sensor_pipe_rs::{IngestRing, Packetizer, PacketizerConfig};
//!
//! let mut ring = IngestRing::new();
//! let mut packetizer = Packetizer::new(PacketizerConfig::default());
//! // `platform` and `transport` are caller-supplied `Platform`/`Transport`
//! // implementations; `sensor_pipe_rs::run_forever` drives the two together.
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

mod config;
mod diag;
mod invariants;
mod main_loop;
mod metrics;
mod packetizer;
mod platform;
mod registration;
mod ring;
mod sample;
mod send;
mod sensor;
mod transport;

pub use config::{
    PacketizerConfig, BACKOFF_MS, DEFAULT_AGE_MS, MAX_PACKET_BYTES, MAX_RETRIES, MAX_SENSORS,
    MIN_TX_INTERVAL_MS, PACKET_HEADER_BYTES, PRODUCTION_CONFIG, RELAXED_CONFIG, RING_CAPACITY,
};
pub use diag::{DiagEvent, DiagLog};
pub use main_loop::run_forever;
pub use metrics::{Metrics, PacketizerMetrics, RingMetrics};
pub use packetizer::{decode, DecodeError, DecodedPacket, DecodedSample, DecodedSamples, Packetizer};
pub use platform::Platform;
pub use ring::IngestRing;
pub use sample::{is_valid_sample_size, SampleSlot, SAMPLE_PAYLOAD_MAX, SAMPLE_SIZE_MIN};
pub use send::send_with_retry;
pub use sensor::on_sample;
pub use transport::{Status, Transport};
