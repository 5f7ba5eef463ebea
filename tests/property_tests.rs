//! Property-based tests over the ingest ring and packetizer, covering the
//! invariants called out for this pipeline: bounded occupancy, conserved
//! sample counts, FIFO ordering under drop-oldest, and packet framing limits.

use proptest::prelude::*;
use sensor_pipe_rs::{decode, IngestRing, Packetizer, PacketizerConfig, Platform, Status, Transport};

struct TestClock {
    now_ms: u32,
    critical_depth: u32,
}

impl TestClock {
    fn new() -> Self {
        Self {
            now_ms: 0,
            critical_depth: 0,
        }
    }
}

impl Platform for TestClock {
    fn init(&mut self) {}

    fn now_ms(&self) -> u32 {
        self.now_ms
    }

    fn wait_ms(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    fn enter_critical(&mut self) {
        self.critical_depth += 1;
        assert_eq!(self.critical_depth, 1);
    }

    fn exit_critical(&mut self) {
        self.critical_depth -= 1;
    }
}

#[derive(Default)]
struct AlwaysSendTransport {
    sent: Vec<Vec<u8>>,
}

impl Transport for AlwaysSendTransport {
    fn send(&mut self, packet: &[u8]) -> Status {
        self.sent.push(packet.to_vec());
        Status::Success
    }
}

#[derive(Clone, Debug)]
enum Op {
    Push { sensor_id: u8, payload: Vec<u8> },
    Pop,
    Peek,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..10, prop::collection::vec(any::<u8>(), 2..=6))
            .prop_map(|(sensor_id, payload)| Op::Push { sensor_id, payload }),
        Just(Op::Pop),
        Just(Op::Peek),
    ]
}

proptest! {
    /// Occupancy never exceeds capacity, and high_water tracks the largest
    /// occupancy ever observed, for any interleaving of push/pop/peek.
    #[test]
    fn occupancy_stays_bounded_under_any_interleaving(ops in prop::collection::vec(op_strategy(), 0..500)) {
        let mut ring = IngestRing::new();
        let mut clock = TestClock::new();
        for id in 0..10 {
            ring.register(&mut clock, id);
        }

        for op in ops {
            match op {
                Op::Push { sensor_id, payload } => {
                    let size = payload.len() as u8;
                    ring.push(&mut clock, sensor_id, &payload, size);
                }
                Op::Pop => {
                    ring.pop_oldest(&mut clock);
                }
                Op::Peek => {
                    ring.peek_oldest(&mut clock);
                }
            }
            let occupancy = ring.occupancy();
            prop_assert!(occupancy <= ring.capacity());
            prop_assert!(ring.high_water() as usize >= occupancy);
        }
    }

    /// Every valid push is accounted for exactly once: either it is still (or
    /// was) counted received, and received = dropped + whatever remains
    /// retrievable by draining the ring to empty.
    #[test]
    fn received_equals_dropped_plus_drained(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 2..=6), 0..2000)
    ) {
        let mut ring = IngestRing::new();
        let mut clock = TestClock::new();
        ring.register(&mut clock, 0);

        for payload in &payloads {
            let size = payload.len() as u8;
            ring.push(&mut clock, 0, payload, size);
        }

        let mut drained = 0u32;
        while ring.pop_oldest(&mut clock).is_some() {
            drained += 1;
        }

        let m = ring.metrics();
        prop_assert_eq!(m.samples_received, drained + m.samples_dropped);
    }

    /// Drop-oldest preserves order: draining the ring always yields a suffix
    /// of the pushed sequence (the oldest `dropped` entries removed, the rest
    /// untouched and in order).
    #[test]
    fn drop_oldest_preserves_order_of_survivors(
        markers in prop::collection::vec(any::<u8>(), 0..2000)
    ) {
        let mut ring = IngestRing::new();
        let mut clock = TestClock::new();
        ring.register(&mut clock, 0);

        for &m in &markers {
            ring.push(&mut clock, 0, &[m, m], 2);
        }

        let mut survivors = Vec::new();
        while let Some(slot) = ring.pop_oldest(&mut clock) {
            survivors.push(slot.payload()[0]);
        }

        let dropped = ring.metrics().samples_dropped as usize;
        prop_assert_eq!(&survivors[..], &markers[dropped..]);
    }

    /// Every packet the packetizer emits respects the wire-format bounds and
    /// round-trips through the reference decoder to the samples that went in.
    #[test]
    fn emitted_packets_round_trip_and_respect_bounds(
        samples in prop::collection::vec(
            (0u8..10, prop::collection::vec(any::<u8>(), 2..=6), 0u32..50),
            1..40,
        )
    ) {
        let mut ring = IngestRing::new();
        let mut clock = TestClock::new();
        let mut transport = AlwaysSendTransport::default();
        let mut pz = Packetizer::new(PacketizerConfig::new(10_000, 0));

        for id in 0..10 {
            ring.register(&mut clock, id);
        }

        let mut expected = Vec::new();
        for (sensor_id, payload, advance_by) in &samples {
            clock.wait_ms(*advance_by % 200);
            let size = payload.len() as u8;
            ring.push(&mut clock, *sensor_id, payload, size);
            expected.push((*sensor_id, clock.now_ms(), payload.clone()));
        }

        let mut seen = 0usize;
        loop {
            let sent_before = transport.sent.len();
            let status = pz.run_once(&mut ring, &mut clock, &mut transport);
            if status.is_none() {
                break;
            }
            let packet = transport.sent.last().unwrap();
            prop_assert!(packet.len() <= 200);
            let decoded = decode(packet).unwrap();
            prop_assert!(decoded.sample_count >= 1);

            let mut prev_ts: Option<u32> = None;
            for (i, decoded_sample) in decoded.samples().enumerate() {
                let decoded_sample = decoded_sample.unwrap();
                if i == 0 {
                    prop_assert_eq!(decoded_sample.timestamp_ms, decoded.base_timestamp);
                }
                if let Some(prev) = prev_ts {
                    prop_assert!(decoded_sample.timestamp_ms >= prev);
                }
                prev_ts = Some(decoded_sample.timestamp_ms);

                let (exp_id, exp_ts, exp_payload) = &expected[seen];
                prop_assert_eq!(decoded_sample.sensor_id, *exp_id);
                prop_assert_eq!(decoded_sample.timestamp_ms, *exp_ts);
                prop_assert_eq!(decoded_sample.payload, exp_payload.as_slice());
                seen += 1;
            }
            prop_assert!(transport.sent.len() > sent_before);
        }
    }

    /// seq_num advances by exactly one per successful send and wraps modulo
    /// 2^16; a scripted run of failures never advances it.
    #[test]
    fn seq_num_advances_only_on_success(successes in prop::collection::vec(any::<bool>(), 0..30)) {
        struct ScriptedTransport {
            script: Vec<bool>,
        }
        impl Transport for ScriptedTransport {
            fn send(&mut self, _packet: &[u8]) -> Status {
                if self.script.remove(0) {
                    Status::Success
                } else {
                    Status::Error
                }
            }
        }

        let mut ring = IngestRing::new();
        let mut clock = TestClock::new();
        ring.register(&mut clock, 0);
        let mut pz = Packetizer::new(PacketizerConfig::new(10_000, 0));

        let mut expected_seq: u16 = 0;
        for ok in successes {
            ring.push(&mut clock, 0, &[1, 2], 2);
            // MAX_RETRIES retries of the same outcome keep the scripted
            // sequence simple: every attempt in one run_once agrees.
            let mut transport = ScriptedTransport {
                script: vec![ok; 8],
            };
            pz.run_once(&mut ring, &mut clock, &mut transport);
            if ok {
                expected_seq = expected_seq.wrapping_add(1);
            }
            prop_assert_eq!(pz.next_seq_num(), expected_seq);
        }
    }
}
