//! The thin wrapper an interrupt handler calls for each incoming sample.

use crate::platform::Platform;
use crate::ring::IngestRing;

/// Forwards one ISR-delivered sample straight into `ring`. Performs no
/// filtering of its own — every validation (size, sensor ID, registration) is
/// the ring's job, so the interrupt handler stays as short as possible.
///
/// Must only be called from the interrupt context the producing hardware
/// actually fires on; never from the cooperative main loop.
pub fn on_sample<P: Platform>(ring: &mut IngestRing, platform: &mut P, sensor_id: u8, data: &[u8], size: u8) {
    ring.push(platform, sensor_id, data, size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::tests::FakePlatform;

    #[test]
    fn forwards_into_the_ring_unfiltered() {
        let mut ring = IngestRing::new();
        let mut platform = FakePlatform::new();
        ring.register(&mut platform, 2);

        on_sample(&mut ring, &mut platform, 2, &[9, 9], 2);

        assert_eq!(ring.occupancy(), 1);
    }
}
