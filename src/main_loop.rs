//! The cooperative driver a firmware `main` can call directly, or imitate by
//! hand when it needs to interleave other duties inside an RTOS task.

use crate::config::MIN_TX_INTERVAL_MS;
use crate::packetizer::Packetizer;
use crate::platform::Platform;
use crate::ring::IngestRing;
use crate::transport::Transport;

/// Runs the pipeline forever: try to send one packet, then sleep — a short
/// poll delay if there is still work pending, the protocol's minimum transmit
/// interval otherwise. Never returns.
pub fn run_forever<P, T>(ring: &mut IngestRing, packetizer: &mut Packetizer, platform: &mut P, transport: &mut T) -> !
where
    P: Platform,
    T: Transport,
{
    loop {
        packetizer.run_once(ring, platform, transport);
        if ring.occupancy() == 0 {
            platform.wait_ms(MIN_TX_INTERVAL_MS);
        } else {
            platform.wait_ms(1);
        }
    }
}
