//! A bounded-retry wrapper around one blocking [`Transport`] send.

use crate::config::{BACKOFF_MS, MAX_RETRIES};
use crate::platform::Platform;
use crate::transport::{Status, Transport};

/// Sends `packet` over `transport`, making up to [`MAX_RETRIES`] attempts in
/// total, with a fixed [`BACKOFF_MS`] delay between them.
///
/// A permanent failure (see [`Status::is_permanent_failure`]) short-circuits
/// immediately — the bytes that failed once for being malformed will fail the
/// same way on every retry. Returns the status of the last attempt made
/// together with the number of attempts it took.
pub fn send_with_retry<T, P>(transport: &mut T, platform: &mut P, packet: &[u8]) -> (Status, u32)
where
    T: Transport,
    P: Platform,
{
    let mut attempt = 1;
    loop {
        let status = transport.send(packet);
        if status == Status::Success || status.is_permanent_failure() || attempt >= MAX_RETRIES {
            return (status, attempt);
        }
        platform.wait_ms(BACKOFF_MS);
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::tests::FakePlatform;

    struct ScriptedTransport {
        responses: std::vec::Vec<Status>,
        calls: usize,
    }

    impl ScriptedTransport {
        fn new(responses: &[Status]) -> Self {
            Self {
                responses: responses.to_vec(),
                calls: 0,
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&mut self, _packet: &[u8]) -> Status {
            let status = self.responses[self.calls.min(self.responses.len() - 1)];
            self.calls += 1;
            status
        }
    }

    #[test]
    fn succeeds_immediately_without_retrying() {
        let mut t = ScriptedTransport::new(&[Status::Success]);
        let mut p = FakePlatform::new();
        let (status, attempts) = send_with_retry(&mut t, &mut p, &[1, 2, 3]);
        assert_eq!(status, Status::Success);
        assert_eq!(attempts, 1);
        assert_eq!(t.calls, 1);
    }

    #[test]
    fn retries_a_transient_failure_then_succeeds() {
        let mut t = ScriptedTransport::new(&[Status::Error, Status::Success]);
        let mut p = FakePlatform::new();
        let (status, attempts) = send_with_retry(&mut t, &mut p, &[1, 2, 3]);
        assert_eq!(status, Status::Success);
        assert_eq!(attempts, 2);
        assert_eq!(t.calls, 2);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let mut t = ScriptedTransport::new(&[Status::Error]);
        let mut p = FakePlatform::new();
        let (status, attempts) = send_with_retry(&mut t, &mut p, &[1, 2, 3]);
        assert_eq!(status, Status::Error);
        assert_eq!(attempts, MAX_RETRIES);
        assert_eq!(t.calls, MAX_RETRIES as usize);
    }

    #[test]
    fn permanent_failure_short_circuits_retries() {
        let mut t = ScriptedTransport::new(&[Status::InvalidPacketLength, Status::Success]);
        let mut p = FakePlatform::new();
        let (status, attempts) = send_with_retry(&mut t, &mut p, &[1, 2, 3]);
        assert_eq!(status, Status::InvalidPacketLength);
        assert_eq!(attempts, 1);
        assert_eq!(t.calls, 1);
    }
}
