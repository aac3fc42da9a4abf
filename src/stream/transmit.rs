use std::time::Duration;

use crate::compose::FRAME_PIXELS;
use crate::foundation::core::Rgb8;
use crate::stream::sink::PixelSink;

/// Wraps a [`PixelSink`] with the per-frame delivery policy: optional retransmission, and
/// failures downgraded to log lines so the tick loop never sees them.
#[derive(Debug)]
pub struct Transmitter<S> {
    sink: S,
    send_twice: bool,
    down: bool,
}

impl<S: PixelSink> Transmitter<S> {
    pub fn new(sink: S, send_twice: bool) -> Self {
        Self {
            sink,
            send_twice,
            down: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Send one frame. Returns whether it reached the sink.
    pub fn send(&mut self, pixels: &[Rgb8]) -> bool {
        let mut res = self.sink.put_pixels(pixels);
        if res.is_ok() && self.send_twice {
            res = self.sink.put_pixels(pixels);
        }
        match res {
            Ok(()) => {
                if self.down {
                    tracing::info!("pixel sink accepting frames again");
                }
                self.down = false;
                true
            }
            Err(err) => {
                if self.down {
                    tracing::debug!(error = %err, "frame dropped");
                } else {
                    tracing::warn!(error = %err, "frame dropped, continuing without a controller");
                }
                self.down = true;
                false
            }
        }
    }

    /// Leave the fixtures dark: hold `last`, then black, then black twice more.
    pub fn fade_out(&mut self, last: &[Rgb8], hold: Duration) {
        let black = [Rgb8::BLACK; FRAME_PIXELS];
        self.send(last);
        std::thread::sleep(hold);
        self.send(&black);
        std::thread::sleep(hold);
        self.send(&black);
        self.send(&black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::{BoatError, BoatResult};
    use crate::stream::sink::InMemorySink;

    struct Failing(usize);

    impl PixelSink for Failing {
        fn put_pixels(&mut self, _pixels: &[Rgb8]) -> BoatResult<()> {
            self.0 += 1;
            Err(BoatError::transport("offline"))
        }
    }

    #[test]
    fn send_twice_repeats_the_frame() {
        let mut tx = Transmitter::new(InMemorySink::new(), true);
        assert!(tx.send(&[Rgb8::WHITE; 3]));
        assert_eq!(tx.sink().frames().len(), 2);
        assert_eq!(tx.sink().frames()[0], tx.sink().frames()[1]);
    }

    #[test]
    fn failures_are_reported_not_raised() {
        let mut tx = Transmitter::new(Failing(0), true);
        assert!(!tx.send(&[Rgb8::WHITE]));
        assert!(!tx.send(&[Rgb8::WHITE]));
        // No retransmission after a failed first send.
        assert_eq!(tx.sink().0, 2);
    }

    #[test]
    fn fade_ends_on_black() {
        let mut tx = Transmitter::new(InMemorySink::new(), false);
        let last = vec![Rgb8::WHITE; FRAME_PIXELS];
        tx.fade_out(&last, Duration::ZERO);
        let frames = tx.into_sink().frames().to_vec();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], last);
        for f in &frames[1..] {
            assert!(f.iter().all(|p| *p == Rgb8::BLACK));
            assert_eq!(f.len(), FRAME_PIXELS);
        }
    }
}
