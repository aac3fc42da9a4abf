use crate::foundation::core::Rgb8;
use crate::foundation::error::BoatResult;

/// Destination for flattened strand frames.
///
/// Frames are fire-and-forget: a sink never waits for an acknowledgement. Errors are reported to
/// the caller, which treats them as "no endpoint for this frame" and carries on.
pub trait PixelSink: Send {
    /// Transmit one frame of pixels in strand order.
    fn put_pixels(&mut self, pixels: &[Rgb8]) -> BoatResult<()>;
}

/// Sink that drops every frame; used when no controller is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PixelSink for NullSink {
    fn put_pixels(&mut self, _pixels: &[Rgb8]) -> BoatResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<Vec<Rgb8>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in the order they were sent.
    pub fn frames(&self) -> &[Vec<Rgb8>] {
        &self.frames
    }

    pub fn last(&self) -> Option<&[Rgb8]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl PixelSink for InMemorySink {
    fn put_pixels(&mut self, pixels: &[Rgb8]) -> BoatResult<()> {
        self.frames.push(pixels.to_vec());
        Ok(())
    }
}

impl<S: PixelSink + ?Sized> PixelSink for Box<S> {
    fn put_pixels(&mut self, pixels: &[Rgb8]) -> BoatResult<()> {
        (**self).put_pixels(pixels)
    }
}

impl<S: PixelSink + ?Sized> PixelSink for &mut S {
    fn put_pixels(&mut self, pixels: &[Rgb8]) -> BoatResult<()> {
        (**self).put_pixels(pixels)
    }
}
