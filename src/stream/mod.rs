//! Pixel streaming: the Open Pixel Control codec, sinks that accept flattened strand frames,
//! and the delivery policy shared by every sink.

pub mod client;
pub mod opc;
pub mod sink;
pub mod transmit;

pub use client::OpcClient;
pub use sink::{InMemorySink, NullSink, PixelSink};
pub use transmit::Transmitter;
