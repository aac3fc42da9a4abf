//! Strand compositor: fixture colors to fixed-size hardware strand buffers.

pub mod strands;

pub use strands::{FRAME_PIXELS, STRAND_COUNT, STRAND_LEN, StrandFrame, compose};
