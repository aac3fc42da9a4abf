//! Boatlights drives the LED fixtures of a boat-shaped art installation.
//!
//! Every tick the active animation mode repaints the fixtures, the compositor maps them onto the
//! controller's eight strands, and the result is streamed over Open Pixel Control:
//!
//! - Build an [`InstallationConfig`] and an [`Installation`]
//! - Wrap it in a [`LightSession`] with a [`PixelSink`]
//! - Tick it directly or let [`LightSession::run`] pace the ticks
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod compose;
pub mod config;
pub mod fixture;
pub mod installation;
pub mod layout;
pub mod preview;
pub mod session;
pub mod stream;

pub use crate::foundation::core::{Color, Point, Rect, Rgb8, Size, TickRate};
pub use crate::foundation::error::{BoatError, BoatResult};

pub use crate::animation::{AnimationState, Animator, Mode};
pub use crate::compose::{FRAME_PIXELS, STRAND_COUNT, STRAND_LEN, StrandFrame, compose};
pub use crate::config::{AnimationConfig, Geometry, InstallationConfig, ModeRates, StreamConfig};
pub use crate::fixture::{Fixture, Fixtures, LedCell};
pub use crate::installation::{BrightnessStep, Installation};
pub use crate::session::{Command, LightSession, RunStats, StopReason, TickReport};
pub use crate::stream::{InMemorySink, NullSink, OpcClient, PixelSink, Transmitter};
