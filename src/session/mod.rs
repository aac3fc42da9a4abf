//! Tick driver and the commands it accepts between ticks.

pub mod command;
pub mod light_session;

pub use command::Command;
pub use light_session::{LightSession, RunStats, StopReason, TickReport};
