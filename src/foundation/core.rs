use std::time::Duration;

use crate::foundation::error::{BoatError, BoatResult};

pub use kurbo::{Point, Rect, Size};

/// Working color of an LED cell.
///
/// Channels are nominally `0..=255` but are not clamped on assignment: animation math may push
/// them out of range for a tick. Consumers clamp through [`Color::to_rgb8`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Color {
    /// All channels off.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// All channels at full scale.
    pub const WHITE: Self = Self::new(255.0, 255.0, 255.0);

    /// Build a color from raw channel values.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Equal value on all three channels.
    pub const fn gray(level: f64) -> Self {
        Self::new(level, level, level)
    }

    /// Clamp to `0..=255`, scale by `brightness`, and truncate to 8 bits per channel.
    pub fn to_rgb8(self, brightness: f64) -> Rgb8 {
        fn channel(v: f64, scale: f64) -> u8 {
            if !v.is_finite() {
                return 0;
            }
            (v.clamp(0.0, 255.0) * scale).clamp(0.0, 255.0) as u8
        }

        let scale = brightness.clamp(0.0, 1.0);
        Rgb8 {
            r: channel(self.r, scale),
            g: channel(self.g, scale),
            b: channel(self.b, scale),
        }
    }

    /// Move every channel toward `target` by at most `step`, landing exactly on it when close.
    pub fn step_toward(self, target: Self, step: f64) -> Self {
        fn approach(from: f64, to: f64, step: f64) -> f64 {
            let delta = to - from;
            if delta.abs() <= step {
                to
            } else {
                from + step.copysign(delta)
            }
        }

        Self {
            r: approach(self.r, target.r, step),
            g: approach(self.g, target.g, step),
            b: approach(self.b, target.b, step),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Transmit-ready 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// All channels off.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    /// All channels at full scale.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Channel bytes in wire order.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Animation frame rate in ticks per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TickRate(pub u32);

impl TickRate {
    /// Highest accepted rate; keeps the tick period at one millisecond or more.
    pub const MAX: u32 = 1000;

    /// Create a validated rate in `1..=MAX`.
    pub fn new(per_second: u32) -> BoatResult<Self> {
        let rate = Self(per_second);
        rate.validate()?;
        Ok(rate)
    }

    /// Check the rate lies in `1..=MAX`.
    pub fn validate(self) -> BoatResult<()> {
        if self.0 == 0 || self.0 > Self::MAX {
            return Err(BoatError::config(format!(
                "tick rate must be in 1..={}, got {}",
                Self::MAX,
                self.0
            )));
        }
        Ok(())
    }

    /// Tick period, truncated to whole milliseconds.
    pub fn period(self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.0.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_rgb8_clamps_out_of_range_channels() {
        let c = Color::new(-12.0, 300.0, 127.9);
        assert_eq!(c.to_rgb8(1.0), Rgb8 { r: 0, g: 255, b: 127 });
    }

    #[test]
    fn to_rgb8_scales_by_brightness() {
        assert_eq!(Color::WHITE.to_rgb8(0.5), Rgb8 { r: 127, g: 127, b: 127 });
        assert_eq!(Color::WHITE.to_rgb8(2.0), Rgb8::WHITE);
    }

    #[test]
    fn to_rgb8_maps_nan_to_zero() {
        let c = Color::new(f64::NAN, 10.0, f64::INFINITY);
        assert_eq!(c.to_rgb8(1.0), Rgb8 { r: 0, g: 10, b: 0 });
    }

    #[test]
    fn step_toward_is_bounded_and_lands_exactly() {
        let from = Color::new(0.0, 200.0, 253.5);
        let to = Color::new(255.0, 0.0, 255.0);
        let next = from.step_toward(to, 5.0);
        assert_eq!(next, Color::new(5.0, 195.0, 255.0));
    }

    #[test]
    fn tick_period_truncates_to_millis() {
        assert_eq!(TickRate(20).period(), Duration::from_millis(50));
        assert_eq!(TickRate(60).period(), Duration::from_millis(16));
        assert_eq!(TickRate(1).period(), Duration::from_millis(1000));
        assert_eq!(TickRate(200).period(), Duration::from_millis(5));
    }

    #[test]
    fn tick_rate_rejects_zero_and_excess() {
        assert!(TickRate::new(0).is_err());
        assert!(TickRate::new(1001).is_err());
        assert!(TickRate::new(200).is_ok());
    }
}
