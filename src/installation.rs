//! The installation: every fixture, the animation state machine driving them, and the global
//! brightness used by the preview.

use std::time::Duration;

use crate::animation::{Animator, Mode};
use crate::compose::{StrandFrame, compose};
use crate::config::{Geometry, InstallationConfig};
use crate::fixture::Fixtures;
use crate::foundation::core::{Point, TickRate};
use crate::foundation::error::BoatResult;

pub const MIN_BRIGHTNESS: f64 = 0.1;
pub const MAX_BRIGHTNESS: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrightnessStep {
    Up,
    Down,
}

pub struct Installation {
    config: InstallationConfig,
    fixtures: Fixtures,
    animator: Animator,
    brightness: f64,
}

impl Installation {
    /// Validate `config` and lay out every fixture in its initial colors.
    pub fn new(config: InstallationConfig) -> BoatResult<Self> {
        config.validate()?;
        let fixtures = Fixtures::generate(&config.geometry);
        let animator = Animator::new(&config.animation, &config.geometry);
        tracing::debug!(
            cells = fixtures.cell_count(),
            mode = %animator.mode(),
            "installation laid out"
        );
        Ok(Self {
            config,
            fixtures,
            animator,
            brightness: MAX_BRIGHTNESS,
        })
    }

    pub fn config(&self) -> &InstallationConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.config.geometry
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn mode(&self) -> Mode {
        self.animator.mode()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.animator.set_mode(mode);
    }

    /// Switch by name; unknown names select the configured default.
    pub fn request_mode(&mut self, name: &str) -> Mode {
        self.animator.request_mode(name)
    }

    /// Tick rate of the active mode.
    pub fn tick_rate(&self) -> TickRate {
        self.config.rate(self.mode())
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Move brightness one configured step, clamped to `[0.1, 1.0]`.
    pub fn adjust_brightness(&mut self, step: BrightnessStep) -> f64 {
        let delta = match step {
            BrightnessStep::Up => self.config.animation.brightness_step,
            BrightnessStep::Down => -self.config.animation.brightness_step,
        };
        self.set_brightness(self.brightness + delta)
    }

    /// Set brightness directly, clamped to `[0.1, 1.0]`.
    pub fn set_brightness(&mut self, value: f64) -> f64 {
        // Quantize so repeated steps land exactly on the bounds.
        let next = (value * 1e6).round() / 1e6;
        let next = if next.is_nan() {
            MAX_BRIGHTNESS
        } else {
            next.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS)
        };
        if next != self.brightness {
            tracing::info!(brightness = next, "brightness changed");
        }
        self.brightness = next;
        next
    }

    /// Flip the first cell under `pt` between black and white. Misses are ignored.
    pub fn toggle(&mut self, pt: Point) -> bool {
        match self.fixtures.toggle_at(pt) {
            Some((fixture, ix, color)) => {
                tracing::info!(fixture, ix, r = color.r, g = color.g, b = color.b, "toggled cell");
                true
            }
            None => false,
        }
    }

    /// Run the active mode once.
    pub fn update(&mut self, elapsed: Duration) {
        self.animator
            .update(&mut self.fixtures, &self.config.geometry, elapsed);
    }

    /// Current strand buffers straight from the fixture colors.
    pub fn frame(&self) -> StrandFrame {
        compose(&self.fixtures, &self.config.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Color;

    fn installation() -> Installation {
        let mut cfg = InstallationConfig::default();
        cfg.animation.seed = Some(11);
        Installation::new(cfg).unwrap()
    }

    #[test]
    fn brightness_clamps_at_both_ends() {
        let mut inst = installation();
        for _ in 0..5 {
            assert_eq!(inst.adjust_brightness(BrightnessStep::Up), 1.0);
        }
        for _ in 0..20 {
            inst.adjust_brightness(BrightnessStep::Down);
        }
        assert_eq!(inst.brightness(), 0.1);
        assert_eq!(inst.adjust_brightness(BrightnessStep::Up), 0.2);
    }

    #[test]
    fn nine_steps_down_reach_the_floor_exactly() {
        let mut inst = installation();
        for _ in 0..9 {
            inst.adjust_brightness(BrightnessStep::Down);
        }
        assert_eq!(inst.brightness(), 0.1);
    }

    #[test]
    fn brightness_leaves_the_streamed_frame_alone() {
        let mut cfg = InstallationConfig::default();
        cfg.animation.default_mode = Mode::Bright;
        let mut inst = Installation::new(cfg).unwrap();
        inst.update(Duration::from_millis(100));
        inst.set_brightness(0.1);
        assert_eq!(inst.fixtures().rail_right.color(0), Some(Color::WHITE));
        assert_eq!(inst.frame().strand(0).unwrap()[0], crate::Rgb8::WHITE);
    }

    #[test]
    fn set_brightness_clamps() {
        let mut inst = installation();
        assert_eq!(inst.set_brightness(0.0), 0.1);
        assert_eq!(inst.set_brightness(0.45), 0.45);
        assert_eq!(inst.set_brightness(3.0), 1.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        for size in [0.0, f64::INFINITY, f64::NAN] {
            let mut cfg = InstallationConfig::default();
            cfg.geometry.led_size = size;
            assert!(Installation::new(cfg).is_err(), "led_size {size}");
        }
    }

    #[test]
    fn toggle_hits_and_misses() {
        let mut inst = installation();
        let cell = inst.fixtures().wave_left.cells()[0].bounds;
        let inside = Point::new(cell.x0 + 1.0, cell.y0 + 1.0);
        assert!(inst.toggle(inside));
        assert_eq!(inst.fixtures().wave_left.color(0), Some(Color::BLACK));
        assert!(inst.toggle(inside));
        assert_eq!(inst.fixtures().wave_left.color(0), Some(Color::WHITE));
        assert!(!inst.toggle(Point::new(-50.0, -50.0)));
    }

    #[test]
    fn tick_rate_follows_the_mode() {
        let mut inst = installation();
        assert_eq!(inst.tick_rate(), TickRate(20));
        inst.set_mode(Mode::Panic);
        assert_eq!(inst.tick_rate().period(), Duration::from_millis(5));
    }
}
