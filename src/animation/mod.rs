//! Animation state machine: one active [`Mode`], an explicit [`AnimationState`] record, and an
//! exhaustive dispatch to the per-mode routines.

pub mod mode;
pub mod modes;
pub mod nacelle;
pub mod state;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{AnimationConfig, Geometry};
use crate::fixture::Fixtures;
use crate::foundation::core::Color;

pub use mode::Mode;
pub use nacelle::SpinTable;
pub use state::{AnimationState, Scanner};

use modes::ModeCtx;

pub struct Animator {
    mode: Mode,
    default_mode: Mode,
    state: AnimationState,
    spin: SpinTable,
    rotations_per_second: f64,
    speckle_probability: f64,
    rng: StdRng,
}

impl Animator {
    pub fn new(cfg: &AnimationConfig, geom: &Geometry) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode: cfg.default_mode,
            default_mode: cfg.default_mode,
            state: AnimationState::new(geom),
            spin: SpinTable::new(cfg.nacelle_freq),
            rotations_per_second: cfg.rotations_per_second,
            speckle_probability: cfg.speckle_probability,
            rng,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Switch modes. Only the disco countdown is reset, so `slow` fires on its next tick.
    /// Requesting the active mode again changes nothing.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        tracing::info!(from = %self.mode, to = %mode, "setting mode");
        self.mode = mode;
        self.state.disco_countdown = 0;
    }

    /// Switch by identifier; unknown identifiers select the default mode.
    pub fn request_mode(&mut self, name: &str) -> Mode {
        let mode = Mode::resolve(name, self.default_mode);
        self.set_mode(mode);
        mode
    }

    /// Run one tick of the active mode against `fixtures`.
    pub fn update(&mut self, fixtures: &mut Fixtures, geom: &Geometry, elapsed: Duration) {
        self.state
            .spin(elapsed.as_secs_f64() * self.rotations_per_second * 360.0);

        let mut ctx = ModeCtx {
            geom,
            spin: &self.spin,
            speckle_probability: self.speckle_probability,
            rng: &mut self.rng,
        };
        let st = &mut self.state;

        match self.mode {
            Mode::Boat | Mode::FastBoat | Mode::SpeedBoat => {
                modes::boat(fixtures, st, &mut ctx, false);
            }
            Mode::Space => modes::boat(fixtures, st, &mut ctx, true),
            Mode::America => modes::america(fixtures, st, &mut ctx),
            Mode::Slow => modes::slow(fixtures, st, ctx.rng),
            Mode::Disco | Mode::Panic => modes::disco(fixtures, ctx.rng, 0, 255),
            Mode::Bright => fixtures.fill(Color::WHITE),
            Mode::Off => fixtures.fill(Color::BLACK),
            Mode::Debug => {}
        }
    }
}
