use std::ops::Range;

use crate::config::Geometry;
use crate::foundation::core::Color;

/// Cells lit at full strength around the scanner position.
pub const SCANNER_WIDTH: usize = 3;

/// Red, white and blue in parade order.
pub const FLAG_COLORS: [Color; 3] = [
    Color::new(255.0, 0.0, 0.0),
    Color::WHITE,
    Color::new(0.0, 0.0, 255.0),
];

/// Bidirectional ("Larson") scanner position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scanner {
    pub pos: i64,
    /// `+1` toward the end of the fixture, `-1` back toward its start.
    pub dir: i64,
}

impl Default for Scanner {
    fn default() -> Self {
        Self { pos: 0, dir: 1 }
    }
}

impl Scanner {
    /// Step once inside `[1, travel]`, bouncing off either bound within the same step.
    ///
    /// Returns `true` when the direction flipped.
    pub fn step(&mut self, travel: usize) -> bool {
        let travel = travel as i64;
        self.pos += self.dir;
        if self.pos < 1 || self.pos > travel {
            self.dir = -self.dir;
            self.pos += self.dir;
            return true;
        }
        false
    }

    /// Indices of the fully lit cells.
    pub fn lit(&self) -> Range<usize> {
        let start = self.pos.max(0) as usize;
        start..start + SCANNER_WIDTH
    }

    /// Index of the half-bright cell on the side the band is moving away from.
    pub fn trail(&self) -> usize {
        if self.dir > 0 {
            (self.pos - 1).max(0) as usize
        } else {
            self.pos.max(0) as usize + SCANNER_WIDTH
        }
    }
}

/// Mode-local transient state, owned by the animation state machine.
///
/// Only `disco_countdown` is reset by a mode switch; everything else carries over so that
/// re-entering a mode resumes where it left off.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub scanner: Scanner,
    /// Phase accumulator for the wave swell.
    pub wave_phase: f64,
    /// Rotation angle per spinner cell, degrees in `[0, 360)`.
    pub nacelle_angles: Vec<f64>,
    /// Ticks left before `slow` fires again; `0` fires on the next tick.
    pub disco_countdown: u32,
    /// Parade color cycle; index 0 is the current wave target.
    pub flag_cycle: [Color; 3],
}

impl AnimationState {
    pub fn new(geom: &Geometry) -> Self {
        let n = geom.spinner_len;
        Self {
            scanner: Scanner::default(),
            wave_phase: 0.0,
            nacelle_angles: (0..n).map(|i| i as f64 * 360.0 / n as f64).collect(),
            disco_countdown: 0,
            flag_cycle: FLAG_COLORS,
        }
    }

    /// Advance every spinner angle by `degrees`, wrapping into `[0, 360)`.
    pub fn spin(&mut self, degrees: f64) {
        for a in &mut self.nacelle_angles {
            *a = (*a + degrees).rem_euclid(360.0);
        }
    }
}
