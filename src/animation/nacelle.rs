use std::f64::consts::PI;

use crate::animation::state::AnimationState;
use crate::config::Geometry;
use crate::fixture::Fixtures;
use crate::layout::{NACELLE_LEVEL, nacelle_color};

/// Pulse brightness per whole degree of rotation, precomputed once.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinTable {
    levels: Vec<f64>,
}

impl SpinTable {
    /// Sinusoidal table over `0..360`, spanning `0..=255 - NACELLE_LEVEL`.
    ///
    /// `freq` is the user-facing nacelle frequency; the table runs at `freq / PI`.
    pub fn new(freq: f64) -> Self {
        let f = freq / PI;
        let span = 255.0 - NACELLE_LEVEL;
        Self {
            levels: (0..360)
                .map(|deg| ((deg as f64 * f / (2.0 * PI)).sin() + 1.0) * 0.5 * span)
                .collect(),
        }
    }

    /// Level for an angle in degrees, truncated to a whole degree.
    pub fn level(&self, angle: f64) -> f64 {
        let ix = (angle.rem_euclid(360.0) as usize).min(self.levels.len() - 1);
        self.levels[ix]
    }
}

/// Paint both nacelles from the current spinner angles; the first tail cells copy their
/// spinner cell so the exhaust looks connected.
pub fn paint(fixtures: &mut Fixtures, state: &AnimationState, table: &SpinTable, geom: &Geometry) {
    for (ix, &angle) in state.nacelle_angles.iter().enumerate() {
        let color = nacelle_color(NACELLE_LEVEL + table.level(angle));
        for nacelle in [&mut fixtures.nacelle_left, &mut fixtures.nacelle_right] {
            nacelle.set(ix, color);
            if ix < geom.tail_len {
                nacelle.set(geom.spinner_len + ix, color);
            }
        }
    }
}
