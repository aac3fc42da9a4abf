//! Layout generator: preview-space positions and initial colors for every fixture.
//!
//! Everything here is a pure function of [`Geometry`]. Positions are LED cell origins (top-left
//! corners) in preview pixels; the rail layout reproduces the hull silhouette as LED spacing, with
//! a vertical run at the stern, a flat midsection and a stepped curve past the prow.

use crate::config::Geometry;
use crate::foundation::core::{Color, Point};

/// Rail baseline gray.
pub const RAIL_LEVEL: f64 = 128.0;
/// Idle scanner gray.
pub const SCANNER_LEVEL: f64 = 64.0;
/// Resting blue of the wave edges.
pub const WAVE_LEVEL: f64 = 192.0;
/// Base red of the nacelles; the spin pulse adds up to `255 - NACELLE_LEVEL`.
pub const NACELLE_LEVEL: f64 = 128.0;

/// Which side of the hull a fixture runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left side; drawn along the top of the preview.
    Port,
    /// Right side; drawn along the bottom of the preview.
    Starboard,
}

/// Cell origins for one fixture plus the color every cell starts with.
#[derive(Clone, Debug, PartialEq)]
pub struct FixtureLayout {
    pub origins: Vec<Point>,
    pub color: Color,
}

pub fn rail_idle() -> Color {
    Color::gray(RAIL_LEVEL)
}

pub fn scanner_idle() -> Color {
    Color::gray(SCANNER_LEVEL)
}

pub fn wave_rest() -> Color {
    Color::new(0.0, 0.0, WAVE_LEVEL)
}

/// Nacelle color for a red level: `(red, floor(red / 4), 0)`.
pub fn nacelle_color(red: f64) -> Color {
    Color::new(red, (red / 4.0).floor(), 0.0)
}

/// Horizontal position and distance from the rail baseline for hull index `ix`.
pub fn rail_offset(geom: &Geometry, ix: usize) -> (f64, f64) {
    let p = geom.pitch();
    if ix < geom.stern_len {
        (0.0, p * (geom.stern_len - ix) as f64)
    } else {
        let x = p * (ix - geom.stern_len) as f64;
        let dy = p * ix.saturating_sub(geom.prow()) as f64;
        (x, dy)
    }
}

fn rail_point(geom: &Geometry, ix: usize, side: Side) -> Point {
    let (x, dy) = rail_offset(geom, ix);
    match side {
        Side::Port => Point::new(x, dy),
        Side::Starboard => Point::new(x, geom.bottom() - dy),
    }
}

/// Rail cells from the stern up to where the scanner takes over.
pub fn rail(geom: &Geometry, side: Side) -> FixtureLayout {
    FixtureLayout {
        origins: (0..geom.rail_cells())
            .map(|ix| rail_point(geom, ix, side))
            .collect(),
        color: rail_idle(),
    }
}

/// Scanner cells: the port bow end running forward, then the starboard bow end running aft, so
/// the fixture wraps continuously around the nose.
pub fn scanner(geom: &Geometry) -> FixtureLayout {
    let start = geom.rail_cells();
    let port = (start..geom.rail_len).map(|ix| rail_point(geom, ix, Side::Port));
    let starboard = (start..geom.rail_len)
        .rev()
        .map(|ix| rail_point(geom, ix, Side::Starboard));
    FixtureLayout {
        origins: port.chain(starboard).collect(),
        color: scanner_idle(),
    }
}

/// One straight row of wave ("ground effect") cells.
pub fn waves(geom: &Geometry, side: Side) -> FixtureLayout {
    let p = geom.pitch();
    let top = p * geom.wave_row as f64;
    let y = match side {
        Side::Port => top,
        Side::Starboard => geom.bottom() - top,
    };
    let base_x = p * geom.wave_column as f64;
    FixtureLayout {
        origins: (0..geom.wave_len)
            .map(|ix| Point::new(base_x + p * ix as f64, y))
            .collect(),
        color: wave_rest(),
    }
}

/// Spinner cell `ix` on a closed rectangular ring: top edge left to right, right edge down,
/// bottom edge right to left, left edge up.
pub fn spinner_position(geom: &Geometry, ix: usize, side: Side) -> Point {
    let p = geom.pitch();
    let seg = (geom.spinner_len / 4).max(1);
    let base_x = geom.spinner_x;
    let base_y = match side {
        Side::Port => geom.spinner_top,
        Side::Starboard => geom.spinner_bottom,
    };
    let j = (ix % seg) as f64;
    let s = seg as f64;
    let (dx, dy) = match ix / seg {
        0 => (j, 0.0),
        1 => (s, j + 1.0),
        2 => (s - 1.0 - j, s + 1.0),
        _ => (-1.0, s - j),
    };
    Point::new(base_x + p * dx, base_y + p * dy)
}

/// Tail cell `ix` on a two-row grid beside the spinner.
pub fn tail_position(geom: &Geometry, ix: usize, side: Side) -> Point {
    let p = geom.pitch();
    let half = (geom.tail_len / 2).max(1);
    let x = geom.tail_x + p * (ix % half) as f64;
    let mut y = match side {
        Side::Port => geom.spinner_top,
        Side::Starboard => geom.spinner_bottom,
    } + p;
    if ix >= half {
        y += p * 3.0;
    }
    Point::new(x, y)
}

/// Nacelle assembly: spinner ring cells followed by tail cells.
pub fn nacelle(geom: &Geometry, side: Side) -> FixtureLayout {
    let spinner = (0..geom.spinner_len).map(|ix| spinner_position(geom, ix, side));
    let tail = (0..geom.tail_len).map(|ix| tail_position(geom, ix, side));
    FixtureLayout {
        origins: spinner.chain(tail).collect(),
        color: nacelle_color(NACELLE_LEVEL),
    }
}
