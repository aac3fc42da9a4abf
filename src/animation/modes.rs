//! Per-mode update routines.
//!
//! Each routine takes the fixtures and the animation state explicitly; nothing here keeps state
//! of its own.

use rand::Rng;
use rand::rngs::StdRng;

use crate::animation::nacelle::{self, SpinTable};
use crate::animation::state::AnimationState;
use crate::config::Geometry;
use crate::fixture::{Fixture, Fixtures};
use crate::foundation::core::Color;
use crate::layout::{RAIL_LEVEL, WAVE_LEVEL, scanner_idle};

const WAVE_PHASE_STEP: f64 = 0.31;
const SWELL_AMPLITUDE: f64 = 64.0;
const CHOP_AMPLITUDE: f64 = 24.0;

const RAIL_DECAY: f64 = 20.0;
const SPECKLE_NEIGHBOUR: f64 = 200.0;

const BOAT_SCANNER: Color = Color::new(255.0, 0.0, 0.0);
const BOAT_SCANNER_TRAIL: Color = Color::new(192.0, 0.0, 0.0);
const PARADE_SCANNER_TRAIL: Color = Color::gray(192.0);

const PORT_LIGHT: Color = Color::new(255.0, 0.0, 0.0);
const STARBOARD_LIGHT: Color = Color::new(0.0, 255.0, 0.0);
const LIGHT_BAND: usize = 3;

const FLAG_STEP: f64 = 5.0;
const PARADE_STRIPE: usize = 6;

/// Ticks `slow` holds a random frame before firing again.
pub const SLOW_HOLD_TICKS: u32 = 4;

/// Shared inputs for the routines that need more than fixtures and state.
pub struct ModeCtx<'a> {
    pub geom: &'a Geometry,
    pub spin: &'a SpinTable,
    pub speckle_probability: f64,
    pub rng: &'a mut StdRng,
}

/// Base ship routine shared by `boat`, `fast_boat`, `speed_boat` and (with `in_space`) `space`.
pub fn boat(fx: &mut Fixtures, st: &mut AnimationState, ctx: &mut ModeCtx<'_>, in_space: bool) {
    waves(fx, st);
    speckles(&mut fx.rail_left, ctx);
    speckles(&mut fx.rail_right, ctx);

    if in_space {
        fx.scanner.fill(Color::WHITE);
    } else {
        st.scanner.step(ctx.geom.scanner_travel());
        draw_scanner(&mut fx.scanner, st, BOAT_SCANNER, BOAT_SCANNER_TRAIL);
    }

    collision_lights(&mut fx.rail_left, ctx.geom, PORT_LIGHT);
    collision_lights(&mut fx.rail_right, ctx.geom, STARBOARD_LIGHT);

    nacelle::paint(fx, st, ctx.spin, ctx.geom);
}

/// Rolling swell plus quarter-index chop in blue; crests over full scale turn white.
fn waves(fx: &mut Fixtures, st: &mut AnimationState) {
    st.wave_phase += WAVE_PHASE_STEP;
    let t = st.wave_phase;
    for ix in 0..fx.wave_left.len() {
        let level = WAVE_LEVEL
            + (t + ix as f64).sin() * SWELL_AMPLITUDE
            + (t + (ix >> 2) as f64).sin() * CHOP_AMPLITUDE;
        let color = if level <= 255.0 {
            Color::new(0.0, 0.0, level)
        } else {
            Color::WHITE
        };
        fx.wave_left.set(ix, color);
        fx.wave_right.set(ix, color);
    }
}

/// Fade speckles back to the rail gray, then maybe drop a new one.
fn speckles(rail: &mut Fixture, ctx: &mut ModeCtx<'_>) {
    for cell in rail.cells_mut() {
        if cell.color.r != RAIL_LEVEL {
            let level = (cell.color.r - RAIL_DECAY).max(RAIL_LEVEL);
            cell.color = Color::gray(level);
        }
    }

    if rail.len() >= 3 && ctx.rng.gen_bool(ctx.speckle_probability) {
        let dot = ctx.rng.gen_range(1..rail.len() - 1);
        rail.set(dot, Color::WHITE);
        rail.set(dot - 1, Color::gray(SPECKLE_NEIGHBOUR));
        rail.set(dot + 1, Color::gray(SPECKLE_NEIGHBOUR));
    }
}

fn draw_scanner(scanner: &mut Fixture, st: &AnimationState, lit: Color, trail: Color) {
    scanner.fill(scanner_idle());
    for ix in st.scanner.lit() {
        scanner.set(ix, lit);
    }
    scanner.set(st.scanner.trail(), trail);
}

/// Running lights at the stern corner and at the prow, overwriting whatever is there.
fn collision_lights(rail: &mut Fixture, geom: &Geometry, color: Color) {
    let stern = geom.stern_len..geom.stern_len + LIGHT_BAND;
    let prow = geom.prow() - 2..geom.prow() + 1;
    for ix in stern.chain(prow) {
        rail.set(ix, color);
    }
}

/// Parade routine: waves crossfade through red, white and blue while a white comet runs down
/// the rails behind the scanner.
pub fn america(fx: &mut Fixtures, st: &mut AnimationState, ctx: &mut ModeCtx<'_>) {
    let target = st.flag_cycle[0];
    let mut changed = false;
    for edge in [&mut fx.wave_left, &mut fx.wave_right] {
        for cell in edge.cells_mut() {
            if cell.color != target {
                changed = true;
                cell.color = cell.color.step_toward(target, FLAG_STEP);
            }
        }
    }
    if !changed {
        st.flag_cycle.rotate_left(1);
    }

    let last = ctx.geom.rail_cells() - 1;
    let low_end = st.scanner.pos + st.scanner.dir < 1;
    if st.scanner.step(ctx.geom.scanner_travel()) {
        let rail = if low_end {
            &mut fx.rail_left
        } else {
            &mut fx.rail_right
        };
        for ix in last + 1 - PARADE_STRIPE..=last {
            rail.set(ix, Color::WHITE);
        }
    } else {
        fx.rail_left.set(last, Color::new(255.0, 0.0, 0.0));
        fx.rail_right.set(last, Color::new(0.0, 0.0, 255.0));
    }
    draw_scanner(&mut fx.scanner, st, Color::WHITE, PARADE_SCANNER_TRAIL);

    pull_stripes(&mut fx.rail_left);
    pull_stripes(&mut fx.rail_right);

    nacelle::paint(fx, st, ctx.spin, ctx.geom);
}

/// Shift every rail color one index toward the stern.
fn pull_stripes(rail: &mut Fixture) {
    let cells = rail.cells_mut();
    for ix in 0..cells.len().saturating_sub(1) {
        cells[ix].color = cells[ix + 1].color;
    }
}

/// One random frame, then hold for [`SLOW_HOLD_TICKS`] ticks.
pub fn slow(fx: &mut Fixtures, st: &mut AnimationState, rng: &mut StdRng) {
    if st.disco_countdown == 0 {
        disco(fx, rng, 0, 255);
        st.disco_countdown = SLOW_HOLD_TICKS;
    } else {
        st.disco_countdown -= 1;
    }
}

/// Every LED an independent uniform random color with channels in `low..=high`.
pub fn disco(fx: &mut Fixtures, rng: &mut StdRng, low: u8, high: u8) {
    let (low, high) = (low.min(high), low.max(high));
    for fixture in fx.iter_mut() {
        for cell in fixture.cells_mut() {
            cell.color = Color::new(
                f64::from(rng.gen_range(low..=high)),
                f64::from(rng.gen_range(low..=high)),
                f64::from(rng.gen_range(low..=high)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::animation::state::FLAG_COLORS;

    struct Rig {
        geom: Geometry,
        fx: Fixtures,
        st: AnimationState,
        spin: SpinTable,
        rng: StdRng,
    }

    impl Rig {
        fn new() -> Self {
            let geom = Geometry::default();
            Self {
                fx: Fixtures::generate(&geom),
                st: AnimationState::new(&geom),
                spin: SpinTable::new(1.0),
                rng: StdRng::seed_from_u64(7),
                geom,
            }
        }

        fn boat(&mut self, in_space: bool, speckles: f64) {
            let mut ctx = ModeCtx {
                geom: &self.geom,
                spin: &self.spin,
                speckle_probability: speckles,
                rng: &mut self.rng,
            };
            boat(&mut self.fx, &mut self.st, &mut ctx, in_space);
        }

        fn america(&mut self) {
            let mut ctx = ModeCtx {
                geom: &self.geom,
                spin: &self.spin,
                speckle_probability: 0.0,
                rng: &mut self.rng,
            };
            america(&mut self.fx, &mut self.st, &mut ctx);
        }
    }

    fn lit_indices(f: &Fixture, color: Color) -> Vec<usize> {
        f.colors()
            .enumerate()
            .filter(|(_, c)| *c == color)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn boat_scanner_lights_three_cells_and_a_trail() {
        let mut rig = Rig::new();
        rig.boat(false, 0.0);
        assert_eq!(lit_indices(&rig.fx.scanner, BOAT_SCANNER), vec![1, 2, 3]);
        assert_eq!(lit_indices(&rig.fx.scanner, BOAT_SCANNER_TRAIL), vec![0]);
        assert_eq!(lit_indices(&rig.fx.scanner, scanner_idle()).len(), 36);
    }

    #[test]
    fn space_holds_the_scanner_white() {
        let mut rig = Rig::new();
        rig.boat(true, 0.0);
        assert!(rig.fx.scanner.colors().all(|c| c == Color::WHITE));
        assert_eq!(rig.st.scanner.pos, 0);
    }

    #[test]
    fn waves_stay_blue_below_full_scale() {
        let mut rig = Rig::new();
        for _ in 0..50 {
            rig.boat(false, 0.0);
            for c in rig.fx.wave_left.colors() {
                assert!(c == Color::WHITE || (c.r == 0.0 && c.g == 0.0 && c.b <= 255.0));
            }
            assert!(rig.fx.wave_left.colors().eq(rig.fx.wave_right.colors()));
        }
        assert!((rig.st.wave_phase - 50.0 * 0.31).abs() < 1e-9);
    }

    #[test]
    fn collision_lights_are_port_red_and_starboard_green() {
        let mut rig = Rig::new();
        rig.boat(false, 0.0);
        for ix in [15, 16, 17, 88, 89, 90] {
            assert_eq!(rig.fx.rail_left.color(ix), Some(PORT_LIGHT));
            assert_eq!(rig.fx.rail_right.color(ix), Some(STARBOARD_LIGHT));
        }
        assert_eq!(rig.fx.rail_left.color(50), Some(Color::gray(128.0)));
    }

    #[test]
    fn speckles_decay_back_to_gray() {
        let mut rig = Rig::new();
        rig.fx.rail_left.set(40, Color::WHITE);
        rig.boat(false, 0.0);
        assert_eq!(rig.fx.rail_left.color(40), Some(Color::gray(235.0)));
        for _ in 0..10 {
            rig.boat(false, 0.0);
        }
        assert_eq!(rig.fx.rail_left.color(40), Some(Color::gray(128.0)));
    }

    #[test]
    fn speckle_injects_a_bright_dot_with_dim_neighbours() {
        let mut rig = Rig::new();
        let mut ctx = ModeCtx {
            geom: &rig.geom,
            spin: &rig.spin,
            speckle_probability: 1.0,
            rng: &mut rig.rng,
        };
        speckles(&mut rig.fx.rail_left, &mut ctx);
        let dots = lit_indices(&rig.fx.rail_left, Color::WHITE);
        assert_eq!(dots.len(), 1);
        let dot = dots[0];
        assert_eq!(rig.fx.rail_left.color(dot - 1), Some(Color::gray(200.0)));
        assert_eq!(rig.fx.rail_left.color(dot + 1), Some(Color::gray(200.0)));
    }

    #[test]
    fn america_steps_waves_toward_the_flag_color() {
        let mut rig = Rig::new();
        rig.america();
        // Waves start at (0, 0, 192) and head for red.
        assert_eq!(rig.fx.wave_left.color(0), Some(Color::new(5.0, 0.0, 187.0)));
        // Red needs 51 steps of 5; the tick after convergence advances the cycle.
        for _ in 0..50 {
            rig.america();
        }
        assert!(rig.fx.wave_left.colors().all(|c| c == FLAG_COLORS[0]));
        assert_eq!(rig.st.flag_cycle[0], FLAG_COLORS[0]);
        rig.america();
        assert_eq!(rig.st.flag_cycle[0], FLAG_COLORS[1]);
    }

    #[test]
    fn america_pulls_a_comet_down_the_rails() {
        let mut rig = Rig::new();
        rig.america();
        // Bow cell painted, then shifted one toward the stern.
        assert_eq!(rig.fx.rail_left.color(98), Some(Color::new(255.0, 0.0, 0.0)));
        assert_eq!(rig.fx.rail_right.color(98), Some(Color::new(0.0, 0.0, 255.0)));
        assert_eq!(lit_indices(&rig.fx.scanner, Color::WHITE), vec![1, 2, 3]);
        rig.america();
        assert_eq!(rig.fx.rail_left.color(97), Some(Color::new(255.0, 0.0, 0.0)));
    }

    #[test]
    fn america_reversal_paints_a_white_stripe() {
        let mut rig = Rig::new();
        rig.st.scanner.pos = 36;
        rig.america();
        assert_eq!(rig.st.scanner.dir, -1);
        // Six cells went white at 94..=99, then everything shifted down one.
        assert_eq!(lit_indices(&rig.fx.rail_right, Color::WHITE), vec![93, 94, 95, 96, 97, 98, 99]);
        assert!(lit_indices(&rig.fx.rail_left, Color::WHITE).is_empty());
    }

    #[test]
    fn slow_fires_every_fifth_tick() {
        let mut rig = Rig::new();
        let mut changes = Vec::new();
        for tick in 0..15 {
            let before = rig.fx.clone();
            slow(&mut rig.fx, &mut rig.st, &mut rig.rng);
            if rig.fx != before {
                changes.push(tick);
            }
        }
        assert_eq!(changes, vec![0, 5, 10]);
    }

    #[test]
    fn disco_respects_the_channel_range() {
        let mut rig = Rig::new();
        disco(&mut rig.fx, &mut rig.rng, 100, 120);
        for f in rig.fx.iter() {
            for c in f.colors() {
                for v in [c.r, c.g, c.b] {
                    assert!((100.0..=120.0).contains(&v));
                }
            }
        }
    }
}
