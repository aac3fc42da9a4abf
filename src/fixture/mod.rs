//! Fixture model: named, fixed-length runs of LED cells.

use crate::config::Geometry;
use crate::foundation::core::{Color, Point, Rect, Size};
use crate::layout::{self, FixtureLayout, Side};

/// One LED: its preview-space bounds and current color.
#[derive(Clone, Debug, PartialEq)]
pub struct LedCell {
    pub bounds: Rect,
    pub color: Color,
}

impl LedCell {
    pub fn new(origin: Point, size: Size, color: Color) -> Self {
        Self {
            bounds: Rect::from_origin_size(origin, size),
            color,
        }
    }

    /// Half-open hit test: the left and top edges are inside, the right and bottom are not.
    pub fn contains(&self, pt: Point) -> bool {
        self.bounds.contains(pt)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    name: &'static str,
    cells: Vec<LedCell>,
}

impl Fixture {
    pub fn from_layout(name: &'static str, layout: FixtureLayout, cell_size: Size) -> Self {
        let color = layout.color;
        Self {
            name,
            cells: layout
                .origins
                .into_iter()
                .map(|origin| LedCell::new(origin, cell_size, color))
                .collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[LedCell] {
        &self.cells
    }

    /// Mutable access to the cells; the slice length is fixed for the fixture's lifetime.
    pub fn cells_mut(&mut self) -> &mut [LedCell] {
        &mut self.cells
    }

    pub fn color(&self, ix: usize) -> Option<Color> {
        self.cells.get(ix).map(|c| c.color)
    }

    /// Set one cell's color; out-of-range indices are ignored.
    pub fn set(&mut self, ix: usize, color: Color) {
        if let Some(cell) = self.cells.get_mut(ix) {
            cell.color = color;
        }
    }

    pub fn fill(&mut self, color: Color) {
        for cell in &mut self.cells {
            cell.color = color;
        }
    }

    pub fn colors(&self) -> impl DoubleEndedIterator<Item = Color> + ExactSizeIterator + '_ {
        self.cells.iter().map(|c| c.color)
    }
}

/// Every fixture on the installation.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixtures {
    pub wave_left: Fixture,
    pub wave_right: Fixture,
    pub rail_left: Fixture,
    pub rail_right: Fixture,
    pub scanner: Fixture,
    pub nacelle_left: Fixture,
    pub nacelle_right: Fixture,
}

impl Fixtures {
    /// Lay out every fixture from the geometry. Call once at startup.
    pub fn generate(geom: &Geometry) -> Self {
        let size = Size::new(geom.led_size, geom.led_size);
        Self {
            wave_left: Fixture::from_layout("wave_left", layout::waves(geom, Side::Port), size),
            wave_right: Fixture::from_layout(
                "wave_right",
                layout::waves(geom, Side::Starboard),
                size,
            ),
            rail_left: Fixture::from_layout("rail_left", layout::rail(geom, Side::Port), size),
            rail_right: Fixture::from_layout(
                "rail_right",
                layout::rail(geom, Side::Starboard),
                size,
            ),
            scanner: Fixture::from_layout("scanner", layout::scanner(geom), size),
            nacelle_left: Fixture::from_layout(
                "nacelle_left",
                layout::nacelle(geom, Side::Port),
                size,
            ),
            nacelle_right: Fixture::from_layout(
                "nacelle_right",
                layout::nacelle(geom, Side::Starboard),
                size,
            ),
        }
    }

    /// Fixtures in hit-test order.
    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        [
            &self.wave_left,
            &self.wave_right,
            &self.rail_left,
            &self.rail_right,
            &self.scanner,
            &self.nacelle_left,
            &self.nacelle_right,
        ]
        .into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fixture> {
        [
            &mut self.wave_left,
            &mut self.wave_right,
            &mut self.rail_left,
            &mut self.rail_right,
            &mut self.scanner,
            &mut self.nacelle_left,
            &mut self.nacelle_right,
        ]
        .into_iter()
    }

    pub fn cell_count(&self) -> usize {
        self.iter().map(Fixture::len).sum()
    }

    pub fn fill(&mut self, color: Color) {
        for fixture in self.iter_mut() {
            fixture.fill(color);
        }
    }

    /// Toggle the first cell containing `pt` between black and white.
    ///
    /// Returns the fixture name, cell index and new color, or `None` when nothing was hit.
    pub fn toggle_at(&mut self, pt: Point) -> Option<(&'static str, usize, Color)> {
        for fixture in self.iter_mut() {
            let name = fixture.name();
            let hit = fixture
                .cells_mut()
                .iter_mut()
                .enumerate()
                .find(|(_, cell)| cell.contains(pt));
            if let Some((ix, cell)) = hit {
                cell.color = if cell.color == Color::BLACK {
                    Color::WHITE
                } else {
                    Color::BLACK
                };
                return Some((name, ix, cell.color));
            }
        }
        None
    }
}
