use crate::config::Geometry;
use crate::fixture::Fixtures;
use crate::foundation::core::{Color, Rgb8};

/// Hardware strands on the controller.
pub const STRAND_COUNT: usize = 8;
/// LEDs addressed per strand, padding included.
pub const STRAND_LEN: usize = 64;
/// Pixels in one transmitted frame.
pub const FRAME_PIXELS: usize = STRAND_COUNT * STRAND_LEN;

/// One frame of strand buffers in controller order.
///
/// Always exactly [`STRAND_COUNT`] strands of [`STRAND_LEN`] pixels, whatever the fixtures hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrandFrame {
    strands: [[Rgb8; STRAND_LEN]; STRAND_COUNT],
}

impl StrandFrame {
    /// Every pixel off.
    pub fn black() -> Self {
        Self {
            strands: [[Rgb8::BLACK; STRAND_LEN]; STRAND_COUNT],
        }
    }

    pub fn strands(&self) -> &[[Rgb8; STRAND_LEN]; STRAND_COUNT] {
        &self.strands
    }

    pub fn strand(&self, ix: usize) -> Option<&[Rgb8; STRAND_LEN]> {
        self.strands.get(ix)
    }

    /// All strands concatenated in order: the sequence the streaming client sends.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Rgb8> + '_ {
        self.strands.as_flattened().iter().copied()
    }

    /// The same sequence as one contiguous slice.
    pub fn as_pixels(&self) -> &[Rgb8] {
        self.strands.as_flattened()
    }
}

/// Fills one strand in order; anything left over stays black.
struct StrandWriter<'a> {
    out: &'a mut [Rgb8; STRAND_LEN],
    at: usize,
}

impl<'a> StrandWriter<'a> {
    fn new(out: &'a mut [Rgb8; STRAND_LEN]) -> Self {
        Self { out, at: 0 }
    }

    fn extend(&mut self, colors: impl Iterator<Item = Color>) {
        for c in colors {
            let Some(slot) = self.out.get_mut(self.at) else {
                return;
            };
            *slot = c.to_rgb8(1.0);
            self.at += 1;
        }
    }
}

/// Rebuild the strand buffers from the fixtures, following the physical wiring.
///
/// | strand | contents                                                          |
/// |--------|-------------------------------------------------------------------|
/// | 0      | right rail, stern half, reversed                                  |
/// | 1      | right rail, bow half, then the first scanner half                 |
/// | 2      | left rail, stern half, reversed                                   |
/// | 3      | left rail, bow half, then the second scanner half reversed        |
/// | 4      | left waves, then right waves reversed                             |
/// | 5, 6   | left, right nacelle (spinner then tail)                           |
/// | 7      | unused                                                            |
///
/// Channels are clamped to `0..=255`; no other correction is applied.
pub fn compose(fixtures: &Fixtures, geom: &Geometry) -> StrandFrame {
    let mut frame = StrandFrame::black();
    let split = geom.strand_split().min(fixtures.rail_right.len());
    let half = fixtures.scanner.len() / 2;
    let scanner = fixtures.scanner.cells();

    let [s0, s1, s2, s3, s4, s5, s6, _] = &mut frame.strands;

    let right = fixtures.rail_right.cells();
    StrandWriter::new(s0).extend(right[..split].iter().rev().map(|c| c.color));
    let mut w = StrandWriter::new(s1);
    w.extend(right[split..].iter().map(|c| c.color));
    w.extend(scanner[..half].iter().map(|c| c.color));

    let left = fixtures.rail_left.cells();
    let split = split.min(left.len());
    StrandWriter::new(s2).extend(left[..split].iter().rev().map(|c| c.color));
    let mut w = StrandWriter::new(s3);
    w.extend(left[split..].iter().map(|c| c.color));
    w.extend(scanner[half..].iter().rev().map(|c| c.color));

    let mut w = StrandWriter::new(s4);
    w.extend(fixtures.wave_left.colors());
    w.extend(fixtures.wave_right.colors().rev());

    StrandWriter::new(s5).extend(fixtures.nacelle_left.colors());
    StrandWriter::new(s6).extend(fixtures.nacelle_right.colors());

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked() -> (Fixtures, Geometry) {
        let geom = Geometry::default();
        let mut f = Fixtures::generate(&geom);
        // Encode fixture and index in the color so positions can be traced.
        for (fi, fixture) in f.iter_mut().enumerate() {
            for (ix, cell) in fixture.cells_mut().iter_mut().enumerate() {
                cell.color = Color::new(fi as f64 * 10.0, ix as f64, 1.0);
            }
        }
        (f, geom)
    }

    fn px(fixture: usize, ix: usize) -> Rgb8 {
        Rgb8 {
            r: (fixture * 10) as u8,
            g: ix as u8,
            b: 1,
        }
    }

    const WAVE_L: usize = 0;
    const WAVE_R: usize = 1;
    const RAIL_L: usize = 2;
    const RAIL_R: usize = 3;
    const SCANNER: usize = 4;
    const NAC_L: usize = 5;
    const NAC_R: usize = 6;

    #[test]
    fn frame_shape_is_fixed() {
        let (f, g) = marked();
        let frame = compose(&f, &g);
        assert_eq!(frame.strands().len(), 8);
        assert!(frame.strands().iter().all(|s| s.len() == 64));
        assert_eq!(frame.pixels().len(), 512);
    }

    #[test]
    fn stern_strands_are_reversed() {
        let (f, g) = marked();
        let frame = compose(&f, &g);
        let s0 = frame.strand(0).unwrap();
        assert_eq!(s0[0], px(RAIL_R, 59));
        assert_eq!(s0[59], px(RAIL_R, 0));
        let s2 = frame.strand(2).unwrap();
        assert_eq!(s2[0], px(RAIL_L, 59));
        assert_eq!(s2[59], px(RAIL_L, 0));
    }

    #[test]
    fn bow_strands_carry_the_scanner_halves() {
        let (f, g) = marked();
        let frame = compose(&f, &g);
        let s1 = frame.strand(1).unwrap();
        assert_eq!(s1[0], px(RAIL_R, 60));
        assert_eq!(s1[39], px(RAIL_R, 99));
        assert_eq!(s1[40], px(SCANNER, 0));
        assert_eq!(s1[59], px(SCANNER, 19));
        let s3 = frame.strand(3).unwrap();
        assert_eq!(s3[0], px(RAIL_L, 60));
        assert_eq!(s3[39], px(RAIL_L, 99));
        assert_eq!(s3[40], px(SCANNER, 39));
        assert_eq!(s3[59], px(SCANNER, 20));
    }

    #[test]
    fn wave_and_nacelle_strands() {
        let (f, g) = marked();
        let frame = compose(&f, &g);
        let s4 = frame.strand(4).unwrap();
        assert_eq!(s4[0], px(WAVE_L, 0));
        assert_eq!(s4[29], px(WAVE_L, 29));
        assert_eq!(s4[30], px(WAVE_R, 29));
        assert_eq!(s4[59], px(WAVE_R, 0));
        assert_eq!(frame.strand(5).unwrap()[23], px(NAC_L, 23));
        assert_eq!(frame.strand(6).unwrap()[0], px(NAC_R, 0));
    }

    #[test]
    fn padding_and_unused_strand_are_black() {
        let (f, g) = marked();
        let frame = compose(&f, &g);
        for (strand, used) in [(0, 60), (1, 60), (4, 60), (5, 24), (6, 24), (7, 0)] {
            let s = frame.strand(strand).unwrap();
            assert!(s[used..].iter().all(|p| *p == Rgb8::BLACK), "strand {strand}");
        }
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        let geom = Geometry::default();
        let mut f = Fixtures::generate(&geom);
        f.fill(Color::new(300.0, -4.0, 128.0));
        let frame = compose(&f, &geom);
        assert_eq!(frame.strand(4).unwrap()[0], Rgb8 { r: 255, g: 0, b: 128 });
    }
}
