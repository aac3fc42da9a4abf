//! Offline picture of the installation: every LED cell drawn as a filled square.

use image::{Rgba, RgbaImage};

use crate::fixture::LedCell;
use crate::installation::Installation;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Render the current fixture colors, scaled by brightness, onto a black canvas.
///
/// Cells falling partly outside the canvas are clipped.
pub fn render(installation: &Installation) -> RgbaImage {
    let (w, h) = installation.geometry().canvas_size();
    let mut img = RgbaImage::from_pixel(w, h, BACKGROUND);
    let brightness = installation.brightness();
    for fixture in installation.fixtures().iter() {
        for cell in fixture.cells() {
            fill_cell(&mut img, cell, brightness);
        }
    }
    img
}

fn fill_cell(img: &mut RgbaImage, cell: &LedCell, brightness: f64) {
    let c = cell.color.to_rgb8(brightness);
    let px = Rgba([c.r, c.g, c.b, 255]);
    let clip = |v: f64, max: u32| v.round().clamp(0.0, f64::from(max)) as u32;
    let (x0, x1) = (clip(cell.bounds.x0, img.width()), clip(cell.bounds.x1, img.width()));
    let (y0, y1) = (clip(cell.bounds.y0, img.height()), clip(cell.bounds.y1, img.height()));
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, px);
        }
    }
}
