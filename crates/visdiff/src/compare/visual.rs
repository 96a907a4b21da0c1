//! Difference-blend visualization of two images.

use image::{Rgba, RgbaImage};

use crate::color;

/// Substituted where only one input covers a coordinate.
const BACKDROP: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Build the per-pixel difference blend of two images.
///
/// The output spans the union of the two extents: its width and height are
/// the maxima of the inputs'. Where an input does not cover a coordinate it
/// reads as opaque black, so overhanging regions show up as the other
/// image's distance from black. Identical regions come out fully zeroed.
///
/// Unlike the statistical comparison this accepts inputs of different
/// sizes, and it walks every pixel rather than whole tiles.
pub fn difference_image(reference: &RgbaImage, current: &RgbaImage) -> RgbaImage {
    let width = reference.width().max(current.width());
    let height = reference.height().max(current.height());
    let mut out = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let a = sample(reference, x, y);
            let b = sample(current, x, y);
            out.put_pixel(x, y, color::difference_blend(a, b));
        }
    }
    out
}

fn sample(img: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
    if x < img.width() && y < img.height() {
        *img.get_pixel(x, y)
    } else {
        BACKDROP
    }
}
