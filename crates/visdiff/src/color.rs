//! Channel arithmetic shared by the comparison pass and the visualization.
//!
//! All statistics run in unit-interval space: an 8-bit channel value `v`
//! contributes `v / 255`. The dynamic range `L` used by the stabilizing
//! constants is therefore exactly `1.0`.

use image::Rgba;

const CHANNEL_MAX: f64 = 255.0;

// Rec. 709 luma coefficients.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

fn unit(channel: u8) -> f64 {
    f64::from(channel) / CHANNEL_MAX
}

/// All four channels of `px` mapped to the unit interval, RGBA order.
pub fn unit_channels(px: Rgba<u8>) -> [f64; 4] {
    let Rgba([r, g, b, a]) = px;
    [unit(r), unit(g), unit(b), unit(a)]
}

/// Rec. 709 luminance of `px` in the unit interval. Alpha is ignored.
pub fn luminance(px: Rgba<u8>) -> f64 {
    let Rgba([r, g, b, _]) = px;
    LUMA_R * unit(r) + LUMA_G * unit(g) + LUMA_B * unit(b)
}

/// Squared unit-space difference per color channel. Alpha differences are
/// invisible to the error metrics, so only R, G and B come back.
pub(crate) fn squared_diff_rgb(a: Rgba<u8>, b: Rgba<u8>) -> [f64; 3] {
    let dr = unit(a[0]) - unit(b[0]);
    let dg = unit(a[1]) - unit(b[1]);
    let db = unit(a[2]) - unit(b[2]);
    [dr * dr, dg * dg, db * db]
}

/// Difference blend of two pixels: each output channel, alpha included, is
/// the absolute difference of the source channels. Identical pixels blend
/// to fully transparent black.
pub fn difference_blend(a: Rgba<u8>, b: Rgba<u8>) -> Rgba<u8> {
    Rgba([
        a[0].abs_diff(b[0]),
        a[1].abs_diff(b[1]),
        a[2].abs_diff(b[2]),
        a[3].abs_diff(b[3]),
    ])
}
