//! Stateless per-pixel colorimetric transforms.
//!
//! Each transform maps (r, g, b) to a new triple via a fixed formula and is
//! blended with the original as `orig + (transformed - orig) * intensity`, so
//! intensity 0 is a no-op and 1 is the full transform. All arithmetic clamps
//! to [0, 255] after blending. Alpha is untouched.

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::clamp255;
use crate::settings::FilmStock;

/// Apply `transform` to every pixel, blended by `intensity`.
pub fn apply_color_transform(
    buf: &mut PixelBuffer,
    intensity: f32,
    transform: impl Fn(f32, f32, f32) -> (f32, f32, f32),
) {
    for px in buf.data_mut().chunks_exact_mut(4) {
        let r = f32::from(px[0]);
        let g = f32::from(px[1]);
        let b = f32::from(px[2]);
        let (tr, tg, tb) = transform(r, g, b);
        px[0] = clamp255(r + (tr - r) * intensity);
        px[1] = clamp255(g + (tg - g) * intensity);
        px[2] = clamp255(b + (tb - b) * intensity);
    }
}

/// Luma-weighted grayscale.
pub fn grayscale(buf: &mut PixelBuffer, intensity: f32) {
    apply_color_transform(buf, intensity, |r, g, b| {
        let gray = r * 0.299 + g * 0.587 + b * 0.114;
        (gray, gray, gray)
    });
}

/// Channel inversion.
pub fn invert(buf: &mut PixelBuffer, intensity: f32) {
    apply_color_transform(buf, intensity, |r, g, b| (255.0 - r, 255.0 - g, 255.0 - b));
}

/// Classic sepia matrix.
pub fn sepia(buf: &mut PixelBuffer, intensity: f32) {
    apply_color_transform(buf, intensity, sepia_rgb);
}

pub(crate) fn sepia_rgb(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    (
        (r * 0.393 + g * 0.769 + b * 0.189).min(255.0),
        (r * 0.349 + g * 0.686 + b * 0.168).min(255.0),
        (r * 0.272 + g * 0.534 + b * 0.131).min(255.0),
    )
}

/// Film stock emulation, one fixed tone formula per stock.
pub fn film(buf: &mut PixelBuffer, stock: FilmStock, intensity: f32) {
    let transform: fn(f32, f32, f32) -> (f32, f32, f32) = match stock {
        FilmStock::TMax => tmax,
        FilmStock::Portra => portra,
        FilmStock::Ektar => ektar,
        FilmStock::Provia => provia,
        FilmStock::TriX => trix,
        FilmStock::Hp5 => hp5,
    };
    apply_color_transform(buf, intensity, transform);
}

// Kodak T-MAX 400: high-contrast B&W, blue/green-weighted conversion, cool tone.
fn tmax(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let gray = r * 0.2 + g * 0.7 + b * 0.1;
    let curved = if gray < 32.0 {
        gray * 0.5
    } else if gray < 96.0 {
        16.0 + (gray - 32.0) * 1.5
    } else if gray < 160.0 {
        96.0 + (gray - 96.0) * 1.2
    } else if gray < 224.0 {
        160.0 + (gray - 160.0) * 1.1
    } else {
        224.0 + (gray - 224.0) * 0.8
    };
    let cooled = (curved * 0.98).clamp(0.0, 255.0);
    (cooled, cooled, cooled)
}

// Kodak Portra 400: warm, natural tones with a gentle S-curve.
fn portra(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let nr = s_curve(r * 1.1 * 1.05, 1.1);
    let ng = s_curve(g * 1.02 * 1.05, 1.05);
    let nb = s_curve(b * 0.95 * 1.05, 1.05);
    (
        nr.clamp(0.0, 255.0),
        ng.clamp(0.0, 255.0),
        nb.clamp(0.0, 255.0),
    )
}

// Kodak Ektar 100: high saturation and contrast, blue-boosted.
fn ektar(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let contrast = |v: f32| (v - 128.0) * 1.1 + 128.0;
    (
        (contrast(r) * 1.15).clamp(0.0, 255.0),
        (contrast(g) * 1.15 * 1.05).clamp(0.0, 255.0),
        (contrast(b) * 1.15 * 1.1).clamp(0.0, 255.0),
    )
}

// Fujifilm Provia 100F: natural colors with slight warmth.
fn provia(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let nr = s_curve(r * 1.05 * 1.08, 1.05);
    let ng = s_curve(g * 1.08, 1.02);
    let nb = s_curve(b * 0.98 * 1.08, 1.02);
    (
        nr.clamp(0.0, 255.0),
        ng.clamp(0.0, 255.0),
        nb.clamp(0.0, 255.0),
    )
}

// Kodak Tri-X 400: classic B&W, green-weighted conversion.
fn trix(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let gray = r * 0.25 + g * 0.65 + b * 0.1;
    let v = (((gray - 128.0) * 1.15 + 128.0) * 1.02).clamp(0.0, 255.0);
    (v, v, v)
}

// Ilford HP5 Plus: high-contrast B&W with deepened shadows.
fn hp5(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let gray = r * 0.3 + g * 0.59 + b * 0.11;
    let v = if gray < 64.0 {
        gray * 0.8
    } else if gray < 128.0 {
        64.0 + (gray - 64.0) * 1.2
    } else if gray < 192.0 {
        128.0 + (gray - 128.0) * 1.1
    } else {
        192.0 + (gray - 192.0) * 0.9
    };
    let v = v.clamp(0.0, 255.0);
    (v, v, v)
}

fn s_curve(v: f32, k: f32) -> f32 {
    if v > 128.0 {
        128.0 + (v - 128.0) * k
    } else {
        128.0 - (128.0 - v) * k
    }
}
