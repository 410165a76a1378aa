//! Error-diffusion and threshold dithering over a cell grid.
//!
//! All five methods operate on cells of `scale x scale` pixels: each cell
//! samples its top-left source pixel, picks one output color, and writes it to
//! every pixel of the cell. The serial methods (Floyd-Steinberg, Atkinson)
//! accumulate quantization error into a scratch grid so later cells see prior
//! corrections; the scratch is pooled across invocations of unchanged
//! dimensions to avoid per-tick allocation churn.
//!
//! Palette mode replaces per-channel rounding with a Euclidean nearest-entry
//! search; unknown palette names degrade to quantization.

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::{Rng64, clamp255};
use crate::palette;
use crate::settings::{DitherMethod, DitherSettings};

const BAYER_4X4: [[f32; 4]; 4] = [
    [0.0, 8.0, 2.0, 10.0],
    [12.0, 4.0, 14.0, 6.0],
    [3.0, 11.0, 1.0, 9.0],
    [15.0, 7.0, 13.0, 5.0],
];

const ORDERED_8X8: [[f32; 8]; 8] = [
    [0.0, 32.0, 8.0, 40.0, 2.0, 34.0, 10.0, 42.0],
    [48.0, 16.0, 56.0, 24.0, 50.0, 18.0, 58.0, 26.0],
    [12.0, 44.0, 4.0, 36.0, 14.0, 46.0, 6.0, 38.0],
    [60.0, 28.0, 52.0, 20.0, 62.0, 30.0, 54.0, 22.0],
    [3.0, 35.0, 11.0, 43.0, 1.0, 33.0, 9.0, 41.0],
    [51.0, 19.0, 59.0, 27.0, 49.0, 17.0, 57.0, 25.0],
    [15.0, 47.0, 7.0, 39.0, 13.0, 45.0, 5.0, 37.0],
    [63.0, 31.0, 55.0, 23.0, 61.0, 29.0, 53.0, 21.0],
];

/// Reusable error-diffusion scratch grid.
///
/// Contents are fully rewritten by [`apply`]; pooling only preserves the
/// allocation, never state between frames.
#[derive(Debug, Default)]
pub struct DitherScratch {
    cells: Vec<[f32; 3]>,
}

impl DitherScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&mut self, buf: &PixelBuffer, step: u32, cells_w: u32, cells_h: u32) {
        let n = (cells_w as usize) * (cells_h as usize);
        self.cells.clear();
        self.cells.reserve(n);
        for cy in 0..cells_h {
            for cx in 0..cells_w {
                let [r, g, b, _] = buf.pixel(cx * step, cy * step);
                self.cells.push([f32::from(r), f32::from(g), f32::from(b)]);
            }
        }
    }
}

/// Apply the configured dithering method in place.
pub fn apply(
    buf: &mut PixelBuffer,
    settings: &DitherSettings,
    scratch: &mut DitherScratch,
    rng: &mut Rng64,
) {
    let step = settings.scale.max(1);
    // Open question resolved at the control surface: colors >= 2, since the
    // quantization formula divides by colors - 1.
    let colors = settings.colors.max(2);
    let palette = palette::by_name(&settings.palette).map(|p| p.colors);

    match settings.method {
        DitherMethod::FloydSteinberg => {
            diffuse(buf, step, colors, palette, scratch, FS_KERNEL);
        }
        DitherMethod::Atkinson => {
            diffuse(buf, step, colors, palette, scratch, ATKINSON_KERNEL);
        }
        DitherMethod::Bayer => {
            threshold(buf, step, colors, palette, |cx, cy| {
                BAYER_4X4[(cy % 4) as usize][(cx % 4) as usize] / 16.0 - 0.5
            });
        }
        DitherMethod::Ordered => {
            threshold(buf, step, colors, palette, |cx, cy| {
                ORDERED_8X8[(cy % 8) as usize][(cx % 8) as usize] / 64.0 - 0.5
            });
        }
        DitherMethod::Random => {
            threshold(buf, step, colors, palette, |_, _| {
                (rng.next_centered() * 0.5) as f32
            });
        }
    }
}

/// Round one channel to the nearest of `colors` evenly spaced levels.
fn quantize_channel(v: f32, colors: u32) -> f32 {
    let n = (colors - 1) as f32;
    (v / 255.0 * n).round() / n * 255.0
}

/// Threshold-perturbed variant used by the stateless methods.
fn quantize_channel_with_threshold(v: f32, thresh: f32, colors: u32) -> f32 {
    let n = (colors - 1) as f32;
    let adjusted = v / 255.0 + thresh / n;
    ((adjusted * n).round() / n * 255.0).clamp(0.0, 255.0)
}

fn choose_color(r: f32, g: f32, b: f32, colors: u32, palette: Option<&[[u8; 3]]>) -> [u8; 3] {
    match palette {
        Some(entries) => palette::nearest(entries, r, g, b),
        None => [
            clamp255(quantize_channel(r, colors)),
            clamp255(quantize_channel(g, colors)),
            clamp255(quantize_channel(b, colors)),
        ],
    }
}

fn choose_color_with_threshold(
    r: f32,
    g: f32,
    b: f32,
    thresh: f32,
    colors: u32,
    palette: Option<&[[u8; 3]]>,
) -> [u8; 3] {
    match palette {
        Some(entries) => {
            // Threshold perturbs the nearest-color search input, scaled to
            // channel units.
            let adj = |v: f32| (v + thresh * 128.0).clamp(0.0, 255.0);
            palette::nearest(entries, adj(r), adj(g), adj(b))
        }
        None => [
            clamp255(quantize_channel_with_threshold(r, thresh, colors)),
            clamp255(quantize_channel_with_threshold(g, thresh, colors)),
            clamp255(quantize_channel_with_threshold(b, thresh, colors)),
        ],
    }
}

fn write_cell(buf: &mut PixelBuffer, x0: u32, y0: u32, step: u32, rgb: [u8; 3]) {
    let w = buf.width();
    let h = buf.height();
    for y in y0..(y0 + step).min(h) {
        for x in x0..(x0 + step).min(w) {
            let i = buf.offset(x, y);
            let data = buf.data_mut();
            data[i] = rgb[0];
            data[i + 1] = rgb[1];
            data[i + 2] = rgb[2];
        }
    }
}

/// Error-diffusion kernel: relative cell offsets and the fraction of the
/// current cell's quantization error pushed to each.
type Kernel = &'static [(i32, i32, f32)];

// Floyd-Steinberg: 7/16 right, 3/16 below-left, 5/16 below, 1/16 below-right.
const FS_KERNEL: Kernel = &[
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

// Atkinson: 1/8 to six neighbors; the remaining 2/8 is deliberately dropped,
// which produces the characteristic lighter look.
const ATKINSON_KERNEL: Kernel = &[
    (1, 0, 1.0 / 8.0),
    (2, 0, 1.0 / 8.0),
    (-1, 1, 1.0 / 8.0),
    (0, 1, 1.0 / 8.0),
    (1, 1, 1.0 / 8.0),
    (0, 2, 1.0 / 8.0),
];

fn diffuse(
    buf: &mut PixelBuffer,
    step: u32,
    colors: u32,
    palette: Option<&[[u8; 3]]>,
    scratch: &mut DitherScratch,
    kernel: Kernel,
) {
    let cells_w = buf.width().div_ceil(step);
    let cells_h = buf.height().div_ceil(step);
    scratch.load(buf, step, cells_w, cells_h);

    for cy in 0..cells_h {
        for cx in 0..cells_w {
            let idx = (cy * cells_w + cx) as usize;
            let [r, g, b] = scratch.cells[idx];
            let chosen = choose_color(r, g, b, colors, palette);
            write_cell(buf, cx * step, cy * step, step, chosen);

            let err = [
                r - f32::from(chosen[0]),
                g - f32::from(chosen[1]),
                b - f32::from(chosen[2]),
            ];
            for &(dx, dy, weight) in kernel {
                let nx = cx as i64 + i64::from(dx);
                let ny = cy as i64 + i64::from(dy);
                if nx < 0 || nx >= i64::from(cells_w) || ny < 0 || ny >= i64::from(cells_h) {
                    continue;
                }
                let n = (ny as usize) * (cells_w as usize) + nx as usize;
                for c in 0..3 {
                    scratch.cells[n][c] = (scratch.cells[n][c] + err[c] * weight).clamp(0.0, 255.0);
                }
            }
        }
    }
}

fn threshold(
    buf: &mut PixelBuffer,
    step: u32,
    colors: u32,
    palette: Option<&[[u8; 3]]>,
    mut thresh_at: impl FnMut(u32, u32) -> f32,
) {
    let cells_w = buf.width().div_ceil(step);
    let cells_h = buf.height().div_ceil(step);

    for cy in 0..cells_h {
        for cx in 0..cells_w {
            let [r, g, b, _] = buf.pixel(cx * step, cy * step);
            let t = thresh_at(cx, cy);
            let chosen = choose_color_with_threshold(
                f32::from(r),
                f32::from(g),
                f32::from(b),
                t,
                colors,
                palette,
            );
            write_cell(buf, cx * step, cy * step, step, chosen);
        }
    }
}
