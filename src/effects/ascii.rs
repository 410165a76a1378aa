//! ASCII-art surface painter.
//!
//! Partitions the source into character cells, samples one pixel per cell,
//! and repaints the whole destination as a glyph raster: each glyph is drawn
//! in the sampled color on a cleared black or white background.
//!
//! Glyphs come from a built-in 5x7 monospace mask table covering the default
//! ramps; ramp characters without a mask fall back to a centered block whose
//! size tracks the character's position in the ramp, so non-ASCII ramps
//! (blocks, shades) still read as density.

use crate::foundation::core::{PixelBuffer, Rgba8};
use crate::foundation::error::{RetroError, RetroResult};
use crate::settings::{AsciiBackground, AsciiSettings};

// 5x7 masks, one row per byte, bit 4 = leftmost column.
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000]),
    (':', [0b00000, 0b00100, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('=', [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000]),
    ('+', [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000]),
    ('*', [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000]),
    ('#', [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010]),
    ('%', [0b11001, 0b11010, 0b00010, 0b00100, 0b01000, 0b01011, 0b10011]),
    ('@', [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110]),
];

fn glyph_mask(c: char) -> Option<&'static [u8; 7]> {
    GLYPHS.iter().find(|(g, _)| *g == c).map(|(_, m)| m)
}

/// Repaint `dst` as an ASCII rendering of `src`.
///
/// Precondition: `dst` and `src` have equal dimensions; a mismatch aborts
/// this paint (leaving `dst` untouched) without failing the tick.
pub fn paint(dst: &mut PixelBuffer, src: &PixelBuffer, settings: &AsciiSettings) -> RetroResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(RetroError::evaluation(
            "ascii painter expects equal-size source and destination",
        ));
    }
    let ramp: Vec<char> = settings.characters.chars().collect();
    if ramp.is_empty() {
        return Err(RetroError::evaluation("ascii character ramp is empty"));
    }

    let font_size = settings.font_size.max(2);
    let cell_w = ((font_size as f32 * 0.6).round() as u32).max(1);
    let cell_h = font_size;

    let bg = match settings.background {
        AsciiBackground::Black => Rgba8::BLACK,
        AsciiBackground::White => Rgba8::WHITE,
    };
    dst.fill(bg);

    let w = src.width();
    let h = src.height();
    for y0 in (0..h).step_by(cell_h as usize) {
        for x0 in (0..w).step_by(cell_w as usize) {
            let [r, g, b, _] = src.pixel(x0, y0);
            let brightness = (u32::from(r) + u32::from(g) + u32::from(b)) as f32 / 3.0;
            let norm = if settings.invert {
                (255.0 - brightness) / 255.0
            } else {
                brightness / 255.0
            };
            let idx = ((norm * (ramp.len() - 1) as f32).floor() as usize).min(ramp.len() - 1);
            let color = [r, g, b, 255];

            let gw = (x0 + cell_w).min(w) - x0;
            let gh = (y0 + cell_h).min(h) - y0;
            match glyph_mask(ramp[idx]) {
                Some(mask) => draw_glyph(dst, x0, y0, gw, gh, mask, color),
                None => {
                    // Density by ramp position: index 0 is the densest end.
                    let density = if ramp.len() > 1 {
                        1.0 - idx as f32 / (ramp.len() - 1) as f32
                    } else {
                        1.0
                    };
                    draw_block(dst, x0, y0, gw, gh, density, color);
                }
            }
        }
    }
    Ok(())
}

fn draw_glyph(
    dst: &mut PixelBuffer,
    x0: u32,
    y0: u32,
    gw: u32,
    gh: u32,
    mask: &[u8; 7],
    color: [u8; 4],
) {
    for dy in 0..gh {
        let my = (dy * 7 / gh.max(1)).min(6);
        let row = mask[my as usize];
        for dx in 0..gw {
            let mx = (dx * 5 / gw.max(1)).min(4);
            if row & (1 << (4 - mx)) != 0 {
                dst.put_pixel(x0 + dx, y0 + dy, color);
            }
        }
    }
}

fn draw_block(
    dst: &mut PixelBuffer,
    x0: u32,
    y0: u32,
    gw: u32,
    gh: u32,
    density: f32,
    color: [u8; 4],
) {
    let bw = (gw as f32 * density).round() as u32;
    let bh = (gh as f32 * density).round() as u32;
    if bw == 0 || bh == 0 {
        return;
    }
    let ox = x0 + (gw - bw) / 2;
    let oy = y0 + (gh - bh) / 2;
    for y in oy..oy + bh {
        for x in ox..ox + bw {
            dst.put_pixel(x, y, color);
        }
    }
}
