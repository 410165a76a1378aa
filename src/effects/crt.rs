//! CRT surface painter: barrel distortion, scanlines, RGB channel shift.

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{RetroError, RetroResult};
use crate::settings::CrtSettings;

/// Paint `src` into `dst` with the CRT treatment.
///
/// Three passes:
/// 1. barrel distortion (skipped for curvature <= 0); destination pixels
///    whose distorted sample lands out of bounds stay transparent,
/// 2. every other scanline multiply-darkened at `scanline_intensity`,
/// 3. red channel shifted two pixels backward and blue two pixels forward as
///    flat-array offsets. The offsets deliberately ignore row boundaries, so
///    the shift wraps across rows; both shifts read from a snapshot of the
///    pre-shift pixels.
pub fn paint(dst: &mut PixelBuffer, src: &PixelBuffer, settings: &CrtSettings) -> RetroResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(RetroError::evaluation(
            "crt painter expects equal-size source and destination",
        ));
    }
    let w = dst.width();
    let h = dst.height();

    if settings.curvature > 0.0 {
        let cx = w as f32 / 2.0;
        let cy = h as f32 / 2.0;
        let max_radius = (cx * cx + cy * cy).sqrt();
        dst.data_mut().fill(0);
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                let distortion = 1.0 + (distance / max_radius) * settings.curvature;
                let sx = (cx + dx / distortion).round();
                let sy = (cy + dy / distortion).round();
                if sx >= 0.0 && sx < w as f32 && sy >= 0.0 && sy < h as f32 {
                    dst.put_pixel(x, y, src.pixel(sx as u32, sy as u32));
                }
            }
        }
    } else {
        dst.copy_from(src)?;
    }

    // Multiply blend with black at `scanline_intensity` alpha darkens the
    // row by (1 - intensity).
    let keep = 1.0 - settings.scanline_intensity.clamp(0.0, 1.0);
    for y in (0..h).step_by(2) {
        for x in 0..w {
            let i = dst.offset(x, y);
            let data = dst.data_mut();
            for c in 0..3 {
                data[i + c] = (f32::from(data[i + c]) * keep).round() as u8;
            }
        }
    }

    let snapshot = dst.data().to_vec();
    let data = dst.data_mut();
    let len = data.len();
    for i in (0..len).step_by(4) {
        if i > 8 {
            data[i] = snapshot[i - 8];
        }
        if i + 10 < len {
            data[i + 2] = snapshot[i + 10];
        }
    }

    Ok(())
}
