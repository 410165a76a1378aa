//! Vintage surface painter: sepia tone, radial vignette, random scratches.

use crate::effects::color::sepia_rgb;
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::math::{Rng64, clamp255};
use crate::raster;
use crate::settings::VintageSettings;

/// Paint `src` into `dst` with sepia + vignette, then (with probability
/// `scratch` per frame) one faint random vertical scratch line.
pub fn paint(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    settings: &VintageSettings,
    rng: &mut Rng64,
) -> RetroResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(RetroError::evaluation(
            "vintage painter expects equal-size source and destination",
        ));
    }
    let w = dst.width();
    let h = dst.height();
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();

    for y in 0..h {
        for x in 0..w {
            let [r, g, b, a] = src.pixel(x, y);
            let (sr, sg, sb) = sepia_rgb(f32::from(r), f32::from(g), f32::from(b));

            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let vignette = 1.0 - (dist / max_dist) * settings.vignette;

            dst.put_pixel(
                x,
                y,
                [
                    clamp255(sr * vignette),
                    clamp255(sg * vignette),
                    clamp255(sb * vignette),
                    a,
                ],
            );
        }
    }

    if rng.next_f64_01() < f64::from(settings.scratch) {
        let alpha = (0.1 + rng.next_f64_01() * 0.2) as f32;
        let x = (rng.next_f64_01() * f64::from(w)) as i64;
        let y1 = rng.next_f64_01() * f64::from(h);
        let y2 = y1 + rng.next_f64_01() * 100.0 - 50.0;
        let (top, bottom) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        for y in (top.floor() as i64)..=(bottom.floor() as i64) {
            raster::blend_pixel(dst, x, y, [255, 255, 255], alpha);
        }
    }

    Ok(())
}
