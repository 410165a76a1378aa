//! Light leak: a radial gradient composited with "overlay" blending.

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::clamp255;
use crate::settings::{LeakColor, LeakPosition, LightLeakSettings};

// Gradient endpoints per named color: RGB at the transparent center and at
// the saturated rim (rim alpha is fixed at 0.8).
const fn leak_gradient(color: LeakColor) -> ([f32; 3], [f32; 3]) {
    match color {
        LeakColor::Orange => ([255.0, 165.0, 0.0], [255.0, 140.0, 0.0]),
        LeakColor::Purple => ([128.0, 0.0, 128.0], [75.0, 0.0, 130.0]),
        LeakColor::Blue => ([0.0, 191.0, 255.0], [0.0, 0.0, 255.0]),
        LeakColor::Green => ([0.0, 255.0, 0.0], [0.0, 128.0, 0.0]),
        LeakColor::Pink => ([255.0, 192.0, 203.0], [255.0, 20.0, 147.0]),
    }
}

const RIM_ALPHA: f32 = 0.8;

fn gradient_center(position: LeakPosition, w: f32, h: f32) -> (f32, f32) {
    match position {
        LeakPosition::TopLeft => (w * 0.2, h * 0.2),
        LeakPosition::TopRight => (w * 0.8, h * 0.2),
        LeakPosition::BottomLeft => (w * 0.2, h * 0.8),
        LeakPosition::BottomRight => (w * 0.8, h * 0.8),
        LeakPosition::Center => (w * 0.5, h * 0.5),
    }
}

// Per-channel "overlay" blend: screens light bases, multiplies dark ones.
fn overlay_channel(base: f32, blend: f32) -> f32 {
    if base < 128.0 {
        2.0 * base * blend / 255.0
    } else {
        255.0 - 2.0 * (255.0 - base) * (255.0 - blend) / 255.0
    }
}

/// Composite the radial light leak over `buf` in place.
pub fn apply(buf: &mut PixelBuffer, settings: &LightLeakSettings) {
    let w = buf.width();
    let h = buf.height();
    let (cx, cy) = gradient_center(settings.position, w as f32, h as f32);
    let radius = (w.max(h) as f32) * 0.7;
    let (start, end) = leak_gradient(settings.color);
    let intensity = settings.intensity.clamp(0.0, 1.0);
    if intensity <= 0.0 {
        return;
    }

    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let t = ((dx * dx + dy * dy).sqrt() / radius).clamp(0.0, 1.0);

            let leak = [
                start[0] + (end[0] - start[0]) * t,
                start[1] + (end[1] - start[1]) * t,
                start[2] + (end[2] - start[2]) * t,
            ];
            let alpha = t * RIM_ALPHA * intensity;

            let i = buf.offset(x, y);
            let data = buf.data_mut();
            for c in 0..3 {
                let base = f32::from(data[i + c]);
                let blended = overlay_channel(base, leak[c]);
                data[i + c] = clamp255(base + (blended - base) * alpha);
            }
        }
    }
}
