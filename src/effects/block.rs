//! Block filters: pixelation and film grain.

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::{Rng64, clamp255};

/// Flatten each `size x size` block to its box-filter average (alpha
/// included). `size <= 1` is a no-op.
pub fn pixelate(buf: &mut PixelBuffer, size: u32) {
    if size <= 1 {
        return;
    }
    let w = buf.width();
    let h = buf.height();

    for y0 in (0..h).step_by(size as usize) {
        for x0 in (0..w).step_by(size as usize) {
            let mut sum = [0u64; 4];
            let mut count = 0u64;
            for y in y0..(y0 + size).min(h) {
                for x in x0..(x0 + size).min(w) {
                    let px = buf.pixel(x, y);
                    for c in 0..4 {
                        sum[c] += u64::from(px[c]);
                    }
                    count += 1;
                }
            }
            let avg = [
                (sum[0] as f32 / count as f32).round() as u8,
                (sum[1] as f32 / count as f32).round() as u8,
                (sum[2] as f32 / count as f32).round() as u8,
                (sum[3] as f32 / count as f32).round() as u8,
            ];
            for y in y0..(y0 + size).min(h) {
                for x in x0..(x0 + size).min(w) {
                    buf.put_pixel(x, y, avg);
                }
            }
        }
    }
}

/// Additive uniform noise, identical across R, G and B; alpha untouched.
///
/// `grain_size > 1` shares one noise sample across each `grain_size x
/// grain_size` block for a coarser, block-coherent grain.
pub fn film_grain(buf: &mut PixelBuffer, intensity: f32, grain_size: u32, rng: &mut Rng64) {
    let cell = grain_size.max(1);
    let w = buf.width();
    let h = buf.height();

    for y0 in (0..h).step_by(cell as usize) {
        for x0 in (0..w).step_by(cell as usize) {
            let noise = (rng.next_centered() as f32) * intensity * 255.0;
            for y in y0..(y0 + cell).min(h) {
                for x in x0..(x0 + cell).min(w) {
                    let i = buf.offset(x, y);
                    let data = buf.data_mut();
                    data[i] = clamp255(f32::from(data[i]) + noise);
                    data[i + 1] = clamp255(f32::from(data[i + 1]) + noise);
                    data[i + 2] = clamp255(f32::from(data[i + 2]) + noise);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8;

    #[test]
    fn pixelate_uniform_color_is_identity() {
        let mut buf = PixelBuffer::new(100, 100).unwrap();
        buf.fill(Rgba8::opaque(255, 0, 0));
        let orig = buf.clone();
        pixelate(&mut buf, 10);
        assert_eq!(buf, orig);
    }

    #[test]
    fn pixelate_size_one_is_noop() {
        let mut buf = PixelBuffer::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                buf.put_pixel(x, y, [(x * 30) as u8, (y * 30) as u8, 7, 255]);
            }
        }
        let orig = buf.clone();
        pixelate(&mut buf, 1);
        assert_eq!(buf, orig);
        pixelate(&mut buf, 0);
        assert_eq!(buf, orig);
    }

    #[test]
    fn pixelate_flattens_blocks_to_average() {
        let mut buf = PixelBuffer::new(4, 2).unwrap();
        // Left 2x2 block: two black + two white rows -> mid gray.
        buf.put_pixel(0, 0, [0, 0, 0, 255]);
        buf.put_pixel(1, 0, [0, 0, 0, 255]);
        buf.put_pixel(0, 1, [255, 255, 255, 255]);
        buf.put_pixel(1, 1, [255, 255, 255, 255]);
        // Right 2x2 block: uniform blue.
        for y in 0..2 {
            for x in 2..4 {
                buf.put_pixel(x, y, [0, 0, 200, 255]);
            }
        }
        pixelate(&mut buf, 2);
        assert_eq!(buf.pixel(0, 0), [128, 128, 128, 255]);
        assert_eq!(buf.pixel(1, 1), [128, 128, 128, 255]);
        assert_eq!(buf.pixel(3, 0), [0, 0, 200, 255]);
    }

    #[test]
    fn pixelate_handles_partial_edge_blocks() {
        let mut buf = PixelBuffer::new(5, 5).unwrap();
        buf.fill(Rgba8::opaque(10, 20, 30));
        pixelate(&mut buf, 3);
        for px in buf.data().chunks_exact(4) {
            assert_eq!(px, [10, 20, 30, 255]);
        }
    }

    #[test]
    fn grain_zero_intensity_is_identity() {
        let mut buf = PixelBuffer::new(16, 16).unwrap();
        buf.fill(Rgba8::opaque(40, 80, 120));
        let orig = buf.clone();
        let mut rng = Rng64::new(5);
        film_grain(&mut buf, 0.0, 1, &mut rng);
        assert_eq!(buf, orig);
    }

    #[test]
    fn grain_mean_absolute_noise_tracks_intensity() {
        let mut buf = PixelBuffer::new(128, 128).unwrap();
        buf.fill(Rgba8::opaque(128, 128, 128));
        let mut rng = Rng64::new(42);
        let intensity = 0.2f32;
        film_grain(&mut buf, intensity, 1, &mut rng);

        let mut total = 0.0f64;
        let mut n = 0u64;
        for px in buf.data().chunks_exact(4) {
            total += f64::from((i32::from(px[0]) - 128).abs());
            n += 1;
        }
        let mean_abs = total / n as f64;
        // Uniform(-0.5, 0.5) has mean |x| = 0.25, so expect intensity*255/4.
        let expected = f64::from(intensity) * 255.0 / 4.0;
        assert!(
            (mean_abs - expected).abs() < expected * 0.1,
            "mean abs {mean_abs}, expected about {expected}"
        );
    }

    #[test]
    fn grain_applies_identically_to_rgb() {
        let mut buf = PixelBuffer::new(32, 32).unwrap();
        buf.fill(Rgba8::opaque(100, 100, 100));
        let mut rng = Rng64::new(11);
        film_grain(&mut buf, 0.1, 1, &mut rng);
        for px in buf.data().chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn block_grain_is_coherent_within_blocks() {
        let mut buf = PixelBuffer::new(16, 16).unwrap();
        buf.fill(Rgba8::opaque(128, 128, 128));
        let mut rng = Rng64::new(3);
        film_grain(&mut buf, 0.3, 4, &mut rng);
        for by in 0..4u32 {
            for bx in 0..4u32 {
                let first = buf.pixel(bx * 4, by * 4);
                for dy in 0..4 {
                    for dx in 0..4 {
                        assert_eq!(buf.pixel(bx * 4 + dx, by * 4 + dy), first);
                    }
                }
            }
        }
    }
}
