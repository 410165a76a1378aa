//! Frame surface painter: a rectangular border ring.

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{RetroError, RetroResult};
use crate::settings::FrameSettings;

/// Paint `src` into `dst` unchanged, then a `thickness`-pixel border ring in
/// the configured color on all four edges (square mitered corners).
pub fn paint(dst: &mut PixelBuffer, src: &PixelBuffer, settings: &FrameSettings) -> RetroResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(RetroError::evaluation(
            "frame painter expects equal-size source and destination",
        ));
    }
    dst.copy_from(src)?;

    let w = dst.width();
    let h = dst.height();
    let t = settings.thickness;
    if t == 0 {
        return Ok(());
    }
    let [r, g, b] = settings.color;
    let px = [r, g, b, 255];

    for y in 0..h {
        let edge_row = y < t || y >= h.saturating_sub(t);
        for x in 0..w {
            if edge_row || x < t || x >= w.saturating_sub(t) {
                dst.put_pixel(x, y, px);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8;

    #[test]
    fn white_ring_on_black_buffer() {
        let mut src = PixelBuffer::new(200, 200).unwrap();
        src.fill(Rgba8::BLACK);
        let mut dst = PixelBuffer::new(200, 200).unwrap();
        let settings = FrameSettings {
            thickness: 10,
            color: [255, 255, 255],
        };
        paint(&mut dst, &src, &settings).unwrap();

        for y in 0..200u32 {
            for x in 0..200u32 {
                let in_ring = x < 10 || x >= 190 || y < 10 || y >= 190;
                let expected = if in_ring {
                    [255, 255, 255, 255]
                } else {
                    [0, 0, 0, 255]
                };
                assert_eq!(dst.pixel(x, y), expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn zero_thickness_passes_source_through() {
        let mut src = PixelBuffer::new(8, 8).unwrap();
        src.fill(Rgba8::opaque(9, 9, 9));
        let mut dst = PixelBuffer::new(8, 8).unwrap();
        let settings = FrameSettings {
            thickness: 0,
            color: [1, 2, 3],
        };
        paint(&mut dst, &src, &settings).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn oversized_thickness_fills_everything() {
        let mut src = PixelBuffer::new(6, 6).unwrap();
        src.fill(Rgba8::BLACK);
        let mut dst = PixelBuffer::new(6, 6).unwrap();
        let settings = FrameSettings {
            thickness: 10,
            color: [20, 30, 40],
        };
        paint(&mut dst, &src, &settings).unwrap();
        for px in dst.data().chunks_exact(4) {
            assert_eq!(px, [20, 30, 40, 255]);
        }
    }

    #[test]
    fn rejects_mismatched_surfaces() {
        let src = PixelBuffer::new(8, 8).unwrap();
        let mut dst = PixelBuffer::new(8, 9).unwrap();
        assert!(paint(&mut dst, &src, &FrameSettings::default()).is_err());
    }
}
