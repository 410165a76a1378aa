use crate::foundation::error::{RetroError, RetroResult};

pub use kurbo::{Arc, BezPath, Point, Rect, Vec2};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A mutable RGBA8 raster: origin top-left, row-major, channel order R,G,B,A.
///
/// This is the common currency every filter reads and writes. One working
/// buffer is owned per scheduler tick; filters transform it in place or paint
/// a sibling surface of equal size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> RetroResult<Self> {
        if width == 0 || height == 0 {
            return Err(RetroError::validation("pixel buffer width/height must be > 0"));
        }
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing RGBA8 bytes. `data.len()` must equal `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> RetroResult<Self> {
        if width == 0 || height == 0 {
            return Err(RetroError::validation("pixel buffer width/height must be > 0"));
        }
        if data.len() != byte_len(width, height)? {
            return Err(RetroError::validation(
                "pixel buffer data must match width * height * 4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Byte offset of the pixel at (x, y).
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub fn fill(&mut self, color: Rgba8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Resize, reusing the existing allocation when it is large enough.
    ///
    /// Contents are unspecified after a resize that changes dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        let len = (width as usize) * (height as usize) * 4;
        self.data.resize(len, 0);
        self.width = width;
        self.height = height;
    }

    /// Copy a `self.width x self.height` sub-rectangle of `src` starting at
    /// (`src_x`, `src_y`) into this buffer.
    pub fn copy_rect_from(&mut self, src: &PixelBuffer, src_x: u32, src_y: u32) -> RetroResult<()> {
        if src_x + self.width > src.width || src_y + self.height > src.height {
            return Err(RetroError::evaluation(
                "copy_rect_from source rectangle out of bounds",
            ));
        }
        let row_bytes = (self.width as usize) * 4;
        for y in 0..self.height {
            let s = src.offset(src_x, src_y + y);
            let d = self.offset(0, y);
            self.data[d..d + row_bytes].copy_from_slice(&src.data[s..s + row_bytes]);
        }
        Ok(())
    }

    /// Copy the full contents of `src` (same dimensions required).
    pub fn copy_from(&mut self, src: &PixelBuffer) -> RetroResult<()> {
        if self.width != src.width || self.height != src.height {
            return Err(RetroError::evaluation(
                "copy_from expects equal-size buffers",
            ));
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }
}

fn byte_len(width: u32, height: u32) -> RetroResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RetroError::validation("pixel buffer size overflow"))
}

/// Target crop ratio for incoming source frames.
///
/// `Device` means no crop; every other variant selects the largest centered
/// sub-rectangle of the source matching the target width:height ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "21:9")]
    TwentyOneNine,
    #[serde(rename = "3:2")]
    ThreeTwo,
    #[serde(rename = "5:4")]
    FiveFour,
    #[default]
    #[serde(rename = "device")]
    Device,
}

impl AspectRatio {
    /// Target ratio as (width, height) integer parts; `None` for `Device`.
    pub fn ratio(self) -> Option<(u32, u32)> {
        match self {
            AspectRatio::Square => Some((1, 1)),
            AspectRatio::FourThree => Some((4, 3)),
            AspectRatio::SixteenNine => Some((16, 9)),
            AspectRatio::TwentyOneNine => Some((21, 9)),
            AspectRatio::ThreeTwo => Some((3, 2)),
            AspectRatio::FiveFour => Some((5, 4)),
            AspectRatio::Device => None,
        }
    }

    /// Crop rectangle `(x, y, width, height)` for a source of `w x h`.
    ///
    /// If the source is wider than the target ratio, width is cropped
    /// symmetrically; otherwise height is. `Device` returns the full frame.
    pub fn crop_rect(self, w: u32, h: u32) -> (u32, u32, u32, u32) {
        let Some((num, den)) = self.ratio() else {
            return (0, 0, w, h);
        };
        if w == 0 || h == 0 {
            return (0, 0, w, h);
        }
        let wide = u64::from(w) * u64::from(den) > u64::from(h) * u64::from(num);
        if wide {
            let cw = ((u64::from(h) * u64::from(num)) / u64::from(den)) as u32;
            ((w - cw) / 2, 0, cw, h)
        } else {
            let ch = ((u64::from(w) * u64::from(den)) / u64::from(num)) as u32;
            (0, (h - ch) / 2, w, ch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_rejects_zero_dimensions() {
        assert!(PixelBuffer::new(0, 4).is_err());
        assert!(PixelBuffer::new(4, 0).is_err());
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(PixelBuffer::from_rgba8(2, 2, vec![0u8; 16]).is_ok());
        assert!(PixelBuffer::from_rgba8(2, 2, vec![0u8; 15]).is_err());
    }

    #[test]
    fn pixel_roundtrip() {
        let mut buf = PixelBuffer::new(3, 2).unwrap();
        buf.put_pixel(2, 1, [9, 8, 7, 6]);
        assert_eq!(buf.pixel(2, 1), [9, 8, 7, 6]);
        assert_eq!(buf.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn resize_is_noop_for_same_dimensions() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        buf.put_pixel(1, 1, [1, 2, 3, 4]);
        buf.resize(4, 4);
        assert_eq!(buf.pixel(1, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn copy_rect_from_extracts_centered_window() {
        let mut src = PixelBuffer::new(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                src.put_pixel(x, y, [x as u8, y as u8, 0, 255]);
            }
        }
        let mut dst = PixelBuffer::new(2, 2).unwrap();
        dst.copy_rect_from(&src, 1, 1).unwrap();
        assert_eq!(dst.pixel(0, 0), [1, 1, 0, 255]);
        assert_eq!(dst.pixel(1, 1), [2, 2, 0, 255]);
    }

    #[test]
    fn square_crop_of_1080p_is_centered() {
        let (x, y, w, h) = AspectRatio::Square.crop_rect(1920, 1080);
        assert_eq!((x, y, w, h), (420, 0, 1080, 1080));
    }

    #[test]
    fn device_crop_is_identity() {
        assert_eq!(AspectRatio::Device.crop_rect(1234, 567), (0, 0, 1234, 567));
    }

    #[test]
    fn crop_ratio_matches_target_within_tolerance() {
        for ratio in [
            AspectRatio::Square,
            AspectRatio::FourThree,
            AspectRatio::SixteenNine,
            AspectRatio::TwentyOneNine,
            AspectRatio::ThreeTwo,
            AspectRatio::FiveFour,
        ] {
            let (num, den) = ratio.ratio().unwrap();
            let (_, _, w, h) = ratio.crop_rect(1920, 1080);
            let got = f64::from(w) / f64::from(h);
            let want = f64::from(num) / f64::from(den);
            assert!(
                (got - want).abs() < 2.0 / 1080.0,
                "{ratio:?}: got {got}, want {want}"
            );
        }
    }

    #[test]
    fn portrait_source_crops_height_for_wide_targets() {
        let (x, y, w, h) = AspectRatio::SixteenNine.crop_rect(1080, 1920);
        assert_eq!(x, 0);
        assert_eq!(w, 1080);
        assert_eq!(h, 607); // 1080 * 9 / 16
        assert_eq!(y, (1920 - 607) / 2);
    }

    #[test]
    fn aspect_ratio_serde_names_are_stable() {
        let s = serde_json::to_string(&AspectRatio::SixteenNine).unwrap();
        assert_eq!(s, "\"16:9\"");
        let d: AspectRatio = serde_json::from_str("\"device\"").unwrap();
        assert_eq!(d, AspectRatio::Device);
    }
}
