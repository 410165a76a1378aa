//! Minimal raster stroke primitives over RGBA8 buffers.
//!
//! The overlay renderer expresses guides as kurbo geometry and flattens it to
//! line segments; this module rasterizes those segments. Strokes collect
//! their coverage first and blend each pixel once, so semi-transparent lines
//! do not double-darken where stamps overlap.

use std::collections::HashSet;

use kurbo::{ParamCurve, PathEl, Point, Shape};

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::mul_div255_u8;

/// Stroke appearance: straight-alpha color, width in pixels, and an optional
/// `(on, off)` dash pattern in pixels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StrokeStyle {
    pub color: [u8; 3],
    pub alpha: f32,
    pub width: f32,
    pub dash: Option<(f32, f32)>,
}

/// Source-over one pixel with a straight-alpha color.
pub(crate) fn blend_pixel(buf: &mut PixelBuffer, x: i64, y: i64, color: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 || x >= i64::from(buf.width()) || y >= i64::from(buf.height()) {
        return;
    }
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u16;
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    let i = buf.offset(x as u32, y as u32);
    let data = buf.data_mut();
    for c in 0..3 {
        let s = mul_div255_u8(u16::from(color[c]), a);
        let d = mul_div255_u8(u16::from(data[i + c]), inv);
        data[i + c] = s.saturating_add(d);
    }
    data[i + 3] = data[i + 3].max(a as u8);
}

/// Stroke straight segments with shared dash phase across the sequence.
pub(crate) fn stroke_segments(buf: &mut PixelBuffer, segments: &[(Point, Point)], style: &StrokeStyle) {
    let mut covered: HashSet<(i64, i64)> = HashSet::new();
    let radius = (style.width / 2.0).max(0.0);
    let mut travelled = 0.0f64;

    for &(a, b) in segments {
        let len = a.distance(b);
        if len <= f64::EPSILON {
            continue;
        }
        let steps = (len / 0.5).ceil() as usize;
        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            if let Some((on, off)) = style.dash {
                let phase = (travelled + t * len) % f64::from(on + off);
                if phase >= f64::from(on) {
                    continue;
                }
            }
            let p = a.lerp(b, t);
            stamp(&mut covered, p, radius);
        }
        travelled += len;
    }

    for &(x, y) in &covered {
        blend_pixel(buf, x, y, style.color, style.alpha);
    }
}

fn stamp(covered: &mut HashSet<(i64, i64)>, p: Point, radius: f32) {
    let r = (radius - 0.5).ceil().max(0.0) as i64;
    let px = p.x.floor() as i64;
    let py = p.y.floor() as i64;
    if r == 0 {
        covered.insert((px, py));
        return;
    }
    for dy in -r..=r {
        for dx in -r..=r {
            if ((dx * dx + dy * dy) as f32) <= (radius + 0.5) * (radius + 0.5) {
                covered.insert((px + dx, py + dy));
            }
        }
    }
}

/// Stroke an arbitrary kurbo shape by flattening it to segments.
pub(crate) fn stroke_shape(buf: &mut PixelBuffer, shape: &impl Shape, style: &StrokeStyle) {
    let mut segments = Vec::new();
    let mut start: Option<Point> = None;
    let mut last: Option<Point> = None;
    shape.path_elements(0.1).for_each(|el| match el {
        PathEl::MoveTo(p) => {
            start = Some(p);
            last = Some(p);
        }
        PathEl::LineTo(p) => {
            if let Some(prev) = last {
                segments.push((prev, p));
            }
            last = Some(p);
        }
        PathEl::QuadTo(c, p) => {
            flatten_quad(&mut segments, last, c, p);
            last = Some(p);
        }
        PathEl::CurveTo(c1, c2, p) => {
            flatten_cubic(&mut segments, last, c1, c2, p);
            last = Some(p);
        }
        PathEl::ClosePath => {
            if let (Some(prev), Some(s)) = (last, start) {
                segments.push((prev, s));
            }
            last = start;
        }
    });
    stroke_segments(buf, &segments, style);
}

fn flatten_quad(segments: &mut Vec<(Point, Point)>, last: Option<Point>, c: Point, p: Point) {
    let Some(a) = last else { return };
    let q = kurbo::QuadBez::new(a, c, p);
    let mut prev = a;
    const N: usize = 16;
    for i in 1..=N {
        let t = i as f64 / N as f64;
        let pt = q.eval(t);
        segments.push((prev, pt));
        prev = pt;
    }
}

fn flatten_cubic(
    segments: &mut Vec<(Point, Point)>,
    last: Option<Point>,
    c1: Point,
    c2: Point,
    p: Point,
) {
    let Some(a) = last else { return };
    let c = kurbo::CubicBez::new(a, c1, c2, p);
    let mut prev = a;
    const N: usize = 24;
    for i in 1..=N {
        let t = i as f64 / N as f64;
        let pt = c.eval(t);
        segments.push((prev, pt));
        prev = pt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8;

    fn black(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        buf.fill(Rgba8::BLACK);
        buf
    }

    fn solid_white() -> StrokeStyle {
        StrokeStyle {
            color: [255, 255, 255],
            alpha: 1.0,
            width: 1.0,
            dash: None,
        }
    }

    #[test]
    fn horizontal_line_covers_row() {
        let mut buf = black(16, 8);
        stroke_segments(
            &mut buf,
            &[(Point::new(0.0, 4.0), Point::new(15.0, 4.0))],
            &solid_white(),
        );
        for x in 0..16 {
            assert!(buf.pixel(x, 4)[0] > 0, "x={x}");
        }
        assert_eq!(buf.pixel(8, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn blend_is_applied_once_per_pixel() {
        let mut buf = black(8, 8);
        let style = StrokeStyle {
            alpha: 0.5,
            ..solid_white()
        };
        // Two overlapping collinear segments in one stroke call.
        stroke_segments(
            &mut buf,
            &[
                (Point::new(0.0, 3.0), Point::new(7.0, 3.0)),
                (Point::new(7.0, 3.0), Point::new(0.0, 3.0)),
            ],
            &style,
        );
        assert_eq!(buf.pixel(4, 3)[0], 128);
    }

    #[test]
    fn dashes_leave_gaps() {
        let mut buf = black(64, 4);
        let style = StrokeStyle {
            dash: Some((4.0, 4.0)),
            ..solid_white()
        };
        stroke_segments(
            &mut buf,
            &[(Point::new(0.0, 2.0), Point::new(63.0, 2.0))],
            &style,
        );
        let lit = (0..64).filter(|&x| buf.pixel(x, 2)[0] > 0).count();
        assert!(lit > 16, "dash should light roughly half the row, lit={lit}");
        assert!(lit < 48, "dash should leave gaps, lit={lit}");
    }

    #[test]
    fn out_of_bounds_stamps_are_ignored() {
        let mut buf = black(4, 4);
        stroke_segments(
            &mut buf,
            &[(Point::new(-10.0, -10.0), Point::new(20.0, 20.0))],
            &solid_white(),
        );
        // Diagonal crosses the buffer without panicking.
        assert!(buf.pixel(1, 1)[0] > 0);
    }

    #[test]
    fn stroke_shape_rasterizes_rect_outline() {
        let mut buf = black(16, 16);
        let rect = kurbo::Rect::new(2.0, 2.0, 13.0, 13.0);
        stroke_shape(&mut buf, &rect, &solid_white());
        assert!(buf.pixel(7, 2)[0] > 0);
        assert!(buf.pixel(2, 7)[0] > 0);
        assert_eq!(buf.pixel(7, 7), [0, 0, 0, 255]);
    }
}
