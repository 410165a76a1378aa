//! Compositional guide overlays.
//!
//! Pure geometry drawn on top of the finished frame, no pixel sampling: the
//! guides are derived from the current frame dimensions each tick. All
//! strokes are semi-transparent white and dashed, except the golden spiral
//! which is stroked solid.

use kurbo::{Arc, Point, Rect, Vec2};

use crate::foundation::core::PixelBuffer;
use crate::raster::{StrokeStyle, stroke_segments, stroke_shape};

/// Compositional guide selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayKind {
    #[default]
    None,
    RuleOfThirds,
    GoldenRatio,
    GoldenSpiral,
    Diagonal,
    CenterCross,
}

const PHI: f64 = 1.618_033_988_749_894_8;
const GUIDE_ALPHA: f32 = 0.5;
const DASH: (f32, f32) = (6.0, 6.0);

fn dashed() -> StrokeStyle {
    StrokeStyle {
        color: [255, 255, 255],
        alpha: GUIDE_ALPHA,
        width: 1.0,
        dash: Some(DASH),
    }
}

fn solid() -> StrokeStyle {
    StrokeStyle {
        color: [255, 255, 255],
        alpha: GUIDE_ALPHA,
        width: 1.0,
        dash: None,
    }
}

/// Draw the selected guide over `buf`.
pub fn draw_overlay(buf: &mut PixelBuffer, kind: OverlayKind) {
    let w = f64::from(buf.width());
    let h = f64::from(buf.height());
    match kind {
        OverlayKind::None => {}
        OverlayKind::RuleOfThirds => {
            lines(
                buf,
                &[
                    vertical(w / 3.0, h),
                    vertical(2.0 * w / 3.0, h),
                    horizontal(h / 3.0, w),
                    horizontal(2.0 * h / 3.0, w),
                ],
            );
        }
        OverlayKind::GoldenRatio => {
            lines(
                buf,
                &[
                    vertical(w / PHI, h),
                    vertical(w - w / PHI, h),
                    horizontal(h / PHI, w),
                    horizontal(h - h / PHI, w),
                ],
            );
        }
        OverlayKind::GoldenSpiral => draw_golden_spiral(buf, w, h),
        OverlayKind::Diagonal => {
            lines(
                buf,
                &[
                    (Point::new(0.0, 0.0), Point::new(w, h)),
                    (Point::new(w, 0.0), Point::new(0.0, h)),
                ],
            );
        }
        OverlayKind::CenterCross => {
            lines(buf, &[vertical(w / 2.0, h), horizontal(h / 2.0, w)]);
        }
    }
}

fn vertical(x: f64, h: f64) -> (Point, Point) {
    (Point::new(x, 0.0), Point::new(x, h))
}

fn horizontal(y: f64, w: f64) -> (Point, Point) {
    (Point::new(0.0, y), Point::new(w, y))
}

fn lines(buf: &mut PixelBuffer, segments: &[(Point, Point)]) {
    for &seg in segments {
        stroke_segments(buf, &[seg], &dashed());
    }
}

// Square-carving directions, cycled in order.
#[derive(Clone, Copy)]
enum Carve {
    Right,
    Bottom,
    Left,
    Top,
}

const CARVE_ORDER: [Carve; 4] = [Carve::Right, Carve::Bottom, Carve::Left, Carve::Top];
const MAX_SPIRAL_ITERATIONS: usize = 10;
const MIN_SPIRAL_DIM: f64 = 6.0;

/// Fit the largest golden rectangle centered in the frame, then repeatedly
/// carve off squares (right, bottom, left, top, ...), stroking each square
/// and inscribing a quarter-circle arc whose center and angle follow the
/// carve direction. The arcs join into a continuous spiral approximation.
fn draw_golden_spiral(buf: &mut PixelBuffer, w: f64, h: f64) {
    let style = solid();

    let (rw, rh) = if w / h > PHI { (h * PHI, h) } else { (w, w / PHI) };
    let mut x = (w - rw) / 2.0;
    let mut y = (h - rh) / 2.0;
    let mut cur_w = rw;
    let mut cur_h = rh;

    for i in 0..MAX_SPIRAL_ITERATIONS {
        if cur_w.min(cur_h) < MIN_SPIRAL_DIM {
            break;
        }
        let carve = CARVE_ORDER[i % 4];
        let (square, arc) = match carve {
            Carve::Right => {
                let s = cur_h;
                let sq = Rect::new(x + cur_w - s, y, x + cur_w, y + s);
                cur_w -= s;
                // Quarter arc centered on the square's top-left corner.
                (sq, quarter_arc(Point::new(sq.x0, sq.y0), s, 0.0))
            }
            Carve::Bottom => {
                let s = cur_w;
                let sq = Rect::new(x, y + cur_h - s, x + s, y + cur_h);
                cur_h -= s;
                (sq, quarter_arc(Point::new(sq.x1, sq.y0), s, std::f64::consts::FRAC_PI_2))
            }
            Carve::Left => {
                let s = cur_h;
                let sq = Rect::new(x, y, x + s, y + s);
                x += s;
                cur_w -= s;
                (sq, quarter_arc(Point::new(sq.x1, sq.y1), s, std::f64::consts::PI))
            }
            Carve::Top => {
                let s = cur_w;
                let sq = Rect::new(x, y, x + s, y + s);
                y += s;
                cur_h -= s;
                (
                    sq,
                    quarter_arc(Point::new(sq.x0, sq.y1), s, 3.0 * std::f64::consts::FRAC_PI_2),
                )
            }
        };
        stroke_shape(buf, &square, &style);
        stroke_shape(buf, &arc, &style);
    }
}

fn quarter_arc(center: Point, radius: f64, start_angle: f64) -> Arc {
    Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle,
        sweep_angle: std::f64::consts::FRAC_PI_2,
        x_rotation: 0.0,
    }
}
