//! Clipping against the scene cuboid and the canvas.
//!
//! 3D clipping happens in the linearized axis domain, before projection, so
//! depth values computed for relocated endpoints stay meaningful. 2D clipping
//! (for decorations drawn straight onto the canvas) uses outcodes against a
//! pixel rectangle.

use glam::DVec3;

use crate::canvas::ScreenPoint;
use crate::core::axis::AxesRanges3D;
use crate::core::boundary::PlotBounds;

/// Classification of one data point against the axis ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClass {
    InRange,
    OutRange,
    /// Not representable at all (NaN or infinite coordinate). Breaks line
    /// continuity; never clipped against.
    Undefined,
}

/// Classify a point. Totality: every possible input lands in exactly one
/// class.
pub fn classify(p: DVec3, axes: &AxesRanges3D) -> PointClass {
    if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
        PointClass::Undefined
    } else if axes.contains(p.x, p.y, p.z) {
        PointClass::InRange
    } else {
        PointClass::OutRange
    }
}

/// Which partially or fully out-of-range segments get drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClipping {
    /// Draw the in-range part of segments with one endpoint out of range.
    pub partial: bool,
    /// Draw the in-range part of segments whose both endpoints are out of
    /// range but which pass through the scene cuboid.
    pub through: bool,
}

impl Default for LineClipping {
    fn default() -> Self {
        Self {
            partial: true,
            through: false,
        }
    }
}

/// Clips segments to the scene cuboid spanned by the axis ranges.
#[derive(Debug, Clone, Copy)]
pub struct SegmentClipper {
    lo: DVec3,
    hi: DVec3,
    pub policy: LineClipping,
}

impl SegmentClipper {
    pub fn new(axes: &AxesRanges3D, policy: LineClipping) -> Self {
        let (xl, xh) = minmax(axes.x.min, axes.x.max);
        let (yl, yh) = minmax(axes.y.min, axes.y.max);
        let (zl, zh) = minmax(axes.z.min, axes.z.max);
        Self {
            lo: DVec3::new(xl, yl, zl),
            hi: DVec3::new(xh, yh, zh),
            policy,
        }
    }

    /// Parameter interval `[t0, t1]` of `a + t*(b-a)` inside the cuboid.
    fn param_interval(&self, a: DVec3, b: DVec3) -> Option<(f64, f64)> {
        let d = b - a;
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for axis in 0..3 {
            let (av, dv) = (a[axis], d[axis]);
            let (lo, hi) = (self.lo[axis], self.hi[axis]);
            if dv == 0.0 {
                if av < lo || av > hi {
                    return None;
                }
                continue;
            }
            let (mut enter, mut exit) = ((lo - av) / dv, (hi - av) / dv);
            if enter > exit {
                std::mem::swap(&mut enter, &mut exit);
            }
            t0 = t0.max(enter);
            t1 = t1.min(exit);
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Intersection of a segment with exactly one in-range endpoint against
    /// the cuboid surface. `a` must be in range, `b` out of range.
    pub fn edge_intersect(&self, a: DVec3, b: DVec3) -> Option<DVec3> {
        let (_, t1) = self.param_interval(a, b)?;
        Some(a + (b - a) * t1)
    }

    /// Both endpoints out of range: the sub-segment passing through the
    /// cuboid, if any.
    pub fn two_edge_intersect(&self, a: DVec3, b: DVec3) -> Option<(DVec3, DVec3)> {
        let (t0, t1) = self.param_interval(a, b)?;
        if t0 >= t1 {
            return None;
        }
        Some((a + (b - a) * t0, a + (b - a) * t1))
    }

    /// Apply the clip policy to one segment. Returns the drawable portion,
    /// or None when nothing is drawn.
    pub fn clip_segment(
        &self,
        a: DVec3,
        ca: PointClass,
        b: DVec3,
        cb: PointClass,
    ) -> Option<(DVec3, DVec3)> {
        use PointClass::*;
        match (ca, cb) {
            (Undefined, _) | (_, Undefined) => None,
            (InRange, InRange) => Some((a, b)),
            (InRange, OutRange) => {
                if self.policy.partial {
                    self.edge_intersect(a, b).map(|e| (a, e))
                } else {
                    None
                }
            }
            (OutRange, InRange) => {
                if self.policy.partial {
                    self.edge_intersect(b, a).map(|e| (e, b))
                } else {
                    None
                }
            }
            (OutRange, OutRange) => {
                if self.policy.through {
                    self.two_edge_intersect(a, b)
                } else {
                    None
                }
            }
        }
    }
}

fn minmax(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BELOW: u8 = 4;
const ABOVE: u8 = 8;

fn outcode(p: ScreenPoint, rect: &PlotBounds) -> u8 {
    let mut code = 0;
    if p.x < rect.xleft {
        code |= LEFT;
    } else if p.x > rect.xright {
        code |= RIGHT;
    }
    if p.y < rect.ybot {
        code |= BELOW;
    } else if p.y > rect.ytop {
        code |= ABOVE;
    }
    code
}

/// Clip a pixel segment to a rectangle in place. Returns false when the
/// segment lies entirely outside.
pub fn clip_line_2d(p0: &mut ScreenPoint, p1: &mut ScreenPoint, rect: &PlotBounds) -> bool {
    let mut c0 = outcode(*p0, rect);
    let mut c1 = outcode(*p1, rect);
    loop {
        if c0 | c1 == 0 {
            return true;
        }
        if c0 & c1 != 0 {
            return false;
        }
        let out = if c0 != 0 { c0 } else { c1 };
        let (x0, y0) = (p0.x as f64, p0.y as f64);
        let (x1, y1) = (p1.x as f64, p1.y as f64);
        let (x, y);
        if out & ABOVE != 0 {
            x = x0 + (x1 - x0) * (rect.ytop as f64 - y0) / (y1 - y0);
            y = rect.ytop as f64;
        } else if out & BELOW != 0 {
            x = x0 + (x1 - x0) * (rect.ybot as f64 - y0) / (y1 - y0);
            y = rect.ybot as f64;
        } else if out & RIGHT != 0 {
            y = y0 + (y1 - y0) * (rect.xright as f64 - x0) / (x1 - x0);
            x = rect.xright as f64;
        } else {
            y = y0 + (y1 - y0) * (rect.xleft as f64 - x0) / (x1 - x0);
            x = rect.xleft as f64;
        }
        let moved = ScreenPoint::new(x.round() as i32, y.round() as i32);
        if out == c0 {
            *p0 = moved;
            c0 = outcode(*p0, rect);
        } else {
            *p1 = moved;
            c1 = outcode(*p1, rect);
        }
    }
}

/// True when the pixel point lies inside the rectangle.
pub fn clip_point_2d(p: ScreenPoint, rect: &PlotBounds) -> bool {
    outcode(p, rect) == 0
}
