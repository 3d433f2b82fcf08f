//! Per-pass render state.
//!
//! One `RenderContext` is built at the start of a render pass and threaded
//! through every drawing stage, replacing any notion of shared mutable
//! globals. It owns the frozen view transform, the computed boundary, the
//! segment clipper, and the depth queue, and offers the clipped drawing
//! helpers the style drawers are written against.

use glam::DVec3;

use crate::canvas::{Canvas, ScreenPoint};
use crate::core::axis::AxesRanges3D;
use crate::core::boundary::{Boundary, PlotBounds};
use crate::core::clip::{classify, clip_line_2d, clip_point_2d, LineClipping, PointClass, SegmentClipper};
use crate::core::depth::DepthQueue;
use crate::core::view::ViewTransform;
use crate::styling::FillStyle;

/// All state one render pass needs, owned for the duration of the pass.
pub struct RenderContext {
    pub transform: ViewTransform,
    pub boundary: Boundary,
    pub clipper: SegmentClipper,
    pub depth: DepthQueue,
    /// The axis ranges in the linear domain; classification and clipping
    /// run against these.
    lin_axes: AxesRanges3D,
    /// 2D clip rectangle for primitives drawn straight to the canvas.
    /// None when the device clips natively.
    clip_area: Option<PlotBounds>,
    /// The full canvas as a clip rectangle, for decorations allowed to
    /// escape the plot rectangle.
    page_area: Option<PlotBounds>,
}

impl RenderContext {
    pub fn new(
        transform: ViewTransform,
        boundary: Boundary,
        policy: LineClipping,
        clip_area: Option<PlotBounds>,
    ) -> Self {
        let lin_axes = transform.axes.linearized();
        let clipper = SegmentClipper::new(&lin_axes, policy);
        Self {
            transform,
            boundary,
            clipper,
            depth: DepthQueue::new(),
            lin_axes,
            clip_area,
            page_area: None,
        }
    }

    pub fn set_page_area(&mut self, area: Option<PlotBounds>) {
        self.page_area = area;
    }

    pub fn page_area(&self) -> Option<PlotBounds> {
        self.page_area
    }

    /// The linear-domain axis ranges.
    pub fn lin_axes(&self) -> &AxesRanges3D {
        &self.lin_axes
    }

    /// Map a data-domain point into the linear domain.
    pub fn lin(&self, p: DVec3) -> DVec3 {
        let (x, y, z) = self.transform.axes.normalize_point(p.x, p.y, p.z);
        DVec3::new(x, y, z)
    }

    /// Classify a linear-domain point against the scene cuboid.
    pub fn classify(&self, p: DVec3) -> PointClass {
        classify(p, &self.lin_axes)
    }

    pub fn clip_area(&self) -> Option<PlotBounds> {
        self.clip_area
    }

    /// Temporarily widen or drop the 2D clip rectangle (labels and arrows
    /// may run outside the plot rectangle but not off the canvas).
    pub fn with_clip_area<R>(
        &mut self,
        area: Option<PlotBounds>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.clip_area;
        self.clip_area = area;
        let r = f(self);
        self.clip_area = saved;
        r
    }

    /// Draw one data-domain segment, applying the 3D clip policy and then
    /// the 2D clip rectangle. Returns true when anything was emitted.
    pub fn draw_segment_3d(&mut self, canvas: &mut dyn Canvas, a: DVec3, b: DVec3) -> bool {
        let (a, b) = (self.lin(a), self.lin(b));
        let (ca, cb) = (self.classify(a), self.classify(b));
        let Some((a, b)) = self.clipper.clip_segment(a, ca, b, cb) else {
            return false;
        };
        let (pa, _) = self.transform.project(a.x, a.y, a.z);
        let (pb, _) = self.transform.project(b.x, b.y, b.z);
        self.draw_segment_2d(canvas, pa, pb)
    }

    /// Project two linear-domain points and draw the segment with only the
    /// 2D clip, bypassing the scene cuboid. Decorations such as the graph
    /// box run partly outside the z range and must not be clipped away.
    pub fn draw_decoration_lin(&mut self, canvas: &mut dyn Canvas, a: DVec3, b: DVec3) -> bool {
        let (pa, _) = self.transform.project(a.x, a.y, a.z);
        let (pb, _) = self.transform.project(b.x, b.y, b.z);
        self.draw_segment_2d(canvas, pa, pb)
    }

    /// Draw a pixel segment clipped to the current 2D clip rectangle.
    pub fn draw_segment_2d(
        &self,
        canvas: &mut dyn Canvas,
        mut a: ScreenPoint,
        mut b: ScreenPoint,
    ) -> bool {
        if let Some(rect) = &self.clip_area {
            if !clip_line_2d(&mut a, &mut b, rect) {
                return false;
            }
        }
        canvas.move_to(a);
        canvas.line_to(b);
        true
    }

    /// True when the pixel point survives the current 2D clip rectangle.
    pub fn point_visible_2d(&self, p: ScreenPoint) -> bool {
        match &self.clip_area {
            Some(rect) => clip_point_2d(p, rect),
            None => true,
        }
    }

    /// Project a data-domain quadrangle and queue it for depth-ordered fill.
    /// Fragments with any non-finite corner are dropped.
    pub fn queue_quad(&mut self, corners: &[DVec3], fill: FillStyle) {
        let lin: Vec<DVec3> = corners.iter().map(|c| self.lin(*c)).collect();
        self.queue_quad_lin(&lin, fill);
    }

    /// [`queue_quad`](Self::queue_quad) for corners already in the linear
    /// domain (fills touching the base plane are built there).
    pub fn queue_quad_lin(&mut self, corners: &[DVec3], fill: FillStyle) {
        let mut vertices = Vec::with_capacity(corners.len());
        let mut depths = Vec::with_capacity(corners.len());
        for c in corners {
            if !c.x.is_finite() || !c.y.is_finite() || !c.z.is_finite() {
                return;
            }
            let (p, d) = self.transform.project(c.x, c.y, c.z);
            vertices.push(p);
            depths.push(d);
        }
        self.depth.submit(vertices, &depths, fill);
    }

    /// Project a data-domain point, returning its pixel position and depth
    /// only when it is in range.
    pub fn project_visible(&self, p: DVec3) -> Option<(ScreenPoint, f64)> {
        let p = self.lin(p);
        if self.classify(p) != PointClass::InRange {
            return None;
        }
        let (sp, depth) = self.transform.project(p.x, p.y, p.z);
        if !self.point_visible_2d(sp) {
            return None;
        }
        Some((sp, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasMetrics, RecordingCanvas};
    use crate::core::axis::{AxesRanges3D, AxisRange};
    use crate::core::boundary::{compute_boundary, BoundaryInput, KeyConfig, KeySizing, Margins};
    use crate::core::view::{BasePlane, ViewState, ViewTransform};

    fn test_context() -> RenderContext {
        let axes = AxesRanges3D::new(
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
        );
        let key = KeyConfig {
            visible: false,
            ..Default::default()
        };
        let boundary = compute_boundary(&BoundaryInput {
            metrics: CanvasMetrics::default(),
            margins: Margins::default(),
            key: &key,
            sizing: KeySizing::default(),
            title_lines: 0,
            surface_scale: 1.0,
            square: false,
            map_view: false,
            aspect: None,
        });
        let transform = ViewTransform::build(
            &ViewState::default(),
            &axes,
            BasePlane::Relative(0.0),
            true,
            boundary.screen,
        )
        .unwrap();
        RenderContext::new(transform, boundary, LineClipping::default(), None)
    }

    #[test]
    fn test_in_range_segment_drawn() {
        let mut ctx = test_context();
        let mut canvas = RecordingCanvas::new(800, 600);
        let drawn = ctx.draw_segment_3d(
            &mut canvas,
            DVec3::new(0.1, 0.1, 0.1),
            DVec3::new(0.9, 0.9, 0.9),
        );
        assert!(drawn);
        assert_eq!(canvas.line_count(), 1);
    }

    #[test]
    fn test_out_of_range_segment_suppressed() {
        let mut ctx = test_context();
        let mut canvas = RecordingCanvas::new(800, 600);
        let drawn = ctx.draw_segment_3d(
            &mut canvas,
            DVec3::new(2.0, 2.0, 2.0),
            DVec3::new(3.0, 3.0, 3.0),
        );
        assert!(!drawn);
        assert_eq!(canvas.line_count(), 0);
    }

    #[test]
    fn test_clip_area_restored() {
        let mut ctx = test_context();
        let rect = ctx.boundary.bounds;
        ctx.with_clip_area(Some(rect), |inner| {
            assert_eq!(inner.clip_area(), Some(rect));
        });
        assert_eq!(ctx.clip_area(), None);
    }
}
