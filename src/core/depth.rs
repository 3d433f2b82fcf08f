//! Painter's-algorithm depth queue for filled fragments.
//!
//! Filled quadrangles are not drawn where they are generated; they are
//! queued with their view-space depth and flushed far-to-near. The sort is
//! stable, so fragments at equal depth keep submission order. Callers decide
//! the flush granularity: per surface for per-plot occlusion, or one flush at
//! scene end for cross-surface depth ordering.

use crate::canvas::{Canvas, ScreenPoint};
use crate::styling::FillStyle;

/// One filled quadrangle (or triangle) awaiting depth-ordered emission.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub vertices: Vec<ScreenPoint>,
    /// View-space depth; larger is nearer the viewer.
    pub depth: f64,
    pub fill: FillStyle,
}

/// Depth-ordered emission queue.
#[derive(Debug, Default)]
pub struct DepthQueue {
    fragments: Vec<Fragment>,
}

impl DepthQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fragment whose depth is the mean of its vertex depths.
    pub fn submit(&mut self, vertices: Vec<ScreenPoint>, vertex_depths: &[f64], fill: FillStyle) {
        debug_assert_eq!(vertices.len(), vertex_depths.len());
        if vertices.len() < 3 || vertex_depths.iter().any(|d| d.is_nan()) {
            return;
        }
        let depth = vertex_depths.iter().sum::<f64>() / vertex_depths.len() as f64;
        self.submit_at(vertices, depth, fill);
    }

    /// Queue a fragment with an explicit depth.
    pub fn submit_at(&mut self, vertices: Vec<ScreenPoint>, depth: f64, fill: FillStyle) {
        self.fragments.push(Fragment {
            vertices,
            depth,
            fill,
        });
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Sort far-to-near and emit everything queued so far.
    pub fn flush(&mut self, canvas: &mut dyn Canvas) {
        if self.fragments.is_empty() {
            return;
        }
        log::trace!(target: "surfplot", "depth flush: {} fragments", self.fragments.len());
        self.fragments
            .sort_by(|a, b| a.depth.total_cmp(&b.depth));
        for frag in self.fragments.drain(..) {
            canvas.fill_polygon(&frag.vertices, &frag.fill);
        }
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use glam::Vec4;

    fn quad(tag: i32) -> Vec<ScreenPoint> {
        vec![
            ScreenPoint::new(tag, 0),
            ScreenPoint::new(tag + 1, 0),
            ScreenPoint::new(tag + 1, 1),
            ScreenPoint::new(tag, 1),
        ]
    }

    fn fill() -> FillStyle {
        FillStyle::new(Vec4::new(0.5, 0.5, 0.5, 1.0))
    }

    fn first_vertex_tags(canvas: &RecordingCanvas) -> Vec<i32> {
        canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillPolygon(v, _) => Some(v[0].x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_flush_is_far_to_near_and_stable() {
        // Depths [3, 1, 2, 1]: the two depth-1 fragments keep submission
        // order, then depth 2, then depth 3.
        let mut queue = DepthQueue::new();
        for (tag, depth) in [(0, 3.0), (1, 1.0), (2, 2.0), (3, 1.0)] {
            queue.submit_at(quad(tag), depth, fill());
        }
        let mut canvas = RecordingCanvas::new(100, 100);
        queue.flush(&mut canvas);
        assert_eq!(first_vertex_tags(&canvas), vec![1, 3, 2, 0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mean_vertex_depth() {
        let mut queue = DepthQueue::new();
        queue.submit(quad(0), &[0.0, 1.0, 2.0, 3.0], fill());
        assert_eq!(queue.fragments[0].depth, 1.5);
    }

    #[test]
    fn test_nan_depth_dropped() {
        let mut queue = DepthQueue::new();
        queue.submit(quad(0), &[0.0, f64::NAN, 2.0, 3.0], fill());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_degenerate_fragment_dropped() {
        let mut queue = DepthQueue::new();
        queue.submit(
            vec![ScreenPoint::new(0, 0), ScreenPoint::new(1, 1)],
            &[0.0, 1.0],
            fill(),
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_flush_drains() {
        let mut queue = DepthQueue::new();
        queue.submit_at(quad(0), 1.0, fill());
        let mut canvas = RecordingCanvas::new(100, 100);
        queue.flush(&mut canvas);
        queue.flush(&mut canvas);
        assert_eq!(canvas.filled_polygons().len(), 1);
    }
}
