//! The drawing sink consumed by the render pipeline.
//!
//! The pipeline owns a `Canvas` exclusively for the duration of one render
//! pass and talks to it through move/line/point/fill/text primitives. Pixel
//! production (raster, vector, terminal cells) is the implementor's business;
//! the core only needs the primitive set plus a handful of metrics and
//! capability flags.

use crate::styling::{FillStyle, LineStyle, PointStyle};

/// Integer pixel coordinates on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Horizontal text justification relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextJustify {
    Left,
    Center,
    Right,
}

/// Fixed metrics the layout code needs from the device.
#[derive(Debug, Clone, Copy)]
pub struct CanvasMetrics {
    /// Canvas extent in pixels.
    pub width: i32,
    pub height: i32,
    /// Character cell size (width, height) for text/margin estimates.
    pub char_width: i32,
    pub char_height: i32,
    /// Tic mark length (horizontal, vertical).
    pub tic_h: i32,
    pub tic_v: i32,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            char_width: 8,
            char_height: 16,
            tic_h: 5,
            tic_v: 5,
        }
    }
}

/// Abstract drawing device.
///
/// Implementations are single-threaded sinks; the pipeline never issues
/// primitives from more than one pass at a time.
pub trait Canvas {
    fn metrics(&self) -> CanvasMetrics;

    fn move_to(&mut self, p: ScreenPoint);
    fn line_to(&mut self, p: ScreenPoint);
    fn draw_point(&mut self, p: ScreenPoint, style: PointStyle);
    fn fill_polygon(&mut self, vertices: &[ScreenPoint], fill: &FillStyle);
    fn draw_text(&mut self, p: ScreenPoint, text: &str, justify: TextJustify);
    fn set_line_style(&mut self, style: &LineStyle);

    /// Whether the device clips primitives itself. When true the core skips
    /// its own 2D canvas clipping and only clips to the plot box.
    fn can_clip_natively(&self) -> bool {
        false
    }

    /// Monochrome devices get style fallbacks instead of palette fills.
    fn is_monochrome(&self) -> bool {
        false
    }
}

/// One recorded primitive, for test assertions and debugging.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    MoveTo(ScreenPoint),
    LineTo(ScreenPoint),
    Point(ScreenPoint, PointStyle),
    FillPolygon(Vec<ScreenPoint>, FillStyle),
    Text(ScreenPoint, String, TextJustify),
    LineStyle(LineStyle),
}

/// In-memory canvas that records every primitive it receives.
///
/// Used by the integration tests to assert on draw order and geometry, and by
/// callers that want to replay a pass onto a real device later.
#[derive(Debug)]
pub struct RecordingCanvas {
    metrics: CanvasMetrics,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            metrics: CanvasMetrics {
                width,
                height,
                ..Default::default()
            },
            ops: Vec::new(),
        }
    }

    pub fn with_metrics(metrics: CanvasMetrics) -> Self {
        Self {
            metrics,
            ops: Vec::new(),
        }
    }

    /// All filled polygons, in issue order.
    pub fn filled_polygons(&self) -> Vec<(&[ScreenPoint], &FillStyle)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillPolygon(v, f) => Some((v.as_slice(), f)),
                _ => None,
            })
            .collect()
    }

    /// Count of line segments (LineTo ops) issued so far.
    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::LineTo(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn metrics(&self) -> CanvasMetrics {
        self.metrics
    }

    fn move_to(&mut self, p: ScreenPoint) {
        self.ops.push(DrawOp::MoveTo(p));
    }

    fn line_to(&mut self, p: ScreenPoint) {
        self.ops.push(DrawOp::LineTo(p));
    }

    fn draw_point(&mut self, p: ScreenPoint, style: PointStyle) {
        self.ops.push(DrawOp::Point(p, style));
    }

    fn fill_polygon(&mut self, vertices: &[ScreenPoint], fill: &FillStyle) {
        self.ops.push(DrawOp::FillPolygon(vertices.to_vec(), fill.clone()));
    }

    fn draw_text(&mut self, p: ScreenPoint, text: &str, justify: TextJustify) {
        self.ops.push(DrawOp::Text(p, text.to_string(), justify));
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.ops.push(DrawOp::LineStyle(style.clone()));
    }
}
