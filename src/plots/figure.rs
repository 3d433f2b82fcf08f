//! The 3D figure: plots plus everything that frames them.

use glam::DVec3;

use crate::canvas::TextJustify;
use crate::core::axis::AxesRanges3D;
use crate::core::boundary::{KeyConfig, KeySizing, Margins};
use crate::core::clip::LineClipping;
use crate::core::view::{BasePlane, ViewState};
use crate::plots::{border, SurfacePlot3D};
use crate::styling::LineStyle;

/// When filled fragments are flushed to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthOrder {
    /// Flush after each surface: later surfaces paint over earlier ones.
    #[default]
    PerSurface,
    /// One flush at scene end: fragments of all surfaces interleave by
    /// depth.
    Scene,
}

/// Which side of the surfaces the base grid is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridLayer {
    /// Back portion before the surfaces, front portion after.
    #[default]
    Split,
    Back,
    Front,
}

/// Free text anchored at a world position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label3D {
    pub text: String,
    pub position: DVec3,
    pub justify: TextJustify,
}

/// An annotation arrow between two world positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow3D {
    pub start: DVec3,
    pub end: DVec3,
    pub style: LineStyle,
    pub head: bool,
}

/// A complete 3D scene, ready to hand to the render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure3D {
    pub plots: Vec<SurfacePlot3D>,
    pub axes: AxesRanges3D,
    pub view: ViewState,
    pub base: BasePlane,
    pub key: KeyConfig,
    pub margins: Margins,
    pub title: Option<String>,
    /// Border edge bitmask, see [`crate::plots::border`]. Zero disables the
    /// border entirely.
    pub border_mask: u16,
    pub border_style: LineStyle,
    /// Draw the base-plane grid at tic positions.
    pub grid: bool,
    pub grid_layer: GridLayer,
    pub grid_style: LineStyle,
    /// Approximate tic spacing count per axis for grid and border tics.
    pub tics_per_axis: usize,
    pub clip: LineClipping,
    pub depth_order: DepthOrder,
    /// Equal pixel extent in x and y.
    pub square: bool,
    /// Requested y/x aspect ratio of the scene, `None` for free.
    pub aspect: Option<f64>,
    /// Set when the caller is in polar mode; 3D rendering rejects it.
    pub polar: bool,
    pub labels: Vec<Label3D>,
    pub arrows: Vec<Arrow3D>,
}

impl Default for Figure3D {
    fn default() -> Self {
        Self {
            plots: Vec::new(),
            axes: AxesRanges3D::new(
                crate::core::axis::AxisRange::new(-10.0, 10.0),
                crate::core::axis::AxisRange::new(-10.0, 10.0),
                crate::core::axis::AxisRange::new(-10.0, 10.0),
            ),
            view: ViewState::default(),
            base: BasePlane::default(),
            key: KeyConfig::default(),
            margins: Margins::default(),
            title: None,
            border_mask: border::DEFAULT,
            border_style: LineStyle::default(),
            grid: false,
            grid_layer: GridLayer::default(),
            grid_style: LineStyle::default().with_width(0.5),
            tics_per_axis: 5,
            clip: LineClipping::default(),
            depth_order: DepthOrder::default(),
            square: false,
            aspect: None,
            polar: false,
            labels: Vec::new(),
            arrows: Vec::new(),
        }
    }
}

impl Figure3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axes(mut self, axes: AxesRanges3D) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_plot(&mut self, plot: SurfacePlot3D) -> &mut Self {
        self.plots.push(plot);
        self
    }

    pub fn add_label(&mut self, label: Label3D) -> &mut Self {
        self.labels.push(label);
        self
    }

    pub fn add_arrow(&mut self, arrow: Arrow3D) -> &mut Self {
        self.arrows.push(arrow);
        self
    }

    /// Grow the axis ranges to cover every sample in every plot.
    pub fn autoscale(&mut self) {
        let mut any = false;
        let (mut lo, mut hi) = (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY));
        for plot in &self.plots {
            for curve in &plot.iso_curves {
                for point in &curve.points {
                    let p = point.position;
                    if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
                        continue;
                    }
                    lo = lo.min(p);
                    hi = hi.max(p);
                    any = true;
                }
            }
        }
        if !any {
            return;
        }
        // A flat dimension still needs a nonzero span to project.
        for axis in 0..3 {
            if lo[axis] == hi[axis] {
                lo[axis] -= 0.5;
                hi[axis] += 0.5;
            }
        }
        self.axes.x.min = lo.x;
        self.axes.x.max = hi.x;
        self.axes.y.min = lo.y;
        self.axes.y.max = hi.y;
        self.axes.z.min = lo.z;
        self.axes.z.max = hi.z;
    }

    /// Lines in the figure title.
    pub fn title_lines(&self) -> i32 {
        match &self.title {
            Some(t) => t.lines().count() as i32,
            None => 0,
        }
    }

    /// Measure what the legend must fit: one entry per titled plot plus one
    /// per labelled contour level.
    pub fn key_sizing(&self) -> KeySizing {
        let mut count = 0;
        let mut max_len = 0usize;
        for plot in &self.plots {
            if plot.wants_key_entry() {
                count += 1;
                if let Some(t) = &plot.title {
                    max_len = max_len.max(t.chars().count());
                }
            }
            for level in &plot.contours {
                if !level.label.is_empty() {
                    count += 1;
                    max_len = max_len.max(level.label.chars().count());
                }
            }
        }
        KeySizing {
            count,
            max_label_chars: max_len as i32,
        }
    }
}
