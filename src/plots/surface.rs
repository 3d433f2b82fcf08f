//! Sampled 3D surfaces.
//!
//! A surface is a sequence of iso-curves, each a polyline of samples at
//! constant parameter. Gridded data carries iso-curves in both directions so
//! the mesh reads as a mesh from any angle; scattered data may carry a single
//! iso-curve per trace.

use glam::DVec3;

use crate::plots::PlotStyle;
use crate::styling::{ColorMap, LineStyle, PointStyle};

/// One data sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub position: DVec3,
    /// Explicit palette value; the sample's z is used when absent.
    pub value: Option<f64>,
    /// Offset to the arrow tip, for the vectors style.
    pub delta: Option<DVec3>,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            value: None,
            delta: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_delta(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.delta = Some(DVec3::new(dx, dy, dz));
        self
    }

    /// Palette value: explicit if set, otherwise the sample height.
    pub fn palette_value(&self) -> f64 {
        self.value.unwrap_or(self.position.z)
    }
}

/// A polyline of samples at constant grid parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsoCurve {
    pub points: Vec<SamplePoint>,
}

impl IsoCurve {
    pub fn new(points: Vec<SamplePoint>) -> Self {
        Self { points }
    }
}

/// One contour level traced on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevel {
    pub z: f64,
    /// Level label shown in the legend. Empty labels get no legend entry.
    pub label: String,
    /// Disconnected polylines tracing the level.
    pub curves: Vec<Vec<DVec3>>,
}

/// One plot in a 3D figure: data plus appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePlot3D {
    pub title: Option<String>,
    pub style: PlotStyle,
    pub line_style: LineStyle,
    pub point_style: PointStyle,
    pub color_map: ColorMap,
    /// Color lines and fills from the palette instead of the line style.
    pub use_palette: bool,
    pub iso_curves: Vec<IsoCurve>,
    /// Iso-curve count in the first grid direction; quadrangle meshing
    /// pairs rows `0..rows` and treats the rest as the cross direction.
    pub rows: usize,
    pub contours: Vec<ContourLevel>,
}

impl Default for SurfacePlot3D {
    fn default() -> Self {
        Self {
            title: None,
            style: PlotStyle::Lines,
            line_style: LineStyle::default(),
            point_style: PointStyle::default(),
            color_map: ColorMap::default(),
            use_palette: false,
            iso_curves: Vec::new(),
            rows: 0,
            contours: Vec::new(),
        }
    }
}

impl SurfacePlot3D {
    pub fn new(style: PlotStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Sample `f` over the cartesian product of `xs` and `ys`, producing
    /// iso-curves in both grid directions.
    pub fn from_grid(xs: &[f64], ys: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        let mut iso_curves = Vec::with_capacity(xs.len() + ys.len());
        for &y in ys {
            let points = xs
                .iter()
                .map(|&x| SamplePoint::new(x, y, f(x, y)))
                .collect();
            iso_curves.push(IsoCurve::new(points));
        }
        let rows = iso_curves.len();
        for &x in xs {
            let points = ys
                .iter()
                .map(|&y| SamplePoint::new(x, y, f(x, y)))
                .collect();
            iso_curves.push(IsoCurve::new(points));
        }
        Self {
            iso_curves,
            rows,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.line_style = style;
        self
    }

    pub fn with_palette(mut self, map: ColorMap) -> Self {
        self.color_map = map;
        self.use_palette = true;
        self
    }

    pub fn add_iso_curve(&mut self, curve: IsoCurve) {
        self.iso_curves.push(curve);
    }

    pub fn add_contour(&mut self, level: ContourLevel) {
        self.contours.push(level);
    }

    /// The iso-curves in the first grid direction, used for quad meshing.
    pub fn grid_rows(&self) -> &[IsoCurve] {
        &self.iso_curves[..self.rows.min(self.iso_curves.len())]
    }

    /// True when a legend entry should be emitted for this plot.
    pub fn wants_key_entry(&self) -> bool {
        matches!(&self.title, Some(t) if !t.is_empty())
    }

    /// Smallest and largest palette value over all samples.
    pub fn palette_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for curve in &self.iso_curves {
            for point in &curve.points {
                let v = point.palette_value();
                if !v.is_finite() {
                    continue;
                }
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        range
    }
}
