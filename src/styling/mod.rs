//! Appearance records consumed by drawers and the legend.
//!
//! These are plain read-only inputs to the render pipeline; devices interpret
//! them as best they can (a monochrome canvas may ignore colors entirely).

use glam::{Vec3, Vec4};

/// Dash pattern for line drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

/// Line appearance for borders, grids, curves, and key samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Vec4,
    pub width: f32,
    pub dash: DashStyle,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            width: 1.0,
            dash: DashStyle::Solid,
        }
    }
}

impl LineStyle {
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_dash(mut self, dash: DashStyle) -> Self {
        self.dash = dash;
        self
    }
}

/// Marker shape for point-style plots and key point samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointStyle {
    #[default]
    Dot,
    Plus,
    Cross,
    Circle,
    Square,
    Triangle,
}

/// Fill appearance for polygon fragments, boxes, and the opaque key blank.
#[derive(Debug, Clone, PartialEq)]
pub struct FillStyle {
    pub color: Vec4,
    /// Opaque fills fully occlude; translucent ones rely on depth ordering.
    pub opaque: bool,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            opaque: true,
        }
    }
}

impl FillStyle {
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            opaque: color.w >= 1.0,
        }
    }
}

/// Color mapping schemes for palette-filled surfaces and contour levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMap {
    Jet,
    Hot,
    Gray,
    Viridis,
    /// Linear blend between two endpoint colors.
    Custom(Vec4, Vec4),
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::Viridis
    }
}

impl ColorMap {
    /// Map a normalized value [0,1] to a color.
    pub fn map_value(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorMap::Jet => {
                let r = (1.5 - 4.0 * (t - 0.75).abs()).clamp(0.0, 1.0);
                let g = (1.5 - 4.0 * (t - 0.5).abs()).clamp(0.0, 1.0);
                let b = (1.5 - 4.0 * (t - 0.25).abs()).clamp(0.0, 1.0);
                Vec3::new(r, g, b)
            }
            ColorMap::Hot => {
                if t < 1.0 / 3.0 {
                    Vec3::new(3.0 * t, 0.0, 0.0)
                } else if t < 2.0 / 3.0 {
                    Vec3::new(1.0, 3.0 * t - 1.0, 0.0)
                } else {
                    Vec3::new(1.0, 1.0, 3.0 * t - 2.0)
                }
            }
            ColorMap::Gray => Vec3::splat(t),
            ColorMap::Viridis => {
                let r = (0.267004 + t * (0.993248 - 0.267004)).clamp(0.0, 1.0);
                let g = (0.004874 + t * (0.906157 - 0.004874)).clamp(0.0, 1.0);
                let b = (0.329415 + t * (0.143936 - 0.329415) + t * t * 0.5).clamp(0.0, 1.0);
                Vec3::new(r, g, b)
            }
            ColorMap::Custom(lo, hi) => lo.truncate().lerp(hi.truncate(), t),
        }
    }

    /// Map a value within `[min, max]` to an opaque fill.
    pub fn fill_for(&self, value: f64, min: f64, max: f64) -> FillStyle {
        let span = (max - min).abs().max(f64::MIN_POSITIVE);
        let t = ((value - min) / span) as f32;
        FillStyle::new(self.map_value(t).extend(1.0))
    }
}
