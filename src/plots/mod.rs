//! Scene model: sampled surfaces and the figure that owns them.

pub mod figure;
pub mod surface;

pub use figure::{Arrow3D, DepthOrder, Figure3D, GridLayer, Label3D};
pub use surface::{ContourLevel, IsoCurve, SamplePoint, SurfacePlot3D};

/// How a surface's samples are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlotStyle {
    /// Connect consecutive samples of each iso-curve.
    #[default]
    Lines,
    /// One marker per sample.
    Points,
    /// Lines plus markers.
    LinesPoints,
    /// Vertical stroke from the base plane to each sample.
    Impulses,
    /// Filled box from the base plane to each sample.
    Boxes,
    /// Arrow from each sample along its delta.
    Vectors,
    /// Each iso-curve is an independent filled polygon.
    Polygons,
    /// Area between each iso-curve and the base plane.
    FilledCurves,
    /// Palette-filled quadrangle mesh between adjacent iso-curves.
    Surface,
}

/// Border edge groups, combined into the figure's border mask.
pub mod border {
    /// The four base-plane edges. Individually, bits 1/2/4/8 select the
    /// edges counterclockwise starting from the front-left one; which two
    /// render behind the surface depends on the view quadrant.
    pub const BASE: u16 = 0x0f;
    /// The four vertical edges.
    pub const VERTICALS: u16 = 0xf0;
    /// The four ceiling edges.
    pub const TOP: u16 = 0xf00;
    /// Base plus the front-left vertical, the traditional default.
    pub const DEFAULT: u16 = 0x1f;
    pub const ALL: u16 = 0xfff;
}
