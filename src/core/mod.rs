//! Projection, layout, clipping, and depth-ordering primitives.

pub mod axis;
pub mod boundary;
pub mod clip;
pub mod context;
pub mod depth;
pub mod view;

pub use axis::{AxesRanges3D, AxisLink, AxisRange};
pub use boundary::{
    compute_boundary, Boundary, BoundaryInput, KeyAnchor, KeyConfig, KeyPlacement,
    KeyReservation, KeySizing, MarginSpec, Margins, PlotBounds, ScreenScale,
};
pub use clip::{classify, LineClipping, PointClass, SegmentClipper};
pub use context::RenderContext;
pub use depth::{DepthQueue, Fragment};
pub use view::{BasePlane, Projection, ViewAspect, ViewState, ViewTransform};
