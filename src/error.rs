//! Error taxonomy for the rendering core.
//!
//! Configuration problems are fatal to the render pass and abort before any
//! drawing happens for the offending plot. Data problems (undefined points)
//! are not errors; they break line continuity silently.

use thiserror::Error;

/// Errors produced while building a view transform or running a render pass.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("{axis} axis range is degenerate: min == max ({value})")]
    DegenerateAxis { axis: &'static str, value: f64 },
    #[error("non-linear {axis} axis link is not monotonic over [{min}, {max}]")]
    NonMonotonicLink {
        axis: &'static str,
        min: f64,
        max: f64,
    },
    #[error("cannot render in polar coordinates with a 3D projection")]
    PolarConflict,
    #[error("plot style {style:?} is not supported in the current projection mode")]
    UnsupportedStyle { style: crate::plots::PlotStyle },
}

pub type Result<T> = std::result::Result<T, PlotError>;
