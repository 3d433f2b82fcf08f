//! 3D scene projection and rendering.
//!
//! `surfplot` turns sampled surfaces into drawing primitives for an abstract
//! canvas: an orthographic view transform with free rotation or fixed
//! map/xz/yz projections, clipping against the axis cuboid, a painter's
//! algorithm depth queue for filled fragments, and a two-pass legend layout.
//!
//! ```no_run
//! use surfplot::plots::{Figure3D, SurfacePlot3D};
//! use surfplot::canvas::RecordingCanvas;
//!
//! let mut figure = Figure3D::new();
//! figure.add_plot(
//!     SurfacePlot3D::from_grid(
//!         &[0.0, 0.5, 1.0],
//!         &[0.0, 0.5, 1.0],
//!         |x, y| (x * x + y * y).sqrt(),
//!     )
//!     .with_title("r"),
//! );
//! figure.autoscale();
//! let mut canvas = RecordingCanvas::new(800, 600);
//! surfplot::render(&figure, &mut canvas).unwrap();
//! ```

pub mod canvas;
pub mod core;
pub mod error;
pub mod plots;
pub mod render;
pub mod styling;

pub use canvas::{Canvas, CanvasMetrics, RecordingCanvas, ScreenPoint};
pub use core::{
    AxesRanges3D, AxisRange, BasePlane, Projection, RenderContext, ViewState, ViewTransform,
};
pub use error::{PlotError, Result};
pub use plots::{Figure3D, PlotStyle, SurfacePlot3D};
pub use render::render;
