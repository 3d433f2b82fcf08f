//! Scene rendering: graph box, legend, style drawers, and the pipeline.

pub mod contour;
pub mod graphbox;
pub mod key;
pub mod pipeline;
pub mod styles;

pub use graphbox::{box_corners, draw_graph_box, BoxCorners, GridPart};
pub use key::{layout_key, KeyGeometry, KeyPass};
pub use pipeline::render;
pub use styles::{drawer_for, Drawer};
