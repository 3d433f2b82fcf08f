//! The 3D graph box: border edges, verticals, and the base grid.
//!
//! Corner roles depend on the view quadrant: the z-axis corner carries the
//! vertical axis, the front corner faces the viewer, and the back corner is
//! drawn before the surfaces so they can occlude it. The border mask selects
//! edges in three groups (base, verticals, ceiling); see
//! [`crate::plots::border`]. All geometry here lives in the linear axis
//! domain and is clipped to the canvas only, since the base plane may sit
//! below the z range.

use glam::DVec3;

use crate::canvas::Canvas;
use crate::core::axis::AxesRanges3D;
use crate::core::context::RenderContext;
use crate::core::view::{Projection, ViewState};
use crate::plots::Figure3D;

/// Corner roles of the graph box in x/y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCorners {
    pub zaxis: (f64, f64),
    pub back: (f64, f64),
    pub right: (f64, f64),
    pub front: (f64, f64),
    /// Where x-axis decorations sit in y, and y-axis ones in x.
    pub xaxis_y: f64,
    pub yaxis_x: f64,
}

/// Assign corner roles from the view quadrant.
pub fn box_corners(view: &ViewState, axes: &AxesRanges3D) -> BoxCorners {
    let map_view = view.projection == Projection::Map;
    let (rot_x, rot_z) = match view.projection {
        Projection::Free => (view.rot_x, view.rot_z),
        Projection::Map => (180.0, 0.0),
        Projection::Xz => (270.0, 0.0),
        Projection::Yz => (90.0, 90.0),
    };
    // Quadrant math needs angles in [0, 360).
    let rot_x = rot_x.rem_euclid(360.0);
    let rot_z = rot_z.rem_euclid(360.0);

    let quadrant = (rot_z / 90.0) as i32;
    let (zaxis_x, right_x, mut back_y, mut front_y) = if (quadrant + 1) & 2 != 0 {
        (axes.x.max, axes.x.min, axes.y.min, axes.y.max)
    } else {
        (axes.x.min, axes.x.max, axes.y.max, axes.y.min)
    };
    let (zaxis_y, right_y, mut back_x, mut front_x) = if quadrant & 2 != 0 {
        (axes.y.max, axes.y.min, axes.x.max, axes.x.min)
    } else {
        (axes.y.min, axes.y.max, axes.x.min, axes.x.max)
    };

    let quadrant = (rot_x / 90.0) as i32;
    if quadrant & 2 != 0 && !map_view {
        std::mem::swap(&mut front_y, &mut back_y);
        std::mem::swap(&mut front_x, &mut back_x);
    }
    let (xaxis_y, yaxis_x) = if (quadrant + 1) & 2 != 0 {
        // Labels move to the back edges when viewed from below.
        (back_y, back_x)
    } else {
        (front_y, front_x)
    };

    BoxCorners {
        zaxis: (zaxis_x, zaxis_y),
        back: (back_x, back_y),
        right: (right_x, right_y),
        front: (front_x, front_y),
        xaxis_y,
        yaxis_x,
    }
}

/// Which part of the box is being drawn relative to the surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPart {
    /// Edges the surfaces may occlude, drawn before them.
    Back,
    /// Edges drawn over the surfaces.
    Front,
    /// Everything at once.
    All,
    /// Border only, no grid lines.
    BorderOnly,
}

impl GridPart {
    fn back(self) -> bool {
        matches!(self, GridPart::Back | GridPart::All | GridPart::BorderOnly)
    }

    fn front(self) -> bool {
        matches!(self, GridPart::Front | GridPart::All | GridPart::BorderOnly)
    }

    fn grid(self) -> bool {
        !matches!(self, GridPart::BorderOnly)
    }
}

/// Evenly spaced interior tic positions over a possibly inverted range.
pub fn tic_positions(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || min == max {
        return Vec::new();
    }
    let step = (max - min) / (count as f64 + 1.0);
    (1..=count).map(|i| min + step * i as f64).collect()
}

/// Draw the configured part of the graph box and base grid.
pub fn draw_graph_box(
    ctx: &mut RenderContext,
    canvas: &mut dyn Canvas,
    figure: &Figure3D,
    part: GridPart,
) {
    let mask = figure.border_mask;
    if mask == 0 && !figure.grid {
        return;
    }
    canvas.set_line_style(&figure.border_style);
    // Work in the linear domain of the ranges the transform actually used
    // (projection flips included).
    let axes = ctx.transform.axes.linearized();
    let corners = box_corners(&figure.view, &axes);
    let base_z = ctx.transform.base_z;
    let ceiling = ctx.transform.ceiling_z;
    let at = |(x, y): (f64, f64), z: f64| DVec3::new(x, y, z);

    let page = ctx.page_area();
    ctx.with_clip_area(page, |ctx| {
        if figure.view.projection == Projection::Map {
            // Flat rectangle at the base plane.
            if part.back() {
                let path = [
                    (corners.zaxis, corners.back, 2u16),
                    (corners.back, corners.right, 8),
                    (corners.right, corners.front, 4),
                    (corners.front, corners.zaxis, 1),
                ];
                for (from, to, bit) in path {
                    if mask & bit != 0 {
                        ctx.draw_decoration_lin(canvas, at(from, base_z), at(to, base_z));
                    }
                }
            }
        } else {
            // Base edges: the two meeting at the back corner render behind
            // the surfaces, the two meeting at the front corner on top.
            let edges: [(DVec3, DVec3, u16, bool); 12] = [
                (at(corners.front, base_z), at(corners.zaxis, base_z), 0x001, true),
                (at(corners.zaxis, base_z), at(corners.back, base_z), 0x002, false),
                (at(corners.right, base_z), at(corners.front, base_z), 0x004, true),
                (at(corners.back, base_z), at(corners.right, base_z), 0x008, false),
                (at(corners.zaxis, base_z), at(corners.zaxis, ceiling), 0x010, true),
                (at(corners.back, base_z), at(corners.back, ceiling), 0x020, false),
                (at(corners.right, base_z), at(corners.right, ceiling), 0x040, true),
                (at(corners.front, base_z), at(corners.front, ceiling), 0x080, true),
                (at(corners.front, ceiling), at(corners.zaxis, ceiling), 0x100, true),
                (at(corners.zaxis, ceiling), at(corners.back, ceiling), 0x200, false),
                (at(corners.right, ceiling), at(corners.front, ceiling), 0x400, true),
                (at(corners.back, ceiling), at(corners.right, ceiling), 0x800, false),
            ];
            for (a, b, bit, is_front) in edges {
                if mask & bit == 0 {
                    continue;
                }
                if (is_front && part.front()) || (!is_front && part.back()) {
                    ctx.draw_decoration_lin(canvas, a, b);
                }
            }
        }

        if figure.grid && part.grid() && part.back() {
            canvas.set_line_style(&figure.grid_style);
            for x in tic_positions(axes.x.min, axes.x.max, figure.tics_per_axis) {
                ctx.draw_decoration_lin(
                    canvas,
                    DVec3::new(x, axes.y.min, base_z),
                    DVec3::new(x, axes.y.max, base_z),
                );
            }
            for y in tic_positions(axes.y.min, axes.y.max, figure.tics_per_axis) {
                ctx.draw_decoration_lin(
                    canvas,
                    DVec3::new(axes.x.min, y, base_z),
                    DVec3::new(axes.x.max, y, base_z),
                );
            }
            canvas.set_line_style(&figure.border_style);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::axis::AxisRange;

    fn axes() -> AxesRanges3D {
        AxesRanges3D::new(
            AxisRange::new(0.0, 10.0),
            AxisRange::new(0.0, 20.0),
            AxisRange::new(0.0, 1.0),
        )
    }

    fn view_with_rot(rot_z: f64) -> ViewState {
        ViewState {
            rot_z,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_quadrant_corners() {
        let c = box_corners(&view_with_rot(30.0), &axes());
        assert_eq!(c.zaxis, (0.0, 0.0));
        assert_eq!(c.right, (10.0, 20.0));
        assert_eq!(c.back, (0.0, 20.0));
        assert_eq!(c.front, (10.0, 0.0));
    }

    #[test]
    fn test_second_quadrant_swaps_roles() {
        let c = box_corners(&view_with_rot(120.0), &axes());
        assert_eq!(c.zaxis, (10.0, 0.0));
        assert_eq!(c.right, (0.0, 20.0));
        assert_eq!(c.back, (0.0, 0.0));
        assert_eq!(c.front, (10.0, 20.0));
    }

    #[test]
    fn test_corners_cover_all_four_xy_combinations() {
        for rot_z in [10.0, 100.0, 190.0, 280.0] {
            let c = box_corners(&view_with_rot(rot_z), &axes());
            let mut seen: Vec<(i64, i64)> = [c.zaxis, c.back, c.right, c.front]
                .iter()
                .map(|&(x, y)| (x as i64, y as i64))
                .collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), 4, "rot_z={rot_z}");
        }
    }

    #[test]
    fn test_negative_rotation_wraps_into_quadrant() {
        // -330 and 30 are the same viewing direction and must agree.
        let wrapped = box_corners(&view_with_rot(-330.0), &axes());
        let direct = box_corners(&view_with_rot(30.0), &axes());
        assert_eq!(wrapped, direct);

        let wrapped = box_corners(&view_with_rot(-170.0), &axes());
        let direct = box_corners(&view_with_rot(190.0), &axes());
        assert_eq!(wrapped, direct);
    }

    #[test]
    fn test_tic_positions_interior_only() {
        let tics = tic_positions(0.0, 10.0, 4);
        assert_eq!(tics, vec![2.0, 4.0, 6.0, 8.0]);
        assert!(tic_positions(5.0, 5.0, 4).is_empty());
    }
}
