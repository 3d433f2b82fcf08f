//! Drawing of pre-traced contour levels.
//!
//! Contours arrive as polylines per level; how they are rendered follows the
//! owning plot's style the same way surfaces do: line styles draw connected
//! polylines, point styles draw markers at the trace vertices, and box or
//! impulse styles drop verticals to the base plane.

use crate::canvas::Canvas;
use crate::core::context::RenderContext;
use crate::plots::{ContourLevel, PlotStyle, SurfacePlot3D};
use crate::styling::LineStyle;

/// Style for one level: palette color by level height when requested,
/// otherwise the plot's line style.
pub fn level_style(plot: &SurfacePlot3D, level: &ContourLevel, palette: bool) -> LineStyle {
    if palette {
        if let Some((lo, hi)) = plot.palette_range() {
            let fill = plot.color_map.fill_for(level.z, lo, hi);
            return LineStyle::new(fill.color).with_width(plot.line_style.width);
        }
    }
    plot.line_style.clone()
}

/// Draw one contour level in the idiom of the plot's style.
pub fn draw_level(
    ctx: &mut RenderContext,
    canvas: &mut dyn Canvas,
    plot: &SurfacePlot3D,
    level: &ContourLevel,
) {
    let palette = plot.use_palette && !canvas.is_monochrome();
    canvas.set_line_style(&level_style(plot, level, palette));
    match plot.style {
        PlotStyle::Boxes | PlotStyle::FilledCurves | PlotStyle::Vectors | PlotStyle::Impulses => {
            contour_impulses(ctx, canvas, level)
        }
        PlotStyle::Points => contour_points(ctx, canvas, plot, level),
        PlotStyle::LinesPoints => {
            contour_lines(ctx, canvas, level);
            contour_points(ctx, canvas, plot, level);
        }
        _ => contour_lines(ctx, canvas, level),
    }
}

fn contour_lines(ctx: &mut RenderContext, canvas: &mut dyn Canvas, level: &ContourLevel) {
    for trace in &level.curves {
        for pair in trace.windows(2) {
            ctx.draw_segment_3d(canvas, pair[0], pair[1]);
        }
    }
}

fn contour_points(
    ctx: &mut RenderContext,
    canvas: &mut dyn Canvas,
    plot: &SurfacePlot3D,
    level: &ContourLevel,
) {
    for trace in &level.curves {
        for p in trace {
            if let Some((sp, _)) = ctx.project_visible(*p) {
                canvas.draw_point(sp, plot.point_style);
            }
        }
    }
}

fn contour_impulses(ctx: &mut RenderContext, canvas: &mut dyn Canvas, level: &ContourLevel) {
    let base_z = ctx.transform.base_z;
    for trace in &level.curves {
        for p in trace {
            let lp = ctx.lin(*p);
            if !lp.x.is_finite() || !lp.y.is_finite() || !lp.z.is_finite() {
                continue;
            }
            let bottom = glam::DVec3::new(lp.x, lp.y, base_z);
            ctx.draw_decoration_lin(canvas, bottom, lp);
        }
    }
}
