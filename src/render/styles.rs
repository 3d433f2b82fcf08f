//! Per-style surface drawers.
//!
//! Each plot style maps to one drawer function through a lazily built
//! dispatch table; the pipeline looks the drawer up once per plot. Drawers
//! receive the data-domain plot and the render context and are responsible
//! for classification, clipping, and (for fills) depth queueing.

use std::collections::HashMap;

use glam::DVec3;
use once_cell::sync::Lazy;

use crate::canvas::Canvas;
use crate::core::clip::PointClass;
use crate::core::context::RenderContext;
use crate::plots::{PlotStyle, SurfacePlot3D};
use crate::styling::{FillStyle, LineStyle};

/// One style drawer.
pub type Drawer = fn(&mut RenderContext, &mut dyn Canvas, &SurfacePlot3D);

static DRAWERS: Lazy<HashMap<PlotStyle, Drawer>> = Lazy::new(|| {
    let mut table: HashMap<PlotStyle, Drawer> = HashMap::new();
    table.insert(PlotStyle::Lines, draw_lines);
    table.insert(PlotStyle::Points, draw_points);
    table.insert(PlotStyle::LinesPoints, draw_lines_points);
    table.insert(PlotStyle::Impulses, draw_impulses);
    table.insert(PlotStyle::Boxes, draw_boxes);
    table.insert(PlotStyle::Vectors, draw_vectors);
    table.insert(PlotStyle::Polygons, draw_polygons);
    table.insert(PlotStyle::FilledCurves, draw_filled_curves);
    table.insert(PlotStyle::Surface, draw_surface_mesh);
    table
});

/// Look up the drawer for a style.
pub fn drawer_for(style: PlotStyle) -> Option<Drawer> {
    DRAWERS.get(&style).copied()
}

/// Whether palette coloring applies: the plot must ask for it and the
/// device must be able to show it.
fn wants_palette(plot: &SurfacePlot3D, canvas: &dyn Canvas) -> bool {
    plot.use_palette && !canvas.is_monochrome()
}

/// Line style for one segment, palette-colored when requested.
fn segment_style(
    plot: &SurfacePlot3D,
    value: f64,
    range: Option<(f64, f64)>,
    palette: bool,
) -> LineStyle {
    match (palette, range) {
        (true, Some((lo, hi))) => {
            let fill = plot.color_map.fill_for(value, lo, hi);
            LineStyle::new(fill.color).with_width(plot.line_style.width)
        }
        _ => plot.line_style.clone(),
    }
}

fn fill_style(
    plot: &SurfacePlot3D,
    value: f64,
    range: Option<(f64, f64)>,
    palette: bool,
) -> FillStyle {
    match (palette, range) {
        (true, Some((lo, hi))) => plot.color_map.fill_for(value, lo, hi),
        _ => FillStyle::new(plot.line_style.color),
    }
}

fn draw_lines(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    let range = plot.palette_range();
    let palette = wants_palette(plot, canvas);
    canvas.set_line_style(&plot.line_style);
    for curve in &plot.iso_curves {
        for pair in curve.points.windows(2) {
            if palette {
                let mid = (pair[0].palette_value() + pair[1].palette_value()) / 2.0;
                canvas.set_line_style(&segment_style(plot, mid, range, palette));
            }
            ctx.draw_segment_3d(canvas, pair[0].position, pair[1].position);
        }
    }
}

fn draw_points(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    canvas.set_line_style(&plot.line_style);
    for curve in &plot.iso_curves {
        for point in &curve.points {
            if let Some((sp, _)) = ctx.project_visible(point.position) {
                canvas.draw_point(sp, plot.point_style);
            }
        }
    }
}

fn draw_lines_points(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    draw_lines(ctx, canvas, plot);
    draw_points(ctx, canvas, plot);
}

/// Vertical stroke from the base plane to each sample. The sample z is
/// clamped into range rather than discarded, matching the 2D impulse look.
fn draw_impulses(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    let range = plot.palette_range();
    let palette = wants_palette(plot, canvas);
    canvas.set_line_style(&plot.line_style);
    let base_z = ctx.transform.base_z;
    let lin_z = ctx.lin_axes().z;
    let (zlo, zhi) = if lin_z.min <= lin_z.max {
        (lin_z.min, lin_z.max)
    } else {
        (lin_z.max, lin_z.min)
    };
    for curve in &plot.iso_curves {
        for point in &curve.points {
            let p = ctx.lin(point.position);
            if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
                continue;
            }
            let in_xy = ctx.lin_axes().x.contains(p.x) && ctx.lin_axes().y.contains(p.y);
            if !in_xy {
                continue;
            }
            if palette {
                canvas.set_line_style(&segment_style(plot, point.palette_value(), range, palette));
            }
            let top = DVec3::new(p.x, p.y, p.z.clamp(zlo, zhi));
            let bottom = DVec3::new(p.x, p.y, base_z);
            ctx.draw_decoration_lin(canvas, bottom, top);
        }
    }
}

/// Filled box from the base plane up (or down) to each sample.
fn draw_boxes(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    let range = plot.palette_range();
    let palette = wants_palette(plot, canvas);
    let base_z = ctx.transform.base_z;
    for curve in &plot.iso_curves {
        // Box widths come from sample spacing in the linear domain, where
        // the boxes are actually built.
        let half = box_half_width(curve.points.iter().map(|p| ctx.lin(p.position).x));
        for point in &curve.points {
            let p = ctx.lin(point.position);
            if !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite() {
                continue;
            }
            let fill = fill_style(plot, point.palette_value(), range, palette);
            ctx.queue_quad_lin(
                &[
                    DVec3::new(p.x - half, p.y, base_z),
                    DVec3::new(p.x + half, p.y, base_z),
                    DVec3::new(p.x + half, p.y, p.z),
                    DVec3::new(p.x - half, p.y, p.z),
                ],
                fill,
            );
        }
    }
}

/// Half the box width, from the tightest spacing between consecutive
/// samples.
fn box_half_width(xs: impl Iterator<Item = f64>) -> f64 {
    let xs: Vec<f64> = xs.collect();
    let mut min_gap = f64::INFINITY;
    for pair in xs.windows(2) {
        let gap = (pair[1] - pair[0]).abs();
        if gap > 0.0 && gap < min_gap {
            min_gap = gap;
        }
    }
    if min_gap.is_finite() {
        min_gap * 0.4
    } else {
        0.5
    }
}

fn draw_vectors(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    canvas.set_line_style(&plot.line_style);
    for curve in &plot.iso_curves {
        for point in &curve.points {
            let Some(delta) = point.delta else {
                continue;
            };
            let tip = point.position + delta;
            if !ctx.draw_segment_3d(canvas, point.position, tip) {
                continue;
            }
            draw_arrow_head(ctx, canvas, point.position, tip);
        }
    }
}

/// Two short barbs at the tip of a vector, after the range check.
fn draw_arrow_head(ctx: &mut RenderContext, canvas: &mut dyn Canvas, tail: DVec3, tip: DVec3) {
    let (tail_lin, tip_lin) = (ctx.lin(tail), ctx.lin(tip));
    if ctx.classify(tip_lin) != PointClass::InRange {
        return;
    }
    let (pt_tail, _) = ctx.transform.project(tail_lin.x, tail_lin.y, tail_lin.z);
    let (pt_tip, _) = ctx.transform.project(tip_lin.x, tip_lin.y, tip_lin.z);
    draw_arrow_barbs(ctx, canvas, pt_tail, pt_tip);
}

/// Barbs in screen space, shared by the vectors drawer and figure arrows.
pub(crate) fn draw_arrow_barbs(
    ctx: &mut RenderContext,
    canvas: &mut dyn Canvas,
    tail: crate::canvas::ScreenPoint,
    tip: crate::canvas::ScreenPoint,
) {
    let (dx, dy) = ((tip.x - tail.x) as f64, (tip.y - tail.y) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return;
    }
    let barb = (len * 0.25).min(8.0);
    let (ux, uy) = (dx / len, dy / len);
    for side in [-1.0, 1.0] {
        // Unit direction rotated 150 degrees toward the tail.
        let (c, s) = (
            (-150.0f64 * side).to_radians().cos(),
            (-150.0f64 * side).to_radians().sin(),
        );
        let bx = tip.x + ((ux * c - uy * s) * barb) as i32;
        let by = tip.y + ((ux * s + uy * c) * barb) as i32;
        ctx.draw_segment_2d(canvas, tip, crate::canvas::ScreenPoint::new(bx, by));
    }
}

/// Each iso-curve is one closed filled polygon.
fn draw_polygons(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    let range = plot.palette_range();
    let palette = wants_palette(plot, canvas);
    for curve in &plot.iso_curves {
        if curve.points.len() < 3 {
            continue;
        }
        let corners: Vec<DVec3> = curve.points.iter().map(|p| p.position).collect();
        let value = curve
            .points
            .iter()
            .map(|p| p.palette_value())
            .sum::<f64>()
            / curve.points.len() as f64;
        ctx.queue_quad(&corners, fill_style(plot, value, range, palette));
    }
}

/// Area between each iso-curve and the base plane.
fn draw_filled_curves(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    let range = plot.palette_range();
    let palette = wants_palette(plot, canvas);
    let base_z = ctx.transform.base_z;
    for curve in &plot.iso_curves {
        if curve.points.len() < 2 {
            continue;
        }
        let mut corners: Vec<DVec3> = curve.points.iter().map(|p| ctx.lin(p.position)).collect();
        let first = corners[0];
        let last = corners[corners.len() - 1];
        corners.push(DVec3::new(last.x, last.y, base_z));
        corners.push(DVec3::new(first.x, first.y, base_z));
        let value = curve
            .points
            .iter()
            .map(|p| p.palette_value())
            .sum::<f64>()
            / curve.points.len() as f64;
        ctx.queue_quad_lin(&corners, fill_style(plot, value, range, palette));
    }
}

/// Palette-filled quadrangle mesh between adjacent grid rows.
fn draw_surface_mesh(ctx: &mut RenderContext, canvas: &mut dyn Canvas, plot: &SurfacePlot3D) {
    let range = plot.palette_range();
    let palette = wants_palette(plot, canvas);
    let rows = plot.grid_rows();
    for pair in rows.windows(2) {
        let (r0, r1) = (&pair[0].points, &pair[1].points);
        let cols = r0.len().min(r1.len());
        for i in 1..cols {
            let quad = [r0[i - 1], r0[i], r1[i], r1[i - 1]];
            let value = quad.iter().map(|p| p.palette_value()).sum::<f64>() / 4.0;
            let corners: Vec<DVec3> = quad.iter().map(|p| p.position).collect();
            ctx.queue_quad(&corners, fill_style(plot, value, range, palette));
        }
    }
}
