//! The render pipeline.
//!
//! One call to [`render`] turns a [`Figure3D`] into canvas primitives:
//! boundary layout, view transform, back decorations, the surface loop with
//! interleaved legend entries, depth flush, front decorations, and (for an
//! opaque key) a second pass that redraws the legend on top of everything.

use crate::canvas::{Canvas, ScreenPoint, TextJustify};
use crate::core::boundary::{compute_boundary, BoundaryInput, PlotBounds};
use crate::core::context::RenderContext;
use crate::core::view::{Projection, ViewTransform};
use crate::error::{PlotError, Result};
use crate::plots::{DepthOrder, Figure3D, GridLayer, PlotStyle, SurfacePlot3D};
use crate::render::contour::{draw_level, level_style};
use crate::render::graphbox::{draw_graph_box, GridPart};
use crate::render::key::{
    draw_key_entry, draw_key_frame, layout_key, KeyGeometry, KeyPass, KeySample,
};
use crate::render::styles::{draw_arrow_barbs, drawer_for};

/// Render the figure onto the canvas.
pub fn render(figure: &Figure3D, canvas: &mut dyn Canvas) -> Result<()> {
    if figure.polar {
        return Err(PlotError::PolarConflict);
    }
    let metrics = canvas.metrics();
    let map_view = figure.view.projection == Projection::Map;
    let draws_base = figure.border_mask & 0x0f != 0 || figure.grid;
    let surface_scale = match figure.view.projection {
        Projection::Free => figure.view.scale,
        _ => 1.425 * figure.view.projection_scale,
    };

    log::debug!(target: "surfplot", "render: {} plots, projection {:?}", figure.plots.len(), figure.view.projection);

    let boundary = compute_boundary(&BoundaryInput {
        metrics,
        margins: figure.margins,
        key: &figure.key,
        sizing: figure.key_sizing(),
        title_lines: figure.title_lines(),
        surface_scale,
        square: figure.square,
        map_view,
        aspect: figure.aspect,
    });
    let transform = ViewTransform::build(
        &figure.view,
        &figure.axes,
        figure.base,
        draws_base,
        boundary.screen,
    )?;

    let page = PlotBounds {
        xleft: 0,
        xright: metrics.width,
        ybot: 0,
        ytop: metrics.height,
    };
    let mut boundary = boundary;
    let clip_area = if map_view {
        // In a top-down view clipping behaves like 2D: the plot rectangle
        // is exactly the projected base rectangle.
        let lax = transform.axes.linearized();
        let (p1, _) = transform.project(lax.x.min, lax.y.min, transform.base_z);
        let (p2, _) = transform.project(lax.x.max, lax.y.max, transform.base_z);
        let bounds = PlotBounds {
            xleft: p1.x,
            xright: p2.x,
            ybot: p2.y,
            ytop: p1.y,
        };
        boundary.bounds = bounds;
        Some(bounds)
    } else if canvas.can_clip_natively() {
        None
    } else {
        Some(page)
    };
    let mut ctx = RenderContext::new(transform, boundary, figure.clip, clip_area);
    ctx.set_page_area(if canvas.can_clip_natively() {
        None
    } else {
        Some(page)
    });

    // Back decorations.
    log::trace!(target: "surfplot", "phase: back grid");
    if map_view {
        draw_graph_box(&mut ctx, canvas, figure, GridPart::BorderOnly);
    } else {
        match figure.grid_layer {
            GridLayer::Back => draw_graph_box(&mut ctx, canvas, figure, GridPart::All),
            GridLayer::Split => draw_graph_box(&mut ctx, canvas, figure, GridPart::Back),
            GridLayer::Front => {}
        }
    }

    let key_geom = layout_key(
        &figure.key,
        &ctx.boundary.key,
        figure.key_sizing(),
        &ctx.boundary.bounds,
        &metrics,
    );

    log::trace!(target: "surfplot", "phase: surfaces");
    draw_scene(&mut ctx, canvas, figure, key_geom.as_ref(), KeyPass::WithScene)?;

    if figure.depth_order == DepthOrder::Scene {
        log::trace!(target: "surfplot", "phase: scene depth flush");
        ctx.depth.flush(canvas);
    }

    // Front decorations.
    log::trace!(target: "surfplot", "phase: front grid");
    if !map_view {
        match figure.grid_layer {
            GridLayer::Front => draw_graph_box(&mut ctx, canvas, figure, GridPart::All),
            GridLayer::Split => draw_graph_box(&mut ctx, canvas, figure, GridPart::Front),
            GridLayer::Back => {}
        }
    }

    // An opaque key is redrawn over the finished scene.
    if figure.key.opaque && key_geom.is_some() {
        log::trace!(target: "surfplot", "phase: key redraw");
        draw_scene(&mut ctx, canvas, figure, key_geom.as_ref(), KeyPass::Redraw)?;
    }

    place_labels(&mut ctx, canvas, figure);
    place_arrows(&mut ctx, canvas, figure);

    if let Some(title) = &figure.title {
        let anchor = ScreenPoint::new(metrics.width / 2, metrics.height - metrics.char_height);
        canvas.draw_text(anchor, title, TextJustify::Center);
    }

    log::debug!(target: "surfplot", "render: done");
    Ok(())
}

/// One pass over the plots. `WithScene` draws surfaces, contours, and key
/// entries; `Redraw` draws only the key frame and entries.
fn draw_scene(
    ctx: &mut RenderContext,
    canvas: &mut dyn Canvas,
    figure: &Figure3D,
    key_geom: Option<&KeyGeometry>,
    pass: KeyPass,
) -> Result<()> {
    if let Some(geom) = key_geom {
        draw_key_frame(geom, &figure.key, pass, canvas);
    }
    let mut cursor = key_geom.map(|g| g.cursor());

    for plot in &figure.plots {
        if plot.iso_curves.is_empty() {
            log::warn!(target: "surfplot", "skipping plot with no data: {:?}", plot.title);
            continue;
        }

        if plot.wants_key_entry() {
            if let (Some(geom), Some(cursor)) = (key_geom, cursor.as_mut()) {
                let title = plot.title.as_deref().unwrap_or_default();
                draw_key_entry(geom, canvas, cursor, title, key_sample_for(plot));
            }
        }

        if pass == KeyPass::WithScene {
            // Base-to-sample verticals are invisible from straight above.
            if figure.view.projection == Projection::Map
                && matches!(plot.style, PlotStyle::Impulses | PlotStyle::Boxes)
            {
                return Err(PlotError::UnsupportedStyle { style: plot.style });
            }
            let mut style = plot.style;
            if style == PlotStyle::Surface && plot.grid_rows().len() < 2 {
                log::warn!(
                    target: "surfplot",
                    "too few iso-curves for a surface mesh, drawing lines: {:?}",
                    plot.title
                );
                style = PlotStyle::Lines;
            }
            let drawer =
                drawer_for(style).ok_or(PlotError::UnsupportedStyle { style })?;
            drawer(ctx, canvas, plot);
            if figure.depth_order == DepthOrder::PerSurface {
                ctx.depth.flush(canvas);
            }
        }

        // Contour levels follow their surface, with a legend entry per
        // labelled level.
        for level in &plot.contours {
            if !level.label.is_empty() {
                if let (Some(geom), Some(cursor)) = (key_geom, cursor.as_mut()) {
                    let style =
                        level_style(plot, level, plot.use_palette && !canvas.is_monochrome());
                    let sample = KeySample {
                        line: Some(&style),
                        point: None,
                    };
                    draw_key_entry(geom, canvas, cursor, &level.label, sample);
                }
            }
            if pass == KeyPass::WithScene {
                draw_level(ctx, canvas, plot, level);
            }
        }
    }
    Ok(())
}

/// The legend sample matching a plot style.
fn key_sample_for(plot: &SurfacePlot3D) -> KeySample<'_> {
    match plot.style {
        PlotStyle::Points => KeySample {
            line: None,
            point: Some(plot.point_style),
        },
        PlotStyle::LinesPoints => KeySample {
            line: Some(&plot.line_style),
            point: Some(plot.point_style),
        },
        _ => KeySample {
            line: Some(&plot.line_style),
            point: None,
        },
    }
}

fn place_labels(ctx: &mut RenderContext, canvas: &mut dyn Canvas, figure: &Figure3D) {
    let map_view = figure.view.projection == Projection::Map;
    for label in &figure.labels {
        let p = ctx.lin(label.position);
        let (x, y, _) = ctx.transform.project_f64(p.x, p.y, p.z);
        let sp = ScreenPoint::new(x as i32, y as i32);
        // Only the top-down view clips labels to the plot rectangle.
        if map_view && !ctx.point_visible_2d(sp) {
            continue;
        }
        canvas.draw_text(sp, &label.text, label.justify);
    }
}

fn place_arrows(ctx: &mut RenderContext, canvas: &mut dyn Canvas, figure: &Figure3D) {
    // Arrows may run outside the plot rectangle but not off the canvas.
    let page = ctx.page_area();
    ctx.with_clip_area(page, |ctx| {
        for arrow in &figure.arrows {
            canvas.set_line_style(&arrow.style);
            let (a, b) = (ctx.lin(arrow.start), ctx.lin(arrow.end));
            if !ctx.draw_decoration_lin(canvas, a, b) {
                continue;
            }
            if arrow.head {
                let (tail, _) = ctx.transform.project(a.x, a.y, a.z);
                let (tip, _) = ctx.transform.project(b.x, b.y, b.z);
                draw_arrow_barbs(ctx, canvas, tail, tip);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::core::axis::{AxesRanges3D, AxisRange};
    use crate::plots::SurfacePlot3D;

    fn simple_figure() -> Figure3D {
        let mut fig = Figure3D::new().with_axes(AxesRanges3D::new(
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
        ));
        fig.add_plot(
            SurfacePlot3D::from_grid(&[0.0, 0.5, 1.0], &[0.0, 0.5, 1.0], |x, y| x * y)
                .with_title("xy"),
        );
        fig
    }

    #[test]
    fn test_render_simple_figure() {
        let mut canvas = RecordingCanvas::new(800, 600);
        render(&simple_figure(), &mut canvas).unwrap();
        assert!(canvas.line_count() > 0);
    }

    #[test]
    fn test_polar_rejected() {
        let mut fig = simple_figure();
        fig.polar = true;
        let mut canvas = RecordingCanvas::new(800, 600);
        assert!(matches!(
            render(&fig, &mut canvas),
            Err(PlotError::PolarConflict)
        ));
    }

    #[test]
    fn test_single_isoline_surface_draws_lines_instead() {
        let mut fig = Figure3D::new().with_axes(AxesRanges3D::new(
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
        ));
        fig.border_mask = 0;
        fig.key.visible = false;
        let mut plot = SurfacePlot3D::new(PlotStyle::Surface);
        plot.add_iso_curve(crate::plots::IsoCurve::new(vec![
            crate::plots::SamplePoint::new(0.0, 0.0, 0.5),
            crate::plots::SamplePoint::new(1.0, 0.0, 0.5),
        ]));
        fig.add_plot(plot);
        let mut canvas = RecordingCanvas::new(800, 600);
        render(&fig, &mut canvas).unwrap();
        // No mesh cells, but the isoline is still drawn.
        assert!(canvas.filled_polygons().is_empty());
        assert_eq!(canvas.line_count(), 1);
    }

    #[test]
    fn test_impulses_rejected_in_map_view() {
        let mut fig = simple_figure();
        fig.view.projection = crate::core::view::Projection::Map;
        fig.plots[0].style = PlotStyle::Impulses;
        let mut canvas = RecordingCanvas::new(800, 600);
        assert!(matches!(
            render(&fig, &mut canvas),
            Err(PlotError::UnsupportedStyle {
                style: PlotStyle::Impulses
            })
        ));
    }

    #[test]
    fn test_arrow_with_head_gets_barbs() {
        let mut fig = Figure3D::new().with_axes(AxesRanges3D::new(
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
        ));
        fig.border_mask = 0;
        fig.key.visible = false;
        fig.add_arrow(crate::plots::Arrow3D {
            start: glam::DVec3::new(0.1, 0.1, 0.1),
            end: glam::DVec3::new(0.9, 0.9, 0.9),
            style: crate::styling::LineStyle::default(),
            head: true,
        });
        let mut canvas = RecordingCanvas::new(800, 600);
        render(&fig, &mut canvas).unwrap();
        // Shaft plus two barbs.
        assert_eq!(canvas.line_count(), 3);

        let mut fig_headless = fig.clone();
        fig_headless.arrows[0].head = false;
        let mut canvas = RecordingCanvas::new(800, 600);
        render(&fig_headless, &mut canvas).unwrap();
        assert_eq!(canvas.line_count(), 1);
    }
}
