//! End-to-end render pipeline tests against the recording canvas.

use glam::DVec3;
use surfplot::canvas::{DrawOp, RecordingCanvas, ScreenPoint, TextJustify};
use surfplot::core::{
    compute_boundary, BoundaryInput, KeyConfig, KeyPlacement, KeySizing, LineClipping, Margins,
    SegmentClipper,
};
use surfplot::plots::{DepthOrder, Figure3D, IsoCurve, SamplePoint, SurfacePlot3D};
use surfplot::{
    render, AxesRanges3D, AxisRange, BasePlane, CanvasMetrics, PlotStyle, Projection, ViewState,
    ViewTransform,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn unit_axes() -> AxesRanges3D {
    AxesRanges3D::new(
        AxisRange::new(0.0, 1.0),
        AxisRange::new(0.0, 1.0),
        AxisRange::new(0.0, 1.0),
    )
}

fn ripple_figure() -> Figure3D {
    let xs: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
    let mut fig = Figure3D::new().with_axes(unit_axes());
    fig.add_plot(
        SurfacePlot3D::from_grid(&xs, &xs, |x, y| {
            0.5 + 0.4 * (6.0 * (x * x + y * y).sqrt()).sin()
        })
        .with_title("ripple"),
    );
    fig
}

#[test]
fn test_render_is_deterministic() {
    init_logging();
    let fig = ripple_figure();
    let mut first = RecordingCanvas::new(800, 600);
    let mut second = RecordingCanvas::new(800, 600);
    render(&fig, &mut first).unwrap();
    render(&fig, &mut second).unwrap();
    assert_eq!(first.ops, second.ops);
    assert!(first.line_count() > 0);
}

#[test]
fn test_cube_corners_stay_distinct_under_default_view() {
    let metrics = CanvasMetrics::default();
    let key = KeyConfig {
        visible: false,
        ..Default::default()
    };
    let boundary = compute_boundary(&BoundaryInput {
        metrics,
        margins: Margins::default(),
        key: &key,
        sizing: KeySizing::default(),
        title_lines: 0,
        surface_scale: 1.0,
        square: false,
        map_view: false,
        aspect: None,
    });
    let transform = ViewTransform::build(
        &ViewState::default(),
        &unit_axes(),
        BasePlane::Relative(0.0),
        true,
        boundary.screen,
    )
    .unwrap();
    let mut seen = Vec::new();
    for z in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for x in [0.0, 1.0] {
                let (p, _) = transform.project(x, y, z);
                assert!(!seen.contains(&(p.x, p.y)));
                seen.push((p.x, p.y));
            }
        }
    }
}

#[test]
fn test_segment_rising_through_floor_clips_at_face() {
    let axes = AxesRanges3D::new(
        AxisRange::new(0.0, 10.0),
        AxisRange::new(0.0, 10.0),
        AxisRange::new(0.0, 1.0),
    );
    let clipper = SegmentClipper::new(&axes, LineClipping::default());
    let hit = clipper
        .edge_intersect(DVec3::new(5.0, 5.0, 0.5), DVec3::new(5.0, 5.0, -1.0))
        .unwrap();
    assert_eq!(hit, DVec3::new(5.0, 5.0, 0.0));
}

#[test]
fn test_undefined_samples_break_lines_without_failing() {
    init_logging();
    let mut fig = Figure3D::new().with_axes(unit_axes());
    fig.border_mask = 0;
    fig.key.visible = false;
    let mut plot = SurfacePlot3D::new(PlotStyle::Lines);
    plot.add_iso_curve(IsoCurve::new(vec![
        SamplePoint::new(0.1, 0.1, 0.1),
        SamplePoint::new(0.3, 0.3, f64::NAN),
        SamplePoint::new(0.5, 0.5, 0.5),
        SamplePoint::new(0.7, 0.7, 0.7),
    ]));
    fig.add_plot(plot);
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    // Only the 0.5 -> 0.7 segment survives: both segments touching the NaN
    // sample are dropped.
    assert_eq!(canvas.line_count(), 1);
}

#[test]
fn test_scene_depth_order_interleaves_surfaces() {
    init_logging();
    let xs = [0.0, 0.5, 1.0];
    let mut fig = Figure3D::new().with_axes(unit_axes());
    fig.depth_order = DepthOrder::Scene;
    fig.add_plot(
        SurfacePlot3D::from_grid(&xs, &xs, |_, _| 0.3).with_style(PlotStyle::Surface),
    );
    fig.add_plot(
        SurfacePlot3D::from_grid(&xs, &xs, |_, _| 0.7).with_style(PlotStyle::Surface),
    );
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    // Both meshes contribute all their cells to a single flush.
    assert_eq!(canvas.filled_polygons().len(), 8);
}

#[test]
fn test_per_surface_order_flushes_between_plots() {
    init_logging();
    let xs = [0.0, 0.5, 1.0];
    let mut fig = Figure3D::new().with_axes(unit_axes());
    fig.key.visible = false;
    fig.border_mask = 0;
    fig.add_plot(
        SurfacePlot3D::from_grid(&xs, &xs, |_, _| 0.3).with_style(PlotStyle::Surface),
    );
    fig.add_plot(
        SurfacePlot3D::from_grid(&xs, &xs, |x, _| 0.2 + x * 0.6).with_style(PlotStyle::Surface),
    );
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    let fills = canvas.filled_polygons();
    assert_eq!(fills.len(), 8);
}

#[test]
fn test_bottom_margin_key_settles_on_three_by_three() {
    // Seven wide entries capped at three rows: two columns fit the width,
    // the four resulting rows exceed the cap, and the layout settles on a
    // 3x3 grid without iterating.
    let key = KeyConfig {
        placement: KeyPlacement::BottomMargin,
        max_rows: 3,
        ..Default::default()
    };
    let boundary = compute_boundary(&BoundaryInput {
        metrics: CanvasMetrics::default(),
        margins: Margins::default(),
        key: &key,
        sizing: KeySizing {
            count: 7,
            max_label_chars: 24,
        },
        title_lines: 0,
        surface_scale: 1.0,
        square: false,
        map_view: false,
        aspect: None,
    });
    assert_eq!(boundary.key.rows, 3);
    assert_eq!(boundary.key.cols, 3);
}

#[test]
fn test_opaque_key_redraws_entries_at_same_positions() {
    init_logging();
    let mut fig = ripple_figure();
    fig.key.opaque = true;
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    let entry_positions: Vec<ScreenPoint> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text(p, text, TextJustify::Right) if text == "ripple" => Some(*p),
            _ => None,
        })
        .collect();
    // Drawn once with the scene and once in the redraw pass, at identical
    // positions.
    assert_eq!(entry_positions.len(), 2);
    assert_eq!(entry_positions[0], entry_positions[1]);
    // The blank behind the redrawn key comes after the scene's fills.
    assert!(!canvas.filled_polygons().is_empty());
}

#[test]
fn test_hidden_key_emits_no_entry_text() {
    init_logging();
    let mut fig = ripple_figure();
    fig.key.visible = false;
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    let texts = canvas
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Text(_, t, _) if t == "ripple"))
        .count();
    assert_eq!(texts, 0);
}

#[test]
fn test_map_view_renders_flat() {
    init_logging();
    let mut fig = ripple_figure();
    fig.view.projection = Projection::Map;
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    assert!(canvas.line_count() > 0);
}

#[test]
fn test_contour_levels_add_key_entries() {
    init_logging();
    let mut fig = Figure3D::new().with_axes(unit_axes());
    let mut plot = SurfacePlot3D::from_grid(&[0.0, 0.5, 1.0], &[0.0, 0.5, 1.0], |x, y| x * y)
        .with_title("surface");
    plot.add_contour(surfplot::plots::ContourLevel {
        z: 0.25,
        label: "0.25".into(),
        curves: vec![vec![
            DVec3::new(0.25, 0.5, 0.25),
            DVec3::new(0.5, 0.25, 0.25),
        ]],
    });
    fig.add_plot(plot);
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    let labels: Vec<&str> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text(_, t, TextJustify::Right) => Some(t.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["surface", "0.25"]);
}

#[test]
fn test_degenerate_axis_fails_render() {
    init_logging();
    let mut fig = ripple_figure();
    fig.axes.z = AxisRange::new(1.0, 1.0);
    let mut canvas = RecordingCanvas::new(800, 600);
    assert!(render(&fig, &mut canvas).is_err());
}

#[test]
fn test_autoscaled_figure_round_trips() {
    init_logging();
    let mut fig = Figure3D::new();
    fig.add_plot(
        SurfacePlot3D::from_grid(&[-2.0, 0.0, 2.0], &[-2.0, 0.0, 2.0], |x, y| x * x - y * y)
            .with_title("saddle"),
    );
    fig.autoscale();
    let mut canvas = RecordingCanvas::new(800, 600);
    render(&fig, &mut canvas).unwrap();
    assert!(canvas.line_count() > 0);
}
