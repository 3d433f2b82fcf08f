//! Legend geometry and entry drawing.
//!
//! Layout is a pure function of the key configuration, the reservation made
//! during boundary computation, and the plot rectangle: calling it twice
//! with the same inputs yields the same geometry, which the two-pass opaque
//! protocol relies on.

use crate::canvas::{Canvas, CanvasMetrics, ScreenPoint, TextJustify};
use crate::core::boundary::{KeyConfig, KeyPlacement, KeyReservation, KeySizing, PlotBounds};
use crate::styling::{FillStyle, LineStyle, PointStyle};

/// Which of the two render passes is running.
///
/// With `key opaque` the scene is drawn twice: the first pass draws the
/// surfaces (and the key interleaved with them), the second blanks the key
/// area and redraws only the key on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPass {
    WithScene,
    Redraw,
}

/// Resolved legend geometry for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGeometry {
    /// The key box.
    pub bounds: PlotBounds,
    /// Sample line span relative to the entry anchor.
    pub sample_left: i32,
    pub sample_right: i32,
    /// Marker position relative to the entry anchor.
    pub point_offset: i32,
    /// Text anchor relative to the entry anchor (right-justified text).
    pub text_right: i32,
    /// First entry anchor.
    pub start: ScreenPoint,
    /// Column restart y.
    pub row_start_y: i32,
    pub rows: i32,
    pub col_width: i32,
    pub entry_height: i32,
    pub title_height: i32,
}

/// Walks entry anchors down columns, spilling right when a column fills.
#[derive(Debug, Clone, Copy)]
pub struct KeyCursor {
    pub x: i32,
    pub y: i32,
    count: i32,
}

impl KeyGeometry {
    pub fn cursor(&self) -> KeyCursor {
        KeyCursor {
            x: self.start.x,
            y: self.start.y,
            count: 0,
        }
    }

    pub fn advance(&self, cursor: &mut KeyCursor) {
        cursor.count += 1;
        if cursor.count >= self.rows {
            cursor.y = self.row_start_y;
            cursor.x += self.col_width;
            cursor.count = 0;
        } else {
            cursor.y -= self.entry_height;
        }
    }
}

/// Compute the key geometry. Returns None when the key is hidden or empty.
pub fn layout_key(
    key: &KeyConfig,
    reservation: &KeyReservation,
    sizing: KeySizing,
    plot: &PlotBounds,
    metrics: &CanvasMetrics,
) -> Option<KeyGeometry> {
    if !key.visible || sizing.count == 0 {
        return None;
    }
    let char_w = metrics.char_width;

    let sample_left = 0;
    let sample_right = reservation.sample_width;
    let text_right = -char_w;
    let size_left = char_w * (sizing.max_label_chars + 2);
    let size_right = char_w + reservation.sample_width;
    let point_offset = (sample_left + sample_right) / 2;

    let key_width = reservation.col_width * (reservation.cols - 1) + size_right + size_left;
    let key_height = reservation.title_height + reservation.entry_height * reservation.rows;

    let (bounds, anchor_x, anchor_y);
    match key.placement {
        KeyPlacement::BottomMargin => {
            // Centre each column by the left/right size ratio; one integer
            // division to keep precision.
            let xin = plot.xleft
                + (plot.width() * size_left) / (reservation.cols * (size_left + size_right)).max(1);
            let xleft = xin - size_left;
            bounds = PlotBounds {
                xleft,
                xright: xleft + key_width,
                ytop: plot.ybot,
                ybot: plot.ybot - key_height,
            };
            anchor_x = xin;
            anchor_y = bounds.ytop - reservation.title_height;
        }
        placement => {
            let (xleft, xright) = match placement {
                KeyPlacement::RightMargin => {
                    let xleft = plot.xright + metrics.tic_h;
                    (xleft, xleft + key_width)
                }
                KeyPlacement::LeftMargin => {
                    let xright = plot.xleft - metrics.tic_h;
                    (xright - key_width, xright)
                }
                // The anchor point sits on the named edge of the key box.
                KeyPlacement::At(p) => {
                    let xleft = match key.anchor.horizontal() {
                        -1 => p.x,
                        0 => p.x - key_width / 2,
                        _ => p.x - key_width,
                    };
                    (xleft, xleft + key_width)
                }
                // Interior keys float toward the configured corner.
                _ => match key.anchor.horizontal() {
                    -1 => {
                        let xleft = plot.xleft + metrics.tic_h;
                        (xleft, xleft + key_width)
                    }
                    0 => {
                        let xleft = plot.xleft + (plot.width() - key_width) / 2;
                        (xleft, xleft + key_width)
                    }
                    _ => {
                        let xright = plot.xright - metrics.tic_h;
                        (xright - key_width, xright)
                    }
                },
            };
            let ytop = match placement {
                KeyPlacement::At(p) => match key.anchor.vertical() {
                    -1 => p.y + key_height,
                    0 => p.y + key_height / 2,
                    _ => p.y,
                },
                KeyPlacement::Interior => match key.anchor.vertical() {
                    -1 => plot.ybot + metrics.tic_v + key_height,
                    0 => plot.ybot + (plot.height() + key_height) / 2,
                    _ => plot.ytop - metrics.tic_v,
                },
                // Margin keys hang from the top of the rectangle.
                _ => plot.ytop - metrics.tic_v,
            };
            let ybot = ytop - key_height;
            bounds = PlotBounds {
                xleft,
                xright,
                ybot,
                ytop,
            };
            anchor_x = xleft + size_left;
            anchor_y = ytop - reservation.title_height;
        }
    }

    // Centre the entries vertically within their slots.
    let start_y = anchor_y - reservation.entry_height / 2;

    Some(KeyGeometry {
        bounds,
        sample_left,
        sample_right,
        point_offset,
        text_right,
        start: ScreenPoint::new(anchor_x, start_y),
        row_start_y: start_y,
        rows: reservation.rows.max(1),
        col_width: reservation.col_width,
        entry_height: reservation.entry_height,
        title_height: reservation.title_height,
    })
}

/// Draw the key frame: the opaque blank (redraw pass only), the box, and
/// the title.
pub fn draw_key_frame(
    geom: &KeyGeometry,
    key: &KeyConfig,
    pass: KeyPass,
    canvas: &mut dyn Canvas,
) {
    let b = geom.bounds;
    if pass == KeyPass::Redraw && key.opaque {
        let blank = FillStyle::default();
        canvas.fill_polygon(
            &[
                ScreenPoint::new(b.xleft, b.ybot),
                ScreenPoint::new(b.xright, b.ybot),
                ScreenPoint::new(b.xright, b.ytop),
                ScreenPoint::new(b.xleft, b.ytop),
            ],
            &blank,
        );
    }
    if key.boxed && b.ytop != b.ybot {
        canvas.set_line_style(&LineStyle::default());
        canvas.move_to(ScreenPoint::new(b.xleft, b.ybot));
        canvas.line_to(ScreenPoint::new(b.xleft, b.ytop));
        canvas.line_to(ScreenPoint::new(b.xright, b.ytop));
        canvas.line_to(ScreenPoint::new(b.xright, b.ybot));
        canvas.line_to(ScreenPoint::new(b.xleft, b.ybot));
        if geom.title_height > 0 {
            // Separator between title and first entry.
            canvas.move_to(ScreenPoint::new(b.xleft, b.ytop - geom.title_height));
            canvas.line_to(ScreenPoint::new(b.xright, b.ytop - geom.title_height));
        }
    }
    if let Some(title) = &key.title {
        let center = ScreenPoint::new((b.xleft + b.xright) / 2, b.ytop - geom.title_height / 2);
        canvas.draw_text(center, title, TextJustify::Center);
    }
}

/// The graphical sample accompanying one key entry.
#[derive(Debug, Clone, Copy)]
pub struct KeySample<'a> {
    pub line: Option<&'a LineStyle>,
    pub point: Option<PointStyle>,
}

/// Draw one entry (text plus sample) at the cursor, then advance it.
pub fn draw_key_entry(
    geom: &KeyGeometry,
    canvas: &mut dyn Canvas,
    cursor: &mut KeyCursor,
    text: &str,
    sample: KeySample<'_>,
) {
    canvas.draw_text(
        ScreenPoint::new(cursor.x + geom.text_right, cursor.y),
        text,
        TextJustify::Right,
    );
    if let Some(style) = sample.line {
        canvas.set_line_style(style);
        canvas.move_to(ScreenPoint::new(cursor.x + geom.sample_left, cursor.y));
        canvas.line_to(ScreenPoint::new(cursor.x + geom.sample_right, cursor.y));
    }
    if let Some(style) = sample.point {
        canvas.draw_point(
            ScreenPoint::new(cursor.x + geom.point_offset, cursor.y),
            style,
        );
    }
    geom.advance(cursor);
}
