//! Plot rectangle layout.
//!
//! Computed once per render pass, before any projection: margins, title
//! space, and the legend reservation together determine the plot rectangle,
//! and from the rectangle the pixel scalers the view transform uses.
//!
//! Canvas coordinates here are y-up: `ybot < ytop`, with y increasing toward
//! the top of the canvas.

use crate::canvas::{CanvasMetrics, ScreenPoint};

/// One margin specification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarginSpec {
    /// Derived from character and tic metrics.
    #[default]
    Auto,
    /// Width in character cells.
    Chars(f64),
    /// Fraction of the full canvas extent.
    Screen(f64),
}

/// All four margins of the plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: MarginSpec,
    pub right: MarginSpec,
    pub top: MarginSpec,
    pub bottom: MarginSpec,
}

/// Where the legend is placed relative to the plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPlacement {
    /// Inside the plot rectangle, anchored to the top right.
    #[default]
    Interior,
    /// Outside, in the right margin (the rectangle shrinks leftward).
    RightMargin,
    /// Outside, in the left margin.
    LeftMargin,
    /// Outside, below the plot; entries flow into rows and columns.
    BottomMargin,
    /// Pinned at an explicit canvas coordinate by the configured anchor.
    At(ScreenPoint),
}

/// Anchor corner for an interior key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyAnchor {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl KeyAnchor {
    /// Horizontal alignment: -1 left, 0 center, 1 right.
    pub fn horizontal(self) -> i32 {
        use KeyAnchor::*;
        match self {
            TopLeft | MiddleLeft | BottomLeft => -1,
            TopCenter | MiddleCenter | BottomCenter => 0,
            TopRight | MiddleRight | BottomRight => 1,
        }
    }

    /// Vertical alignment: -1 bottom, 0 middle, 1 top.
    pub fn vertical(self) -> i32 {
        use KeyAnchor::*;
        match self {
            BottomLeft | BottomCenter | BottomRight => -1,
            MiddleLeft | MiddleCenter | MiddleRight => 0,
            TopLeft | TopCenter | TopRight => 1,
        }
    }
}

/// Legend configuration owned by the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyConfig {
    pub visible: bool,
    pub placement: KeyPlacement,
    /// Corner an interior key floats toward.
    pub anchor: KeyAnchor,
    /// Cap on rows before entries spill into additional columns. Zero means
    /// unlimited.
    pub max_rows: i32,
    /// Length of the line/point sample, in character cells. Negative
    /// suppresses the sample.
    pub sample_len: f64,
    /// Vertical spacing multiplier between entries.
    pub vert_spacing: f64,
    pub title: Option<String>,
    /// Draw an opaque blank behind the key so plot elements cannot show
    /// through it. Forces the two-pass render protocol.
    pub opaque: bool,
    /// Draw a box around the key.
    pub boxed: bool,
    /// Entries stack bottom-to-top instead of top-to-bottom.
    pub invert: bool,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            visible: true,
            placement: KeyPlacement::Interior,
            anchor: KeyAnchor::default(),
            max_rows: 0,
            sample_len: 4.0,
            vert_spacing: 1.0,
            title: None,
            opaque: false,
            boxed: false,
            invert: false,
        }
    }
}

impl KeyConfig {
    pub fn title_lines(&self) -> i32 {
        match &self.title {
            Some(t) => t.lines().count() as i32,
            None => 0,
        }
    }
}

/// What the legend will have to fit, measured from the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySizing {
    /// Number of entries (plot titles plus labelled contour levels).
    pub count: i32,
    /// Longest entry text, in characters.
    pub max_label_chars: i32,
}

/// Space reserved for the legend, produced by the layout pass and consumed
/// by the final key placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyReservation {
    pub rows: i32,
    pub cols: i32,
    pub col_width: i32,
    pub entry_height: i32,
    pub sample_width: i32,
    pub title_height: i32,
}

/// The plot rectangle in canvas pixels, y-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotBounds {
    pub xleft: i32,
    pub xright: i32,
    pub ybot: i32,
    pub ytop: i32,
}

impl PlotBounds {
    pub fn width(&self) -> i32 {
        self.xright - self.xleft
    }

    pub fn height(&self) -> i32 {
        self.ytop - self.ybot
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.xleft && p.x <= self.xright && p.y >= self.ybot && p.y <= self.ytop
    }
}

/// Mapping from normalized view coordinates to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenScale {
    pub x_scaler: f64,
    pub y_scaler: f64,
    pub x_middle: i32,
    pub y_middle: i32,
}

impl ScreenScale {
    /// Truncating pixel mapping, matching integer terminal coordinates.
    pub fn to_screen(&self, x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(
            (x * self.x_scaler) as i32 + self.x_middle,
            (y * self.y_scaler) as i32 + self.y_middle,
        )
    }

    pub fn to_screen_f64(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.x_scaler + self.x_middle as f64,
            y * self.y_scaler + self.y_middle as f64,
        )
    }
}

/// Everything the layout pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub bounds: PlotBounds,
    pub screen: ScreenScale,
    pub key: KeyReservation,
}

/// Inputs to [`compute_boundary`] beyond the figure margins.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryInput<'a> {
    pub metrics: CanvasMetrics,
    pub margins: Margins,
    pub key: &'a KeyConfig,
    pub sizing: KeySizing,
    /// Lines in the figure title, zero when absent.
    pub title_lines: i32,
    /// Overall view scale, used when screen margins pin the rectangle.
    pub surface_scale: f64,
    /// Force equal pixel extent in x and y (ignored in map view).
    pub square: bool,
    pub map_view: bool,
    /// Requested y/x aspect of the rendered scene. Enforced by shrinking
    /// whichever pixel scaler is too large, never by growing one.
    pub aspect: Option<f64>,
}

/// Compute the plot rectangle, the legend reservation, and the pixel scalers.
pub fn compute_boundary(input: &BoundaryInput<'_>) -> Boundary {
    let m = input.metrics;
    let key = input.key;
    let sizing = input.sizing;
    let (char_w, char_h) = (m.char_width, m.char_height);

    let sample_width = if key.sample_len >= 0.0 {
        (key.sample_len * char_w as f64) as i32 + m.tic_h
    } else {
        0
    };
    let mut entry_height = (m.tic_v as f64 * 1.25 * key.vert_spacing) as i32;
    if entry_height < char_h {
        entry_height = (char_h as f64 * key.vert_spacing) as i32;
    }
    let title_height = key.title_lines() * char_h;
    let mut col_width = (sizing.max_label_chars + 4) * char_w + sample_width;

    let mut xleft = match input.margins.left {
        MarginSpec::Screen(f) => (f * m.width as f64 + 0.5) as i32,
        MarginSpec::Chars(c) => (c * char_w as f64 + 0.5) as i32,
        MarginSpec::Auto => char_w * 2 + m.tic_h,
    };
    let mut xright = match input.margins.right {
        MarginSpec::Screen(f) => (f * m.width as f64 + 0.5) as i32,
        // No tic labels on the right side, so a char-count margin is not
        // honored there.
        _ => m.width - char_w * 2 - m.tic_h,
    };

    // First estimate of the key grid from the entry count alone.
    let mut key_rows = sizing.count;
    let mut key_cols = 1;
    if key_rows > key.max_rows && key.max_rows > 0 {
        key_rows = key.max_rows;
        key_cols = (sizing.count - 1) / key_rows + 1;
    }

    if key.visible && key.placement == KeyPlacement::BottomMargin {
        if sizing.count > 0 {
            // Columns limited by label width, then rows from columns, then
            // columns re-derived from the possibly capped row count. One
            // fixed-point step, no iteration.
            key_cols = (xright - xleft) / col_width.max(1);
            if key_cols == 0 {
                key_cols = 1;
            }
            key_rows = (sizing.count - 1) / key_cols + 1;
            if key_rows > key.max_rows && key.max_rows > 0 {
                key_rows = key.max_rows;
            }
            key_cols = (sizing.count - 1) / key_rows + 1;
            col_width = (xright - xleft) / key_cols;
        } else {
            key_rows = 0;
            key_cols = 0;
            col_width = 0;
        }
    }

    let mut ybot = match input.margins.bottom {
        MarginSpec::Screen(f) => (f * m.height as f64 + 0.5) as i32,
        MarginSpec::Chars(c) if c >= 0.0 && input.map_view => (char_h as f64 * c) as i32,
        _ => (char_h as f64 * 2.5) as i32 + 1,
    };
    if key.visible && key.placement == KeyPlacement::BottomMargin && key_rows > 0 {
        ybot += key_rows * entry_height + title_height;
    }

    let mut ytop = match input.margins.top {
        MarginSpec::Screen(f) => (f * m.height as f64 + 0.5) as i32,
        _ => m.height - (char_h as f64 * (input.title_lines as f64 + 1.5)) as i32 - 1,
    };

    if key.visible
        && matches!(
            key.placement,
            KeyPlacement::Interior
                | KeyPlacement::RightMargin
                | KeyPlacement::LeftMargin
                | KeyPlacement::At(_)
        )
    {
        // Rows limited by the rectangle height, then columns from rows.
        let mut max_fit = (ytop - ybot) / char_h - 1 - key.title_lines();
        if max_fit > key.max_rows && key.max_rows > 0 {
            max_fit = key.max_rows;
        }
        if max_fit <= 0 {
            max_fit = 1;
        }
        if sizing.count > max_fit {
            key_cols = (sizing.count - 1) / max_fit + 1;
            key_rows = (sizing.count - 1) / key_cols + 1;
        }
    }

    if key.visible && sizing.count > 0 {
        let key_width = col_width * key_cols - 2 * char_w;
        match key.placement {
            KeyPlacement::RightMargin if !matches!(input.margins.right, MarginSpec::Screen(_)) => {
                xright -= key_width;
            }
            KeyPlacement::LeftMargin if !matches!(input.margins.left, MarginSpec::Screen(_)) => {
                xleft += key_width;
            }
            _ => {}
        }
    }

    if input.square && !input.map_view {
        let height = ytop - ybot;
        let width = xright - xleft;
        if height > width {
            ybot += (height - width) / 2;
            ytop -= (height - width) / 2;
        } else {
            xleft += (width - height) / 2;
            xright -= (width - height) / 2;
        }
    }

    let x_middle = (xright + xleft) / 2;
    let y_middle = (ytop + ybot) / 2;

    // 4/7 leaves room for the projected cube's corners to overhang the
    // rectangle's midlines.
    let mut x_scaler = ((xright - xleft) as i64 * 4 / 7) as f64;
    let mut y_scaler = ((ytop - ybot) as i64 * 4 / 7) as f64;
    // Explicit screen margins pin the cube to the rectangle exactly.
    if matches!(input.margins.top, MarginSpec::Screen(_))
        || matches!(input.margins.bottom, MarginSpec::Screen(_))
    {
        y_scaler = (ytop - ybot) as f64 / input.surface_scale;
    }
    if matches!(input.margins.left, MarginSpec::Screen(_))
        || matches!(input.margins.right, MarginSpec::Screen(_))
    {
        x_scaler = (xright - xleft) as f64 / input.surface_scale;
    }
    if let Some(ratio) = input.aspect.filter(|r| *r > 0.0) {
        // The device cell aspect folds into the target so the ratio holds
        // in real units, not raster units.
        let target = ratio * m.tic_v as f64 / m.tic_h.max(1) as f64;
        if y_scaler > x_scaler * target {
            y_scaler = x_scaler * target;
        } else {
            x_scaler = y_scaler / target;
        }
    }
    if y_scaler == 0.0 {
        y_scaler = 1.0;
    }
    if x_scaler == 0.0 {
        x_scaler = 1.0;
    }

    log::debug!(
        target: "surfplot",
        "boundary: rect=({xleft},{ybot})..({xright},{ytop}) key {key_rows}x{key_cols}"
    );

    Boundary {
        bounds: PlotBounds {
            xleft,
            xright,
            ybot,
            ytop,
        },
        screen: ScreenScale {
            x_scaler,
            y_scaler,
            x_middle,
            y_middle,
        },
        key: KeyReservation {
            rows: key_rows,
            cols: key_cols,
            col_width,
            entry_height,
            sample_width,
            title_height,
        },
    }
}
