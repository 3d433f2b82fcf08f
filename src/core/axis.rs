//! Per-axis ranges and non-linear link functions.
//!
//! Every logical axis (X, Y, Z, the secondary pair, and the color axis) owns
//! one `AxisRange`, created at plot-setup time and mutated only between
//! render passes. Non-linear axes carry a link function that maps their own
//! domain onto the linear domain of a primary axis; coordinate values handed
//! to the view transform are expected to already live in that linearized
//! domain.

use crate::error::{PlotError, Result};

/// Link from a non-linear axis domain into its primary axis's linear domain.
///
/// The mapping must be monotonic over the axis range; `AxisRange::validate`
/// samples it to check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisLink {
    /// Logarithm with the given base (the classic `set log` case).
    Log { base: f64 },
    /// Arbitrary monotonic mapping supplied by the caller.
    Custom(fn(f64) -> f64),
}

impl AxisLink {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            AxisLink::Log { base } => value.ln() / base.ln(),
            AxisLink::Custom(f) => f(value),
        }
    }
}

/// Min/max bounds of one logical axis, plus the optional non-linear link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub link: Option<AxisLink>,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            link: None,
        }
    }

    pub fn with_link(mut self, link: AxisLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Map a data value into the linear domain. Identity for linear axes.
    pub fn normalize(&self, value: f64) -> f64 {
        match &self.link {
            Some(link) => link.apply(value),
            None => value,
        }
    }

    /// The `(min, max)` pair in the linear (primary) domain, used for
    /// scale-factor computation.
    pub fn linear_span(&self) -> (f64, f64) {
        (self.normalize(self.min), self.normalize(self.max))
    }

    /// True when `value` lies within the (possibly inverted) range.
    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value >= lo && value <= hi
    }

    /// Swap min and max (used by the YZ projection to flip the Z axis).
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.min, &mut self.max);
    }

    /// Reject degenerate or non-monotonic configurations before projection.
    pub fn validate(&self, axis: &'static str) -> Result<()> {
        if self.min == self.max {
            return Err(PlotError::DegenerateAxis {
                axis,
                value: self.min,
            });
        }
        if let Some(link) = &self.link {
            // Sample the link across the range; a monotonic function never
            // reverses direction between consecutive samples.
            const SAMPLES: usize = 16;
            let step = (self.max - self.min) / SAMPLES as f64;
            let mut prev = link.apply(self.min);
            let mut direction = 0.0f64;
            for i in 1..=SAMPLES {
                let cur = link.apply(self.min + step * i as f64);
                let d = cur - prev;
                if d != 0.0 {
                    if direction != 0.0 && d.signum() != direction {
                        return Err(PlotError::NonMonotonicLink {
                            axis,
                            min: self.min,
                            max: self.max,
                        });
                    }
                    direction = d.signum();
                }
                prev = cur;
            }
        }
        Ok(())
    }
}

/// The three primary ranges consumed by the view transform and clipper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesRanges3D {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl AxesRanges3D {
    pub fn new(x: AxisRange, y: AxisRange, z: AxisRange) -> Self {
        Self { x, y, z }
    }

    pub fn validate(&self) -> Result<()> {
        self.x.validate("x")?;
        self.y.validate("y")?;
        self.z.validate("z")?;
        Ok(())
    }

    /// All three coordinates inside their ranges.
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        self.x.contains(x) && self.y.contains(y) && self.z.contains(z)
    }

    /// The same ranges expressed in the linear domain, links resolved.
    /// Classification and clipping happen against these.
    pub fn linearized(&self) -> AxesRanges3D {
        let lin = |a: &AxisRange| {
            let (min, max) = a.linear_span();
            AxisRange::new(min, max)
        };
        AxesRanges3D::new(lin(&self.x), lin(&self.y), lin(&self.z))
    }

    /// Map a data-domain point into the linear domain.
    pub fn normalize_point(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        (
            self.x.normalize(x),
            self.y.normalize(y),
            self.z.normalize(z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_axis_is_identity() {
        let axis = AxisRange::new(0.0, 10.0);
        assert_eq!(axis.normalize(3.5), 3.5);
        assert_eq!(axis.linear_span(), (0.0, 10.0));
    }

    #[test]
    fn test_log_link_maps_decades() {
        let axis = AxisRange::new(1.0, 1000.0).with_link(AxisLink::Log { base: 10.0 });
        assert!((axis.normalize(100.0) - 2.0).abs() < 1e-12);
        let (lo, hi) = axis.linear_span();
        assert!(lo.abs() < 1e-12);
        assert!((hi - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let axis = AxisRange::new(4.0, 4.0);
        assert!(axis.validate("x").is_err());
    }

    #[test]
    fn test_non_monotonic_link_rejected() {
        fn parabola(v: f64) -> f64 {
            (v - 5.0) * (v - 5.0)
        }
        let axis = AxisRange::new(0.0, 10.0).with_link(AxisLink::Custom(parabola));
        assert!(matches!(
            axis.validate("x"),
            Err(PlotError::NonMonotonicLink { .. })
        ));
    }

    #[test]
    fn test_inverted_range_contains() {
        let axis = AxisRange::new(10.0, 0.0);
        assert!(axis.contains(5.0));
        assert!(!axis.contains(11.0));
    }
}
