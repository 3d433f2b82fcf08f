//! Orthographic view transform for 3D scenes.
//!
//! `ViewState` holds user-facing view parameters (rotation angles, scales,
//! projection mode); `ViewTransform::build` freezes them together with the
//! axis ranges and plot rectangle into an immutable transform used for every
//! projection in a render pass. World coordinates entering the transform are
//! expected to already be in the linearized axis domain (see
//! [`crate::core::axis::AxisRange::normalize`]).

use glam::{DMat3, DVec3};

use crate::canvas::ScreenPoint;
use crate::core::axis::AxesRanges3D;
use crate::core::boundary::ScreenScale;
use crate::error::Result;

/// Which face of the scene cuboid faces the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Free rotation controlled by `rot_x` / `rot_z`.
    #[default]
    Free,
    /// Top-down view of the XY plane with the Y axis running backwards,
    /// matching 2D plot orientation.
    Map,
    /// Side view of the XZ plane.
    Xz,
    /// Side view of the YZ plane.
    Yz,
}

/// Placement of the base (XY) plane along the Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasePlane {
    /// Offset below z-min as a fraction of the Z span. `Relative(0.0)` puts
    /// the base plane at z-min; larger values push it further down.
    Relative(f64),
    /// Fixed Z coordinate in the axis's own domain.
    Absolute(f64),
}

impl Default for BasePlane {
    fn default() -> Self {
        BasePlane::Relative(0.5)
    }
}

/// How axis lengths relate on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewAspect {
    /// X and Y spans each fill the unit cube independently.
    #[default]
    Free,
    /// X and Y share one scale factor so equal data spans render equally.
    EqualXy,
    /// Z shares the XY scale factor as well.
    EqualXyz,
}

/// User-facing view parameters, mutable between render passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Rotation about the screen-horizontal axis, degrees.
    pub rot_x: f64,
    /// Rotation about the data Z axis, degrees.
    pub rot_z: f64,
    /// Overall scale of the projected scene.
    pub scale: f64,
    /// Extra scale applied to Z only.
    pub z_scale: f64,
    /// Rotation about the line of sight, degrees. Ignored in map view.
    pub azimuth: f64,
    /// Extra scale for the fixed projections (map, xz, yz).
    pub projection_scale: f64,
    pub projection: Projection,
    pub aspect: ViewAspect,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rot_x: 60.0,
            rot_z: 30.0,
            scale: 1.0,
            z_scale: 1.0,
            azimuth: 0.0,
            projection_scale: 1.0,
            projection: Projection::Free,
            aspect: ViewAspect::Free,
        }
    }
}

impl ViewState {
    /// Effective `(rot_x, rot_z, scale)` after the projection override.
    fn effective(&self) -> (f64, f64, f64) {
        match self.projection {
            Projection::Free => (self.rot_x, self.rot_z, self.scale),
            Projection::Map => (180.0, 0.0, 1.425 * self.projection_scale),
            Projection::Xz => (270.0, 0.0, 1.425 * self.projection_scale),
            Projection::Yz => (90.0, 90.0, 1.425 * self.projection_scale),
        }
    }
}

/// Frozen projection state for one render pass.
///
/// Built once per pass from the view, the validated axis ranges, and the plot
/// rectangle; every world-to-screen mapping goes through it.
#[derive(Debug, Clone)]
pub struct ViewTransform {
    mat: DMat3,
    scale3d: DVec3,
    center3d: DVec3,
    /// Linear-domain minima of the three ranges (after projection flips).
    min3d: DVec3,
    /// Base plane Z in the linear domain.
    pub base_z: f64,
    /// Lowest Z the scene occupies (min of z-min and base plane).
    pub floor_z: f64,
    /// Highest Z the scene occupies (max of z-max and base plane).
    pub ceiling_z: f64,
    /// Axis ranges as actually used, including the Y/Z flips the fixed
    /// projections apply.
    pub axes: AxesRanges3D,
    screen: ScreenScale,
}

impl ViewTransform {
    /// Validate the ranges and freeze the full transform.
    ///
    /// `draws_base` widens the floor/ceiling interval to include the base
    /// plane; pass false when neither base grid nor base border is drawn.
    pub fn build(
        view: &ViewState,
        axes: &AxesRanges3D,
        base: BasePlane,
        draws_base: bool,
        screen: ScreenScale,
    ) -> Result<Self> {
        axes.validate()?;

        let mut axes = *axes;
        // The fixed projections reverse one axis so the image reads like the
        // corresponding 2D plot.
        match view.projection {
            Projection::Map => axes.y.flip(),
            Projection::Yz => axes.z.flip(),
            _ => {}
        }

        let (rot_x, rot_z, scale) = view.effective();
        let mut mat = DMat3::from_rotation_z(-rot_z.to_radians());
        mat = DMat3::from_rotation_x(-rot_x.to_radians()) * mat;
        mat = scale / 2.0 * mat;
        if view.azimuth != 0.0 && view.projection != Projection::Map {
            mat = DMat3::from_rotation_z(-view.azimuth.to_radians()) * mat;
        }

        let (xmin1, xmax1) = axes.x.linear_span();
        let (ymin1, ymax1) = axes.y.linear_span();
        let (zmin1, zmax1) = axes.z.linear_span();

        let base_z = match base {
            BasePlane::Absolute(z) => {
                // An absolute plane position outside a log axis's domain is
                // unrepresentable; fall back to the axis minimum.
                if axes.z.link.is_some() && !axes.z.normalize(z).is_finite() {
                    zmin1
                } else {
                    axes.z.normalize(z)
                }
            }
            BasePlane::Relative(frac) => zmin1 - (zmax1 - zmin1) * frac,
        };

        let (mut floor_z, mut ceiling_z) = if draws_base {
            if zmin1 > zmax1 {
                (zmin1.max(base_z), zmax1.min(base_z))
            } else {
                (zmin1.min(base_z), zmax1.max(base_z))
            }
        } else {
            (zmin1, zmax1)
        };
        if floor_z == ceiling_z {
            // Degenerate only when draws_base collapsed an inverted range.
            floor_z = zmin1;
            ceiling_z = zmax1;
        }

        // The xz/yz side views pin the base plane to the near face so axis
        // decorations land next to the plot instead of behind it.
        let base_z = match view.projection {
            Projection::Xz => floor_z,
            Projection::Yz => ceiling_z,
            _ => base_z,
        };

        let mut xscale3d = 2.0 / (xmax1 - xmin1);
        let mut yscale3d = 2.0 / (ymax1 - ymin1);
        let mut zscale3d = 2.0 / (ceiling_z - floor_z) * view.z_scale;

        let mut xcenter3d = 0.0;
        let mut ycenter3d = 0.0;
        if view.aspect != ViewAspect::Free {
            if yscale3d.abs() > xscale3d.abs() {
                ycenter3d = 1.0 - xscale3d / yscale3d;
                yscale3d = xscale3d;
            } else if xscale3d.abs() > yscale3d.abs() {
                xcenter3d = 1.0 - yscale3d / xscale3d;
                xscale3d = yscale3d;
            }
            if view.aspect == ViewAspect::EqualXyz {
                zscale3d = xscale3d;
            }
        }
        // Without this the rotation center sits at the bottom of the scene
        // instead of its middle.
        let zcenter3d = -(ceiling_z - floor_z) / 2.0 * zscale3d + 1.0;

        log::trace!(
            target: "surfplot",
            "view transform: rot_x={rot_x} rot_z={rot_z} scale={scale} base_z={base_z} floor={floor_z} ceiling={ceiling_z}"
        );

        Ok(Self {
            mat,
            scale3d: DVec3::new(xscale3d, yscale3d, zscale3d),
            center3d: DVec3::new(xcenter3d, ycenter3d, zcenter3d),
            min3d: DVec3::new(xmin1, ymin1, floor_z),
            base_z,
            floor_z,
            ceiling_z,
            axes,
            screen,
        })
    }

    /// Map linearized world coordinates into the view cube and rotate.
    ///
    /// The result's x/y are normalized screen offsets in roughly [-1, 1];
    /// z is the view-space depth used for painter's-algorithm ordering
    /// (larger means nearer the viewer).
    pub fn map3d(&self, x: f64, y: f64, z: f64) -> DVec3 {
        let v = (DVec3::new(x, y, z) - self.min3d) * self.scale3d + self.center3d - DVec3::ONE;
        self.mat * v
    }

    /// Project to integer canvas coordinates, returning the view-space depth
    /// alongside so callers can keep it across clipping.
    pub fn project(&self, x: f64, y: f64, z: f64) -> (ScreenPoint, f64) {
        let v = self.map3d(x, y, z);
        (self.screen.to_screen(v.x, v.y), v.z)
    }

    /// Like [`project`](Self::project) but without the integer truncation,
    /// for text placement.
    pub fn project_f64(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let v = self.map3d(x, y, z);
        let (sx, sy) = self.screen.to_screen_f64(v.x, v.y);
        (sx, sy, v.z)
    }

    pub fn screen(&self) -> ScreenScale {
        self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::axis::AxisRange;

    fn unit_axes() -> AxesRanges3D {
        AxesRanges3D::new(
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
            AxisRange::new(0.0, 1.0),
        )
    }

    fn test_screen() -> ScreenScale {
        ScreenScale {
            x_scaler: 320.0,
            y_scaler: 240.0,
            x_middle: 400,
            y_middle: 300,
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let view = ViewState::default();
        let axes = unit_axes();
        let t1 =
            ViewTransform::build(&view, &axes, BasePlane::default(), true, test_screen()).unwrap();
        let t2 =
            ViewTransform::build(&view, &axes, BasePlane::default(), true, test_screen()).unwrap();
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (0.5, 0.25, 1.0), (1.0, 1.0, 0.5)] {
            assert_eq!(t1.project(x, y, z), t2.project(x, y, z));
        }
    }

    #[test]
    fn test_cube_corners_project_distinct() {
        // At the default 60/30 view no two corners of the unit cube land on
        // the same pixel.
        let t = ViewTransform::build(
            &ViewState::default(),
            &unit_axes(),
            BasePlane::Relative(0.0),
            true,
            test_screen(),
        )
        .unwrap();
        let mut seen = Vec::new();
        for zi in 0..2 {
            for yi in 0..2 {
                for xi in 0..2 {
                    let (p, _) = t.project(xi as f64, yi as f64, zi as f64);
                    assert!(!seen.contains(&(p.x, p.y)), "corner collision at {p:?}");
                    seen.push((p.x, p.y));
                }
            }
        }
    }

    #[test]
    fn test_higher_z_is_higher_on_screen() {
        let t = ViewTransform::build(
            &ViewState::default(),
            &unit_axes(),
            BasePlane::Relative(0.0),
            true,
            test_screen(),
        )
        .unwrap();
        let (lo, _) = t.project(0.5, 0.5, 0.0);
        let (hi, _) = t.project(0.5, 0.5, 1.0);
        assert!(hi.y > lo.y);
    }

    #[test]
    fn test_map_view_matches_2d_orientation() {
        let view = ViewState {
            projection: Projection::Map,
            ..Default::default()
        };
        let t = ViewTransform::build(&view, &unit_axes(), BasePlane::default(), true, test_screen())
            .unwrap();
        // The flipped Y range cancels the 180 degree tilt, so the image
        // reads like a 2D plot: larger data Y is higher on screen.
        let (near, _) = t.project(0.5, 0.0, 0.0);
        let (far, _) = t.project(0.5, 1.0, 0.0);
        assert!(far.y > near.y);
        // Z must not influence the image position in a top-down view.
        let (a, _) = t.project(0.3, 0.7, 0.0);
        let (b, _) = t.project(0.3, 0.7, 1.0);
        assert_eq!((a.x, a.y), (b.x, b.y));
    }

    #[test]
    fn test_relative_base_plane_below_min() {
        let t = ViewTransform::build(
            &ViewState::default(),
            &unit_axes(),
            BasePlane::Relative(0.5),
            true,
            test_screen(),
        )
        .unwrap();
        assert_eq!(t.base_z, -0.5);
        assert_eq!(t.floor_z, -0.5);
        assert_eq!(t.ceiling_z, 1.0);
    }

    #[test]
    fn test_absolute_base_inside_range() {
        let t = ViewTransform::build(
            &ViewState::default(),
            &unit_axes(),
            BasePlane::Absolute(0.25),
            true,
            test_screen(),
        )
        .unwrap();
        assert_eq!(t.base_z, 0.25);
        assert_eq!(t.floor_z, 0.0);
        assert_eq!(t.ceiling_z, 1.0);
    }

    #[test]
    fn test_degenerate_axis_rejected() {
        let mut axes = unit_axes();
        axes.z = AxisRange::new(2.0, 2.0);
        let r = ViewTransform::build(
            &ViewState::default(),
            &axes,
            BasePlane::default(),
            true,
            test_screen(),
        );
        assert!(r.is_err());
    }
}
