//! # Reference frames and point transformation
//!
//! This module implements the closed set of coordinate frames used by the
//! crate and the transformation between them:
//!
//! - the **canonical heliocentric Cartesian frame** (heliographic Stonyhurst
//!   axes: +Z along the solar rotation axis, +X in the plane containing the
//!   solar axis and the Sun–Earth line), in which every
//!   [`Observer`](crate::observers::Observer) position is expressed;
//! - the **helioprojective frame** ([`HelioprojFrame`]): the angular
//!   projection frame centered on one observer's line of sight to the Sun,
//!   parameterized by that observer's position and epoch.
//!
//! Only these two frame kinds exist; a transform between two helioprojective
//! frames always goes through the heliocentric frame, and no frame
//! registration mechanism is involved.
//!
//! ## Conventions
//!
//! - Helioprojective coordinates `(tx, ty)` are in **arcseconds**: `tx`
//!   positive toward the observer's west limb, `ty` positive toward solar
//!   north, `(0, 0)` at disk center.
//! - When a point carries no radial distance it is taken to lie on the solar
//!   sphere as seen by its own frame's observer (nearest ray intersection).
//! - A transform result is an explicit tagged [`Projection`], never NaN. A
//!   geometrically impossible reprojection is a valid outcome
//!   ([`Projection::Undefined`]), not an error.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{
    ArcSec, Degree, Kilometer, Radian, EPS, RADEG, RADSEC, SOLAR_EQUATOR_INCLINATION,
    SOLAR_EQUATOR_NODE,
};
use crate::observers::Observer;

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in **radians** (positive = direct/trigonometric sense)
/// * `k`: index of the axis of rotation (`0` → X, `1` → Y, `2` → Z)
///
/// Return
/// ------
/// * A 3×3 rotation matrix `R` such that the rotated vector is `x' = R · x`.
///
/// Panics
/// ------
/// * If `k > 2`, as only axes 0-2 are valid.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation matrix from heliocentric **ecliptic J2000** coordinates to the
/// solar-equator frame (+Z along the solar rotation axis, +X toward the
/// ascending node of the solar equator on the ecliptic).
///
/// Built from the fixed J2000 Carrington elements
/// ([`SOLAR_EQUATOR_INCLINATION`], [`SOLAR_EQUATOR_NODE`]).
pub fn rot_ecliptic_to_solar() -> Matrix3<f64> {
    let node = SOLAR_EQUATOR_NODE * RADEG;
    let incl = SOLAR_EQUATOR_INCLINATION * RADEG;

    rotmt(-incl, 0) * rotmt(-node, 2)
}

/// Re-express a heliocentric **ecliptic J2000** position in the canonical
/// Stonyhurst frame, given Earth's ecliptic position at the same epoch.
///
/// The Stonyhurst prime meridian is the plane containing the solar rotation
/// axis and the Sun–Earth line, so the longitude zero-point is set by
/// rotating Earth onto it.
///
/// Arguments
/// ---------
/// * `position`: heliocentric ecliptic position of the body, in km
/// * `earth`: heliocentric ecliptic position of Earth at the same epoch, in km
///
/// Return
/// ------
/// * The body's position in the canonical Stonyhurst Cartesian frame, in km.
pub fn ecliptic_to_stonyhurst(position: &Vector3<f64>, earth: &Vector3<f64>) -> Vector3<f64> {
    let rot = rot_ecliptic_to_solar();
    let position_solar = rot * position;
    let earth_solar = rot * earth;

    let earth_lon = earth_solar.y.atan2(earth_solar.x);
    rotmt(-earth_lon, 2) * position_solar
}

/// Convert heliographic spherical coordinates to canonical Cartesian ones.
///
/// Arguments
/// ---------
/// * `longitude`: heliographic longitude in **degrees**
/// * `latitude`: heliographic latitude in **degrees**
/// * `radius`: distance from Sun center in **km**
pub fn heliographic_to_cartesian(
    longitude: Degree,
    latitude: Degree,
    radius: Kilometer,
) -> Vector3<f64> {
    let lon = longitude * RADEG;
    let lat = latitude * RADEG;

    Vector3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    )
}

/// Convert a canonical Cartesian position to heliographic spherical
/// coordinates `(longitude, latitude, radius)` in degrees and km.
pub fn cartesian_to_heliographic(position: &Vector3<f64>) -> (Degree, Degree, Kilometer) {
    let radius = position.norm();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let latitude = (position.z / radius).asin() / RADEG;
    let longitude = position.y.atan2(position.x) / RADEG;

    (longitude, latitude, radius)
}

/// An angular position expressed in one observer's helioprojective frame.
///
/// The pair `(tx, ty)` is in arcseconds; `distance`, when present, is the
/// line-of-sight range from the observer in km. Without a distance the point
/// is assumed to lie on the visible solar surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelioprojPoint {
    pub tx: ArcSec,
    pub ty: ArcSec,
    pub distance: Option<Kilometer>,
}

impl HelioprojPoint {
    /// A point assumed to lie on the visible solar surface.
    pub fn on_surface(tx: ArcSec, ty: ArcSec) -> Self {
        HelioprojPoint {
            tx,
            ty,
            distance: None,
        }
    }

    /// A point at an explicit line-of-sight range from the observer.
    pub fn with_distance(tx: ArcSec, ty: ArcSec, distance: Kilometer) -> Self {
        HelioprojPoint {
            tx,
            ty,
            distance: Some(distance),
        }
    }
}

/// Why a transform produced no target-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedReason {
    /// The source line of sight does not intersect the solar sphere and no
    /// explicit distance was supplied.
    OffLimbSight,
    /// The solar-sphere intersection lies behind the source observer.
    BehindObserver,
    /// The located point is hidden by the Sun as seen from the target observer.
    SunOcculted,
}

/// Tagged outcome of a frame transform: either target-frame coordinates or an
/// explicit undefined marker. Replaces NaN sentinels so that an undefined
/// result cannot silently propagate through later arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Defined {
        tx: ArcSec,
        ty: ArcSec,
        distance: Kilometer,
    },
    Undefined(UndefinedReason),
}

/// A point re-expressed in a different observer's helioprojective frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedPoint {
    pub projection: Projection,
}

impl TransformedPoint {
    pub fn is_defined(&self) -> bool {
        matches!(self.projection, Projection::Defined { .. })
    }

    /// The target-frame coordinates `(tx, ty, distance)` when defined.
    pub fn coords(&self) -> Option<(ArcSec, ArcSec, Kilometer)> {
        match self.projection {
            Projection::Defined { tx, ty, distance } => Some((tx, ty, distance)),
            Projection::Undefined(_) => None,
        }
    }
}

/// Helioprojective frame of one observer.
///
/// The frame's origin-of-projection is the observer's heliocentric position
/// and its timestamp is the observer's epoch. Construction is a pure function
/// of the observer; the orthonormal projection axes are precomputed once so
/// repeated transforms do not redo the trigonometry.
///
/// The frame axes are `x̂` toward solar west, `ŷ` toward projected solar
/// north, `ẑ` from the observer toward Sun center, matching the sky as the
/// observer sees it: for an observer on the prime meridian, positive `tx`
/// looks toward heliographic longitude +90°. An observer sitting on the solar
/// rotation axis has no projected north; the sub-Earth meridian plane is used
/// as the reference direction instead.
#[derive(Debug, Clone, PartialEq)]
pub struct HelioprojFrame {
    observer: Observer,
    helio_to_frame: Matrix3<f64>,
    frame_to_helio: Matrix3<f64>,
}

impl HelioprojFrame {
    /// Build the helioprojective frame of `observer`.
    ///
    /// The observer must not sit exactly at the Sun center, which has no
    /// defined line of sight to project along.
    pub fn new(observer: Observer) -> HelioprojFrame {
        let position = observer.position();
        let sunward = -position.normalize();

        let pole = Vector3::z();
        let north_proj = pole - pole.dot(&sunward) * sunward;
        let north = if north_proj.norm() > EPS {
            north_proj.normalize()
        } else {
            let meridian = Vector3::x();
            (meridian - meridian.dot(&sunward) * sunward).normalize()
        };

        let west = sunward.cross(&north);

        let helio_to_frame = Matrix3::from_columns(&[west, north, sunward]).transpose();
        let frame_to_helio = helio_to_frame.transpose();

        HelioprojFrame {
            observer,
            helio_to_frame,
            frame_to_helio,
        }
    }

    /// The observer this frame projects from.
    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Locate a point of this frame in heliocentric Cartesian coordinates.
    ///
    /// With an explicit distance the point is placed along the line of sight
    /// at that range. Without one, the line of sight is intersected with the
    /// solar sphere of radius `solar_radius` and the nearer intersection is
    /// used.
    ///
    /// Return
    /// ------
    /// * The heliocentric position in km, or the [`UndefinedReason`] when the
    ///   line of sight misses the sphere or intersects it behind the observer.
    ///   The `Err` branch is a geometric outcome, not a failure.
    pub fn to_heliocentric(
        &self,
        point: &HelioprojPoint,
        solar_radius: Kilometer,
    ) -> Result<Vector3<f64>, UndefinedReason> {
        let observer = self.observer.position();

        let tx = point.tx * RADSEC;
        let ty = point.ty * RADSEC;
        let dir_frame = Vector3::new(ty.cos() * tx.sin(), ty.sin(), ty.cos() * tx.cos());
        let dir = self.frame_to_helio * dir_frame;

        let range = match point.distance {
            Some(distance) => distance,
            None => {
                // Ray-sphere intersection: |observer + t·dir| = solar_radius
                let b = observer.dot(&dir);
                let disc = b * b - (observer.norm_squared() - solar_radius * solar_radius);
                if disc < 0.0 {
                    return Err(UndefinedReason::OffLimbSight);
                }

                let range = -b - disc.sqrt();
                if range <= 0.0 {
                    return Err(UndefinedReason::BehindObserver);
                }
                range
            }
        };

        Ok(observer + range * dir)
    }

    /// Project a heliocentric position into this frame's angular coordinates.
    ///
    /// Return
    /// ------
    /// * `(tx, ty, distance)` in arcseconds and km.
    pub fn project(&self, position: &Vector3<f64>) -> (ArcSec, ArcSec, Kilometer) {
        let rel = position - self.observer.position();
        let in_frame = self.helio_to_frame * rel;

        let distance = in_frame.norm();
        if distance == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let tx = in_frame.x.atan2(in_frame.z) / RADSEC;
        let ty = (in_frame.y / distance).asin() / RADSEC;

        (tx, ty, distance)
    }

    /// Re-express a point of this frame in `target`'s frame.
    ///
    /// The point is first located in heliocentric Cartesian coordinates using
    /// this frame's observer (solar-sphere intersection when no distance is
    /// given), then reprojected from the target observer's vantage.
    ///
    /// The result is marked [`Projection::Undefined`] when the source line of
    /// sight cannot be located on the sphere, or when the located point is
    /// occulted by the Sun from the target vantage (behind the limb). A
    /// defined result can still lie off the target's solar disk; callers that
    /// need physical visibility must apply
    /// [`on_disk`](crate::visibility::on_disk) rather than rely on
    /// definedness alone.
    ///
    /// Arguments
    /// ---------
    /// * `point`: angular coordinates in this frame
    /// * `target`: destination frame
    /// * `solar_radius`: physical solar radius in **km**, used both as the
    ///   reference surface and for the occultation test
    pub fn transform_to(
        &self,
        point: &HelioprojPoint,
        target: &HelioprojFrame,
        solar_radius: Kilometer,
    ) -> TransformedPoint {
        let located = match self.to_heliocentric(point, solar_radius) {
            Ok(position) => position,
            Err(reason) => {
                return TransformedPoint {
                    projection: Projection::Undefined(reason),
                }
            }
        };

        if sun_occults(&located, &target.observer.position(), solar_radius) {
            return TransformedPoint {
                projection: Projection::Undefined(UndefinedReason::SunOcculted),
            };
        }

        let (tx, ty, distance) = target.project(&located);
        TransformedPoint {
            projection: Projection::Defined { tx, ty, distance },
        }
    }
}

/// Whether the solar sphere hides `point` from an observer at `observer`.
///
/// A point on the near hemisphere is visible (the sight line first meets the
/// sphere at the point itself); a tangent sight line counts as visible.
fn sun_occults(point: &Vector3<f64>, observer: &Vector3<f64>, solar_radius: Kilometer) -> bool {
    // Below the photosphere: never visible.
    if point.norm() < solar_radius * (1.0 - 1e-9) {
        return true;
    }

    let segment = point - observer;
    let length = segment.norm();
    if length == 0.0 {
        return false;
    }
    let dir = segment / length;

    let b = observer.dot(&dir);
    let disc = b * b - (observer.norm_squared() - solar_radius * solar_radius);
    if disc <= 0.0 {
        return false;
    }

    let first_hit = -b - disc.sqrt();
    first_hit > 0.0 && first_hit < length * (1.0 - 1e-9)
}
