//! # Observer handling
//!
//! This module provides the [`Observer`] type: the identity, heliocentric
//! position and observation epoch of one instrument at one time. It is the
//! common product of both resolution paths, the trajectory-service lookup in
//! [`crate::ephemeris`] and the image-header path in
//! [`crate::observers::image_meta`].
//!
//! ## Frames & conventions
//!
//! - Positions are stored in the **canonical heliocentric Cartesian frame**
//!   (heliographic Stonyhurst axes): +Z along the solar rotation axis, +X in
//!   the plane containing the solar axis and the Sun–Earth line.
//! - Positions are in **kilometers**; heliographic angles in **degrees**.
//! - Position components are stored as `NotNan<f64>`: a NaN coordinate is
//!   unrepresentable, so downstream geometry never has to check for it.
//!
//! ## Lifecycle
//!
//! An `Observer` is constructed fresh per `(instrument, time)` query and never
//! mutated; nothing is cached. Two observers are transform-compatible exactly
//! because both store positions in the same canonical frame.

pub mod image_meta;

use hifitime::Epoch;
use nalgebra::Vector3;
use ordered_float::NotNan;

use crate::constants::{ArcSec, Degree, Kilometer, RADSEC};
use crate::heliovis_errors::HeliovisError;
use crate::ref_system::{cartesian_to_heliographic, heliographic_to_cartesian};

/// One instrument's heliocentric position at one observation epoch.
///
/// Units
/// -----
/// * `position`: kilometers, canonical heliocentric Cartesian frame.
/// * `epoch`: the time the position is valid for.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Optional human-readable instrument or spacecraft name.
    pub name: Option<String>,

    /// Heliocentric position in **km**, NaN-free.
    position: Vector3<NotNan<f64>>,

    /// Epoch of validity of the position.
    epoch: Epoch,
}

impl Observer {
    /// Create an observer from a heliocentric Cartesian position.
    ///
    /// Arguments
    /// ---------
    /// * `position`: heliocentric position in **km** (canonical frame)
    /// * `epoch`: epoch of validity
    /// * `name`: optional instrument name
    ///
    /// Errors
    /// ------
    /// * [`HeliovisError::InvalidFloat`] if any position component is NaN.
    pub fn new(
        position: Vector3<f64>,
        epoch: Epoch,
        name: Option<String>,
    ) -> Result<Observer, HeliovisError> {
        let position = Vector3::new(
            NotNan::new(position.x)?,
            NotNan::new(position.y)?,
            NotNan::new(position.z)?,
        );

        Ok(Observer {
            name,
            position,
            epoch,
        })
    }

    /// Create an observer from heliographic spherical coordinates.
    ///
    /// This is the constructor used for image-header platforms, whose products
    /// embed the observer's heliographic longitude, latitude and Sun distance.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: heliographic longitude in **degrees**
    /// * `latitude`: heliographic latitude in **degrees**
    /// * `distance`: Sun-to-observer distance in **km**
    /// * `epoch`: epoch of validity
    /// * `name`: optional instrument name
    pub fn from_heliographic(
        longitude: Degree,
        latitude: Degree,
        distance: Kilometer,
        epoch: Epoch,
        name: Option<String>,
    ) -> Result<Observer, HeliovisError> {
        let position = heliographic_to_cartesian(longitude, latitude, distance);
        Observer::new(position, epoch, name)
    }

    /// The heliocentric position in km.
    pub fn position(&self) -> Vector3<f64> {
        self.position.map(|x| x.into_inner())
    }

    /// The epoch the position is valid for.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Distance from the Sun center in km.
    pub fn distance_to_sun(&self) -> Kilometer {
        self.position().norm()
    }

    /// Heliographic spherical coordinates `(longitude, latitude, distance)` of
    /// this observer, in degrees and km.
    pub fn heliographic(&self) -> (Degree, Degree, Kilometer) {
        cartesian_to_heliographic(&self.position())
    }

    /// Apparent angular radius of the Sun as seen by this observer, in arcseconds.
    ///
    /// Computed as `asin(R☉ / d)` from the observer's Sun distance and an
    /// explicit physical solar radius.
    ///
    /// Arguments
    /// ---------
    /// * `solar_radius`: physical solar radius in **km**
    pub fn apparent_solar_radius(&self, solar_radius: Kilometer) -> ArcSec {
        (solar_radius / self.distance_to_sun()).asin() / RADSEC
    }
}
