//! # Constants and type definitions for heliovis
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `heliovis` library.
//!
//! ## Overview
//!
//! - Solar and geometric constants
//! - Unit conversions (degrees and arcseconds to radians, JD to MJD, AU to km)
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules: observer resolution, reference frames,
//! and visibility classification.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU_KM: f64 = 149_597_870.7;

/// Nominal solar radius in kilometers (IAU 2015 resolution B3)
pub const RSUN_KM: f64 = 695_700.0;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-6;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Inclination of the solar equator on the ecliptic of J2000, in degrees
/// (Carrington elements).
pub const SOLAR_EQUATOR_INCLINATION: f64 = 7.25;

/// Ecliptic longitude of the ascending node of the solar equator at J2000,
/// in degrees (Carrington elements, precession not applied).
pub const SOLAR_EQUATOR_NODE: f64 = 75.76;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
