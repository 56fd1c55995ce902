//! # Visibility classification
//!
//! Decide whether a transformed feature position is physically observable by
//! the target instrument, and run the end-to-end joint-visibility query.
//!
//! A defined transform result is necessary but not sufficient: a feature can
//! project to finite target-frame coordinates while sitting beyond the limb
//! (for instance a feature with an explicit height above the surface). The
//! classifier therefore always applies the on-disk test, comparing the
//! feature's angular separation from disk center against the target's
//! apparent solar radius at its own Sun distance. The boundary convention is
//! **inclusive**: a separation exactly equal to the apparent radius counts as
//! on-disk.

use hifitime::Duration;
use log::warn;

use crate::constants::{Kilometer, RADSEC, RSUN_KM};
use crate::observers::Observer;
use crate::ref_system::{HelioprojFrame, HelioprojPoint, Projection, TransformedPoint};

/// Explicit configuration for a joint-visibility query.
///
/// These are deliberately parameters rather than crate-level ambient state:
/// the physical solar radius fixes both the reference surface and the
/// apparent disk size, and the timestamp tolerance bounds how far apart the
/// two observation epochs may be before the verdict is flagged as mixing
/// spacecraft motion into the geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityConfig {
    /// Physical solar radius in km.
    pub solar_radius: Kilometer,

    /// Maximum tolerated difference between the two observers' epochs.
    pub timestamp_tolerance: Duration,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        VisibilityConfig {
            solar_radius: RSUN_KM,
            timestamp_tolerance: Duration::from_seconds(60.0),
        }
    }
}

/// Outcome of the end-to-end joint-visibility query.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityReport {
    /// The feature re-expressed in the target observer's frame, or the
    /// explicit undefined marker.
    pub target_point: TransformedPoint,

    /// Whether the feature is on-disk and unobstructed for the target.
    pub visible: bool,

    /// Epoch difference between the two observers when it exceeds the
    /// configured tolerance; `None` when the epochs agree closely enough.
    pub timestamp_skew: Option<Duration>,
}

/// Whether a defined target-frame position falls on the target's solar disk.
///
/// The angular separation from disk center is compared against the apparent
/// solar radius seen from the target's Sun distance; the boundary is
/// inclusive. An undefined projection is never on-disk.
///
/// Arguments
/// ---------
/// * `point`: the transform result in the target frame
/// * `target`: the target observer
/// * `solar_radius`: physical solar radius in km
pub fn on_disk(point: &TransformedPoint, target: &Observer, solar_radius: Kilometer) -> bool {
    let Projection::Defined { tx, ty, .. } = point.projection else {
        return false;
    };

    let tx = tx * RADSEC;
    let ty = ty * RADSEC;
    let separation = (ty.cos() * tx.cos()).clamp(-1.0, 1.0).acos();

    let apparent_radius = target.apparent_solar_radius(solar_radius) * RADSEC;
    separation <= apparent_radius
}

/// Whether the feature is observable by the target instrument at all.
///
/// An undefined transform result (line of sight off the solar sphere, or the
/// located point occulted from the target vantage) is not visible; a defined
/// result is visible when it passes the on-disk test.
pub fn is_mutually_visible(
    point: &TransformedPoint,
    target: &Observer,
    solar_radius: Kilometer,
) -> bool {
    point.is_defined() && on_disk(point, target, solar_radius)
}

/// Run the full joint-visibility determination for one feature.
///
/// Builds the two helioprojective frames, re-expresses the feature from the
/// source frame into the target frame, and classifies the result. When the
/// two observers' epochs differ by more than the configured tolerance the
/// verdict is still computed, but the skew is surfaced both as a warning and
/// in the report, since visibility across different times conflates
/// spacecraft motion with the geometric question being asked.
///
/// Arguments
/// ---------
/// * `source`: observer whose frame `point` is expressed in
/// * `target`: observer to test visibility for
/// * `point`: feature position in the source frame
/// * `config`: explicit solar radius and timestamp tolerance
pub fn check_mutual_visibility(
    source: &Observer,
    target: &Observer,
    point: &HelioprojPoint,
    config: &VisibilityConfig,
) -> VisibilityReport {
    let skew = (source.epoch() - target.epoch()).abs();
    let timestamp_skew = if skew > config.timestamp_tolerance {
        warn!(
            "observer epochs differ by {skew} (tolerance {}); the visibility verdict mixes spacecraft motion into the geometry",
            config.timestamp_tolerance
        );
        Some(skew)
    } else {
        None
    };

    let source_frame = HelioprojFrame::new(source.clone());
    let target_frame = HelioprojFrame::new(target.clone());

    let target_point = source_frame.transform_to(point, &target_frame, config.solar_radius);
    let visible = is_mutually_visible(&target_point, target, config.solar_radius);

    VisibilityReport {
        target_point,
        visible,
        timestamp_skew,
    }
}
