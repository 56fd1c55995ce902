//! # Heliovis: environment and observer resolution
//!
//! This module defines the [`Heliovis`] struct, the façade that wires together:
//!
//! 1. **Environment state** ([`HeliovisEnv`](crate::env_state::HeliovisEnv)):
//!    the HTTP client used for trajectory-service lookups.
//! 2. **Observer resolution**: spacecraft positions from the trajectory
//!    service ([`resolve_spacecraft`](Heliovis::resolve_spacecraft)) and
//!    platform positions from image headers
//!    ([`observer_from_header`](Heliovis::observer_from_header)).
//! 3. The **end-to-end query** of the joint-visibility procedure
//!    ([`mutual_visibility_between`](Heliovis::mutual_visibility_between)).
//!
//! Nothing is cached: observers are resolved fresh per `(instrument, time)`
//! query, and the struct holds configuration only (sampling window, sample
//! count, maximum tolerated sample gap).
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use heliovis::heliovis::Heliovis;
//! use heliovis::ref_system::HelioprojPoint;
//! use heliovis::time::parse_obs_timestamp;
//! use heliovis::visibility::{check_mutual_visibility, VisibilityConfig};
//!
//! let env = Heliovis::new();
//! let epoch = parse_obs_timestamp("2022-03-30T17:21:00")?;
//!
//! // A flare position seen from an Earth-orbiting imager, checked against
//! // Solar Orbiter's vantage at the same time.
//! let sdo = env.observer_from_header(&std::fs::read_to_string("aia.header")?)?;
//! let solo = env.resolve_spacecraft("solar orbiter", epoch)?;
//!
//! let flare = HelioprojPoint::on_surface(100.0, 500.0);
//! let report = check_mutual_visibility(&sdo, &solo, &flare, &VisibilityConfig::default());
//! println!("visible from Solar Orbiter: {}", report.visible);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use hifitime::{Duration, Epoch};

use crate::env_state::HeliovisEnv;
use crate::ephemeris::spacecraft::{resolve_instrument, EARTH_BODY_ID};
use crate::ephemeris::{fetch_trajectory, nearest_record};
use crate::heliovis_errors::HeliovisError;
use crate::observers::image_meta::ImageMeta;
use crate::observers::Observer;
use crate::ref_system::{ecliptic_to_stonyhurst, HelioprojPoint};
use crate::visibility::{check_mutual_visibility, VisibilityConfig, VisibilityReport};

/// Façade for observer resolution and the end-to-end visibility query.
#[derive(Debug, Clone)]
pub struct Heliovis {
    env_state: HeliovisEnv,
    ephemeris_window: Duration,
    ephemeris_samples: usize,
    max_sample_gap: Duration,
}

impl Default for Heliovis {
    fn default() -> Self {
        Self::new()
    }
}

impl Heliovis {
    /// Construct a new [`Heliovis`] context with default sampling parameters:
    /// a ±30 minute window of 16 samples around the requested epoch, and a
    /// maximum tolerated gap of 30 minutes between the requested epoch and
    /// the nearest returned sample.
    pub fn new() -> Self {
        Heliovis {
            env_state: HeliovisEnv::new(),
            ephemeris_window: Duration::from_seconds(1800.0),
            ephemeris_samples: 16,
            max_sample_gap: Duration::from_seconds(1800.0),
        }
    }

    /// Override the trajectory sampling parameters.
    ///
    /// Arguments
    /// ---------
    /// * `window`: half-width of the sampling window around the requested epoch
    /// * `samples`: number of evenly spaced samples requested from the service
    /// * `max_gap`: maximum tolerated distance between the requested epoch and
    ///   the nearest sample before resolution fails
    pub fn with_sampling(mut self, window: Duration, samples: usize, max_gap: Duration) -> Self {
        self.ephemeris_window = window;
        self.ephemeris_samples = samples;
        self.max_sample_gap = max_gap;
        self
    }

    /// Access the shared environment (HTTP client).
    pub fn env(&self) -> &HeliovisEnv {
        &self.env_state
    }

    /// Resolve a spacecraft's heliocentric position at an epoch from the
    /// trajectory service.
    ///
    /// The service is queried over a window centered on `epoch` and the
    /// sample nearest to `epoch` is used; Earth is fetched at the same sample
    /// time to reference Stonyhurst longitude to the sub-Earth meridian. The
    /// returned observer carries the **sampled** epoch, which may differ from
    /// the requested one by up to the configured maximum gap.
    ///
    /// Arguments
    /// ---------
    /// * `instrument`: spacecraft name or numeric service body id
    ///   (see [`resolve_instrument`])
    /// * `epoch`: the time the position is wanted for
    ///
    /// Errors
    /// ------
    /// * [`HeliovisError::UnknownInstrument`] for an unresolvable identifier.
    /// * [`HeliovisError::ServiceUnreachable`] /
    ///   [`HeliovisError::MalformedEphemeris`] when the service fails or
    ///   returns an unusable payload.
    /// * [`HeliovisError::NoEphemerisSample`] when no sample lies close
    ///   enough to `epoch`.
    pub fn resolve_spacecraft(
        &self,
        instrument: &str,
        epoch: Epoch,
    ) -> Result<Observer, HeliovisError> {
        let (body_id, name) = resolve_instrument(instrument)?;

        let start = epoch - self.ephemeris_window;
        let stop = epoch + self.ephemeris_window;
        let records = fetch_trajectory(
            &self.env_state,
            body_id,
            start,
            stop,
            self.ephemeris_samples,
        )?;
        let record = nearest_record(&records, epoch, self.max_sample_gap)?;
        let sample_epoch = record.epoch();

        // Earth at the same sample time fixes the Stonyhurst prime meridian.
        let earth_records =
            fetch_trajectory(&self.env_state, EARTH_BODY_ID, sample_epoch, sample_epoch, 1)?;
        let earth = nearest_record(&earth_records, sample_epoch, self.max_sample_gap)?;

        let position = ecliptic_to_stonyhurst(&record.position(), &earth.position());
        Observer::new(position, sample_epoch, Some(name))
    }

    /// Build an observer from the metadata embedded in a calibrated image header.
    ///
    /// Convenience wrapper around [`ImageMeta::parse`] and
    /// [`ImageMeta::to_observer`]; the observer's timestamp is the image's
    /// native `DATE-OBS`.
    pub fn observer_from_header(&self, header: &str) -> Result<Observer, HeliovisError> {
        ImageMeta::parse(header)?.to_observer()
    }

    /// Resolve both instruments and run the joint-visibility query.
    ///
    /// Arguments
    /// ---------
    /// * `source_instrument`: instrument whose frame `point` is expressed in
    /// * `target_instrument`: instrument to test visibility for
    /// * `epoch`: requested observation time for both instruments
    /// * `point`: feature position in the source instrument's frame
    /// * `config`: explicit solar radius and timestamp tolerance
    ///
    /// Return
    /// ------
    /// * The [`VisibilityReport`], or a resolution error for either instrument.
    pub fn mutual_visibility_between(
        &self,
        source_instrument: &str,
        target_instrument: &str,
        epoch: Epoch,
        point: &HelioprojPoint,
        config: &VisibilityConfig,
    ) -> Result<VisibilityReport, HeliovisError> {
        let source = self.resolve_spacecraft(source_instrument, epoch)?;
        let target = self.resolve_spacecraft(target_instrument, epoch)?;

        Ok(check_mutual_visibility(&source, &target, point, config))
    }
}
