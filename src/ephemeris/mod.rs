//! # Trajectory service client
//!
//! Query the JPL Horizons file API for time-tagged heliocentric position
//! vectors of a spacecraft, and pick the sample nearest to a requested epoch.
//!
//! The service is asked for a VECTORS table centered on the Sun body center,
//! in km, over an explicit list of sample epochs, and the CSV block between
//! the `$$SOE`/`$$EOE` markers of the response is deserialized into
//! [`EphemerisRecord`] values. Positions come back in the heliocentric
//! ecliptic J2000 convention and are rotated into the canonical Stonyhurst
//! frame by the resolver in [`crate::heliovis`].
//!
//! Every failure mode is reported to the caller: an unreachable service, a
//! response with no data block, and a sample grid that leaves the requested
//! epoch uncovered are all distinct errors, and none of them is retried or
//! silently defaulted.

pub mod spacecraft;

use hifitime::{Duration, Epoch, TimeScale};
use itertools::Itertools;
use log::debug;
use nalgebra::Vector3;
use regex::Regex;

use crate::constants::JDTOMJD;
use crate::env_state::HeliovisEnv;
use crate::heliovis_errors::HeliovisError;
use crate::time::epoch_linspace;

const HORIZONS_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons_file.api";

/// One time-tagged position sample from the trajectory service.
///
/// `x`, `y`, `z` are the heliocentric ecliptic J2000 position components in
/// km; `jd` is the sample time as a Julian date in TDB.
#[derive(Debug, serde::Deserialize, PartialEq)]
pub struct EphemerisRecord {
    #[serde(rename = "JDTDB")]
    jd: f64,
    #[serde(rename = "CalendarDate(TDB)")]
    date: String,
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
    #[serde(rename = "Z")]
    z: f64,
}

impl EphemerisRecord {
    /// Position vector in km (heliocentric ecliptic J2000).
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Epoch of the sample.
    pub fn epoch(&self) -> Epoch {
        Epoch::from_mjd_in_time_scale(self.jd - JDTOMJD, TimeScale::TDB)
    }
}

/// Fetch heliocentric position samples for one body over a time window.
///
/// Arguments
/// ---------
/// * `env_state`: environment holding the HTTP client
/// * `body_id`: trajectory-service body id (spacecraft ids are negative)
/// * `start`, `stop`: window bounds, both included in the sample grid
/// * `samples`: number of evenly spaced samples to request
///
/// Return
/// ------
/// * The parsed records, in the service's time order.
pub fn fetch_trajectory(
    env_state: &HeliovisEnv,
    body_id: i64,
    start: Epoch,
    stop: Epoch,
    samples: usize,
) -> Result<Vec<EphemerisRecord>, HeliovisError> {
    debug!(
        "requesting {samples} trajectory samples for body {body_id} over [{start}, {stop}]"
    );

    let response = request_vectors(env_state, body_id, start, stop, samples)?;
    deserialize_vectors(&response)
}

/// Request the trajectory service for a VECTORS table and return the raw response.
fn request_vectors(
    env_state: &HeliovisEnv,
    body_id: i64,
    start: Epoch,
    stop: Epoch,
    samples: usize,
) -> Result<String, HeliovisError> {
    let tlist = epoch_linspace(start, stop, samples)
        .iter()
        .map(|epoch| epoch.to_mjd_utc_days())
        .join(",");

    let requested_params = format!(
        "
!$$SOF
COMMAND='{body_id}'
OBJ_DATA='NO'
MAKE_EPHEM='YES'
TABLE_TYPE='VECTORS'
CENTER='500@10'
TLIST_TYPE=MJD
TLIST={tlist}
CSV_FORMAT=YES
REF_SYSTEM=ICRF
OUT_UNITS=KM-S
REF_PLANE=ECLIPTIC
VEC_TABLE=1
"
    );

    env_state.post_form(
        HORIZONS_API_URL,
        &[("format", "text"), ("input", &requested_params)],
    )
}

/// Parse the raw service response into position records.
///
/// The data lines live between the `$$SOE` and `$$EOE` markers. The VEC_TABLE=1
/// CSV column layout is fixed, so the header is synthesized rather than scraped
/// from the response preamble.
///
/// Return
/// ------
/// * The parsed records, or `MalformedEphemeris` when the markers are absent,
///   a row does not deserialize, or no row is present at all.
fn deserialize_vectors(response: &str) -> Result<Vec<EphemerisRecord>, HeliovisError> {
    let data_regex =
        Regex::new(r"\$\$SOE\r?\n([\s\S]*?)\$\$EOE").expect("static regex must compile");

    let block = data_regex
        .captures(response)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| {
            HeliovisError::MalformedEphemeris(format!(
                "no $$SOE/$$EOE data block in response: {}",
                response.chars().take(200).collect::<String>()
            ))
        })?
        .as_str();

    let rows = block
        .lines()
        .map(|line| line.replace(' ', "").trim_end_matches(',').to_string())
        .filter(|line| !line.is_empty())
        .join("\n");

    let data = format!("JDTDB,CalendarDate(TDB),X,Y,Z\n{rows}");

    let mut csv_reader = csv::Reader::from_reader(data.as_bytes());
    let records = csv_reader
        .deserialize::<EphemerisRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| HeliovisError::MalformedEphemeris(err.to_string()))?;

    if records.is_empty() {
        return Err(HeliovisError::MalformedEphemeris(
            "data block contains no samples".to_string(),
        ));
    }

    Ok(records)
}

/// Select the record nearest to `epoch`, requiring it within `max_gap`.
///
/// Return
/// ------
/// * The nearest record, or `NoEphemerisSample` when the nearest sample is
///   further than `max_gap` away from the requested epoch.
pub fn nearest_record<'a>(
    records: &'a [EphemerisRecord],
    epoch: Epoch,
    max_gap: Duration,
) -> Result<&'a EphemerisRecord, HeliovisError> {
    let (record, gap) = records
        .iter()
        .map(|record| (record, (record.epoch() - epoch).abs()))
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .ok_or_else(|| HeliovisError::MalformedEphemeris("empty sample set".to_string()))?;

    if gap > max_gap {
        return Err(HeliovisError::NoEphemerisSample {
            requested: epoch,
            max_gap,
            nearest_gap: gap,
        });
    }

    Ok(record)
}
