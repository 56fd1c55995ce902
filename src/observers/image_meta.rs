//! Metadata of a calibrated solar image, as embedded in its header.
//!
//! Calibrated imagery carries the observing platform's own heliographic
//! position in named header fields, so an [`Observer`] can be built without
//! any trajectory-service lookup. The parser accepts FITS-style cards
//! (`KEY = value / comment`), one per line. A missing or unparseable required
//! field is a hard error; no position field is ever defaulted.

use std::collections::HashMap;
use std::path::Path;

use hifitime::Epoch;

use crate::constants::{ArcSec, Degree, Kilometer};
use crate::heliovis_errors::HeliovisError;
use crate::observers::Observer;
use crate::time::parse_obs_timestamp;

/// Observer-related metadata parsed from an image header.
///
/// Required fields: `HGLN_OBS`, `HGLT_OBS` (heliographic longitude and
/// latitude of the platform, degrees), `DSUN_OBS` (Sun-to-platform distance,
/// meters per the FITS convention), `DATE-OBS` (observation timestamp).
/// `INSTRUME`, `WAVELNTH` and `RSUN_OBS` are descriptive and optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMeta {
    /// Instrument name, when the header declares one.
    pub instrument: Option<String>,

    /// Observation wavelength, when the header declares one.
    pub wavelength: Option<f64>,

    /// Heliographic longitude of the platform in degrees.
    pub hgln_obs: Degree,

    /// Heliographic latitude of the platform in degrees.
    pub hglt_obs: Degree,

    /// Sun-to-platform distance in **km** (converted from the header's meters).
    pub dsun_obs: Kilometer,

    /// Nominal apparent solar radius recorded by the instrument, in arcseconds.
    pub rsun_obs: Option<ArcSec>,

    /// Observation timestamp.
    pub date_obs: Epoch,
}

impl ImageMeta {
    /// Parse header text into an [`ImageMeta`].
    ///
    /// Arguments
    /// ---------
    /// * `header`: header cards, one `KEY = value` per line. `COMMENT`,
    ///   `HISTORY`, blank and `END` cards are ignored.
    ///
    /// Errors
    /// ------
    /// * [`HeliovisError::MissingMetadataField`] when a required field is absent.
    /// * [`HeliovisError::MalformedMetadataField`] when a numeric field does
    ///   not parse or is non-positive where a distance is expected.
    /// * [`HeliovisError::MalformedTimestamp`] when `DATE-OBS` is unparseable.
    pub fn parse(header: &str) -> Result<ImageMeta, HeliovisError> {
        let fields = collect_cards(header);

        let hgln_obs = required_f64(&fields, "HGLN_OBS")?;
        let hglt_obs = required_f64(&fields, "HGLT_OBS")?;

        let dsun_m = required_f64(&fields, "DSUN_OBS")?;
        if dsun_m <= 0.0 {
            return Err(HeliovisError::MalformedMetadataField {
                field: "DSUN_OBS".to_string(),
                value: dsun_m.to_string(),
            });
        }

        let date_raw = fields
            .get("DATE-OBS")
            .ok_or_else(|| HeliovisError::MissingMetadataField("DATE-OBS".to_string()))?;
        let date_obs = parse_obs_timestamp(date_raw)?;

        Ok(ImageMeta {
            instrument: fields.get("INSTRUME").cloned(),
            wavelength: optional_f64(&fields, "WAVELNTH")?,
            hgln_obs,
            hglt_obs,
            dsun_obs: dsun_m / 1000.0,
            rsun_obs: optional_f64(&fields, "RSUN_OBS")?,
            date_obs,
        })
    }

    /// Read and parse a header file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ImageMeta, HeliovisError> {
        let header = std::fs::read_to_string(path)?;
        ImageMeta::parse(&header)
    }

    /// Build the imaging platform's [`Observer`] from this metadata.
    ///
    /// The observer's position comes from the heliographic fields and its
    /// timestamp is the image's native `DATE-OBS`.
    pub fn to_observer(&self) -> Result<Observer, HeliovisError> {
        Observer::from_heliographic(
            self.hgln_obs,
            self.hglt_obs,
            self.dsun_obs,
            self.date_obs,
            self.instrument.clone(),
        )
    }
}

/// Split header text into uppercase key → value pairs, dropping comments.
fn collect_cards(header: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for raw in header.lines() {
        let line = raw.trim();
        if line.is_empty()
            || line == "END"
            || line.starts_with("COMMENT")
            || line.starts_with("HISTORY")
        {
            continue;
        }

        let Some((key, rest)) = line.split_once('=') else {
            continue;
        };

        let value = strip_comment(rest).trim().trim_matches('\'').trim();
        fields.insert(key.trim().to_ascii_uppercase(), value.to_string());
    }

    fields
}

/// Cut the inline `/ comment` part of a card value, leaving quoted strings intact.
fn strip_comment(rest: &str) -> &str {
    let rest = rest.trim_start();

    if let Some(tail) = rest.strip_prefix('\'') {
        if let Some(end) = tail.find('\'') {
            return &rest[..end + 2];
        }
    }

    match rest.find('/') {
        Some(idx) => &rest[..idx],
        None => rest,
    }
}

fn required_f64(fields: &HashMap<String, String>, key: &str) -> Result<f64, HeliovisError> {
    let raw = fields
        .get(key)
        .ok_or_else(|| HeliovisError::MissingMetadataField(key.to_string()))?;

    raw.parse()
        .map_err(|_| HeliovisError::MalformedMetadataField {
            field: key.to_string(),
            value: raw.clone(),
        })
}

fn optional_f64(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<f64>, HeliovisError> {
    match fields.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| HeliovisError::MalformedMetadataField {
                field: key.to_string(),
                value: raw.clone(),
            }),
    }
}

#[cfg(test)]
mod image_meta_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::TimeScale;

    const AIA_HEADER: &str = "\
SIMPLE  =                    T
INSTRUME= 'AIA_3'             / instrument name
WAVELNTH=                  171
DATE-OBS= '2011-06-07T06:33:02.770'
HGLN_OBS=   0.0061588951843044
HGLT_OBS=   0.048591786971884
DSUN_OBS=   151846026489.04    / [m] distance to Sun center
RSUN_OBS=   945.44404641     / [arcsec] apparent solar radius
END";

    #[test]
    fn test_parse_full_header() {
        let meta = ImageMeta::parse(AIA_HEADER).unwrap();

        assert_eq!(meta.instrument, Some("AIA_3".to_string()));
        assert_eq!(meta.wavelength, Some(171.0));
        assert_eq!(meta.hgln_obs, 0.0061588951843044);
        assert_eq!(meta.hglt_obs, 0.048591786971884);
        assert_relative_eq!(meta.dsun_obs, 151_846_026.48904, max_relative = 1e-12);
        assert_eq!(meta.rsun_obs, Some(945.44404641));
        assert_eq!(
            meta.date_obs,
            Epoch::from_gregorian(2011, 6, 7, 6, 33, 2, 770_000_000, TimeScale::UTC)
        );
    }

    #[test]
    fn test_to_observer() {
        let meta = ImageMeta::parse(AIA_HEADER).unwrap();
        let observer = meta.to_observer().unwrap();

        assert_eq!(observer.name, Some("AIA_3".to_string()));
        assert_eq!(observer.epoch(), meta.date_obs);
        assert_relative_eq!(
            observer.distance_to_sun(),
            meta.dsun_obs,
            max_relative = 1e-12
        );

        let (lon, lat, _) = observer.heliographic();
        assert_relative_eq!(lon, meta.hgln_obs, epsilon = 1e-9);
        assert_relative_eq!(lat, meta.hglt_obs, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_distance_is_an_error() {
        let header = AIA_HEADER
            .lines()
            .filter(|line| !line.starts_with("DSUN_OBS"))
            .collect::<Vec<_>>()
            .join("\n");

        assert_eq!(
            ImageMeta::parse(&header),
            Err(HeliovisError::MissingMetadataField("DSUN_OBS".to_string()))
        );
    }

    #[test]
    fn test_malformed_field_is_an_error() {
        let header = AIA_HEADER.replace("151846026489.04", "not-a-number");
        let result = ImageMeta::parse(&header);

        assert_eq!(
            result,
            Err(HeliovisError::MalformedMetadataField {
                field: "DSUN_OBS".to_string(),
                value: "not-a-number".to_string(),
            })
        );
    }

    #[test]
    fn test_negative_distance_is_an_error() {
        let header = AIA_HEADER.replace("151846026489.04", "-1.0");
        assert!(matches!(
            ImageMeta::parse(&header),
            Err(HeliovisError::MalformedMetadataField { .. })
        ));
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let header = AIA_HEADER.replace("2011-06-07T06:33:02.770", "yesterday");
        assert_eq!(
            ImageMeta::parse(&header),
            Err(HeliovisError::MalformedTimestamp("yesterday".to_string()))
        );
    }
}
