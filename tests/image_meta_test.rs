use approx::assert_relative_eq;

use heliovis::constants::RSUN_KM;
use heliovis::heliovis_errors::HeliovisError;
use heliovis::observers::image_meta::ImageMeta;
use heliovis::ref_system::HelioprojPoint;
use heliovis::visibility::{check_mutual_visibility, VisibilityConfig};

// Header of a EUVI image taken from STEREO-A's vantage, about 104 degrees
// behind Earth in heliographic longitude at the time.
const EUVI_HEADER: &str = "\
INSTRUME= 'SECCHI'            / instrument
WAVELNTH=                  195
DATE-OBS= '2018-07-02T17:21:30.903'
HGLN_OBS=           -104.216
HGLT_OBS=               5.139
DSUN_OBS=     1.435627186e+11 / [m]
END";

const AIA_HEADER: &str = "\
INSTRUME= 'AIA_3'
WAVELNTH=                  171
DATE-OBS= '2018-07-02T17:21:00.350'
HGLN_OBS=   0.0
HGLT_OBS=   3.855
DSUN_OBS=   1.520943e+11      / [m]
END";

#[test]
fn header_observers_feed_the_visibility_query() {
    let aia = ImageMeta::parse(AIA_HEADER).unwrap().to_observer().unwrap();
    let euvi = ImageMeta::parse(EUVI_HEADER).unwrap().to_observer().unwrap();

    assert_relative_eq!(aia.distance_to_sun(), 1.520943e8, max_relative = 1e-12);

    // A disk-center feature for the Earth-side imager sits 104 degrees from
    // the other platform's sub-point, beyond the limb: occulted for it.
    let disk_center = HelioprojPoint::on_surface(0.0, 0.0);
    let report =
        check_mutual_visibility(&aia, &euvi, &disk_center, &VisibilityConfig::default());
    assert!(!report.visible);

    // An east-limb feature for the Earth-side imager faces the trailing
    // longitudes and is visible to the other platform.
    let east_limb = HelioprojPoint::on_surface(-850.0, 0.0);
    let report =
        check_mutual_visibility(&aia, &euvi, &east_limb, &VisibilityConfig::default());
    assert!(report.visible);
    // The two headers are ~30 seconds apart, within the default tolerance.
    assert_eq!(report.timestamp_skew, None);
}

#[test]
fn missing_distance_field_fails_instead_of_defaulting() {
    let without_distance = EUVI_HEADER
        .lines()
        .filter(|line| !line.starts_with("DSUN_OBS"))
        .collect::<Vec<_>>()
        .join("\n");

    let result = ImageMeta::parse(&without_distance);
    assert_eq!(
        result,
        Err(HeliovisError::MissingMetadataField("DSUN_OBS".to_string()))
    );
}

#[test]
fn header_observer_apparent_radius_matches_recorded_value() {
    let header = AIA_HEADER.replace("END", "RSUN_OBS=   943.5\nEND");
    let meta = ImageMeta::parse(&header).unwrap();
    let observer = meta.to_observer().unwrap();

    // The instrument-recorded apparent radius and the one recomputed from the
    // header distance agree to well under an arcsecond.
    let computed = observer.apparent_solar_radius(RSUN_KM);
    let recorded = meta.rsun_obs.unwrap();
    assert!((computed - recorded).abs() < 1.0);
}
