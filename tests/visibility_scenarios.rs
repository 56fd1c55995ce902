use approx::assert_relative_eq;
use hifitime::Epoch;

use heliovis::constants::{AU_KM, RSUN_KM};
use heliovis::observers::Observer;
use heliovis::ref_system::{
    HelioprojFrame, HelioprojPoint, Projection, UndefinedReason,
};
use heliovis::visibility::{check_mutual_visibility, VisibilityConfig};

fn observer_at(lon: f64, lat: f64, distance_km: f64) -> Observer {
    let epoch = Epoch::from_mjd_utc(59215.0);
    Observer::from_heliographic(lon, lat, distance_km, epoch, None).unwrap()
}

#[test]
fn identity_transform_returns_original_coordinates() {
    let frame = HelioprojFrame::new(observer_at(0.0, 0.0, AU_KM));
    let point = HelioprojPoint::on_surface(100.0, 500.0);

    let result = frame.transform_to(&point, &frame, RSUN_KM);
    let (tx, ty, distance) = result.coords().expect("identity must be defined");

    assert_relative_eq!(tx, 100.0, max_relative = 1e-9);
    assert_relative_eq!(ty, 500.0, max_relative = 1e-9);

    // The assigned range is the near solar-surface intersection, so it is a
    // little less than the observer's Sun distance.
    assert!(distance < AU_KM && distance > AU_KM - 2.0 * RSUN_KM);
}

#[test]
fn round_trip_recovers_coordinates_when_both_legs_are_defined() {
    let frame_a = HelioprojFrame::new(observer_at(0.0, 0.0, AU_KM));
    let frame_b = HelioprojFrame::new(observer_at(30.0, 10.0, 0.7 * AU_KM));

    let point = HelioprojPoint::on_surface(300.0, 200.0);

    let forward = frame_a.transform_to(&point, &frame_b, RSUN_KM);
    let (tx_b, ty_b, dist_b) = forward.coords().expect("A to B must be defined");

    let back = frame_b.transform_to(
        &HelioprojPoint::with_distance(tx_b, ty_b, dist_b),
        &frame_a,
        RSUN_KM,
    );
    let (tx_a, ty_a, dist_a) = back.coords().expect("B to A must be defined");

    assert_relative_eq!(tx_a, 300.0, max_relative = 1e-9);
    assert_relative_eq!(ty_a, 200.0, max_relative = 1e-9);

    // And the recovered range matches the original surface intersection.
    let located = frame_a
        .to_heliocentric(&point, RSUN_KM)
        .expect("surface point must locate");
    let original_range = (located - frame_a.observer().position()).norm();
    assert_relative_eq!(dist_a, original_range, max_relative = 1e-9);
}

#[test]
fn near_identical_observers_agree_on_visibility() {
    // Scenario: two platforms a small angular and radial offset apart, same
    // epoch. A feature on-disk for one is on-disk for the other, with a small
    // bounded coordinate shift.
    let source = observer_at(0.0, 0.0, AU_KM);
    let target = observer_at(0.01, 0.005, AU_KM + 1000.0);

    let feature = HelioprojPoint::on_surface(100.0, 500.0);
    let report =
        check_mutual_visibility(&source, &target, &feature, &VisibilityConfig::default());

    assert!(report.visible);
    assert_eq!(report.timestamp_skew, None);

    let (tx, ty, _) = report.target_point.coords().expect("must be defined");
    assert!((tx - 100.0).abs() < 100.0, "tx moved too far: {tx}");
    assert!((ty - 500.0).abs() < 100.0, "ty moved too far: {ty}");
}

#[test]
fn antipodal_observer_cannot_see_disk_center_feature() {
    // Scenario: the target sits directly opposite the Sun from the source.
    // A feature near the source's disk center lies on the far hemisphere for
    // the target and must come back undefined, not as off-disk coordinates.
    let source = observer_at(0.0, 0.0, AU_KM);
    let target = observer_at(180.0, 0.0, AU_KM);

    let feature = HelioprojPoint::on_surface(0.0, 0.0);
    let report =
        check_mutual_visibility(&source, &target, &feature, &VisibilityConfig::default());

    assert!(!report.visible);
    assert_eq!(
        report.target_point.projection,
        Projection::Undefined(UndefinedReason::SunOcculted)
    );
}

#[test]
fn undefinedness_is_not_symmetric() {
    // Observers 90 degrees apart, B to the west of A. The same angular
    // coordinates describe, in each frame, a surface point near that
    // observer's west limb: A's west limb faces toward B, while B's west limb
    // faces away from A.
    let frame_a = HelioprojFrame::new(observer_at(0.0, 0.0, AU_KM));
    let frame_b = HelioprojFrame::new(observer_at(90.0, 0.0, AU_KM));

    let west_point = HelioprojPoint::on_surface(800.0, 0.0);

    let a_to_b = frame_a.transform_to(&west_point, &frame_b, RSUN_KM);
    assert!(a_to_b.is_defined());

    let b_to_a = frame_b.transform_to(&west_point, &frame_a, RSUN_KM);
    assert_eq!(
        b_to_a.projection,
        Projection::Undefined(UndefinedReason::SunOcculted)
    );
}

#[test]
fn far_side_point_with_explicit_height_stays_defined_but_off_disk() {
    // A feature well above the surface, behind the limb plane of the target
    // but clear of the sphere: the projection is mathematically defined, yet
    // the classifier must reject it as off-disk.
    let source = observer_at(0.0, 0.0, AU_KM);
    let target = observer_at(90.0, 0.0, AU_KM);

    let source_frame = HelioprojFrame::new(source.clone());
    let target_frame = HelioprojFrame::new(target.clone());

    // Straight toward disk center from the source, but stopping well in front
    // of the Sun: from the target this point is far off the east limb.
    let elevated = HelioprojPoint::with_distance(0.0, 0.0, AU_KM / 2.0);
    let result = source_frame.transform_to(&elevated, &target_frame, RSUN_KM);

    assert!(result.is_defined());

    let report =
        check_mutual_visibility(&source, &target, &elevated, &VisibilityConfig::default());
    assert!(!report.visible);
}

#[test]
fn transformed_surface_point_lands_on_the_sphere() {
    let frame_a = HelioprojFrame::new(observer_at(0.0, 0.0, AU_KM));
    let frame_b = HelioprojFrame::new(observer_at(45.0, -20.0, 0.9 * AU_KM));

    let point = HelioprojPoint::on_surface(-400.0, 150.0);
    let located = frame_a
        .to_heliocentric(&point, RSUN_KM)
        .expect("surface point must locate");

    assert_relative_eq!(located.norm(), RSUN_KM, max_relative = 1e-9);

    // Reprojecting from B and locating again with the explicit range lands on
    // the same heliocentric point.
    let in_b = frame_a.transform_to(&point, &frame_b, RSUN_KM);
    let (tx, ty, distance) = in_b.coords().expect("must be defined");
    let relocated = frame_b
        .to_heliocentric(&HelioprojPoint::with_distance(tx, ty, distance), RSUN_KM)
        .expect("explicit range always locates");

    assert_relative_eq!(
        (relocated - located).norm(),
        0.0,
        epsilon = 1e-3 // km
    );
}

#[test]
fn project_and_locate_are_inverse() {
    // Projecting an arbitrary heliocentric position into a frame and locating
    // it again from the same angular coordinates and range must come back to
    // the same point. Guards the frame axis conventions.
    let source = observer_at(0.0, 0.0, AU_KM);
    let other = observer_at(20.0, 5.0, 0.8 * AU_KM);

    let source_frame = HelioprojFrame::new(source);

    let (tx, ty, distance) = source_frame.project(&other.position());
    let as_point = HelioprojPoint::with_distance(tx, ty, distance);
    let located = source_frame
        .to_heliocentric(&as_point, RSUN_KM)
        .expect("explicit range always locates");

    assert_relative_eq!((located - other.position()).norm(), 0.0, epsilon = 1e-3);
}

#[test]
fn surface_location_is_independent_of_the_frame_pair() {
    // Locating a surface point uses only the source frame; the target frame
    // must not influence the heliocentric position.
    let frame_a = HelioprojFrame::new(observer_at(10.0, 3.0, AU_KM));
    let frame_b = HelioprojFrame::new(observer_at(60.0, -8.0, 0.6 * AU_KM));
    let frame_c = HelioprojFrame::new(observer_at(-30.0, 12.0, 1.2 * AU_KM));

    let point = HelioprojPoint::on_surface(250.0, -320.0);

    let via_b = frame_a.transform_to(&point, &frame_b, RSUN_KM);
    let via_c = frame_a.transform_to(&point, &frame_c, RSUN_KM);

    let (tx_b, ty_b, d_b) = via_b.coords().expect("must be defined");
    let (tx_c, ty_c, d_c) = via_c.coords().expect("must be defined");

    let from_b = frame_b
        .to_heliocentric(&HelioprojPoint::with_distance(tx_b, ty_b, d_b), RSUN_KM)
        .unwrap();
    let from_c = frame_c
        .to_heliocentric(&HelioprojPoint::with_distance(tx_c, ty_c, d_c), RSUN_KM)
        .unwrap();

    assert_relative_eq!((from_b - from_c).norm(), 0.0, epsilon = 1e-3);
}

#[test]
#[ignore = "requires network access to the JPL Horizons trajectory service"]
fn resolve_solar_orbiter_live() {
    use heliovis::heliovis::Heliovis;
    use heliovis::time::parse_obs_timestamp;

    let env = Heliovis::new();
    let epoch = parse_obs_timestamp("2022-03-30T12:00:00").unwrap();
    let observer = env.resolve_spacecraft("solar orbiter", epoch).unwrap();

    // Solar Orbiter stays between ~0.28 and ~1.1 AU from the Sun.
    let distance = observer.distance_to_sun();
    assert!(distance > 0.2 * AU_KM && distance < 1.2 * AU_KM);
}
