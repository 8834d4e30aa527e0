use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use softvg::{ErrorKind, Point, Transform};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

fn assert_pt_close(p: Point, x: f64, y: f64) {
    assert_close(p.x, x);
    assert_close(p.y, y);
}

#[test]
fn multiplication() {
    let mut a = Transform([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let b = Transform([7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

    a.multiply(&b);

    assert_eq!(a, Transform([25.0, 28.0, 57.0, 64.0, 40.0, 87.0]));
}

#[test]
fn premultiply() {
    let a = Transform([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let b = Transform([7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

    let mut premultiplied = a;
    premultiplied.premultiply(&b);

    let mut expected = b;
    expected.multiply(&a);

    assert_eq!(premultiplied, expected);
}

#[test]
fn identity_maps_points_unchanged() {
    let identity = Transform::identity();

    for &(x, y) in &[(0.0, 0.0), (1.5, -2.25), (1e9, -1e-9)] {
        let p = identity.user_to_device(Point::new(x, y));
        assert_eq!(p, Point::new(x, y));
    }
}

#[test]
fn chained_composition_applies_innermost_last() {
    let t = Transform::identity()
        .rotate(FRAC_PI_2)
        .scale(10.0, 10.0)
        .translate(10.0, 20.0);

    let p = t.user_to_device(Point::new(9.0, 0.0));

    assert_pt_close(p, -200.0, 190.0);
}

#[test]
fn determinants() {
    assert_close(Transform::identity().determinant(), 1.0);
    assert_close(Transform::scaling(3.0, -2.0).determinant(), -6.0);
    assert_close(Transform::rotation(FRAC_PI_3).determinant(), 1.0);
    assert_close(Transform::rotation(1.234).determinant(), 1.0);
}

#[test]
fn distance_mapping_ignores_translation() {
    let t = Transform::identity().translate(100.0, -50.0).rotate(0.7);

    let zero = t.user_to_device_distance(Point::new(0.0, 0.0));
    assert_eq!(zero, Point::new(0.0, 0.0));

    let d = Transform::translation(3.0, 4.0).user_to_device_distance(Point::new(1.0, 1.0));
    assert_eq!(d, Point::new(1.0, 1.0));
}

#[test]
fn inverse_round_trip() {
    let t = Transform::identity()
        .rotate(0.3)
        .scale(2.0, 5.0)
        .translate(-4.0, 9.0)
        .rotate(-1.1);

    let p = Point::new(12.5, -3.75);
    let there = t.user_to_device(p);
    let back = t.device_to_user(there).unwrap();

    assert_pt_close(back, p.x, p.y);

    let double = t.inverse().unwrap().inverse().unwrap();

    for i in 0..6 {
        assert_close(double[i], t[i]);
    }
}

#[test]
fn inverse_of_translation_is_exact() {
    let inv = Transform::translation(5.0, 7.0).inverse().unwrap();
    assert_eq!(inv, Transform::translation(-5.0, -7.0));
}

#[test]
fn inverse_of_scaling_is_exact() {
    let inv = Transform::scaling(2.0, 4.0).inverse().unwrap();
    assert_eq!(inv, Transform::scaling(0.5, 0.25));
}

#[test]
fn singular_matrices_fail_to_invert() {
    let zero = Transform([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert!(matches!(zero.inverse(), Err(ErrorKind::InvalidMatrix)));

    // Rank-deficient general matrix.
    let collinear = Transform([1.0, 2.0, 2.0, 4.0, 3.0, 1.0]);
    assert!(matches!(collinear.inverse(), Err(ErrorKind::InvalidMatrix)));

    // Axis-aligned with a zero scale.
    let flat = Transform([0.0, 0.0, 0.0, 5.0, 0.0, 0.0]);
    assert!(matches!(flat.inverse(), Err(ErrorKind::InvalidMatrix)));

    assert!(matches!(
        zero.device_to_user(Point::new(1.0, 1.0)),
        Err(ErrorKind::InvalidMatrix)
    ));
    assert!(matches!(
        zero.device_to_user_distance(Point::new(1.0, 1.0)),
        Err(ErrorKind::InvalidMatrix)
    ));
}

#[test]
fn rotation_drift_stays_within_rounding() {
    // A full turn of chained small rotations lands back on the start within
    // f64 rounding.
    let mut t = Transform::identity();

    for _ in 0..360 {
        t = t.rotate(PI / 180.0);
    }

    let p = t.user_to_device(Point::new(1000.0, 0.0));

    assert!((p.x - 1000.0).abs() < 1e-6);
    assert!(p.y.abs() < 1e-6);
}

#[test]
fn cache_key_tracks_value_identity() {
    let a = Transform::identity().rotate(0.5).translate(1.0, 2.0);
    let b = Transform::identity().rotate(0.5).translate(1.0, 2.0);
    let c = Transform::identity().rotate(0.5).translate(1.0, 3.0);

    assert_eq!(a.cache_key(), b.cache_key());
    assert_ne!(a.cache_key(), c.cache_key());
}
