use std::f64::consts::PI;

use softvg::{ErrorKind, Path, Point, Transform, Verb};

#[test]
fn move_to_sets_both_points() {
    let mut path = Path::new();
    path.move_to(10.0, 20.0);

    assert_eq!(path.initial_point(), Some(Point::new(10.0, 20.0)));
    assert_eq!(path.current_point(), Some(Point::new(10.0, 20.0)));
    assert!(!path.is_empty());
}

#[test]
fn consecutive_identical_move_tos_collapse() {
    let mut path = Path::new();
    path.move_to(10.0, 20.0);
    path.move_to(10.0, 20.0);

    assert_eq!(path.verbs(), &[Verb::MoveTo(Point::new(10.0, 20.0))]);

    // A different point is a new node.
    path.move_to(11.0, 20.0);
    assert_eq!(path.verbs().len(), 2);
}

#[test]
fn close_appends_exactly_two_nodes() {
    let mut path = Path::new();
    path.move_to(10.0, 10.0);
    path.line_to(30.0, 10.0);
    path.line_to(20.0, 30.0);

    let before = path.verbs().len();
    path.close().unwrap();

    assert_eq!(path.verbs().len(), before + 2);
    assert_eq!(
        &path.verbs()[before..],
        &[Verb::Close, Verb::MoveTo(Point::new(10.0, 10.0))]
    );
}

#[test]
fn close_reprimes_at_initial_point() {
    let mut path = Path::new();
    path.move_to(10.0, 10.0);
    path.line_to(30.0, 10.0);
    path.line_to(20.0, 30.0);
    path.close().unwrap();

    assert!(path.is_closed());
    assert_eq!(path.current_point(), path.initial_point());
    assert_eq!(path.current_point(), Some(Point::new(10.0, 10.0)));
}

#[test]
fn close_without_current_point_is_a_no_op() {
    let mut path = Path::new();
    path.close().unwrap();

    assert!(path.is_empty());
    assert!(!path.is_closed());
}

#[test]
fn close_of_bare_move_to_is_legal() {
    let mut path = Path::new();
    path.move_to(5.0, 5.0);
    path.close().unwrap();

    assert!(path.is_closed());
    assert_eq!(path.current_point(), Some(Point::new(5.0, 5.0)));
}

#[test]
fn line_to_without_current_point_starts_a_subpath() {
    let mut path = Path::new();
    path.line_to(10.0, 10.0);

    assert_eq!(path.initial_point(), Some(Point::new(10.0, 10.0)));
    assert_eq!(path.current_point(), Some(Point::new(10.0, 10.0)));
}

#[test]
fn curve_to_requires_a_current_point() {
    let mut path = Path::new();

    assert!(matches!(
        path.curve_to(1.0, 1.0, 2.0, 2.0, 3.0, 3.0),
        Err(ErrorKind::NoCurrentPoint)
    ));

    path.move_to(0.0, 0.0);
    path.curve_to(1.0, 1.0, 2.0, 2.0, 3.0, 3.0).unwrap();

    assert_eq!(path.current_point(), Some(Point::new(3.0, 3.0)));
}

#[test]
fn relative_ops_require_a_current_point() {
    let mut path = Path::new();

    assert!(matches!(path.rel_move_to(1.0, 1.0), Err(ErrorKind::NoCurrentPoint)));
    assert!(matches!(path.rel_line_to(1.0, 1.0), Err(ErrorKind::NoCurrentPoint)));
    assert!(matches!(
        path.rel_curve_to(1.0, 1.0, 2.0, 2.0, 3.0, 3.0),
        Err(ErrorKind::NoCurrentPoint)
    ));
}

#[test]
fn relative_ops_offset_the_pen() {
    let mut path = Path::new();
    path.move_to(10.0, 10.0);
    path.rel_line_to(5.0, 0.0).unwrap();

    assert_eq!(path.current_point(), Some(Point::new(15.0, 10.0)));

    path.rel_move_to(0.0, 5.0).unwrap();
    assert_eq!(path.current_point(), Some(Point::new(15.0, 15.0)));
    assert_eq!(path.initial_point(), Some(Point::new(15.0, 15.0)));

    path.rel_curve_to(1.0, 0.0, 2.0, 0.0, 3.0, 0.0).unwrap();
    assert_eq!(path.current_point(), Some(Point::new(18.0, 15.0)));
}

#[test]
fn reset_clears_nodes_and_points() {
    let mut path = Path::new();
    path.move_to(1.0, 2.0);
    path.line_to(3.0, 4.0);
    path.reset();

    assert!(path.is_empty());
    assert_eq!(path.initial_point(), None);
    assert_eq!(path.current_point(), None);
}

#[test]
fn arc_ends_at_its_end_angle() {
    let mut path = Path::new();
    path.arc(10.0, 10.0, 5.0, 0.0, PI);

    let end = path.current_point().unwrap();
    assert!((end.x - 5.0).abs() < 1e-9);
    assert!((end.y - 10.0).abs() < 1e-9);
}

#[test]
fn arc_negative_sweeps_clockwise() {
    let mut path = Path::new();
    path.arc_negative(10.0, 10.0, 5.0, PI / 2.0, 0.0);

    let end = path.current_point().unwrap();
    assert!((end.x - 15.0).abs() < 1e-9);
    assert!((end.y - 10.0).abs() < 1e-9);
}

#[test]
fn arc_to_rounds_the_corner_between_two_legs() {
    let mut path = Path::new();

    assert!(matches!(
        path.arc_to(20.0, 10.0, 20.0, 20.0, 2.0),
        Err(ErrorKind::NoCurrentPoint)
    ));

    path.move_to(10.0, 10.0);
    path.arc_to(20.0, 10.0, 20.0, 20.0, 2.0).unwrap();

    // The pen lands on the second leg's tangent point.
    let end = path.current_point().unwrap();
    assert!((end.x - 20.0).abs() < 1e-9);
    assert!((end.y - 12.0).abs() < 1e-9);

    // Degenerate radius falls back to a straight line.
    let mut path = Path::new();
    path.move_to(10.0, 10.0);
    path.arc_to(20.0, 10.0, 20.0, 20.0, 0.0).unwrap();
    assert_eq!(path.current_point(), Some(Point::new(20.0, 10.0)));
}

#[test]
fn full_arc_closes_into_a_loop() {
    let mut path = Path::new();
    path.move_to(15.0, 10.0);
    path.arc(10.0, 10.0, 5.0, 0.0, 2.0 * PI);
    path.close().unwrap();

    assert!(path.is_closed());
}

#[test]
fn ingestion_applies_the_transform() {
    let mut path = Path::new();
    path.set_transform(Transform::translation(100.0, 0.0).scale(2.0, 2.0));
    path.move_to(5.0, 5.0);

    assert_eq!(path.current_point(), Some(Point::new(110.0, 10.0)));
}

#[test]
fn shape_helpers_close_their_subpaths() {
    let mut path = Path::new();
    path.rect(0.0, 0.0, 10.0, 10.0).unwrap();
    assert!(path.is_closed());

    let mut path = Path::new();
    path.circle(5.0, 5.0, 3.0).unwrap();
    assert!(path.is_closed());

    let mut path = Path::new();
    path.rounded_rect(0.0, 0.0, 20.0, 10.0, 3.0).unwrap();
    assert!(path.is_closed());

    let mut path = Path::new();
    path.move_to(0.0, 0.0);
    path.quad_to(5.0, 10.0, 10.0, 0.0).unwrap();
    path.close().unwrap();
    assert!(path.is_closed());
}
