use crate::annotation::{
    datum_placement, solve_placement, span_label_frame, tolerance_placement, AnnotationError,
    PlacementConfig,
};
use crate::geometry::{dist, Aabb, ApproxEq, Point3, Vector3};
use crate::topo::{Shape, SurfaceGeometry};

fn cube() -> Aabb {
    Aabb::new(Point3::new(-50.0, -50.0, -50.0), Point3::new(50.0, 50.0, 50.0))
}

#[test]
fn test_target_clears_border_by_twenty_percent() {
    let cfg = PlacementConfig::default();
    let touch = Point3::new(10.0, 0.0, 0.0);

    let target = solve_placement(&touch, &Vector3::x(), &cube(), &cfg).expect("placed");
    assert!(dist(&touch, &target).approx_eq(&48.0));
    assert!(target.approx_eq(&Point3::new(58.0, 0.0, 0.0)));

    // Direction length does not matter.
    let scaled = solve_placement(&touch, &(Vector3::x() * 3.0), &cube(), &cfg).expect("placed");
    assert!(scaled.approx_eq(&target));
}

#[test]
fn test_offset_floor_near_border() {
    let cfg = PlacementConfig::default();
    let touch = Point3::new(45.0, 0.0, 0.0);

    let target = solve_placement(&touch, &Vector3::x(), &cube(), &cfg).expect("placed");
    assert!(dist(&touch, &target).approx_eq(&18.0));

    let on_face = Point3::new(0.0, 0.0, 50.0);
    let target = solve_placement(&on_face, &Vector3::z(), &cube(), &cfg).expect("placed");
    assert!(target.approx_eq(&Point3::new(0.0, 0.0, 68.0)));
}

#[test]
fn test_touch_just_outside_a_face() {
    let cfg = PlacementConfig::default();
    let noisy = Point3::new(0.0, 0.0, 50.0 + 1e-9);

    let target = solve_placement(&noisy, &Vector3::z(), &cube(), &cfg).expect("placed");
    assert!(target.approx_eq(&Point3::new(0.0, 0.0, 68.0)));

    let top = Shape::planar_face(Point3::new(0.0, 0.0, 50.0), Vector3::z());
    let touch = Point3::new(3.0, 4.0, 50.0 + 1e-9);
    let label = tolerance_placement(&top, &touch, &cube(), &cfg).expect("placed");
    assert!(label.frame.origin.approx_eq(&Point3::new(3.0, 4.0, 68.0)));

    let side = Point3::new(50.0 + 1e-9, 0.0, 0.0);
    let target = solve_placement(&side, &Vector3::z(), &cube(), &cfg).expect("placed");
    assert!(target.approx_eq(&Point3::new(50.0 + 1e-9, 0.0, 60.0)));
}

#[test]
fn test_config_validation() {
    assert!(PlacementConfig::default().validate().is_ok());

    let flat = PlacementConfig { clearance: 0.0, ..Default::default() };
    assert!(flat.validate().is_err());
    let inward = PlacementConfig { min_offset: -1.0, ..Default::default() };
    assert!(inward.validate().is_err());
    let unset = PlacementConfig { max_ray_length: f64::NAN, ..Default::default() };
    assert!(unset.validate().is_err());
}

#[test]
fn test_custom_config() {
    let cfg = PlacementConfig { min_offset: 20.0, clearance: 1.5, ..Default::default() };
    let touch = Point3::new(45.0, 0.0, 0.0);

    let target = solve_placement(&touch, &Vector3::x(), &cube(), &cfg).expect("placed");
    assert!(target.approx_eq(&Point3::new(75.0, 0.0, 0.0)));

    let parsed: PlacementConfig = serde_json::from_str(r#"{"clearance": 2.0}"#).expect("parses");
    assert!(parsed.min_offset.approx_eq(&15.0));
    assert!(parsed.clearance.approx_eq(&2.0));
}

#[test]
fn test_indeterminate_placements() {
    let cfg = PlacementConfig::default();
    let outside = Point3::new(80.0, 0.0, 0.0);

    let missed = solve_placement(&outside, &Vector3::x(), &cube(), &cfg);
    assert!(matches!(missed, Err(AnnotationError::PlacementIndeterminate(_))));

    let sideways = solve_placement(&outside, &Vector3::y(), &cube(), &cfg);
    assert!(matches!(sideways, Err(AnnotationError::PlacementIndeterminate(_))));

    let empty = solve_placement(&Point3::origin(), &Vector3::x(), &Aabb::empty(), &cfg);
    assert_eq!(empty, Err(AnnotationError::indeterminate("model bounds are empty")));

    let still = solve_placement(&Point3::origin(), &Vector3::zeros(), &cube(), &cfg);
    assert_eq!(still.map_err(|e| e.code()), Err("PLACEMENT_INDETERMINATE"));
}

#[test]
fn test_span_label_frame() {
    let cfg = PlacementConfig::default();
    let start = Point3::new(0.0, 0.0, 0.0);
    let end = Point3::new(10.0, 0.0, 0.0);

    let label = span_label_frame(&start, &end, &-Vector3::z(), &cube(), &cfg).expect("placed");
    assert!(label.attach.approx_eq(&Point3::new(5.0, 0.0, 0.0)));
    assert!(label.frame.origin.approx_eq(&Point3::new(5.0, 0.0, -60.0)));
    assert!(label.frame.z_dir.approx_eq(&-Vector3::z()));
    assert!(label.frame.x_dir.approx_eq(&Vector3::x()));
}

#[test]
fn test_datum_on_planar_face() {
    let cfg = PlacementConfig::default();
    let top = Shape::planar_face(Point3::new(0.0, 0.0, 50.0), Vector3::z());
    let touch = Point3::new(10.0, 0.0, 50.0);

    let label = datum_placement(&top, &touch, &Vector3::y(), 8.0, &cube(), &cfg).expect("placed");
    assert!(label.attach.approx_eq(&touch));
    // Shifted half the label width against the reading direction.
    assert!(label.frame.origin.approx_eq(&Point3::new(14.0, 0.0, 68.0)));
    assert!(label.frame.x_dir.approx_eq(&-Vector3::x()));
    assert!(label.frame.z_dir.approx_eq(&Vector3::y()));
}

#[test]
fn test_datum_anchors() {
    let cfg = PlacementConfig::default();

    let shaft = Shape::cylindrical_face(Point3::origin(), Vector3::z(), 10.0);
    let label = datum_placement(&shaft, &Point3::new(10.0, 0.0, 5.0), &Vector3::x(), 0.0, &cube(), &cfg)
        .expect("placed");
    assert!(label.attach.approx_eq(&Point3::new(0.0, 0.0, 5.0)));
    assert!(label.frame.origin.approx_eq(&Point3::new(0.0, 0.0, 59.0)));
    assert!(label.frame.x_dir.approx_eq(&Vector3::y()));

    let ring = Shape::circle_edge(Point3::new(0.0, 0.0, 20.0), Vector3::z(), 5.0);
    let label = datum_placement(&ring, &Point3::new(5.0, 0.0, 20.0), &Vector3::x(), 0.0, &cube(), &cfg)
        .expect("placed");
    assert!(label.attach.approx_eq(&Point3::new(0.0, 0.0, 20.0)));

    let edge = Shape::line_edge(Point3::origin(), Point3::new(0.0, 10.0, 0.0));
    let label = datum_placement(&edge, &Point3::new(0.0, 3.0, 0.0), &Vector3::z(), 0.0, &cube(), &cfg)
        .expect("placed");
    assert!(label.attach.approx_eq(&Point3::new(0.0, 10.0, 0.0)));
    assert!(label.frame.origin.approx_eq(&Point3::new(0.0, 58.0, 0.0)));
}

#[test]
fn test_datum_rejections() {
    let cfg = PlacementConfig::default();
    let top = Shape::planar_face(Point3::new(0.0, 0.0, 50.0), Vector3::z());
    let touch = Point3::new(0.0, 0.0, 50.0);

    assert_eq!(
        datum_placement(&top, &touch, &Vector3::z(), 8.0, &cube(), &cfg),
        Err(AnnotationError::violated("placement normal is parallel to the datum direction"))
    );
    assert_eq!(
        datum_placement(&top, &touch, &Vector3::new(0.0, 1.0, 1.0), 8.0, &cube(), &cfg),
        Err(AnnotationError::violated("placement normal not perpendicular to the datum direction"))
    );

    let freeform = Shape::face(SurfaceGeometry::Freeform);
    assert_eq!(
        datum_placement(&freeform, &touch, &Vector3::y(), 8.0, &cube(), &cfg),
        Err(AnnotationError::unsupported("selected shape cannot be a datum"))
    );
}

#[test]
fn test_tolerance_frame_faces_out_of_the_model() {
    let cfg = PlacementConfig::default();
    let side = Shape::planar_face(Point3::new(50.0, 0.0, 0.0), Vector3::x());
    let touch = Point3::new(50.0, 10.0, 10.0);

    let label = tolerance_placement(&side, &touch, &cube(), &cfg).expect("placed");
    assert!(label.attach.approx_eq(&touch));
    assert!(label.frame.origin.approx_eq(&Point3::new(68.0, 10.0, 10.0)));
    assert!(label.frame.z_dir.approx_eq(&Vector3::x()));
    assert!(label.frame.x_dir.dot(&Vector3::x()).approx_eq(&0.0));
}
