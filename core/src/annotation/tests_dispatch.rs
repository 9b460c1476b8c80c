
use crate::annotation::{
    classify, classify_and_build, construct, AngleGeometry, AnnotationError, ConstructionCase,
    DimensionKind, LengthGeometry, MeasurementGeometry, Operands,
};
use crate::geometry::{ApproxEq, Plane, Point3, Vector3};
use crate::topo::{CurveGeometry, Shape, ShapeGeometry, ShapeKind, SurfaceGeometry};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn plane_at(z: f64, normal: Vector3) -> Shape {
    Shape::planar_face(p(0.0, 0.0, z), normal)
}

fn cylinder(origin: Point3, dir: Vector3) -> Shape {
    Shape::cylindrical_face(origin, dir, 2.0)
}

fn length(first: &Shape, second: &Shape) -> Result<MeasurementGeometry, AnnotationError> {
    classify_and_build(first, Some(second), DimensionKind::Length, None)
}

fn value_of(result: Result<MeasurementGeometry, AnnotationError>) -> f64 {
    result.expect("dimension should build").value()
}

#[test]
fn test_parallel_planes_distance_is_symmetric() {
    let bottom = plane_at(0.0, Vector3::z());
    let top = plane_at(7.5, -Vector3::z());

    assert_eq!(
        classify(&bottom, Some(&top), DimensionKind::Length),
        Ok(ConstructionCase::PlanePlane)
    );
    let forward = value_of(length(&bottom, &top));
    let reverse = value_of(length(&top, &bottom));
    assert!(forward.approx_eq(&7.5));
    assert!(reverse.approx_eq(&forward));
}

#[test]
fn test_plane_pairs_rejected() {
    let bottom = plane_at(0.0, Vector3::z());
    let same = Shape::planar_face(p(4.0, -2.0, 0.0), -Vector3::z());
    let tilted = Shape::planar_face(p(0.0, 0.0, 3.0), Vector3::new(0.0, 1.0, 1.0));

    assert_eq!(length(&bottom, &same), Err(AnnotationError::degenerate("two planes coincide")));
    assert_eq!(length(&bottom, &tilted), Err(AnnotationError::violated("planes not parallel")));
}

#[test]
fn test_coincident_axes_rejected_for_every_kind() {
    let a = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    // Same rotation axis, different origin and sense.
    let b = Shape::face(SurfaceGeometry::Cone {
        apex: p(0.0, 0.0, 10.0),
        axis_dir: -Vector3::z(),
        half_angle: 0.4,
    });

    for kind in DimensionKind::ALL {
        let expected = Err(AnnotationError::degenerate("two axes coincide"));
        assert_eq!(classify(&a, Some(&b), kind).map(|_| ()), expected.clone(), "{}", kind);
        assert_eq!(classify_and_build(&a, Some(&b), kind, None).map(|_| ()), expected, "{}", kind);
    }
}

#[test]
fn test_parallel_axes_distance() {
    let a = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    let b = cylinder(p(10.0, 0.0, 5.0), Vector3::z());

    let dimension = construct(&a, Some(&b), DimensionKind::Length, None).expect("builds");
    assert_eq!(dimension.case, ConstructionCase::AxisAxis);
    match dimension.geometry {
        MeasurementGeometry::Length(LengthGeometry::Points { first, second, plane }) => {
            assert!(first.approx_eq(&p(0.0, 0.0, 0.0)));
            assert!(second.approx_eq(&p(10.0, 0.0, 0.0)));
            assert!(plane.contains_point(&first));
            assert!(plane.contains_point(&second));
            assert!(plane.normal.dot(&Vector3::z()).approx_eq(&0.0));
        }
        other => panic!("expected point pair, got {:?}", other),
    }
    assert!(dimension.value().approx_eq(&10.0));
}

#[test]
fn test_axis_pair_constraints() {
    let z_axis = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    let crossing = cylinder(p(0.0, 0.0, 3.0), Vector3::x());
    let skew = cylinder(p(0.0, 5.0, 3.0), Vector3::x());

    assert_eq!(length(&z_axis, &crossing), Err(AnnotationError::degenerate("two axes intersect")));
    assert_eq!(length(&z_axis, &skew), Err(AnnotationError::violated("axes not parallel")));
}

#[test]
fn test_swapped_axes_keep_distance_but_not_anchors() {
    let a = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    let b = cylinder(p(6.0, 8.0, 1.0), Vector3::z());

    let forward = length(&a, &b).expect("builds");
    let reverse = length(&b, &a).expect("builds");
    assert!(forward.value().approx_eq(&10.0));
    assert!(reverse.value().approx_eq(&10.0));

    match (forward, reverse) {
        (
            MeasurementGeometry::Length(LengthGeometry::Points { first: f1, .. }),
            MeasurementGeometry::Length(LengthGeometry::Points { first: r1, .. }),
        ) => assert!(!f1.approx_eq(&r1)),
        other => panic!("expected point pairs, got {:?}", other),
    }
}

#[test]
fn test_plane_and_axis() {
    let floor = plane_at(0.0, Vector3::z());
    let lying = cylinder(p(0.0, 0.0, 4.0), Vector3::x());

    assert_eq!(classify(&floor, Some(&lying), DimensionKind::Length), Ok(ConstructionCase::PlaneAxis));
    assert_eq!(classify(&lying, Some(&floor), DimensionKind::Length), Ok(ConstructionCase::AxisPlane));
    assert!(value_of(length(&floor, &lying)).approx_eq(&4.0));
    assert!(value_of(length(&lying, &floor)).approx_eq(&4.0));

    let standing = cylinder(p(0.0, 0.0, 4.0), Vector3::z());
    assert_eq!(
        length(&floor, &standing),
        Err(AnnotationError::violated("axis not parallel to the plane"))
    );

    let embedded = cylinder(p(0.0, 3.0, 0.0), Vector3::y());
    assert_eq!(length(&embedded, &floor), Err(AnnotationError::degenerate("axis lies on the plane")));
}

#[test]
fn test_plane_and_line_in_both_orders() {
    let floor = plane_at(0.0, Vector3::z());
    let rail = Shape::line_edge(p(0.0, 0.0, 3.0), p(5.0, 5.0, 3.0));

    assert_eq!(
        classify(&floor, Some(&rail), DimensionKind::Length),
        Ok(ConstructionCase::PlaneLine(Operands::Forward))
    );
    assert_eq!(
        classify(&rail, Some(&floor), DimensionKind::Length),
        Ok(ConstructionCase::PlaneLine(Operands::Swapped))
    );
    assert!(value_of(length(&floor, &rail)).approx_eq(&3.0));
    assert!(value_of(length(&rail, &floor)).approx_eq(&3.0));

    let on_floor = Shape::line_edge(p(0.0, 0.0, 0.0), p(5.0, 0.0, 0.0));
    assert_eq!(length(&floor, &on_floor), Err(AnnotationError::degenerate("line lies on the plane")));
}

#[test]
fn test_plane_and_circle() {
    let floor = plane_at(0.0, Vector3::z());
    let ring = Shape::circle_edge(p(0.0, 0.0, 6.0), Vector3::z(), 2.0);

    let geometry = length(&floor, &ring).expect("builds");
    match geometry {
        MeasurementGeometry::Length(LengthGeometry::Points { first, second, .. }) => {
            assert!(first.approx_eq(&p(0.0, 0.0, 0.0)));
            assert!(second.approx_eq(&p(0.0, 0.0, 6.0)));
        }
        other => panic!("expected point pair, got {:?}", other),
    }
    assert!(value_of(length(&ring, &floor)).approx_eq(&6.0));

    let ellipse = Shape::edge(
        CurveGeometry::Ellipse { center: p(0.0, 0.0, 3.0), normal: Vector3::z(), major_radius: 4.0, minor_radius: 2.0 },
        p(4.0, 0.0, 3.0),
        p(4.0, 0.0, 3.0),
    );
    assert!(value_of(length(&floor, &ellipse)).approx_eq(&3.0));

    let skewed = Shape::circle_edge(p(0.0, 0.0, 6.0), Vector3::new(0.0, 1.0, 1.0), 2.0);
    assert_eq!(
        length(&floor, &skewed),
        Err(AnnotationError::violated("plane and arc neither parallel nor perpendicular"))
    );

    assert_eq!(classify(&ellipse, Some(&floor), DimensionKind::Length), Ok(ConstructionCase::PlaneCircle(Operands::Swapped)));
    assert!(value_of(length(&ellipse, &floor)).approx_eq(&3.0));

    // Ring standing upright: its seam lies straight above the foot point.
    let upright = Shape::circle_edge(p(0.0, 0.0, 5.0), Vector3::x(), 2.0);
    let geometry = length(&floor, &upright).expect("builds");
    match geometry {
        MeasurementGeometry::Length(LengthGeometry::Points { first, second, plane }) => {
            assert!(first.approx_eq(&p(0.0, 0.0, 0.0)));
            assert!(second.approx_eq(&p(0.0, 0.0, 5.0)));
            assert!(plane.normal.dot(&Vector3::x()).approx_eq(&0.0));
        }
        other => panic!("expected point pair, got {:?}", other),
    }
    assert!(value_of(length(&upright, &floor)).approx_eq(&5.0));

    let on_floor = Shape::circle_edge(p(1.0, 1.0, 0.0), Vector3::z(), 2.0);
    assert_eq!(length(&floor, &on_floor), Err(AnnotationError::degenerate("arc centre lies on the plane")));
}

#[test]
fn test_axis_and_edges() {
    let shaft = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    let rail = Shape::line_edge(p(3.0, 0.0, 0.0), p(3.0, 0.0, 8.0));
    let ring = Shape::circle_edge(p(5.0, 0.0, 2.0), Vector3::z(), 1.0);

    assert!(value_of(length(&shaft, &rail)).approx_eq(&3.0));
    assert!(value_of(length(&rail, &shaft)).approx_eq(&3.0));

    let geometry = length(&shaft, &ring).expect("builds");
    match geometry {
        MeasurementGeometry::Length(LengthGeometry::Points { first, second, .. }) => {
            assert!(first.approx_eq(&p(5.0, 0.0, 2.0)));
            assert!(second.approx_eq(&p(0.0, 0.0, 2.0)));
        }
        other => panic!("expected point pair, got {:?}", other),
    }

    assert_eq!(classify(&ring, Some(&shaft), DimensionKind::Length), Ok(ConstructionCase::AxisCircle(Operands::Swapped)));
    let swapped = length(&ring, &shaft).expect("builds");
    assert_eq!(swapped, geometry);

    let ellipse = Shape::edge(
        CurveGeometry::Ellipse { center: p(5.0, 0.0, 2.0), normal: Vector3::z(), major_radius: 2.0, minor_radius: 1.0 },
        p(7.0, 0.0, 2.0),
        p(7.0, 0.0, 2.0),
    );
    assert_eq!(classify(&ellipse, Some(&shaft), DimensionKind::Length), Ok(ConstructionCase::AxisCircle(Operands::Swapped)));
    assert!(value_of(length(&ellipse, &shaft)).approx_eq(&5.0));
    assert!(value_of(length(&shaft, &ellipse)).approx_eq(&5.0));

    let tilted = Shape::line_edge(p(3.0, 0.0, 0.0), p(3.0, 4.0, 8.0));
    assert_eq!(length(&shaft, &tilted), Err(AnnotationError::violated("line and axis not parallel")));

    let on_axis = Shape::line_edge(p(0.0, 0.0, 2.0), p(0.0, 0.0, 9.0));
    assert_eq!(length(&on_axis, &shaft), Err(AnnotationError::degenerate("line and axis coincide")));
}

#[test]
fn test_edge_pairs() {
    let lower = Shape::line_edge(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
    let upper = Shape::line_edge(p(0.0, 4.0, 0.0), p(10.0, 4.0, 0.0));

    let geometry = length(&lower, &upper).expect("builds");
    match geometry {
        MeasurementGeometry::Length(LengthGeometry::Points { first, second, plane }) => {
            assert!(first.approx_eq(&p(0.0, 0.0, 0.0)));
            assert!(second.approx_eq(&p(0.0, 4.0, 0.0)));
            assert!(plane.normal.approx_eq(&Vector3::z()));
        }
        other => panic!("expected point pair, got {:?}", other),
    }

    let crossing = Shape::line_edge(p(5.0, -5.0, 0.0), p(5.0, 5.0, 0.0));
    assert_eq!(length(&lower, &crossing), Err(AnnotationError::degenerate("two lines intersect")));
    let skew = Shape::line_edge(p(5.0, -5.0, 2.0), p(5.0, 5.0, 2.0));
    assert_eq!(length(&lower, &skew), Err(AnnotationError::violated("two lines not parallel")));

    let ring = Shape::circle_edge(p(5.0, 6.0, 0.0), Vector3::z(), 1.0);
    assert_eq!(classify(&lower, Some(&ring), DimensionKind::Length), Ok(ConstructionCase::LineCircle));
    assert_eq!(classify(&ring, Some(&lower), DimensionKind::Length), Ok(ConstructionCase::CircleLine));
    assert!(value_of(length(&lower, &ring)).approx_eq(&6.0));
    assert!(value_of(length(&ring, &lower)).approx_eq(&6.0));

    let near = Shape::circle_edge(p(0.0, 0.0, 0.0), Vector3::z(), 1.0);
    let far = Shape::circle_edge(p(8.0, 0.0, 3.0), Vector3::z(), 2.0);
    assert_eq!(classify(&near, Some(&far), DimensionKind::Length), Ok(ConstructionCase::CircleCircle));
    assert!(value_of(length(&near, &far)).approx_eq(&8.0));

    let stacked = Shape::circle_edge(p(0.0, 0.0, 5.0), Vector3::z(), 3.0);
    assert_eq!(length(&near, &stacked), Err(AnnotationError::degenerate("two arc axes coincide")));
}

#[test]
fn test_edge_span_needs_perpendicular_placement() {
    let edge = Shape::line_edge(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
    let top = Plane::new(p(0.0, 0.0, 20.0), Vector3::z());

    let dimension = construct(&edge, None, DimensionKind::Length, Some(&top)).expect("builds");
    assert_eq!(dimension.case, ConstructionCase::EdgeSpan);
    match dimension.geometry {
        MeasurementGeometry::Length(LengthGeometry::Span { plane, .. }) => {
            assert!(plane.normal.approx_eq(&-Vector3::z()));
        }
        other => panic!("expected span, got {:?}", other),
    }
    assert!(dimension.value().approx_eq(&10.0));

    let side = Plane::new(p(0.0, 0.0, 0.0), Vector3::x());
    assert_eq!(
        classify_and_build(&edge, None, DimensionKind::Length, Some(&side)),
        Err(AnnotationError::violated("placement normal not perpendicular to edge"))
    );
    assert!(matches!(
        classify_and_build(&edge, None, DimensionKind::Length, None),
        Err(AnnotationError::UnsupportedSelection(_))
    ));
}

#[test]
fn test_diameter_and_radius_of_circle() {
    let ring = Shape::circle_edge(p(1.0, 2.0, 3.0), Vector3::new(1.0, 1.0, 0.0), 4.0);

    let diameter = construct(&ring, None, DimensionKind::Diameter, None).expect("diameter");
    let radius = construct(&ring, None, DimensionKind::Radius, None).expect("radius");
    assert_eq!(diameter.case, ConstructionCase::Diameter);
    assert!(diameter.value().approx_eq(&8.0));
    assert!(radius.value().approx_eq(&4.0));

    let rail = Shape::line_edge(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
    assert_eq!(
        classify_and_build(&rail, None, DimensionKind::Radius, None),
        Err(AnnotationError::unsupported("unsupported selection type"))
    );
}

#[test]
fn test_angle_between_lines() {
    let theta = 0.6_f64;
    let a = Shape::line_edge(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
    let b = Shape::line_edge(p(0.0, 0.0, 0.0), p(10.0 * theta.cos(), 10.0 * theta.sin(), 0.0));

    let forward = construct(&a, Some(&b), DimensionKind::Angle, None).expect("angle");
    let reverse = construct(&b, Some(&a), DimensionKind::Angle, None).expect("angle");
    assert_eq!(forward.case, ConstructionCase::AngleLines);
    assert!(forward.value().approx_eq(&theta));
    assert!(reverse.value().approx_eq(&theta));

    match forward.geometry {
        MeasurementGeometry::Angle(AngleGeometry::Lines { vertex, .. }) => {
            assert!(vertex.approx_eq(&p(0.0, 0.0, 0.0)));
        }
        other => panic!("expected line angle, got {:?}", other),
    }
}

#[test]
fn test_parallel_lines_have_no_angle() {
    let a = Shape::line_edge(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0));
    let b = Shape::line_edge(p(0.0, 3.0, 1.0), p(-4.0, 3.0, 1.0));

    assert_eq!(
        classify_and_build(&a, Some(&b), DimensionKind::Angle, None),
        Err(AnnotationError::violated("two lines are parallel"))
    );
}

#[test]
fn test_angle_between_planes() {
    let floor = plane_at(0.0, Vector3::z());
    let ramp = Shape::planar_face(p(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 1.0));
    let ceiling = plane_at(9.0, -Vector3::z());

    let angle = classify_and_build(&floor, Some(&ramp), DimensionKind::Angle, None).expect("angle");
    assert!(angle.value().approx_eq(&FRAC_PI_4));
    assert_eq!(
        classify_and_build(&floor, Some(&ceiling), DimensionKind::Angle, None),
        Err(AnnotationError::violated("two planes are parallel"))
    );
}

#[test]
fn test_angle_between_axis_and_line() {
    let shaft = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    let strut = Shape::line_edge(p(-5.0, 0.0, 5.0), p(5.0, 0.0, 5.0));

    assert_eq!(
        classify(&strut, Some(&shaft), DimensionKind::Angle),
        Ok(ConstructionCase::AngleAxisLine(Operands::Swapped))
    );
    let forward = classify_and_build(&shaft, Some(&strut), DimensionKind::Angle, None).expect("angle");
    let reverse = classify_and_build(&strut, Some(&shaft), DimensionKind::Angle, None).expect("angle");
    assert!(forward.value().approx_eq(&FRAC_PI_2));
    assert!(reverse.value().approx_eq(&FRAC_PI_2));

    let skew = Shape::line_edge(p(-5.0, 1.0, 5.0), p(5.0, 1.0, 5.0));
    assert_eq!(
        classify_and_build(&shaft, Some(&skew), DimensionKind::Angle, None),
        Err(AnnotationError::violated("line and axis are skew"))
    );

    let through_origin = Shape::line_edge(p(-5.0, 0.0, 0.0), p(5.0, 0.0, 0.0));
    assert_eq!(
        classify_and_build(&shaft, Some(&through_origin), DimensionKind::Angle, None),
        Err(AnnotationError::degenerate("axis location lies on the edge"))
    );
}

#[test]
fn test_angle_between_revolved_faces_unsupported() {
    let a = cylinder(p(0.0, 0.0, 0.0), Vector3::z());
    let b = cylinder(p(10.0, 0.0, 0.0), Vector3::x());

    assert_eq!(classify(&a, Some(&b), DimensionKind::Angle), Ok(ConstructionCase::AngleAxes));
    assert!(matches!(
        classify_and_build(&a, Some(&b), DimensionKind::Angle, None),
        Err(AnnotationError::UnsupportedSelection(_))
    ));
}

#[test]
fn test_unsupported_shapes() {
    let vertex = Shape::new(ShapeKind::Vertex, ShapeGeometry::None);
    let freeform = Shape::face(SurfaceGeometry::Freeform);
    let floor = plane_at(0.0, Vector3::z());

    for (first, second) in [(&vertex, &floor), (&floor, &freeform), (&freeform, &vertex)] {
        let err = classify(first, Some(second), DimensionKind::Length).expect_err("rejected");
        assert_eq!(err.code(), "UNSUPPORTED_SELECTION");
        assert_eq!(err.to_string(), "unsupported selection type");
    }
}

#[test]
fn test_construction_is_idempotent() {
    let a = cylinder(p(1.0, 2.0, 0.0), Vector3::new(0.0, 0.0, 2.0));
    let b = Shape::circle_edge(p(7.0, -1.0, 4.0), Vector3::z(), 1.5);

    let first = construct(&a, Some(&b), DimensionKind::Length, None).expect("builds");
    let second = construct(&a, Some(&b), DimensionKind::Length, None).expect("builds");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn test_case_selection_is_deterministic() {
    let shapes = vec![
        plane_at(0.0, Vector3::z()),
        plane_at(5.0, Vector3::z()),
        cylinder(p(3.0, 0.0, 0.0), Vector3::z()),
        cylinder(p(0.0, 0.0, 8.0), Vector3::x()),
        Shape::line_edge(p(0.0, 1.0, 2.0), p(4.0, 1.0, 2.0)),
        Shape::circle_edge(p(2.0, 2.0, 2.0), Vector3::z(), 1.0),
        Shape::face(SurfaceGeometry::Freeform),
    ];

    for kind in DimensionKind::ALL {
        for a in &shapes {
            for b in shapes.iter().map(Some).chain([None]) {
                let once = classify(a, b, kind);
                let again = classify(a, b, kind);
                assert_eq!(once, again);
                if let Ok(case) = once {
                    assert_eq!(case.kind(), kind);
                }
            }
        }
    }
}
