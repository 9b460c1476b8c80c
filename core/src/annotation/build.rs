//! Reference geometry for each construction case.
//!
//! Every builder checks its preconditions in a fixed order (touching or
//! coincident elements first, then parallelism or perpendicularity) and
//! returns on the first failure. Nothing is built for a rejected selection.

use super::cases::{ConstructionCase, Operands};
use super::types::{AngleGeometry, LengthGeometry, MeasurementGeometry};
use super::validity::{
    are_parallel, are_perpendicular, ensure_parallel, ensure_perpendicular,
    plane_line_below_epsilon, planes_coincident, reject_touching,
};
use super::{AnnotationError, AnnotationResult, Operand};
use crate::geometry::utils_3d::points_collinear;
use crate::geometry::{unit, Axis, Circle3, Line3, Plane, Point3, Vector3, EPSILON};

pub fn build(
    case: ConstructionCase,
    a: &Operand,
    b: Option<&Operand>,
    placement: Option<&Plane>,
) -> AnnotationResult<MeasurementGeometry> {
    use ConstructionCase as C;

    match case {
        C::EdgeSpan => edge_span(a, placement).map(MeasurementGeometry::Length),
        C::PlanePlane => plane_plane(a, other(b)?).map(MeasurementGeometry::Length),
        C::AxisAxis => axis_axis(a, other(b)?).map(MeasurementGeometry::Length),
        C::AxisPlane => plane_axis(other(b)?, a).map(MeasurementGeometry::Length),
        C::PlaneAxis => plane_axis(a, other(b)?).map(MeasurementGeometry::Length),
        C::PlaneLine(order) => {
            let (face, edge) = face_first(order, a, other(b)?);
            plane_line(face, edge).map(MeasurementGeometry::Length)
        }
        C::PlaneCircle(order) => {
            let (face, edge) = face_first(order, a, other(b)?);
            plane_circle(face, edge).map(MeasurementGeometry::Length)
        }
        C::AxisLine(order) => {
            let (face, edge) = face_first(order, a, other(b)?);
            axis_line(face, edge).map(MeasurementGeometry::Length)
        }
        C::AxisCircle(order) => {
            let (face, edge) = face_first(order, a, other(b)?);
            axis_circle(face, edge).map(MeasurementGeometry::Length)
        }
        C::LineLine => line_line(a, other(b)?).map(MeasurementGeometry::Length),
        C::LineCircle => line_circle(a, other(b)?).map(MeasurementGeometry::Length),
        C::CircleLine => circle_line(a, other(b)?).map(MeasurementGeometry::Length),
        C::CircleCircle => circle_circle(a, other(b)?).map(MeasurementGeometry::Length),
        C::AngleLines => angle_lines(a, other(b)?).map(MeasurementGeometry::Angle),
        C::AnglePlanes => angle_planes(a, other(b)?).map(MeasurementGeometry::Angle),
        C::AngleAxisLine(order) => {
            let (face, edge) = face_first(order, a, other(b)?);
            angle_axis_line(face, edge).map(MeasurementGeometry::Angle)
        }
        C::AngleAxes => angle_axes(),
        C::Diameter => circle(a).map(MeasurementGeometry::Diameter),
        C::Radius => circle(a).map(MeasurementGeometry::Radius),
    }
}

fn mismatch() -> AnnotationError {
    AnnotationError::unsupported("unsupported selection type")
}

fn other<'a, 'b>(b: Option<&'b Operand<'a>>) -> AnnotationResult<&'b Operand<'a>> {
    b.ok_or_else(|| AnnotationError::unsupported("a second shape is required"))
}

fn face_first<'x, 'a>(
    order: Operands,
    a: &'x Operand<'a>,
    b: &'x Operand<'a>,
) -> (&'x Operand<'a>, &'x Operand<'a>) {
    match order {
        Operands::Forward => (a, b),
        Operands::Swapped => (b, a),
    }
}

fn plane(op: &Operand) -> AnnotationResult<Plane> {
    op.primitives.plane.ok_or_else(mismatch)
}

fn line(op: &Operand) -> AnnotationResult<Line3> {
    op.primitives.line.ok_or_else(mismatch)
}

fn axis(op: &Operand) -> AnnotationResult<Axis> {
    op.primitives.axis.ok_or_else(mismatch)
}

fn circle(op: &Operand) -> AnnotationResult<Circle3> {
    op.primitives.circle.ok_or_else(mismatch)
}

fn endpoints(op: &Operand) -> AnnotationResult<(Point3, Point3)> {
    op.endpoints().ok_or_else(mismatch)
}

/// Plane through `anchor` containing `dir` and the direction towards `toward`.
fn carrier_plane(anchor: Point3, toward: Point3, dir: &Vector3) -> AnnotationResult<Plane> {
    unit(&(toward - anchor))
        .and_then(|pp| Plane::from_point_normal(anchor, dir.cross(&pp)))
        .ok_or_else(|| AnnotationError::degenerate("reference points are aligned with the axis"))
}

fn plane_through(a: Point3, b: Point3, c: Point3) -> AnnotationResult<Plane> {
    Plane::from_points(a, b, c)
        .ok_or_else(|| AnnotationError::degenerate("reference points are collinear"))
}

/// A line at zero distance from a plane either lies on it or crosses it.
fn reject_plane_line(plane: &Plane, line: &Line3, subject: &str) -> AnnotationResult<()> {
    if !plane_line_below_epsilon(plane, line) {
        return Ok(());
    }
    if are_perpendicular(&plane.normal, &line.direction) {
        Err(AnnotationError::degenerate(format!("{} lies on the plane", subject)))
    } else {
        Err(AnnotationError::violated(format!("{} not parallel to the plane", subject)))
    }
}

fn parallel_or_perpendicular(a: &Vector3, b: &Vector3, subject: &str) -> AnnotationResult<()> {
    if are_parallel(a, b) || are_perpendicular(a, b) {
        Ok(())
    } else {
        Err(AnnotationError::violated(format!(
            "{} neither parallel nor perpendicular",
            subject
        )))
    }
}

fn edge_span(edge: &Operand, placement: Option<&Plane>) -> AnnotationResult<LengthGeometry> {
    let (start, end) = endpoints(edge)?;
    let placement = placement
        .ok_or_else(|| AnnotationError::unsupported("an edge length needs a placement plane"))?;
    if (end - start).norm() < EPSILON {
        return Err(AnnotationError::degenerate("edge has no length"));
    }
    let normal = -placement.normal;
    if !are_perpendicular(&normal, &(end - start)) {
        return Err(AnnotationError::violated("placement normal not perpendicular to edge"));
    }
    Ok(LengthGeometry::Span {
        start,
        end,
        plane: Plane { origin: start, normal },
    })
}

fn plane_plane(a: &Operand, b: &Operand) -> AnnotationResult<LengthGeometry> {
    let (first, second) = (plane(a)?, plane(b)?);
    if planes_coincident(&first, &second) {
        return Err(AnnotationError::degenerate("two planes coincide"));
    }
    ensure_parallel(&first.normal, &second.normal, "planes")?;
    Ok(LengthGeometry::PlanePlane { first, second })
}

fn axis_axis(a: &Operand, b: &Operand) -> AnnotationResult<LengthGeometry> {
    let (a1, a2) = (axis(a)?, axis(b)?);
    reject_touching(&a1.line(), &a2.line(), "two axes")?;
    ensure_parallel(&a1.direction, &a2.direction, "axes")?;

    let p1 = a1.origin;
    let plane = carrier_plane(p1, a2.origin, &a2.direction)?;
    let p5 = a2.line().project_point(&p1);
    Ok(LengthGeometry::Points { first: p1, second: p5, plane })
}

/// The axis is measured as an unbounded edge lying along it.
fn plane_axis(face: &Operand, revolved: &Operand) -> AnnotationResult<LengthGeometry> {
    let (plane, axis) = (plane(face)?, axis(revolved)?);
    let line = axis.line();
    reject_plane_line(&plane, &line, "axis")?;
    ensure_perpendicular(&plane.normal, &line.direction, "plane normal and axis")?;
    Ok(LengthGeometry::PlaneLine { plane, line })
}

fn plane_line(face: &Operand, edge: &Operand) -> AnnotationResult<LengthGeometry> {
    let (plane, line) = (plane(face)?, line(edge)?);
    reject_plane_line(&plane, &line, "line")?;
    ensure_perpendicular(&plane.normal, &line.direction, "plane normal and line")?;
    Ok(LengthGeometry::PlaneLine { plane, line })
}

fn plane_circle(face: &Operand, edge: &Operand) -> AnnotationResult<LengthGeometry> {
    let (plane, arc_axis) = (plane(face)?, axis(edge)?);
    let (start, _) = endpoints(edge)?;
    let center = arc_axis.origin;
    if plane.contains_point(&center) {
        return Err(AnnotationError::degenerate("arc centre lies on the plane"));
    }
    parallel_or_perpendicular(&plane.normal, &arc_axis.direction, "plane and arc")?;

    let foot = plane.project_point(&center);
    // A seam vertex on the foot-centre line leaves the arc normal to span the plane.
    let support = match Plane::from_points(foot, start, center) {
        Some(support) => support,
        None => Plane::from_point_normal(foot, (center - foot).cross(&arc_axis.direction))
            .ok_or_else(|| AnnotationError::degenerate("reference points are collinear"))?,
    };
    Ok(LengthGeometry::Points { first: foot, second: center, plane: support })
}

fn axis_line(face: &Operand, edge: &Operand) -> AnnotationResult<LengthGeometry> {
    let (axis, line) = (axis(face)?, line(edge)?);
    reject_touching(&axis.line(), &line, "line and axis")?;
    ensure_parallel(&axis.direction, &line.direction, "line and axis")?;

    let p1 = axis.origin;
    let plane = carrier_plane(p1, line.origin, &line.direction)?;
    let p5 = line.project_point(&p1);
    Ok(LengthGeometry::Points { first: p1, second: p5, plane })
}

fn axis_circle(face: &Operand, edge: &Operand) -> AnnotationResult<LengthGeometry> {
    let (axis, arc_axis) = (axis(face)?, axis(edge)?);
    reject_touching(&axis.line(), &arc_axis.line(), "face axis and arc axis")?;
    ensure_parallel(&axis.direction, &arc_axis.direction, "face axis and arc axis")?;

    let center = arc_axis.origin;
    let plane = carrier_plane(axis.origin, center, &arc_axis.direction)?;
    let p5 = axis.line().project_point(&center);
    Ok(LengthGeometry::Points { first: center, second: p5, plane })
}

fn line_line(a: &Operand, b: &Operand) -> AnnotationResult<LengthGeometry> {
    let (l1, l2) = (line(a)?, line(b)?);
    reject_touching(&l1, &l2, "two lines")?;
    ensure_parallel(&l1.direction, &l2.direction, "two lines")?;

    let (p1, p2) = endpoints(a)?;
    let (p3, p4) = endpoints(b)?;
    let carrier = Line3::through(p3, p4).unwrap_or(l2);
    let p5 = carrier.project_point(&p1);
    let plane = plane_through(p1, p2, p5)?;
    Ok(LengthGeometry::Points { first: p1, second: p5, plane })
}

fn line_circle(a: &Operand, b: &Operand) -> AnnotationResult<LengthGeometry> {
    let (l1, arc_axis) = (line(a)?, axis(b)?);
    reject_touching(&l1, &arc_axis.line(), "line and arc axis")?;
    parallel_or_perpendicular(&l1.direction, &arc_axis.direction, "line and arc axis")?;

    let (p1, p2) = endpoints(a)?;
    let center = arc_axis.origin;
    let p5 = l1.project_point(&center);
    let plane = plane_through(p1, p2, center)?;
    Ok(LengthGeometry::Points { first: center, second: p5, plane })
}

fn circle_line(a: &Operand, b: &Operand) -> AnnotationResult<LengthGeometry> {
    let (arc_axis, l2) = (axis(a)?, line(b)?);
    reject_touching(&l2, &arc_axis.line(), "line and arc axis")?;
    parallel_or_perpendicular(&l2.direction, &arc_axis.direction, "line and arc axis")?;

    let (p3, p4) = endpoints(b)?;
    let center = arc_axis.origin;
    let p5 = l2.project_point(&center);
    let plane = plane_through(p3, p4, center)?;
    Ok(LengthGeometry::Points { first: center, second: p5, plane })
}

fn circle_circle(a: &Operand, b: &Operand) -> AnnotationResult<LengthGeometry> {
    let (c1, c2) = (axis(a)?, axis(b)?);
    reject_touching(&c1.line(), &c2.line(), "two arc axes")?;
    ensure_parallel(&c1.direction, &c2.direction, "two arc axes")?;

    let lc1 = c1.origin;
    let plane = carrier_plane(lc1, c2.origin, &c2.direction)?;
    let p5 = c2.line().project_point(&lc1);
    Ok(LengthGeometry::Points { first: lc1, second: p5, plane })
}

fn angle_lines(a: &Operand, b: &Operand) -> AnnotationResult<AngleGeometry> {
    let (first, second) = (line(a)?, line(b)?);
    if are_parallel(&first.direction, &second.direction) {
        return Err(AnnotationError::violated("two lines are parallel"));
    }
    let vertex = first.closest_point_to_line(&second);
    Ok(AngleGeometry::Lines { first, second, vertex })
}

fn angle_planes(a: &Operand, b: &Operand) -> AnnotationResult<AngleGeometry> {
    let (first, second) = (plane(a)?, plane(b)?);
    if are_parallel(&first.normal, &second.normal) {
        return Err(AnnotationError::violated("two planes are parallel"));
    }
    Ok(AngleGeometry::Planes { first, second })
}

/// Angle at the axis location between the two ends of an edge that crosses
/// the axis.
fn angle_axis_line(face: &Operand, edge: &Operand) -> AnnotationResult<AngleGeometry> {
    let (axis, line) = (axis(face)?, line(edge)?);
    if are_parallel(&axis.direction, &line.direction) {
        return Err(AnnotationError::violated("line and axis are parallel"));
    }
    if axis.line().distance_to_line(&line) > EPSILON {
        return Err(AnnotationError::violated("line and axis are skew"));
    }

    let (start, end) = endpoints(edge)?;
    let center = axis.origin;
    if points_collinear(&start, &center, &end) {
        return Err(AnnotationError::degenerate("axis location lies on the edge"));
    }
    Ok(AngleGeometry::ThreePoints { first: start, center, second: end })
}

/// Coaxial revolved faces never get here; classification rejects them.
fn angle_axes() -> AnnotationResult<MeasurementGeometry> {
    Err(AnnotationError::unsupported(
        "angle between two surfaces of revolution is not supported",
    ))
}
