//! Tolerance predicates gating the construction cases.
//!
//! All predicates compare against the crate-wide `EPSILON`. Coincidence is
//! always tested before parallelism or perpendicularity: a coincident pair is
//! also a parallel one.

use super::{AnnotationError, AnnotationResult, Operand};
use crate::geometry::utils_3d::{directions_parallel, directions_perpendicular};
use crate::geometry::{Axis, Line3, Plane, Vector3, EPSILON};
use crate::topo::ShapeKind;

pub fn are_parallel(a: &Vector3, b: &Vector3) -> bool {
    directions_parallel(a, b)
}

pub fn are_perpendicular(a: &Vector3, b: &Vector3) -> bool {
    directions_perpendicular(a, b)
}

/// The two infinite lines are within `EPSILON` of each other: the same line
/// when parallel, crossing lines otherwise.
pub fn are_coincident_lines(a: &Line3, b: &Line3) -> bool {
    a.distance_to_line(b) < EPSILON
}

/// Distinct, non-parallel lines that meet.
pub fn lines_intersect(a: &Line3, b: &Line3) -> bool {
    !are_parallel(&a.direction, &b.direction) && are_coincident_lines(a, b)
}

/// Line lies on the plane or crosses it.
pub fn plane_line_below_epsilon(plane: &Plane, line: &Line3) -> bool {
    plane.distance_to_line(line) < EPSILON
}

/// Parallel planes with no gap between them.
pub fn planes_coincident(a: &Plane, b: &Plane) -> bool {
    are_parallel(&a.normal, &b.normal) && a.distance_to_plane(b) < EPSILON
}

pub fn axes_coincident(a: &Axis, b: &Axis) -> bool {
    are_parallel(&a.direction, &b.direction) && are_coincident_lines(&a.line(), &b.line())
}

/// Rejects lines that touch, naming the subjects (e.g. "two lines").
pub fn reject_touching(a: &Line3, b: &Line3, subject: &str) -> AnnotationResult<()> {
    if lines_intersect(a, b) {
        Err(AnnotationError::degenerate(format!("{} intersect", subject)))
    } else if are_coincident_lines(a, b) {
        Err(AnnotationError::degenerate(format!("{} coincide", subject)))
    } else {
        Ok(())
    }
}

pub fn ensure_parallel(a: &Vector3, b: &Vector3, subject: &str) -> AnnotationResult<()> {
    if are_parallel(a, b) {
        Ok(())
    } else {
        Err(AnnotationError::violated(format!("{} not parallel", subject)))
    }
}

pub fn ensure_perpendicular(a: &Vector3, b: &Vector3, subject: &str) -> AnnotationResult<()> {
    if are_perpendicular(a, b) {
        Ok(())
    } else {
        Err(AnnotationError::violated(format!("{} not perpendicular", subject)))
    }
}

/// Two revolved faces sharing one rotation axis describe no measurable
/// relation, whatever the requested dimension.
pub fn reject_coincident_face_axes(a: &Operand, b: &Operand) -> AnnotationResult<()> {
    if a.kind() != ShapeKind::Face || b.kind() != ShapeKind::Face {
        return Ok(());
    }
    match (a.primitives.axis, b.primitives.axis) {
        (Some(a1), Some(a2)) if axes_coincident(&a1, &a2) => {
            Err(AnnotationError::degenerate("two axes coincide"))
        }
        _ => Ok(()),
    }
}
