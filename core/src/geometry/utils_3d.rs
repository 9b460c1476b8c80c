//! 3D geometry utilities for annotation construction.
//!
//! Direction predicates, ray casting against boxes, and small point-set
//! checks shared by the annotation engine.

use super::{Aabb, Point3, Vector3, EPSILON};

// =============================================================================
// Direction Predicates
// =============================================================================

/// True when two directions are parallel or anti-parallel within `EPSILON`.
/// Inputs need not be normalized; a zero vector is parallel to nothing.
pub fn directions_parallel(a: &Vector3, b: &Vector3) -> bool {
    let (la, lb) = (a.norm(), b.norm());
    if la < EPSILON || lb < EPSILON {
        return false;
    }
    a.cross(b).norm() / (la * lb) < EPSILON
}

/// True when two directions are perpendicular within `EPSILON`.
pub fn directions_perpendicular(a: &Vector3, b: &Vector3) -> bool {
    let (la, lb) = (a.norm(), b.norm());
    if la < EPSILON || lb < EPSILON {
        return false;
    }
    (a.dot(b) / (la * lb)).abs() < EPSILON
}

/// Unsigned angle between two directions, in `[0, π]`.
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < EPSILON * EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

// =============================================================================
// Ray Representation
// =============================================================================

/// A ray defined by an origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    /// Create a new ray; `None` when the direction has no length.
    pub fn new(origin: Point3, direction: Vector3) -> Option<Self> {
        super::unit(&direction).map(|direction| Self { origin, direction })
    }

    /// Get a point along the ray at parameter t.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }
}

// =============================================================================
// Intersections
// =============================================================================

/// Nearest crossing of a ray with the faces of a box, limited to
/// parameters in `[0, max_t]`. From inside the box this is the exit point,
/// from outside the entry point. An origin within `EPSILON` of a face
/// counts as lying on it.
pub fn ray_box_crossing(ray: &Ray, aabb: &Aabb, max_t: f64) -> Option<(f64, Point3)> {
    if aabb.is_empty() {
        return None;
    }
    let (t_enter, t_exit) = aabb.intersect_ray(&ray.origin, &ray.direction)?;

    let t = if t_enter >= -EPSILON { t_enter } else { t_exit };
    if t < -EPSILON || t > max_t {
        return None;
    }

    let t = t.max(0.0);
    Some((t, ray.at(t)))
}

// =============================================================================
// Point Operations
// =============================================================================

/// True when the three points lie on one line (or coincide) within `EPSILON`.
pub fn points_collinear(a: &Point3, b: &Point3, c: &Point3) -> bool {
    let ab = b - a;
    let ac = c - a;
    let scale = ab.norm().max(ac.norm());
    if scale < EPSILON {
        return true;
    }
    ab.cross(&ac).norm() / scale < EPSILON
}

// =============================================================================
// Tests
// =============================================================================
