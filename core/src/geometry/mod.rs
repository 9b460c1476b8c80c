use nalgebra as na;

pub type Point3 = na::Point3<f64>;
pub type Vector3 = na::Vector3<f64>;

/// Geometric tolerance in model length units. Every parallel, perpendicular
/// and coincidence test in the crate compares against this one value.
pub const EPSILON: f64 = 1e-6;

pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }
}

impl ApproxEq for Point3 {
    fn approx_eq(&self, other: &Self) -> bool {
        na::distance_squared(self, other) < EPSILON * EPSILON
    }
}

impl ApproxEq for Vector3 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).norm_squared() < EPSILON * EPSILON
    }
}

pub mod primitives;
pub use primitives::*;

pub mod utils_3d;
pub use utils_3d::Ray;

pub fn dist(p1: &Point3, p2: &Point3) -> f64 {
    na::distance(p1, p2)
}

/// Normalizes `v`, or returns `None` when it is too short to carry a direction.
pub fn unit(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    if len < EPSILON {
        None
    } else {
        Some(v / len)
    }
}
