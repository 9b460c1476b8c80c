use super::utils_3d::{directions_parallel, directions_perpendicular};
use super::{unit, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

/// An infinite line through `origin` with a unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Line3 {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Line through two distinct points, directed from `a` to `b`.
    pub fn through(a: Point3, b: Point3) -> Option<Self> {
        unit(&(b - a)).map(|direction| Self { origin: a, direction })
    }

    pub fn project_point(&self, p: &Point3) -> Point3 {
        let v = p - self.origin;
        let d = v.dot(&self.direction);
        self.origin + self.direction * d
    }

    pub fn distance_to_point(&self, p: &Point3) -> f64 {
        let proj = self.project_point(p);
        (p - proj).norm()
    }

    /// Distance between the two infinite carriers. Parallel lines report the
    /// gap between them, crossing lines report 0, skew lines report the length
    /// of their common perpendicular.
    pub fn distance_to_line(&self, other: &Line3) -> f64 {
        let n = self.direction.cross(&other.direction);
        if directions_parallel(&self.direction, &other.direction) {
            return self.distance_to_point(&other.origin);
        }
        ((other.origin - self.origin).dot(&n) / n.norm()).abs()
    }

    /// Point on `self` closest to `other`. Falls back to `self.origin` for
    /// parallel lines, where every point is equally close.
    pub fn closest_point_to_line(&self, other: &Line3) -> Point3 {
        let w = self.origin - other.origin;
        let b = self.direction.dot(&other.direction);
        let d = self.direction.dot(&w);
        let e = other.direction.dot(&w);
        let denom = 1.0 - b * b;
        if denom.abs() < EPSILON {
            return self.origin;
        }
        let s = (b * e - d) / denom;
        self.origin + self.direction * s
    }
}

/// A plane through `origin` with a unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    /// XY plane at z = 0
    pub fn xy() -> Self {
        Self::new(Point3::origin(), Vector3::z())
    }

    /// Plane through `origin` with the given normal, `None` for a zero normal.
    pub fn from_point_normal(origin: Point3, normal: Vector3) -> Option<Self> {
        unit(&normal).map(|normal| Self { origin, normal })
    }

    /// Plane through three points with normal `(b - a) × (c - a)`.
    /// Returns `None` when the points are collinear.
    pub fn from_points(a: Point3, b: Point3, c: Point3) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        unit(&normal).map(|normal| Self { origin: a, normal })
    }

    /// Signed distance from a point to this plane.
    /// Positive = point is on the side the normal points to.
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    pub fn distance(&self, point: &Point3) -> f64 {
        self.signed_distance(point).abs()
    }

    pub fn project_point(&self, p: &Point3) -> Point3 {
        p - self.normal * self.signed_distance(p)
    }

    pub fn contains_point(&self, point: &Point3) -> bool {
        self.distance(point) < EPSILON
    }

    /// Distance between two planes; 0 unless they are parallel.
    pub fn distance_to_plane(&self, other: &Plane) -> f64 {
        if directions_parallel(&self.normal, &other.normal) {
            self.distance(&other.origin)
        } else {
            0.0
        }
    }

    /// Distance from an infinite line; 0 unless the line runs parallel to the plane.
    pub fn distance_to_line(&self, line: &Line3) -> f64 {
        if directions_perpendicular(&self.normal, &line.direction) {
            self.distance(&line.origin)
        } else {
            0.0
        }
    }
}

/// A located unit direction: the rotation axis of a revolved surface, or the
/// centre and normal of a conic edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Axis {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn line(&self) -> Line3 {
        Line3 {
            origin: self.origin,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle3 {
    pub center: Point3,
    pub normal: Vector3,
    pub radius: f64,
}

impl Circle3 {
    pub fn new(center: Point3, normal: Vector3, radius: f64) -> Self {
        Self {
            center,
            normal: normal.normalize(),
            radius: radius.abs(),
        }
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn axis(&self) -> Axis {
        Axis {
            origin: self.center,
            direction: self.normal,
        }
    }
}

/// Right-handed placement frame for a label: `z_dir` is the label normal and
/// `x_dir` its reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point3,
    pub z_dir: Vector3,
    pub x_dir: Vector3,
}

impl Frame {
    /// Builds a frame from a normal and a reference x direction. The x
    /// direction is made orthogonal to `z`; `None` if it is parallel to `z`.
    pub fn new(origin: Point3, z: Vector3, x: Vector3) -> Option<Self> {
        let z_dir = unit(&z)?;
        let y = z_dir.cross(&x);
        let x_dir = unit(&y.cross(&z_dir))?;
        Some(Self { origin, z_dir, x_dir })
    }

    /// Frame with the given normal and a deterministic perpendicular x
    /// direction derived from the normal's smallest component.
    pub fn from_z(origin: Point3, z: Vector3) -> Option<Self> {
        let z_dir = unit(&z)?;
        let (a, b, c) = (z_dir.x, z_dir.y, z_dir.z);
        let (aa, ba, ca) = (a.abs(), b.abs(), c.abs());
        let x = if ba <= aa && ba <= ca {
            if aa > ca {
                Vector3::new(-c, 0.0, a)
            } else {
                Vector3::new(c, 0.0, -a)
            }
        } else if aa <= ba && aa <= ca {
            if ba > ca {
                Vector3::new(0.0, -c, b)
            } else {
                Vector3::new(0.0, c, -b)
            }
        } else if aa > ba {
            Vector3::new(-b, a, 0.0)
        } else {
            Vector3::new(b, -a, 0.0)
        };
        Self::new(origin, z_dir, x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Slab test against the box. Returns the entry and exit parameters of
    /// the infinite line `origin + t * direction`; the entry is negative when
    /// the origin is already inside.
    pub fn intersect_ray(&self, origin: &Point3, direction: &Vector3) -> Option<(f64, f64)> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f64::EPSILON {
                // Parallel to this slab: the line either stays inside it or misses.
                if o < lo - EPSILON || o > hi + EPSILON {
                    return None;
                }
                continue;
            }

            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max >= t_min {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}
