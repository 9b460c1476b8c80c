//! Analytic shape descriptors.
//!
//! A `Shape` is the read-only handle the import layer hands over for a picked
//! face or edge: its topological kind plus the analytic curve or surface it
//! lies on. Trimming boundaries are not carried beyond an edge's end vertices.

use super::{EntityId, ShapeKind};
use crate::geometry::{Frame, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Underlying curve of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveGeometry {
    Line { origin: Point3, direction: Vector3 },
    Circle { center: Point3, normal: Vector3, radius: f64 },
    Ellipse { center: Point3, normal: Vector3, major_radius: f64, minor_radius: f64 },
    /// B-spline, offset and other curves with no analytic reduction.
    Freeform,
}

/// Underlying surface of a face. Revolved surfaces carry their rotation axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceGeometry {
    Plane { origin: Point3, normal: Vector3 },
    Cylinder { axis_origin: Point3, axis_dir: Vector3, radius: f64 },
    /// Cone opening along `axis_dir` from `apex`.
    Cone { apex: Point3, axis_dir: Vector3, half_angle: f64 },
    Sphere { center: Point3, axis_dir: Vector3, radius: f64 },
    Torus { center: Point3, axis_dir: Vector3, major_radius: f64, minor_radius: f64 },
    /// Generic surface of revolution swept from an arbitrary profile.
    Revolution { axis_origin: Point3, axis_dir: Vector3 },
    Freeform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    /// Edge geometry with the curve evaluated at its first and last parameter.
    Curve { curve: CurveGeometry, start: Point3, end: Point3 },
    Surface(SurfaceGeometry),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: EntityId,
    pub kind: ShapeKind,
    pub geometry: ShapeGeometry,
}

impl Shape {
    pub fn new(kind: ShapeKind, geometry: ShapeGeometry) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            geometry,
        }
    }

    pub fn face(surface: SurfaceGeometry) -> Self {
        Self::new(ShapeKind::Face, ShapeGeometry::Surface(surface))
    }

    pub fn edge(curve: CurveGeometry, start: Point3, end: Point3) -> Self {
        Self::new(ShapeKind::Edge, ShapeGeometry::Curve { curve, start, end })
    }

    pub fn planar_face(origin: Point3, normal: Vector3) -> Self {
        Self::face(SurfaceGeometry::Plane { origin, normal })
    }

    pub fn cylindrical_face(axis_origin: Point3, axis_dir: Vector3, radius: f64) -> Self {
        Self::face(SurfaceGeometry::Cylinder { axis_origin, axis_dir, radius })
    }

    /// Straight edge between two vertices.
    pub fn line_edge(start: Point3, end: Point3) -> Self {
        Self::edge(
            CurveGeometry::Line { origin: start, direction: end - start },
            start,
            end,
        )
    }

    /// Closed circular edge; both vertices sit at the curve's zero parameter.
    pub fn circle_edge(center: Point3, normal: Vector3, radius: f64) -> Self {
        let seam = Frame::from_z(center, normal)
            .map(|frame| center + frame.x_dir * radius)
            .unwrap_or(center);
        Self::arc_edge(center, normal, radius, seam, seam)
    }

    pub fn arc_edge(center: Point3, normal: Vector3, radius: f64, start: Point3, end: Point3) -> Self {
        Self::edge(CurveGeometry::Circle { center, normal, radius }, start, end)
    }

    pub fn curve(&self) -> Option<(&CurveGeometry, Point3, Point3)> {
        match &self.geometry {
            ShapeGeometry::Curve { curve, start, end } => Some((curve, *start, *end)),
            _ => None,
        }
    }

    pub fn surface(&self) -> Option<&SurfaceGeometry> {
        match &self.geometry {
            ShapeGeometry::Surface(surface) => Some(surface),
            _ => None,
        }
    }
}
