//! Reduction of picked shapes to canonical primitives.

use super::cases::Signature;
use super::types::{Primitive, PrimitiveSet};
use crate::geometry::{unit, Axis, Circle3, Line3, Plane, Point3, Vector3};
use crate::topo::{CurveGeometry, Shape, ShapeKind, SurfaceGeometry};

/// A picked shape together with the primitives it reduces to.
#[derive(Debug, Clone, Copy)]
pub struct Operand<'a> {
    pub shape: &'a Shape,
    pub primitives: PrimitiveSet,
}

impl<'a> Operand<'a> {
    pub fn new(shape: &'a Shape) -> Self {
        Self {
            shape,
            primitives: extract_primitives(shape),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind
    }

    pub fn signature(&self) -> Signature {
        Signature::of(self.shape.kind, &self.primitives)
    }

    /// First and last vertex of an edge.
    pub fn endpoints(&self) -> Option<(Point3, Point3)> {
        self.shape.curve().map(|(_, start, end)| (start, end))
    }
}

/// Canonical primitive of a shape, or `Primitive::None` when unsupported.
pub fn extract_primitive(shape: &Shape) -> Primitive {
    extract_primitives(shape).primary()
}

/// All primitives a shape supports. Only edges and faces reduce to anything.
pub fn extract_primitives(shape: &Shape) -> PrimitiveSet {
    match shape.kind {
        ShapeKind::Edge => shape
            .curve()
            .map(|(curve, start, end)| curve_primitives(curve, start, end))
            .unwrap_or_default(),
        ShapeKind::Face => shape.surface().map(surface_primitives).unwrap_or_default(),
        _ => PrimitiveSet::default(),
    }
}

fn curve_primitives(curve: &CurveGeometry, start: Point3, end: Point3) -> PrimitiveSet {
    let mut set = PrimitiveSet::default();
    match curve {
        CurveGeometry::Line { origin, direction } => {
            // Anchor at the first vertex and orient along the edge when it has length.
            let line = match Line3::through(start, end) {
                Some(line) => Some(line),
                None => unit(direction).map(|direction| Line3 { origin: *origin, direction }),
            };
            set.line = line;
        }
        CurveGeometry::Circle { center, normal, radius } => {
            if unit(normal).is_some() && *radius > 0.0 {
                let circle = Circle3::new(*center, *normal, *radius);
                set.axis = Some(circle.axis());
                set.circle = Some(circle);
            }
        }
        CurveGeometry::Ellipse { center, normal, .. } => {
            set.axis = unit(normal).map(|direction| Axis { origin: *center, direction });
        }
        CurveGeometry::Freeform => {}
    }
    set
}

fn surface_primitives(surface: &SurfaceGeometry) -> PrimitiveSet {
    let mut set = PrimitiveSet::default();
    match surface {
        SurfaceGeometry::Plane { origin, normal } => {
            set.plane = Plane::from_point_normal(*origin, *normal);
        }
        _ => {
            set.axis = revolution_axis(surface);
        }
    }
    set
}

/// Rotation axis of a surface of revolution.
pub fn revolution_axis(surface: &SurfaceGeometry) -> Option<Axis> {
    let (origin, dir) = match surface {
        SurfaceGeometry::Cylinder { axis_origin, axis_dir, .. } => (axis_origin, axis_dir),
        SurfaceGeometry::Cone { apex, axis_dir, .. } => (apex, axis_dir),
        SurfaceGeometry::Sphere { center, axis_dir, .. } => (center, axis_dir),
        SurfaceGeometry::Torus { center, axis_dir, .. } => (center, axis_dir),
        SurfaceGeometry::Revolution { axis_origin, axis_dir } => (axis_origin, axis_dir),
        SurfaceGeometry::Plane { .. } | SurfaceGeometry::Freeform => return None,
    };
    unit(dir).map(|direction| Axis { origin: *origin, direction })
}

/// Effective direction of a shape at a touch point: the outward surface
/// normal for faces, the radial direction for conic edges and the edge
/// direction for straight edges. `None` where no such direction exists.
pub fn shape_normal(shape: &Shape, touch: &Point3) -> Option<Vector3> {
    match shape.kind {
        ShapeKind::Face => surface_normal(shape.surface()?, touch),
        ShapeKind::Edge => {
            let (curve, start, end) = shape.curve()?;
            match curve {
                CurveGeometry::Line { direction, .. } => unit(&(end - start)).or_else(|| unit(direction)),
                CurveGeometry::Circle { center, normal, .. }
                | CurveGeometry::Ellipse { center, normal, .. } => {
                    let plane = Plane::from_point_normal(*center, *normal)?;
                    unit(&(plane.project_point(touch) - center))
                }
                CurveGeometry::Freeform => None,
            }
        }
        _ => None,
    }
}

fn surface_normal(surface: &SurfaceGeometry, touch: &Point3) -> Option<Vector3> {
    match surface {
        SurfaceGeometry::Plane { normal, .. } => unit(normal),
        SurfaceGeometry::Cylinder { .. } => {
            let axis = revolution_axis(surface)?;
            unit(&(touch - axis.line().project_point(touch)))
        }
        SurfaceGeometry::Cone { apex, axis_dir, half_angle } => {
            let a = unit(axis_dir)?;
            let v = touch - apex;
            let h = v.dot(&a);
            let radial = unit(&(v - a * h))?;
            let (sin, cos) = half_angle.sin_cos();
            unit(&(radial * cos - a * (sin * h.signum())))
        }
        SurfaceGeometry::Sphere { center, .. } => unit(&(touch - center)),
        SurfaceGeometry::Torus { center, axis_dir, major_radius, .. } => {
            let plane = Plane::from_point_normal(*center, *axis_dir)?;
            let radial = unit(&(plane.project_point(touch) - center))?;
            let tube_center = center + radial * *major_radius;
            unit(&(touch - tube_center))
        }
        SurfaceGeometry::Revolution { .. } | SurfaceGeometry::Freeform => None,
    }
}
