//! Inputs and outputs of dimension construction.
//!
//! These types are kernel-agnostic and are what the rendering layer receives
//! to draw a finished dimension.

use crate::geometry::utils_3d::angle_between;
use crate::geometry::{Axis, Circle3, Line3, Plane, Point3};
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the operator asked to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    Length,
    Angle,
    Diameter,
    Radius,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 4] = [Self::Length, Self::Angle, Self::Diameter, Self::Radius];
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::Angle => "angle",
            Self::Diameter => "diameter",
            Self::Radius => "radius",
        };
        f.write_str(name)
    }
}

/// Canonical analytic object a face or edge reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Plane(Plane),
    Line(Line3),
    AxisOfRevolution(Axis),
    Circle(Circle3),
    None,
}

/// Every primitive a shape supports.
///
/// A face yields a plane or an axis of revolution, never both. An edge yields
/// a line, or a centre axis for conic curves plus a circle when the conic is
/// circular.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSet {
    pub plane: Option<Plane>,
    pub line: Option<Line3>,
    pub axis: Option<Axis>,
    pub circle: Option<Circle3>,
}

impl PrimitiveSet {
    pub fn primary(&self) -> Primitive {
        if let Some(plane) = self.plane {
            Primitive::Plane(plane)
        } else if let Some(line) = self.line {
            Primitive::Line(line)
        } else if let Some(circle) = self.circle {
            Primitive::Circle(circle)
        } else if let Some(axis) = self.axis {
            Primitive::AxisOfRevolution(axis)
        } else {
            Primitive::None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plane.is_none() && self.line.is_none() && self.axis.is_none() && self.circle.is_none()
    }
}

/// Reference geometry of a linear dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LengthGeometry {
    /// A straight edge measured between its own vertices, drawn in `plane`.
    Span { start: Point3, end: Point3, plane: Plane },
    /// Two synthesized reference points and the plane the dimension lies in.
    Points { first: Point3, second: Point3, plane: Plane },
    /// Two parallel planar faces; the renderer draws the perpendicular gap.
    PlanePlane { first: Plane, second: Plane },
    /// A planar face and a line parallel to it (an edge, or an infinite edge
    /// synthesized along a rotation axis).
    PlaneLine { plane: Plane, line: Line3 },
}

impl LengthGeometry {
    pub fn value(&self) -> f64 {
        let (a, b) = self.anchor_points();
        (b - a).norm()
    }

    /// The two points the dimension line runs between.
    pub fn anchor_points(&self) -> (Point3, Point3) {
        match self {
            Self::Span { start, end, .. } => (*start, *end),
            Self::Points { first, second, .. } => (*first, *second),
            Self::PlanePlane { first, second } => (first.project_point(&second.origin), second.origin),
            Self::PlaneLine { plane, line } => (plane.project_point(&line.origin), line.origin),
        }
    }
}

/// Reference geometry of an angular dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AngleGeometry {
    /// Two straight edges; `vertex` is the point of `first` closest to `second`.
    Lines { first: Line3, second: Line3, vertex: Point3 },
    Planes { first: Plane, second: Plane },
    /// Angle at `center` between the rays towards `first` and `second`.
    ThreePoints { first: Point3, center: Point3, second: Point3 },
}

impl AngleGeometry {
    /// Angle in radians, within `[0, π]`.
    pub fn value(&self) -> f64 {
        match self {
            Self::Lines { first, second, .. } => angle_between(&first.direction, &second.direction),
            Self::Planes { first, second } => angle_between(&first.normal, &second.normal),
            Self::ThreePoints { first, center, second } => {
                angle_between(&(first - center), &(second - center))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasurementGeometry {
    Length(LengthGeometry),
    Angle(AngleGeometry),
    Diameter(Circle3),
    Radius(Circle3),
}

impl MeasurementGeometry {
    pub fn kind(&self) -> DimensionKind {
        match self {
            Self::Length(_) => DimensionKind::Length,
            Self::Angle(_) => DimensionKind::Angle,
            Self::Diameter(_) => DimensionKind::Diameter,
            Self::Radius(_) => DimensionKind::Radius,
        }
    }

    /// Measured value: model units for lengths, radians for angles.
    pub fn value(&self) -> f64 {
        match self {
            Self::Length(length) => length.value(),
            Self::Angle(angle) => angle.value(),
            Self::Diameter(circle) => circle.diameter(),
            Self::Radius(circle) => circle.radius,
        }
    }

    /// Main text of the label, e.g. `12.50 mm`, `45.00°`, `Ø20.00 mm`.
    /// Model values are taken to be millimetres.
    pub fn label_text(&self, unit: LengthUnit) -> String {
        let value = self.value();
        match self {
            Self::Length(_) => format!("{:.2} {}", unit.from_mm(value), unit),
            Self::Angle(_) => format!("{:.2}°", value.to_degrees()),
            Self::Diameter(_) => format!("Ø{:.2} {}", unit.from_mm(value), unit),
            Self::Radius(_) => format!("R{:.2} {}", unit.from_mm(value), unit),
        }
    }
}
