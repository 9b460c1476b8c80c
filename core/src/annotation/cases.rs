//! Case dispatch: one construction case per selection signature.

use super::types::{DimensionKind, PrimitiveSet};
use super::{AnnotationError, AnnotationResult};
use crate::topo::ShapeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape kind and primitive class of one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signature {
    PlanarFace,
    /// Face of a surface of revolution.
    RevolvedFace,
    StraightEdge,
    CircularEdge,
    /// Non-circular conic edge; exposes a centre axis but no circle.
    ConicEdge,
    Unsupported,
}

impl Signature {
    pub fn of(kind: ShapeKind, primitives: &PrimitiveSet) -> Self {
        match kind {
            ShapeKind::Face if primitives.plane.is_some() => Self::PlanarFace,
            ShapeKind::Face if primitives.axis.is_some() => Self::RevolvedFace,
            ShapeKind::Edge if primitives.line.is_some() => Self::StraightEdge,
            ShapeKind::Edge if primitives.circle.is_some() => Self::CircularEdge,
            ShapeKind::Edge if primitives.axis.is_some() => Self::ConicEdge,
            _ => Self::Unsupported,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlanarFace => "planar face",
            Self::RevolvedFace => "revolved face",
            Self::StraightEdge => "straight edge",
            Self::CircularEdge => "circular edge",
            Self::ConicEdge => "conic edge",
            Self::Unsupported => "unsupported shape",
        };
        f.write_str(name)
    }
}

/// Which operand of a mixed pair came first. Face/edge cases are written for
/// the face first; `Swapped` means the edge was picked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operands {
    Forward,
    Swapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionCase {
    /// A straight edge measured between its own vertices.
    EdgeSpan,
    PlanePlane,
    AxisAxis,
    /// Revolved face first, planar face second.
    AxisPlane,
    PlaneAxis,
    PlaneLine(Operands),
    PlaneCircle(Operands),
    AxisLine(Operands),
    AxisCircle(Operands),
    LineLine,
    LineCircle,
    CircleLine,
    CircleCircle,
    AngleLines,
    AnglePlanes,
    AngleAxisLine(Operands),
    AngleAxes,
    Diameter,
    Radius,
}

impl ConstructionCase {
    pub fn kind(&self) -> DimensionKind {
        match self {
            Self::AngleLines | Self::AnglePlanes | Self::AngleAxisLine(_) | Self::AngleAxes => {
                DimensionKind::Angle
            }
            Self::Diameter => DimensionKind::Diameter,
            Self::Radius => DimensionKind::Radius,
            _ => DimensionKind::Length,
        }
    }
}

/// Selects the construction case for a requested dimension.
///
/// Conic edges stand in for circular ones wherever only the centre axis is
/// used; diameter and radius need a true circle. Any second operand of a
/// diameter or radius request is ignored.
pub fn select_case(
    kind: DimensionKind,
    first: Signature,
    second: Option<Signature>,
) -> AnnotationResult<ConstructionCase> {
    use ConstructionCase as C;
    use DimensionKind::*;
    use Operands::*;
    use Signature::*;

    let case = match (kind, first, second) {
        (Length, StraightEdge, None) => C::EdgeSpan,
        (Length, PlanarFace, Some(PlanarFace)) => C::PlanePlane,
        (Length, RevolvedFace, Some(RevolvedFace)) => C::AxisAxis,
        (Length, RevolvedFace, Some(PlanarFace)) => C::AxisPlane,
        (Length, PlanarFace, Some(RevolvedFace)) => C::PlaneAxis,

        (Length, PlanarFace, Some(StraightEdge)) => C::PlaneLine(Forward),
        (Length, StraightEdge, Some(PlanarFace)) => C::PlaneLine(Swapped),
        (Length, PlanarFace, Some(CircularEdge | ConicEdge)) => C::PlaneCircle(Forward),
        (Length, CircularEdge | ConicEdge, Some(PlanarFace)) => C::PlaneCircle(Swapped),
        (Length, RevolvedFace, Some(StraightEdge)) => C::AxisLine(Forward),
        (Length, StraightEdge, Some(RevolvedFace)) => C::AxisLine(Swapped),
        (Length, RevolvedFace, Some(CircularEdge | ConicEdge)) => C::AxisCircle(Forward),
        (Length, CircularEdge | ConicEdge, Some(RevolvedFace)) => C::AxisCircle(Swapped),

        (Length, StraightEdge, Some(StraightEdge)) => C::LineLine,
        (Length, StraightEdge, Some(CircularEdge | ConicEdge)) => C::LineCircle,
        (Length, CircularEdge | ConicEdge, Some(StraightEdge)) => C::CircleLine,
        (Length, CircularEdge | ConicEdge, Some(CircularEdge | ConicEdge)) => C::CircleCircle,

        (Angle, StraightEdge, Some(StraightEdge)) => C::AngleLines,
        (Angle, PlanarFace, Some(PlanarFace)) => C::AnglePlanes,
        (Angle, RevolvedFace, Some(StraightEdge)) => C::AngleAxisLine(Forward),
        (Angle, StraightEdge, Some(RevolvedFace)) => C::AngleAxisLine(Swapped),
        (Angle, RevolvedFace, Some(RevolvedFace)) => C::AngleAxes,

        (Diameter, CircularEdge, _) => C::Diameter,
        (Radius, CircularEdge, _) => C::Radius,

        _ => return Err(AnnotationError::unsupported("unsupported selection type")),
    };
    Ok(case)
}
