//! Dimension construction for PMI annotation.
//!
//! Given one or two picked shapes and the measurement the operator asked for,
//! the engine reduces each shape to its analytic primitives, selects exactly
//! one construction case, checks the case's geometric preconditions and
//! builds the reference geometry the renderer needs. Every step is a pure
//! function of its inputs.

use crate::geometry::Plane;
use crate::topo::Shape;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod types;
pub use types::*;

pub mod extract;
pub use extract::{extract_primitive, extract_primitives, shape_normal, Operand};

pub mod validity;

pub mod cases;
pub use cases::{ConstructionCase, Operands, Signature};

pub mod build;

pub mod placement;
pub use placement::{
    datum_placement, solve_placement, span_label_frame, tolerance_placement, LabelPlacement,
    PlacementConfig,
};

#[cfg(test)]
mod tests_dispatch;
#[cfg(test)]
mod tests_placement;

/// Why a selection could not be annotated. The message is shown to the
/// operator as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("{0}")]
    UnsupportedSelection(String),
    #[error("{0}")]
    DegenerateGeometry(String),
    #[error("{0}")]
    ConstraintViolated(String),
    #[error("{0}")]
    PlacementIndeterminate(String),
}

impl AnnotationError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedSelection(reason.into())
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry(reason.into())
    }

    pub fn violated(reason: impl Into<String>) -> Self {
        Self::ConstraintViolated(reason.into())
    }

    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Self::PlacementIndeterminate(reason.into())
    }

    /// Stable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedSelection(_) => "UNSUPPORTED_SELECTION",
            Self::DegenerateGeometry(_) => "DEGENERATE_GEOMETRY",
            Self::ConstraintViolated(_) => "CONSTRAINT_VIOLATED",
            Self::PlacementIndeterminate(_) => "PLACEMENT_INDETERMINATE",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::UnsupportedSelection(r)
            | Self::DegenerateGeometry(r)
            | Self::ConstraintViolated(r)
            | Self::PlacementIndeterminate(r) => r,
        }
    }
}

pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// A constructed dimension: the case that produced it and its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub case: ConstructionCase,
    pub geometry: MeasurementGeometry,
}

impl Dimension {
    pub fn value(&self) -> f64 {
        self.geometry.value()
    }
}

/// Selects the construction case for a selection without building anything.
pub fn classify(first: &Shape, second: Option<&Shape>, kind: DimensionKind) -> AnnotationResult<ConstructionCase> {
    let a = Operand::new(first);
    let b = second.map(Operand::new);
    classify_operands(&a, b.as_ref(), kind)
}

fn classify_operands(a: &Operand, b: Option<&Operand>, kind: DimensionKind) -> AnnotationResult<ConstructionCase> {
    if let Some(b) = b {
        validity::reject_coincident_face_axes(a, b)?;
    }
    let case = cases::select_case(kind, a.signature(), b.map(Operand::signature));
    match &case {
        Ok(case) => debug!(%kind, first = %a.shape.id, ?case, "selected construction case"),
        Err(err) => debug!(%kind, first = %a.shape.id, reason = %err, "selection rejected"),
    }
    case
}

/// Classifies a selection and builds its dimension.
///
/// `placement` is the plane the operator wants a straight-edge length drawn
/// in; other cases ignore it.
pub fn construct(
    first: &Shape,
    second: Option<&Shape>,
    kind: DimensionKind,
    placement: Option<&Plane>,
) -> AnnotationResult<Dimension> {
    let a = Operand::new(first);
    let b = second.map(Operand::new);
    let case = classify_operands(&a, b.as_ref(), kind)?;
    let geometry = build::build(case, &a, b.as_ref(), placement).map_err(|err| {
        debug!(?case, code = err.code(), reason = %err, "construction rejected");
        err
    })?;
    debug!(?case, kind = %geometry.kind(), value = geometry.value(), "dimension constructed");
    Ok(Dimension { case, geometry })
}

/// Geometry-only form of [`construct`].
pub fn classify_and_build(
    first: &Shape,
    second: Option<&Shape>,
    kind: DimensionKind,
    placement: Option<&Plane>,
) -> AnnotationResult<MeasurementGeometry> {
    construct(first, second, kind, placement).map(|dimension| dimension.geometry)
}
