//! Label anchors outside the model silhouette.
//!
//! A label is pushed from its touch point along a direction until it clears
//! the model's bounding box by a fixed margin, then oriented by a frame the
//! renderer draws the label text in.

use super::extract::{revolution_axis, shape_normal};
use super::types::PrimitiveSet;
use super::validity::{are_parallel, are_perpendicular};
use super::{extract_primitives, AnnotationError, AnnotationResult};
use crate::geometry::utils_3d::ray_box_crossing;
use crate::geometry::{dist, unit, Aabb, Frame, Point3, Ray, Vector3};
use crate::topo::{Shape, ShapeKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning of the placement solver, in model length units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Smallest distance a label keeps from its touch point, before clearance.
    pub min_offset: f64,
    /// Multiplier applied to the offset so labels sit beyond the box face.
    pub clearance: f64,
    /// Rays are only followed this far.
    pub max_ray_length: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_offset: 15.0,
            clearance: 1.2,
            max_ray_length: 1e5,
        }
    }
}

impl PlacementConfig {
    /// Every setting has to be a positive, finite length or factor.
    pub fn validate(&self) -> Result<(), String> {
        let settings = [
            ("min_offset", self.min_offset),
            ("clearance", self.clearance),
            ("max_ray_length", self.max_ray_length),
        ];
        for (name, value) in settings {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Where a label's leader starts and the frame its text is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub attach: Point3,
    pub frame: Frame,
}

/// Point beyond the model bounds along `direction` from `touch`.
///
/// The ray's nearest crossing with the box faces gives the border distance,
/// floored at `min_offset`; the target lies `clearance` times that distance
/// away from `touch`.
pub fn solve_placement(
    touch: &Point3,
    direction: &Vector3,
    bounds: &Aabb,
    cfg: &PlacementConfig,
) -> AnnotationResult<Point3> {
    if bounds.is_empty() {
        return Err(AnnotationError::indeterminate("model bounds are empty"));
    }
    let ray = Ray::new(*touch, *direction)
        .ok_or_else(|| AnnotationError::indeterminate("placement direction has no length"))?;
    let (_, border) = ray_box_crossing(&ray, bounds, cfg.max_ray_length)
        .ok_or_else(|| AnnotationError::indeterminate("placement ray misses the model bounds"))?;

    let offset = dist(touch, &border).max(cfg.min_offset);
    let target = touch + ray.direction * (cfg.clearance * offset);
    debug!(?touch, ?border, offset, "label placed");
    Ok(target)
}

/// Frame of a straight-edge length label: placed off the span midpoint along
/// `normal`, reading along the span.
pub fn span_label_frame(
    start: &Point3,
    end: &Point3,
    normal: &Vector3,
    bounds: &Aabb,
    cfg: &PlacementConfig,
) -> AnnotationResult<LabelPlacement> {
    let mid = nalgebra::center(start, end);
    let target = solve_placement(&mid, normal, bounds, cfg)?;
    let frame = Frame::new(target, *normal, end - start)
        .ok_or_else(|| AnnotationError::violated("placement normal not perpendicular to edge"))?;
    Ok(LabelPlacement { attach: mid, frame })
}

/// Leader origin and direction of a datum flag on `shape`.
fn datum_anchor(shape: &Shape, touch: &Point3, primitives: &PrimitiveSet) -> Option<(Point3, Vector3)> {
    match shape.kind {
        ShapeKind::Face => {
            if let Some(axis) = shape.surface().and_then(revolution_axis) {
                return Some((axis.line().project_point(touch), axis.direction));
            }
        }
        ShapeKind::Edge => {
            if let Some(axis) = primitives.axis {
                return Some((axis.origin, axis.direction));
            }
            if let Some((_, _, end)) = shape.curve() {
                return shape_normal(shape, touch).map(|dir| (end, dir));
            }
        }
        _ => {}
    }
    shape_normal(shape, touch).map(|dir| (*touch, dir))
}

/// Datum flag placement.
///
/// Revolved faces hang the flag off the axis, conic edges off their centre
/// and straight edges off their end vertex. `placement_normal` is the normal
/// of the plane the flag is drawn in; it has to be perpendicular to the
/// datum direction.
pub fn datum_placement(
    shape: &Shape,
    touch: &Point3,
    placement_normal: &Vector3,
    label_width: f64,
    bounds: &Aabb,
    cfg: &PlacementConfig,
) -> AnnotationResult<LabelPlacement> {
    let primitives = extract_primitives(shape);
    let (attach, direction) = datum_anchor(shape, touch, &primitives)
        .ok_or_else(|| AnnotationError::unsupported("selected shape cannot be a datum"))?;
    let target = solve_placement(&attach, &direction, bounds, cfg)?;

    let normal = unit(placement_normal)
        .ok_or_else(|| AnnotationError::unsupported("placement plane has no normal"))?;
    if are_parallel(&direction, &normal) {
        return Err(AnnotationError::violated("placement normal is parallel to the datum direction"));
    }
    if !are_perpendicular(&direction, &normal) {
        return Err(AnnotationError::violated("placement normal not perpendicular to the datum direction"));
    }

    let vx = direction.cross(&normal);
    let frame = Frame::new(target - vx * (0.5 * label_width), normal, vx)
        .ok_or_else(|| AnnotationError::degenerate("datum frame has no reading direction"))?;
    Ok(LabelPlacement { attach, frame })
}

/// Tolerance frame placement: off the touch point along the shape normal.
pub fn tolerance_placement(
    shape: &Shape,
    touch: &Point3,
    bounds: &Aabb,
    cfg: &PlacementConfig,
) -> AnnotationResult<LabelPlacement> {
    let direction = shape_normal(shape, touch)
        .ok_or_else(|| AnnotationError::unsupported("selected shape has no normal at the touch point"))?;
    let target = solve_placement(touch, &direction, bounds, cfg)?;
    let frame = Frame::from_z(target, direction)
        .ok_or_else(|| AnnotationError::degenerate("tolerance frame has no normal"))?;
    Ok(LabelPlacement { attach: *touch, frame })
}
