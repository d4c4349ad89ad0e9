//! Closed-form trajectory prediction
//!
//! A point moving in a straight line between two parallel walls bounces
//! elastically off them. Instead of simulating each bounce, the path is
//! unfolded: extrapolate the perpendicular coordinate as if the walls were
//! absent, then fold the result back into the field. Every odd fold flips
//! the orientation.

use glam::Vec2;
use thiserror::Error;

/// Axis along which the mover is heading toward an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Split a vector into (along, across) components
    fn split(self, v: Vec2) -> (f32, f32) {
        match self {
            Axis::X => (v.x, v.y),
            Axis::Y => (v.y, v.x),
        }
    }
}

/// One of the two edges bounding the primary axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Edge at coordinate 0
    Low,
    /// Edge at coordinate `extent_along`
    High,
}

/// Where and when the mover reaches the target edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Perpendicular coordinate on arrival, within `[0, extent_across]`
    pub position: f32,
    /// Reflections off the perpendicular walls on the way
    pub bounces: u32,
    /// Time until arrival
    pub time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PredictionError {
    /// No motion along the primary axis, so the edge is never reached.
    #[error("velocity along the primary axis is zero")]
    ZeroVelocity,
    /// The perpendicular extent cannot hold a reflection.
    #[error("perpendicular field extent must be positive, got {extent}")]
    DegenerateField { extent: f32 },
}

/// Predict where a mover meets the edge it is currently heading toward.
///
/// `extent_along` and `extent_across` are the field sizes along and across
/// `axis`; coordinates run from 0 to the extent on both axes.
pub fn predict(
    position: Vec2,
    velocity: Vec2,
    extent_along: f32,
    extent_across: f32,
    axis: Axis,
) -> Result<Prediction, PredictionError> {
    let (along, _) = axis.split(position);
    let (speed_along, _) = axis.split(velocity);
    let target = if speed_along > 0.0 {
        Boundary::High
    } else {
        Boundary::Low
    };
    let distance = match target {
        Boundary::High => extent_along - along,
        Boundary::Low => along,
    };
    unfold(position, velocity, distance, extent_across, axis)
}

/// Predict where a mover meets a fixed `target` edge.
///
/// A mover heading away from the target first turns around at the opposite
/// edge, so the travelled distance includes the full field once more.
pub fn predict_toward(
    position: Vec2,
    velocity: Vec2,
    extent_along: f32,
    extent_across: f32,
    axis: Axis,
    target: Boundary,
) -> Result<Prediction, PredictionError> {
    let (along, _) = axis.split(position);
    let (speed_along, _) = axis.split(velocity);
    let distance = match (target, speed_along > 0.0) {
        (Boundary::High, true) => extent_along - along,
        (Boundary::High, false) => along + extent_along,
        (Boundary::Low, false) => along,
        (Boundary::Low, true) => (extent_along - along) + extent_along,
    };
    unfold(position, velocity, distance, extent_across, axis)
}

fn unfold(
    position: Vec2,
    velocity: Vec2,
    distance: f32,
    extent_across: f32,
    axis: Axis,
) -> Result<Prediction, PredictionError> {
    let (_, across) = axis.split(position);
    let (speed_along, speed_across) = axis.split(velocity);
    if speed_along == 0.0 {
        return Err(PredictionError::ZeroVelocity);
    }
    if !(extent_across > 0.0) {
        return Err(PredictionError::DegenerateField {
            extent: extent_across,
        });
    }

    let time = distance / speed_along.abs();
    let raw = across + speed_across * time;
    let (position, bounces) = fold(raw, extent_across);
    Ok(Prediction {
        position,
        bounces,
        time,
    })
}

/// Fold an unbounded coordinate into `[0, extent]`, counting reflections
fn fold(raw: f32, extent: f32) -> (f32, u32) {
    let folds = (raw / extent).floor();
    let mut folded = raw - folds * extent;
    if folds.rem_euclid(2.0) == 1.0 {
        folded = extent - folded;
    }
    (folded, folds.abs() as u32)
}
