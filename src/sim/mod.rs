//! Deterministic simulation module
//!
//! Pure state and math, no messaging or presentation:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Straight-line kinematics plus closed-form bounce prediction

pub mod trajectory;
pub mod world;

pub use trajectory::{Axis, Boundary, Prediction, PredictionError, predict, predict_toward};
pub use world::{Ball, Edges, Field, Paddle, World};
