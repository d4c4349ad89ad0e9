//! Forum Pong - Pong driven by a deferred command bus
//!
//! Core modules:
//! - `messaging`: Command registry, same-tick bus and delay scheduler
//! - `sim`: Deterministic world state and closed-form bounce prediction
//! - `phase`: Phase state machine and its controller
//! - `game`: Countdown, contest and outcome phases with their tasks
//! - `frontend`: Input and presentation seams
//! - `settings`: JSON match configuration

pub mod error;
pub mod frontend;
pub mod game;
pub mod messaging;
pub mod phase;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use phase::{ControllerState, Phase, PhaseController, PhaseStatus};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Default tick cap for a headless run (ten simulated minutes)
    pub const DEFAULT_MAX_TICKS: u64 = 120 * 600;
}
