//! Crate-level error type

use thiserror::Error;

use crate::messaging::MessagingError;
use crate::settings::SettingsError;
use crate::sim::PredictionError;

/// Anything a phase or task can fail with
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Messaging(#[from] MessagingError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
