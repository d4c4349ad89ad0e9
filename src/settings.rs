//! Match settings
//!
//! Gameplay and opponent tuning, persisted as JSON. Every section falls back
//! to its defaults, so a file only needs the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SIM_DT;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Playing field extents, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub width: f32,
    pub height: f32,
    /// Vertical speed while a move intent is held
    pub speed: f32,
    /// Fraction of the paddle's velocity passed to the ball as spin
    pub spin: f32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 40.0,
            speed: 150.0,
            spin: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub radius: f32,
    pub speed: f32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: 5.0,
            speed: 400.0,
        }
    }
}

/// Tuning for the computer-controlled paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentSettings {
    /// Fraction of the ball's travel time before the first re-plan
    pub reaction_time: f32,
    /// Fraction of the travel time before the follow-up re-plan
    pub adjustment_time: f32,
    /// Exponent applied to the bounce count when estimating aim error
    pub bounce_penalty: f32,
    /// Aim error per second of look-ahead
    pub foresight_penalty: f32,
    /// Drop pending re-plans when a new one is scheduled
    pub supersede_reactions: bool,
}

impl Default for OpponentSettings {
    fn default() -> Self {
        Self {
            reaction_time: 0.3,
            adjustment_time: 0.7,
            bounce_penalty: 1.9,
            foresight_penalty: 20.0,
            supersede_reactions: false,
        }
    }
}

/// Complete match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Points needed to win the contest
    pub winning_score: u32,
    pub field: FieldSettings,
    pub paddle: PaddleSettings,
    pub ball: BallSettings,
    pub opponent: OpponentSettings,
    /// Seconds shown before the contest starts
    pub countdown: f32,
    /// Seconds the result stays up before the match ends
    pub outcome_linger: f32,
    /// Run seed for the serve direction and opponent aim
    pub seed: u64,
    /// Fixed simulation step in seconds
    pub timestep: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            winning_score: 5,
            field: FieldSettings::default(),
            paddle: PaddleSettings::default(),
            ball: BallSettings::default(),
            opponent: OpponentSettings::default(),
            countdown: 3.0,
            outcome_linger: 3.0,
            seed: 0x5eed_0f_f04a,
            timestep: SIM_DT,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("field.width", self.field.width),
            ("field.height", self.field.height),
            ("paddle.width", self.paddle.width),
            ("paddle.height", self.paddle.height),
            ("paddle.speed", self.paddle.speed),
            ("ball.radius", self.ball.radius),
            ("ball.speed", self.ball.speed),
            ("timestep", self.timestep),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("opponent.reaction_time", self.opponent.reaction_time),
            ("opponent.adjustment_time", self.opponent.adjustment_time),
            ("opponent.foresight_penalty", self.opponent.foresight_penalty),
            ("countdown", self.countdown),
            ("outcome_linger", self.outcome_linger),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.winning_score == 0 {
            return Err(SettingsError::Invalid(
                "winning_score must be at least 1".to_string(),
            ));
        }
        if self.ball.radius * 2.0 >= self.field.height
            || self.paddle.height >= self.field.height
        {
            return Err(SettingsError::Invalid(
                "field is too small for the ball and paddles".to_string(),
            ));
        }
        Ok(())
    }
}
