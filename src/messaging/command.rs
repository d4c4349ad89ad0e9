//! Gameplay commands
//!
//! Commands carry data only. Whatever they mean is decided by the handlers
//! that subscribe to their kind.

use serde::{Deserialize, Serialize};

use super::Message;

/// Identifies one of the two paddles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleId {
    /// Left paddle, driven by the human player
    Home,
    /// Right paddle, driven by the opponent
    Away,
}

impl PaddleId {
    /// The paddle on the other side of the field
    pub fn rival(self) -> Self {
        match self {
            PaddleId::Home => PaddleId::Away,
            PaddleId::Away => PaddleId::Home,
        }
    }
}

/// Direction of travel along a paddle's axis.
///
/// Screen coordinates grow downward, so `Negative` moves a paddle up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Positive,
    Negative,
}

impl Heading {
    /// Sign applied to a speed travelling this way
    pub fn sign(self) -> f32 {
        match self {
            Heading::Positive => 1.0,
            Heading::Negative => -1.0,
        }
    }

    /// Heading of a non-zero velocity, `None` when at rest
    pub fn of(velocity: f32) -> Option<Self> {
        if velocity > 0.0 {
            Some(Heading::Positive)
        } else if velocity < 0.0 {
            Some(Heading::Negative)
        } else {
            None
        }
    }
}

/// Discrete events and requests exchanged during a contest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// The ball crossed one or more field edges
    BoundaryHit {
        top: bool,
        left: bool,
        bottom: bool,
        right: bool,
    },
    /// A moving paddle struck the ball and imparts spin
    Deflect { source_velocity: f32 },
    /// A paddle earned a point
    ScoreChanged { entity_id: PaddleId },
    /// Start moving a paddle
    VelocityIntent {
        entity_id: PaddleId,
        direction: Heading,
    },
    /// Stop a paddle if it is moving in `direction`
    VelocityStop {
        entity_id: PaddleId,
        direction: Heading,
    },
}

/// Subscription key for [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    BoundaryHit,
    Deflect,
    ScoreChanged,
    VelocityIntent,
    VelocityStop,
}

impl Message for Command {
    type Kind = CommandKind;

    fn kind(&self) -> CommandKind {
        match self {
            Command::BoundaryHit { .. } => CommandKind::BoundaryHit,
            Command::Deflect { .. } => CommandKind::Deflect,
            Command::ScoreChanged { .. } => CommandKind::ScoreChanged,
            Command::VelocityIntent { .. } => CommandKind::VelocityIntent,
            Command::VelocityStop { .. } => CommandKind::VelocityStop,
        }
    }
}
