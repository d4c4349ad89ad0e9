//! Deferred command messaging
//!
//! Producers never touch shared state directly. They publish commands, and a
//! single delivery pass per tick hands those commands to the handlers that
//! subscribed to their kind:
//! - `registry`: per-kind handler lists with a one-way OPEN -> LOCKED lifecycle
//! - `bus`: same-tick queue drained once per `deliver`
//! - `scheduler`: simulated-time queue drained by `advance`
//! - `command`: the gameplay command vocabulary

pub mod bus;
pub mod command;
pub mod registry;
pub mod scheduler;

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

pub use bus::CommandBus;
pub use command::{Command, CommandKind, Heading, PaddleId};
pub use registry::{CommandRegistry, Handler, Outbox, RegistryState};
pub use scheduler::{DelayScheduler, SchedulePolicy, ScheduledItem};

/// A value that can travel through a registry.
///
/// Handlers are keyed on the discriminant returned by [`Message::kind`], so
/// every message type pairs with a small `Copy` tag enum.
pub trait Message: Debug {
    /// Discriminant used as the subscription key
    type Kind: Copy + Eq + Hash + Debug;

    /// Discriminant of this particular message
    fn kind(&self) -> Self::Kind;
}

/// Failures reported by registries, buses and schedulers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessagingError {
    /// A handler was registered after the registry was locked.
    #[error("cannot subscribe to {topic} after the registry was locked")]
    RegistrationAfterLock {
        /// Debug rendering of the rejected kind
        topic: String,
    },
    /// A scheduled publication asked for a negative (or NaN) delay.
    #[error("delay must be non-negative, got {delay}")]
    NegativeDelay {
        /// Rejected delay in simulated seconds
        delay: f32,
    },
    /// The scheduler clock was asked to move backwards (or by NaN).
    #[error("elapsed time must be non-negative, got {dt}")]
    NegativeDuration {
        /// Rejected step in simulated seconds
        dt: f32,
    },
}
