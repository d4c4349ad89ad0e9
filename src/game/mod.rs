//! Pong built on the command bus
//!
//! Phase sequence: `Countdown` -> `Contest` -> `Outcome`. The `World` and the
//! `Player` are donated from each phase to the next; everything else (buses,
//! referee, triggers, opponent) is rebuilt by the phase that needs it.
//!
//! Inside the contest, tasks only read the arena and publish commands. The
//! referee's handlers are the only code that changes scores or velocities.

pub mod contest;
pub mod countdown;
pub mod opponent;
pub mod outcome;
pub mod player;
pub mod referee;
pub mod triggers;

pub use contest::Contest;
pub use countdown::Countdown;
pub use opponent::{Defense, DefenseCue, Opponent, Pilot};
pub use outcome::Outcome;
pub use player::Player;
pub use referee::Referee;
pub use triggers::Triggers;

use crate::error::GameError;
use crate::frontend::{Controls, Screen};
use crate::messaging::{Command, CommandBus, PaddleId};
use crate::phase::PhaseController;
use crate::settings::Settings;
use crate::sim::World;

/// Everything contest handlers may touch
pub struct Arena {
    pub world: World,
    pub pilot: Pilot,
}

impl Arena {
    /// Pair the world with a pilot for the `Away` paddle
    pub fn new(world: World, settings: &Settings) -> Self {
        let pilot = Pilot::new(
            PaddleId::Away,
            settings.opponent,
            settings.seed,
            world.field.center().y,
        );
        Self { world, pilot }
    }
}

pub type ContestBus = CommandBus<Command, Arena>;

/// A unit of contest behavior.
///
/// `setup` runs while the bus is still open and is the only place handlers
/// may be registered. `update` runs once per tick before delivery.
pub trait Task {
    fn setup(&mut self, arena: &mut Arena, bus: &mut ContestBus) -> Result<(), GameError>;

    fn update(&mut self, arena: &mut Arena, bus: &mut ContestBus, dt: f32)
    -> Result<(), GameError>;

    fn teardown(&mut self, _arena: &mut Arena) {}
}

/// Build a controller for a full match, starting at the countdown.
///
/// Settings are validated first, so a bad field never reaches the simulation.
pub fn new_match(
    settings: Settings,
    controls: Box<dyn Controls>,
    screen: Box<dyn Screen>,
) -> Result<PhaseController, GameError> {
    settings.validate()?;
    let world = World::new(&settings);
    let player = Player::new(controls, screen);
    Ok(PhaseController::new(Box::new(Countdown::new(
        settings, world, player,
    ))))
}
