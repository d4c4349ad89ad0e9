//! Result screen, the last phase of a match

use crate::error::GameError;
use crate::messaging::{Command, CommandBus};
use crate::phase::{Phase, PhaseStatus};
use crate::settings::Settings;
use crate::sim::World;

use super::Player;

pub struct Outcome {
    world: World,
    player: Player,
    bus: CommandBus<Command, World>,
    linger: f32,
    elapsed: f32,
}

impl Outcome {
    pub fn new(settings: Settings, world: World, player: Player) -> Self {
        Self {
            world,
            player,
            bus: CommandBus::new(),
            linger: settings.outcome_linger,
            elapsed: 0.0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Phase for Outcome {
    fn name(&self) -> &'static str {
        "outcome"
    }

    fn setup(&mut self) -> Result<(), GameError> {
        self.bus.lock();
        let (home, away) = self.world.score();
        match self.world.winner {
            Some(winner) => log::info!("{winner:?} won {home} - {away}"),
            None => log::info!("No winner, {home} - {away}"),
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<(), GameError> {
        self.player.postgame(&self.world);
        self.elapsed += dt;
        Ok(())
    }

    fn deliver(&mut self, _dt: f32) -> Result<(), GameError> {
        self.bus.deliver(&mut self.world);
        Ok(())
    }

    fn status(&self) -> PhaseStatus {
        if self.player.quit_requested() {
            PhaseStatus::Abort
        } else if self.elapsed >= self.linger {
            PhaseStatus::Complete
        } else {
            PhaseStatus::Running
        }
    }

    fn build_successor(self: Box<Self>) -> Option<Box<dyn Phase>> {
        None
    }
}
