//! The contest itself
//!
//! Each tick the triggers, the player and the opponent publish commands;
//! delivery first runs the opponent's due re-plans, then drains the bus into
//! the referee's handlers; integration moves everything. The phase
//! completes once a paddle reaches the winning score.

use crate::error::GameError;
use crate::phase::{Phase, PhaseStatus};
use crate::settings::Settings;
use crate::sim::World;

use super::{Arena, ContestBus, Opponent, Outcome, Player, Referee, Task, Triggers};

pub struct Contest {
    settings: Settings,
    arena: Arena,
    bus: ContestBus,
    referee: Referee,
    triggers: Triggers,
    player: Player,
    opponent: Opponent,
}

impl Contest {
    pub fn new(settings: Settings, world: World, player: Player) -> Self {
        let arena = Arena::new(world, &settings);
        Self {
            referee: Referee::new(&settings),
            settings,
            arena,
            bus: ContestBus::new(),
            triggers: Triggers,
            player,
            opponent: Opponent,
        }
    }

    pub fn world(&self) -> &World {
        &self.arena.world
    }
}

impl Phase for Contest {
    fn name(&self) -> &'static str {
        "contest"
    }

    fn setup(&mut self) -> Result<(), GameError> {
        let tasks: [&mut dyn Task; 4] = [
            &mut self.referee,
            &mut self.triggers,
            &mut self.player,
            &mut self.opponent,
        ];
        for task in tasks {
            task.setup(&mut self.arena, &mut self.bus)?;
        }
        self.bus.lock();
        log::info!("Contest begins, first to {} wins", self.settings.winning_score);
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<(), GameError> {
        // A decided contest takes no more input
        if self.arena.world.winner.is_some() {
            return Ok(());
        }
        let tasks: [&mut dyn Task; 3] = [&mut self.triggers, &mut self.player, &mut self.opponent];
        for task in tasks {
            task.update(&mut self.arena, &mut self.bus, dt)?;
        }
        Ok(())
    }

    fn deliver(&mut self, dt: f32) -> Result<(), GameError> {
        let Arena { world, pilot } = &mut self.arena;
        pilot.advance(dt, world)?;
        self.bus.deliver(&mut self.arena);
        Ok(())
    }

    fn integrate(&mut self, dt: f32) {
        self.arena.world.integrate(dt);
    }

    fn status(&self) -> PhaseStatus {
        if self.player.quit_requested() {
            PhaseStatus::Abort
        } else if self.arena.world.winner.is_some() {
            PhaseStatus::Complete
        } else {
            PhaseStatus::Running
        }
    }

    fn teardown(&mut self) {
        let tasks: [&mut dyn Task; 4] = [
            &mut self.referee,
            &mut self.triggers,
            &mut self.player,
            &mut self.opponent,
        ];
        for task in tasks {
            task.teardown(&mut self.arena);
        }
        let (home, away) = self.arena.world.score();
        log::info!(
            "Contest over: {home} - {away} ({} opponent re-plans)",
            self.arena.pilot.replans()
        );
    }

    fn build_successor(self: Box<Self>) -> Option<Box<dyn Phase>> {
        let this = *self;
        Some(Box::new(Outcome::new(this.settings, this.arena.world, this.player)))
    }
}
