//! Pre-contest countdown

use crate::error::GameError;
use crate::messaging::{Command, CommandBus};
use crate::phase::{Phase, PhaseStatus};
use crate::settings::Settings;
use crate::sim::World;

use super::{Contest, Player};

pub struct Countdown {
    settings: Settings,
    world: World,
    player: Player,
    bus: CommandBus<Command, World>,
    remaining: f32,
    done: bool,
}

impl Countdown {
    pub fn new(settings: Settings, world: World, player: Player) -> Self {
        let remaining = settings.countdown;
        Self {
            settings,
            world,
            player,
            bus: CommandBus::new(),
            remaining,
            done: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Phase for Countdown {
    fn name(&self) -> &'static str {
        "countdown"
    }

    fn setup(&mut self) -> Result<(), GameError> {
        self.bus.lock();
        log::info!("Contest starts in {:.1}s", self.remaining);
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<(), GameError> {
        self.player.pregame(&self.world, self.remaining);
        if self.remaining < 0.0 {
            self.done = true;
        } else {
            self.remaining -= dt;
        }
        Ok(())
    }

    fn deliver(&mut self, _dt: f32) -> Result<(), GameError> {
        self.bus.deliver(&mut self.world);
        Ok(())
    }

    fn status(&self) -> PhaseStatus {
        if self.player.quit_requested() {
            PhaseStatus::Abort
        } else if self.done {
            PhaseStatus::Complete
        } else {
            PhaseStatus::Running
        }
    }

    fn build_successor(self: Box<Self>) -> Option<Box<dyn Phase>> {
        let this = *self;
        Some(Box::new(Contest::new(this.settings, this.world, this.player)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{InputEvent, LogScreen, ScriptedControls};
    use crate::phase::{ControllerState, PhaseController};

    fn countdown(seconds: f32, controls: ScriptedControls) -> Box<Countdown> {
        let mut settings = Settings::default();
        settings.countdown = seconds;
        let world = World::new(&settings);
        let player = Player::new(Box::new(controls), Box::new(LogScreen::default()));
        Box::new(Countdown::new(settings, world, player))
    }

    #[test]
    fn test_completes_once_below_zero() {
        let mut controller = PhaseController::new(countdown(0.25, ScriptedControls::idle()));

        // 0.25 -> 0.15 -> 0.05 -> -0.05, then the next tick notices
        for _ in 0..3 {
            controller.step(0.1).unwrap();
            assert_eq!(controller.active_phase(), Some("countdown"));
        }
        controller.step(0.1).unwrap();
        assert_eq!(controller.active_phase(), Some("contest"));
    }

    #[test]
    fn test_quit_aborts_countdown() {
        let controls = ScriptedControls::idle().at(2, InputEvent::Quit);
        let mut controller = PhaseController::new(countdown(3.0, controls));
        let state = controller.run(std::iter::repeat_n(0.1, 10)).unwrap();
        assert_eq!(state, ControllerState::Aborted);
        assert_eq!(controller.ticks(), 3);
    }
}
