//! The human side
//!
//! A `Player` lives for the whole match and is handed from phase to phase.
//! It owns the input source and the screen, so every phase presents through
//! the same sink and a quit request is noticed wherever it happens.

use crate::error::GameError;
use crate::frontend::{Controls, InputEvent, Key, Scene, Screen};
use crate::messaging::{Command, Heading, PaddleId};
use crate::sim::World;

use super::{Arena, ContestBus, Task};

pub struct Player {
    id: PaddleId,
    controls: Box<dyn Controls>,
    screen: Box<dyn Screen>,
    quit: bool,
}

impl Player {
    /// A player driving the `Home` paddle
    pub fn new(controls: Box<dyn Controls>, screen: Box<dyn Screen>) -> Self {
        Self {
            id: PaddleId::Home,
            controls,
            screen,
            quit: false,
        }
    }

    pub fn id(&self) -> PaddleId {
        self.id
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Before the contest: only a quit matters
    pub fn pregame(&mut self, world: &World, remaining: f32) {
        self.watch_for_quit();
        let seconds = remaining.max(0.0).ceil() as u32;
        self.screen.present(&Scene::Countdown { world, seconds });
    }

    /// After the contest: show the result, only a quit matters
    pub fn postgame(&mut self, world: &World) {
        self.watch_for_quit();
        self.screen.present(&Scene::Outcome {
            world,
            headline: headline(world, self.id),
        });
    }

    fn watch_for_quit(&mut self) {
        if self.controls.poll().contains(&InputEvent::Quit) {
            self.request_quit();
        }
    }

    fn request_quit(&mut self) {
        if !self.quit {
            log::info!("Player asked to quit");
        }
        self.quit = true;
    }

    fn command_for(&self, event: InputEvent) -> Option<Command> {
        let entity_id = self.id;
        match event {
            InputEvent::Press(key) => Some(Command::VelocityIntent {
                entity_id,
                direction: heading(key),
            }),
            InputEvent::Release(key) => Some(Command::VelocityStop {
                entity_id,
                direction: heading(key),
            }),
            InputEvent::Quit => None,
        }
    }
}

fn heading(key: Key) -> Heading {
    match key {
        Key::Up => Heading::Negative,
        Key::Down => Heading::Positive,
    }
}

/// Result line from the perspective of paddle `id`
pub fn headline(world: &World, id: PaddleId) -> &'static str {
    if world.winner == Some(id) {
        "You Win!"
    } else {
        "You Lose!"
    }
}

impl Task for Player {
    fn setup(&mut self, _arena: &mut Arena, _bus: &mut ContestBus) -> Result<(), GameError> {
        Ok(())
    }

    fn update(
        &mut self,
        arena: &mut Arena,
        bus: &mut ContestBus,
        _dt: f32,
    ) -> Result<(), GameError> {
        for event in self.controls.poll() {
            match self.command_for(event) {
                Some(command) => bus.publish(command),
                None => self.request_quit(),
            }
        }
        self.screen.present(&Scene::Contest {
            world: &arena.world,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{LogScreen, ScriptedControls};
    use crate::settings::Settings;

    #[test]
    fn test_keys_become_commands() {
        let settings = Settings::default();
        let controls = ScriptedControls::idle()
            .at(0, InputEvent::Press(Key::Down))
            .at(0, InputEvent::Release(Key::Up));
        let mut player = Player::new(Box::new(controls), Box::new(LogScreen::default()));
        let mut arena = Arena::new(World::new(&settings), &settings);
        let mut bus = ContestBus::new();

        player.update(&mut arena, &mut bus, 0.0).unwrap();
        assert_eq!(
            bus.pending(),
            &[
                Command::VelocityIntent {
                    entity_id: PaddleId::Home,
                    direction: Heading::Positive,
                },
                Command::VelocityStop {
                    entity_id: PaddleId::Home,
                    direction: Heading::Negative,
                },
            ]
        );
        assert!(!player.quit_requested());
    }

    #[test]
    fn test_quit_noticed_in_any_phase() {
        let world = World::new(&Settings::default());
        let controls = ScriptedControls::idle().at(1, InputEvent::Quit);
        let mut player = Player::new(Box::new(controls), Box::new(LogScreen::default()));

        player.pregame(&world, 2.5);
        assert!(!player.quit_requested());
        player.postgame(&world);
        assert!(player.quit_requested());
    }

    #[test]
    fn test_headline_follows_winner() {
        let mut world = World::new(&Settings::default());
        world.winner = Some(PaddleId::Home);
        assert_eq!(headline(&world, PaddleId::Home), "You Win!");
        world.winner = Some(PaddleId::Away);
        assert_eq!(headline(&world, PaddleId::Home), "You Lose!");
    }
}
