//! Input and presentation seams
//!
//! The match never talks to a window or keyboard directly. A `Controls`
//! implementation feeds it input events once per tick and a `Screen`
//! implementation receives a `Scene` to show. The headless pair here drives
//! the binary and the tests.

use std::collections::VecDeque;

use crate::sim::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Key),
    Release(Key),
    /// Window closed or the user asked to leave
    Quit,
}

/// Source of input events
pub trait Controls {
    /// Events that arrived since the previous poll, oldest first
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// What a screen is asked to show for one frame
#[derive(Debug, Clone, Copy)]
pub enum Scene<'a> {
    Countdown { world: &'a World, seconds: u32 },
    Contest { world: &'a World },
    Outcome { world: &'a World, headline: &'static str },
}

impl Scene<'_> {
    pub fn world(&self) -> &World {
        match self {
            Scene::Countdown { world, .. }
            | Scene::Contest { world }
            | Scene::Outcome { world, .. } => world,
        }
    }
}

/// Presentation sink
pub trait Screen {
    fn present(&mut self, scene: &Scene<'_>);
}

/// Replays a fixed list of events, each tagged with the poll it belongs to
#[derive(Debug, Default)]
pub struct ScriptedControls {
    script: VecDeque<(u64, InputEvent)>,
    polls: u64,
}

impl ScriptedControls {
    /// Controls that never produce any input
    pub fn idle() -> Self {
        Self::default()
    }

    /// Queue `event` for the poll numbered `at` (the first poll is 0)
    pub fn at(mut self, at: u64, event: InputEvent) -> Self {
        let index = self.script.partition_point(|(tick, _)| *tick <= at);
        self.script.insert(index, (at, event));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Controls for ScriptedControls {
    fn poll(&mut self) -> Vec<InputEvent> {
        let now = self.polls;
        self.polls += 1;

        let mut events = Vec::new();
        while let Some((tick, _)) = self.script.front() {
            if *tick > now {
                break;
            }
            if let Some((_, event)) = self.script.pop_front() {
                events.push(event);
            }
        }
        events
    }
}

/// Screen that writes a one-line summary to the trace log
#[derive(Debug, Default)]
pub struct LogScreen {
    frames: u64,
}

impl LogScreen {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Screen for LogScreen {
    fn present(&mut self, scene: &Scene<'_>) {
        self.frames += 1;
        let world = scene.world();
        let (home, away) = world.score();
        match scene {
            Scene::Countdown { seconds, .. } => {
                log::trace!("[{}] starting in {}", self.frames, seconds);
            }
            Scene::Contest { .. } => {
                log::trace!(
                    "[{}] {}:{} ball ({:.1}, {:.1}) paddles {:.1} / {:.1}",
                    self.frames,
                    home,
                    away,
                    world.ball.center.x,
                    world.ball.center.y,
                    world.home.center.y,
                    world.away.center.y
                );
            }
            Scene::Outcome { headline, .. } => {
                log::trace!("[{}] {} {}:{}", self.frames, headline, home, away);
            }
        }
    }
}
