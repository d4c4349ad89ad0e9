//! Computer-controlled paddle
//!
//! The `Pilot` decides where the paddle should be. It keeps its own delay
//! scheduler of `DefenseCue`s so that re-plans happen some time after the
//! ball bounces, like a human reacting late. Each re-plan predicts where
//! the ball will reach the opponent's edge and aims at a normally
//! distributed point around it: the further ahead and the more bounces, the
//! sloppier the aim.
//!
//! The `Opponent` task is the hands: every tick it publishes move or stop
//! commands that bring the paddle toward the pilot's destination.

use glam::Vec2;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg32;

use crate::error::GameError;
use crate::messaging::{
    Command, CommandKind, DelayScheduler, Heading, Message, MessagingError, PaddleId,
    SchedulePolicy,
};
use crate::settings::OpponentSettings;
use crate::sim::{Axis, Boundary, Edges, Field, Paddle, Prediction, World, predict_toward};

use super::{Arena, ContestBus, Task};

/// Keeps the aim RNG apart from the serve RNG when both use the match seed
const AIM_STREAM: u64 = 0x0b5e_55ed;

/// Timed cue for the pilot's scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefenseCue {
    /// Re-plan the paddle destination from the latest sighting
    Reassess,
}

impl Message for DefenseCue {
    type Kind = DefenseCue;

    fn kind(&self) -> DefenseCue {
        *self
    }
}

/// Ball state as last seen by the pilot
#[derive(Debug, Clone, Copy)]
struct Sighting {
    position: Vec2,
    velocity: Vec2,
    field: Field,
}

/// State the pilot's cue handlers work on
#[derive(Debug)]
pub struct Defense {
    tuning: OpponentSettings,
    goal: Boundary,
    rng: Pcg32,
    sighting: Option<Sighting>,
    destination: f32,
    replans: u32,
}

impl Defense {
    /// Where and when the last sighted ball reaches the defended edge.
    ///
    /// `None` without a sighting or while the ball has no horizontal motion.
    fn forecast(&self) -> Option<Prediction> {
        let sighting = self.sighting?;
        if sighting.velocity.x == 0.0 {
            return None;
        }
        match predict_toward(
            sighting.position,
            sighting.velocity,
            sighting.field.width,
            sighting.field.height,
            Axis::X,
            self.goal,
        ) {
            Ok(prediction) => Some(prediction),
            Err(err) => {
                log::warn!("Opponent cannot forecast the ball: {err}");
                None
            }
        }
    }

    fn reassess(&mut self) {
        let Some(forecast) = self.forecast() else {
            log::trace!("Opponent keeps destination {:.1}", self.destination);
            return;
        };

        let confusion = (forecast.bounces as f32 + 1.0).powf(self.tuning.bounce_penalty);
        let sloppiness = forecast.time * confusion * self.tuning.foresight_penalty;
        self.destination = match Normal::new(forecast.position, sloppiness) {
            Ok(aim) => aim.sample(&mut self.rng),
            Err(_) => forecast.position,
        };
        self.replans += 1;

        log::debug!(
            "Opponent aims at {:.1} (ball lands at {:.1} in {:.2}s after {} bounces, spread {:.1})",
            self.destination,
            forecast.position,
            forecast.time,
            forecast.bounces,
            sloppiness
        );
    }
}

/// Planner for one paddle
pub struct Pilot {
    id: PaddleId,
    timer: DelayScheduler<DefenseCue, Defense>,
    defense: Defense,
}

impl Pilot {
    /// `start` is the destination held until the first successful re-plan
    pub fn new(id: PaddleId, tuning: OpponentSettings, seed: u64, start: f32) -> Self {
        let policy = if tuning.supersede_reactions {
            SchedulePolicy::Supersede
        } else {
            SchedulePolicy::Layered
        };
        let goal = match id {
            PaddleId::Home => Boundary::Low,
            PaddleId::Away => Boundary::High,
        };
        Self {
            id,
            timer: DelayScheduler::with_policy(policy),
            defense: Defense {
                tuning,
                goal,
                rng: Pcg32::seed_from_u64(seed ^ AIM_STREAM),
                sighting: None,
                destination: start,
                replans: 0,
            },
        }
    }

    pub fn id(&self) -> PaddleId {
        self.id
    }

    pub fn destination(&self) -> f32 {
        self.defense.destination
    }

    /// Completed re-plans so far
    pub fn replans(&self) -> u32 {
        self.defense.replans
    }

    /// Re-plans still waiting in the scheduler
    pub fn pending(&self) -> usize {
        self.timer.len()
    }

    /// Scheduler time of the next re-plan
    pub fn next_replan(&self) -> Option<f32> {
        self.timer.next_deadline()
    }

    /// Register the re-plan handler, lock the scheduler and queue the
    /// opening re-plans: one immediately, one after the reaction time.
    pub fn prime(&mut self) -> Result<(), GameError> {
        self.timer
            .subscribe(DefenseCue::Reassess, |_, defense, _| defense.reassess())?;
        self.timer.lock();
        self.timer.publish(DefenseCue::Reassess, 0.0)?;
        self.timer
            .publish(DefenseCue::Reassess, self.defense.tuning.reaction_time)?;
        Ok(())
    }

    pub fn observe(&mut self, world: &World) {
        self.defense.sighting = Some(Sighting {
            position: world.ball.center,
            velocity: world.ball.velocity,
            field: world.field,
        });
    }

    /// Refresh the sighting, then run every re-plan due within `dt`
    pub fn advance(&mut self, dt: f32, world: &World) -> Result<usize, MessagingError> {
        self.observe(world);
        self.timer.advance(dt, &mut self.defense)
    }

    /// Schedule re-plans after the ball bounced off a side edge.
    ///
    /// The delays scale with the ball's travel time to the defended edge.
    /// A return off the rival's edge gets a second, later adjustment.
    pub fn react(&mut self, edges: Edges, world: &World) -> Result<(), MessagingError> {
        if !(edges.left || edges.right) {
            return Ok(());
        }
        self.observe(world);
        let Some(forecast) = self.defense.forecast() else {
            return Ok(());
        };

        let tuning = self.defense.tuning;
        self.timer
            .publish(DefenseCue::Reassess, forecast.time * tuning.reaction_time)?;

        let off_rival_edge = match self.id {
            PaddleId::Away => edges.left,
            PaddleId::Home => edges.right,
        };
        if off_rival_edge {
            self.timer
                .publish(DefenseCue::Reassess, forecast.time * tuning.adjustment_time)?;
        }
        Ok(())
    }
}

/// Command that moves `paddle` toward `destination`, if one is needed.
///
/// Inside the paddle's middle third counts as arrived.
pub fn steer(paddle: &Paddle, destination: f32) -> Option<Command> {
    let tolerance = paddle.height() / 3.0;
    let heading = Heading::of(paddle.velocity);
    let arrived =
        destination > paddle.top() + tolerance && destination < paddle.bottom() - tolerance;

    if arrived {
        return heading.map(|direction| Command::VelocityStop {
            entity_id: paddle.id,
            direction,
        });
    }

    let wanted = if destination < paddle.center.y {
        Heading::Negative
    } else if destination > paddle.center.y {
        Heading::Positive
    } else {
        return None;
    };
    (heading != Some(wanted)).then_some(Command::VelocityIntent {
        entity_id: paddle.id,
        direction: wanted,
    })
}

/// Task that drives the pilot's paddle
#[derive(Debug, Default)]
pub struct Opponent;

impl Task for Opponent {
    fn setup(&mut self, arena: &mut Arena, bus: &mut ContestBus) -> Result<(), GameError> {
        arena.pilot.prime()?;
        bus.subscribe(CommandKind::BoundaryHit, |command, arena, _| {
            let Command::BoundaryHit {
                top,
                left,
                bottom,
                right,
            } = *command
            else {
                return;
            };
            let Arena { world, pilot } = arena;
            let edges = Edges {
                top,
                left,
                bottom,
                right,
            };
            if let Err(err) = pilot.react(edges, world) {
                log::warn!("Opponent failed to schedule a reaction: {err}");
            }
        })?;
        Ok(())
    }

    fn update(
        &mut self,
        arena: &mut Arena,
        bus: &mut ContestBus,
        _dt: f32,
    ) -> Result<(), GameError> {
        let paddle = arena.world.paddle(arena.pilot.id());
        if let Some(command) = steer(paddle, arena.pilot.destination()) {
            bus.publish(command);
        }
        Ok(())
    }
}
