//! Contest rules as command handlers
//!
//! The referee publishes nothing. It subscribes to every command kind and
//! applies the rules to the world when commands are delivered.

use crate::error::GameError;
use crate::messaging::{Command, CommandKind, Heading, PaddleId};
use crate::settings::Settings;
use crate::sim::{Edges, World};

use super::{Arena, ContestBus, Task};

#[derive(Debug, Clone, Copy)]
pub struct Referee {
    paddle_speed: f32,
    spin: f32,
    winning_score: u32,
}

impl Referee {
    pub fn new(settings: &Settings) -> Self {
        Self {
            paddle_speed: settings.paddle.speed,
            spin: settings.paddle.spin,
            winning_score: settings.winning_score,
        }
    }
}

impl Task for Referee {
    fn setup(&mut self, _arena: &mut Arena, bus: &mut ContestBus) -> Result<(), GameError> {
        bus.subscribe(CommandKind::BoundaryHit, |command, arena, _| {
            if let Command::BoundaryHit {
                top,
                left,
                bottom,
                right,
            } = *command
            {
                bounce(
                    &mut arena.world,
                    Edges {
                        top,
                        left,
                        bottom,
                        right,
                    },
                );
            }
        })?;

        let spin = self.spin;
        bus.subscribe(CommandKind::Deflect, move |command, arena, _| {
            if let Command::Deflect { source_velocity } = *command {
                deflect(&mut arena.world, source_velocity, spin);
            }
        })?;

        let winning_score = self.winning_score;
        bus.subscribe(CommandKind::ScoreChanged, move |command, arena, _| {
            if let Command::ScoreChanged { entity_id } = *command {
                award(&mut arena.world, entity_id, winning_score);
            }
        })?;

        let speed = self.paddle_speed;
        bus.subscribe(CommandKind::VelocityIntent, move |command, arena, _| {
            if let Command::VelocityIntent {
                entity_id,
                direction,
            } = *command
            {
                drive(&mut arena.world, entity_id, direction, speed);
            }
        })?;

        bus.subscribe(CommandKind::VelocityStop, |command, arena, _| {
            if let Command::VelocityStop {
                entity_id,
                direction,
            } = *command
            {
                halt(&mut arena.world, entity_id, direction);
            }
        })?;

        Ok(())
    }

    fn update(
        &mut self,
        _arena: &mut Arena,
        _bus: &mut ContestBus,
        _dt: f32,
    ) -> Result<(), GameError> {
        Ok(())
    }
}

/// Point the ball back into the field and rest it flush against each hit edge
pub fn bounce(world: &mut World, edges: Edges) {
    let field = world.field;
    let ball = &mut world.ball;
    if edges.top {
        ball.velocity.y = ball.velocity.y.abs();
        ball.center.y = ball.radius;
    }
    if edges.bottom {
        ball.velocity.y = -ball.velocity.y.abs();
        ball.center.y = field.height - ball.radius;
    }
    if edges.left {
        ball.velocity.x = ball.velocity.x.abs();
        ball.center.x = ball.radius;
    }
    if edges.right {
        ball.velocity.x = -ball.velocity.x.abs();
        ball.center.x = field.width - ball.radius;
    }
}

/// Spin the ball away from the paddle's direction of travel
pub fn deflect(world: &mut World, source_velocity: f32, spin: f32) {
    world.ball.velocity.y += -source_velocity * spin;
}

/// Add a point and declare the first paddle to reach `winning_score` the winner
pub fn award(world: &mut World, id: PaddleId, winning_score: u32) {
    let paddle = world.paddle_mut(id);
    paddle.score += 1;
    let score = paddle.score;
    log::info!("{id:?} scores ({} - {})", world.home.score, world.away.score);

    if score == winning_score && world.winner.is_none() {
        log::info!("{id:?} wins");
        world.winner = Some(id);
    }
}

pub fn drive(world: &mut World, id: PaddleId, direction: Heading, speed: f32) {
    world.paddle_mut(id).velocity = direction.sign() * speed;
}

/// Stop a paddle, but only if it is still moving in `direction`
pub fn halt(world: &mut World, id: PaddleId, direction: Heading) {
    let paddle = world.paddle_mut(id);
    if Heading::of(paddle.velocity) == Some(direction) {
        paddle.velocity = 0.0;
    }
}
