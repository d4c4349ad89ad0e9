//! Turns geometry into commands
//!
//! Watches the ball against the field edges each tick. Reaching a side edge
//! is either a paddle strike or a point for the other side.

use crate::error::GameError;
use crate::messaging::{Command, PaddleId};
use crate::sim::World;

use super::{Arena, ContestBus, Task};

#[derive(Debug, Default)]
pub struct Triggers;

/// Commands the current ball position calls for, in publish order
pub fn inspect(world: &World) -> Vec<Command> {
    let edges = world.ball.edges_crossed(&world.field);
    if !edges.any() {
        return Vec::new();
    }

    let mut commands = vec![Command::BoundaryHit {
        top: edges.top,
        left: edges.left,
        bottom: edges.bottom,
        right: edges.right,
    }];
    for (hit, side) in [(edges.left, PaddleId::Home), (edges.right, PaddleId::Away)] {
        if !hit {
            continue;
        }
        let paddle = world.paddle(side);
        commands.push(if world.ball.misses(paddle) {
            Command::ScoreChanged {
                entity_id: side.rival(),
            }
        } else {
            Command::Deflect {
                source_velocity: paddle.velocity,
            }
        });
    }
    commands
}

impl Task for Triggers {
    fn setup(&mut self, _arena: &mut Arena, _bus: &mut ContestBus) -> Result<(), GameError> {
        Ok(())
    }

    fn update(
        &mut self,
        arena: &mut Arena,
        bus: &mut ContestBus,
        _dt: f32,
    ) -> Result<(), GameError> {
        for command in inspect(&arena.world) {
            log::trace!("Trigger: {command:?}");
            bus.publish(command);
        }
        Ok(())
    }
}
