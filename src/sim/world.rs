//! Shared simulation state
//!
//! One `World` is created per match and handed from phase to phase. Command
//! handlers mutate it during delivery; `integrate` moves everything after
//! delivery. Screen coordinates: origin top-left, y grows downward.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::messaging::PaddleId;
use crate::settings::Settings;

/// The rectangular playing field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Which field edges a shape crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub left: bool,
    pub bottom: bool,
    pub right: bool,
}

impl Edges {
    pub fn any(&self) -> bool {
        self.top || self.left || self.bottom || self.right
    }
}

/// A vertical paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: PaddleId,
    pub center: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative = up)
    pub velocity: f32,
    pub score: u32,
}

impl Paddle {
    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Move by velocity and keep the paddle inside the field
    pub fn integrate(&mut self, dt: f32, field: &Field) {
        self.center.y += self.velocity * dt;
        let half = self.size.y / 2.0;
        self.center.y = self.center.y.clamp(half, field.height - half);
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub center: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
}

impl Ball {
    pub fn top(&self) -> f32 {
        self.center.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.radius
    }

    /// Field edges the ball pokes past. Resting flush against an edge is inside.
    pub fn edges_crossed(&self, field: &Field) -> Edges {
        Edges {
            top: self.top() < 0.0,
            left: self.left() < 0.0,
            bottom: self.bottom() > field.height,
            right: self.right() > field.width,
        }
    }

    /// Whether the ball passes above or below a paddle's span
    pub fn misses(&self, paddle: &Paddle) -> bool {
        self.bottom() < paddle.top() || self.top() > paddle.bottom()
    }

    pub fn integrate(&mut self, dt: f32) {
        self.center += self.velocity * dt;
    }
}

/// Everything the contest handlers read and write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub field: Field,
    pub home: Paddle,
    pub away: Paddle,
    pub ball: Ball,
    pub winner: Option<PaddleId>,
}

impl World {
    /// Set up paddles at either edge and serve the ball from the center
    pub fn new(settings: &Settings) -> Self {
        let field = Field {
            width: settings.field.width,
            height: settings.field.height,
        };
        let size = Vec2::new(settings.paddle.width, settings.paddle.height);
        let mid = field.height / 2.0;

        let home = Paddle {
            id: PaddleId::Home,
            center: Vec2::new(size.x / 2.0, mid),
            size,
            velocity: 0.0,
            score: 0,
        };
        let away = Paddle {
            id: PaddleId::Away,
            center: Vec2::new(field.width - size.x / 2.0, mid),
            size,
            velocity: 0.0,
            score: 0,
        };

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let ball = Ball {
            center: field.center(),
            radius: settings.ball.radius,
            velocity: serve_direction(&mut rng) * settings.ball.speed,
        };

        Self {
            field,
            home,
            away,
            ball,
            winner: None,
        }
    }

    pub fn paddle(&self, id: PaddleId) -> &Paddle {
        match id {
            PaddleId::Home => &self.home,
            PaddleId::Away => &self.away,
        }
    }

    pub fn paddle_mut(&mut self, id: PaddleId) -> &mut Paddle {
        match id {
            PaddleId::Home => &mut self.home,
            PaddleId::Away => &mut self.away,
        }
    }

    /// Straight-line motion for one step
    pub fn integrate(&mut self, dt: f32) {
        let field = self.field;
        self.home.integrate(dt, &field);
        self.away.integrate(dt, &field);
        self.ball.integrate(dt);
    }

    /// Current score line as (home, away)
    pub fn score(&self) -> (u32, u32) {
        (self.home.score, self.away.score)
    }
}

/// Random unit vector, rotated a quarter turn if it leans more vertical than horizontal
fn serve_direction(rng: &mut Pcg32) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let direction = Vec2::from_angle(angle);
    if direction.y.abs() > direction.x.abs() {
        direction.perp()
    } else {
        direction
    }
}
