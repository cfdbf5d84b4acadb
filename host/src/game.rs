//! Authoritative quad-pong simulation: ball integration, paddle collision,
//! scoring and respawn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{
    clamp_paddle_y, slot_index, Scoreboard, FIELD_HALF_HEIGHT, GOAL_X, PADDLE_HALF_HEIGHT,
    PADDLE_HALF_WIDTH, PADDLE_X, SLOT_COUNT,
};

/// One paddle record. The horizontal position is fixed per slot; only the
/// vertical position moves.
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
}

/// The host's authoritative game state. Written only from the simulation
/// tick; nothing here is shared across tasks.
pub struct Simulation {
    pub paddles: [Paddle; SLOT_COUNT],
    pub ball: Ball,
    pub scoreboard: Scoreboard,
    ball_speed: f32,
    rng: StdRng,
}

impl Simulation {
    pub fn new(ball_speed: f32) -> Self {
        let mut rng = StdRng::from_entropy();
        let vel_y = rng.gen_range(-ball_speed..ball_speed);

        Self {
            paddles: PADDLE_X.map(|x| Paddle { x, y: 0.0 }),
            ball: Ball {
                x: 0.0,
                y: 0.0,
                vel_x: ball_speed,
                vel_y,
            },
            scoreboard: Scoreboard::new(),
            ball_speed,
            rng,
        }
    }

    /// Overwrites a remote paddle's vertical position. The sender is
    /// trusted to have clamped, so the value is applied as-is. Slot 1
    /// belongs to the host and is never driven from the network;
    /// out-of-range slots are dropped.
    pub fn apply_remote_input(&mut self, slot: u8, paddle_y: f32) {
        if slot == 1 {
            return;
        }
        if let Some(idx) = slot_index(slot) {
            self.paddles[idx].y = paddle_y;
        }
    }

    /// Moves the host's own paddle (slot 1) by the input axis, clamped to
    /// the playfield. No network round trip is involved.
    pub fn apply_local_input(&mut self, axis: f32, paddle_speed: f32, dt: f32) {
        let paddle = &mut self.paddles[0];
        paddle.y = clamp_paddle_y(paddle.y + axis * paddle_speed * dt);
    }

    /// Advances the ball one step: integrate, reflect off the field edges,
    /// bounce off paddles, then check both goals.
    pub fn step(&mut self, dt: f32) {
        self.ball.x += self.ball.vel_x * dt;
        self.ball.y += self.ball.vel_y * dt;

        if self.ball.y.abs() > FIELD_HALF_HEIGHT {
            self.ball.vel_y = -self.ball.vel_y;
        }

        // Each paddle test flips independently. A ball inside two proximity
        // boxes at once flips twice and keeps its sign; that is the game's
        // observable physics, not a bug to de-duplicate.
        for paddle in &self.paddles {
            if (self.ball.x - paddle.x).abs() < PADDLE_HALF_WIDTH
                && (self.ball.y - paddle.y).abs() < PADDLE_HALF_HEIGHT
            {
                self.ball.vel_x = -self.ball.vel_x;
            }
        }

        if self.ball.x < -GOAL_X {
            self.scoreboard.increment_side_b();
            self.respawn_ball(1.0);
        } else if self.ball.x > GOAL_X {
            self.scoreboard.increment_side_a();
            self.respawn_ball(-1.0);
        }
    }

    fn respawn_ball(&mut self, dir: f32) {
        self.ball = Ball {
            x: 0.0,
            y: 0.0,
            vel_x: self.ball_speed * dir,
            vel_y: self.rng.gen_range(-self.ball_speed..self.ball_speed),
        };
    }

    /// Snapshot of all paddle positions in slot order, for State messages.
    pub fn paddles_y(&self) -> [f32; SLOT_COUNT] {
        self.paddles.map(|paddle| paddle.y)
    }
}
