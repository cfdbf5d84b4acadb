//! Client-side game view and sync applier.

use shared::{clamp_paddle_y, Scoreboard, SLOT_COUNT};

/// The client's local picture of the world. Everything here is display
/// state: the host's snapshots overwrite it wholesale, and only the local
/// paddle moves between snapshots.
#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub paddles_y: [f32; SLOT_COUNT],
    pub ball_x: f32,
    pub ball_y: f32,
    pub scoreboard: Scoreboard,
    slot: u8,
}

impl ClientGameState {
    /// `slot` is this client's paddle slot, already validated to 2..=4.
    pub fn new(slot: u8) -> Self {
        Self {
            paddles_y: [0.0; SLOT_COUNT],
            ball_x: 0.0,
            ball_y: 0.0,
            scoreboard: Scoreboard::new(),
            slot,
        }
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    /// Applies an authoritative snapshot verbatim. The locally predicted
    /// paddle is overwritten too; the next local tick moves it again.
    pub fn apply_server_state(
        &mut self,
        paddles_y: [f32; SLOT_COUNT],
        ball_x: f32,
        ball_y: f32,
        score_a: u32,
        score_b: u32,
    ) {
        self.paddles_y = paddles_y;
        self.ball_x = ball_x;
        self.ball_y = ball_y;
        self.scoreboard.set(score_a, score_b);
    }

    /// Moves the local paddle immediately for responsiveness and returns
    /// the clamped position that goes into this tick's Input message.
    pub fn apply_local_input(&mut self, axis: f32, paddle_speed: f32, dt: f32) -> f32 {
        let idx = (self.slot - 1) as usize;
        let y = clamp_paddle_y(self.paddles_y[idx] + axis * paddle_speed * dt);
        self.paddles_y[idx] = y;
        y
    }
}
