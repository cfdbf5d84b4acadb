//! Shared protocol and playfield definitions for the quad-pong netcode.
//!
//! Everything both peers agree on lives here: the wire message shapes and
//! their JSON codec, the playfield geometry constants, the two-sided
//! scoreboard, and the collaborator traits the sync core calls out to
//! (chat display, input axis). The UDP transport and its inbound queue
//! are in [`transport`].

use serde::{Deserialize, Serialize};

pub mod transport;

/// Paddles and the ball live inside `[-FIELD_HALF_HEIGHT, FIELD_HALF_HEIGHT]`
/// vertically; the ball reflects off these edges.
pub const FIELD_HALF_HEIGHT: f32 = 4.5;
/// The ball scores once it passes this horizontal distance from the center.
pub const GOAL_X: f32 = 9.0;
/// Half-width of the paddle proximity box used for ball collision.
pub const PADDLE_HALF_WIDTH: f32 = 0.5;
/// Half-height of the paddle proximity box used for ball collision.
pub const PADDLE_HALF_HEIGHT: f32 = 1.0;
/// Fixed number of paddle slots. Slot 1 is always the host's own paddle;
/// slots 2 through 4 are claimed by clients in arrival order.
pub const SLOT_COUNT: usize = 4;
/// Horizontal position of each paddle slot, two per side. Paddles only
/// move vertically, so these never change at runtime.
pub const PADDLE_X: [f32; SLOT_COUNT] = [-8.0, 8.0, -7.5, 7.5];

pub const DEFAULT_PORT: u16 = 7777;
pub const DEFAULT_BALL_SPEED: f32 = 6.0;
pub const DEFAULT_PADDLE_SPEED: f32 = 7.0;
/// Minimum wall-clock spacing between successive State broadcasts, in seconds.
pub const DEFAULT_BROADCAST_INTERVAL: f32 = 0.03;

/// Clamps a paddle position to the playfield.
pub fn clamp_paddle_y(y: f32) -> f32 {
    y.clamp(-FIELD_HALF_HEIGHT, FIELD_HALF_HEIGHT)
}

/// Maps a wire slot number (1..=4) to a paddle array index.
pub fn slot_index(slot: u8) -> Option<usize> {
    if (1..=SLOT_COUNT as u8).contains(&slot) {
        Some((slot - 1) as usize)
    } else {
        None
    }
}

/// One UDP datagram carries exactly one of these, encoded as UTF-8 JSON
/// with a lowercase `"type"` discriminant and camelCase field names.
///
/// Decoding is a single structured parse: the discriminant selects the
/// variant directly, unknown fields are ignored, and anything with an
/// unknown discriminant or missing required fields fails to decode and is
/// dropped by the caller. `paddlesY` is a fixed-length array, so a State
/// with the wrong paddle count fails to decode rather than partially apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    #[serde(rename_all = "camelCase")]
    Input { slot: u8, paddle_y: f32 },
    Chat { author: String, text: String },
    #[serde(rename_all = "camelCase")]
    State {
        paddles_y: [f32; SLOT_COUNT],
        ball_x: f32,
        ball_y: f32,
        score_a: u32,
        score_b: u32,
    },
}

impl Message {
    /// Encodes to wire text, always emitting the full field set for the
    /// variant. Serializing these shapes cannot fail, so an empty string
    /// (which no peer will decode) stands in for the unreachable error arm.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decodes wire text; `None` means the datagram must be dropped.
    pub fn decode(text: &str) -> Option<Message> {
        serde_json::from_str(text).ok()
    }
}

/// Two-sided score counter. The host owns the authoritative copy and
/// increments it on goals; clients hold a display mirror overwritten by
/// each State message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    a: u32,
    b: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_side_a(&mut self) {
        self.a += 1;
    }

    pub fn increment_side_b(&mut self) {
        self.b += 1;
    }

    pub fn current(&self) -> (u32, u32) {
        (self.a, self.b)
    }

    /// Display-side sync; only clients call this.
    pub fn set(&mut self, a: u32, b: u32) {
        self.a = a;
        self.b = b;
    }
}

/// Chat output collaborator. The sync core only ever appends lines; how
/// they are shown is the embedder's business.
pub trait ChatDisplay: Send {
    fn append_line(&mut self, line: &str);
}

/// Writes chat lines through the logger.
#[derive(Debug, Default)]
pub struct LogChatDisplay;

impl ChatDisplay for LogChatDisplay {
    fn append_line(&mut self, line: &str) {
        log::info!("[chat] {}", line);
    }
}

/// Per-tick vertical input axis in [-1, 1]. Device polling lives outside
/// the core; the tick loop supplies the elapsed time.
pub trait InputAxis: Send {
    fn axis(&mut self) -> f32;
}

/// Axis that never moves, for processes without an input device attached.
#[derive(Debug, Default)]
pub struct IdleAxis;

impl InputAxis for IdleAxis {
    fn axis(&mut self) -> f32 {
        0.0
    }
}
