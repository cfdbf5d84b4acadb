//! # Client Library
//!
//! Non-authoritative side of the quad-pong synchronization layer. The
//! client sends its paddle position to the host every tick and renders
//! whatever the host last said the world looks like.
//!
//! ## Authority Model
//!
//! The client predicts exactly one thing: its own paddle, which it moves
//! immediately for responsiveness. Every State message from the host
//! unconditionally overwrites all four paddles, the ball and the score —
//! no interpolation, no reconciliation. When local movement outruns the
//! round trip, the next snapshot visibly snaps the paddle back; that
//! correction jitter is accepted behavior.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The local view of the game and the sync applier that overwrites it
//! from authoritative snapshots.
//!
//! ### Network Module (`network`)
//! The client session: socket, inbound queue, per-tick input send and
//! chat forwarding.

pub mod game;
pub mod network;
