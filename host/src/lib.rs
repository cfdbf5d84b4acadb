//! # Host Library
//!
//! Authoritative side of the quad-pong synchronization layer. The host
//! owns the only real copy of the game: four paddle positions, the ball,
//! and the score. Clients send paddle inputs; the host integrates the
//! ball, resolves collisions and goals, and periodically broadcasts a
//! full State snapshot that every client overwrites its view with.
//!
//! ## Module Organization
//!
//! ### Registry Module (`registry`)
//! First-come binding of client addresses to paddle slots 2 through 4.
//! There is no handshake and no removal; the registry doubles as the
//! broadcast target list.
//!
//! ### Game Module (`game`)
//! The authoritative simulation: ball integration, wall reflection,
//! per-paddle collision tests, scoring and respawn.
//!
//! ### Network Module (`network`)
//! The host session context tying socket, inbound queue, registry and
//! simulation together, plus the fixed-rate tick loop and broadcast
//! pacing.
//!
//! ## Concurrency Model
//!
//! Exactly two concurrent activities: the transport receive loop (owned
//! by `shared::transport`) and the simulation tick. All game state and
//! the registry are written only from the tick; the inbound queue is the
//! single synchronization point between the two.

pub mod game;
pub mod network;
pub mod registry;
