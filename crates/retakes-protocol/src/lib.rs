//! Shared vocabulary for Retakes.
//!
//! This crate defines the small set of types every other layer speaks:
//!
//! - **Identity** ([`PlayerId`]) - an opaque, copyable player handle.
//! - **Sides** ([`Team`]) - the engine-level team a player sits on.
//! - **Notices** ([`Notice`]) - player-facing notifications emitted by
//!   the queue, each carrying a stable translation key.
//!
//! # Architecture
//!
//! The protocol crate knows nothing about queues or rounds. The host
//! (the game-engine plugin) owns the real player objects and maps them
//! to [`PlayerId`]s; everything above this crate works on those ids.
//!
//! ```text
//! Host engine (player objects) → Protocol (PlayerId, Team) → Queue (roster)
//! ```

mod types;

pub use types::{Notice, PlayerId, Team};
