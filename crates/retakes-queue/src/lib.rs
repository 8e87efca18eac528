//! Player allocation for Retakes.
//!
//! Decides, every time membership changes or a round completes, who is
//! actively playing and who is waiting. Everything here is synchronous
//! and single-owner: a [`QueueScheduler`] holds all state and every
//! entry point takes `&mut self`, runs to completion, and hands back a
//! list of [`Command`]s for the host to carry out.
//!
//! # Key types
//!
//! - [`QueueScheduler`] - owns the roster and the round lock; the entry point
//! - [`AllocationEngine`] - target team sizes, promotion, priority ordering
//! - [`MembershipController`] - resolves team-change attempts
//! - [`RoundTeamLock`] - per-round snapshot of who plays on which side
//! - [`RosterState`] - the active set and the waiting queue
//! - [`QueueConfig`] - capacity, ratio, priority tags, lock toggle
//! - [`PlayerOracle`] / [`PriorityClassifier`] - what the host must answer

mod allocation;
mod command;
mod config;
mod error;
mod host;
mod lock;
mod membership;
mod roster;
mod scheduler;

pub use allocation::AllocationEngine;
pub use command::{Command, Outcome, PlayerState, TeamChange, Verdict};
pub use config::{QueueConfig, RoundPhase, parse_priority_tags};
pub use error::QueueError;
pub use host::{PlayerOracle, PriorityClassifier};
pub use lock::{LockedSides, RoundTeamLock};
pub use membership::MembershipController;
pub use roster::RosterState;
pub use scheduler::{QueueScheduler, QueueStatus};
