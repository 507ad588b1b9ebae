//! Race engine - turn state machine and race arithmetic.
//!
//! This module provides:
//! - A synchronous state machine for solo and 1v1 challenge races
//! - Per-actor roll guards with tickets for in-flight rolls
//! - Challenge invite handshake (outbound and inbound)
//! - Engine events with human-readable `Display` lines

pub mod constants;
pub mod entities;
pub mod functional;
mod state_machine;

pub use state_machine::{GameError, GameEvent, Match, RaceEngine, RaceSettings};
