//! # Dice Race
//!
//! A race-to-a-target-score dice game, played solo or as a 1v1 challenge,
//! built around a synchronous state machine with an async actor on top.
//!
//! ## Architecture
//!
//! The engine moves through five statuses:
//!
//! - **Lobby**: No match; challenges can be sent, received and answered
//! - **AwaitingInviteResponse**: An outbound challenge is waiting to be accepted
//! - **InProgress**: Both sides roll; every landed roll is checked against the target
//! - **Won/Lost**: Final result, held until the player returns to the lobby
//!
//! Local rolls happen on demand, opponent rolls on a fixed cadence. Each side
//! has at most one roll in flight, tracked with a ticket tied to the match.
//!
//! ## Core Modules
//!
//! - [`game`]: State machine, entities and race arithmetic
//! - [`opponent`]: Turn sources (random or remote) and the challenge roster
//! - [`profile`]: Point balance store with an idempotent ledger
//! - [`arena`]: Tokio actor driving timers, rewards and notifications
//!
//! ## Example
//!
//! ```
//! use dice_race::{Actor, DieValue, MatchStatus, Player, RaceEngine, RaceSettings};
//!
//! let mut engine = RaceEngine::new(Player::new("me", "Me", ""), RaceSettings::default());
//! engine.start_solo().unwrap();
//! while engine.status() == MatchStatus::InProgress {
//!     engine.roll_die(Actor::Local, DieValue::new(6).unwrap()).unwrap();
//! }
//! assert_eq!(engine.status(), MatchStatus::Won);
//! assert_eq!(engine.take_reward().unwrap().amount, 5_000);
//! ```

/// Async actor running an engine with timers and rewards.
pub mod arena;
pub use arena::{ArenaActor, ArenaConfig, ArenaHandle, ArenaNotification, ArenaResponse};

/// Core race logic, entities, and state machine.
pub mod game;
pub use game::{
    GameError, GameEvent, RaceEngine, RaceSettings,
    constants::{self, CHALLENGE_REWARD, DEFAULT_TARGET_SCORE, Points, SOLO_REWARD},
    entities::{self, Actor, DieValue, MatchStatus, MatchView, Outcome, Player, PlayerId},
    functional,
};

/// Turn sources and the opponent roster.
pub mod opponent;

/// Persistent point balances.
pub mod profile;
