//! Opponent module providing turn sources and the challenge roster.
//!
//! This module implements:
//! - `TurnSource`: who supplies the next die value for an actor
//! - `RandomTurnSource`: uniform local die, optionally seeded
//! - `RemoteTurnSource`: die values fed over a channel by a remote peer
//! - `OpponentSource`: dispatch between the two, chosen at match start
//! - `Roster`: read-only list of candidate opponents
//!
//! ## Example
//!
//! ```
//! use dice_race::opponent::{remote_channel, OpponentSource, RandomTurnSource, TurnSource};
//! use dice_race::game::entities::DieValue;
//!
//! let mut local = RandomTurnSource::seeded(7);
//! let roll = local.next_roll().unwrap();
//! assert!((1..=6).contains(&roll.get()));
//!
//! let (feed, source) = remote_channel(8);
//! let mut opponent = OpponentSource::from(source);
//! assert!(opponent.next_roll().is_none());
//! feed.try_send(DieValue::new(5).unwrap()).unwrap();
//! assert_eq!(opponent.next_roll().unwrap().get(), 5);
//! ```

pub mod roster;
pub mod source;

pub use roster::Roster;
pub use source::{
    OpponentSource, RandomTurnSource, RemoteTurnFeed, RemoteTurnSource, TurnSource,
    remote_channel,
};
