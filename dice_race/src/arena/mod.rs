//! Arena module running a race engine inside an async actor.
//!
//! This module implements:
//! - ArenaActor: Async actor owning the engine, dice, roster and profile store
//! - ArenaHandle: Cloneable handle with one async method per operation
//! - Roll animation, opponent cadence and invite timers
//! - Notification fan-out to subscribers
//!
//! ## Architecture
//!
//! Each arena runs in its own Tokio task with an mpsc message inbox. Delayed
//! work (a roll landing, an invite being answered) is spawned as a timer task
//! that reports back through a private channel, so every engine mutation
//! still happens on the actor task. Leaving a match aborts its timers.
//!
//! ## Example
//!
//! ```no_run
//! use dice_race::arena::{ArenaActor, ArenaConfig};
//! use dice_race::game::entities::Player;
//! use dice_race::opponent::Roster;
//! use dice_race::profile::ProfileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let (handle, _task) = ArenaActor::spawn(
//!         Player::new("me", "Me", ""),
//!         ArenaConfig::default(),
//!         Roster::default_roster(),
//!         ProfileStore::in_memory(),
//!     )?;
//!
//!     handle.start_solo().await?;
//!     handle.roll().await?;
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{ArenaActor, ArenaHandle};
pub use config::ArenaConfig;
pub use messages::{ArenaMessage, ArenaNotification, ArenaResponse};
