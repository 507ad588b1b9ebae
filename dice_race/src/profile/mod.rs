//! Profile module providing the persistent point balance.
//!
//! This module implements:
//! - A single owned store of player profiles with get/put by key
//! - An append-only ledger of point credits
//! - Idempotency keys so a reward is credited at most once
//! - Optional JSON snapshot persistence
//!
//! ## Example
//!
//! ```
//! use dice_race::game::entities::Player;
//! use dice_race::profile::{EntryType, ProfileStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ProfileStore::in_memory();
//!     let me = Player::new("me", "Me", "");
//!     store.ensure_profile(&me).await?;
//!
//!     let balance = store
//!         .credit_points(&me.id, 5000, EntryType::MatchReward, "match_reward_1".to_string(), None)
//!         .await?;
//!     assert_eq!(balance, 5000);
//!
//!     // Same key again is rejected
//!     assert!(store
//!         .credit_points(&me.id, 5000, EntryType::MatchReward, "match_reward_1".to_string(), None)
//!         .await
//!         .is_err());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod store;

pub use errors::{ProfileError, ProfileResult};
pub use models::{EntryType, LedgerEntry, Profile};
pub use store::ProfileStore;
