//! Profile data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{
    constants::Points,
    entities::{Player, PlayerId},
};

/// Ledger entry ID type
pub type EntryId = u64;

/// Player profile with its point balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: PlayerId,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub points: Points,
    pub gems: u64,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile with an empty balance.
    #[must_use]
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            username: player.id.to_string(),
            display_name: player.display_name.clone(),
            avatar: player.avatar.clone(),
            points: 0,
            gems: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Point ledger entry. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub player_id: PlayerId,
    pub amount: Points,
    pub balance_after: Points,
    pub entry_type: EntryType,
    pub idempotency_key: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    MatchReward,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::MatchReward => write!(f, "match_reward"),
        }
    }
}

/// On-disk form of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub profiles: Vec<Profile>,
    pub entries: Vec<LedgerEntry>,
}
