use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    borrow::Borrow,
    collections::VecDeque,
    fmt::{self},
};
use uuid::Uuid;

use super::constants::{self, Points};

/// Match identifier. A fresh one is minted every time a race starts so
/// that timers scheduled for a discarded match can be told apart.
pub type MatchId = Uuid;

/// Challenge invite identifier.
pub type InviteId = Uuid;

/// Player identity key. Whitespace is replaced with underscores so ids
/// are safe to use as store keys and command arguments.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        let id = s
            .trim()
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .take(constants::MAX_NAME_LENGTH)
            .collect();
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Someone who can sit on either side of a race.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: String,
}

impl Player {
    pub fn new(id: &str, display_name: &str, avatar: &str) -> Self {
        let mut display_name = display_name.trim().to_string();
        if display_name.is_empty() {
            display_name = id.to_string();
        }
        display_name = display_name.chars().take(constants::MAX_NAME_LENGTH).collect();
        Self {
            id: PlayerId::new(id),
            display_name,
            avatar: avatar.to_string(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_name.fmt(f)
    }
}

/// A single face of the die. Always within `1..=DIE_FACES`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= constants::DIE_FACES {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Face for a zero-based index, wrapping past the last face.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self(index % constants::DIE_FACES + 1)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("die value {value} is outside 1..={}", constants::DIE_FACES))
    }
}

impl From<DieValue> for u8 {
    fn from(value: DieValue) -> Self {
        value.0
    }
}

impl From<DieValue> for u32 {
    fn from(value: DieValue) -> Self {
        value.0 as u32
    }
}

impl fmt::Display for DieValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which side of the race a roll belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Local,
    Opponent,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Local => "you",
            Self::Opponent => "opponent",
        };
        write!(f, "{repr}")
    }
}

/// Per-actor roll guard. A participant in `Rolling` can't start another roll
/// until the in-flight one is completed or the match is discarded.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    #[default]
    Idle,
    Rolling,
}

/// A player plus their progress within one match.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Participant {
    pub player: Player,
    pub score: u32,
    pub state: ActorState,
}

impl Participant {
    #[must_use]
    pub fn new(player: Player) -> Self {
        Self {
            player,
            score: 0,
            state: ActorState::Idle,
        }
    }

    #[must_use]
    pub fn is_rolling(&self) -> bool {
        self.state == ActorState::Rolling
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Solo,
    Challenge,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Solo => "solo",
            Self::Challenge => "challenge",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Lobby,
    AwaitingInviteResponse,
    InProgress,
    Won,
    Lost,
}

impl MatchStatus {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::AwaitingInviteResponse => "awaiting_invite_response",
            Self::InProgress => "in_progress",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        write!(f, "{repr}")
    }
}

/// Result of checking both scores against the target.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Continue,
    Won,
    Lost,
}

/// One applied die roll.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RollEvent {
    pub actor: Actor,
    pub value: DieValue,
    pub score_after: u32,
    pub rolled_at: DateTime<Utc>,
}

/// Bounded, newest-first record of the rolls in a match.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TurnLog {
    entries: VecDeque<RollEvent>,
    retention: usize,
}

impl TurnLog {
    #[must_use]
    pub fn new(retention: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(retention),
            retention,
        }
    }

    pub fn push(&mut self, event: RollEvent) {
        if self.retention == 0 {
            return;
        }
        self.entries.push_front(event);
        self.entries.truncate(self.retention);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &RollEvent> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle for an in-flight roll. Completing it applies the die value to
/// the actor it was issued for, but only within the match that issued it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RollTicket {
    pub match_id: MatchId,
    pub actor: Actor,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteDirection {
    /// Sent by the local player.
    Outbound,
    /// Received by the local player.
    Inbound,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        };
        write!(f, "{repr}")
    }
}

/// A 1v1 challenge request. Lives only as long as the session.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChallengeInvite {
    pub id: InviteId,
    pub sender: Player,
    pub recipient: Player,
    pub direction: InviteDirection,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

impl ChallengeInvite {
    #[must_use]
    pub fn new(sender: Player, recipient: Player, direction: InviteDirection) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            recipient,
            direction,
            status: InviteStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// The player on the other side of the invite from the local player.
    #[must_use]
    pub fn counterpart(&self) -> &Player {
        match self.direction {
            InviteDirection::Outbound => &self.recipient,
            InviteDirection::Inbound => &self.sender,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == InviteStatus::Pending
    }
}

/// Points owed to the local player for a won match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Reward {
    pub match_id: MatchId,
    pub mode: MatchMode,
    pub amount: Points,
}

/// Display-ready summary of the opposing side.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OpponentView {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: String,
    pub score: u32,
    pub rolling: bool,
}

/// Serializable snapshot of the engine for whatever renders it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchView {
    pub status: MatchStatus,
    pub match_id: Option<MatchId>,
    pub mode: Option<MatchMode>,
    pub target_score: u32,
    pub local_score: u32,
    pub local_rolling: bool,
    pub opponent: Option<OpponentView>,
    /// Turn log lines, newest first.
    pub log: Vec<String>,
    pub pending_invite: Option<ChallengeInvite>,
    pub inbound_invites: Vec<ChallengeInvite>,
}
