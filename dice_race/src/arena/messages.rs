//! Arena actor message types.

use crate::{
    game::{
        GameError, GameEvent,
        constants::Points,
        entities::{ChallengeInvite, InviteId, MatchId, MatchStatus, MatchView, Player},
    },
    opponent::RemoteTurnSource,
    profile::Profile,
};
use std::fmt;
use tokio::sync::{mpsc, oneshot};

/// Messages that can be sent to an ArenaActor
#[derive(Debug)]
pub enum ArenaMessage {
    /// Start a race with no opponent
    StartSolo {
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Challenge a roster candidate. With no remote source the opponent is
    /// simulated.
    SendInvite {
        candidate_id: String,
        remote: Option<RemoteTurnSource>,
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Accept an inbound challenge, the oldest one if no ID is given
    AcceptInvite {
        invite_id: Option<InviteId>,
        remote: Option<RemoteTurnSource>,
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Decline an inbound challenge, the oldest one if no ID is given
    DeclineInvite {
        invite_id: Option<InviteId>,
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Deliver a challenge from a roster candidate
    ReceiveInvite {
        from_id: String,
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Roll the local die
    Roll {
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Leave the current match or pending challenge
    ReturnToLobby {
        response: oneshot::Sender<ArenaResponse>,
    },

    /// Get a display snapshot
    GetView {
        response: oneshot::Sender<MatchView>,
    },

    /// Get the challenge roster
    GetRoster {
        response: oneshot::Sender<Vec<Player>>,
    },

    /// Get the local player's profile
    GetProfile {
        response: oneshot::Sender<Result<Profile, String>>,
    },

    /// Subscribe to notifications
    Subscribe {
        subscriber_id: String,
        sender: mpsc::Sender<ArenaNotification>,
    },

    /// Unsubscribe from notifications
    Unsubscribe { subscriber_id: String },

    /// Stop the actor
    Close {
        response: oneshot::Sender<ArenaResponse>,
    },
}

/// Notification pushed to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaNotification {
    /// Something happened in the race
    Event(GameEvent),
    /// Engine moved to a new status
    StatusChanged(MatchStatus),
    /// A win was credited to the profile store
    RewardCredited {
        match_id: MatchId,
        amount: Points,
        balance: Points,
    },
    /// Actor stopped
    Closed,
}

impl fmt::Display for ArenaNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(event) => write!(f, "{event}"),
            Self::StatusChanged(status) => write!(f, "status: {status}"),
            Self::RewardCredited { balance, .. } => write!(f, "balance is now {balance} points"),
            Self::Closed => write!(f, "arena closed"),
        }
    }
}

/// Response from arena operations
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaResponse {
    /// Operation succeeded
    Success,

    /// A race started
    MatchStarted(MatchId),

    /// A challenge was created, declined or received
    Invite(ChallengeInvite),

    /// The local die is rolling and lands after the animation
    Rolling,

    /// Engine rejected the operation; nothing changed
    Rejected(GameError),

    /// Operation failed for another reason
    Error(String),
}

impl ArenaResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected(_) | Self::Error(_))
    }
}

impl From<GameError> for ArenaResponse {
    fn from(value: GameError) -> Self {
        Self::Rejected(value)
    }
}
