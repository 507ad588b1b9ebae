//! Race engine state machine.
//!
//! The engine is synchronous and owns no timers. Callers (the arena actor,
//! tests, benchmarks) decide when rolls start and finish; the engine only
//! guards transitions and keeps scores, logs and invites consistent.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt, mem};
use thiserror::Error;
use uuid::Uuid;

use super::constants::{
    CHALLENGE_REWARD, DEFAULT_TARGET_SCORE, DEFAULT_TURN_LOG_RETENTION, Points, SOLO_REWARD,
};
use super::entities::{
    Actor, ActorState, ChallengeInvite, DieValue, InviteDirection, InviteId, InviteStatus,
    MatchId, MatchMode, MatchStatus, MatchView, OpponentView, Outcome, Participant, Player,
    Reward, RollEvent, RollTicket, TurnLog,
};
use super::functional::{advance_score, resolve_outcome};

/// Errors returned when an operation's preconditions don't hold. The engine
/// state is left untouched whenever one of these is returned.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("already in the lobby")]
    AlreadyInLobby,
    #[error("a roll is already in flight for {0}")]
    AlreadyRolling(Actor),
    #[error("can't challenge yourself")]
    CannotChallengeSelf,
    #[error("invite already pending from {0}")]
    InviteAlreadyPending(String),
    #[error("invite does not exist")]
    InviteDoesNotExist,
    #[error("no match in progress")]
    MatchNotInProgress,
    #[error("solo races have no opponent")]
    NoOpponent,
    #[error("not waiting on an invite")]
    NotAwaitingInvite,
    #[error("only available from the lobby")]
    NotInLobby,
    #[error("{0} has no roll in flight")]
    RollNotStarted(Actor),
    #[error("waiting on {0} to finish rolling")]
    RollInFlight(Actor),
    #[error("roll belongs to a match that is no longer running")]
    StaleTicket,
}

/// Notifications produced by the engine, drained by whoever displays them.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    InviteSent { to: String },
    InviteAccepted { by: String },
    InviteReceived { from: String },
    InviteDeclined { from: String },
    InviteExpired { with: String },
    MatchStarted {
        mode: MatchMode,
        target: u32,
        opponent: Option<String>,
    },
    Rolled {
        actor: Actor,
        name: String,
        value: DieValue,
        score: u32,
    },
    Won { reward: Points },
    Lost { winner: String },
    Abandoned,
    ReturnedToLobby,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::InviteSent { to } => format!("challenge sent to {to}"),
            Self::InviteAccepted { by } => format!("{by} accepted your challenge"),
            Self::InviteReceived { from } => format!("{from} challenged you"),
            Self::InviteDeclined { from } => format!("declined {from}'s challenge"),
            Self::InviteExpired { with } => format!("challenge with {with} expired"),
            Self::MatchStarted {
                target,
                opponent: Some(opponent),
                ..
            } => format!("race against {opponent} to {target} started"),
            Self::MatchStarted { mode, target, .. } => format!("{mode} race to {target} started"),
            Self::Rolled {
                actor: Actor::Local,
                value,
                ..
            } => format!("you rolled {value}"),
            Self::Rolled { name, value, .. } => format!("{name} rolled {value}"),
            Self::Won { reward } => format!("you won {reward} points"),
            Self::Lost { winner } => format!("{winner} reached the target first"),
            Self::Abandoned => "match abandoned".to_string(),
            Self::ReturnedToLobby => "back in the lobby".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Race rules fixed for every match the engine creates.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RaceSettings {
    pub target_score: u32,
    pub solo_reward: Points,
    pub challenge_reward: Points,
    pub turn_log_retention: usize,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_TARGET_SCORE,
            SOLO_REWARD,
            CHALLENGE_REWARD,
            DEFAULT_TURN_LOG_RETENTION,
        )
    }
}

impl RaceSettings {
    #[must_use]
    pub const fn new(
        target_score: u32,
        solo_reward: Points,
        challenge_reward: Points,
        turn_log_retention: usize,
    ) -> Self {
        Self {
            target_score,
            solo_reward,
            challenge_reward,
            turn_log_retention,
        }
    }

    #[must_use]
    pub fn reward_for(&self, mode: MatchMode) -> Points {
        match mode {
            MatchMode::Solo => self.solo_reward,
            MatchMode::Challenge => self.challenge_reward,
        }
    }
}

/// One playthrough of the race.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Match {
    pub id: MatchId,
    pub mode: MatchMode,
    pub target_score: u32,
    pub local: Participant,
    pub opponent: Option<Participant>,
    pub log: TurnLog,
    pub started_at: DateTime<Utc>,
    reward_issued: bool,
}

impl Match {
    fn new(mode: MatchMode, local: Player, opponent: Option<Player>, settings: &RaceSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            target_score: settings.target_score,
            local: Participant::new(local),
            opponent: opponent.map(Participant::new),
            log: TurnLog::new(settings.turn_log_retention),
            started_at: Utc::now(),
            reward_issued: false,
        }
    }

    #[must_use]
    pub fn participant(&self, actor: Actor) -> Option<&Participant> {
        match actor {
            Actor::Local => Some(&self.local),
            Actor::Opponent => self.opponent.as_ref(),
        }
    }

    fn participant_mut(&mut self, actor: Actor) -> Result<&mut Participant, GameError> {
        match actor {
            Actor::Local => Ok(&mut self.local),
            Actor::Opponent => self.opponent.as_mut().ok_or(GameError::NoOpponent),
        }
    }

    #[must_use]
    pub fn opponent_score(&self) -> u32 {
        self.opponent.as_ref().map_or(0, |p| p.score)
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        resolve_outcome(self.local.score, self.opponent_score(), self.target_score)
    }

    #[must_use]
    pub fn reward_issued(&self) -> bool {
        self.reward_issued
    }

    fn settle(&mut self) {
        self.local.state = ActorState::Idle;
        if let Some(opponent) = self.opponent.as_mut() {
            opponent.state = ActorState::Idle;
        }
    }

    fn describe(&self, event: &RollEvent) -> String {
        match event.actor {
            Actor::Local => format!("you rolled {}", event.value),
            Actor::Opponent => {
                let name = self
                    .opponent
                    .as_ref()
                    .map_or("opponent", |p| p.player.display_name.as_str());
                format!("{name} rolled {}", event.value)
            }
        }
    }
}

#[derive(Clone, Debug)]
enum Phase {
    Lobby,
    AwaitingInviteResponse(ChallengeInvite),
    InProgress(Match),
    Won(Match),
    Lost(Match),
}

/// Race-to-target engine for a single local player.
#[derive(Debug)]
pub struct RaceEngine {
    local: Player,
    settings: RaceSettings,
    phase: Phase,
    inbound_invites: Vec<ChallengeInvite>,
    events: VecDeque<GameEvent>,
}

impl RaceEngine {
    #[must_use]
    pub fn new(local: Player, settings: RaceSettings) -> Self {
        Self {
            local,
            settings,
            phase: Phase::Lobby,
            inbound_invites: Vec::new(),
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn local_player(&self) -> &Player {
        &self.local
    }

    #[must_use]
    pub fn settings(&self) -> &RaceSettings {
        &self.settings
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        match self.phase {
            Phase::Lobby => MatchStatus::Lobby,
            Phase::AwaitingInviteResponse(_) => MatchStatus::AwaitingInviteResponse,
            Phase::InProgress(_) => MatchStatus::InProgress,
            Phase::Won(_) => MatchStatus::Won,
            Phase::Lost(_) => MatchStatus::Lost,
        }
    }

    /// The running or just-finished match, if any.
    #[must_use]
    pub fn current_match(&self) -> Option<&Match> {
        match &self.phase {
            Phase::InProgress(game) | Phase::Won(game) | Phase::Lost(game) => Some(game),
            Phase::Lobby | Phase::AwaitingInviteResponse(_) => None,
        }
    }

    #[must_use]
    pub fn pending_invite(&self) -> Option<&ChallengeInvite> {
        match &self.phase {
            Phase::AwaitingInviteResponse(invite) => Some(invite),
            _ => None,
        }
    }

    #[must_use]
    pub fn inbound_invites(&self) -> &[ChallengeInvite] {
        &self.inbound_invites
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Start a race with no opponent.
    pub fn start_solo(&mut self) -> Result<MatchId, GameError> {
        if !matches!(self.phase, Phase::Lobby) {
            return Err(GameError::NotInLobby);
        }
        Ok(self.start_match(MatchMode::Solo, None))
    }

    /// Challenge `candidate`. The engine waits in
    /// `AwaitingInviteResponse` until [`Self::resolve_outbound_invite`].
    pub fn send_invite(&mut self, candidate: Player) -> Result<ChallengeInvite, GameError> {
        if !matches!(self.phase, Phase::Lobby) {
            return Err(GameError::NotInLobby);
        }
        if candidate.id == self.local.id {
            return Err(GameError::CannotChallengeSelf);
        }

        let invite = ChallengeInvite::new(self.local.clone(), candidate, InviteDirection::Outbound);
        info!("Challenge {} sent to {}", invite.id, invite.recipient.id);
        self.events.push_back(GameEvent::InviteSent {
            to: invite.recipient.display_name.clone(),
        });
        self.phase = Phase::AwaitingInviteResponse(invite.clone());
        Ok(invite)
    }

    /// The recipient of the outbound invite accepted; the challenge starts.
    pub fn resolve_outbound_invite(&mut self, invite_id: InviteId) -> Result<MatchId, GameError> {
        let Phase::AwaitingInviteResponse(invite) = &self.phase else {
            return Err(GameError::NotAwaitingInvite);
        };
        if invite.id != invite_id {
            return Err(GameError::InviteDoesNotExist);
        }

        let opponent = invite.recipient.clone();
        debug!("Challenge {} accepted by {}", invite_id, opponent.id);
        self.events.push_back(GameEvent::InviteAccepted {
            by: opponent.display_name.clone(),
        });
        Ok(self.start_match(MatchMode::Challenge, Some(opponent)))
    }

    /// Record a challenge from someone else. Can arrive in any phase but can
    /// only be accepted from the lobby.
    pub fn receive_invite(&mut self, from: Player) -> Result<ChallengeInvite, GameError> {
        if from.id == self.local.id {
            return Err(GameError::CannotChallengeSelf);
        }
        if self.inbound_invites.iter().any(|i| i.sender.id == from.id) {
            return Err(GameError::InviteAlreadyPending(from.display_name));
        }

        let invite = ChallengeInvite::new(from, self.local.clone(), InviteDirection::Inbound);
        self.events.push_back(GameEvent::InviteReceived {
            from: invite.sender.display_name.clone(),
        });
        self.inbound_invites.push(invite.clone());
        Ok(invite)
    }

    /// Accept an inbound challenge. Every other pending inbound invite
    /// expires since the local player is now busy.
    pub fn accept_invite(&mut self, invite_id: InviteId) -> Result<MatchId, GameError> {
        if !matches!(self.phase, Phase::Lobby) {
            return Err(GameError::NotInLobby);
        }
        let index = self
            .inbound_invites
            .iter()
            .position(|i| i.id == invite_id)
            .ok_or(GameError::InviteDoesNotExist)?;

        let mut accepted = self.inbound_invites.remove(index);
        accepted.status = InviteStatus::Accepted;
        for mut stale in self.inbound_invites.drain(..) {
            stale.status = InviteStatus::Expired;
            self.events.push_back(GameEvent::InviteExpired {
                with: stale.sender.display_name,
            });
        }

        Ok(self.start_match(MatchMode::Challenge, Some(accepted.sender)))
    }

    pub fn decline_invite(&mut self, invite_id: InviteId) -> Result<ChallengeInvite, GameError> {
        let index = self
            .inbound_invites
            .iter()
            .position(|i| i.id == invite_id)
            .ok_or(GameError::InviteDoesNotExist)?;

        let mut declined = self.inbound_invites.remove(index);
        declined.status = InviteStatus::Declined;
        self.events.push_back(GameEvent::InviteDeclined {
            from: declined.sender.display_name.clone(),
        });
        Ok(declined)
    }

    /// Whether an opponent turn may start right now.
    #[must_use]
    pub fn can_opponent_roll(&self) -> bool {
        match &self.phase {
            Phase::InProgress(game) => game
                .opponent
                .as_ref()
                .is_some_and(|opponent| !opponent.is_rolling() && !game.local.is_rolling()),
            _ => false,
        }
    }

    /// Mark `actor` as rolling. The returned ticket must be handed back to
    /// [`Self::complete_roll`] with the die value.
    ///
    /// The local player only has to be idle. The opponent additionally waits
    /// for the local roll to settle so both scores never move at once.
    pub fn begin_roll(&mut self, actor: Actor) -> Result<RollTicket, GameError> {
        let Phase::InProgress(game) = &mut self.phase else {
            return Err(GameError::MatchNotInProgress);
        };

        if actor == Actor::Opponent && game.local.is_rolling() {
            return Err(GameError::RollInFlight(Actor::Local));
        }
        let participant = game.participant_mut(actor)?;
        if participant.is_rolling() {
            return Err(GameError::AlreadyRolling(actor));
        }
        participant.state = ActorState::Rolling;

        Ok(RollTicket {
            match_id: game.id,
            actor,
        })
    }

    /// Apply a finished roll and evaluate the race immediately.
    pub fn complete_roll(
        &mut self,
        ticket: RollTicket,
        value: DieValue,
    ) -> Result<Outcome, GameError> {
        let Phase::InProgress(game) = &mut self.phase else {
            return Err(GameError::StaleTicket);
        };
        if game.id != ticket.match_id {
            return Err(GameError::StaleTicket);
        }

        let participant = game.participant_mut(ticket.actor)?;
        if !participant.is_rolling() {
            return Err(GameError::RollNotStarted(ticket.actor));
        }
        participant.state = ActorState::Idle;
        participant.score = advance_score(participant.score, value);
        let score = participant.score;
        let name = participant.player.display_name.clone();

        game.log.push(RollEvent {
            actor: ticket.actor,
            value,
            score_after: score,
            rolled_at: Utc::now(),
        });
        debug!(
            "Match {}: {} rolled {} (score {}/{})",
            game.id, name, value, score, game.target_score
        );
        self.events.push_back(GameEvent::Rolled {
            actor: ticket.actor,
            name,
            value,
            score,
        });

        let outcome = game.outcome();
        let mode = game.mode;
        let winner = game
            .opponent
            .as_ref()
            .map(|p| p.player.display_name.clone())
            .unwrap_or_default();
        match outcome {
            Outcome::Continue => {}
            Outcome::Won => {
                let reward = self.settings.reward_for(mode);
                self.events.push_back(GameEvent::Won { reward });
                self.finish(Outcome::Won);
            }
            Outcome::Lost => {
                self.events.push_back(GameEvent::Lost { winner });
                self.finish(Outcome::Lost);
            }
        }
        Ok(outcome)
    }

    /// Start and finish a roll in one step, for callers with no animation.
    pub fn roll_die(&mut self, actor: Actor, value: DieValue) -> Result<Outcome, GameError> {
        let ticket = self.begin_roll(actor)?;
        self.complete_roll(ticket, value)
    }

    /// Hand out the reward for a won match. Returns `Some` at most once per
    /// match.
    pub fn take_reward(&mut self) -> Option<Reward> {
        let Phase::Won(game) = &mut self.phase else {
            return None;
        };
        if game.reward_issued {
            return None;
        }
        game.reward_issued = true;
        Some(Reward {
            match_id: game.id,
            mode: game.mode,
            amount: self.settings.reward_for(game.mode),
        })
    }

    /// Discard the current match or pending invite and go back to the lobby.
    /// Any ticket issued before this call becomes stale.
    pub fn return_to_lobby(&mut self) -> Result<(), GameError> {
        match mem::replace(&mut self.phase, Phase::Lobby) {
            Phase::Lobby => return Err(GameError::AlreadyInLobby),
            Phase::AwaitingInviteResponse(mut invite) => {
                invite.status = InviteStatus::Expired;
                self.events.push_back(GameEvent::InviteExpired {
                    with: invite.recipient.display_name,
                });
            }
            Phase::InProgress(game) => {
                info!("Match {} abandoned", game.id);
                self.events.push_back(GameEvent::Abandoned);
            }
            Phase::Won(game) | Phase::Lost(game) => {
                debug!("Match {} dismissed", game.id);
            }
        }
        self.events.push_back(GameEvent::ReturnedToLobby);
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> MatchView {
        let game = self.current_match();
        MatchView {
            status: self.status(),
            match_id: game.map(|g| g.id),
            mode: game.map(|g| g.mode),
            target_score: game.map_or(self.settings.target_score, |g| g.target_score),
            local_score: game.map_or(0, |g| g.local.score),
            local_rolling: game.is_some_and(|g| g.local.is_rolling()),
            opponent: game.and_then(|g| g.opponent.as_ref()).map(|p| OpponentView {
                id: p.player.id.clone(),
                display_name: p.player.display_name.clone(),
                avatar: p.player.avatar.clone(),
                score: p.score,
                rolling: p.is_rolling(),
            }),
            log: game
                .map(|g| g.log.iter().map(|e| g.describe(e)).collect())
                .unwrap_or_default(),
            pending_invite: self.pending_invite().cloned(),
            inbound_invites: self.inbound_invites.clone(),
        }
    }

    fn start_match(&mut self, mode: MatchMode, opponent: Option<Player>) -> MatchId {
        let game = Match::new(mode, self.local.clone(), opponent, &self.settings);
        let id = game.id;
        info!(
            "Match {} started: {} race to {}",
            id, mode, game.target_score
        );
        self.events.push_back(GameEvent::MatchStarted {
            mode,
            target: game.target_score,
            opponent: game.opponent.as_ref().map(|p| p.player.display_name.clone()),
        });
        self.phase = Phase::InProgress(game);
        id
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = match (mem::replace(&mut self.phase, Phase::Lobby), outcome) {
            (Phase::InProgress(mut game), Outcome::Won) => {
                game.settle();
                info!("Match {} won", game.id);
                Phase::Won(game)
            }
            (Phase::InProgress(mut game), Outcome::Lost) => {
                game.settle();
                info!("Match {} lost", game.id);
                Phase::Lost(game)
            }
            (phase, _) => phase,
        };
    }
}
