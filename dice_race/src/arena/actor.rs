//! Arena actor implementation with async message handling.

use super::{
    config::ArenaConfig,
    messages::{ArenaMessage, ArenaNotification, ArenaResponse},
};
use crate::{
    game::{
        GameError, RaceEngine,
        entities::{
            Actor, DieValue, InviteId, MatchStatus, MatchView, Outcome, Player, RollTicket,
        },
    },
    opponent::{OpponentSource, RandomTurnSource, RemoteTurnSource, Roster, TurnSource},
    profile::{EntryType, Profile, ProfileError, ProfileStore},
};
use rand::Rng;
use std::{collections::HashMap, future};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Duration, Instant, sleep, sleep_until},
};

/// Arena actor handle for sending messages
#[derive(Clone, Debug)]
pub struct ArenaHandle {
    sender: mpsc::Sender<ArenaMessage>,
}

impl ArenaHandle {
    /// Create a new arena handle
    pub fn new(sender: mpsc::Sender<ArenaMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the arena
    pub async fn send(&self, message: ArenaMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Arena is closed".to_string())
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ArenaMessage,
    ) -> Result<T, String> {
        let (response, receiver) = oneshot::channel();
        self.send(build(response)).await?;
        receiver
            .await
            .map_err(|_| "Arena dropped the request".to_string())
    }

    pub async fn start_solo(&self) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::StartSolo { response })
            .await
    }

    /// Challenge a roster candidate played by a simulated opponent
    pub async fn send_invite(&self, candidate_id: &str) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::SendInvite {
            candidate_id: candidate_id.to_string(),
            remote: None,
            response,
        })
        .await
    }

    /// Challenge a roster candidate whose rolls arrive through `remote`
    pub async fn send_remote_invite(
        &self,
        candidate_id: &str,
        remote: RemoteTurnSource,
    ) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::SendInvite {
            candidate_id: candidate_id.to_string(),
            remote: Some(remote),
            response,
        })
        .await
    }

    pub async fn accept_invite(
        &self,
        invite_id: Option<InviteId>,
    ) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::AcceptInvite {
            invite_id,
            remote: None,
            response,
        })
        .await
    }

    pub async fn accept_remote_invite(
        &self,
        invite_id: Option<InviteId>,
        remote: RemoteTurnSource,
    ) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::AcceptInvite {
            invite_id,
            remote: Some(remote),
            response,
        })
        .await
    }

    pub async fn decline_invite(
        &self,
        invite_id: Option<InviteId>,
    ) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::DeclineInvite {
            invite_id,
            response,
        })
        .await
    }

    pub async fn receive_invite(&self, from_id: &str) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::ReceiveInvite {
            from_id: from_id.to_string(),
            response,
        })
        .await
    }

    pub async fn roll(&self) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::Roll { response })
            .await
    }

    pub async fn return_to_lobby(&self) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::ReturnToLobby { response })
            .await
    }

    pub async fn view(&self) -> Result<MatchView, String> {
        self.request(|response| ArenaMessage::GetView { response })
            .await
    }

    pub async fn roster(&self) -> Result<Vec<Player>, String> {
        self.request(|response| ArenaMessage::GetRoster { response })
            .await
    }

    pub async fn profile(&self) -> Result<Profile, String> {
        self.request(|response| ArenaMessage::GetProfile { response })
            .await?
    }

    /// Subscribe to notifications with a buffer of `capacity` entries
    pub async fn subscribe(
        &self,
        subscriber_id: &str,
        capacity: usize,
    ) -> Result<mpsc::Receiver<ArenaNotification>, String> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        self.send(ArenaMessage::Subscribe {
            subscriber_id: subscriber_id.to_string(),
            sender,
        })
        .await?;
        Ok(receiver)
    }

    pub async fn unsubscribe(&self, subscriber_id: &str) -> Result<(), String> {
        self.send(ArenaMessage::Unsubscribe {
            subscriber_id: subscriber_id.to_string(),
        })
        .await
    }

    pub async fn close(&self) -> Result<ArenaResponse, String> {
        self.request(|response| ArenaMessage::Close { response })
            .await
    }
}

/// Completions of the actor's own delayed work
#[derive(Debug)]
enum TimerEvent {
    RollLanded { ticket: RollTicket, value: DieValue },
    InviteAnswered(InviteId),
}

/// Arena actor owning one local player's race engine
pub struct ArenaActor {
    /// Arena configuration
    config: ArenaConfig,

    /// Race state machine
    engine: RaceEngine,

    /// Local die, also drives simulated opponent choices
    local_die: RandomTurnSource,

    /// Turn source for the current challenge
    opponent: Option<OpponentSource>,

    /// Remote source held until an outbound invite is answered
    pending_remote: Option<RemoteTurnSource>,

    /// Challenge candidates
    roster: Roster,

    /// Point balance store
    profiles: ProfileStore,

    /// Message inbox
    inbox: mpsc::Receiver<ArenaMessage>,

    /// Timer completion channel
    timer_tx: mpsc::Sender<TimerEvent>,
    timer_rx: mpsc::Receiver<TimerEvent>,

    /// Spawned timer tasks, aborted when a match is left
    timers: Vec<JoinHandle<()>>,

    /// When the opponent may next roll
    next_opponent_turn: Option<Instant>,

    /// When the next simulated inbound challenge arrives
    next_inbound_invite: Option<Instant>,

    /// Status last announced to subscribers
    last_status: MatchStatus,

    /// Is arena closed
    is_closed: bool,

    /// Notification subscribers
    subscribers: HashMap<String, mpsc::Sender<ArenaNotification>>,
}

impl ArenaActor {
    /// Create a new arena actor
    ///
    /// # Arguments
    ///
    /// * `local` - The player rolling through this arena
    /// * `config` - Arena configuration
    /// * `roster` - Challenge candidates
    /// * `profiles` - Store credited when a race is won
    ///
    /// # Returns
    ///
    /// * `Result<(ArenaActor, ArenaHandle), String>` - Actor and handle, or a configuration error
    pub fn new(
        local: Player,
        config: ArenaConfig,
        roster: Roster,
        profiles: ProfileStore,
    ) -> Result<(Self, ArenaHandle), String> {
        config.validate()?;

        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let (timer_tx, timer_rx) = mpsc::channel(config.inbox_capacity);

        let actor = Self {
            engine: RaceEngine::new(local, config.race_settings()),
            local_die: RandomTurnSource::from_seed(config.rng_seed),
            opponent: None,
            pending_remote: None,
            roster,
            profiles,
            inbox,
            timer_tx,
            timer_rx,
            timers: Vec::new(),
            next_opponent_turn: None,
            next_inbound_invite: None,
            last_status: MatchStatus::Lobby,
            is_closed: false,
            subscribers: HashMap::new(),
            config,
        };

        Ok((actor, ArenaHandle::new(sender)))
    }

    /// Create an actor and run it on a new task
    pub fn spawn(
        local: Player,
        config: ArenaConfig,
        roster: Roster,
        profiles: ProfileStore,
    ) -> Result<(ArenaHandle, JoinHandle<()>), String> {
        let (actor, handle) = Self::new(local, config, roster, profiles)?;
        Ok((handle, tokio::spawn(actor.run())))
    }

    /// Run the arena actor event loop
    pub async fn run(mut self) {
        let local = self.engine.local_player().clone();
        log::info!("Arena for {} starting", local.id);

        if let Err(e) = self.profiles.ensure_profile(&local).await {
            log::error!("Arena for {}: profile unavailable: {}", local.id, e);
        }
        self.next_inbound_invite = self
            .config
            .inbound_invite_interval()
            .map(|period| Instant::now() + period);

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    let Some(message) = message else {
                        log::debug!("Arena for {}: every handle dropped", local.id);
                        break;
                    };
                    self.handle_message(message).await;
                    if self.is_closed {
                        break;
                    }
                }

                Some(event) = self.timer_rx.recv() => {
                    self.handle_timer(event).await;
                }

                () = sleep_until_deadline(self.next_opponent_turn) => {
                    self.opponent_turn();
                }

                () = sleep_until_deadline(self.next_inbound_invite) => {
                    self.simulate_inbound_invite();
                }
            }

            self.publish();
        }

        self.abort_timers();
        self.notify(ArenaNotification::Closed);
        log::info!("Arena for {} closed", local.id);
    }

    /// Handle an arena message
    async fn handle_message(&mut self, message: ArenaMessage) {
        match message {
            ArenaMessage::StartSolo { response } => {
                let result = match self.engine.start_solo() {
                    Ok(match_id) => ArenaResponse::MatchStarted(match_id),
                    Err(e) => e.into(),
                };
                let _ = response.send(result);
            }

            ArenaMessage::SendInvite {
                candidate_id,
                remote,
                response,
            } => {
                let result = self.handle_send_invite(&candidate_id, remote);
                let _ = response.send(result);
            }

            ArenaMessage::AcceptInvite {
                invite_id,
                remote,
                response,
            } => {
                let result = self.handle_accept_invite(invite_id, remote);
                let _ = response.send(result);
            }

            ArenaMessage::DeclineInvite {
                invite_id,
                response,
            } => {
                let result = match self.oldest_inbound(invite_id) {
                    Ok(invite_id) => match self.engine.decline_invite(invite_id) {
                        Ok(invite) => ArenaResponse::Invite(invite),
                        Err(e) => e.into(),
                    },
                    Err(e) => e.into(),
                };
                let _ = response.send(result);
            }

            ArenaMessage::ReceiveInvite { from_id, response } => {
                let result = self.handle_receive_invite(&from_id);
                let _ = response.send(result);
            }

            ArenaMessage::Roll { response } => {
                let result = self.handle_roll();
                let _ = response.send(result);
            }

            ArenaMessage::ReturnToLobby { response } => {
                let result = self.handle_return_to_lobby();
                let _ = response.send(result);
            }

            ArenaMessage::GetView { response } => {
                let _ = response.send(self.engine.snapshot());
            }

            ArenaMessage::GetRoster { response } => {
                let _ = response.send(self.roster.candidates().to_vec());
            }

            ArenaMessage::GetProfile { response } => {
                let result = self
                    .profiles
                    .get_profile(&self.engine.local_player().id)
                    .await
                    .map_err(|e| e.client_message());
                let _ = response.send(result);
            }

            ArenaMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                log::debug!("{} subscribed to arena notifications", subscriber_id);
                self.subscribers.insert(subscriber_id, sender);
            }

            ArenaMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!("{} unsubscribed from arena notifications", subscriber_id);
            }

            ArenaMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(ArenaResponse::Success);
            }
        }
    }

    fn handle_send_invite(
        &mut self,
        candidate_id: &str,
        remote: Option<RemoteTurnSource>,
    ) -> ArenaResponse {
        let Some(candidate) = self.roster.get(candidate_id).cloned() else {
            return ArenaResponse::Error(format!("Unknown opponent {candidate_id}"));
        };

        match self.engine.send_invite(candidate) {
            Ok(invite) => {
                self.pending_remote = remote;
                self.schedule(
                    self.config.invite_response_delay(),
                    TimerEvent::InviteAnswered(invite.id),
                );
                ArenaResponse::Invite(invite)
            }
            Err(e) => e.into(),
        }
    }

    fn handle_accept_invite(
        &mut self,
        invite_id: Option<InviteId>,
        remote: Option<RemoteTurnSource>,
    ) -> ArenaResponse {
        let invite_id = match self.oldest_inbound(invite_id) {
            Ok(invite_id) => invite_id,
            Err(e) => return e.into(),
        };

        match self.engine.accept_invite(invite_id) {
            Ok(match_id) => {
                self.opponent = Some(match remote {
                    Some(remote) => remote.into(),
                    None => self.simulated_opponent(),
                });
                ArenaResponse::MatchStarted(match_id)
            }
            Err(e) => e.into(),
        }
    }

    fn handle_receive_invite(&mut self, from_id: &str) -> ArenaResponse {
        let Some(sender) = self.roster.get(from_id).cloned() else {
            return ArenaResponse::Error(format!("Unknown opponent {from_id}"));
        };

        match self.engine.receive_invite(sender) {
            Ok(invite) => ArenaResponse::Invite(invite),
            Err(e) => e.into(),
        }
    }

    /// The die is only thrown once the roll is allowed, so rejected rolls
    /// leave a seeded die untouched.
    fn handle_roll(&mut self) -> ArenaResponse {
        match self.engine.begin_roll(Actor::Local) {
            Ok(ticket) => {
                let value = self.local_die.roll();
                self.schedule(
                    self.config.roll_animation(),
                    TimerEvent::RollLanded { ticket, value },
                );
                ArenaResponse::Rolling
            }
            Err(e) => e.into(),
        }
    }

    fn handle_return_to_lobby(&mut self) -> ArenaResponse {
        match self.engine.return_to_lobby() {
            Ok(()) => {
                self.abort_timers();
                self.opponent = None;
                self.pending_remote = None;
                ArenaResponse::Success
            }
            Err(e) => e.into(),
        }
    }

    /// Apply a timer completion. Completions for a match or invite that is
    /// gone are dropped by the engine.
    async fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::RollLanded { ticket, value } => {
                match self.engine.complete_roll(ticket, value) {
                    Ok(Outcome::Won) => self.credit_reward().await,
                    Ok(_) => {}
                    Err(e) => log::debug!("Dropping roll for {}: {}", ticket.actor, e),
                }
            }

            TimerEvent::InviteAnswered(invite_id) => {
                match self.engine.resolve_outbound_invite(invite_id) {
                    Ok(match_id) => {
                        let opponent = match self.pending_remote.take() {
                            Some(remote) => remote.into(),
                            None => self.simulated_opponent(),
                        };
                        self.opponent = Some(opponent);
                        log::debug!("Challenge {} answered, match {}", invite_id, match_id);
                    }
                    Err(e) => log::debug!("Dropping answer to challenge {}: {}", invite_id, e),
                }
            }
        }
    }

    /// One opponent cadence tick. Skipped while either side is rolling or
    /// the remote peer has nothing queued. Stops once the remote peer is gone.
    fn opponent_turn(&mut self) {
        self.next_opponent_turn = Some(Instant::now() + self.config.opponent_roll_interval());

        if !self.engine.can_opponent_roll() {
            log::trace!("Opponent turn skipped");
            return;
        }
        let Some(source) = self.opponent.as_mut() else {
            return;
        };
        let Some(value) = source.next_roll() else {
            if source.is_disconnected() {
                log::info!("Opponent feed closed, no further opponent turns");
                self.next_opponent_turn = None;
            }
            return;
        };

        match self.engine.begin_roll(Actor::Opponent) {
            Ok(ticket) => self.schedule(
                self.config.roll_animation(),
                TimerEvent::RollLanded { ticket, value },
            ),
            Err(e) => log::debug!("Opponent turn rejected: {}", e),
        }
    }

    fn simulate_inbound_invite(&mut self) {
        self.next_inbound_invite = self
            .config
            .inbound_invite_interval()
            .map(|period| Instant::now() + period);

        let local_id = self.engine.local_player().id.clone();
        let Some(sender) = self
            .roster
            .pick_random(self.local_die.rng(), &local_id)
            .cloned()
        else {
            return;
        };
        if let Err(e) = self.engine.receive_invite(sender) {
            log::debug!("Simulated challenge skipped: {}", e);
        }
    }

    fn simulated_opponent(&mut self) -> OpponentSource {
        RandomTurnSource::seeded(self.local_die.rng().random()).into()
    }

    fn oldest_inbound(&self, invite_id: Option<InviteId>) -> Result<InviteId, GameError> {
        invite_id
            .or_else(|| self.engine.inbound_invites().first().map(|i| i.id))
            .ok_or(GameError::InviteDoesNotExist)
    }

    async fn credit_reward(&mut self) {
        let Some(reward) = self.engine.take_reward() else {
            return;
        };

        let player_id = self.engine.local_player().id.clone();
        let result = self
            .profiles
            .credit_points(
                &player_id,
                reward.amount,
                EntryType::MatchReward,
                format!("match_reward_{}", reward.match_id),
                Some(format!("{} race won", reward.mode)),
            )
            .await;

        match result {
            Ok(balance) => self.notify(ArenaNotification::RewardCredited {
                match_id: reward.match_id,
                amount: reward.amount,
                balance,
            }),
            Err(ProfileError::DuplicateTransaction(key)) => {
                log::warn!("Reward {} already credited", key);
            }
            Err(e) => log::error!(
                "Failed to credit reward for match {}: {}",
                reward.match_id,
                e
            ),
        }
    }

    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        self.timers.retain(|timer| !timer.is_finished());
        let sender = self.timer_tx.clone();
        self.timers.push(tokio::spawn(async move {
            sleep(delay).await;
            let _ = sender.send(event).await;
        }));
    }

    fn abort_timers(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
        // Completions that were already queued carry stale tickets
        while let Ok(event) = self.timer_rx.try_recv() {
            log::trace!("Discarding queued {:?}", event);
        }
    }

    /// Forward engine events and announce status changes
    fn publish(&mut self) {
        for event in self.engine.drain_events() {
            self.notify(ArenaNotification::Event(event));
        }

        let status = self.engine.status();
        if status == self.last_status {
            return;
        }
        self.last_status = status;

        self.next_opponent_turn = if status == MatchStatus::InProgress && self.opponent.is_some()
        {
            Some(Instant::now() + self.config.opponent_roll_interval())
        } else {
            None
        };
        if status != MatchStatus::InProgress {
            self.opponent = None;
        }
        self.notify(ArenaNotification::StatusChanged(status));
    }

    /// Broadcast a notification to all subscribers
    fn notify(&mut self, notification: ArenaNotification) {
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(notification.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping notification",
                        subscriber_id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            }
        });
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::remote_channel;

    fn config() -> ArenaConfig {
        ArenaConfig {
            rng_seed: Some(7),
            ..ArenaConfig::default()
        }
    }

    fn spawn_arena(config: ArenaConfig) -> (ArenaHandle, ProfileStore) {
        let profiles = ProfileStore::in_memory();
        let (handle, _task) = ArenaActor::spawn(
            Player::new("me", "Me", ""),
            config,
            Roster::default_roster(),
            profiles.clone(),
        )
        .unwrap();
        (handle, profiles)
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = ArenaConfig {
            solo_reward: 20_000,
            ..ArenaConfig::default()
        };
        let result = ArenaActor::new(
            Player::new("me", "Me", ""),
            config,
            Roster::default_roster(),
            ProfileStore::in_memory(),
        );
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_roll_lands_after_animation() {
        let (handle, _) = spawn_arena(config());
        assert!(matches!(
            handle.start_solo().await.unwrap(),
            ArenaResponse::MatchStarted(_)
        ));
        assert_eq!(handle.roll().await.unwrap(), ArenaResponse::Rolling);

        let view = handle.view().await.unwrap();
        assert!(view.local_rolling);
        assert_eq!(view.local_score, 0);

        sleep(Duration::from_millis(850)).await;
        let view = handle.view().await.unwrap();
        assert!(!view.local_rolling);
        assert!((1..=6).contains(&view.local_score));
        assert_eq!(view.log.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_roll_rejected_while_animating() {
        let (handle, _) = spawn_arena(config());
        handle.start_solo().await.unwrap();
        handle.roll().await.unwrap();
        assert_eq!(
            handle.roll().await.unwrap(),
            ArenaResponse::Rejected(GameError::AlreadyRolling(Actor::Local))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_rolls_do_not_advance_seeded_die() {
        let (noisy, _) = spawn_arena(config());
        let (quiet, _) = spawn_arena(config());

        assert_eq!(
            noisy.roll().await.unwrap(),
            ArenaResponse::Rejected(GameError::MatchNotInProgress)
        );
        for handle in [&noisy, &quiet] {
            handle.start_solo().await.unwrap();
            assert_eq!(handle.roll().await.unwrap(), ArenaResponse::Rolling);
        }
        assert!(!noisy.roll().await.unwrap().is_success());

        sleep(Duration::from_millis(850)).await;
        let noisy_view = noisy.view().await.unwrap();
        let quiet_view = quiet.view().await.unwrap();
        assert!((1..=6).contains(&quiet_view.local_score));
        assert_eq!(noisy_view.local_score, quiet_view.local_score);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_feed_stops_opponent_cadence() {
        let (mut actor, _handle) = ArenaActor::new(
            Player::new("me", "Me", ""),
            config(),
            Roster::default_roster(),
            ProfileStore::in_memory(),
        )
        .unwrap();
        let (feed, source) = remote_channel(4);
        assert!(matches!(
            actor.handle_receive_invite("sara_vip"),
            ArenaResponse::Invite(_)
        ));
        assert!(matches!(
            actor.handle_accept_invite(None, Some(source)),
            ArenaResponse::MatchStarted(_)
        ));
        actor.publish();
        assert!(actor.next_opponent_turn.is_some());

        actor.opponent_turn();
        assert!(actor.next_opponent_turn.is_some());

        drop(feed);
        actor.opponent_turn();
        assert!(actor.next_opponent_turn.is_none());
        assert_eq!(actor.engine.status(), MatchStatus::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_candidate() {
        let (handle, _) = spawn_arena(config());
        assert_eq!(
            handle.send_invite("nobody").await.unwrap(),
            ArenaResponse::Error("Unknown opponent nobody".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_outbound_invite_resolves_after_delay() {
        let (handle, _) = spawn_arena(config());
        assert!(matches!(
            handle.send_invite("sara_vip").await.unwrap(),
            ArenaResponse::Invite(_)
        ));
        assert_eq!(
            handle.view().await.unwrap().status,
            MatchStatus::AwaitingInviteResponse
        );

        sleep(Duration::from_millis(2_050)).await;
        let view = handle.view().await.unwrap();
        assert_eq!(view.status, MatchStatus::InProgress);
        assert_eq!(view.opponent.unwrap().display_name, "Sara");
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_actor() {
        let (handle, _) = spawn_arena(config());
        let mut notifications = handle.subscribe("test", 8).await.unwrap();
        assert_eq!(handle.close().await.unwrap(), ArenaResponse::Success);
        assert_eq!(
            notifications.recv().await,
            Some(ArenaNotification::Closed)
        );
        assert!(handle.view().await.is_err());
    }
}
