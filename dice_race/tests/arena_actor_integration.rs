/// Integration tests for the arena actor
///
/// These tests run a real actor on a paused Tokio clock and check timer
/// ordering, remote opponents, rewards and cancellation on leaving a match.
use dice_race::{
    ArenaActor, ArenaConfig, ArenaHandle, ArenaNotification, ArenaResponse, DieValue, GameError,
    GameEvent, MatchStatus, Player,
    opponent::{RemoteTurnFeed, Roster, remote_channel},
    profile::{EntryType, ProfileStore},
};
use std::time::Duration;
use tokio::{sync::mpsc, time::sleep};

fn die(value: u8) -> DieValue {
    DieValue::new(value).unwrap()
}

/// Fast timers so scenarios stay short
fn fast_config(target_score: u32) -> ArenaConfig {
    ArenaConfig {
        target_score,
        roll_animation_ms: 50,
        opponent_roll_interval_ms: 100,
        invite_response_delay_ms: 200,
        rng_seed: Some(42),
        ..ArenaConfig::default()
    }
}

fn spawn(config: ArenaConfig) -> (ArenaHandle, ProfileStore) {
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

/// Start a challenge against Sara whose rolls come from the returned feed
async fn remote_challenge(handle: &ArenaHandle) -> RemoteTurnFeed {
    let (feed, source) = remote_channel(16);
    let response = handle.send_remote_invite("sara_vip", source).await.unwrap();
    assert!(matches!(response, ArenaResponse::Invite(_)));
    sleep(Duration::from_millis(210)).await;
    assert_eq!(handle.view().await.unwrap().status, MatchStatus::InProgress);
    feed
}

fn drain(notifications: &mut mpsc::Receiver<ArenaNotification>) -> Vec<ArenaNotification> {
    let mut seen = Vec::new();
    while let Ok(notification) = notifications.try_recv() {
        seen.push(notification);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_solo_win_credits_profile() {
    let (handle, profiles) = spawn(fast_config(1));
    let mut notifications = handle.subscribe("test", 64).await.unwrap();

    handle.start_solo().await.unwrap();
    handle.roll().await.unwrap();
    sleep(Duration::from_millis(60)).await;

    assert_eq!(handle.view().await.unwrap().status, MatchStatus::Won);
    let profile = handle.profile().await.unwrap();
    assert_eq!(profile.points, 5_000);

    let entries = profiles.entries(&profile.id, 10).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_type, EntryType::MatchReward);
    assert!(entries[0].idempotency_key.starts_with("match_reward_"));

    let seen = drain(&mut notifications);
    assert!(seen.contains(&ArenaNotification::Event(GameEvent::Won { reward: 5_000 })));
    assert!(seen.contains(&ArenaNotification::StatusChanged(MatchStatus::Won)));
    assert!(seen.iter().any(|n| matches!(
        n,
        ArenaNotification::RewardCredited { amount: 5_000, balance: 5_000, .. }
    )));
}

#[tokio::test(start_paused = true)]
async fn test_rewards_accumulate_across_matches() {
    let (handle, _) = spawn(fast_config(1));

    for _ in 0..3 {
        handle.start_solo().await.unwrap();
        handle.roll().await.unwrap();
        sleep(Duration::from_millis(60)).await;
        assert_eq!(handle.return_to_lobby().await.unwrap(), ArenaResponse::Success);
    }
    assert_eq!(handle.profile().await.unwrap().points, 15_000);
}

#[tokio::test(start_paused = true)]
async fn test_remote_opponent_reaching_target_first_loses() {
    let (handle, _) = spawn(fast_config(10));
    let feed = remote_challenge(&handle).await;

    feed.send(die(6)).await.unwrap();
    feed.send(die(6)).await.unwrap();
    sleep(Duration::from_millis(300)).await;

    let view = handle.view().await.unwrap();
    assert_eq!(view.status, MatchStatus::Lost);
    assert_eq!(view.opponent.unwrap().score, 12);
    assert_eq!(handle.profile().await.unwrap().points, 0);
    assert_eq!(
        handle.roll().await.unwrap(),
        ArenaResponse::Rejected(GameError::MatchNotInProgress)
    );
}

#[tokio::test(start_paused = true)]
async fn test_opponent_waits_for_remote_rolls() {
    let (handle, _) = spawn(fast_config(50));
    let feed = remote_challenge(&handle).await;

    // Nothing queued, so several cadence ticks pass without a roll
    sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.view().await.unwrap().opponent.unwrap().score, 0);

    feed.send(die(4)).await.unwrap();
    sleep(Duration::from_millis(200)).await;
    let view = handle.view().await.unwrap();
    assert_eq!(view.opponent.unwrap().score, 4);
    assert_eq!(view.log, vec!["Sara rolled 4".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_match_cancels_pending_rolls() {
    let (handle, _) = spawn(fast_config(50));
    let feed = remote_challenge(&handle).await;
    let mut notifications = handle.subscribe("test", 64).await.unwrap();

    for _ in 0..5 {
        feed.send(die(3)).await.unwrap();
    }
    handle.roll().await.unwrap();
    assert_eq!(handle.return_to_lobby().await.unwrap(), ArenaResponse::Success);

    let seen = drain(&mut notifications);
    assert!(seen.contains(&ArenaNotification::Event(GameEvent::Abandoned)));
    assert!(seen.contains(&ArenaNotification::StatusChanged(MatchStatus::Lobby)));

    // No roll events arrive after leaving
    sleep(Duration::from_secs(2)).await;
    assert!(drain(&mut notifications).is_empty());
    let view = handle.view().await.unwrap();
    assert_eq!(view.status, MatchStatus::Lobby);
    assert_eq!(view.local_score, 0);
    assert!(view.log.is_empty());
    assert!(view.opponent.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_leaving_before_invite_answer() {
    let (handle, _) = spawn(fast_config(50));
    handle.send_invite("omar_k").await.unwrap();
    handle.return_to_lobby().await.unwrap();

    sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.view().await.unwrap().status, MatchStatus::Lobby);
    // A new challenge still works
    handle.send_invite("omar_k").await.unwrap();
    sleep(Duration::from_millis(210)).await;
    assert_eq!(handle.view().await.unwrap().status, MatchStatus::InProgress);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_opponent_rolls_on_cadence() {
    let (handle, _) = spawn(fast_config(1_000));
    handle.send_invite("layla").await.unwrap();
    sleep(Duration::from_millis(210)).await;

    sleep(Duration::from_millis(1_000)).await;
    let view = handle.view().await.unwrap();
    let opponent = view.opponent.unwrap();
    assert_eq!(opponent.display_name, "Layla");
    assert!(opponent.score > 0);
    // At most one roll per 100ms cadence tick
    assert!(opponent.score <= 6 * 12);
}

#[tokio::test(start_paused = true)]
async fn test_inbound_invite_accept_and_decline() {
    let (handle, _) = spawn(fast_config(50));
    handle.receive_invite("nour").await.unwrap();
    handle.receive_invite("yusuf_7").await.unwrap();
    assert_eq!(
        handle.receive_invite("nour").await.unwrap(),
        ArenaResponse::Rejected(GameError::InviteAlreadyPending("Nour".to_string()))
    );

    // Oldest first
    let declined = handle.decline_invite(None).await.unwrap();
    assert!(matches!(declined, ArenaResponse::Invite(invite) if invite.sender.display_name == "Nour"));

    let (_feed, source) = remote_channel(4);
    assert!(matches!(
        handle.accept_remote_invite(None, source).await.unwrap(),
        ArenaResponse::MatchStarted(_)
    ));
    let view = handle.view().await.unwrap();
    assert_eq!(view.opponent.unwrap().display_name, "Yusuf");
    assert!(view.inbound_invites.is_empty());

    assert_eq!(
        handle.accept_invite(None).await.unwrap(),
        ArenaResponse::Rejected(GameError::InviteDoesNotExist)
    );
}

#[tokio::test(start_paused = true)]
async fn test_simulated_inbound_invites_arrive() {
    let config = ArenaConfig {
        inbound_invite_interval_ms: Some(1_000),
        ..fast_config(50)
    };
    let (handle, _) = spawn(config);
    assert!(handle.view().await.unwrap().inbound_invites.is_empty());

    sleep(Duration::from_millis(1_050)).await;
    let view = handle.view().await.unwrap();
    assert_eq!(view.inbound_invites.len(), 1);
    assert_ne!(view.inbound_invites[0].sender.id.as_str(), "me");
}

#[tokio::test(start_paused = true)]
async fn test_handles_share_one_actor() {
    let (handle, _) = spawn(fast_config(50));
    let other = handle.clone();
    handle.start_solo().await.unwrap();
    assert_eq!(
        other.start_solo().await.unwrap(),
        ArenaResponse::Rejected(GameError::NotInLobby)
    );
    assert_eq!(other.roster().await.unwrap().len(), 5);
}
