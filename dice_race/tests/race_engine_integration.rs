/// Integration tests for race engine scenarios
///
/// These tests drive the synchronous engine through complete solo and
/// challenge races, including invites, abandons and rewards.
use dice_race::{
    Actor, CHALLENGE_REWARD, DieValue, GameError, GameEvent, MatchStatus, Outcome, Player,
    RaceEngine, RaceSettings, SOLO_REWARD,
    entities::InviteStatus,
    opponent::{RandomTurnSource, TurnSource},
};

fn die(value: u8) -> DieValue {
    DieValue::new(value).unwrap()
}

fn me() -> Player {
    Player::new("me", "Me", "")
}

fn sara() -> Player {
    Player::new("sara_vip", "Sara", "https://avatar.iran.liara.run/public/girl?username=sara_vip")
}

/// Engine in a running challenge against Sara
fn challenge() -> RaceEngine {
    let mut engine = RaceEngine::new(me(), RaceSettings::default());
    let invite = engine.send_invite(sara()).unwrap();
    engine.resolve_outbound_invite(invite.id).unwrap();
    engine.drain_events();
    engine
}

#[test]
fn test_score_is_sum_of_rolls() {
    let mut engine = RaceEngine::new(me(), RaceSettings::default());
    engine.start_solo().unwrap();

    let mut expected = 0;
    for value in [3, 1, 6, 2, 5] {
        engine.roll_die(Actor::Local, die(value)).unwrap();
        let score = engine.snapshot().local_score;
        assert!(score >= expected);
        expected += u32::from(value);
        assert_eq!(score, expected);
    }
}

#[test]
fn test_exact_roll_reaching_target_wins() {
    let mut engine = RaceEngine::new(me(), RaceSettings::default());
    engine.start_solo().unwrap();
    for _ in 0..8 {
        engine.roll_die(Actor::Local, die(6)).unwrap();
    }
    assert_eq!(engine.snapshot().local_score, 48);
    assert_eq!(engine.status(), MatchStatus::InProgress);

    assert_eq!(engine.roll_die(Actor::Local, die(3)).unwrap(), Outcome::Won);
    assert_eq!(engine.status(), MatchStatus::Won);
    assert_eq!(engine.snapshot().local_score, 51);
}

#[test]
fn test_opponent_first_to_target_loses_match() {
    let mut engine = challenge();
    for _ in 0..8 {
        engine.roll_die(Actor::Local, die(6)).unwrap();
        engine.roll_die(Actor::Opponent, die(6)).unwrap();
    }
    // Both at 48; opponent lands first
    assert_eq!(engine.roll_die(Actor::Opponent, die(2)).unwrap(), Outcome::Lost);
    assert_eq!(engine.status(), MatchStatus::Lost);

    // Local would have reached the target next, but the result is final
    assert_eq!(
        engine.roll_die(Actor::Local, die(6)),
        Err(GameError::MatchNotInProgress)
    );
    assert_eq!(engine.status(), MatchStatus::Lost);
    assert!(engine.take_reward().is_none());
}

#[test]
fn test_no_second_roll_while_in_flight() {
    let mut engine = challenge();
    let ticket = engine.begin_roll(Actor::Local).unwrap();
    assert_eq!(
        engine.begin_roll(Actor::Local),
        Err(GameError::AlreadyRolling(Actor::Local))
    );
    // Opponent waits for the local roll to land
    assert!(!engine.can_opponent_roll());
    assert_eq!(
        engine.begin_roll(Actor::Opponent),
        Err(GameError::RollInFlight(Actor::Local))
    );

    engine.complete_roll(ticket, die(4)).unwrap();
    assert!(engine.can_opponent_roll());
    let opponent_ticket = engine.begin_roll(Actor::Opponent).unwrap();
    // Local may still roll while the opponent animates
    let local_ticket = engine.begin_roll(Actor::Local).unwrap();
    engine.complete_roll(opponent_ticket, die(1)).unwrap();
    engine.complete_roll(local_ticket, die(2)).unwrap();

    let view = engine.snapshot();
    assert_eq!(view.local_score, 6);
    assert_eq!(view.opponent.unwrap().score, 1);
}

#[test]
fn test_solo_reward_below_challenge_reward() {
    assert!(SOLO_REWARD < CHALLENGE_REWARD);

    let mut solo = RaceEngine::new(me(), RaceSettings::default());
    solo.start_solo().unwrap();
    while solo.status() == MatchStatus::InProgress {
        solo.roll_die(Actor::Local, die(6)).unwrap();
    }
    let solo_reward = solo.take_reward().unwrap();

    let mut duel = challenge();
    while duel.status() == MatchStatus::InProgress {
        duel.roll_die(Actor::Local, die(6)).unwrap();
    }
    let duel_reward = duel.take_reward().unwrap();

    assert_eq!(solo_reward.amount, 5_000);
    assert_eq!(duel_reward.amount, 10_000);
    assert!(solo_reward.amount < duel_reward.amount);
}

#[test]
fn test_reward_taken_once() {
    let mut engine = RaceEngine::new(me(), RaceSettings::default());
    engine.start_solo().unwrap();
    while engine.status() == MatchStatus::InProgress {
        engine.roll_die(Actor::Local, die(5)).unwrap();
    }
    assert!(engine.take_reward().is_some());
    assert!(engine.take_reward().is_none());
}

#[test]
fn test_return_to_lobby_clears_match() {
    let mut engine = challenge();
    engine.roll_die(Actor::Local, die(3)).unwrap();
    let ticket = engine.begin_roll(Actor::Opponent).unwrap();
    engine.drain_events();
    engine.return_to_lobby().unwrap();

    let view = engine.snapshot();
    assert_eq!(view.status, MatchStatus::Lobby);
    assert_eq!(view.local_score, 0);
    assert!(view.log.is_empty());
    assert!(view.opponent.is_none());

    let events: Vec<GameEvent> = engine.drain_events().into_iter().collect();
    assert_eq!(events, vec![GameEvent::Abandoned, GameEvent::ReturnedToLobby]);

    // A roll that was animating when the match was left lands nowhere
    assert_eq!(engine.complete_roll(ticket, die(6)), Err(GameError::StaleTicket));
    assert!(engine.drain_events().is_empty());

    // Nor does it leak into the next match
    engine.start_solo().unwrap();
    assert_eq!(engine.complete_roll(ticket, die(6)), Err(GameError::StaleTicket));
    assert_eq!(engine.snapshot().local_score, 0);
}

#[test]
fn test_solo_always_terminates_won() {
    for seed in 0..50 {
        let mut die_source = RandomTurnSource::seeded(seed);
        let mut engine = RaceEngine::new(me(), RaceSettings::default());
        engine.start_solo().unwrap();

        let mut rolls = 0;
        while engine.status() == MatchStatus::InProgress {
            let value = die_source.next_roll().unwrap();
            engine.roll_die(Actor::Local, value).unwrap();
            rolls += 1;
            assert!(rolls <= 50, "a solo race needs at most 50 rolls");
        }
        assert_eq!(engine.status(), MatchStatus::Won);
    }
}

#[test]
fn test_inbound_invite_flow() {
    let mut engine = RaceEngine::new(me(), RaceSettings::default());
    let omar = Player::new("omar_k", "Omar", "");
    let from_sara = engine.receive_invite(sara()).unwrap();
    let from_omar = engine.receive_invite(omar).unwrap();
    assert_eq!(engine.inbound_invites().len(), 2);

    let declined = engine.decline_invite(from_omar.id).unwrap();
    assert_eq!(declined.status, InviteStatus::Declined);

    engine.accept_invite(from_sara.id).unwrap();
    assert_eq!(engine.status(), MatchStatus::InProgress);
    assert!(engine.inbound_invites().is_empty());
    assert_eq!(engine.snapshot().opponent.unwrap().display_name, "Sara");

    let lines: Vec<String> = engine.drain_events().iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Sara challenged you",
            "Omar challenged you",
            "declined Omar's challenge",
            "race against Sara to 50 started",
        ]
    );
}

#[test]
fn test_abandon_pending_challenge() {
    let mut engine = RaceEngine::new(me(), RaceSettings::default());
    let invite = engine.send_invite(sara()).unwrap();
    engine.return_to_lobby().unwrap();
    assert_eq!(engine.status(), MatchStatus::Lobby);
    assert_eq!(
        engine.resolve_outbound_invite(invite.id),
        Err(GameError::NotAwaitingInvite)
    );
}

#[test]
fn test_custom_target() {
    let mut engine = RaceEngine::new(me(), RaceSettings::new(10, 100, 200, 2));
    engine.start_solo().unwrap();
    engine.roll_die(Actor::Local, die(6)).unwrap();
    engine.roll_die(Actor::Local, die(1)).unwrap();
    engine.roll_die(Actor::Local, die(2)).unwrap();
    assert_eq!(engine.snapshot().log.len(), 2);
    assert_eq!(engine.roll_die(Actor::Local, die(1)).unwrap(), Outcome::Won);
    assert_eq!(engine.take_reward().unwrap().amount, 100);
}
