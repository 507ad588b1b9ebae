//! Arena configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::{
    RaceSettings,
    constants::{
        CHALLENGE_REWARD, DEFAULT_TARGET_SCORE, DEFAULT_TURN_LOG_RETENTION, Points, SOLO_REWARD,
    },
};

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Score that ends a race (default: 50)
    pub target_score: u32,

    /// Points for winning a solo race (default: 5,000)
    pub solo_reward: Points,

    /// Points for winning a challenge (default: 10,000)
    pub challenge_reward: Points,

    /// Turn log lines kept per match (default: 4)
    pub turn_log_retention: usize,

    /// How long a roll animates before it lands, in milliseconds
    pub roll_animation_ms: u64,

    /// Cadence of opponent turns, in milliseconds
    pub opponent_roll_interval_ms: u64,

    /// Delay before an outbound challenge is accepted, in milliseconds
    pub invite_response_delay_ms: u64,

    /// Cadence of simulated inbound challenges, disabled when `None`
    pub inbound_invite_interval_ms: Option<u64>,

    /// Seed for the local die and simulated opponents
    pub rng_seed: Option<u64>,

    /// Message inbox capacity
    pub inbox_capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            solo_reward: SOLO_REWARD,
            challenge_reward: CHALLENGE_REWARD,
            turn_log_retention: DEFAULT_TURN_LOG_RETENTION,
            roll_animation_ms: 800,
            opponent_roll_interval_ms: 1500,
            invite_response_delay_ms: 2000,
            inbound_invite_interval_ms: None,
            rng_seed: None,
            inbox_capacity: 100,
        }
    }
}

impl ArenaConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.target_score == 0 {
            return Err("Target score must be positive".to_string());
        }

        if self.solo_reward == 0 {
            return Err("Solo reward must be positive".to_string());
        }

        if self.solo_reward >= self.challenge_reward {
            return Err("Challenge reward must be greater than solo reward".to_string());
        }

        if self.opponent_roll_interval_ms == 0 {
            return Err("Opponent roll interval must be positive".to_string());
        }

        if self.inbound_invite_interval_ms == Some(0) {
            return Err("Inbound invite interval must be positive".to_string());
        }

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be positive".to_string());
        }

        Ok(())
    }

    /// Race rules handed to the engine
    #[must_use]
    pub fn race_settings(&self) -> RaceSettings {
        RaceSettings::new(
            self.target_score,
            self.solo_reward,
            self.challenge_reward,
            self.turn_log_retention,
        )
    }

    pub fn roll_animation(&self) -> Duration {
        Duration::from_millis(self.roll_animation_ms)
    }

    pub fn opponent_roll_interval(&self) -> Duration {
        Duration::from_millis(self.opponent_roll_interval_ms)
    }

    pub fn invite_response_delay(&self) -> Duration {
        Duration::from_millis(self.invite_response_delay_ms)
    }

    pub fn inbound_invite_interval(&self) -> Option<Duration> {
        self.inbound_invite_interval_ms.map(Duration::from_millis)
    }
}
