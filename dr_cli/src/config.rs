//! Terminal driver configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use dice_race::{ArenaConfig, Player};
use std::path::PathBuf;

/// `--help` output, covering every flag and variable read below.
pub const HELP: &str = "\
Race to a target score with dice, solo or against a challenger

USAGE:
  dr_cli [OPTIONS]

OPTIONS:
  --player     ID          Local player ID             [default: env DICE_PLAYER_ID or me]
  --profile    PATH        Profile snapshot file       [default: env DICE_PROFILE_PATH or in-memory]
  --seed       N           Seed for dice and opponents [default: env DICE_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DICE_PLAYER_ID           Local player ID (default: me)
  DICE_DISPLAY_NAME        Local display name (default: the player ID)
  DICE_AVATAR              Local avatar URL (default: generated from the player ID)
  DICE_PROFILE_PATH        Profile snapshot file (default: in-memory)
  DICE_SEED                Seed for dice and opponents (default: random)
  DICE_TARGET_SCORE        Score that ends a race (default: 50)
  DICE_SOLO_REWARD         Points for a solo win (default: 5000)
  DICE_CHALLENGE_REWARD    Points for a challenge win (default: 10000)
  DICE_ROLL_ANIMATION_MS   Roll animation length (default: 800)
  DICE_OPPONENT_INTERVAL_MS  Opponent roll cadence (default: 1500)
  DICE_INVITE_DELAY_MS     Challenge acceptance delay (default: 2000)
  DICE_INBOUND_INVITE_MS   Simulated incoming challenge cadence (default: off)
  DICE_TURN_LOG            Turn log lines kept per match (default: 4)
  DICE_INBOX_CAPACITY      Arena message queue size (default: 100)
  RUST_LOG                 Log filter (default: info)
";

/// Complete driver configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Local player ID
    pub player_id: String,
    /// Local display name
    pub display_name: String,
    /// Local avatar URL
    pub avatar: String,
    /// Profile snapshot file; in-memory when `None`
    pub profile_path: Option<PathBuf>,
    /// Arena timing and reward settings
    pub arena: ArenaConfig,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `player_override` - Optional player ID override (from CLI args)
    /// * `profile_path_override` - Optional profile file override (from CLI args)
    /// * `seed_override` - Optional RNG seed override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<CliConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Unparsable` if any set variable cannot be parsed
    pub fn from_env(
        player_override: Option<String>,
        profile_path_override: Option<PathBuf>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let player_id = player_override
            .or_else(|| std::env::var("DICE_PLAYER_ID").ok())
            .unwrap_or_else(|| "me".to_string());
        let display_name = std::env::var("DICE_DISPLAY_NAME").unwrap_or_else(|_| player_id.clone());
        let avatar = std::env::var("DICE_AVATAR").unwrap_or_else(|_| {
            format!("https://avatar.iran.liara.run/public?username={player_id}")
        });

        let profile_path = profile_path_override
            .or_else(|| std::env::var("DICE_PROFILE_PATH").ok().map(PathBuf::from));

        let defaults = ArenaConfig::default();
        let arena = ArenaConfig {
            target_score: parse_env_or("DICE_TARGET_SCORE", defaults.target_score)?,
            solo_reward: parse_env_or("DICE_SOLO_REWARD", defaults.solo_reward)?,
            challenge_reward: parse_env_or("DICE_CHALLENGE_REWARD", defaults.challenge_reward)?,
            turn_log_retention: parse_env_or("DICE_TURN_LOG", defaults.turn_log_retention)?,
            roll_animation_ms: parse_env_or("DICE_ROLL_ANIMATION_MS", defaults.roll_animation_ms)?,
            opponent_roll_interval_ms: parse_env_or(
                "DICE_OPPONENT_INTERVAL_MS",
                defaults.opponent_roll_interval_ms,
            )?,
            invite_response_delay_ms: parse_env_or(
                "DICE_INVITE_DELAY_MS",
                defaults.invite_response_delay_ms,
            )?,
            inbound_invite_interval_ms: parse_env_opt("DICE_INBOUND_INVITE_MS")?,
            rng_seed: match seed_override {
                Some(seed) => Some(seed),
                None => parse_env_opt("DICE_SEED")?,
            },
            inbox_capacity: parse_env_or("DICE_INBOX_CAPACITY", defaults.inbox_capacity)?,
        };

        Ok(CliConfig {
            player_id,
            display_name,
            avatar,
            profile_path,
            arena,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "DICE_PLAYER_ID".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.arena.target_score == 0 {
            return Err(ConfigError::Invalid {
                var: "DICE_TARGET_SCORE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.arena.challenge_reward <= self.arena.solo_reward {
            return Err(ConfigError::Invalid {
                var: "DICE_CHALLENGE_REWARD".to_string(),
                reason: format!(
                    "Must be greater than solo reward ({})",
                    self.arena.solo_reward
                ),
            });
        }

        self.arena
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "arena".to_string(),
                reason,
            })
    }

    /// The local player described by this configuration
    pub fn player(&self) -> Player {
        Player::new(&self.player_id, &self.display_name, &self.avatar)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    Unparsable { var: String, value: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    Ok(parse_env_opt(key)?.unwrap_or(default))
}

/// Helper to parse an optional environment variable, rejecting garbage
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    parse_value(key, std::env::var(key).ok())
}

/// Unset or blank is `None`; anything else must parse.
fn parse_value<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Unparsable {
                var: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}
