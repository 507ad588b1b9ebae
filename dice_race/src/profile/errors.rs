//! Profile store error types.

use thiserror::Error;

use crate::game::constants::Points;

/// Profile store errors
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Reading or writing the snapshot file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No profile stored under this key
    #[error("Profile not found for player {0}")]
    ProfileNotFound(String),

    /// Idempotency key already used
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),

    /// Credits must be positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(Points),

    /// Balance would overflow
    #[error("Balance overflow")]
    BalanceOverflow,
}

impl ProfileError {
    /// Message safe to show a player. Storage details and player ids are
    /// left out.
    pub fn client_message(&self) -> String {
        match self {
            ProfileError::Io(_) | ProfileError::Serialization(_) => {
                "Profile storage unavailable".to_string()
            }
            ProfileError::ProfileNotFound(_) => "Profile not found".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;
