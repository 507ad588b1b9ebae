//! Turn sources for race participants.

use enum_dispatch::enum_dispatch;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::game::{constants::DIE_FACES, entities::DieValue};

/// Supplies die values for one side of a race.
#[enum_dispatch]
pub trait TurnSource {
    /// Next die value, or `None` if nothing is available this turn.
    fn next_roll(&mut self) -> Option<DieValue>;
}

/// Uniform die backed by a local RNG.
#[derive(Clone, Debug)]
pub struct RandomTurnSource {
    rng: StdRng,
}

impl Default for RandomTurnSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomTurnSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible die for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    /// Roll once.
    pub fn roll(&mut self) -> DieValue {
        DieValue::from_index(self.rng.random_range(0..DIE_FACES))
    }

    /// Direct access for other random choices tied to the same seed.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl TurnSource for RandomTurnSource {
    fn next_roll(&mut self) -> Option<DieValue> {
        Some(self.roll())
    }
}

/// Die values pushed by a remote participant.
#[derive(Debug)]
pub struct RemoteTurnSource {
    receiver: mpsc::Receiver<DieValue>,
    disconnected: bool,
}

impl RemoteTurnSource {
    /// Whether the sending side has gone away.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl TurnSource for RemoteTurnSource {
    fn next_roll(&mut self) -> Option<DieValue> {
        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.disconnected {
                    log::warn!("Remote opponent feed disconnected");
                    self.disconnected = true;
                }
                None
            }
        }
    }
}

/// Sending half of a remote turn source.
#[derive(Clone, Debug)]
pub struct RemoteTurnFeed {
    sender: mpsc::Sender<DieValue>,
}

impl RemoteTurnFeed {
    pub async fn send(&self, value: DieValue) -> Result<(), String> {
        self.sender
            .send(value)
            .await
            .map_err(|_| "Opponent feed is closed".to_string())
    }

    pub fn try_send(&self, value: DieValue) -> Result<(), String> {
        self.sender.try_send(value).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => "Opponent feed is full".to_string(),
            mpsc::error::TrySendError::Closed(_) => "Opponent feed is closed".to_string(),
        })
    }
}

/// Create a connected feed/source pair buffering up to `capacity` rolls.
#[must_use]
pub fn remote_channel(capacity: usize) -> (RemoteTurnFeed, RemoteTurnSource) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        RemoteTurnFeed { sender },
        RemoteTurnSource {
            receiver,
            disconnected: false,
        },
    )
}

/// Turn source for the opposing side, picked when a challenge starts.
#[enum_dispatch(TurnSource)]
#[derive(Debug)]
pub enum OpponentSource {
    Random(RandomTurnSource),
    Remote(RemoteTurnSource),
}

impl OpponentSource {
    /// A remote peer that has gone away will never roll again.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Remote(remote) if remote.is_disconnected())
    }
}
