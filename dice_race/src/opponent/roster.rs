//! Candidate opponents for challenge invites.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::entities::{Player, PlayerId};

/// Read-only list of players that can be challenged.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Roster {
    candidates: Vec<Player>,
}

impl Roster {
    /// Build a roster, keeping the first entry for any repeated id.
    pub fn new(candidates: Vec<Player>) -> Self {
        let mut unique: Vec<Player> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if unique.iter().any(|p| p.id == candidate.id) {
                log::warn!("Dropping duplicate roster entry {}", candidate.id);
                continue;
            }
            unique.push(candidate);
        }
        Self { candidates: unique }
    }

    /// The stock set of simulated opponents.
    pub fn default_roster() -> Self {
        let entries = [
            ("sara_vip", "Sara", "girl"),
            ("omar_k", "Omar", "boy"),
            ("layla", "Layla", "girl"),
            ("yusuf_7", "Yusuf", "boy"),
            ("nour", "Nour", "girl"),
        ];
        Self::new(
            entries
                .iter()
                .map(|(id, name, kind)| {
                    Player::new(
                        id,
                        name,
                        &format!("https://avatar.iran.liara.run/public/{kind}?username={id}"),
                    )
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Player> {
        self.candidates.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn candidates(&self) -> &[Player] {
        &self.candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Pick any candidate other than `exclude`.
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R, exclude: &PlayerId) -> Option<&Player> {
        let eligible: Vec<&Player> = self.candidates.iter().filter(|p| &p.id != exclude).collect();
        if eligible.is_empty() {
            return None;
        }
        Some(eligible[rng.random_range(0..eligible.len())])
    }
}
