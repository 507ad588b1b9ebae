//! Profile store with an append-only point ledger.

use super::{
    errors::{ProfileError, ProfileResult},
    models::{EntryId, EntryType, LedgerEntry, Profile, StoreSnapshot},
};
use crate::game::{
    constants::Points,
    entities::{Player, PlayerId},
};
use chrono::Utc;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreData {
    profiles: HashMap<PlayerId, Profile>,
    entries: Vec<LedgerEntry>,
    used_keys: HashSet<String>,
    next_entry_id: EntryId,
}

impl StoreData {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let used_keys = snapshot
            .entries
            .iter()
            .map(|e| e.idempotency_key.clone())
            .collect();
        let next_entry_id = snapshot.entries.iter().map(|e| e.id).max().map_or(1, |id| id + 1);
        Self {
            profiles: snapshot
                .profiles
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            entries: snapshot.entries,
            used_keys,
            next_entry_id,
        }
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        let mut profiles: Vec<Profile> = self.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        StoreSnapshot {
            profiles,
            entries: self.entries.clone(),
        }
    }

    /// Snapshot as it will look once `profile` (and `entry`) are applied.
    fn snapshot_with(&self, profile: &Profile, entry: Option<&LedgerEntry>) -> StoreSnapshot {
        let mut profiles: Vec<Profile> = self
            .profiles
            .values()
            .filter(|p| p.id != profile.id)
            .cloned()
            .chain(std::iter::once(profile.clone()))
            .collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        let mut entries = self.entries.clone();
        entries.extend(entry.cloned());
        StoreSnapshot { profiles, entries }
    }
}

/// Profile store
///
/// Cloning is cheap and every clone shares the same data. When opened with a
/// path, each mutation rewrites the JSON snapshot at that path and is only
/// applied in memory once that write succeeds.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    inner: Arc<RwLock<StoreData>>,
    path: Option<PathBuf>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl ProfileStore {
    /// Create a store that is never written to disk
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreData {
                next_entry_id: 1,
                ..StoreData::default()
            })),
            path: None,
        }
    }

    /// Open a store backed by a JSON snapshot file
    ///
    /// # Arguments
    ///
    /// * `path` - Snapshot file; created on the first write if missing
    ///
    /// # Returns
    ///
    /// * `ProfileResult<ProfileStore>` - Store holding the file's contents or error
    pub async fn load(path: impl AsRef<Path>) -> ProfileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)?;
                log::info!(
                    "Loaded {} profiles and {} ledger entries from {}",
                    snapshot.profiles.len(),
                    snapshot.entries.len(),
                    path.display()
                );
                StoreData::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No profile snapshot at {}, starting empty", path.display());
                StoreData {
                    next_entry_id: 1,
                    ..StoreData::default()
                }
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
            path: Some(path),
        })
    }

    /// Snapshot file path, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a profile by player ID
    ///
    /// # Arguments
    ///
    /// * `player_id` - Player ID
    ///
    /// # Returns
    ///
    /// * `ProfileResult<Profile>` - Profile or error
    pub async fn get_profile(&self, player_id: &PlayerId) -> ProfileResult<Profile> {
        self.inner
            .read()
            .await
            .profiles
            .get(player_id)
            .cloned()
            .ok_or_else(|| ProfileError::ProfileNotFound(player_id.to_string()))
    }

    /// Insert or replace a profile under its ID
    pub async fn put_profile(&self, mut profile: Profile) -> ProfileResult<()> {
        let mut data = self.inner.write().await;
        profile.updated_at = Utc::now();
        self.persist(|| data.snapshot_with(&profile, None)).await?;
        log::debug!("Stored profile {}", profile.id);
        data.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Get the profile for `player`, creating an empty one if needed
    pub async fn ensure_profile(&self, player: &Player) -> ProfileResult<Profile> {
        let mut data = self.inner.write().await;
        if let Some(existing) = data.profiles.get(&player.id) {
            return Ok(existing.clone());
        }

        let profile = Profile::from_player(player);
        self.persist(|| data.snapshot_with(&profile, None)).await?;
        log::info!("Created profile for {}", player.id);
        data.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    /// Current point balance
    pub async fn balance(&self, player_id: &PlayerId) -> ProfileResult<Points> {
        Ok(self.get_profile(player_id).await?.points)
    }

    /// Credit points to a player
    ///
    /// # Arguments
    ///
    /// * `player_id` - Player ID
    /// * `amount` - Points to add, must be positive
    /// * `entry_type` - Ledger entry type
    /// * `idempotency_key` - Unique key; a reused key is rejected
    /// * `description` - Optional ledger description
    ///
    /// # Returns
    ///
    /// * `ProfileResult<Points>` - New balance or error
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount` is zero
    /// * `DuplicateTransaction` - `idempotency_key` was already used
    /// * `ProfileNotFound` - No profile for `player_id`
    /// * `BalanceOverflow` - Balance would overflow
    /// * `Io` / `Serialization` - Snapshot write failed; nothing was credited
    pub async fn credit_points(
        &self,
        player_id: &PlayerId,
        amount: Points,
        entry_type: EntryType,
        idempotency_key: String,
        description: Option<String>,
    ) -> ProfileResult<Points> {
        if amount == 0 {
            return Err(ProfileError::InvalidAmount(amount));
        }

        let mut data = self.inner.write().await;
        if data.used_keys.contains(&idempotency_key) {
            return Err(ProfileError::DuplicateTransaction(idempotency_key));
        }

        let mut profile = data
            .profiles
            .get(player_id)
            .cloned()
            .ok_or_else(|| ProfileError::ProfileNotFound(player_id.to_string()))?;
        let new_balance = profile
            .points
            .checked_add(amount)
            .ok_or(ProfileError::BalanceOverflow)?;
        profile.points = new_balance;
        profile.updated_at = Utc::now();

        let entry = LedgerEntry {
            id: data.next_entry_id,
            player_id: player_id.clone(),
            amount,
            balance_after: new_balance,
            entry_type,
            idempotency_key,
            description,
            created_at: Utc::now(),
        };
        self.persist(|| data.snapshot_with(&profile, Some(&entry))).await?;

        data.next_entry_id += 1;
        data.used_keys.insert(entry.idempotency_key.clone());
        data.profiles.insert(profile.id.clone(), profile);
        data.entries.push(entry);
        log::info!("Credited {amount} points to {player_id} ({entry_type}), balance {new_balance}");
        Ok(new_balance)
    }

    /// Get ledger entries for a player, newest first
    ///
    /// # Arguments
    ///
    /// * `player_id` - Player ID
    /// * `limit` - Maximum number of entries
    pub async fn entries(&self, player_id: &PlayerId, limit: usize) -> Vec<LedgerEntry> {
        self.inner
            .read()
            .await
            .entries
            .iter()
            .rev()
            .filter(|e| &e.player_id == player_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Whether an idempotency key has been used
    pub async fn has_key(&self, idempotency_key: &str) -> bool {
        self.inner.read().await.used_keys.contains(idempotency_key)
    }

    /// Write the snapshot now. A no-op for in-memory stores.
    pub async fn save(&self) -> ProfileResult<()> {
        let data = self.inner.read().await;
        self.persist(|| data.to_snapshot()).await
    }

    async fn persist(&self, snapshot: impl FnOnce() -> StoreSnapshot) -> ProfileResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(&snapshot())?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write then rename so a crash never leaves a truncated snapshot
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}
