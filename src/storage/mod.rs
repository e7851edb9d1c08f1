//! # Storage Module - Progress Persistence Layer
//!
//! Persists per-user fishing progress, per-channel switches, and a simple coin wallet.
//!
//! - [`ProgressStore`] - get/put of [`UserProgress`] records keyed by user id
//! - [`ChannelSwitches`] - per-channel enable flag for the fish command (default on)
//! - [`FishingStore`] - Sled-backed implementation of both, plus a [`CurrencySink`] wallet
//! - [`MemoryStore`] - in-process implementation for embedding and tests
//!
//! Records are bincode-encoded and carry a schema version; a record written by a
//! different schema is reported as [`FishingError::SchemaMismatch`] rather than guessed at.
//! The store performs whole-record writes only. Serializing concurrent updates to one
//! user's record is the caller's job (see `fishing::engine`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::IVec;

use crate::fishing::currency::CurrencySink;
use crate::fishing::errors::FishingError;
use crate::fishing::types::{UserProgress, PROGRESS_SCHEMA_VERSION};

const TREE_PROGRESS: &str = "fishing_progress";
const TREE_CHANNELS: &str = "fishing_channels";
const TREE_WALLETS: &str = "fishing_wallets";
const TREE_LEDGER: &str = "fishing_ledger";

/// Record store for user progress.
pub trait ProgressStore: Send + Sync {
    fn get_progress(&self, user_id: &str) -> Result<Option<UserProgress>, FishingError>;
    fn put_progress(&self, progress: &UserProgress) -> Result<(), FishingError>;
}

/// Per-channel on/off switch for fishing.
pub trait ChannelSwitches: Send + Sync {
    fn channel_enabled(&self, channel: &str) -> Result<bool, FishingError>;
    fn set_channel_enabled(&self, channel: &str, enabled: bool) -> Result<(), FishingError>;
}

/// One credited sale, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub user_id: String,
    pub amount: f64,
    pub memo: String,
    pub at: DateTime<Utc>,
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct FishingStoreBuilder {
    path: PathBuf,
}

impl FishingStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<FishingStore, FishingError> {
        FishingStore::open(self.path)
    }
}

/// Sled-backed persistence for fishing progress, channel switches and wallets.
pub struct FishingStore {
    db: sled::Db,
    progress: sled::Tree,
    channels: sled::Tree,
    wallets: sled::Tree,
    ledger: sled::Tree,
}

impl FishingStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FishingError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let progress = db.open_tree(TREE_PROGRESS)?;
        let channels = db.open_tree(TREE_CHANNELS)?;
        let wallets = db.open_tree(TREE_WALLETS)?;
        let ledger = db.open_tree(TREE_LEDGER)?;
        Ok(Self {
            db,
            progress,
            channels,
            wallets,
            ledger,
        })
    }

    fn progress_key(user_id: &str) -> Vec<u8> {
        format!("progress:{}", user_id).into_bytes()
    }

    fn channel_key(channel: &str) -> Vec<u8> {
        format!("channel:{}", channel.to_ascii_lowercase()).into_bytes()
    }

    fn wallet_key(user_id: &str) -> Vec<u8> {
        format!("wallet:{}", user_id).into_bytes()
    }

    /// `ledger:{byte length}:{user}:` so one user's scan never reaches another id that
    /// merely starts with it.
    fn ledger_prefix(user_id: &str) -> String {
        format!("ledger:{:04}:{}:", user_id.len(), user_id)
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, FishingError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, FishingError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn decode_balance(bytes: Option<&[u8]>) -> f64 {
        match bytes {
            Some(raw) if raw.len() == 8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(raw);
                f64::from_be_bytes(buf)
            }
            _ => 0.0,
        }
    }

    /// List all user ids with a stored progress record.
    pub fn list_user_ids(&self) -> Result<Vec<String>, FishingError> {
        let mut ids = Vec::new();
        for entry in self.progress.scan_prefix(b"progress:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(user_id) = text.strip_prefix("progress:") {
                ids.push(user_id.to_string());
            }
        }
        Ok(ids)
    }

    /// Current coin balance for `user_id` (0 when never credited).
    pub fn balance(&self, user_id: &str) -> Result<f64, FishingError> {
        let raw = self.wallets.get(Self::wallet_key(user_id))?;
        Ok(Self::decode_balance(raw.as_deref()))
    }

    /// Ledger entries for `user_id`, oldest first.
    pub fn ledger_for(&self, user_id: &str) -> Result<Vec<LedgerEntry>, FishingError> {
        let prefix = Self::ledger_prefix(user_id);
        self.ledger
            .scan_prefix(prefix.as_bytes())
            .map(|result| {
                result
                    .map_err(FishingError::from)
                    .and_then(|(_key, value)| Self::deserialize(value))
            })
            .collect()
    }
}

impl ProgressStore for FishingStore {
    fn get_progress(&self, user_id: &str) -> Result<Option<UserProgress>, FishingError> {
        let Some(bytes) = self.progress.get(Self::progress_key(user_id))? else {
            return Ok(None);
        };
        let record: UserProgress = Self::deserialize(bytes)?;
        if record.schema_version != PROGRESS_SCHEMA_VERSION {
            return Err(FishingError::SchemaMismatch {
                entity: "progress",
                expected: PROGRESS_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(Some(record))
    }

    fn put_progress(&self, progress: &UserProgress) -> Result<(), FishingError> {
        let mut record = progress.clone();
        record.schema_version = PROGRESS_SCHEMA_VERSION;
        let bytes = Self::serialize(&record)?;
        self.progress
            .insert(Self::progress_key(&record.user_id), bytes)?;
        self.progress.flush()?;
        Ok(())
    }
}

impl ChannelSwitches for FishingStore {
    fn channel_enabled(&self, channel: &str) -> Result<bool, FishingError> {
        let raw = self.channels.get(Self::channel_key(channel))?;
        Ok(raw.map(|v| v.first().copied() != Some(0)).unwrap_or(true))
    }

    fn set_channel_enabled(&self, channel: &str, enabled: bool) -> Result<(), FishingError> {
        self.channels
            .insert(Self::channel_key(channel), vec![u8::from(enabled)])?;
        self.channels.flush()?;
        Ok(())
    }
}

impl CurrencySink for FishingStore {
    fn credit(&self, user_id: &str, amount: f64, memo: &str) -> Result<(), FishingError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(FishingError::Currency(format!(
                "refusing to credit {} to {}",
                amount, user_id
            )));
        }
        self.wallets
            .update_and_fetch(Self::wallet_key(user_id), |old| {
                let balance = Self::decode_balance(old) + amount;
                Some(balance.to_be_bytes().to_vec())
            })?;
        let entry = LedgerEntry {
            user_id: user_id.to_string(),
            amount,
            memo: memo.to_string(),
            at: Utc::now(),
        };
        // sled ids are unique and increasing, so same-instant credits get distinct keys
        let seq = self.db.generate_id()?;
        let key = format!("{}{:020}", Self::ledger_prefix(user_id), seq).into_bytes();
        self.ledger.insert(key, Self::serialize(&entry)?)?;
        self.wallets.flush()?;
        self.ledger.flush()?;
        Ok(())
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    progress: RwLock<HashMap<String, UserProgress>>,
    channels: RwLock<HashMap<String, bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> FishingError {
    FishingError::Internal("memory store lock poisoned".to_string())
}

impl ProgressStore for MemoryStore {
    fn get_progress(&self, user_id: &str) -> Result<Option<UserProgress>, FishingError> {
        let guard = self.progress.read().map_err(poisoned)?;
        Ok(guard.get(user_id).cloned())
    }

    fn put_progress(&self, progress: &UserProgress) -> Result<(), FishingError> {
        let mut guard = self.progress.write().map_err(poisoned)?;
        guard.insert(progress.user_id.clone(), progress.clone());
        Ok(())
    }
}

impl ChannelSwitches for MemoryStore {
    fn channel_enabled(&self, channel: &str) -> Result<bool, FishingError> {
        let guard = self.channels.read().map_err(poisoned)?;
        Ok(guard
            .get(&channel.to_ascii_lowercase())
            .copied()
            .unwrap_or(true))
    }

    fn set_channel_enabled(&self, channel: &str, enabled: bool) -> Result<(), FishingError> {
        let mut guard = self.channels.write().map_err(poisoned)?;
        guard.insert(channel.to_ascii_lowercase(), enabled);
        Ok(())
    }
}
