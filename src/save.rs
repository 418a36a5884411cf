//! Save snapshots with a checksummed binary format and an injected store.
//!
//! Byte layout:
//! - Format magic (8 bytes)
//! - Payload length (4 bytes)
//! - Bincode-serialized snapshot (variable length)
//! - SHA256 checksum over the three fields above (32 bytes)
//!
//! Any mismatch (magic, length, checksum, payload) rejects the whole save;
//! there is no partial recovery.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::character::Character;
use crate::constants::{SAVE_MAGIC, SNAPSHOT_VERSION};
use crate::errors::SaveError;
use crate::progression::ProgressionLedger;
use crate::tech_debt::TechDebt;

/// Everything a run needs to resume. Per-encounter state (the active
/// battle, its effects and cooldowns) is deliberately absent: a load
/// resumes at the stage select, never mid-battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub character: Character,
    pub progression: ProgressionLedger,
    pub tech_debt: TechDebt,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(character: Character, progression: ProgressionLedger, tech_debt: TechDebt) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            character,
            progression,
            tech_debt,
            saved_at: Utc::now(),
        }
    }

    /// Human-readable export. Version-checked on the way back in.
    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| SaveError::Malformed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Serializes to the checksummed binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        let payload =
            bincode::serialize(self).map_err(|e| SaveError::Malformed(e.to_string()))?;
        let payload_len = payload.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_MAGIC.to_le_bytes());
        hasher.update(payload_len.to_le_bytes());
        hasher.update(&payload);
        let checksum = hasher.finalize();

        let mut bytes = Vec::with_capacity(12 + payload.len() + 32);
        bytes.extend_from_slice(&SAVE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&payload_len.to_le_bytes());
        bytes.extend_from_slice(&payload);
        bytes.extend_from_slice(&checksum);
        Ok(bytes)
    }

    /// Parses and verifies the checksummed binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        if bytes.len() < 12 + 32 {
            return Err(SaveError::Malformed("save data truncated".to_string()));
        }

        let magic = u64::from_le_bytes(
            bytes[0..8]
                .try_into()
                .map_err(|_| SaveError::Malformed("bad magic field".to_string()))?,
        );
        if magic != SAVE_MAGIC {
            return Err(SaveError::MagicMismatch { expected: SAVE_MAGIC, found: magic });
        }

        let payload_len = u32::from_le_bytes(
            bytes[8..12]
                .try_into()
                .map_err(|_| SaveError::Malformed("bad length field".to_string()))?,
        ) as usize;
        if bytes.len() != 12 + payload_len + 32 {
            return Err(SaveError::Malformed(format!(
                "length field says {} payload bytes, file disagrees",
                payload_len
            )));
        }

        let payload = &bytes[12..12 + payload_len];
        let stored_checksum = &bytes[12 + payload_len..];

        let mut hasher = Sha256::new();
        hasher.update(&bytes[0..12]);
        hasher.update(payload);
        let computed = hasher.finalize();
        if stored_checksum != computed.as_slice() {
            return Err(SaveError::ChecksumMismatch);
        }

        let snapshot: Snapshot =
            bincode::deserialize(payload).map_err(|e| SaveError::Malformed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), SaveError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Storage port for save slots. The engine never touches the filesystem
/// directly; callers inject whichever store fits their platform.
pub trait SaveStore {
    fn save(&mut self, slot: &str, snapshot: &Snapshot) -> Result<(), SaveError>;
    fn load(&self, slot: &str) -> Result<Snapshot, SaveError>;
    fn exists(&self, slot: &str) -> bool;
}

/// In-memory store holding serialized bytes per slot. The round trip goes
/// through the full binary format, so corruption checks apply here too.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, slot: &str, snapshot: &Snapshot) -> Result<(), SaveError> {
        let bytes = snapshot.to_bytes()?;
        self.slots.insert(slot.to_string(), bytes);
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Snapshot, SaveError> {
        let bytes = self.slots.get(slot).ok_or(SaveError::Missing)?;
        Snapshot::from_bytes(bytes)
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }
}
