//! Error taxonomy for the resolution core.
//!
//! `ActionError` covers illegal actions given the current state; the failed
//! call mutates nothing and the caller can retry with a valid action.
//! `SaveError` covers snapshot loads that must be rejected wholesale.
//! Missing catalog data is neither: lookups degrade to a documented
//! fallback and log a warning instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("not enough MP: need {needed}, have {available}")]
    NotEnoughMp { needed: u32, available: u32 },
    #[error("skill '{skill_id}' is on cooldown for {turns_left} more turn(s)")]
    SkillOnCooldown { skill_id: String, turns_left: u32 },
    #[error("character does not know skill '{0}'")]
    UnknownSkill(String),
    #[error("item '{0}' is not in the inventory")]
    ItemNotOwned(String),
    #[error("item '{0}' cannot be used in battle")]
    ItemNotUsable(String),
    #[error("item '{0}' cannot be equipped")]
    ItemNotEquippable(String),
    #[error("inventory is full")]
    InventoryFull,
    #[error("the battle is already over")]
    BattleOver,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("save magic mismatch: expected {expected:#018X}, found {found:#018X}")]
    MagicMismatch { expected: u64, found: u64 },
    #[error("snapshot checksum verification failed")]
    ChecksumMismatch,
    #[error("malformed snapshot: {0}")]
    Malformed(String),
    #[error("no snapshot present")]
    Missing,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
