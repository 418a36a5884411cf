// Character progression constants
pub const LEVEL_CAP: u32 = 20;
pub const BASE_EXP_TO_LEVEL: u64 = 100;
pub const EXP_STEP_PER_LEVEL: u64 = 20;

// Combat formula constants
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const CRIT_CHANCE_BASE: f64 = 10.0;
pub const CRIT_CHANCE_PER_SPD: f64 = 0.5;
pub const CRIT_CHANCE_CAP: f64 = 30.0;
pub const EVASION_PER_SPD_DIFF: f64 = 2.0;
pub const EVASION_CAP: f64 = 50.0;
pub const DEFENSE_SOFTNESS: f64 = 0.7;

// Status effect constants
pub const CONFUSION_SELF_HIT_CHANCE: f64 = 50.0;

// Tech debt constants
pub const TECH_DEBT_MAX: u32 = 100;
pub const DEBT_PER_TURN: u32 = 1;
pub const DEBT_PER_FLEE: u32 = 5;
pub const DEBT_PER_SKIP: u32 = 10;

// Inventory constants
pub const INVENTORY_CAPACITY: usize = 99;

// Mini-game collaborator: only the boolean outcome crosses the boundary,
// these are the fixed consequences applied to the current monster.
pub const MINIGAME_SUCCESS_DAMAGE: u32 = 30;
pub const MINIGAME_FAIL_HEAL: u32 = 15;

// Class unlock tuning
pub const BURST_WINDOW_TURNS: usize = 3;

// Save system constants
pub const SAVE_MAGIC: u64 = 0x4255_4753_4C41_5952; // "BUGSLAYR"
pub const SNAPSHOT_VERSION: u32 = 1;
