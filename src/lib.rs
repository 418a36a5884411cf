//! Bug Slayer - Turn-Based RPG Resolution Core
//!
//! This library is the rules engine: combat resolution, statuses, enemy
//! AI, tech debt, progression and saves. It renders nothing and owns no
//! event loop; a front end drives it through `Battle` and reads back
//! structured events.

pub mod battle;
pub mod character;
pub mod constants;
pub mod data;
pub mod effects;
pub mod enemy_ai;
pub mod errors;
pub mod formulas;
pub mod inventory;
pub mod monster;
pub mod progression;
pub mod save;
pub mod skills;
pub mod tech_debt;
