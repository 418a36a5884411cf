//! Static game catalog: classes, skills, monsters, items and chapters.
//!
//! Everything in here is immutable data keyed by string identifiers. The
//! core never crashes on a missing key; lookups either return `Option` or
//! degrade to a documented fallback with a warning log.

pub mod chapters;
pub mod classes;
pub mod items;
pub mod monsters;
pub mod skills;
