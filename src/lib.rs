//! Session Setup: continuity-biased setup generation for board game sessions.
//!
//! Turns fixed catalogs and the previous session into the next one: a
//! player faction, bot opponents, hirelings, a map and landmarks, drawn by
//! weighted sampling without replacement and with no faction appearing in
//! two roles.

pub mod core;
pub mod schema;

pub use crate::core::config::GenerationConfig;
pub use crate::core::generator::{SessionGenerator, SetupError, SetupResult, Stage};
pub use crate::core::random::{RandomSource, ScriptedSource};
pub use crate::schema::catalog::Catalog;
pub use crate::schema::session::SessionRecord;
