//! Databases for holding information which persists across checks.
//!
//! - [The atom map](crate::db::atom_map)
//!   + A bidirectional map between boolean terms and atoms of the engine.
//! - [The formula log](crate::db::formula_log)
//!   + The asserted formulas and scoped assumptions of a context, with a record of how much of the log has been lowered.
//!
//! Both databases are scope-aware, and each [scope marker](crate::db::formula_log::ScopeMarker) records the size of each database when the scope was opened.

pub mod atom_map;
pub mod formula_log;
