//! Various procedures of a context.
//!
//! For the most part these are methods accessed via a context, and primarily placed here for documentation.

pub mod assumptions;
pub mod check;
pub mod consequences;
pub mod core;
pub mod display;
pub mod internalize;
pub mod model;
pub mod mutexes;
pub mod scope;
pub mod translate;
