/*!
Reports for the context.

A [Report] is the result of a check, and [Statistics] are counts collected by a context, its pipeline, and its engine.
*/

use crate::context::ContextState;

mod statistics;
pub use statistics::Statistics;

/// High-level reports regarding a check.
#[derive(PartialEq, Eq, Clone, Copy, Debug, serde::Serialize)]
pub enum Report {
    /// The formula of the context is satisfiable (under the given assumptions).
    Satisfiable,

    /// The formula of the context is unsatisfiable (under the given assumptions).
    Unsatisfiable,

    /// Satisfiability of the formula of the context is unknown, for some reason.
    Unknown,
}

impl From<&ContextState> for Report {
    fn from(value: &ContextState) -> Self {
        match value {
            ContextState::Input | ContextState::Unknown => Self::Unknown,
            ContextState::Satisfiable => Self::Satisfiable,
            ContextState::Unsatisfiable => Self::Unsatisfiable,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
