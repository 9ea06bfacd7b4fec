//! Key structures, such as terms, literals, and clauses.
//!
//! Structures fall into two vocabularies:
//!
//! - The vocabulary of the caller: [terms](term), [goals](goal) of terms, and [models](model) over declarations.
//! - The vocabulary of the boolean engine: [atoms](atom), [literals](literal), [clauses](clause), and [valuations](valuation).
//!
//! Much of the library is concerned with translating between the two.
//!
//! ## Formulas
//!
//! A formula is a term of boolean sort.
//! Formulas are lowered to a set of [clauses](clause), interpreted as the conjunction of those clauses, which is equisatisfiable with the formula.

pub mod atom;
pub mod clause;
pub mod goal;
pub mod literal;
pub mod model;
pub mod term;
pub mod valuation;
