//! Clauses, aka. a collection of literals, interpreted as the disjunction of those literals.
//!
//! The canonical representation of a clause is as a vector of literals.
//!
//! ```rust
//! # use otter_inc::structures::literal::{CLiteral, Literal};
//! # use otter_inc::structures::clause::Clause;
//! let clause = vec![CLiteral::new(23, true),
//!                   CLiteral::new(41, false),
//!                   CLiteral::new(3,  false)];
//!
//! assert_eq!(clause.size(), 3);
//! assert_eq!(clause.as_dimacs(true), "23 -41 -3 0");
//! ```
//!
//! - The empty clause is always false (never true).
//! - Single literals are identified with the clause containing that literal (aka. a 'unit' clause --- where the 'unit' is the literal).

use crate::structures::{
    atom::TOP_ATOM,
    literal::{CLiteral, Literal},
};

/// The clause trait.
pub trait Clause {
    /// A string of the clause in DIMACS form, with the terminating `0` as optional.
    fn as_dimacs(&self, zero: bool) -> String;

    /// An iterator over all literals in the clause, order is not guaranteed.
    fn literals(&self) -> impl Iterator<Item = &CLiteral>;

    /// The number of literals in the clause.
    fn size(&self) -> usize;
}

/// The implementation of a clause as a vector of literals.
pub type VClause = Vec<CLiteral>;

/// The canonical implementation of a clause.
pub type CClause = VClause;

impl Clause for VClause {
    fn as_dimacs(&self, zero: bool) -> String {
        let mut the_string = self
            .iter()
            .map(|literal| literal.as_int().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if zero {
            if !the_string.is_empty() {
                the_string.push(' ');
            }
            the_string.push('0');
        }
        the_string
    }

    fn literals(&self) -> impl Iterator<Item = &CLiteral> {
        self.iter()
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl Clause for CLiteral {
    fn as_dimacs(&self, zero: bool) -> String {
        match zero {
            true => format!("{} 0", self.as_int()),
            false => self.as_int().to_string(),
        }
    }

    fn literals(&self) -> impl Iterator<Item = &CLiteral> {
        std::iter::once(self)
    }

    fn size(&self) -> usize {
        1
    }
}

/// Primarily to distinguish the case where preprocessing results in a tautology.
#[derive(Debug, PartialEq, Eq)]
pub enum Preprocessed {
    Tautology,
    Clause,
}

/// Preprocess a clause to remove duplicate literals and literals on the top atom.
///
/// A clause containing some literal and its negation, or the positive literal of the top atom, is a tautology.
pub fn preprocess_clause(clause: &mut CClause) -> Preprocessed {
    let mut index = 0;
    let mut max = clause.len();
    'clause_loop: loop {
        if index == max {
            break;
        }
        let literal = clause[index];

        if literal.atom() == TOP_ATOM {
            match literal.polarity() {
                true => return Preprocessed::Tautology,
                false => {
                    clause.swap_remove(index);
                    max -= 1;
                    continue 'clause_loop;
                }
            }
        }

        for other_literal in clause.iter().take(index) {
            if other_literal.atom() == literal.atom() {
                if other_literal.polarity() == literal.polarity() {
                    clause.swap_remove(index);
                    max -= 1;
                    continue 'clause_loop;
                } else {
                    return Preprocessed::Tautology;
                }
            }
        }
        index += 1
    }

    Preprocessed::Clause
}
