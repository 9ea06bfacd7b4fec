/*!
Assumptions, and the recovery of their provenance.

# Overview

A check may be made under *assumptions*, which are formulas (terms) given by the caller for the duration of the check.
In addition, the guard of each [conditional assertion](GenericContext::assert_conditional) is assumed during every check.

Each assumption is lowered as the *dependency* of its own formula in a fresh goal.
After lowering, each assumption with a literal is recorded in the [DepMap] of the context, which maps terms to literals and literals to terms.
The map is cleared at the start of each lowering of assumptions, as indicator clauses may have been removed by a pop.

The literals passed to the engine are then:
- The literal of each caller assumption, in order, skipping any assumption without a literal (e.g. the assumption `true`).
- The literal of each guard.

When weights are given, the weights of skipped assumptions are skipped too, and each guard has an infinite weight.

The map is used in reverse to translate cores and premises of consequences back to the assumptions of the caller.
*/

use std::collections::HashMap;

use crate::{
    context::GenericContext,
    engine::BooleanEngine,
    misc::log::targets,
    reports::Report,
    structures::{goal::Goal, literal::CLiteral, term::Term},
};

/// A bidirectional map between assumptions and literals of the engine.
#[derive(Clone, Debug, Default)]
pub struct DepMap {
    entries: Vec<(Term, CLiteral)>,
    term_to_literal: HashMap<Term, CLiteral>,
    literal_to_term: HashMap<CLiteral, Term>,
}

impl DepMap {
    /// Records the literal of an assumption, if the assumption has no literal.
    pub fn insert(&mut self, term: Term, literal: CLiteral) {
        if self.term_to_literal.contains_key(&term) {
            return;
        }
        self.entries.push((term, literal));
        self.term_to_literal.insert(term, literal);
        self.literal_to_term.entry(literal).or_insert(term);
    }

    pub fn literal_of(&self, term: Term) -> Option<CLiteral> {
        self.term_to_literal.get(&term).copied()
    }

    pub fn term_of(&self, literal: CLiteral) -> Option<Term> {
        self.literal_to_term.get(&literal).copied()
    }

    /// An iterator over assumptions and their literals, in order of insertion.
    pub fn iter(&self) -> impl Iterator<Item = (Term, CLiteral)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.term_to_literal.clear();
        self.literal_to_term.clear();
    }
}

impl<E: BooleanEngine> GenericContext<E> {
    /// Lowers the given assumptions and each guard, and records the literals to be assumed.
    ///
    /// If there are no assumptions and no guards, nothing is lowered.
    pub fn internalize_assumptions(&mut self, assumptions: &[Term], weights: Option<&[f64]>) -> Report {
        self.dep_map.clear();
        self.assumption_literals.clear();
        self.weights.clear();

        if assumptions.is_empty() && self.formula_log.assumption_count() == 0 {
            return Report::Satisfiable;
        }

        let mut goal = Goal::default();
        for assumption in assumptions {
            goal.push(&mut self.terms, *assumption, Some(*assumption));
        }
        for guard in self.formula_log.assumptions() {
            goal.push(&mut self.terms, *guard, Some(*guard));
        }

        let report = self.internalize_goal(goal);
        if report != Report::Satisfiable {
            return report;
        }

        self.extract_assumptions(assumptions, weights);
        log::trace!(target: targets::LOWERING, "Assumption literals: {:?}", self.assumption_literals);
        Report::Satisfiable
    }

    /// The literals of the assumptions and the guards, in order, with the weights of each.
    fn extract_assumptions(&mut self, assumptions: &[Term], weights: Option<&[f64]>) {
        for (index, assumption) in assumptions.iter().enumerate() {
            let Some(literal) = self.dep_map.literal_of(*assumption) else {
                continue;
            };
            self.assumption_literals.push(literal);
            if let Some(weights) = weights {
                self.weights.push(weights.get(index).copied().unwrap_or_default());
            }
        }

        for guard in self.formula_log.assumptions() {
            let Some(literal) = self.dep_map.literal_of(*guard) else {
                continue;
            };
            self.assumption_literals.push(literal);
            if weights.is_some() {
                self.weights.push(f64::INFINITY);
            }
        }
    }

    /// The literals assumed during the most recent check.
    pub fn assumption_literals(&self) -> &[CLiteral] {
        &self.assumption_literals
    }

    /// The dependency map of the most recent check.
    pub fn dep_map(&self) -> &DepMap {
        &self.dep_map
    }
}

#[cfg(test)]
mod dep_map_tests {
    use super::*;
    use crate::structures::{literal::Literal, term::TermManager};

    #[test]
    fn first_entry_kept() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");

        let mut map = DepMap::default();
        map.insert(p, CLiteral::new(1, true));
        map.insert(p, CLiteral::new(2, true));
        map.insert(q, CLiteral::new(3, false));

        assert_eq!(map.len(), 2);
        assert_eq!(map.literal_of(p), Some(CLiteral::new(1, true)));
        assert_eq!(map.term_of(CLiteral::new(3, false)), Some(q));
        assert_eq!(map.term_of(CLiteral::new(3, true)), None);
        assert_eq!(map.iter().map(|(term, _)| term).collect::<Vec<_>>(), vec![p, q]);

        map.clear();
        assert!(map.is_empty());
    }
}
