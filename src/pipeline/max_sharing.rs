//! Re-association of chains of associative and commutative bit-vector operators, so that sub-terms already present in the term manager are shared rather than rebuilt.
//!
//! For example, if `(bvadd x y)` exists then `(bvadd (bvadd x z) y)` is rewritten to `(bvadd (bvadd x y) z)`, and the bits of `(bvadd x y)` are blasted once.

use crate::{
    reports::Statistics,
    structures::{
        goal::Goal,
        term::{Term, TermKind, TermManager, TermNode},
    },
    types::err::PipelineFault,
};

use super::{ill_sorted, rewrite_goal, Stage, StageEnv};

#[derive(Clone, Copy, PartialEq, Eq)]
enum AcOperator {
    And,
    Or,
    Xor,
    Add,
}

impl AcOperator {
    fn of(kind: &TermKind) -> Option<(Self, Term, Term)> {
        match kind {
            TermKind::BvAnd(a, b) => Some((AcOperator::And, *a, *b)),
            TermKind::BvOr(a, b) => Some((AcOperator::Or, *a, *b)),
            TermKind::BvXor(a, b) => Some((AcOperator::Xor, *a, *b)),
            TermKind::BvAdd(a, b) => Some((AcOperator::Add, *a, *b)),
            _ => None,
        }
    }

    fn kind(self, a: Term, b: Term) -> TermKind {
        match self {
            AcOperator::And => TermKind::BvAnd(a, b),
            AcOperator::Or => TermKind::BvOr(a, b),
            AcOperator::Xor => TermKind::BvXor(a, b),
            AcOperator::Add => TermKind::BvAdd(a, b),
        }
    }

    fn mk(self, terms: &mut TermManager, a: Term, b: Term) -> Result<Term, crate::types::err::TermError> {
        match self {
            AcOperator::And => terms.mk_bvand(a, b),
            AcOperator::Or => terms.mk_bvor(a, b),
            AcOperator::Xor => terms.mk_bvxor(a, b),
            AcOperator::Add => terms.mk_bvadd(a, b),
        }
    }
}

/// The sharing stage.
#[derive(Default)]
pub struct MaxSharing {
    /// A count of pairs of a chain found to exist.
    shared: u64,
}

/// The leaves of a chain of `operator` rooted at `term`, left to right, and the applications of `operator` which make up the chain.
fn leaves(
    terms: &TermManager,
    operator: AcOperator,
    term: Term,
    leaves_of: &mut Vec<Term>,
    internal: &mut Vec<Term>,
) {
    match AcOperator::of(terms.kind(term)) {
        Some((other, a, b)) if other == operator => {
            internal.push(term);
            leaves(terms, operator, a, leaves_of, internal);
            leaves(terms, operator, b, leaves_of, internal);
        }
        _ => leaves_of.push(term),
    }
}

impl MaxSharing {
    /// Pairs leaves whose application already exists outside of the chain, and then folds whatever remains from the left.
    fn share(&mut self, terms: &mut TermManager, term: Term) -> Result<Term, PipelineFault> {
        let Some((operator, _, _)) = AcOperator::of(terms.kind(term)) else {
            return Ok(term);
        };
        let sort = terms.sort(term);

        let mut chain = Vec::default();
        let mut internal = Vec::default();
        leaves(terms, operator, term, &mut chain, &mut internal);
        if chain.len() <= 2 {
            return Ok(term);
        }

        'pairing: loop {
            for i in 0..chain.len() {
                for j in (i + 1)..chain.len() {
                    let existing = [(chain[i], chain[j]), (chain[j], chain[i])]
                        .into_iter()
                        .filter_map(|(a, b)| {
                            terms.lookup(&TermNode {
                                kind: operator.kind(a, b),
                                sort,
                            })
                        })
                        .find(|existing| !internal.contains(existing));

                    if let Some(existing) = existing {
                        self.shared += 1;
                        chain.remove(j);
                        chain[i] = existing;
                        continue 'pairing;
                    }
                }
            }
            break;
        }

        let mut shared = chain[0];
        for leaf in chain.into_iter().skip(1) {
            shared = operator
                .mk(terms, shared, leaf)
                .map_err(|_| ill_sorted(terms, term))?;
        }
        Ok(shared)
    }
}

impl Stage for MaxSharing {
    fn name(&self) -> &'static str {
        "max_sharing"
    }

    fn apply(&mut self, goal: Goal, env: &mut StageEnv<'_>) -> Result<Vec<Goal>, PipelineFault> {
        let mut rewrite = |terms: &mut TermManager,
                           term: Term,
                           children: Vec<Term>|
         -> Result<Term, PipelineFault> {
            let rebuilt = terms.with_children(term, children);
            self.share(terms, rebuilt)
        };

        Ok(vec![rewrite_goal(goal, env.terms, &mut rewrite)?])
    }

    fn collect_statistics(&self, statistics: &mut Statistics) {
        statistics.update("max_sharing.shared", self.shared);
    }
}
