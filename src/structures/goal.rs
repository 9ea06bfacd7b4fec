/*!
Goals, aka. the unit of work of the [pipeline](crate::pipeline).

A goal is a conjunction of formulas, each of which may be paired with a *dependency*.
A dependency is the (caller) term whose assumption is responsible for the formula, and dependencies are used to recover the provenance of [assumptions](crate::procedures::assumptions) after lowering.

When a formula is pushed to a goal:
- A top-level conjunction is split into its conjuncts.
- A top-level negated disjunction is split into the negations of its disjuncts.
- The formula `true` is dropped.

In each case, any dependency of the formula is kept by every part of the formula.

```rust
# use otter_inc::structures::term::TermManager;
# use otter_inc::structures::goal::Goal;
let mut terms = TermManager::default();
let p = terms.mk_bool_const("p");
let q = terms.mk_bool_const("q");
let p_or_q = terms.mk_or(vec![p, q]);
let top = terms.mk_true();
let nested = terms.mk_and(vec![p, top, p_or_q]);

let mut goal = Goal::default();
goal.push(&mut terms, nested, None);

assert_eq!(goal.len(), 2);
```
*/

use crate::structures::term::{Term, TermKind, TermManager};

/// A formula of a goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoalFormula {
    pub formula: Term,
    pub dependency: Option<Term>,
}

/// A conjunction of formulas.
#[derive(Clone, Debug, Default)]
pub struct Goal {
    formulas: Vec<GoalFormula>,
}

impl Goal {
    /// Adds a formula to the goal, splitting conjunctions.
    pub fn push(&mut self, terms: &mut TermManager, formula: Term, dependency: Option<Term>) {
        let mut todo = vec![(formula, true)];
        while let Some((formula, polarity)) = todo.pop() {
            match (terms.kind(formula), polarity) {
                (TermKind::True, true) | (TermKind::False, false) => {}

                (TermKind::And(args), true) | (TermKind::Or(args), false) => {
                    todo.extend(args.iter().rev().map(|arg| (*arg, polarity)))
                }

                (TermKind::Not(inner), _) => todo.push((*inner, !polarity)),

                (_, true) => self.formulas.push(GoalFormula {
                    formula,
                    dependency,
                }),

                (_, false) => {
                    let negation = terms.mk_not(formula);
                    self.formulas.push(GoalFormula {
                        formula: negation,
                        dependency,
                    })
                }
            }
        }
    }

    /// Adds a formula to the goal as is, without splitting.
    pub fn push_unsplit(&mut self, formula: Term, dependency: Option<Term>) {
        self.formulas.push(GoalFormula {
            formula,
            dependency,
        })
    }

    pub fn formulas(&self) -> &[GoalFormula] {
        &self.formulas
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

impl IntoIterator for Goal {
    type Item = GoalFormula;
    type IntoIter = std::vec::IntoIter<GoalFormula>;

    fn into_iter(self) -> Self::IntoIter {
        self.formulas.into_iter()
    }
}

#[cfg(test)]
mod goal_tests {
    use super::*;

    #[test]
    fn negated_disjunction_split() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let a = terms.mk_bool_const("a");
        let p_or_q = terms.mk_or(vec![p, q]);
        let not_p_or_q = terms.mk_not(p_or_q);

        let mut goal = Goal::default();
        goal.push(&mut terms, not_p_or_q, Some(a));

        let not_p = terms.mk_not(p);
        let not_q = terms.mk_not(q);
        assert_eq!(
            goal.formulas(),
            &[
                GoalFormula {
                    formula: not_p,
                    dependency: Some(a)
                },
                GoalFormula {
                    formula: not_q,
                    dependency: Some(a)
                }
            ]
        );
    }

    #[test]
    fn double_negation() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let not_p = terms.mk_not(p);
        let not_not_p = terms.mk_not(not_p);

        let mut goal = Goal::default();
        goal.push(&mut terms, not_not_p, None);
        assert_eq!(goal.formulas()[0].formula, p);
    }

    #[test]
    fn bottom_is_kept() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let bottom = terms.mk_false();
        let p_and_bottom = terms.mk_and(vec![p, bottom]);

        let mut goal = Goal::default();
        goal.push(&mut terms, p_and_bottom, None);
        assert!(goal.formulas().iter().any(|f| f.formula == bottom));
    }
}
