/*!
The formula log, aka. a record of each formula asserted to a context.

The log contains two sequences of terms:
- The *formulas* asserted to the context.
- The *assumptions*, which are the guards of conditional assertions.
  Each assumption is assumed during every check, as a leaf dependency, so that a core may name the guard of any conditional assertion used to derive unsatisfiability.

The log also records the length of the prefix of formulas which have been lowered to clauses of the engine.
Formulas outside of the prefix are *pending*, and are lowered on the next check.

# Scopes

A scope is opened with [push_scope](FormulaLog::push_scope), which records a [ScopeMarker] of the current lengths of the log, the lowered prefix, and the (external) checkpoints of the atom map and model converters.
Popping a scope restores each length of the marker.

As the lowered prefix is restored, formulas lowered while a scope was open are pending once again after the scope is popped.
The clauses of such formulas are removed from the engine when the engine scope is popped, and so the formulas are lowered again on the next check.

```rust
# use otter_inc::db::formula_log::FormulaLog;
# use otter_inc::structures::term::TermManager;
let mut terms = TermManager::default();
let p = terms.mk_bool_const("p");
let q = terms.mk_bool_const("q");

let mut log = FormulaLog::default();
log.assert_formula(p);
log.push_scope(0, 0);
log.assert_formula(q);
log.mark_lowered();
assert!(log.pending().is_empty());

let marker = log.pop_scopes(3).unwrap();
assert_eq!(marker.formula_count, 1);
assert_eq!(log.pending(), &[p]);
assert_eq!(log.depth(), 0);
```
*/

use crate::structures::term::Term;

/// The lengths and checkpoints of a context when a scope was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeMarker {
    pub formula_count: usize,
    pub assumption_count: usize,
    pub lowered_prefix: usize,

    /// The size of the [atom map](crate::db::atom_map).
    pub atom_map_checkpoint: usize,

    /// The length of the chain of persistent [model converters](crate::pipeline::converters).
    pub converter_checkpoint: usize,
}

/// The formulas and assumptions of a context.
#[derive(Clone, Debug, Default)]
pub struct FormulaLog {
    formulas: Vec<Term>,

    assumptions: Vec<Term>,

    /// The length of the prefix of formulas which have been lowered.
    lowered_prefix: usize,

    markers: Vec<ScopeMarker>,
}

impl FormulaLog {
    pub fn assert_formula(&mut self, formula: Term) {
        self.formulas.push(formula);
    }

    pub fn assert_assumption(&mut self, assumption: Term) {
        self.assumptions.push(assumption);
    }

    pub fn formulas(&self) -> &[Term] {
        &self.formulas
    }

    pub fn assumptions(&self) -> &[Term] {
        &self.assumptions
    }

    pub fn formula(&self, index: usize) -> Option<Term> {
        self.formulas.get(index).copied()
    }

    pub fn assumption(&self, index: usize) -> Option<Term> {
        self.assumptions.get(index).copied()
    }

    pub fn formula_count(&self) -> usize {
        self.formulas.len()
    }

    pub fn assumption_count(&self) -> usize {
        self.assumptions.len()
    }

    pub fn lowered_prefix(&self) -> usize {
        self.lowered_prefix
    }

    /// The formulas which have not been lowered.
    pub fn pending(&self) -> &[Term] {
        &self.formulas[self.lowered_prefix..]
    }

    /// Notes every formula of the log has been lowered.
    pub fn mark_lowered(&mut self) {
        self.lowered_prefix = self.formulas.len();
    }

    /// The count of open scopes.
    pub fn depth(&self) -> usize {
        self.markers.len()
    }

    /// Opens a scope, with the given external checkpoints.
    pub fn push_scope(&mut self, atom_map_checkpoint: usize, converter_checkpoint: usize) {
        self.markers.push(ScopeMarker {
            formula_count: self.formulas.len(),
            assumption_count: self.assumptions.len(),
            lowered_prefix: self.lowered_prefix,
            atom_map_checkpoint,
            converter_checkpoint,
        });
    }

    /// Pops at most `count` scopes, restoring the log to the state it was in when the outermost of the scopes was opened.
    ///
    /// Returns the marker of the outermost scope popped, from which external checkpoints may be restored, or nothing if no scope was open.
    pub fn pop_scopes(&mut self, count: usize) -> Option<ScopeMarker> {
        let mut outermost = None;
        for _ in 0..count {
            let Some(marker) = self.markers.pop() else {
                break;
            };
            self.formulas.truncate(marker.formula_count);
            self.assumptions.truncate(marker.assumption_count);
            self.lowered_prefix = marker.lowered_prefix;
            outermost = Some(marker);
        }
        outermost
    }
}
