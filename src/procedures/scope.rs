/*!
Assertions and scopes.

# Assertions
A formula is asserted with [assert_formula](GenericContext::assert_formula), and is recorded in the formula log of the context.
The formula is not lowered until the next check.

A formula may also be asserted conditionally on a *guard*, with [assert_conditional](GenericContext::assert_conditional).
The guard is assumed during every check, and so the formula is (in effect) asserted, though the formula may appear in an unsatisfiable core through its guard.

# Scopes
A scope is opened with [push](GenericContext::push) and closed with [pop](GenericContext::pop).
Three pieces of state are kept in step:
- The formula log, and the atom map and converters of the context, through the markers of the log.
- The bit-blaster, if built.
- The scopes of the engine.

Popping a scope removes every formula and guard asserted in the scope, and every clause added to the engine in the scope.
Formulas asserted before the scope was opened but lowered inside the scope are pending once more, and are lowered again on the next check.

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
let mut the_context = Context::from_config(Config::default());
let p = the_context.terms_mut().mk_bool_const("p");
let not_p = the_context.terms_mut().mk_not(p);

the_context.assert_formula(p);
the_context.push();
the_context.assert_formula(not_p);
assert_eq!(the_context.check(&[]), Ok(Report::Unsatisfiable));

the_context.pop(1);
assert_eq!(the_context.assertions(), &[p]);
assert_eq!(the_context.check(&[]), Ok(Report::Satisfiable));
```
*/

use crate::{context::GenericContext, engine::BooleanEngine, misc::log::targets, structures::term::Term};

impl<E: BooleanEngine> GenericContext<E> {
    /// Asserts a formula.
    pub fn assert_formula(&mut self, formula: Term) {
        self.note_input();
        self.formula_log.assert_formula(formula);
    }

    /// Asserts `guard ⇒ formula`, and assumes `guard` during each check while the assertion is in scope.
    pub fn assert_conditional(&mut self, formula: Term, guard: Term) {
        self.note_input();
        let conditional = self.terms.mk_implies(guard, formula);
        self.formula_log.assert_assumption(guard);
        self.formula_log.assert_formula(conditional);
    }

    /// Opens a scope.
    pub fn push(&mut self) {
        self.note_input();
        self.formula_log
            .push_scope(self.atom_map.checkpoint(), self.converters.len());
        if let Some(bit_blaster) = self.bit_blaster.as_mut() {
            bit_blaster.push();
        }
        self.engine.user_push();
        log::trace!(target: targets::SCOPE, "Pushed to {}", self.formula_log.depth());
    }

    /// Closes (at most) `count` scopes.
    ///
    /// A count greater than the count of open scopes is clamped to the count of open scopes.
    pub fn pop(&mut self, count: usize) {
        let depth = self.formula_log.depth();
        if count > depth {
            log::info!(target: targets::SCOPE, "Pop of {count} scopes clamped to {depth}");
        }
        let count = count.min(depth);
        if count == 0 {
            return;
        }
        self.note_input();

        if let Some(marker) = self.formula_log.pop_scopes(count) {
            self.atom_map.restore(marker.atom_map_checkpoint);
            self.converters.truncate(marker.converter_checkpoint);
        }
        if let Some(bit_blaster) = self.bit_blaster.as_mut() {
            bit_blaster.pop(count);
        }
        self.engine.user_pop(count);
        log::trace!(target: targets::SCOPE, "Popped to {}", self.formula_log.depth());
    }

    /// The count of open scopes.
    pub fn scope_level(&self) -> usize {
        self.formula_log.depth()
    }

    /// The formulas asserted, including the implications of conditional assertions.
    pub fn assertions(&self) -> &[Term] {
        self.formula_log.formulas()
    }

    pub fn assertion(&self, index: usize) -> Option<Term> {
        self.formula_log.formula(index)
    }

    pub fn assertion_count(&self) -> usize {
        self.formula_log.formula_count()
    }

    /// The guards of conditional assertions.
    pub fn assumptions(&self) -> &[Term] {
        self.formula_log.assumptions()
    }

    pub fn assumption(&self, index: usize) -> Option<Term> {
        self.formula_log.assumption(index)
    }

    pub fn assumption_count(&self) -> usize {
        self.formula_log.assumption_count()
    }
}
