/*!
Checks of the formulas of a context, under assumptions.

A check:
1. Invalidates any model or core from a previous check, and removes any assignment made by the engine.
2. Lowers each pending formula, and then the assumptions of the check together with each guard.
3. Checks the clauses of the engine under the literals of the assumptions.

If some lowering returns unknown, the check returns unknown and the reason for unknown is the reason given by lowering.
Likewise, if the engine returns unknown the reason is the reason given by the engine.

On a satisfiable (unweighted) check with assumptions, each assumption literal is verified to be true on the model of the engine.
On an unsatisfiable check with assumptions, the core of the engine is translated back to assumptions, and may be read with [unsat_core](GenericContext::unsat_core).

# Weighted checks
A weighted check may drop assumptions, at the cost of the weight of each dropped assumption.
The check is unsatisfiable only if the total cost exceeds the max weight.
Guards are never dropped, as each guard has an infinite weight.

Cores of weighted checks are not minimized.

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
let mut the_context = Context::from_config(Config::default());
let p = the_context.terms_mut().mk_bool_const("p");
let not_p = the_context.terms_mut().mk_not(p);

assert_eq!(the_context.check_weighted(&[p, not_p], &[2.0, 1.0], 1.0), Ok(Report::Satisfiable));
assert_eq!(the_context.check_weighted(&[p, not_p], &[2.0, 1.0], 0.5), Ok(Report::Unsatisfiable));
```
*/

use crate::{
    context::{ContextState, GenericContext, DEFAULT_REASON_UNKNOWN},
    engine::BooleanEngine,
    misc::log::targets,
    reports::Report,
    structures::{literal::Literal, term::Term},
    types::err::{self, ErrorKind},
};

impl<E: BooleanEngine> GenericContext<E> {
    /// Checks the formulas of the context under the given assumptions.
    pub fn check(&mut self, assumptions: &[Term]) -> Result<Report, ErrorKind> {
        self.check_core(assumptions, None, 0.0)
    }

    /// Checks the formulas of the context under the given weighted assumptions.
    ///
    /// Weights are matched to assumptions by index, and a missing weight is zero.
    pub fn check_weighted(
        &mut self,
        assumptions: &[Term],
        weights: &[f64],
        max_weight: f64,
    ) -> Result<Report, ErrorKind> {
        let minimize_core = self.config.engine.minimize_core.value;
        if minimize_core {
            let mut engine_config = self.config.engine.clone();
            engine_config.minimize_core.value = false;
            self.engine.update_config(&engine_config);
        }

        let result = self.check_core(assumptions, Some(weights), max_weight);

        if minimize_core {
            self.engine.update_config(&self.config.engine);
        }
        result
    }

    fn check_core(
        &mut self,
        assumptions: &[Term],
        weights: Option<&[f64]>,
        max_weight: f64,
    ) -> Result<Report, ErrorKind> {
        self.note_input();
        self.counters.checks += 1;
        self.engine.pop_to_base_level();

        let report = match self.internalize_formulas() {
            Report::Satisfiable => self.internalize_assumptions(assumptions, weights),
            other => other,
        };
        if report != Report::Satisfiable {
            return Ok(self.note_unknown());
        }

        log::info!(target: targets::CHECK, "Check with {} assumption literals", self.assumption_literals.len());
        let report = match weights {
            None => self.engine.check(&self.assumption_literals, None, max_weight),
            Some(_) => self
                .engine
                .check(&self.assumption_literals, Some(self.weights.as_slice()), max_weight),
        };

        match report {
            Report::Satisfiable => {
                if weights.is_none() && !self.assumption_literals.is_empty() {
                    self.check_assumptions()?;
                }
                self.state = ContextState::Satisfiable;
            }

            Report::Unsatisfiable => {
                if !self.assumption_literals.is_empty() {
                    self.extract_core()?;
                }
                self.state = ContextState::Unsatisfiable;
            }

            Report::Unknown => {
                let reason = self.engine.unknown_reason().unwrap_or(DEFAULT_REASON_UNKNOWN);
                self.reason_unknown = reason.to_owned();
                return Ok(self.note_unknown());
            }
        }

        log::info!(target: targets::CHECK, "Check: {report}");
        Ok(report)
    }

    /// Verifies each assumption of a satisfiable check is true on the model of the engine.
    fn check_assumptions(&self) -> Result<(), ErrorKind> {
        for (term, literal) in self.dep_map.iter() {
            if self.engine.value_of(literal.atom()) != Some(literal.polarity()) {
                let assumption = self.terms.display(term).to_string();
                log::error!(target: targets::CHECK, "Assumption {assumption} ({literal}) is not true on the model");
                return Err(err::ConsistencyError::AssumptionFalsified(assumption).into());
            }
        }
        Ok(())
    }

    /// Notes an unknown result, for the reason recorded.
    pub(crate) fn note_unknown(&mut self) -> Report {
        self.counters.unknowns += 1;
        self.state = ContextState::Unknown;
        log::info!(target: targets::CHECK, "Unknown: {}", self.reason_unknown);
        Report::Unknown
    }
}

#[cfg(test)]
mod check_tests {
    use super::*;
    use crate::{config::Config, context::Context};

    #[test]
    fn state_follows_checks() {
        let mut context = Context::from_config(Config::default());
        let p = context.terms_mut().mk_bool_const("p");
        let not_p = context.terms_mut().mk_not(p);

        assert_eq!(context.state, ContextState::Input);
        assert_eq!(context.check(&[p]), Ok(Report::Satisfiable));
        assert_eq!(context.state, ContextState::Satisfiable);

        assert_eq!(context.check(&[p, not_p]), Ok(Report::Unsatisfiable));
        assert_eq!(context.state, ContextState::Unsatisfiable);
        assert_eq!(context.report(), Report::Unsatisfiable);

        context.assert_formula(p);
        assert_eq!(context.state, ContextState::Input);
        assert_eq!(context.counters.checks, 2);
    }

    #[test]
    fn guards_are_kept_in_weighted_checks() {
        let mut context = Context::from_config(Config::default());
        let p = context.terms_mut().mk_bool_const("p");
        let not_p = context.terms_mut().mk_not(p);
        let guard = context.terms_mut().mk_bool_const("guard");

        context.assert_conditional(p, guard);
        assert_eq!(context.check_weighted(&[not_p], &[1.0], 2.0), Ok(Report::Satisfiable));
        assert_eq!(context.weights, vec![1.0, f64::INFINITY]);
        assert!(context.config.engine.minimize_core.value);
    }
}
