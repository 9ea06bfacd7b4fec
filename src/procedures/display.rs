/*!
Weighted display, aka. writing the formulas of a context together with weighted assumptions as a WCNF instance.

No check is made.
Instead, for each assumption `a` a fresh indicator `s` is created and `s ⇒ a` is asserted, and the pending formulas are lowered.
The guards of conditional assertions are lowered as on a check.
The clauses of the engine and a unit for each guard are then written as hard clauses, and each indicator as a soft unit with the weight of its assumption.

Each indicator is preceded by a comment line, which pairs the literal of the indicator with its assumption.

The implications are asserted to the context, and so remain after display (within the current scope).

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
let mut the_context = Context::from_config(Config::default());
let p = the_context.terms_mut().mk_bool_const("p");

let mut out = Vec::default();
the_context.display_weighted(&mut out, &[p], &[3]).unwrap();

let wcnf = String::from_utf8(out).unwrap();
assert!(wcnf.contains("p wcnf"));
assert!(wcnf.lines().any(|line| line.starts_with("c ") && line.ends_with(" p")));
assert!(wcnf.lines().any(|line| line.starts_with("3 ")));
```
*/

use crate::{
    context::GenericContext,
    engine::BooleanEngine,
    misc::log::targets,
    reports::Report,
    structures::{
        literal::{CLiteral, Literal},
        term::Term,
    },
    types::err::{ErrorKind, LoweringError},
};

impl<E: BooleanEngine> GenericContext<E> {
    /// Writes the formulas of the context as hard clauses, and the assumptions as soft units with the given weights, in WCNF.
    pub fn display_weighted(
        &mut self,
        out: &mut dyn std::io::Write,
        assumptions: &[Term],
        weights: &[u64],
    ) -> Result<(), ErrorKind> {
        self.note_input();
        self.engine.pop_to_base_level();

        let mut indicators = Vec::with_capacity(assumptions.len());
        for assumption in assumptions {
            let indicator = self.terms.mk_fresh_bool("s");
            let implication = self.terms.mk_implies(indicator, *assumption);
            self.formula_log.assert_formula(implication);
            indicators.push(indicator);
        }

        if self.internalize_formulas() != Report::Satisfiable
            || self.internalize_assumptions(&[], None) != Report::Satisfiable
        {
            return Err(LoweringError::Incomplete(self.reason_unknown.clone()).into());
        }
        let guards = self.assumption_literals.clone();

        let mut literals = Vec::with_capacity(indicators.len());
        let mut soft_weights = Vec::with_capacity(indicators.len());
        for (index, (indicator, assumption)) in indicators.iter().zip(assumptions).enumerate() {
            let Some(atom) = self.atom_map.atom_of(*indicator) else {
                log::trace!(target: targets::LOWERING, "No literal for {}", self.terms.display(*assumption));
                continue;
            };
            let literal = CLiteral::new(atom, true);
            writeln!(out, "c {} {}", literal.as_int(), self.terms.display(*assumption))?;
            literals.push(literal);
            soft_weights.push(weights.get(index).copied().unwrap_or(1));
        }

        self.engine.display_wcnf(out, &guards, &literals, &soft_weights)?;
        Ok(())
    }
}
