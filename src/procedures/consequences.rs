/*!
Consequences, aka. the variables fixed by assumptions.

For each variable given, if the value of the variable is fixed on every model of the formulas of the context together with the assumptions, a consequence `premises ⇒ value` is returned.
Here, `premises` is the conjunction of the assumptions the value depends on, and `value` is:
- `v` or `¬v`, for a boolean constant `v`.
- `v = n`, for a bit-vector constant `v` and a numeral `n`.

A variable is covered by atoms of the engine:
- A boolean constant by its own atom.
- A bit-vector constant by the atoms of its bits, if the constant has been blasted.

A variable is fixed only if each covering atom is fixed, and the premises of the variable are the premises of each covering atom.
Variables without covering atoms are skipped.

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
let mut the_context = Context::from_config(Config::default());
let terms = the_context.terms_mut();
let a = terms.mk_bool_const("a");
let p = terms.mk_bool_const("p");
let a_implies_p = terms.mk_implies(a, p);
the_context.assert_formula(a_implies_p);

let (report, consequences) = the_context.consequences(&[a], &[p]).unwrap();
assert_eq!(report, Report::Satisfiable);
assert_eq!(consequences, vec![a_implies_p]);
```
*/

use std::collections::HashMap;

use crate::{
    context::{ContextState, GenericContext, DEFAULT_REASON_UNKNOWN},
    engine::BooleanEngine,
    misc::log::targets,
    reports::Report,
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
        term::{Classification, Term},
    },
    types::err::{self, ErrorKind},
};

impl<E: BooleanEngine> GenericContext<E> {
    /// The consequences of the assumptions for each of the given variables, if satisfiable.
    pub fn consequences(&mut self, assumptions: &[Term], vars: &[Term]) -> Result<(Report, Vec<Term>), ErrorKind> {
        self.note_input();
        self.counters.checks += 1;
        self.engine.pop_to_base_level();

        if self.internalize_formulas() != Report::Satisfiable {
            return Ok((self.note_unknown(), Vec::default()));
        }

        let mut covered = Vec::with_capacity(vars.len());
        let mut atoms = Vec::default();
        for var in vars {
            match self.internalize_var(*var) {
                Some(var_atoms) => {
                    atoms.extend(var_atoms.iter().copied());
                    covered.push((*var, var_atoms));
                }
                None => log::trace!(target: targets::CONSEQUENCES, "Skipped {}", self.terms.display(*var)),
            }
        }
        atoms.sort_unstable();
        atoms.dedup();

        if self.internalize_assumptions(assumptions, None) != Report::Satisfiable {
            return Ok((self.note_unknown(), Vec::default()));
        }

        let mut entries: Vec<CClause> = Vec::default();
        let report = self
            .engine
            .consequences(&self.assumption_literals, &atoms, &mut entries);

        match report {
            Report::Satisfiable => {
                self.state = ContextState::Satisfiable;
                let consequences = self.translate_consequences(&covered, &entries)?;
                log::info!(target: targets::CONSEQUENCES, "{} consequences of {} variables", consequences.len(), vars.len());
                Ok((report, consequences))
            }

            Report::Unsatisfiable => {
                self.state = ContextState::Unsatisfiable;
                if !self.assumption_literals.is_empty() {
                    self.extract_core()?;
                }
                Ok((report, Vec::default()))
            }

            Report::Unknown => {
                let reason = self.engine.unknown_reason().unwrap_or(DEFAULT_REASON_UNKNOWN);
                self.reason_unknown = reason.to_owned();
                Ok((self.note_unknown(), Vec::default()))
            }
        }
    }

    /// Translates entries of the engine to consequences of the covered variables.
    fn translate_consequences(
        &mut self,
        covered: &[(Term, Vec<Atom>)],
        entries: &[CClause],
    ) -> Result<Vec<Term>, ErrorKind> {
        let mut index: HashMap<Atom, usize> = HashMap::default();
        for (position, entry) in entries.iter().enumerate() {
            if let Some(literal) = entry.first() {
                index.insert(literal.atom(), position);
            }
        }

        let mut consequences = Vec::default();
        'var_loop: for (var, atoms) in covered {
            let mut values: Vec<CLiteral> = Vec::with_capacity(atoms.len());
            let mut premises: Vec<Term> = Vec::default();

            for atom in atoms {
                let Some(position) = index.get(atom) else {
                    continue 'var_loop;
                };
                let entry = &entries[*position];
                values.push(entry[0]);

                for premise in &entry[1..] {
                    let Some(term) = self.dep_map.term_of(*premise) else {
                        log::error!(target: targets::CONSEQUENCES, "No assumption for premise {premise}");
                        return Err(err::ConsistencyError::UnresolvedLiteral(premise.as_int()).into());
                    };
                    if !premises.contains(&term) {
                        premises.push(term);
                    }
                }
            }

            let value = match self.terms.classify(*var) {
                Classification::PlainBooleanAtom => match values[0].polarity() {
                    true => *var,
                    false => self.terms.mk_not(*var),
                },

                Classification::BitVectorAtom(width) => {
                    let numeral = self.powers.value_of(values.iter().map(|literal| literal.polarity()));
                    let numeral = self.terms.mk_numeral(numeral, width)?;
                    self.terms.mk_eq(*var, numeral)?
                }

                Classification::Unsupported => continue 'var_loop,
            };

            let premise = self.terms.mk_and(premises);
            consequences.push(self.terms.mk_implies(premise, value));
        }

        Ok(consequences)
    }
}
