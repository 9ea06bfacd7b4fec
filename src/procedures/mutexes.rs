/*!
Mutexes, aka. groups of literals of which at most one is true on any model.

Each term given is a boolean constant or the negation of a boolean constant, and is looked up in the atom map of the context.
So, only constants which have been lowered by some previous check are considered, and any other term is skipped.

No formula is lowered when finding mutexes.

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
let mut the_context = Context::from_config(Config::default());
let terms = the_context.terms_mut();
let p = terms.mk_bool_const("p");
let q = terms.mk_bool_const("q");
let not_p = terms.mk_not(p);
let not_q = terms.mk_not(q);
let p_nand_q = terms.mk_or(vec![not_p, not_q]);
the_context.assert_formula(p_nand_q);

assert_eq!(the_context.check(&[]), Ok(Report::Satisfiable));
let (report, mutexes) = the_context.find_mutexes(&[p, q]);
assert_eq!(report, Report::Satisfiable);
assert_eq!(mutexes, vec![vec![p, q]]);
```
*/

use std::collections::HashMap;

use crate::{
    context::GenericContext,
    engine::BooleanEngine,
    misc::log::targets,
    reports::Report,
    structures::{
        literal::{CLiteral, Literal},
        term::Term,
    },
};

impl<E: BooleanEngine> GenericContext<E> {
    /// Groups of the given terms, of which at most one is true on any model.
    pub fn find_mutexes(&mut self, atoms: &[Term]) -> (Report, Vec<Vec<Term>>) {
        let mut literals = Vec::with_capacity(atoms.len());
        let mut literal_to_term: HashMap<CLiteral, Term> = HashMap::default();

        for term in atoms {
            let (atom_term, polarity) = match self.terms.is_not(*term) {
                Some(inner) => (inner, false),
                None => (*term, true),
            };
            let Some(atom) = self.atom_map.atom_of(atom_term) else {
                log::trace!(target: targets::MUTEX, "Skipped {}", self.terms.display(*term));
                continue;
            };
            let literal = CLiteral::new(atom, polarity);
            literal_to_term.insert(literal, *term);
            literals.push(literal);
        }

        let mutexes = self
            .engine
            .find_mutexes(&literals)
            .into_iter()
            .map(|group| {
                group
                    .iter()
                    .filter_map(|literal| literal_to_term.get(literal).copied())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        log::info!(target: targets::MUTEX, "{} mutexes from {} literals", mutexes.len(), literals.len());
        (Report::Satisfiable, mutexes)
    }
}
