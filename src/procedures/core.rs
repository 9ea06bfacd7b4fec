/*!
Unsatisfiable cores, as assumptions.

The core of the engine is a collection of literals.
Each literal is translated back to the assumption (or guard) it was recorded for in the [DepMap](crate::procedures::assumptions::DepMap) of the context.

A literal without an assumption indicates some defect in the lowering of assumptions, and is returned as an error.

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
let mut the_context = Context::from_config(Config::default());
let p = the_context.terms_mut().mk_bool_const("p");
let q = the_context.terms_mut().mk_bool_const("q");
let r = the_context.terms_mut().mk_bool_const("r");
let not_p = the_context.terms_mut().mk_not(p);

assert_eq!(the_context.check(&[q, p, r, not_p]), Ok(Report::Unsatisfiable));

let mut core = the_context.unsat_core().to_vec();
core.sort();
let mut expected = vec![p, not_p];
expected.sort();
assert_eq!(core, expected);
```
*/

use crate::{
    context::GenericContext,
    engine::BooleanEngine,
    misc::log::targets,
    structures::{literal::Literal, term::Term},
    types::err::{self, ErrorKind},
};

impl<E: BooleanEngine> GenericContext<E> {
    /// The core of the most recent check, if unsatisfiable, and otherwise an empty core.
    pub fn unsat_core(&self) -> &[Term] {
        &self.core
    }

    /// Translates the core of the engine to assumptions.
    pub(crate) fn extract_core(&mut self) -> Result<(), ErrorKind> {
        self.core.clear();
        for literal in self.engine.core() {
            match self.dep_map.term_of(*literal) {
                Some(term) => self.core.push(term),
                None => {
                    log::error!(target: targets::CORE, "No assumption for core literal {literal}");
                    self.core.clear();
                    return Err(err::ConsistencyError::UnresolvedLiteral(literal.as_int()).into());
                }
            }
        }
        log::trace!(target: targets::CORE, "Core: {}", self.terms.display_all(&self.core));
        Ok(())
    }
}
