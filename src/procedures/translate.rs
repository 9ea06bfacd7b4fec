/*!
Translation of a context to a context over some other term manager.

The translated context has the configuration and the stages of the original context, and the formulas and guards of the original context are asserted to the translated context in order.
Nothing is lowered by translation, and the engine of the translated context is fresh.

Translation is only supported when no scope is open.

```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
# use otter_inc::structures::term::TermManager;
let mut the_context = Context::from_config(Config::default());
let p = the_context.terms_mut().mk_bool_const("p");
the_context.assert_formula(p);

let mut translated = the_context.translate(TermManager::default()).unwrap();
assert_eq!(translated.assertion_count(), 1);
assert_eq!(translated.check(&[]), Ok(Report::Satisfiable));

the_context.push();
assert!(the_context.translate(TermManager::default()).is_err());
```
*/

use std::collections::HashMap;

use crate::{
    context::GenericContext,
    engine::BooleanEngine,
    misc::log::targets,
    structures::term::TermManager,
    types::err::ErrorKind,
};

impl<E: BooleanEngine> GenericContext<E> {
    /// A context over the given term manager, with the formulas and guards of this context.
    pub fn translate(&self, target: TermManager) -> Result<Self, ErrorKind> {
        if self.formula_log.depth() > 0 {
            log::info!(target: targets::SCOPE, "Translation at depth {}", self.formula_log.depth());
            return Err(ErrorKind::InvalidState);
        }

        let mut translated = GenericContext::with_terms(self.config.clone(), target);
        translated.stage_factories = self.stage_factories.clone();

        let mut cache = HashMap::default();
        for formula in self.formula_log.formulas() {
            let formula = self.terms.translate(*formula, &mut translated.terms, &mut cache);
            translated.formula_log.assert_formula(formula);
        }
        for guard in self.formula_log.assumptions() {
            let guard = self.terms.translate(*guard, &mut translated.terms, &mut cache);
            translated.formula_log.assert_assumption(guard);
        }

        Ok(translated)
    }
}
