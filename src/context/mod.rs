/*!
The context --- to which formulas are asserted and within which checks take place, etc.

Strictly, a [GenericContext] and a [Context].

The generic context is generic over the [boolean engine](crate::engine::BooleanEngine) used to decide the clauses of lowered formulas.
A [Context] uses the [Engine](crate::engine::Engine) of the library, and [from_config](Context::from_config) is implemented for a context rather than a generic context to avoid requiring an engine to be named alongside a config.

A context owns a [term manager](crate::structures::term::TermManager), and formulas asserted to the context are terms of the manager.

# Example
```rust
# use otter_inc::context::Context;
# use otter_inc::config::Config;
# use otter_inc::reports::Report;
# use otter_inc::structures::model::Value;
let mut the_context = Context::from_config(Config::default());

let terms = the_context.terms_mut();
let p = terms.mk_bool_const("p");
let x = terms.mk_bv_const("x", 4).unwrap();
let three = terms.mk_numeral(3, 4).unwrap();
let x_is_three = terms.mk_eq(x, three).unwrap();
let p_implies_x_is_three = terms.mk_implies(p, x_is_three);

the_context.assert_formula(p_implies_x_is_three);

assert_eq!(the_context.check(&[p]), Ok(Report::Satisfiable));
let model = the_context.model().unwrap();
assert_eq!(model.value_of(x), Some(Value::BitVec { value: 3, width: 4 }));

let not_p = the_context.terms_mut().mk_not(p);
assert_eq!(the_context.check(&[p, not_p]), Ok(Report::Unsatisfiable));
assert!(!the_context.unsat_core().is_empty());
```
*/

mod counters;
pub use counters::Counters;
mod generic;
pub use generic::{GenericContext, DEFAULT_REASON_UNKNOWN};
mod specific;
pub use specific::Context;

/// The state of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// The context allows input, and no check has been made since the last input.
    Input,

    /// The most recent check was satisfiable.
    Satisfiable,

    /// The most recent check was unsatisfiable.
    Unsatisfiable,

    /// The most recent check returned unknown, for the [reason](GenericContext::reason_unknown) recorded.
    Unknown,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
