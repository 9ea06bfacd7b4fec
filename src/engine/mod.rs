/*!
The boolean engine, aka. the SAT solver driven by a [context](crate::context).

The boundary of a boolean engine is the [BooleanEngine] trait, and a context is generic over any implementation of the trait.

The [Engine] of the library is a small DPLL solver, with unit propagation over occurrence lists and chronological backtracking.
This is enough to exercise each procedure of a context, though the engine is not intended for hard problems.

# Conventions
- The [top atom](crate::structures::atom::TOP_ATOM) is always true.
- Clauses are added at the current *user* scope, and are removed when the scope is popped.
- The core of an unsatisfiable check is a subset of the assumptions of the check.
  An empty core indicates the clauses of the engine are unsatisfiable without any assumption.
- Each consequence is a non-empty clause, where the first literal is the fixed value of some atom and the remaining literals are the assumptions the value depends on.

```rust
# use otter_inc::config::EngineConfig;
# use otter_inc::engine::{BooleanEngine, Engine};
# use otter_inc::reports::Report;
# use otter_inc::structures::literal::{CLiteral, Literal};
# use otter_inc::structures::term::ResourceLimit;
let mut engine = Engine::from_config(&EngineConfig::default(), ResourceLimit::default());

let p = CLiteral::new(engine.fresh_atom(), true);
let q = CLiteral::new(engine.fresh_atom(), true);
engine.add_clause(vec![p, q]);

assert_eq!(engine.check(&[-p], None, 0.0), Report::Satisfiable);
assert_eq!(engine.value_of(q.atom()), Some(true));

engine.add_clause(vec![-q]);
assert_eq!(engine.check(&[-p], None, 0.0), Report::Unsatisfiable);
assert_eq!(engine.core(), &[-p]);
```
*/

mod dpll;
pub use dpll::Engine;

use crate::{
    config::EngineConfig,
    reports::{Report, Statistics},
    structures::{atom::Atom, clause::CClause, literal::CLiteral, term::ResourceLimit},
};

/// The reason given for an unknown check after the resource limit was triggered.
pub const REASON_CANCELED: &str = "canceled";

/// The reason given for an unknown check after the time limit of a check was exceeded.
pub const REASON_TIME_LIMIT: &str = "time limit";

/// The interface to a boolean engine.
pub trait BooleanEngine {
    /// A fresh engine, canceled through the given limit.
    fn from_config(config: &EngineConfig, limit: ResourceLimit) -> Self
    where
        Self: Sized;

    fn update_config(&mut self, config: &EngineConfig);

    /// A fresh atom.
    fn fresh_atom(&mut self) -> Atom;

    /// A count of atoms, including the top atom.
    fn atom_count(&self) -> usize;

    /// Adds a clause to the current user scope.
    fn add_clause(&mut self, clause: CClause);

    fn user_push(&mut self);

    /// Pops (at most) `count` user scopes, removing any clause added in those scopes.
    fn user_pop(&mut self, count: usize);

    /// The count of user scopes.
    fn scope_level(&self) -> usize;

    /// Removes any assignment made during a previous check.
    fn pop_to_base_level(&mut self);

    /// Checks the clauses of the engine under the given assumptions.
    ///
    /// If weights are given, the check is weighted: an assumption may be dropped at the cost of its weight, and the check is unsatisfiable only if the total cost exceeds `max_weight`.
    fn check(&mut self, assumptions: &[CLiteral], weights: Option<&[f64]>, max_weight: f64)
        -> Report;

    /// Whether the engine has a model from the most recent check.
    fn model_is_current(&self) -> bool;

    /// The value of an atom on the current model, if there is a current model.
    fn value_of(&self, atom: Atom) -> Option<bool>;

    /// The core of the most recent unsatisfiable check.
    fn core(&self) -> &[CLiteral];

    /// Checks the clauses under the assumptions, and if satisfiable collects an entry for each atom with a value fixed by the assumptions.
    fn consequences(
        &mut self,
        assumptions: &[CLiteral],
        atoms: &[Atom],
        consequences: &mut Vec<CClause>,
    ) -> Report;

    /// Groups of (at least two) literals, where at most one literal of each group is true on any model.
    fn find_mutexes(&mut self, literals: &[CLiteral]) -> Vec<Vec<CLiteral>>;

    fn collect_statistics(&self, statistics: &mut Statistics);

    /// Writes the clauses and the given units as hard clauses, and the assumptions as weighted soft units, in WCNF.
    fn display_wcnf(
        &self,
        out: &mut dyn std::io::Write,
        units: &[CLiteral],
        assumptions: &[CLiteral],
        weights: &[u64],
    ) -> std::io::Result<()>;

    /// The reason the most recent check was unknown, if it was.
    fn unknown_reason(&self) -> Option<&str>;
}
