//! An incremental, scope-aware layer for deciding formulas over booleans, bit-vectors, and cardinality constraints with a boolean satisfiability engine.
//!
//! otter_inc accepts formulas (terms of a [term manager](crate::structures::term::TermManager)), lowers the formulas to clauses of a [boolean engine](crate::engine), and translates each result of the engine back to the vocabulary of the formulas.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [context].
//!
//! Formulas are asserted to a context, and are recorded in a [formula log](crate::db::formula_log).
//! Nothing is lowered until a check, at which point each pending formula is given to a [pipeline](crate::pipeline) of stages, and the residual goal of the pipeline is translated to clauses.
//! Boolean constants are paired with atoms of the engine in an [atom map](crate::db::atom_map).
//!
//! Scopes are opened and closed with [push](crate::context::GenericContext::push) and [pop](crate::context::GenericContext::pop), and a pop undoes everything done within the scope, to the formula log, to the atom map, and to the engine.
//!
//! After a check:
//! - A satisfiable check has a [model](crate::procedures::model) over the declarations of the asserted formulas, including bit-vector constants recombined from their bits.
//! - An unsatisfiable check under assumptions has an [unsatisfiable core](crate::procedures::core) of the assumptions.
//!
//! Further, the [consequences](crate::procedures::consequences) of assumptions, and [mutexes](crate::procedures::mutexes) among lowered constants, may be found.
//!
//! Useful starting points, then, may be:
//! - The [context] to see how the pieces fit together.
//! - The [procedures] to inspect what happens during a check.
//! - The [pipeline] to inspect how formulas are lowered.
//! - The [configuration](crate::config) to see what features are supported.
//!
//! # Examples
//!
//! + A bit-vector constant, fixed by an assumption.
//!
//! ```rust
//! # use otter_inc::config::Config;
//! # use otter_inc::context::Context;
//! # use otter_inc::reports::Report;
//! # use otter_inc::structures::model::Value;
//! let mut the_context = Context::from_config(Config::default());
//!
//! let terms = the_context.terms_mut();
//! let a = terms.mk_bool_const("a");
//! let x = terms.mk_bv_const("x", 8).unwrap();
//! let y = terms.mk_bv_const("y", 8).unwrap();
//! let two = terms.mk_numeral(2, 8).unwrap();
//! let x_plus_two = terms.mk_bvadd(x, two).unwrap();
//! let y_is_x_plus_two = terms.mk_eq(y, x_plus_two).unwrap();
//! let five = terms.mk_numeral(5, 8).unwrap();
//! let x_is_five = terms.mk_eq(x, five).unwrap();
//! let a_implies_x_is_five = terms.mk_implies(a, x_is_five);
//!
//! the_context.assert_formula(y_is_x_plus_two);
//! the_context.assert_formula(a_implies_x_is_five);
//!
//! assert_eq!(the_context.check(&[a]), Ok(Report::Satisfiable));
//! let model = the_context.model().unwrap();
//! assert_eq!(model.value_of(y), Some(Value::BitVec { value: 7, width: 8 }));
//! ```
//!
//! + Retracting a formula by popping a scope.
//!
//! ```rust
//! # use otter_inc::config::Config;
//! # use otter_inc::context::Context;
//! # use otter_inc::reports::Report;
//! let mut the_context = Context::from_config(Config::default());
//!
//! let terms = the_context.terms_mut();
//! let p = terms.mk_bool_const("p");
//! let q = terms.mk_bool_const("q");
//! let not_p = terms.mk_not(p);
//! let not_q = terms.mk_not(q);
//! let p_or_q = terms.mk_or(vec![p, q]);
//!
//! the_context.assert_formula(p_or_q);
//! the_context.push();
//! the_context.assert_formula(not_p);
//! the_context.assert_formula(not_q);
//! assert_eq!(the_context.check(&[]), Ok(Report::Unsatisfiable));
//!
//! the_context.pop(1);
//! assert_eq!(the_context.check(&[]), Ok(Report::Satisfiable));
//! ```
//!
//! # Logs
//!
//! To help diagnose why some check returned unknown, calls to [log!](log) are made throughout the library, with a variety of targets to help narrow output to relevant parts of the library.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to lowering can be filtered with `RUST_LOG=lowering …` or,
//! - Logs of checks without details of the engine can be found with `RUST_LOG=check=info …`

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]

pub mod procedures;

pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;
pub mod engine;
pub mod pipeline;
pub mod reports;

pub mod misc;
