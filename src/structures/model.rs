/*!
Models, aka. assignments of values to declarations.

A declaration is a constant [term](crate::structures::term), and a model maps declarations to [values](Value).

Terms may be evaluated under a model, and if *model completion* is requested any declaration without a value is given a default value (false, or zero) for the evaluation.

```rust
# use otter_inc::structures::term::TermManager;
# use otter_inc::structures::model::{Model, Value};
let mut terms = TermManager::default();
let x = terms.mk_bv_const("x", 4).unwrap();
let y = terms.mk_bv_const("y", 4).unwrap();
let sum = terms.mk_bvadd(x, y).unwrap();

let mut model = Model::default();
model.register(x, Value::BitVec { value: 9, width: 4 });

assert_eq!(model.eval(&terms, sum, false), None);
assert_eq!(model.eval(&terms, sum, true), Some(Value::BitVec { value: 9, width: 4 }));

model.register(y, Value::BitVec { value: 8, width: 4 });
assert_eq!(model.eval(&terms, sum, false), Some(Value::BitVec { value: 1, width: 4 }));
```
*/

use std::collections::BTreeMap;

use crate::structures::term::{width_mask, Sort, Term, TermKind, TermManager};

/// The value of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    BitVec { value: u64, width: u32 },
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::BitVec { .. } => None,
        }
    }

    pub fn as_bv(&self) -> Option<u64> {
        match self {
            Value::Bool(_) => None,
            Value::BitVec { value, .. } => Some(*value),
        }
    }

    /// The default value of a sort, used for model completion.
    pub fn default_of(sort: Sort) -> Self {
        match sort {
            Sort::Bool => Value::Bool(false),
            Sort::BitVec(width) => Value::BitVec { value: 0, width },
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::BitVec { value, width } => write!(f, "(_ bv{value} {width})"),
        }
    }
}

/// A map from declarations to values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    values: BTreeMap<Term, Value>,
}

impl Model {
    /// Registers a value for a declaration, replacing any previous value.
    pub fn register(&mut self, declaration: Term, value: Value) {
        self.values.insert(declaration, value);
    }

    /// Removes a declaration from the model.
    pub fn hide(&mut self, declaration: Term) -> Option<Value> {
        self.values.remove(&declaration)
    }

    pub fn value_of(&self, declaration: Term) -> Option<Value> {
        self.values.get(&declaration).copied()
    }

    /// An iterator over declarations and their values, in the order of declarations.
    pub fn iter(&self) -> impl Iterator<Item = (Term, Value)> + '_ {
        self.values.iter().map(|(term, value)| (*term, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The model as a string, with one `name -> value` line for each declaration.
    pub fn display(&self, terms: &TermManager) -> String {
        self.values
            .iter()
            .map(|(term, value)| format!("{} -> {value}\n", terms.display(*term)))
            .collect()
    }

    /// The value of a term under the model.
    ///
    /// Nothing is returned if some declaration without a value is encountered and model completion is not requested, or if some uninterpreted function is encountered.
    pub fn eval(&self, terms: &TermManager, term: Term, completion: bool) -> Option<Value> {
        use TermKind::*;
        let sort = terms.sort(term);
        let width = terms.bv_width(term).unwrap_or_default();

        let bool_of = |t: Term| self.eval(terms, t, completion)?.as_bool();
        let bv_of = |t: Term| self.eval(terms, t, completion)?.as_bv();
        let bv = |value: u64| {
            Some(Value::BitVec {
                value: value & width_mask(width),
                width,
            })
        };

        match terms.kind(term) {
            True => Some(Value::Bool(true)),
            False => Some(Value::Bool(false)),

            Const(_) => match (self.value_of(term), completion) {
                (Some(value), _) => Some(value),
                (None, true) => Some(Value::default_of(sort)),
                (None, false) => None,
            },

            Numeral(value) => bv(*value),

            App(..) => None,

            Not(a) => Some(Value::Bool(!bool_of(*a)?)),

            And(args) => {
                let mut value = true;
                for arg in args {
                    value &= bool_of(*arg)?;
                }
                Some(Value::Bool(value))
            }

            Or(args) => {
                let mut value = false;
                for arg in args {
                    value |= bool_of(*arg)?;
                }
                Some(Value::Bool(value))
            }

            Implies(a, b) => Some(Value::Bool(!bool_of(*a)? || bool_of(*b)?)),

            Xor(a, b) => Some(Value::Bool(bool_of(*a)? != bool_of(*b)?)),

            Eq(a, b) => {
                let a = self.eval(terms, *a, completion)?;
                let b = self.eval(terms, *b, completion)?;
                Some(Value::Bool(a == b))
            }

            Ite(c, a, b) => match bool_of(*c)? {
                true => self.eval(terms, *a, completion),
                false => self.eval(terms, *b, completion),
            },

            Distinct(args) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(terms, *arg, completion)?);
                }
                let distinct = values
                    .iter()
                    .enumerate()
                    .all(|(index, value)| !values[..index].contains(value));
                Some(Value::Bool(distinct))
            }

            BvNot(a) => bv(!bv_of(*a)?),
            BvAnd(a, b) => bv(bv_of(*a)? & bv_of(*b)?),
            BvOr(a, b) => bv(bv_of(*a)? | bv_of(*b)?),
            BvXor(a, b) => bv(bv_of(*a)? ^ bv_of(*b)?),
            BvAdd(a, b) => bv(bv_of(*a)?.wrapping_add(bv_of(*b)?)),

            BvUlt(a, b) => Some(Value::Bool(bv_of(*a)? < bv_of(*b)?)),
            BvUle(a, b) => Some(Value::Bool(bv_of(*a)? <= bv_of(*b)?)),

            AtMost(k, args) => {
                let mut count = 0;
                for arg in args {
                    count += bool_of(*arg)? as u32;
                }
                Some(Value::Bool(count <= *k))
            }

            AtLeast(k, args) => {
                let mut count = 0;
                for arg in args {
                    count += bool_of(*arg)? as u32;
                }
                Some(Value::Bool(count >= *k))
            }
        }
    }
}
