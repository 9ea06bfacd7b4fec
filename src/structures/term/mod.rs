/*!
Terms, aka. the vocabulary of a caller.

Terms are owned by a [TermManager], and a [Term] is a (copyable) handle to some term of a manager.
Terms are hash-consed: constructing a term with the same kind and sort as some existing term returns the handle of the existing term.
So, structural equality of terms is equality of handles.

Each term has a [Sort], either boolean or a bit-vector of some width between 1 and 64.
A term of boolean sort is a formula.

```rust
# use otter_inc::structures::term::{Classification, Sort, TermManager};
let mut terms = TermManager::default();

let p = terms.mk_bool_const("p");
let x = terms.mk_bv_const("x", 8).unwrap();
let one = terms.mk_numeral(1, 8).unwrap();
let x_is_one = terms.mk_eq(x, one).unwrap();

assert_eq!(terms.sort(x_is_one), Sort::Bool);
assert_eq!(terms.classify(p), Classification::PlainBooleanAtom);
assert_eq!(terms.classify(x), Classification::BitVectorAtom(8));
assert_eq!(terms.classify(x_is_one), Classification::Unsupported);

// Hash-consing
assert_eq!(terms.mk_bool_const("p"), p);
assert_eq!(terms.display(x_is_one).to_string(), "(= x (_ bv1 8))");
```

# Construction
Constructors for boolean connectives do not check the sort of their arguments, and ill-sorted formulas are instead caught when [lowering](crate::pipeline).
All other constructors check sorts, and return a [TermError] on a mismatch.

# Resource limits
Each manager has a [ResourceLimit], which may be shared with other threads in order to cancel a check.
*/

mod display;
pub use display::TermDisplay;

mod limit;
pub use limit::ResourceLimit;

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::types::err::TermError;

slotmap::new_key_type! {
    /// A handle to a term of some [TermManager].
    pub struct Term;
}

/// The largest width of a bit-vector.
pub const MAX_WIDTH: u32 = 64;

/// The sort of a term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sort {
    Bool,
    BitVec(u32),
}

impl Sort {
    /// A bit-vector sort, if the width is valid.
    pub fn bit_vec(width: u32) -> Result<Self, TermError> {
        match width {
            1..=MAX_WIDTH => Ok(Sort::BitVec(width)),
            _ => Err(TermError::InvalidWidth(width)),
        }
    }
}

/// The kind of a term, i.e. the operator of the term and any parameters or arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TermKind {
    True,
    False,

    /// A named constant, aka. a declaration.
    Const(String),

    /// A bit-vector numeral, masked to the width of the sort.
    Numeral(u64),

    /// An application of an uninterpreted function to at least one argument.
    App(String, Vec<Term>),

    Not(Term),
    And(Vec<Term>),
    Or(Vec<Term>),
    Implies(Term, Term),
    Xor(Term, Term),

    /// Equality, between terms of the same sort.
    Eq(Term, Term),

    /// If-then-else, with a boolean condition.
    Ite(Term, Term, Term),

    Distinct(Vec<Term>),

    BvNot(Term),
    BvAnd(Term, Term),
    BvOr(Term, Term),
    BvXor(Term, Term),

    /// Addition, modulo the width of the arguments.
    BvAdd(Term, Term),

    /// Unsigned less than.
    BvUlt(Term, Term),

    /// Unsigned less than or equal.
    BvUle(Term, Term),

    /// At most `k` of the arguments are true.
    AtMost(u32, Vec<Term>),

    /// At least `k` of the arguments are true.
    AtLeast(u32, Vec<Term>),
}

/// A term, as stored by a manager.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TermNode {
    pub kind: TermKind,
    pub sort: Sort,
}

/// The shape of a term, as relevant to lowering and model reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// A boolean constant.
    PlainBooleanAtom,

    /// A bit-vector constant of the given width.
    BitVectorAtom(u32),

    /// Anything else.
    Unsupported,
}

/// The owner of terms.
pub struct TermManager {
    nodes: SlotMap<Term, TermNode>,

    /// The hash-consing table.
    table: HashMap<TermNode, Term>,

    /// A count of fresh constants, used to name the next fresh constant.
    fresh_counter: usize,

    limit: ResourceLimit,
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new(ResourceLimit::default())
    }
}

/// Bit mask for a bit-vector of the given width.
pub fn width_mask(width: u32) -> u64 {
    match width {
        MAX_WIDTH => u64::MAX,
        _ => (1_u64 << width) - 1,
    }
}

impl TermManager {
    /// A manager whose checks may be canceled through the given limit.
    pub fn new(limit: ResourceLimit) -> Self {
        TermManager {
            nodes: SlotMap::with_key(),
            table: HashMap::default(),
            fresh_counter: 0,
            limit,
        }
    }

    /// The resource limit of the manager.
    pub fn limit(&self) -> &ResourceLimit {
        &self.limit
    }

    /// A count of all terms in the manager.
    pub fn term_count(&self) -> usize {
        self.nodes.len()
    }

    fn intern(&mut self, node: TermNode) -> Term {
        if let Some(term) = self.table.get(&node) {
            return *term;
        }
        let term = self.nodes.insert(node.clone());
        self.table.insert(node, term);
        term
    }

    /// The term of a node, if the node has been constructed.
    pub fn lookup(&self, node: &TermNode) -> Option<Term> {
        self.table.get(node).copied()
    }

    /// The node of a term.
    ///
    /// # Panics
    /// If the term is not a term of the manager.
    pub fn node(&self, term: Term) -> &TermNode {
        &self.nodes[term]
    }

    pub fn kind(&self, term: Term) -> &TermKind {
        &self.nodes[term].kind
    }

    pub fn sort(&self, term: Term) -> Sort {
        self.nodes[term].sort
    }

    pub fn is_bool(&self, term: Term) -> bool {
        self.sort(term) == Sort::Bool
    }

    /// The width of a bit-vector term, or nothing for a term of boolean sort.
    pub fn bv_width(&self, term: Term) -> Option<u32> {
        match self.sort(term) {
            Sort::Bool => None,
            Sort::BitVec(width) => Some(width),
        }
    }

    /// The argument of a negation, or nothing.
    pub fn is_not(&self, term: Term) -> Option<Term> {
        match self.kind(term) {
            TermKind::Not(inner) => Some(*inner),
            _ => None,
        }
    }

    /// Whether the term is a named constant.
    pub fn is_uninterp_const(&self, term: Term) -> bool {
        matches!(self.kind(term), TermKind::Const(_))
    }

    /// The name of a constant, or nothing.
    pub fn const_name(&self, term: Term) -> Option<&str> {
        match self.kind(term) {
            TermKind::Const(name) => Some(name),
            _ => None,
        }
    }

    pub fn classify(&self, term: Term) -> Classification {
        match (self.kind(term), self.sort(term)) {
            (TermKind::Const(_), Sort::Bool) => Classification::PlainBooleanAtom,
            (TermKind::Const(_), Sort::BitVec(width)) => Classification::BitVectorAtom(width),
            _ => Classification::Unsupported,
        }
    }

    /// The (immediate) arguments of a term.
    pub fn children(&self, term: Term) -> Vec<Term> {
        use TermKind::*;
        match self.kind(term) {
            True | False | Const(_) | Numeral(_) => Vec::default(),

            Not(a) | BvNot(a) => vec![*a],

            Implies(a, b)
            | Xor(a, b)
            | Eq(a, b)
            | BvAnd(a, b)
            | BvOr(a, b)
            | BvXor(a, b)
            | BvAdd(a, b)
            | BvUlt(a, b)
            | BvUle(a, b) => vec![*a, *b],

            Ite(c, a, b) => vec![*c, *a, *b],

            App(_, args)
            | And(args)
            | Or(args)
            | Distinct(args)
            | AtMost(_, args)
            | AtLeast(_, args) => args.clone(),
        }
    }

    /// The term with the same operator and sort as `term`, but with the given arguments.
    ///
    /// Sorts of the arguments are not checked, and so this is only for use by rewrites which preserve sorts.
    pub fn with_children(&mut self, term: Term, children: Vec<Term>) -> Term {
        use TermKind::*;
        let node = self.node(term);
        let sort = node.sort;
        let kind = match &node.kind {
            True | False | Const(_) | Numeral(_) => return term,

            Not(_) => Not(children[0]),
            BvNot(_) => BvNot(children[0]),

            Implies(..) => Implies(children[0], children[1]),
            Xor(..) => Xor(children[0], children[1]),
            Eq(..) => Eq(children[0], children[1]),
            BvAnd(..) => BvAnd(children[0], children[1]),
            BvOr(..) => BvOr(children[0], children[1]),
            BvXor(..) => BvXor(children[0], children[1]),
            BvAdd(..) => BvAdd(children[0], children[1]),
            BvUlt(..) => BvUlt(children[0], children[1]),
            BvUle(..) => BvUle(children[0], children[1]),

            Ite(..) => Ite(children[0], children[1], children[2]),

            App(name, _) => App(name.clone(), children),
            And(_) => And(children),
            Or(_) => Or(children),
            Distinct(_) => Distinct(children),
            AtMost(k, _) => AtMost(*k, children),
            AtLeast(k, _) => AtLeast(*k, children),
        };
        self.intern(TermNode { kind, sort })
    }
}

// Construction
impl TermManager {
    pub fn mk_true(&mut self) -> Term {
        self.intern(TermNode {
            kind: TermKind::True,
            sort: Sort::Bool,
        })
    }

    pub fn mk_false(&mut self) -> Term {
        self.intern(TermNode {
            kind: TermKind::False,
            sort: Sort::Bool,
        })
    }

    pub fn mk_bool(&mut self, value: bool) -> Term {
        match value {
            true => self.mk_true(),
            false => self.mk_false(),
        }
    }

    pub fn mk_bool_const(&mut self, name: &str) -> Term {
        self.intern(TermNode {
            kind: TermKind::Const(name.to_owned()),
            sort: Sort::Bool,
        })
    }

    pub fn mk_bv_const(&mut self, name: &str, width: u32) -> Result<Term, TermError> {
        self.mk_const(name, Sort::bit_vec(width)?)
    }

    /// A constant of the given sort.
    pub fn mk_const(&mut self, name: &str, sort: Sort) -> Result<Term, TermError> {
        if let Sort::BitVec(width) = sort {
            Sort::bit_vec(width)?;
        }
        Ok(self.intern(TermNode {
            kind: TermKind::Const(name.to_owned()),
            sort,
        }))
    }

    /// A constant distinct from all other constants of the manager, named by the prefix and a counter.
    pub fn mk_fresh_const(&mut self, prefix: &str, sort: Sort) -> Result<Term, TermError> {
        loop {
            let name = format!("{prefix}!{}", self.fresh_counter);
            self.fresh_counter += 1;
            let candidate = TermNode {
                kind: TermKind::Const(name.clone()),
                sort,
            };
            if self.lookup(&candidate).is_none() {
                return self.mk_const(&name, sort);
            }
        }
    }

    /// A fresh boolean constant, as [mk_fresh_const](TermManager::mk_fresh_const).
    pub fn mk_fresh_bool(&mut self, prefix: &str) -> Term {
        loop {
            let name = format!("{prefix}!{}", self.fresh_counter);
            self.fresh_counter += 1;
            let candidate = TermNode {
                kind: TermKind::Const(name),
                sort: Sort::Bool,
            };
            if self.lookup(&candidate).is_none() {
                return self.intern(candidate);
            }
        }
    }

    /// A numeral of the given width, with any bits beyond the width ignored.
    pub fn mk_numeral(&mut self, value: u64, width: u32) -> Result<Term, TermError> {
        let sort = Sort::bit_vec(width)?;
        Ok(self.intern(TermNode {
            kind: TermKind::Numeral(value & width_mask(width)),
            sort,
        }))
    }

    pub fn mk_not(&mut self, term: Term) -> Term {
        self.intern(TermNode {
            kind: TermKind::Not(term),
            sort: Sort::Bool,
        })
    }

    /// The conjunction of the given terms, where the empty conjunction is true and the conjunction of a single term is the term.
    pub fn mk_and(&mut self, mut args: Vec<Term>) -> Term {
        match args.len() {
            0 => self.mk_true(),
            1 => args.swap_remove(0),
            _ => self.intern(TermNode {
                kind: TermKind::And(args),
                sort: Sort::Bool,
            }),
        }
    }

    /// The disjunction of the given terms, where the empty disjunction is false and the disjunction of a single term is the term.
    pub fn mk_or(&mut self, mut args: Vec<Term>) -> Term {
        match args.len() {
            0 => self.mk_false(),
            1 => args.swap_remove(0),
            _ => self.intern(TermNode {
                kind: TermKind::Or(args),
                sort: Sort::Bool,
            }),
        }
    }

    pub fn mk_implies(&mut self, antecedent: Term, consequent: Term) -> Term {
        self.intern(TermNode {
            kind: TermKind::Implies(antecedent, consequent),
            sort: Sort::Bool,
        })
    }

    pub fn mk_xor(&mut self, a: Term, b: Term) -> Term {
        self.intern(TermNode {
            kind: TermKind::Xor(a, b),
            sort: Sort::Bool,
        })
    }

    pub fn mk_eq(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        if self.sort(a) != self.sort(b) {
            return Err(TermError::SortMismatch);
        }
        Ok(self.intern(TermNode {
            kind: TermKind::Eq(a, b),
            sort: Sort::Bool,
        }))
    }

    pub fn mk_ite(&mut self, condition: Term, a: Term, b: Term) -> Result<Term, TermError> {
        if !self.is_bool(condition) {
            return Err(TermError::NotBoolean);
        }
        let sort = self.sort(a);
        if sort != self.sort(b) {
            return Err(TermError::SortMismatch);
        }
        Ok(self.intern(TermNode {
            kind: TermKind::Ite(condition, a, b),
            sort,
        }))
    }

    pub fn mk_distinct(&mut self, args: Vec<Term>) -> Result<Term, TermError> {
        if let Some(first) = args.first() {
            let sort = self.sort(*first);
            if args.iter().any(|arg| self.sort(*arg) != sort) {
                return Err(TermError::SortMismatch);
            }
        }
        Ok(self.intern(TermNode {
            kind: TermKind::Distinct(args),
            sort: Sort::Bool,
        }))
    }

    fn bv_binary_sort(&self, a: Term, b: Term) -> Result<Sort, TermError> {
        match (self.sort(a), self.sort(b)) {
            (Sort::BitVec(x), Sort::BitVec(y)) if x == y => Ok(Sort::BitVec(x)),
            (Sort::BitVec(_), Sort::BitVec(_)) => Err(TermError::SortMismatch),
            _ => Err(TermError::NotBitVector),
        }
    }

    pub fn mk_bvnot(&mut self, a: Term) -> Result<Term, TermError> {
        let sort = self.sort(a);
        if sort == Sort::Bool {
            return Err(TermError::NotBitVector);
        }
        Ok(self.intern(TermNode {
            kind: TermKind::BvNot(a),
            sort,
        }))
    }

    pub fn mk_bvand(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        let sort = self.bv_binary_sort(a, b)?;
        Ok(self.intern(TermNode {
            kind: TermKind::BvAnd(a, b),
            sort,
        }))
    }

    pub fn mk_bvor(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        let sort = self.bv_binary_sort(a, b)?;
        Ok(self.intern(TermNode {
            kind: TermKind::BvOr(a, b),
            sort,
        }))
    }

    pub fn mk_bvxor(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        let sort = self.bv_binary_sort(a, b)?;
        Ok(self.intern(TermNode {
            kind: TermKind::BvXor(a, b),
            sort,
        }))
    }

    pub fn mk_bvadd(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        let sort = self.bv_binary_sort(a, b)?;
        Ok(self.intern(TermNode {
            kind: TermKind::BvAdd(a, b),
            sort,
        }))
    }

    pub fn mk_bvult(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        self.bv_binary_sort(a, b)?;
        Ok(self.intern(TermNode {
            kind: TermKind::BvUlt(a, b),
            sort: Sort::Bool,
        }))
    }

    pub fn mk_bvule(&mut self, a: Term, b: Term) -> Result<Term, TermError> {
        self.bv_binary_sort(a, b)?;
        Ok(self.intern(TermNode {
            kind: TermKind::BvUle(a, b),
            sort: Sort::Bool,
        }))
    }

    fn check_all_bool(&self, args: &[Term]) -> Result<(), TermError> {
        match args.iter().all(|arg| self.is_bool(*arg)) {
            true => Ok(()),
            false => Err(TermError::NotBoolean),
        }
    }

    /// The constraint that at most `k` of the arguments are true.
    pub fn mk_at_most(&mut self, k: u32, args: Vec<Term>) -> Result<Term, TermError> {
        self.check_all_bool(&args)?;
        Ok(self.intern(TermNode {
            kind: TermKind::AtMost(k, args),
            sort: Sort::Bool,
        }))
    }

    /// The constraint that at least `k` of the arguments are true.
    pub fn mk_at_least(&mut self, k: u32, args: Vec<Term>) -> Result<Term, TermError> {
        self.check_all_bool(&args)?;
        Ok(self.intern(TermNode {
            kind: TermKind::AtLeast(k, args),
            sort: Sort::Bool,
        }))
    }

    /// The application of an uninterpreted function with the given result sort.
    ///
    /// The application of a function to no arguments is a constant.
    pub fn mk_app(&mut self, name: &str, args: Vec<Term>, sort: Sort) -> Result<Term, TermError> {
        if args.is_empty() {
            return self.mk_const(name, sort);
        }
        if let Sort::BitVec(width) = sort {
            Sort::bit_vec(width)?;
        }
        Ok(self.intern(TermNode {
            kind: TermKind::App(name.to_owned(), args),
            sort,
        }))
    }
}

// Translation
impl TermManager {
    /// The term in `target` corresponding to `term`.
    ///
    /// The cache is keyed by terms of `self`, and may be shared across calls with the same target.
    pub fn translate(
        &self,
        term: Term,
        target: &mut TermManager,
        cache: &mut HashMap<Term, Term>,
    ) -> Term {
        target.fresh_counter = target.fresh_counter.max(self.fresh_counter);

        if let Some(translated) = cache.get(&term) {
            return *translated;
        }

        let children = self
            .children(term)
            .into_iter()
            .map(|child| self.translate(child, target, cache))
            .collect::<Vec<_>>();

        use TermKind::*;
        let kind = match self.kind(term) {
            True => True,
            False => False,
            Const(name) => Const(name.clone()),
            Numeral(value) => Numeral(*value),

            Not(_) => Not(children[0]),
            BvNot(_) => BvNot(children[0]),

            Implies(..) => Implies(children[0], children[1]),
            Xor(..) => Xor(children[0], children[1]),
            Eq(..) => Eq(children[0], children[1]),
            BvAnd(..) => BvAnd(children[0], children[1]),
            BvOr(..) => BvOr(children[0], children[1]),
            BvXor(..) => BvXor(children[0], children[1]),
            BvAdd(..) => BvAdd(children[0], children[1]),
            BvUlt(..) => BvUlt(children[0], children[1]),
            BvUle(..) => BvUle(children[0], children[1]),

            Ite(..) => Ite(children[0], children[1], children[2]),

            App(name, _) => App(name.clone(), children),
            And(_) => And(children),
            Or(_) => Or(children),
            Distinct(_) => Distinct(children),
            AtMost(k, _) => AtMost(*k, children),
            AtLeast(k, _) => AtLeast(*k, children),
        };

        let translated = target.intern(TermNode {
            kind,
            sort: self.sort(term),
        });
        cache.insert(term, translated);
        translated
    }
}

#[cfg(test)]
mod term_tests {
    use super::*;

    #[test]
    fn hash_consing() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");

        let p_and_q = terms.mk_and(vec![p, q]);
        let count = terms.term_count();

        assert_eq!(terms.mk_and(vec![p, q]), p_and_q);
        assert_ne!(terms.mk_and(vec![q, p]), p_and_q);
        assert_eq!(terms.term_count(), count + 1);
    }

    #[test]
    fn degenerate_connectives() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");

        assert_eq!(terms.mk_and(vec![]), terms.mk_true());
        assert_eq!(terms.mk_or(vec![]), terms.mk_false());
        assert_eq!(terms.mk_or(vec![p]), p);
    }

    #[test]
    fn sorts() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let x = terms.mk_bv_const("x", 4).unwrap();
        let y = terms.mk_bv_const("y", 8).unwrap();

        assert_eq!(terms.mk_bv_const("z", 0), Err(TermError::InvalidWidth(0)));
        assert_eq!(terms.mk_bv_const("z", 65), Err(TermError::InvalidWidth(65)));
        assert_eq!(terms.mk_eq(x, y), Err(TermError::SortMismatch));
        assert_eq!(terms.mk_bvadd(x, p), Err(TermError::NotBitVector));
        assert_eq!(terms.mk_at_most(1, vec![p, x]), Err(TermError::NotBoolean));
        assert_eq!(terms.mk_ite(x, x, x), Err(TermError::NotBoolean));

        let sum = terms.mk_bvadd(x, x).unwrap();
        assert_eq!(terms.bv_width(sum), Some(4));
    }

    #[test]
    fn numerals_are_masked() {
        let mut terms = TermManager::default();
        let a = terms.mk_numeral(0x1f, 4).unwrap();
        let b = terms.mk_numeral(0xf, 4).unwrap();
        assert_eq!(a, b);
        assert_eq!(terms.kind(a), &TermKind::Numeral(0xf));
    }

    #[test]
    fn fresh_constants_are_fresh() {
        let mut terms = TermManager::default();
        let taken = terms.mk_bool_const("s!0");
        let fresh = terms.mk_fresh_bool("s");

        assert_ne!(taken, fresh);
        assert_eq!(terms.const_name(fresh), Some("s!1"));
    }

    #[test]
    fn translation() {
        let mut source = TermManager::default();
        let mut target = TermManager::default();

        let p = source.mk_bool_const("p");
        let x = source.mk_bv_const("x", 8).unwrap();
        let one = source.mk_numeral(1, 8).unwrap();
        let x_is_one = source.mk_eq(x, one).unwrap();
        let formula = source.mk_implies(p, x_is_one);

        let mut cache = HashMap::default();
        let translated = source.translate(formula, &mut target, &mut cache);

        let target_p = target.mk_bool_const("p");
        let target_x = target.mk_bv_const("x", 8).unwrap();
        let target_one = target.mk_numeral(1, 8).unwrap();
        let target_x_is_one = target.mk_eq(target_x, target_one).unwrap();
        assert_eq!(target.mk_implies(target_p, target_x_is_one), translated);
    }
}
