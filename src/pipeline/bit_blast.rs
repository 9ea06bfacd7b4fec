/*!
Bit-blasting, aka. the translation of bit-vector terms to formulas over the bits of bit-vector constants.

# The bit-blaster

Each bit-vector constant is associated with a sequence of fresh boolean constants, its *bits*, least significant first.
The association persists across calls to the pipeline, so a constant is blasted to the same bits by each check, and the association is the recipe used to [reconstruct](crate::pipeline::converters::ModelConverter::BitBlast) the value of a constant from a model.

The [BitBlaster] is scope-aware: [push](BitBlaster::push) records the size of the association and [pop](BitBlaster::pop) restores the size.
A limit is placed on the number of bits, and introducing a bit beyond the limit raises a [fault](PipelineFault::BitLimit).

# Translation

Predicates over bit-vectors are translated as follows, where `a` and `b` are sequences of bits:
- `a = b` is the conjunction of `aᵢ = bᵢ`.
- `a < b` is built from the least significant bit upwards, with `lt₀ = false` and `ltᵢ₊₁ = (¬aᵢ ∧ bᵢ) ∨ ((aᵢ = bᵢ) ∧ ltᵢ)`.
- `a ≤ b` is `¬(b < a)`.
- `distinct` is the conjunction of pairwise disequalities.

Bitwise operators are translated bit by bit, and addition is a ripple-carry adder.

A bit-vector term which is an application of an uninterpreted function has no bits.
Any predicate over such a term is kept as is, and is an *interpreted atom* of the goal.
*/

use std::collections::HashMap;

use crate::{
    misc::log::targets,
    reports::Statistics,
    structures::{
        goal::Goal,
        term::{Term, TermKind, TermManager},
    },
    types::err::PipelineFault,
};

use super::{ill_sorted, Stage, StageEnv};

/// The map from bit-vector constants to bits.
#[derive(Clone, Debug)]
pub struct BitBlaster {
    /// Each constant with its bits, in the order constants were blasted.
    const2bits: Vec<(Term, Vec<Term>)>,

    /// The index of each constant in `const2bits`.
    index: HashMap<Term, usize>,

    /// The length of `const2bits` when each scope was opened.
    scopes: Vec<usize>,

    bit_count: usize,

    max_bits: usize,
}

impl BitBlaster {
    pub fn new(max_bits: usize) -> Self {
        BitBlaster {
            const2bits: Vec::default(),
            index: HashMap::default(),
            scopes: Vec::default(),
            bit_count: 0,
            max_bits,
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(self.const2bits.len());
    }

    /// Pops at most `count` scopes, forgetting the bits of any constant blasted in those scopes.
    pub fn pop(&mut self, count: usize) {
        let count = count.min(self.scopes.len());
        if count == 0 {
            return;
        }
        let checkpoint = self.scopes[self.scopes.len() - count];
        self.scopes.truncate(self.scopes.len() - count);

        for (constant, _) in self.const2bits.drain(checkpoint..) {
            self.index.remove(&constant);
        }
        self.bit_count = self.const2bits.iter().map(|(_, bits)| bits.len()).sum();
    }

    /// The count of open scopes.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Each constant with its bits.
    pub fn const2bits(&self) -> &[(Term, Vec<Term>)] {
        &self.const2bits
    }

    /// The bits of a constant, if the constant has been blasted.
    pub fn bits_of(&self, constant: Term) -> Option<&[Term]> {
        self.index
            .get(&constant)
            .map(|index| self.const2bits[*index].1.as_slice())
    }

    /// A count of all bits.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Sets the limit on the count of bits, which applies to constants blasted after the limit is set.
    pub fn set_max_bits(&mut self, max_bits: usize) {
        self.max_bits = max_bits;
    }

    /// The bits of a constant, blasting the constant if required.
    fn bits_for(&mut self, terms: &mut TermManager, constant: Term, width: u32) -> Result<Vec<Term>, PipelineFault> {
        if let Some(bits) = self.bits_of(constant) {
            return Ok(bits.to_vec());
        }

        if self.bit_count + width as usize > self.max_bits {
            return Err(PipelineFault::BitLimit(self.max_bits));
        }

        let prefix = terms.const_name(constant).unwrap_or("bit").to_owned();
        let bits = (0..width)
            .map(|_| terms.mk_fresh_bool(&prefix))
            .collect::<Vec<_>>();
        log::trace!(target: targets::BIT_BLAST, "Blasted {prefix} to {width} bits");

        self.index.insert(constant, self.const2bits.len());
        self.const2bits.push((constant, bits.clone()));
        self.bit_count += bits.len();
        Ok(bits)
    }
}

/// The bit-blasting stage.
#[derive(Default)]
pub struct BitBlast {
    /// A count of bit-vector predicates translated.
    blasted: u64,
}

/// The translation of a single goal.
struct Blaster<'a, 'b> {
    env: &'a mut StageEnv<'b>,
    bool_cache: HashMap<Term, Term>,
    bv_cache: HashMap<Term, Option<Vec<Term>>>,
    blasted: u64,
}

impl Blaster<'_, '_> {
    fn eq_bits(&mut self, a: &[Term], b: &[Term], term: Term) -> Result<Term, PipelineFault> {
        let mut eqs = Vec::with_capacity(a.len());
        for (ai, bi) in a.iter().zip(b) {
            eqs.push(self.mk_eq(*ai, *bi, term)?);
        }
        Ok(self.env.terms.mk_and(eqs))
    }

    fn ult_bits(&mut self, a: &[Term], b: &[Term], term: Term) -> Result<Term, PipelineFault> {
        let mut lt = self.env.terms.mk_false();
        for (ai, bi) in a.iter().zip(b) {
            let terms = &mut *self.env.terms;
            let not_ai = terms.mk_not(*ai);
            let strictly = terms.mk_and(vec![not_ai, *bi]);
            let eq = self.mk_eq(*ai, *bi, term)?;
            let terms = &mut *self.env.terms;
            let carried = terms.mk_and(vec![eq, lt]);
            lt = terms.mk_or(vec![strictly, carried]);
        }
        Ok(lt)
    }

    fn mk_eq(&mut self, a: Term, b: Term, term: Term) -> Result<Term, PipelineFault> {
        let terms = &mut *self.env.terms;
        terms.mk_eq(a, b).map_err(|_| ill_sorted(terms, term))
    }

    fn blast_bool(&mut self, term: Term) -> Result<Term, PipelineFault> {
        if let Some(blasted) = self.bool_cache.get(&term) {
            return Ok(*blasted);
        }
        if self.env.terms.limit().is_canceled() {
            return Err(PipelineFault::Canceled);
        }

        let blasted = match self.env.terms.kind(term).clone() {
            TermKind::True | TermKind::False | TermKind::Const(_) | TermKind::App(..) => term,

            TermKind::AtMost(..) | TermKind::AtLeast(..) => term,

            TermKind::Not(_) | TermKind::And(_) | TermKind::Or(_) | TermKind::Implies(..) | TermKind::Xor(..) => {
                let mut children = Vec::default();
                for child in self.env.terms.children(term) {
                    children.push(self.blast_bool(child)?);
                }
                self.env.terms.with_children(term, children)
            }

            TermKind::Ite(c, a, b) => {
                let children = vec![self.blast_bool(c)?, self.blast_bool(a)?, self.blast_bool(b)?];
                self.env.terms.with_children(term, children)
            }

            TermKind::Eq(a, b) if self.env.terms.is_bool(a) => {
                let children = vec![self.blast_bool(a)?, self.blast_bool(b)?];
                self.env.terms.with_children(term, children)
            }

            TermKind::Eq(a, b) => match (self.blast_bv(a)?, self.blast_bv(b)?) {
                (Some(a_bits), Some(b_bits)) => {
                    self.blasted += 1;
                    self.eq_bits(&a_bits, &b_bits, term)?
                }
                _ => term,
            },

            TermKind::Distinct(args) => {
                let mut disequalities = Vec::default();
                for (index, a) in args.iter().enumerate() {
                    for b in &args[index + 1..] {
                        let eq = self.mk_eq(*a, *b, term)?;
                        let eq = self.blast_bool(eq)?;
                        disequalities.push(self.env.terms.mk_not(eq));
                    }
                }
                self.env.terms.mk_and(disequalities)
            }

            TermKind::BvUlt(a, b) => match (self.blast_bv(a)?, self.blast_bv(b)?) {
                (Some(a_bits), Some(b_bits)) => {
                    self.blasted += 1;
                    self.ult_bits(&a_bits, &b_bits, term)?
                }
                _ => term,
            },

            TermKind::BvUle(a, b) => match (self.blast_bv(a)?, self.blast_bv(b)?) {
                (Some(a_bits), Some(b_bits)) => {
                    self.blasted += 1;
                    let b_lt_a = self.ult_bits(&b_bits, &a_bits, term)?;
                    self.env.terms.mk_not(b_lt_a)
                }
                _ => term,
            },

            TermKind::Numeral(_)
            | TermKind::BvNot(_)
            | TermKind::BvAnd(..)
            | TermKind::BvOr(..)
            | TermKind::BvXor(..)
            | TermKind::BvAdd(..) => return Err(ill_sorted(self.env.terms, term)),
        };

        self.bool_cache.insert(term, blasted);
        Ok(blasted)
    }

    /// The bits of a bit-vector term, or nothing if the term contains an uninterpreted application.
    fn blast_bv(&mut self, term: Term) -> Result<Option<Vec<Term>>, PipelineFault> {
        if let Some(bits) = self.bv_cache.get(&term) {
            return Ok(bits.clone());
        }
        if self.env.terms.limit().is_canceled() {
            return Err(PipelineFault::Canceled);
        }
        let Some(width) = self.env.terms.bv_width(term) else {
            return Err(ill_sorted(self.env.terms, term));
        };

        let bits = match self.env.terms.kind(term).clone() {
            TermKind::Const(_) => Some(self.env.bit_blaster.bits_for(self.env.terms, term, width)?),

            TermKind::App(..) => None,

            TermKind::Numeral(value) => Some(
                (0..width)
                    .map(|index| self.env.terms.mk_bool(value >> index & 1 == 1))
                    .collect(),
            ),

            TermKind::Ite(c, a, b) => {
                let c = self.blast_bool(c)?;
                match (self.blast_bv(a)?, self.blast_bv(b)?) {
                    (Some(a_bits), Some(b_bits)) => {
                        let mut bits = Vec::with_capacity(a_bits.len());
                        for (ai, bi) in a_bits.into_iter().zip(b_bits) {
                            let terms = &mut *self.env.terms;
                            bits.push(terms.mk_ite(c, ai, bi).map_err(|_| ill_sorted(terms, term))?);
                        }
                        Some(bits)
                    }
                    _ => None,
                }
            }

            TermKind::BvNot(a) => self
                .blast_bv(a)?
                .map(|bits| bits.into_iter().map(|bit| self.env.terms.mk_not(bit)).collect()),

            TermKind::BvAnd(a, b) | TermKind::BvOr(a, b) | TermKind::BvXor(a, b) => {
                match (self.blast_bv(a)?, self.blast_bv(b)?) {
                    (Some(a_bits), Some(b_bits)) => {
                        let terms = &mut *self.env.terms;
                        let kind = terms.kind(term).clone();
                        let bits = a_bits
                            .into_iter()
                            .zip(b_bits)
                            .map(|(ai, bi)| match kind {
                                TermKind::BvAnd(..) => terms.mk_and(vec![ai, bi]),
                                TermKind::BvOr(..) => terms.mk_or(vec![ai, bi]),
                                _ => terms.mk_xor(ai, bi),
                            })
                            .collect();
                        Some(bits)
                    }
                    _ => None,
                }
            }

            TermKind::BvAdd(a, b) => match (self.blast_bv(a)?, self.blast_bv(b)?) {
                (Some(a_bits), Some(b_bits)) => {
                    let terms = &mut *self.env.terms;
                    let mut carry = terms.mk_false();
                    let mut bits = Vec::with_capacity(a_bits.len());
                    for (ai, bi) in a_bits.into_iter().zip(b_bits) {
                        let half = terms.mk_xor(ai, bi);
                        bits.push(terms.mk_xor(half, carry));

                        let both = terms.mk_and(vec![ai, bi]);
                        let propagated = terms.mk_and(vec![carry, half]);
                        carry = terms.mk_or(vec![both, propagated]);
                    }
                    Some(bits)
                }
                _ => None,
            },

            _ => return Err(ill_sorted(self.env.terms, term)),
        };

        self.bv_cache.insert(term, bits.clone());
        Ok(bits)
    }
}

impl Stage for BitBlast {
    fn name(&self) -> &'static str {
        "bit_blast"
    }

    fn apply(&mut self, goal: Goal, env: &mut StageEnv<'_>) -> Result<Vec<Goal>, PipelineFault> {
        let mut blaster = Blaster {
            env,
            bool_cache: HashMap::default(),
            bv_cache: HashMap::default(),
            blasted: 0,
        };

        let mut blasted_goal = Goal::default();
        for goal_formula in goal {
            let formula = blaster.blast_bool(goal_formula.formula)?;
            blasted_goal.push(blaster.env.terms, formula, goal_formula.dependency);
        }

        self.blasted += blaster.blasted;
        Ok(vec![blasted_goal])
    }

    fn collect_statistics(&self, statistics: &mut Statistics) {
        statistics.update("bit_blast.predicates", self.blasted);
    }
}

#[cfg(test)]
mod bit_blast_tests {
    use super::*;
    use crate::{
        pipeline::converters::ConverterChain,
        structures::model::{Model, Value},
    };

    /// Blasts the formula, and returns the blasted formula.
    fn blast(terms: &mut TermManager, bit_blaster: &mut BitBlaster, formula: Term) -> Result<Term, PipelineFault> {
        let mut converters = ConverterChain::default();
        let mut env = StageEnv {
            terms,
            bit_blaster,
            converters: &mut converters,
        };
        let mut blaster = Blaster {
            env: &mut env,
            bool_cache: HashMap::default(),
            bv_cache: HashMap::default(),
            blasted: 0,
        };
        blaster.blast_bool(formula)
    }

    /// Whether the formula and its blasted form agree on every value of the (two) constants, of the given width.
    fn agrees(width: u32, mk: impl Fn(&mut TermManager, Term, Term) -> Term) {
        let mut terms = TermManager::default();
        let mut bit_blaster = BitBlaster::new(128);
        let x = terms.mk_bv_const("x", width).unwrap();
        let y = terms.mk_bv_const("y", width).unwrap();
        let formula = mk(&mut terms, x, y);
        let blasted = blast(&mut terms, &mut bit_blaster, formula).unwrap();

        for x_value in 0..(1_u64 << width) {
            for y_value in 0..(1_u64 << width) {
                let mut model = Model::default();
                model.register(x, Value::BitVec { value: x_value, width });
                model.register(y, Value::BitVec { value: y_value, width });
                for (constant, value) in [(x, x_value), (y, y_value)] {
                    for (index, bit) in bit_blaster.bits_of(constant).unwrap().iter().enumerate() {
                        model.register(*bit, Value::Bool(value >> index & 1 == 1));
                    }
                }

                assert_eq!(
                    model.eval(&terms, formula, false),
                    model.eval(&terms, blasted, false),
                    "x = {x_value}, y = {y_value}"
                );
            }
        }
    }

    #[test]
    fn comparisons() {
        agrees(3, |terms, x, y| terms.mk_bvult(x, y).unwrap());
        agrees(3, |terms, x, y| terms.mk_bvule(x, y).unwrap());
        agrees(3, |terms, x, y| terms.mk_eq(x, y).unwrap());
        agrees(2, |terms, x, y| terms.mk_distinct(vec![x, y]).unwrap());
    }

    #[test]
    fn arithmetic() {
        agrees(3, |terms, x, y| {
            let sum = terms.mk_bvadd(x, y).unwrap();
            let two = terms.mk_numeral(2, 3).unwrap();
            terms.mk_eq(sum, two).unwrap()
        });
        agrees(3, |terms, x, y| {
            let x_xor_y = terms.mk_bvxor(x, y).unwrap();
            let not_y = terms.mk_bvnot(y).unwrap();
            let mixed = terms.mk_bvor(x_xor_y, not_y).unwrap();
            let x_and_y = terms.mk_bvand(x, y).unwrap();
            terms.mk_bvult(x_and_y, mixed).unwrap()
        });
    }

    #[test]
    fn uninterpreted_applications_are_kept() {
        let mut terms = TermManager::default();
        let mut bit_blaster = BitBlaster::new(128);
        let x = terms.mk_bv_const("x", 4).unwrap();
        let f_x = terms
            .mk_app("f", vec![x], crate::structures::term::Sort::BitVec(4))
            .unwrap();
        let formula = terms.mk_bvult(f_x, x).unwrap();

        assert_eq!(blast(&mut terms, &mut bit_blaster, formula), Ok(formula));
    }

    #[test]
    fn scoped_bits() {
        let mut terms = TermManager::default();
        let mut bit_blaster = BitBlaster::new(10);
        let x = terms.mk_bv_const("x", 4).unwrap();
        let y = terms.mk_bv_const("y", 8).unwrap();
        let x_is_x = terms.mk_bvule(x, x).unwrap();
        let y_is_y = terms.mk_bvule(y, y).unwrap();

        blast(&mut terms, &mut bit_blaster, x_is_x).unwrap();
        let x_bits = bit_blaster.bits_of(x).unwrap().to_vec();

        bit_blaster.push();
        assert_eq!(
            blast(&mut terms, &mut bit_blaster, y_is_y),
            Err(PipelineFault::BitLimit(10))
        );
        let z = terms.mk_bv_const("z", 2).unwrap();
        let z_is_z = terms.mk_bvule(z, z).unwrap();
        blast(&mut terms, &mut bit_blaster, z_is_z).unwrap();
        assert_eq!(bit_blaster.bit_count(), 6);

        bit_blaster.pop(3);
        assert_eq!(bit_blaster.scope_count(), 0);
        assert_eq!(bit_blaster.bit_count(), 4);
        assert!(bit_blaster.bits_of(z).is_none());
        assert_eq!(bit_blaster.bits_of(x), Some(x_bits.as_slice()));
    }
}
