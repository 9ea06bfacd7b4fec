/*!
Simplification, aka. constant folding and a handful of local rewrites.

Rewrites are applied bottom up, and so each rewrite may assume the arguments of a term are simplified.

Boolean connectives:
- Constants are folded, double negations are removed, and `=>` is rewritten to a disjunction.
- Duplicate arguments are removed from conjunctions and disjunctions, and an argument alongside its negation folds the connective to a constant.
- If `flat` is set, nested conjunctions (disjunctions) are flattened.
- If `elim_and` is set, a conjunction is rewritten to the negation of the disjunction of the negated arguments.
- If `blast_distinct` is set, `distinct` is rewritten to the conjunction of pairwise disequalities.

Bit-vector terms:
- Operators applied to numerals are folded.
- Identities, e.g. `x + 0 = x` and `x & x = x`, are applied.

Each boolean connective must have arguments of boolean sort, and an ill-sorted connective raises a [fault](PipelineFault::SortMismatch).
*/

use crate::{
    config::PipelineConfig,
    reports::Statistics,
    structures::{
        goal::Goal,
        term::{width_mask, Term, TermKind, TermManager},
    },
    types::err::PipelineFault,
};

use super::{ill_sorted, rewrite_goal, Stage, StageEnv};

/// The simplification stage.
pub struct Simplify {
    flat: bool,
    elim_and: bool,
    blast_distinct: bool,

    /// A count of terms changed by a rewrite.
    rewrites: u64,
}

impl Simplify {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Simplify {
            flat: config.flat.value,
            elim_and: config.elim_and.value,
            blast_distinct: config.blast_distinct.value,
            rewrites: 0,
        }
    }
}

/// The negation of a term, with constants and double negations folded.
pub fn negate(terms: &mut TermManager, term: Term) -> Term {
    match terms.kind(term) {
        TermKind::True => terms.mk_false(),
        TermKind::False => terms.mk_true(),
        TermKind::Not(inner) => *inner,
        _ => terms.mk_not(term),
    }
}

fn numeral(terms: &TermManager, term: Term) -> Option<u64> {
    match terms.kind(term) {
        TermKind::Numeral(value) => Some(*value),
        _ => None,
    }
}

impl Simplify {
    /// Arguments of a connective, with `unit` arguments dropped and nested arguments of the same connective flattened.
    ///
    /// Returns nothing if the connective is absorbed, i.e. if some argument is the zero of the connective or some argument is present alongside its negation.
    fn gather(
        &self,
        terms: &TermManager,
        args: Vec<Term>,
        conjunction: bool,
    ) -> Option<Vec<Term>> {
        let mut gathered: Vec<Term> = Vec::with_capacity(args.len());
        let mut todo = args;
        todo.reverse();

        while let Some(arg) = todo.pop() {
            match (terms.kind(arg), conjunction) {
                (TermKind::True, true) | (TermKind::False, false) => {}
                (TermKind::False, true) | (TermKind::True, false) => return None,

                (TermKind::And(nested), true) | (TermKind::Or(nested), false) if self.flat => {
                    todo.extend(nested.iter().rev())
                }

                _ => {
                    if gathered.contains(&arg) {
                        continue;
                    }
                    let complementary = gathered.iter().any(|other| {
                        terms.is_not(*other) == Some(arg) || terms.is_not(arg) == Some(*other)
                    });
                    if complementary {
                        return None;
                    }
                    gathered.push(arg);
                }
            }
        }
        Some(gathered)
    }

    fn simplify_and(&self, terms: &mut TermManager, args: Vec<Term>) -> Term {
        let Some(args) = self.gather(terms, args, true) else {
            return terms.mk_false();
        };
        match (args.len(), self.elim_and) {
            (0, _) => terms.mk_true(),
            (1, _) => args[0],
            (_, false) => terms.mk_and(args),
            (_, true) => {
                let negated = args.into_iter().map(|arg| negate(terms, arg)).collect();
                let disjunction = self.simplify_or(terms, negated);
                negate(terms, disjunction)
            }
        }
    }

    fn simplify_or(&self, terms: &mut TermManager, args: Vec<Term>) -> Term {
        let Some(args) = self.gather(terms, args, false) else {
            return terms.mk_true();
        };
        terms.mk_or(args)
    }

    fn simplify_bool_eq(&self, terms: &mut TermManager, a: Term, b: Term, rebuilt: Term) -> Term {
        if a == b {
            return terms.mk_true();
        }
        match (terms.kind(a), terms.kind(b)) {
            (TermKind::True, _) => b,
            (_, TermKind::True) => a,
            (TermKind::False, _) => negate(terms, b),
            (_, TermKind::False) => negate(terms, a),
            _ if terms.is_not(a) == Some(b) || terms.is_not(b) == Some(a) => terms.mk_false(),
            _ => rebuilt,
        }
    }

    fn simplify_ite(&self, terms: &mut TermManager, c: Term, a: Term, b: Term, rebuilt: Term) -> Term {
        match terms.kind(c) {
            TermKind::True => return a,
            TermKind::False => return b,
            _ => {}
        }
        if a == b {
            return a;
        }
        if !terms.is_bool(a) {
            return rebuilt;
        }
        match (terms.kind(a), terms.kind(b)) {
            (TermKind::True, TermKind::False) => c,
            (TermKind::False, TermKind::True) => negate(terms, c),
            (TermKind::True, _) => self.simplify_or(terms, vec![c, b]),
            (TermKind::False, _) => {
                let not_c = negate(terms, c);
                self.simplify_and(terms, vec![not_c, b])
            }
            (_, TermKind::True) => {
                let not_c = negate(terms, c);
                self.simplify_or(terms, vec![not_c, a])
            }
            (_, TermKind::False) => self.simplify_and(terms, vec![c, a]),
            _ => rebuilt,
        }
    }

    fn simplify_bv_binary(&self, terms: &mut TermManager, rebuilt: Term) -> Result<Term, PipelineFault> {
        let width = terms.bv_width(rebuilt).unwrap_or_default();
        let mask = width_mask(width);
        let (a, b) = match terms.kind(rebuilt) {
            TermKind::BvAnd(a, b)
            | TermKind::BvOr(a, b)
            | TermKind::BvXor(a, b)
            | TermKind::BvAdd(a, b) => (*a, *b),
            _ => return Ok(rebuilt),
        };
        let kind = terms.kind(rebuilt).clone();

        let numeral_of = |terms: &mut TermManager, value: u64| {
            terms
                .mk_numeral(value, width)
                .map_err(|_| ill_sorted(terms, rebuilt))
        };

        if let (Some(x), Some(y)) = (numeral(terms, a), numeral(terms, b)) {
            let value = match kind {
                TermKind::BvAnd(..) => x & y,
                TermKind::BvOr(..) => x | y,
                TermKind::BvXor(..) => x ^ y,
                _ => x.wrapping_add(y),
            };
            return numeral_of(terms, value);
        }

        let (term, constant) = match (numeral(terms, a), numeral(terms, b)) {
            (Some(value), None) => (b, Some(value)),
            (None, Some(value)) => (a, Some(value)),
            _ => (a, None),
        };

        let simplified = match (kind, constant) {
            (TermKind::BvAnd(..), Some(0)) => numeral_of(terms, 0)?,
            (TermKind::BvAnd(..), Some(value)) if value == mask => term,
            (TermKind::BvOr(..), Some(0)) => term,
            (TermKind::BvOr(..), Some(value)) if value == mask => numeral_of(terms, mask)?,
            (TermKind::BvXor(..) | TermKind::BvAdd(..), Some(0)) => term,

            (TermKind::BvAnd(..) | TermKind::BvOr(..), None) if a == b => a,
            (TermKind::BvXor(..), None) if a == b => numeral_of(terms, 0)?,

            _ => rebuilt,
        };
        Ok(simplified)
    }

    fn simplify_term(&mut self, terms: &mut TermManager, term: Term, children: Vec<Term>) -> Result<Term, PipelineFault> {
        let rebuilt = terms.with_children(term, children);
        let kind = terms.kind(rebuilt).clone();

        if matches!(
            kind,
            TermKind::Not(_) | TermKind::And(_) | TermKind::Or(_) | TermKind::Implies(..) | TermKind::Xor(..)
        ) && terms
            .children(rebuilt)
            .iter()
            .any(|child| !terms.is_bool(*child))
        {
            return Err(ill_sorted(terms, rebuilt));
        }

        let simplified = match kind {
            TermKind::Not(a) => negate(terms, a),

            TermKind::And(args) => self.simplify_and(terms, args),

            TermKind::Or(args) => self.simplify_or(terms, args),

            TermKind::Implies(a, b) => {
                let not_a = negate(terms, a);
                self.simplify_or(terms, vec![not_a, b])
            }

            TermKind::Xor(a, b) => match (terms.kind(a), terms.kind(b)) {
                _ if a == b => terms.mk_false(),
                (TermKind::False, _) => b,
                (_, TermKind::False) => a,
                (TermKind::True, _) => negate(terms, b),
                (_, TermKind::True) => negate(terms, a),
                _ => rebuilt,
            },

            TermKind::Eq(a, b) if terms.is_bool(a) => self.simplify_bool_eq(terms, a, b, rebuilt),

            TermKind::Eq(a, b) => match (numeral(terms, a), numeral(terms, b)) {
                _ if a == b => terms.mk_true(),
                (Some(x), Some(y)) => terms.mk_bool(x == y),
                _ => rebuilt,
            },

            TermKind::Ite(c, a, b) => self.simplify_ite(terms, c, a, b, rebuilt),

            TermKind::Distinct(args) if args.len() < 2 => terms.mk_true(),

            TermKind::Distinct(args) if self.blast_distinct => {
                let mut disequalities = Vec::default();
                for (index, a) in args.iter().enumerate() {
                    for b in &args[index + 1..] {
                        let eq = terms.mk_eq(*a, *b).map_err(|_| ill_sorted(terms, rebuilt))?;
                        let eq = self.simplify_term(terms, eq, vec![*a, *b])?;
                        disequalities.push(negate(terms, eq));
                    }
                }
                self.simplify_and(terms, disequalities)
            }

            TermKind::BvNot(a) => match terms.kind(a) {
                TermKind::BvNot(inner) => *inner,
                TermKind::Numeral(value) => {
                    let (value, width) = (!*value, terms.bv_width(a).unwrap_or_default());
                    terms
                        .mk_numeral(value, width)
                        .map_err(|_| ill_sorted(terms, rebuilt))?
                }
                _ => rebuilt,
            },

            TermKind::BvAnd(..) | TermKind::BvOr(..) | TermKind::BvXor(..) | TermKind::BvAdd(..) => {
                self.simplify_bv_binary(terms, rebuilt)?
            }

            TermKind::BvUlt(a, b) => match (numeral(terms, a), numeral(terms, b)) {
                _ if a == b => terms.mk_false(),
                (Some(x), Some(y)) => terms.mk_bool(x < y),
                (_, Some(0)) => terms.mk_false(),
                _ => rebuilt,
            },

            TermKind::BvUle(a, b) => match (numeral(terms, a), numeral(terms, b)) {
                _ if a == b => terms.mk_true(),
                (Some(x), Some(y)) => terms.mk_bool(x <= y),
                (Some(0), _) => terms.mk_true(),
                _ => rebuilt,
            },

            _ => rebuilt,
        };

        if simplified != term {
            self.rewrites += 1;
        }
        Ok(simplified)
    }
}

impl Stage for Simplify {
    fn name(&self) -> &'static str {
        "simplify"
    }

    fn apply(&mut self, goal: Goal, env: &mut StageEnv<'_>) -> Result<Vec<Goal>, PipelineFault> {
        let mut rewrite = |terms: &mut TermManager,
                           term: Term,
                           children: Vec<Term>|
         -> Result<Term, PipelineFault> { self.simplify_term(terms, term, children) };

        Ok(vec![rewrite_goal(goal, env.terms, &mut rewrite)?])
    }

    fn collect_statistics(&self, statistics: &mut Statistics) {
        statistics.update("simplify.rewrites", self.rewrites);
    }
}

#[cfg(test)]
mod simplify_tests {
    use super::*;
    use crate::{
        pipeline::{bit_blast::BitBlaster, converters::ConverterChain},
        structures::term::ResourceLimit,
    };

    fn simplify_one(terms: &mut TermManager, config: &PipelineConfig, formula: Term) -> Result<Vec<Term>, PipelineFault> {
        let mut bit_blaster = BitBlaster::new(config.max_bits.value);
        let mut converters = ConverterChain::default();
        let mut env = StageEnv {
            terms,
            bit_blaster: &mut bit_blaster,
            converters: &mut converters,
        };
        let mut goal = Goal::default();
        goal.push(env.terms, formula, None);

        let mut goals = Simplify::from_config(config).apply(goal, &mut env)?;
        Ok(goals.remove(0).formulas().iter().map(|f| f.formula).collect())
    }

    #[test]
    fn folding() {
        let mut terms = TermManager::default();
        let config = PipelineConfig::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");

        let top = terms.mk_true();
        let not_p = terms.mk_not(p);
        let p_or_not_p = terms.mk_or(vec![p, not_p]);
        let formula = terms.mk_implies(p_or_not_p, q);
        assert_eq!(simplify_one(&mut terms, &config, formula), Ok(vec![q]));

        let bottom = terms.mk_false();
        let formula = terms.mk_ite(p, top, bottom).unwrap();
        assert_eq!(simplify_one(&mut terms, &config, formula), Ok(vec![p]));
    }

    #[test]
    fn elim_and() {
        let mut terms = TermManager::default();
        let mut config = PipelineConfig::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let r = terms.mk_bool_const("r");

        let q_and_r = terms.mk_and(vec![q, r]);
        let formula = terms.mk_or(vec![p, q_and_r]);

        let simplified = simplify_one(&mut terms, &config, formula).unwrap();
        let not_q = terms.mk_not(q);
        let not_r = terms.mk_not(r);
        let not_q_or_not_r = terms.mk_or(vec![not_q, not_r]);
        let eliminated = terms.mk_not(not_q_or_not_r);
        assert_eq!(simplified, vec![terms.mk_or(vec![p, eliminated])]);

        config.elim_and.set(false).unwrap();
        let simplified = simplify_one(&mut terms, &config, formula).unwrap();
        assert_eq!(simplified, vec![formula]);
    }

    #[test]
    fn distinct_numerals() {
        let mut terms = TermManager::default();
        let config = PipelineConfig::default();
        let numerals = (0..3)
            .map(|value| terms.mk_numeral(value, 4).unwrap())
            .collect::<Vec<_>>();

        let formula = terms.mk_distinct(numerals.clone()).unwrap();
        assert_eq!(simplify_one(&mut terms, &config, formula), Ok(vec![]));

        let repeated = terms.mk_distinct(vec![numerals[1], numerals[1]]).unwrap();
        assert_eq!(
            simplify_one(&mut terms, &config, repeated),
            Ok(vec![terms.mk_false()])
        );
    }

    #[test]
    fn bv_identities() {
        let mut terms = TermManager::default();
        let config = PipelineConfig::default();
        let x = terms.mk_bv_const("x", 8).unwrap();
        let zero = terms.mk_numeral(0, 8).unwrap();
        let x_plus_zero = terms.mk_bvadd(x, zero).unwrap();
        let formula = terms.mk_eq(x_plus_zero, x).unwrap();

        assert_eq!(simplify_one(&mut terms, &config, formula), Ok(vec![]));

        let three = terms.mk_numeral(3, 8).unwrap();
        let four = terms.mk_numeral(4, 8).unwrap();
        let seven = terms.mk_numeral(7, 8).unwrap();
        let sum = terms.mk_bvadd(three, four).unwrap();
        let formula = terms.mk_bvult(sum, seven).unwrap();
        assert_eq!(
            simplify_one(&mut terms, &config, formula),
            Ok(vec![terms.mk_false()])
        );
    }

    #[test]
    fn ill_sorted_connective() {
        let mut terms = TermManager::default();
        let config = PipelineConfig::default();
        let p = terms.mk_bool_const("p");
        let x = terms.mk_bv_const("x", 8).unwrap();
        let formula = terms.mk_or(vec![p, x]);

        assert_eq!(
            simplify_one(&mut terms, &config, formula),
            Err(PipelineFault::SortMismatch("(or p x)".to_string()))
        );
    }

    #[test]
    fn canceled() {
        let limit = ResourceLimit::default();
        let mut terms = TermManager::new(limit.clone());
        let config = PipelineConfig::default();
        let p = terms.mk_bool_const("p");

        limit.cancel();
        assert_eq!(
            simplify_one(&mut terms, &config, p),
            Err(PipelineFault::Canceled)
        );
    }
}
