/*!
Cardinality constraints to boolean formulas.

`at-least k` of `x₁ … xₙ` is encoded as a sequential counter:

- at-least(0, xᵢ …) is true.
- at-least(k, xᵢ … xₙ) is false, if fewer than k arguments remain.
- at-least(k, xᵢ …) is (xᵢ ∧ at-least(k - 1, xᵢ₊₁ …)) ∨ (¬xᵢ ∧ at-least(k, xᵢ₊₁ …)).

Sub-formulas are shared through the hash-consing of the term manager, so the encoding is of size O(k·n).
And, `at-most k` is encoded as the negation of `at-least k + 1`.

Unless trivial, the encoding of each constraint is named by a fresh constant `c`, and the definition `c = encoding` is added to the goal without a dependency.
Each fresh constant is hidden from models by a [Filter](crate::pipeline::converters::ModelConverter::Filter) converter.

Constants `true` and `false` introduced by the encoding are folded by the following [simplification](crate::pipeline::simplify).
*/

use std::collections::HashMap;

use crate::{
    reports::Statistics,
    structures::{
        goal::Goal,
        term::{Term, TermKind, TermManager},
    },
    types::err::PipelineFault,
};

use super::{converters::ModelConverter, rewrite_goal, Stage, StageEnv};

/// The cardinality elimination stage.
#[derive(Default)]
pub struct Card2Bv {
    /// A count of constraints encoded.
    encoded: u64,
}

/// at-least(k, args[from..]), memoized on (k, from).
fn at_least(
    terms: &mut TermManager,
    k: u32,
    args: &[Term],
    from: usize,
    memo: &mut HashMap<(u32, usize), Term>,
) -> Term {
    if k == 0 {
        return terms.mk_true();
    }
    if args.len() - from < k as usize {
        return terms.mk_false();
    }
    if let Some(encoded) = memo.get(&(k, from)) {
        return *encoded;
    }

    let x = args[from];
    let with = at_least(terms, k - 1, args, from + 1, memo);
    let without = at_least(terms, k, args, from + 1, memo);

    let x_and_with = terms.mk_and(vec![x, with]);
    let not_x = terms.mk_not(x);
    let not_x_and_without = terms.mk_and(vec![not_x, without]);
    let encoded = terms.mk_or(vec![x_and_with, not_x_and_without]);

    memo.insert((k, from), encoded);
    encoded
}

impl Stage for Card2Bv {
    fn name(&self) -> &'static str {
        "card2bv"
    }

    fn apply(&mut self, goal: Goal, env: &mut StageEnv<'_>) -> Result<Vec<Goal>, PipelineFault> {
        let encoded = &mut self.encoded;
        let mut definitions = Vec::default();

        let mut rewrite = |terms: &mut TermManager,
                           term: Term,
                           children: Vec<Term>|
         -> Result<Term, PipelineFault> {
            let rebuilt = terms.with_children(term, children);
            let (encoding, negated) = match terms.kind(rebuilt).clone() {
                TermKind::AtLeast(k, args) => (at_least(terms, k, &args, 0, &mut HashMap::default()), false),

                TermKind::AtMost(k, args) => {
                    let exceeded = at_least(terms, k.saturating_add(1), &args, 0, &mut HashMap::default());
                    (exceeded, true)
                }

                _ => return Ok(rebuilt),
            };
            *encoded += 1;

            let named = match terms.kind(encoding) {
                TermKind::True | TermKind::False => encoding,
                _ => {
                    let name = terms.mk_fresh_bool("card");
                    let definition = terms
                        .mk_eq(name, encoding)
                        .map_err(|e| PipelineFault::Stage("card2bv", format!("{e:?}")))?;
                    definitions.push((name, definition));
                    name
                }
            };

            match negated {
                true => Ok(terms.mk_not(named)),
                false => Ok(named),
            }
        };

        let mut goal = rewrite_goal(goal, env.terms, &mut rewrite)?;

        if !definitions.is_empty() {
            let mut names = Vec::with_capacity(definitions.len());
            for (name, definition) in definitions {
                goal.push_unsplit(definition, None);
                names.push(name);
            }
            env.converters.push(ModelConverter::Filter(names));
        }

        Ok(vec![goal])
    }

    fn collect_statistics(&self, statistics: &mut Statistics) {
        statistics.update("card2bv.encoded", self.encoded);
    }
}

#[cfg(test)]
mod card2bv_tests {
    use super::*;
    use crate::{
        pipeline::{bit_blast::BitBlaster, converters::ConverterChain},
        structures::model::{Model, Value},
    };

    /// Every valuation of the arguments agrees on the constraint and its encoding.
    fn agrees(k: u32, n: usize, at_most: bool) {
        let mut terms = TermManager::default();
        let args = (0..n)
            .map(|index| terms.mk_bool_const(&format!("x{index}")))
            .collect::<Vec<_>>();

        let constraint = match at_most {
            true => terms.mk_at_most(k, args.clone()).unwrap(),
            false => terms.mk_at_least(k, args.clone()).unwrap(),
        };
        let encoding = match at_most {
            true => {
                let exceeded = at_least(&mut terms, k + 1, &args, 0, &mut HashMap::default());
                terms.mk_not(exceeded)
            }
            false => at_least(&mut terms, k, &args, 0, &mut HashMap::default()),
        };

        for valuation in 0..(1_u32 << n) {
            let mut model = Model::default();
            for (index, arg) in args.iter().enumerate() {
                model.register(*arg, Value::Bool(valuation & (1 << index) != 0));
            }
            assert_eq!(
                model.eval(&terms, constraint, false),
                model.eval(&terms, encoding, false)
            );
        }
    }

    #[test]
    fn at_least_encoding() {
        for k in 0..=5 {
            agrees(k, 4, false);
        }
    }

    #[test]
    fn at_most_encoding() {
        for k in 0..=4 {
            agrees(k, 4, true);
        }
    }

    #[test]
    fn encodings_are_named() {
        let mut terms = TermManager::default();
        let args = ["p", "q", "r"].map(|name| terms.mk_bool_const(name)).to_vec();
        let at_most_one = terms.mk_at_most(1, args.clone()).unwrap();
        let at_least_four = terms.mk_at_least(4, args).unwrap();

        let mut goal = Goal::default();
        goal.push(&mut terms, at_most_one, None);
        goal.push(&mut terms, at_least_four, None);

        let mut bit_blaster = BitBlaster::new(8);
        let mut converters = ConverterChain::default();
        let mut env = StageEnv {
            terms: &mut terms,
            bit_blaster: &mut bit_blaster,
            converters: &mut converters,
        };
        let mut stage = Card2Bv::default();
        let goals = stage.apply(goal, &mut env).unwrap();

        // The negated name, false, and the definition of the name.
        assert_eq!(goals[0].len(), 3);
        assert_eq!(converters.len(), 1);
        assert_eq!(stage.encoded, 2);
    }
}
