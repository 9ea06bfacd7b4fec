/*!
The lowering pipeline, aka. the passes which turn a goal of formulas into a goal the engine can take as clauses.

The pipeline is a fixed composition of [stages](Stage):

1. [card2bv](card2bv) --- cardinality constraints to boolean formulas.
2. [simplify](simplify) --- constant folding, with flattening, `elim_and`, and `blast_distinct` as [configured](crate::config::PipelineConfig).
3. [max_sharing](max_sharing) --- re-association of bit-vector operators to share existing terms.
4. [bit_blast](bit_blast) --- bit-vector terms to formulas over bits.
5. [simplify](simplify), once more.

Followed by any stage [added](crate::context::GenericContext::add_stage) to a context.

Each stage maps a goal to zero or more goals, and each goal returned by a stage is given to the next stage.
A stage may raise a [PipelineFault], in which case the pipeline is discarded by the context and the check which required lowering returns unknown.

After the pipeline, the (single) residual goal is given to [goal2sat], which adds clauses to the engine.

# State
Stages share a [StageEnv], which gives access to:
- The term manager.
- The [bit-blaster](bit_blast::BitBlaster), whose map from bit-vector constants to bits persists across calls and is scope-aware.
- The chain of persistent [model converters](converters), to which a stage may append a converter.

# Example

```rust
# use otter_inc::config::PipelineConfig;
# use otter_inc::pipeline::{bit_blast::BitBlaster, converters::ConverterChain, Pipeline, StageEnv};
# use otter_inc::structures::{goal::Goal, term::TermManager};
let mut terms = TermManager::default();
let x = terms.mk_bv_const("x", 2).unwrap();
let two = terms.mk_numeral(2, 2).unwrap();
let x_is_two = terms.mk_eq(x, two).unwrap();

let config = PipelineConfig::default();
let mut pipeline = Pipeline::from_config(&config, &[]);
let mut bit_blaster = BitBlaster::new(config.max_bits.value);
let mut converters = ConverterChain::default();

let mut goal = Goal::default();
goal.push(&mut terms, x_is_two, None);

let mut env = StageEnv {
    terms: &mut terms,
    bit_blaster: &mut bit_blaster,
    converters: &mut converters,
};
let goals = pipeline.apply(goal, &mut env).unwrap();

// x = 2 is the conjunction of the negation of the low bit of x and the high bit of x.
assert_eq!(goals.len(), 1);
assert_eq!(goals[0].len(), 2);
assert_eq!(bit_blaster.bits_of(x).map(|bits| bits.len()), Some(2));
```
*/

pub mod bit_blast;
pub mod card2bv;
pub mod converters;
pub mod goal2sat;
pub mod max_sharing;
pub mod simplify;

use std::collections::HashMap;

use crate::{
    config::PipelineConfig,
    misc::log::targets,
    reports::Statistics,
    structures::{
        goal::Goal,
        term::{Term, TermManager},
    },
    types::err::PipelineFault,
};

use bit_blast::BitBlaster;
use converters::ConverterChain;

/// The state shared by stages of the pipeline.
pub struct StageEnv<'a> {
    pub terms: &'a mut TermManager,
    pub bit_blaster: &'a mut BitBlaster,
    pub converters: &'a mut ConverterChain,
}

/// A stage of the pipeline.
pub trait Stage {
    /// The name of the stage, used in logs and faults.
    fn name(&self) -> &'static str;

    /// The goals which together are equisatisfiable with the given goal.
    fn apply(&mut self, goal: Goal, env: &mut StageEnv<'_>) -> Result<Vec<Goal>, PipelineFault>;

    fn collect_statistics(&self, _statistics: &mut Statistics) {}
}

/// A constructor for a stage, used to rebuild any stage added to a context whenever the pipeline is rebuilt.
pub type StageFactory = std::rc::Rc<dyn Fn(&PipelineConfig) -> Box<dyn Stage>>;

/// The composition of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The fixed composition of stages, followed by a stage from each of the given factories.
    pub fn from_config(config: &PipelineConfig, factories: &[StageFactory]) -> Self {
        let mut stages: Vec<Box<dyn Stage>> = vec![
            Box::new(card2bv::Card2Bv::default()),
            Box::new(simplify::Simplify::from_config(config)),
            Box::new(max_sharing::MaxSharing::default()),
            Box::new(bit_blast::BitBlast::default()),
            Box::new(simplify::Simplify::from_config(config)),
        ];
        stages.extend(factories.iter().map(|factory| factory(config)));
        Pipeline { stages }
    }

    /// Applies each stage in turn.
    pub fn apply(&mut self, goal: Goal, env: &mut StageEnv<'_>) -> Result<Vec<Goal>, PipelineFault> {
        let mut goals = vec![goal];
        for stage in &mut self.stages {
            let mut next = Vec::with_capacity(goals.len());
            for goal in goals {
                match stage.apply(goal, env) {
                    Ok(result) => next.extend(result),
                    Err(fault) => {
                        log::info!(target: targets::PIPELINE, "{} raised: {fault}", stage.name());
                        return Err(fault);
                    }
                }
            }
            log::trace!(target: targets::PIPELINE, "{} returned {} goals", stage.name(), next.len());
            goals = next;
        }
        Ok(goals)
    }

    pub fn collect_statistics(&self, statistics: &mut Statistics) {
        for stage in &self.stages {
            stage.collect_statistics(statistics);
        }
    }
}

/// The fault for an ill-sorted term.
pub fn ill_sorted(terms: &TermManager, term: Term) -> PipelineFault {
    PipelineFault::SortMismatch(terms.display(term).to_string())
}

/// Rewrites a term bottom up, with each (distinct) sub-term rewritten at most once.
///
/// The rewrite is given the original term and the rewritten arguments of the term.
pub fn rewrite_bottom_up<F>(
    terms: &mut TermManager,
    term: Term,
    cache: &mut HashMap<Term, Term>,
    rewrite: &mut F,
) -> Result<Term, PipelineFault>
where
    F: FnMut(&mut TermManager, Term, Vec<Term>) -> Result<Term, PipelineFault>,
{
    if let Some(rewritten) = cache.get(&term) {
        return Ok(*rewritten);
    }
    if terms.limit().is_canceled() {
        return Err(PipelineFault::Canceled);
    }

    let children = terms.children(term);
    let mut rewritten_children = Vec::with_capacity(children.len());
    for child in children {
        rewritten_children.push(rewrite_bottom_up(terms, child, cache, rewrite)?);
    }

    let rewritten = rewrite(terms, term, rewritten_children)?;
    cache.insert(term, rewritten);
    Ok(rewritten)
}

/// Rewrites each formula of a goal, keeping the dependency of each formula.
pub fn rewrite_goal<F>(goal: Goal, terms: &mut TermManager, rewrite: &mut F) -> Result<Goal, PipelineFault>
where
    F: FnMut(&mut TermManager, Term, Vec<Term>) -> Result<Term, PipelineFault>,
{
    let mut cache = HashMap::default();
    let mut rewritten_goal = Goal::default();
    for goal_formula in goal {
        let formula = rewrite_bottom_up(terms, goal_formula.formula, &mut cache, rewrite)?;
        rewritten_goal.push(terms, formula, goal_formula.dependency);
    }
    Ok(rewritten_goal)
}
