/*!
Lowering, aka. the internalization of formulas as clauses of the engine.

# Overview

Pending formulas of the [formula log](crate::db::formula_log) are lowered by [internalize_formulas](GenericContext::internalize_formulas):
1. A goal is made of the pending formulas.
2. The goal is given to the [pipeline](crate::pipeline), which is built on demand from the configuration of the context.
3. The single residual goal of the pipeline is translated to clauses by [goal2sat](crate::pipeline::goal2sat).

On success the lowered prefix of the log is advanced to the end of the log.
Otherwise the check which required the lowering returns unknown, the prefix is unchanged, and the reason is recorded:
- If a stage raised a fault, the pipeline is discarded, and the reason is the fault.
  The bit-blaster is kept, as clauses over the bits of each constant blasted by a previous lowering remain with the engine.
- If the pipeline did not return exactly one goal, the reason names the count of goals.
- If the residual goal contains interpreted atoms, the reason names the atoms.

# Bit-blaster scopes
The bit-blaster is built alongside the pipeline, and when built the bit-blaster is fast-forwarded to the current scope depth.
So, each pop of the context pops the bit-blaster, though constants blasted before the bit-blaster was (re)built are not known to it.
*/

use crate::{
    context::GenericContext,
    engine::BooleanEngine,
    misc::log::targets,
    pipeline::{bit_blast::BitBlaster, goal2sat, Pipeline, StageEnv},
    reports::Report,
    structures::{atom::Atom, goal::Goal, term::Classification, term::Term},
};

impl<E: BooleanEngine> GenericContext<E> {
    /// Lowers each pending formula.
    pub fn internalize_formulas(&mut self) -> Report {
        let pending = self.formula_log.pending().to_vec();
        if pending.is_empty() {
            return Report::Satisfiable;
        }

        let mut goal = Goal::default();
        for formula in &pending {
            goal.push(&mut self.terms, *formula, None);
        }

        let report = self.internalize_goal(goal);
        if report == Report::Satisfiable {
            self.formula_log.mark_lowered();
            self.counters.lowered_formulas += pending.len() as u64;
            log::info!(target: targets::LOWERING, "Lowered {} formulas", pending.len());
        }
        report
    }

    /// Gives a goal to the pipeline, and adds the clauses of the residual goal to the engine.
    pub(crate) fn internalize_goal(&mut self, goal: Goal) -> Report {
        let mut pipeline = self
            .pipeline
            .take()
            .unwrap_or_else(|| Pipeline::from_config(&self.config.pipeline, &self.stage_factories));

        let mut bit_blaster = match self.bit_blaster.take() {
            Some(bit_blaster) => bit_blaster,
            None => {
                let mut bit_blaster = BitBlaster::new(self.config.pipeline.max_bits.value);
                for _ in 0..self.formula_log.depth() {
                    bit_blaster.push();
                }
                bit_blaster
            }
        };

        let mut env = StageEnv {
            terms: &mut self.terms,
            bit_blaster: &mut bit_blaster,
            converters: &mut self.converters,
        };

        let result = pipeline.apply(goal, &mut env);
        self.bit_blaster = Some(bit_blaster);

        let mut goals = match result {
            Ok(goals) => goals,
            Err(fault) => {
                log::info!(target: targets::LOWERING, "Pipeline discarded: {fault}");
                self.counters.faults += 1;
                self.reason_unknown = fault.to_string();
                return Report::Unknown;
            }
        };
        self.pipeline = Some(pipeline);

        if goals.len() != 1 {
            self.reason_unknown = format!("expected a single goal from the pipeline, found {}", goals.len());
            log::info!(target: targets::LOWERING, "{}", self.reason_unknown);
            return Report::Unknown;
        }
        let Some(goal) = goals.pop() else {
            return Report::Unknown;
        };

        match goal2sat::lower(
            &self.terms,
            &goal,
            &mut self.engine,
            &mut self.atom_map,
            &mut self.dep_map,
        ) {
            Ok(()) => Report::Satisfiable,

            Err(atoms) => {
                self.reason_unknown = format!(
                    "interpreted atoms sent to SAT solver {}",
                    self.terms.display_all(&atoms)
                );
                log::info!(target: targets::LOWERING, "{}", self.reason_unknown);
                Report::Unknown
            }
        }
    }

    /// The atoms which cover a variable, for a boolean constant or a blasted bit-vector constant.
    ///
    /// Nothing is returned for any other term, for a bit-vector constant which has not been blasted, or if some atom is missing from the atom map.
    pub(crate) fn internalize_var(&self, var: Term) -> Option<Vec<Atom>> {
        match self.terms.classify(var) {
            Classification::PlainBooleanAtom => self.atom_map.atom_of(var).map(|atom| vec![atom]),

            Classification::BitVectorAtom(_) => {
                let bits = self.bit_blaster.as_ref()?.bits_of(var)?;
                bits.iter().map(|bit| self.atom_map.atom_of(*bit)).collect()
            }

            Classification::Unsupported => {
                log::trace!(target: targets::LOWERING, "Unsupported variable {}", self.terms.display(var));
                None
            }
        }
    }
}
