use crate::{
    config::Config,
    db::{atom_map::AtomMap, formula_log::FormulaLog},
    engine::BooleanEngine,
    pipeline::{
        bit_blast::BitBlaster,
        converters::{ConverterChain, PowerTable},
        Pipeline, StageFactory,
    },
    procedures::assumptions::DepMap,
    reports::{Report, Statistics},
    structures::{
        literal::CLiteral,
        model::Model,
        term::{Term, TermManager},
    },
};

use super::{ContextState, Counters};

/// The reason given for unknown, if no other reason is known.
pub const DEFAULT_REASON_UNKNOWN: &str = "no reason given";

/// A generic context, parameratised to a boolean engine.
///
/// # Example
///
/// ```rust
/// # use otter_inc::context::GenericContext;
/// # use otter_inc::engine::Engine;
/// # use otter_inc::config::Config;
/// # use otter_inc::structures::term::TermManager;
/// let context = GenericContext::<Engine>::with_terms(Config::default(), TermManager::default());
/// assert_eq!(context.scope_level(), 0);
/// ```
pub struct GenericContext<E: BooleanEngine> {
    /// The configuration of a context.
    pub config: Config,

    /// Counters related to a context.
    pub counters: Counters,

    /// The owner of each term asserted to the context.
    pub(crate) terms: TermManager,

    /// The boolean engine.
    pub engine: E,

    /// The formulas and guards asserted to the context.
    /// See [db::formula_log](crate::db::formula_log) for details.
    pub(crate) formula_log: FormulaLog,

    /// The map between boolean atoms and atoms of the engine.
    /// See [db::atom_map](crate::db::atom_map) for details.
    pub(crate) atom_map: AtomMap,

    /// The pipeline, built on demand.
    pub(crate) pipeline: Option<Pipeline>,

    /// The bit-blaster, built alongside the pipeline.
    pub(crate) bit_blaster: Option<BitBlaster>,

    /// Persistent model converters emitted by stages of the pipeline.
    pub(crate) converters: ConverterChain,

    /// Constructors for stages added to the pipeline.
    pub(crate) stage_factories: Vec<StageFactory>,

    /// The literal of each assumption of the most recent check.
    pub(crate) dep_map: DepMap,

    /// The literals assumed during the most recent check.
    pub(crate) assumption_literals: Vec<CLiteral>,

    /// The weights of the literals assumed during the most recent check, if weighted.
    pub(crate) weights: Vec<f64>,

    /// The unsatisfiable core of the most recent check.
    pub(crate) core: Vec<Term>,

    /// The model of the most recent check, built on demand.
    pub(crate) model: Option<Model>,

    pub(crate) powers: PowerTable,

    pub(crate) reason_unknown: String,

    /// The status of the context.
    pub state: ContextState,
}

impl<E: BooleanEngine> GenericContext<E> {
    /// A context whose terms are owned by the given manager.
    ///
    /// The engine of the context is canceled through the resource limit of the manager.
    pub fn with_terms(config: Config, terms: TermManager) -> Self {
        let engine = E::from_config(&config.engine, terms.limit().clone());
        GenericContext {
            config,
            counters: Counters::default(),
            terms,
            engine,
            formula_log: FormulaLog::default(),
            atom_map: AtomMap::default(),
            pipeline: None,
            bit_blaster: None,
            converters: ConverterChain::default(),
            stage_factories: Vec::default(),
            dep_map: DepMap::default(),
            assumption_literals: Vec::default(),
            weights: Vec::default(),
            core: Vec::default(),
            model: None,
            powers: PowerTable::default(),
            reason_unknown: DEFAULT_REASON_UNKNOWN.to_owned(),
            state: ContextState::Input,
        }
    }

    /// A report on the state of the context.
    pub fn report(&self) -> Report {
        Report::from(&self.state)
    }

    pub fn terms(&self) -> &TermManager {
        &self.terms
    }

    /// Mutable access to the term manager, e.g. to construct formulas.
    pub fn terms_mut(&mut self) -> &mut TermManager {
        &mut self.terms
    }

    pub fn atom_map(&self) -> &AtomMap {
        &self.atom_map
    }

    pub fn formula_log(&self) -> &FormulaLog {
        &self.formula_log
    }

    /// The bit-blaster, if the pipeline has been built.
    pub fn bit_blaster(&self) -> Option<&BitBlaster> {
        self.bit_blaster.as_ref()
    }

    /// The reason the most recent check returned unknown.
    pub fn reason_unknown(&self) -> &str {
        &self.reason_unknown
    }

    pub fn set_reason_unknown(&mut self, reason: &str) {
        self.reason_unknown = reason.to_owned();
    }

    /// Replaces the configuration of the context.
    ///
    /// The pipeline is rebuilt on next use, and the engine takes the engine configuration.
    pub fn update_config(&mut self, config: Config) {
        self.pipeline = None;
        if let Some(bit_blaster) = self.bit_blaster.as_mut() {
            bit_blaster.set_max_bits(config.pipeline.max_bits.value);
        }
        self.engine.update_config(&config.engine);
        self.config = config;
    }

    /// Adds a stage to the end of the pipeline, built by the given factory whenever the pipeline is built.
    pub fn add_stage(&mut self, factory: StageFactory) {
        self.stage_factories.push(factory);
        self.pipeline = None;
    }

    /// Statistics from the context, the pipeline, and the engine.
    pub fn collect_statistics(&self) -> Statistics {
        let mut statistics = Statistics::default();
        statistics.update("context.checks", self.counters.checks);
        statistics.update("context.lowered_formulas", self.counters.lowered_formulas);
        statistics.update("context.unknowns", self.counters.unknowns);
        statistics.update("pipeline.faults", self.counters.faults);

        if let Some(pipeline) = &self.pipeline {
            pipeline.collect_statistics(&mut statistics);
        }
        if let Some(bit_blaster) = &self.bit_blaster {
            statistics.update("bit_blast.bits", bit_blaster.bit_count() as u64);
        }
        self.engine.collect_statistics(&mut statistics);
        statistics
    }

    /// Notes some input to the context, invalidating any model or core.
    pub(crate) fn note_input(&mut self) {
        self.model = None;
        self.core.clear();
        self.state = ContextState::Input;
    }
}
