use std::time::Instant;

use petgraph::graphmap::UnGraphMap;
use rand::{Rng, SeedableRng};

use crate::{
    config::EngineConfig,
    generic::minimal_pcg::MinimalPCG32,
    misc::log::targets,
    reports::{Report, Statistics},
    structures::{
        atom::{Atom, TOP_ATOM},
        clause::{preprocess_clause, CClause, Clause, Preprocessed},
        literal::{CLiteral, Literal},
        term::ResourceLimit,
        valuation::{CValuation, Valuation},
    },
};

use super::{BooleanEngine, REASON_CANCELED, REASON_TIME_LIMIT};

/// Counts for various things which count, roughly.
#[derive(Default)]
struct Counters {
    checks: u64,
    searches: u64,
    decisions: u64,
    conflicts: u64,
    propagations: u64,
}

/// A decision, or an assumption, made during a search.
struct Decision {
    /// The length of the trail before the decision was made.
    trail_length: usize,

    literal: CLiteral,

    /// Whether the decision is the negation of some previous decision.
    flipped: bool,

    assumption: bool,
}

/// The result of a search.
enum Search {
    Satisfiable,

    /// Unsatisfiable, with the (unminimized) core.
    Unsatisfiable(Vec<CLiteral>),

    Unknown(&'static str),
}

enum ClauseStatus {
    Satisfied,
    Unit(CLiteral),
    Open,
    Falsified,
}

/// A DPLL engine.
pub struct Engine {
    config: EngineConfig,

    limit: ResourceLimit,

    /// A count of atoms, including the top atom.
    atom_count: Atom,

    clauses: Vec<CClause>,

    /// The clauses containing each literal, indexed by the [index](Literal::index) of the literal.
    occurrences: Vec<Vec<usize>>,

    /// The index of the first empty clause, if any.
    empty_clause: Option<usize>,

    /// The count of clauses at each user push.
    scopes: Vec<usize>,

    valuation: CValuation,

    trail: Vec<CLiteral>,

    /// The index of the next literal on the trail to propagate.
    q_head: usize,

    saved_phases: Vec<Option<bool>>,

    model: Option<CValuation>,

    core: Vec<CLiteral>,

    rng: MinimalPCG32,

    counters: Counters,

    unknown: Option<&'static str>,
}

impl Engine {
    fn ensure_atom(&mut self, atom: Atom) {
        while self.atom_count <= atom {
            self.fresh_atom();
        }
    }

    fn literal_value(&self, literal: CLiteral) -> Option<bool> {
        self.valuation[literal.atom() as usize].map(|value| value == literal.polarity())
    }

    fn assign(&mut self, literal: CLiteral) {
        self.valuation[literal.atom() as usize] = Some(literal.polarity());
        self.saved_phases[literal.atom() as usize] = Some(literal.polarity());
        self.trail.push(literal);
    }

    fn undo_to(&mut self, trail_length: usize) {
        for literal in self.trail.drain(trail_length..) {
            self.valuation[literal.atom() as usize] = None;
        }
        self.q_head = trail_length;
    }

    fn clause_status(&self, index: usize) -> ClauseStatus {
        let mut unassigned = None;
        let mut unassigned_count = 0;
        for literal in self.clauses[index].literals() {
            match self.literal_value(*literal) {
                Some(true) => return ClauseStatus::Satisfied,
                Some(false) => {}
                None => {
                    unassigned_count += 1;
                    unassigned = Some(*literal);
                }
            }
        }
        match (unassigned_count, unassigned) {
            (0, _) => ClauseStatus::Falsified,
            (1, Some(literal)) => ClauseStatus::Unit(literal),
            _ => ClauseStatus::Open,
        }
    }

    /// Propagates each literal on the trail which has not been propagated, returning the index of a falsified clause on a conflict.
    fn propagate(&mut self) -> Result<(), usize> {
        while self.q_head < self.trail.len() {
            let falsified = self.trail[self.q_head].negate().index();
            self.q_head += 1;

            for occurrence in 0..self.occurrences[falsified].len() {
                let clause = self.occurrences[falsified][occurrence];
                match self.clause_status(clause) {
                    ClauseStatus::Satisfied | ClauseStatus::Open => {}
                    ClauseStatus::Unit(literal) => {
                        self.counters.propagations += 1;
                        self.assign(literal)
                    }
                    ClauseStatus::Falsified => return Err(clause),
                }
            }
        }
        Ok(())
    }

    /// Clears the valuation, values the top atom, and assigns each unit clause.
    fn reset_valuation(&mut self) -> Result<(), usize> {
        self.undo_to(0);
        self.valuation.iter_mut().for_each(|value| *value = None);
        self.assign(CLiteral::new(TOP_ATOM, true));

        if let Some(index) = self.empty_clause {
            return Err(index);
        }

        for index in 0..self.clauses.len() {
            if self.clauses[index].size() != 1 {
                continue;
            }
            match self.clause_status(index) {
                ClauseStatus::Unit(literal) => self.assign(literal),
                ClauseStatus::Falsified => return Err(index),
                _ => {}
            }
        }
        Ok(())
    }

    fn choose_polarity(&mut self, atom: Atom) -> bool {
        match (
            self.config.phase_saving.value,
            self.saved_phases[atom as usize],
        ) {
            (true, Some(phase)) => phase,
            _ => self.rng.gen_bool(self.config.polarity_lean.value),
        }
    }

    fn deadline(&self) -> Option<Instant> {
        match self.config.time_limit.value.is_zero() {
            true => None,
            false => Instant::now().checked_add(self.config.time_limit.value),
        }
    }

    /// A search for a full valuation which satisfies every clause and every assumption.
    ///
    /// Assumptions are made in order before any decision, and on an unsatisfiable search the core is the assumptions made up to the conflict.
    fn search(&mut self, assumptions: &[CLiteral], deadline: Option<Instant>) -> Search {
        self.counters.searches += 1;

        if self.reset_valuation().is_err() {
            return Search::Unsatisfiable(Vec::default());
        }

        let mut decisions: Vec<Decision> = Vec::default();
        let mut next_assumption = 0;

        'search_loop: loop {
            if self.limit.is_canceled() {
                return Search::Unknown(REASON_CANCELED);
            }
            if deadline.is_some_and(|deadline| Instant::now() > deadline) {
                return Search::Unknown(REASON_TIME_LIMIT);
            }

            if self.propagate().is_err() {
                self.counters.conflicts += 1;

                loop {
                    let Some(decision) = decisions.pop() else {
                        return Search::Unsatisfiable(Vec::default());
                    };
                    self.undo_to(decision.trail_length);

                    if decision.assumption {
                        return Search::Unsatisfiable(assumptions[..next_assumption].to_vec());
                    }

                    if !decision.flipped {
                        let flipped = decision.literal.negate();
                        decisions.push(Decision {
                            trail_length: decision.trail_length,
                            literal: flipped,
                            flipped: true,
                            assumption: false,
                        });
                        self.assign(flipped);
                        continue 'search_loop;
                    }
                }
            }

            if let Some(assumption) = assumptions.get(next_assumption) {
                next_assumption += 1;
                match self.literal_value(*assumption) {
                    Some(true) => {}
                    Some(false) => {
                        return Search::Unsatisfiable(assumptions[..next_assumption].to_vec());
                    }
                    None => {
                        decisions.push(Decision {
                            trail_length: self.trail.len(),
                            literal: *assumption,
                            flipped: false,
                            assumption: true,
                        });
                        self.assign(*assumption);
                    }
                }
                continue 'search_loop;
            }

            let unassigned = self.valuation.unvalued_atoms().find(|atom| *atom != TOP_ATOM);
            match unassigned {
                None => {
                    self.model = Some(self.valuation.clone());
                    return Search::Satisfiable;
                }

                Some(atom) => {
                    self.counters.decisions += 1;
                    let literal = CLiteral::new(atom, self.choose_polarity(atom));
                    decisions.push(Decision {
                        trail_length: self.trail.len(),
                        literal,
                        flipped: false,
                        assumption: false,
                    });
                    self.assign(literal);
                }
            }
        }
    }

    /// Removes assumptions from a core one at a time, keeping the removal whenever the remaining assumptions are unsatisfiable.
    fn minimize_core(&mut self, mut core: Vec<CLiteral>, deadline: Option<Instant>) -> Vec<CLiteral> {
        let mut index = 0;
        while index < core.len() {
            let mut candidate = core.clone();
            candidate.remove(index);
            match self.search(&candidate, deadline) {
                Search::Unsatisfiable(smaller) => core = smaller,
                Search::Satisfiable => index += 1,
                Search::Unknown(_) => break,
            }
        }
        self.model = None;
        core
    }

    fn check_assumptions(&mut self, assumptions: &[CLiteral], deadline: Option<Instant>) -> Report {
        match self.search(assumptions, deadline) {
            Search::Satisfiable => Report::Satisfiable,

            Search::Unsatisfiable(core) => {
                self.core = match self.config.minimize_core.value {
                    true => self.minimize_core(core, deadline),
                    false => core,
                };
                Report::Unsatisfiable
            }

            Search::Unknown(reason) => {
                self.unknown = Some(reason);
                Report::Unknown
            }
        }
    }

    /// Accepts assumptions from the heaviest, dropping any assumption which conflicts with those accepted at the cost of its weight.
    ///
    /// Assumptions of equal weight are accepted in order.
    fn check_weighted(
        &mut self,
        assumptions: &[CLiteral],
        weights: &[f64],
        max_weight: f64,
        deadline: Option<Instant>,
    ) -> Report {
        let weight_of = |index: usize| weights.get(index).copied().unwrap_or_default();
        let mut order = (0..assumptions.len()).collect::<Vec<_>>();
        order.sort_by(|a, b| weight_of(*b).total_cmp(&weight_of(*a)));

        let mut accepted = Vec::with_capacity(assumptions.len());
        let mut penalty = 0.0;

        for index in order {
            accepted.push(assumptions[index]);
            match self.search(&accepted, deadline) {
                Search::Satisfiable => {}

                Search::Unsatisfiable(core) if core.is_empty() => {
                    self.model = None;
                    return Report::Unsatisfiable;
                }

                Search::Unsatisfiable(_) => {
                    penalty += weight_of(index);
                    if penalty > max_weight {
                        log::trace!(target: targets::ENGINE, "Weight {penalty} exceeds {max_weight}");
                        self.model = None;
                        self.core = accepted;
                        return Report::Unsatisfiable;
                    }
                    accepted.pop();
                }

                Search::Unknown(reason) => {
                    self.unknown = Some(reason);
                    return Report::Unknown;
                }
            }
        }

        self.check_assumptions(&accepted, deadline)
    }
}

impl BooleanEngine for Engine {
    fn from_config(config: &EngineConfig, limit: ResourceLimit) -> Self {
        let mut engine = Engine {
            config: config.clone(),
            limit,
            atom_count: 0,
            clauses: Vec::default(),
            occurrences: Vec::default(),
            empty_clause: None,
            scopes: Vec::default(),
            valuation: Vec::default(),
            trail: Vec::default(),
            q_head: 0,
            saved_phases: Vec::default(),
            model: None,
            core: Vec::default(),
            rng: MinimalPCG32::from_seed(0_u64.to_le_bytes()),
            counters: Counters::default(),
            unknown: None,
        };
        let top = engine.fresh_atom();
        debug_assert_eq!(top, TOP_ATOM);
        engine
    }

    fn update_config(&mut self, config: &EngineConfig) {
        self.config = config.clone();
    }

    fn fresh_atom(&mut self) -> Atom {
        let atom = self.atom_count;
        self.atom_count += 1;
        self.valuation.push(None);
        self.saved_phases.push(None);
        self.occurrences.push(Vec::default());
        self.occurrences.push(Vec::default());
        atom
    }

    fn atom_count(&self) -> usize {
        self.atom_count as usize
    }

    fn add_clause(&mut self, mut clause: CClause) {
        self.model = None;
        if preprocess_clause(&mut clause) == Preprocessed::Tautology {
            return;
        }

        let index = self.clauses.len();
        for literal in clause.literals() {
            self.ensure_atom(literal.atom());
            self.occurrences[literal.index()].push(index);
        }
        if clause.is_empty() && self.empty_clause.is_none() {
            log::trace!(target: targets::ENGINE, "Empty clause added at scope {}", self.scopes.len());
            self.empty_clause = Some(index);
        }
        self.clauses.push(clause);
    }

    fn user_push(&mut self) {
        self.scopes.push(self.clauses.len());
    }

    fn user_pop(&mut self, count: usize) {
        let count = count.min(self.scopes.len());
        if count == 0 {
            return;
        }
        self.model = None;
        self.pop_to_base_level();

        let retained = self.scopes[self.scopes.len() - count];
        self.scopes.truncate(self.scopes.len() - count);

        for index in (retained..self.clauses.len()).rev() {
            for literal in self.clauses[index].iter() {
                let occurrences = &mut self.occurrences[literal.index()];
                if occurrences.last() == Some(&index) {
                    occurrences.pop();
                }
            }
        }
        self.clauses.truncate(retained);

        if self.empty_clause.is_some_and(|index| index >= retained) {
            self.empty_clause = None;
        }
    }

    fn scope_level(&self) -> usize {
        self.scopes.len()
    }

    fn pop_to_base_level(&mut self) {
        self.undo_to(0);
    }

    fn check(&mut self, assumptions: &[CLiteral], weights: Option<&[f64]>, max_weight: f64) -> Report {
        self.counters.checks += 1;
        self.model = None;
        self.core.clear();
        self.unknown = None;

        for assumption in assumptions {
            self.ensure_atom(assumption.atom());
        }

        let deadline = self.deadline();
        let report = match weights {
            None => self.check_assumptions(assumptions, deadline),
            Some(weights) => self.check_weighted(assumptions, weights, max_weight, deadline),
        };
        log::trace!(target: targets::ENGINE, "Check with {} assumptions: {report}", assumptions.len());
        report
    }

    fn model_is_current(&self) -> bool {
        self.model.is_some()
    }

    fn value_of(&self, atom: Atom) -> Option<bool> {
        self.model.as_ref()?.get(atom as usize).copied().flatten()
    }

    fn core(&self) -> &[CLiteral] {
        &self.core
    }

    fn consequences(
        &mut self,
        assumptions: &[CLiteral],
        atoms: &[Atom],
        consequences: &mut Vec<CClause>,
    ) -> Report {
        let report = self.check(assumptions, None, 0.0);
        let (Report::Satisfiable, Some(model)) = (report, self.model.clone()) else {
            return report;
        };

        let deadline = self.deadline();
        let mut probe = assumptions.to_vec();

        for atom in atoms {
            let Some(Some(value)) = model.get(*atom as usize).copied() else {
                continue;
            };
            let literal = CLiteral::new(*atom, value);

            probe.push(literal.negate());
            let result = self.search(&probe, deadline);
            probe.pop();

            match result {
                Search::Satisfiable => {}

                Search::Unsatisfiable(core) => {
                    let core = match self.config.minimize_core.value {
                        true => self.minimize_core(core, deadline),
                        false => core,
                    };
                    let mut consequence = vec![literal];
                    consequence.extend(core.into_iter().filter(|premise| *premise != literal.negate()));
                    consequences.push(consequence);
                }

                Search::Unknown(reason) => {
                    self.unknown = Some(reason);
                    self.model = Some(model);
                    return Report::Unknown;
                }
            }
        }

        self.model = Some(model);
        Report::Satisfiable
    }

    fn find_mutexes(&mut self, literals: &[CLiteral]) -> Vec<Vec<CLiteral>> {
        for literal in literals {
            self.ensure_atom(literal.atom());
        }
        let deadline = self.deadline();
        let model = self.model.take();
        let mut mutexes = Vec::default();

        if let Search::Satisfiable = self.search(&[], deadline) {
            let mut graph = UnGraphMap::<usize, ()>::new();
            for index in 0..literals.len() {
                graph.add_node(index);
            }

            'pair_loop: for a in 0..literals.len() {
                for b in (a + 1)..literals.len() {
                    if literals[a].atom() == literals[b].atom() {
                        continue;
                    }
                    match self.search(&[literals[a], literals[b]], deadline) {
                        Search::Unsatisfiable(_) => {
                            graph.add_edge(a, b, ());
                        }
                        Search::Satisfiable => {}
                        Search::Unknown(reason) => {
                            self.unknown = Some(reason);
                            break 'pair_loop;
                        }
                    }
                }
            }

            // Greedy clique cover, from the nodes of highest degree.
            let mut order = (0..literals.len()).collect::<Vec<_>>();
            order.sort_by_key(|node| std::cmp::Reverse(graph.neighbors(*node).count()));
            let mut covered = vec![false; literals.len()];

            for seed in &order {
                if covered[*seed] {
                    continue;
                }
                let mut clique = vec![*seed];
                for candidate in &order {
                    if covered[*candidate] || clique.contains(candidate) {
                        continue;
                    }
                    if clique.iter().all(|member| graph.contains_edge(*member, *candidate)) {
                        clique.push(*candidate);
                    }
                }
                if clique.len() > 1 {
                    clique.sort();
                    clique.iter().for_each(|member| covered[*member] = true);
                    mutexes.push(clique.into_iter().map(|member| literals[member]).collect());
                }
            }
        }

        self.model = model;
        mutexes
    }

    fn collect_statistics(&self, statistics: &mut Statistics) {
        statistics.update("engine.atoms", self.atom_count as u64);
        statistics.update("engine.clauses", self.clauses.len() as u64);
        statistics.update("engine.checks", self.counters.checks);
        statistics.update("engine.searches", self.counters.searches);
        statistics.update("engine.decisions", self.counters.decisions);
        statistics.update("engine.conflicts", self.counters.conflicts);
        statistics.update("engine.propagations", self.counters.propagations);
    }

    fn display_wcnf(
        &self,
        out: &mut dyn std::io::Write,
        units: &[CLiteral],
        assumptions: &[CLiteral],
        weights: &[u64],
    ) -> std::io::Result<()> {
        let top = weights.iter().sum::<u64>() + 1;
        writeln!(
            out,
            "p wcnf {} {} {top}",
            self.atom_count - 1,
            self.clauses.len() + units.len() + assumptions.len()
        )?;
        for clause in &self.clauses {
            writeln!(out, "{top} {}", clause.as_dimacs(true))?;
        }
        for unit in units {
            writeln!(out, "{top} {}", unit.as_dimacs(true))?;
        }
        for (index, assumption) in assumptions.iter().enumerate() {
            let weight = weights.get(index).copied().unwrap_or(1);
            writeln!(out, "{weight} {}", assumption.as_dimacs(true))?;
        }
        Ok(())
    }

    fn unknown_reason(&self) -> Option<&str> {
        self.unknown
    }
}
