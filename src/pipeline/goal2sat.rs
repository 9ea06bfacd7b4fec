/*!
The translation of a (residual) goal to clauses of the engine.

# Interpreted atoms
Before any clause is added, the goal is scanned for atoms the engine cannot interpret, e.g. a bit-vector predicate which was not blasted.
If any such atom is found, the atoms are returned and neither the engine nor the atom map is changed.

# Translation
Each sub-formula of a formula is given a literal:
- `true` and `false` are the literals of the [top atom](crate::structures::atom::TOP_ATOM).
- A boolean constant, or an application of an uninterpreted predicate, is given the atom of the [atom map](crate::db::atom_map), and a fresh atom is mapped if required.
- Any other sub-formula is given a fresh atom, with clauses for the equivalence of the atom and the sub-formula (i.e. the Tseitin transformation).

Literals of sub-formulas are cached for the duration of a call.

A top-level disjunction is added as a clause of the literals of the disjuncts, a top-level negated conjunction as a clause of the negated literals of the conjuncts, and any other formula as a unit clause.

# Dependencies
Each dependency (leaf) of a goal is given a literal in the [dependency map](crate::procedures::assumptions::DepMap):
- If the formula is the leaf itself, and the leaf is a (negated) boolean constant, the literal of the leaf is used and no clause is added.
- Otherwise a fresh indicator literal `s` is used, and `¬s` is added to the clause of each formula with the dependency.
*/

use std::collections::HashMap;

use crate::{
    db::atom_map::AtomMap,
    engine::BooleanEngine,
    misc::log::targets,
    procedures::assumptions::DepMap,
    structures::{
        atom::TOP_ATOM,
        clause::CClause,
        goal::Goal,
        literal::{CLiteral, Literal},
        term::{Term, TermKind, TermManager},
    },
};

/// The atoms of a goal which the engine cannot interpret, in order of occurrence.
pub fn interpreted_atoms(terms: &TermManager, goal: &Goal) -> Vec<Term> {
    let mut atoms = Vec::default();
    let mut seen = std::collections::HashSet::new();
    let mut todo = goal.formulas().iter().map(|f| f.formula).rev().collect::<Vec<_>>();

    while let Some(term) = todo.pop() {
        if !seen.insert(term) {
            continue;
        }
        match terms.kind(term) {
            TermKind::True | TermKind::False | TermKind::Const(_) | TermKind::App(..) => {}

            TermKind::Eq(a, _) if !terms.is_bool(*a) => atoms.push(term),

            TermKind::Ite(_, a, _) if !terms.is_bool(*a) => atoms.push(term),

            TermKind::Not(_)
            | TermKind::And(_)
            | TermKind::Or(_)
            | TermKind::Implies(..)
            | TermKind::Xor(..)
            | TermKind::Eq(..)
            | TermKind::Ite(..) => todo.extend(terms.children(term).into_iter().rev()),

            _ => atoms.push(term),
        }
    }
    atoms
}

/// The translation of a single goal.
struct Translation<'a, E: BooleanEngine> {
    terms: &'a TermManager,
    engine: &'a mut E,
    atom_map: &'a mut AtomMap,
    cache: HashMap<Term, CLiteral>,
    clause_count: usize,
}

impl<E: BooleanEngine> Translation<'_, E> {
    fn add_clause(&mut self, clause: CClause) {
        self.clause_count += 1;
        self.engine.add_clause(clause);
    }

    fn fresh_literal(&mut self) -> CLiteral {
        CLiteral::new(self.engine.fresh_atom(), true)
    }

    fn literals_of(&mut self, args: &[Term]) -> Vec<CLiteral> {
        args.iter().map(|arg| self.literal_of(*arg)).collect()
    }

    fn literal_of(&mut self, term: Term) -> CLiteral {
        if let Some(literal) = self.cache.get(&term) {
            return *literal;
        }

        let terms = self.terms;
        let literal = match terms.kind(term) {
            TermKind::True => CLiteral::new(TOP_ATOM, true),
            TermKind::False => CLiteral::new(TOP_ATOM, false),

            TermKind::Not(a) => self.literal_of(*a).negate(),

            TermKind::And(args) => {
                let literals = self.literals_of(args);
                let x = self.fresh_literal();
                for literal in &literals {
                    self.add_clause(vec![x.negate(), *literal]);
                }
                let mut long = vec![x];
                long.extend(literals.iter().map(|literal| literal.negate()));
                self.add_clause(long);
                x
            }

            TermKind::Or(args) => {
                let literals = self.literals_of(args);
                let x = self.fresh_literal();
                for literal in &literals {
                    self.add_clause(vec![x, literal.negate()]);
                }
                let mut long = vec![x.negate()];
                long.extend(literals.iter().copied());
                self.add_clause(long);
                x
            }

            TermKind::Implies(a, b) => {
                let (a, b) = (self.literal_of(*a), self.literal_of(*b));
                let x = self.fresh_literal();
                self.add_clause(vec![x.negate(), a.negate(), b]);
                self.add_clause(vec![x, a]);
                self.add_clause(vec![x, b.negate()]);
                x
            }

            TermKind::Xor(a, b) => {
                let (a, b) = (self.literal_of(*a), self.literal_of(*b));
                let x = self.fresh_literal();
                self.add_clause(vec![x.negate(), a, b]);
                self.add_clause(vec![x.negate(), a.negate(), b.negate()]);
                self.add_clause(vec![x, a.negate(), b]);
                self.add_clause(vec![x, a, b.negate()]);
                x
            }

            TermKind::Eq(a, b) => {
                let (a, b) = (self.literal_of(*a), self.literal_of(*b));
                let x = self.fresh_literal();
                self.add_clause(vec![x.negate(), a.negate(), b]);
                self.add_clause(vec![x.negate(), a, b.negate()]);
                self.add_clause(vec![x, a, b]);
                self.add_clause(vec![x, a.negate(), b.negate()]);
                x
            }

            TermKind::Ite(c, a, b) => {
                let (c, a, b) = (self.literal_of(*c), self.literal_of(*a), self.literal_of(*b));
                let x = self.fresh_literal();
                self.add_clause(vec![x.negate(), c.negate(), a]);
                self.add_clause(vec![x.negate(), c, b]);
                self.add_clause(vec![x, c.negate(), a.negate()]);
                self.add_clause(vec![x, c, b.negate()]);
                x
            }

            _ => {
                let atom = match self.atom_map.atom_of(term) {
                    Some(atom) => atom,
                    None => {
                        let atom = self.engine.fresh_atom();
                        self.atom_map.insert(term, atom)
                    }
                };
                CLiteral::new(atom, true)
            }
        };

        self.cache.insert(term, literal);
        literal
    }

    /// The clause asserting a formula.
    fn clause_of(&mut self, formula: Term) -> CClause {
        let terms = self.terms;
        match terms.kind(formula) {
            TermKind::Or(args) => self.literals_of(args),

            TermKind::Not(inner) => match terms.kind(*inner) {
                TermKind::And(args) => self
                    .literals_of(args)
                    .into_iter()
                    .map(|literal| literal.negate())
                    .collect(),
                _ => vec![self.literal_of(formula)],
            },

            _ => vec![self.literal_of(formula)],
        }
    }
}

/// Whether the term is a boolean constant, or the negation of a boolean constant.
fn is_literal(terms: &TermManager, term: Term) -> bool {
    let atom = terms.is_not(term).unwrap_or(term);
    terms.is_bool(atom) && terms.is_uninterp_const(atom)
}

/// Adds the clauses of a goal to the engine, extending the atom map and the dependency map.
///
/// If the goal contains interpreted atoms, the atoms are returned and nothing is changed.
pub fn lower<E: BooleanEngine>(
    terms: &TermManager,
    goal: &Goal,
    engine: &mut E,
    atom_map: &mut AtomMap,
    dep_map: &mut DepMap,
) -> Result<(), Vec<Term>> {
    let interpreted = interpreted_atoms(terms, goal);
    if !interpreted.is_empty() {
        return Err(interpreted);
    }

    let mut translation = Translation {
        terms,
        engine,
        atom_map,
        cache: HashMap::default(),
        clause_count: 0,
    };

    for goal_formula in goal.formulas() {
        let formula = goal_formula.formula;
        match goal_formula.dependency {
            None => {
                let clause = translation.clause_of(formula);
                translation.add_clause(clause);
            }

            Some(leaf) if leaf == formula && is_literal(terms, leaf) && dep_map.literal_of(leaf).is_none() => {
                let literal = translation.literal_of(leaf);
                dep_map.insert(leaf, literal);
            }

            Some(leaf) => {
                let indicator = match dep_map.literal_of(leaf) {
                    Some(literal) => literal,
                    None => {
                        let literal = translation.fresh_literal();
                        dep_map.insert(leaf, literal);
                        literal
                    }
                };
                let mut clause = translation.clause_of(formula);
                clause.push(indicator.negate());
                translation.add_clause(clause);
            }
        }
    }

    log::trace!(target: targets::LOWERING, "{} clauses from {} formulas", translation.clause_count, goal.len());
    Ok(())
}

#[cfg(test)]
mod goal2sat_tests {
    use super::*;
    use crate::{
        config::EngineConfig,
        engine::Engine,
        reports::Report,
        structures::term::ResourceLimit,
    };

    fn engine() -> Engine {
        Engine::from_config(&EngineConfig::default(), ResourceLimit::default())
    }

    #[test]
    fn tseitin() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let r = terms.mk_bool_const("r");

        let q_xor_r = terms.mk_xor(q, r);
        let formula = terms.mk_eq(p, q_xor_r).unwrap();
        let mut goal = Goal::default();
        goal.push(&mut terms, formula, None);
        goal.push(&mut terms, p, None);
        goal.push(&mut terms, q, None);

        let mut engine = engine();
        let mut atom_map = AtomMap::default();
        let mut dep_map = DepMap::default();
        lower(&terms, &goal, &mut engine, &mut atom_map, &mut dep_map).unwrap();

        assert_eq!(atom_map.len(), 3);
        assert!(dep_map.is_empty());
        assert_eq!(engine.check(&[], None, 0.0), Report::Satisfiable);
        assert_eq!(engine.value_of(atom_map.atom_of(r).unwrap()), Some(false));
    }

    #[test]
    fn dependencies() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let q = terms.mk_bool_const("q");
        let not_p = terms.mk_not(p);
        let p_or_q = terms.mk_or(vec![p, q]);

        let mut goal = Goal::default();
        goal.push(&mut terms, not_p, Some(not_p));
        goal.push(&mut terms, p_or_q, Some(p_or_q));

        let mut engine = engine();
        let mut atom_map = AtomMap::default();
        let mut dep_map = DepMap::default();
        lower(&terms, &goal, &mut engine, &mut atom_map, &mut dep_map).unwrap();

        let p_atom = atom_map.atom_of(p).unwrap();
        assert_eq!(dep_map.literal_of(not_p), Some(CLiteral::new(p_atom, false)));

        let indicator = dep_map.literal_of(p_or_q).unwrap();
        assert_eq!(atom_map.term_of(indicator.atom()), None);
        assert_eq!(dep_map.term_of(indicator), Some(p_or_q));

        let assumptions = [CLiteral::new(p_atom, false), indicator];
        assert_eq!(engine.check(&assumptions, None, 0.0), Report::Satisfiable);
        assert_eq!(engine.value_of(atom_map.atom_of(q).unwrap()), Some(true));
    }

    #[test]
    fn interpreted() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");
        let x = terms.mk_bv_const("x", 4).unwrap();
        let y = terms.mk_bv_const("y", 4).unwrap();
        let x_lt_y = terms.mk_bvult(x, y).unwrap();
        let formula = terms.mk_or(vec![p, x_lt_y]);

        let mut goal = Goal::default();
        goal.push(&mut terms, formula, None);
        goal.push(&mut terms, p, None);

        let mut engine = engine();
        let mut atom_map = AtomMap::default();
        let mut dep_map = DepMap::default();
        assert_eq!(
            lower(&terms, &goal, &mut engine, &mut atom_map, &mut dep_map),
            Err(vec![x_lt_y])
        );
        assert!(atom_map.is_empty());
        assert_eq!(engine.atom_count(), 1);
    }
}
