/*!
A bidirectional map between boolean terms and atoms of the engine.

Only terms which are atoms from the perspective of the engine are mapped, i.e. boolean constants and applications of uninterpreted predicates.
Sub-formulas given an atom during lowering are not mapped.

Entries are kept in order of insertion, and so the map may be restored to any earlier size.

```rust
# use otter_inc::db::atom_map::AtomMap;
# use otter_inc::structures::term::TermManager;
let mut terms = TermManager::default();
let p = terms.mk_bool_const("p");
let q = terms.mk_bool_const("q");

let mut map = AtomMap::default();
map.insert(p, 1);

let checkpoint = map.checkpoint();
map.insert(q, 2);
assert_eq!(map.term_of(2), Some(q));

map.restore(checkpoint);
assert_eq!(map.atom_of(q), None);
assert_eq!(map.atom_of(p), Some(1));
```
*/

use std::collections::HashMap;

use crate::structures::{atom::Atom, term::Term};

/// A bidirectional map between boolean terms and atoms.
#[derive(Clone, Debug, Default)]
pub struct AtomMap {
    /// Each entry, in order of insertion.
    entries: Vec<(Term, Atom)>,

    term_to_atom: HashMap<Term, Atom>,

    atom_to_term: HashMap<Atom, Term>,
}

impl AtomMap {
    /// Maps `term` to `atom`.
    ///
    /// A term is mapped to at most one atom, and so if the term is already mapped the existing atom is returned and the map is unchanged.
    pub fn insert(&mut self, term: Term, atom: Atom) -> Atom {
        if let Some(existing) = self.term_to_atom.get(&term) {
            return *existing;
        }
        self.entries.push((term, atom));
        self.term_to_atom.insert(term, atom);
        self.atom_to_term.insert(atom, term);
        atom
    }

    pub fn atom_of(&self, term: Term) -> Option<Atom> {
        self.term_to_atom.get(&term).copied()
    }

    pub fn term_of(&self, atom: Atom) -> Option<Term> {
        self.atom_to_term.get(&atom).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// An iterator over entries, in order of insertion.
    pub fn iter(&self) -> impl Iterator<Item = (Term, Atom)> + '_ {
        self.entries.iter().copied()
    }

    /// A checkpoint to which the map may later be restored.
    pub fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Removes every entry inserted after the checkpoint.
    pub fn restore(&mut self, checkpoint: usize) {
        if checkpoint >= self.entries.len() {
            return;
        }
        for (term, atom) in self.entries.drain(checkpoint..) {
            self.term_to_atom.remove(&term);
            self.atom_to_term.remove(&atom);
        }
    }
}

#[cfg(test)]
mod atom_map_tests {
    use super::*;
    use crate::structures::term::TermManager;

    #[test]
    fn single_atom_per_term() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");

        let mut map = AtomMap::default();
        assert_eq!(map.insert(p, 3), 3);
        assert_eq!(map.insert(p, 4), 3);
        assert_eq!(map.len(), 1);
        assert_eq!(map.term_of(4), None);
    }

    #[test]
    fn restore_beyond_size() {
        let mut terms = TermManager::default();
        let p = terms.mk_bool_const("p");

        let mut map = AtomMap::default();
        map.insert(p, 1);
        map.restore(7);
        assert_eq!(map.atom_of(p), Some(1));

        map.restore(0);
        assert!(map.is_empty());
        assert_eq!(map.term_of(1), None);
    }
}
