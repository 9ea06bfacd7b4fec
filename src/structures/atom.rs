/*!
(The internal representation of) an atom (aka. a 'variable') of the boolean engine.

Each atom is a u32 *u* such that either:
- *u* is 0, or:
- *u - 1* is an atom.

That the atoms are [0..*m*) for some *m*, allows atoms to be used as the indicies of a structure, e.g. a [valuation](crate::structures::valuation).

The atom `0` is fixed by the [engine](crate::engine) with a value of true.

# Notes
- High-level atoms, i.e. terms of boolean sort, are associated with atoms through the [atom map](crate::db::atom_map).
- In the SAT literature these are often called 'variables' while in the logic literature these are often called 'atoms'.
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The atom `0` is fixed internally with a value of true.
pub const TOP_ATOM: Atom = 0;

/// The maximum instance of an atom.
pub const ATOM_MAX: Atom = i32::MAX.unsigned_abs();
