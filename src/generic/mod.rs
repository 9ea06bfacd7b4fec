//! Generic structures, not tied to terms or the boolean engine.

pub mod minimal_pcg;
