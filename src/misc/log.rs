/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or diagnosing why some check returned unknown.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [scopes](crate::procedures::scope)
    pub const SCOPE: &str = "scope";

    /// Logs related to [lowering](crate::procedures::internalize) formulas and assumptions
    pub const LOWERING: &str = "lowering";

    /// Logs related to the stages of the [pipeline](crate::pipeline)
    pub const PIPELINE: &str = "pipeline";

    /// Logs related to the [bit-blaster](crate::pipeline::bit_blast)
    pub const BIT_BLAST: &str = "bit_blast";

    /// Logs related to [checks](crate::procedures::check)
    pub const CHECK: &str = "check";

    /// Logs related to [unsatisfiable cores](crate::procedures::core)
    pub const CORE: &str = "core";

    /// Logs related to [model reconstruction](crate::procedures::model)
    pub const MODEL: &str = "model";

    /// Logs related to [consequences](crate::procedures::consequences)
    pub const CONSEQUENCES: &str = "consequences";

    /// Logs related to [mutexes](crate::procedures::mutexes)
    pub const MUTEX: &str = "mutex";

    /// Logs related to the [boolean engine](crate::engine)
    pub const ENGINE: &str = "engine";
}
