/// Counts for various things which count, roughly.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// A count of every check made, including checks for consequences.
    pub checks: u64,

    /// A count of formulas lowered to clauses of the engine.
    pub lowered_formulas: u64,

    /// A count of faults raised by the pipeline.
    pub faults: u64,

    /// A count of checks which returned unknown.
    pub unknowns: u64,
}
