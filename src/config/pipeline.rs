//! Configuration of the lowering pipeline.

use super::ConfigOption;

/// Configuration for the stages of the pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Flatten nested conjunctions and disjunctions during simplification.
    pub flat: ConfigOption<bool>,

    /// Rewrite conjunctions to negated disjunctions during simplification.
    pub elim_and: ConfigOption<bool>,

    /// Rewrite `distinct` to a conjunction of pairwise disequalities during simplification.
    pub blast_distinct: ConfigOption<bool>,

    /// The maximum number of bits the bit-blaster may introduce for constants.
    pub max_bits: ConfigOption<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            flat: ConfigOption {
                name: "flat",
                min: false,
                max: true,
                value: true,
            },

            elim_and: ConfigOption {
                name: "elim_and",
                min: false,
                max: true,
                value: true,
            },

            blast_distinct: ConfigOption {
                name: "blast_distinct",
                min: false,
                max: true,
                value: true,
            },

            max_bits: ConfigOption {
                name: "max_bits",
                min: 1,
                max: usize::MAX,
                value: 1 << 20,
            },
        }
    }
}
