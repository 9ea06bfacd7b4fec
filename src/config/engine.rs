//! Configuration of the boolean engine.

use super::ConfigOption;

/// Configuration for the boolean engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// The probability of assigning positive polarity to an atom when freely choosing an atom.
    pub polarity_lean: ConfigOption<f64>,

    /// Default to the last set value of an atom when choosing a value for the atom, otherwise decide with the polarity lean.
    pub phase_saving: ConfigOption<bool>,

    /// Minimize unsatisfiable cores by removing assumptions one at a time.
    pub minimize_core: ConfigOption<bool>,

    /// The time limit for a single search, where a limit of zero is no limit.
    pub time_limit: ConfigOption<std::time::Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            phase_saving: ConfigOption {
                name: "phase_saving",
                min: false,
                max: true,
                value: true,
            },

            minimize_core: ConfigOption {
                name: "minimize_core",
                min: false,
                max: true,
                value: true,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: std::time::Duration::from_secs(0),
                max: std::time::Duration::MAX,
                value: std::time::Duration::from_secs(0),
            },
        }
    }
}
