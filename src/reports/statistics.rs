use std::collections::BTreeMap;

/// Named counts collected from the pipeline and the engine of a context.
///
/// ```rust
/// # use otter_inc::reports::Statistics;
/// let mut statistics = Statistics::default();
/// statistics.update("engine.checks", 2);
/// statistics.update("engine.checks", 1);
///
/// assert_eq!(statistics.get("engine.checks"), Some(3));
/// assert_eq!(statistics.get("pipeline.faults"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Statistics {
    entries: BTreeMap<&'static str, u64>,
}

impl Statistics {
    /// Adds `value` to the count of `key`.
    pub fn update(&mut self, key: &'static str, value: u64) {
        *self.entries.entry(key).or_default() += value;
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key:<24} {value}")?;
        }
        Ok(())
    }
}
