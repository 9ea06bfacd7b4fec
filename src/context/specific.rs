use crate::{config::Config, engine::Engine, structures::term::TermManager};

use super::GenericContext;

/// A context which uses the [Engine] of the library.
pub type Context = GenericContext<Engine>;

impl Context {
    /// Creates a context from some given configuration, with a fresh term manager.
    pub fn from_config(config: Config) -> Self {
        Self::with_terms(config, TermManager::default())
    }
}
