/*!
Configuration of a context.

All configuration for a context is contained within a [Config].
The [pipeline](crate::pipeline) is built from the pipeline configuration, and is rebuilt whenever the configuration of a context is updated.
The [engine](crate::engine) takes a copy of the engine configuration.
*/

mod config_option;
pub use config_option::ConfigOption;

mod engine;
pub use engine::EngineConfig;

mod pipeline;
pub use pipeline::PipelineConfig;

/// The primary configuration structure.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Configuration of the lowering pipeline.
    pub pipeline: PipelineConfig,

    /// Configuration of the boolean engine.
    pub engine: EngineConfig,
}
