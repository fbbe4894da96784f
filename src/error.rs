//! Error types for Concierge.

/// Top-level error type for the assistant core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

/// Configuration-related errors.
///
/// Raised while assembling workers, tasks, or memory bindings, never during
/// a turn and never by normalization. A `ConfigError` should abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by the delegated execution engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine rejected the task: {0}")]
    Rejected(String),

    #[error("engine failed mid-run: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A turn-level failure during `invoke`.
///
/// Wraps the engine cause unchanged. Retry policy, if any, belongs to the
/// caller; the core never retries.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("delegated engine failed during invocation: {source}")]
    Engine {
        #[from]
        source: EngineError,
    },
}

/// Result type alias for the assistant core.
pub type Result<T> = std::result::Result<T, Error>;
