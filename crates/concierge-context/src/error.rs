//! Context error types.

use std::path::PathBuf;

/// Errors raised while producing or loading context.
///
/// Inside the injection manager none of these escape: they end up as
/// [`InjectionOutcome::Failed`](crate::InjectionOutcome::Failed).
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// A data-backed skill has no `context` table in the agent config.
    #[error("no context configuration for skill `{skill_id}` on agent `{agent_id}`")]
    MissingConfig { skill_id: String, agent_id: String },

    /// The data source produced nothing.
    #[error("data source for skill `{skill_id}` returned no data")]
    MissingData { skill_id: String },

    /// The data source failed.
    #[error("data fetch failed: {0}")]
    Fetch(String),

    /// The data source did not answer in time.
    #[error("data fetch for skill `{skill_id}` timed out after {secs}s")]
    Timeout { skill_id: String, secs: u64 },

    /// A formatter, data source or sink panicked.
    #[error("context injection panicked: {0}")]
    Panicked(String),

    /// Reading a config or data file failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON in `{path}`: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for context results.
pub type ContextResult<T> = std::result::Result<T, ContextError>;
