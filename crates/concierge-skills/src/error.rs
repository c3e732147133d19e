//! Skill error types.
//!
//! Two families live here and they travel differently:
//!
//! - [`RegistryError`] is a wiring defect (unknown skill, missing module or
//!   export).  It is returned as `Err` from the registry and is meant to
//!   fail loudly.
//! - [`HandlerError`] never leaves a handler: it is turned into the
//!   `{ success: false, error }` envelope by [`crate::SkillResponse`].

use concierge_store::StoreError;

/// Errors raised while resolving a skill id into its descriptor.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The id does not name any known skill.
    #[error("unknown skill id `{0}`")]
    UnknownSkill(String),

    /// The skill id is known but no module is wired for it.
    #[error("no module registered for skill `{skill_id}`")]
    ModuleNotFound { skill_id: String },

    /// The module for a skill lacks one of `handler`, `uiComponent`, `schema`.
    #[error("skill `{skill_id}` is missing required export `{export}`")]
    MissingExport {
        skill_id: String,
        export: &'static str,
    },

    /// An export is present but not well-formed.
    #[error("skill `{skill_id}` has a malformed `{export}` export: {reason}")]
    MalformedExport {
        skill_id: String,
        export: &'static str,
        reason: String,
    },
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Errors a handler can run into while doing its work.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Caller-supplied arguments are missing or malformed.
    #[error("{0}")]
    InvalidArgs(String),

    /// The context carried no data for a context-dependent skill.
    #[error("{0}")]
    DataUnavailable(String),

    /// The backing store rejected the operation.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The handler panicked; only produced by the invocation guard.
    #[error("skill `{0}` failed unexpectedly")]
    Panicked(String),
}
