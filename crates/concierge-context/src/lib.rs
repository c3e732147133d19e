//! # concierge-context
//!
//! Turns domain data into natural-language context for the model and
//! pushes it into the conversation.
//!
//! - [`CatalogFormatter`] renders menu and wellness catalogs from data plus
//!   a [`FormatterConfig`]; [`CalendarFormatter`] and [`TodoFormatter`] read
//!   their stores directly.
//! - [`ContextInjectionManager`] maps skill ids to providers and performs
//!   best-effort injections that report an [`InjectionOutcome`] instead of
//!   failing.
//! - [`AgentConfig`] carries per-skill formatter configs, loaded from TOML.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use concierge_context::{AgentConfig, ContextInjectionManager, StaticSource};
//!
//! let agent = AgentConfig::load_or_default("config/default.toml".as_ref())?;
//! let manager = ContextInjectionManager::new();
//! manager.register_catalog("show-menu", Arc::new(StaticSource::new(menu_json)));
//!
//! let outcome = manager
//!     .inject("show-menu", &agent, Some(&|payload| session.push(payload)))
//!     .await;
//! ```

pub mod agenda;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod formatter;
pub mod manager;
pub mod source;

// ── re-exports ───────────────────────────────────────────────────────

pub use agenda::{CalendarFormatter, TodoFormatter};
pub use catalog::CatalogFormatter;
pub use config::{AgentConfig, DEFAULT_FETCH_TIMEOUT_SECS, DataPaths, SkillSettings};
pub use currency::Currency;
pub use error::{ContextError, ContextResult};
pub use formatter::{CategoryLabel, ContextFormatter, FormatterConfig};
pub use manager::{
    ContextInjectionManager, ContextPayload, ContextProvider, ContextSink, InjectionOutcome,
    SkipReason,
};
pub use source::{DataSource, JsonFileSource, StaticSource};
