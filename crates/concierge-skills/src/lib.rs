//! # concierge-skills
//!
//! Agent-invokable skills and the registry that resolves them.
//!
//! A skill is a `{ handler, ui_component, schema }` triple.  The
//! [`FunctionLoader`] maps each [`SkillId`] to its triple and validates it
//! before handing it out; handlers always answer with a [`SkillResponse`]
//! envelope instead of failing.
//!
//! ## Quick start
//!
//! ```ignore
//! use concierge_skills::{FunctionLoader, SkillContext, SkillServices};
//! use serde_json::json;
//!
//! let loader = FunctionLoader::builtin(SkillServices::default());
//! let skill = loader.load_function("add-todo")?;
//! let response = skill
//!     .invoke_checked(Some(json!({ "title": "Buy milk" })), &SkillContext::new())
//!     .await;
//! assert!(response.success);
//! ```

pub mod args;
pub mod context;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod schema;
pub mod ui;

// ── re-exports ───────────────────────────────────────────────────────

pub use context::{DataOrigin, ResolvedData, SkillContext};
pub use envelope::SkillResponse;
pub use error::{HandlerError, RegistryError, RegistryResult};
pub use handler::{SkillHandler, invoke_guarded};
pub use handlers::{CatalogDomain, ShowCatalog};
pub use registry::{
    CatalogSettings, FunctionLoader, SkillDescriptor, SkillId, SkillModule, SkillServices,
    default_ui_overrides,
};
pub use schema::{ArgSchema, ArgSpec, ArgType};
pub use ui::{CALENDAR_VIEW, UiLoader, UiModule, ViewComponent, headless_loader, view_loader};
