//! Context-dependent catalog skills: `show-menu` and `show-wellness`.
//!
//! Neither touches a store.  The catalog comes pre-resolved in the
//! [`SkillContext`]; see [`SkillContext::resolve_data`] for the lookup
//! order.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::args::Args;
use crate::context::{DataOrigin, SkillContext};
use crate::envelope::SkillResponse;
use crate::error::HandlerError;
use crate::handler::SkillHandler;
use crate::schema::{ArgSchema, ArgSpec};

type Result<T> = std::result::Result<T, HandlerError>;

/// Which catalog a [`ShowCatalog`] serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogDomain {
    Menu,
    Wellness,
}

impl CatalogDomain {
    /// Key of this domain in `raw_data_context`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Wellness => "wellness",
        }
    }

    /// Message used when no data is found and none is configured.
    pub fn default_not_found_message(&self) -> &'static str {
        match self {
            Self::Menu => "No menu data found. Please try again later.",
            Self::Wellness => "No wellness data found. Please try again later.",
        }
    }
}

/// Shows a catalog resolved from the invocation context.
pub struct ShowCatalog {
    domain: CatalogDomain,
    not_found_message: String,
}

impl ShowCatalog {
    pub fn new(domain: CatalogDomain) -> Self {
        Self {
            domain,
            not_found_message: domain.default_not_found_message().to_owned(),
        }
    }

    /// Override the message returned when the context has no data.
    pub fn with_not_found_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.trim().is_empty() {
            self.not_found_message = message;
        }
        self
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg(
            "category",
            ArgSpec::string("Only show this category").optional(),
        )
    }

    fn execute(&self, args: Option<Value>, ctx: &SkillContext) -> Result<Value> {
        let args = Args::from_value(args)?;
        let category = args.optional_str("category")?;

        let unavailable = || HandlerError::DataUnavailable(self.not_found_message.clone());
        let resolved = ctx.resolve_data(self.domain.key()).ok_or_else(unavailable)?;
        let catalog = resolved.data.as_object().ok_or_else(unavailable)?;

        let categories = match category {
            Some(name) => {
                let items = catalog.get(&name).filter(|v| !v.is_null()).ok_or_else(|| {
                    HandlerError::InvalidArgs(format!(
                        "No `{name}` category in the {}",
                        self.domain.key()
                    ))
                })?;
                let mut only = Map::new();
                only.insert(name, items.clone());
                only
            }
            None => catalog.clone(),
        };

        let source = match resolved.origin {
            DataOrigin::Skill => "skill",
            DataOrigin::Raw => "raw",
        };
        debug!(domain = self.domain.key(), source, "catalog resolved from context");

        Ok(json!({
            "domain": self.domain.key(),
            "source": source,
            "categories": categories,
        }))
    }
}

#[async_trait]
impl SkillHandler for ShowCatalog {
    async fn handle(&self, args: Option<Value>, ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args, ctx))
    }
}
