//! The context bag passed to every handler.
//!
//! Callers pre-resolve whatever data a skill may need and hand it over in a
//! [`SkillContext`].  Context-dependent handlers look up their data through
//! [`SkillContext::resolve_data`], which applies one fixed precedence:
//!
//! 1. `skill_data_context`: data scoped to the skill being invoked.
//! 2. `raw_data_context[<domain>]`: the global data bag, keyed by domain.
//!
//! A `null` value counts as absent at either level.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which level of the context supplied the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Came from `skill_data_context`.
    Skill,
    /// Came from `raw_data_context`.
    Raw,
}

/// Data found in a [`SkillContext`] together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedData<'a> {
    pub origin: DataOrigin,
    pub data: &'a Value,
}

/// Explicit, optional-field context for a skill invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillContext {
    /// Data resolved specifically for this skill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_data_context: Option<Value>,

    /// Global data bag keyed by domain (`menu`, `wellness`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data_context: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl SkillContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the skill-scoped data.
    pub fn with_skill_data(mut self, data: Value) -> Self {
        self.skill_data_context = Some(data);
        self
    }

    /// Add one domain to the raw data bag.
    pub fn with_raw_data(mut self, domain: impl Into<String>, data: Value) -> Self {
        self.raw_data_context
            .get_or_insert_with(Map::new)
            .insert(domain.into(), data);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Find data for `domain`, skill-scoped data first.
    pub fn resolve_data(&self, domain: &str) -> Option<ResolvedData<'_>> {
        if let Some(data) = self.skill_data_context.as_ref().filter(|v| !v.is_null()) {
            return Some(ResolvedData {
                origin: DataOrigin::Skill,
                data,
            });
        }
        self.raw_data_context
            .as_ref()
            .and_then(|raw| raw.get(domain))
            .filter(|v| !v.is_null())
            .map(|data| ResolvedData {
                origin: DataOrigin::Raw,
                data,
            })
    }
}
