//! Formatter configuration and the [`ContextFormatter`] trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::Currency;
use crate::error::ContextResult;

/// Display label for one data category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    /// Key of the category in the data object.
    pub key: String,
    /// Header printed for the category.
    pub label: String,
}

impl CategoryLabel {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// How a catalog is rendered into a context string.
///
/// The order of `category_names` is the output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub header: String,
    pub instructions: Vec<String>,
    pub section_header: String,
    pub category_names: Vec<CategoryLabel>,
    pub currency: Currency,
    pub reminder: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            header: "Here is the current information you can use in this conversation.".into(),
            instructions: Vec::new(),
            section_header: "AVAILABLE ITEMS".into(),
            category_names: Vec::new(),
            currency: Currency::default(),
            reminder: String::new(),
        }
    }
}

impl FormatterConfig {
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_instruction(mut self, line: impl Into<String>) -> Self {
        self.instructions.push(line.into());
        self
    }

    pub fn with_section_header(mut self, header: impl Into<String>) -> Self {
        self.section_header = header.into();
        self
    }

    /// Append a category; its position is its output position.
    pub fn with_category(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.category_names.push(CategoryLabel::new(key, label));
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_reminder(mut self, reminder: impl Into<String>) -> Self {
        self.reminder = reminder.into();
        self
    }
}

/// Turns domain data into a context string for the model.
///
/// Data-backed formatters are called with the fetched data and the skill's
/// config.  Self-contained formatters read their own state and are called
/// with neither.
#[async_trait]
pub trait ContextFormatter: Send + Sync {
    async fn format(
        &self,
        data: Option<&Value>,
        config: Option<&FormatterConfig>,
    ) -> ContextResult<String>;
}
