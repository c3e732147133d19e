//! Catalog (menu, wellness) context formatter.
//!
//! Layout:
//!
//! ```text
//! <header>
//!
//! <instruction 1>
//! <instruction 2>
//!
//! <section header>
//!
//! STARTERS:
//! - Soup: 5,00 € (veg)
//!
//! MAINS:
//! - Steak: 24,50 €
//!
//! <reminder>
//! ```
//!
//! Categories appear in `category_names` order and are skipped when absent
//! or empty.  With no `category_names` configured, every array in the data
//! is printed in key order under its upper-cased key.  Items without a
//! `name` are skipped.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::currency::Currency;
use crate::error::ContextResult;
use crate::formatter::{CategoryLabel, ContextFormatter, FormatterConfig};

/// Renders a category-keyed catalog.  Output depends only on its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFormatter;

impl CatalogFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render `data` with `config`.  Returns `""` when there is nothing to
    /// show.
    pub fn render(data: Option<&Value>, config: &FormatterConfig) -> String {
        let Some(catalog) = data.and_then(Value::as_object) else {
            return String::new();
        };

        let labels: Vec<CategoryLabel> = if config.category_names.is_empty() {
            catalog
                .keys()
                .map(|k| CategoryLabel::new(k.clone(), k.to_uppercase()))
                .collect()
        } else {
            config.category_names.clone()
        };

        let sections: Vec<String> = labels
            .iter()
            .filter_map(|label| render_category(catalog, label, &config.currency))
            .collect();
        if sections.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        out.push_str(&config.header);
        out.push_str("\n\n");
        if !config.instructions.is_empty() {
            for line in &config.instructions {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str(&config.section_header);
        out.push_str("\n\n");
        for section in sections {
            out.push_str(&section);
            out.push('\n');
        }
        if config.reminder.is_empty() {
            out.truncate(out.trim_end().len());
        } else {
            out.push_str(&config.reminder);
        }
        out
    }
}

fn render_category(
    catalog: &Map<String, Value>,
    label: &CategoryLabel,
    currency: &Currency,
) -> Option<String> {
    let items = catalog.get(&label.key)?.as_array()?;
    let lines: Vec<String> = items
        .iter()
        .filter_map(|item| render_item(item, currency))
        .collect();
    if lines.is_empty() {
        return None;
    }

    let mut section = format!("{}:\n", label.label);
    for line in lines {
        section.push_str(&line);
        section.push('\n');
    }
    Some(section)
}

fn render_item(item: &Value, currency: &Currency) -> Option<String> {
    let name = item.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let mut line = format!("- {name}");
    match item.get("price") {
        Some(Value::Number(n)) => {
            if let Some(amount) = n.as_f64() {
                line.push_str(": ");
                line.push_str(&currency.format(amount));
            }
        }
        Some(Value::String(s)) if !s.trim().is_empty() => {
            line.push_str(": ");
            line.push_str(s.trim());
        }
        _ => {}
    }

    let mut attrs = Vec::new();
    if let Some(minutes) = item.get("duration").and_then(Value::as_u64) {
        attrs.push(format!("{minutes} min"));
    }
    if let Some(kind) = item.get("type").and_then(Value::as_str)
        && !kind.trim().is_empty()
    {
        attrs.push(kind.trim().to_owned());
    }
    if !attrs.is_empty() {
        line.push_str(&format!(" ({})", attrs.join(", ")));
    }
    Some(line)
}

#[async_trait]
impl ContextFormatter for CatalogFormatter {
    async fn format(
        &self,
        data: Option<&Value>,
        config: Option<&FormatterConfig>,
    ) -> ContextResult<String> {
        Ok(match config {
            Some(config) => Self::render(data, config),
            None => Self::render(data, &FormatterConfig::default()),
        })
    }
}
