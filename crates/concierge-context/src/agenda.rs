//! Self-contained formatters for the calendar and todo stores.
//!
//! Both read their store directly and ignore the data and config the
//! manager would pass to a data-backed formatter.  Ids are included so
//! the model can refer to entries in follow-up skill calls.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_store::{CalendarStore, DATE_FORMAT, TIME_FORMAT, TodoStore};
use serde_json::Value;

use crate::error::ContextResult;
use crate::formatter::{ContextFormatter, FormatterConfig};

/// Lists every calendar entry, chronologically.
pub struct CalendarFormatter {
    store: Arc<CalendarStore>,
}

impl CalendarFormatter {
    pub fn new(store: Arc<CalendarStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContextFormatter for CalendarFormatter {
    async fn format(
        &self,
        _data: Option<&Value>,
        _config: Option<&FormatterConfig>,
    ) -> ContextResult<String> {
        let entries = self.store.chronological().await;
        if entries.is_empty() {
            return Ok(String::new());
        }

        let mut out = String::from("The user's calendar currently contains:\n");
        for entry in entries {
            out.push_str("- ");
            out.push_str(&entry.date.format(DATE_FORMAT).to_string());
            if let Some(time) = entry.time {
                out.push(' ');
                out.push_str(&time.format(TIME_FORMAT).to_string());
            }
            out.push_str(": ");
            out.push_str(&entry.title);
            if let Some(minutes) = entry.duration {
                out.push_str(&format!(" ({minutes} min)"));
            }
            if let Some(description) = &entry.description {
                out.push_str(" - ");
                out.push_str(description);
            }
            out.push_str(&format!(" [id: {}]\n", entry.id));
        }
        out.pop();
        Ok(out)
    }
}

/// Lists every todo in insertion order, open and done.
pub struct TodoFormatter {
    store: Arc<TodoStore>,
}

impl TodoFormatter {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContextFormatter for TodoFormatter {
    async fn format(
        &self,
        _data: Option<&Value>,
        _config: Option<&FormatterConfig>,
    ) -> ContextResult<String> {
        let todos = self.store.list().await;
        if todos.is_empty() {
            return Ok(String::new());
        }

        let open = todos.iter().filter(|t| !t.completed).count();
        let mut out = format!(
            "The user's todo list ({open} open, {} done):\n",
            todos.len() - open
        );
        for todo in todos {
            let mark = if todo.completed { 'x' } else { ' ' };
            out.push_str(&format!("- [{mark}] {} [id: {}]\n", todo.title, todo.id));
        }
        out.pop();
        Ok(out)
    }
}
