//! Built-in skill handlers.
//!
//! Every handler splits into an `execute` that returns
//! `Result<Value, HandlerError>` and a thin [`SkillHandler`] impl that folds
//! it into the envelope.  A missing id on update/toggle/delete is not an
//! error: the handler succeeds with `found: false`.
//!
//! [`SkillHandler`]: crate::handler::SkillHandler

pub mod calendar;
pub mod catalog;
pub mod todo;

use serde_json::{Value, json};

pub use calendar::{
    AddCalendarEntry, DeleteCalendarEntry, ListCalendarEntries, UpdateCalendarEntry,
};
pub use catalog::{CatalogDomain, ShowCatalog};
pub use todo::{AddTodo, DeleteTodo, ListTodos, ToggleTodo, UpdateTodo};

/// Payload for an id that matched nothing.
pub(crate) fn not_found(entity: &str, id: &str) -> Value {
    json!({
        "found": false,
        "id": id,
        "message": format!("No {entity} found with id `{id}`"),
    })
}
