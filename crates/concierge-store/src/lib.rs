//! # concierge-store
//!
//! In-memory stores for Concierge.
//!
//! Each store is the single source of truth for one domain and lives only
//! as long as its handle: there is no persistence layer.  Stores are built
//! explicitly and shared as `Arc` handles with the skill handlers and
//! context formatters that need them.
//!
//! ## Quick start
//!
//! ```ignore
//! use concierge_store::{NewTodo, TodoStore};
//!
//! let todos = TodoStore::new();
//! let todo = todos.create(NewTodo::new("Buy milk")).await?;
//! todos.toggle(&todo.id).await?;
//! assert!(todos.list().await[0].completed);
//! ```

pub mod calendar;
pub mod error;
pub mod memory;
pub mod todo;

// ── re-exports ───────────────────────────────────────────────────────

pub use calendar::{
    CalendarEntry, CalendarEntryPatch, CalendarStore, DATE_FORMAT, NewCalendarEntry, TIME_FORMAT,
    parse_date, parse_time,
};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, Record};
pub use todo::{NewTodo, Todo, TodoPatch, TodoStore};
