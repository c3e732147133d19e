//! Todo records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::memory::{MemoryStore, Record, non_empty};

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new todo.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Fields to change on an existing todo.  `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Record for Todo {
    type Draft = NewTodo;
    type Patch = TodoPatch;
    const ENTITY: &'static str = "todo";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewTodo) -> StoreResult<Self> {
        Ok(Self {
            id,
            title: non_empty("title", &draft.title)?,
            completed: false,
            created_at: Utc::now(),
        })
    }

    fn patched(&self, patch: TodoPatch) -> StoreResult<Self> {
        let title = match patch.title {
            Some(title) => non_empty("title", &title)?,
            None => self.title.clone(),
        };
        Ok(Self {
            id: self.id.clone(),
            title,
            completed: patch.completed.unwrap_or(self.completed),
            created_at: self.created_at,
        })
    }
}

/// The todo store.
pub type TodoStore = MemoryStore<Todo>;

impl MemoryStore<Todo> {
    /// Flip the `completed` flag of the todo with the given id.
    ///
    /// Returns `Ok(None)` when no todo has that id.
    pub async fn toggle(&self, id: &str) -> StoreResult<Option<Todo>> {
        self.update_with(id, |todo| {
            Ok(Todo {
                completed: !todo.completed,
                ..todo.clone()
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggle_flips_completed() {
        let store = TodoStore::new();
        let todo = store.create(NewTodo::new("Buy milk")).await.unwrap();
        assert!(!todo.completed);

        let toggled = store.toggle(&todo.id).await.unwrap().unwrap();
        assert!(toggled.completed);
        let toggled = store.toggle(&todo.id).await.unwrap().unwrap();
        assert!(!toggled.completed);
    }

    #[tokio::test]
    async fn toggle_missing_is_none() {
        let store = TodoStore::new();
        assert!(store.toggle("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn patch_keeps_unset_fields() {
        let store = TodoStore::new();
        let todo = store.create(NewTodo::new("Call mum")).await.unwrap();

        let updated = store
            .update(
                &todo.id,
                TodoPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Call mum");
        assert!(updated.completed);
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[test]
    fn serializes_camel_case() {
        let todo = Todo::from_draft("t1".into(), NewTodo::new("x")).unwrap();
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
    }
}
