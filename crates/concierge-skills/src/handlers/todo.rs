//! Todo skills: `list-todos`, `add-todo`, `toggle-todo`, `update-todo`,
//! `delete-todo`.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_store::{NewTodo, Todo, TodoPatch, TodoStore};
use serde_json::{Value, json};
use tracing::debug;

use super::not_found;
use crate::args::Args;
use crate::context::SkillContext;
use crate::envelope::SkillResponse;
use crate::error::HandlerError;
use crate::handler::SkillHandler;
use crate::schema::{ArgSchema, ArgSpec};

type Result<T> = std::result::Result<T, HandlerError>;

const ENTITY: &str = "todo";

fn id_arg() -> ArgSpec {
    ArgSpec::string("Id of the todo")
}

// ---------------------------------------------------------------------------
// list-todos
// ---------------------------------------------------------------------------

/// Which todos `list-todos` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoFilter {
    All,
    Open,
    Done,
}

impl TodoFilter {
    fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("all") => Ok(Self::All),
            Some("open") => Ok(Self::Open),
            Some("done") => Ok(Self::Done),
            Some(other) => Err(HandlerError::InvalidArgs(format!(
                "`filter` must be one of all, open, done (got `{other}`)"
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    fn keeps(&self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Open => !todo.completed,
            Self::Done => todo.completed,
        }
    }
}

/// Read-only listing of the todo store.
pub struct ListTodos {
    store: Arc<TodoStore>,
}

impl ListTodos {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg(
            "filter",
            ArgSpec::string("Which todos to list")
                .optional()
                .one_of(&["all", "open", "done"]),
        )
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let filter = TodoFilter::parse(args.optional_str("filter")?.as_deref())?;

        let todos: Vec<Todo> = self
            .store
            .list()
            .await
            .into_iter()
            .filter(|t| filter.keeps(t))
            .collect();
        let open = todos.iter().filter(|t| !t.completed).count();

        Ok(json!({
            "filter": filter.as_str(),
            "count": todos.len(),
            "open": open,
            "todos": todos,
        }))
    }
}

#[async_trait]
impl SkillHandler for ListTodos {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// add-todo
// ---------------------------------------------------------------------------

pub struct AddTodo {
    store: Arc<TodoStore>,
}

impl AddTodo {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg("title", ArgSpec::string("What needs to be done"))
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let title = args.required_str("title")?;

        let todo = self.store.create(NewTodo::new(title)).await?;
        debug!(todo_id = %todo.id, "todo added");
        Ok(json!({ "todo": todo }))
    }
}

#[async_trait]
impl SkillHandler for AddTodo {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// toggle-todo
// ---------------------------------------------------------------------------

pub struct ToggleTodo {
    store: Arc<TodoStore>,
}

impl ToggleTodo {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg("id", id_arg())
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let id = args.required_str("id")?;

        Ok(match self.store.toggle(&id).await? {
            Some(todo) => json!({ "found": true, "todo": todo }),
            None => not_found(ENTITY, &id),
        })
    }
}

#[async_trait]
impl SkillHandler for ToggleTodo {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// update-todo
// ---------------------------------------------------------------------------

pub struct UpdateTodo {
    store: Arc<TodoStore>,
}

impl UpdateTodo {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new()
            .arg("id", id_arg())
            .arg("title", ArgSpec::string("New title").optional())
            .arg(
                "completed",
                ArgSpec::boolean("Mark the todo done or open").optional(),
            )
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let id = args.required_str("id")?;
        let patch = TodoPatch {
            title: args.optional_str("title")?,
            completed: args.optional_bool("completed")?,
        };
        if patch.title.is_none() && patch.completed.is_none() {
            return Err(HandlerError::InvalidArgs(
                "Nothing to update: provide `title` or `completed`".into(),
            ));
        }

        Ok(match self.store.update(&id, patch).await? {
            Some(todo) => json!({ "found": true, "todo": todo }),
            None => not_found(ENTITY, &id),
        })
    }
}

#[async_trait]
impl SkillHandler for UpdateTodo {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// delete-todo
// ---------------------------------------------------------------------------

pub struct DeleteTodo {
    store: Arc<TodoStore>,
}

impl DeleteTodo {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg("id", id_arg())
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let id = args.required_str("id")?;

        if self.store.delete(&id).await? {
            Ok(json!({ "found": true, "deleted": true, "id": id }))
        } else {
            let mut payload = not_found(ENTITY, &id);
            payload["deleted"] = json!(false);
            Ok(payload)
        }
    }
}

#[async_trait]
impl SkillHandler for DeleteTodo {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}
