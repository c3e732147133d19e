//! The function loader: skill id to `{ handler, ui_component, schema }`.
//!
//! Skill ids form a closed enum and [`FunctionLoader::builtin`] wires every
//! one of them with an exhaustive `match`.  Modules are still stored with
//! optional exports so that a loader assembled by hand (or with a module
//! removed) is checked at resolution time: [`FunctionLoader::resolve`]
//! refuses to hand out a descriptor unless all three exports are present
//! and the schema is well-formed.
//!
//! Some skills do not use their module's own view.  The UI override table
//! maps them to a shared view instead; by default every calendar-mutating
//! skill renders [`CALENDAR_VIEW`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use concierge_store::{CalendarStore, TodoStore};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::context::SkillContext;
use crate::envelope::SkillResponse;
use crate::error::{RegistryError, RegistryResult};
use crate::handler::{SkillHandler, invoke_guarded};
use crate::handlers::{
    AddCalendarEntry, AddTodo, CatalogDomain, DeleteCalendarEntry, DeleteTodo,
    ListCalendarEntries, ListTodos, ShowCatalog, ToggleTodo, UpdateCalendarEntry, UpdateTodo,
};
use crate::schema::ArgSchema;
use crate::ui::{CALENDAR_VIEW, UiLoader, view_loader};

// ---------------------------------------------------------------------------
// Skill ids
// ---------------------------------------------------------------------------

/// Every skill this runtime knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkillId {
    ListTodos,
    AddTodo,
    ToggleTodo,
    UpdateTodo,
    DeleteTodo,
    ListCalendarEntries,
    AddCalendarEntry,
    UpdateCalendarEntry,
    DeleteCalendarEntry,
    ShowMenu,
    ShowWellness,
}

impl SkillId {
    pub const ALL: [SkillId; 11] = [
        Self::ListTodos,
        Self::AddTodo,
        Self::ToggleTodo,
        Self::UpdateTodo,
        Self::DeleteTodo,
        Self::ListCalendarEntries,
        Self::AddCalendarEntry,
        Self::UpdateCalendarEntry,
        Self::DeleteCalendarEntry,
        Self::ShowMenu,
        Self::ShowWellness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListTodos => "list-todos",
            Self::AddTodo => "add-todo",
            Self::ToggleTodo => "toggle-todo",
            Self::UpdateTodo => "update-todo",
            Self::DeleteTodo => "delete-todo",
            Self::ListCalendarEntries => "list-calendar-entries",
            Self::AddCalendarEntry => "add-calendar-entry",
            Self::UpdateCalendarEntry => "update-calendar-entry",
            Self::DeleteCalendarEntry => "delete-calendar-entry",
            Self::ShowMenu => "show-menu",
            Self::ShowWellness => "show-wellness",
        }
    }

    /// One-line description used in tool declarations.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ListTodos => "List todos, optionally only open or done ones",
            Self::AddTodo => "Add a todo",
            Self::ToggleTodo => "Flip a todo between open and done",
            Self::UpdateTodo => "Change the title or state of a todo",
            Self::DeleteTodo => "Delete a todo",
            Self::ListCalendarEntries => "List calendar entries grouped by day",
            Self::AddCalendarEntry => "Add a calendar entry",
            Self::UpdateCalendarEntry => "Change fields of a calendar entry",
            Self::DeleteCalendarEntry => "Delete a calendar entry",
            Self::ShowMenu => "Show the restaurant menu",
            Self::ShowWellness => "Show the wellness and spa offers",
        }
    }

    /// The catalog a context-dependent skill reads, if any.
    pub fn catalog_domain(&self) -> Option<CatalogDomain> {
        match self {
            Self::ShowMenu => Some(CatalogDomain::Menu),
            Self::ShowWellness => Some(CatalogDomain::Wellness),
            _ => None,
        }
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownSkill(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Modules and descriptors
// ---------------------------------------------------------------------------

/// The exports of one skill module, any of which may be missing.
#[derive(Clone, Default)]
pub struct SkillModule {
    pub handler: Option<Arc<dyn SkillHandler>>,
    pub ui_component: Option<UiLoader>,
    pub schema: Option<ArgSchema>,
}

impl SkillModule {
    pub fn new(handler: Arc<dyn SkillHandler>, ui_component: UiLoader, schema: ArgSchema) -> Self {
        Self {
            handler: Some(handler),
            ui_component: Some(ui_component),
            schema: Some(schema),
        }
    }

    /// The same module with its schema export dropped.
    pub fn without_schema(mut self) -> Self {
        self.schema = None;
        self
    }
}

impl fmt::Debug for SkillModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillModule")
            .field("handler", &self.handler.is_some())
            .field("ui_component", &self.ui_component.is_some())
            .field("schema", &self.schema)
            .finish()
    }
}

/// A fully resolved skill.  All three exports are guaranteed present.
#[derive(Clone)]
pub struct SkillDescriptor {
    pub id: SkillId,
    pub handler: Arc<dyn SkillHandler>,
    pub ui_component: UiLoader,
    pub schema: ArgSchema,
}

impl SkillDescriptor {
    /// Run the handler.  Panics are caught and reported as failures.
    pub async fn invoke(&self, args: Option<Value>, ctx: &SkillContext) -> SkillResponse {
        invoke_guarded(self.id.as_str(), self.handler.as_ref(), args, ctx).await
    }

    /// Check `args` against the schema, then run the handler.
    pub async fn invoke_checked(&self, args: Option<Value>, ctx: &SkillContext) -> SkillResponse {
        if let Err(reason) = self.schema.check_args(args.as_ref()) {
            debug!(skill_id = %self.id, reason = %reason, "arguments rejected by schema");
            return SkillResponse::fail(reason);
        }
        self.invoke(args, ctx).await
    }

    /// Tool declaration for an LLM: `{ name, description, parameters }`.
    pub fn tool_definition(&self) -> Value {
        json!({
            "name": self.id.as_str(),
            "description": self.id.description(),
            "parameters": self.schema.to_json_schema(),
        })
    }
}

impl fmt::Debug for SkillDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillDescriptor")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// User-facing messages for the catalog skills.
#[derive(Debug, Clone, Default)]
pub struct CatalogSettings {
    pub menu_not_found: Option<String>,
    pub wellness_not_found: Option<String>,
}

/// Everything the built-in handlers depend on.
#[derive(Debug, Clone, Default)]
pub struct SkillServices {
    pub todos: Arc<TodoStore>,
    pub calendar: Arc<CalendarStore>,
    pub catalog: CatalogSettings,
}

fn catalog_handler(domain: CatalogDomain, message: Option<&String>) -> ShowCatalog {
    let handler = ShowCatalog::new(domain);
    match message {
        Some(m) => handler.with_not_found_message(m.clone()),
        None => handler,
    }
}

fn wired<H: SkillHandler + 'static>(id: SkillId, handler: H, schema: ArgSchema) -> SkillModule {
    SkillModule::new(Arc::new(handler), view_loader(id.as_str()), schema)
}

fn builtin_module(id: SkillId, services: &SkillServices) -> SkillModule {
    let todos = || services.todos.clone();
    let calendar = || services.calendar.clone();

    match id {
        SkillId::ListTodos => wired(id, ListTodos::new(todos()), ListTodos::schema()),
        SkillId::AddTodo => wired(id, AddTodo::new(todos()), AddTodo::schema()),
        SkillId::ToggleTodo => wired(id, ToggleTodo::new(todos()), ToggleTodo::schema()),
        SkillId::UpdateTodo => wired(id, UpdateTodo::new(todos()), UpdateTodo::schema()),
        SkillId::DeleteTodo => wired(id, DeleteTodo::new(todos()), DeleteTodo::schema()),
        SkillId::ListCalendarEntries => wired(
            id,
            ListCalendarEntries::new(calendar()),
            ListCalendarEntries::schema(),
        ),
        SkillId::AddCalendarEntry => wired(
            id,
            AddCalendarEntry::new(calendar()),
            AddCalendarEntry::schema(),
        ),
        SkillId::UpdateCalendarEntry => wired(
            id,
            UpdateCalendarEntry::new(calendar()),
            UpdateCalendarEntry::schema(),
        ),
        SkillId::DeleteCalendarEntry => wired(
            id,
            DeleteCalendarEntry::new(calendar()),
            DeleteCalendarEntry::schema(),
        ),
        SkillId::ShowMenu => wired(
            id,
            catalog_handler(CatalogDomain::Menu, services.catalog.menu_not_found.as_ref()),
            ShowCatalog::schema(),
        ),
        SkillId::ShowWellness => wired(
            id,
            catalog_handler(
                CatalogDomain::Wellness,
                services.catalog.wellness_not_found.as_ref(),
            ),
            ShowCatalog::schema(),
        ),
    }
}

/// The default UI override table.
pub fn default_ui_overrides() -> HashMap<SkillId, String> {
    [
        SkillId::AddCalendarEntry,
        SkillId::UpdateCalendarEntry,
        SkillId::DeleteCalendarEntry,
    ]
    .into_iter()
    .map(|id| (id, CALENDAR_VIEW.to_owned()))
    .collect()
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Resolves skill ids into validated [`SkillDescriptor`]s.
#[derive(Debug, Clone)]
pub struct FunctionLoader {
    modules: HashMap<SkillId, SkillModule>,
    ui_overrides: HashMap<SkillId, String>,
}

impl Default for FunctionLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionLoader {
    /// A loader with no modules and the default UI overrides.
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            ui_overrides: default_ui_overrides(),
        }
    }

    /// A loader with every built-in skill wired to `services`.
    pub fn builtin(services: SkillServices) -> Self {
        let mut loader = Self::new();
        for id in SkillId::ALL {
            loader.modules.insert(id, builtin_module(id, &services));
        }
        info!(skills = loader.modules.len(), "built-in skills registered");
        loader
    }

    /// Add or replace the module for `id`.
    pub fn insert_module(&mut self, id: SkillId, module: SkillModule) -> Option<SkillModule> {
        debug!(skill_id = %id, "skill module inserted");
        self.modules.insert(id, module)
    }

    pub fn remove_module(&mut self, id: SkillId) -> Option<SkillModule> {
        self.modules.remove(&id)
    }

    /// Mutable access to a module, e.g. to drop one of its exports.
    pub fn module_mut(&mut self, id: SkillId) -> Option<&mut SkillModule> {
        self.modules.get_mut(&id)
    }

    /// Route `id` to a shared view instead of its module's own.
    pub fn with_ui_override(mut self, id: SkillId, view: impl Into<String>) -> Self {
        self.ui_overrides.insert(id, view.into());
        self
    }

    pub fn without_ui_override(mut self, id: SkillId) -> Self {
        self.ui_overrides.remove(&id);
        self
    }

    pub fn ui_override(&self, id: SkillId) -> Option<&str> {
        self.ui_overrides.get(&id).map(String::as_str)
    }

    /// Ids with a module, in declaration order.
    pub fn skill_ids(&self) -> Vec<SkillId> {
        SkillId::ALL
            .into_iter()
            .filter(|id| self.modules.contains_key(id))
            .collect()
    }

    /// Resolve and validate the descriptor of `id`.
    pub fn resolve(&self, id: SkillId) -> RegistryResult<SkillDescriptor> {
        let skill_id = id.as_str();
        let module = self
            .modules
            .get(&id)
            .ok_or_else(|| RegistryError::ModuleNotFound {
                skill_id: skill_id.to_owned(),
            })?;

        let missing = |export| RegistryError::MissingExport {
            skill_id: skill_id.to_owned(),
            export,
        };

        let handler = module.handler.clone().ok_or_else(|| missing("handler"))?;
        let ui_component = match self.ui_override(id) {
            Some(view) => view_loader(view),
            None => module
                .ui_component
                .clone()
                .ok_or_else(|| missing("uiComponent"))?,
        };
        let schema = module.schema.clone().ok_or_else(|| missing("schema"))?;
        schema
            .validate()
            .map_err(|reason| RegistryError::MalformedExport {
                skill_id: skill_id.to_owned(),
                export: "schema",
                reason,
            })?;

        debug!(skill_id = %id, "skill resolved");
        Ok(SkillDescriptor {
            id,
            handler,
            ui_component,
            schema,
        })
    }

    /// String entry point for orchestrators: parse the id, then resolve.
    pub fn load_function(&self, function_id: &str) -> RegistryResult<SkillDescriptor> {
        self.resolve(function_id.parse()?)
    }
}
