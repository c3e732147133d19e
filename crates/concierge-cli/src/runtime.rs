//! Wiring of stores, skills and context providers for one CLI process.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use concierge_context::{
    AgentConfig, ContextInjectionManager, ContextSink, DataSource, InjectionOutcome,
    JsonFileSource,
};
use concierge_skills::{
    CatalogDomain, CatalogSettings, FunctionLoader, SkillContext, SkillId, SkillResponse,
    SkillServices,
};
use concierge_store::{CalendarStore, TodoStore};
use serde_json::Value;
use tracing::{info, warn};

/// Everything a subcommand needs to invoke skills and inject context.
pub struct Runtime {
    pub agent: AgentConfig,
    pub loader: FunctionLoader,
    pub context: ContextInjectionManager,
    user_id: Option<String>,
}

impl Runtime {
    pub fn new(agent: AgentConfig) -> Self {
        let todos = Arc::new(TodoStore::new());
        let calendar = Arc::new(CalendarStore::new());

        let catalog = CatalogSettings {
            menu_not_found: agent
                .not_found_message(SkillId::ShowMenu.as_str())
                .map(str::to_owned),
            wellness_not_found: agent
                .not_found_message(SkillId::ShowWellness.as_str())
                .map(str::to_owned),
        };
        let loader = FunctionLoader::builtin(SkillServices {
            todos: todos.clone(),
            calendar: calendar.clone(),
            catalog,
        });

        let context = ContextInjectionManager::new();
        context.register_store_formatters(todos, calendar);
        for (id, _, path) in catalog_files(&agent) {
            context.register_catalog(id.as_str(), Arc::new(JsonFileSource::new(path)));
        }

        info!(
            agent_id = %agent.agent_id,
            skills = loader.skill_ids().len(),
            providers = context.registered_ids().len(),
            "runtime ready"
        );

        Self {
            agent,
            loader,
            context,
            user_id: None,
        }
    }

    /// Invoke skills on behalf of `user_id`.
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Build the invocation context.  Configured data files fill the raw
    /// data bag; `skill_data` takes precedence when given.  Unreadable
    /// files are logged and left out.
    pub async fn skill_context(&self, skill_data: Option<Value>) -> SkillContext {
        let mut ctx = SkillContext::new();
        if let Some(user_id) = &self.user_id {
            ctx = ctx.with_user(user_id.clone());
        }
        for (_, domain, path) in catalog_files(&self.agent) {
            let domain = domain.key();
            match JsonFileSource::new(path).fetch().await {
                Ok(Some(data)) => ctx = ctx.with_raw_data(domain, data),
                Ok(None) => {}
                Err(e) => warn!(domain, error = %e, "data file unavailable"),
            }
        }
        if let Some(data) = skill_data {
            ctx = ctx.with_skill_data(data);
        }
        ctx
    }

    /// Resolve and invoke `skill`.  Only an unknown or broken skill is an
    /// error; handler failures come back inside the envelope.
    pub async fn invoke(
        &self,
        skill: &str,
        args: Option<Value>,
        skill_data: Option<Value>,
    ) -> Result<SkillResponse> {
        let descriptor = self
            .loader
            .load_function(skill)
            .with_context(|| format!("cannot load skill `{skill}`"))?;
        let ctx = self.skill_context(skill_data).await;
        Ok(descriptor.invoke_checked(args, &ctx).await)
    }

    pub async fn inject(&self, skill: &str, sink: Option<ContextSink<'_>>) -> InjectionOutcome {
        self.context.inject(skill, &self.agent, sink).await
    }

    /// The context text for `skill`, or `None` if it has no provider.
    pub async fn render_context(&self, skill: &str) -> Result<Option<String>> {
        self.context
            .render(skill, &self.agent)
            .await
            .with_context(|| format!("failed to render context for `{skill}`"))
    }
}

/// Catalog skills with a configured data file.
fn catalog_files(agent: &AgentConfig) -> impl Iterator<Item = (SkillId, CatalogDomain, &Path)> {
    SkillId::ALL.into_iter().filter_map(|id| {
        let domain = id.catalog_domain()?;
        let path = match domain {
            CatalogDomain::Menu => agent.data.menu.as_deref(),
            CatalogDomain::Wellness => agent.data.wellness.as_deref(),
        }?;
        Some((id, domain, path))
    })
}
