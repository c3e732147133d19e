//! Context injection manager.
//!
//! Maps skill ids to a [`ContextProvider`] and runs, per injection:
//!
//! 1. resolve the provider (none registered: nothing to do)
//! 2. fetch data when the provider has a data source, bounded by the
//!    agent's fetch timeout
//! 3. for data-backed providers, require the skill's formatter config
//! 4. format
//! 5. hand the result to the caller's sink
//!
//! Injection is auxiliary.  Every error and panic along the way is logged
//! and reported as [`InjectionOutcome::Failed`]; [`ContextInjectionManager::inject`]
//! itself never fails.
//!
//! The registry is backed by [`DashMap`], so providers can be registered
//! while injections for other skills are running.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use concierge_skills::SkillId;
use concierge_skills::handler::panic_message;
use concierge_store::{CalendarStore, TodoStore};
use dashmap::DashMap;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agenda::{CalendarFormatter, TodoFormatter};
use crate::catalog::CatalogFormatter;
use crate::config::AgentConfig;
use crate::error::{ContextError, ContextResult};
use crate::formatter::ContextFormatter;
use crate::source::DataSource;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What the manager knows about one skill's context.
#[derive(Clone)]
pub struct ContextProvider {
    pub data_source: Option<Arc<dyn DataSource>>,
    pub formatter: Arc<dyn ContextFormatter>,
}

impl ContextProvider {
    /// A self-contained formatter.
    pub fn new(formatter: Arc<dyn ContextFormatter>) -> Self {
        Self {
            data_source: None,
            formatter,
        }
    }

    /// A data-backed formatter.
    pub fn with_source(formatter: Arc<dyn ContextFormatter>, source: Arc<dyn DataSource>) -> Self {
        Self {
            data_source: Some(source),
            formatter,
        }
    }
}

/// What the sink receives.  Serializes as `{ turns, turnComplete }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPayload {
    pub turns: String,
    pub turn_complete: bool,
}

/// Caller-supplied injection callback.
pub type ContextSink<'a> = &'a (dyn Fn(ContextPayload) + Send + Sync);

/// Why an injection did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The skill has no context requirement.
    NoProvider,
    /// The formatter produced an empty string.
    EmptyContext,
    /// Context was produced but the caller gave no sink.
    NoSink,
}

/// Result of one injection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// The sink was called with this many bytes of context.
    Injected { bytes: usize },
    Skipped(SkipReason),
    /// Something went wrong; already logged.
    Failed(String),
}

impl InjectionOutcome {
    pub fn is_injected(&self) -> bool {
        matches!(self, Self::Injected { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Concurrent skill-id to provider registry.
///
/// Cheaply cloneable (`Arc`-backed) and `Send + Sync`.
#[derive(Clone, Default)]
pub struct ContextInjectionManager {
    providers: Arc<DashMap<String, ContextProvider>>,
}

impl ContextInjectionManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` for `skill_id`, replacing any previous one.
    pub fn register(&self, skill_id: impl Into<String>, provider: ContextProvider) {
        let skill_id = skill_id.into();
        info!(
            skill_id = %skill_id,
            data_backed = provider.data_source.is_some(),
            "context provider registered"
        );
        self.providers.insert(skill_id, provider);
    }

    /// Returns whether a provider was removed.
    pub fn unregister(&self, skill_id: &str) -> bool {
        let removed = self.providers.remove(skill_id).is_some();
        if removed {
            info!(skill_id = %skill_id, "context provider unregistered");
        }
        removed
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.providers.contains_key(skill_id)
    }

    /// Registered skill ids, sorted.
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Register the store-backed formatters for every todo and calendar
    /// skill.
    pub fn register_store_formatters(
        &self,
        todos: Arc<TodoStore>,
        calendar: Arc<CalendarStore>,
    ) {
        let todo_formatter: Arc<dyn ContextFormatter> = Arc::new(TodoFormatter::new(todos));
        let calendar_formatter: Arc<dyn ContextFormatter> =
            Arc::new(CalendarFormatter::new(calendar));

        for id in SkillId::ALL {
            let formatter = match id {
                SkillId::ListTodos
                | SkillId::AddTodo
                | SkillId::ToggleTodo
                | SkillId::UpdateTodo
                | SkillId::DeleteTodo => &todo_formatter,
                SkillId::ListCalendarEntries
                | SkillId::AddCalendarEntry
                | SkillId::UpdateCalendarEntry
                | SkillId::DeleteCalendarEntry => &calendar_formatter,
                SkillId::ShowMenu | SkillId::ShowWellness => continue,
            };
            self.register(id.as_str(), ContextProvider::new(formatter.clone()));
        }
    }

    /// Register a catalog formatter fed by `source`.
    pub fn register_catalog(&self, skill_id: impl Into<String>, source: Arc<dyn DataSource>) {
        self.register(
            skill_id,
            ContextProvider::with_source(Arc::new(CatalogFormatter::new()), source),
        );
    }

    /// Produce the context string for `skill_id` without injecting it.
    ///
    /// `Ok(None)` means no provider is registered.  Unlike
    /// [`ContextInjectionManager::inject`], errors are returned, but panics
    /// are not caught.
    pub async fn render(
        &self,
        skill_id: &str,
        agent: &AgentConfig,
    ) -> ContextResult<Option<String>> {
        // Clone out of the map so no shard lock is held across an await.
        let Some(provider) = self.providers.get(skill_id).map(|p| p.value().clone()) else {
            return Ok(None);
        };

        let text = match &provider.data_source {
            Some(source) => {
                let data = fetch(skill_id, source.as_ref(), agent).await?;
                let config = agent.context_for(skill_id).ok_or_else(|| {
                    ContextError::MissingConfig {
                        skill_id: skill_id.to_owned(),
                        agent_id: agent.agent_id.clone(),
                    }
                })?;
                provider.formatter.format(Some(&data), Some(config)).await?
            }
            None => provider.formatter.format(None, None).await?,
        };
        Ok(Some(text))
    }

    /// Run one injection for `skill_id` on behalf of `agent`.
    pub async fn inject(
        &self,
        skill_id: &str,
        agent: &AgentConfig,
        sink: Option<ContextSink<'_>>,
    ) -> InjectionOutcome {
        let attempt = AssertUnwindSafe(self.try_inject(skill_id, agent, sink)).catch_unwind();
        let result = match attempt.await {
            Ok(result) => result,
            Err(panic) => Err(ContextError::Panicked(panic_message(panic.as_ref()))),
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    skill_id = %skill_id,
                    agent_id = %agent.agent_id,
                    error = %e,
                    "context injection failed"
                );
                InjectionOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_inject(
        &self,
        skill_id: &str,
        agent: &AgentConfig,
        sink: Option<ContextSink<'_>>,
    ) -> ContextResult<InjectionOutcome> {
        let Some(text) = self.render(skill_id, agent).await? else {
            debug!(skill_id = %skill_id, "no context provider, skipping");
            return Ok(InjectionOutcome::Skipped(SkipReason::NoProvider));
        };

        if text.trim().is_empty() {
            warn!(skill_id = %skill_id, "formatter produced empty context, skipping");
            return Ok(InjectionOutcome::Skipped(SkipReason::EmptyContext));
        }

        let Some(sink) = sink else {
            debug!(skill_id = %skill_id, "no sink supplied, context dropped");
            return Ok(InjectionOutcome::Skipped(SkipReason::NoSink));
        };

        let bytes = text.len();
        sink(ContextPayload {
            turns: text,
            turn_complete: true,
        });
        info!(skill_id = %skill_id, bytes, "context injected");
        Ok(InjectionOutcome::Injected { bytes })
    }
}

async fn fetch(
    skill_id: &str,
    source: &dyn DataSource,
    agent: &AgentConfig,
) -> ContextResult<Value> {
    let timeout = agent.fetch_timeout();
    let fetched = tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| ContextError::Timeout {
            skill_id: skill_id.to_owned(),
            secs: timeout.as_secs(),
        })??;
    fetched.ok_or_else(|| ContextError::MissingData {
        skill_id: skill_id.to_owned(),
    })
}
