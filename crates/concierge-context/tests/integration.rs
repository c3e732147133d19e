//! Integration tests for the concierge-context crate.
//!
//! Formatters are exercised through the public API and the injection
//! manager is run next to real skill invocations to check that injection
//! failures never leak into skill results.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use concierge_context::{
    AgentConfig, CatalogFormatter, ContextError, ContextFormatter, ContextInjectionManager,
    ContextPayload, ContextProvider, ContextResult, Currency, DataSource, FormatterConfig,
    InjectionOutcome, JsonFileSource, SkipReason, StaticSource,
};
use concierge_skills::{FunctionLoader, SkillContext, SkillId, SkillServices};
use concierge_store::{CalendarStore, TodoStore};
use serde_json::{Value, json};

fn menu_config() -> FormatterConfig {
    FormatterConfig::default()
        .with_header("Here is today's menu.")
        .with_instruction("Recommend dishes when the guest asks.")
        .with_section_header("MENU")
        .with_category("appetizers", "STARTERS")
        .with_category("mains", "MAINS")
        .with_category("desserts", "DESSERTS")
        .with_currency(Currency::new("EUR", "de-DE"))
        .with_reminder("Only recommend items from this list.")
}

fn agent() -> AgentConfig {
    AgentConfig {
        fetch_timeout_secs: 1,
        ..AgentConfig::default()
    }
    .with_skill_context("show-menu", menu_config())
}

// ═══════════════════════════════════════════════════════════════════════
//  Catalog formatting
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn soup_is_rendered_as_a_german_euro_starter() {
    let data = json!({"appetizers": [{"name": "Soup", "price": 5, "type": "veg"}]});
    let config = FormatterConfig::default()
        .with_category("appetizers", "STARTERS")
        .with_currency(Currency::new("EUR", "de-DE"));

    let out = CatalogFormatter::render(Some(&data), &config);
    let lines: Vec<&str> = out.lines().collect();
    let header = lines.iter().position(|l| *l == "STARTERS:").unwrap();
    let item = lines[header + 1];
    assert!(item.contains("Soup"), "{item}");
    assert!(item.contains("5,00 €"), "{item}");
    assert!(item.contains("(veg)"), "{item}");
}

#[test]
fn formatting_is_deterministic() {
    let data = json!({
        "desserts": [{"name": "Tiramisu", "price": 7.5}],
        "mains": [{"name": "Risotto", "price": 18, "type": "veg"}, {"name": "Steak", "price": 29.9}],
        "appetizers": [{"name": "Soup", "price": 5}],
    });
    let config = menu_config();

    let first = CatalogFormatter::render(Some(&data), &config);
    for _ in 0..10 {
        assert_eq!(CatalogFormatter::render(Some(&data), &config), first);
    }
    let clone = data.clone();
    assert_eq!(CatalogFormatter::render(Some(&clone), &config.clone()), first);
}

#[test]
fn absent_or_empty_categories_are_skipped() {
    let data = json!({
        "appetizers": [],
        "mains": [{"name": "Steak", "price": 29.9}],
        "drinks": [{"name": "Water", "price": 2}],
    });
    let out = CatalogFormatter::render(Some(&data), &menu_config());

    assert!(out.contains("MAINS:"));
    assert!(!out.contains("STARTERS"));
    assert!(!out.contains("DESSERTS"));
    // Categories without a label are not printed when labels are configured.
    assert!(!out.contains("Water"));
}

#[test]
fn categories_follow_configured_order() {
    let data = json!({
        "appetizers": [{"name": "Soup", "price": 5}],
        "desserts": [{"name": "Tiramisu", "price": 7.5}],
        "mains": [{"name": "Steak", "price": 29.9}],
    });
    let out = CatalogFormatter::render(Some(&data), &menu_config());
    let starters = out.find("STARTERS:").unwrap();
    let mains = out.find("MAINS:").unwrap();
    let desserts = out.find("DESSERTS:").unwrap();
    assert!(starters < mains && mains < desserts);
    assert!(out.starts_with("Here is today's menu.\n\nRecommend dishes"));
    assert!(out.ends_with("\n\nOnly recommend items from this list."));
}

// ═══════════════════════════════════════════════════════════════════════
//  Injection manager
// ═══════════════════════════════════════════════════════════════════════

struct Exploding;

#[async_trait]
impl ContextFormatter for Exploding {
    async fn format(
        &self,
        _data: Option<&Value>,
        _config: Option<&FormatterConfig>,
    ) -> ContextResult<String> {
        panic!("formatter blew up");
    }
}

struct FailingSource;

#[async_trait]
impl DataSource for FailingSource {
    async fn fetch(&self) -> ContextResult<Option<Value>> {
        Err(ContextError::Fetch("upstream unavailable".into()))
    }
}

struct SlowSource;

#[async_trait]
impl DataSource for SlowSource {
    async fn fetch(&self) -> ContextResult<Option<Value>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Some(json!({})))
    }
}

fn recorder() -> (Arc<Mutex<Vec<ContextPayload>>>, impl Fn(ContextPayload) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = seen.clone();
    (seen, move |payload| inner.lock().unwrap().push(payload))
}

#[tokio::test]
async fn catalog_injection_end_to_end() {
    let manager = ContextInjectionManager::new();
    let data = json!({"appetizers": [{"name": "Soup", "price": 5, "type": "veg"}]});
    manager.register_catalog("show-menu", Arc::new(StaticSource::new(data)));
    let (seen, sink) = recorder();

    let outcome = manager.inject("show-menu", &agent(), Some(&sink)).await;
    assert!(outcome.is_injected(), "{outcome:?}");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].turn_complete);
    assert!(seen[0].turns.contains("- Soup: 5,00 € (veg)"));

    let wire = serde_json::to_value(&seen[0]).unwrap();
    assert_eq!(wire["turnComplete"], true);
}

#[tokio::test]
async fn json_file_source_feeds_the_formatter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.json");
    std::fs::write(&path, r#"{"mains": [{"name": "Steak", "price": 29.9}]}"#).unwrap();

    let manager = ContextInjectionManager::new();
    manager.register_catalog("show-menu", Arc::new(JsonFileSource::new(&path)));

    let text = manager.render("show-menu", &agent()).await.unwrap().unwrap();
    assert!(text.contains("- Steak: 29,90 €"));
}

#[tokio::test]
async fn failures_are_reported_not_raised() {
    let manager = ContextInjectionManager::new();
    manager.register("boom", ContextProvider::new(Arc::new(Exploding)));
    manager.register_catalog("show-menu", Arc::new(FailingSource));
    manager.register_catalog("show-wellness", Arc::new(StaticSource::new(json!({"spa": []}))));
    let (seen, sink) = recorder();
    let agent = agent();

    let panicked = manager.inject("boom", &agent, Some(&sink)).await;
    assert!(matches!(&panicked, InjectionOutcome::Failed(r) if r.contains("blew up")));

    let fetch_failed = manager.inject("show-menu", &agent, Some(&sink)).await;
    assert!(matches!(&fetch_failed, InjectionOutcome::Failed(r) if r.contains("upstream")));

    // No `[skills.show-wellness.context]` in the agent config.
    let no_config = manager.inject("show-wellness", &agent, Some(&sink)).await;
    assert!(matches!(&no_config, InjectionOutcome::Failed(r) if r.contains("show-wellness")));

    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn slow_fetches_time_out() {
    let manager = ContextInjectionManager::new();
    manager.register_catalog("show-menu", Arc::new(SlowSource));

    let outcome = manager.inject("show-menu", &agent(), None).await;
    match outcome {
        InjectionOutcome::Failed(reason) => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn panicking_sink_is_contained() {
    let manager = ContextInjectionManager::new();
    manager.register_catalog(
        "show-menu",
        Arc::new(StaticSource::new(json!({"mains": [{"name": "Steak", "price": 1}]}))),
    );
    let sink = |payload: ContextPayload| {
        if payload.turn_complete {
            panic!("sink exploded");
        }
    };

    let outcome = manager.inject("show-menu", &agent(), Some(&sink)).await;
    assert!(outcome.is_failed());
}

#[tokio::test]
async fn injection_failures_do_not_affect_skill_results() {
    let todos = Arc::new(TodoStore::new());
    let calendar = Arc::new(CalendarStore::new());
    let loader = FunctionLoader::builtin(SkillServices {
        todos: todos.clone(),
        calendar: calendar.clone(),
        ..SkillServices::default()
    });

    let healthy = ContextInjectionManager::new();
    healthy.register_store_formatters(todos.clone(), calendar.clone());
    let broken = ContextInjectionManager::new();
    broken.register("add-todo", ContextProvider::new(Arc::new(Exploding)));

    let skill = loader.resolve(SkillId::AddTodo).unwrap();
    let args = json!({"title": "Buy milk"});
    let agent = agent();

    for (manager, expect_failure) in [(&healthy, false), (&broken, true)] {
        let skill_ctx = SkillContext::new();
        let (response, outcome) = tokio::join!(
            skill.invoke(Some(args.clone()), &skill_ctx),
            manager.inject("add-todo", &agent, None),
        );
        assert!(response.success, "{response:?}");
        assert_eq!(response.data.unwrap()["todo"]["title"], "Buy milk");
        assert_eq!(outcome.is_failed(), expect_failure, "{outcome:?}");
    }
    assert_eq!(todos.len().await, 2);
}

#[tokio::test]
async fn store_formatters_reflect_skill_mutations() {
    let todos = Arc::new(TodoStore::new());
    let calendar = Arc::new(CalendarStore::new());
    let loader = FunctionLoader::builtin(SkillServices {
        todos: todos.clone(),
        calendar: calendar.clone(),
        ..SkillServices::default()
    });
    let manager = ContextInjectionManager::new();
    manager.register_store_formatters(todos, calendar);
    let agent = AgentConfig::default();
    let (seen, sink) = recorder();

    let empty = manager.inject("list-calendar-entries", &agent, Some(&sink)).await;
    assert_eq!(empty, InjectionOutcome::Skipped(SkipReason::EmptyContext));

    loader
        .resolve(SkillId::AddCalendarEntry)
        .unwrap()
        .invoke(
            Some(json!({"date": "2025-07-01", "time": "10:00", "title": "Massage"})),
            &SkillContext::new(),
        )
        .await;

    let outcome = manager.inject("add-calendar-entry", &agent, Some(&sink)).await;
    assert!(outcome.is_injected());
    assert!(seen.lock().unwrap()[0].turns.contains("2025-07-01 10:00: Massage"));
}
