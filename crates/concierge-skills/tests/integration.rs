//! Integration tests for the concierge-skills crate.
//!
//! Skills are resolved through the [`FunctionLoader`] and invoked the way
//! an orchestrator would, against shared store handles.

use std::sync::Arc;

use concierge_skills::{
    FunctionLoader, RegistryError, SkillContext, SkillId, SkillServices, UiModule,
};
use concierge_store::{CalendarStore, TodoStore};
use serde_json::{Value, json};

fn services() -> (SkillServices, Arc<TodoStore>, Arc<CalendarStore>) {
    let todos = Arc::new(TodoStore::new());
    let calendar = Arc::new(CalendarStore::new());
    let services = SkillServices {
        todos: todos.clone(),
        calendar: calendar.clone(),
        ..SkillServices::default()
    };
    (services, todos, calendar)
}

// ═══════════════════════════════════════════════════════════════════════
//  Envelope totality
// ═══════════════════════════════════════════════════════════════════════

/// Argument sets no skill accepts.
fn non_objects() -> Vec<Value> {
    vec![json!("not an object"), json!([1, 2, 3]), json!(42), json!(true)]
}

/// Object arguments that are malformed for the given skill.
fn malformed_for(id: SkillId) -> Vec<Value> {
    match id {
        SkillId::ListTodos => vec![
            json!({"filter": 3}),
            json!({"filter": "   "}),
            json!({"filter": "sometimes"}),
        ],
        SkillId::AddTodo => vec![json!({}), json!({"title": 3}), json!({"title": "   "})],
        SkillId::ToggleTodo | SkillId::DeleteTodo | SkillId::DeleteCalendarEntry => {
            vec![json!({}), json!({"id": 7}), json!({"id": "  "})]
        }
        SkillId::UpdateTodo => vec![
            json!({"id": "x"}),
            json!({"id": "x", "title": "   "}),
            json!({"id": "x", "completed": "yes"}),
            json!({"id": 1, "title": "a"}),
        ],
        SkillId::ListCalendarEntries => vec![
            json!({"date": "tomorrow"}),
            json!({"date": 20250101}),
            json!({"date": "  "}),
        ],
        SkillId::AddCalendarEntry => vec![
            json!({"title": "x"}),
            json!({"date": "2025-01-01", "title": "  "}),
            json!({"date": "01/01/2025", "title": "x"}),
            json!({"date": "2025-01-01", "title": "x", "time": "25:99"}),
            json!({"date": "2025-01-01", "title": "x", "duration": -3}),
        ],
        SkillId::UpdateCalendarEntry => vec![
            json!({"id": "x"}),
            json!({"id": "x", "time": "noon"}),
            json!({"id": "x", "duration": "ten"}),
            json!({"id": "  ", "title": "y"}),
        ],
        SkillId::ShowMenu | SkillId::ShowWellness => vec![
            json!({"category": 9}),
            json!({"category": "  "}),
            json!({"category": "nonexistent"}),
        ],
    }
}

#[tokio::test]
async fn every_handler_returns_a_failure_envelope_for_malformed_input() {
    let (services, todos, calendar) = services();
    let loader = FunctionLoader::builtin(services);
    let ctx = SkillContext::new()
        .with_raw_data("menu", json!({"mains": []}))
        .with_raw_data("wellness", json!({"spa": []}));

    for id in SkillId::ALL {
        let skill = loader.resolve(id).unwrap();
        for args in non_objects().into_iter().chain(malformed_for(id)) {
            let response = skill.invoke(Some(args.clone()), &ctx).await;
            assert!(
                response.is_failure(),
                "{id} accepted malformed args {args}: {response:?}"
            );
            let error = response.error.unwrap_or_default();
            assert!(!error.trim().is_empty(), "{id} returned a blank error");
        }
    }

    assert!(todos.is_empty().await);
    assert!(calendar.is_empty().await);
}

#[tokio::test]
async fn required_args_missing_fail_without_side_effects() {
    let (services, todos, calendar) = services();
    let loader = FunctionLoader::builtin(services);
    let ctx = SkillContext::new();

    for id in [
        "add-todo",
        "toggle-todo",
        "update-todo",
        "delete-todo",
        "add-calendar-entry",
        "update-calendar-entry",
        "delete-calendar-entry",
    ] {
        let skill = loader.load_function(id).unwrap();
        for args in [None, Some(json!({}))] {
            let response = skill.invoke(args, &ctx).await;
            assert!(response.is_failure(), "{id} succeeded without args");
        }
    }

    assert!(todos.is_empty().await);
    assert!(calendar.is_empty().await);
}

// ═══════════════════════════════════════════════════════════════════════
//  Registry wiring
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn show_menu_without_schema_fails_naming_skill_and_export() {
    let mut loader = FunctionLoader::builtin(SkillServices::default());
    let module = loader.remove_module(SkillId::ShowMenu).unwrap();
    loader.insert_module(SkillId::ShowMenu, module.without_schema());

    let err = loader.load_function("show-menu").unwrap_err();
    assert!(matches!(err, RegistryError::MissingExport { export: "schema", .. }));
    let message = err.to_string();
    assert!(message.contains("show-menu"), "{message}");
    assert!(message.contains("schema"), "{message}");
}

#[test]
fn unknown_and_unwired_skills_fail_loudly() {
    let mut loader = FunctionLoader::builtin(SkillServices::default());
    assert!(matches!(
        loader.load_function("order-taxi"),
        Err(RegistryError::UnknownSkill(id)) if id == "order-taxi"
    ));

    loader.remove_module(SkillId::ShowWellness);
    let err = loader.load_function("show-wellness").unwrap_err();
    assert!(err.to_string().contains("show-wellness"));
}

#[tokio::test]
async fn ui_override_table_is_explicit() {
    let loader = FunctionLoader::builtin(SkillServices::default())
        .with_ui_override(SkillId::ListCalendarEntries, "calendar-view")
        .without_ui_override(SkillId::DeleteCalendarEntry);

    let view = |m: UiModule| m.default.map(|v| v.name).unwrap_or_default();

    let list = loader.resolve(SkillId::ListCalendarEntries).unwrap();
    assert_eq!(view((list.ui_component)().await), "calendar-view");

    let add = loader.resolve(SkillId::AddCalendarEntry).unwrap();
    assert_eq!(view((add.ui_component)().await), "calendar-view");

    let delete = loader.resolve(SkillId::DeleteCalendarEntry).unwrap();
    assert_eq!(view((delete.ui_component)().await), "delete-calendar-entry");
}

// ═══════════════════════════════════════════════════════════════════════
//  End-to-end flows
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn todo_flow_through_the_loader() {
    let (services, todos, _) = services();
    let loader = FunctionLoader::builtin(services);
    let ctx = SkillContext::new().with_user("guest-12");

    let added = loader
        .load_function("add-todo")
        .unwrap()
        .invoke_checked(Some(json!({"title": "Buy milk"})), &ctx)
        .await;
    assert!(added.success);
    let id = added.data.unwrap()["todo"]["id"].as_str().unwrap().to_owned();

    let toggled = loader
        .load_function("toggle-todo")
        .unwrap()
        .invoke_checked(Some(json!({"id": id})), &ctx)
        .await;
    assert_eq!(toggled.data.unwrap()["todo"]["completed"], true);
    assert!(todos.list().await[0].completed);

    let deleted = loader
        .load_function("delete-todo")
        .unwrap()
        .invoke_checked(Some(json!({"id": id})), &ctx)
        .await;
    assert_eq!(deleted.data.unwrap()["deleted"], true);
    assert!(todos.is_empty().await);
}

#[tokio::test]
async fn calendar_flow_through_the_loader() {
    let (services, _, calendar) = services();
    let loader = FunctionLoader::builtin(services);
    let ctx = SkillContext::new();

    let add = loader.resolve(SkillId::AddCalendarEntry).unwrap();
    for (date, time, title) in [
        ("2025-06-02", "18:00", "Dinner"),
        ("2025-06-01", "07:30", "Yoga"),
        ("2025-06-02", "09:00", "Spa"),
    ] {
        let r = add
            .invoke_checked(Some(json!({"date": date, "time": time, "title": title})), &ctx)
            .await;
        assert!(r.success, "{:?}", r.error);
    }
    assert_eq!(calendar.len().await, 3);

    let listed = loader
        .resolve(SkillId::ListCalendarEntries)
        .unwrap()
        .invoke_checked(None, &ctx)
        .await
        .data
        .unwrap();
    let titles: Vec<&str> = listed["days"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|d| d["entries"].as_array().unwrap())
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Yoga", "Spa", "Dinner"]);
}

#[tokio::test]
async fn emitted_times_are_accepted_as_arguments() {
    let (services, _, calendar) = services();
    let loader = FunctionLoader::builtin(services);
    let ctx = SkillContext::new();

    let added = loader
        .load_function("add-calendar-entry")
        .unwrap()
        .invoke_checked(
            Some(json!({"date": "2025-06-01", "time": "09:30", "title": "Massage"})),
            &ctx,
        )
        .await;
    let entry = added.data.unwrap()["entry"].clone();
    assert_eq!(entry["time"], "09:30");

    // Feed the entry straight back, the way a model copies fields it was shown.
    let updated = loader
        .load_function("update-calendar-entry")
        .unwrap()
        .invoke_checked(
            Some(json!({"id": entry["id"], "time": entry["time"], "title": "Hot stone massage"})),
            &ctx,
        )
        .await;
    assert!(updated.success, "{:?}", updated.error);
    assert_eq!(updated.data.unwrap()["entry"]["time"], "09:30");

    let listed = loader
        .load_function("list-calendar-entries")
        .unwrap()
        .invoke_checked(Some(json!({"date": "2025-06-01"})), &ctx)
        .await
        .data
        .unwrap();
    assert_eq!(listed["days"][0]["entries"][0]["time"], "09:30");
    assert_eq!(calendar.len().await, 1);
}

#[tokio::test]
async fn catalog_messages_come_from_settings() {
    let mut services = SkillServices::default();
    services.catalog.menu_not_found = Some("The kitchen is closed right now.".into());
    let loader = FunctionLoader::builtin(services);

    let menu = loader.resolve(SkillId::ShowMenu).unwrap();
    let r = menu.invoke_checked(None, &SkillContext::new()).await;
    assert_eq!(r.error.as_deref(), Some("The kitchen is closed right now."));

    let ctx = SkillContext::new().with_raw_data(
        "wellness",
        json!({"massages": [{"name": "Hot stone", "price": 90, "duration": 60}]}),
    );
    let r = loader
        .resolve(SkillId::ShowWellness)
        .unwrap()
        .invoke_checked(None, &ctx)
        .await;
    assert_eq!(r.data.unwrap()["categories"]["massages"][0]["duration"], 60);
}

#[tokio::test]
async fn concurrent_invocations_share_one_store() {
    let (services, todos, _) = services();
    let loader = Arc::new(FunctionLoader::builtin(services));

    let mut handles = Vec::new();
    for i in 0..32 {
        let loader = loader.clone();
        handles.push(tokio::spawn(async move {
            let skill = loader.resolve(SkillId::AddTodo).unwrap();
            skill
                .invoke(Some(json!({"title": format!("task {i}")})), &SkillContext::new())
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().success);
    }
    assert_eq!(todos.len().await, 32);
}
