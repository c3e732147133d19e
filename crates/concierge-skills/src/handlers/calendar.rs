//! Calendar skills: `list-calendar-entries`, `add-calendar-entry`,
//! `update-calendar-entry`, `delete-calendar-entry`.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_store::{
    CalendarEntry, CalendarEntryPatch, CalendarStore, DATE_FORMAT, NewCalendarEntry, parse_date,
    parse_time,
};
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

const ENTITY: &str = "calendar entry";

fn date_arg() -> ArgSpec {
    ArgSpec::string("Date as YYYY-MM-DD")
}

fn time_arg() -> ArgSpec {
    ArgSpec::string("Start time as HH:MM").optional()
}

fn duration_arg() -> ArgSpec {
    ArgSpec::integer("Duration in minutes").optional()
}

fn description_arg() -> ArgSpec {
    ArgSpec::string("Free-form notes").optional()
}

/// Group already-sorted entries into `[{ date, entries }]` days.
fn group_by_day(entries: &[CalendarEntry]) -> Vec<Value> {
    let mut days: Vec<Value> = Vec::new();
    let mut start = 0;
    for i in 1..=entries.len() {
        if i == entries.len() || entries[i].date != entries[start].date {
            days.push(json!({
                "date": entries[start].date.format(DATE_FORMAT).to_string(),
                "entries": &entries[start..i],
            }));
            start = i;
        }
    }
    days
}

// ---------------------------------------------------------------------------
// list-calendar-entries
// ---------------------------------------------------------------------------

/// Read-only, chronologically ordered view of the calendar.
pub struct ListCalendarEntries {
    store: Arc<CalendarStore>,
}

impl ListCalendarEntries {
    pub fn new(store: Arc<CalendarStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg(
            "date",
            ArgSpec::string("Only list entries on this date (YYYY-MM-DD)").optional(),
        )
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let entries = match args.optional_str("date")? {
            Some(date) => self.store.entries_on(parse_date(&date)?).await,
            None => self.store.chronological().await,
        };

        Ok(json!({
            "count": entries.len(),
            "days": group_by_day(&entries),
        }))
    }
}

#[async_trait]
impl SkillHandler for ListCalendarEntries {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// add-calendar-entry
// ---------------------------------------------------------------------------

pub struct AddCalendarEntry {
    store: Arc<CalendarStore>,
}

impl AddCalendarEntry {
    pub fn new(store: Arc<CalendarStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new()
            .arg("date", date_arg())
            .arg("title", ArgSpec::string("What is happening"))
            .arg("time", time_arg())
            .arg("duration", duration_arg())
            .arg("description", description_arg())
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let draft = NewCalendarEntry {
            date: parse_date(&args.required_str("date")?)?,
            title: args.required_str("title")?,
            time: args.optional_str("time")?.as_deref().map(parse_time).transpose()?,
            duration: args.optional_u32("duration")?,
            description: args.optional_str("description")?,
        };

        let entry = self.store.create(draft).await?;
        debug!(entry_id = %entry.id, date = %entry.date, "calendar entry added");
        Ok(json!({ "entry": entry }))
    }
}

#[async_trait]
impl SkillHandler for AddCalendarEntry {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// update-calendar-entry
// ---------------------------------------------------------------------------

/// Replace fields of an entry.  `time`, `duration` and `description` may be
/// cleared by passing `null`.
pub struct UpdateCalendarEntry {
    store: Arc<CalendarStore>,
}

impl UpdateCalendarEntry {
    pub fn new(store: Arc<CalendarStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new()
            .arg("id", ArgSpec::string("Id of the calendar entry"))
            .arg("date", date_arg().optional())
            .arg("title", ArgSpec::string("New title").optional())
            .arg("time", time_arg())
            .arg("duration", duration_arg())
            .arg("description", description_arg())
    }

    fn patch(args: &Args) -> Result<CalendarEntryPatch> {
        let time = match args.nullable_str("time")? {
            Some(Some(t)) => Some(Some(parse_time(&t)?)),
            Some(None) => Some(None),
            None => None,
        };
        Ok(CalendarEntryPatch {
            date: args.optional_str("date")?.as_deref().map(parse_date).transpose()?,
            time,
            duration: args.nullable_u32("duration")?,
            title: args.optional_str("title")?,
            description: args.nullable_str("description")?,
        })
    }

    async fn execute(&self, args: Option<Value>) -> Result<Value> {
        let args = Args::from_value(args)?;
        let id = args.required_str("id")?;
        let patch = Self::patch(&args)?;
        if patch.is_empty() {
            return Err(HandlerError::InvalidArgs(
                "Nothing to update: provide at least one of date, title, time, duration, description"
                    .into(),
            ));
        }

        Ok(match self.store.update(&id, patch).await? {
            Some(entry) => json!({ "found": true, "entry": entry }),
            None => not_found(ENTITY, &id),
        })
    }
}

#[async_trait]
impl SkillHandler for UpdateCalendarEntry {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

// ---------------------------------------------------------------------------
// delete-calendar-entry
// ---------------------------------------------------------------------------

pub struct DeleteCalendarEntry {
    store: Arc<CalendarStore>,
}

impl DeleteCalendarEntry {
    pub fn new(store: Arc<CalendarStore>) -> Self {
        Self { store }
    }

    pub fn schema() -> ArgSchema {
        ArgSchema::new().arg("id", ArgSpec::string("Id of the calendar entry"))
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
impl SkillHandler for DeleteCalendarEntry {
    async fn handle(&self, args: Option<Value>, _ctx: &SkillContext) -> SkillResponse {
        SkillResponse::from_result(self.execute(args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<CalendarStore> {
        Arc::new(CalendarStore::new())
    }

    async fn call(h: &dyn SkillHandler, args: Value) -> SkillResponse {
        h.handle(Some(args), &SkillContext::new()).await
    }

    #[tokio::test]
    async fn add_parses_and_normalizes() {
        let s = store();
        let r = call(
            &AddCalendarEntry::new(s.clone()),
            json!({"date": "2025-03-14", "time": "09:30", "duration": 45,
                   "title": " Standup ", "description": "  "}),
        )
        .await;
        assert!(r.success, "{:?}", r.error);
        let entry = &r.data.unwrap()["entry"];
        assert_eq!(entry["title"], "Standup");
        assert_eq!(entry["date"], "2025-03-14");
        assert_eq!(entry["duration"], 45);
        assert!(entry.get("description").is_none());
    }

    #[tokio::test]
    async fn add_validation_never_touches_store() {
        let s = store();
        let h = AddCalendarEntry::new(s.clone());
        for args in [
            json!({"title": "x"}),
            json!({"date": "14/03/2025", "title": "x"}),
            json!({"date": "2025-03-14", "title": "x", "time": "9am"}),
            json!({"date": "2025-03-14", "title": "x", "duration": 0}),
            json!({"date": "2025-03-14", "title": "x", "duration": "long"}),
        ] {
            let r = call(&h, args).await;
            assert!(r.is_failure());
            assert!(!r.error.unwrap().is_empty());
        }
        assert!(s.is_empty().await);
    }

    #[tokio::test]
    async fn list_groups_by_day() {
        let s = store();
        let h = AddCalendarEntry::new(s.clone());
        call(&h, json!({"date": "2025-03-15", "title": "b"})).await;
        call(&h, json!({"date": "2025-03-14", "time": "14:00", "title": "a2"})).await;
        call(&h, json!({"date": "2025-03-14", "time": "08:00", "title": "a1"})).await;

        let list = ListCalendarEntries::new(s);
        let data = list.handle(None, &SkillContext::new()).await.data.unwrap();
        assert_eq!(data["count"], 3);
        assert_eq!(data["days"][0]["date"], "2025-03-14");
        assert_eq!(data["days"][0]["entries"][0]["title"], "a1");
        assert_eq!(data["days"][1]["entries"][0]["title"], "b");

        let data = call(&list, json!({"date": "2025-03-15"})).await.data.unwrap();
        assert_eq!(data["count"], 1);

        let data = call(&list, json!({"date": "2025-01-01"})).await.data.unwrap();
        assert_eq!(data["days"], json!([]));
    }

    #[tokio::test]
    async fn update_clears_and_sets() {
        let s = store();
        let e = s
            .create(NewCalendarEntry {
                date: parse_date("2025-03-14").unwrap(),
                time: Some(parse_time("10:00").unwrap()),
                duration: Some(30),
                title: "Dentist".into(),
                description: Some("bring card".into()),
            })
            .await
            .unwrap();

        let h = UpdateCalendarEntry::new(s.clone());
        assert!(call(&h, json!({"id": e.id})).await.is_failure());

        let r = call(
            &h,
            json!({"id": e.id, "time": null, "description": null, "date": "2025-03-20"}),
        )
        .await;
        let entry = &r.data.unwrap()["entry"];
        assert!(entry.get("time").is_none());
        assert!(entry.get("description").is_none());
        assert_eq!(entry["date"], "2025-03-20");
        assert_eq!(entry["duration"], 30);

        let r = call(&h, json!({"id": "missing", "title": "x"})).await;
        assert_eq!(r.data.unwrap()["found"], false);
    }

    #[tokio::test]
    async fn bad_update_leaves_entry_unchanged() {
        let s = store();
        let e = s
            .create(NewCalendarEntry {
                date: parse_date("2025-03-14").unwrap(),
                time: None,
                duration: None,
                title: "Gym".into(),
                description: None,
            })
            .await
            .unwrap();

        let before = s.list().await;
        let r = call(
            &UpdateCalendarEntry::new(s.clone()),
            json!({"id": e.id, "title": "Run", "duration": 0}),
        )
        .await;
        assert!(r.is_failure());
        assert_eq!(s.list().await, before);
    }

    #[tokio::test]
    async fn delete_reports_found() {
        let s = store();
        let e = s
            .create(NewCalendarEntry {
                date: parse_date("2025-03-14").unwrap(),
                time: None,
                duration: None,
                title: "x".into(),
                description: None,
            })
            .await
            .unwrap();
        let h = DeleteCalendarEntry::new(s);
        assert_eq!(call(&h, json!({"id": e.id})).await.data.unwrap()["deleted"], true);
        assert_eq!(call(&h, json!({"id": e.id})).await.data.unwrap()["found"], false);
    }
}
