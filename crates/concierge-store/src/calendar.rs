//! Calendar entry records.
//!
//! Entries carry a calendar date, an optional start time and an optional
//! duration.  Text input from skill arguments is parsed with
//! [`parse_date`] / [`parse_time`] before it reaches the store.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::memory::{MemoryStore, Record, non_empty};

/// Date format accepted and emitted for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format accepted and emitted for entry start times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Writes entry times as `HH:MM`, the same shape [`parse_time`] accepts.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TIME_FORMAT, parse_time};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.collect_str(&t.format(TIME_FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse_time(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// A single calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "clock_time")]
    pub time: Option<NaiveTime>,
    /// Duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEntry {
    /// Sort key: date, then entries without a time first, then by time.
    pub fn sort_key(&self) -> (NaiveDate, Option<NaiveTime>) {
        (self.date, self.time)
    }
}

/// Fields for a new calendar entry.
#[derive(Debug, Clone)]
pub struct NewCalendarEntry {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub duration: Option<u32>,
    pub title: String,
    pub description: Option<String>,
}

/// Fields to change on an existing entry.
///
/// For `time`, `duration` and `description` the outer `Option` says whether
/// the field is being changed, the inner one whether it is being cleared.
#[derive(Debug, Clone, Default)]
pub struct CalendarEntryPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<Option<NaiveTime>>,
    pub duration: Option<Option<u32>>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

impl CalendarEntryPatch {
    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.duration.is_none()
            && self.title.is_none()
            && self.description.is_none()
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
}

fn check_duration(duration: Option<u32>) -> StoreResult<Option<u32>> {
    match duration {
        Some(0) => Err(StoreError::InvalidArgument(
            "`duration` must be greater than zero".into(),
        )),
        other => Ok(other),
    }
}

impl Record for CalendarEntry {
    type Draft = NewCalendarEntry;
    type Patch = CalendarEntryPatch;
    const ENTITY: &'static str = "calendar entry";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewCalendarEntry) -> StoreResult<Self> {
        Ok(Self {
            id,
            date: draft.date,
            time: draft.time,
            duration: check_duration(draft.duration)?,
            title: non_empty("title", &draft.title)?,
            description: normalize_description(draft.description),
        })
    }

    fn patched(&self, patch: CalendarEntryPatch) -> StoreResult<Self> {
        let title = match patch.title {
            Some(title) => non_empty("title", &title)?,
            None => self.title.clone(),
        };
        let duration = match patch.duration {
            Some(duration) => check_duration(duration)?,
            None => self.duration,
        };
        Ok(Self {
            id: self.id.clone(),
            date: patch.date.unwrap_or(self.date),
            time: patch.time.unwrap_or(self.time),
            duration,
            title,
            description: match patch.description {
                Some(description) => normalize_description(description),
                None => self.description.clone(),
            },
        })
    }
}

/// The calendar store.
pub type CalendarStore = MemoryStore<CalendarEntry>;

impl MemoryStore<CalendarEntry> {
    /// Entries on `date`, ordered by start time.
    pub async fn entries_on(&self, date: NaiveDate) -> Vec<CalendarEntry> {
        let mut entries: Vec<_> = self
            .list()
            .await
            .into_iter()
            .filter(|e| e.date == date)
            .collect();
        entries.sort_by_key(CalendarEntry::sort_key);
        entries
    }

    /// All entries ordered chronologically.
    ///
    /// The sort is stable, so entries at the same moment keep insertion
    /// order.
    pub async fn chronological(&self) -> Vec<CalendarEntry> {
        let mut entries = self.list().await;
        entries.sort_by_key(CalendarEntry::sort_key);
        entries
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        StoreError::InvalidArgument(format!(
            "invalid date `{value}`, expected YYYY-MM-DD"
        ))
    })
}

/// Parse an `HH:MM` time.  `HH:MM:SS` is accepted too; seconds are dropped.
pub fn parse_time(value: &str) -> StoreResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| {
            NaiveTime::parse_from_str(trimmed, "%H:%M:%S").map(|t| t.with_second(0).unwrap_or(t))
        })
        .map_err(|_| {
            StoreError::InvalidArgument(format!("invalid time `{value}`, expected HH:MM"))
        })
}
