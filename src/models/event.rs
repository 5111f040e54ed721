use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Signed whole-day distance between "today" and an event's date.
/// Zero means the event is today; negative means it is still ahead.
pub type DayOffset = i64;

/// One event as the calendar API returns it. Discarded after
/// normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// The API sends a full timestamp for timed events and a bare date for
/// all-day events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub date: Option<String>,
}

/// Validated event record used by the composer. Built once by the
/// selector, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub target_date: NaiveDate,
}
