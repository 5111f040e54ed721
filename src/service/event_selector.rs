use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::BotError;
use crate::models::event::{EventTime, NormalizedEvent, RawEvent};

/// The calendar API hands timestamps back in exactly this shape.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Picks the next event out of the provider-ordered list and normalizes
/// its fields. The provider sorts by start time, so only the first entry
/// matters.
pub fn select_event(events: &[RawEvent]) -> Result<NormalizedEvent, BotError> {
    let event = events.first().ok_or(BotError::NoEventsFound)?;
    let start = parse_event_time(&event.start)?;
    let end = parse_event_time(&event.end)?;
    Ok(NormalizedEvent {
        title: event.summary.clone(),
        start,
        end,
        target_date: start.date(),
    })
}

/// Timed events carry a full timestamp, all-day events a bare date that
/// normalizes to midnight.
fn parse_event_time(time: &EventTime) -> Result<NaiveDateTime, BotError> {
    match (&time.date_time, &time.date) {
        (Some(value), _) => NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(
            |source| BotError::InvalidTimestamp {
                value: value.clone(),
                detail: source.to_string(),
            },
        ),
        (None, Some(value)) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|source| BotError::InvalidTimestamp {
                value: value.clone(),
                detail: source.to_string(),
            }),
        (None, None) => Err(BotError::InvalidTimestamp {
            value: String::new(),
            detail: "event has neither a dateTime nor a date".to_string(),
        }),
    }
}
