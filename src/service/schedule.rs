use chrono::NaiveDate;

use crate::error::BotError;
use crate::models::event::{DayOffset, NormalizedEvent};

/// Whole-day distance from `today` to the event, as `today - target`.
/// An event five days ahead yields -5; an event today yields 0. `today`
/// is a parameter so callers (and tests) control the clock.
pub fn days_until(
    event: Option<&NormalizedEvent>,
    today: NaiveDate,
) -> Result<DayOffset, BotError> {
    let event = event.ok_or(BotError::NoDataFound)?;
    Ok((today - event.target_date).num_days())
}
