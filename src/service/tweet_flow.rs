use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::error::BotError;
use crate::models::event::{DayOffset, RawEvent};
use crate::service::event_selector::select_event;
use crate::service::schedule::days_until;
use crate::service::tweet_composer::compose;

/// Where the next event comes from.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn next_events(&self) -> Result<Vec<RawEvent>, BotError>;
}

/// Where the rendered reminder goes.
#[async_trait]
pub trait TweetPublisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<(), BotError>;
}

/// Why a run ended without a tweet. All of these are normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoUpcomingEvents,
    NoEventData,
    NotInWindow(DayOffset),
}

/// What one bot run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Sent(String),
    Skipped(SkipReason),
}

/// One full pass: fetch, select, compute the day offset, compose,
/// publish. The "nothing to do today" conditions come back as
/// `Skipped`; real failures as `Err`.
pub async fn run_once<C: CalendarSource + ?Sized, P: TweetPublisher + ?Sized>(
    calendar: &C,
    publisher: &P,
    today: NaiveDate,
) -> Result<RunOutcome, BotError> {
    let events = calendar.next_events().await?;

    let event = match select_event(&events) {
        Ok(event) => event,
        Err(BotError::NoEventsFound) => {
            return Ok(RunOutcome::Skipped(SkipReason::NoUpcomingEvents));
        }
        Err(err) => return Err(err),
    };

    let offset = match days_until(Some(&event), today) {
        Ok(offset) => offset,
        Err(BotError::NoDataFound) => {
            return Ok(RunOutcome::Skipped(SkipReason::NoEventData));
        }
        Err(err) => return Err(err),
    };
    info!(title = %event.title, target_date = %event.target_date, offset, "next event");

    let tweet = match compose(&event, offset) {
        Ok(tweet) => tweet,
        Err(BotError::EventNotInRange { offset }) => {
            return Ok(RunOutcome::Skipped(SkipReason::NotInWindow(offset)));
        }
        Err(err) => return Err(err),
    };

    publisher.publish(&tweet).await?;
    Ok(RunOutcome::Sent(tweet))
}
