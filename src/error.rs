use thiserror::Error;

use crate::models::event::DayOffset;

/// Everything a single bot run can fail with. The first three variants
/// are expected steady-state outcomes (a quiet calendar, a day with no
/// reminder scheduled) and get mapped to a skip by the run flow; the
/// rest are real failures.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("no upcoming events found")]
    NoEventsFound,

    #[error("no event data to compose from")]
    NoDataFound,

    #[error("event is {offset} day(s) out, no reminder rule matches")]
    EventNotInRange { offset: DayOffset },

    #[error("rendered tweet is {length} characters, limit is {limit}")]
    TweetTooLong { length: usize, limit: usize },

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("no stored Google token at {path}, run the auth command first")]
    NotAuthenticated { path: String },

    #[error("could not parse event time {value:?}: {detail}")]
    InvalidTimestamp { value: String, detail: String },

    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),

    #[error("calendar API returned {status}: {body}")]
    CalendarApi {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("twitter API returned {status}: {body}")]
    TwitterApi {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("OAuth token endpoint returned {status}: {body}")]
    OAuth {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not read authorization code: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type BotResult<T> = std::result::Result<T, BotError>;
