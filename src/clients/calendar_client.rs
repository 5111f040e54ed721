use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::clients::google_auth::TokenStore;
use crate::error::BotError;
use crate::models::event::RawEvent;
use crate::service::tweet_flow::CalendarSource;

const EVENTS_URL_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
}

/// Google Calendar v3 REST client. Asks only for the single next event;
/// the API returns entries sorted by start time.
pub struct GoogleCalendarClient {
    http: Client,
    tokens: TokenStore,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(tokens: TokenStore, calendar_id: String) -> Self {
        Self {
            http: Client::new(),
            tokens,
            calendar_id,
        }
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarClient {
    async fn next_events(&self) -> Result<Vec<RawEvent>, BotError> {
        let access_token = self.tokens.valid_access_token(&self.http).await?;

        let url = format!(
            "{EVENTS_URL_BASE}/{}/events",
            urlencoding::encode(&self.calendar_id)
        );
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        debug!(calendar = %self.calendar_id, %now, "fetching next event");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&access_token)
            .query(&[
                ("timeMin", now.as_str()),
                ("maxResults", "1"),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BotError::CalendarApi { status, body });
        }
        let parsed: EventsResponse = serde_json::from_str(&body)?;
        Ok(parsed.items)
    }
}
