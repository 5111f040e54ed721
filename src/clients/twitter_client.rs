use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::error::BotError;
use crate::service::tweet_flow::TweetPublisher;

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

/// Posts to the authenticated account's timeline.
pub struct TwitterClient {
    http: Client,
    access_token: String,
}

impl TwitterClient {
    pub fn new(access_token: String) -> Self {
        Self {
            http: Client::new(),
            access_token,
        }
    }
}

#[async_trait]
impl TweetPublisher for TwitterClient {
    async fn publish(&self, text: &str) -> Result<(), BotError> {
        let response = self
            .http
            .post(TWEETS_URL)
            .bearer_auth(&self.access_token)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(BotError::TwitterApi { status, body });
        }
        info!("tweet published");
        Ok(())
    }
}

/// Stands in for the real publisher on dry runs.
pub struct DryRunPublisher;

#[async_trait]
impl TweetPublisher for DryRunPublisher {
    async fn publish(&self, text: &str) -> Result<(), BotError> {
        println!("[dry-run] would tweet:\n{text}");
        Ok(())
    }
}
