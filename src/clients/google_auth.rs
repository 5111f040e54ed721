use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use inquire::Text;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::error::BotError;

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// The "installed application" shape of a downloaded credentials.json.
#[derive(Debug, Clone, Deserialize)]
struct InstalledCredentials {
    installed: ClientSecrets,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientSecrets {
    client_id: String,
    client_secret: String,
    token_uri: String,
}

/// What survives on disk between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// A token without an expiry is treated as long-lived; anything within
/// a minute of its expiry counts as expired.
fn needs_refresh(token: &StoredToken, now: DateTime<Utc>) -> bool {
    match token.expires_at {
        Some(expires_at) => now + Duration::seconds(60) >= expires_at,
        None => false,
    }
}

/// Reads credentials.json and token.json, and keeps the access token
/// fresh. Token values never go through the logger.
pub struct TokenStore {
    credentials_file: PathBuf,
    token_file: PathBuf,
}

impl TokenStore {
    pub fn new(credentials_file: impl Into<PathBuf>, token_file: impl Into<PathBuf>) -> Self {
        Self {
            credentials_file: credentials_file.into(),
            token_file: token_file.into(),
        }
    }

    /// Returns an access token good for at least the next minute,
    /// refreshing and rewriting token.json if needed.
    pub async fn valid_access_token(&self, http: &Client) -> Result<String, BotError> {
        let token = self.load_token().await?;
        if !needs_refresh(&token, Utc::now()) {
            return Ok(token.access_token);
        }

        let refresh_token = token.refresh_token.ok_or(BotError::NotAuthenticated {
            path: self.token_file.display().to_string(),
        })?;
        let secrets = self.load_credentials().await?;

        debug!("access token expired, refreshing");
        let response = http
            .post(&secrets.token_uri)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BotError::OAuth { status, body });
        }
        let parsed: TokenResponse = serde_json::from_str(&body)?;

        let refreshed = StoredToken {
            access_token: parsed.access_token,
            // Google usually omits the refresh token here; keep the old one.
            refresh_token: parsed.refresh_token.or(Some(refresh_token)),
            expires_at: parsed.expires_in.map(|s| Utc::now() + Duration::seconds(s)),
        };
        self.store_token(&refreshed).await?;
        info!("Google access token refreshed");
        Ok(refreshed.access_token)
    }

    /// First-time consent flow: print the URL, let the operator paste
    /// the code back, exchange it and write token.json.
    pub async fn authorize_interactive(&self, http: &Client) -> Result<(), BotError> {
        let secrets = self.load_credentials().await?;
        let consent_url = format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline",
            urlencoding::encode(&secrets.client_id),
            urlencoding::encode(OOB_REDIRECT),
            urlencoding::encode(CALENDAR_SCOPE),
        );
        println!(
            "Open this URL in a browser and approve read access to the calendar:\n\n{consent_url}\n"
        );
        let code = Text::new("Paste the authorization code.").prompt()?;

        let response = http
            .post(&secrets.token_uri)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("code", code.trim()),
                ("redirect_uri", OOB_REDIRECT),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BotError::OAuth { status, body });
        }
        let parsed: TokenResponse = serde_json::from_str(&body)?;

        let token = StoredToken {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            expires_at: parsed.expires_in.map(|s| Utc::now() + Duration::seconds(s)),
        };
        self.store_token(&token).await?;
        info!(path = %self.token_file.display(), "stored Google token");
        Ok(())
    }

    async fn load_credentials(&self) -> Result<ClientSecrets, BotError> {
        let content = fs::read_to_string(&self.credentials_file)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => BotError::MissingConfig(format!(
                    "GOOGLE_CREDENTIALS_FILE ({} not found)",
                    self.credentials_file.display()
                )),
                _ => BotError::Io(err),
            })?;
        let credentials: InstalledCredentials = serde_json::from_str(&content)?;
        Ok(credentials.installed)
    }

    async fn load_token(&self) -> Result<StoredToken, BotError> {
        let content = fs::read_to_string(&self.token_file)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => BotError::NotAuthenticated {
                    path: self.token_file.display().to_string(),
                },
                _ => BotError::Io(err),
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn store_token(&self, token: &StoredToken) -> Result<(), BotError> {
        let content = serde_json::to_string_pretty(token)?;
        fs::write(&self.token_file, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn fresh_token_is_not_refreshed() {
        let now = Utc::now();
        let token = StoredToken {
            access_token: "abc".to_string(),
            refresh_token: None,
            expires_at: Some(now + Duration::hours(1)),
        };
        assert!(!needs_refresh(&token, now));
    }

    #[test]
    fn token_near_expiry_is_refreshed() {
        let now = Utc::now();
        let token = StoredToken {
            access_token: "abc".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(now + Duration::seconds(30)),
        };
        assert!(needs_refresh(&token, now));
    }

    #[test]
    fn token_without_expiry_is_long_lived() {
        let token = StoredToken {
            access_token: "abc".to_string(),
            refresh_token: None,
            expires_at: None,
        };
        assert!(!needs_refresh(&token, Utc::now()));
    }

    #[tokio::test]
    async fn token_file_round_trips() {
        let dir = env::temp_dir();
        let path = dir.join(format!("tweetomatic_token_{}.json", std::process::id()));
        let store = TokenStore::new(dir.join("credentials.json"), &path);

        let token = StoredToken {
            access_token: "abc".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: None,
        };
        store.store_token(&token).await.expect("token should store");

        let loaded = store.load_token().await.expect("token should load");
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(loaded.access_token, "abc");
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh"));
        assert!(loaded.expires_at.is_none());
    }

    #[tokio::test]
    async fn missing_token_file_asks_for_auth() {
        let store = TokenStore::new("credentials.json", "/nonexistent/token.json");
        let err = store.load_token().await.unwrap_err();
        assert!(matches!(err, BotError::NotAuthenticated { .. }));
    }
}
