use std::collections::HashMap;
use std::env;
use std::fs;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::BotError;

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Flat KEY=VALUE settings file, same shape as an env file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Config file first, process environment second.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

/// Typed view over the settings, built once at startup and passed into
/// whatever needs a credential. Validation happens here, before any
/// network call.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub twitter_access_token: Option<String>,
    pub credentials_file: String,
    pub token_file: String,
    pub calendar_id: String,
    pub timezone: Tz,
}

impl BotConfig {
    /// `require_publisher` is false for dry runs and read-only commands,
    /// which never touch the Twitter API.
    pub fn load(config: &AppConfig, require_publisher: bool) -> Result<Self, BotError> {
        let twitter_access_token = config.lookup("TWITTER_ACCESS_TOKEN");
        if require_publisher && twitter_access_token.is_none() {
            return Err(BotError::MissingConfig("TWITTER_ACCESS_TOKEN".to_string()));
        }

        let tz_name = config
            .lookup("BOT_TIMEZONE")
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| BotError::InvalidTimezone(tz_name))?;

        Ok(Self {
            twitter_access_token,
            credentials_file: config
                .lookup("GOOGLE_CREDENTIALS_FILE")
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
            token_file: config
                .lookup("GOOGLE_TOKEN_FILE")
                .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string()),
            calendar_id: config
                .lookup("CALENDAR_ID")
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            timezone,
        })
    }

    /// The calendar date the reminder schedule keys on, in the
    /// operator's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(pairs: &[(&str, &str)]) -> AppConfig {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig { values }
    }

    #[test]
    fn load_fills_in_defaults() {
        let config = config_with(&[("TWITTER_ACCESS_TOKEN", "secret")]);
        let bot = BotConfig::load(&config, true).expect("config should load");
        assert_eq!(bot.credentials_file, DEFAULT_CREDENTIALS_FILE);
        assert_eq!(bot.token_file, DEFAULT_TOKEN_FILE);
        assert_eq!(bot.calendar_id, DEFAULT_CALENDAR_ID);
        assert_eq!(bot.timezone, chrono_tz::UTC);
    }

    #[test]
    fn load_rejects_missing_twitter_token_when_publishing() {
        let config = config_with(&[]);
        let err = BotConfig::load(&config, true).unwrap_err();
        assert!(matches!(err, BotError::MissingConfig(key) if key == "TWITTER_ACCESS_TOKEN"));
    }

    #[test]
    fn load_allows_missing_twitter_token_for_dry_runs() {
        let config = config_with(&[("BOT_TIMEZONE", "Europe/London")]);
        let bot = BotConfig::load(&config, false).expect("dry run config should load");
        assert!(bot.twitter_access_token.is_none());
        assert_eq!(bot.timezone, chrono_tz::Europe::London);
    }

    #[test]
    fn load_rejects_unknown_timezone() {
        let config = config_with(&[("BOT_TIMEZONE", "Atlantis/Lemuria")]);
        let err = BotConfig::load(&config, false).unwrap_err();
        assert!(matches!(err, BotError::InvalidTimezone(name) if name == "Atlantis/Lemuria"));
    }

    #[test]
    fn from_file_parses_quotes_comments_and_export() {
        let path = env::temp_dir().join(format!("tweetomatic_cfg_{}.env", std::process::id()));
        fs::write(
            &path,
            "# reminder bot settings\nexport CALENDAR_ID=\"team@example.com\"\nBOT_TIMEZONE='Europe/Berlin'\n\n",
        )
        .expect("temp config should be writable");

        let config = AppConfig::from_file(path.to_str().expect("temp path is utf-8"))
            .expect("config file should parse");
        fs::remove_file(&path).ok();

        assert_eq!(config.get("CALENDAR_ID").as_deref(), Some("team@example.com"));
        assert_eq!(config.get("BOT_TIMEZONE").as_deref(), Some("Europe/Berlin"));
        assert_eq!(config.get("MISSING"), None);
    }

    #[test]
    fn from_file_rejects_lines_without_separator() {
        let path = env::temp_dir().join(format!("tweetomatic_bad_cfg_{}.env", std::process::id()));
        fs::write(&path, "JUST_A_KEY\n").expect("temp config should be writable");

        let err = AppConfig::from_file(path.to_str().expect("temp path is utf-8")).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(err.contains("Invalid config line 1"));
    }
}
