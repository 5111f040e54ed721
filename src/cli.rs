use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::clients::calendar_client::GoogleCalendarClient;
use crate::clients::google_auth::TokenStore;
use crate::clients::twitter_client::{DryRunPublisher, TwitterClient};
use crate::config::{AppConfig, BotConfig};
use crate::error::BotError;
use crate::service::event_selector::select_event;
use crate::service::tweet_composer::{format_date_short, format_hour};
use crate::service::tweet_flow::{
    run_once, CalendarSource, RunOutcome, SkipReason, TweetPublisher,
};

#[derive(Parser)]
#[command(name = "tweetomatic", about = "Tweets reminders about upcoming calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the next event and tweet the matching reminder, if any.
    Run {
        /// Compose the reminder but print it instead of posting.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the next upcoming event without tweeting.
    Next,
    /// Run the Google consent flow and store a token for later runs.
    Auth,
}

/// Parses the command line and dispatches. Returns the process exit
/// code: zero for anything that counts as a normal day, including the
/// "nothing to tweet" outcomes.
pub async fn cli(config: &AppConfig) -> i32 {
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Run { dry_run } => run(config, *dry_run).await,
        Commands::Next => next(config).await,
        Commands::Auth => auth(config).await,
    };
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

async fn run(config: &AppConfig, dry_run: bool) -> Result<(), BotError> {
    let config = BotConfig::load(config, !dry_run)?;
    let calendar = GoogleCalendarClient::new(
        TokenStore::new(&config.credentials_file, &config.token_file),
        config.calendar_id.clone(),
    );
    let publisher: Box<dyn TweetPublisher> = if dry_run {
        Box::new(DryRunPublisher)
    } else {
        let token = config
            .twitter_access_token
            .clone()
            .ok_or_else(|| BotError::MissingConfig("TWITTER_ACCESS_TOKEN".to_string()))?;
        Box::new(TwitterClient::new(token))
    };

    match run_once(&calendar, publisher.as_ref(), config.today()).await? {
        RunOutcome::Sent(tweet) => {
            info!(chars = tweet.chars().count(), "reminder sent");
        }
        RunOutcome::Skipped(SkipReason::NoUpcomingEvents) => {
            info!("no upcoming events, nothing to do");
        }
        RunOutcome::Skipped(SkipReason::NoEventData) => {
            info!("no event data, nothing to do");
        }
        RunOutcome::Skipped(SkipReason::NotInWindow(offset)) => {
            info!(offset, "event outside the reminder window, nothing to do");
        }
    }
    Ok(())
}

async fn next(config: &AppConfig) -> Result<(), BotError> {
    let config = BotConfig::load(config, false)?;
    let calendar = GoogleCalendarClient::new(
        TokenStore::new(&config.credentials_file, &config.token_file),
        config.calendar_id.clone(),
    );

    let events = calendar.next_events().await?;
    match select_event(&events) {
        Ok(event) => {
            println!(
                "Next event: {} on {}, {} to {}",
                event.title,
                format_date_short(event.start),
                format_hour(event.start),
                format_hour(event.end),
            );
            Ok(())
        }
        Err(BotError::NoEventsFound) => {
            println!("No upcoming events.");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

async fn auth(config: &AppConfig) -> Result<(), BotError> {
    let config = BotConfig::load(config, false)?;
    let store = TokenStore::new(&config.credentials_file, &config.token_file);
    store.authorize_interactive(&reqwest::Client::new()).await
}
