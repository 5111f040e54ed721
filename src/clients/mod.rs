pub mod calendar_client;
pub mod google_auth;
pub mod twitter_client;
