use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

use tweetomatic::cli;
use tweetomatic::config::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Could not read config file {path}: {err}");
                process::exit(1);
            }
        },
        Err(_) => AppConfig::default(),
    };

    process::exit(cli::cli(&config).await);
}
