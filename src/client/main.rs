/**
 * Chat Client Entry Point
 *
 * Terminal client: prints the conversation as it arrives and publishes
 * every line typed on stdin. `/clear` clears the conversation.
 *
 * The username comes from `CHAT_USERNAME` or the first argument.
 */

use pollchat::client::{ChatApi, Config, FeedPoller, TerminalDisplay};
use pollchat::shared::ConfigError;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let username = config
        .username()
        .map(str::to_string)
        .or_else(|| std::env::args().nth(1))
        .filter(|name| !name.trim().is_empty())
        .ok_or(ConfigError::MissingValue("username"))?;

    let api = ChatApi::new(&config)?;
    let mut poller = FeedPoller::new(api.clone(), TerminalDisplay::new(std::io::stdout()), &config);
    let poll_task = tokio::spawn(async move { poller.run().await });

    tracing::info!("[Client] Connected to {} as {}", config.server_url(), username);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let result = match line.trim() {
            "" => continue,
            "/clear" => api.clear().await,
            text => api.publish(&username, text).await,
        };
        if let Err(e) = result {
            tracing::warn!("[Client] {}", e);
        }
    }

    poll_task.abort();
    Ok(())
}
