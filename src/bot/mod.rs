use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::{BotCommands, ParseError};

use crate::config::Config;
use crate::downloader::ytdlp::YtDlpFetcher;

pub mod handlers;

/// Result type shared by all command handlers
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Shared per-process state handed to every handler invocation
pub struct AppState {
    pub config: Config,
    pub fetcher: YtDlpFetcher,
}

/// Commands understood by the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show usage instructions")]
    Start,
    #[command(description = "download a song and send it as MP3", parse_with = parse_tail)]
    Music(String),
}

/// Keep the whole tail as the query. A bare `/music` must still reach
/// the handler so it can answer with the usage hint.
fn parse_tail(input: String) -> Result<(String,), ParseError> {
    Ok((input,))
}

/// Build the dispatcher and run until shutdown
pub async fn run(config: Config) -> crate::Result<()> {
    fs_err::create_dir_all(&config.downloader.download_dir)?;

    let bot = Bot::new(config.token.clone());
    let fetcher = YtDlpFetcher::new(&config.downloader);
    let state = Arc::new(AppState { config, fetcher });

    tracing::info!("Bot started. Press Ctrl+C to stop.");

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .filter_command::<Command>()
            .endpoint(dispatch),
    )
    .dependencies(dptree::deps![state])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

async fn dispatch(bot: Bot, msg: Message, cmd: Command, state: Arc<AppState>) -> HandlerResult {
    match cmd {
        Command::Start => handlers::start(bot, msg).await,
        Command::Music(query) => handlers::music(bot, msg, query, state).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn music_command_keeps_the_full_tail() {
        let cmd = Command::parse("/music Queen Bohemian Rhapsody", "tunefetchbot").unwrap();
        match cmd {
            Command::Music(query) => assert_eq!(query.trim(), "Queen Bohemian Rhapsody"),
            Command::Start => panic!("parsed as /start"),
        }
    }

    #[test]
    fn bare_music_command_yields_an_empty_query() {
        let cmd = Command::parse("/music", "tunefetchbot").unwrap();
        match cmd {
            Command::Music(query) => assert!(query.trim().is_empty()),
            Command::Start => panic!("parsed as /start"),
        }
    }

    #[test]
    fn start_command_parses() {
        let cmd = Command::parse("/start", "tunefetchbot").unwrap();
        assert!(matches!(cmd, Command::Start));
    }
}
