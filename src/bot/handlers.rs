use std::path::Path;
use std::sync::Arc;

use teloxide::payloads::SendAudioSetters;
use teloxide::prelude::*;
use teloxide::types::InputFile;

use super::{AppState, HandlerResult};
use crate::downloader::{self, RequestScope};
use crate::utils;

const USAGE_HINT: &str =
    "Please provide the name of the song you want. Example: /music Queen Bohemian Rhapsody";

/// `/start` - static usage message
pub async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Hi! I'm your music bot. Use /music followed by the name of the song \
         you want to download and convert to MP3.\n\n\
         Example: /music Queen Bohemian Rhapsody",
    )
    .await?;
    Ok(())
}

/// `/music <query>` - fetch, transcode, deliver, clean up
pub async fn music(bot: Bot, msg: Message, query: String, state: Arc<AppState>) -> HandlerResult {
    let query = query.trim().to_string();
    if query.is_empty() {
        bot.send_message(msg.chat.id, USAGE_HINT).await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        format!("🤖 Searching and processing: {query}..."),
    )
    .await?;

    let dir = state.config.downloader.download_dir.clone();
    let base = downloader::temp_basename(msg.chat.id.0, msg.id.0);

    // Everything this request writes under `base` is removed when the
    // scope drops, on success and failure alike
    let _scope = RequestScope::new(&dir, &base);

    if let Err(err) = fetch_and_deliver(&bot, &msg, &query, &dir, &base, &state).await {
        tracing::error!("failed to process request {base}: {err:#}");
        bot.send_message(
            msg.chat.id,
            format!(
                "❌ Something went wrong while processing your request. \
                 Please try again. Details: {err}"
            ),
        )
        .await?;
    }

    Ok(())
}

/// The fallible part of a request: download, status messages, upload.
/// Either the audio attachment is delivered or the caller reports one
/// error message, never both.
async fn fetch_and_deliver(
    bot: &Bot,
    msg: &Message,
    query: &str,
    dir: &Path,
    base: &str,
    state: &AppState,
) -> crate::Result<()> {
    bot.send_message(msg.chat.id, "🔎 Fetching and downloading the audio...")
        .await?;

    let track = downloader::download_track(
        &state.fetcher,
        dir,
        base,
        query,
        &state.config.downloader.audio_format,
    )
    .await?;

    let label = match track.duration {
        Some(seconds) => format!("{} ({})", track.title, utils::format_duration(seconds)),
        None => track.title.clone(),
    };
    bot.send_message(
        msg.chat.id,
        format!("✅ Download and conversion finished. Sending {label}..."),
    )
    .await?;

    bot.send_audio(msg.chat.id, InputFile::file(track.path.clone()))
        .title(track.title.clone())
        .caption(format!("Requested song: {query}"))
        .await?;

    bot.send_message(msg.chat.id, "🎶 Song sent successfully!")
        .await?;

    Ok(())
}
