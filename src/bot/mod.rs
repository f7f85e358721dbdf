//! Telegram bot relay for cumulus.
//!
//! The bot is the second ingestion front-end: it resolves each sender
//! to an account through the Telegram link, downloads the attached
//! media and feeds it into the shared ingestion pipeline. It also
//! issues linking codes and status replies.
//!
//! All outbound replies are best-effort; a failed reply is logged and
//! swallowed, never surfaced as an ingestion failure.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileMeta;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use crate::db::{Account, AccountRepository, UploadSource};
use crate::ingest::{IngestRequest, IngestService};
use crate::quota::{self, format_size, MAX_FILE_SIZE};
use crate::Database;

/// Delay before restarting the dispatcher after it stops.
const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Shared state for bot handlers.
#[derive(Clone)]
pub struct BotContext {
    /// Database handle.
    pub db: Arc<Database>,
    /// Shared ingestion pipeline.
    pub ingest: Arc<IngestService>,
}

impl BotContext {
    /// Create a new bot context.
    pub fn new(db: Arc<Database>, ingest: Arc<IngestService>) -> Self {
        Self { db, ingest }
    }
}

/// Bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    #[command(description = "get started and show your linking code.")]
    Start,
    #[command(description = "link your account: /connect <code>.")]
    Connect(String),
    #[command(description = "show connection status and storage usage.")]
    Status,
    #[command(description = "show available commands.")]
    Help,
}

/// Run the bot until the process exits.
///
/// The dispatcher is restarted with a fixed backoff whenever its
/// listener stops, so a transport disconnect never kills the relay.
pub async fn run(token: String, ctx: BotContext) {
    let ctx = Arc::new(ctx);

    loop {
        info!("Starting Telegram bot");
        let bot = Bot::new(token.clone());

        let handler = Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_command),
            )
            .branch(dptree::endpoint(handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![ctx.clone()])
            .build()
            .dispatch()
            .await;

        warn!(
            "Telegram dispatcher stopped; restarting in {}s",
            RECONNECT_DELAY.as_secs()
        );
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

/// Send a reply, logging and swallowing any transport error.
async fn reply(bot: &Bot, chat_id: ChatId, text: String) {
    if let Err(e) = bot.send_message(chat_id, text).await {
        warn!("Failed to send Telegram reply: {}", e);
    }
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let sender_id = match msg.from() {
        Some(user) => user.id.0.to_string(),
        None => return Ok(()),
    };

    match cmd {
        Command::Start => {
            reply(&bot, chat_id, welcome_text(&sender_id)).await;
        }
        Command::Connect(code) => {
            let code = code.trim();
            if code.is_empty() {
                reply(
                    &bot,
                    chat_id,
                    "Invalid connection code. Usage: /connect <code>".to_string(),
                )
                .await;
                return Ok(());
            }

            let username = msg
                .from()
                .and_then(|u| u.username.clone())
                .unwrap_or_default();

            let repo = AccountRepository::new(ctx.db.pool());
            let account = match repo.get_by_id(code).await {
                Ok(account) => account,
                Err(e) => {
                    error!("Failed to look up account for /connect: {}", e);
                    reply(
                        &bot,
                        chat_id,
                        "Failed to connect. Please try again later.".to_string(),
                    )
                    .await;
                    return Ok(());
                }
            };

            if account.is_none() {
                reply(
                    &bot,
                    chat_id,
                    "Account not found. Please check your connection code.".to_string(),
                )
                .await;
                return Ok(());
            }

            match repo.connect_telegram(code, &sender_id, &username).await {
                Ok(_) => {
                    reply(
                        &bot,
                        chat_id,
                        "Successfully connected!\n\
                         Your storage limit is now upgraded to 100 GB.\n\
                         Send me any file to upload it to your cloud storage."
                            .to_string(),
                    )
                    .await;
                }
                Err(e) => {
                    error!("Failed to connect Telegram account: {}", e);
                    reply(
                        &bot,
                        chat_id,
                        "Failed to connect. Please try again later.".to_string(),
                    )
                    .await;
                }
            }
        }
        Command::Status => {
            match resolve_sender(&ctx, &sender_id).await {
                Some(account) => {
                    match quota::account_usage(ctx.db.pool(), &account).await {
                        Ok(usage) => {
                            reply(&bot, chat_id, status_text(usage.used, usage.limit)).await;
                        }
                        Err(e) => {
                            error!("Failed to compute usage for status: {}", e);
                            reply(
                                &bot,
                                chat_id,
                                "Failed to check status. Please try again.".to_string(),
                            )
                            .await;
                        }
                    }
                }
                None => {
                    reply(
                        &bot,
                        chat_id,
                        "Not connected.\nUse /start to get connection instructions.".to_string(),
                    )
                    .await;
                }
            }
        }
        Command::Help => {
            reply(&bot, chat_id, Command::descriptions().to_string()).await;
        }
    }

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let Some(inbound) = extract_inbound_file(&msg) else {
        // Plain text without a command; nothing to ingest
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let sender_id = match msg.from() {
        Some(user) => user.id.0.to_string(),
        None => return Ok(()),
    };

    // Resolve the sender; unlinked senders never reach the catalog
    let Some(account) = resolve_sender(&ctx, &sender_id).await else {
        reply(
            &bot,
            chat_id,
            "Please connect your account first using the /start command.".to_string(),
        )
        .await;
        return Ok(());
    };

    let declared_size = i64::from(inbound.meta.size);
    if declared_size > MAX_FILE_SIZE {
        reply(
            &bot,
            chat_id,
            "File too large. Maximum size is 2 GB.".to_string(),
        )
        .await;
        return Ok(());
    }

    reply(&bot, chat_id, "Uploading file...".to_string()).await;

    let bytes = match download_file(&bot, &inbound.meta).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to download file from Telegram: {}", e);
            reply(
                &bot,
                chat_id,
                "Failed to upload file. Please try again.".to_string(),
            )
            .await;
            return Ok(());
        }
    };

    let request = IngestRequest {
        owner_id: account.id,
        bytes,
        filename: inbound.filename.clone(),
        declared_mime: inbound.mime_type,
        declared_size: Some(declared_size),
        source: UploadSource::Telegram,
    };

    match ctx.ingest.ingest(request).await {
        Ok(file) => {
            reply(
                &bot,
                chat_id,
                format!(
                    "File uploaded successfully!\n{} ({})\nAccess it in the web app.",
                    inbound.filename,
                    format_size(file.size)
                ),
            )
            .await;
        }
        Err(e) => {
            error!("Failed to ingest file from Telegram: {}", e);
            reply(
                &bot,
                chat_id,
                "Failed to upload file. Please try again.".to_string(),
            )
            .await;
        }
    }

    Ok(())
}

/// An attachment normalized across Telegram media kinds.
struct InboundFile {
    meta: FileMeta,
    filename: String,
    mime_type: Option<String>,
}

/// Pull the file reference out of whichever media kind the message
/// carries. Photos use the highest resolution available.
fn extract_inbound_file(msg: &Message) -> Option<InboundFile> {
    if let Some(doc) = msg.document() {
        return Some(InboundFile {
            meta: doc.file.clone(),
            filename: doc
                .file_name
                .clone()
                .unwrap_or_else(|| "file".to_string()),
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
        });
    }

    if let Some(photos) = msg.photo() {
        let largest = photos.last()?;
        return Some(InboundFile {
            meta: largest.file.clone(),
            filename: "image.jpg".to_string(),
            mime_type: None,
        });
    }

    if let Some(video) = msg.video() {
        return Some(InboundFile {
            meta: video.file.clone(),
            filename: video
                .file_name
                .clone()
                .unwrap_or_else(|| "file".to_string()),
            mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
        });
    }

    if let Some(audio) = msg.audio() {
        return Some(InboundFile {
            meta: audio.file.clone(),
            filename: audio
                .file_name
                .clone()
                .unwrap_or_else(|| "file".to_string()),
            mime_type: audio.mime_type.as_ref().map(|m| m.to_string()),
        });
    }

    if let Some(voice) = msg.voice() {
        return Some(InboundFile {
            meta: voice.file.clone(),
            filename: "voice.ogg".to_string(),
            mime_type: voice.mime_type.as_ref().map(|m| m.to_string()),
        });
    }

    None
}

/// Resolve a Telegram sender to a linked account, if any.
async fn resolve_sender(ctx: &BotContext, sender_id: &str) -> Option<Account> {
    match AccountRepository::new(ctx.db.pool())
        .get_by_telegram_id(sender_id)
        .await
    {
        Ok(account) => account,
        Err(e) => {
            error!("Failed to resolve Telegram sender: {}", e);
            None
        }
    }
}

/// Download a Telegram file fully into memory.
async fn download_file(bot: &Bot, meta: &FileMeta) -> crate::Result<Vec<u8>> {
    let file = bot
        .get_file(meta.id.clone())
        .await
        .map_err(|e| crate::CumulusError::Transport(e.to_string()))?;

    let mut buf = Cursor::new(Vec::new());
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| crate::CumulusError::Transport(e.to_string()))?;

    Ok(buf.into_inner())
}

/// Welcome message with the sender's linking code.
fn welcome_text(sender_id: &str) -> String {
    format!(
        "Welcome to Cumulus!\n\n\
         To connect your account:\n\
         1. Sign in to the Cumulus web app\n\
         2. Open Settings and choose Connect Telegram\n\
         3. Use code: {sender_id}\n\n\
         Once connected, you can upload files directly here."
    )
}

/// Status message with formatted usage.
fn status_text(used: i64, limit: i64) -> String {
    format!(
        "Connected to Cumulus.\n\
         Storage: {} / {}\n\
         Ready to receive files.",
        format_size(used),
        format_size(limit)
    )
}
