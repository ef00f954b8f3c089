//! Message Handler module for processing incoming Telegram messages

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::FileId;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error};

// Import configuration
use crate::config::BotConfig;

// Import dialogue types
use crate::dialogue::{GalleryDialogue, GalleryDialogueState};

use crate::messages;
use crate::store::GalleryStore;

// Import dialogue manager functions
use super::dialogue_manager::{
    handle_cancel_command, handle_confirm_command, handle_convert_command,
    handle_dimensions_input, handle_edit_value_input, handle_edit_year_input,
    handle_list_command, handle_material_input, handle_title_input, handle_year_input,
};

use super::Command;

/// Download a Telegram file into the scratch directory.
///
/// The returned file is owned by the conversation until the upload finalizes
/// or the dialogue is cancelled.
pub async fn download_file(bot: &Bot, file_id: FileId, download_dir: &Path) -> Result<PathBuf> {
    let file = bot.get_file(file_id).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url).await?;
    let bytes = response.bytes().await?;

    let mut temp_file = tempfile::Builder::new()
        .prefix("artwork-")
        .suffix(".img")
        .tempfile_in(download_dir)?;
    temp_file.as_file_mut().write_all(&bytes)?;
    let (_file, path) = temp_file.keep()?;

    Ok(path)
}

fn sender_is_admin(config: &BotConfig, msg: &Message) -> bool {
    msg.from
        .as_ref()
        .map(|user| config.is_admin(user.id.0))
        .unwrap_or(false)
}

/// Handle bot commands; these run before any dialogue-state dispatch.
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: GalleryDialogue,
    store: Arc<GalleryStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, command = ?cmd, "received command");
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, messages::GREETING).await?;
        }
        Command::Help => {
            let help = format!("{}\n\n{}", Command::descriptions(), messages::HELP_FOOTER);
            bot.send_message(msg.chat.id, help).await?;
        }
        Command::List => {
            if !sender_is_admin(&config, &msg) {
                bot.send_message(msg.chat.id, messages::NOT_AUTHORIZED).await?;
                return Ok(());
            }
            // Entering edit mode would orphan an in-flight photo.
            if dialogue.get().await?.unwrap_or_default().photo_path().is_some() {
                bot.send_message(msg.chat.id, messages::BUSY_WITH_UPLOAD).await?;
                return Ok(());
            }
            handle_list_command(&bot, msg.chat.id, dialogue, &store).await?;
        }
        Command::Convert => {
            if !sender_is_admin(&config, &msg) {
                bot.send_message(msg.chat.id, messages::NOT_AUTHORIZED).await?;
                return Ok(());
            }
            handle_convert_command(&bot, msg.chat.id, &store).await?;
        }
        Command::Confirm => {
            handle_confirm_command(&bot, msg.chat.id, dialogue, &store).await?;
        }
        Command::Cancel => {
            handle_cancel_command(&bot, msg.chat.id, dialogue).await?;
        }
    }
    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    store: Arc<GalleryStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    debug!(chat_id = %msg.chat.id, message_length = text.len(), "received text message");

    match dialogue.get().await?.unwrap_or_default() {
        GalleryDialogueState::AwaitingTitle { photo_path } => {
            handle_title_input(bot, msg, dialogue, photo_path, text).await
        }
        GalleryDialogueState::AwaitingMaterial { photo_path, title } => {
            handle_material_input(bot, msg, dialogue, photo_path, title, text).await
        }
        GalleryDialogueState::AwaitingMonth { .. }
        | GalleryDialogueState::AwaitingEditMonth { .. }
        | GalleryDialogueState::SelectingArtwork { .. }
        | GalleryDialogueState::EditingArtwork { .. } => {
            bot.send_message(msg.chat.id, messages::USE_BUTTONS).await?;
            Ok(())
        }
        GalleryDialogueState::AwaitingYear {
            photo_path,
            title,
            material,
            month,
        } => handle_year_input(bot, msg, dialogue, photo_path, title, material, month, text).await,
        GalleryDialogueState::AwaitingDimensions {
            photo_path,
            title,
            material,
            month,
            year,
        } => {
            handle_dimensions_input(
                bot, msg, dialogue, &store, &config, photo_path, title, material, month, year,
                text,
            )
            .await
        }
        GalleryDialogueState::AwaitingEditValue {
            listing,
            selected,
            field,
        } => handle_edit_value_input(bot, msg, dialogue, &store, listing, selected, field, text).await,
        GalleryDialogueState::AwaitingEditYear {
            listing,
            selected,
            month,
        } => handle_edit_year_input(bot, msg, dialogue, &store, listing, selected, month, text).await,
        GalleryDialogueState::ConfirmingDelete { .. } => {
            bot.send_message(msg.chat.id, messages::CONFIRM_HINT).await?;
            Ok(())
        }
        GalleryDialogueState::Idle => {
            bot.send_message(msg.chat.id, messages::SEND_PHOTO_FIRST).await?;
            Ok(())
        }
    }
}

/// Admission check shared by photo and image-document uploads. Sends the
/// rejection message itself.
async fn upload_admitted(
    bot: &Bot,
    msg: &Message,
    dialogue: &GalleryDialogue,
    config: &BotConfig,
) -> Result<bool> {
    if !sender_is_admin(config, msg) {
        bot.send_message(msg.chat.id, messages::NOT_AUTHORIZED).await?;
        return Ok(false);
    }
    let state = dialogue.get().await?.unwrap_or_default();
    if !matches!(state, GalleryDialogueState::Idle) {
        let hint = if state.photo_path().is_some() {
            messages::BUSY_WITH_UPLOAD
        } else {
            messages::BUSY_WITH_EDIT
        };
        bot.send_message(msg.chat.id, hint).await?;
        return Ok(false);
    }
    Ok(true)
}

async fn start_upload_dialogue(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    config: &BotConfig,
    file_id: FileId,
) -> Result<()> {
    let status = bot.send_message(msg.chat.id, messages::DOWNLOADING_IMAGE).await?;
    match download_file(bot, file_id, &config.download_dir).await {
        Ok(photo_path) => {
            debug!(chat_id = %msg.chat.id, path = %photo_path.display(), "image downloaded");
            bot.edit_message_text(msg.chat.id, status.id, messages::IMAGE_RECEIVED_ASK_TITLE)
                .await?;
            dialogue
                .update(GalleryDialogueState::AwaitingTitle {
                    photo_path: photo_path.to_string_lossy().to_string(),
                })
                .await?;
        }
        Err(err) => {
            error!(chat_id = %msg.chat.id, error = %err, "failed to download image");
            bot.edit_message_text(msg.chat.id, status.id, messages::DOWNLOAD_FAILED)
                .await?;
        }
    }
    Ok(())
}

async fn handle_photo_message(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    config: Arc<BotConfig>,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, "received photo message");

    if !upload_admitted(bot, msg, &dialogue, &config).await? {
        return Ok(());
    }
    if let Some(photos) = msg.photo() {
        if let Some(largest_photo) = photos.last() {
            start_upload_dialogue(bot, msg, dialogue, &config, largest_photo.file.id.clone())
                .await?;
        }
    }
    Ok(())
}

async fn handle_document_message(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    config: Arc<BotConfig>,
) -> Result<()> {
    if let Some(doc) = msg.document() {
        match &doc.mime_type {
            Some(mime_type) if mime_type.to_string().starts_with("image/") => {
                debug!(chat_id = %msg.chat.id, mime_type = %mime_type, "received image document");
                if !upload_admitted(bot, msg, &dialogue, &config).await? {
                    return Ok(());
                }
                start_upload_dialogue(bot, msg, dialogue, &config, doc.file.id.clone()).await?;
            }
            _ => {
                debug!(chat_id = %msg.chat.id, "received non-image document");
                bot.send_message(msg.chat.id, messages::UNSUPPORTED_MESSAGE).await?;
            }
        }
    }
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: GalleryDialogue,
    store: Arc<GalleryStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, dialogue, store, config).await?;
    } else if msg.photo().is_some() {
        handle_photo_message(&bot, &msg, dialogue, config).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg, dialogue, config).await?;
    } else {
        bot.send_message(msg.chat.id, messages::UNSUPPORTED_MESSAGE).await?;
    }

    Ok(())
}
