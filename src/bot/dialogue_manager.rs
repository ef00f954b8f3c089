//! Dialogue Manager module for handling dialogue state transitions
//!
//! The functions here take a validated (or raw) user input, decide the next
//! conversation state and perform the side effects of the transition: prompt
//! messages, the finalize step of the upload flow, and the remote renames
//! that carry metadata edits.

use std::path::Path;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{error, info, warn};

// Import configuration
use crate::config::BotConfig;

// Import dialogue types and validators
use crate::dialogue::{
    validate_dimensions, validate_field, validate_year, EditField, GalleryDialogue,
    GalleryDialogueState,
};

// Import the filename codec
use crate::filename::{edited_name, ArtworkName, FieldEdit, FilenameError, FILE_EXTENSION};

use crate::image_convert;
use crate::messages;
use crate::store::GalleryStore;

// Import UI builder functions
use super::ui_builder::{
    create_artwork_list_keyboard, create_edit_menu_keyboard, create_month_keyboard,
    format_artwork_summary,
};

/// Handle title input during the upload dialogue
pub async fn handle_title_input(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    photo_path: String,
    input: &str,
) -> Result<()> {
    match validate_field(input) {
        Ok(title) => {
            bot.send_message(msg.chat.id, messages::TITLE_SAVED_ASK_MATERIAL)
                .await?;
            dialogue
                .update(GalleryDialogueState::AwaitingMaterial { photo_path, title })
                .await?;
        }
        Err("too_long") => {
            bot.send_message(msg.chat.id, messages::FIELD_TOO_LONG).await?;
            // Keep dialogue state, user can try again
        }
        Err(_) => {
            bot.send_message(msg.chat.id, messages::FIELD_EMPTY).await?;
        }
    }

    Ok(())
}

/// Handle material input during the upload dialogue
pub async fn handle_material_input(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    photo_path: String,
    title: String,
    input: &str,
) -> Result<()> {
    match validate_field(input) {
        Ok(material) => {
            bot.send_message(msg.chat.id, messages::MATERIAL_SAVED_ASK_MONTH)
                .reply_markup(create_month_keyboard())
                .await?;
            dialogue
                .update(GalleryDialogueState::AwaitingMonth {
                    photo_path,
                    title,
                    material,
                })
                .await?;
        }
        Err("too_long") => {
            bot.send_message(msg.chat.id, messages::FIELD_TOO_LONG).await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, messages::FIELD_EMPTY).await?;
        }
    }

    Ok(())
}

/// Handle year input during the upload dialogue
#[allow(clippy::too_many_arguments)]
pub async fn handle_year_input(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    photo_path: String,
    title: String,
    material: String,
    month: Option<String>,
    input: &str,
) -> Result<()> {
    match validate_year(input) {
        Ok(year) => {
            bot.send_message(msg.chat.id, messages::YEAR_SAVED_ASK_DIMENSIONS)
                .await?;
            dialogue
                .update(GalleryDialogueState::AwaitingDimensions {
                    photo_path,
                    title,
                    material,
                    month,
                    year,
                })
                .await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, messages::YEAR_INVALID).await?;
        }
    }

    Ok(())
}

/// Handle dimensions input, the last step of the upload dialogue
#[allow(clippy::too_many_arguments)]
pub async fn handle_dimensions_input(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    config: &BotConfig,
    photo_path: String,
    title: String,
    material: String,
    month: Option<String>,
    year: String,
    input: &str,
) -> Result<()> {
    match validate_dimensions(input) {
        Ok(dimensions) => {
            let artwork = ArtworkName::new(title, material, month, year, dimensions);
            finalize_upload(bot, msg.chat.id, dialogue, store, config, &photo_path, &artwork)
                .await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, messages::DIMENSIONS_INVALID)
                .await?;
        }
    }

    Ok(())
}

/// Finalize an upload: derive the gallery filename, move the scratch file to
/// that name (re-encoding to JPEG when needed), push it to the remote store
/// and report the outcome. The local files are removed on both paths and the
/// conversation returns to idle.
pub async fn finalize_upload(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    config: &BotConfig,
    photo_path: &str,
    artwork: &ArtworkName,
) -> Result<()> {
    let remote_name = artwork.encode();
    let target = config.download_dir.join(&remote_name);
    let source = Path::new(photo_path);

    match image_convert::finalize_local_file(source, &target) {
        Ok(()) => match store.upload(&target, &remote_name).await {
            Ok(()) => {
                info!(remote_name = %remote_name, "artwork uploaded");
                bot.send_message(chat_id, messages::upload_success(&remote_name))
                    .await?;
            }
            Err(err) => {
                error!(error = %err, remote_name = %remote_name, "upload failed");
                bot.send_message(chat_id, messages::store_failure(&err)).await?;
            }
        },
        Err(err) => {
            error!(error = %err, "could not prepare local file for upload");
            bot.send_message(chat_id, messages::UPLOAD_FAILED_LOCAL).await?;
        }
    }

    // The scratch files go away on success and failure alike.
    for path in [source, target.as_path()] {
        if path.exists() {
            if let Err(err) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %err, "could not remove scratch file");
            }
        }
    }

    dialogue.exit().await?;
    Ok(())
}

/// Handle the text input of an edit-flow field change
#[allow(clippy::too_many_arguments)]
pub async fn handle_edit_value_input(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    listing: Vec<String>,
    selected: usize,
    field: EditField,
    input: &str,
) -> Result<()> {
    let validated = match field {
        EditField::Title | EditField::Material => validate_field(input),
        EditField::Dimensions => validate_dimensions(input),
    };
    let value = match validated {
        Ok(value) => value,
        Err("too_long") => {
            bot.send_message(msg.chat.id, messages::FIELD_TOO_LONG).await?;
            return Ok(());
        }
        Err("format") => {
            bot.send_message(msg.chat.id, messages::DIMENSIONS_INVALID)
                .await?;
            return Ok(());
        }
        Err(_) => {
            bot.send_message(msg.chat.id, messages::FIELD_EMPTY).await?;
            return Ok(());
        }
    };

    let edit = match field {
        EditField::Title => FieldEdit::Title(value),
        EditField::Material => FieldEdit::Material(value),
        EditField::Dimensions => FieldEdit::Dimensions(value),
    };
    apply_edit(bot, msg.chat.id, None, dialogue, store, listing, selected, edit).await
}

/// Handle the year input of an edit-flow date change
#[allow(clippy::too_many_arguments)]
pub async fn handle_edit_year_input(
    bot: &Bot,
    msg: &Message,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    listing: Vec<String>,
    selected: usize,
    month: Option<String>,
    input: &str,
) -> Result<()> {
    match validate_year(input) {
        Ok(year) => {
            apply_edit(
                bot,
                msg.chat.id,
                None,
                dialogue,
                store,
                listing,
                selected,
                FieldEdit::Date { month, year },
            )
            .await
        }
        Err(_) => {
            bot.send_message(msg.chat.id, messages::YEAR_INVALID).await?;
            Ok(())
        }
    }
}

/// Apply a single-field edit to the selected entry via a remote rename and
/// return the conversation to the edit menu.
///
/// On a store failure the state is left untouched so the same edit can be
/// retried; on a structural filename error the edit is abandoned.
#[allow(clippy::too_many_arguments)]
pub async fn apply_edit(
    bot: &Bot,
    chat_id: ChatId,
    menu_message: Option<MessageId>,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    mut listing: Vec<String>,
    selected: usize,
    edit: FieldEdit,
) -> Result<()> {
    let Some(current) = listing.get(selected).cloned() else {
        bot.send_message(chat_id, messages::STALE_SELECTION).await?;
        dialogue.exit().await?;
        return Ok(());
    };

    let new_name = match edited_name(&current, edit) {
        Ok(name) => name,
        Err(err) => {
            warn!(file = %current, error = %err, "cannot edit malformed filename");
            bot.send_message(chat_id, messages::FILENAME_FORMAT_ERROR)
                .await?;
            dialogue
                .update(GalleryDialogueState::EditingArtwork { listing, selected })
                .await?;
            return Ok(());
        }
    };

    if new_name == current {
        bot.send_message(chat_id, messages::NO_CHANGE).await?;
        dialogue
            .update(GalleryDialogueState::EditingArtwork { listing, selected })
            .await?;
        return Ok(());
    }

    match store.rename(&current, &new_name).await {
        Ok(()) => {
            info!(from = %current, to = %new_name, "artwork renamed");
            // Keep the snapshot current so further edits compose.
            listing[selected] = new_name.clone();
            bot.send_message(chat_id, messages::renamed_to(&new_name))
                .await?;
            show_edit_menu(bot, chat_id, menu_message, &listing, selected).await?;
            dialogue
                .update(GalleryDialogueState::EditingArtwork { listing, selected })
                .await?;
        }
        Err(err) => {
            error!(error = %err, from = %current, "rename failed");
            bot.send_message(chat_id, messages::store_failure(&err)).await?;
        }
    }

    Ok(())
}

/// Render the edit menu for the selected entry, either in place of an
/// existing menu message or as a new message.
pub async fn show_edit_menu(
    bot: &Bot,
    chat_id: ChatId,
    menu_message: Option<MessageId>,
    listing: &[String],
    selected: usize,
) -> Result<()> {
    let Some(name) = listing.get(selected) else {
        return Ok(());
    };
    let artwork = match ArtworkName::decode(name) {
        Ok(artwork) => artwork,
        Err(err) => {
            warn!(file = %name, error = %err, "cannot render edit menu");
            bot.send_message(chat_id, messages::FILENAME_FORMAT_ERROR)
                .await?;
            return Ok(());
        }
    };
    let text = format_artwork_summary(&artwork);
    let keyboard = create_edit_menu_keyboard(&artwork);
    match menu_message {
        Some(message_id) => {
            bot.edit_message_text(chat_id, message_id, text)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, text).reply_markup(keyboard).await?;
        }
    }
    Ok(())
}

/// Rename plan that makes the selected entry the only one carrying the
/// start-image flag.
///
/// Entries whose names do not decode are passed over; they cannot carry the
/// flag in a recognizable way. `selected` must be a valid index.
pub fn set_start_image_renames(
    listing: &[String],
    selected: usize,
) -> Result<Vec<(String, String)>, FilenameError> {
    let mut plan = Vec::new();

    // At most one entry may hold the flag: clear it elsewhere first.
    for (index, name) in listing.iter().enumerate() {
        if index == selected {
            continue;
        }
        if let Ok(mut artwork) = ArtworkName::decode(name) {
            if artwork.start_image {
                artwork.apply(FieldEdit::StartImage(false));
                plan.push((name.clone(), artwork.encode()));
            }
        }
    }

    let mut chosen = ArtworkName::decode(&listing[selected])?;
    if !chosen.start_image {
        chosen.apply(FieldEdit::StartImage(true));
        plan.push((listing[selected].clone(), chosen.encode()));
    }

    Ok(plan)
}

/// Make the selected entry the gallery's start image.
pub async fn apply_set_start_image(
    bot: &Bot,
    chat_id: ChatId,
    menu_message: Option<MessageId>,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    mut listing: Vec<String>,
    selected: usize,
) -> Result<()> {
    if selected >= listing.len() {
        bot.send_message(chat_id, messages::STALE_SELECTION).await?;
        dialogue.exit().await?;
        return Ok(());
    }

    let plan = match set_start_image_renames(&listing, selected) {
        Ok(plan) => plan,
        Err(err) => {
            warn!(error = %err, "cannot plan start image renames");
            bot.send_message(chat_id, messages::FILENAME_FORMAT_ERROR)
                .await?;
            dialogue
                .update(GalleryDialogueState::EditingArtwork { listing, selected })
                .await?;
            return Ok(());
        }
    };

    if plan.is_empty() {
        bot.send_message(chat_id, messages::NO_CHANGE).await?;
        dialogue
            .update(GalleryDialogueState::EditingArtwork { listing, selected })
            .await?;
        return Ok(());
    }

    for (from, to) in plan {
        match store.rename(&from, &to).await {
            Ok(()) => {
                if let Some(entry) = listing.iter_mut().find(|entry| **entry == from) {
                    *entry = to;
                }
            }
            Err(err) => {
                error!(error = %err, %from, "start image rename failed");
                bot.send_message(chat_id, messages::store_failure(&err)).await?;
                // Renames applied so far stay in the snapshot.
                dialogue
                    .update(GalleryDialogueState::EditingArtwork { listing, selected })
                    .await?;
                return Ok(());
            }
        }
    }

    info!("start image updated");
    bot.send_message(chat_id, messages::START_IMAGE_SET).await?;
    show_edit_menu(bot, chat_id, menu_message, &listing, selected).await?;
    dialogue
        .update(GalleryDialogueState::EditingArtwork { listing, selected })
        .await?;
    Ok(())
}

/// Handle `/list`: snapshot the remote directory and offer a selection menu.
pub async fn handle_list_command(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
) -> Result<()> {
    match store.list().await {
        Ok(mut listing) => {
            if listing.is_empty() {
                bot.send_message(chat_id, messages::LIST_EMPTY).await?;
                return Ok(());
            }
            listing.sort();
            bot.send_message(chat_id, messages::CHOOSE_ARTWORK)
                .reply_markup(create_artwork_list_keyboard(&listing))
                .await?;
            dialogue
                .update(GalleryDialogueState::SelectingArtwork { listing })
                .await?;
        }
        Err(err) => {
            error!(error = %err, "listing the gallery failed");
            bot.send_message(chat_id, messages::store_failure(&err)).await?;
        }
    }
    Ok(())
}

/// Handle `/convert`: re-encode every non-JPEG gallery entry to JPEG.
pub async fn handle_convert_command(
    bot: &Bot,
    chat_id: ChatId,
    store: &GalleryStore,
) -> Result<()> {
    let listing = match store.list().await {
        Ok(listing) => listing,
        Err(err) => {
            error!(error = %err, "listing the gallery failed");
            bot.send_message(chat_id, messages::store_failure(&err)).await?;
            return Ok(());
        }
    };

    let targets: Vec<String> = listing
        .iter()
        .filter(|name| !name.to_lowercase().ends_with(".jpg"))
        .cloned()
        .collect();
    if targets.is_empty() {
        bot.send_message(chat_id, messages::CONVERT_NOTHING).await?;
        return Ok(());
    }

    bot.send_message(chat_id, messages::CONVERT_STARTED).await?;

    let (mut converted, mut skipped, mut failed) = (0usize, 0usize, 0usize);
    for name in targets {
        let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&name);
        let new_name = format!("{stem}.{FILE_EXTENSION}");
        if listing.iter().any(|existing| *existing == new_name) {
            warn!(file = %name, "conversion target already exists, skipping");
            skipped += 1;
            continue;
        }
        match convert_remote_file(store, &name, &new_name).await {
            Ok(true) => converted += 1,
            Ok(false) => skipped += 1,
            Err(err) => {
                error!(file = %name, error = %err, "conversion failed");
                failed += 1;
            }
        }
    }

    bot.send_message(chat_id, messages::convert_summary(converted, skipped, failed))
        .await?;
    Ok(())
}

/// Convert one remote entry to JPEG. Returns `Ok(false)` when the entry is
/// not decodable image data and was left alone.
async fn convert_remote_file(store: &GalleryStore, name: &str, new_name: &str) -> Result<bool> {
    let data = store.download(name).await?;
    let jpeg = match image_convert::reencode_to_jpeg(&data) {
        Ok(jpeg) => jpeg,
        Err(err) => {
            warn!(file = %name, error = %err, "not convertible, skipping");
            return Ok(false);
        }
    };
    store.upload_bytes(new_name, jpeg).await?;
    store.delete(name).await?;
    info!(from = %name, to = %new_name, "converted to JPEG");
    Ok(true)
}

/// Handle `/confirm`: execute a pending delete.
pub async fn handle_confirm_command(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
) -> Result<()> {
    match dialogue.get().await? {
        Some(GalleryDialogueState::ConfirmingDelete { listing, selected }) => {
            let Some(name) = listing.get(selected).cloned() else {
                bot.send_message(chat_id, messages::STALE_SELECTION).await?;
                dialogue.exit().await?;
                return Ok(());
            };
            match store.delete(&name).await {
                Ok(()) => {
                    info!(file = %name, "artwork deleted");
                    bot.send_message(chat_id, messages::DELETE_DONE).await?;
                    dialogue.exit().await?;
                }
                Err(err) => {
                    error!(error = %err, file = %name, "delete failed");
                    bot.send_message(chat_id, messages::store_failure(&err)).await?;
                    // The confirmation stays pending; /confirm may be retried.
                }
            }
        }
        _ => {
            bot.send_message(chat_id, messages::NOTHING_TO_CONFIRM).await?;
        }
    }
    Ok(())
}

/// Handle `/cancel`: discard all dialogue state and the in-flight photo.
pub async fn handle_cancel_command(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: GalleryDialogue,
) -> Result<()> {
    match dialogue.get().await?.unwrap_or_default() {
        GalleryDialogueState::Idle => {
            bot.send_message(chat_id, messages::NOTHING_TO_CANCEL).await?;
        }
        state => {
            if let Some(photo_path) = state.photo_path() {
                let path = Path::new(photo_path);
                if path.exists() {
                    if let Err(err) = std::fs::remove_file(path) {
                        warn!(path = %photo_path, error = %err, "could not remove scratch file");
                    }
                }
            }
            dialogue.exit().await?;
            bot.send_message(chat_id, messages::CANCELLED).await?;
        }
    }
    Ok(())
}
