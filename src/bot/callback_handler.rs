//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageId};
use tracing::{debug, warn};

// Import dialogue types
use crate::dialogue::{EditField, GalleryDialogue, GalleryDialogueState, MONTHS};

// Import the filename codec
use crate::filename::{listing_label, ArtworkName, FieldEdit};

use crate::messages;
use crate::store::GalleryStore;

// Import dialogue manager functions
use super::dialogue_manager::{apply_edit, apply_set_start_image};

// Import UI builder functions
use super::ui_builder::{
    create_edit_menu_keyboard, create_month_keyboard, format_artwork_summary, CB_DELETE,
    CB_EDIT_DATE, CB_EDIT_DIMENSIONS, CB_EDIT_MATERIAL, CB_EDIT_TITLE, CB_FINISH,
    CB_SET_START_IMAGE, CB_TOGGLE_AVAILABILITY,
};

/// The month selection, or `None` when the callback is not a month button.
/// `Some(None)` is the explicit "no month" choice.
fn parse_month_callback(data: &str) -> Option<Option<String>> {
    let rest = data.strip_prefix("month_")?;
    if rest == "none" {
        return Some(None);
    }
    let index: usize = rest.parse().ok()?;
    MONTHS.get(index).map(|month| Some(month.to_string()))
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: GalleryDialogue,
    store: Arc<GalleryStore>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "received callback query");

    let data = q.data.clone().unwrap_or_default();
    if let Some(msg) = &q.message {
        let chat_id = msg.chat().id;
        let message_id = msg.id();

        match dialogue.get().await? {
            Some(GalleryDialogueState::AwaitingMonth {
                photo_path,
                title,
                material,
            }) => {
                if let Some(month) = parse_month_callback(&data) {
                    bot.edit_message_text(
                        chat_id,
                        message_id,
                        messages::month_saved_ask_year(month.as_deref()),
                    )
                    .await?;
                    dialogue
                        .update(GalleryDialogueState::AwaitingYear {
                            photo_path,
                            title,
                            material,
                            month,
                        })
                        .await?;
                }
            }
            Some(GalleryDialogueState::AwaitingEditMonth { listing, selected }) => {
                if let Some(month) = parse_month_callback(&data) {
                    bot.edit_message_text(
                        chat_id,
                        message_id,
                        messages::month_saved_ask_year(month.as_deref()),
                    )
                    .await?;
                    dialogue
                        .update(GalleryDialogueState::AwaitingEditYear {
                            listing,
                            selected,
                            month,
                        })
                        .await?;
                }
            }
            Some(GalleryDialogueState::SelectingArtwork { listing }) => {
                handle_artwork_selection(&bot, chat_id, message_id, &dialogue, listing, &data)
                    .await?;
            }
            Some(GalleryDialogueState::EditingArtwork { listing, selected }) => {
                handle_edit_menu_action(
                    &bot, chat_id, message_id, dialogue, &store, listing, selected, &data,
                )
                .await?;
            }
            _ => {
                // Ignore callbacks for other states
            }
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

async fn handle_artwork_selection(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &GalleryDialogue,
    listing: Vec<String>,
    data: &str,
) -> Result<()> {
    let Some(index) = data
        .strip_prefix("select_")
        .and_then(|raw| raw.parse::<usize>().ok())
    else {
        return Ok(());
    };
    let Some(name) = listing.get(index) else {
        bot.send_message(chat_id, messages::STALE_SELECTION).await?;
        return Ok(());
    };

    match ArtworkName::decode(name) {
        Ok(artwork) => {
            bot.edit_message_text(chat_id, message_id, format_artwork_summary(&artwork))
                .reply_markup(create_edit_menu_keyboard(&artwork))
                .await?;
            dialogue
                .update(GalleryDialogueState::EditingArtwork {
                    listing,
                    selected: index,
                })
                .await?;
        }
        Err(err) => {
            warn!(file = %name, error = %err, "selected filename does not decode");
            bot.send_message(chat_id, messages::FILENAME_FORMAT_ERROR)
                .await?;
            // The selection menu stays open; the user may pick another entry.
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_edit_menu_action(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: GalleryDialogue,
    store: &GalleryStore,
    listing: Vec<String>,
    selected: usize,
    data: &str,
) -> Result<()> {
    match data {
        CB_EDIT_TITLE => {
            bot.send_message(chat_id, messages::ASK_NEW_TITLE).await?;
            dialogue
                .update(GalleryDialogueState::AwaitingEditValue {
                    listing,
                    selected,
                    field: EditField::Title,
                })
                .await?;
        }
        CB_EDIT_MATERIAL => {
            bot.send_message(chat_id, messages::ASK_NEW_MATERIAL).await?;
            dialogue
                .update(GalleryDialogueState::AwaitingEditValue {
                    listing,
                    selected,
                    field: EditField::Material,
                })
                .await?;
        }
        CB_EDIT_DIMENSIONS => {
            bot.send_message(chat_id, messages::ASK_NEW_DIMENSIONS).await?;
            dialogue
                .update(GalleryDialogueState::AwaitingEditValue {
                    listing,
                    selected,
                    field: EditField::Dimensions,
                })
                .await?;
        }
        CB_EDIT_DATE => {
            bot.send_message(chat_id, messages::ASK_NEW_MONTH)
                .reply_markup(create_month_keyboard())
                .await?;
            dialogue
                .update(GalleryDialogueState::AwaitingEditMonth { listing, selected })
                .await?;
        }
        CB_TOGGLE_AVAILABILITY => {
            let Some(current) = listing.get(selected) else {
                bot.send_message(chat_id, messages::STALE_SELECTION).await?;
                dialogue.exit().await?;
                return Ok(());
            };
            match ArtworkName::decode(current) {
                Ok(artwork) => {
                    let edit = FieldEdit::Availability(!artwork.available);
                    apply_edit(
                        bot,
                        chat_id,
                        Some(message_id),
                        dialogue,
                        store,
                        listing,
                        selected,
                        edit,
                    )
                    .await?;
                }
                Err(err) => {
                    warn!(file = %current, error = %err, "cannot toggle availability");
                    bot.send_message(chat_id, messages::FILENAME_FORMAT_ERROR)
                        .await?;
                }
            }
        }
        CB_SET_START_IMAGE => {
            apply_set_start_image(
                bot,
                chat_id,
                Some(message_id),
                dialogue,
                store,
                listing,
                selected,
            )
            .await?;
        }
        CB_DELETE => {
            let Some(name) = listing.get(selected) else {
                bot.send_message(chat_id, messages::STALE_SELECTION).await?;
                dialogue.exit().await?;
                return Ok(());
            };
            let prompt = messages::delete_confirm_prompt(listing_label(name));
            bot.send_message(chat_id, prompt).await?;
            dialogue
                .update(GalleryDialogueState::ConfirmingDelete { listing, selected })
                .await?;
        }
        CB_FINISH => {
            bot.edit_message_text(chat_id, message_id, messages::EDIT_FINISHED)
                .await?;
            dialogue.exit().await?;
        }
        _ => {}
    }
    Ok(())
}
