//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles incoming text, photo, and document messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats messages
//! - `dialogue_manager`: Manages dialogue state transitions and the finalize step

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::utils::command::BotCommands;

use crate::dialogue::GalleryDialogueState;

/// Commands recognized by the bot
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Diese Befehle werden unterstützt:")]
pub enum Command {
    #[command(description = "Begrüßung anzeigen.")]
    Start,
    #[command(description = "Hilfe anzeigen.")]
    Help,
    #[command(description = "Galerie auflisten und bearbeiten.")]
    List,
    #[command(description = "Alle Galeriedateien nach JPEG konvertieren.")]
    Convert,
    #[command(description = "Ausstehende Löschung bestätigen.")]
    Confirm,
    #[command(description = "Aktuellen Vorgang abbrechen.")]
    Cancel,
}

/// Build the dptree handler schema for the dispatcher.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<GalleryDialogueState>, GalleryDialogueState>()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(message_handler::command_handler),
        )
        .branch(dptree::endpoint(message_handler::message_handler));

    let callbacks = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, InMemStorage<GalleryDialogueState>, GalleryDialogueState>()
        .endpoint(callback_handler::callback_handler);

    dptree::entry().branch(messages).branch(callbacks)
}
