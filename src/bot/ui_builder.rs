//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::dialogue::MONTHS;
use crate::filename::{listing_label, ArtworkName};

const MAX_BUTTON_LABEL: usize = 24;

// Callback data for the edit menu
pub const CB_EDIT_TITLE: &str = "edit_title";
pub const CB_EDIT_MATERIAL: &str = "edit_material";
pub const CB_EDIT_DATE: &str = "edit_date";
pub const CB_EDIT_DIMENSIONS: &str = "edit_dims";
pub const CB_TOGGLE_AVAILABILITY: &str = "toggle_avail";
pub const CB_SET_START_IMAGE: &str = "set_start";
pub const CB_DELETE: &str = "delete_artwork";
pub const CB_FINISH: &str = "finish_edit";

/// Create the inline keyboard of the twelve months plus "no month"
pub fn create_month_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = MONTHS
        .chunks(3)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, month)| {
                    InlineKeyboardButton::callback(
                        month.to_string(),
                        format!("month_{}", row * 3 + col),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "Kein Monat".to_string(),
        "month_none".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// Create the selection keyboard for a remote listing, one entry per row
pub fn create_artwork_list_keyboard(listing: &[String]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = listing
        .iter()
        .enumerate()
        .map(|(index, name)| {
            vec![InlineKeyboardButton::callback(
                truncate_label(listing_label(name)),
                format!("select_{index}"),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(buttons)
}

/// Create the per-field edit menu for one artwork
pub fn create_edit_menu_keyboard(artwork: &ArtworkName) -> InlineKeyboardMarkup {
    let availability_label = if artwork.available {
        "🚫 Als nicht verfügbar markieren"
    } else {
        "✅ Als verfügbar markieren"
    };
    let rows = vec![
        vec![
            InlineKeyboardButton::callback("✏️ Titel".to_string(), CB_EDIT_TITLE.to_string()),
            InlineKeyboardButton::callback(
                "🎨 Material".to_string(),
                CB_EDIT_MATERIAL.to_string(),
            ),
        ],
        vec![
            InlineKeyboardButton::callback("📅 Datum".to_string(), CB_EDIT_DATE.to_string()),
            InlineKeyboardButton::callback(
                "📐 Maße".to_string(),
                CB_EDIT_DIMENSIONS.to_string(),
            ),
        ],
        vec![InlineKeyboardButton::callback(
            availability_label.to_string(),
            CB_TOGGLE_AVAILABILITY.to_string(),
        )],
        vec![InlineKeyboardButton::callback(
            "⭐ Als Startbild setzen".to_string(),
            CB_SET_START_IMAGE.to_string(),
        )],
        vec![
            InlineKeyboardButton::callback("🗑️ Löschen".to_string(), CB_DELETE.to_string()),
            InlineKeyboardButton::callback("✅ Fertig".to_string(), CB_FINISH.to_string()),
        ],
    ];
    InlineKeyboardMarkup::new(rows)
}

/// Format the edit menu header for one artwork
pub fn format_artwork_summary(artwork: &ArtworkName) -> String {
    format!(
        "🖼️ {}\nMaterial: {}\nDatum: {}\nMaße: {}\nVerfügbar: {}\nStartbild: {}\n\nWas möchtest du ändern?",
        artwork.title,
        artwork.material,
        artwork.date_display(),
        artwork.dimensions,
        if artwork.available { "Ja" } else { "Nein" },
        if artwork.start_image { "Ja" } else { "Nein" },
    )
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_BUTTON_LABEL {
        let truncated: String = label.chars().take(MAX_BUTTON_LABEL - 1).collect();
        format!("{truncated}…")
    } else {
        label.to_string()
    }
}
