//! Gallery dialogue module for handling conversation state with users.
//!
//! Each chat holds one [`GalleryDialogueState`]. The upload flow walks the
//! states in order, accumulating the collected fields in the variants, so a
//! later step cannot exist without its predecessors' data. The edit flow
//! carries the cached remote listing through its states.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;

/// Month names offered by the date keyboard, in calendar order
pub const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

const MAX_FIELD_LENGTH: usize = 100;
const MIN_PLAUSIBLE_YEAR: i32 = 1500;

lazy_static! {
    static ref YEAR_PATTERN: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref DIMENSIONS_PATTERN: Regex =
        Regex::new(r"^(\d{1,4})\s*[xX×]\s*(\d{1,4})$").unwrap();
}

/// Which single field an edit-flow value applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditField {
    Title,
    Material,
    Dimensions,
}

/// Represents the conversation state for the gallery dialogues
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum GalleryDialogueState {
    #[default]
    Idle,
    // Upload flow: a downloaded photo walks through the metadata steps.
    AwaitingTitle {
        photo_path: String,
    },
    AwaitingMaterial {
        photo_path: String,
        title: String,
    },
    AwaitingMonth {
        photo_path: String,
        title: String,
        material: String,
    },
    AwaitingYear {
        photo_path: String,
        title: String,
        material: String,
        month: Option<String>,
    },
    AwaitingDimensions {
        photo_path: String,
        title: String,
        material: String,
        month: Option<String>,
        year: String,
    },
    // Edit flow: operates on a cached snapshot of the remote listing.
    SelectingArtwork {
        listing: Vec<String>,
    },
    EditingArtwork {
        listing: Vec<String>,
        selected: usize,
    },
    AwaitingEditValue {
        listing: Vec<String>,
        selected: usize,
        field: EditField,
    },
    AwaitingEditMonth {
        listing: Vec<String>,
        selected: usize,
    },
    AwaitingEditYear {
        listing: Vec<String>,
        selected: usize,
        month: Option<String>,
    },
    ConfirmingDelete {
        listing: Vec<String>,
        selected: usize,
    },
}

impl GalleryDialogueState {
    /// Path of the in-flight local photo, if this state owns one.
    pub fn photo_path(&self) -> Option<&str> {
        match self {
            GalleryDialogueState::AwaitingTitle { photo_path }
            | GalleryDialogueState::AwaitingMaterial { photo_path, .. }
            | GalleryDialogueState::AwaitingMonth { photo_path, .. }
            | GalleryDialogueState::AwaitingYear { photo_path, .. }
            | GalleryDialogueState::AwaitingDimensions { photo_path, .. } => Some(photo_path),
            _ => None,
        }
    }
}

/// Type alias for our gallery dialogue
pub type GalleryDialogue = Dialogue<GalleryDialogueState, InMemStorage<GalleryDialogueState>>;

/// Validates a title or material input.
///
/// The field separator may not survive into the filename, so underscores are
/// normalized to hyphens rather than rejected.
pub fn validate_field(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.len() > MAX_FIELD_LENGTH {
        return Err("too_long");
    }

    Ok(trimmed.replace('_', "-"))
}

/// Validates a year input as a plausible four-digit year
pub fn validate_year(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if !YEAR_PATTERN.is_match(trimmed) {
        return Err("not_a_year");
    }

    let year: i32 = trimmed.parse().map_err(|_| "not_a_year")?;
    let current_year = chrono::Utc::now().year();
    if year < MIN_PLAUSIBLE_YEAR || year > current_year + 1 {
        return Err("implausible");
    }

    Ok(trimmed.to_string())
}

/// Validates dimensions input and returns the canonical `{w}x{h}` form
pub fn validate_dimensions(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    match DIMENSIONS_PATTERN.captures(trimmed) {
        Some(captures) => Ok(format!("{}x{}", &captures[1], &captures[2])),
        None => Err("format"),
    }
}
