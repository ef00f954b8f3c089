//! # Filename Codec Module
//!
//! The gallery keeps all artwork metadata in the filename itself:
//!
//! ```text
//! {title}_{material}_{month-year}_{width}x{height}[_x][_S].jpg
//! ```
//!
//! `_x` marks an artwork as not available, `_S` marks the gallery's start
//! image. The month is optional; without one the date segment is just the
//! year. Decoding splits positionally on `_`, so the input validators must
//! keep the separator out of the individual fields.

use serde::{Deserialize, Serialize};

pub const FIELD_SEPARATOR: char = '_';
pub const DATE_SEPARATOR: char = '-';
pub const UNAVAILABLE_FLAG: &str = "x";
pub const START_IMAGE_FLAG: &str = "S";
pub const FILE_EXTENSION: &str = "jpg";

/// Structural errors from decoding a gallery filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Name has no extension
    MissingExtension(String),
    /// Name does not split into the expected number of fields
    SegmentCount { name: String, found: usize },
    /// A required field is empty
    EmptyField { name: String, field: &'static str },
    /// The date segment is neither `year` nor `month-year`
    MalformedDate { name: String, date: String },
}

impl std::fmt::Display for FilenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilenameError::MissingExtension(name) => {
                write!(f, "no file extension in '{name}'")
            }
            FilenameError::SegmentCount { name, found } => {
                write!(f, "expected 4 metadata fields in '{name}', found {found}")
            }
            FilenameError::EmptyField { name, field } => {
                write!(f, "empty {field} field in '{name}'")
            }
            FilenameError::MalformedDate { name, date } => {
                write!(f, "malformed date segment '{date}' in '{name}'")
            }
        }
    }
}

impl std::error::Error for FilenameError {}

/// A gallery filename, parsed into its metadata fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkName {
    pub title: String,
    pub material: String,
    /// German month name; `None` when only the year is known
    pub month: Option<String>,
    pub year: String,
    /// Canonical `{width}x{height}` form
    pub dimensions: String,
    pub available: bool,
    pub start_image: bool,
}

/// A single-field metadata change applied through a remote rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    Material(String),
    Date { month: Option<String>, year: String },
    Dimensions(String),
    Availability(bool),
    StartImage(bool),
}

impl ArtworkName {
    /// A freshly uploaded artwork: available, not the start image.
    pub fn new(
        title: String,
        material: String,
        month: Option<String>,
        year: String,
        dimensions: String,
    ) -> Self {
        Self {
            title,
            material,
            month,
            year,
            dimensions,
            available: true,
            start_image: false,
        }
    }

    /// The date segment: `März-2024`, or `2024` without a month.
    pub fn date_segment(&self) -> String {
        match &self.month {
            Some(month) => format!("{month}{DATE_SEPARATOR}{}", self.year),
            None => self.year.clone(),
        }
    }

    /// Human-readable date for menus: `März 2024`, or `2024`.
    pub fn date_display(&self) -> String {
        match &self.month {
            Some(month) => format!("{month} {}", self.year),
            None => self.year.clone(),
        }
    }

    pub fn encode(&self) -> String {
        let mut name = format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.title,
            self.material,
            self.date_segment(),
            self.dimensions,
            sep = FIELD_SEPARATOR,
        );
        if !self.available {
            name.push(FIELD_SEPARATOR);
            name.push_str(UNAVAILABLE_FLAG);
        }
        if self.start_image {
            name.push(FIELD_SEPARATOR);
            name.push_str(START_IMAGE_FLAG);
        }
        name.push('.');
        name.push_str(FILE_EXTENSION);
        name
    }

    /// Parse a gallery filename back into its fields.
    ///
    /// Flag segments are peeled off the tail in either order; what remains
    /// must be exactly the four positional fields.
    pub fn decode(file_name: &str) -> Result<Self, FilenameError> {
        let (base, _extension) = file_name
            .rsplit_once('.')
            .ok_or_else(|| FilenameError::MissingExtension(file_name.to_string()))?;

        let mut segments: Vec<&str> = base.split(FIELD_SEPARATOR).collect();
        let mut available = true;
        let mut start_image = false;
        while segments.len() > 4 {
            match segments.last().copied() {
                Some(UNAVAILABLE_FLAG) if available => {
                    available = false;
                    segments.pop();
                }
                Some(START_IMAGE_FLAG) if !start_image => {
                    start_image = true;
                    segments.pop();
                }
                _ => break,
            }
        }
        if segments.len() != 4 {
            return Err(FilenameError::SegmentCount {
                name: file_name.to_string(),
                found: segments.len(),
            });
        }

        let (title, material, date, dimensions) =
            (segments[0], segments[1], segments[2], segments[3]);
        for (field, value) in [
            ("title", title),
            ("material", material),
            ("date", date),
            ("dimensions", dimensions),
        ] {
            if value.is_empty() {
                return Err(FilenameError::EmptyField {
                    name: file_name.to_string(),
                    field,
                });
            }
        }

        let date_parts: Vec<&str> = date.split(DATE_SEPARATOR).collect();
        let (month, year) = match date_parts.as_slice() {
            [year] => (None, *year),
            [month, year] if !month.is_empty() && !year.is_empty() => (Some(*month), *year),
            _ => {
                return Err(FilenameError::MalformedDate {
                    name: file_name.to_string(),
                    date: date.to_string(),
                })
            }
        };

        Ok(Self {
            title: title.to_string(),
            material: material.to_string(),
            month: month.map(str::to_string),
            year: year.to_string(),
            dimensions: dimensions.to_string(),
            available,
            start_image,
        })
    }

    /// Replace one field, leaving the rest untouched.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Title(title) => self.title = title,
            FieldEdit::Material(material) => self.material = material,
            FieldEdit::Date { month, year } => {
                self.month = month;
                self.year = year;
            }
            FieldEdit::Dimensions(dimensions) => self.dimensions = dimensions,
            FieldEdit::Availability(available) => self.available = available,
            FieldEdit::StartImage(start_image) => self.start_image = start_image,
        }
    }
}

/// Decode, apply a single edit, and re-encode a gallery filename.
pub fn edited_name(current: &str, edit: FieldEdit) -> Result<String, FilenameError> {
    let mut artwork = ArtworkName::decode(current)?;
    artwork.apply(edit);
    Ok(artwork.encode())
}

/// Short label for listing menus: the part before the first separator.
pub fn listing_label(file_name: &str) -> &str {
    let base = file_name
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(file_name);
    base.split(FIELD_SEPARATOR).next().unwrap_or(base)
}
