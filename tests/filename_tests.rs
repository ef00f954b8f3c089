//! # Filename Codec Tests
//!
//! The filename is the database: these tests pin down the canonical schema
//! and the decoder's tolerance for the flag tail.

use galeriebot::filename::{edited_name, listing_label, ArtworkName, FieldEdit, FilenameError};

fn artwork(
    title: &str,
    material: &str,
    month: Option<&str>,
    year: &str,
    dimensions: &str,
) -> ArtworkName {
    ArtworkName::new(
        title.to_string(),
        material.to_string(),
        month.map(str::to_string),
        year.to_string(),
        dimensions.to_string(),
    )
}

/// The upload scenario: title, material, month, year, dimensions.
#[test]
fn test_upload_scenario_filename() {
    let name = artwork("Sunset", "Öl", Some("März"), "2024", "40x60");
    assert_eq!(name.encode(), "Sunset_Öl_März-2024_40x60.jpg");
}

#[test]
fn test_encode_decode_identity_on_accepted_inputs() {
    let samples = [
        artwork("Sunset", "Öl", Some("März"), "2024", "40x60"),
        artwork("Abendrot", "Acryl", None, "1999", "120x80"),
        artwork("Stille Wasser", "Öl auf Leinwand", Some("Dezember"), "2020", "30x30"),
    ];
    for sample in samples {
        let encoded = sample.encode();
        assert_eq!(ArtworkName::decode(&encoded).unwrap(), sample, "{encoded}");
    }
}

#[test]
fn test_flags_roundtrip() {
    let mut name = artwork("Sunset", "Öl", Some("März"), "2024", "40x60");
    name.available = false;
    let encoded = name.encode();
    assert_eq!(encoded, "Sunset_Öl_März-2024_40x60_x.jpg");
    assert_eq!(ArtworkName::decode(&encoded).unwrap(), name);

    name.start_image = true;
    let encoded = name.encode();
    assert_eq!(encoded, "Sunset_Öl_März-2024_40x60_x_S.jpg");
    assert_eq!(ArtworkName::decode(&encoded).unwrap(), name);
}

/// Toggling the availability flag twice restores the exact original name.
#[test]
fn test_availability_toggle_is_idempotent() {
    let original = "Sunset_Öl_März-2024_40x60.jpg";
    let hidden = edited_name(original, FieldEdit::Availability(false)).unwrap();
    assert_eq!(hidden, "Sunset_Öl_März-2024_40x60_x.jpg");
    let restored = edited_name(&hidden, FieldEdit::Availability(true)).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_decoder_accepts_flags_in_either_order() {
    for encoded in [
        "Sunset_Öl_März-2024_40x60_x_S.jpg",
        "Sunset_Öl_März-2024_40x60_S_x.jpg",
    ] {
        let decoded = ArtworkName::decode(encoded).unwrap();
        assert!(!decoded.available);
        assert!(decoded.start_image);
    }
}

#[test]
fn test_decode_structural_errors() {
    // Too few fields
    assert!(matches!(
        ArtworkName::decode("Sunset_40x60.jpg"),
        Err(FilenameError::SegmentCount { found: 2, .. })
    ));
    // Too many fields that are not flags
    assert!(matches!(
        ArtworkName::decode("Sunset_Öl_März-2024_40x60_Rahmen.jpg"),
        Err(FilenameError::SegmentCount { found: 5, .. })
    ));
    // Date with too many parts
    assert!(matches!(
        ArtworkName::decode("Sunset_Öl_1-2-2024_40x60.jpg"),
        Err(FilenameError::MalformedDate { .. })
    ));
    // No extension at all
    assert!(matches!(
        ArtworkName::decode("Sunset_Öl_2024_40x60"),
        Err(FilenameError::MissingExtension(_))
    ));
}

#[test]
fn test_decode_rejects_empty_fields() {
    assert!(matches!(
        ArtworkName::decode("_Öl_2024_40x60.jpg"),
        Err(FilenameError::EmptyField { field: "title", .. })
    ));
}

#[test]
fn test_single_field_edits_leave_the_rest_alone() {
    let original = "Sunset_Öl_März-2024_40x60_S.jpg";

    let retitled = edited_name(original, FieldEdit::Title("Morgenrot".to_string())).unwrap();
    assert_eq!(retitled, "Morgenrot_Öl_März-2024_40x60_S.jpg");

    let redated = edited_name(
        original,
        FieldEdit::Date {
            month: None,
            year: "2023".to_string(),
        },
    )
    .unwrap();
    assert_eq!(redated, "Sunset_Öl_2023_40x60_S.jpg");

    let resized = edited_name(original, FieldEdit::Dimensions("50x70".to_string())).unwrap();
    assert_eq!(resized, "Sunset_Öl_März-2024_50x70_S.jpg");
}

#[test]
fn test_listing_label_is_title_prefix() {
    assert_eq!(listing_label("Sunset_Öl_März-2024_40x60.jpg"), "Sunset");
    assert_eq!(listing_label("Sunset_Öl_März-2024_40x60_x_S.jpg"), "Sunset");
    // Foreign files fall back to the stem
    assert_eq!(listing_label("index.html"), "index");
}
