use anyhow::Result;

use galeriebot::dialogue::{
    validate_dimensions, validate_field, validate_year, EditField, GalleryDialogueState, MONTHS,
};

/// Integration test for the upload-flow input validators
#[tokio::test]
async fn test_upload_input_validation() -> Result<()> {
    // Title and material share one validator
    assert_eq!(validate_field("  Sunset  ").unwrap(), "Sunset");
    assert!(validate_field("").is_err());
    assert!(validate_field("   ").is_err());
    assert!(validate_field(&"a".repeat(101)).is_err());

    // The separator cannot be allowed into a field
    assert_eq!(validate_field("Öl_auf_Leinwand").unwrap(), "Öl-auf-Leinwand");

    // Years must be plausible four-digit numbers
    assert_eq!(validate_year("2024").unwrap(), "2024");
    assert!(validate_year("202").is_err());
    assert!(validate_year("irgendwann").is_err());
    assert!(validate_year("3024").is_err());

    // Dimensions normalize to `{w}x{h}`
    assert_eq!(validate_dimensions("40 x 60").unwrap(), "40x60");
    assert_eq!(validate_dimensions("40X60").unwrap(), "40x60");
    assert!(validate_dimensions("40cm").is_err());

    Ok(())
}

/// Test that dialogue states serialize for the dialogue storage
#[tokio::test]
async fn test_dialogue_state_serialization() -> Result<()> {
    let state = GalleryDialogueState::AwaitingDimensions {
        photo_path: "./downloads/artwork-1.img".to_string(),
        title: "Sunset".to_string(),
        material: "Öl".to_string(),
        month: Some("März".to_string()),
        year: "2024".to_string(),
    };

    let json = serde_json::to_string(&state)?;
    let restored: GalleryDialogueState = serde_json::from_str(&json)?;

    match restored {
        GalleryDialogueState::AwaitingDimensions { title, month, year, .. } => {
            assert_eq!(title, "Sunset");
            assert_eq!(month.as_deref(), Some("März"));
            assert_eq!(year, "2024");
        }
        other => panic!("unexpected dialogue state: {other:?}"),
    }

    Ok(())
}

/// Test basic dialogue state functionality
#[tokio::test]
async fn test_dialogue_state_defaults() -> Result<()> {
    let default_state = GalleryDialogueState::default();
    assert!(matches!(default_state, GalleryDialogueState::Idle));
    assert_eq!(default_state.photo_path(), None);

    Ok(())
}

/// Only the upload-flow states own a local photo
#[test]
fn test_photo_path_accessor() {
    let upload_state = GalleryDialogueState::AwaitingTitle {
        photo_path: "./downloads/artwork-2.img".to_string(),
    };
    assert_eq!(upload_state.photo_path(), Some("./downloads/artwork-2.img"));

    let edit_state = GalleryDialogueState::SelectingArtwork {
        listing: vec!["Sunset_Öl_2024_40x60.jpg".to_string()],
    };
    assert_eq!(edit_state.photo_path(), None);
}

/// The month table drives the date keyboard and callback parsing
#[test]
fn test_month_table() {
    assert_eq!(MONTHS.len(), 12);
    assert_eq!(MONTHS[0], "Januar");
    assert_eq!(MONTHS[2], "März");
    assert_eq!(MONTHS[11], "Dezember");
    // Month names must not collide with the filename separators
    assert!(MONTHS.iter().all(|month| !month.contains(['_', '-'])));
}

/// EditField serializes alongside the dialogue state
#[test]
fn test_edit_field_serialization() {
    let state = GalleryDialogueState::AwaitingEditValue {
        listing: vec!["Sunset_Öl_2024_40x60.jpg".to_string()],
        selected: 0,
        field: EditField::Dimensions,
    };
    let json = serde_json::to_string(&state).unwrap();
    let restored: GalleryDialogueState = serde_json::from_str(&json).unwrap();
    match restored {
        GalleryDialogueState::AwaitingEditValue { field, selected, .. } => {
            assert_eq!(field, EditField::Dimensions);
            assert_eq!(selected, 0);
        }
        other => panic!("unexpected dialogue state: {other:?}"),
    }
}
