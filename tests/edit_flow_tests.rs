//! # Edit Flow Tests
//!
//! Rename planning for the edit mode: field replacement through the codec
//! and the start-image uniqueness invariant.

use galeriebot::bot::dialogue_manager::set_start_image_renames;
use galeriebot::filename::{edited_name, ArtworkName, FieldEdit};

fn listing(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_set_start_image_moves_the_flag() {
    let listing = listing(&[
        "Abendrot_Acryl_2020_30x30_S.jpg",
        "Sunset_Öl_März-2024_40x60.jpg",
    ]);

    let plan = set_start_image_renames(&listing, 1).unwrap();

    // The old holder is cleared before the new one is set.
    assert_eq!(
        plan,
        vec![
            (
                "Abendrot_Acryl_2020_30x30_S.jpg".to_string(),
                "Abendrot_Acryl_2020_30x30.jpg".to_string()
            ),
            (
                "Sunset_Öl_März-2024_40x60.jpg".to_string(),
                "Sunset_Öl_März-2024_40x60_S.jpg".to_string()
            ),
        ]
    );
}

/// After applying the plan, exactly one entry carries the flag.
#[test]
fn test_start_image_is_unique_after_plan() {
    let mut names = listing(&[
        "Abendrot_Acryl_2020_30x30_S.jpg",
        "Sunset_Öl_März-2024_40x60.jpg",
        "Welle_Acryl_2021_50x70_x.jpg",
    ]);

    let plan = set_start_image_renames(&names, 2).unwrap();
    for (from, to) in plan {
        let entry = names.iter_mut().find(|entry| **entry == from).unwrap();
        *entry = to;
    }

    let holders = names
        .iter()
        .filter(|name| ArtworkName::decode(name).map(|a| a.start_image).unwrap_or(false))
        .count();
    assert_eq!(holders, 1);
    // The availability flag of the new holder survived the edit.
    assert_eq!(names[2], "Welle_Acryl_2021_50x70_x_S.jpg");
}

#[test]
fn test_set_start_image_is_noop_when_already_set() {
    let listing = listing(&[
        "Abendrot_Acryl_2020_30x30_S.jpg",
        "Sunset_Öl_März-2024_40x60.jpg",
    ]);
    assert!(set_start_image_renames(&listing, 0).unwrap().is_empty());
}

/// Foreign files in the gallery directory cannot carry the flag and are
/// passed over when planning.
#[test]
fn test_set_start_image_skips_undecodable_entries() {
    let listing = listing(&["index.html", "Sunset_Öl_März-2024_40x60.jpg"]);
    let plan = set_start_image_renames(&listing, 1).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].0, "Sunset_Öl_März-2024_40x60.jpg");
}

#[test]
fn test_set_start_image_fails_on_undecodable_selection() {
    let listing = listing(&["index.html", "Sunset_Öl_März-2024_40x60.jpg"]);
    assert!(set_start_image_renames(&listing, 0).is_err());
}

/// The availability edit scenario: hide, then restore.
#[test]
fn test_availability_edit_scenario() {
    let original = "Sunset_Öl_März-2024_40x60.jpg";

    let hidden = edited_name(original, FieldEdit::Availability(false)).unwrap();
    assert_eq!(hidden, "Sunset_Öl_März-2024_40x60_x.jpg");

    let restored = edited_name(&hidden, FieldEdit::Availability(true)).unwrap();
    assert_eq!(restored, original);
}

/// Consecutive edits compose when each one updates the cached snapshot entry.
#[test]
fn test_consecutive_edits_compose() {
    let mut snapshot = listing(&["Sunset_Öl_März-2024_40x60.jpg"]);

    let renamed = edited_name(&snapshot[0], FieldEdit::Title("Morgenrot".to_string())).unwrap();
    snapshot[0] = renamed;

    let renamed = edited_name(&snapshot[0], FieldEdit::Material("Acryl".to_string())).unwrap();
    snapshot[0] = renamed;

    let renamed = edited_name(
        &snapshot[0],
        FieldEdit::Date {
            month: Some("Mai".to_string()),
            year: "2025".to_string(),
        },
    )
    .unwrap();
    snapshot[0] = renamed;

    assert_eq!(snapshot[0], "Morgenrot_Acryl_Mai-2025_40x60.jpg");
}
