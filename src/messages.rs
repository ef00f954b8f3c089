//! User-facing message texts.
//!
//! The bot speaks German, like the gallery it manages. Keeping every string
//! here keeps the handlers readable and the wording consistent.

use crate::store_errors::StoreError;

// Greeting and help
pub const GREETING: &str = "Hallo! Sende mir ein Bild, um es in die Galerie hochzuladen.";
pub const HELP_FOOTER: &str = "Sende ein Foto, um den Upload zu starten. Ich frage dann \
nacheinander Titel, Material, Datum und Maße ab. Mit /list kannst du vorhandene Bilder \
bearbeiten, mit /cancel brichst du den aktuellen Vorgang ab.";

// Generic hints
pub const SEND_PHOTO_FIRST: &str = "Bitte sende zuerst ein Bild.";
pub const USE_BUTTONS: &str = "Bitte benutze die Schaltflächen unter der Nachricht.";
pub const UNSUPPORTED_MESSAGE: &str =
    "Damit kann ich nichts anfangen. Sende mir ein Bild oder benutze /help.";
pub const NOT_AUTHORIZED: &str = "⛔ Du bist nicht berechtigt, diesen Befehl zu verwenden.";
pub const BUSY_WITH_UPLOAD: &str =
    "Es ist bereits ein Bild in Bearbeitung. Schließe die Eingaben ab oder sende /cancel.";
pub const BUSY_WITH_EDIT: &str =
    "Du bearbeitest gerade die Galerie. Beende die Bearbeitung oder sende /cancel.";

// Upload flow
pub const DOWNLOADING_IMAGE: &str = "📥 Herunterladen des Bildes...";
pub const DOWNLOAD_FAILED: &str =
    "❌ Fehler beim Herunterladen des Bildes. Bitte versuche es erneut.";
pub const IMAGE_RECEIVED_ASK_TITLE: &str =
    "✅ Bild empfangen! Bitte sende jetzt den Titel des Bildes.";
pub const TITLE_SAVED_ASK_MATERIAL: &str = "Titel gespeichert. Sende jetzt das Material.";
pub const MATERIAL_SAVED_ASK_MONTH: &str = "Material gespeichert. Wähle den Monat aus:";
pub const YEAR_SAVED_ASK_DIMENSIONS: &str =
    "Jahr gespeichert. Sende die Maße (Breite x Höhe), z. B. 40x60.";
pub const FIELD_EMPTY: &str = "⚠️ Die Eingabe darf nicht leer sein. Bitte versuche es erneut.";
pub const FIELD_TOO_LONG: &str = "⚠️ Die Eingabe ist zu lang. Bitte kürze sie.";
pub const YEAR_INVALID: &str =
    "⚠️ Ungültiges Jahr. Bitte sende eine vierstellige Jahreszahl, z. B. 2024.";
pub const DIMENSIONS_INVALID: &str =
    "⚠️ Ungültige Maße. Bitte sende sie im Format Breite x Höhe, z. B. 40x60.";
pub const UPLOAD_FAILED_LOCAL: &str =
    "❌ Das Bild konnte lokal nicht verarbeitet werden. Bitte sende es erneut.";

pub fn month_saved_ask_year(month: Option<&str>) -> String {
    match month {
        Some(month) => format!("Monat {month} gespeichert. Sende jetzt das Jahr."),
        None => "Kein Monat gewählt. Sende jetzt das Jahr.".to_string(),
    }
}

pub fn upload_success(remote_name: &str) -> String {
    format!("✅ Hochgeladen: {remote_name}")
}

// Edit flow
pub const LIST_EMPTY: &str = "Die Galerie ist noch leer.";
pub const CHOOSE_ARTWORK: &str = "Wähle ein Bild aus:";
pub const FILENAME_FORMAT_ERROR: &str =
    "⚠️ Der Dateiname hat ein unerwartetes Format und kann nicht bearbeitet werden.";
pub const STALE_SELECTION: &str =
    "⚠️ Die Auswahl ist nicht mehr gültig. Bitte rufe /list erneut auf.";
pub const ASK_NEW_TITLE: &str = "Sende den neuen Titel.";
pub const ASK_NEW_MATERIAL: &str = "Sende das neue Material.";
pub const ASK_NEW_DIMENSIONS: &str = "Sende die neuen Maße (Breite x Höhe).";
pub const ASK_NEW_MONTH: &str = "Wähle den neuen Monat aus:";
pub const NO_CHANGE: &str = "Keine Änderung, der Wert ist bereits gesetzt.";
pub const EDIT_FINISHED: &str = "Bearbeitung beendet.";
pub const START_IMAGE_SET: &str = "⭐ Das Bild ist jetzt das Startbild der Galerie.";
pub const NOTHING_TO_CONFIRM: &str = "Es gibt nichts zu bestätigen.";
pub const CONFIRM_HINT: &str = "Sende /confirm zum Bestätigen oder /cancel zum Abbrechen.";
pub const DELETE_DONE: &str = "🗑️ Das Bild wurde gelöscht.";

pub fn renamed_to(remote_name: &str) -> String {
    format!("✅ Gespeichert: {remote_name}")
}

pub fn delete_confirm_prompt(label: &str) -> String {
    format!("Soll \"{label}\" wirklich gelöscht werden? Sende /confirm zum Bestätigen oder /cancel zum Abbrechen.")
}

// Cancel
pub const CANCELLED: &str = "Abgebrochen. Alle Eingaben wurden verworfen.";
pub const NOTHING_TO_CANCEL: &str = "Es läuft gerade kein Vorgang.";

// Convert command
pub const CONVERT_STARTED: &str = "🔁 Konvertiere die Galerie nach JPEG...";
pub const CONVERT_NOTHING: &str = "Alle Dateien liegen bereits als JPEG vor.";

pub fn convert_summary(converted: usize, skipped: usize, failed: usize) -> String {
    format!("Konvertierung abgeschlossen: {converted} konvertiert, {skipped} übersprungen, {failed} fehlgeschlagen.")
}

/// Failure text for a store error, by kind.
///
/// Every failure is visible in the chat; the kind only changes the wording,
/// never the retry behavior (the user re-triggers the action).
pub fn store_failure(err: &StoreError) -> String {
    match err {
        StoreError::Connect(_) | StoreError::Io(_) => {
            "❌ Der Galerie-Server ist gerade nicht erreichbar. Bitte versuche es später erneut."
                .to_string()
        }
        StoreError::Auth(_) => {
            "❌ Anmeldung am Galerie-Server fehlgeschlagen. Bitte prüfe die Zugangsdaten."
                .to_string()
        }
        StoreError::NotFound(_) => {
            "⚠️ Die Datei existiert auf dem Server nicht mehr. Bitte rufe /list erneut auf."
                .to_string()
        }
        StoreError::Rejected(_) => {
            "❌ Der Galerie-Server hat die Aktion abgelehnt.".to_string()
        }
        StoreError::Timeout(_) => {
            "❌ Der Galerie-Server antwortet nicht. Bitte versuche es später erneut.".to_string()
        }
    }
}
