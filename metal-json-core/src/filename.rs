//! Filenames for converted documents.

use chrono::{Local, NaiveDate};

use crate::contract::Mode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("mode label is empty")]
    EmptyMode,
}

/// `{L}_{YYYY-MM-DD}.json`, where `L` is the uppercased first letter of the
/// mode label.
pub fn dated_filename(mode_label: &str, date: NaiveDate) -> Result<String, FilenameError> {
    let first = mode_label
        .trim()
        .chars()
        .next()
        .ok_or(FilenameError::EmptyMode)?;
    let letter: String = first.to_uppercase().collect();
    Ok(format!("{letter}_{}.json", date.format("%Y-%m-%d")))
}

/// [`dated_filename`] for the current local date.
pub fn dated_filename_today(mode_label: &str) -> Result<String, FilenameError> {
    dated_filename(mode_label, Local::now().date_naive())
}

/// Name offered for a local download, e.g. `gold_prices.json`.
pub fn download_filename(mode: Mode) -> String {
    format!("{}_prices.json", mode.label().to_lowercase())
}

/// Default path of the document inside the remote repository.
pub fn default_remote_path(mode: Mode, date: NaiveDate) -> String {
    // Labels are never empty.
    let name = dated_filename(mode.label(), date).unwrap_or_default();
    format!("Folder/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn dated_filename_uses_first_letter_and_iso_date() {
        assert_eq!(dated_filename("Gold", march_5()).unwrap(), "G_2024-03-05.json");
        assert_eq!(dated_filename("Silver", march_5()).unwrap(), "S_2024-03-05.json");
        assert_eq!(dated_filename("gold", march_5()).unwrap(), "G_2024-03-05.json");
    }

    #[test]
    fn empty_mode_label_is_rejected() {
        assert_eq!(dated_filename("  ", march_5()), Err(FilenameError::EmptyMode));
    }

    #[test]
    fn today_matches_local_clock_shape() {
        let name = dated_filename_today("Silver").unwrap();
        assert!(name.starts_with("S_") && name.ends_with(".json"), "{name}");
        assert_eq!(name.len(), "S_2024-03-05.json".len());
    }

    #[test]
    fn download_and_remote_names() {
        assert_eq!(download_filename(Mode::Gold), "gold_prices.json");
        assert_eq!(download_filename(Mode::Silver), "silver_prices.json");
        assert_eq!(
            default_remote_path(Mode::Gold, march_5()),
            "Folder/G_2024-03-05.json"
        );
    }
}
