//! Record building and the `convert` entry point.
//!
//! `convert` runs the whole text → [`Document`] pipeline: extract rows, map
//! each one into the mode's record shape, collect. Rows that fail to build
//! are skipped with a [`ConvertWarning`]; they never abort the conversion.

use tracing::{debug, info, warn};

use crate::contract::{Amount, Document, GoldRecord, Mode, PriceRecord, RawRow, SilverRecord};
use crate::extract::extract_rows;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("amount #{position} for {city} is empty")]
    EmptyAmount { city: String, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("no price data was provided; paste some data before converting")]
    EmptyInput,
}

/// Non-fatal issue found while converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertWarning {
    /// A matched row could not be turned into a record.
    SkippedRow {
        city: String,
        amounts: [String; 3],
        reason: BuildError,
    },
}

impl std::fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertWarning::SkippedRow {
                city,
                amounts,
                reason,
            } => write!(
                f,
                "Skipping invalid data for city: {city}, prices: {}, {}, {} ({reason})",
                amounts[0], amounts[1], amounts[2]
            ),
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub document: Document,
    pub warnings: Vec<ConvertWarning>,
}

fn amount(row: &RawRow, position: usize) -> Result<Amount, BuildError> {
    let trimmed = row.amounts[position].trim();
    if trimmed.is_empty() {
        return Err(BuildError::EmptyAmount {
            city: row.city.clone(),
            position: position + 1,
        });
    }
    Ok(Amount::new(trimmed))
}

fn build_gold(row: &RawRow) -> Result<GoldRecord, BuildError> {
    Ok(GoldRecord {
        city: row.city.clone(),
        k22: amount(row, 0)?,
        k24: amount(row, 1)?,
        k18: amount(row, 2)?,
    })
}

fn build_silver(row: &RawRow) -> Result<SilverRecord, BuildError> {
    Ok(SilverRecord {
        city: row.city.clone(),
        gram_10: amount(row, 0)?,
        gram_100: amount(row, 1)?,
        kg_1: amount(row, 2)?,
    })
}

/// Map one row into the record shape for `mode`.
///
/// Gold tables list the 22K price before the 24K one, so the first two
/// amounts are swapped into their labelled fields. Silver keeps input order.
pub fn build_record(row: &RawRow, mode: Mode) -> Result<PriceRecord, BuildError> {
    match mode {
        Mode::Gold => build_gold(row).map(PriceRecord::Gold),
        Mode::Silver => build_silver(row).map(PriceRecord::Silver),
    }
}

/// Build a record for every extracted row, skipping the ones that fail.
fn collect_records<R>(
    text: &str,
    build: fn(&RawRow) -> Result<R, BuildError>,
    warnings: &mut Vec<ConvertWarning>,
) -> Vec<R> {
    let mut records = Vec::new();
    for row in extract_rows(text) {
        match build(&row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(city = %row.city, error = %reason, "Skipping row that could not be built");
                warnings.push(ConvertWarning::SkippedRow {
                    city: row.city,
                    amounts: row.amounts,
                    reason,
                });
            }
        }
    }
    records
}

/// Convert pasted text into a document for `mode`.
///
/// Text with no matching rows gives an empty document and no warning.
pub fn convert(text: &str, mode: Mode) -> Result<Conversion, ConvertError> {
    if text.trim().is_empty() {
        warn!(%mode, "Conversion requested without any input");
        return Err(ConvertError::EmptyInput);
    }

    let mut warnings = Vec::new();
    let document = match mode {
        Mode::Gold => Document::Gold {
            gold_prices: collect_records(text, build_gold, &mut warnings),
        },
        Mode::Silver => Document::Silver {
            silver_rates: collect_records(text, build_silver, &mut warnings),
        },
    };

    if document.is_empty() && warnings.is_empty() {
        debug!(%mode, "No rows matched in the provided text");
    }

    info!(
        %mode,
        records = document.len(),
        skipped = warnings.len(),
        "Conversion completed"
    );
    Ok(Conversion { document, warnings })
}
