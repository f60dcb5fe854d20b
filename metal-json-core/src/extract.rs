//! Row extraction: find every `City ₹a ₹b ₹c` occurrence in pasted text.
//!
//! Anything that does not fit the four-field shape is simply not matched.
//! There is no warning for it; a malformed row looks the same as a city that
//! was never pasted.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::contract::RawRow;

/// City token followed by three sigil-prefixed amounts. `\p{Sc}` is any
/// Unicode currency symbol; whitespace may sit between sigil and digits.
const ROW_PATTERN: &str =
    r"(\w+)\s+(\p{Sc}\s*[\d,.]+)\s+(\p{Sc}\s*[\d,.]+)\s+(\p{Sc}\s*[\d,.]+)";

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ROW_PATTERN).expect("row pattern is a valid regex"));

/// Lazily yields every matching row in input order.
///
/// Matching is global and non-overlapping across the whole text, line breaks
/// included. Calling again on the same text restarts from the beginning.
pub fn extract_rows(text: &str) -> impl Iterator<Item = RawRow> + '_ {
    ROW_RE.captures_iter(text).map(|caps| {
        let row = RawRow {
            city: caps[1].to_string(),
            amounts: [caps[2].to_string(), caps[3].to_string(), caps[4].to_string()],
        };
        debug!(city = %row.city, amounts = ?row.amounts, "Matched price row");
        row
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLD_SAMPLE: &str = "
    Chennai ₹ 7,452 ₹ 6,831 ₹ 5,596
    Mumbai ₹ 7,403 ₹ 6,786 ₹ 5,553
    Delhi ₹ 7,418 ₹ 6,800 ₹ 5,564
    Kolkata ₹ 7,403 ₹ 6,786 ₹ 5,553
    ";

    #[test]
    fn extracts_every_row_in_input_order() {
        let cities: Vec<String> = extract_rows(GOLD_SAMPLE).map(|r| r.city).collect();
        assert_eq!(cities, ["Chennai", "Mumbai", "Delhi", "Kolkata"]);
    }

    #[test]
    fn amounts_keep_sigil_spacing_and_separators() {
        let row = extract_rows(GOLD_SAMPLE).next().expect("first row");
        assert_eq!(row.amounts, ["₹ 7,452", "₹ 6,831", "₹ 5,596"]);
    }

    #[test]
    fn rows_may_share_a_line_or_span_line_breaks() {
        let text = "Pune ₹1 ₹2 ₹3 Surat ₹4\n₹5\n\n   ₹6";
        let rows: Vec<RawRow> = extract_rows(text).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].city, "Surat");
        assert_eq!(rows[1].amounts, ["₹4", "₹5", "₹6"]);
    }

    #[test]
    fn decimals_are_kept() {
        let row = extract_rows("Chennai ₹ 977.50 ₹ 9,775 ₹ 97,750 ")
            .next()
            .expect("silver row");
        assert_eq!(row.amounts[0], "₹ 977.50");
        assert_eq!(row.amounts[2], "₹ 97,750");
    }

    #[test]
    fn short_and_unsigiled_rows_are_absent() {
        let text = "Chennai ₹ 7,452 ₹ 6,831\nMumbai 7,403 6,786 5,553\nDelhi ₹1 ₹2 ₹3";
        let rows: Vec<RawRow> = extract_rows(text).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "Delhi");
    }

    #[test]
    fn other_currency_symbols_match() {
        let row = extract_rows("Zurich $1,200.5 €1,100 £950").next().expect("row");
        assert_eq!(row.amounts, ["$1,200.5", "€1,100", "£950"]);
    }

    #[test]
    fn no_rows_in_unrelated_text() {
        assert_eq!(extract_rows("").count(), 0);
        assert_eq!(extract_rows("nothing to see here").count(), 0);
    }

    #[test]
    fn extraction_is_restartable() {
        let first: Vec<RawRow> = extract_rows(GOLD_SAMPLE).collect();
        let second: Vec<RawRow> = extract_rows(GOLD_SAMPLE).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn n_generated_rows_yield_n_matches() {
        for n in 0..6 {
            let text: String = (0..n)
                .map(|i| format!("City{i}  ₹{i},000\t₹{i}.5 ₹ {i}\n\n"))
                .collect();
            let rows: Vec<RawRow> = extract_rows(&text).collect();
            assert_eq!(rows.len(), n);
            for (i, row) in rows.iter().enumerate() {
                assert_eq!(row.city, format!("City{i}"));
            }
        }
    }
}
