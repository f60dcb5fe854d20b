//! Document assembly and its canonical JSON form.
//!
//! The canonical form is `serde_json`'s pretty printer: two-space indent,
//! keys in struct declaration order, non-ASCII written as-is (no `\u` escapes).
//! Serializing the same document twice gives identical bytes.

use crate::contract::{Document, Mode};

impl Document {
    pub fn empty(mode: Mode) -> Self {
        match mode {
            Mode::Gold => Document::Gold {
                gold_prices: Vec::new(),
            },
            Mode::Silver => Document::Silver {
                silver_rates: Vec::new(),
            },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Document::Gold { .. } => Mode::Gold,
            Document::Silver { .. } => Mode::Silver,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Document::Gold { gold_prices } => gold_prices.len(),
            Document::Silver { silver_rates } => silver_rates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Amount, GoldRecord, SilverRecord};

    fn gold_doc() -> Document {
        Document::Gold {
            gold_prices: vec![GoldRecord {
                city: "Chennai".into(),
                k24: Amount::new("₹7452"),
                k22: Amount::new("₹6831"),
                k18: Amount::new("₹5596"),
            }],
        }
    }

    #[test]
    fn gold_json_matches_expected_layout() {
        let expected = r#"{
  "gold_prices": [
    {
      "City": "Chennai",
      "24K Today": "₹7452",
      "22K Today": "₹6831",
      "18K Today": "₹5596"
    }
  ]
}"#;
        assert_eq!(gold_doc().to_json().unwrap(), expected);
    }

    #[test]
    fn silver_json_uses_silver_rates_key_only() {
        let doc = Document::Silver {
            silver_rates: vec![SilverRecord {
                city: "Mumbai".into(),
                gram_10: Amount::new("₹ 932.50"),
                gram_100: Amount::new("₹ 9,325"),
                kg_1: Amount::new("₹ 93,250"),
            }],
        };
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"silver_rates\""));
        assert!(!json.contains("gold_prices"));
        let keys: Vec<usize> = ["\"city\"", "\"10_gram\"", "\"100_gram\"", "\"1_kg\""]
            .iter()
            .map(|k| json.find(k).expect("key present"))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "key order: {json}");
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let json = gold_doc().to_json().unwrap();
        assert!(json.contains('₹'));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn serialization_is_idempotent() {
        let doc = gold_doc();
        assert_eq!(doc.to_json().unwrap().as_bytes(), doc.to_json().unwrap().as_bytes());
    }

    #[test]
    fn json_round_trips() {
        let doc = gold_doc();
        let parsed = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);

        let empty = Document::empty(Mode::Silver);
        let parsed = Document::from_json(&empty.to_json().unwrap()).unwrap();
        assert_eq!(parsed, empty);
    }

    #[test]
    fn empty_document_reports_its_mode() {
        let doc = Document::empty(Mode::Gold);
        assert!(doc.is_empty());
        assert_eq!(doc.mode(), Mode::Gold);
        assert_eq!(gold_doc().len(), 1);
    }
}
