//! # contract: shared data model and the content-store seam
//!
//! Plain data types that flow through the conversion pipeline, plus the
//! [`ContentStore`] trait that the publisher talks to.
//!
//! ## Data flow
//! - [`RawRow`]: four strings cut verbatim out of the pasted text.
//! - [`GoldRecord`] / [`SilverRecord`]: one city's prices in the output shape.
//! - [`Document`]: the records wrapped under `gold_prices` or `silver_rates`.
//!
//! Amounts are [`Amount`] values: opaque currency-formatted strings. They are
//! never parsed into numbers, so `₹ 7,452` leaves the pipeline exactly as it
//! arrived (minus surrounding whitespace).
//!
//! ## Mocking & Testing
//! - [`ContentStore`] is annotated for `mockall`; with the `test-export-mocks`
//!   feature enabled dependents get `MockContentStore` for their own tests.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::publish::PublishError;

/// Which price table is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Three purity tiers: 24K, 22K, 18K.
    Gold,
    /// Three weight tiers: 10 gram, 100 gram, 1 kg.
    Silver,
}

impl Mode {
    /// Display label, as offered in the mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Gold => "Gold",
            Mode::Silver => "Silver",
        }
    }

    /// Top-level key of the JSON document for this mode.
    pub fn document_key(&self) -> &'static str {
        match self {
            Mode::Gold => "gold_prices",
            Mode::Silver => "silver_rates",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?}, expected gold or silver")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(Mode::Gold),
            "silver" => Ok(Mode::Silver),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Opaque currency-formatted amount, e.g. `₹ 7,452` or `₹977.50`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    pub fn new(raw: impl Into<String>) -> Self {
        Amount(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One matched row, fields in the order they appeared in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub city: String,
    pub amounts: [String; 3],
}

/// Gold prices for one city.
///
/// Field declaration order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRecord {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "24K Today")]
    pub k24: Amount,
    #[serde(rename = "22K Today")]
    pub k22: Amount,
    #[serde(rename = "18K Today")]
    pub k18: Amount,
}

/// Silver rates for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilverRecord {
    pub city: String,
    #[serde(rename = "10_gram")]
    pub gram_10: Amount,
    #[serde(rename = "100_gram")]
    pub gram_100: Amount,
    #[serde(rename = "1_kg")]
    pub kg_1: Amount,
}

/// A single record, before it is collected into a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceRecord {
    Gold(GoldRecord),
    Silver(SilverRecord),
}

/// The converted table. Exactly one of the two keys is ever present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Gold { gold_prices: Vec<GoldRecord> },
    Silver { silver_rates: Vec<SilverRecord> },
}

/// Where a file lives in the remote store, and the credential to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTarget {
    /// `owner/name`
    pub repo: String,
    pub path: String,
    pub token: SecretToken,
}

/// Bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(raw: impl Into<String>) -> Self {
        SecretToken(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(***)")
    }
}

/// JSON body of the create-or-replace request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutContentBody {
    pub message: String,
    /// Base64 of the UTF-8 content.
    pub content: String,
    /// Revision marker of the file being replaced, if it already exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Status and body of a store call, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResponse {
    pub status: u16,
    pub body: String,
}

/// Transport seam for the remote content API.
///
/// Implementations only move bytes: they report whatever status the remote
/// answered with and leave its interpretation to [`crate::publish::publish`].
/// An `Err` means no response was obtained at all.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up the file at the target (`GET .../contents/{path}`).
    async fn get_content(&self, target: &ContentTarget) -> Result<StoreResponse, PublishError>;

    /// Create or replace the file at the target (`PUT .../contents/{path}`).
    async fn put_content(
        &self,
        target: &ContentTarget,
        body: &PutContentBody,
    ) -> Result<StoreResponse, PublishError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Gold".parse::<Mode>().unwrap(), Mode::Gold);
        assert_eq!(" silver ".parse::<Mode>().unwrap(), Mode::Silver);
        assert!("platinum".parse::<Mode>().is_err());
    }

    #[test]
    fn secret_token_is_redacted_in_debug() {
        let target = ContentTarget {
            repo: "owner/name".into(),
            path: "a.json".into(),
            token: SecretToken::new("ghp_very_secret"),
        };
        let printed = format!("{target:?}");
        assert!(!printed.contains("ghp_very_secret"), "{printed}");
        assert!(printed.contains("SecretToken(***)"));
    }

    #[test]
    fn put_body_omits_absent_sha() {
        let body = PutContentBody {
            message: "m".into(),
            content: "e30=".into(),
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
    }
}
