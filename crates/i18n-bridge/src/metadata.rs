//! Catalog metadata and query results

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Plural rule declared by the loaded catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralRule {
    /// zero / one / other
    Default,
    /// one / few / many, by the last two digits
    Slavic,
    /// zero / one / two / few / many / other
    Arabic,
    /// The engine reported a code outside the known domain
    Unknown,
}

impl PluralRule {
    /// Map the engine's integer code, never failing.
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Default,
            1 => Self::Slavic,
            2 => Self::Arabic,
            other => {
                warn!(code = other, "Engine reported unknown plural rule");
                Self::Unknown
            }
        }
    }

    /// Lower-case name as used in catalog headers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Slavic => "slavic",
            Self::Arabic => "arabic",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of the currently loaded catalog, read fresh on every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    /// Catalog locale, e.g. `de-DE`
    pub locale: String,
    /// Fallback locale
    pub fallback: String,
    /// Free-form note from the catalog header
    pub note: String,
    /// Plural rule used by `translate_plural`
    pub plural_rule: PluralRule,
}

/// Outcome class of a catalog self-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// No findings
    Ok,
    /// Findings that do not prevent use
    Warnings,
    /// Errors, or no catalog loaded
    Failed,
    /// A status code this binding does not know
    Other(i32),
}

impl CheckStatus {
    /// Map the engine's non-negative status code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Warnings,
            2 => Self::Failed,
            other => Self::Other(other),
        }
    }

    /// Whether the catalog passed, possibly with warnings
    pub fn passed(&self) -> bool {
        matches!(self, Self::Ok | Self::Warnings)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warnings => write!(f, "warnings"),
            Self::Failed => write!(f, "failed"),
            Self::Other(code) => write!(f, "status {}", code),
        }
    }
}

/// Result of the engine's catalog self-check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Outcome class
    pub status: CheckStatus,
    /// Human-readable report as produced by the engine
    pub report: String,
}

/// Versions reported by the engine, `None` where the symbol is absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineVersions {
    /// C ABI version
    pub abi: Option<u32>,
    /// Newest binary catalog format the engine can read
    pub binary_format_max: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_rule_domain() {
        assert_eq!(PluralRule::from_raw(0), PluralRule::Default);
        assert_eq!(PluralRule::from_raw(1), PluralRule::Slavic);
        assert_eq!(PluralRule::from_raw(2), PluralRule::Arabic);
        assert_eq!(PluralRule::from_raw(99), PluralRule::Unknown);
        assert_eq!(PluralRule::from_raw(-1), PluralRule::Unknown);
    }

    #[test]
    fn test_check_status_codes() {
        assert_eq!(CheckStatus::from_code(0), CheckStatus::Ok);
        assert!(CheckStatus::from_code(1).passed());
        assert!(!CheckStatus::from_code(2).passed());
        assert_eq!(CheckStatus::from_code(7), CheckStatus::Other(7));
        assert_eq!(CheckStatus::Other(7).to_string(), "status 7");
    }

    #[test]
    fn test_snapshot_serializes_lowercase_rule() {
        let snapshot = MetadataSnapshot {
            locale: "pl-PL".to_string(),
            fallback: "en".to_string(),
            note: String::new(),
            plural_rule: PluralRule::Slavic,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["plural_rule"], "slavic");
        assert_eq!(json["locale"], "pl-PL");
    }
}
