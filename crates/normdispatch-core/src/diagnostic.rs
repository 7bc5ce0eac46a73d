//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// The connector image has no entry in the normalization mappings
    UnmappedConnector,

    /// A definition's normalization image disagrees with the mapping table
    NormalizationImageMismatch,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnmappedConnector => "UNMAPPED_CONNECTOR",
            Self::NormalizationImageMismatch => "NORMALIZATION_IMAGE_MISMATCH",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue that should fail CI
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Connector image the diagnostic is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<String>,

    /// Expected value (the authoritative reference)
    pub expected: Option<String>,

    /// Actual value (what the caller or definition supplied)
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            connector: None,
            expected: None,
            actual: None,
        }
    }

    /// Set the connector image
    pub fn with_connector(mut self, connector: impl Into<String>) -> Self {
        self.connector = Some(connector.into());
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_errors_last() {
        assert!(Severity::Warn < Severity::Error);
        assert_eq!(Severity::Warn.to_string(), "warn");
    }

    #[test]
    fn diagnostic_code_stability() {
        assert_eq!(DiagnosticCode::UnmappedConnector.as_str(), "UNMAPPED_CONNECTOR");
        assert_eq!(
            DiagnosticCode::NormalizationImageMismatch.as_str(),
            "NORMALIZATION_IMAGE_MISMATCH"
        );
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(
            DiagnosticCode::NormalizationImageMismatch,
            Severity::Warn,
            "normalization image differs",
        )
        .with_connector("airbyte/destination-mysql")
        .with_comparison("airbyte/normalization-mysql:0.2.25", "airbyte/normalization-mysql:0.2.24");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("NORMALIZATION_IMAGE_MISMATCH"));
        assert!(json.contains("\"warn\""));
        assert!(json.contains("airbyte/destination-mysql"));
    }

    #[test]
    fn connector_omitted_when_absent() {
        let diag = Diagnostic::new(DiagnosticCode::UnmappedConnector, Severity::Error, "not mapped");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("connector"));
    }
}
