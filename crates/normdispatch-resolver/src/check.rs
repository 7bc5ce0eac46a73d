//! Batch consistency check of destination definitions against the mapping table
//!
//! Each definition is resolved the same way a sync would resolve it:
//! unmapped connectors become errors, stale normalization images become
//! warnings, and consistent definitions produce nothing.

use crate::resolver::build_runner_reference;
use normdispatch_core::{DestinationDefinition, Diagnostic, Report, Severity};

/// Result of checking a set of destination definitions
#[derive(Debug, Clone)]
pub struct DefinitionCheck {
    /// Number of definitions inspected
    pub definitions_checked: usize,

    /// Diagnostics produced by the check
    pub diagnostics: Vec<Diagnostic>,
}

impl DefinitionCheck {
    /// Check every definition using the given normalization version
    pub fn run(definitions: &[DestinationDefinition], version: &str) -> Self {
        let mut diagnostics = Vec::new();

        for definition in definitions {
            let connector_image = definition.connector_image();

            match build_runner_reference(&connector_image, version, definition.normalization_image.as_deref()) {
                Ok(reference) => {
                    if let Some(mismatch) = reference.warning {
                        diagnostics.push(mismatch.to_diagnostic());
                    }
                }
                Err(err) => diagnostics.push(err.to_diagnostic()),
            }
        }

        Self {
            definitions_checked: definitions.len(),
            diagnostics,
        }
    }

    /// Check if any definition failed to resolve
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Check if any definition drifted from the mapping table
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warn)
    }

    /// Count error diagnostics
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Count warning diagnostics
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warn).count()
    }

    /// Build a versioned report
    pub fn into_report(self) -> Report {
        Report::from_diagnostics(self.diagnostics, self.definitions_checked)
    }
}
