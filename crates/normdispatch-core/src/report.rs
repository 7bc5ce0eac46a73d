//! `report.json` written by `normdispatch check`
//!
//! Consumers parse this file in CI, so field names only ever get added.
//! Removing or renaming one means bumping `ReportVersion::major`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::diagnostic::{Diagnostic, Severity};

/// `major.minor` of the report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    pub major: u32,
    pub minor: u32,
}

impl ReportVersion {
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Counts derived from the diagnostics of one check run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,

    /// Definitions inspected, including the ones that produced nothing
    pub definitions_checked: usize,
}

impl ReportSummary {
    fn count(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::Warn => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
    }
}

/// Outcome of checking destination definitions against the mapping table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub version: ReportVersion,

    /// RFC 3339, UTC
    pub timestamp: String,

    pub summary: ReportSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Report with no diagnostics, stamped now
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Report for a run over `definitions_checked` definitions
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>, definitions_checked: usize) -> Self {
        let mut report = Self::new();
        report.summary.definitions_checked = definitions_checked;
        diagnostics.into_iter().for_each(|diagnostic| report.add_diagnostic(diagnostic));
        report
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.summary.count(diagnostic.severity);
        self.diagnostics.push(diagnostic);
    }

    /// At least one definition failed to resolve
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// At least one definition drifted from the mapping table
    pub fn has_warnings(&self) -> bool {
        self.summary.warnings > 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON to `path`, replacing any existing file
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
