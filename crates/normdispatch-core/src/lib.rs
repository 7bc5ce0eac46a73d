//! Normalization Dispatch Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes or dialect names - they are part of the public API.

pub mod config;
pub mod diagnostic;
pub mod dialect;
pub mod report;

pub use config::{Config, ConfigError, DestinationDefinition, NormalizationSettings};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use dialect::{DestinationType, UnknownDestinationType};
pub use report::{Report, ReportSummary, ReportVersion};

/// Image used by destinations whose normalization has no dedicated image
pub const BASE_NORMALIZATION_IMAGE_NAME: &str = "airbyte/normalization";

/// Normalization version requested when the caller does not pick one
pub const NORMALIZATION_VERSION: &str = "0.2.25";
