//! Resolution of connector images to normalization references
//!
//! The mapping table is the only source of truth: a normalization image
//! supplied by a caller or a definition file is compared against the
//! composed reference and reported when it differs, but never used.

use crate::mapping::{lookup, strip_tag, NormalizationMapping};
use normdispatch_core::{DestinationType, Diagnostic, DiagnosticCode, Severity};
use serde::Serialize;

/// Errors raised while resolving a connector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Requested normalization for {connector_image}, but it is not included in the normalization mappings.")]
    UnmappedConnector { connector_image: String },
}

impl ResolveError {
    /// Connector image that failed to resolve
    pub fn connector_image(&self) -> &str {
        match self {
            Self::UnmappedConnector { connector_image } => connector_image,
        }
    }

    /// Convert into an error diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(DiagnosticCode::UnmappedConnector, Severity::Error, self.to_string())
            .with_connector(self.connector_image())
    }
}

/// A supplied normalization image that disagrees with the mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMismatch {
    /// Connector image as requested
    pub connector_image: String,

    /// Reference composed from the mapping table
    pub factory_image: String,

    /// Reference supplied by the caller or definition file
    pub definition_image: String,
}

impl ImageMismatch {
    /// Convert into a warning diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = format!(
            "Normalization image in the definition ({}) differs from the mapped image ({})",
            self.definition_image, self.factory_image
        );

        Diagnostic::new(DiagnosticCode::NormalizationImageMismatch, Severity::Warn, message)
            .with_connector(&self.connector_image)
            .with_comparison(&self.factory_image, &self.definition_image)
    }
}

/// Authoritative normalization reference for one connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerReference {
    /// `<image>:<version>` composed from the mapping table
    pub image: String,

    /// Dialect of the destination
    pub destination_type: DestinationType,

    /// Present when the supplied image disagreed with `image`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ImageMismatch>,
}

/// Resolve a connector image, with or without tag, to its normalization mapping
pub fn resolve(connector_image: &str) -> Result<NormalizationMapping, ResolveError> {
    let image_name = strip_tag(connector_image);

    let mapping = lookup(image_name).ok_or_else(|| ResolveError::UnmappedConnector {
        connector_image: connector_image.to_string(),
    })?;

    tracing::debug!(
        connector_image,
        normalization_image = mapping.image,
        destination_type = %mapping.destination_type,
        "resolved normalization mapping"
    );

    Ok(mapping)
}

/// Compose the authoritative normalization reference for a connector
///
/// `definition_image` is compared case-insensitively against the composed
/// reference. A mismatch is logged and returned in
/// [`RunnerReference::warning`]; the composed reference is returned either
/// way. Only `None` counts as absent; an empty image is a mismatch.
pub fn build_runner_reference(
    connector_image: &str,
    version: &str,
    definition_image: Option<&str>,
) -> Result<RunnerReference, ResolveError> {
    let mapping = resolve(connector_image)?;
    let factory_image = format!("{}:{}", mapping.image, version);

    let warning = definition_image
        .filter(|image| !image.eq_ignore_ascii_case(&factory_image))
        .map(|image| ImageMismatch {
            connector_image: connector_image.to_string(),
            factory_image: factory_image.clone(),
            definition_image: image.to_string(),
        });

    if let Some(mismatch) = &warning {
        tracing::warn!(
            connector_image = %mismatch.connector_image,
            factory_image = %mismatch.factory_image,
            definition_image = %mismatch.definition_image,
            "normalization image in the definition differs from the mapped image"
        );
    }

    Ok(RunnerReference {
        image: factory_image,
        destination_type: mapping.destination_type,
        warning,
    })
}
