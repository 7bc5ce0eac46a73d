//! Normalization runners bound to an external process factory

use crate::resolver::{build_runner_reference, ImageMismatch, ResolveError};
use normdispatch_core::DestinationType;

/// Launches containers on behalf of a runner
///
/// Execution is owned by the implementor; the resolver only hands it the
/// image and dialect to run.
pub trait ProcessFactory: Send + Sync {
    /// Get the factory name (e.g., "docker", "kubernetes")
    fn name(&self) -> &str;
}

/// A normalization step ready to be executed
pub trait NormalizationRunner: Send + Sync {
    /// Dialect the normalization runs in
    fn destination_type(&self) -> DestinationType;

    /// Tagged normalization image
    fn image(&self) -> &str;
}

/// Runner carrying the authoritative image for one destination
#[derive(Debug, Clone)]
pub struct DefaultNormalizationRunner<F> {
    destination_type: DestinationType,
    process_factory: F,
    image: String,
}

impl<F: ProcessFactory> DefaultNormalizationRunner<F> {
    pub fn new(destination_type: DestinationType, process_factory: F, image: impl Into<String>) -> Self {
        Self {
            destination_type,
            process_factory,
            image: image.into(),
        }
    }

    /// Process factory the runner launches through
    pub fn process_factory(&self) -> &F {
        &self.process_factory
    }
}

impl<F: ProcessFactory> NormalizationRunner for DefaultNormalizationRunner<F> {
    fn destination_type(&self) -> DestinationType {
        self.destination_type
    }

    fn image(&self) -> &str {
        &self.image
    }
}

/// Build a runner for a destination connector
///
/// The runner always receives the image composed from the mapping table.
/// A disagreeing `definition_image` is handed back as a warning alongside it.
pub fn create_runner<F: ProcessFactory>(
    connector_image: &str,
    process_factory: F,
    version: &str,
    definition_image: Option<&str>,
) -> Result<(DefaultNormalizationRunner<F>, Option<ImageMismatch>), ResolveError> {
    let reference = build_runner_reference(connector_image, version, definition_image)?;

    tracing::debug!(
        connector_image,
        image = %reference.image,
        process_factory = process_factory.name(),
        "created normalization runner"
    );

    let runner = DefaultNormalizationRunner::new(reference.destination_type, process_factory, reference.image);
    Ok((runner, reference.warning))
}
