//! Normalization dispatch resolver
//!
//! Maps destination connector images to the normalization image and
//! dialect that must run after them:
//! - Static connector mapping table
//! - Resolution with version stripping
//! - Authoritative reference composition and drift warnings
//! - Runner construction bound to an external process factory
//! - Batch checks of destination definitions

pub mod check;
pub mod mapping;
pub mod resolver;
pub mod runner;

pub use check::DefinitionCheck;
pub use mapping::{mappings, strip_tag, NormalizationMapping};
pub use resolver::{build_runner_reference, resolve, ImageMismatch, ResolveError, RunnerReference};
pub use runner::{create_runner, DefaultNormalizationRunner, NormalizationRunner, ProcessFactory};
