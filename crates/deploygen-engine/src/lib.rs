//! deploygen Engine - Jinja2 rendering of the deployment manifest
//!
//! This crate provides a MiniJinja-based renderer with:
//! - Install-relative template lookup with a built-in fallback
//! - Strict handling of undefined variables
//! - Source-annotated error messages with "did you mean" suggestions
//! - YAML validation of the rendered output

pub mod engine;
pub mod error;
pub mod filters;
pub mod suggestions;
pub mod template;

pub use engine::Engine;
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use suggestions::AVAILABLE_FILTERS;
pub use template::{LoadedTemplate, TEMPLATE_FILE_NAME, TemplateSource};
