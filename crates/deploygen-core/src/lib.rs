//! deploygen Core - Inputs and outputs of the deployment manifest generator
//!
//! This crate provides the pieces that surround template rendering:
//! - `certs`: Loading TLS material from a directory as base64 text
//! - `options`: Resolving command-line inputs into `RenderOptions`
//! - `context`: The typed substitution context handed to the template
//! - `output`: Choosing where the rendered document goes and writing it

pub mod certs;
pub mod context;
pub mod error;
pub mod options;
pub mod output;

pub use certs::{CertificateMap, certificate_key, load_certificates};
pub use context::RenderContext;
pub use error::{CoreError, Result};
pub use options::{CloudProvider, DeploymentMode, RawOptions, RenderOptions};
pub use output::{OutputTarget, RenderedDocument, STDOUT_SENTINEL, default_file_name};
