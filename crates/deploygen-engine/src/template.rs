//! Locating the deployment template
//!
//! The template is looked up relative to the installed executable rather than
//! the working directory, so the tool behaves the same wherever it is run
//! from. A copy compiled into the binary is used when no file is installed.

use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result, TemplateError};

/// File name of the deployment template
pub const TEMPLATE_FILE_NAME: &str = "deployment.yaml.j2";

const BUILTIN_TEMPLATE: &str = include_str!("../templates/deployment.yaml.j2");

/// Where the template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Builtin,
}

/// Template name and contents ready for rendering
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub name: String,
    pub source: String,
}

impl TemplateSource {
    /// Pick the template to render
    ///
    /// An explicit path must exist. Otherwise the file next to the running
    /// executable is preferred, falling back to the built-in copy.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(TemplateError::not_found(path.display().to_string()).into());
            }
            return Ok(Self::File(path.to_path_buf()));
        }

        match install_relative_path() {
            Some(path) if path.is_file() => Ok(Self::File(path)),
            _ => Ok(Self::Builtin),
        }
    }

    /// Name used in diagnostics
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Builtin => format!("<builtin>/{}", TEMPLATE_FILE_NAME),
        }
    }

    /// Read the template contents
    pub fn load(&self) -> Result<LoadedTemplate> {
        let source = match self {
            Self::File(path) => std::fs::read_to_string(path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    EngineError::Template(TemplateError::not_found(path.display().to_string()))
                }
                _ => EngineError::Io(e),
            })?,
            Self::Builtin => BUILTIN_TEMPLATE.to_string(),
        };

        tracing::debug!("using template {}", self.name());

        Ok(LoadedTemplate {
            name: self.name(),
            source,
        })
    }
}

/// `deployment.yaml.j2` in the directory of the running executable
pub fn install_relative_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(TEMPLATE_FILE_NAME))
}
