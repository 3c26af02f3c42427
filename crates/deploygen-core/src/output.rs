//! Output routing for the rendered manifest

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::options::{CloudProvider, DeploymentMode, RenderOptions};

/// Output path that sends the document to standard output
pub const STDOUT_SENTINEL: &str = "-";

/// File name used when the caller does not choose one
///
/// ```
/// use deploygen_core::{default_file_name, CloudProvider, DeploymentMode};
///
/// assert_eq!(
///     default_file_name(DeploymentMode::Customer, CloudProvider::Aws, "v1"),
///     "customer-AWS-v1.yaml"
/// );
/// ```
#[must_use]
pub fn default_file_name(mode: DeploymentMode, csp: CloudProvider, image_tag: &str) -> String {
    format!("{}-{}-{}.yaml", mode, csp, image_tag)
}

/// Where the rendered document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File {
        path: PathBuf,
        /// Print the path after writing (set when the name was defaulted)
        announce: bool,
    },
}

impl OutputTarget {
    /// Resolve the destination from an optional `--output-file` value
    pub fn resolve(explicit: Option<&str>, options: &RenderOptions) -> Self {
        match explicit {
            Some(STDOUT_SENTINEL) => Self::Stdout,
            Some(path) => Self::File {
                path: PathBuf::from(path),
                announce: false,
            },
            None => Self::File {
                path: PathBuf::from(default_file_name(
                    options.mode,
                    options.csp,
                    &options.image_tag,
                )),
                announce: true,
            },
        }
    }

    /// Path of the file that will be written, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdout => None,
            Self::File { path, .. } => Some(path),
        }
    }
}

/// Rendered manifest text together with its destination
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub text: String,
    pub target: OutputTarget,
}

impl RenderedDocument {
    pub fn new(text: String, target: OutputTarget) -> Self {
        Self { text, target }
    }

    /// Write the document followed by a newline
    ///
    /// `stdout` receives the document for [`OutputTarget::Stdout`], or the
    /// file name when the target asks to be announced.
    pub fn write<W: Write>(&self, stdout: &mut W) -> Result<()> {
        match &self.target {
            OutputTarget::Stdout => {
                writeln!(stdout, "{}", self.text)?;
            }
            OutputTarget::File { path, announce } => {
                let write_err = |source| CoreError::WriteOutput {
                    path: path.display().to_string(),
                    source,
                };

                let mut contents = String::with_capacity(self.text.len() + 1);
                contents.push_str(&self.text);
                contents.push('\n');
                std::fs::write(path, contents).map_err(write_err)?;

                tracing::info!("wrote {} ({} bytes)", path.display(), self.text.len() + 1);

                if *announce {
                    writeln!(stdout, "{}", path.display())?;
                }
            }
        }

        stdout.flush()?;
        Ok(())
    }
}
