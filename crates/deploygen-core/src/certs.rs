//! Certificate loading
//!
//! TLS material is picked up from a single directory level. Only files ending
//! in `.crt`, `.key` or `.pem` are considered; each one becomes a template
//! variable named after the file (`ca.crt` becomes `caCrt`) whose value is the
//! base64 encoding of the raw file bytes.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use base64::Engine as _;

use crate::error::{CoreError, Result};

/// Extensions (without the dot) recognized as certificate material
pub const CERTIFICATE_EXTENSIONS: &[&str] = &["crt", "key", "pem"];

/// Derived key name to base64-encoded file contents, sorted by key
pub type CertificateMap = BTreeMap<String, String>;

/// Derive the template key for a certificate file name
///
/// Returns `None` when the name does not end with one of
/// [`CERTIFICATE_EXTENSIONS`] or has nothing before the extension.
///
/// ```
/// use deploygen_core::certificate_key;
///
/// assert_eq!(certificate_key("ca.crt").as_deref(), Some("caCrt"));
/// assert_eq!(certificate_key("notes.txt"), None);
/// ```
#[must_use]
pub fn certificate_key(file_name: &str) -> Option<String> {
    CERTIFICATE_EXTENSIONS.iter().find_map(|ext| {
        let stem = file_name.strip_suffix(ext)?.strip_suffix('.')?;
        if stem.is_empty() {
            return None;
        }

        let mut chars = ext.chars();
        let first = chars.next()?;
        Some(format!("{}{}{}", stem, first.to_ascii_uppercase(), chars.as_str()))
    })
}

/// Load every recognized certificate file in `dir`
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `dir` is missing or not a directory
/// - [`CoreError::PermissionDenied`] if the directory cannot be listed
/// - [`CoreError::ReadFile`] if a matching file cannot be read
/// - [`CoreError::NoCertificates`] if nothing matched
pub fn load_certificates(dir: impl AsRef<Path>) -> Result<CertificateMap> {
    let dir = dir.as_ref();
    let dir_name = dir.display().to_string();

    if !dir.is_dir() {
        return Err(CoreError::NotFound { path: dir_name });
    }

    let mut certs = CertificateMap::new();

    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 failures mean the directory itself could not be listed
            Err(e) if e.depth() == 0 => {
                let kind = e.io_error().map(|io| io.kind());
                return Err(match kind {
                    Some(ErrorKind::PermissionDenied) => {
                        CoreError::PermissionDenied { path: dir_name }
                    }
                    _ => CoreError::Io(e.into()),
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir_name, e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(key) = entry.file_name().to_str().and_then(certificate_key) else {
            continue;
        };

        let path = entry.path();
        let contents = std::fs::read(path).map_err(|source| CoreError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(key = %key, bytes = contents.len(), "loaded {}", path.display());

        certs.insert(
            key,
            base64::engine::general_purpose::STANDARD.encode(&contents),
        );
    }

    if certs.is_empty() {
        return Err(CoreError::NoCertificates { path: dir_name });
    }

    Ok(certs)
}
