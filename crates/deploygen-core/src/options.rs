//! Option resolution
//!
//! Command-line inputs arrive as [`RawOptions`], where most fields are still
//! optional. [`RawOptions::resolve`] validates them and fills in the defaults
//! that depend on the deployment mode and the cloud provider, producing an
//! immutable [`RenderOptions`].

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Default image tag
pub const DEFAULT_IMAGE_TAG: &str = "v1";

/// Default directory holding the certificates
pub const DEFAULT_CERTS_DIR: &str = "certs";

/// Public registry path used for customer deployments
pub const DEFAULT_DOCKERHUB_IMAGE_PATH: &str = "nuvolosocom";

/// Pull secret referenced by customer deployments
pub const DEFAULT_DOCKERHUB_SECRET_NAME: &str = "customer-dockerhub-secret";

/// Pull secret referenced by internal deployments
pub const INTERNAL_IMAGE_PULL_SECRET: &str = "internal-repo-secret";

/// Replica counts accepted for the configuration database
pub const ALLOWED_CONFIGDB_REPLICAS: &[u32] = &[1, 3];

/// Which flavor of manifest to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentMode {
    Customer,
    Internal,
}

/// Per-mode defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDefaults {
    pub configdb_replicas: u32,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Internal => "internal",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Defaults that apply when the caller leaves a mode-dependent option unset
    pub fn defaults(&self) -> ModeDefaults {
        match self {
            Self::Customer => ModeDefaults {
                configdb_replicas: 3,
            },
            Self::Internal => ModeDefaults {
                configdb_replicas: 1,
            },
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target cloud service provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CloudProvider {
    #[default]
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 3] = [Self::Aws, Self::Azure, Self::Gcp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::Gcp => "GCP",
        }
    }

    /// Registry path used by internal deployments when none is given
    pub fn default_internal_image_path(&self) -> &'static str {
        match self {
            Self::Aws => "407798037446.dkr.ecr.us-west-2.amazonaws.com/nuvoloso",
            Self::Azure => "nuvoloso.azurecr.io",
            Self::Gcp => "gcr.io/nuvoloso",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|csp| csp.as_str() == s)
            .ok_or_else(|| {
                CoreError::invalid_arguments(format!(
                    "unknown cloud service provider '{}' (expected one of: AWS, Azure, GCP)",
                    s
                ))
            })
    }
}

/// Options as supplied on the command line, before defaults are applied
#[derive(Debug, Clone)]
pub struct RawOptions {
    pub customer: bool,
    pub internal: bool,
    pub csp: CloudProvider,
    pub configdb_replicas: Option<u32>,
    pub image_tag: String,
    pub dockerhub_image_path: String,
    pub internal_image_path: Option<String>,
    pub dockerhub_secret_name: String,
    pub enable_rei: bool,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            customer: false,
            internal: false,
            csp: CloudProvider::default(),
            configdb_replicas: None,
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            dockerhub_image_path: DEFAULT_DOCKERHUB_IMAGE_PATH.to_string(),
            internal_image_path: None,
            dockerhub_secret_name: DEFAULT_DOCKERHUB_SECRET_NAME.to_string(),
            enable_rei: false,
        }
    }
}

/// Fully resolved options used for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: DeploymentMode,
    pub csp: CloudProvider,
    pub configdb_replicas: u32,
    pub image_tag: String,
    pub image_path: String,
    pub image_pull_secret_name: String,
    pub enable_rei: bool,
}

impl RawOptions {
    /// Validate the raw options and apply mode/provider defaults
    pub fn resolve(self) -> Result<RenderOptions> {
        let mode = match (self.customer, self.internal) {
            (true, false) => DeploymentMode::Customer,
            (false, true) => DeploymentMode::Internal,
            (true, true) => {
                return Err(CoreError::invalid_arguments(
                    "--customer and --internal are mutually exclusive",
                ));
            }
            (false, false) => {
                return Err(CoreError::invalid_arguments(
                    "one of --customer or --internal is required",
                ));
            }
        };

        let configdb_replicas = match self.configdb_replicas {
            Some(n) if ALLOWED_CONFIGDB_REPLICAS.contains(&n) => n,
            Some(n) => {
                return Err(CoreError::invalid_arguments(format!(
                    "invalid config database replica count {} (choose from 1, 3)",
                    n
                )));
            }
            None => mode.defaults().configdb_replicas,
        };

        let (image_path, image_pull_secret_name) = match mode {
            DeploymentMode::Internal => (
                self.internal_image_path
                    .unwrap_or_else(|| self.csp.default_internal_image_path().to_string()),
                INTERNAL_IMAGE_PULL_SECRET.to_string(),
            ),
            DeploymentMode::Customer => (self.dockerhub_image_path, self.dockerhub_secret_name),
        };

        let resolved = RenderOptions {
            mode,
            csp: self.csp,
            configdb_replicas,
            image_tag: self.image_tag,
            image_path,
            image_pull_secret_name,
            enable_rei: self.enable_rei,
        };

        tracing::debug!(?resolved, "resolved render options");

        Ok(resolved)
    }
}
