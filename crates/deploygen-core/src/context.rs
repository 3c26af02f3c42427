//! Template rendering context

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::certs::CertificateMap;
use crate::error::Result;
use crate::options::RenderOptions;

/// Context available to the deployment template
///
/// Besides the named fields, every certificate key (`caCrt`, `tlsKey`, ...)
/// is exposed as a top-level variable, and the whole map is available as
/// `certs` for iteration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub config_db_replicas: u32,

    pub csp_type: String,

    #[serde(rename = "enableREI")]
    pub enable_rei: bool,

    /// True for internal deployments, false for customer ones
    pub internal: bool,

    pub image_tag: String,

    pub image_path: String,

    pub image_pull_secret_name: String,

    pub certs: CertificateMap,
}

impl RenderContext {
    /// Create a new render context
    pub fn new(options: &RenderOptions, certs: CertificateMap) -> Self {
        Self {
            config_db_replicas: options.configdb_replicas,
            csp_type: options.csp.to_string(),
            enable_rei: options.enable_rei,
            internal: options.mode.is_internal(),
            image_tag: options.image_tag.clone(),
            image_path: options.image_path.clone(),
            image_pull_secret_name: options.image_pull_secret_name.clone(),
            certs,
        }
    }

    /// Flatten into the object handed to the template
    ///
    /// Certificate keys are inserted first so the named fields win on a clash.
    pub fn to_value(&self) -> Result<JsonValue> {
        let mut merged = serde_json::Map::new();

        for (key, encoded) in &self.certs {
            merged.insert(key.clone(), JsonValue::String(encoded.clone()));
        }

        if let JsonValue::Object(fields) = serde_json::to_value(self)? {
            merged.extend(fields);
        }

        Ok(JsonValue::Object(merged))
    }
}
