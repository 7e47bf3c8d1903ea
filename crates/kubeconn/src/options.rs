//! Direct API connection options (`api_options` in the property bag).
//!
//! Only a fixed set of keys is recognised: `host` (required), `ssl_ca_cert`,
//! `cert_file`, `key_file` and `verify_ssl`. Anything else in the sub-map is
//! ignored. Instead of writing onto shared client state, the options are
//! rendered into a standalone kubeconfig document per call.

use kube::config::Kubeconfig;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::bag::API_OPTIONS_KEY;
use crate::error::StrategyError;
use crate::paths::expand_path;

/// Required key inside `api_options`.
pub const HOST_KEY: &str = "host";

/// Every key read from `api_options`.
pub const RECOGNIZED_KEYS: [&str; 5] =
    ["host", "ssl_ca_cert", "cert_file", "key_file", "verify_ssl"];

/// Name used for the generated cluster, user and context entries.
const GENERATED_NAME: &str = "api-options";

/// Recognised connection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiOptions {
    /// API server URL, e.g. `https://10.0.0.1:6443`.
    pub host: String,

    /// CA bundle used to verify the server.
    #[serde(default)]
    pub ssl_ca_cert: Option<String>,

    /// Client certificate for mutual TLS.
    #[serde(default)]
    pub cert_file: Option<String>,

    /// Private key matching `cert_file`.
    #[serde(default)]
    pub key_file: Option<String>,

    /// Whether to verify the server certificate. Defaults to true.
    #[serde(default)]
    pub verify_ssl: Option<bool>,
}

impl ApiOptions {
    /// Create options with just a host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ssl_ca_cert: None,
            cert_file: None,
            key_file: None,
            verify_ssl: None,
        }
    }

    pub fn with_ssl_ca_cert(mut self, path: impl Into<String>) -> Self {
        self.ssl_ca_cert = Some(path.into());
        self
    }

    pub fn with_client_cert(
        mut self,
        cert_file: impl Into<String>,
        key_file: impl Into<String>,
    ) -> Self {
        self.cert_file = Some(cert_file.into());
        self.key_file = Some(key_file.into());
        self
    }

    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Read options from the `api_options` value.
    ///
    /// Returns `Ok(None)` when `host` is absent: that makes the options
    /// inapplicable rather than invalid.
    pub fn from_value(value: &Value) -> Result<Option<Self>, StrategyError> {
        let map = value.as_object().ok_or(StrategyError::InvalidValue {
            key: API_OPTIONS_KEY,
            expected: "a mapping",
        })?;

        if !map.contains_key(HOST_KEY) {
            return Ok(None);
        }

        let recognised: serde_json::Map<String, Value> = map
            .iter()
            .filter(|(k, _)| RECOGNIZED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let options: ApiOptions = serde_json::from_value(Value::Object(recognised))?;
        Ok(Some(options))
    }

    /// Render the options as a self-contained kubeconfig.
    pub fn to_kubeconfig(&self) -> Result<Kubeconfig, StrategyError> {
        let mut cluster = serde_json::Map::new();
        cluster.insert("server".into(), json!(self.host));
        if let Some(ca) = &self.ssl_ca_cert {
            cluster.insert("certificate-authority".into(), json!(path_string(ca)));
        }
        if self.verify_ssl == Some(false) {
            cluster.insert("insecure-skip-tls-verify".into(), json!(true));
        }

        let mut user = serde_json::Map::new();
        if let Some(cert) = &self.cert_file {
            user.insert("client-certificate".into(), json!(path_string(cert)));
        }
        if let Some(key) = &self.key_file {
            user.insert("client-key".into(), json!(path_string(key)));
        }

        let document = json!({
            "apiVersion": "v1",
            "kind": "Config",
            "clusters": [{ "name": GENERATED_NAME, "cluster": cluster }],
            "users": [{ "name": GENERATED_NAME, "user": user }],
            "contexts": [{
                "name": GENERATED_NAME,
                "context": { "cluster": GENERATED_NAME, "user": GENERATED_NAME }
            }],
            "current-context": GENERATED_NAME,
        });

        Ok(serde_json::from_value(document)?)
    }
}

fn path_string(path: &str) -> String {
    expand_path(path).to_string_lossy().into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
