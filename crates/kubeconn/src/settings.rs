//! Resolver settings.
//!
//! Controls how a resolved kubeconfig is turned into a client config: which
//! context to select and the connection timeouts. Context, cluster and user
//! selection applies to kubeconfig files and documents only; `api_options`
//! always uses the single context generated from it.
//!
//! # Configuration
//!
//! ```toml
//! [kube]
//! context = "admin@prod"
//! cluster = "prod"
//! user = "admin"
//! connect_timeout_secs = 10
//! read_timeout_secs = 30
//! ```
//!
//! # Environment Variables
//!
//! - `KUBECONN_CONTEXT` - Override the kubeconfig context
//! - `KUBECONN_CONNECT_TIMEOUT_SECS` - Override the connect timeout
//! - `KUBECONN_READ_TIMEOUT_SECS` - Override the read timeout

use std::path::Path;
use std::time::Duration;

use kube::config::KubeConfigOptions;
use serde::{Deserialize, Serialize};

use crate::{ConnectError, Result};

pub const ENV_CONTEXT: &str = "KUBECONN_CONTEXT";
pub const ENV_CONNECT_TIMEOUT: &str = "KUBECONN_CONNECT_TIMEOUT_SECS";
pub const ENV_READ_TIMEOUT: &str = "KUBECONN_READ_TIMEOUT_SECS";

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Client construction settings.
    pub kube: KubeSettings,
}

/// How a kubeconfig becomes a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeSettings {
    /// Context to select instead of the document's `current-context`.
    pub context: Option<String>,

    /// Cluster override for the selected context.
    pub cluster: Option<String>,

    /// User override for the selected context.
    pub user: Option<String>,

    /// TCP connect timeout in seconds.
    /// Default: 10
    pub connect_timeout_secs: u64,

    /// Response read timeout in seconds.
    /// Default: 30
    pub read_timeout_secs: u64,
}

impl Default for KubeSettings {
    fn default() -> Self {
        Self {
            context: None,
            cluster: None,
            user: None,
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl ResolverSettings {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load settings from a file.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConnectError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_toml(&contents)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable timeout values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(context) = lookup(ENV_CONTEXT).filter(|c| !c.is_empty()) {
            self.kube.context = Some(context);
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT).and_then(|v| v.trim().parse().ok()) {
            self.kube.connect_timeout_secs = secs;
        }
        if let Some(secs) = lookup(ENV_READ_TIMEOUT).and_then(|v| v.trim().parse().ok()) {
            self.kube.read_timeout_secs = secs;
        }
        self
    }

    /// Options used to pick a context out of a kubeconfig.
    pub fn kubeconfig_options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.kube.context.clone(),
            cluster: self.kube.cluster.clone(),
            user: self.kube.user.clone(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.kube.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.kube.read_timeout_secs)
    }

    /// Set the configured timeouts on a client config.
    pub fn apply_timeouts(&self, config: &mut kube::Config) {
        config.connect_timeout = Some(self.connect_timeout());
        config.read_timeout = Some(self.read_timeout());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = ResolverSettings::default();
        assert!(settings.kube.context.is_none());
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.read_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = ResolverSettings::from_toml(
            r#"
[kube]
context = "admin@prod"
read_timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(settings.kube.context.as_deref(), Some("admin@prod"));
        assert_eq!(settings.kube.read_timeout_secs, 5);
        assert_eq!(settings.kube.connect_timeout_secs, 10);
    }

    #[test]
    fn test_from_toml_empty() {
        let settings = ResolverSettings::from_toml("").unwrap();
        assert_eq!(settings, ResolverSettings::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = ResolverSettings::from_toml("[kube]\nread_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConnectError::ParseToml(_)));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ResolverSettings::load_from(&dir.path().join("kubeconn.toml")).unwrap();
        assert_eq!(settings, ResolverSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kubeconn.toml");
        std::fs::write(&path, "[kube]\nuser = \"admin\"\n").unwrap();

        let settings = ResolverSettings::load_from(&path).unwrap();
        assert_eq!(settings.kube.user.as_deref(), Some("admin"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_CONTEXT, "staging"),
            (ENV_CONNECT_TIMEOUT, "3"),
            (ENV_READ_TIMEOUT, "not-a-number"),
        ]);
        let settings = ResolverSettings::default()
            .with_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.kube.context.as_deref(), Some("staging"));
        assert_eq!(settings.kube.connect_timeout_secs, 3);
        assert_eq!(settings.kube.read_timeout_secs, 30);
    }

    #[test]
    fn test_kubeconfig_options() {
        let mut settings = ResolverSettings::default();
        settings.kube.context = Some("ctx".to_string());
        let options = settings.kubeconfig_options();
        assert_eq!(options.context.as_deref(), Some("ctx"));
        assert!(options.cluster.is_none());
        assert!(options.user.is_none());
    }
}
