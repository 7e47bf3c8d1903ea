//! Connection resolution error types.

use crate::bag::ConfigurationBag;

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Errors surfaced to callers of the resolver and the config loaders.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Every strategy was either inapplicable or failed.
    ///
    /// Carries the full input bag so operators can see what was supplied.
    #[error(
        "cannot initialize Kubernetes API - no suitable configuration variant found for {bag} properties"
    )]
    NoSuitableVariant { bag: ConfigurationBag },

    /// Failed to read a settings or bag file.
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML settings.
    #[error("failed to parse settings: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Failed to parse a YAML property bag.
    #[error("failed to parse YAML property bag: {0}")]
    ParseYaml(String),

    /// Failed to parse a JSON property bag.
    #[error("failed to parse JSON property bag: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// A property bag must be a mapping at the top level.
    #[error("property bag must be a mapping, got {0}")]
    NotAMapping(&'static str),
}

/// Why a single strategy could not produce a client.
///
/// These never escape [`ConfigurationResolver::resolve`](crate::ConfigurationResolver::resolve);
/// they are logged and the next strategy is tried.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// The host could not map a resource name to a local file.
    #[error("cannot resolve resource '{name}': {reason}")]
    ResourceFetch { name: String, reason: String },

    /// A bag value has the wrong shape.
    #[error("'{key}' must be {expected}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },

    /// A config path does not point at a regular file.
    #[error("config file '{path}' does not exist")]
    FileMissing { path: String },

    /// The kubeconfig could not be read, parsed, or turned into a client config.
    #[error("invalid kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// The kubeconfig document in the bag does not deserialize.
    #[error("invalid kubeconfig document: {0}")]
    Document(#[from] serde_json::Error),

    /// The client could not be constructed from a valid config.
    #[error("failed to build client: {0}")]
    Client(#[from] kube::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_suitable_variant_message_includes_bag() {
        let bag = ConfigurationBag::from_json_str(r#"{"blueprint_file_name": "kubernetes.conf"}"#)
            .unwrap();
        let err = ConnectError::NoSuitableVariant { bag };
        assert_eq!(
            err.to_string(),
            r#"cannot initialize Kubernetes API - no suitable configuration variant found for {"blueprint_file_name":"kubernetes.conf"} properties"#
        );
    }

    #[test]
    fn test_invalid_value_message() {
        let err = StrategyError::InvalidValue {
            key: "manager_file_path",
            expected: "a string",
        };
        assert_eq!(err.to_string(), "'manager_file_path' must be a string");
    }
}
