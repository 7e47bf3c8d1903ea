//! The closed set of connection strategies and their priority order.
//!
//! Each strategy looks for one key in the bag. A strategy whose key is absent
//! is [`Attempt::NotApplicable`]; one whose key is present but cannot produce
//! a client is [`Attempt::Failed`]. Both cause the resolver to move on.

use std::fmt;

use kube::config::{KubeConfigOptions, Kubeconfig};
use serde_json::Value;

use crate::bag::{
    API_OPTIONS_KEY, BLUEPRINT_FILE_NAME_KEY, ConfigurationBag, FILE_CONTENT_KEY,
    MANAGER_FILE_PATH_KEY,
};
use crate::context::ConnectionContext;
use crate::error::StrategyError;
use crate::options::ApiOptions;
use crate::paths::{existing_file, expand_path};
use crate::resolver::ClientHandle;
use crate::settings::ResolverSettings;

/// One way of deriving a client from the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Kubeconfig bundled with the blueprint, fetched through the host.
    BlueprintFile,
    /// Kubeconfig at a path on the manager host.
    ManagerFilePath,
    /// Kubeconfig document inline in the bag.
    FileContent,
    /// Host and TLS options given directly.
    ApiOptions,
}

impl Strategy {
    /// Evaluation order. The first strategy that succeeds wins.
    pub const PRIORITY: [Strategy; 4] = [
        Strategy::BlueprintFile,
        Strategy::ManagerFilePath,
        Strategy::FileContent,
        Strategy::ApiOptions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::BlueprintFile => "BlueprintFile",
            Strategy::ManagerFilePath => "ManagerFilePath",
            Strategy::FileContent => "FileContent",
            Strategy::ApiOptions => "ApiOptions",
        }
    }

    /// Bag key whose presence signals this strategy.
    pub fn key(self) -> &'static str {
        match self {
            Strategy::BlueprintFile => BLUEPRINT_FILE_NAME_KEY,
            Strategy::ManagerFilePath => MANAGER_FILE_PATH_KEY,
            Strategy::FileContent => FILE_CONTENT_KEY,
            Strategy::ApiOptions => API_OPTIONS_KEY,
        }
    }

    /// Try to build a client from the bag.
    pub async fn attempt(
        self,
        bag: &ConfigurationBag,
        ctx: &ConnectionContext<'_>,
        settings: &ResolverSettings,
    ) -> Attempt {
        let Some(loaded) = self.load(bag, ctx) else {
            return Attempt::NotApplicable;
        };

        let result = match loaded {
            Ok(kubeconfig) => {
                connect(self, kubeconfig, &self.kubeconfig_options(settings), settings).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(handle) => Attempt::Success(handle),
            Err(e) => {
                if self == Strategy::BlueprintFile
                    && !matches!(e, StrategyError::FileMissing { .. })
                {
                    ctx.error(&format!("cannot download config file from blueprint: {e}"));
                }
                Attempt::Failed(e)
            }
        }
    }

    /// Context selection for the loaded kubeconfig.
    ///
    /// The document built from `api_options` has a single generated context,
    /// so the configured context, cluster and user overrides only apply to
    /// file-backed kubeconfigs.
    fn kubeconfig_options(self, settings: &ResolverSettings) -> KubeConfigOptions {
        match self {
            Strategy::ApiOptions => KubeConfigOptions::default(),
            _ => settings.kubeconfig_options(),
        }
    }

    /// Produce the kubeconfig this strategy describes, or `None` when its
    /// key is absent.
    fn load(
        self,
        bag: &ConfigurationBag,
        ctx: &ConnectionContext<'_>,
    ) -> Option<Result<Kubeconfig, StrategyError>> {
        let value = bag.get(self.key())?;
        match self {
            Strategy::BlueprintFile => Some(load_blueprint_file(value, ctx)),
            Strategy::ManagerFilePath => Some(load_manager_file(value)),
            Strategy::FileContent => Some(load_file_content(value)),
            Strategy::ApiOptions => match ApiOptions::from_value(value) {
                Ok(None) => None,
                Ok(Some(options)) => Some(options.to_kubeconfig()),
                Err(e) => Some(Err(e)),
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a single strategy.
#[derive(Debug)]
pub enum Attempt {
    /// The strategy's key is absent, or present without its required parts.
    NotApplicable,
    /// The strategy applies but could not produce a client.
    Failed(StrategyError),
    /// A usable client.
    Success(ClientHandle),
}

fn load_blueprint_file(
    value: &Value,
    ctx: &ConnectionContext<'_>,
) -> Result<Kubeconfig, StrategyError> {
    let name = value.as_str().ok_or(StrategyError::InvalidValue {
        key: BLUEPRINT_FILE_NAME_KEY,
        expected: "a string",
    })?;

    let fetched = ctx.resolve_resource(name)?;
    let path = existing_file(&fetched).ok_or_else(|| StrategyError::FileMissing {
        path: fetched.display().to_string(),
    })?;
    Ok(Kubeconfig::read_from(path)?)
}

fn load_manager_file(value: &Value) -> Result<Kubeconfig, StrategyError> {
    let raw = value
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(StrategyError::InvalidValue {
            key: MANAGER_FILE_PATH_KEY,
            expected: "a non-empty string",
        })?;

    let path = existing_file(raw).ok_or_else(|| StrategyError::FileMissing {
        path: expand_path(raw).display().to_string(),
    })?;
    Ok(Kubeconfig::read_from(path)?)
}

fn load_file_content(value: &Value) -> Result<Kubeconfig, StrategyError> {
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value.clone())?),
        Value::String(text) => Ok(Kubeconfig::from_yaml(text)?),
        _ => Err(StrategyError::InvalidValue {
            key: FILE_CONTENT_KEY,
            expected: "a kubeconfig mapping or YAML text",
        }),
    }
}

/// Turn a kubeconfig into an isolated client config and client.
async fn connect(
    strategy: Strategy,
    kubeconfig: Kubeconfig,
    options: &KubeConfigOptions,
    settings: &ResolverSettings,
) -> Result<ClientHandle, StrategyError> {
    let mut config = kube::Config::from_custom_kubeconfig(kubeconfig, options).await?;
    settings.apply_timeouts(&mut config);
    let client = kube::Client::try_from(config.clone())?;
    Ok(ClientHandle::new(strategy, config, client))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
