//! Connection resolution - turns a property bag into a ready client.
//!
//! Strategies are tried in [`Strategy::PRIORITY`] order. The first one that
//! both applies and produces a client wins; the rest are never consulted.
//! Strategy failures are logged and downgraded to "try the next one", so the
//! only error a caller sees is [`ConnectError::NoSuitableVariant`].

use std::fmt;

use crate::bag::ConfigurationBag;
use crate::context::ConnectionContext;
use crate::settings::ResolverSettings;
use crate::strategy::{Attempt, Strategy};
use crate::{ConnectError, Result};

/// An authenticated client plus the config it was built from.
#[derive(Clone)]
pub struct ClientHandle {
    strategy: Strategy,
    config: kube::Config,
    client: kube::Client,
}

impl ClientHandle {
    pub(crate) fn new(strategy: Strategy, config: kube::Config, client: kube::Client) -> Self {
        Self {
            strategy,
            config,
            client,
        }
    }

    /// The strategy that produced this handle.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The per-call client config.
    pub fn config(&self) -> &kube::Config {
        &self.config
    }

    pub fn client(&self) -> &kube::Client {
        &self.client
    }

    pub fn into_client(self) -> kube::Client {
        self.client
    }

    pub fn cluster_url(&self) -> &http::Uri {
        &self.config.cluster_url
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("strategy", &self.strategy)
            .field("cluster_url", &self.config.cluster_url)
            .field("default_namespace", &self.config.default_namespace)
            .finish_non_exhaustive()
    }
}

/// Picks the connection strategy for a bag.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationResolver {
    settings: ResolverSettings,
}

impl ConfigurationResolver {
    /// Resolver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve a client for `bag`.
    ///
    /// Returns exactly one handle or [`ConnectError::NoSuitableVariant`]
    /// carrying the bag.
    pub async fn resolve(
        &self,
        bag: &ConfigurationBag,
        ctx: &ConnectionContext<'_>,
    ) -> Result<ClientHandle> {
        ctx.debug("checking how Kubernetes API should be configured");

        for strategy in Strategy::PRIORITY {
            match strategy.attempt(bag, ctx, &self.settings).await {
                Attempt::Success(handle) => {
                    ctx.debug(&format!("option {strategy} will be used"));
                    return Ok(handle);
                }
                Attempt::NotApplicable => {
                    ctx.debug(&format!("option {strategy} cannot be used: not configured"));
                }
                Attempt::Failed(e) => {
                    ctx.debug(&format!("option {strategy} cannot be used: {e}"));
                }
            }
        }

        Err(ConnectError::NoSuitableVariant { bag: bag.clone() })
    }
}

/// Resolve with default settings.
pub async fn resolve(bag: &ConfigurationBag, ctx: &ConnectionContext<'_>) -> Result<ClientHandle> {
    ConfigurationResolver::new().resolve(bag, ctx).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
