//! Kubernetes API connection resolution for orchestration hosts.
//!
//! A host hands over a property bag describing where the cluster config lives
//! and gets back an authenticated client. Four mutually exclusive shapes are
//! recognised, tried in priority order:
//! - `blueprint_file_name`: kubeconfig bundled with the blueprint
//! - `manager_file_path`: kubeconfig on the manager host (`~` allowed)
//! - `file_content`: kubeconfig document inline in the bag
//! - `api_options`: host and TLS options given directly
//!
//! ```no_run
//! use kubeconn::{ConfigurationBag, ConnectionContext, ConfigurationResolver, DirectoryResolver};
//!
//! # async fn run() -> kubeconn::Result<()> {
//! let bag = ConfigurationBag::from_yaml_str("manager_file_path: ~/.kube/config")?;
//! let resources = DirectoryResolver::new("/opt/blueprint");
//! let ctx = ConnectionContext::with_tracing(&resources);
//! let handle = ConfigurationResolver::new().resolve(&bag, &ctx).await?;
//! let client = handle.into_client();
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

pub mod bag;
pub mod context;
pub mod error;
pub mod options;
pub mod paths;
pub mod resolver;
pub mod settings;
pub mod strategy;

pub use bag::ConfigurationBag;
pub use context::{ConnectionContext, DirectoryResolver, LogSink, ResourceResolver, TracingSink};
pub use error::{ConnectError, Result, StrategyError};
pub use options::ApiOptions;
pub use resolver::{ClientHandle, ConfigurationResolver, resolve};
pub use settings::{KubeSettings, ResolverSettings};
pub use strategy::{Attempt, Strategy};
