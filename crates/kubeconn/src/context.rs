//! Collaborators supplied by the host for a single resolve call.
//!
//! The host engine provides two capabilities: mapping a blueprint resource
//! name to a local file, and a leveled logging sink. Both are borrowed for the
//! duration of one [`resolve`](crate::ConfigurationResolver::resolve) call and
//! never retained.

use std::path::{Component, Path, PathBuf};

use tracing::Level;

use crate::error::StrategyError;

/// Maps a symbolic resource name to a local filesystem path.
pub trait ResourceResolver {
    /// Resolve `name`, failing if the host cannot provide it.
    fn resolve_resource(&self, name: &str) -> Result<PathBuf, StrategyError>;
}

impl<F> ResourceResolver for F
where
    F: Fn(&str) -> Result<PathBuf, StrategyError>,
{
    fn resolve_resource(&self, name: &str) -> Result<PathBuf, StrategyError> {
        self(name)
    }
}

/// Resolves resources as files below a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for DirectoryResolver {
    fn resolve_resource(&self, name: &str) -> Result<PathBuf, StrategyError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || escapes {
            return Err(StrategyError::ResourceFetch {
                name: name.to_string(),
                reason: "resource name must be a relative path inside the blueprint".to_string(),
            });
        }

        let path = self.root.join(relative);
        if !path.exists() {
            return Err(StrategyError::ResourceFetch {
                name: name.to_string(),
                reason: format!("not found under {}", self.root.display()),
            });
        }
        Ok(path)
    }
}

/// Accepts leveled text messages.
pub trait LogSink {
    fn log(&self, level: Level, message: &str);
}

/// Forwards messages to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!(target: "kubeconn", "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "kubeconn", "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "kubeconn", "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "kubeconn", "{message}");
        } else {
            tracing::trace!(target: "kubeconn", "{message}");
        }
    }
}

/// Host capabilities for one resolve call.
#[derive(Clone, Copy)]
pub struct ConnectionContext<'a> {
    resources: &'a dyn ResourceResolver,
    logger: &'a dyn LogSink,
}

impl<'a> ConnectionContext<'a> {
    pub fn new(resources: &'a dyn ResourceResolver, logger: &'a dyn LogSink) -> Self {
        Self { resources, logger }
    }

    /// Context that logs through `tracing`.
    pub fn with_tracing(resources: &'a dyn ResourceResolver) -> Self {
        Self::new(resources, &TracingSink)
    }

    pub fn resolve_resource(&self, name: &str) -> Result<PathBuf, StrategyError> {
        self.resources.resolve_resource(name)
    }

    pub fn log(&self, level: Level, message: &str) {
        self.logger.log(level, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

impl std::fmt::Debug for ConnectionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(Level, String)>>);

    impl LogSink for Recorder {
        fn log(&self, level: Level, message: &str) {
            self.0.borrow_mut().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_directory_resolver_finds_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kubernetes.conf"), "").unwrap();

        let resolver = DirectoryResolver::new(dir.path());
        let path = resolver.resolve_resource("kubernetes.conf").unwrap();
        assert_eq!(path, dir.path().join("kubernetes.conf"));
    }

    #[test]
    fn test_directory_resolver_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(dir.path());
        let err = resolver.resolve_resource("absent.conf").unwrap_err();
        assert!(matches!(
            err,
            StrategyError::ResourceFetch { ref name, .. } if name == "absent.conf"
        ));
    }

    #[test]
    fn test_directory_resolver_rejects_escape() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(dir.path());
        assert!(resolver.resolve_resource("../etc/passwd").is_err());
        assert!(resolver.resolve_resource("/etc/passwd").is_err());
        assert!(resolver.resolve_resource("").is_err());
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str| -> Result<PathBuf, StrategyError> {
            Ok(PathBuf::from("/tmp").join(name))
        };
        let logger = Recorder::default();
        let ctx = ConnectionContext::new(&resolver, &logger);
        assert_eq!(
            ctx.resolve_resource("a.conf").unwrap(),
            PathBuf::from("/tmp/a.conf")
        );
    }

    #[test]
    fn test_context_logs_to_sink() {
        let resolver = DirectoryResolver::new(".");
        let logger = Recorder::default();
        let ctx = ConnectionContext::new(&resolver, &logger);
        ctx.debug("checking");
        ctx.error("broken");

        let lines = logger.0.borrow();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (Level::DEBUG, "checking".to_string()));
        assert_eq!(lines[1], (Level::ERROR, "broken".to_string()));
    }
}
