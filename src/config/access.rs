//! The loaded, read-only configuration.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use super::params::ResolvedParams;
use super::path::{is_truthy, resolve, Lookup, PropertyPath};
use super::ConfigError;

const ROOT_PATH: &str = "(root)";

/// Merged configuration built once by [`ConfigBuilder::build`](super::ConfigBuilder::build).
///
/// Nothing mutates the tree after construction, so a `&Config` can be shared
/// freely between components and threads.
///
/// ## Example
///
/// ```no_run
/// use yaml_cascade::Config;
///
/// let config = Config::load()?;
/// let host = config.get("db.host")?;
/// if config.has("features.tracing") {
///     // ...
/// }
/// # let _ = host;
/// # Ok::<(), yaml_cascade::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    root: Value,
    params: ResolvedParams,
    sources: Vec<PathBuf>,
}

impl Config {
    pub(crate) fn new(root: Value, params: ResolvedParams, sources: Vec<PathBuf>) -> Self {
        Self {
            root,
            params,
            sources,
        }
    }

    /// Resolves `path` without raising.
    pub fn lookup<'a>(&self, path: impl Into<PropertyPath<'a>>) -> Lookup<'_> {
        resolve(&self.root, &path.into())
    }

    /// Returns the value at `path`.
    ///
    /// A present value is returned as-is even when it is null, `false`, `0`
    /// or empty. Fails with [`ConfigError::UndefinedProperty`] naming the
    /// full path when any segment is missing.
    pub fn get<'a>(&self, path: impl Into<PropertyPath<'a>>) -> Result<&Value, ConfigError> {
        let path = path.into();
        resolve(&self.root, &path)
            .found()
            .ok_or_else(|| ConfigError::UndefinedProperty(path.to_string()))
    }

    /// Returns `true` when `path` resolves to a truthy value.
    ///
    /// A present value of `false`, `0`, `""` or null reports `false`, the
    /// same as a missing one. Use [`lookup`](Self::lookup) to tell them apart.
    pub fn has<'a>(&self, path: impl Into<PropertyPath<'a>>) -> bool {
        self.lookup(path).found().is_some_and(is_truthy)
    }

    /// Deserializes the value at `path` into `T`.
    pub fn get_as<'a, T: DeserializeOwned>(
        &self,
        path: impl Into<PropertyPath<'a>>,
    ) -> Result<T, ConfigError> {
        let path = path.into();
        let value = resolve(&self.root, &path)
            .found()
            .ok_or_else(|| ConfigError::UndefinedProperty(path.to_string()))?;
        serde_yaml::from_value(value.clone()).map_err(|source| ConfigError::DeserializeError {
            path: path.to_string(),
            source,
        })
    }

    /// Deserializes the whole tree into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_yaml::from_value(self.root.clone()).map_err(|source| {
            ConfigError::DeserializeError {
                path: ROOT_PATH.to_owned(),
                source,
            }
        })
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn params(&self) -> &ResolvedParams {
        &self.params
    }

    pub fn environment(&self) -> &str {
        &self.params.environment
    }

    pub fn dir(&self) -> &Path {
        &self.params.dir
    }

    /// Files merged into this configuration, lowest precedence first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}
