use std::path::{Path, PathBuf};

use tracing::debug;

use super::access::Config;
use super::env::EnvOverrides;
use super::file::EXTENSIONS;
use super::merge::{merge_files, ArrayMerge};
use super::params::{ParamSource, ResolvedParams};
use super::ConfigError;

/// Builder for loading the layered YAML files of a config directory.
///
/// For every base name, lowest to highest precedence,
///
/// ```text
/// default, <env>, local, local-<env>, application, application-<env>
/// ```
///
/// `<name>.yaml` and then `<name>.yml` are merged onto the result. Nested
/// mappings are merged recursively, sequences are concatenated by default,
/// and other values are replaced. Missing and empty files are skipped.
///
/// The environment and directory come from `--NODE_CONFIG_ENV=..` /
/// `--NODE_CONFIG_DIR=..` flags, then the variables of the same name, then
/// the variable named by `NODE_CONFIG_ENV_NAME` (`NODE_ENV` by default).
///
/// ## Example
///
/// ```no_run
/// use yaml_cascade::{ArrayMerge, Config};
///
/// let config = Config::builder()
///     .with_dir("config")
///     .with_environment("production")
///     .with_array_merge(ArrayMerge::Replace)
///     .with_env_overrides("MYAPP", "__")
///     .build()?;
///
/// let port = config.get_as::<u16>("server.port")?;
/// # let _ = port;
/// # Ok::<(), yaml_cascade::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigBuilder {
    source: Option<ParamSource>,
    dir: Option<PathBuf>,
    environment: Option<String>,
    arrays: ArrayMerge,
    env_overrides: Option<EnvOverrides>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Loads configuration from the running process's arguments and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder().build()
    }
}

impl ConfigBuilder {
    /// Resolves parameters from `source` instead of the running process.
    pub fn with_source(mut self, source: ParamSource) -> Self {
        self.source = Some(source);
        self
    }

    fn source_mut(&mut self) -> &mut ParamSource {
        self.source.get_or_insert_with(ParamSource::from_process)
    }

    /// Command-line arguments to scan for `--name=value` flags, without the program name.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.source_mut()
            .replace_args(args.into_iter().map(Into::into).collect());
        self
    }

    /// Environment variables to consult instead of the process environment.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.source_mut()
            .replace_vars(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Uses `dir` as the config directory regardless of `NODE_CONFIG_DIR`.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Uses `environment` regardless of flags and variables.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_array_merge(mut self, arrays: ArrayMerge) -> Self {
        self.arrays = arrays;
        self
    }

    /// Overlays variables like `{prefix}{separator}DB{separator}HOST` onto
    /// the merged files as string values at `db.host`.
    ///
    /// # Panics
    ///
    /// Panics if `separator` is empty.
    pub fn with_env_overrides(
        mut self,
        prefix: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        self.env_overrides = Some(EnvOverrides::new(prefix, separator));
        self
    }

    /// Resolves parameters, then loads and merges every candidate file.
    pub fn build(mut self) -> Result<Config, ConfigError> {
        let source = self.source.take().unwrap_or_else(ParamSource::from_process);
        let mut params = ResolvedParams::resolve(&source);
        if let Some(environment) = self.environment.take() {
            params.environment = environment;
        }
        if let Some(dir) = self.dir.take() {
            params.dir = dir;
        }

        debug!(
            env_name = %params.env_name,
            environment = %params.environment,
            dir = %params.dir.display(),
            "loading configuration"
        );

        let merged = merge_files(&params.dir, &params.base_names(), &EXTENSIONS, self.arrays)?;
        let mut root = merged.value;
        if let Some(overrides) = &self.env_overrides {
            root = overrides.apply(root, source.vars());
        }

        debug!(files = merged.sources.len(), "configuration loaded");
        Ok(Config::new(root, params, merged.sources))
    }
}
