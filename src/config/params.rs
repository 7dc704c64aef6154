//! Resolution of loader parameters from command-line flags and environment variables.

use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_NAME_PARAM: &str = "NODE_CONFIG_ENV_NAME";
pub const ENV_PARAM: &str = "NODE_CONFIG_ENV";
pub const DIR_PARAM: &str = "NODE_CONFIG_DIR";

pub const DEFAULT_ENV_NAME: &str = "NODE_ENV";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// The inputs a parameter can be read from: `--name=value` flags, then variables.
///
/// Empty values are treated as not supplied, so `--NODE_CONFIG_ENV=` falls
/// through to the environment variable and then to the default.
#[derive(Debug, Clone, Default)]
pub struct ParamSource {
    args: Vec<String>,
    vars: HashMap<String, String>,
}

impl ParamSource {
    pub fn new<A, V, K, S>(args: A, vars: V) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        V: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Captures the running process: arguments after the program name and
    /// every environment variable that is valid unicode.
    pub fn from_process() -> Self {
        let args = std::env::args_os()
            .skip(1)
            .filter_map(|arg| arg.into_string().ok());
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::new(args, vars)
    }

    pub(crate) fn replace_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    pub(crate) fn replace_vars(&mut self, vars: HashMap<String, String>) {
        self.vars = vars;
    }

    pub(crate) fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of the first argument starting with `--{name}=`.
    pub fn flag(&self, name: &str) -> Option<&str> {
        let prefix = format!("--{name}=");
        self.args
            .iter()
            .find_map(|arg| arg.strip_prefix(&prefix))
            .filter(|value| !value.is_empty())
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn resolve(&self, name: &str) -> Option<String> {
        self.flag(name).or_else(|| self.var(name)).map(str::to_owned)
    }

    pub fn resolve_or(&self, name: &str, default: impl Into<String>) -> String {
        self.resolve(name).unwrap_or_else(|| default.into())
    }
}

/// Parameters resolved once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParams {
    /// Name of the variable holding the environment (`NODE_ENV` by default).
    pub env_name: String,
    pub environment: String,
    pub dir: PathBuf,
}

impl ResolvedParams {
    pub fn resolve(source: &ParamSource) -> Self {
        let env_name = source.resolve_or(ENV_NAME_PARAM, DEFAULT_ENV_NAME);
        let environment = source
            .resolve(ENV_PARAM)
            .or_else(|| source.resolve(&env_name))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());
        let dir = source
            .resolve(DIR_PARAM)
            .map(PathBuf::from)
            .unwrap_or_else(default_dir);

        Self {
            env_name,
            environment,
            dir,
        }
    }

    /// File stems in merge order, lowest precedence first.
    pub fn base_names(&self) -> Vec<String> {
        let env = &self.environment;
        vec![
            "default".to_owned(),
            env.clone(),
            "local".to_owned(),
            format!("local-{env}"),
            "application".to_owned(),
            format!("application-{env}"),
        ]
    }
}

fn default_dir() -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join("config"))
        .unwrap_or_else(|_| PathBuf::from("config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(args: &[&str], vars: &[(&str, &str)]) -> ParamSource {
        ParamSource::new(args.iter().copied(), vars.iter().copied())
    }

    #[test]
    fn test_flag_wins_over_variable() {
        let src = source(&["--NODE_CONFIG_ENV=staging"], &[("NODE_CONFIG_ENV", "qa")]);
        assert_eq!(src.resolve("NODE_CONFIG_ENV").as_deref(), Some("staging"));
    }

    #[test]
    fn test_variable_used_without_flag() {
        let src = source(&["--other=1"], &[("NODE_CONFIG_ENV", "qa")]);
        assert_eq!(src.resolve("NODE_CONFIG_ENV").as_deref(), Some("qa"));
    }

    #[test]
    fn test_default_when_absent() {
        let src = source(&[], &[]);
        assert_eq!(src.resolve_or("NODE_CONFIG_ENV", "fallback"), "fallback");
    }

    #[test]
    fn test_flag_requires_exact_prefix() {
        let src = source(&["--NODE_CONFIG_ENVX=nope", "NODE_CONFIG_ENV=nope"], &[]);
        assert_eq!(src.resolve("NODE_CONFIG_ENV"), None);
    }

    #[test]
    fn test_first_matching_flag_wins() {
        let src = source(&["--NODE_CONFIG_ENV=one", "--NODE_CONFIG_ENV=two"], &[]);
        assert_eq!(src.flag("NODE_CONFIG_ENV"), Some("one"));
    }

    #[test]
    fn test_flag_value_may_contain_equals() {
        let src = source(&["--NODE_CONFIG_DIR=/srv/a=b"], &[]);
        assert_eq!(src.flag("NODE_CONFIG_DIR"), Some("/srv/a=b"));
    }

    #[test]
    fn test_empty_flag_falls_through_to_variable() {
        let src = source(&["--NODE_CONFIG_ENV="], &[("NODE_CONFIG_ENV", "qa")]);
        assert_eq!(src.resolve("NODE_CONFIG_ENV").as_deref(), Some("qa"));
    }

    #[test]
    fn test_empty_variable_falls_through_to_default() {
        let src = source(&[], &[("NODE_CONFIG_ENV", "")]);
        assert_eq!(src.resolve_or("NODE_CONFIG_ENV", "development"), "development");
    }

    #[test]
    fn test_resolved_defaults() {
        let params = ResolvedParams::resolve(&source(&[], &[]));
        assert_eq!(params.env_name, "NODE_ENV");
        assert_eq!(params.environment, "development");
        assert!(params.dir.ends_with("config"));
    }

    #[test]
    fn test_environment_from_node_env() {
        let params = ResolvedParams::resolve(&source(&[], &[("NODE_ENV", "production")]));
        assert_eq!(params.environment, "production");
    }

    #[test]
    fn test_node_config_env_beats_node_env() {
        let params = ResolvedParams::resolve(&source(
            &[],
            &[("NODE_ENV", "production"), ("NODE_CONFIG_ENV", "staging")],
        ));
        assert_eq!(params.environment, "staging");
    }

    #[test]
    fn test_custom_env_name() {
        let params = ResolvedParams::resolve(&source(
            &["--NODE_CONFIG_ENV_NAME=APP_ENV"],
            &[("APP_ENV", "test"), ("NODE_ENV", "production")],
        ));
        assert_eq!(params.env_name, "APP_ENV");
        assert_eq!(params.environment, "test");
    }

    #[test]
    fn test_dir_from_flag() {
        let params = ResolvedParams::resolve(&source(&["--NODE_CONFIG_DIR=/etc/app"], &[]));
        assert_eq!(params.dir, PathBuf::from("/etc/app"));
    }

    #[test]
    fn test_base_names_order() {
        let params = ResolvedParams {
            env_name: "NODE_ENV".into(),
            environment: "production".into(),
            dir: PathBuf::from("config"),
        };
        assert_eq!(
            params.base_names(),
            vec![
                "default",
                "production",
                "local",
                "local-production",
                "application",
                "application-production",
            ]
        );
    }
}
