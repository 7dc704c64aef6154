use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file exists and is non-empty but could not be read.
    #[error("config file '{path}' cannot be read: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid YAML. `source` is the parser's own error.
    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("configuration property \"{0}\" is not defined")]
    UndefinedProperty(String),

    #[error("failed to deserialize configuration property \"{path}\": {source}")]
    DeserializeError {
        path: String,
        source: serde_yaml::Error,
    },
}
