pub mod config;

pub use config::{
    ArrayMerge, Config, ConfigBuilder, ConfigError, Lookup, ParamSource, PropertyPath,
    ResolvedParams,
};
pub use serde_yaml::Value;
