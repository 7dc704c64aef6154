//! Layered YAML configuration loading and dotted-path access.

mod access;
mod builder;
mod env;
mod error;
pub mod file;
pub mod merge;
pub mod params;
mod path;

pub use access::Config;
pub use builder::ConfigBuilder;
pub use error::ConfigError;
pub use merge::{deep_merge, ArrayMerge, MergedFiles};
pub use params::{ParamSource, ResolvedParams};
pub use path::{Lookup, PropertyPath};
