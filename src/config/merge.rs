//! Deep merge of parsed configuration files.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, trace, warn};

use super::file::{candidate_path, load_path};
use super::path::is_truthy;
use super::ConfigError;

/// How two sequences under the same key are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrayMerge {
    /// Base elements followed by overlay elements.
    #[default]
    Concatenate,
    /// The overlay sequence replaces the base sequence.
    Replace,
}

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// - Mappings are merged recursively, key by key
/// - Sequences are combined according to `arrays`
/// - Anything else is replaced entirely by the overlay, including nulls
pub fn deep_merge(base: Value, overlay: Value, arrays: ArrayMerge) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value, arrays),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (Value::Sequence(mut base_items), Value::Sequence(overlay_items))
            if arrays == ArrayMerge::Concatenate =>
        {
            base_items.extend(overlay_items);
            Value::Sequence(base_items)
        }
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order onto an empty mapping.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>, arrays: ArrayMerge) -> Value {
    values
        .into_iter()
        .fold(Value::Mapping(Mapping::new()), |acc, value| {
            deep_merge(acc, value, arrays)
        })
}

/// Result of folding every candidate file in a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedFiles {
    pub value: Value,
    /// Files that contributed, in merge order.
    pub sources: Vec<PathBuf>,
}

/// Loads `dir/{base}.{ext}` for every base name and extension, in that
/// nesting order, and folds the documents into one mapping.
///
/// Missing and empty files are skipped, as are documents that are null,
/// `false`, `0` or `""`. Any other document that is not a mapping is
/// ignored with a warning, so the aggregate is always a mapping.
pub fn merge_files<B, E>(
    dir: &Path,
    base_names: &[B],
    extensions: &[E],
    arrays: ArrayMerge,
) -> Result<MergedFiles, ConfigError>
where
    B: AsRef<str>,
    E: AsRef<str>,
{
    let mut documents = Vec::new();
    let mut sources = Vec::new();

    for base_name in base_names {
        for extension in extensions {
            let path = candidate_path(dir, base_name.as_ref(), extension.as_ref());
            match load_path(&path)? {
                Some(value @ Value::Mapping(_)) => {
                    debug!(path = %path.display(), "merging config file");
                    documents.push(value);
                    sources.push(path);
                }
                Some(value) if is_truthy(&value) => {
                    warn!(path = %path.display(), "config file is not a mapping, ignoring");
                }
                _ => {
                    trace!(path = %path.display(), "config file skipped");
                }
            }
        }
    }

    Ok(MergedFiles {
        value: deep_merge_all(documents, arrays),
        sources,
    })
}
