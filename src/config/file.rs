//! File-based configuration source.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use super::ConfigError;

/// Extensions tried for every base name, in order.
pub const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

const BOM: char = '\u{feff}';

/// Path of the candidate file `dir/base_name.extension`.
pub fn candidate_path(dir: &Path, base_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{base_name}.{extension}"))
}

/// Loads `dir/base_name.extension`.
///
/// Returns `Ok(None)` if the file doesn't exist or is empty.
pub fn load_file(
    dir: &Path,
    base_name: &str,
    extension: &str,
) -> Result<Option<Value>, ConfigError> {
    load_path(&candidate_path(dir, base_name, extension))
}

/// Loads and parses a YAML config file, stripping a leading byte-order mark.
///
/// Invalid UTF-8 is decoded lossily and left to the parser. Mapping keys
/// are normalized with [`normalize_keys`].
pub fn load_path(path: &Path) -> Result<Option<Value>, ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {}
        _ => return Ok(None),
    }

    let bytes = std::fs::read(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let decoded = String::from_utf8_lossy(&bytes);
    let contents = decoded.strip_prefix(BOM).unwrap_or(&decoded);

    let value = serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(normalize_keys(value)))
}

/// Rewrites scalar mapping keys to strings, recursively: `80:` becomes
/// `"80"`, `true:` becomes `"true"` and `~:` becomes `"null"`.
///
/// When two keys collapse to the same string the later one wins.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut normalized = Mapping::with_capacity(map.len());
            for (key, value) in map {
                normalized.insert(string_key(key), normalize_keys(value));
            }
            Value::Mapping(normalized)
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_keys).collect()),
        Value::Tagged(mut tagged) => {
            tagged.value = normalize_keys(std::mem::take(&mut tagged.value));
            Value::Tagged(tagged)
        }
        other => other,
    }
}

fn string_key(key: Value) -> Value {
    match key {
        Value::Null => Value::String("null".to_owned()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_loads_valid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.yaml"), "key: value\n").unwrap();

        let value = load_file(dir.path(), "default", "yaml").unwrap().unwrap();
        assert_eq!(value["key"], Value::String("value".into()));
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        assert!(load_file(dir.path(), "default", "yaml").unwrap().is_none());
    }

    #[test]
    fn test_empty_file_is_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.yml"), "").unwrap();
        assert!(load_file(dir.path(), "default", "yml").unwrap().is_none());
    }

    #[test]
    fn test_bom_is_stripped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.yaml"), "a:\n  b: 1\n").unwrap();
        fs::write(dir.path().join("bom.yaml"), "\u{feff}a:\n  b: 1\n").unwrap();

        let plain = load_file(dir.path(), "plain", "yaml").unwrap();
        let bom = load_file(dir.path(), "bom", "yaml").unwrap();
        assert_eq!(plain, bom);
    }

    #[test]
    fn test_comment_only_file_parses_to_null() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.yaml"), "# nothing here\n").unwrap();
        let value = load_file(dir.path(), "default", "yaml").unwrap();
        assert_eq!(value, Some(Value::Null));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.yaml"), "a: [1, 2\n").unwrap();

        let result = load_file(dir.path(), "default", "yaml");
        match result {
            Err(ConfigError::ParseError { path, .. }) => {
                assert_eq!(path, dir.path().join("default.yaml"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_keys_become_strings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "ports: {80: http, 443: https}\nflags: {true: on, ~: none}\nratio: {1.5: x}\n",
        )
        .unwrap();

        let value = load_file(dir.path(), "default", "yaml").unwrap().unwrap();
        let expected: Value = serde_yaml::from_str(
            "ports: {'80': http, '443': https}\nflags: {'true': on, 'null': none}\nratio: {'1.5': x}",
        )
        .unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_keys_normalized_inside_sequences() {
        let value = normalize_keys(serde_yaml::from_str("- {1: a}\n- [{false: b}]").unwrap());
        let expected: Value = serde_yaml::from_str("- {'1': a}\n- [{'false': b}]").unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_invalid_utf8_reaches_parser() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.yaml"), b"key: caf\xff\n").unwrap();

        let value = load_file(dir.path(), "default", "yaml").unwrap().unwrap();
        assert_eq!(value["key"], Value::String("caf\u{fffd}".into()));
    }

    #[test]
    fn test_unreadable_entry_is_read_error() {
        // A directory has a non-zero size but cannot be read as text.
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("default.yaml");
        fs::create_dir(&entry).unwrap();
        fs::write(entry.join("inner"), "x").unwrap();

        let result = load_file(dir.path(), "default", "yaml");
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
