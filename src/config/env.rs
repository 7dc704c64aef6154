use serde_yaml::{Mapping, Value};

use super::merge::{deep_merge, ArrayMerge};

/// Maps `{prefix}{sep}A{sep}B=value` variables onto the path `a.b`.
///
/// Values stay strings; there is no type coercion.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    prefix: String,
    separator: String,
}

impl EnvOverrides {
    /// # Panics
    ///
    /// Panics if `separator` is empty.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    /// Builds the overlay mapping from the matching variables.
    pub fn overlay<'a>(&self, vars: impl IntoIterator<Item = (&'a str, &'a str)>) -> Mapping {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut overlay = Mapping::new();

        for (key, value) in vars {
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            if path_str.is_empty() {
                continue;
            }

            let path: Vec<String> = path_str
                .split(&self.separator)
                .map(|s| s.to_lowercase())
                .collect();
            insert_at_path(&mut overlay, &path, Value::String(value.to_owned()));
        }

        overlay
    }

    /// Merges the overlay onto `root`.
    pub fn apply<'a>(
        &self,
        root: Value,
        vars: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Value {
        let overlay = self.overlay(vars);
        if overlay.is_empty() {
            return root;
        }
        deep_merge(root, Value::Mapping(overlay), ArrayMerge::Replace)
    }
}

fn insert_at_path(table: &mut Mapping, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    let key = Value::String(first.clone());

    if rest.is_empty() {
        table.insert(key, value);
        return;
    }

    if !matches!(table.get(&key), Some(Value::Mapping(_))) {
        table.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    if let Some(Value::Mapping(nested)) = table.get_mut(&key) {
        insert_at_path(nested, rest, value);
    }
}
