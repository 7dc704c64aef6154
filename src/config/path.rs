//! Dotted property paths and their resolution against a value tree.

use std::borrow::Cow;
use std::fmt;

use serde_yaml::Value;

/// A property path such as `db.host`, or the same path given as segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath<'a> {
    segments: Vec<Cow<'a, str>>,
}

impl PropertyPath<'_> {
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PropertyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl<'a> From<&'a str> for PropertyPath<'a> {
    fn from(path: &'a str) -> Self {
        Self {
            segments: path.split('.').map(Cow::Borrowed).collect(),
        }
    }
}

impl<'a> From<&'a String> for PropertyPath<'a> {
    fn from(path: &'a String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<String> for PropertyPath<'static> {
    fn from(path: String) -> Self {
        Self {
            segments: path.split('.').map(|s| Cow::Owned(s.to_owned())).collect(),
        }
    }
}

impl<'a> From<&'a [&'a str]> for PropertyPath<'a> {
    fn from(segments: &'a [&'a str]) -> Self {
        Self {
            segments: segments.iter().map(|s| Cow::Borrowed(*s)).collect(),
        }
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for PropertyPath<'a> {
    fn from(segments: [&'a str; N]) -> Self {
        Self {
            segments: segments.into_iter().map(Cow::Borrowed).collect(),
        }
    }
}

impl<'a> From<&'a [String]> for PropertyPath<'a> {
    fn from(segments: &'a [String]) -> Self {
        Self {
            segments: segments.iter().map(|s| Cow::Borrowed(s.as_str())).collect(),
        }
    }
}

impl From<Vec<String>> for PropertyPath<'static> {
    fn from(segments: Vec<String>) -> Self {
        Self {
            segments: segments.into_iter().map(Cow::Owned).collect(),
        }
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'v> {
    /// The path resolved. The value may be null or otherwise falsy.
    Found(&'v Value),
    NotFound,
}

impl<'v> Lookup<'v> {
    pub fn found(self) -> Option<&'v Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Walks `root` one segment at a time.
///
/// Mappings are indexed by key and sequences by numeric segment; any other
/// node with segments remaining ends the walk.
pub fn resolve<'v>(root: &'v Value, path: &PropertyPath<'_>) -> Lookup<'v> {
    let mut current = root;
    for segment in path.segments() {
        let next = match untagged(current) {
            Value::Mapping(map) => map.get(segment),
            Value::Sequence(items) => sequence_index(segment).and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Lookup::NotFound,
        }
    }
    Lookup::Found(current)
}

/// Accepts only the canonical decimal form, so `+1` and `01` are not indices.
fn sequence_index(segment: &str) -> Option<usize> {
    segment
        .parse::<usize>()
        .ok()
        .filter(|i| i.to_string() == segment)
}

/// Truthiness used by `has`: null, `false`, zero, NaN and `""` are falsy.
/// Mappings and sequences are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}
