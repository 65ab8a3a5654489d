use serde::{Deserialize, Serialize};
use std::fmt;

/// One step into a TOML tree: a table key or an array index.
///
/// Serialized untagged, so a path reads naturally in JSON: `["dependencies", "serde", 0]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn key(k: impl Into<String>) -> Self {
        PathSegment::Key(k.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k.as_str()),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(_) => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        PathSegment::Key(k.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(k: String) -> Self {
        PathSegment::Key(k)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// Structural address of a node, from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TomlPath(Vec<PathSegment>);

impl TomlPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path of plain keys, e.g. `TomlPath::from_keys(["workspace", "resolver"])`.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(|k| PathSegment::Key(k.into())).collect())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, seg: impl Into<PathSegment>) {
        self.0.push(seg.into());
    }

    pub fn join(&self, seg: impl Into<PathSegment>) -> Self {
        let mut out = self.clone();
        out.push(seg);
        out
    }

    pub fn extend_from(&mut self, other: &TomlPath) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// The containing node's path; `None` for the root.
    pub fn parent(&self) -> Option<TomlPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn starts_with(&self, prefix: &TomlPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl FromIterator<PathSegment> for TomlPath {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<PathSegment>> for TomlPath {
    fn from(segs: Vec<PathSegment>) -> Self {
        Self(segs)
    }
}

impl fmt::Display for TomlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
                PathSegment::Key(k) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    let bare = !k.is_empty()
                        && k
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                    if bare {
                        f.write_str(k)?;
                    } else {
                        write!(f, "{k:?}")?;
                    }
                }
            }
        }
        Ok(())
    }
}
