//! Case-insensitive ordered map for route values and query parameters
//!
//! Keys are folded to lower case both when inserted and when looked up, so
//! `"Action"`, `"action"` and `"ACTION"` always address the same entry. The
//! spelling used by the first insertion is kept for display and iteration.
//! Iteration order is the order of the folded keys.

use std::collections::BTreeMap;
use std::fmt;

/// Folds a key (or any name compared case-insensitively) to its lookup form
pub(crate) fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

/// Case-insensitive string equality used for keys, literals and action names
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// String-to-string map whose keys compare case-insensitively
///
/// # Examples
///
/// ```
/// use mvc_router::RouteValues;
///
/// let mut values = RouteValues::new();
/// values.insert("Controller", "products");
///
/// assert_eq!(values.get("controller"), Some("products"));
/// assert_eq!(values.get("CONTROLLER"), Some("products"));
/// assert_eq!(values.get("action"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveMap {
    entries: BTreeMap<String, (String, String)>,
}

/// Values extracted from a matched route (controller, action, parameters)
pub type RouteValues = CaseInsensitiveMap;

/// Parsed query string parameters of a request
pub type QueryParams = CaseInsensitiveMap;

impl CaseInsensitiveMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value for the key if any
    ///
    /// Replacing a value keeps the key spelling of the first insertion.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.entries.get_mut(&fold_key(&key)) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.insert(fold_key(&key), (key, value));
                None
            }
        }
    }

    /// Adds a value, joining it to an existing one with `,`
    ///
    /// This is how repeated form/query keys collapse into one entry.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.get_mut(&fold_key(&key)) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => {
                self.entries.insert(fold_key(&key), (key, value));
            }
        }
    }

    /// Looks up a value; a miss is `None`, never a panic
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&fold_key(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, value)` pairs using the original key spelling
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Copies every entry of `other` whose key is not present yet
    pub fn merge_missing(&mut self, other: &CaseInsensitiveMap) {
        for (key, value) in other.iter() {
            if !self.contains_key(key) {
                self.insert(key, value);
            }
        }
    }
}

impl PartialEq for CaseInsensitiveMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for CaseInsensitiveMap {}

impl<K, V> FromIterator<(K, V)> for CaseInsensitiveMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for CaseInsensitiveMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for CaseInsensitiveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}
