//! Immutable, ordered qualifier sets describing environment coordinates

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

static EMPTY: LazyLock<Qualifiers> = LazyLock::new(|| Qualifiers {
    inner: Arc::new(BTreeMap::new()),
});

/// An immutable set of `name=value` environment coordinates.
///
/// Entries are kept sorted by name so iteration, hashing and the textual
/// form (`env=prod;region=eu`) are deterministic. Every empty instance
/// shares a single allocation; see [`Qualifiers::empty`].
///
/// # Example
///
/// ```
/// use envr_types::Qualifiers;
///
/// let prod = Qualifiers::of_pairs(&["env", "prod", "region", "eu"]).unwrap();
/// let env = Qualifiers::single("env", "prod");
/// assert!(prod.contains(&env));
/// assert!(env.is_subset_of(&prod));
/// assert_eq!(prod.to_string(), "env=prod;region=eu");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qualifiers {
    inner: Arc<BTreeMap<String, String>>,
}

impl Qualifiers {
    /// The distinguished empty qualifiers.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Build qualifiers from any name/value mapping.
    pub fn of<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if map.is_empty() {
            Self::empty()
        } else {
            Self {
                inner: Arc::new(map),
            }
        }
    }

    /// Build qualifiers from a flat `name, value, name, value, ...` list.
    pub fn of_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        if pairs.len() % 2 != 0 {
            return Err(Error::OddQualifierPairs { count: pairs.len() });
        }
        Ok(Self::of(
            pairs
                .chunks_exact(2)
                .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string())),
        ))
    }

    /// Qualifiers holding exactly one entry.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::of([(name.into(), value.into())])
    }

    /// Read-only, ordered view of the entries.
    pub fn to_map(&self) -> &BTreeMap<String, String> {
        &self.inner
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Whether both values share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// `true` if every entry of `other` is also an entry of `self`.
    pub fn contains(&self, other: &Qualifiers) -> bool {
        self.ptr_eq(other)
            || (self.len() >= other.len() && other.iter().all(|(k, v)| self.get(k) == Some(v)))
    }

    /// `true` if every entry of `self` is also an entry of `other`.
    pub fn is_subset_of(&self, other: &Qualifiers) -> bool {
        self.ptr_eq(other) || other.contains(self)
    }

    /// Number of entries (name and value) the two sets have in common.
    pub fn intersection_size(&self, other: &Qualifiers) -> usize {
        if self.ptr_eq(other) {
            return self.len();
        }
        self.iter().filter(|(k, v)| other.get(k) == Some(*v)).count()
    }

    /// Number of entries present in exactly one of the two sets.
    pub fn symmetric_difference_size(&self, other: &Qualifiers) -> usize {
        if self.ptr_eq(other) {
            return 0;
        }
        let common = self.intersection_size(other);
        (self.len() - common) + (other.len() - common)
    }
}

impl Default for Qualifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl fmt::Display for Qualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

impl FromStr for Qualifiers {
    type Err = Error;

    /// Parses the `name=value;name=value` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        for segment in s.split(';').filter(|segment| !segment.trim().is_empty()) {
            let (name, value) = segment
                .split_once('=')
                .ok_or_else(|| Error::InvalidQualifier {
                    segment: segment.to_string(),
                })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidQualifier {
                    segment: segment.to_string(),
                });
            }
            map.insert(name.to_string(), value.trim().to_string());
        }
        Ok(Self::of(map))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Qualifiers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl Serialize for Qualifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Qualifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer).map(Self::of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_singleton() {
        let a = Qualifiers::empty();
        let b = Qualifiers::of(Vec::<(String, String)>::new());
        assert!(a.ptr_eq(&b));
        assert!(a.is_empty());
    }

    #[test]
    fn test_odd_pairs_rejected() {
        let err = Qualifiers::of_pairs(&["env", "prod", "region"]).unwrap_err();
        assert_eq!(err, Error::OddQualifierPairs { count: 3 });
    }

    #[test]
    fn test_entries_are_ordered() {
        let q = Qualifiers::of_pairs(&["zone", "b", "env", "prod"]).unwrap();
        let keys: Vec<_> = q.keys().collect();
        assert_eq!(keys, vec!["env", "zone"]);
        assert_eq!(q.to_string(), "env=prod;zone=b");
    }

    #[test]
    fn test_set_sizes() {
        let a = Qualifiers::of_pairs(&["env", "prod", "region", "eu"]).unwrap();
        let b = Qualifiers::of_pairs(&["env", "prod", "region", "us", "tier", "web"]).unwrap();
        assert_eq!(a.intersection_size(&b), 1);
        assert_eq!(a.symmetric_difference_size(&b), 3);
        assert!(!a.contains(&b));
        assert!(!b.contains(&a));
    }

    #[test]
    fn test_from_str_round_trip() {
        let q: Qualifiers = "env=prod;region=eu".parse().unwrap();
        assert_eq!(q.get("region"), Some("eu"));
        assert_eq!(q.to_string().parse::<Qualifiers>().unwrap(), q);
    }

    #[test]
    fn test_from_str_rejects_bare_name() {
        assert!("env".parse::<Qualifiers>().is_err());
        assert!("=prod".parse::<Qualifiers>().is_err());
    }
}
