use crate::constants::AWS_TAG_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{BTreeMap, Iter};
use std::collections::BTreeSet;

/// An unordered set of key/value tags. A `BTreeMap` is used so that requests and logs are
/// deterministic.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

/// Tags that the provider should neither read back nor manage.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreTags {
    #[serde(default)]
    pub keys: BTreeSet<String>,
    #[serde(default)]
    pub key_prefixes: BTreeSet<String>,
}

/// The minimal set of tagging calls needed to move from one tag set to another.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct TagDiff {
    /// Keys that must be removed.
    pub removed: Vec<String>,
    /// Keys that are new or whose value changed.
    pub added: Tags,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Overlays `self` on top of `defaults`. Resource-local tags win when a key is in both.
    pub fn merge(&self, defaults: &Tags) -> Tags {
        let mut merged = defaults.clone();
        merged
            .0
            .extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Removes every tag that matches a default tag exactly (same key and value). What is left is
    /// what the user declared on the resource itself.
    pub fn remove_defaults(&self, defaults: &Tags) -> Tags {
        self.filter(|k, v| defaults.get(k) != Some(v))
    }

    /// Removes tags in the reserved `aws:` namespace.
    pub fn ignore_aws(&self) -> Tags {
        self.filter(|k, _| !k.starts_with(AWS_TAG_PREFIX))
    }

    /// Removes tags that the provider has been configured to ignore.
    pub fn ignore_config(&self, ignore: &IgnoreTags) -> Tags {
        self.filter(|k, _| {
            !ignore.keys.contains(k)
                && !ignore
                    .key_prefixes
                    .iter()
                    .any(|prefix| k.starts_with(prefix.as_str()))
        })
    }

    /// Computes the tagging calls needed to go from `old` to `new`. Keys whose value did not
    /// change are not touched.
    pub fn diff(old: &Tags, new: &Tags) -> TagDiff {
        let removed = old
            .keys()
            .filter(|k| !new.contains_key(k))
            .cloned()
            .collect();
        let added = new.filter(|k, v| old.get(k) != Some(v));
        TagDiff { removed, added }
    }

    fn filter<F>(&self, keep: F) -> Tags
    where
        F: Fn(&str, &str) -> bool,
    {
        Tags(
            self.0
                .iter()
                .filter(|(k, v)| keep(k, v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for Tags {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<Tags> for BTreeMap<String, String> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}

impl FromIterator<(String, String)> for Tags {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Tags {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
