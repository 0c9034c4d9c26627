//! Permissions: opaque tokens issued by the backend.
//!
//! The console never interprets a permission string (`"users.list.read"` is
//! just a key); it only checks membership.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single permission token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Permission {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The flat set of permissions a session holds.
///
/// Keeps first-seen order (route generation walks permissions in the order
/// the backend sent them) and drops duplicates and blank tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    ordered: Vec<Permission>,
    index: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a permission. Returns `false` if it was already held or blank.
    pub fn insert(&mut self, permission: Permission) -> bool {
        if permission.as_str().trim().is_empty() || self.index.contains(&permission) {
            return false;
        }
        self.index.insert(permission.clone());
        self.ordered.push(permission);
        true
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.index.contains(permission)
    }

    /// Check a raw permission string.
    pub fn has(&self, permission: &str) -> bool {
        self.index.contains(&Permission::new(permission))
    }

    /// True if any of `required` is held.
    pub fn intersects(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.index.contains(p))
    }

    /// Permissions in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Plain strings, in order. This is the persisted form.
    pub fn to_strings(&self) -> Vec<String> {
        self.ordered.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl<P: Into<Permission>> FromIterator<P> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = PermissionSet::new();
        for p in iter {
            set.insert(p.into());
        }
        set
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<Permission>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}
