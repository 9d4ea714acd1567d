//! Allowed-collision matrix.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pairs of world entries whose collisions are ignored (or forced).
///
/// Explicit pair entries are symmetric. A per-name default applies to every
/// pair involving that name when no explicit entry exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllowedCollisionMatrix {
    entries: HashMap<String, HashMap<String, bool>>,
    default_entries: HashMap<String, bool>,
}

impl AllowedCollisionMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether collision between `name1` and `name2` is allowed.
    pub fn set_entry(&mut self, name1: &str, name2: &str, allowed: bool) {
        self.entries
            .entry(name1.to_string())
            .or_default()
            .insert(name2.to_string(), allowed);
        self.entries
            .entry(name2.to_string())
            .or_default()
            .insert(name1.to_string(), allowed);
    }

    /// Set `allowed` between `name` and each of `others`.
    pub fn set_entries<'a>(
        &mut self,
        name: &str,
        others: impl IntoIterator<Item = &'a str>,
        allowed: bool,
    ) {
        for other in others {
            self.set_entry(name, other, allowed);
        }
    }

    /// Remove the explicit entry for a pair.
    pub fn remove_entry(&mut self, name1: &str, name2: &str) {
        for (a, b) in [(name1, name2), (name2, name1)] {
            if let Some(row) = self.entries.get_mut(a) {
                row.remove(b);
                if row.is_empty() {
                    self.entries.remove(a);
                }
            }
        }
    }

    /// Remove every explicit entry involving `name`, and its default.
    pub fn remove_name(&mut self, name: &str) {
        if let Some(row) = self.entries.remove(name) {
            for other in row.keys() {
                if let Some(other_row) = self.entries.get_mut(other) {
                    other_row.remove(name);
                    if other_row.is_empty() {
                        self.entries.remove(other);
                    }
                }
            }
        }
        self.default_entries.remove(name);
    }

    /// Explicit entry for a pair.
    #[must_use]
    pub fn get_entry(&self, name1: &str, name2: &str) -> Option<bool> {
        self.entries.get(name1)?.get(name2).copied()
    }

    /// Whether an explicit entry exists for a pair.
    #[must_use]
    pub fn has_entry(&self, name1: &str, name2: &str) -> bool {
        self.get_entry(name1, name2).is_some()
    }

    /// Whether `name` appears in any explicit entry.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Set the default for every pair involving `name`.
    pub fn set_default_entry(&mut self, name: &str, allowed: bool) {
        self.default_entries.insert(name.to_string(), allowed);
    }

    /// Default for `name`.
    #[must_use]
    pub fn get_default_entry(&self, name: &str) -> Option<bool> {
        self.default_entries.get(name).copied()
    }

    /// Remove the default for `name`.
    pub fn remove_default_entry(&mut self, name: &str) {
        self.default_entries.remove(name);
    }

    /// Resolve whether collision between a pair is allowed.
    ///
    /// An explicit entry wins. Otherwise the defaults of both names apply,
    /// and a disallowing default overrides an allowing one. `None` when
    /// nothing is recorded for the pair.
    #[must_use]
    pub fn get_allowed_collision(&self, name1: &str, name2: &str) -> Option<bool> {
        if let Some(allowed) = self.get_entry(name1, name2) {
            return Some(allowed);
        }
        match (self.get_default_entry(name1), self.get_default_entry(name2)) {
            (Some(a), Some(b)) => Some(a && b),
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }

    /// Every name with an explicit entry, sorted.
    #[must_use]
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every name with a default entry, sorted.
    #[must_use]
    pub fn default_entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.default_entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.default_entries.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_symmetric() {
        let mut acm = AllowedCollisionMatrix::new();
        acm.set_entry("link1", "link2", true);
        assert_eq!(acm.get_entry("link2", "link1"), Some(true));
        assert!(acm.has_entry("link1", "link2"));
        assert!(!acm.has_entry("link1", "link3"));

        acm.remove_entry("link2", "link1");
        assert!(!acm.has_entry("link1", "link2"));
        assert!(acm.entry_names().is_empty());
    }

    #[test]
    fn test_defaults() {
        let mut acm = AllowedCollisionMatrix::new();
        acm.set_default_entry("ground", true);
        assert_eq!(acm.get_allowed_collision("ground", "anything"), Some(true));
        assert_eq!(acm.get_allowed_collision("a", "b"), None);

        acm.set_default_entry("hand", false);
        assert_eq!(acm.get_allowed_collision("ground", "hand"), Some(false));

        // Explicit entries take precedence.
        acm.set_entry("ground", "hand", true);
        assert_eq!(acm.get_allowed_collision("hand", "ground"), Some(true));
    }

    #[test]
    fn test_remove_name() {
        let mut acm = AllowedCollisionMatrix::new();
        acm.set_entries("cup", ["finger_l", "finger_r"], true);
        acm.set_default_entry("cup", false);
        assert_eq!(acm.entry_names(), vec!["cup", "finger_l", "finger_r"]);

        acm.remove_name("cup");
        assert!(acm.entry_names().is_empty());
        assert!(acm.get_default_entry("cup").is_none());
    }
}
