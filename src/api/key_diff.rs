use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::EntityKey;

/// Three-way classification of keys between two consecutive renders.
///
/// `enter` and `update` follow the new set's order, `exit` the old set's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDiff {
    pub enter: Vec<EntityKey>,
    pub update: Vec<EntityKey>,
    pub exit: Vec<EntityKey>,
}

impl KeyDiff {
    /// `true` when nothing entered or exited.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enter.len() + self.update.len() + self.exit.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn counts(&self) -> DiffCounts {
        DiffCounts {
            enter: self.enter.len(),
            update: self.update.len(),
            exit: self.exit.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffCounts {
    pub enter: usize,
    pub update: usize,
    pub exit: usize,
}

/// Partitions `new` against `old`: keys only in `new` enter, keys in both
/// update, keys only in `old` exit.
#[must_use]
pub fn diff_keys(old: &IndexSet<EntityKey>, new: &IndexSet<EntityKey>) -> KeyDiff {
    let (update, enter): (Vec<EntityKey>, Vec<EntityKey>) =
        new.iter().cloned().partition(|key| old.contains(key));
    let exit = old.iter().filter(|key| !new.contains(*key)).cloned().collect();
    KeyDiff {
        enter,
        update,
        exit,
    }
}

/// Diff for charts without cross-frame identity: everything old exits and
/// everything new enters.
#[must_use]
pub fn rebuild_keys(old: &IndexSet<EntityKey>, new: &IndexSet<EntityKey>) -> KeyDiff {
    KeyDiff {
        enter: new.iter().cloned().collect(),
        update: Vec::new(),
        exit: old.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;

    use super::{diff_keys, rebuild_keys};
    use crate::core::EntityKey;

    fn keys(raw: &[&str]) -> IndexSet<EntityKey> {
        raw.iter().map(|key| EntityKey::new(*key)).collect()
    }

    #[test]
    fn partitions_keep_new_and_old_order() {
        let diff = diff_keys(&keys(&["a", "b", "c"]), &keys(&["d", "c", "a"]));
        assert_eq!(diff.enter, vec![EntityKey::new("d")]);
        assert_eq!(diff.update, vec![EntityKey::new("c"), EntityKey::new("a")]);
        assert_eq!(diff.exit, vec![EntityKey::new("b")]);
        assert!(!diff.is_stable());
    }

    #[test]
    fn rebuild_replaces_everything() {
        let diff = rebuild_keys(&keys(&["a"]), &keys(&["a", "b"]));
        assert_eq!(diff.counts().enter, 2);
        assert_eq!(diff.counts().exit, 1);
        assert!(diff.update.is_empty());
    }
}
