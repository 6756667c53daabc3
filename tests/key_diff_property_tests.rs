use battlelens::api::{diff_keys, rebuild_keys};
use battlelens::core::EntityKey;
use indexmap::IndexSet;
use proptest::prelude::*;

fn key_set(raw: Vec<u8>) -> IndexSet<EntityKey> {
    raw.into_iter()
        .map(|id| EntityKey::new(format!("event-{id}")))
        .collect()
}

proptest! {
    #[test]
    fn diff_partitions_old_and_new(
        old in proptest::collection::vec(0u8..40, 0..30),
        new in proptest::collection::vec(0u8..40, 0..30)
    ) {
        let old = key_set(old);
        let new = key_set(new);
        let diff = diff_keys(&old, &new);

        let entered: IndexSet<EntityKey> = diff.enter.iter().cloned().collect();
        let updated: IndexSet<EntityKey> = diff.update.iter().cloned().collect();
        let exited: IndexSet<EntityKey> = diff.exit.iter().cloned().collect();

        prop_assert!(entered.is_disjoint(&updated));
        prop_assert!(updated.is_disjoint(&exited));
        prop_assert!(entered.is_disjoint(&exited));

        let rebuilt_new: IndexSet<EntityKey> = entered.union(&updated).cloned().collect();
        let rebuilt_old: IndexSet<EntityKey> = updated.union(&exited).cloned().collect();
        prop_assert_eq!(rebuilt_new.len(), new.len());
        prop_assert!(new.iter().all(|key| rebuilt_new.contains(key)));
        prop_assert_eq!(rebuilt_old.len(), old.len());
        prop_assert!(old.iter().all(|key| rebuilt_old.contains(key)));
    }

    #[test]
    fn diff_against_itself_is_stable(
        keys in proptest::collection::vec(0u8..40, 0..30)
    ) {
        let keys = key_set(keys);
        let diff = diff_keys(&keys, &keys);
        prop_assert!(diff.is_stable());
        prop_assert_eq!(diff.update.len(), keys.len());
    }

    #[test]
    fn rebuild_replaces_everything(
        old in proptest::collection::vec(0u8..40, 0..30),
        new in proptest::collection::vec(0u8..40, 0..30)
    ) {
        let old = key_set(old);
        let new = key_set(new);
        let diff = rebuild_keys(&old, &new);
        prop_assert!(diff.update.is_empty());
        prop_assert_eq!(diff.enter.len(), new.len());
        prop_assert_eq!(diff.exit.len(), old.len());
    }
}

#[test]
fn empty_to_populated_is_all_enter() {
    let new = key_set(vec![1, 2, 3]);
    let diff = diff_keys(&IndexSet::new(), &new);
    assert_eq!(diff.counts().enter, 3);
    assert_eq!(diff.counts().update, 0);
    assert_eq!(diff.counts().exit, 0);
}
