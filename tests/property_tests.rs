//! Property-based coverage of the §8 TESTABLE PROPERTIES invariants and laws:
//! ids are delivered in strictly increasing order regardless of arrival
//! order (P1), every reserved send id is eventually consumed (P2), and the
//! attribute store's rollback/commit laws hold for arbitrary keys and
//! values.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use proptest::prelude::*;

use airssys_rt::message::{InboundMessage, PredicateSubmission};
use airssys_rt::util::MessageId;
use airssys_rt::{AttributeStore, Component};

use common::{transport, TestPredicate};

/// A permutation of `0..n`, built by attaching a random sort key to each
/// index and sorting by it — the standard proptest idiom for "any ordering
/// of a fixed-size set" without a dedicated shuffle combinator.
fn permutation_of(n: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(any::<u32>(), n).prop_map(move |keys| {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| keys[i]);
        order
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // P1: the sequence of ids a subscriber observes is 0, 1, 2, ... with no
    // gaps and no repeats, no matter what order the transport delivered them
    // in before the first subscription (§3 Invariant 1-3, §8 P1).
    #[test]
    fn inbound_ids_are_offered_in_strictly_increasing_order(order in permutation_of(6)) {
        let n = order.len() as u64;
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let initial: Vec<_> = order
                .iter()
                .map(|&i| {
                    InboundMessage::new(MessageId::new(i as u64), format!("m{i}"), TestPredicate::True)
                })
                .collect();
            let component = Component::new(transport(initial, sent)).unwrap();
            let mut sub = component.subscribe().await;

            for expected in 0..n {
                let offer = sub.next_offer().await.unwrap();
                assert_eq!(offer.message.id, MessageId::new(expected));
                offer.respond(false).unwrap();
            }
        });
    }

    // P2 / Gap-fill law: every reserved send id is consumed by a real or
    // sentinel outbound, so a run of declined sends still produces a
    // contiguous, gap-free id sequence on the wire.
    #[test]
    fn every_declined_send_id_is_consumed_by_a_gap_free_sentinel_sequence(send_count in 1usize..6) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let component = Component::new(transport(Vec::new(), Arc::clone(&sent))).unwrap();
            let sub = component.subscribe().await;

            for _ in 0..send_count {
                let grant = sub.want_to_send().await.unwrap();
                grant.submit(PredicateSubmission::Invalid).unwrap();
            }
            tokio::time::sleep(Duration::from_millis(20)).await;

            let sent = sent.lock().unwrap();
            assert_eq!(sent.len(), send_count);
            for (i, outbound) in sent.iter().enumerate() {
                assert_eq!(outbound.id, MessageId::new(i as u64));
                assert!(outbound.invalid);
                assert!(outbound.predicate.is_false());
            }
        });
    }

    // Law "Rollback-idempotence": rollback always reverts to the committed
    // value regardless of what was tentatively set beforehand.
    #[test]
    fn rollback_idempotence_law(
        key in "[a-z]{1,8}",
        committed in "[a-z]{0,8}",
        tentative in "[a-z]{0,8}",
    ) {
        let mut store = AttributeStore::with_initial([(key.clone(), committed.clone())]);
        store.set(&key, tentative);
        store.rollback();
        assert_eq!(store.get(&key), (committed, true));
    }

    // Law "Commit-retention": set; commit; rollback retains the committed
    // value — a later rollback must not undo an already-committed write.
    #[test]
    fn commit_retention_law(key in "[a-z]{1,8}", value in "[a-z]{0,8}") {
        let mut store = AttributeStore::new();
        store.set(&key, value.clone());
        assert!(store.commit());
        store.rollback();
        assert_eq!(store.get(&key), (value, true));
    }

    // A key never written is reported absent both before and after an
    // unrelated commit/rollback cycle.
    #[test]
    fn unset_key_stays_absent_across_commit_and_rollback(
        unset_key in "[a-z]{1,8}",
        other_key in "[a-z]{1,8}",
        other_value in "[a-z]{0,8}",
    ) {
        prop_assume!(unset_key != other_key);
        let mut store = AttributeStore::new();
        assert_eq!(store.get(&unset_key), (String::new(), false));
        store.set(&other_key, other_value);
        store.commit();
        assert_eq!(store.get(&unset_key), (String::new(), false));
    }
}
