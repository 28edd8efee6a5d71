//! Static group bootstrap and growth against the recording engine

use std::sync::Arc;

use e2e::{credential, group, RecordingEngine, ToyProver};
use parking_lot::RwLock;
use rln_relay::constants::ACCEPTABLE_ROOT_WINDOW_SIZE;
use rln_relay::{
    Epoch, GroupManager, MembershipEngine, MerkleRootTracker, Message, MessageValidationResult,
    RlnConfig, RlnError, RlnValidator, SharedEngine, SharedRoots, StaticGroupManager,
};
use tracing::Span;

fn node() -> (SharedEngine<RecordingEngine>, SharedRoots) {
    (
        Arc::new(RwLock::new(RecordingEngine::default())),
        Arc::new(RwLock::new(MerkleRootTracker::from_config(&RlnConfig::default(), &Span::none()))),
    )
}

#[test]
fn three_member_group_end_to_end() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let span = tracing::info_span!("node");

    // Group = [A, B, C], local identity = B at index 1
    let members = group(&[0xA, 0xB, 0xC]);
    let me = credential(0xB);
    let mut gm = StaticGroupManager::new(members.clone(), me, 1, &span).unwrap();
    let (engine, roots) = node();
    gm.start(Arc::clone(&engine), Arc::clone(&roots)).unwrap();

    assert_eq!(gm.membership_index().unwrap(), 1);
    assert_eq!(gm.identity_credential().unwrap().commitment, me.commitment);
    assert_eq!(engine.read().leaves(), members.as_slice());
    assert!(!roots.read().is_empty());

    let root = engine.read().merkle_root().unwrap();
    assert_eq!(root, RecordingEngine::root_after(&members));
    assert_eq!(roots.read().latest(), Some(&root));

    let validator =
        RlnValidator::new(Arc::clone(&engine), roots, RlnConfig::default(), &span).unwrap();
    let prover = ToyProver::new(gm.identity_credential().unwrap());
    let now = Epoch::from_u64(170_000_000);

    let mut msg = Message {
        payload: b"hello".to_vec(),
        content_topic: "/app/1/chat/proto".into(),
        rate_limit_proof: None,
    };
    msg.rate_limit_proof = Some(prover.prove(&msg.signal(), root, now));
    assert_eq!(validator.validate_message(&msg, Some(now)), Some(MessageValidationResult::Valid));

    let shifted = Epoch::from_u64(now.as_u64() + validator.max_epoch_gap() + 1);
    msg.rate_limit_proof = Some(prover.prove(&msg.signal(), root, shifted));
    let calls = engine.read().verify_calls();
    assert_eq!(validator.validate_message(&msg, Some(now)), Some(MessageValidationResult::Invalid));
    assert_eq!(engine.read().verify_calls(), calls);

    gm.stop();
}

#[test]
fn bootstrap_inserts_every_member_in_order() {
    for n in [1usize, 2, 7, 20] {
        let seeds: Vec<u8> = (0..n).map(|i| i as u8).collect();
        let members = group(&seeds);
        let mut gm = StaticGroupManager::new(members.clone(), credential(0), 0, &Span::none()).unwrap();
        let (engine, roots) = node();
        gm.start(Arc::clone(&engine), Arc::clone(&roots)).unwrap();

        assert_eq!(engine.read().leaves(), members.as_slice());
        assert_eq!(roots.read().latest().copied(), Some(engine.read().merkle_root().unwrap()));
        assert_eq!(roots.read().len(), (n + 1).min(ACCEPTABLE_ROOT_WINDOW_SIZE));
        assert_eq!(gm.pending_members(), 0);
    }
}

#[test]
fn mismatched_identity_never_touches_engine() {
    let members = group(&[1, 2, 3]);
    let result = StaticGroupManager::<RecordingEngine>::new(members, credential(9), 1, &Span::none());
    assert!(matches!(result, Err(RlnError::MembershipMismatch { index: 1 })));
}

#[test]
fn restart_after_partial_bootstrap_uses_a_fresh_engine() {
    let members = group(&[1, 2, 3, 4]);
    let mut gm = StaticGroupManager::new(members.clone(), credential(1), 0, &Span::none()).unwrap();
    let (engine, roots) = node();
    engine.write().fail_insert_at = Some(2);

    assert!(matches!(gm.start(Arc::clone(&engine), roots), Err(RlnError::Engine(_))));
    // no rollback: the first two members stay in the tree
    assert_eq!(engine.read().leaves(), &members[..2]);

    let mut gm = StaticGroupManager::new(members.clone(), credential(1), 0, &Span::none()).unwrap();
    let (engine, roots) = node();
    gm.start(Arc::clone(&engine), roots).unwrap();
    assert_eq!(engine.read().leaves(), members.as_slice());
}

#[test]
fn late_members_get_sequential_indices() {
    let members = group(&[1, 2]);
    let mut gm = StaticGroupManager::new(members, credential(2), 1, &Span::none()).unwrap();
    let (engine, roots) = node();
    gm.start(Arc::clone(&engine), Arc::clone(&roots)).unwrap();

    let late = group(&[3, 4, 5]);
    let indices: Vec<u64> = late.iter().map(|c| gm.insert_member(*c).unwrap()).collect();
    assert_eq!(indices, vec![2, 3, 4]);
    assert_eq!(roots.read().latest().copied(), Some(engine.read().merkle_root().unwrap()));
}
