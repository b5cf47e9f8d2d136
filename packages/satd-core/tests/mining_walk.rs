//! End-to-end mining over a multi-commit history
//!
//! Drives `MiningSession` the way the CLI does: enumerate adjacent
//! commit pairs, resolve each one, and check that lineage ids thread
//! one logical debt item through its added, changed and removed
//! records. Also covers range mode at the session level, where every
//! tracked file of the older endpoint is mined and bisected.

mod common;

use common::{
    assert_single_record, create_commit, create_commit_files, create_temp_repo, java_method_body,
    java_two_methods, rev_list,
};

use satd_core::{MiningSession, PairOutcome, Resolution, TrackerConfig};

#[test]
fn test_lineage_id_threads_through_a_commit_chain() {
    let (_tmp, path) = create_temp_repo();
    create_commit(
        &path,
        "Foo.java",
        &java_method_body("Foo", "m", &["run();"]),
        "base",
    );
    create_commit(
        &path,
        "Foo.java",
        &java_method_body("Foo", "m", &["// TODO fix the cache", "run();"]),
        "admit the debt",
    );
    create_commit(
        &path,
        "Foo.java",
        &java_method_body("Foo", "m", &["// TODO fix the cache properly", "run();"]),
        "reword the debt",
    );
    create_commit(
        &path,
        "Foo.java",
        &java_method_body("Foo", "m", &["run();"]),
        "pay the debt",
    );
    let hashes = rev_list(&path);
    assert_eq!(hashes.len(), 4);

    let mut session =
        MiningSession::open(&path, TrackerConfig::default()).expect("Failed to open session");
    let pairs = session
        .pair_revs(&hashes[0], &hashes[3])
        .expect("Failed to enumerate pairs");
    assert_eq!(pairs.len(), 3);

    let outcomes: Vec<PairOutcome> = pairs
        .iter()
        .map(|(old, new)| {
            session
                .resolve_pair(old, new)
                .expect("Pair resolution failed")
        })
        .collect();

    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.old_hash, hashes[i]);
        assert_eq!(outcome.meta.hash, hashes[i + 1]);
    }

    let added = assert_single_record(&outcomes[0].instances, Resolution::SatdAdded);
    let changed = assert_single_record(&outcomes[1].instances, Resolution::SatdChanged);
    let removed = assert_single_record(&outcomes[2].instances, Resolution::SatdRemoved);

    assert_eq!(
        changed.id, added.id,
        "rewording must keep the lineage id"
    );
    assert_eq!(
        removed.id, added.id,
        "removal must close the same lineage"
    );
    assert_eq!(removed.old_comment.text, "TODO fix the cache properly");
    println!("✅ lineage {} tracked across {} pairs", added.id, pairs.len());
}

#[test]
fn test_range_mode_mines_every_tracked_file() {
    let (_tmp, path) = create_temp_repo();
    let foo_with = |step: u32| {
        let pad = format!("int step = {step};");
        java_two_methods(
            "Foo",
            &["// TODO fix the parser", "run();"],
            &[pad.as_str()],
        )
    };
    let foo_without = |step: u32| {
        let pad = format!("int step = {step};");
        java_two_methods("Foo", &["run();"], &[pad.as_str()])
    };
    let util = java_method_body("Util", "check", &["// FIXME handle nulls", "scan();"]);

    create_commit_files(
        &path,
        &[("Foo.java", foo_with(0).as_str()), ("Util.java", util.as_str())],
        "base",
    );
    create_commit(&path, "Foo.java", &foo_with(1), "pad one");
    create_commit(&path, "Foo.java", &foo_without(1), "resolve the parser debt");
    create_commit(&path, "Foo.java", &foo_without(3), "pad two");
    let hashes = rev_list(&path);
    assert_eq!(hashes.len(), 4);

    let mut session =
        MiningSession::open(&path, TrackerConfig::default()).expect("Failed to open session");
    let located = session
        .locate_in_range(&hashes[0], &hashes[3])
        .expect("Range location failed");
    assert_eq!(located.len(), 2);

    let removed = located
        .iter()
        .find(|l| l.instance.resolution == Resolution::SatdRemoved)
        .expect("No removal record");
    assert_eq!(removed.commit.hash, hashes[2]);
    assert_eq!(removed.instance.old_file, "Foo.java");
    assert_eq!(removed.instance.old_comment.text, "TODO fix the parser");

    let open = located
        .iter()
        .find(|l| l.instance.resolution == Resolution::SatdUnaddressed)
        .expect("No unaddressed record");
    assert_eq!(open.commit.hash, hashes[3]);
    assert_eq!(open.instance.new_comment.text, "FIXME handle nulls");

    assert_ne!(removed.instance.id, open.instance.id);
    println!("✅ range mode located {} records", located.len());
}
