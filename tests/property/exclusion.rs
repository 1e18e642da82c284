//! Property-based tests for exclusion rules

use fingerprint::ignore::{is_ignored, IgnoreRule};
use fingerprint::{create_fingerprint, HashAlgorithm, HashSource, Options};
use proptest::prelude::*;
use std::fs;

fn pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("**/*.log".to_string()),
        Just("build/**".to_string()),
        Just("*.txt".to_string()),
        Just("src/*".to_string()),
        Just("**/.DS_Store".to_string()),
        Just("ios/Pods/**/*".to_string()),
    ]
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("src"),
            Just("build"),
            Just("ios"),
            Just("Pods"),
            Just("a.log"),
            Just("b.txt"),
            Just(".DS_Store"),
        ],
        1..5,
    )
    .prop_map(|segments| segments.join("/"))
}

/// Test that without negations a path is ignored exactly when some rule matches
#[test]
fn test_positive_rules_are_a_disjunction() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(pattern(), 0..5), path()),
            |(patterns, path)| {
                let rules: Vec<IgnoreRule> = patterns
                    .iter()
                    .map(|p| IgnoreRule::new(p).unwrap())
                    .collect();
                let any_match = rules.iter().any(|r| r.glob_matches(&path));
                assert_eq!(is_ignored(&path, &rules), any_match);

                Ok(())
            },
        )
        .unwrap();
}

/// Test that negating a matching pattern right after it re-includes the path
#[test]
fn test_trailing_negation_reincludes() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(pattern(), 1..5), path()),
            |(patterns, path)| {
                let mut rules: Vec<IgnoreRule> = patterns
                    .iter()
                    .map(|p| IgnoreRule::new(p).unwrap())
                    .collect();
                rules.push(IgnoreRule::new(&format!("!{}", path)).unwrap());
                assert!(!is_ignored(&path, &rules));

                Ok(())
            },
        )
        .unwrap();
}

/// Test that ignored files never change a directory hash, whatever they contain
#[test]
fn test_ignored_files_never_affect_hash() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 32,
        ..Default::default()
    });

    runner
        .run(
            &(
                any::<Vec<u8>>(),
                prop::collection::btree_map("[a-z]{1,6}", any::<Vec<u8>>(), 0..6),
            ),
            |(kept, logs)| {
                let temp_dir = tempfile::TempDir::new().unwrap();
                let root = temp_dir.path();
                fs::create_dir_all(root.join("src/nested")).unwrap();
                fs::write(root.join("src/kept.txt"), &kept).unwrap();

                let options = Options::new(root)
                    .with_hash_algorithm(HashAlgorithm::Sha256)
                    .with_ignore_paths(["**/*.log"]);
                let sources = vec![HashSource::dir("src")];

                let clean = runtime
                    .block_on(create_fingerprint(sources.clone(), &options))
                    .unwrap();

                for (name, contents) in &logs {
                    fs::write(root.join("src/nested").join(format!("{}.log", name)), contents)
                        .unwrap();
                }
                let noisy = runtime
                    .block_on(create_fingerprint(sources, &options))
                    .unwrap();

                assert_eq!(clean.hash, noisy.hash);

                Ok(())
            },
        )
        .unwrap();
}
