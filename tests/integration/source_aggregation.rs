//! Integration tests for aggregating top-level sources

use crate::integration::test_utils::{options, project};
use fingerprint::{create_fingerprint, parse_sources, Fingerprint, HashSource};
use std::fs;
use std::time::{Duration, SystemTime};

fn sample_sources() -> Vec<HashSource> {
    vec![
        HashSource::contents("pkg", r#"{"name":"app"}"#).with_reason("package.json"),
        HashSource::file("app.json").with_reason("expoConfig"),
        HashSource::dir("ios").with_reason("bareNativeDir"),
    ]
}

fn sample_project() -> tempfile::TempDir {
    project(&[
        ("app.json", r#"{"expo":{"name":"app"}}"#),
        ("ios/Podfile", "platform :ios"),
        ("ios/App/AppDelegate.mm", "#import \"AppDelegate.h\""),
        ("ios/App/Info.plist", "<plist/>"),
    ])
}

/// Same inputs produce the same fingerprint every time
#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let temp_dir = sample_project();
    let options = options(temp_dir.path(), &[]);

    let first = create_fingerprint(sample_sources(), &options).await.unwrap();
    for _ in 0..3 {
        let again = create_fingerprint(sample_sources(), &options).await.unwrap();
        assert_eq!(first, again);
    }
}

/// Swapping two sources changes the aggregate but not the per-source hashes
#[tokio::test]
async fn test_source_order_changes_aggregate() {
    let temp_dir = sample_project();
    let options = options(temp_dir.path(), &[]);

    let forward = create_fingerprint(sample_sources(), &options).await.unwrap();
    let mut swapped_sources = sample_sources();
    swapped_sources.swap(0, 1);
    let swapped = create_fingerprint(swapped_sources, &options).await.unwrap();

    assert_ne!(forward.hash, swapped.hash);
    assert_eq!(forward.sources[0].hash, swapped.sources[1].hash);
    assert_eq!(forward.sources[1].hash, swapped.sources[0].hash);
}

/// Results stay in declared order regardless of which source finishes first
#[tokio::test]
async fn test_sources_keep_input_order() {
    let temp_dir = sample_project();
    let fingerprint = create_fingerprint(sample_sources(), &options(temp_dir.path(), &[]))
        .await
        .unwrap();

    let ids: Vec<&str> = fingerprint.sources.iter().map(|s| s.source.id()).collect();
    assert_eq!(ids, vec!["pkg", "app.json", "ios"]);
}

/// Renaming an inline source changes the aggregate
#[tokio::test]
async fn test_source_id_changes_aggregate() {
    let temp_dir = project(&[]);
    let options = options(temp_dir.path(), &[]);

    let a = create_fingerprint(vec![HashSource::contents("a", "same")], &options)
        .await
        .unwrap();
    let b = create_fingerprint(vec![HashSource::contents("b", "same")], &options)
        .await
        .unwrap();
    assert_eq!(a.sources[0].hash, b.sources[0].hash);
    assert_ne!(a.hash, b.hash);
}

/// Reasons are informational only
#[tokio::test]
async fn test_reasons_do_not_affect_hash() {
    let temp_dir = sample_project();
    let options = options(temp_dir.path(), &[]);

    let with_reasons = create_fingerprint(sample_sources(), &options).await.unwrap();
    let without_reasons = create_fingerprint(
        vec![
            HashSource::contents("pkg", r#"{"name":"app"}"#),
            HashSource::file("app.json"),
            HashSource::dir("ios"),
        ],
        &options,
    )
    .await
    .unwrap();
    assert_eq!(with_reasons.hash, without_reasons.hash);
}

/// One changed byte deep in a tree changes the fingerprint
#[tokio::test]
async fn test_single_byte_change_is_detected() {
    let temp_dir = sample_project();
    let root = temp_dir.path();
    let options = options(root, &[]);

    let before = create_fingerprint(sample_sources(), &options).await.unwrap();
    fs::write(root.join("ios/App/Info.plist"), "<plisT/>").unwrap();
    let after = create_fingerprint(sample_sources(), &options).await.unwrap();

    assert_ne!(before.hash, after.hash);
    assert_eq!(before.sources[1].hash, after.sources[1].hash);
    assert_ne!(before.sources[2].hash, after.sources[2].hash);
}

/// Modification time and permission bits are not part of the digest
#[tokio::test]
async fn test_metadata_changes_are_ignored() {
    let temp_dir = sample_project();
    let root = temp_dir.path();
    let options = options(root, &[]);

    let before = create_fingerprint(sample_sources(), &options).await.unwrap();

    let podfile = fs::File::options()
        .write(true)
        .open(root.join("ios/Podfile"))
        .unwrap();
    podfile
        .set_modified(SystemTime::now() - Duration::from_secs(86_400))
        .unwrap();
    drop(podfile);

    let mut permissions = fs::metadata(root.join("app.json")).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(root.join("app.json"), permissions).unwrap();

    let after = create_fingerprint(sample_sources(), &options).await.unwrap();
    assert_eq!(before.hash, after.hash);
}

/// The I/O limit bounds concurrency without changing the result
#[tokio::test]
async fn test_io_limit_does_not_change_result() {
    let temp_dir = project(&[]);
    let root = temp_dir.path();
    for d in 0..6 {
        for f in 0..12 {
            let path = root.join(format!("assets/d{}/f{}.txt", d, f));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, format!("{}:{}", d, f)).unwrap();
        }
    }

    let serial = create_fingerprint(
        vec![HashSource::dir("assets")],
        &options(root, &[]).with_concurrent_io_limit(1),
    )
    .await
    .unwrap();
    let wide = create_fingerprint(
        vec![HashSource::dir("assets")],
        &options(root, &[]).with_concurrent_io_limit(64),
    )
    .await
    .unwrap();
    assert_eq!(serial.hash, wide.hash);
}

/// JSON input decodes into the same sources the builders produce
#[tokio::test]
async fn test_parsed_sources_fingerprint_like_built_sources() {
    let temp_dir = sample_project();
    let options = options(temp_dir.path(), &[]);

    let parsed = parse_sources(
        r#"[
            {"type": "contents", "id": "pkg", "contents": "{\"name\":\"app\"}", "reasons": ["package.json"]},
            {"type": "file", "filePath": "app.json", "reasons": ["expoConfig"]},
            {"type": "dir", "filePath": "ios", "reasons": ["bareNativeDir"]}
        ]"#,
    )
    .unwrap();
    assert_eq!(parsed, sample_sources());

    let from_json = create_fingerprint(parsed, &options).await.unwrap();
    let from_builders = create_fingerprint(sample_sources(), &options).await.unwrap();
    assert_eq!(from_json.hash, from_builders.hash);
}

/// Fingerprints serialize with null hashes for excluded sources and read back unchanged
#[tokio::test]
async fn test_fingerprint_json_shape() {
    let temp_dir = sample_project();
    let mut sources = sample_sources();
    sources.push(HashSource::file("debug.log"));
    let fingerprint = create_fingerprint(sources, &options(temp_dir.path(), &["*.log"]))
        .await
        .unwrap();

    let value = serde_json::to_value(&fingerprint).unwrap();
    assert_eq!(value["sources"][1]["type"], "file");
    assert_eq!(value["sources"][1]["filePath"], "app.json");
    assert!(value["sources"][3]["hash"].is_null());
    assert_eq!(value["hash"], fingerprint.hash.as_str());

    let decoded: Fingerprint = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, fingerprint);
}

/// Paths are normalized before hashing and keying
#[tokio::test]
async fn test_source_paths_are_normalized() {
    let temp_dir = sample_project();
    let options = options(temp_dir.path(), &[]);

    let plain = create_fingerprint(vec![HashSource::dir("ios")], &options)
        .await
        .unwrap();
    let dotted = create_fingerprint(vec![HashSource::dir("./ios/")], &options)
        .await
        .unwrap();
    assert_eq!(plain.sources[0].hash, dotted.sources[0].hash);
}
