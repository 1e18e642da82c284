//! Integration tests for caller-supplied content hooks

use crate::integration::test_utils::{options, project};
use fingerprint::tree::hasher::compute_hash;
use fingerprint::{
    create_fingerprint, DebugInfo, FileHook, HashAlgorithm, HashSource, HeaderNormalizer,
    HookSource,
};
use std::sync::{Arc, Mutex};

/// Drops `\r` so CRLF and LF checkouts hash alike; records every call
#[derive(Default)]
struct LineEndingHook {
    calls: Mutex<Vec<(String, bool)>>,
}

impl FileHook for LineEndingHook {
    fn transform(
        &self,
        source: &HookSource<'_>,
        chunk: Option<&[u8]>,
        is_end_of_file: bool,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        let name = match source {
            HookSource::File { path } => path.to_string(),
            HookSource::Contents { id } => format!("contents:{}", id),
        };
        self.calls.lock().unwrap().push((name, is_end_of_file));
        Ok(chunk.map(|c| c.iter().copied().filter(|b| *b != b'\r').collect()))
    }
}

/// Appends a fixed trailer at end of file
struct TrailerHook;

impl FileHook for TrailerHook {
    fn transform(
        &self,
        _source: &HookSource<'_>,
        chunk: Option<&[u8]>,
        is_end_of_file: bool,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        match (chunk, is_end_of_file) {
            (Some(bytes), _) => Ok(Some(bytes.to_vec())),
            (None, true) => Ok(Some(b"--trailer".to_vec())),
            (None, false) => Ok(None),
        }
    }
}

/// Fails on any file containing a marker
struct RejectingHook;

impl FileHook for RejectingHook {
    fn transform(
        &self,
        source: &HookSource<'_>,
        chunk: Option<&[u8]>,
        _is_end_of_file: bool,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        if let Some(bytes) = chunk {
            if bytes.windows(6).any(|w| w == b"REJECT") {
                anyhow::bail!("rejected {:?}", source);
            }
        }
        Ok(chunk.map(<[u8]>::to_vec))
    }
}

/// A hook that normalizes line endings makes CRLF and LF trees equal
#[tokio::test]
async fn test_hook_normalizes_file_contents() {
    let lf = project(&[("src/index.js", "a\nb\n")]);
    let crlf = project(&[("src/index.js", "a\r\nb\r\n")]);

    let mut hashes = Vec::new();
    for temp_dir in [&lf, &crlf] {
        let hook = Arc::new(LineEndingHook::default());
        let options = options(temp_dir.path(), &[]).with_file_hook(hook.clone());
        let fingerprint = create_fingerprint(vec![HashSource::dir("src")], &options)
            .await
            .unwrap();
        hashes.push(fingerprint.hash);

        let calls = hook.calls.lock().unwrap();
        assert_eq!(calls.first(), Some(&("src/index.js".to_string(), false)));
        assert_eq!(calls.last(), Some(&("src/index.js".to_string(), true)));
    }
    assert_eq!(hashes[0], hashes[1]);
}

/// Inline contents go through the hook as one final chunk
#[tokio::test]
async fn test_hook_applies_to_contents_sources() {
    let temp_dir = project(&[]);
    let hook = Arc::new(LineEndingHook::default());
    let options = options(temp_dir.path(), &[])
        .with_file_hook(hook.clone())
        .with_debug(true);

    let fingerprint = create_fingerprint(vec![HashSource::contents("pkg", "{\r\n}")], &options)
        .await
        .unwrap();

    assert_eq!(
        fingerprint.sources[0].hash.as_deref(),
        Some(compute_hash(HashAlgorithm::Sha256, b"{\n}").as_str())
    );
    assert_eq!(
        *hook.calls.lock().unwrap(),
        vec![("contents:pkg".to_string(), true)]
    );
    assert!(matches!(
        fingerprint.sources[0].debug_info,
        Some(DebugInfo::Contents {
            is_transformed: Some(true),
            ..
        })
    ));
}

/// The terminal call can append bytes
#[tokio::test]
async fn test_hook_trailer_is_digested() {
    let temp_dir = project(&[("a.txt", "body")]);
    let options = options(temp_dir.path(), &[]).with_file_hook(Arc::new(TrailerHook));

    let fingerprint = create_fingerprint(vec![HashSource::file("a.txt")], &options)
        .await
        .unwrap();
    assert_eq!(
        fingerprint.sources[0].hash.as_deref(),
        Some(compute_hash(HashAlgorithm::Sha256, b"body--trailer").as_str())
    );
}

/// Debug info records whether a hook changed a file
#[tokio::test]
async fn test_debug_records_transformed_files() {
    let temp_dir = project(&[("src/dos.txt", "x\r\n"), ("src/unix.txt", "x\n")]);
    let options = options(temp_dir.path(), &[])
        .with_file_hook(Arc::new(LineEndingHook::default()))
        .with_debug(true);

    let fingerprint = create_fingerprint(vec![HashSource::dir("src")], &options)
        .await
        .unwrap();
    let Some(DebugInfo::Dir { children, .. }) = &fingerprint.sources[0].debug_info else {
        panic!("expected directory debug info");
    };

    let flags: Vec<(String, Option<bool>)> = children
        .iter()
        .filter_map(|child| match child {
            DebugInfo::File {
                path,
                is_transformed,
                ..
            } => Some((path.clone(), *is_transformed)),
            _ => None,
        })
        .collect();
    assert_eq!(
        flags,
        vec![
            ("src/dos.txt".to_string(), Some(true)),
            ("src/unix.txt".to_string(), Some(false)),
        ]
    );
}

/// The header normalizer runs before the hook
#[tokio::test]
async fn test_normalizer_output_reaches_hook() {
    let temp_dir = project(&[("ios/AppDelegate.h", "#import \"RCTBridge.h\"\r\n")]);
    let options = options(temp_dir.path(), &[])
        .with_header_normalizer(HeaderNormalizer::react())
        .with_file_hook(Arc::new(LineEndingHook::default()));

    let fingerprint = create_fingerprint(vec![HashSource::file("ios/AppDelegate.h")], &options)
        .await
        .unwrap();
    assert_eq!(
        fingerprint.sources[0].hash.as_deref(),
        Some(compute_hash(HashAlgorithm::Sha256, b"#import <React/RCTBridge.h>\n").as_str())
    );
}

/// Ignored files never reach the hook
#[tokio::test]
async fn test_hook_not_called_for_ignored_files() {
    let temp_dir = project(&[("src/a.txt", "a"), ("src/b.log", "b")]);
    let hook = Arc::new(LineEndingHook::default());
    let options = options(temp_dir.path(), &["**/*.log"]).with_file_hook(hook.clone());

    create_fingerprint(vec![HashSource::dir("src")], &options)
        .await
        .unwrap();
    assert!(hook
        .calls
        .lock()
        .unwrap()
        .iter()
        .all(|(path, _)| path == "src/a.txt"));
}

/// A failing hook rejects the whole fingerprint
#[tokio::test]
async fn test_hook_error_aborts_fingerprint() {
    let temp_dir = project(&[("src/ok.txt", "fine"), ("src/deep/bad.txt", "REJECT me")]);
    let options = options(temp_dir.path(), &[]).with_file_hook(Arc::new(RejectingHook));

    let err = create_fingerprint(
        vec![HashSource::contents("pkg", "{}"), HashSource::dir("src")],
        &options,
    )
    .await
    .unwrap_err();
    match err {
        fingerprint::FingerprintError::Transform { path, .. } => {
            assert_eq!(path, "src/deep/bad.txt")
        }
        other => panic!("expected transform error, got {:?}", other),
    }
}
