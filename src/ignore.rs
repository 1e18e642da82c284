//! Exclusion rules for fingerprinting.
//!
//! Patterns are globs matched against project-relative posix paths. A pattern
//! starting with `!` negates. Evaluation walks the rules in declared order with
//! a running `matched` flag: positive rules OR their result into the flag, and a
//! negating rule whose glob matches a path that is already ignored returns
//! "not ignored" on the spot. This is deliberately not last-match-wins, so
//! `["!ios/Podfile", "ios/**"]` still ignores `ios/Podfile`.
//!
//! Directories are checked against a derived rule list so that `dir/**` skips
//! the directory without listing it, unless a negation re-includes something
//! underneath.
//!
//! Extra patterns can be listed in a `.fingerprintignore` file in the project
//! root, one per line.

use crate::error::FingerprintError;
use globset::{Glob, GlobBuilder, GlobMatcher};
use std::fs;
use std::path::Path;
use tracing::warn;

/// File in the project root holding additional ignore patterns
pub const IGNORE_FILE_NAME: &str = ".fingerprintignore";

/// Built-in ignore patterns: native build output and per-user IDE state.
pub const DEFAULT_IGNORE_PATHS: &[&str] = &[
    "**/android/build/**/*",
    "**/android/.cxx/**/*",
    "**/android/.gradle/**/*",
    "**/android/app/build/**/*",
    "**/android/local.properties",
    "**/android/.idea/**/*",
    "**/android/gradle.properties",
    "**/ios/Pods/**/*",
    "**/ios/build/**/*",
    "**/ios/.xcode.env.local",
    "**/ios/**/project.xcworkspace",
    "**/ios/*.xcworkspace/xcuserdata/**/*",
    "**/.DS_Store",
    "**/node_modules/.cache/**/*",
];

/// One compiled exclusion pattern
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: String,
    negate: bool,
    matcher: GlobMatcher,
}

impl IgnoreRule {
    /// Compile a pattern. Leading `!` characters toggle negation.
    pub fn new(pattern: &str) -> Result<Self, FingerprintError> {
        let (negate, glob) = split_negation(pattern);
        Ok(Self {
            pattern: pattern.to_string(),
            negate,
            matcher: compile_glob(glob)?,
        })
    }

    /// The pattern as written, including any `!`
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// Match the glob without applying negation
    pub fn glob_matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Match with negation applied: a negating rule matches every path its glob does not.
    pub fn matches(&self, path: &str) -> bool {
        self.glob_matches(path) != self.negate
    }
}

/// Order-sensitive evaluation of compiled rules against a path.
pub fn is_ignored(path: &str, rules: &[IgnoreRule]) -> bool {
    let mut matched = false;
    for rule in rules {
        let current = rule.matches(path);
        if rule.negate {
            if matched && !current {
                return false;
            }
        } else {
            matched = matched || current;
        }
    }
    matched
}

/// Compiled rule sets for files and directories, built once per fingerprint run.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    path_rules: Vec<IgnoreRule>,
    dir_rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FingerprintError> {
        let path_rules = patterns
            .iter()
            .map(|p| IgnoreRule::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let dir_rules = build_dir_rules(&path_rules)?;
        Ok(Self {
            path_rules,
            dir_rules,
        })
    }

    /// Whether a file should be skipped
    pub fn is_ignored_path(&self, path: &str) -> bool {
        is_ignored(path, &self.path_rules)
    }

    /// Whether a directory should be skipped without listing its entries
    pub fn is_ignored_dir(&self, path: &str) -> bool {
        is_ignored(path, &self.dir_rules)
    }

    pub fn path_rules(&self) -> &[IgnoreRule] {
        &self.path_rules
    }

    pub fn dir_rules(&self) -> &[IgnoreRule] {
        &self.dir_rules
    }
}

/// Derive directory rules from path rules.
///
/// Each positive rule contributes itself and its directory form (`a/**` and
/// `a/**/*` become `a`). A positive directory rule is dropped when a negation
/// points somewhere underneath a directory it would skip. Negations keep their
/// positions.
fn build_dir_rules(path_rules: &[IgnoreRule]) -> Result<Vec<IgnoreRule>, FingerprintError> {
    let negated_globs: Vec<&str> = path_rules
        .iter()
        .filter(|r| r.negate)
        .map(|r| split_negation(&r.pattern).1)
        .collect();

    let mut dir_rules = Vec::new();
    for rule in path_rules {
        if rule.negate {
            dir_rules.push(rule.clone());
            continue;
        }

        let mut candidates = vec![rule.clone()];
        if let Some(dir_glob) = strip_dir_suffix(&rule.pattern) {
            candidates.push(IgnoreRule::new(dir_glob)?);
        }

        for candidate in candidates {
            if negated_globs
                .iter()
                .any(|negated| shadows_negation(&candidate, negated))
            {
                continue;
            }
            dir_rules.push(candidate);
        }
    }
    Ok(dir_rules)
}

/// Whether skipping directories matched by `rule` would hide paths the negated glob re-includes.
///
/// Directory segments of the negation are compared literally up to the first
/// wildcard segment. Past that point the negation can reach below any
/// directory under the literal prefix, so every rule that may match such a
/// directory counts as shadowing.
fn shadows_negation(rule: &IgnoreRule, negated_glob: &str) -> bool {
    if negated_glob.starts_with(&format!("{}/", rule.pattern)) {
        return true;
    }
    let segments: Vec<&str> = negated_glob.split('/').collect();
    let dir_segments = &segments[..segments.len() - 1];
    let literal_len = dir_segments
        .iter()
        .position(|segment| has_glob_meta(segment))
        .unwrap_or(dir_segments.len());

    if (1..=literal_len).any(|len| rule.glob_matches(&segments[..len].join("/"))) {
        return true;
    }
    if literal_len == dir_segments.len() {
        return false;
    }

    let prefix = segments[..literal_len].join("/");
    prefix.is_empty()
        || rule.pattern.starts_with(&format!("{}/", prefix))
        || rule.pattern.split('/').next().is_some_and(has_glob_meta)
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

fn strip_dir_suffix(pattern: &str) -> Option<&str> {
    pattern
        .strip_suffix("/**/*")
        .or_else(|| pattern.strip_suffix("/**"))
        .filter(|dir| !dir.is_empty() && *dir != "**")
}

fn split_negation(pattern: &str) -> (bool, &str) {
    let glob = pattern.trim_start_matches('!');
    let bangs = pattern.len() - glob.len();
    (bangs % 2 == 1, glob)
}

fn compile_glob(glob: &str) -> Result<GlobMatcher, FingerprintError> {
    let glob: Glob = GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| FingerprintError::InvalidPattern {
            pattern: glob.to_string(),
            source: e,
        })?;
    Ok(glob.compile_matcher())
}

/// Read ignore patterns from `<project_root>/.fingerprintignore` (trim, skip empty and #).
pub fn read_ignore_file(project_root: &Path) -> Vec<String> {
    let ignore_path = project_root.join(IGNORE_FILE_NAME);
    if !ignore_path.is_file() {
        return Vec::new();
    }
    let contents = match fs::read_to_string(&ignore_path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %ignore_path.display(), "Failed to read ignore file: {}", e);
            return Vec::new();
        }
    };
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
