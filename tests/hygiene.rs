//! Hygiene: source-level rules for `src/`, checked at test time.
//!
//! Every pattern below has a budget of zero in production files (`*_test.rs`
//! files are exempt). The controller must never panic or lose an error
//! silently on a user's page, so a new hit means fixing the code, not raising
//! the budget.

use std::fs;
use std::path::Path;

/// (pattern, reason) pairs that must not appear in production sources.
const BANNED: &[(&str, &str)] = &[
    (".unwrap()", "panics on the page"),
    (".expect(", "panics on the page"),
    ("panic!(", "panics on the page"),
    ("unreachable!(", "panics on the page"),
    ("todo!(", "unfinished code"),
    ("unimplemented!(", "unfinished code"),
    ("let _ =", "discards a Result without looking at it"),
    (".ok()", "discards the error value"),
    ("#[allow(dead_code)]", "hides unused code"),
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "rs") {
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, line)| format!("  {}:{}: {}", file.path, n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("controller.rs")), "run from the crate root");
}

#[test]
fn banned_patterns_are_absent() {
    let files = source_files();
    let report: Vec<String> = BANNED
        .iter()
        .filter_map(|(pattern, reason)| {
            let found = hits(&files, pattern);
            (!found.is_empty()).then(|| format!("{pattern} ({reason}):\n{}", found.join("\n")))
        })
        .collect();
    assert!(report.is_empty(), "hygiene violations:\n{}", report.join("\n"));
}
