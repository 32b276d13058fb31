//! Hygiene: coding standards checked at test time.
//!
//! Scans the production sources under `src/` (sibling `_test.rs` files are
//! skipped) for patterns the crate does not allow. Every pattern has a budget
//! of zero. Raising a budget needs a reason in review; lowering one never does.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "propagate with `?` or handle the None/Err" },
    Budget { pattern: ".expect(", max: 0, why: "propagate with `?` or handle the None/Err" },
    Budget { pattern: "panic!(", max: 0, why: "a panic tears down every listener on the page" },
    Budget { pattern: "unreachable!(", max: 0, why: "encode the invariant in the types instead" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished code paths" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished code paths" },
];

const DISCARDS: &[Budget] = &[
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the result" },
    Budget { pattern: ".ok()", max: 0, why: "inspect or log the error before dropping it" },
];

const STYLE: &[Budget] = &[
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
    Budget { pattern: "println!(", max: 0, why: "log through the `log` facade" },
    Budget { pattern: "eprintln!(", max: 0, why: "log through the `log` facade" },
    Budget { pattern: "dbg!(", max: 0, why: "debugging leftovers" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found under src/; run from the crate root");
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
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Lines containing `pattern`, as `path:line` strings.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(index, _)| format!("  {}:{}", file.path, index + 1))
        })
        .collect()
}

fn check(budgets: &[Budget]) {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in budgets {
        let found = hits(&files, budget.pattern);
        if found.len() > budget.max {
            failures.push(format!(
                "`{}` budget exceeded: found {}, max {} ({})\n{}",
                budget.pattern,
                found.len(),
                budget.max,
                budget.why,
                found.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn panic_budgets() {
    check(PANICS);
}

#[test]
fn silent_discard_budgets() {
    check(DISCARDS);
}

#[test]
fn style_budgets() {
    check(STYLE);
}
