#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Directives read from `#` comment lines of a program file. The comments
/// stay in the source handed to the compiler.
#[derive(Debug, Default)]
pub struct TestExpectation {
    pub output: Vec<String>,
    pub error: Option<String>,
    pub transpile_only: bool,
}

pub struct Case {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
    pub expectation: TestExpectation,
}

impl Case {
    pub fn golden_path(&self) -> PathBuf {
        self.path.with_extension("py")
    }
}

pub fn parse_test_file(content: &str) -> TestExpectation {
    let mut expectation = TestExpectation::default();

    for line in content.lines() {
        let line = line.trim();
        if let Some(expected) = line.strip_prefix("# expect: ") {
            expectation.output.push(expected.to_string());
        } else if let Some(message) = line.strip_prefix("# expect_error: ") {
            expectation.error = Some(message.to_string());
        } else if line == "# transpile_only" {
            expectation.transpile_only = true;
        }
    }

    expectation
}

pub fn programs_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/programs")
}

/// Every `.sprig` file under `tests/programs`, sorted by name.
pub fn load_cases() -> Vec<Case> {
    let mut paths: Vec<PathBuf> = fs::read_dir(programs_dir())
        .expect("tests/programs should exist")
        .map(|entry| entry.expect("readable directory entry").path())
        .filter(|path| path.extension().map_or(false, |e| e == "sprig"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let source = fs::read_to_string(&path).expect("readable program file");
            let expectation = parse_test_file(&source);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Case { name, path, source, expectation }
        })
        .collect()
}

/// Runs every case, printing a line per case, and panics with the collected
/// failures at the end.
pub fn run_cases<F>(cases: &[Case], mut check: F)
where
    F: FnMut(&Case) -> Result<(), String>,
{
    let mut failures = Vec::new();
    let mut passed = 0;

    for case in cases {
        print!("Testing {}... ", case.name);
        match check(case) {
            Ok(()) => {
                println!("OK");
                passed += 1;
            }
            Err(e) => {
                println!("FAILED");
                failures.push((case.name.clone(), e));
            }
        }
    }

    println!("\n{} passed, {} failed", passed, failures.len());

    if !failures.is_empty() {
        println!("\nFailures:");
        for (name, err) in &failures {
            println!("\n--- {} ---\n{}", name, err);
        }
        panic!("{} test(s) failed", failures.len());
    }
}
