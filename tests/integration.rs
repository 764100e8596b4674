mod common;

use std::fs;

use common::{load_cases, parse_test_file, run_cases, Case};

fn run_test_file(case: &Case) -> Result<(), String> {
    let expectation = &case.expectation;

    let transpiled = sprig::transpile(&case.source);
    if let Some(expected) = &expectation.error {
        return match transpiled {
            Ok(_) => Err(format!("Expected error containing {:?} but compilation succeeded", expected)),
            Err(e) if e.to_string().contains(expected.as_str()) => Ok(()),
            Err(e) => Err(format!(
                "Error mismatch:\n  Expected to contain: {:?}\n  Actual: {}",
                expected, e
            )),
        };
    }
    let python = transpiled.map_err(|e| e.to_string())?;

    let golden = case.golden_path();
    let has_golden = golden.exists();
    if has_golden {
        let expected = fs::read_to_string(&golden).map_err(|e| e.to_string())?;
        if python != expected.trim_end() {
            return Err(format!(
                "Python mismatch:\n--- expected ---\n{}\n--- actual ---\n{}",
                expected.trim_end(),
                python
            ));
        }
    }

    if expectation.output.is_empty() {
        if !has_golden {
            return Err("Program has neither a golden .py file nor expect lines".to_string());
        }
        return Ok(());
    }

    if !expectation.transpile_only {
        let actual = sprig::evaluate(&case.source).map_err(|e| e.to_string())?;
        if actual != expectation.output {
            return Err(format!(
                "Output mismatch:\n  Expected: {:?}\n  Actual:   {:?}",
                expectation.output, actual
            ));
        }
    }
    Ok(())
}

#[test]
fn run_all_program_tests() {
    let cases = load_cases();
    assert!(!cases.is_empty(), "no programs under tests/programs");
    run_cases(&cases, run_test_file);
}

#[test]
fn directives_are_read_from_comments() {
    let expectation = parse_test_file("# transpile_only\nprint(1)\n# expect: 1\n  # expect: two words\n");
    assert_eq!(expectation.output, vec!["1", "two words"]);
    assert!(expectation.transpile_only);
    assert_eq!(expectation.error, None);

    let expectation = parse_test_file("# expect_error: Expected RBrace\nif x {");
    assert_eq!(expectation.error.as_deref(), Some("Expected RBrace"));
}

#[test]
fn line_input_matches_text_input() {
    for case in load_cases() {
        let by_text = sprig::transpile(&case.source).map_err(|e| e.to_string());
        let by_lines = sprig::transpile_lines(case.source.lines()).map_err(|e| e.to_string());
        assert_eq!(by_text, by_lines, "{}", case.name);
    }
}
