use crate::{positions, run_check};
use manifest_whitespace::{Check, CheckSet, FixMode, Linter, ProblemKind, Settings};
use pretty_assertions::assert_eq;

const BEFORE_MSG: &str = "there should be a single space or newline before a closing brace";
const AFTER_MSG: &str = "there should be either a bracket, punctuation mark, closing quote or a newline after a closing brace, or whitespace and none of the aforementioned";

const NO_SPACES: &str = include_str!("../fixtures/closing_brace_before_no_spaces.pp");
const NO_SPACES_FIXED: &str = include_str!("../fixtures/closing_brace_before_no_spaces.fixed.pp");
const TOO_MANY_SPACES: &str = include_str!("../fixtures/closing_brace_before_too_many_spaces.pp");
const TOO_MANY_SPACES_FIXED: &str =
    include_str!("../fixtures/closing_brace_before_too_many_spaces.fixed.pp");
const TOO_MANY_NEWLINES: &str =
    include_str!("../fixtures/closing_brace_before_too_many_newlines.pp");
const TOO_MANY_NEWLINES_FIXED: &str =
    include_str!("../fixtures/closing_brace_before_too_many_newlines.fixed.pp");
const WITH_SPACES: &str = include_str!("../fixtures/closing_brace_after_with_spaces.pp");
const WITH_SPACES_FIXED: &str = include_str!("../fixtures/closing_brace_after_with_spaces.fixed.pp");

const ITERATOR: &str = "['ib0', 'ib1', 'ib2', 'ib3', 'pub', 'oob', '0', '184'].each |String $name| {\n}\n";

#[test]
fn test_before_missing_space_in_nested_hash() {
    let source = "$my_images = { 'default' => {}}\n";
    let report = run_check(Check::ClosingBraceBefore, source, FixMode::Fix);
    assert_eq!(report.problems.len(), 1);
    assert!(report.problems[0].fixed);
    assert_eq!(report.problems[0].message, BEFORE_MSG);
    assert_eq!(report.output, "$my_images = { 'default' => {} }\n");
}

#[test]
fn test_before_clean_cases() {
    let nested =
        "Hash $instances  = { 'localhost' => { 'url' => 'http://localhost/mod_status?auto' } },\n";
    let iterators = format!("{ITERATOR}\n{ITERATOR}");
    let comment_only = "$value7 = {\n  # nothing\n}\n";
    for source in [nested, iterators.as_str(), comment_only] {
        let report = run_check(Check::ClosingBraceBefore, source, FixMode::Report);
        assert!(report.is_clean(), "{source}: {:?}", report.problems);
    }
}

#[test]
fn test_before_no_spaces() {
    let report = run_check(Check::ClosingBraceBefore, NO_SPACES, FixMode::Report);
    assert_eq!(report.problems.len(), 3);
    assert_eq!(positions(&report)[0], (9, 31));
    assert!(report
        .problems
        .iter()
        .all(|p| p.kind == ProblemKind::Error && p.message == BEFORE_MSG));

    let fixed = run_check(Check::ClosingBraceBefore, NO_SPACES, FixMode::Fix);
    assert!(fixed.all_fixed);
    assert_eq!(fixed.output, NO_SPACES_FIXED);
}

#[test]
fn test_before_too_many_spaces() {
    let report = run_check(Check::ClosingBraceBefore, TOO_MANY_SPACES, FixMode::Report);
    assert_eq!(report.problems.len(), 4);
    assert_eq!(positions(&report)[0], (9, 31));

    let fixed = run_check(Check::ClosingBraceBefore, TOO_MANY_SPACES, FixMode::Fix);
    assert!(fixed.all_fixed);
    assert_eq!(fixed.output, TOO_MANY_SPACES_FIXED);
}

#[test]
fn test_before_too_many_newlines() {
    let report = run_check(Check::ClosingBraceBefore, TOO_MANY_NEWLINES, FixMode::Report);
    assert_eq!(report.problems.len(), 5);
    assert_eq!(positions(&report)[0], (15, 25));

    let fixed = run_check(Check::ClosingBraceBefore, TOO_MANY_NEWLINES, FixMode::Fix);
    assert!(fixed.all_fixed);
    assert_eq!(fixed.output, TOO_MANY_NEWLINES_FIXED);
}

#[test]
fn test_after_iterator_is_clean() {
    let report = run_check(Check::ClosingBraceAfter, ITERATOR, FixMode::Report);
    assert!(report.is_clean());
}

#[test]
fn test_after_inline_function_call() {
    let report = run_check(
        Check::ClosingBraceAfter,
        "Hash({ $key => $return_value } )\n",
        FixMode::Report,
    );
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].message, AFTER_MSG);
}

#[test]
fn test_after_with_spaces() {
    let report = run_check(Check::ClosingBraceAfter, WITH_SPACES, FixMode::Report);
    assert_eq!(report.problems.len(), 3);
    assert_eq!(positions(&report)[0], (9, 33));

    let fixed = run_check(Check::ClosingBraceAfter, WITH_SPACES, FixMode::Fix);
    assert!(fixed.all_fixed);
    assert_eq!(fixed.output, WITH_SPACES_FIXED);
}

#[test]
fn test_single_line_conditional_in_value_position() {
    let source = "$groups = if $sudo { ['wheel'] } else { [] }";
    let report = Linter::default().run(source, FixMode::Report).unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_all_checks_on_fixed_manifests_are_clean() {
    let linter = Linter::new(CheckSet::all(), Settings::default());
    for source in [
        NO_SPACES_FIXED,
        TOO_MANY_SPACES_FIXED,
        TOO_MANY_NEWLINES_FIXED,
        WITH_SPACES_FIXED,
    ] {
        let report = linter.run(source, FixMode::Report).unwrap();
        assert!(report.is_clean(), "{:?}", report.problems);
    }
}
