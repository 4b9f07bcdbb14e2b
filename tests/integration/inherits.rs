use crate::{positions, run_check};
use manifest_whitespace::{Check, FixMode, Linter};
use pretty_assertions::assert_eq;

const BEFORE_MSG: &str =
    "there should be a single space between the inherits statement and the name";
const AFTER_MSG: &str =
    "there should be a single space between the class or resource name and the first bracket";

const FIXED: &str = include_str!("../fixtures/inherits_fixed.pp");

#[test]
fn test_before_two_spaces() {
    let source = include_str!("../fixtures/inherits_before_two_spaces.pp");
    let report = run_check(Check::InheritsNameSingleSpaceBefore, source, FixMode::Report);
    assert_eq!(positions(&report), vec![(6, 23)]);
    assert_eq!(report.problems[0].message, BEFORE_MSG);

    let fixed = run_check(Check::InheritsNameSingleSpaceBefore, source, FixMode::Fix);
    assert_eq!(fixed.problems.len(), 1);
    assert!(fixed.problems[0].fixed);
    assert_eq!(
        fixed.output,
        include_str!("../fixtures/inherits_before_two_spaces.fixed.pp")
    );
}

#[test]
fn test_after_spacing_variants() {
    for source in [
        include_str!("../fixtures/inherits_after_no_space.pp"),
        include_str!("../fixtures/inherits_after_two_spaces.pp"),
        include_str!("../fixtures/inherits_after_newlines.pp"),
    ] {
        let report = run_check(Check::InheritsNameSingleSpaceAfter, source, FixMode::Report);
        assert_eq!(positions(&report), vec![(6, 38)]);
        assert_eq!(report.problems[0].message, AFTER_MSG);

        let fixed = run_check(Check::InheritsNameSingleSpaceAfter, source, FixMode::Fix);
        assert_eq!(fixed.problems.len(), 1);
        assert!(fixed.problems[0].fixed);
        assert_eq!(fixed.output, FIXED);
    }
}

#[test]
fn test_after_comment_is_never_moved() {
    let source = include_str!("../fixtures/inherits_after_comment.pp");
    let report = run_check(Check::InheritsNameSingleSpaceAfter, source, FixMode::Fix);
    assert_eq!(positions(&report), vec![(6, 38)]);
    assert!(!report.problems[0].fixed);
    assert!(!report.problems[0].fixable);
    assert!(!report.all_fixed);
    assert_eq!(report.output, source);
}

#[test]
fn test_after_block_comment_is_reported_and_kept() {
    let source = "class example inherits other::example /* c */\n{\n}\n";
    let report = Linter::default().run(source, FixMode::Fix).unwrap();
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].check, Check::InheritsNameSingleSpaceAfter);
    assert_eq!(positions(&report), vec![(1, 38)]);
    assert!(!report.problems[0].fixable);
    assert!(!report.problems[0].fixed);
    assert_eq!(report.output, source);
}

#[test]
fn test_fixed_manifest_is_clean() {
    for check in [
        Check::InheritsNameSingleSpaceBefore,
        Check::InheritsNameSingleSpaceAfter,
    ] {
        assert!(run_check(check, FIXED, FixMode::Report).is_clean());
    }
}
