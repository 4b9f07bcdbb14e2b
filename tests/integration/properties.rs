//! Property tests over generated manifest fragments.

use manifest_whitespace::{lex, FixMode, Linter};
use proptest::prelude::*;

/// Fragments that exercise braces, brackets, strings and spacing.
fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "{", "}", "[", "]", "(", ")", ",", " ", "  ", "\t", "\n", "\n\n", "'k'", "=>", "=",
        "$x", "if", "else", "class", "inherits", "a::b", "Foo", "\"s${v}t\"", "\"plain\"",
        "# note\n", "/* c */", "f", ";", "1",
    ])
}

fn manifest() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn lexing_is_lossless(source in manifest()) {
        let tokens = lex(&source).unwrap();
        prop_assert_eq!(tokens.render(), source);
    }

    #[test]
    fn lexing_arbitrary_text_never_loses_bytes(source in "[ -~\n\t]{0,60}") {
        if let Ok(tokens) = lex(&source) {
            prop_assert_eq!(tokens.render(), source);
        }
    }

    #[test]
    fn fixing_twice_changes_nothing(source in manifest()) {
        let linter = Linter::default();
        let first = linter.run(&source, FixMode::Fix).unwrap();
        let second = linter.run(&first.output, FixMode::Fix).unwrap();
        prop_assert_eq!(&second.output, &first.output);
        prop_assert!(second.problems.iter().all(|p| !p.fixable), "{:?}", second.problems);
    }

    #[test]
    fn report_mode_is_a_no_op(source in manifest()) {
        let report = Linter::default().run(&source, FixMode::Report).unwrap();
        prop_assert_eq!(report.output, source);
    }

    #[test]
    fn fixes_only_touch_whitespace(source in manifest()) {
        let report = Linter::default().run(&source, FixMode::Fix).unwrap();
        let strip = |text: &str| text.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(strip(&report.output), strip(&source));
    }
}
