//! Property-based tests for heading-aware splitting.

use proptest::prelude::*;
use rag_base::splitter::{render, split};

/// Body-ish text with the characters Google Docs exports tend to carry.
fn text() -> impl Strategy<Value = String> {
    "[a-zа-я0-9#`~ \t\u{200B}\u{00A0}\u{FEFF}]{0,12}"
}

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => text(),
        2 => (1usize..=3, text()).prop_map(|(level, t)| format!("{} {t}", "#".repeat(level))),
        1 => Just(String::new()),
        1 => prop::sample::select(vec!["```", "```rust", "~~~", "#### deep", "#tag", "  \u{200B}  "])
            .prop_map(String::from),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(line(), 0..40).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn render_then_split_reproduces_fragments(md in document()) {
        let once = split(&md);
        let twice = split(&render(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn split_is_deterministic(md in document()) {
        prop_assert_eq!(split(&md), split(&md));
    }

    #[test]
    fn fragments_are_indexed_non_empty_and_never_repeat_a_stack(md in document()) {
        let frags = split(&md);
        for (i, f) in frags.iter().enumerate() {
            prop_assert_eq!(f.index, i);
            prop_assert!(!f.body.is_empty());
            prop_assert!(f.headings.windows(2).all(|w| w[0].level < w[1].level));
        }
        for pair in frags.windows(2) {
            prop_assert_ne!(&pair[0].headings, &pair[1].headings);
        }
    }
}
