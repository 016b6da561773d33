//! Unit and property tests for tag key classification.

use super::*;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("amenity", "regular", "amenity")]
#[case("addr:street", "addr", "street")]
#[case("addr:street:name", "addr", "street:name")]
#[case("name:de", "name", "de")]
#[case("FIXME", "regular", "FIXME")]
#[case("addr:", "addr", "")]
fn accepts_keys_without_problem_characters(
    #[case] raw: &str,
    #[case] tag_type: &str,
    #[case] key: &str,
) {
    assert_eq!(classify(raw), TagKey::Accepted { tag_type, key });
}

#[rstest]
#[case("name.en")]
#[case("addr street")]
#[case("a=b")]
#[case("tiger:cfcc,old")]
#[case("note\n")]
#[case("ref#1")]
#[case("url?")]
#[case("contact:e@mail")]
fn rejects_keys_with_problem_characters(#[case] raw: &str) {
    assert_eq!(classify(raw), TagKey::Rejected);
}

#[rstest]
#[case("highway", KeyCategory::Lower)]
#[case("addr_street", KeyCategory::Lower)]
#[case("addr:street", KeyCategory::LowerColon)]
#[case("addr:street:name", KeyCategory::Other)]
#[case("name.en", KeyCategory::ProblemChars)]
#[case("FIXME", KeyCategory::Other)]
#[case("tiger:name_base_1", KeyCategory::Other)]
fn categorises_keys_like_the_exploration_pass(#[case] raw: &str, #[case] expected: KeyCategory) {
    assert_eq!(KeyCategory::of(raw), expected);
}

const PROBLEM_CHARS: &[char] = &[
    '=', '+', '/', '&', '<', '>', ';', '\'', '"', '?', '%', '#', '$', '@', ',', '.', ' ', '\t',
    '\r', '\n',
];

fn clean_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\\-]{0,12}"
}

proptest! {
    #[test]
    fn any_problem_character_rejects(
        prefix in clean_segment(),
        suffix in clean_segment(),
        index in 0..PROBLEM_CHARS.len(),
    ) {
        let bad = PROBLEM_CHARS.get(index).copied().unwrap_or('.');
        let raw = format!("{prefix}{bad}{suffix}");
        prop_assert_eq!(classify(&raw), TagKey::Rejected);
    }

    #[test]
    fn only_the_first_colon_splits(
        prefix in clean_segment(),
        rest in clean_segment(),
        more in clean_segment(),
    ) {
        let raw = format!("{prefix}:{rest}:{more}");
        let expected_key = format!("{rest}:{more}");
        prop_assert_eq!(
            classify(&raw),
            TagKey::Accepted { tag_type: prefix.as_str(), key: expected_key.as_str() }
        );
    }

    #[test]
    fn keys_without_colon_are_regular(raw in clean_segment()) {
        prop_assert_eq!(
            classify(&raw),
            TagKey::Accepted { tag_type: DEFAULT_TAG_TYPE, key: raw.as_str() }
        );
    }
}
