//! Proptest generators for property-based testing.

use proptest::prelude::*;

use shiritori_core::{EventId, Kana};

/// Generate a hiragana letter.
pub fn hiragana() -> impl Strategy<Value = char> {
    proptest::char::range('\u{3041}', '\u{3096}')
}

/// Generate a full-width katakana letter.
pub fn katakana() -> impl Strategy<Value = char> {
    proptest::char::range('\u{30A1}', '\u{30F6}')
}

/// Generate a canonical kana.
pub fn kana() -> impl Strategy<Value = Kana> {
    katakana().prop_filter_map("katakana is canonical", Kana::new)
}

/// Generate a half-width katakana letter.
pub fn halfwidth_katakana() -> impl Strategy<Value = char> {
    prop_oneof![
        proptest::char::range('\u{FF66}', '\u{FF6F}'),
        proptest::char::range('\u{FF71}', '\u{FF9D}'),
    ]
}

/// Generate a word of 1..=max_len kana mixing hiragana and katakana.
pub fn kana_word(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![hiragana(), katakana()], 1..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generate a word of 1..=max_len ASCII letters.
pub fn latin_word(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            proptest::char::range('a', 'z'),
            proptest::char::range('A', 'Z'),
        ],
        1..=max_len,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Generate a numeral the way it appears in posts: optional minus sign,
/// optional fraction, possibly with a leading zero.
pub fn numeral() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        "[0-9]{1,20}",
        proptest::option::of("[0-9]{1,4}"),
    )
        .prop_map(|(negative, int_part, frac)| {
            let mut s = String::new();
            if negative {
                s.push('-');
            }
            s.push_str(&int_part);
            if let Some(frac) = frac {
                s.push('.');
                s.push_str(&frac);
            }
            s
        })
}

/// Generate an event id.
pub fn event_id() -> impl Strategy<Value = EventId> {
    "[0-9a-f]{64}".prop_map(EventId::new)
}

/// Arbitrary post text: kana, Latin, digits, punctuation, emoji and spaces.
pub fn post_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            kana_word(6),
            latin_word(8),
            "[0-9]{1,6}",
            Just(" ".to_string()),
            Just("！？".to_string()),
            Just("🎉".to_string()),
            Just(":smile:".to_string()),
            Just("https://example.com/x".to_string()),
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}
