//! Kana canonicalization.
//!
//! Every kana variant (hiragana, full-width katakana, half-width katakana,
//! half-width katakana followed by a voicing mark) maps to exactly one
//! full-width katakana codepoint. All comparisons in the judge happen on
//! that canonical form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Distance between a hiragana codepoint and its full-width katakana twin.
const HIRAGANA_TO_KATAKANA: u32 = 0x60;

/// A canonical kana: always a full-width katakana codepoint in `ァ..=ヶ`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kana(char);

impl Kana {
    /// Wrap a character that is already canonical.
    ///
    /// Returns `None` for anything outside the full-width katakana block.
    pub fn new(c: char) -> Option<Self> {
        is_fullwidth_katakana(c).then_some(Self(c))
    }

    /// Canonicalize `c`, looking at `next` for a trailing voicing mark.
    ///
    /// Half-width katakana followed by a dakuten (or handakuten) mark yields
    /// the voiced (semi-voiced) form when one exists; otherwise the mark is
    /// ignored. Returns `None` for non-kana input.
    pub fn canonicalize(c: char, next: Option<char>) -> Option<Self> {
        if is_fullwidth_katakana(c) {
            return Some(Self(c));
        }
        if is_hiragana(c) {
            return char::from_u32(c as u32 + HIRAGANA_TO_KATAKANA).map(Self);
        }
        if is_halfwidth_katakana(c) {
            let voiced = match next {
                Some(m) if is_dakuten(m) => halfwidth_voiced(c),
                Some(m) if is_handakuten(m) => halfwidth_semi_voiced(c),
                _ => None,
            };
            return voiced.or_else(|| halfwidth_plain(c)).map(Self);
        }
        None
    }

    /// The underlying full-width katakana character.
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Debug for Kana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kana({})", self.0)
    }
}

impl fmt::Display for Kana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Kana> for char {
    fn from(k: Kana) -> Self {
        k.0
    }
}

impl Serialize for Kana {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.0)
    }
}

impl<'de> Deserialize<'de> for Kana {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = char::deserialize(deserializer)?;
        Kana::new(c).ok_or_else(|| {
            serde::de::Error::custom(format!("{c:?} is not a full-width katakana"))
        })
    }
}

/// `[ぁ-ゖ]`
pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c)
}

/// `[ァ-ヶ]`
pub fn is_fullwidth_katakana(c: char) -> bool {
    ('\u{30A1}'..='\u{30F6}').contains(&c)
}

/// `[ｦ-ｯｱ-ﾝ]`: half-width katakana letters, excluding the prolonged mark `ｰ`.
pub fn is_halfwidth_katakana(c: char) -> bool {
    ('\u{FF66}'..='\u{FF6F}').contains(&c) || ('\u{FF71}'..='\u{FF9D}').contains(&c)
}

/// Anything in the half-width katakana block, marks and `ｰ` included.
pub fn is_halfwidth_block(c: char) -> bool {
    ('\u{FF66}'..='\u{FF9F}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_fullwidth_katakana(c) || is_halfwidth_katakana(c)
}

fn is_dakuten(c: char) -> bool {
    matches!(c, 'ﾞ' | '゛' | '\u{3099}')
}

fn is_handakuten(c: char) -> bool {
    matches!(c, 'ﾟ' | '゜' | '\u{309A}')
}

fn halfwidth_plain(c: char) -> Option<char> {
    let k = match c {
        'ｦ' => 'ヲ',
        'ｧ' => 'ァ',
        'ｨ' => 'ィ',
        'ｩ' => 'ゥ',
        'ｪ' => 'ェ',
        'ｫ' => 'ォ',
        'ｬ' => 'ャ',
        'ｭ' => 'ュ',
        'ｮ' => 'ョ',
        'ｯ' => 'ッ',
        'ｱ' => 'ア',
        'ｲ' => 'イ',
        'ｳ' => 'ウ',
        'ｴ' => 'エ',
        'ｵ' => 'オ',
        'ｶ' => 'カ',
        'ｷ' => 'キ',
        'ｸ' => 'ク',
        'ｹ' => 'ケ',
        'ｺ' => 'コ',
        'ｻ' => 'サ',
        'ｼ' => 'シ',
        'ｽ' => 'ス',
        'ｾ' => 'セ',
        'ｿ' => 'ソ',
        'ﾀ' => 'タ',
        'ﾁ' => 'チ',
        'ﾂ' => 'ツ',
        'ﾃ' => 'テ',
        'ﾄ' => 'ト',
        'ﾅ' => 'ナ',
        'ﾆ' => 'ニ',
        'ﾇ' => 'ヌ',
        'ﾈ' => 'ネ',
        'ﾉ' => 'ノ',
        'ﾊ' => 'ハ',
        'ﾋ' => 'ヒ',
        'ﾌ' => 'フ',
        'ﾍ' => 'ヘ',
        'ﾎ' => 'ホ',
        'ﾏ' => 'マ',
        'ﾐ' => 'ミ',
        'ﾑ' => 'ム',
        'ﾒ' => 'メ',
        'ﾓ' => 'モ',
        'ﾔ' => 'ヤ',
        'ﾕ' => 'ユ',
        'ﾖ' => 'ヨ',
        'ﾗ' => 'ラ',
        'ﾘ' => 'リ',
        'ﾙ' => 'ル',
        'ﾚ' => 'レ',
        'ﾛ' => 'ロ',
        'ﾜ' => 'ワ',
        'ﾝ' => 'ン',
        _ => return None,
    };
    Some(k)
}

fn halfwidth_voiced(c: char) -> Option<char> {
    let k = match c {
        'ｶ' => 'ガ',
        'ｷ' => 'ギ',
        'ｸ' => 'グ',
        'ｹ' => 'ゲ',
        'ｺ' => 'ゴ',
        'ｻ' => 'ザ',
        'ｼ' => 'ジ',
        'ｽ' => 'ズ',
        'ｾ' => 'ゼ',
        'ｿ' => 'ゾ',
        'ﾀ' => 'ダ',
        'ﾁ' => 'ヂ',
        'ﾂ' => 'ヅ',
        'ﾃ' => 'デ',
        'ﾄ' => 'ド',
        'ﾊ' => 'バ',
        'ﾋ' => 'ビ',
        'ﾌ' => 'ブ',
        'ﾍ' => 'ベ',
        'ﾎ' => 'ボ',
        'ｳ' => 'ヴ',
        _ => return None,
    };
    Some(k)
}

fn halfwidth_semi_voiced(c: char) -> Option<char> {
    let k = match c {
        'ﾊ' => 'パ',
        'ﾋ' => 'ピ',
        'ﾌ' => 'プ',
        'ﾍ' => 'ペ',
        'ﾎ' => 'ポ',
        _ => return None,
    };
    Some(k)
}

/// First kana in `s`, canonicalized (voicing marks after it are honored).
pub fn first_kana(s: &str) -> Option<Kana> {
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if is_kana(c) {
            return Kana::canonicalize(c, chars.peek().copied());
        }
    }
    None
}

/// Last kana in `s`, canonicalized (a voicing mark after it is honored).
pub fn last_kana(s: &str) -> Option<Kana> {
    let chars: Vec<char> = s.chars().collect();
    let i = chars.iter().rposition(|&c| is_kana(c))?;
    Kana::canonicalize(chars[i], chars.get(i + 1).copied())
}

/// Rewrite every kana in `s` to full-width katakana, folding half-width
/// voicing marks into the preceding letter. Other characters pass through,
/// with the half-width prolonged mark widened to `ー`.
pub fn to_katakana(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match Kana::canonicalize(c, next) {
            Some(k) => {
                out.push(k.as_char());
                // A mark consumed into a voiced form must not be emitted again.
                if is_halfwidth_katakana(c) && next.is_some_and(|m| is_dakuten(m) || is_handakuten(m)) {
                    if let Some(plain) = halfwidth_plain(c) {
                        if plain != k.as_char() {
                            i += 1;
                        }
                    }
                }
            }
            None if c == 'ｰ' => out.push('ー'),
            None => out.push(c),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(s: &str, i: usize) -> Option<char> {
        let chars: Vec<char> = s.chars().collect();
        Kana::canonicalize(chars[i], chars.get(i + 1).copied()).map(Kana::as_char)
    }

    #[test]
    fn test_canonicalize_variants() {
        let cases = [
            ("あいうえお", 0, Some('ア')),
            ("あいうえお", 4, Some('オ')),
            ("アイウエオ", 2, Some('ウ')),
            ("がぎぐげご", 0, Some('ガ')),
            ("ぱぴぷぺぽ", 0, Some('パ')),
            ("ｱｲｳｴｵ", 0, Some('ア')),
            ("ｱｲｳｴｵ", 4, Some('オ')),
            ("ｯﾀｰﾝ", 0, Some('ッ')),
            ("ﾐﾂｦ", 2, Some('ヲ')),
            ("ｶﾞｷﾞｸﾞｹﾞｺﾞ", 0, Some('ガ')),
            ("ｶﾞｷﾞｸﾞｹﾞｺﾞ", 8, Some('ゴ')),
            ("ｶ゛ｷ゛ｸ゛ｹ゛ｺ゛", 8, Some('ゴ')),
            ("ﾊﾟﾋﾟﾌﾟﾍﾟﾎﾟ", 0, Some('パ')),
            ("ﾊ゜ﾋ゜ﾌ゜ﾍ゜ﾎ゜", 8, Some('ポ')),
            ("ﾅﾞﾆﾞﾇﾞﾈﾞﾉﾞ", 0, Some('ナ')),
            ("ﾅﾟﾆﾟﾇﾟﾈﾟﾉﾟ", 8, Some('ノ')),
            ("ｳﾞ", 0, Some('ヴ')),
            ("漢字", 0, None),
        ];
        for (input, i, want) in cases {
            assert_eq!(at(input, i), want, "canonicalize({input:?}, {i})");
        }
    }

    #[test]
    fn test_same_sound_same_kana() {
        let a = Kana::canonicalize('あ', None);
        assert_eq!(a, Kana::canonicalize('ア', None));
        assert_eq!(a, Kana::canonicalize('ｱ', None));
    }

    #[test]
    fn test_first_and_last_kana() {
        assert_eq!(first_kana("!?あい"), Kana::new('ア'));
        assert_eq!(last_kana("あーー"), Kana::new('ア'));
        assert_eq!(last_kana("ｳﾜｰ!"), Kana::new('ワ'));
        assert_eq!(last_kana("ｺﾞ"), Kana::new('ゴ'));
        assert_eq!(first_kana("！？"), None);
    }

    #[test]
    fn test_to_katakana() {
        assert_eq!(to_katakana("ひらがな"), "ヒラガナ");
        assert_eq!(to_katakana("ｶﾞｯｺｳ"), "ガッコウ");
        assert_eq!(to_katakana("ﾎﾟﾝﾁｰ"), "ポンチー");
        assert_eq!(to_katakana("ﾅﾞ"), "ナﾞ");
    }

    #[test]
    fn test_serde_as_string() {
        let k = Kana::new('ン').unwrap();
        assert_eq!(serde_json::to_string(&k).unwrap(), "\"ン\"");
        let back: Kana = serde_json::from_str("\"ン\"").unwrap();
        assert_eq!(back, k);
        assert!(serde_json::from_str::<Kana>("\"ん\"").is_err());
    }

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(c in prop_oneof![
            proptest::char::range('\u{3041}', '\u{3096}'),
            proptest::char::range('\u{30A1}', '\u{30F6}'),
            proptest::char::range('\u{FF66}', '\u{FF6F}'),
            proptest::char::range('\u{FF71}', '\u{FF9D}'),
        ]) {
            let k = Kana::canonicalize(c, None).expect("kana canonicalizes");
            prop_assert_eq!(Kana::canonicalize(k.as_char(), None), Some(k));
            prop_assert!(is_fullwidth_katakana(k.as_char()));
        }
    }
}
