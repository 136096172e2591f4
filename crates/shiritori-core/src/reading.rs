//! Effective head/last kana of a normalized text.
//!
//! Tokens are scanned from the left for the head kana and from the right
//! for the last kana. For each token an ordered list of
//! [`ReadingResolver`]s is tried until one yields a kana:
//!
//! 1. [`KanaSurface`]: the surface is all full-width katakana
//! 2. [`HalfwidthSurface`]: the surface is all half-width katakana
//! 3. [`TokenizerReading`]: the tokenizer supplied a reading
//! 4. [`LatinWord`]: the surface is a Latin word (dictionary, then letter names)
//! 5. [`SurfaceScan`]: any kana embedded in the surface
//!
//! The last-kana scan never goes left of the token that produced the head.

use std::sync::Arc;

use crate::dictionary::ReadingDictionary;
use crate::kana::{
    first_kana, is_fullwidth_katakana, is_halfwidth_block, is_halfwidth_katakana, last_kana, Kana,
};
use crate::tokenize::{Token, Tokenizer};
use crate::types::EffectiveReading;

/// Which end of the reading is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Head,
    Last,
}

impl Side {
    fn pick(self, s: &str) -> Option<Kana> {
        match self {
            Side::Head => first_kana(s),
            Side::Last => last_kana(s),
        }
    }
}

/// One fallback strategy for resolving a token's head or last kana.
pub trait ReadingResolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana>;
}

/// Surface made of canonical kana only.
#[derive(Debug, Default)]
pub struct KanaSurface;

impl ReadingResolver for KanaSurface {
    fn name(&self) -> &'static str {
        "kana-surface"
    }

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana> {
        let s = token.surface.as_str();
        if s.is_empty() || !s.chars().all(is_fullwidth_katakana) {
            return None;
        }
        let c = match side {
            Side::Head => s.chars().next()?,
            Side::Last => s.chars().next_back()?,
        };
        Kana::new(c)
    }
}

/// Surface made of half-width katakana (marks and `ｰ` allowed).
#[derive(Debug, Default)]
pub struct HalfwidthSurface;

impl ReadingResolver for HalfwidthSurface {
    fn name(&self) -> &'static str {
        "halfwidth-surface"
    }

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana> {
        let s = token.surface.as_str();
        if !s.chars().all(is_halfwidth_block) || !s.chars().any(is_halfwidth_katakana) {
            return None;
        }
        side.pick(s)
    }
}

/// Reading supplied by the tokenizer.
#[derive(Debug, Default)]
pub struct TokenizerReading;

impl ReadingResolver for TokenizerReading {
    fn name(&self) -> &'static str {
        "tokenizer-reading"
    }

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana> {
        token.reading.as_deref().and_then(|r| side.pick(r))
    }
}

/// Latin word: dictionary reading if known, else the spoken name of its
/// first (head) or last (last) letter.
#[derive(Debug, Clone, Default)]
pub struct LatinWord {
    dictionary: Arc<ReadingDictionary>,
}

impl LatinWord {
    pub fn new(dictionary: Arc<ReadingDictionary>) -> Self {
        Self { dictionary }
    }
}

impl ReadingResolver for LatinWord {
    fn name(&self) -> &'static str {
        "latin-word"
    }

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana> {
        let s = token.surface.as_str();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let upper = s.to_ascii_uppercase();
        if let Some(reading) = self.dictionary.get(&upper) {
            if let Some(k) = side.pick(&naturalize_english_reading(reading)) {
                return Some(k);
            }
        }
        let letter = match side {
            Side::Head => upper.chars().next()?,
            Side::Last => upper.chars().next_back()?,
        };
        letter_name(letter).and_then(|name| side.pick(name))
    }
}

/// Any kana embedded in the surface.
#[derive(Debug, Default)]
pub struct SurfaceScan;

impl ReadingResolver for SurfaceScan {
    fn name(&self) -> &'static str {
        "surface-scan"
    }

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana> {
        side.pick(&token.surface)
    }
}

/// Spoken name of an uppercase Latin letter.
pub fn letter_name(c: char) -> Option<&'static str> {
    let name = match c {
        'A' => "エー",
        'B' => "ビー",
        'C' => "シー",
        'D' => "ディー",
        'E' => "イー",
        'F' => "エフ",
        'G' => "ジー",
        'H' => "エイチ",
        'I' => "アイ",
        'J' => "ジェー",
        'K' => "ケー",
        'L' => "エル",
        'M' => "エム",
        'N' => "エヌ",
        'O' => "オー",
        'P' => "ピー",
        'Q' => "キュー",
        'R' => "アール",
        'S' => "エス",
        'T' => "ティー",
        'U' => "ユー",
        'V' => "ブイ",
        'W' => "ダブリュー",
        'X' => "エックス",
        'Y' => "ワイ",
        'Z' => "ゼット",
        _ => return None,
    };
    Some(name)
}

/// E-row kana, the first half of the `エイ` glide.
const E_ROW: &[char] = &[
    'エ', 'ケ', 'ゲ', 'セ', 'ゼ', 'テ', 'デ', 'ネ', 'ヘ', 'ベ', 'ペ', 'メ', 'レ', 'ェ',
];
/// O-row kana, the first half of the `オウ` glide.
const O_ROW: &[char] = &[
    'オ', 'コ', 'ゴ', 'ソ', 'ゾ', 'ト', 'ド', 'ノ', 'ホ', 'ボ', 'ポ', 'モ', 'ヨ', 'ロ', 'ョ', 'ォ',
];
/// Kana whose trailing short "i" is pronounced long in loanwords.
const LONG_I_ENDINGS: &[&str] = &["ティ", "ディ", "フィ", "ピ", "ビ", "キ", "ギ", "ミ", "リ", "ニ"];

/// Rewrite a dictionary reading of an English word toward how it is
/// actually said in Japanese.
///
/// Rules, applied in order, each touching a different suffix:
/// - `トゥ`/`ドゥ` lose the trailing vowel glide (`ト`/`ド`)
/// - a trailing short "i" after the consonants in [`LONG_I_ENDINGS`] is lengthened
/// - e-row + `イ` and o-row + `ウ` become e-row/o-row + `ー`
pub fn naturalize_english_reading(reading: &str) -> String {
    let mut r = reading.to_string();

    for (glide, plain) in [("トゥ", "ト"), ("ドゥ", "ド")] {
        if r.ends_with(glide) {
            r.truncate(r.len() - glide.len());
            r.push_str(plain);
            break;
        }
    }

    if LONG_I_ENDINGS.iter().any(|e| r.ends_with(e)) {
        r.push('ー');
    }

    let chars: Vec<char> = r.chars().collect();
    if let [.., before, glide] = chars.as_slice() {
        let long = (*glide == 'イ' && E_ROW.contains(before))
            || (*glide == 'ウ' && O_ROW.contains(before));
        if long {
            r.pop();
            r.push('ー');
        }
    }
    r
}

/// Resolves the effective head and last kana of normalized text.
pub struct ReadingExtractor {
    tokenizer: Arc<dyn Tokenizer>,
    resolvers: Vec<Box<dyn ReadingResolver>>,
}

impl ReadingExtractor {
    /// Extractor with the standard resolver order.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, dictionary: Arc<ReadingDictionary>) -> Self {
        Self::with_resolvers(
            tokenizer,
            vec![
                Box::new(KanaSurface),
                Box::new(HalfwidthSurface),
                Box::new(TokenizerReading),
                Box::new(LatinWord::new(dictionary)),
                Box::new(SurfaceScan),
            ],
        )
    }

    /// Extractor with a custom resolver order.
    pub fn with_resolvers(
        tokenizer: Arc<dyn Tokenizer>,
        resolvers: Vec<Box<dyn ReadingResolver>>,
    ) -> Self {
        Self {
            tokenizer,
            resolvers,
        }
    }

    fn resolve(&self, token: &Token, side: Side) -> Option<Kana> {
        self.resolvers.iter().find_map(|r| r.resolve(token, side))
    }

    /// Head and last kana of `normalized`, or `None` if either cannot be
    /// resolved.
    pub fn effective_head_and_last(&self, normalized: &str) -> Option<EffectiveReading> {
        let tokens = self.tokenizer.tokenize(normalized);

        let (head_idx, head) = tokens
            .iter()
            .enumerate()
            .find_map(|(i, t)| self.resolve(t, Side::Head).map(|k| (i, k)))?;

        let last = tokens[head_idx..]
            .iter()
            .rev()
            .find_map(|t| self.resolve(t, Side::Last))?;

        Some(EffectiveReading { head, last })
    }
}

impl std::fmt::Debug for ReadingExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.resolvers.iter().map(|r| r.name()).collect();
        f.debug_struct("ReadingExtractor")
            .field("resolvers", &names)
            .finish()
    }
}
