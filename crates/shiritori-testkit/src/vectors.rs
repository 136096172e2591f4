//! Golden reading vectors.
//!
//! Known texts with their expected head and last kana. Any tokenizer that
//! segments kana runs the way [`ScriptTokenizer`](shiritori_core::ScriptTokenizer)
//! does must reproduce these with [`SAMPLE_READINGS`](crate::fixtures::SAMPLE_READINGS)
//! loaded.

use shiritori_core::{number_reading, ReadingPipeline};

/// A golden reading vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw post text.
    pub text: &'static str,
    /// Expected (head, last), or `None` for unreadable text.
    pub expected: Option<(char, char)>,
}

/// A golden numeral reading.
#[derive(Debug, Clone)]
pub struct NumeralVector {
    pub numeral: &'static str,
    pub reading: &'static str,
}

/// Get all golden reading vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "hiragana word",
            text: "あいうえお",
            expected: Some(('ア', 'オ')),
        },
        GoldenVector {
            name: "punctuation only",
            text: "！？",
            expected: None,
        },
        GoldenVector {
            name: "kanji without reading",
            text: "漢字",
            expected: None,
        },
        GoldenVector {
            name: "voiced last kana",
            text: "おんがく",
            expected: Some(('オ', 'ク')),
        },
        GoldenVector {
            name: "half-width with marks",
            text: "ｳﾞｧｯ",
            expected: Some(('ヴ', 'ッ')),
        },
        GoldenVector {
            name: "prolonged mark is skipped",
            text: "あーー",
            expected: Some(('ア', 'ア')),
        },
        GoldenVector {
            name: "emoji stripped",
            text: "りんご🍎",
            expected: Some(('リ', 'ゴ')),
        },
        GoldenVector {
            name: "url stripped",
            text: "https://example.com みかん",
            expected: Some(('ミ', 'ン')),
        },
        GoldenVector {
            name: "url with decoded path stripped",
            text: "りんご https://ja.wikipedia.org/wiki/ごりら",
            expected: Some(('リ', 'ゴ')),
        },
        GoldenVector {
            name: "numeral read as cardinal",
            text: "100えん",
            expected: Some(('ヒ', 'ン')),
        },
        GoldenVector {
            name: "decimal numeral",
            text: "3.14",
            expected: Some(('サ', 'ン')),
        },
        GoldenVector {
            name: "negative numeral before kanji",
            text: "-5度",
            expected: Some(('マ', 'ゴ')),
        },
        GoldenVector {
            name: "dictionary words",
            text: "Japan confirmed punk",
            expected: Some(('ジ', 'ク')),
        },
        GoldenVector {
            name: "naturalized reading",
            text: "okay",
            expected: Some(('オ', 'ケ')),
        },
        GoldenVector {
            name: "letter names for unknown words",
            text: "xq",
            expected: Some(('エ', 'ュ')),
        },
        GoldenVector {
            name: "trailing period",
            text: "rust.",
            expected: Some(('ラ', 'ト')),
        },
    ]
}

/// Get all golden numeral readings.
pub fn numeral_vectors() -> Vec<NumeralVector> {
    [
        ("0", "ゼロ"),
        ("600", "ロッピャク"),
        ("3000", "サンゼン"),
        ("8000", "ハッセン"),
        ("10000", "イチマン"),
        ("1000000000000", "イッチョウ"),
        ("0.5", "レイテンゴ"),
        ("-1234.56", "マイナスセンニヒャクサンジュウヨンテンゴロク"),
        ("0123", "ゼロイチニサン"),
    ]
    .into_iter()
    .map(|(numeral, reading)| NumeralVector { numeral, reading })
    .collect()
}

/// Check one vector, describing the mismatch on failure.
pub fn check_vector(pipeline: &ReadingPipeline, vector: &GoldenVector) -> Result<(), String> {
    let got = pipeline
        .effective_reading(vector.text)
        .map(|r| (r.head.as_char(), r.last.as_char()));
    if got == vector.expected {
        Ok(())
    } else {
        Err(format!(
            "{}: {:?} read as {:?}, expected {:?}",
            vector.name, vector.text, got, vector.expected
        ))
    }
}

/// Verify all vectors against `pipeline`, returning every mismatch.
pub fn verify_all_vectors(pipeline: &ReadingPipeline) -> Vec<String> {
    let readings = all_vectors()
        .into_iter()
        .filter_map(|v| check_vector(pipeline, &v).err());
    let numerals = numeral_vectors().into_iter().filter_map(|v| {
        let got = number_reading(v.numeral);
        (got != v.reading)
            .then(|| format!("{}: read as {}, expected {}", v.numeral, got, v.reading))
    });
    readings.chain(numerals).collect()
}
