//! Japanese readings of decimal numerals.
//!
//! Readings are produced in full-width katakana so they feed straight into
//! the tokenizer as an ordinary kana run.

/// Integer parts longer than this are read digit by digit.
const MAX_INTEGER_DIGITS: usize = 16;

const ZERO: &str = "ゼロ";
/// Zero in front of a decimal point ("0.5" is レイテンゴ, not ゼロテンゴ).
const ZERO_BEFORE_POINT: &str = "レイ";
const POINT: &str = "テン";
const MINUS: &str = "マイナス";

/// Place within a four-digit chunk, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Place {
    Thousands,
    Hundreds,
    Tens,
    Ones,
}

impl Place {
    fn from_index(i: usize) -> Self {
        match i {
            0 => Place::Thousands,
            1 => Place::Hundreds,
            2 => Place::Tens,
            _ => Place::Ones,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Place::Thousands => "セン",
            Place::Hundreds => "ヒャク",
            Place::Tens => "ジュウ",
            Place::Ones => "",
        }
    }
}

fn digit_reading(c: char) -> &'static str {
    match c {
        '0' => ZERO,
        '1' => "イチ",
        '2' => "ニ",
        '3' => "サン",
        '4' => "ヨン",
        '5' => "ゴ",
        '6' => "ロク",
        '7' => "ナナ",
        '8' => "ハチ",
        '9' => "キュウ",
        '.' => POINT,
        _ => "",
    }
}

/// Lexicalized digit+place forms that do not follow the regular pattern.
fn irregular_reading(digit: char, place: Place) -> Option<&'static str> {
    let r = match (digit, place) {
        ('1', Place::Thousands) => "セン",
        ('1', Place::Hundreds) => "ヒャク",
        ('1', Place::Tens) => "ジュウ",
        ('3', Place::Thousands) => "サンゼン",
        ('3', Place::Hundreds) => "サンビャク",
        ('6', Place::Hundreds) => "ロッピャク",
        ('8', Place::Thousands) => "ハッセン",
        ('8', Place::Hundreds) => "ハッピャク",
        _ => return None,
    };
    Some(r)
}

/// Read every character on its own: "0123" is ゼロイチニサン.
pub fn literal_reading(s: &str) -> String {
    s.chars().map(digit_reading).collect()
}

/// Read one chunk of at most four digits, skipping zeros.
fn chunk_reading(digits: &[char]) -> String {
    let bias = 4 - digits.len();
    let mut out = String::new();
    for (i, &d) in digits.iter().enumerate() {
        if d == '0' {
            continue;
        }
        let place = Place::from_index(i + bias);
        match irregular_reading(d, place) {
            Some(r) => out.push_str(r),
            None => {
                out.push_str(digit_reading(d));
                out.push_str(place.suffix());
            }
        }
    }
    out
}

/// Nasal sound change at a junction: a trailing イチ, ハチ or ジュウ
/// contracts to イッ, ハッ or ジッ.
fn contract_trailing(reading: &mut String) {
    for (full, short) in [("イチ", "イッ"), ("ハチ", "ハッ"), ("ジュウ", "ジッ")] {
        if reading.ends_with(full) {
            reading.truncate(reading.len() - full.len());
            reading.push_str(short);
            return;
        }
    }
}

fn integer_reading(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    if s == "0" {
        return ZERO.to_string();
    }

    let digits: Vec<char> = s.chars().collect();
    let mut out = String::new();
    // Chunk 4 holds the trillions, chunk 1 the lowest four digits.
    for chunk in (1..=4usize).rev() {
        let lower = 4 * (chunk - 1);
        if digits.len() <= lower {
            continue;
        }
        let start = digits.len().saturating_sub(4 * chunk);
        let end = digits.len() - lower;
        let reading = chunk_reading(&digits[start..end]);
        if reading.is_empty() {
            continue;
        }
        out.push_str(&reading);
        match chunk {
            4 => {
                contract_trailing(&mut out);
                out.push_str("チョウ");
            }
            3 => out.push_str("オク"),
            2 => out.push_str("マン"),
            _ => {}
        }
    }
    out
}

/// Japanese reading of a decimal numeral string.
///
/// The input may carry a leading `-` (read as マイナス) and at most one
/// decimal point; grouping separators must already be stripped. Malformed
/// numerals (several points, a leading zero in a multi-digit integer part,
/// more than sixteen integer digits) are read digit by digit.
pub fn number_reading(s: &str) -> String {
    if let Some(unsigned) = s.strip_prefix('-') {
        let mut out = String::from(MINUS);
        out.push_str(&unsigned_reading(unsigned));
        return out;
    }
    unsigned_reading(s)
}

fn unsigned_reading(s: &str) -> String {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() >= 3 {
        return literal_reading(s);
    }

    let int_part = parts[0];
    if (int_part.len() >= 2 && int_part.starts_with('0')) || int_part.len() > MAX_INTEGER_DIGITS {
        return literal_reading(s);
    }

    let mut out = integer_reading(int_part);
    // "1." has an empty fractional part: the point is not read.
    if let Some(frac) = parts.get(1).filter(|f| !f.is_empty()) {
        if out == ZERO {
            out = ZERO_BEFORE_POINT.to_string();
        }
        contract_trailing(&mut out);
        out.push_str(POINT);
        out.push_str(&literal_reading(frac));
    }
    out
}
