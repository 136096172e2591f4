//! Text normalization ahead of tokenization.
//!
//! Steps run in a fixed order:
//! 1. collapse whitespace and separators to one ASCII space
//! 2. remove pictographic emoji
//! 3. remove http/https/ws/wss URIs
//! 4. remove Nostr identifiers (`npub1...`, `nostr:nevent1...`, ...)
//! 5. remove `:shortcode:` custom emoji
//! 6. replace numerals with their Japanese reading
//! 7. trim one trailing period
//! 8. apply the replace dictionary
//!
//! Numerals are read after URLs and identifiers are gone so their digits are
//! not read aloud, and before the replace dictionary so its keys match the
//! readings.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::dictionary::ReplaceDictionary;
use crate::numeral::{literal_reading, number_reading};

struct NoisePatterns {
    spaces: Regex,
    emoji: Regex,
    uri: Regex,
    nostr_id: Regex,
    shortcode: Regex,
    numeral: Regex,
}

impl NoisePatterns {
    fn new() -> Self {
        Self {
            spaces: Regex::new(r"[\f\t\v\r\n\p{Zs}\x{85}\x{feff}\x{2028}\x{2029}]+")
                .expect("valid space regex"),
            emoji: Regex::new(
                r"[\p{Extended_Pictographic}\x{1F3FB}-\x{1F3FF}\x{1F1E6}-\x{1F1FF}\x{200D}\x{FE0F}\x{20E3}\x{E0020}-\x{E007F}]",
            )
            .expect("valid emoji regex"),
            uri: Regex::new(r"(?i)\b(?:https?|wss?)://\S+").expect("valid URI regex"),
            nostr_id: Regex::new(
                r"(?i)\b(?:nostr:)?(?:npub|nsec|note|nevent|nprofile|naddr|nrelay)1[02-9ac-hj-np-z]+",
            )
            .expect("valid Nostr identifier regex"),
            shortcode: Regex::new(r":[A-Za-z0-9_]*[A-Za-z_][A-Za-z0-9_]*:")
                .expect("valid shortcode regex"),
            numeral: Regex::new(
                r"(?P<sign>[-−])?(?P<digits>[0-9０-９]+(?:,[0-9０-９]+)*(?:\.[0-9０-９]+)*)",
            )
            .expect("valid numeral regex"),
        }
    }

    fn shared() -> &'static Self {
        static PATTERNS: OnceLock<NoisePatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::new)
    }
}

/// Rewrites raw post text into the form the tokenizer should see.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    replacements: ReplaceDictionary,
}

impl TextNormalizer {
    pub fn new(replacements: ReplaceDictionary) -> Self {
        Self { replacements }
    }

    /// Normalize `raw`. Never fails; unreadable input simply normalizes to
    /// text without kana.
    pub fn normalize(&self, raw: &str) -> String {
        let p = NoisePatterns::shared();

        let text = p.spaces.replace_all(raw, " ");
        let text = p.emoji.replace_all(&text, "");
        let text = p.uri.replace_all(&text, "");
        let text = p.nostr_id.replace_all(&text, "");
        let text = p.shortcode.replace_all(&text, "");
        let text = read_numerals(&p.numeral, &text);
        let text = trim_trailing_period(&text);
        self.replacements.apply(text)
    }
}

fn read_numerals(pattern: &Regex, text: &str) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let digits: String = caps["digits"].chars().map(to_ascii_digit).collect();
            let reading = if has_thousands_grouping(&digits) {
                number_reading(&digits.replace(',', ""))
            } else {
                literal_reading(&digits)
            };

            let Some(sign) = caps.name("sign") else {
                return reading;
            };
            // "COVID-19": a sign glued to a word is a hyphen.
            let glued = text[..sign.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || ('０'..='９').contains(&c));
            if glued {
                format!("{}{}", sign.as_str(), reading)
            } else {
                format!("マイナス{reading}")
            }
        })
        .into_owned()
}

/// True unless the integer part has commas that are not thousands
/// separators (`1,2345`, `12,34`).
fn has_thousands_grouping(digits: &str) -> bool {
    let int_part = digits.split('.').next().unwrap_or_default();
    let mut groups = int_part.split(',');
    let lead_ok = groups.next().is_some_and(|g| (1..=3).contains(&g.len()));
    let mut rest = groups.peekable();
    if rest.peek().is_none() {
        return true;
    }
    lead_ok && rest.all(|g| g.len() == 3)
}

fn to_ascii_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        _ => c,
    }
}

/// Drop one sentence-final period; otherwise it may fuse with the last word.
fn trim_trailing_period(text: &str) -> &str {
    let trimmed = text.trim_end();
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::ReplaceDictionary;

    fn normalize(s: &str) -> String {
        TextNormalizer::default().normalize(s)
    }

    #[test]
    fn test_spaces_collapse() {
        assert_eq!(normalize("あ\t\n　い"), "あ い");
    }

    #[test]
    fn test_emoji_removed() {
        assert_eq!(normalize("りんご🍎"), "りんご");
        assert_eq!(normalize("👍🏽いいね❤️"), "いいね");
        assert_eq!(normalize("🇯🇵にっぽん"), "にっぽん");
    }

    #[test]
    fn test_uri_removed() {
        assert_eq!(normalize("みて https://example.com/a?b=1 すごい"), "みて  すごい");
        assert_eq!(normalize("wss://relay.example.com つなぐ"), " つなぐ");
    }

    #[test]
    fn test_uri_with_decoded_path_removed() {
        assert_eq!(normalize("りんご https://ja.wikipedia.org/wiki/ごりら"), "りんご");
        assert_eq!(normalize("https://例え.jp/パス みかん"), " みかん");
    }

    #[test]
    fn test_nostr_identifiers_removed() {
        let npub = "npub1sg6plzptd64u62a878hep2kev88swjh3tw00gjsfl8f237lmu63q0uf63m";
        assert_eq!(normalize(&format!("nostr:{npub} さん")), " さん");
        assert_eq!(normalize(&format!("{npub}さん")), "さん");
    }

    #[test]
    fn test_shortcode_removed_but_clock_kept() {
        assert_eq!(normalize("やった:party_parrot:"), "やった");
        assert_eq!(normalize("12:30"), "ジュウニ:サンジュウ");
    }

    #[test]
    fn test_numerals_read() {
        assert_eq!(normalize("3こ"), "サンこ");
        assert_eq!(normalize("1,234円"), "センニヒャクサンジュウヨン円");
        assert_eq!(normalize("-5度"), "マイナスゴ度");
        assert_eq!(normalize("０.５"), "レイテンゴ");
        assert_eq!(normalize("COVID-19"), "COVID-ジュウキュウ");
    }

    #[test]
    fn test_minus_after_kana_is_read() {
        assert_eq!(normalize("きおんは-5ど"), "きおんはマイナスゴど");
        assert_eq!(normalize("きおん−3度"), "きおんマイナスサン度");
    }

    #[test]
    fn test_bad_grouping_read_digit_by_digit() {
        assert_eq!(normalize("1,2345"), "イチニサンヨンゴ");
        assert_eq!(normalize("12,34えん"), "イチニサンヨンえん");
        assert_eq!(normalize("1234,567"), "イチニサンヨンゴロクナナ");
        assert_eq!(normalize("12,345,678"), "センニヒャクサンジュウヨンマンゴセンロッピャクナナジュウハチ");
    }

    #[test]
    fn test_trailing_period_trimmed_once() {
        assert_eq!(normalize("punk."), "punk");
        assert_eq!(normalize("wait.."), "wait.");
        assert_eq!(normalize("I have 3."), "I have サン");
    }

    #[test]
    fn test_replace_dictionary_runs_last() {
        let dict = ReplaceDictionary::parse("let's lets\nジュウゴ じゅうご\n").unwrap();
        let n = TextNormalizer::new(dict);
        assert_eq!(n.normalize("Let's go"), "lets go");
        // keys can match numeral readings
        assert_eq!(n.normalize("15"), "じゅうご");
    }

    #[test]
    fn test_no_kana_input_survives() {
        assert_eq!(normalize("！？"), "！？");
        assert_eq!(normalize(""), "");
    }
}
