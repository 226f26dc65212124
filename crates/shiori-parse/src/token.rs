use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::keyword::{KeywordCategory, KeywordKind};

/// Stable handle of a token inside one parse.
///
/// Handles survive splits and merges of neighbouring tokens, so passes can
/// hold on to them while the stream is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub(crate) u32);

/// Coarse class of a token, set by the tokenizer and promoted to `Known` by passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Unknown,
    Delimiter,
    Separator,
    Known,
    OpeningBracket,
    ClosingBracket,
}

/// Shape of the token's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Unknown,
    /// A single rune.
    Character,
    Word,
    /// All ASCII digits.
    Number,
    /// Digits with a version or marker suffix (`01v2`, `12'`, `7a`), or a merged decimal.
    NumberLike,
    /// `2nd`, `third`.
    Ordinal,
    Crc32,
    PossibleVideoResolution,
    /// A number between 1900 and 2050.
    Year,
}

/// Output field a pass has assigned to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataCategory {
    Title,
    EpisodeTitle,
    EpisodeNumber,
    EpisodeNumberAlt,
    OtherEpisodeNumber,
    Season,
    Part,
    VolumeNumber,
    ReleaseGroup,
    FileExtension,
}

/// Catalogue binding of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub category: KeywordCategory,
    pub kind: KeywordKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    /// Original text, never normalized.
    pub value: String,
    pub category: TokenCategory,
    pub kind: TokenKind,
    pub keyword: Option<KeywordMatch>,
    pub metadata: Option<MetadataCategory>,
    pub enclosed: bool,
}

impl Token {
    /// A new token; its id is assigned when it enters a stream.
    pub fn new(value: impl Into<String>, category: TokenCategory) -> Self {
        Self {
            id: TokenId(0),
            value: value.into(),
            category,
            kind: TokenKind::Unknown,
            keyword: None,
            metadata: None,
            enclosed: false,
        }
    }

    pub fn with_kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_keyword(mut self, category: KeywordCategory, kind: KeywordKind) -> Self {
        self.set_keyword(category, kind);
        self
    }

    pub fn with_metadata(mut self, category: MetadataCategory) -> Self {
        self.set_metadata(category);
        self
    }

    pub fn set_keyword(&mut self, category: KeywordCategory, kind: KeywordKind) {
        self.keyword = Some(KeywordMatch { category, kind });
    }

    /// Assigning an output field takes the token out of the unknown pool.
    pub fn set_metadata(&mut self, category: MetadataCategory) {
        self.metadata = Some(category);
        self.category = TokenCategory::Known;
    }

    /// NFC + uppercase form used for every catalogue comparison.
    pub fn normalized_value(&self) -> String {
        normalize(&self.value)
    }

    pub fn is_unknown(&self) -> bool {
        self.category == TokenCategory::Unknown
    }

    pub fn is_delimiter(&self) -> bool {
        self.category == TokenCategory::Delimiter
    }

    pub fn is_separator(&self) -> bool {
        self.category == TokenCategory::Separator
    }

    pub fn is_opening_bracket(&self) -> bool {
        self.category == TokenCategory::OpeningBracket
    }

    pub fn is_closing_bracket(&self) -> bool {
        self.category == TokenCategory::ClosingBracket
    }

    pub fn is_dot_delimiter(&self) -> bool {
        self.is_delimiter() && self.value == "."
    }

    /// `-` or one of the Unicode hyphens and dashes U+2010..U+2015.
    pub fn is_dash_separator(&self) -> bool {
        self.is_separator()
            && self
                .value
                .chars()
                .next()
                .is_some_and(|c| c == '-' || ('\u{2010}'..='\u{2015}').contains(&c))
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword.is_some()
    }

    pub fn has_keyword(&self, category: KeywordCategory) -> bool {
        self.keyword.is_some_and(|k| k.category == category)
    }

    pub fn is_standalone_keyword(&self) -> bool {
        self.keyword.is_some_and(|k| k.kind == KeywordKind::Standalone)
    }

    /// Keyword describing the file itself (codec, source, language, ...).
    pub fn is_file_info_keyword(&self) -> bool {
        self.keyword.is_some_and(|k| k.category.is_file_info())
    }

    pub fn has_metadata(&self, category: MetadataCategory) -> bool {
        self.metadata == Some(category)
    }

    pub fn is_number_kind(&self) -> bool {
        self.kind == TokenKind::Number
    }

    pub fn is_number_like_kind(&self) -> bool {
        self.kind == TokenKind::NumberLike
    }

    pub fn is_number_or_like_kind(&self) -> bool {
        matches!(self.kind, TokenKind::Number | TokenKind::NumberLike)
    }

    /// Unclaimed number a pass may still turn into metadata.
    pub fn is_free_number(&self) -> bool {
        self.is_unknown() && !self.is_keyword() && self.is_number_or_like_kind()
    }

    pub fn is_zero_padded(&self) -> bool {
        is_zero_padded(&self.value)
    }

    pub fn rune_count(&self) -> usize {
        self.value.chars().count()
    }
}

impl TokenKind {
    /// Kind of a raw value, first matching rule wins.
    pub fn classify(value: &str) -> Self {
        if is_crc32(value) {
            TokenKind::Crc32
        } else if RE_RESOLUTION.is_match(value) {
            TokenKind::PossibleVideoResolution
        } else if is_number(value) {
            if is_year(value) {
                TokenKind::Year
            } else {
                TokenKind::Number
            }
        } else if RE_NUMBER_LIKE.is_match(value) {
            TokenKind::NumberLike
        } else if ordinal_to_number(value).is_some() {
            TokenKind::Ordinal
        } else if value.chars().count() > 1 {
            TokenKind::Word
        } else {
            TokenKind::Character
        }
    }
}

// ── Regex patterns ──────────────────────────────────────────────

/// "480p", "1080P", "1920x1080", "1280×720".
static RE_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}(?:[pP]|[xX×]\d{3,4})$").unwrap());

/// "01v2", "1x02", "7a", "12'", "12.5".
static RE_NUMBER_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d+(?:v\d+|x\d{1,2}|[abc]|')|\d+\.\d+)$").unwrap()
});

/// "S01E02", "01x02", "S1EP03", "S01E02v2".
static RE_SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(S?)(\d+)(E|X|EP)(\d+(?:v\d{1,2}|')?)$").unwrap()
});

static RE_ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)(?:st|nd|rd|th)$").unwrap());

const ORDINAL_WORDS: &[(&str, u32)] = &[
    ("FIRST", 1),
    ("SECOND", 2),
    ("THIRD", 3),
    ("FOURTH", 4),
    ("FIFTH", 5),
    ("SIXTH", 6),
    ("SEVENTH", 7),
    ("EIGHTH", 8),
    ("NINTH", 9),
];

pub fn normalize(s: &str) -> String {
    s.nfc().collect::<String>().to_uppercase()
}

/// Non-empty and ASCII digits only.
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_number_or_like(s: &str) -> bool {
    is_number(s) || RE_NUMBER_LIKE.is_match(s)
}

/// "01", "007", "01v2". A lone "0" is not padded.
pub fn is_zero_padded(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0')
}

pub fn is_crc32(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_year(s: &str) -> bool {
    s.parse::<u32>().is_ok_and(|n| (1900..=2050).contains(&n))
}

/// "2nd" → 2, "third" → 3.
pub fn ordinal_to_number(s: &str) -> Option<u32> {
    if let Some(caps) = RE_ORDINAL_SUFFIX.captures(s) {
        return caps[1].parse().ok();
    }
    let upper = s.to_uppercase();
    ORDINAL_WORDS
        .iter()
        .find(|(word, _)| *word == upper)
        .map(|&(_, n)| n)
}

/// A combined season/episode value split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonEpisode<'a> {
    /// "S", "s" or empty for the `01x02` form.
    pub prefix: &'a str,
    pub season: &'a str,
    /// "E", "EP" or "x", as written.
    pub separator: &'a str,
    pub episode: &'a str,
}

impl SeasonEpisode<'_> {
    pub fn is_x_form(&self) -> bool {
        self.separator.eq_ignore_ascii_case("x")
    }
}

pub fn split_season_episode(value: &str) -> Option<SeasonEpisode<'_>> {
    let caps = RE_SEASON_EPISODE.captures(value)?;
    Some(SeasonEpisode {
        prefix: caps.get(1)?.as_str(),
        season: caps.get(2)?.as_str(),
        separator: caps.get(3)?.as_str(),
        episode: caps.get(4)?.as_str(),
    })
}

/// Strip a catalogue keyword from the start of `value`, comparing the way
/// the catalogue does. Returns the original-case remainder.
pub fn strip_keyword_prefix<'a>(value: &'a str, keyword: &str) -> Option<&'a str> {
    let prefix_len = keyword.chars().count();
    let split = value
        .char_indices()
        .nth(prefix_len)
        .map_or(value.len(), |(i, _)| i);
    let (head, tail) = value.split_at(split);
    (normalize(head) == keyword).then_some(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(TokenKind::classify("4863FBE8"), TokenKind::Crc32);
        assert_eq!(TokenKind::classify("1080p"), TokenKind::PossibleVideoResolution);
        assert_eq!(TokenKind::classify("1280x720"), TokenKind::PossibleVideoResolution);
        assert_eq!(TokenKind::classify("1920×1080"), TokenKind::PossibleVideoResolution);
        assert_eq!(TokenKind::classify("2014"), TokenKind::Year);
        assert_eq!(TokenKind::classify("1100"), TokenKind::Number);
        assert_eq!(TokenKind::classify("01v2"), TokenKind::NumberLike);
        assert_eq!(TokenKind::classify("12'"), TokenKind::NumberLike);
        assert_eq!(TokenKind::classify("7b"), TokenKind::NumberLike);
        assert_eq!(TokenKind::classify("2nd"), TokenKind::Ordinal);
        assert_eq!(TokenKind::classify("Third"), TokenKind::Ordinal);
        assert_eq!(TokenKind::classify("10bit"), TokenKind::Word);
        assert_eq!(TokenKind::classify("x"), TokenKind::Character);
    }

    #[test]
    fn test_zero_padding() {
        assert!(is_zero_padded("01"));
        assert!(is_zero_padded("007"));
        assert!(!is_zero_padded("0"));
        assert!(!is_zero_padded("10"));
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal_to_number("1st"), Some(1));
        assert_eq!(ordinal_to_number("22nd"), Some(22));
        assert_eq!(ordinal_to_number("FIFTH"), Some(5));
        assert_eq!(ordinal_to_number("tenth"), None);
        assert_eq!(ordinal_to_number("nd"), None);
    }

    #[test]
    fn test_split_season_episode() {
        let se = split_season_episode("S01E02v2").unwrap();
        assert_eq!(se.prefix, "S");
        assert_eq!(se.season, "01");
        assert_eq!(se.separator, "E");
        assert_eq!(se.episode, "02v2");

        let se = split_season_episode("s2ep13").unwrap();
        assert_eq!(se.separator, "ep");
        assert_eq!(se.episode, "13");

        let se = split_season_episode("01x05").unwrap();
        assert!(se.prefix.is_empty());
        assert!(se.is_x_form());

        assert!(split_season_episode("Sousou").is_none());
        assert!(split_season_episode("S01").is_none());
    }

    #[test]
    fn test_strip_keyword_prefix() {
        assert_eq!(strip_keyword_prefix("s01", "S"), Some("01"));
        assert_eq!(strip_keyword_prefix("Vol3", "VOL"), Some("3"));
        assert_eq!(strip_keyword_prefix("Ep", "EP"), Some(""));
        assert_eq!(strip_keyword_prefix("Part2", "VOL"), None);
        assert_eq!(strip_keyword_prefix("第3話", "第"), Some("3話"));
    }

    #[test]
    fn test_dash_separator() {
        let dash = Token::new("-", TokenCategory::Separator);
        let en_dash = Token::new("\u{2013}", TokenCategory::Separator);
        let tilde = Token::new("~", TokenCategory::Separator);
        assert!(dash.is_dash_separator());
        assert!(en_dash.is_dash_separator());
        assert!(!tilde.is_dash_separator());
    }

    #[test]
    fn test_metadata_marks_known() {
        let token = Token::new("01", TokenCategory::Unknown)
            .with_kind(TokenKind::Number)
            .with_metadata(MetadataCategory::EpisodeNumber);
        assert_eq!(token.category, TokenCategory::Known);
        assert!(!token.is_free_number());
    }
}
