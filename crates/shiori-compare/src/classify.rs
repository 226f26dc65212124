use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

// ── Regex patterns ──────────────────────────────────────────────
//
// All patterns run against `prepare`d text: lowercase, underscores as spaces.

/// "season", "seasons".
static RE_SEASON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bseasons?\b").unwrap());

/// "2nd season", "3rd s".
static RE_ORDINAL_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}(?:st|nd|rd|th)\s+s").unwrap());

/// "第2期".
static RE_JAPANESE_SEASON_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第\s*\d+\s*期").unwrap());

static RE_SEASON_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bseason\s*(\d{1,2})\b").unwrap());

/// "s2", "s02" but not "s02e05".
static RE_SEASON_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bs0?(\d{1,2})\b").unwrap());

static RE_NTH_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\s+season\b").unwrap());

/// II..X at the end, or before an S/E tag or "part".
static RE_ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(viii|vii|vi|iv|ix|iii|ii|v|x)(?:\s*$|\s+(?:s\d|e\d|part\b))").unwrap()
});

static RE_TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(\d{1,2})$").unwrap());

/// "第2期", "2期".
static RE_JAPANESE_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第?\s*(\d{1,2})\s*期").unwrap());

static RE_WRITTEN_SEASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\s+season\b")
        .unwrap()
});

static RE_SPECIAL: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // "OVA 2", "SP01", "ONA 1-3"
        Regex::new(r"(?:^|[\s.\-(\[])(?:sp|oav|ova|oad|ona)\s?\d{1,2}(?:-\d{1,3})?(?:$|[\s.\-)\]])")
            .unwrap(),
        Regex::new(r"(?:^|[\s.\-(\[])(?:ova|ona|oad|oav|specials?)(?:$|[\s.\-)\]])").unwrap(),
        // season zero
        Regex::new(r"(?:^|[\s.\-])s0{1,2}e\d").unwrap(),
    ]
});

static RE_BATCH: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"\b(?:batch|complete|completed)\b").unwrap(),
        Regex::new(r"\bseasons\b").unwrap(),
        Regex::new(r"\bparts\b").unwrap(),
        // "s1-s3", "s01 ~ s02"
        Regex::new(r"\bs\d{1,2}\s?[-~]\s?s\d{1,2}\b").unwrap(),
    ]
});

static RE_IGNORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:extras?|end\s?cards?|previews?|trailers?|promos?|teasers?|interviews?|commentary|bonus|making of|menus?|samples?)\b",
    )
    .unwrap()
});

static RE_NC: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // "op", "ED2", "NCOP1v2"
        Regex::new(r"\b(?:nc)?(?:op|ed)\s?\d{0,2}(?:v\d)?\b").unwrap(),
        Regex::new(r"\bcreditless\b").unwrap(),
        // "Title - Opening"
        Regex::new(r"-\s*(?:opening|ending)\b").unwrap(),
        Regex::new(r"\b(?:pv|cm|preview|trailer)\s?\d{0,2}\b").unwrap(),
    ]
});

static RE_NC_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:nc)?(op|ed|opening|ending|creditless)(?:\s?\d{1,2})?(?:v\d)?\b").unwrap()
});

static RE_RESOLUTION_HEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3,4})[pi]?$").unwrap());

static RE_RESOLUTION_DIMENSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}x(\d{3,4})$").unwrap());

static RE_RESOLUTION_K: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([248])k$").unwrap());

/// Lowercase parsed titles that name extras rather than episodes.
pub static IGNORED_FILENAMES: phf::Set<&'static str> = phf::phf_set! {
    "extras",
    "extra",
    "ova",
    "specials",
    "menu",
    "menus",
    "endcard",
    "end card",
    "end cards",
    "ncop",
    "nced",
    "op",
    "ed",
    "opening",
    "ending",
    "creditless",
    "preview",
    "previews",
    "trailer",
    "trailers",
    "pv",
    "cm",
    "sample",
    "samples",
    "bonus",
    "interview",
    "interviews",
    "commentary",
    "scans",
    "featurette",
    "featurettes",
    "others",
};

/// Opening or ending clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NcType {
    #[serde(rename = "OP")]
    Opening,
    #[serde(rename = "ED")]
    Ending,
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NcType::Opening => f.write_str("OP"),
            NcType::Ending => f.write_str("ED"),
        }
    }
}

fn prepare(value: &str) -> String {
    value.trim().to_lowercase().replace('_', " ")
}

/// Whether a title names a season of a series.
///
/// Japanese `第N期` titles and specials are excluded.
pub fn value_contains_season(value: &str) -> bool {
    let text = prepare(value);
    if RE_JAPANESE_SEASON_MARK.is_match(&text) || value_contains_special(&text) {
        return false;
    }
    RE_SEASON_WORD.is_match(&text) || RE_ORDINAL_SEASON.is_match(&text)
}

/// Season number named by a title, trying each convention in turn.
pub fn extract_season_number(value: &str) -> Option<u32> {
    let text = prepare(value);

    capture_number(&RE_SEASON_N, &text)
        .or_else(|| capture_number(&RE_SEASON_TAG, &text))
        .or_else(|| capture_number(&RE_NTH_SEASON, &text))
        .or_else(|| roman_season(&text))
        .or_else(|| trailing_season(&text))
        .or_else(|| capture_number(&RE_JAPANESE_SEASON, &text))
        .or_else(|| written_season(&text))
}

fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn follows_part_or_cour(text: &str, start: usize) -> bool {
    let before = text[..start].trim_end();
    before.ends_with("part") || before.ends_with("cour")
}

fn roman_season(text: &str) -> Option<u32> {
    RE_ROMAN.captures_iter(text).find_map(|caps| {
        let numeral = caps.get(1)?;
        if follows_part_or_cour(text, numeral.start()) {
            return None;
        }
        roman_to_u32(numeral.as_str())
    })
}

fn roman_to_u32(numeral: &str) -> Option<u32> {
    let value = match numeral {
        "ii" => 2,
        "iii" => 3,
        "iv" => 4,
        "v" => 5,
        "vi" => 6,
        "vii" => 7,
        "viii" => 8,
        "ix" => 9,
        "x" => 10,
        _ => return None,
    };
    Some(value)
}

/// "Title 2", but not "Title Part 2".
fn trailing_season(text: &str) -> Option<u32> {
    let number = RE_TRAILING_NUMBER.captures(text)?.get(1)?;
    if follows_part_or_cour(text, number.start()) {
        return None;
    }
    let value: u32 = number.as_str().parse().ok()?;
    (2..=10).contains(&value).then_some(value)
}

fn written_season(text: &str) -> Option<u32> {
    let caps = RE_WRITTEN_SEASON.captures(text)?;
    let value = match &caps[1] {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        _ => return None,
    };
    Some(value)
}

/// OVA, ONA, OAD, specials and season-zero episodes.
pub fn value_contains_special(value: &str) -> bool {
    let text = prepare(value);
    RE_SPECIAL.iter().any(|re| re.is_match(&text))
}

/// Batch releases: complete series, season or part spans.
pub fn value_contains_batch_keywords(value: &str) -> bool {
    let text = prepare(value);
    RE_BATCH.iter().any(|re| re.is_match(&text))
}

/// Extras, previews, menus and similar non-episode files.
pub fn value_contains_ignored_keywords(value: &str) -> bool {
    RE_IGNORED.is_match(&prepare(value))
}

/// Non-content clips: openings, endings, creditless videos, promos.
pub fn value_contains_nc(value: &str) -> bool {
    let text = prepare(value);
    RE_NC.iter().any(|re| re.is_match(&text))
}

/// Which clip an NC filename holds. A bare "creditless" says nothing, so
/// matching continues past it.
pub fn extract_nc_type(value: &str) -> Option<NcType> {
    let text = prepare(value);
    RE_NC_TYPE
        .captures_iter(&text)
        .find_map(|caps| match caps.get(1)?.as_str() {
            "op" | "opening" => Some(NcType::Opening),
            "ed" | "ending" => Some(NcType::Ending),
            _ => None,
        })
}

/// Vertical resolution in pixels: `1080p`, `1920x1080` and `4K` all work.
pub fn extract_resolution_int(value: &str) -> Option<u32> {
    let text = value.trim().to_lowercase();
    if let Some(height) = capture_number(&RE_RESOLUTION_HEIGHT, &text) {
        return Some(height);
    }
    if let Some(height) = capture_number(&RE_RESOLUTION_DIMENSIONS, &text) {
        return Some(height);
    }
    match capture_number(&RE_RESOLUTION_K, &text)? {
        2 => Some(1440),
        4 => Some(2160),
        8 => Some(4320),
        _ => None,
    }
}

/// Whether a parsed title is one of [`IGNORED_FILENAMES`].
pub fn is_ignored_filename(title: &str) -> bool {
    IGNORED_FILENAMES.contains(title.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_season() {
        assert!(value_contains_season("Attack on Titan Season 3"));
        assert!(value_contains_season("Mushoku Tensei 2nd Season"));
        assert!(value_contains_season("Kimetsu_no_Yaiba_Season_2"));
        assert!(!value_contains_season("Sousou no Frieren"));
    }

    #[test]
    fn test_contains_season_exclusions() {
        assert!(!value_contains_season("Shingeki no Kyojin Season 3 第3期"));
        assert!(!value_contains_season("Title Season 2 OVA"));
    }

    #[test]
    fn test_extract_season_explicit() {
        assert_eq!(extract_season_number("Attack on Titan Season 3"), Some(3));
        assert_eq!(extract_season_number("Jujutsu Kaisen S2"), Some(2));
        assert_eq!(extract_season_number("Title S02"), Some(2));
        assert_eq!(extract_season_number("Mushoku Tensei 2nd Season"), Some(2));
    }

    #[test]
    fn test_extract_season_tag_with_episode() {
        assert_eq!(extract_season_number("Title S01E05"), None);
    }

    #[test]
    fn test_extract_season_roman() {
        assert_eq!(extract_season_number("Overlord III"), Some(3));
        assert_eq!(extract_season_number("Overlord IV Part 2"), Some(4));
        assert_eq!(extract_season_number("Title X"), Some(10));
        assert_eq!(extract_season_number("Title Part II"), None);
        assert_eq!(extract_season_number("Hawaii"), None);
        assert_eq!(extract_season_number("Spy x Family"), None);
    }

    #[test]
    fn test_extract_season_trailing_number() {
        assert_eq!(extract_season_number("Kaguya-sama wa Kokurasetai 3"), Some(3));
        assert_eq!(extract_season_number("Title Part 2"), None);
        assert_eq!(extract_season_number("Title Cour 2"), None);
        assert_eq!(extract_season_number("Title 11"), None);
        assert_eq!(extract_season_number("Title 1"), None);
    }

    #[test]
    fn test_extract_season_japanese_and_written() {
        assert_eq!(extract_season_number("進撃の巨人 第3期"), Some(3));
        assert_eq!(extract_season_number("進撃の巨人 2期"), Some(2));
        assert_eq!(extract_season_number("Re:Zero Second Season"), Some(2));
        assert_eq!(extract_season_number("Frieren"), None);
    }

    #[test]
    fn test_extract_season_every_explicit_number() {
        for n in 1..=10 {
            assert_eq!(extract_season_number(&format!("Title Season {n}")), Some(n));
        }
    }

    #[test]
    fn test_contains_special() {
        assert!(value_contains_special("Title OVA"));
        assert!(value_contains_special("Title - Specials"));
        assert!(value_contains_special("Title SP2"));
        assert!(value_contains_special("Title S00E01"));
        assert!(!value_contains_special("Supernova"));
        assert!(!value_contains_special("Title Season 2"));
    }

    #[test]
    fn test_contains_batch() {
        assert!(value_contains_batch_keywords(
            "[Judas] Spy x Family (Season 1 Part 2) [1080p] (Batch)"
        ));
        assert!(value_contains_batch_keywords("Title Complete Series"));
        assert!(value_contains_batch_keywords("Title S1-S3"));
        assert!(!value_contains_batch_keywords("Title - 01"));
        assert!(!value_contains_batch_keywords("Jujutsu Kaisen S1 - 02"));
    }

    #[test]
    fn test_contains_ignored() {
        assert!(value_contains_ignored_keywords("[Group] Title Extras"));
        assert!(value_contains_ignored_keywords("Title - End Card 03"));
        assert!(!value_contains_ignored_keywords("Title - 03"));
    }

    #[test]
    fn test_contains_nc() {
        assert!(value_contains_nc("Title NCOP1"));
        assert!(value_contains_nc("Title - ED2"));
        assert!(value_contains_nc("Title - Opening"));
        assert!(value_contains_nc("Title Creditless Ending"));
        assert!(!value_contains_nc("Title - 01"));
        assert!(!value_contains_nc("[SubsPlease] Title - 01 [ED5F1234]"));
        assert!(!value_contains_nc("Stop Gun"));
    }

    #[test]
    fn test_extract_nc_type() {
        assert_eq!(extract_nc_type("Title NCOP1"), Some(NcType::Opening));
        assert_eq!(extract_nc_type("Title_NCED2v2"), Some(NcType::Ending));
        assert_eq!(extract_nc_type("Title Creditless Opening"), Some(NcType::Opening));
        assert_eq!(extract_nc_type("Title Creditless"), None);
        assert_eq!(extract_nc_type("Title - 01"), None);
        assert_eq!(NcType::Ending.to_string(), "ED");
    }

    #[test]
    fn test_resolution_int() {
        assert_eq!(extract_resolution_int("1080p"), Some(1080));
        assert_eq!(extract_resolution_int("720"), Some(720));
        assert_eq!(extract_resolution_int("1920x1080"), Some(1080));
        assert_eq!(extract_resolution_int("4K"), Some(2160));
        assert_eq!(extract_resolution_int(""), None);
        assert_eq!(extract_resolution_int("HD"), None);
    }

    #[test]
    fn test_ignored_filenames() {
        assert!(is_ignored_filename("Extras"));
        assert!(is_ignored_filename(" NCOP "));
        assert!(!is_ignored_filename("Sousou no Frieren"));
    }
}
