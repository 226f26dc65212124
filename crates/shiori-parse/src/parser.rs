mod episode;
mod season;
mod title;

use tracing::{debug, trace};

use crate::keyword::{self, KeywordCategory, KeywordKind};
use crate::metadata::Metadata;
use crate::token::{self, MetadataCategory, Token, TokenId, TokenKind};
use crate::tokenizer;
use crate::tokens::{TokenDump, Tokens};

/// Parse an anime release filename into its metadata.
///
/// Never fails: anything that is not recognized simply stays out of the
/// returned record.
///
/// # Example
/// ```
/// let m = shiori_parse::parse("[SubsPlease] Sousou no Frieren - 14 (480p) [6EB72DA5].mkv");
/// assert_eq!(m.title, "Sousou no Frieren");
/// assert_eq!(m.episode_number, vec!["14"]);
/// assert_eq!(m.release_group, "SubsPlease");
/// assert_eq!(m.video_resolution, "480p");
/// assert_eq!(m.file_checksum, "6EB72DA5");
/// assert_eq!(m.file_extension, "mkv");
/// ```
#[tracing::instrument(name = "parse", skip_all, fields(filename = %filename))]
pub fn parse(filename: &str) -> Metadata {
    Parser::new(filename).run().metadata
}

/// Same as [`parse`], plus a snapshot of the final token stream.
pub fn parse_debug(filename: &str) -> (Metadata, TokenDump) {
    let parser = Parser::new(filename).run();
    let dump = parser.tokens.dump();
    (parser.metadata, dump)
}

/// Which keywords a sweep may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    /// First sweep: anime types and ambiguous words are left for later,
    /// since they often belong to the title.
    Normal,
    /// Second sweep over whatever the title passes did not claim.
    All,
}

/// State of a single parse: the token stream and the record being filled.
struct Parser {
    filename: String,
    tokens: Tokens,
    metadata: Metadata,
}

impl Parser {
    fn new(filename: &str) -> Self {
        let mut tokens = Tokens::new(tokenizer::tokenize(filename.trim()));
        tokens.merge_decimals();
        Self {
            filename: filename.to_string(),
            tokens,
            metadata: Metadata::default(),
        }
    }

    fn run(mut self) -> Self {
        trace!(tokens = self.tokens.len(), "tokenized");

        self.parse_file_extension();
        self.parse_keywords(Sweep::Normal);
        self.parse_season();
        self.parse_episode();
        self.parse_episode_title();
        self.parse_title();
        self.parse_release_group();
        self.parse_keywords(Sweep::All);
        self.write_formatted_title();
        self.collect_metadata();
        self.clean_up();

        debug!(
            title = %self.metadata.title,
            episode = ?self.metadata.episode_number,
            season = ?self.metadata.season_number,
            group = %self.metadata.release_group,
            "parsed filename"
        );
        self
    }

    /// Replace `id` with `parts`, which inherit its enclosed flag.
    fn split_token(&mut self, id: TokenId, parts: Vec<Token>) -> Vec<TokenId> {
        let enclosed = self.tokens.get(id).enclosed;
        let parts = parts
            .into_iter()
            .map(|mut token| {
                token.enclosed = enclosed;
                token
            })
            .collect();
        self.tokens.replace(id, parts)
    }

    /// Pass 1: `.mkv` at the very end is the file extension.
    fn parse_file_extension(&mut self) {
        let len = self.tokens.len();
        if len < 2 {
            return;
        }
        let (Some(dot), Some(last)) = (self.tokens.id_at(len - 2), self.tokens.id_at(len - 1)) else {
            return;
        };
        if self.tokens.get(dot).value != "." {
            return;
        }
        let is_extension = keyword::find_standalone(&self.tokens.get(last).normalized_value())
            .is_some_and(|entry| {
                matches!(
                    entry.category,
                    KeywordCategory::FileExtension | KeywordCategory::VideoTerm
                )
            });
        if is_extension {
            self.tokens.get_mut(last).set_metadata(MetadataCategory::FileExtension);
        }
    }

    /// Pass 2 and 8: bind standalone and multi-token keywords.
    fn parse_keywords(&mut self, sweep: Sweep) {
        for id in self.tokens.ids() {
            if self.tokens.index_of(id).is_none() {
                continue; // consumed by a multi-token keyword
            }
            let token = self.tokens.get(id);
            if token.is_keyword() || !token.is_unknown() {
                continue;
            }
            self.identify_keyword(id, sweep);
        }
    }

    fn identify_keyword(&mut self, id: TokenId, sweep: Sweep) -> bool {
        let token = self.tokens.get(id);
        let standalone = match token.kind {
            TokenKind::Crc32 => Some(KeywordCategory::FileChecksum),
            TokenKind::PossibleVideoResolution => Some(KeywordCategory::VideoResolution),
            TokenKind::Year if token.enclosed => Some(KeywordCategory::Year),
            _ => None,
        };
        if let Some(category) = standalone {
            self.tokens.get_mut(id).set_keyword(category, KeywordKind::Standalone);
            return true;
        }

        let normalized = token.normalized_value();
        let long_enough = token.rune_count() > 1;

        // "Blu" "-" "ray" → "Blu-ray"
        for template in keyword::find_parts(&normalized) {
            let Some(parts) = self.tokens.peek_values_after(id, template.sequence) else {
                continue;
            };
            let mut value = self.tokens.get(id).value.clone();
            for &part in &parts {
                value.push_str(&self.tokens.get(part).value);
                self.tokens.remove(part);
            }
            let token = self.tokens.get_mut(id);
            token.value = value;
            token.kind = TokenKind::Word;
            token.set_keyword(template.category, KeywordKind::Standalone);
            return true;
        }

        if !long_enough {
            return false;
        }
        let Some(entry) = keyword::find_standalone(&normalized) else {
            return false;
        };
        if sweep == Sweep::Normal
            && (entry.category == KeywordCategory::AnimeType || entry.is_ambiguous())
        {
            return false;
        }
        self.tokens
            .get_mut(id)
            .set_keyword(entry.category, KeywordKind::Standalone);
        true
    }

    /// Pass 9: title plus the qualifiers that tell releases of a series apart,
    /// e.g. `Title (2009)`, `Title OVA 2` or `Title Movie Subtitle`.
    fn write_formatted_title(&mut self) {
        let Some(&title_id) = self.tokens.with_metadata(MetadataCategory::Title).first() else {
            return;
        };
        let mut title = self.tokens.get(title_id).value.clone();

        if let Some(qualifier) = self.parenthesized_qualifier(title_id) {
            title.push_str(" (");
            title.push_str(&qualifier);
            title.push(')');
        }

        let anime_types: Vec<TokenId> = self
            .tokens
            .with_keyword(KeywordCategory::AnimeType)
            .into_iter()
            .filter(|&id| {
                // "OVA 2" counts, the "ED" split off "ED1" does not
                let token = self.tokens.get(id);
                token
                    .keyword
                    .is_some_and(|k| k.kind != KeywordKind::CombinedWithNumber)
                    || token.normalized_value().contains("MOVIE")
            })
            .collect();
        let others = self.tokens.with_metadata(MetadataCategory::OtherEpisodeNumber);

        let mut is_movie = false;
        for (i, &id) in anime_types.iter().enumerate() {
            let token = self.tokens.get(id);
            title.push(' ');
            title.push_str(&token.value);
            if let Some(&other) = others.get(i) {
                title.push(' ');
                title.push_str(&self.tokens.get(other).value);
            }
            is_movie |= token.normalized_value().contains("MOVIE");
        }

        if is_movie {
            if let Some(&episode_title) = self.tokens.with_metadata(MetadataCategory::EpisodeTitle).first() {
                title.push(' ');
                title.push_str(&self.tokens.get(episode_title).value);
            }
        }

        self.metadata.formatted_title = title;
    }

    /// `(2009)` or `(TV)` right after the title, when it holds nothing but
    /// unknown words and years.
    fn parenthesized_qualifier(&self, title_id: TokenId) -> Option<String> {
        let (open, _) = self.tokens.next_skipping_delimiters(title_id)?;
        let open_token = self.tokens.get(open);
        if !open_token.is_opening_bracket() || open_token.value != "(" {
            return None;
        }
        let open_index = self.tokens.index_of(open)?;
        let close = self.tokens.first_after(open_index, |t| t.value == ")")?;
        if !self.tokens.get(close).is_closing_bracket() {
            return None;
        }
        let close_index = self.tokens.index_of(close)?;

        let mut values = Vec::new();
        for index in open_index + 1..close_index {
            let token = self.tokens.at(index)?;
            if token.kind != TokenKind::Year && !token.is_unknown() {
                return None;
            }
            values.push(token.value.as_str());
        }
        (!values.is_empty()).then(|| values.join(" "))
    }

    /// Pass 10: copy every tagged token into the record.
    fn collect_metadata(&mut self) {
        let m = &mut self.metadata;
        m.file_name = self.filename.clone();

        for token in self.tokens.iter() {
            let value = token.value.clone();

            if let Some(keyword) = token.keyword {
                match keyword.category {
                    KeywordCategory::Year => m.year = value.clone(),
                    KeywordCategory::ReleaseVersion => {
                        m.release_version.push(token.normalized_value().replacen('V', "", 1))
                    }
                    KeywordCategory::FileChecksum => m.file_checksum = value.clone(),
                    KeywordCategory::VideoResolution => m.video_resolution = value.clone(),
                    KeywordCategory::ReleaseGroup => m.release_group = value.clone(),
                    KeywordCategory::AudioTerm => m.audio_term.push(value.clone()),
                    KeywordCategory::AnimeType => m.anime_type.push(value.clone()),
                    KeywordCategory::VideoTerm => m.video_term.push(value.clone()),
                    KeywordCategory::DeviceCompat => m.device_compatibility.push(value.clone()),
                    KeywordCategory::Language => m.language.push(value.clone()),
                    KeywordCategory::Subtitles => m.subtitles.push(value.clone()),
                    KeywordCategory::Source => m.source.push(value.clone()),
                    KeywordCategory::ReleaseInformation => {
                        m.release_information.push(value.clone())
                    }
                    _ => {}
                }
            }

            match token.metadata {
                Some(MetadataCategory::FileExtension) => m.file_extension = value,
                Some(MetadataCategory::Title) => m.title = value,
                Some(MetadataCategory::EpisodeTitle) => m.episode_title = value,
                Some(MetadataCategory::EpisodeNumber) => m.episode_number.push(value),
                Some(MetadataCategory::OtherEpisodeNumber) => m.other_episode_number.push(value),
                Some(MetadataCategory::EpisodeNumberAlt) => m.episode_number_alt.push(value),
                Some(MetadataCategory::Season) => m.season_number.push(value),
                Some(MetadataCategory::Part) => m.part_number.push(value),
                Some(MetadataCategory::VolumeNumber) => m.volume_number.push(value),
                Some(MetadataCategory::ReleaseGroup) => m.release_group = value,
                None => {}
            }
        }

        if m.episode_number.is_empty() && !m.other_episode_number.is_empty() {
            m.episode_number = std::mem::take(&mut m.other_episode_number);
        }
    }

    /// Pass 11: strip version markers from numbers (`01v2` → `01` + version `2`).
    fn clean_up(&mut self) {
        let m = &mut self.metadata;
        let mut versions = Vec::new();
        for numbers in [
            &mut m.episode_number,
            &mut m.season_number,
            &mut m.part_number,
            &mut m.volume_number,
        ] {
            for number in numbers.iter_mut() {
                let (cleaned, version) = clean_number(number);
                *number = cleaned;
                if let Some(version) = version {
                    versions.push(version);
                }
            }
        }
        for version in versions {
            if !m.release_version.contains(&version) {
                m.release_version.push(version);
            }
        }
    }
}

fn number_kind(value: &str) -> TokenKind {
    if token::is_number(value) {
        TokenKind::Number
    } else {
        TokenKind::NumberLike
    }
}

/// Split a number from its version or marker suffix.
fn clean_number(number: &str) -> (String, Option<String>) {
    if number.bytes().all(|b| b.is_ascii_digit()) {
        return (number.to_string(), None);
    }

    let lower = number.to_ascii_lowercase();
    if let Some(index) = lower.find('v') {
        let version = &lower[index + 1..];
        let version = (!version.is_empty()).then(|| version.to_string());
        return (number[..index].to_string(), version);
    }
    if let Some(index) = number.find('\'') {
        return (number[..index].to_string(), Some("2".to_string()));
    }
    for letter in ['a', 'b', 'c'] {
        if let Some(index) = lower.find(letter) {
            return (number[..index].to_string(), Some(letter.to_string()));
        }
    }

    // "12.5" passes through; anything else keeps its leading number.
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in number.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot && end == i && i > 0 {
            seen_dot = true;
        } else {
            break;
        }
    }
    (number[..end].to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_gundam() {
        let m = parse("[Conclave-Mendoi]_Mobile_Suit_Gundam_00_S2_-_01v2_[1280x720_H.264_AAC][4863FBE8].mkv");
        assert_eq!(m.title, "Mobile Suit Gundam 00");
        assert_eq!(m.season_number, vec!["2"]);
        assert_eq!(m.episode_number, vec!["01"]);
        assert_eq!(m.release_version, vec!["2"]);
        assert_eq!(m.release_group, "Conclave-Mendoi");
        assert_eq!(m.file_checksum, "4863FBE8");
        assert_eq!(m.file_extension, "mkv");
        assert_eq!(m.video_resolution, "1280x720");
        assert_eq!(m.video_term, vec!["H.264"]);
        assert_eq!(m.audio_term, vec!["AAC"]);
    }

    #[test]
    fn test_scenario_frieren() {
        let m = parse("[SubsPlease] Sousou no Frieren - 14 (480p) [6EB72DA5].mkv");
        assert_eq!(m.title, "Sousou no Frieren");
        assert_eq!(m.episode_number, vec!["14"]);
        assert_eq!(m.video_resolution, "480p");
        assert_eq!(m.file_checksum, "6EB72DA5");
        assert_eq!(m.release_group, "SubsPlease");
        assert_eq!(m.file_extension, "mkv");
        assert!(m.season_number.is_empty());
        assert!(m.episode_title.is_empty());
    }

    #[test]
    fn test_scenario_spy_family_batch() {
        let m = parse(
            "[Judas] Spy x Family (Season 1 Part 2) [1080p][HEVC x265 10bit][Dual-Audio][Multi-Subs] (Batch)",
        );
        assert_eq!(m.title, "Spy x Family");
        assert_eq!(m.season_number, vec!["1"]);
        assert_eq!(m.part_number, vec!["2"]);
        assert_eq!(m.video_resolution, "1080p");
        assert_eq!(m.release_group, "Judas");
        assert!(m.release_information.contains(&"Batch".to_string()));
        assert!(m.episode_number.is_empty());
        assert_eq!(m.audio_term, vec!["Dual-Audio"]);
        assert_eq!(m.subtitles, vec!["Multi-Subs"]);
    }

    #[test]
    fn test_scenario_jujutsu() {
        let m = parse("[Seanime] Jujutsu Kaisen S1 - 02.mkv");
        assert_eq!(m.title, "Jujutsu Kaisen");
        assert_eq!(m.season_number, vec!["1"]);
        assert_eq!(m.episode_number, vec!["02"]);
        assert_eq!(m.release_group, "Seanime");
    }

    #[test]
    fn test_scenario_dragon_ball_alt_number() {
        let m = parse("[Hatsuyuki] Dragon Ball Kai (2014) - 002 (100) [1280x720][DD66AFB7].mkv");
        assert_eq!(m.title, "Dragon Ball Kai");
        assert_eq!(m.formatted_title, "Dragon Ball Kai (2014)");
        assert_eq!(m.year, "2014");
        assert_eq!(m.episode_number, vec!["002"]);
        assert_eq!(m.episode_number_alt, vec!["100"]);
        assert_eq!(m.video_resolution, "1280x720");
        assert_eq!(m.file_checksum, "DD66AFB7");
        assert_eq!(m.release_group, "Hatsuyuki");
    }

    #[test]
    fn test_scenario_code_geass_of() {
        let m = parse("Code_Geass_R2_TV_[20_of_25]_[ru_jp]_[HDTV]_[Varies_&_Cuba77_&_AnimeReactor_RU].mkv");
        assert_eq!(m.title, "Code Geass R2 TV");
        assert_eq!(m.episode_number, vec!["20"]);
        assert_eq!(m.other_episode_number, vec!["25"]);
        assert!(m.source.contains(&"HDTV".to_string()));
        assert_eq!(m.release_group, "Varies & Cuba77 & AnimeReactor RU");
        assert_eq!(m.file_extension, "mkv");
        assert_eq!(m.language, vec!["ru", "jp"]);
    }

    #[test]
    fn test_file_name_is_echoed() {
        let input = "  [Group] Title - 01.mkv ";
        assert_eq!(parse(input).file_name, input);
    }

    #[test]
    fn test_empty_input() {
        let m = parse("");
        assert!(m.title.is_empty());
        assert!(m.episode_number.is_empty());
        assert_eq!(m.file_name, "");
    }

    #[test]
    fn test_ambiguous_keyword_in_title() {
        let m = parse("[Group] Bokura ga Ita - 05 [720p].mkv");
        assert_eq!(m.title, "Bokura ga Ita");
        assert!(m.language.is_empty());
    }

    #[test]
    fn test_standalone_version_keyword() {
        let m = parse("[Group] Title - 05 [V2][720p].mkv");
        assert_eq!(m.episode_number, vec!["05"]);
        assert_eq!(m.release_version, vec!["2"]);
    }

    #[test]
    fn test_parse_debug_dump() {
        let (m, dump) = parse_debug("[SubsPlease] Sousou no Frieren - 14 (480p) [6EB72DA5].mkv");
        assert_eq!(m.episode_number, vec!["14"]);
        let episode = dump.find("14").unwrap();
        assert_eq!(episode.metadata, Some(MetadataCategory::EpisodeNumber));
        let title = dump.find("Sousou no Frieren").unwrap();
        assert_eq!(title.metadata, Some(MetadataCategory::Title));
    }

    #[test]
    fn test_clean_number() {
        assert_eq!(clean_number("01"), ("01".into(), None));
        assert_eq!(clean_number("01v2"), ("01".into(), Some("2".into())));
        assert_eq!(clean_number("05V3"), ("05".into(), Some("3".into())));
        assert_eq!(clean_number("12'"), ("12".into(), Some("2".into())));
        assert_eq!(clean_number("7b"), ("7".into(), Some("b".into())));
        assert_eq!(clean_number("12.5"), ("12.5".into(), None));
        assert_eq!(clean_number("1x02"), ("1".into(), None));
    }
}
