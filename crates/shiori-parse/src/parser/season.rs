//! Season, part and volume numbers, plus the episode numbers glued to them
//! (`S01E02`, `01x02`, `S1 - 03`).

use tracing::{debug, trace};

use super::Parser;
use crate::keyword::{self, KeywordCategory, KeywordKind, NumberedKeyword};
use crate::token::{
    self, is_zero_padded, MetadataCategory, Token, TokenCategory, TokenId, TokenKind,
};

/// What the second number of a range continuation stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RangeKind {
    /// Same field as the first number (`S1-3`).
    Same,
    /// An episode number (`S1 - 03`).
    Episode,
}

impl Parser {
    /// Pass 3.
    pub(super) fn parse_season(&mut self) {
        let mut index = 0;
        while let Some(id) = self.tokens.id_at(index) {
            index += 1;

            let token = self.tokens.get(id);
            if !token.is_unknown() || token.is_keyword() {
                continue;
            }
            let normalized = token.normalized_value();
            let long_enough = token.value.len() > 3;

            if normalized.starts_with('S') && long_enough && self.split_season_episode(id) {
                continue;
            }
            // C for COUR
            if normalized.starts_with(['S', 'P', 'V', 'C'])
                && self.parse_season_keyword(id, &normalized)
            {
                continue;
            }
            if normalized.contains('X') && long_enough {
                self.split_x_season_episode(id);
            }
        }
    }

    /// `S01E02` → `S` `01` `E` `02`.
    fn split_season_episode(&mut self, id: TokenId) -> bool {
        let value = self.tokens.get(id).value.clone();
        let Some(se) = token::split_season_episode(&value) else {
            return false;
        };
        if se.prefix.is_empty() {
            return false;
        }

        let ids = self.split_token(
            id,
            vec![
                Token::new(se.prefix, TokenCategory::Unknown)
                    .with_kind(TokenKind::Character)
                    .with_keyword(KeywordCategory::SeasonPrefix, KeywordKind::CombinedWithNumber),
                Token::new(se.season, TokenCategory::Unknown)
                    .with_kind(TokenKind::Number)
                    .with_metadata(MetadataCategory::Season),
                Token::new(se.separator, TokenCategory::Unknown)
                    .with_kind(TokenKind::classify(se.separator))
                    .with_keyword(KeywordCategory::EpisodePrefix, KeywordKind::CombinedWithNumber),
                Token::new(se.episode, TokenCategory::Unknown)
                    .with_kind(super::number_kind(se.episode))
                    .with_metadata(MetadataCategory::EpisodeNumber),
            ],
        );
        let &[_, _, _, episode] = ids.as_slice() else {
            return false;
        };
        debug!(pass = "season", season = se.season, episode = se.episode, "split season and episode");

        self.tokens.merge_decimal(episode);
        self.continue_episode_range(episode, is_zero_padded(se.episode));
        true
    }

    /// `01x02` → `01` `x` `02`.
    fn split_x_season_episode(&mut self, id: TokenId) {
        let value = self.tokens.get(id).value.clone();
        let Some(se) = token::split_season_episode(&value) else {
            return;
        };
        if !se.is_x_form() {
            return;
        }

        let digits = se
            .episode
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let episode_number: u32 = se.episode[..digits].parse().unwrap_or(u32::MAX);
        // 0x539 and friends are hex, not S0E539.
        if se.season.len() > 2
            || (episode_number < 10 && !is_zero_padded(se.episode))
            || (se.season == "0" && digits >= 3)
        {
            trace!(pass = "season", value = %value, "rejected x-form");
            return;
        }

        let ids = self.split_token(
            id,
            vec![
                Token::new(se.season, TokenCategory::Unknown)
                    .with_kind(TokenKind::Number)
                    .with_metadata(MetadataCategory::Season),
                Token::new(se.separator, TokenCategory::Unknown)
                    .with_kind(TokenKind::Character)
                    .with_keyword(KeywordCategory::EpisodePrefix, KeywordKind::CombinedWithNumber),
                Token::new(se.episode, TokenCategory::Unknown)
                    .with_kind(super::number_kind(se.episode))
                    .with_metadata(MetadataCategory::EpisodeNumber),
            ],
        );
        let &[_, _, episode] = ids.as_slice() else {
            return;
        };
        debug!(pass = "season", season = se.season, episode = se.episode, "split x-form");

        self.continue_episode_range(episode, is_zero_padded(se.episode));
    }

    /// `S01E01-03`: both ends of the range are episodes.
    fn continue_episode_range(&mut self, episode: TokenId, padded: bool) {
        if let Some((next, _)) = self.range_after(episode, padded) {
            self.tokens.get_mut(next).set_metadata(MetadataCategory::EpisodeNumber);
            self.tokens.merge_decimal(next);
        }
    }

    /// `S2`, `Season 2`, `Part 2`, `Vol.3`, `2nd Season`.
    fn parse_season_keyword(&mut self, id: TokenId, normalized: &str) -> bool {
        let candidates: Vec<&'static NumberedKeyword> = keyword::numbered_where(|kw| {
            kw.category.is_season_like_prefix() && normalized.starts_with(kw.value)
        })
        .collect();

        for kw in candidates {
            let Some(category) = kw.category.metadata_category() else {
                continue;
            };
            match kw.kind {
                KeywordKind::CombinedWithNumber => {
                    if self.tokens.is_after_file_metadata(id) {
                        return false;
                    }
                    if self.split_combined_prefix(id, kw, category) {
                        return true;
                    }
                }
                KeywordKind::SeparatedWithNumber if normalized == kw.value => {
                    if self.bind_separated_number(id, kw, category) {
                        return true;
                    }
                }
                KeywordKind::OrdinalSuffix if normalized == kw.value => {
                    if self.bind_ordinal(id, kw, category) {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// `S2` → `S` `2`.
    fn split_combined_prefix(
        &mut self,
        id: TokenId,
        kw: &NumberedKeyword,
        category: MetadataCategory,
    ) -> bool {
        let value = self.tokens.get(id).value.clone();
        let Some(rest) = token::strip_keyword_prefix(&value, kw.value) else {
            return false;
        };
        if rest.is_empty() || !token::is_number_or_like(rest) {
            return false;
        }
        let prefix = &value[..value.len() - rest.len()];

        let ids = self.split_token(
            id,
            vec![
                Token::new(prefix, TokenCategory::Unknown)
                    .with_kind(TokenKind::Word)
                    .with_keyword(kw.category, kw.kind),
                Token::new(rest, TokenCategory::Unknown)
                    .with_kind(super::number_kind(rest))
                    .with_metadata(category),
            ],
        );
        let &[_, number] = ids.as_slice() else {
            return false;
        };
        debug!(pass = "season", keyword = kw.value, value = rest, "split prefix");

        self.tokens.merge_decimal(number);
        if let Some((next, kind)) = self.range_after(number, is_zero_padded(rest)) {
            let target = match kind {
                RangeKind::Same => category,
                RangeKind::Episode => MetadataCategory::EpisodeNumber,
            };
            self.tokens.get_mut(next).set_metadata(target);
            self.tokens.merge_decimal(next);
        }
        true
    }

    /// `Season 2`.
    fn bind_separated_number(
        &mut self,
        id: TokenId,
        kw: &NumberedKeyword,
        category: MetadataCategory,
    ) -> bool {
        let Some((number, _)) = self.tokens.next_skipping_delimiters(id) else {
            return false;
        };
        if !self.tokens.get(number).is_free_number() {
            return false;
        }

        self.tokens.get_mut(id).set_keyword(kw.category, kw.kind);
        self.tokens.get_mut(number).set_metadata(category);
        debug!(pass = "season", keyword = kw.value, value = %self.tokens.get(number).value, "separated number");

        let padded = self.tokens.get(number).is_zero_padded();
        if let Some((next, kind)) = self.range_after(number, padded) {
            let target = match kind {
                RangeKind::Same => category,
                RangeKind::Episode => MetadataCategory::EpisodeNumber,
            };
            self.tokens.get_mut(next).set_metadata(target);
        }
        true
    }

    /// `2nd Season`, `Third Season`.
    fn bind_ordinal(&mut self, id: TokenId, kw: &NumberedKeyword, category: MetadataCategory) -> bool {
        let Some((ordinal, _)) = self.tokens.prev_skipping_delimiters(id) else {
            return false;
        };
        let ordinal_token = self.tokens.get(ordinal);
        if ordinal_token.kind != TokenKind::Ordinal
            || !ordinal_token.is_unknown()
            || ordinal_token.is_keyword()
        {
            return false;
        }
        let Some(number) = token::ordinal_to_number(&ordinal_token.value) else {
            return false;
        };

        self.tokens.get_mut(id).set_keyword(kw.category, kw.kind);
        let ordinal_token = self.tokens.get_mut(ordinal);
        ordinal_token.value = number.to_string();
        ordinal_token.kind = TokenKind::Number;
        ordinal_token.set_metadata(category);
        debug!(pass = "season", keyword = kw.value, value = number, "ordinal");

        // "2nd Season - 03"; a second season is never read here.
        if let Some((next, RangeKind::Episode)) = self.range_after(id, false) {
            self.tokens.get_mut(next).set_metadata(MetadataCategory::EpisodeNumber);
        }
        true
    }

    /// Classify the number following `id` across a separator, if any.
    ///
    /// `prev_padded` is whether the number before the separator was
    /// zero-padded. A dash with delimiters around it introduces an episode
    /// (`S1 - 03`), as does a padded number glued to an unpadded one
    /// (`S1-03`). Otherwise a plain number continues the same field
    /// (`S1-3`), unless padding disagrees (`S01 - 3`).
    pub(super) fn range_after(&self, id: TokenId, prev_padded: bool) -> Option<(TokenId, RangeKind)> {
        let (ids, skipped) = self.tokens.sequence_after(
            id,
            &[TokenCategory::Separator, TokenCategory::Unknown],
            true,
        )?;
        let (separator, next_id) = (self.tokens.get(ids[0]), ids[1]);
        let next = self.tokens.get(next_id);
        if next.is_keyword() {
            return None;
        }

        if next.is_number_or_like_kind() && separator.is_dash_separator() {
            if skipped > 0 {
                match next.value.parse::<u32>() {
                    Ok(n) if n >= 10 || next.is_zero_padded() => {
                        return Some((next_id, RangeKind::Episode))
                    }
                    Ok(_) => {}
                    Err(_) => return Some((next_id, RangeKind::Episode)),
                }
            } else if !prev_padded && next.is_zero_padded() {
                return Some((next_id, RangeKind::Episode));
            }
        }

        if !next.is_number_kind() {
            return None;
        }
        let n: u32 = next.value.parse().ok()?;
        if n < 10 && prev_padded && !next.is_zero_padded() {
            return None;
        }
        Some((next_id, RangeKind::Same))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_s_form() {
        let m = parse("Title S01E02 [720p].mkv");
        assert_eq!(m.title, "Title");
        assert_eq!(m.season_number, vec!["01"]);
        assert_eq!(m.episode_number, vec!["02"]);
    }

    #[test]
    fn test_s_form_with_version_and_ep_separator() {
        let m = parse("Title.S2EP05v2.1080p.mkv");
        assert_eq!(m.season_number, vec!["2"]);
        assert_eq!(m.episode_number, vec!["05"]);
        assert_eq!(m.release_version, vec!["2"]);
    }

    #[test]
    fn test_s_form_episode_range() {
        let m = parse("Title S01E01-03 [Batch].mkv");
        assert_eq!(m.season_number, vec!["01"]);
        assert_eq!(m.episode_number, vec!["01", "03"]);
    }

    #[test]
    fn test_x_form() {
        let m = parse("Title 01x05 [720p].mkv");
        assert_eq!(m.season_number, vec!["01"]);
        assert_eq!(m.episode_number, vec!["05"]);
    }

    #[test]
    fn test_x_form_rejections() {
        assert!(parse("Title 0x539 [720p].mkv").season_number.is_empty());
        assert!(parse("Title 2x3 [720p].mkv").season_number.is_empty());
        assert!(parse("Title 123x05 [720p].mkv").season_number.is_empty());
    }

    #[test]
    fn test_combined_prefix_with_dashed_episode() {
        let m = parse("[Group] Title S2 - 05 [1080p].mkv");
        assert_eq!(m.title, "Title");
        assert_eq!(m.season_number, vec!["2"]);
        assert_eq!(m.episode_number, vec!["05"]);
    }

    #[test]
    fn test_season_range() {
        let m = parse("[Group] Title S1-3 [Batch]");
        assert_eq!(m.season_number, vec!["1", "3"]);
        assert!(m.episode_number.is_empty());
    }

    #[test]
    fn test_glued_padded_episode() {
        let m = parse("[Group] Title S1-03 [720p].mkv");
        assert_eq!(m.season_number, vec!["1"]);
        assert_eq!(m.episode_number, vec!["03"]);
    }

    #[test]
    fn test_separated_season_and_part() {
        let m = parse("[Group] Title Season 2 Part 1 - 04 [720p].mkv");
        assert_eq!(m.season_number, vec!["2"]);
        assert_eq!(m.part_number, vec!["1"]);
        assert_eq!(m.episode_number, vec!["04"]);
        assert_eq!(m.title, "Title");
    }

    #[test]
    fn test_ordinal_season() {
        let m = parse("[Group] Title 2nd Season - 03 [720p].mkv");
        assert_eq!(m.season_number, vec!["2"]);
        assert_eq!(m.episode_number, vec!["03"]);
        assert_eq!(m.title, "Title");

        let m = parse("[Group] Title Third Season - 11 [720p].mkv");
        assert_eq!(m.season_number, vec!["3"]);
        assert_eq!(m.episode_number, vec!["11"]);
    }

    #[test]
    fn test_ordinal_cour_is_part() {
        let m = parse("[Group] Title 2nd Cour - 13 [720p].mkv");
        assert_eq!(m.part_number, vec!["2"]);
        assert!(m.season_number.is_empty());
        assert_eq!(m.episode_number, vec!["13"]);
    }

    #[test]
    fn test_volume() {
        let m = parse("[Group] Title Vol.3 [BD 1080p]");
        assert_eq!(m.volume_number, vec!["3"]);
    }

    #[test]
    fn test_range_after_padding() {
        let parser = Parser::new("S01 - 3");
        let first = parser.tokens.iter().find(|t| t.value == "S01").unwrap().id;
        assert!(parser.range_after(first, true).is_none());

        let parser = Parser::new("1 - 12");
        let first = parser.tokens.iter().find(|t| t.value == "1").unwrap().id;
        assert_eq!(parser.range_after(first, false).map(|r| r.1), Some(RangeKind::Episode));

        let parser = Parser::new("1-3");
        let first = parser.tokens.iter().find(|t| t.value == "1").unwrap().id;
        assert_eq!(parser.range_after(first, false).map(|r| r.1), Some(RangeKind::Same));

        let parser = Parser::new("1-2v2");
        let first = parser.tokens.iter().find(|t| t.value == "1").unwrap().id;
        assert!(parser.range_after(first, false).is_none());
    }
}
