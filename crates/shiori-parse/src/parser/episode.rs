//! Episode numbers, tried strategy by strategy until one sticks.

use tracing::{debug, trace};

use super::season::RangeKind;
use super::Parser;
use crate::keyword::{self, KeywordCategory, KeywordKind, NumberedKeyword};
use crate::token::{self, MetadataCategory, Token, TokenCategory, TokenId, TokenKind};

type Strategy = fn(&mut Parser) -> bool;

impl Parser {
    /// Pass 4.
    pub(super) fn parse_episode(&mut self) {
        let strategies: [(&str, Strategy); 7] = [
            ("known_alt", Self::parse_known_episode_alt),
            ("search_alt", Self::parse_episode_with_alt),
            ("keyword", Self::parse_episode_keywords),
            ("of", Self::parse_episode_of),
            ("search", |p| p.search_episode(false)),
            ("enclosed", Self::parse_enclosed_episode),
            ("search_aggressive", |p| p.search_episode(true)),
        ];

        for (strategy, run) in strategies {
            if run(self) {
                debug!(pass = "episode", strategy, "found episode");
                return;
            }
        }
        trace!(pass = "episode", "no episode number");
    }

    /// `( 12 )` right after `id`, delimiters allowed.
    fn parenthesized_number_after(&self, id: TokenId) -> Option<TokenId> {
        let (ids, _) = self.tokens.sequence_after(
            id,
            &[
                TokenCategory::OpeningBracket,
                TokenCategory::Unknown,
                TokenCategory::ClosingBracket,
            ],
            true,
        )?;
        let (open, number, close) = (
            self.tokens.get(ids[0]),
            self.tokens.get(ids[1]),
            self.tokens.get(ids[2]),
        );
        (open.value == "(" && number.is_number_kind() && close.value == ")").then_some(ids[1])
    }

    /// An earlier pass already found the episode (`S01E05`). Pick up an alt
    /// number `(17)` after it, or a glued range end `05-06`.
    fn parse_known_episode_alt(&mut self) -> bool {
        let episodes = self.tokens.with_metadata(MetadataCategory::EpisodeNumber);
        let Some(&last) = episodes.last() else {
            return false;
        };

        if let Some(alt) = self.parenthesized_number_after(last) {
            self.tokens.get_mut(alt).set_metadata(MetadataCategory::EpisodeNumberAlt);
        } else if episodes.len() == 1 {
            if let Some((_, next)) = self.tokens.number_range_after(last, false) {
                self.tokens.get_mut(next).set_metadata(MetadataCategory::EpisodeNumber);
            }
        }
        true
    }

    /// `002 (100)`.
    fn parse_episode_with_alt(&mut self) -> bool {
        for id in self.tokens.ids() {
            if !self.tokens.get(id).is_free_number() {
                continue;
            }
            if let Some(alt) = self.parenthesized_number_after(id) {
                self.tokens.get_mut(id).set_metadata(MetadataCategory::EpisodeNumber);
                self.tokens.get_mut(alt).set_metadata(MetadataCategory::EpisodeNumberAlt);
                return true;
            }
        }
        false
    }

    /// `Ep05`, `Episode 5`, `ED1`, `OVA 1 ~ 3`.
    ///
    /// Anime-type keywords only yield other episode numbers, so the pass
    /// succeeds only when an episode prefix was seen.
    fn parse_episode_keywords(&mut self) -> bool {
        let mut found = false;
        let mut index = 0;
        while let Some(id) = self.tokens.id_at(index) {
            index += 1;

            let token = self.tokens.get(id);
            if !token.is_unknown() || token.is_keyword() {
                continue;
            }
            let normalized = token.normalized_value();
            let candidates: Vec<&'static NumberedKeyword> = keyword::numbered_where(|kw| {
                matches!(
                    kw.kind,
                    KeywordKind::CombinedWithNumber | KeywordKind::SeparatedWithNumber
                ) && !kw.category.is_season_like_prefix()
                    && normalized.starts_with(kw.value)
            })
            .collect();

            for kw in candidates {
                let category = if kw.category == KeywordCategory::EpisodePrefix {
                    MetadataCategory::EpisodeNumber
                } else {
                    MetadataCategory::OtherEpisodeNumber
                };
                let bound = match kw.kind {
                    KeywordKind::CombinedWithNumber => self.split_episode_prefix(id, kw, category),
                    KeywordKind::SeparatedWithNumber if normalized == kw.value => {
                        self.bind_episode_keyword(id, kw, category)
                    }
                    _ => false,
                };
                if bound {
                    found |= kw.category == KeywordCategory::EpisodePrefix;
                    break;
                }
            }
        }
        found
    }

    /// `ED1` → `ED` `1`, `EP01-03` → `EP` `01` `-` `03`.
    fn split_episode_prefix(
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
        debug!(pass = "episode", keyword = kw.value, value = rest, "split prefix");

        self.tokens.merge_decimal(number);
        if let Some((_, next)) = self.tokens.number_range_after(number, false) {
            self.tokens.get_mut(next).set_metadata(category);
        }
        true
    }

    /// `Episode 5`, `OVA 1 ~ 3`.
    fn bind_episode_keyword(
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
        debug!(pass = "episode", keyword = kw.value, value = %self.tokens.get(number).value, "separated number");

        let padded = self.tokens.get(number).is_zero_padded();
        if let Some((next, RangeKind::Same)) = self.range_after(number, padded) {
            self.tokens.get_mut(next).set_metadata(category);
        }
        true
    }

    /// `01 of 24`.
    fn parse_episode_of(&mut self) -> bool {
        for id in self.tokens.ids() {
            if !self.tokens.get(id).is_free_number() {
                continue;
            }
            let Some((of, _)) = self.tokens.next_skipping_delimiters(id) else {
                continue;
            };
            if self.tokens.get(of).normalized_value() != "OF" {
                continue;
            }
            let Some((total, _)) = self.tokens.next_skipping_delimiters(of) else {
                continue;
            };
            if !self.tokens.get(total).is_number_or_like_kind() {
                continue;
            }

            self.tokens.get_mut(id).set_metadata(MetadataCategory::EpisodeNumber);
            // Known so the episode title pass leaves it alone.
            self.tokens.get_mut(of).category = TokenCategory::Known;
            self.tokens.get_mut(total).set_metadata(MetadataCategory::OtherEpisodeNumber);
            return true;
        }
        false
    }

    /// `[12]` or `(12)`.
    fn parse_enclosed_episode(&mut self) -> bool {
        for id in self.tokens.ids() {
            let token = self.tokens.get(id);
            if !token.is_free_number() || !token.enclosed {
                continue;
            }
            let opened = self
                .tokens
                .prev(id)
                .is_some_and(|prev| self.tokens.get(prev).is_opening_bracket());
            let closed = self
                .tokens
                .next(id)
                .is_some_and(|next| self.tokens.get(next).is_closing_bracket());
            if opened && closed {
                self.tokens.get_mut(id).set_metadata(MetadataCategory::EpisodeNumber);
                return true;
            }
        }
        false
    }

    /// Look for the episode by position. Without `aggressive`, a number must
    /// follow a dash (`Title - 01`); with it, bare numbers qualify when they
    /// look enough like an episode (`Title 01`).
    fn search_episode(&mut self, aggressive: bool) -> bool {
        self.episode_before_anchor(aggressive)
            || self.episode_between_dashes()
            || self.last_free_number(aggressive)
    }

    /// The number right before the first bracket or keyword, ignoring a
    /// leading `[Group]` bracket: `Title - 01 [720p]`.
    fn episode_before_anchor(&mut self, aggressive: bool) -> bool {
        let anchor = self
            .tokens
            .iter()
            .enumerate()
            .find(|(index, t)| *index > 0 && (t.is_opening_bracket() || t.is_keyword()))
            .map(|(_, t)| t.id);
        let Some(anchor) = anchor else {
            return false;
        };
        let Some((number, _)) = self.tokens.prev_skipping_delimiters(anchor) else {
            return false;
        };
        if !self.tokens.get(number).is_free_number() {
            return false;
        }

        // "01-03 [720p]", but not "009-1-02 [720p]"
        if let Some((_, first)) = self.tokens.episode_range_before(number) {
            if self.tokens.number_range_before(first, false).is_none() {
                self.tokens.get_mut(first).set_metadata(MetadataCategory::EpisodeNumber);
                self.tokens.get_mut(number).set_metadata(MetadataCategory::EpisodeNumber);
                return true;
            }
        }

        if !aggressive && !self.tokens.dash_before(number) {
            return false;
        }
        if aggressive && !self.is_plausible_bare_number(number) {
            return false;
        }

        self.tokens.get_mut(number).set_metadata(MetadataCategory::EpisodeNumber);
        true
    }

    /// `Title - 01 - Subtitle`.
    fn episode_between_dashes(&mut self) -> bool {
        let found = self.tokens.ids().into_iter().find(|&id| {
            self.tokens.get(id).is_free_number()
                && self.tokens.dash_before(id)
                && self.tokens.dash_after(id)
                && self.tokens.number_range_before(id, false).is_none()
                && self.tokens.number_range_after(id, false).is_none()
        });
        let Some(id) = found else {
            return false;
        };
        self.tokens.get_mut(id).set_metadata(MetadataCategory::EpisodeNumber);
        true
    }

    /// The last free number in the name, or `1 - 12` ranges ending with it.
    fn last_free_number(&mut self, aggressive: bool) -> bool {
        let numbers = self.tokens.filter(Token::is_free_number);
        let Some(&last) = numbers.last() else {
            return false;
        };

        if let Some((_, first)) = self.tokens.number_range_before(last, true) {
            // "Title 2 - 05": only the padded one is an episode
            let mismatched = self.tokens.get(last).is_zero_padded()
                && !self.tokens.get(first).is_zero_padded();
            if !mismatched {
                self.tokens.get_mut(first).set_metadata(MetadataCategory::EpisodeNumber);
            }
            self.tokens.get_mut(last).set_metadata(MetadataCategory::EpisodeNumber);
            return true;
        }

        if !aggressive && !self.tokens.dash_before(last) {
            return false;
        }
        if aggressive {
            if numbers.len() > 1 {
                return false;
            }
            if self.tokens.dash_after(last) && !self.tokens.is_first(last) {
                return false;
            }
            let token = self.tokens.get(last);
            let plausible = match token.kind {
                TokenKind::NumberLike => is_reasonable_episode_number(&token.value),
                _ => self.is_plausible_bare_number(last),
            };
            if !plausible {
                return false;
            }
        }

        self.tokens.get_mut(last).set_metadata(MetadataCategory::EpisodeNumber);
        true
    }

    /// A bare number reads as an episode when it is padded or two digits,
    /// and stands apart from its neighbours. `2v2` always does.
    fn is_plausible_bare_number(&self, id: TokenId) -> bool {
        let token = self.tokens.get(id);
        if !token.is_number_kind() {
            return true;
        }
        let Ok(number) = token.value.parse::<u32>() else {
            return false;
        };
        if number < 10 && !token.is_zero_padded() {
            return false;
        }
        // "Evangelion 1.11" is not episode 11
        self.tokens.is_isolated(id)
    }
}

/// Rejects decimals that are more likely part of a title (`1.11`, `3.0`).
fn is_reasonable_episode_number(value: &str) -> bool {
    if matches!(value, "3.0" | "1.11") {
        return false;
    }
    let Some((_, fraction)) = value.split_once('.') else {
        return true;
    };
    fraction.parse::<u32>().map_or(true, |n| n <= 5)
}
