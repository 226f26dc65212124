//! Episode title, series title and release group.

use tracing::debug;

use super::Parser;
use crate::keyword::{self, KeywordCategory};
use crate::token::{MetadataCategory, Token, TokenId, TokenKind};
use crate::tokenizer::is_matching_bracket;

/// Unclaimed text a title can be made of.
fn is_free_text(token: &Token) -> bool {
    token.is_unknown() && !token.is_keyword()
}

fn is_free_unenclosed_text(token: &Token) -> bool {
    !token.enclosed && is_free_text(token)
}

fn is_square_opener(token: &Token) -> bool {
    token.is_opening_bracket() && token.value == "["
}

impl Parser {
    /// Pass 5: the text after the last episode number.
    pub(super) fn parse_episode_title(&mut self) {
        let enclosed_ok = self.tokens.all_unknown_enclosed();
        let episodes = self.tokens.with_metadata(MetadataCategory::EpisodeNumber);
        let Some(index) = episodes.last().and_then(|&id| self.tokens.index_of(id)) else {
            return;
        };

        // "(MBS 1080p)" after the episode is not a title unless everything is bracketed
        let span = self.tokens.walk_collect(
            index + 1,
            |t| (enclosed_ok || !t.enclosed) && is_free_text(t),
            |t| is_square_opener(t) || t.is_keyword() || t.metadata.is_some(),
        );
        let (Some(&first), Some(&last)) = (span.first(), span.last()) else {
            return;
        };
        self.note_anime_types(&span);

        let Some(merged) = self
            .tokens
            .combine(first, last, MetadataCategory::EpisodeTitle)
        else {
            return;
        };
        // "(Doki)" is a group tag
        if self.tokens.is_between_parentheses(merged) {
            self.tokens.get_mut(merged).set_metadata(MetadataCategory::ReleaseGroup);
            debug!(pass = "episode_title", value = %self.tokens.get(merged).value, "parenthesized, taken as release group");
        } else {
            debug!(pass = "episode_title", value = %self.tokens.get(merged).value, "found episode title");
        }
    }

    /// Pass 6.
    pub(super) fn parse_title(&mut self) {
        let found = (self.tokens.all_unknown_enclosed()
            && (self.title_before_enclosed_episode() || self.title_in_second_group()))
            || self.title_before_episode()
            || self.title_first_free_run();
        if !found {
            debug!(pass = "title", "no title");
        }
    }

    /// `[Group][Title][01]` or `[Group][Title] 01`.
    fn title_before_enclosed_episode(&mut self) -> bool {
        let Some(&episode) = self.tokens.with_metadata(MetadataCategory::EpisodeNumber).first() else {
            return false;
        };
        let Some(index) = self.tokens.index_of(episode) else {
            return false;
        };
        let Some(opener) = self.tokens.first_before(index, Token::is_opening_bracket) else {
            return false;
        };

        let episode_enclosed = self.tokens.get(episode).enclosed;
        let start = if episode_enclosed {
            let Some(opener_index) = self.tokens.index_of(opener) else {
                return false;
            };
            match self.tokens.first_before(opener_index, Token::is_opening_bracket) {
                Some(start) => start,
                None => return false,
            }
        } else {
            opener
        };
        let Some(start_index) = self.tokens.index_of(start) else {
            return false;
        };

        let span = self.tokens.walk_collect(start_index + 1, is_free_text, |t| {
            if episode_enclosed {
                t.id == opener || t.is_keyword()
            } else {
                t.is_closing_bracket()
            }
        });
        self.combine_title(&span, "before_enclosed_episode")
    }

    /// `[Group][Title][BDRIP]`.
    fn title_in_second_group(&mut self) -> bool {
        let openers = self
            .tokens
            .filter(|t| t.is_opening_bracket() && t.value != "(");
        let (Some(&second), Some(&third)) = (openers.get(1), openers.get(2)) else {
            return false;
        };
        let Some(start) = self.tokens.index_of(second) else {
            return false;
        };
        let span = self
            .tokens
            .walk_collect(start + 1, is_free_text, |t| t.id == third || t.is_keyword());
        self.combine_title(&span, "second_group")
    }

    /// `[Group] Title - 01`: walk back from the episode to the group bracket.
    fn title_before_episode(&mut self) -> bool {
        let Some(&episode) = self.tokens.with_metadata(MetadataCategory::EpisodeNumber).first() else {
            return false;
        };
        let Some(start) = self
            .tokens
            .index_of(episode)
            .and_then(|index| index.checked_sub(1))
        else {
            return false;
        };

        let mut span = self.tokens.walk_back_collect(start, is_free_text, |t| {
            t.is_closing_bracket() && t.value == "]"
        });
        if span.is_empty() {
            return false;
        }
        self.note_anime_types(&span);
        span.reverse();
        self.combine_title(&span, "before_episode")
    }

    /// `[Group] Title [720p]`: the first run of text outside brackets.
    fn title_first_free_run(&mut self) -> bool {
        let Some(&first) = self.tokens.filter(is_free_unenclosed_text).first() else {
            return false;
        };
        let Some(index) = self.tokens.index_of(first) else {
            return false;
        };
        let span = self.tokens.walk_collect(index, is_free_unenclosed_text, |t| {
            is_square_opener(t) || t.is_keyword()
        });
        match span.first() {
            None => return false,
            Some(&first) if self.tokens.is_after_file_metadata(first) => return false,
            Some(_) => {}
        }
        self.note_anime_types(&span);
        self.combine_title(&span, "first_free_run")
    }

    fn combine_title(&mut self, span: &[TokenId], strategy: &str) -> bool {
        let (Some(&first), Some(&last)) = (span.first(), span.last()) else {
            return false;
        };
        let Some(title) = self.tokens.combine(first, last, MetadataCategory::Title) else {
            return false;
        };
        debug!(pass = "title", strategy, value = %self.tokens.get(title).value, "found title");
        true
    }

    /// Anime types inside a title stay in its text but are still reported.
    fn note_anime_types(&mut self, span: &[TokenId]) {
        for &id in span {
            let token = self.tokens.get(id);
            let is_anime_type = keyword::find_standalone(&token.normalized_value())
                .is_some_and(|entry| entry.category == KeywordCategory::AnimeType);
            if is_anime_type {
                self.metadata.anime_type.push(token.value.clone());
            }
        }
    }

    /// Pass 7.
    pub(super) fn parse_release_group(&mut self) {
        if !self.tokens.with_metadata(MetadataCategory::ReleaseGroup).is_empty() {
            return;
        }
        let found = self.group_before_title() || self.group_in_brackets() || self.group_last_word();
        if !found {
            debug!(pass = "release_group", "no release group");
        }
    }

    /// `[Group] Title`.
    fn group_before_title(&mut self) -> bool {
        let Some(&title) = self.tokens.with_metadata(MetadataCategory::Title).first() else {
            return false;
        };
        let span = self
            .tokens
            .walk_collect(0, |t| t.enclosed && is_free_text(t), |t| t.id == title);
        self.tag_release_group(&span, "before_title")
    }

    /// The rightmost bracket group holding nothing recognized:
    /// `Title [HDTV][Some Group].mkv`.
    fn group_in_brackets(&mut self) -> bool {
        let closers = self
            .tokens
            .filter(|t| t.is_closing_bracket() && t.value != ")");

        for &close in closers.iter().rev() {
            let Some(close_index) = self.tokens.index_of(close) else {
                continue;
            };
            let close_value = self.tokens.get(close).value.clone();
            let Some(open) = self.tokens.first_before(close_index, |t| {
                t.is_opening_bracket() && is_matching_bracket(&t.value, &close_value)
            }) else {
                continue;
            };
            let Some(open_index) = self.tokens.index_of(open) else {
                continue;
            };

            let span = self.tokens.walk_collect(
                open_index + 1,
                |t| !t.is_separator() && !t.is_delimiter(),
                |t| t.id == close,
            );
            if let [single] = span.as_slice() {
                if self.tokens.get(*single).rune_count() == 1 {
                    continue;
                }
            }
            let claimed = span.iter().any(|&id| {
                let token = self.tokens.get(id);
                token.is_keyword() || token.kind == TokenKind::Crc32 || token.metadata.is_some()
            });
            if claimed {
                continue;
            }
            if self.tag_release_group(&span, "brackets") {
                return true;
            }
        }
        false
    }

    /// Last resort: the last loose word in the second half of the name.
    fn group_last_word(&mut self) -> bool {
        let words = self
            .tokens
            .filter(|t| is_free_text(t) && t.kind == TokenKind::Word);
        let Some(&last) = words.last() else {
            return false;
        };
        if self.tokens.is_in_first_half(last) {
            return false;
        }
        self.tag_release_group(&[last], "last_word")
    }

    fn tag_release_group(&mut self, span: &[TokenId], strategy: &str) -> bool {
        let group = match span {
            [] => return false,
            [single] => {
                self.tokens.get_mut(*single).set_metadata(MetadataCategory::ReleaseGroup);
                *single
            }
            [first, .., last] => {
                match self
                    .tokens
                    .combine(*first, *last, MetadataCategory::ReleaseGroup)
                {
                    Some(group) => group,
                    None => return false,
                }
            }
        };
        debug!(pass = "release_group", strategy, value = %self.tokens.get(group).value, "found release group");
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_title_all_enclosed_second_group() {
        let m = parse("[Group][Some Title][BDRIP][720p].mkv");
        assert_eq!(m.title, "Some Title");
        assert_eq!(m.release_group, "Group");
        assert!(m.episode_number.is_empty());
    }

    #[test]
    fn test_title_before_unenclosed_episode() {
        let m = parse("[Group][Some Title] 05 [720p].mkv");
        assert_eq!(m.title, "Some Title");
        assert_eq!(m.episode_number, vec!["05"]);
        assert_eq!(m.release_group, "Group");
    }

    #[test]
    fn test_parenthesized_episode_title_is_group() {
        let m = parse("[Group][Title][01](Doki).mkv");
        assert_eq!(m.episode_number, vec!["01"]);
        assert_eq!(m.title, "Title");
        assert_eq!(m.release_group, "Doki");
        assert!(m.episode_title.is_empty());
    }

    #[test]
    fn test_anime_type_kept_in_title() {
        let m = parse("[Group] Title OVA [720p].mkv");
        assert_eq!(m.title, "Title OVA");
        assert_eq!(m.anime_type, vec!["OVA"]);
    }

    #[test]
    fn test_release_group_last_word() {
        let m = parse("Title - 01 (Doki).mkv");
        assert_eq!(m.title, "Title");
        assert_eq!(m.episode_number, vec!["01"]);
        assert_eq!(m.release_group, "Doki");
    }

    #[test]
    fn test_release_group_in_trailing_brackets() {
        let m = parse("Title - 04 [HDTV][Some Group].mkv");
        assert_eq!(m.episode_number, vec!["04"]);
        assert_eq!(m.release_group, "Some Group");
        assert_eq!(m.source, vec!["HDTV"]);
    }

    #[test]
    fn test_episode_title_stops_at_bracket() {
        let m = parse("[Group] Title - 12 - Last Stand [1080p][ABCD1234].mkv");
        assert_eq!(m.episode_title, "Last Stand");
        assert_eq!(m.file_checksum, "ABCD1234");
    }
}
