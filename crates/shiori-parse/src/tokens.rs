use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::keyword::KeywordCategory;
use crate::token::{MetadataCategory, Token, TokenCategory, TokenId, TokenKind};

/// Ordered token stream of a single parse.
///
/// Tokens live in an append-only arena and the stream holds their handles,
/// so a [`TokenId`] stays valid while neighbours are split, merged or removed.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    arena: Vec<Token>,
    order: Vec<TokenId>,
}

impl Tokens {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut stream = Self::default();
        for token in tokens {
            let id = stream.alloc(token);
            stream.order.push(id);
        }
        stream
    }

    fn alloc(&mut self, mut token: Token) -> TokenId {
        let id = TokenId(self.arena.len() as u32);
        token.id = id;
        self.arena.push(token);
        id
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: TokenId) -> &Token {
        &self.arena[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.arena[id.0 as usize]
    }

    /// Position of `id` in the stream, `None` once it has been removed.
    pub fn index_of(&self, id: TokenId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TokenId> {
        self.order.get(index).copied()
    }

    pub fn at(&self, index: usize) -> Option<&Token> {
        self.id_at(index).map(|id| self.get(id))
    }

    /// Snapshot of the current order, for passes that rewrite while walking.
    pub fn ids(&self) -> Vec<TokenId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        self.order.iter().map(|&id| self.get(id))
    }

    pub fn first(&self) -> Option<&Token> {
        self.at(0)
    }

    pub fn last(&self) -> Option<&Token> {
        self.order.last().map(|&id| self.get(id))
    }

    // ── Rewrites ────────────────────────────────────────────────

    /// Replace `id` in place with `tokens`. The first replacement keeps `id`.
    pub fn replace(&mut self, id: TokenId, tokens: Vec<Token>) -> Vec<TokenId> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        let mut ids = Vec::with_capacity(tokens.len());
        for (i, mut token) in tokens.into_iter().enumerate() {
            if i == 0 {
                token.id = id;
                self.arena[id.0 as usize] = token;
                ids.push(id);
            } else {
                ids.push(self.alloc(token));
            }
        }
        if ids.is_empty() {
            self.order.remove(index);
        } else {
            self.order.splice(index + 1..index + 1, ids[1..].iter().copied());
        }
        ids
    }

    pub fn remove(&mut self, id: TokenId) {
        if let Some(index) = self.index_of(id) {
            self.order.remove(index);
        }
    }

    /// Merge `N` `.` `M` into a single number-like token `N.M`.
    ///
    /// Version strings such as `1.2.3` are left alone.
    pub fn merge_decimal(&mut self, id: TokenId) -> bool {
        if !self.get(id).is_number_kind() {
            return false;
        }
        let Some(dot) = self.next(id).filter(|&d| self.get(d).is_dot_delimiter()) else {
            return false;
        };
        let Some(fraction) = self.next(dot).filter(|&n| self.get(n).is_number_kind()) else {
            return false;
        };
        let continues = self.next(fraction).is_some_and(|after| {
            self.get(after).is_dot_delimiter()
                && self.next(after).is_some_and(|n| self.get(n).is_number_kind())
        });
        let continued = self.prev(id).is_some_and(|before| {
            self.get(before).is_dot_delimiter()
                && self.prev(before).is_some_and(|n| self.get(n).is_number_kind())
        });
        if continues || continued {
            return false;
        }

        let value = format!("{}.{}", self.get(id).value, self.get(fraction).value);
        let token = self.get_mut(id);
        token.value = value;
        token.kind = TokenKind::NumberLike;
        self.remove(dot);
        self.remove(fraction);
        true
    }

    pub fn merge_decimals(&mut self) {
        for id in self.ids() {
            if self.index_of(id).is_some() {
                self.merge_decimal(id);
            }
        }
    }

    /// Merge the span `begin..=end` into one known token tagged `category`.
    ///
    /// Brackets other than parentheses are dropped. When the span opens a
    /// parenthesis, the closing one after it is pulled in. Delimiters become
    /// spaces when they are all alike; otherwise only a delimiter used by
    /// more than half of the span does. Underscores always become spaces.
    /// The merged token keeps `begin`'s handle and enclosed flag.
    pub fn combine(
        &mut self,
        begin: TokenId,
        end: TokenId,
        category: MetadataCategory,
    ) -> Option<TokenId> {
        let start = self.index_of(begin)?;
        let mut stop = self.index_of(end)?;
        if start > stop {
            return None;
        }

        let opens_paren = self.order[start..=stop]
            .iter()
            .any(|&id| self.get(id).value == "(");
        if opens_paren {
            if let Some((next, _)) = self.next_skipping_delimiters(end) {
                let next_token = self.get(next);
                if next_token.is_closing_bracket() && next_token.value == ")" {
                    stop = self.index_of(next)?;
                }
            }
        }

        let span: Vec<TokenId> = self.order[start..=stop].to_vec();
        let mut delimiter_counts: HashMap<&str, usize> = HashMap::new();
        for &id in &span {
            let token = self.get(id);
            if token.is_delimiter() {
                *delimiter_counts.entry(token.value.as_str()).or_default() += 1;
            }
        }
        let uniform = delimiter_counts.len() == 1;

        let mut value = String::new();
        for &id in &span {
            let token = self.get(id);
            if (token.is_opening_bracket() || token.is_closing_bracket())
                && token.value != "("
                && token.value != ")"
            {
                continue;
            }
            if token.is_delimiter() {
                let count = delimiter_counts.get(token.value.as_str()).copied().unwrap_or(0);
                if uniform || count > span.len() / 2 || token.value == "_" {
                    value.push(' ');
                    continue;
                }
            }
            value.push_str(&token.value);
        }

        let enclosed = self.get(begin).enclosed;
        let mut merged = Token::new(value, TokenCategory::Known)
            .with_kind(TokenKind::Word)
            .with_metadata(category);
        merged.enclosed = enclosed;
        merged.id = begin;
        self.arena[begin.0 as usize] = merged;
        self.order.drain(start + 1..=stop);

        Some(begin)
    }

    // ── Navigation ──────────────────────────────────────────────

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.id_at(self.index_of(id)? + 1)
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.id_at(self.index_of(id)?.checked_sub(1)?)
    }

    /// Next non-delimiter token and the number of delimiters skipped to reach it.
    pub fn next_skipping_delimiters(&self, id: TokenId) -> Option<(TokenId, usize)> {
        let index = self.index_of(id)?;
        let mut skipped = 0;
        for &other in &self.order[index + 1..] {
            if !self.get(other).is_delimiter() {
                return Some((other, skipped));
            }
            skipped += 1;
        }
        None
    }

    /// Previous non-delimiter token and the number of delimiters skipped to reach it.
    pub fn prev_skipping_delimiters(&self, id: TokenId) -> Option<(TokenId, usize)> {
        let index = self.index_of(id)?;
        let mut skipped = 0;
        for &other in self.order[..index].iter().rev() {
            if !self.get(other).is_delimiter() {
                return Some((other, skipped));
            }
            skipped += 1;
        }
        None
    }

    // ── Position checks ─────────────────────────────────────────

    pub fn is_first(&self, id: TokenId) -> bool {
        self.index_of(id) == Some(0)
    }

    pub fn is_last(&self, id: TokenId) -> bool {
        self.order.last() == Some(&id)
    }

    /// `( {token} )`, delimiters allowed on either side.
    pub fn is_between_parentheses(&self, id: TokenId) -> bool {
        let left = self.prev_skipping_delimiters(id).is_some_and(|(prev, _)| {
            let prev = self.get(prev);
            prev.is_opening_bracket() && prev.value == "("
        });
        let right = self.next_skipping_delimiters(id).is_some_and(|(next, _)| {
            let next = self.get(next);
            next.is_closing_bracket() && next.value == ")"
        });
        left && right
    }

    /// Standing apart from its neighbours.
    ///
    /// `" 01.mkv"`, `" 01 "` and `" 01["` are isolated; `" 01-"` is not and
    /// neither is the `11` of `"1.11 "`.
    pub fn is_isolated(&self, id: TokenId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }

        let left = match self.prev(id) {
            None => true,
            Some(prev) => {
                let prev_token = self.get(prev);
                match self.prev(prev) {
                    None => true,
                    Some(prev_prev) => {
                        prev_token.value != "." || !self.get(prev_prev).is_number_kind()
                    }
                }
            }
        };

        let right = match self.next(id) {
            None => true,
            Some(next) => {
                let next = self.get(next);
                next.is_delimiter() || next.is_opening_bracket()
            }
        };

        left && right
    }

    pub fn is_in_first_half(&self, id: TokenId) -> bool {
        self.index_of(id).is_some_and(|index| index <= self.len() / 2)
    }

    /// A file-info keyword from the second half of the stream appears before `id`.
    pub fn is_after_file_metadata(&self, id: TokenId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let half = self.len() / 2;
        self.order[..index]
            .iter()
            .enumerate()
            .any(|(i, &other)| i > half && self.get(other).is_file_info_keyword())
    }

    /// `-{token}` or `- {token}`.
    pub fn dash_before(&self, id: TokenId) -> bool {
        self.prev_skipping_delimiters(id)
            .is_some_and(|(prev, _)| self.get(prev).is_dash_separator())
    }

    /// `{token}-` or `{token} -`.
    pub fn dash_after(&self, id: TokenId) -> bool {
        self.next_skipping_delimiters(id)
            .is_some_and(|(next, _)| self.get(next).is_dash_separator())
    }

    /// Every unknown token longer than one character sits inside brackets,
    /// as in `[Group][Title][01].mkv`.
    pub fn all_unknown_enclosed(&self) -> bool {
        self.iter()
            .filter(|t| !t.has_metadata(MetadataCategory::FileExtension))
            .all(|t| !t.is_unknown() || t.enclosed || t.rune_count() <= 1)
    }

    // ── Ranges ──────────────────────────────────────────────────

    /// `01-{token}` or `1 ~ {token}`, returning `(separator, number)`.
    ///
    /// `11 - {token}` is not a range, `01 - {token}` is.
    pub fn episode_range_before(&self, id: TokenId) -> Option<(TokenId, TokenId)> {
        let (ids, skipped) =
            self.sequence_before(id, &[TokenCategory::Separator, TokenCategory::Unknown], true)?;
        let (separator, number) = (ids[0], ids[1]);
        let number_token = self.get(number);
        if !number_token.is_number_or_like_kind() || number_token.is_keyword() {
            return None;
        }
        if skipped > 0 && self.get(separator).is_dash_separator() && !number_token.is_zero_padded() {
            return None;
        }
        Some((separator, number))
    }

    /// `01-{token}`, or `01 - {token}` when `with_delimiters` is set.
    pub fn number_range_before(
        &self,
        id: TokenId,
        with_delimiters: bool,
    ) -> Option<(TokenId, TokenId)> {
        let (ids, _) = self.sequence_before(
            id,
            &[TokenCategory::Separator, TokenCategory::Unknown],
            with_delimiters,
        )?;
        let number = self.get(ids[1]);
        (number.is_number_or_like_kind() && !number.is_keyword()).then_some((ids[0], ids[1]))
    }

    /// `{token}-02`, or `{token} - 02` when `with_delimiters` is set.
    /// Only a plain number closes the range.
    pub fn number_range_after(
        &self,
        id: TokenId,
        with_delimiters: bool,
    ) -> Option<(TokenId, TokenId)> {
        let (ids, _) = self.sequence_after(
            id,
            &[TokenCategory::Separator, TokenCategory::Unknown],
            with_delimiters,
        )?;
        self.get(ids[1]).is_number_kind().then_some((ids[0], ids[1]))
    }

    // ── Collection ──────────────────────────────────────────────

    /// Walk forward from `start` (inclusive) collecting tokens matching
    /// `pred` until `stop` matches. Nothing is collected when `start` is the
    /// last position.
    pub fn walk_collect(
        &self,
        start: usize,
        pred: impl Fn(&Token) -> bool,
        stop: impl Fn(&Token) -> bool,
    ) -> Vec<TokenId> {
        if start + 1 >= self.len() {
            return Vec::new();
        }
        let mut collected = Vec::new();
        for &id in &self.order[start..] {
            let token = self.get(id);
            if stop(token) {
                break;
            }
            if pred(token) {
                collected.push(id);
            }
        }
        collected
    }

    /// Walk backward from `start` (inclusive) to the first token. Collected
    /// handles come out in walking order, i.e. reversed.
    pub fn walk_back_collect(
        &self,
        start: usize,
        pred: impl Fn(&Token) -> bool,
        stop: impl Fn(&Token) -> bool,
    ) -> Vec<TokenId> {
        if start == 0 || start >= self.len() {
            return Vec::new();
        }
        let mut collected = Vec::new();
        for &id in self.order[..=start].iter().rev() {
            let token = self.get(id);
            if stop(token) {
                break;
            }
            if pred(token) {
                collected.push(id);
            }
        }
        collected
    }

    /// First token after position `index` (exclusive) matching `pred`.
    pub fn first_after(&self, index: usize, pred: impl Fn(&Token) -> bool) -> Option<TokenId> {
        self.order
            .iter()
            .skip(index + 1)
            .copied()
            .find(|&id| pred(self.get(id)))
    }

    /// Closest token before position `index` (exclusive) matching `pred`.
    pub fn first_before(&self, index: usize, pred: impl Fn(&Token) -> bool) -> Option<TokenId> {
        let end = index.min(self.len());
        self.order[..end]
            .iter()
            .rev()
            .copied()
            .find(|&id| pred(self.get(id)))
    }

    /// Tokens right after `id` whose categories follow `categories`, and
    /// the number of delimiters skipped in between.
    pub fn sequence_after(
        &self,
        id: TokenId,
        categories: &[TokenCategory],
        skip_delimiters: bool,
    ) -> Option<(Vec<TokenId>, usize)> {
        let index = self.index_of(id)?;
        self.match_sequence(self.order[index + 1..].iter().copied(), categories, skip_delimiters)
    }

    /// Tokens right before `id`, nearest first, whose categories follow `categories`.
    pub fn sequence_before(
        &self,
        id: TokenId,
        categories: &[TokenCategory],
        skip_delimiters: bool,
    ) -> Option<(Vec<TokenId>, usize)> {
        let index = self.index_of(id)?;
        self.match_sequence(
            self.order[..index].iter().rev().copied(),
            categories,
            skip_delimiters,
        )
    }

    fn match_sequence(
        &self,
        ids: impl Iterator<Item = TokenId>,
        categories: &[TokenCategory],
        skip_delimiters: bool,
    ) -> Option<(Vec<TokenId>, usize)> {
        let mut collected = Vec::with_capacity(categories.len());
        let mut skipped = 0;
        for id in ids {
            if collected.len() == categories.len() {
                break;
            }
            let token = self.get(id);
            if skip_delimiters && token.is_delimiter() {
                skipped += 1;
                continue;
            }
            if token.category != categories[collected.len()] {
                break;
            }
            collected.push(id);
        }
        (collected.len() == categories.len()).then_some((collected, skipped))
    }

    /// The tokens directly after `id` spell out `values`, ignoring case.
    pub fn peek_values_after(&self, id: TokenId, values: &[&str]) -> Option<Vec<TokenId>> {
        let index = self.index_of(id)?;
        let candidates = self.order.get(index + 1..index + 1 + values.len())?;
        candidates
            .iter()
            .zip(values)
            .all(|(&other, expected)| self.get(other).value.to_uppercase() == expected.to_uppercase())
            .then(|| candidates.to_vec())
    }

    pub fn filter(&self, pred: impl Fn(&Token) -> bool) -> Vec<TokenId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| pred(self.get(id)))
            .collect()
    }

    pub fn with_metadata(&self, category: MetadataCategory) -> Vec<TokenId> {
        self.filter(|t| t.has_metadata(category))
    }

    pub fn with_keyword(&self, category: KeywordCategory) -> Vec<TokenId> {
        self.filter(|t| t.has_keyword(category))
    }

    pub fn dump(&self) -> TokenDump {
        TokenDump {
            tokens: self
                .iter()
                .map(|t| TokenRow {
                    value: t.value.clone(),
                    category: t.category,
                    kind: t.kind,
                    keyword: t.keyword.map(|k| k.category),
                    metadata: t.metadata,
                    enclosed: t.enclosed,
                })
                .collect(),
        }
    }
}

/// Snapshot of the final token stream, for debugging and test assertions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDump {
    pub tokens: Vec<TokenRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRow {
    pub value: String,
    pub category: TokenCategory,
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<KeywordCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataCategory>,
    pub enclosed: bool,
}

impl TokenDump {
    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }

    pub fn find(&self, value: &str) -> Option<&TokenRow> {
        self.tokens.iter().find(|t| t.value == value)
    }
}

impl fmt::Display for TokenDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.tokens {
            let quoted = format!("{:?}", row.value);
            write!(f, "{quoted:<14} {:<16} {:<24}", format!("{:?}", row.category), format!("{:?}", row.kind))?;
            match row.keyword {
                Some(keyword) => write!(f, " kw: {:<20}", format!("{keyword:?}"))?,
                None => write!(f, " kw: {:<20}", "-")?,
            }
            match row.metadata {
                Some(metadata) => write!(f, " m: {:<18}", format!("{metadata:?}"))?,
                None => write!(f, " m: {:<18}", "-")?,
            }
            writeln!(f, " enclosed: {}", row.enclosed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn stream(input: &str) -> Tokens {
        let mut tokens = Tokens::new(tokenize(input));
        tokens.merge_decimals();
        tokens
    }

    fn id_of(tokens: &Tokens, value: &str) -> TokenId {
        tokens.iter().find(|t| t.value == value).unwrap().id
    }

    fn values(tokens: &Tokens) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn test_replace_keeps_first_handle() {
        let mut tokens = stream("Title S01E02 end");
        let id = id_of(&tokens, "S01E02");
        let ids = tokens.replace(
            id,
            vec![
                Token::new("S", TokenCategory::Known),
                Token::new("01", TokenCategory::Unknown),
                Token::new("E", TokenCategory::Known),
                Token::new("02", TokenCategory::Unknown),
            ],
        );
        assert_eq!(ids[0], id);
        assert_eq!(ids.len(), 4);
        assert_eq!(values(&tokens), vec!["Title", " ", "S", "01", "E", "02", " ", "end"]);
        assert_eq!(tokens.next(ids[1]), Some(ids[2]));
    }

    #[test]
    fn test_merge_decimals() {
        let tokens = stream("Title 12.5 [720p]");
        assert_eq!(values(&tokens), vec!["Title", " ", "12.5", " ", "[", "720p", "]"]);
        let merged = tokens.get(id_of(&tokens, "12.5"));
        assert_eq!(merged.kind, TokenKind::NumberLike);

        let tokens = stream("Title 01.mkv");
        assert!(values(&tokens).contains(&"01"));

        let tokens = stream("Tool 1.2.3");
        assert_eq!(values(&tokens), vec!["Tool", " ", "1", ".", "2", ".", "3"]);
    }

    #[test]
    fn test_skipping_delimiters() {
        let tokens = stream("Title  -  01");
        let number = id_of(&tokens, "01");
        let (dash, skipped) = tokens.prev_skipping_delimiters(number).unwrap();
        assert_eq!(tokens.get(dash).value, "-");
        assert_eq!(skipped, 2);
        assert!(tokens.dash_before(number));
        assert!(!tokens.dash_after(number));
    }

    #[test]
    fn test_isolation() {
        let tokens = stream("Title 01.mkv");
        assert!(tokens.is_isolated(id_of(&tokens, "01")));

        let tokens = stream("Title 01-x");
        assert!(!tokens.is_isolated(id_of(&tokens, "01")));

        let tokens = stream("Title 01 end");
        assert!(tokens.is_isolated(id_of(&tokens, "01")));
    }

    #[test]
    fn test_sequence_after() {
        let tokens = stream("ED 1 ~ 3");
        let one = id_of(&tokens, "1");
        let (ids, skipped) = tokens
            .sequence_after(one, &[TokenCategory::Separator, TokenCategory::Unknown], true)
            .unwrap();
        assert_eq!(tokens.get(ids[1]).value, "3");
        assert_eq!(skipped, 2);
        assert!(tokens
            .sequence_after(one, &[TokenCategory::Separator, TokenCategory::Unknown], false)
            .is_none());
    }

    #[test]
    fn test_number_ranges() {
        let tokens = stream("Title 01-03 end");
        let first = id_of(&tokens, "01");
        let last = id_of(&tokens, "03");
        assert_eq!(tokens.number_range_after(first, false).map(|r| r.1), Some(last));
        assert_eq!(tokens.number_range_before(last, false).map(|r| r.1), Some(first));
        assert_eq!(tokens.episode_range_before(last).map(|r| r.1), Some(first));

        let tokens = stream("Title 11 - 12");
        assert!(tokens.episode_range_before(id_of(&tokens, "12")).is_none());
    }

    #[test]
    fn test_combine_uniform_delimiters() {
        let mut tokens = stream("Mobile_Suit_Gundam - 01");
        let begin = id_of(&tokens, "Mobile");
        let end = id_of(&tokens, "Gundam");
        let merged = tokens.combine(begin, end, MetadataCategory::Title).unwrap();
        assert_eq!(merged, begin);
        let token = tokens.get(merged);
        assert_eq!(token.value, "Mobile Suit Gundam");
        assert_eq!(token.category, TokenCategory::Known);
        assert_eq!(values(&tokens)[0], "Mobile Suit Gundam");
    }

    #[test]
    fn test_combine_majority_delimiter() {
        let mut tokens = stream("Evangelion.1.11 You Are Not Alone [x]");
        let begin = id_of(&tokens, "Evangelion");
        let end = id_of(&tokens, "Alone");
        tokens.combine(begin, end, MetadataCategory::Title).unwrap();
        assert_eq!(tokens.get(begin).value, "Evangelion.1.11 You Are Not Alone");
    }

    #[test]
    fn test_combine_pulls_in_closing_parenthesis() {
        let mut tokens = stream("Title (TV) [x]");
        let begin = id_of(&tokens, "Title");
        let end = id_of(&tokens, "TV");
        tokens.combine(begin, end, MetadataCategory::Title).unwrap();
        assert_eq!(tokens.get(begin).value, "Title (TV)");
    }

    #[test]
    fn test_peek_values_after() {
        let tokens = stream("Blu-ray");
        let blu = id_of(&tokens, "Blu");
        assert_eq!(tokens.peek_values_after(blu, &["-", "RAY"]).map(|v| v.len()), Some(2));
        assert!(tokens.peek_values_after(blu, &[" ", "RAY"]).is_none());
        assert!(tokens.peek_values_after(blu, &["-", "RAY", "X"]).is_none());
    }

    #[test]
    fn test_all_unknown_enclosed() {
        assert!(stream("[Group][Title][01].mkv").all_unknown_enclosed());
        assert!(!stream("[Group] Title - 01.mkv").all_unknown_enclosed());
    }

    #[test]
    fn test_dump_display() {
        let dump = stream("[A] B").dump();
        assert_eq!(dump.values(), vec!["[", "A", "]", " ", "B"]);
        assert!(dump.find("A").unwrap().enclosed);
        let table = dump.to_string();
        assert_eq!(table.lines().count(), 5);
    }
}
