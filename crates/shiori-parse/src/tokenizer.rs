use crate::token::{Token, TokenCategory, TokenKind};

/// Opening/closing bracket pairs, including CJK and fullwidth brackets.
const BRACKETS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('\u{300C}', '\u{300D}'), // 「」
    ('\u{300E}', '\u{300F}'), // 『』
    ('\u{3010}', '\u{3011}'), // 【】
    ('\u{FF08}', '\u{FF09}'), // （）
];

fn closing_for(c: char) -> Option<char> {
    BRACKETS
        .iter()
        .find(|(open, _)| *open == c)
        .map(|(_, close)| *close)
}

fn is_closing_bracket(c: char) -> bool {
    BRACKETS.iter().any(|(_, close)| *close == c)
}

/// Does `close` finish a group opened by `open`?
pub fn is_matching_bracket(open: &str, close: &str) -> bool {
    let mut open_chars = open.chars();
    let mut close_chars = close.chars();
    match (open_chars.next(), close_chars.next()) {
        (Some(o), Some(c)) => closing_for(o) == Some(c),
        _ => false,
    }
}

/// Hyphen-minus, plus, tilde, ampersand and the Unicode dashes.
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '+' | '~' | '&') || ('\u{2010}'..='\u{2015}').contains(&c)
}

/// Ideographic space (U+3000) is deliberately absent: it stays part of the
/// surrounding unknown run, so CJK titles keep their spacing.
fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '_' | '.' | '|' | ',')
}

fn category_of(c: char) -> TokenCategory {
    if closing_for(c).is_some() {
        TokenCategory::OpeningBracket
    } else if is_closing_bracket(c) {
        TokenCategory::ClosingBracket
    } else if is_separator(c) {
        TokenCategory::Separator
    } else if is_delimiter(c) {
        TokenCategory::Delimiter
    } else {
        TokenCategory::Unknown
    }
}

/// Split a filename into a stream of tokens covering every character of it.
///
/// Runs of unknown characters become one token; every bracket, separator and
/// delimiter is a token of its own. Tokens between a bracket pair are marked
/// enclosed, and every token gets its [`TokenKind`].
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut run = String::new();

    for c in input.chars() {
        let category = category_of(c);
        if category == TokenCategory::Unknown {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            tokens.push(Token::new(std::mem::take(&mut run), TokenCategory::Unknown));
        }
        tokens.push(Token::new(c.to_string(), category));
    }
    if !run.is_empty() {
        tokens.push(Token::new(run, TokenCategory::Unknown));
    }

    mark_enclosed(&mut tokens);

    for token in &mut tokens {
        token.kind = TokenKind::classify(&token.value);
    }

    tokens
}

/// Mark everything between the outermost opener and its partner as enclosed.
///
/// Nested openers are content of the outer group. A closer that does not
/// match the outer opener is ignored, so `[a (b] c)` encloses `a (b`.
fn mark_enclosed(tokens: &mut [Token]) {
    // (index of the opener, expected closer)
    let mut open: Option<(usize, char)> = None;

    for i in 0..tokens.len() {
        let Some(c) = tokens[i].value.chars().next() else {
            continue;
        };
        match (tokens[i].category, open) {
            (TokenCategory::OpeningBracket, None) => {
                if let Some(close) = closing_for(c) {
                    open = Some((i, close));
                }
            }
            (TokenCategory::ClosingBracket, Some((start, close))) if c == close => {
                for token in &mut tokens[start + 1..i] {
                    if matches!(
                        token.category,
                        TokenCategory::Unknown
                            | TokenCategory::OpeningBracket
                            | TokenCategory::ClosingBracket
                    ) {
                        token.enclosed = true;
                    }
                }
                open = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = tokenize("[SubsPlease] Sousou no Frieren - 14 (480p).mkv");
        assert_eq!(
            values(&tokens),
            vec![
                "[", "SubsPlease", "]", " ", "Sousou", " ", "no", " ", "Frieren", " ", "-", " ",
                "14", " ", "(", "480p", ")", ".", "mkv"
            ]
        );
        assert_eq!(tokens[0].category, TokenCategory::OpeningBracket);
        assert_eq!(tokens[1].category, TokenCategory::Unknown);
        assert!(tokens[1].enclosed);
        assert!(!tokens[4].enclosed);
        assert_eq!(tokens[10].category, TokenCategory::Separator);
        assert_eq!(tokens[12].kind, TokenKind::Number);
        assert_eq!(tokens[15].kind, TokenKind::PossibleVideoResolution);
        assert!(tokens[15].enclosed);
        assert_eq!(tokens[17].category, TokenCategory::Delimiter);
    }

    #[test]
    fn test_tokens_partition_input() {
        let input = "[Judas]_Spy×Family_(Season 1|Part 2)~【MBS】&「テスト」,end";
        let joined: String = tokenize(input).iter().map(|t| t.value.as_str()).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_nested_brackets_are_enclosed() {
        let tokens = tokenize("[Group (Sub)] Title");
        let sub = tokens.iter().find(|t| t.value == "Sub").unwrap();
        assert!(sub.enclosed);
        let inner_open = tokens.iter().find(|t| t.value == "(").unwrap();
        assert!(inner_open.enclosed);
        let title = tokens.iter().find(|t| t.value == "Title").unwrap();
        assert!(!title.enclosed);
    }

    #[test]
    fn test_unclosed_bracket_encloses_nothing() {
        let tokens = tokenize("[Group Title 01");
        assert!(tokens.iter().all(|t| !t.enclosed));
    }

    #[test]
    fn test_cjk_brackets() {
        let tokens = tokenize("【推しの子】 01");
        assert_eq!(tokens[0].category, TokenCategory::OpeningBracket);
        assert_eq!(tokens[1].value, "推しの子");
        assert!(tokens[1].enclosed);
        assert_eq!(tokens[2].category, TokenCategory::ClosingBracket);
    }

    #[test]
    fn test_ideographic_space_stays_in_run() {
        let tokens = tokenize("進撃の巨人\u{3000}完結編");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].category, TokenCategory::Unknown);
    }

    #[test]
    fn test_unicode_dashes_are_separators() {
        let tokens = tokenize("Title \u{2014} 03");
        assert_eq!(tokens[2].category, TokenCategory::Separator);
        assert!(tokens[2].is_dash_separator());
    }

    #[test]
    fn test_matching_brackets() {
        assert!(is_matching_bracket("[", "]"));
        assert!(is_matching_bracket("【", "】"));
        assert!(!is_matching_bracket("(", "]"));
        assert!(!is_matching_bracket("", "]"));
    }
}
