//! Raw token lexer for modifier argument text using winnow.
//!
//! The lexer never fails: any character that does not start a recognised
//! token is emitted as [`Token::Punct`]. Unterminated string literals are
//! reported as [`Token::UnterminatedStr`] so that callers can stay lenient
//! while lint can still flag them.

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

/// A raw token with no grammar attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Whitespace,
    /// Identifier or namespace path segment (`date`, `\app\Format`).
    Ident(&'a str),
    Int(&'a str),
    Float(&'a str),
    /// Quoted string with escapes resolved.
    Str(String),
    /// Quoted string that reached end of input before its closing quote.
    UnterminatedStr(String),
    DoubleColon,
    Punct(char),
}

/// A token together with its byte offset in the lexed text.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'a> {
    pub offset: usize,
    pub token: Token<'a>,
}

/// Splits `text` into tokens, including whitespace.
pub fn tokenize(text: &str) -> Vec<Spanned<'_>> {
    let mut rest = text;
    let mut tokens = Vec::new();
    while !rest.is_empty() {
        let offset = text.len() - rest.len();
        let Ok(token) = token.parse_next(&mut rest) else {
            break;
        };
        tokens.push(Spanned { offset, token });
    }
    tokens
}

fn token<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    alt((
        whitespace,
        number,
        string_literal,
        "::".value(Token::DoubleColon),
        identifier,
        any.map(Token::Punct),
    ))
    .parse_next(input)
}

fn whitespace<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    take_while(1.., char::is_whitespace)
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse an unsigned integer or float: `12`, `1.5`, `2e3`, `1.5E-2`.
fn number<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    let text = (
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)?;
    if text.contains(['.', 'e', 'E']) {
        Ok(Token::Float(text))
    } else {
        Ok(Token::Int(text))
    }
}

/// Parse a single- or double-quoted string.
///
/// Inside either quote style `\\` and an escaped quote of the same style are
/// unescaped. Double-quoted strings additionally understand `\n`, `\r`, `\t`
/// and `\0`. Any other backslash sequence is kept verbatim.
fn string_literal<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    let quote = one_of(['\'', '"']).parse_next(input)?;
    let mut text = String::new();
    loop {
        match opt(any).parse_next(input)? {
            None => return Ok(Token::UnterminatedStr(text)),
            Some(c) if c == quote => return Ok(Token::Str(text)),
            Some('\\') => {
                let Some(escaped) = opt(any).parse_next(input)? else {
                    text.push('\\');
                    return Ok(Token::UnterminatedStr(text));
                };
                match (quote, escaped) {
                    (_, '\\') => text.push('\\'),
                    (q, c) if q == c => text.push(c),
                    ('"', 'n') => text.push('\n'),
                    ('"', 'r') => text.push('\r'),
                    ('"', 't') => text.push('\t'),
                    ('"', '0') => text.push('\0'),
                    (_, c) => {
                        text.push('\\');
                        text.push(c);
                    }
                }
            }
            Some(c) => text.push(c),
        }
    }
}

fn identifier<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    (one_of(is_ident_start), take_while(0.., is_ident_cont))
        .take()
        .map(Token::Ident)
        .parse_next(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '\\'
}

fn is_ident_cont(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<Token<'_>> {
        tokenize(text)
            .into_iter()
            .map(|spanned| spanned.token)
            .filter(|token| *token != Token::Whitespace)
            .collect()
    }

    #[test]
    fn lexes_call_with_mixed_arguments() {
        assert_eq!(
            kinds("date('Y-m-d', 12, -1.5)"),
            vec![
                Token::Ident("date"),
                Token::Punct('('),
                Token::Str("Y-m-d".to_string()),
                Token::Punct(','),
                Token::Int("12"),
                Token::Punct(','),
                Token::Punct('-'),
                Token::Float("1.5"),
                Token::Punct(')'),
            ]
        );
    }

    #[test]
    fn lexes_namespace_path_and_double_colon() {
        assert_eq!(
            kinds(r"\app\Format::class"),
            vec![
                Token::Ident(r"\app\Format"),
                Token::DoubleColon,
                Token::Ident("class"),
            ]
        );
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        assert_eq!(kinds("2e"), vec![Token::Int("2"), Token::Ident("e")]);
        assert_eq!(kinds("2e-3"), vec![Token::Float("2e-3")]);
    }

    #[test]
    fn unescapes_quotes_by_style() {
        assert_eq!(kinds(r"'it\'s'"), vec![Token::Str("it's".to_string())]);
        assert_eq!(kinds(r#""a\tb""#), vec![Token::Str("a\tb".to_string())]);
        assert_eq!(kinds(r"'a\tb'"), vec![Token::Str(r"a\tb".to_string())]);
    }

    #[test]
    fn reports_unterminated_string() {
        assert_eq!(
            kinds("'open"),
            vec![Token::UnterminatedStr("open".to_string())]
        );
    }

    #[test]
    fn records_byte_offsets() {
        let offsets: Vec<usize> = tokenize("é (1)").iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3, 4, 5]);
    }
}
