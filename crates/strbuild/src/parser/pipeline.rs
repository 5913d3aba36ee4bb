//! Modifier pipeline parser.
//!
//! Turns the text after a placeholder's modifier separator, such as
//! `date('Y-m-d')|escape(type: js)`, into an ordered list of
//! [`ModifierCall`]s. The parser is lenient: malformed numbers, stray
//! punctuation and unbalanced brackets never fail, and anything still open
//! at end of input is committed as if it had been closed.


use serde::Serialize;

use crate::parser::lexer::{Token, tokenize};
use crate::types::{Args, Literal};

/// One stage of a modifier pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifierCall {
    pub name: String,
    pub args: Args,
}

impl ModifierCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Args::new(),
        }
    }

    pub fn with_args(name: impl Into<String>, args: Args) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A stage of pipeline text located by [`split_stages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage<'a> {
    /// Byte offset of the stage within the pipeline text.
    pub offset: usize,
    pub text: &'a str,
}

/// Parses pipeline text into modifier calls.
///
/// Stages are separated by `separator`; separators inside quoted strings or
/// inside parentheses and brackets do not split. Stages without a modifier
/// name are dropped.
///
/// # Example
///
/// ```
/// use strbuild::{Literal, parse_pipeline};
///
/// let calls = parse_pipeline("date('Y-m-d')|escape(type: js)", "|");
/// assert_eq!(calls[0].name, "date");
/// assert_eq!(calls[0].args.get("format", 0), Some(&Literal::String("Y-m-d".into())));
/// assert_eq!(calls[1].args.named("type"), Some(&Literal::Bare("js".into())));
/// ```
pub fn parse_pipeline(text: &str, separator: &str) -> Vec<ModifierCall> {
    split_stages(text, separator)
        .into_iter()
        .filter_map(|stage| parse_stage(stage.text))
        .collect()
}

/// Splits pipeline text into stages, respecting quotes and nesting.
pub fn split_stages<'a>(text: &'a str, separator: &str) -> Vec<Stage<'a>> {
    let mut stages = Vec::new();
    if separator.is_empty() {
        stages.push(Stage { offset: 0, text });
        return stages;
    }

    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut stage_start = 0;
    let mut index = 0;
    while let Some(c) = text[index..].chars().next() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            index += c.len_utf8();
            continue;
        }
        if depth == 0 && text[index..].starts_with(separator) {
            stages.push(Stage {
                offset: stage_start,
                text: &text[stage_start..index],
            });
            index += separator.len();
            stage_start = index;
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += c.len_utf8();
    }
    stages.push(Stage {
        offset: stage_start,
        text: &text[stage_start..],
    });
    stages
}

/// Parses a single stage: `name` or `name(arguments)`.
fn parse_stage(text: &str) -> Option<ModifierCall> {
    let mut name: Option<String> = None;
    let mut in_args = false;
    let mut assembler = ArgumentAssembler::default();

    for spanned in tokenize(text) {
        let token = spanned.token;
        if !in_args {
            match token {
                Token::Ident(ident) if name.is_none() => name = Some(ident.to_string()),
                Token::Punct('(') if name.is_some() => in_args = true,
                _ => {}
            }
            continue;
        }
        if assembler.feed(token) == Flow::Closed {
            break;
        }
    }

    let name = name?;
    Some(ModifierCall::with_args(name, assembler.finish()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Open,
    Closed,
}

/// State machine assembling the arguments between `(` and `)`.
#[derive(Default)]
struct ArgumentAssembler {
    args: Args,
    /// Parameter name of the argument being assembled.
    key: Option<String>,
    /// Value of the argument being assembled; later values replace earlier ones.
    value: Option<Literal>,
    /// Bare word or path whose role (key or value) is not yet known.
    path: Option<String>,
    /// Set after `::` while a path is pending.
    joining: bool,
    negate: bool,
    /// Open `[` frames, innermost last.
    lists: Vec<Vec<Literal>>,
}

impl ArgumentAssembler {
    fn feed(&mut self, token: Token<'_>) -> Flow {
        match token {
            Token::Whitespace => {}
            Token::Ident(ident) => self.ident(ident),
            Token::DoubleColon => {
                if let Some(path) = &mut self.path {
                    path.push_str("::");
                    self.joining = true;
                }
            }
            Token::Int(text) => {
                let literal = match text.parse::<i64>() {
                    Ok(n) if self.negate => Literal::Int(-n),
                    Ok(n) => Literal::Int(n),
                    Err(_) => Literal::Float(self.signed(text.parse().unwrap_or_default())),
                };
                self.value(literal);
            }
            Token::Float(text) => {
                let literal = Literal::Float(self.signed(text.parse().unwrap_or_default()));
                self.value(literal);
            }
            Token::Str(text) | Token::UnterminatedStr(text) => self.value(Literal::String(text)),
            Token::Punct('-') => self.negate = true,
            Token::Punct(':' | '=') => {
                if self.lists.is_empty() && self.key.is_none() {
                    self.key = self.path.take();
                    self.joining = false;
                }
            }
            Token::Punct('[') => {
                self.settle_path();
                self.lists.push(Vec::new());
            }
            Token::Punct(']') => self.close_list(),
            Token::Punct(',') => {
                if self.lists.is_empty() {
                    self.commit();
                } else {
                    self.settle_path();
                }
            }
            Token::Punct(')') => {
                self.commit();
                return Flow::Closed;
            }
            Token::Punct(_) => {}
        }
        Flow::Open
    }

    fn finish(mut self) -> Args {
        self.commit();
        self.args
    }

    fn ident(&mut self, ident: &str) {
        if self.joining {
            if let Some(path) = &mut self.path {
                path.push_str(ident);
            }
            self.joining = false;
            return;
        }
        self.settle_path();
        if let Some(scalar) = scalar_word(ident) {
            self.value(scalar);
            return;
        }
        self.path = Some(ident.to_string());
    }

    fn signed(&self, value: f64) -> f64 {
        if self.negate { -value } else { value }
    }

    /// Records a value for the current argument or list element.
    fn value(&mut self, literal: Literal) {
        self.settle_path();
        self.negate = false;
        match self.lists.last_mut() {
            Some(items) => items.push(literal),
            None => self.value = Some(literal),
        }
    }

    /// Decides the role of a pending bare path because another token followed
    /// it: at top level it names the argument, inside a list it is an element.
    fn settle_path(&mut self) {
        self.joining = false;
        let Some(path) = self.path.take() else {
            return;
        };
        match self.lists.last_mut() {
            Some(items) => items.push(Literal::Bare(path)),
            None if self.key.is_none() && self.value.is_none() => self.key = Some(path),
            None => {}
        }
    }

    fn close_list(&mut self) {
        let Some(items) = self.lists.last_mut() else {
            return;
        };
        if let Some(path) = self.path.take() {
            items.push(Literal::Bare(path));
        }
        self.joining = false;
        if let Some(items) = self.lists.pop() {
            self.value(Literal::List(items));
        }
    }

    /// Commits the current argument. A key without a value commits nothing.
    fn commit(&mut self) {
        while !self.lists.is_empty() {
            self.close_list();
        }
        if let Some(path) = self.path.take() {
            if self.value.is_none() {
                self.value = Some(Literal::Bare(path));
            }
        }
        if let Some(value) = self.value.take() {
            match self.key.take() {
                Some(key) => self.args.insert(key, value),
                None => self.args.push(value),
            }
        }
        self.key = None;
        self.joining = false;
        self.negate = false;
    }
}

fn scalar_word(word: &str) -> Option<Literal> {
    match word {
        "true" | "TRUE" => Some(Literal::Bool(true)),
        "false" | "FALSE" => Some(Literal::Bool(false)),
        "null" | "NULL" => Some(Literal::Null),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_texts(text: &str, separator: &str) -> Vec<String> {
        split_stages(text, separator)
            .into_iter()
            .map(|stage| stage.text.to_string())
            .collect()
    }

    #[test]
    fn splits_on_separator_outside_quotes_and_parens() {
        assert_eq!(
            stage_texts("a('x|y')|b(1, [2|3])|c", "|"),
            vec!["a('x|y')", "b(1, [2|3])", "c"]
        );
    }

    #[test]
    fn splits_on_multi_character_separator() {
        assert_eq!(stage_texts("a=>b", "=>"), vec!["a", "b"]);
    }

    #[test]
    fn stage_offsets_point_into_text() {
        let stages = split_stages("ab|cd", "|");
        assert_eq!(stages[1].offset, 3);
    }

    #[test]
    fn stage_without_name_is_dropped() {
        assert_eq!(parse_pipeline("|('x')|e", "|").len(), 1);
    }
}
