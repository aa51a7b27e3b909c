// ABOUTME: Regex-driven tokenizer producing a tagged token stream with source positions

use crate::error::ReadError;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    CommentSexp,
    Comment,
    Quote,
    QuasiQuote,
    UnquoteSplice,
    Unquote,
    Null,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    BraceOpen,
    BraceClose,
    Complex,
    ComplexPure,
    Float,
    IntBin,
    IntOct,
    IntHex,
    Int,
    Bool,
    Comma,
    Docstring,
    Str,
    Keyword,
    Symbol,
    Newline,
    Whitespace,
    SyntaxError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

/// The master pattern: one alternation of named sub-patterns, scanned left to
/// right. Ambiguity between overlapping tokens is resolved by this order, so
/// it must not be rearranged casually (`~@` before `~`, `()` before `(`,
/// docstrings before strings, sized integers before bare ones).
const TAGS: &[(&str, TokenKind, &str)] = &[
    ("COMMENT_SEXP", TokenKind::CommentSexp, r";#\(.*\)"),
    ("COMMENT", TokenKind::Comment, r";.*\n?"),
    ("QUOTE", TokenKind::Quote, r"'"),
    ("QUASI_QUOTE", TokenKind::QuasiQuote, r"`"),
    ("UNQUOTE_SPLICE", TokenKind::UnquoteSplice, r"~@"),
    ("UNQUOTE", TokenKind::Unquote, r"~"),
    ("NULL", TokenKind::Null, r"\(\)|None\b"),
    ("PAREN_OPEN", TokenKind::ParenOpen, r"\("),
    ("PAREN_CLOSE", TokenKind::ParenClose, r"\)"),
    ("BRACKET_OPEN", TokenKind::BracketOpen, r"\["),
    ("BRACKET_CLOSE", TokenKind::BracketClose, r"\]"),
    ("BRACE_OPEN", TokenKind::BraceOpen, r"\{"),
    ("BRACE_CLOSE", TokenKind::BraceClose, r"\}"),
    ("COMPLEX", TokenKind::Complex, r"-?\d+\.?\d*[+-]\d+\.?\d*j"),
    ("COMPLEX_PURE", TokenKind::ComplexPure, r"-?\d+\.?\d*j"),
    ("FLOAT", TokenKind::Float, r"-?\d+\.\d+"),
    ("INT_BIN", TokenKind::IntBin, r"-?0b[01]+"),
    ("INT_OCT", TokenKind::IntOct, r"-?0o[0-7]+"),
    ("INT_HEX", TokenKind::IntHex, r"-?0x[0-9a-fA-F]+"),
    ("INT", TokenKind::Int, r"-?\d+"),
    ("BOOL", TokenKind::Bool, r"#[tf]"),
    ("COMMA", TokenKind::Comma, r","),
    ("DOCSTRING", TokenKind::Docstring, r#""""[^"]*""""#),
    ("STRING", TokenKind::Str, r#""[^"]*""#),
    ("KEYWORD", TokenKind::Keyword, r":[^()\[\]{}\s#,.]+"),
    ("SYMBOL", TokenKind::Symbol, r"[^()\[\]{}\s#,.]+"),
    ("NEWLINE", TokenKind::Newline, r"\n"),
    ("WHITESPACE", TokenKind::Whitespace, r"[^\S\n]+"),
    ("SYNTAX_ERROR", TokenKind::SyntaxError, r"."),
];

static MASTER: Lazy<Regex> = Lazy::new(|| {
    let alternation = TAGS
        .iter()
        .map(|(name, _, pattern)| format!("(?P<{}>{})", name, pattern))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("master token pattern is valid")
});

/// Converts source text into tokens, discarding whitespace and comments.
///
/// Input whose first non-space character is `(` must contain a `)` somewhere
/// later; this cheap guard lets the REPL detect partial input before parsing.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ReadError> {
    let text = text.trim();

    if text.starts_with('(') && !text[1..].contains(')') {
        return Err(ReadError::UnclosedExpression);
    }

    let mut tokens = Vec::new();
    let mut line = 1usize;
    let mut line_start = 0usize;

    for caps in MASTER.captures_iter(text) {
        let Some((kind, matched)) = TAGS
            .iter()
            .find_map(|(name, kind, _)| caps.name(name).map(|m| (*kind, m)))
        else {
            continue;
        };

        let col = matched.start() - line_start;

        match kind {
            TokenKind::SyntaxError => {
                return Err(ReadError::UnknownToken {
                    text: matched.as_str().to_string(),
                    line,
                    col,
                });
            }
            TokenKind::Comment
            | TokenKind::CommentSexp
            | TokenKind::Whitespace
            | TokenKind::Newline => {}
            _ => tokens.push(Token {
                kind,
                text: matched.as_str().to_string(),
                line,
                col,
            }),
        }

        // Any token may span newlines (comments, docstrings); keep positions
        // honest by recounting inside the matched text.
        let lexeme = matched.as_str();
        if let Some(last_newline) = lexeme.rfind('\n') {
            line += lexeme.matches('\n').count();
            line_start = matched.start() + last_newline + 1;
        }
    }

    Ok(tokens)
}
