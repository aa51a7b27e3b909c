// ABOUTME: Recursive-descent parser turning the token stream into forms

use crate::error::ReadError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::value::Form;
use num::complex::Complex64;
use std::collections::HashMap;

/// Returns the first complete form in the text.
pub fn read(text: &str) -> Result<Form, ReadError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ReadError::EmptyInput);
    }
    Parser::new(&tokens).parse_form()
}

/// Reads every top-level form in the buffer, in order. Comment-only input
/// yields no forms.
pub fn read_all(text: &str) -> Result<Vec<Form>, ReadError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(&tokens);
    let mut forms = Vec::new();
    while parser.peek().is_some() {
        forms.push(parser.parse_form()?);
    }
    Ok(forms)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_form(&mut self) -> Result<Form, ReadError> {
        let token = self.next().ok_or(ReadError::UnexpectedEof)?;
        match token.kind {
            TokenKind::Null => Ok(Form::Nil),
            TokenKind::ParenOpen => self.parse_list(),
            TokenKind::BracketOpen => self.parse_vector(),
            TokenKind::BraceOpen => self.parse_map(),
            TokenKind::Quote => self.parse_quoted("quote"),
            TokenKind::QuasiQuote => self.parse_quoted("quasiquote"),
            TokenKind::Unquote => self.parse_quoted("unquote"),
            TokenKind::UnquoteSplice => self.parse_quoted("unquote-splicing"),
            TokenKind::ParenClose | TokenKind::BracketClose | TokenKind::BraceClose => {
                Err(ReadError::UnexpectedClose {
                    text: token.text.clone(),
                    line: token.line,
                    col: token.col,
                })
            }
            // Outside a map literal the comma is the tuple constructor, so the
            // printed form `(, 1 2)` reads back as a call.
            TokenKind::Comma => Ok(Form::symbol(",")),
            _ => make_atom(token),
        }
    }

    /// A quoting token wraps exactly one following form.
    fn parse_quoted(&mut self, wrapper: &str) -> Result<Form, ReadError> {
        let form = self.parse_form()?;
        Ok(Form::List(vec![Form::symbol(wrapper), form]))
    }

    fn parse_list(&mut self) -> Result<Form, ReadError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ReadError::UnexpectedEof),
                Some(token) if token.kind == TokenKind::ParenClose => {
                    self.pos += 1;
                    // The empty list is the EmptyList form
                    return Ok(Form::list(items));
                }
                Some(_) => items.push(self.parse_form()?),
            }
        }
    }

    fn parse_vector(&mut self) -> Result<Form, ReadError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ReadError::UnterminatedVector),
                Some(token) if token.kind == TokenKind::BracketClose => {
                    self.pos += 1;
                    return Ok(Form::Vector(items));
                }
                Some(_) => items.push(self.parse_form()?),
            }
        }
    }

    /// `{k1 v1, k2 v2}`: commas are ignored at the top level of the literal,
    /// and the collected forms must pair up evenly.
    fn parse_map(&mut self) -> Result<Form, ReadError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ReadError::UnterminatedMap),
                Some(token) if token.kind == TokenKind::Comma => {
                    self.pos += 1;
                }
                Some(token) if token.kind == TokenKind::BraceClose => {
                    self.pos += 1;
                    if items.len() % 2 != 0 {
                        return Err(ReadError::UnevenMapLiteral);
                    }
                    let mut entries = HashMap::with_capacity(items.len() / 2);
                    let mut iter = items.into_iter();
                    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                        entries.insert(key, value);
                    }
                    return Ok(Form::Map(entries));
                }
                Some(_) => items.push(self.parse_form()?),
            }
        }
    }
}

fn make_atom(token: &Token) -> Result<Form, ReadError> {
    let bad_number = || ReadError::BadNumber {
        text: token.text.clone(),
        line: token.line,
        col: token.col,
    };

    match token.kind {
        TokenKind::Int => token
            .text
            .parse::<i64>()
            .map(Form::Int)
            .map_err(|_| bad_number()),
        TokenKind::IntBin => parse_radix(&token.text, 2).map(Form::Int).ok_or_else(bad_number),
        TokenKind::IntOct => parse_radix(&token.text, 8).map(Form::Int).ok_or_else(bad_number),
        TokenKind::IntHex => parse_radix(&token.text, 16).map(Form::Int).ok_or_else(bad_number),
        TokenKind::Float => token
            .text
            .parse::<f64>()
            .map(Form::Float)
            .map_err(|_| bad_number()),
        TokenKind::Complex => parse_complex(&token.text).ok_or_else(bad_number),
        TokenKind::ComplexPure => {
            let imag = token.text[..token.text.len() - 1]
                .parse::<f64>()
                .map_err(|_| bad_number())?;
            Ok(Form::Complex(Complex64::new(0.0, imag)))
        }
        TokenKind::Bool => Ok(Form::Bool(token.text == "#t")),
        TokenKind::Str => Ok(Form::Str(token.text[1..token.text.len() - 1].to_string())),
        TokenKind::Docstring => Ok(Form::Str(token.text[3..token.text.len() - 3].to_string())),
        TokenKind::Keyword => Ok(Form::Keyword(token.text[1..].to_string())),
        TokenKind::Symbol => Ok(Form::Symbol(token.text.clone())),
        _ => Err(ReadError::UnknownToken {
            text: token.text.clone(),
            line: token.line,
            col: token.col,
        }),
    }
}

/// `-?0b...` / `-?0o...` / `-?0x...` with the two-character base prefix stripped.
fn parse_radix(text: &str, radix: u32) -> Option<i64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = &rest[2..];
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// `a+bj` / `a-bj`: split at the sign that separates the parts, which is the
/// first `+`/`-` after the leading character of the real part.
fn parse_complex(text: &str) -> Option<Form> {
    let body = &text[..text.len() - 1];
    let split = body[1..].find(['+', '-'])? + 1;
    let real = body[..split].parse::<f64>().ok()?;
    let imag = body[split..].parse::<f64>().ok()?;
    Some(Form::Complex(Complex64::new(real, imag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_numbers() {
        assert_eq!(read("42"), Ok(Form::Int(42)));
        assert_eq!(read("-42"), Ok(Form::Int(-42)));
        assert_eq!(read("3.5"), Ok(Form::Float(3.5)));
        assert_eq!(read("0b101"), Ok(Form::Int(5)));
        assert_eq!(read("-0o17"), Ok(Form::Int(-15)));
        assert_eq!(read("0xff"), Ok(Form::Int(255)));
        assert_eq!(read("3+4j"), Ok(Form::Complex(Complex64::new(3.0, 4.0))));
        assert_eq!(read("1.5-2j"), Ok(Form::Complex(Complex64::new(1.5, -2.0))));
        assert_eq!(read("4j"), Ok(Form::Complex(Complex64::new(0.0, 4.0))));
    }

    #[test]
    fn test_read_atoms() {
        assert_eq!(read("#t"), Ok(Form::Bool(true)));
        assert_eq!(read("#f"), Ok(Form::Bool(false)));
        assert_eq!(read("foo"), Ok(Form::symbol("foo")));
        assert_eq!(read(":else"), Ok(Form::Keyword("else".to_string())));
        assert_eq!(read(r#""hello""#), Ok(Form::Str("hello".to_string())));
        assert_eq!(
            read(r#""""a docstring""""#),
            Ok(Form::Str("a docstring".to_string()))
        );
    }

    #[test]
    fn test_read_null() {
        assert_eq!(read("()"), Ok(Form::Nil));
        assert_eq!(read("( )"), Ok(Form::Nil));
        assert_eq!(read("None"), Ok(Form::Nil));
    }

    #[test]
    fn test_read_nested_list() {
        let form = read("(1 (2 3) 4)").unwrap();
        assert_eq!(
            form,
            Form::List(vec![
                Form::Int(1),
                Form::List(vec![Form::Int(2), Form::Int(3)]),
                Form::Int(4),
            ])
        );
    }

    #[test]
    fn test_read_vector() {
        assert_eq!(
            read("[1 2 3]"),
            Ok(Form::Vector(vec![Form::Int(1), Form::Int(2), Form::Int(3)]))
        );
        assert_eq!(read("[]"), Ok(Form::Vector(vec![])));
    }

    #[test]
    fn test_read_map_literal() {
        let form = read("{:a 1, :b 2}").unwrap();
        let mut expected = HashMap::new();
        expected.insert(Form::Keyword("a".to_string()), Form::Int(1));
        expected.insert(Form::Keyword("b".to_string()), Form::Int(2));
        assert_eq!(form, Form::Map(expected));
    }

    #[test]
    fn test_map_literal_commas_are_optional() {
        assert_eq!(read("{:a 1 :b 2}"), read("{:a 1, :b 2}"));
    }

    #[test]
    fn test_uneven_map_literal() {
        assert_eq!(read("{:a 1, :b}"), Err(ReadError::UnevenMapLiteral));
    }

    #[test]
    fn test_quote_sugar() {
        assert_eq!(
            read("'x"),
            Ok(Form::List(vec![Form::symbol("quote"), Form::symbol("x")]))
        );
        assert_eq!(
            read("`(a ~b)"),
            Ok(Form::List(vec![
                Form::symbol("quasiquote"),
                Form::List(vec![
                    Form::symbol("a"),
                    Form::List(vec![Form::symbol("unquote"), Form::symbol("b")]),
                ]),
            ]))
        );
        assert_eq!(
            read("~@xs"),
            Ok(Form::List(vec![
                Form::symbol("unquote-splicing"),
                Form::symbol("xs"),
            ]))
        );
    }

    #[test]
    fn test_unmatched_close_reports_position() {
        match read_all("(foo))") {
            Err(ReadError::UnexpectedClose { text, line, col }) => {
                assert_eq!(text, ")");
                assert_eq!(line, 1);
                assert_eq!(col, 5);
            }
            other => panic!("Expected UnexpectedClose, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_vector_close() {
        assert_eq!(read("[1 2"), Err(ReadError::UnterminatedVector));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(read(""), Err(ReadError::EmptyInput));
        assert_eq!(read("; just a comment"), Err(ReadError::EmptyInput));
    }

    #[test]
    fn test_read_returns_first_form_only() {
        assert_eq!(read("1 2 3"), Ok(Form::Int(1)));
    }

    #[test]
    fn test_read_all() {
        let forms = read_all("(define x 1) (define y 2) (+ x y)").unwrap();
        assert_eq!(forms.len(), 3);
        assert_eq!(read_all("; nothing here"), Ok(vec![]));
    }

    #[test]
    fn test_comma_outside_map_is_the_tuple_symbol() {
        let form = read("(, 1 2)").unwrap();
        assert_eq!(
            form,
            Form::List(vec![Form::symbol(","), Form::Int(1), Form::Int(2)])
        );
    }

    #[test]
    fn test_docstring_inside_defn_shape() {
        let form = read(r#"(defn inc """Add one.""" (n) (+ n 1))"#).unwrap();
        match form {
            Form::List(items) => {
                assert_eq!(items.len(), 5);
                assert_eq!(items[2], Form::Str("Add one.".to_string()));
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }
}
