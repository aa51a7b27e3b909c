// ABOUTME: Form types representing every value the reader produces and the evaluator consumes

use crate::env::Environment;
use crate::error::EvalError;
use num::complex::Complex64;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;
use std::rc::Rc;

/// A user-defined closure: parameter list, optional docstring, body form, and
/// the lexical environment it was defined in. Equality is identity.
#[derive(Debug, Clone)]
pub struct Procedure {
    pub params: Vec<String>,
    pub docstring: Option<String>,
    pub body: Form,
    pub env: Rc<Environment>,
}

/// An opaque host-provided callable.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: fn(&[Form]) -> Result<Form, EvalError>,
}

#[derive(Debug, Clone)]
pub enum Form {
    Int(i64),
    Float(f64),
    Complex(Complex64),
    Bool(bool),
    Str(String),
    Symbol(String),
    Keyword(String),
    /// The empty list; `()` and the token `None` both read as this.
    Nil,
    List(Vec<Form>),
    Vector(Vec<Form>),
    Map(HashMap<Form, Form>),
    Tuple(Vec<Form>),
    Procedure(Rc<Procedure>),
    Builtin(Builtin),
}

impl Form {
    pub fn symbol(name: &str) -> Form {
        Form::Symbol(name.to_string())
    }

    /// Builds a list form, normalising the empty case to Nil. The reader and
    /// the list builtins never produce a zero-length `List`.
    pub fn list(items: Vec<Form>) -> Form {
        if items.is_empty() {
            Form::Nil
        } else {
            Form::List(items)
        }
    }

    /// Only `#f` and the empty list are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Form::Bool(false) | Form::Nil)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Form::Int(_) => "an integer",
            Form::Float(_) => "a float",
            Form::Complex(_) => "a complex number",
            Form::Bool(_) => "a boolean",
            Form::Str(_) => "a string",
            Form::Symbol(_) => "a symbol",
            Form::Keyword(_) => "a keyword",
            Form::Nil => "the empty list",
            Form::List(_) => "a list",
            Form::Vector(_) => "a vector",
            Form::Map(_) => "a map",
            Form::Tuple(_) => "a tuple",
            Form::Procedure(_) => "a procedure",
            Form::Builtin(_) => "a builtin",
        }
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Form::Int(a), Form::Int(b)) => a == b,
            (Form::Float(a), Form::Float(b)) => a == b,
            (Form::Complex(a), Form::Complex(b)) => a == b,
            (Form::Bool(a), Form::Bool(b)) => a == b,
            // Symbols, keywords, and strings may carry identical text but the
            // variants never compare equal to one another.
            (Form::Str(a), Form::Str(b)) => a == b,
            (Form::Symbol(a), Form::Symbol(b)) => a == b,
            (Form::Keyword(a), Form::Keyword(b)) => a == b,
            (Form::Nil, Form::Nil) => true,
            (Form::List(a), Form::List(b)) => a == b,
            (Form::Vector(a), Form::Vector(b)) => a == b,
            (Form::Tuple(a), Form::Tuple(b)) => a == b,
            (Form::Map(a), Form::Map(b)) => a == b,
            (Form::Procedure(a), Form::Procedure(b)) => Rc::ptr_eq(a, b),
            (Form::Builtin(a), Form::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Eq for Form {}

impl Hash for Form {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Form::Int(n) => n.hash(state),
            Form::Float(f) => f.to_bits().hash(state),
            Form::Complex(c) => {
                c.re.to_bits().hash(state);
                c.im.to_bits().hash(state);
            }
            Form::Bool(b) => b.hash(state),
            Form::Str(s) | Form::Symbol(s) | Form::Keyword(s) => s.hash(state),
            Form::Nil => {}
            Form::List(items) | Form::Vector(items) | Form::Tuple(items) => {
                for item in items {
                    item.hash(state);
                }
            }
            // Maps only hash their size; equal maps agree on it and key order
            // must not influence the hash.
            Form::Map(entries) => entries.len().hash(state),
            Form::Procedure(p) => (Rc::as_ptr(p) as usize).hash(state),
            Form::Builtin(b) => b.name.hash(state),
        }
    }
}

/// Writes a float component so it reads back as the same kind of number:
/// whole values keep a trailing fraction digit.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    write!(f, "{:?}", x)
}

/// Complex components drop an integral fraction, matching the literal syntax.
fn write_complex_part(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.fract() == 0.0 && x.is_finite() {
        write!(f, "{}", x as i64)
    } else {
        write!(f, "{:?}", x)
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Form]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Int(n) => write!(f, "{}", n),
            Form::Float(x) => write_float(f, *x),
            Form::Complex(c) => {
                if c.re != 0.0 {
                    write_complex_part(f, c.re)?;
                    if c.im >= 0.0 {
                        write!(f, "+")?;
                    }
                }
                write_complex_part(f, c.im)?;
                write!(f, "j")
            }
            Form::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Form::Str(s) => write!(f, "\"{}\"", s),
            Form::Symbol(s) => write!(f, "{}", s),
            Form::Keyword(k) => write!(f, ":{}", k),
            Form::Nil => write!(f, "()"),
            Form::List(items) => {
                write!(f, "(")?;
                write_seq(f, items)?;
                write!(f, ")")
            }
            Form::Vector(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Form::Tuple(items) => {
                write!(f, "(,")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                write!(f, ")")
            }
            Form::Map(entries) => {
                // Sorted by rendered key for stable output; key order is not
                // semantically meaningful.
                let mut rendered: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{} {}", k, v))
                    .collect();
                rendered.sort();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Form::Procedure(p) => match &p.docstring {
                Some(doc) => write!(f, "Procedure: {}", doc),
                None => write!(f, "Anonymous Procedure (λ)"),
            },
            Form::Builtin(b) => write!(f, "Builtin: {}", b.name),
        }
    }
}
