// ABOUTME: Error types for the reader, evaluator, and source-file loader

use crate::value::Form;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_ONE_OR_TWO: &str = "1-2";
pub const ARITY_TWO_OR_THREE: &str = "2-3";
pub const ARITY_THREE_OR_FOUR: &str = "3-4";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// Failures while turning source text into forms.
///
/// The REPL needs to tell "this can never parse" apart from "this could parse
/// once more input arrives"; `is_incomplete` draws that line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected end of input while reading a form")]
    UnexpectedEof,

    #[error("unclosed s-expression in input")]
    UnclosedExpression,

    #[error("no input to read")]
    EmptyInput,

    #[error("unable to parse `{text}` (line {line}, col {col})")]
    UnknownToken {
        text: String,
        line: usize,
        col: usize,
    },

    #[error("unexpected `{text}` in input (line {line}, col {col})")]
    UnexpectedClose {
        text: String,
        line: usize,
        col: usize,
    },

    #[error("bad numeric literal `{text}` (line {line}, col {col})")]
    BadNumber {
        text: String,
        line: usize,
        col: usize,
    },

    #[error("missing closing `]` in vector literal")]
    UnterminatedVector,

    #[error("missing closing `}}` in map literal")]
    UnterminatedMap,

    #[error("map literal requires an even number of forms")]
    UnevenMapLiteral,
}

impl ReadError {
    /// True when more input could still complete the form.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            ReadError::UnexpectedEof | ReadError::UnclosedExpression | ReadError::EmptyInput
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    #[error("`{form}` expects a symbol, got {got}")]
    NotASymbol { form: &'static str, got: String },

    #[error("attempt to re-define `{0}`")]
    Redefinition(String),

    #[error("macro definitions are only allowed at the top level")]
    MacroNotAtTopLevel,

    #[error("malformed `if` form: {0}")]
    MalformedIf(String),

    #[error("malformed `cond` branch: {0}")]
    MalformedCond(String),

    #[error("malformed `let` form: {0}")]
    MalformedLet(String),

    #[error("malformed procedure definition: {0}")]
    MalformedLambda(String),

    #[error("malformed definition: {0}")]
    MalformedDefine(String),

    #[error("can't unquote outside of quasiquote")]
    UnquoteContext,

    #[error("can't splice at the head of a list")]
    SpliceAtHead,

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Type mismatch with function name, expected description, and actual type
    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
    },

    /// Runtime error with function context
    #[error("{function}: {message}")]
    RuntimeError { function: String, message: String },

    #[error("value is not callable")]
    NotCallable,

    #[error(transparent)]
    Read(#[from] ReadError),
}

impl EvalError {
    /// Create a type mismatch error from the offending form
    pub fn type_error(function: &str, expected: &str, actual: &Form) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a runtime error with function context
    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// Failures while loading `.rpl` source files (scripts or the prelude).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("attempt to load non *.rpl file: {0}")]
    BadSuffix(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
