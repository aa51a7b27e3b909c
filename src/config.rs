// ABOUTME: Version, prompts, banner text, and REPL completion vocabulary

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// The banner opens an s-expression that the prelude messages close
pub const WELCOME_MESSAGE: &str = "((Welcome to ripple!)";
pub const PRELUDE_LOADING: &str = "  (loading prelude...)";
pub const PRELUDE_DONE: &str = "  (...done!))\n";
pub const WELCOME_CLOSE: &str = ")\n";

pub const IN_PROMPT: &str = "λ > ";
pub const OUT_PROMPT: &str = "... ";

pub const HISTORY_FILE: &str = ".ripple_history";

/// The prelude ships next to the binary's working directory; a missing
/// directory simply loads nothing.
pub fn default_prelude_dir() -> PathBuf {
    PathBuf::from("prelude")
}

/// Words offered by the REPL tab completer: special forms, builtins, and the
/// importable module names.
pub const COMPLETIONS: &[&str] = &[
    // special forms
    "quote",
    "quasiquote",
    "unquote",
    "unquote-splicing",
    "if",
    "cond",
    "set!",
    "define",
    "lambda",
    "fn",
    "defn",
    "defmacro",
    "let",
    "begin",
    "eval",
    "apply",
    "import",
    // builtins
    "append",
    "car",
    "cdr",
    "cons",
    "len",
    "null?",
    "and",
    "or",
    "not",
    "read",
    "str",
    "int",
    "float",
    "complex",
    "dict",
    "list",
    "vector",
    "tuple",
    "eq?",
    "equal?",
    "callable?",
    "string?",
    "symbol?",
    "dict?",
    "tuple?",
    "list?",
    "int?",
    "float?",
    "number?",
    // importable modules
    "math",
    "string",
];
