//! # Built-in Procedure Set
//!
//! The host-provided callables seeded into the global environment, organised
//! by category:
//!
//! - **[arithmetic]**: +, -, *, /, % (variadic, pairwise left-to-right folds)
//! - **[comparison]**: =, !=, <, >, <=, >= (chained comparisons)
//! - **[logic]**: and, or, not
//! - **[lists]**: car, cdr, cons, append, len, null?, begin
//! - **[types]**: str, int, float, complex, dict, list, vector, tuple, `,`
//! - **[predicates]**: eq?, equal?, callable?, string?, symbol?, dict?,
//!   tuple?, list?, int?, float?, number?
//!
//! `read` and `apply` shims are registered here directly so user code can
//! pass them around by name.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::value::{Builtin, Form};
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod lists;
pub mod logic;
pub mod predicates;
pub mod types;

pub use arithmetic::register as register_arithmetic;
pub use comparison::register as register_comparison;
pub use lists::register as register_lists;
pub use logic::register as register_logic;
pub use predicates::register as register_predicates;
pub use types::register as register_types;

/// Inserts a builtin under its own name.
pub(crate) fn bind(env: &Rc<Environment>, name: &'static str, func: fn(&[Form]) -> Result<Form, EvalError>) {
    env.insert(name.to_string(), Form::Builtin(Builtin { name, func }));
}

/// The reader, exposed so user code can turn text into forms.
pub fn builtin_read(args: &[Form]) -> Result<Form, EvalError> {
    match args {
        [Form::Str(text)] => Ok(crate::parser::read(text)?),
        [other] => Err(EvalError::type_error("read", "a string", other)),
        _ => Err(EvalError::arity_error("read", ARITY_ONE, args.len())),
    }
}

/// First-class `apply` for builtin targets. Procedure targets must go through
/// the `apply` form, which can re-enter the evaluator.
pub fn builtin_apply(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("apply", ARITY_TWO, args.len()));
    }
    let argv: &[Form] = match &args[1] {
        Form::Nil => &[],
        Form::List(items) | Form::Vector(items) | Form::Tuple(items) => items,
        other => return Err(EvalError::type_error("apply", "a sequence of arguments", other)),
    };
    match &args[0] {
        Form::Builtin(builtin) => (builtin.func)(argv),
        Form::Procedure(_) => Err(EvalError::runtime_error(
            "apply",
            "procedures must be applied through the `apply` form",
        )),
        other => Err(EvalError::type_error("apply", "a callable", other)),
    }
}

/// Register all built-in procedures in the environment
pub fn register_builtins(env: &Rc<Environment>) {
    register_arithmetic(env);
    register_comparison(env);
    register_logic(env);
    register_lists(env);
    register_types(env);
    register_predicates(env);

    bind(env, "read", builtin_read);
    bind(env, "apply", builtin_apply);
}
