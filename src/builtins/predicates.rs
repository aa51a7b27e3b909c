//! Type predicates: eq?, equal?, callable?, string?, symbol?, dict?, tuple?,
//! list?, int?, float?, number?
//!
//! `eq?` is identity for procedures and structural for plain data, which has
//! no stable identity once it is cloned through the evaluator. `equal?` is
//! always structural.

use super::bind;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::value::Form;
use std::rc::Rc;

fn two<'a>(function: &'static str, args: &'a [Form]) -> Result<(&'a Form, &'a Form), EvalError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(EvalError::arity_error(function, ARITY_TWO, args.len())),
    }
}

fn one<'a>(function: &'static str, args: &'a [Form]) -> Result<&'a Form, EvalError> {
    match args {
        [a] => Ok(a),
        _ => Err(EvalError::arity_error(function, ARITY_ONE, args.len())),
    }
}

pub fn builtin_is_eq(args: &[Form]) -> Result<Form, EvalError> {
    let (a, b) = two("eq?", args)?;
    // Procedure equality is already identity; structural covers the rest
    Ok(Form::Bool(a == b))
}

pub fn builtin_is_equal(args: &[Form]) -> Result<Form, EvalError> {
    let (a, b) = two("equal?", args)?;
    Ok(Form::Bool(a == b))
}

pub fn builtin_is_callable(args: &[Form]) -> Result<Form, EvalError> {
    let a = one("callable?", args)?;
    Ok(Form::Bool(matches!(
        a,
        Form::Procedure(_) | Form::Builtin(_)
    )))
}

pub fn builtin_is_string(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(one("string?", args)?, Form::Str(_))))
}

pub fn builtin_is_symbol(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(one("symbol?", args)?, Form::Symbol(_))))
}

pub fn builtin_is_dict(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(one("dict?", args)?, Form::Map(_))))
}

pub fn builtin_is_tuple(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(one("tuple?", args)?, Form::Tuple(_))))
}

pub fn builtin_is_list(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(
        one("list?", args)?,
        Form::List(_) | Form::Nil
    )))
}

pub fn builtin_is_int(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(one("int?", args)?, Form::Int(_))))
}

pub fn builtin_is_float(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(one("float?", args)?, Form::Float(_))))
}

pub fn builtin_is_number(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Bool(matches!(
        one("number?", args)?,
        Form::Int(_) | Form::Float(_) | Form::Complex(_)
    )))
}

/// Register all predicate builtins in the environment
pub fn register(env: &Rc<Environment>) {
    bind(env, "eq?", builtin_is_eq);
    bind(env, "equal?", builtin_is_equal);
    bind(env, "callable?", builtin_is_callable);
    bind(env, "string?", builtin_is_string);
    bind(env, "symbol?", builtin_is_symbol);
    bind(env, "dict?", builtin_is_dict);
    bind(env, "tuple?", builtin_is_tuple);
    bind(env, "list?", builtin_is_list);
    bind(env, "int?", builtin_is_int);
    bind(env, "float?", builtin_is_float);
    bind(env, "number?", builtin_is_number);
}
