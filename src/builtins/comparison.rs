//! Comparison operations: =, !=, <, >, <=, >=
//!
//! Variadic: every adjacent pair must satisfy the relation. `=` and `!=`
//! compare any forms (numerically across Int/Float); the ordering operators
//! require numbers or strings.

use super::bind;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_TWO};
use crate::value::Form;
use std::cmp::Ordering;
use std::rc::Rc;

fn chain(
    function: &'static str,
    args: &[Form],
    relation: fn(&Form, &Form) -> Result<bool, EvalError>,
) -> Result<Form, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error(function, ARITY_AT_LEAST_TWO, args.len()));
    }
    for pair in args.windows(2) {
        if !relation(&pair[0], &pair[1])? {
            return Ok(Form::Bool(false));
        }
    }
    Ok(Form::Bool(true))
}

/// Structural equality, except numbers compare across Int/Float/Complex.
fn values_equal(a: &Form, b: &Form) -> bool {
    match (a, b) {
        (Form::Int(x), Form::Float(y)) | (Form::Float(y), Form::Int(x)) => *x as f64 == *y,
        (Form::Int(x), Form::Complex(y)) | (Form::Complex(y), Form::Int(x)) => {
            y.im == 0.0 && y.re == *x as f64
        }
        (Form::Float(x), Form::Complex(y)) | (Form::Complex(y), Form::Float(x)) => {
            y.im == 0.0 && y.re == *x
        }
        _ => a == b,
    }
}

fn order(function: &str, a: &Form, b: &Form) -> Result<Ordering, EvalError> {
    let ordering = match (a, b) {
        (Form::Int(x), Form::Int(y)) => x.partial_cmp(y),
        (Form::Int(x), Form::Float(y)) => (*x as f64).partial_cmp(y),
        (Form::Float(x), Form::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Form::Float(x), Form::Float(y)) => x.partial_cmp(y),
        (Form::Str(x), Form::Str(y)) => Some(x.cmp(y)),
        (Form::Int(_) | Form::Float(_) | Form::Str(_), other) => {
            return Err(EvalError::type_error(function, "a comparable value", other));
        }
        (other, _) => return Err(EvalError::type_error(function, "a comparable value", other)),
    };
    ordering.ok_or_else(|| EvalError::runtime_error(function, "values are unordered"))
}

pub fn builtin_eq(args: &[Form]) -> Result<Form, EvalError> {
    chain("=", args, |a, b| Ok(values_equal(a, b)))
}

pub fn builtin_ne(args: &[Form]) -> Result<Form, EvalError> {
    chain("!=", args, |a, b| Ok(!values_equal(a, b)))
}

pub fn builtin_lt(args: &[Form]) -> Result<Form, EvalError> {
    chain("<", args, |a, b| Ok(order("<", a, b)? == Ordering::Less))
}

pub fn builtin_gt(args: &[Form]) -> Result<Form, EvalError> {
    chain(">", args, |a, b| Ok(order(">", a, b)? == Ordering::Greater))
}

pub fn builtin_le(args: &[Form]) -> Result<Form, EvalError> {
    chain("<=", args, |a, b| Ok(order("<=", a, b)? != Ordering::Greater))
}

pub fn builtin_ge(args: &[Form]) -> Result<Form, EvalError> {
    chain(">=", args, |a, b| Ok(order(">=", a, b)? != Ordering::Less))
}

/// Register all comparison builtins in the environment
pub fn register(env: &Rc<Environment>) {
    bind(env, "=", builtin_eq);
    bind(env, "!=", builtin_ne);
    bind(env, "<", builtin_lt);
    bind(env, ">", builtin_gt);
    bind(env, "<=", builtin_le);
    bind(env, ">=", builtin_ge);
}
