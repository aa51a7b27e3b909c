//! Arithmetic operations: +, -, *, /, %
//!
//! All five fold their arguments pairwise left to right. Integers promote to
//! floats, and anything mixed with a complex number promotes to complex.
//! Integer overflow promotes the pair to floats rather than wrapping.

use super::bind;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE, ARITY_TWO};
use crate::value::Form;
use num::complex::Complex64;
use std::rc::Rc;

/// A pair of operands lifted to their common numeric level.
enum NumPair {
    Ints(i64, i64),
    Floats(f64, f64),
    Complexes(Complex64, Complex64),
}

fn promote(function: &str, a: &Form, b: &Form) -> Result<NumPair, EvalError> {
    match (a, b) {
        (Form::Int(x), Form::Int(y)) => Ok(NumPair::Ints(*x, *y)),
        (Form::Int(x), Form::Float(y)) => Ok(NumPair::Floats(*x as f64, *y)),
        (Form::Float(x), Form::Int(y)) => Ok(NumPair::Floats(*x, *y as f64)),
        (Form::Float(x), Form::Float(y)) => Ok(NumPair::Floats(*x, *y)),
        (Form::Complex(x), other) => Ok(NumPair::Complexes(*x, as_complex(function, other)?)),
        (other, Form::Complex(y)) => Ok(NumPair::Complexes(as_complex(function, other)?, *y)),
        (Form::Int(_) | Form::Float(_), other) => {
            Err(EvalError::type_error(function, "a number", other))
        }
        (other, _) => Err(EvalError::type_error(function, "a number", other)),
    }
}

fn as_complex(function: &str, form: &Form) -> Result<Complex64, EvalError> {
    match form {
        Form::Int(n) => Ok(Complex64::new(*n as f64, 0.0)),
        Form::Float(f) => Ok(Complex64::new(*f, 0.0)),
        Form::Complex(c) => Ok(*c),
        other => Err(EvalError::type_error(function, "a number", other)),
    }
}

fn fold_pairwise(
    function: &'static str,
    args: &[Form],
    op: fn(&Form, &Form) -> Result<Form, EvalError>,
) -> Result<Form, EvalError> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| EvalError::arity_error(function, ARITY_AT_LEAST_ONE, 0))?;
    let mut acc = first.clone();
    for arg in rest {
        acc = op(&acc, arg)?;
    }
    Ok(acc)
}

fn add2(a: &Form, b: &Form) -> Result<Form, EvalError> {
    match (a, b) {
        // `+` also concatenates strings and same-kind sequences
        (Form::Str(x), Form::Str(y)) => Ok(Form::Str(format!("{}{}", x, y))),
        (Form::List(_) | Form::Nil, Form::List(_) | Form::Nil) => {
            let mut items = list_items(a);
            items.extend(list_items(b));
            Ok(Form::list(items))
        }
        (Form::Vector(x), Form::Vector(y)) => {
            let mut items = x.clone();
            items.extend(y.iter().cloned());
            Ok(Form::Vector(items))
        }
        _ => match promote("+", a, b)? {
            NumPair::Ints(x, y) => Ok(x
                .checked_add(y)
                .map(Form::Int)
                .unwrap_or(Form::Float(x as f64 + y as f64))),
            NumPair::Floats(x, y) => Ok(Form::Float(x + y)),
            NumPair::Complexes(x, y) => Ok(Form::Complex(x + y)),
        },
    }
}

fn sub2(a: &Form, b: &Form) -> Result<Form, EvalError> {
    match promote("-", a, b)? {
        NumPair::Ints(x, y) => Ok(x
            .checked_sub(y)
            .map(Form::Int)
            .unwrap_or(Form::Float(x as f64 - y as f64))),
        NumPair::Floats(x, y) => Ok(Form::Float(x - y)),
        NumPair::Complexes(x, y) => Ok(Form::Complex(x - y)),
    }
}

fn mul2(a: &Form, b: &Form) -> Result<Form, EvalError> {
    match promote("*", a, b)? {
        NumPair::Ints(x, y) => Ok(x
            .checked_mul(y)
            .map(Form::Int)
            .unwrap_or(Form::Float(x as f64 * y as f64))),
        NumPair::Floats(x, y) => Ok(Form::Float(x * y)),
        NumPair::Complexes(x, y) => Ok(Form::Complex(x * y)),
    }
}

/// True division: Int ÷ Int stays an Int only when the division is exact.
fn div2(a: &Form, b: &Form) -> Result<Form, EvalError> {
    match promote("/", a, b)? {
        NumPair::Ints(x, y) => {
            if y == 0 {
                Err(EvalError::runtime_error("/", "division by zero"))
            } else if x % y == 0 {
                Ok(Form::Int(x / y))
            } else {
                Ok(Form::Float(x as f64 / y as f64))
            }
        }
        NumPair::Floats(x, y) => {
            if y == 0.0 {
                Err(EvalError::runtime_error("/", "division by zero"))
            } else {
                Ok(Form::Float(x / y))
            }
        }
        NumPair::Complexes(x, y) => Ok(Form::Complex(x / y)),
    }
}

/// Remainder with the sign of the divisor.
fn mod2(a: &Form, b: &Form) -> Result<Form, EvalError> {
    match promote("%", a, b)? {
        NumPair::Ints(x, y) => {
            if y == 0 {
                return Err(EvalError::runtime_error("%", "division by zero"));
            }
            let r = x % y;
            Ok(Form::Int(if r != 0 && (r < 0) != (y < 0) {
                r + y
            } else {
                r
            }))
        }
        NumPair::Floats(x, y) => {
            if y == 0.0 {
                return Err(EvalError::runtime_error("%", "division by zero"));
            }
            let r = x % y;
            Ok(Form::Float(if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            }))
        }
        NumPair::Complexes(_, _) => Err(EvalError::type_error("%", "a real number", a)),
    }
}

fn list_items(form: &Form) -> Vec<Form> {
    match form {
        Form::List(items) => items.clone(),
        _ => Vec::new(),
    }
}

pub fn builtin_add(args: &[Form]) -> Result<Form, EvalError> {
    fold_pairwise("+", args, add2)
}

pub fn builtin_sub(args: &[Form]) -> Result<Form, EvalError> {
    fold_pairwise("-", args, sub2)
}

pub fn builtin_mul(args: &[Form]) -> Result<Form, EvalError> {
    fold_pairwise("*", args, mul2)
}

pub fn builtin_div(args: &[Form]) -> Result<Form, EvalError> {
    fold_pairwise("/", args, div2)
}

pub fn builtin_mod(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("%", ARITY_TWO, args.len()));
    }
    mod2(&args[0], &args[1])
}

/// Register all arithmetic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    bind(env, "+", builtin_add);
    bind(env, "-", builtin_sub);
    bind(env, "*", builtin_mul);
    bind(env, "/", builtin_div);
    bind(env, "%", builtin_mod);
}
