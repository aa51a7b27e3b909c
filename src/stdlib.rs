// ABOUTME: Native library modules exposed to the language through the import shim

use crate::error::{EvalError, ARITY_ONE, ARITY_TWO};
use crate::value::{Builtin, Form};

/// The public bindings of a named native module, or None if no such module
/// exists. `(import m)` copies these into the environment as `m/<name>`.
pub fn module_bindings(name: &str) -> Option<Vec<(&'static str, Form)>> {
    match name {
        "math" => Some(math_bindings()),
        "string" => Some(string_bindings()),
        _ => None,
    }
}

fn builtin(name: &'static str, func: fn(&[Form]) -> Result<Form, EvalError>) -> (&'static str, Form) {
    (name, Form::Builtin(Builtin { name, func }))
}

fn as_float(function: &str, form: &Form) -> Result<f64, EvalError> {
    match form {
        Form::Int(n) => Ok(*n as f64),
        Form::Float(f) => Ok(*f),
        other => Err(EvalError::type_error(function, "a real number", other)),
    }
}

fn unary_float(
    function: &'static str,
    args: &[Form],
    op: fn(f64) -> f64,
) -> Result<Form, EvalError> {
    match args {
        [value] => Ok(Form::Float(op(as_float(function, value)?))),
        _ => Err(EvalError::arity_error(function, ARITY_ONE, args.len())),
    }
}

fn unary_to_int(
    function: &'static str,
    args: &[Form],
    op: fn(f64) -> f64,
) -> Result<Form, EvalError> {
    match args {
        [Form::Int(n)] => Ok(Form::Int(*n)),
        [value] => Ok(Form::Int(op(as_float(function, value)?) as i64)),
        _ => Err(EvalError::arity_error(function, ARITY_ONE, args.len())),
    }
}

// ============================================================================
// math
// ============================================================================

fn math_sqrt(args: &[Form]) -> Result<Form, EvalError> {
    unary_float("sqrt", args, f64::sqrt)
}

fn math_exp(args: &[Form]) -> Result<Form, EvalError> {
    unary_float("exp", args, f64::exp)
}

fn math_ln(args: &[Form]) -> Result<Form, EvalError> {
    unary_float("ln", args, f64::ln)
}

fn math_sin(args: &[Form]) -> Result<Form, EvalError> {
    unary_float("sin", args, f64::sin)
}

fn math_cos(args: &[Form]) -> Result<Form, EvalError> {
    unary_float("cos", args, f64::cos)
}

fn math_tan(args: &[Form]) -> Result<Form, EvalError> {
    unary_float("tan", args, f64::tan)
}

fn math_floor(args: &[Form]) -> Result<Form, EvalError> {
    unary_to_int("floor", args, f64::floor)
}

fn math_ceil(args: &[Form]) -> Result<Form, EvalError> {
    unary_to_int("ceil", args, f64::ceil)
}

fn math_round(args: &[Form]) -> Result<Form, EvalError> {
    unary_to_int("round", args, f64::round)
}

/// Integers keep their kind; floats keep theirs. Negating i64::MIN overflows,
/// so that one value promotes to a float like the arithmetic builtins do.
fn math_abs(args: &[Form]) -> Result<Form, EvalError> {
    match args {
        [Form::Int(n)] => Ok(n
            .checked_abs()
            .map(Form::Int)
            .unwrap_or(Form::Float(-(*n as f64)))),
        [Form::Float(f)] => Ok(Form::Float(f.abs())),
        [other] => Err(EvalError::type_error("abs", "a real number", other)),
        _ => Err(EvalError::arity_error("abs", ARITY_ONE, args.len())),
    }
}

fn math_pow(args: &[Form]) -> Result<Form, EvalError> {
    match args {
        [base, exponent] => {
            let base = as_float("pow", base)?;
            let exponent = as_float("pow", exponent)?;
            Ok(Form::Float(base.powf(exponent)))
        }
        _ => Err(EvalError::arity_error("pow", ARITY_TWO, args.len())),
    }
}

fn math_bindings() -> Vec<(&'static str, Form)> {
    vec![
        builtin("sqrt", math_sqrt),
        builtin("pow", math_pow),
        builtin("abs", math_abs),
        builtin("floor", math_floor),
        builtin("ceil", math_ceil),
        builtin("round", math_round),
        builtin("exp", math_exp),
        builtin("ln", math_ln),
        builtin("sin", math_sin),
        builtin("cos", math_cos),
        builtin("tan", math_tan),
        ("pi", Form::Float(std::f64::consts::PI)),
        ("e", Form::Float(std::f64::consts::E)),
        ("tau", Form::Float(std::f64::consts::TAU)),
    ]
}

// ============================================================================
// string
// ============================================================================

fn string_arg<'a>(function: &'static str, args: &'a [Form]) -> Result<&'a str, EvalError> {
    match args {
        [Form::Str(s)] => Ok(s),
        [other] => Err(EvalError::type_error(function, "a string", other)),
        _ => Err(EvalError::arity_error(function, ARITY_ONE, args.len())),
    }
}

fn string_upper(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Str(string_arg("upper", args)?.to_uppercase()))
}

fn string_lower(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Str(string_arg("lower", args)?.to_lowercase()))
}

fn string_trim(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Str(string_arg("trim", args)?.trim().to_string()))
}

fn string_reverse(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Str(string_arg("reverse", args)?.chars().rev().collect()))
}

fn string_contains(args: &[Form]) -> Result<Form, EvalError> {
    match args {
        [Form::Str(haystack), Form::Str(needle)] => {
            Ok(Form::Bool(haystack.contains(needle.as_str())))
        }
        [a, b] => {
            let offender = if matches!(a, Form::Str(_)) { b } else { a };
            Err(EvalError::type_error("contains?", "a string", offender))
        }
        _ => Err(EvalError::arity_error("contains?", ARITY_TWO, args.len())),
    }
}

/// `(split s sep)` → list of pieces
fn string_split(args: &[Form]) -> Result<Form, EvalError> {
    match args {
        [Form::Str(s), Form::Str(sep)] => Ok(Form::list(
            s.split(sep.as_str())
                .map(|piece| Form::Str(piece.to_string()))
                .collect(),
        )),
        [a, b] => {
            let offender = if matches!(a, Form::Str(_)) { b } else { a };
            Err(EvalError::type_error("split", "a string", offender))
        }
        _ => Err(EvalError::arity_error("split", ARITY_TWO, args.len())),
    }
}

/// `(join sep pieces)` → one string
fn string_join(args: &[Form]) -> Result<Form, EvalError> {
    match args {
        [Form::Str(sep), pieces] => {
            let items: &[Form] = match pieces {
                Form::Nil => &[],
                Form::List(items) | Form::Vector(items) => items,
                other => return Err(EvalError::type_error("join", "a list of strings", other)),
            };
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Form::Str(s) => parts.push(s.as_str()),
                    other => return Err(EvalError::type_error("join", "a string", other)),
                }
            }
            Ok(Form::Str(parts.join(sep)))
        }
        [other, _] => Err(EvalError::type_error("join", "a string separator", other)),
        _ => Err(EvalError::arity_error("join", ARITY_TWO, args.len())),
    }
}

fn string_bindings() -> Vec<(&'static str, Form)> {
    vec![
        builtin("upper", string_upper),
        builtin("lower", string_lower),
        builtin("trim", string_trim),
        builtin("reverse", string_reverse),
        builtin("contains?", string_contains),
        builtin("split", string_split),
        builtin("join", string_join),
    ]
}
