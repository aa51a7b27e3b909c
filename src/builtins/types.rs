//! Type constructors: str, int, float, complex, dict, list, vector, tuple, `,`
//!
//! Conversions follow the usual numeric-tower rules; `dict` takes alternating
//! keys and values, and `,` is a synonym for `tuple` so the printed tuple
//! form reads back as a constructor call.

use super::bind;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_ONE_OR_TWO};
use crate::value::Form;
use num::complex::Complex64;
use std::collections::HashMap;
use std::rc::Rc;

/// The display text of a form; strings convert to themselves, unquoted.
pub fn builtin_str(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("str", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Form::Str(s) => Ok(Form::Str(s.clone())),
        other => Ok(Form::Str(other.to_string())),
    }
}

pub fn builtin_int(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("int", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Form::Int(n) => Ok(Form::Int(*n)),
        Form::Float(f) => Ok(Form::Int(*f as i64)),
        Form::Bool(b) => Ok(Form::Int(i64::from(*b))),
        Form::Str(s) => s.trim().parse::<i64>().map(Form::Int).map_err(|_| {
            EvalError::runtime_error("int", format!("invalid integer literal `{}`", s))
        }),
        other => Err(EvalError::type_error("int", "a number or string", other)),
    }
}

pub fn builtin_float(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("float", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Form::Int(n) => Ok(Form::Float(*n as f64)),
        Form::Float(f) => Ok(Form::Float(*f)),
        Form::Bool(b) => Ok(Form::Float(if *b { 1.0 } else { 0.0 })),
        Form::Str(s) => s.trim().parse::<f64>().map(Form::Float).map_err(|_| {
            EvalError::runtime_error("float", format!("invalid float literal `{}`", s))
        }),
        other => Err(EvalError::type_error("float", "a number or string", other)),
    }
}

/// `(complex re)` or `(complex re im)`
pub fn builtin_complex(args: &[Form]) -> Result<Form, EvalError> {
    let part = |form: &Form| -> Result<f64, EvalError> {
        match form {
            Form::Int(n) => Ok(*n as f64),
            Form::Float(f) => Ok(*f),
            other => Err(EvalError::type_error("complex", "a real number", other)),
        }
    };
    match args {
        [Form::Complex(c)] => Ok(Form::Complex(*c)),
        [re] => Ok(Form::Complex(Complex64::new(part(re)?, 0.0))),
        [re, im] => Ok(Form::Complex(Complex64::new(part(re)?, part(im)?))),
        _ => Err(EvalError::arity_error(
            "complex",
            ARITY_ONE_OR_TWO,
            args.len(),
        )),
    }
}

/// `(dict k1 v1 k2 v2 ...)`
pub fn builtin_dict(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() % 2 != 0 {
        return Err(EvalError::runtime_error(
            "dict",
            "expected an even number of arguments",
        ));
    }
    let mut entries = HashMap::with_capacity(args.len() / 2);
    for pair in args.chunks(2) {
        entries.insert(pair[0].clone(), pair[1].clone());
    }
    Ok(Form::Map(entries))
}

pub fn builtin_list(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::list(args.to_vec()))
}

pub fn builtin_vector(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Vector(args.to_vec()))
}

pub fn builtin_tuple(args: &[Form]) -> Result<Form, EvalError> {
    Ok(Form::Tuple(args.to_vec()))
}

/// Register all constructor builtins in the environment
pub fn register(env: &Rc<Environment>) {
    bind(env, "str", builtin_str);
    bind(env, "int", builtin_int);
    bind(env, "float", builtin_float);
    bind(env, "complex", builtin_complex);
    bind(env, "dict", builtin_dict);
    bind(env, "list", builtin_list);
    bind(env, "vector", builtin_vector);
    bind(env, "tuple", builtin_tuple);
    bind(env, ",", builtin_tuple);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_conversion() {
        assert_eq!(
            builtin_str(&[Form::Int(42)]).unwrap(),
            Form::Str("42".to_string())
        );
        // Strings come back without quotes
        assert_eq!(
            builtin_str(&[Form::Str("x".to_string())]).unwrap(),
            Form::Str("x".to_string())
        );
        assert_eq!(
            builtin_str(&[Form::Keyword("k".to_string())]).unwrap(),
            Form::Str(":k".to_string())
        );
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(builtin_int(&[Form::Float(3.9)]).unwrap(), Form::Int(3));
        assert_eq!(
            builtin_int(&[Form::Str(" 42 ".to_string())]).unwrap(),
            Form::Int(42)
        );
        assert_eq!(builtin_int(&[Form::Bool(true)]).unwrap(), Form::Int(1));
        assert!(builtin_int(&[Form::Str("nope".to_string())]).is_err());
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(builtin_float(&[Form::Int(2)]).unwrap(), Form::Float(2.0));
        assert_eq!(
            builtin_float(&[Form::Str("2.5".to_string())]).unwrap(),
            Form::Float(2.5)
        );
    }

    #[test]
    fn test_complex_construction() {
        assert_eq!(
            builtin_complex(&[Form::Int(3), Form::Int(4)]).unwrap(),
            Form::Complex(Complex64::new(3.0, 4.0))
        );
        assert_eq!(
            builtin_complex(&[Form::Float(1.5)]).unwrap(),
            Form::Complex(Complex64::new(1.5, 0.0))
        );
    }

    #[test]
    fn test_dict_pairs_arguments() {
        let result = builtin_dict(&[
            Form::Keyword("a".to_string()),
            Form::Int(1),
            Form::Keyword("b".to_string()),
            Form::Int(2),
        ])
        .unwrap();
        match result {
            Form::Map(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(
                    entries.get(&Form::Keyword("a".to_string())),
                    Some(&Form::Int(1))
                );
            }
            other => panic!("Expected a map, got {:?}", other),
        }
        assert!(builtin_dict(&[Form::Int(1)]).is_err());
    }

    #[test]
    fn test_sequence_constructors() {
        assert_eq!(builtin_list(&[]).unwrap(), Form::Nil);
        assert_eq!(
            builtin_list(&[Form::Int(1)]).unwrap(),
            Form::List(vec![Form::Int(1)])
        );
        assert_eq!(
            builtin_vector(&[Form::Int(1)]).unwrap(),
            Form::Vector(vec![Form::Int(1)])
        );
        assert_eq!(
            builtin_tuple(&[Form::Int(1), Form::Int(2)]).unwrap(),
            Form::Tuple(vec![Form::Int(1), Form::Int(2)])
        );
    }
}
