//! Logic operations: and, or, not
//!
//! Plain procedures, so their operands are already evaluated; none of them
//! short-circuit. All three require booleans and return booleans.

use super::bind;
use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE};
use crate::value::Form;
use std::rc::Rc;

pub fn builtin_and(args: &[Form]) -> Result<Form, EvalError> {
    for arg in args {
        match arg {
            Form::Bool(false) => return Ok(Form::Bool(false)),
            Form::Bool(true) => continue,
            other => return Err(EvalError::type_error("and", "a boolean", other)),
        }
    }
    Ok(Form::Bool(true))
}

pub fn builtin_or(args: &[Form]) -> Result<Form, EvalError> {
    for arg in args {
        match arg {
            Form::Bool(true) => return Ok(Form::Bool(true)),
            Form::Bool(false) => continue,
            other => return Err(EvalError::type_error("or", "a boolean", other)),
        }
    }
    Ok(Form::Bool(false))
}

pub fn builtin_not(args: &[Form]) -> Result<Form, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("not", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Form::Bool(b) => Ok(Form::Bool(!b)),
        other => Err(EvalError::type_error("not", "a boolean", other)),
    }
}

/// Register all logic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    bind(env, "and", builtin_and);
    bind(env, "or", builtin_or);
    bind(env, "not", builtin_not);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and() {
        assert_eq!(
            builtin_and(&[Form::Bool(true), Form::Bool(true)]).unwrap(),
            Form::Bool(true)
        );
        assert_eq!(
            builtin_and(&[Form::Bool(true), Form::Bool(false)]).unwrap(),
            Form::Bool(false)
        );
        assert_eq!(builtin_and(&[]).unwrap(), Form::Bool(true));
    }

    #[test]
    fn test_or() {
        assert_eq!(
            builtin_or(&[Form::Bool(false), Form::Bool(true)]).unwrap(),
            Form::Bool(true)
        );
        assert_eq!(builtin_or(&[]).unwrap(), Form::Bool(false));
    }

    #[test]
    fn test_not() {
        assert_eq!(builtin_not(&[Form::Bool(true)]).unwrap(), Form::Bool(false));
        assert_eq!(builtin_not(&[Form::Bool(false)]).unwrap(), Form::Bool(true));
        assert!(builtin_not(&[Form::Int(1)]).is_err());
    }
}
