// ABOUTME: Trampoline evaluator: special forms, macro expansion, quasiquotation, application

use crate::builtins::register_builtins;
use crate::env::Environment;
use crate::error::{
    EvalError, ARITY_AT_LEAST_ONE, ARITY_ONE, ARITY_THREE_OR_FOUR, ARITY_TWO,
};
use crate::macros::MacroRegistry;
use crate::stdlib;
use crate::value::{Form, Procedure};
use std::rc::Rc;

/// Result of applying a callable: builtins produce a value, procedures hand
/// back their body and call frame so the trampoline can continue in place.
enum Applied {
    Value(Form),
    Tail(Form, Rc<Environment>),
}

/// Owns the global environment and the macro table for one session.
pub struct Evaluator {
    global: Rc<Environment>,
    macros: MacroRegistry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        let global = Environment::new();
        register_builtins(&global);
        Evaluator {
            global,
            macros: MacroRegistry::new(),
        }
    }

    pub fn global_env(&self) -> Rc<Environment> {
        self.global.clone()
    }

    pub fn eval_global(&mut self, form: Form) -> Result<Form, EvalError> {
        let env = self.global.clone();
        self.eval(form, env)
    }

    /// Evaluates a form. The loop rewrites `(expr, env)` for every tail
    /// position (`if`, `cond`, `let`, `begin`, `eval`, `apply`, and procedure
    /// application), so deep user-level recursion runs in constant host stack.
    pub fn eval(&mut self, form: Form, env: Rc<Environment>) -> Result<Form, EvalError> {
        let mut expr = form;
        let mut env = env;

        loop {
            match expr {
                Form::Symbol(name) => {
                    return env
                        .lookup(&name)
                        .ok_or(EvalError::UnknownSymbol(name));
                }

                // Vector and tuple literals evaluate element-wise
                Form::Vector(items) => return Ok(Form::Vector(self.eval_args(&items, &env)?)),
                Form::Tuple(items) => return Ok(Form::Tuple(self.eval_args(&items, &env)?)),

                Form::List(items) => {
                    if items.is_empty() {
                        return Ok(Form::Nil);
                    }

                    let head_symbol = match &items[0] {
                        Form::Symbol(s) => Some(s.clone()),
                        _ => None,
                    };

                    // A symbol naming a macro rewrites to the expansion of its
                    // unevaluated operands, then continues at the top level.
                    if let Some(name) = head_symbol.as_deref() {
                        if let Some(transformer) = self.macros.get(name) {
                            let operands = items[1..].to_vec();
                            expr = self.call_procedure(&transformer, operands)?;
                            env = self.global.clone();
                            continue;
                        }
                    }

                    match head_symbol.as_deref() {
                        Some("quote") => {
                            if items.len() != 2 {
                                return Err(EvalError::arity_error(
                                    "quote",
                                    ARITY_ONE,
                                    items.len() - 1,
                                ));
                            }
                            return Ok(items[1].clone());
                        }

                        Some("quasiquote") => {
                            if items.len() != 2 {
                                return Err(EvalError::arity_error(
                                    "quasiquote",
                                    ARITY_ONE,
                                    items.len() - 1,
                                ));
                            }
                            return self.expand_quasiquote(items[1].clone(), 1, &env);
                        }

                        Some("unquote") | Some("unquote-splicing") => {
                            return Err(EvalError::UnquoteContext);
                        }

                        Some("if") => {
                            if !(3..=4).contains(&items.len()) {
                                return Err(EvalError::MalformedIf(format!(
                                    "expected 2 or 3 operands, got {}",
                                    items.len() - 1
                                )));
                            }
                            let test = self.eval(items[1].clone(), env.clone())?;
                            if test.is_truthy() {
                                expr = items[2].clone();
                            } else if items.len() == 4 {
                                expr = items[3].clone();
                            } else {
                                return Ok(Form::Nil);
                            }
                        }

                        Some("cond") => {
                            let mut chosen = None;
                            for branch in &items[1..] {
                                let pair = match branch {
                                    Form::List(pair) if pair.len() == 2 => pair,
                                    other => {
                                        return Err(EvalError::MalformedCond(format!(
                                            "expected a (test body) pair, got {}",
                                            other
                                        )));
                                    }
                                };
                                match self.eval(pair[0].clone(), env.clone())? {
                                    Form::Keyword(k) if k == "else" => {
                                        chosen = Some(pair[1].clone());
                                        break;
                                    }
                                    Form::Bool(true) => {
                                        chosen = Some(pair[1].clone());
                                        break;
                                    }
                                    Form::Bool(false) => {}
                                    other => {
                                        return Err(EvalError::MalformedCond(format!(
                                            "test evaluated to {}, not a boolean or :else",
                                            other
                                        )));
                                    }
                                }
                            }
                            match chosen {
                                Some(body) => expr = body,
                                None => return Ok(Form::Nil),
                            }
                        }

                        Some("set!") => {
                            if items.len() != 3 {
                                return Err(EvalError::arity_error(
                                    "set!",
                                    ARITY_TWO,
                                    items.len() - 1,
                                ));
                            }
                            let name = match &items[1] {
                                Form::Symbol(s) => s.clone(),
                                other => {
                                    return Err(EvalError::NotASymbol {
                                        form: "set!",
                                        got: other.to_string(),
                                    });
                                }
                            };
                            let value = self.eval(items[2].clone(), env.clone())?;
                            env.set(&name, value)?;
                            return Ok(Form::Nil);
                        }

                        Some("define") => {
                            if items.len() != 3 {
                                return Err(EvalError::MalformedDefine(format!(
                                    "expected a name and a value, got {} operands",
                                    items.len() - 1
                                )));
                            }
                            let name = match &items[1] {
                                Form::Symbol(s) => s.clone(),
                                other => {
                                    return Err(EvalError::NotASymbol {
                                        form: "define",
                                        got: other.to_string(),
                                    });
                                }
                            };
                            if env.is_bound(&name) {
                                return Err(EvalError::Redefinition(name));
                            }
                            let value = self.eval(items[2].clone(), env.clone())?;
                            env.insert(name, value);
                            return Ok(Form::Nil);
                        }

                        Some("lambda") | Some("fn") | Some("λ") => {
                            if items.len() != 3 {
                                return Err(EvalError::MalformedLambda(format!(
                                    "expected parameters and a body, got {} operands",
                                    items.len() - 1
                                )));
                            }
                            let params = parameter_names(&items[1])?;
                            return Ok(Form::Procedure(Rc::new(Procedure {
                                params,
                                docstring: None,
                                body: items[2].clone(),
                                env: env.clone(),
                            })));
                        }

                        Some("defn") => {
                            self.eval_defn(&items[1..], &env)?;
                            return Ok(Form::Nil);
                        }

                        Some("defmacro") => {
                            self.eval_defmacro(&items[1..], &env)?;
                            return Ok(Form::Nil);
                        }

                        Some("let") => {
                            expr = rewrite_let(&items[1..])?;
                        }

                        Some("begin") => {
                            if items.len() == 1 {
                                return Ok(Form::Nil);
                            }
                            for item in &items[1..items.len() - 1] {
                                self.eval(item.clone(), env.clone())?;
                            }
                            expr = items[items.len() - 1].clone();
                        }

                        Some("eval") => {
                            if items.len() != 2 {
                                return Err(EvalError::arity_error(
                                    "eval",
                                    ARITY_ONE,
                                    items.len() - 1,
                                ));
                            }
                            expr = self.eval(items[1].clone(), env.clone())?;
                        }

                        Some("apply") => {
                            if items.len() != 3 {
                                return Err(EvalError::arity_error(
                                    "apply",
                                    ARITY_TWO,
                                    items.len() - 1,
                                ));
                            }
                            let target = self.eval(items[1].clone(), env.clone())?;
                            let argv = match self.eval(items[2].clone(), env.clone())? {
                                Form::Nil => Vec::new(),
                                Form::List(args) | Form::Vector(args) | Form::Tuple(args) => args,
                                other => {
                                    return Err(EvalError::type_error(
                                        "apply",
                                        "a sequence of arguments",
                                        &other,
                                    ));
                                }
                            };
                            match self.apply_callable(target, argv)? {
                                Applied::Value(result) => return Ok(result),
                                Applied::Tail(body, call_env) => {
                                    expr = body;
                                    env = call_env;
                                }
                            }
                        }

                        Some("import") => {
                            self.eval_import(&items[1..], &env)?;
                            return Ok(Form::Nil);
                        }

                        _ => {
                            // Application: evaluate the head to a callable,
                            // then the operands left to right.
                            let target = self.eval(items[0].clone(), env.clone())?;
                            let argv = self.eval_args(&items[1..], &env)?;
                            match self.apply_callable(target, argv)? {
                                Applied::Value(result) => return Ok(result),
                                Applied::Tail(body, call_env) => {
                                    expr = body;
                                    env = call_env;
                                }
                            }
                        }
                    }
                }

                // Everything else is self-evaluating
                other => return Ok(other),
            }
        }
    }

    fn eval_args(&mut self, forms: &[Form], env: &Rc<Environment>) -> Result<Vec<Form>, EvalError> {
        forms
            .iter()
            .map(|form| self.eval(form.clone(), env.clone()))
            .collect()
    }

    fn apply_callable(&mut self, target: Form, argv: Vec<Form>) -> Result<Applied, EvalError> {
        match target {
            Form::Procedure(procedure) => {
                let call_env = call_env(&procedure, argv)?;
                Ok(Applied::Tail(procedure.body.clone(), call_env))
            }
            Form::Builtin(builtin) => Ok(Applied::Value((builtin.func)(&argv)?)),
            _ => Err(EvalError::NotCallable),
        }
    }

    /// Non-tail invocation, used for macro expansion where the result is a
    /// form to keep rewriting rather than a final value.
    fn call_procedure(
        &mut self,
        procedure: &Procedure,
        argv: Vec<Form>,
    ) -> Result<Form, EvalError> {
        let call_env = call_env(procedure, argv)?;
        self.eval(procedure.body.clone(), call_env)
    }

    /// `(defn name params body)` / `(defn name docstring params body)`
    fn eval_defn(&mut self, operands: &[Form], env: &Rc<Environment>) -> Result<(), EvalError> {
        let (name_form, docstring, params_form, body) = destructure_defn("defn", operands)?;
        let name = match name_form {
            Form::Symbol(s) => s.clone(),
            other => {
                return Err(EvalError::NotASymbol {
                    form: "defn",
                    got: other.to_string(),
                });
            }
        };
        if env.is_bound(&name) {
            return Err(EvalError::Redefinition(name));
        }
        let procedure = Procedure {
            params: parameter_names(params_form)?,
            docstring,
            body: body.clone(),
            env: env.clone(),
        };
        env.insert(name, Form::Procedure(Rc::new(procedure)));
        Ok(())
    }

    /// Same shape as `defn`, but installs into the macro table. Only legal
    /// when evaluating directly in the global frame.
    fn eval_defmacro(&mut self, operands: &[Form], env: &Rc<Environment>) -> Result<(), EvalError> {
        if !Rc::ptr_eq(env, &self.global) {
            return Err(EvalError::MacroNotAtTopLevel);
        }
        let (name_form, docstring, params_form, body) = destructure_defn("defmacro", operands)?;
        let name = match name_form {
            Form::Symbol(s) => s.clone(),
            other => {
                return Err(EvalError::NotASymbol {
                    form: "defmacro",
                    got: other.to_string(),
                });
            }
        };
        if self.macros.contains(&name) {
            return Err(EvalError::Redefinition(name));
        }
        let transformer = Procedure {
            params: parameter_names(params_form)?,
            docstring,
            body: body.clone(),
            env: env.clone(),
        };
        self.macros.define(name, Rc::new(transformer));
        Ok(())
    }

    /// Expands a quasiquote template. Unquoted operands are evaluated in the
    /// current environment; `depth` tracks quasiquote nesting so inner
    /// templates survive intact.
    fn expand_quasiquote(
        &mut self,
        template: Form,
        depth: usize,
        env: &Rc<Environment>,
    ) -> Result<Form, EvalError> {
        let items = match template {
            Form::List(items) if !items.is_empty() => items,
            other => return Ok(other),
        };

        match &items[0] {
            Form::Symbol(s) if s == "unquote" && depth == 1 => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error("unquote", ARITY_ONE, items.len() - 1));
                }
                self.eval(items[1].clone(), env.clone())
            }

            // Splicing into the head position of the list being built has no
            // defined meaning.
            Form::Symbol(s) if s == "unquote-splicing" && depth == 1 => {
                Err(EvalError::SpliceAtHead)
            }

            Form::Symbol(s) if s == "quasiquote" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error(
                        "quasiquote",
                        ARITY_ONE,
                        items.len() - 1,
                    ));
                }
                let inner = self.expand_quasiquote(items[1].clone(), depth + 1, env)?;
                Ok(Form::List(vec![Form::symbol("quasiquote"), inner]))
            }

            _ => {
                let mut expanded = Vec::new();
                for item in &items {
                    if depth == 1 {
                        if let Some(operands) = splice_operands(item) {
                            if operands.len() != 1 {
                                return Err(EvalError::arity_error(
                                    "unquote-splicing",
                                    ARITY_ONE,
                                    operands.len(),
                                ));
                            }
                            match self.eval(operands[0].clone(), env.clone())? {
                                Form::List(spliced) => expanded.extend(spliced),
                                Form::Nil => {}
                                other => {
                                    return Err(EvalError::type_error(
                                        "unquote-splicing",
                                        "a list",
                                        &other,
                                    ));
                                }
                            }
                            continue;
                        }
                    }
                    expanded.push(self.expand_quasiquote(item.clone(), depth, env)?);
                }
                Ok(Form::list(expanded))
            }
        }
    }

    /// `(import mod)` / `(import mod :as alias)` / `(import mod :from (a b))`
    /// copies a native module's bindings into the current innermost frame.
    fn eval_import(&mut self, operands: &[Form], env: &Rc<Environment>) -> Result<(), EvalError> {
        let module = match operands.first() {
            Some(Form::Symbol(s)) => s.clone(),
            Some(other) => {
                return Err(EvalError::NotASymbol {
                    form: "import",
                    got: other.to_string(),
                });
            }
            None => return Err(EvalError::arity_error("import", ARITY_AT_LEAST_ONE, 0)),
        };

        let bindings = stdlib::module_bindings(&module).ok_or_else(|| {
            EvalError::runtime_error("import", format!("unknown module `{}`", module))
        })?;

        match &operands[1..] {
            [] => {
                for (name, value) in bindings {
                    env.insert(format!("{}/{}", module, name), value);
                }
            }
            [Form::Keyword(k), Form::Symbol(alias)] if k == "as" => {
                for (name, value) in bindings {
                    env.insert(format!("{}/{}", alias, name), value);
                }
            }
            [Form::Keyword(k), selection] if k == "from" => {
                let wanted = match selection {
                    Form::List(names) | Form::Vector(names) => names,
                    other => return Err(EvalError::type_error("import", "a list of names", other)),
                };
                for name_form in wanted {
                    let name = match name_form {
                        Form::Symbol(s) => s.as_str(),
                        other => {
                            return Err(EvalError::NotASymbol {
                                form: "import",
                                got: other.to_string(),
                            });
                        }
                    };
                    let value = bindings
                        .iter()
                        .find(|(n, _)| *n == name)
                        .map(|(_, v)| v.clone())
                        .ok_or_else(|| {
                            EvalError::runtime_error(
                                "import",
                                format!("module `{}` has no binding `{}`", module, name),
                            )
                        })?;
                    env.insert(name.to_string(), value);
                }
            }
            _ => {
                return Err(EvalError::runtime_error(
                    "import",
                    "expected `:as alias` or `:from (names ...)`",
                ));
            }
        }
        Ok(())
    }
}

fn call_env(procedure: &Procedure, argv: Vec<Form>) -> Result<Rc<Environment>, EvalError> {
    if procedure.params.len() != argv.len() {
        return Err(EvalError::arity_error(
            "procedure",
            procedure.params.len().to_string(),
            argv.len(),
        ));
    }
    Ok(Environment::extend(
        procedure.env.clone(),
        &procedure.params,
        argv,
    ))
}

/// Parameter lists may be written as lists or vectors; `()` means no
/// parameters.
fn parameter_names(form: &Form) -> Result<Vec<String>, EvalError> {
    let items = match form {
        Form::Nil => return Ok(Vec::new()),
        Form::List(items) | Form::Vector(items) => items,
        other => {
            return Err(EvalError::MalformedLambda(format!(
                "parameters must be a list, got {}",
                other
            )));
        }
    };
    items
        .iter()
        .map(|param| match param {
            Form::Symbol(s) => Ok(s.clone()),
            other => Err(EvalError::MalformedLambda(format!(
                "parameter {} is not a symbol",
                other
            ))),
        })
        .collect()
}

/// `(let ((p v) ...) body)` => `((lambda (p ...) body) v ...)`
fn rewrite_let(operands: &[Form]) -> Result<Form, EvalError> {
    if operands.len() != 2 {
        return Err(EvalError::MalformedLet(format!(
            "expected bindings and a body, got {} operands",
            operands.len()
        )));
    }

    let bindings = match &operands[0] {
        Form::Nil => &[][..],
        Form::List(pairs) => pairs.as_slice(),
        other => {
            return Err(EvalError::MalformedLet(format!(
                "bindings must be a list, got {}",
                other
            )));
        }
    };

    let mut params = Vec::new();
    let mut values = Vec::new();
    for binding in bindings {
        match binding {
            Form::List(pair) if pair.len() == 2 && matches!(pair[0], Form::Symbol(_)) => {
                params.push(pair[0].clone());
                values.push(pair[1].clone());
            }
            other => {
                return Err(EvalError::MalformedLet(format!(
                    "expected a (name value) pair, got {}",
                    other
                )));
            }
        }
    }

    let lambda = Form::List(vec![
        Form::symbol("lambda"),
        Form::list(params),
        operands[1].clone(),
    ]);
    let mut application = vec![lambda];
    application.extend(values);
    Ok(Form::List(application))
}

/// Shared shape of `defn` and `defmacro`: `(name params body)` with an
/// optional docstring in second position.
fn destructure_defn<'a>(
    form: &'static str,
    operands: &'a [Form],
) -> Result<(&'a Form, Option<String>, &'a Form, &'a Form), EvalError> {
    match operands {
        [name, params, body] => Ok((name, None, params, body)),
        [name, Form::Str(doc), params, body] => Ok((name, Some(doc.clone()), params, body)),
        [_, other, _, _] => Err(EvalError::MalformedDefine(format!(
            "docstring must be a string, got {}",
            other
        ))),
        _ => Err(EvalError::arity_error(
            form,
            ARITY_THREE_OR_FOUR,
            operands.len(),
        )),
    }
}

/// The operands of `(unquote-splicing ...)` when `form` is such a call.
fn splice_operands(form: &Form) -> Option<&[Form]> {
    match form {
        Form::List(parts) => match parts.first() {
            Some(Form::Symbol(s)) if s == "unquote-splicing" => Some(&parts[1..]),
            _ => None,
        },
        _ => None,
    }
}
