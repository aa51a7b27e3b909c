// ABOUTME: The interpreter facade: reader + evaluator + prelude loading

use crate::error::LoadError;
use crate::eval::Evaluator;
use crate::parser;
use crate::value::Form;
use std::fs;
use std::path::Path;

/// One interpreter session: the reader, the evaluator with its global
/// environment and macro table, and the prelude loader.
pub struct Interpreter {
    evaluator: Evaluator,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            evaluator: Evaluator::new(),
        }
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }

    /// Reads the first form of `line` and evaluates it at the top level.
    pub fn eval_line(&mut self, line: &str) -> Result<Form, LoadError> {
        let form = parser::read(line)?;
        Ok(self.evaluator.eval_global(form)?)
    }

    /// Reads and evaluates every top-level form in order, returning each
    /// result. Scripts and prelude files come through here.
    pub fn eval_source(&mut self, source: &str) -> Result<Vec<Form>, LoadError> {
        let forms = parser::read_all(source)?;
        let mut results = Vec::with_capacity(forms.len());
        for form in forms {
            results.push(self.evaluator.eval_global(form)?);
        }
        Ok(results)
    }

    /// Evaluates every `.rpl` file in `dir` into the global environment, in
    /// file-name order. A missing directory loads nothing.
    pub fn load_prelude(&mut self, dir: &Path) -> Result<(), LoadError> {
        if !dir.is_dir() {
            return Ok(());
        }
        let entries = fs::read_dir(dir).map_err(|e| LoadError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();
        for path in &paths {
            self.slurp(path)?;
        }
        Ok(())
    }

    /// Reads one source file into the environment. Only `.rpl` files load.
    pub fn slurp(&mut self, path: &Path) -> Result<(), LoadError> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("rpl") {
            return Err(LoadError::BadSuffix(path.display().to_string()));
        }
        let contents = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.eval_source(&contents)?;
        Ok(())
    }
}
