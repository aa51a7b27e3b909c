// ABOUTME: Interactive read-eval-print loop with history, completion, and multi-line input

use crate::config;
use crate::error::LoadError;
use crate::interpreter::Interpreter;
use crate::value::Form;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use rustyline_derive::{Helper, Highlighter, Hinter, Validator};

/// rustyline helper providing word-list tab completion over the special
/// forms, builtins, and module names.
#[derive(Helper, Highlighter, Hinter, Validator)]
pub struct RippleHelper {
    candidates: Vec<String>,
}

impl RippleHelper {
    pub fn new() -> Self {
        let mut candidates: Vec<String> =
            config::COMPLETIONS.iter().map(|s| s.to_string()).collect();
        candidates.sort();
        RippleHelper { candidates }
    }
}

impl Default for RippleHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for RippleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || "()[]{}'`~,".contains(c))
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        if word.is_empty() {
            return Ok((start, Vec::new()));
        }
        let matches = self
            .candidates
            .iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, matches))
    }
}

/// Balanced `()`, `[]`, `{}` means the buffered input is ready to read; until
/// then the REPL keeps accumulating lines under the continuation prompt.
pub fn has_matching_delimiters(text: &str) -> bool {
    let opens = |open: char, close: char| {
        text.chars().filter(|&c| c == open).count() == text.chars().filter(|&c| c == close).count()
    };
    opens('(', ')') && opens('[', ']') && opens('{', '}')
}

/// The interactive loop. Returns when the user quits.
pub fn run(interp: &mut Interpreter) -> rustyline::Result<()> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<RippleHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(RippleHelper::new()));
    let _ = rl.load_history(config::HISTORY_FILE);

    let mut pending = String::new();

    loop {
        let prompt = if pending.is_empty() {
            config::IN_PROMPT
        } else {
            config::OUT_PROMPT
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let input = if pending.is_empty() {
                    line
                } else {
                    format!("{}\n{}", pending, line)
                };
                pending.clear();

                if input.trim().is_empty() {
                    continue;
                }
                if matches!(input.trim(), "(quit)" | "(exit)") {
                    break;
                }
                if !has_matching_delimiters(&input) {
                    pending = input;
                    continue;
                }

                match interp.eval_line(&input) {
                    // Definitions return the empty list; don't echo it
                    Ok(Form::Nil) => {}
                    Ok(result) => println!("> {}\n", result),
                    Err(LoadError::Read(e)) if e.is_incomplete() => {
                        pending = input;
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C abandons the pending input, not the session
                println!("^C");
                pending.clear();
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(config::HISTORY_FILE);
    Ok(())
}
