use clap::Parser;
use ripple::config;
use ripple::error::LoadError;
use ripple::interpreter::Interpreter;
use ripple::repl;
use ripple::value::Form;
use std::path::PathBuf;
use std::process::ExitCode;

/// Prelude evaluation failure uses a recognisable exit code
const PRELUDE_EXIT: u8 = 42;

/// A small Lisp dialect with vectors, maps, keywords, and macros
#[derive(Parser, Debug)]
#[command(name = "ripple")]
#[command(version = config::VERSION)]
#[command(about = "A small Lisp dialect with a tail-call-optimised interpreter")]
struct CliArgs {
    /// Source file to evaluate instead of starting the REPL
    #[arg(short = 'f', long = "filename", value_name = "FILE")]
    filename: Option<PathBuf>,

    /// One-shot script string to evaluate
    #[arg(short = 's', long = "script", value_name = "SRC")]
    script: Option<String>,

    /// Skip loading the prelude
    #[arg(long = "no-prelude")]
    no_prelude: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let mut interp = Interpreter::new();
    let interactive = args.filename.is_none() && args.script.is_none();

    if interactive {
        println!("{}", config::WELCOME_MESSAGE);
    }

    if args.no_prelude {
        if interactive {
            println!("{}", config::WELCOME_CLOSE);
        }
    } else {
        if interactive {
            println!("{}", config::PRELUDE_LOADING);
        }
        if let Err(e) = interp.load_prelude(&config::default_prelude_dir()) {
            eprintln!("error in prelude: {}", e);
            return ExitCode::from(PRELUDE_EXIT);
        }
        if interactive {
            println!("{}", config::PRELUDE_DONE);
        }
    }

    if let Some(path) = args.filename {
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("cannot read {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        return eval_and_print(&mut interp, &source);
    }

    if let Some(source) = args.script {
        return eval_and_print(&mut interp, &source);
    }

    match repl::run(&mut interp) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Evaluates a whole buffer, printing every non-empty result. The first error
/// aborts the run.
fn eval_and_print(interp: &mut Interpreter, source: &str) -> ExitCode {
    match interp.eval_source(source) {
        Ok(results) => {
            for result in results {
                if !matches!(result, Form::Nil) {
                    println!("{}", result);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_load_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_load_error(error: &LoadError) {
    match error {
        LoadError::Read(e) => eprintln!("Parse error: {}", e),
        other => eprintln!("Error: {}", other),
    }
}
