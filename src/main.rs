mod builtins;
mod env;
mod error;
mod eval;
mod parse;
mod repl;
mod symbol;
mod types;
mod value;

use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;

use eval::{Config, Interpreter, DEFAULT_MAX_DEPTH};

/// A small Lisp interpreter
#[derive(Parser)]
#[command(version)]
struct App {
    /// Run each line of this file instead of starting the REPL
    file: Option<PathBuf>,
    /// Evaluate these forms and print the results
    #[arg(short, long, value_name = "EXPR")]
    eval: Vec<String>,
    /// How deeply evaluation and reading may nest before they fail
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Don't print the banner on startup
    #[arg(short, long)]
    quiet: bool,
}

impl App {
    fn config(&self) -> Config {
        Config {
            max_depth: self.max_depth,
        }
    }
}

fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    env_logger::init();

    let app = App::parse();
    let interp = Interpreter::with_config(app.config());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = if !app.eval.is_empty() {
        app.eval.iter().try_for_each(|text| {
            repl::run_eval(&interp, text, &mut out).context("Could not write output")
        })
    } else if let Some(path) = &app.file {
        repl::run_file(&interp, path, &mut out)
    } else {
        drop(out);
        repl::run_interactive(&interp, app.quiet)
    };
    repl::ignore_broken_pipe(result)
}
