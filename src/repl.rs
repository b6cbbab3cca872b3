use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::Context;
use log::{debug, info};
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::eval::Interpreter;

pub const PROMPT: &str = "> ";

/// Runs the interactive loop until end of input or interrupt
pub fn run_interactive(interp: &Interpreter, quiet: bool) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new().context("Could not initialize line editor")?;
    if !quiet {
        println!("sexpi {} (Ctrl-D to exit)", env!("CARGO_PKG_VERSION"));
    }
    info!("interactive session started");
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                println!("{}", interp.rep(&line));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Could not read input"),
        }
    }
    Ok(())
}

/// Treats each line of the file as one interaction
pub fn run_file<W>(interp: &Interpreter, path: &Path, out: &mut W) -> anyhow::Result<()>
where
    W: Write,
{
    let source = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    info!("running {}", path.display());
    run_lines(interp, &source, out).context("Could not write output")
}

pub fn run_lines<W>(interp: &Interpreter, source: &str, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    for line in source.lines().filter(|line| !line.trim().is_empty()) {
        writeln!(out, "{}", interp.rep(line))?;
    }
    Ok(())
}

/// Treats a closed output pipe as a normal end of the run
pub fn ignore_broken_pipe(result: anyhow::Result<()>) -> anyhow::Result<()> {
    match result {
        Err(e) if e.chain().any(is_broken_pipe) => {
            debug!("output closed: {}", e);
            Ok(())
        }
        result => result,
    }
}

fn is_broken_pipe(cause: &(dyn std::error::Error + 'static)) -> bool {
    cause
        .downcast_ref::<io::Error>()
        .map_or(false, |e| e.kind() == io::ErrorKind::BrokenPipe)
}

/// Evaluates every form of the text, printing each result
pub fn run_eval<W>(interp: &Interpreter, text: &str, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    for form in interp.read_all(text) {
        writeln!(out, "{}", interp.eval_global(&form))?;
    }
    Ok(())
}
