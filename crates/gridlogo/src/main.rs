use anyhow::Context;
use clap::Parser;
use gridlogo::{Error, Program, Registry};
use std::{io::Write, path::PathBuf, process::exit};

/// Draws a LOGO script onto a grid of text cells.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The script to run.
    input: PathBuf,

    /// Write the grid to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only check that the script parses.
    #[arg(long)]
    check: bool,
}

// Prefixes the interpreter's message with the stage that failed and, if
// known, where in the script it happened.
fn stage_error(stage: &str, e: &Error) -> anyhow::Error {
    match e.span() {
        Some(span) => anyhow::anyhow!("{stage} error at {span}: {e}"),
        None => anyhow::anyhow!("{stage} error: {e}"),
    }
}

fn run(args: &Args, stdout: &mut impl Write) -> anyhow::Result<()> {
    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to open input file {}", args.input.display()))?;

    let prog = Program::parse(&input, Registry::standard())
        .map_err(|e| stage_error("Parse", &e.into()))?;

    if args.check {
        writeln!(stdout, "{}: ok", args.input.display())?;
        log::info!("{} top-level commands", prog.commands.len());
        return Ok(());
    }

    let grid = prog.run().map_err(|e| stage_error("Evaluation", &e))?;
    log::debug!("{} cells visited", grid.visited_count());

    let text = grid.render();
    match &args.output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write output file {}", path.display()))?,
        None => stdout.write_all(text.as_bytes())?,
    }
    Ok(())
}

pub fn main() {
    pretty_env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args, &mut std::io::stdout().lock()) {
        eprintln!("{e:#}");
        exit(1);
    }
}
