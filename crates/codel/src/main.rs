//!
//! Run image programs, or paint text into one.
//!
//! Usage:
//!   `codel run <image.png> [-i] [--input TEXT] [--max-steps N]`
//!   `codel paint <name> [--text TEXT] [--codel-size N]`

use std::fmt;
use std::io::{self, BufRead, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use codel_machine::painter::Painter;
use codel_machine::{ColourGrid, Interpreter, MachineError, Outcome, RunConfig};

mod picture;

#[derive(Parser, Debug)]
#[command(name = "codel")]
#[command(about = "Run image programs and paint text as programs")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program image
    Run {
        /// Path to a PNG program
        image: PathBuf,

        /// Ask for the program's input before running
        #[arg(short, long, conflicts_with = "input")]
        interactive: bool,

        /// Input text for the read instructions
        #[arg(long)]
        input: Option<String>,

        /// Stop after this many steps
        #[arg(long = "max-steps")]
        max_steps: Option<u64>,
    },
    /// Paint text as a program that prints it
    Paint {
        /// Output name; `.png` is appended
        name: String,

        /// Text to paint; read from stdin when omitted
        #[arg(long)]
        text: Option<String>,

        /// Pixels per codel
        #[arg(long = "codel-size", default_value_t = 1)]
        codel_size: usize,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,codel=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    init_logging();

    match Args::parse().command {
        Command::Run {
            image,
            interactive,
            input,
            max_steps,
        } => {
            let input = match (interactive, input) {
                (true, _) => prompt("> ")?,
                (false, Some(text)) => text,
                (false, None) => String::new(),
            };
            run(&image, &input, RunConfig { max_steps })
        }
        Command::Paint {
            name,
            text,
            codel_size,
        } => {
            let text = match text {
                Some(text) => text,
                None => prompt("text: ")?,
            };
            paint(&name, &text, codel_size)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run(path: &Path, input: &str, config: RunConfig) -> Result<ExitCode> {
    if !has_png_extension(path) {
        bail!("{} is not a .png file", path.display());
    }
    let raster = picture::load(path)?;
    let grid = ColourGrid::new(raster);
    info!(
        path = %path.display(),
        codel_size = grid.codel_size(),
        width = grid.width(),
        height = grid.height(),
        "loaded program"
    );

    let mut interpreter = Interpreter::with_config(&grid, input, config);
    let mut out = StdoutSink::new();
    let result = interpreter.run(&mut out);
    println!();

    match result {
        Ok(Outcome::Halted { steps }) => {
            debug!(steps, "program halted");
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::StepLimit { steps }) => {
            warn!(steps, "stopped at the step limit");
            Ok(ExitCode::SUCCESS)
        }
        Err(MachineError::Output) => bail!("could not write program output"),
        Err(error) => {
            eprintln!("error: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn paint(name: &str, text: &str, codel_size: usize) -> Result<()> {
    let raster = Painter::new(text)
        .codel_size(codel_size)
        .paint()
        .map_err(|error| anyhow::anyhow!("{error}"))
        .with_context(|| format!("failed to paint {text:?}"))?;

    let path = output_path(name);
    picture::save(&raster, &path)?;
    info!(path = %path.display(), "painted program");
    Ok(())
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn output_path(name: &str) -> PathBuf {
    let path = PathBuf::from(name);
    if has_png_extension(&path) {
        path
    } else {
        PathBuf::from(format!("{name}.png"))
    }
}

/// Prints `message` and reads one line from stdin, without its line ending.
fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Program output goes straight to stdout, flushed after every write so
/// that it interleaves with anything else on the terminal.
struct StdoutSink {
    stdout: io::Stdout,
}

impl StdoutSink {
    fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl fmt::Write for StdoutSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lock = self.stdout.lock();
        lock.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        lock.flush().map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod test;
