use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use numskull::LANGUAGE_VERSION;
use numskull_vm::input::{BinaryInput, ConsoleInput, Input, TextInput};
use numskull_vm::output::Output;
use numskull_vm::{Config, Vm, VmError, INTERPRETER_VERSION};

/// Assemble and run a numskull program.
#[derive(Debug, Parser)]
#[command(name = "numskull", disable_version_flag = true)]
struct Args {
    /// Program source file.
    #[arg(required_unless_present = "version")]
    program: Option<PathBuf>,
    /// Read input from a file instead of the console.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,
    /// Read the input file as one number per line instead of bytes.
    #[arg(short, long)]
    text: bool,
    /// Write output to a file instead of the console.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Also write to the console when writing to a file.
    #[arg(short, long)]
    console: bool,
    /// Call depth that logs a warning, -1 to disable.
    #[arg(short = 'd', long, default_value_t = 32, allow_negative_numbers = true)]
    depth_warn: i64,
    /// Call depth that stops the program, -1 to disable.
    #[arg(short = 'q', long, default_value_t = -1, allow_negative_numbers = true)]
    depth_quit: i64,
    /// Print version information.
    #[arg(short = 'v', long)]
    version: bool,
    /// Print the assembled program instead of running it.
    #[arg(long)]
    listing: bool,
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("unable to open {}: {err}", .path.display())]
    Open { path: PathBuf, err: io::Error },
    #[error("assembly failed with {0} error(s)")]
    Assemble(usize),
    #[error("fatal: {0}")]
    Vm(#[from] VmError),
}

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|err| Error::Open {
        path: path.to_owned(),
        err,
    })
}

fn depth(n: i64) -> Option<usize> {
    usize::try_from(n).ok()
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(args.log_level)
        .init();

    if args.version {
        println!("numskull interpreter {INTERPRETER_VERSION}");
        println!("numskull language {LANGUAGE_VERSION}");
        return ExitCode::SUCCESS;
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let Some(path) = &args.program else {
        return Ok(());
    };
    let src = std::fs::read_to_string(path).map_err(|err| Error::Open {
        path: path.clone(),
        err,
    })?;
    let program = numskull::assemble(&src).map_err(|errors| {
        for e in &errors {
            eprintln!("{}: {e}", path.display());
        }
        Error::Assemble(errors.len())
    })?;
    if args.listing {
        print!("{program}");
        return Ok(());
    }

    if args.console && args.output.is_none() {
        tracing::warn!("--console has no effect without --output");
    }
    if args.text && args.input.is_none() {
        tracing::warn!("--text has no effect without --input");
    }

    let input: Box<dyn Input> = match &args.input {
        Some(path) if args.text => Box::new(TextInput::new(BufReader::new(open(path)?))),
        Some(path) => Box::new(BinaryInput::new(BufReader::new(open(path)?))),
        None => Box::new(ConsoleInput::stdin()),
    };
    let output = match &args.output {
        Some(path) => {
            let output = Output::new().file(path).map_err(|err| Error::Open {
                path: path.clone(),
                err,
            })?;
            if args.console {
                output.console()
            } else {
                output
            }
        }
        None => Output::new().console(),
    };
    let config = Config {
        warn_depth: depth(args.depth_warn),
        quit_depth: depth(args.depth_quit),
    };
    tracing::debug!(?config, cells = program.len(), "running {}", path.display());
    let mut vm = Vm::new(input, output).with_config(config);
    vm.execute(&program)?;
    Ok(())
}
