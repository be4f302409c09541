//! `routegen`: JSON route declarations in, Rust route glue out.

mod input;
mod output;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use routegen::{GeneratedOutput, Generator, RouteGenError, assemble_library};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::input::{InputDocument, load_config};
use crate::output::{render_error, write_atomic};

#[derive(Parser)]
#[command(name = "routegen")]
#[command(about = "Compile typed route declarations into Rust navigation glue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for every declaration in the input
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Worker threads; 0 uses one per core
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
    },
    /// Validate every declaration without writing anything
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// JSON document with `types` and `declarations`
    #[arg(short, long, value_name = "JSON")]
    input: PathBuf,

    /// Generator config; defaults to routegen.toml next to the input
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Returns whether every declaration generated cleanly.
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Generate {
            source,
            output,
            jobs,
        } => {
            let (outputs, clean) = generate(&source, jobs)?;
            let library = assemble_library(&outputs);
            match output {
                Some(path) => {
                    write_atomic(&path, &library)?;
                    info!(path = %path.display(), declarations = outputs.len(), "wrote routes");
                },
                None => std::io::stdout()
                    .write_all(library.as_bytes())
                    .context("failed to write to stdout")?,
            }
            Ok(clean)
        },
        Commands::Check { source } => {
            let (outputs, clean) = generate(&source, 1)?;
            info!(declarations = outputs.len(), clean, "checked routes");
            Ok(clean)
        },
    }
}

/// Run the batch, printing every failure; returns the successes.
fn generate(source: &SourceArgs, jobs: usize) -> Result<(Vec<GeneratedOutput>, bool)> {
    let document = InputDocument::load(&source.input)?;
    let config = load_config(&source.input, source.config.as_deref())?;
    let generator = Generator::new(&document.types, &config);

    let results = if jobs == 1 {
        generator.generate_batch(&document.declarations)
    } else {
        generator
            .generate_batch_parallel(&document.declarations, jobs)
            .context("failed to start worker threads")?
    };

    Ok(partition(results, &source.input))
}

fn partition(
    results: Vec<Result<GeneratedOutput, RouteGenError>>,
    input: &Path,
) -> (Vec<GeneratedOutput>, bool) {
    let mut outputs = Vec::with_capacity(results.len());
    let mut clean = true;
    for result in results {
        match result {
            Ok(output) => {
                debug!(declaration = output.declaration(), "generated");
                outputs.push(output);
            },
            Err(error) => {
                clean = false;
                eprint!("{}", render_error(&error));
                eprintln!("  in {}", input.display());
            },
        }
    }
    (outputs, clean)
}
