//! Thin CLI demo binary: exercises [`itk_wasm_pipeline::Pipeline`] end to end
//! against a module on disk. This is not the generated per-algorithm
//! dispatch layer the host runtime spec marks out of scope (spec.md §1) —
//! it exists only to drive a real `wasmtime` `Engine` from the command line,
//! the way `wasmtime-cli`'s own `run` subcommand drives a module for
//! ad-hoc inspection.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use itk_wasm_pipeline::{Pipeline, PipelineInput, PipelineOutput, PipelineOutputRequest};
use tracing_subscriber::EnvFilter;

/// Run an itk-wasm WASI pipeline module and print its text-stream outputs.
#[derive(Parser, Debug)]
#[command(name = "itk-wasm-pipeline", version)]
struct Cli {
    /// Path to the compiled `.wasm` pipeline module.
    module: PathBuf,

    /// Extra argv entries passed to the guest after the program name.
    #[arg(long = "arg")]
    args: Vec<String>,

    /// A `TextStream` input, staged in the order given on the command line.
    #[arg(long = "text-in")]
    text_in: Vec<String>,

    /// Request one `TextStream` output slot per occurrence.
    #[arg(long = "text-out")]
    text_out: u32,

    /// Increase log verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn install_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_file(&cli.module)?.inherit_stdio(true);

    let inputs: Vec<PipelineInput> = cli.text_in.into_iter().map(PipelineInput::TextStream).collect();
    let outputs: Vec<PipelineOutputRequest> =
        (0..cli.text_out).map(|_| PipelineOutputRequest::TextStream).collect();

    let results = pipeline.run(&cli.args, &outputs, &inputs)?;
    if results.is_empty() && cli.text_out > 0 {
        eprintln!("pipeline reported a non-zero delayed_start return code; no outputs decoded");
    }
    for output in results {
        if let PipelineOutput::TextStream(text) = output {
            println!("{text}");
        }
    }
    Ok(())
}
