mod args;

use clap::{CommandFactory, Parser};
use rfc4648_codec::{DecodePolicy, Operation, Settings, TranscodeError, TranscodeSummary, run};
use std::fs::File;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use args::Cli;

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let encoding = match cli.encoding() {
        Ok(encoding) => encoding,
        Err(message) => Cli::command()
            .error(clap::error::ErrorKind::ArgumentConflict, message)
            .exit(),
    };
    let operation = Operation::new(cli.mode, encoding);

    match execute(&cli, operation) {
        Ok(summary) => {
            tracing::info!(
                %operation,
                bytes_read = summary.bytes_read,
                bytes_written = summary.bytes_written,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<TranscodeError>() {
                Some(TranscodeError::Decode(err)) => eprintln!("{}", err),
                Some(err) => {
                    eprintln!("{}", err);
                    print_usage();
                }
                None => {
                    eprintln!("error: {}", e);
                    print_usage();
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn execute(
    cli: &Cli,
    operation: Operation,
) -> Result<TranscodeSummary, Box<dyn std::error::Error>> {
    let mut settings = Settings::load_with_overrides()?;
    if let Some(path) = &cli.config {
        settings.merge(Settings::load_from_file(path)?);
    }
    if cli.lenient {
        settings.decode.policy = Some(DecodePolicy::Lenient);
    }

    let mut input = File::open(&cli.input)
        .map_err(|e| format!("cannot open {}: {}", cli.input.display(), e))?;
    let output = File::create(&cli.output)
        .map_err(|e| format!("cannot create {}: {}", cli.output.display(), e))?;

    tracing::debug!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        buffer_size = settings.buffer_size(),
        "opened files"
    );

    Ok(run(operation, &mut input, output, &settings)?)
}

fn print_usage() {
    eprintln!();
    eprintln!("{}", Cli::command().render_usage());
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
