use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use h2o_trace::{
    check_trace_file, check_trace_reader, CheckReport, CheckResult, CheckSummary, CheckerConfig,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "h2o-check",
    about = "Check an H2O barrier protocol trace",
    version
)]
struct Cli {
    /// Number of molecules the trace should build
    #[arg(value_name = "MOLECULES", value_parser = clap::value_parser!(u32).range(1..))]
    molecules: u32,

    /// Trace file ('-' reads stdin)
    #[arg(short, long, value_name = "FILE", default_value = h2o_trace::DEFAULT_TRACE_FILE)]
    trace: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: Format,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Silent on success, `Row N: reason` on failure
    Text,
    /// JSON report on stdout
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(&cli);

    match cli.format {
        Format::Text => {
            if let Err(e) = &result {
                eprintln!("{e}");
            }
        }
        Format::Json => match CheckReport::from(&result).to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{e}"),
        },
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: &Cli) -> CheckResult<CheckSummary> {
    if cli.trace.as_os_str() == "-" {
        return check_trace_reader(cli.molecules, std::io::stdin().lock());
    }

    let config = CheckerConfig::builder()
        .molecules(cli.molecules)
        .trace_path(cli.trace.clone())
        .build()?;
    check_trace_file(&config)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
