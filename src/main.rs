mod cli;
mod config;

use clap::Parser;
use cli::Args;
use config::Settings;
use license_curator::adapters::outbound::console::{StderrProgressReporter, SummaryPrinter};
use license_curator::adapters::outbound::filesystem::{
    FileSystemEvidenceReader, JsonHistoryStore, YamlPolicyReader,
};
use license_curator::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use license_curator::application::use_cases::RunCurationUseCase;
use license_curator::ports::inbound::LicenseCurationPort;
use license_curator::shared::error::ExitCode;
use license_curator::shared::Result;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                // --help and --version
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    // Merge config file and command-line arguments
    let config = match args.config {
        Some(ref path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(&std::env::current_dir()?)?,
    };
    let settings = Settings::resolve(args, config)?;
    tracing::debug!(?settings, "resolved settings");

    // Create adapters (Dependency Injection)
    let policy_reader = YamlPolicyReader::new();
    let evidence_reader = FileSystemEvidenceReader::new();
    let history_store = JsonHistoryStore::new(settings.history_path.clone());
    let progress_reporter = StderrProgressReporter::new();

    let use_case = RunCurationUseCase::new(
        policy_reader,
        evidence_reader,
        Some(history_store),
        progress_reporter,
    );

    let response = use_case.run_curation(settings.request)?;

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format);
    let formatted_output = formatter.format(&response)?;

    let presenter = PresenterFactory::create(PresenterType::from(settings.output));
    presenter.present(&formatted_output)?;

    eprint!("\n{}", SummaryPrinter::render(&response));

    let blocking = settings.fail_on_forbidden && response.has_blocking_packages();
    let critical = settings.fail_on_critical_change && response.critical_change_detected;
    if blocking || critical {
        if blocking {
            eprintln!("\n❌ Forbidden or incompatible licenses found (--fail-on-forbidden)");
        }
        if critical {
            eprintln!("\n❌ Critical license change detected (--fail-on-critical-change)");
        }
        return Ok(ExitCode::BlockingIssuesDetected);
    }

    Ok(ExitCode::Success)
}
