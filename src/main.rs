mod adapters;
mod application;
mod cli;
mod ports;
mod reconciliation;
mod shared;

use adapters::outbound::console::StderrProgressReporter;
use adapters::outbound::credentials::KeyringCredentialProvider;
use adapters::outbound::filesystem::{CsvReportWriter, FileSystemBarcodeReader};
use adapters::outbound::network::TindCatalogClient;
use application::dto::{CheckRequest, CheckResponse};
use application::use_cases::RunCheckUseCase;
use cli::Args;
use reconciliation::services::RetryPolicy;
use shared::error::{CheckError, ExitCode};
use shared::Result;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    if let Err(e) = init_tracing(args.debug.as_deref()) {
        eprintln!("Cannot set up debug tracing: {}", e);
        process::exit(ExitCode::ApplicationError.as_i32());
    }

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        let code = e
            .downcast_ref::<CheckError>()
            .map(CheckError::exit_code)
            .unwrap_or(ExitCode::ApplicationError);
        process::exit(code.as_i32());
    }
}

async fn run(args: Args) -> Result<CheckResponse> {
    let output_path = ensure_csv_extension(args.output);

    // Create adapters (Dependency Injection)
    let barcode_reader = FileSystemBarcodeReader::new();
    let credential_provider =
        KeyringCredentialProvider::new(args.user, args.password, !args.no_keyring);
    let catalog_client = TindCatalogClient::new(&args.server)?;
    let report_writer = CsvReportWriter::new(output_path.clone());
    let progress_reporter = StderrProgressReporter::new(args.quiet, !args.no_color);
    let retry_policy = RetryPolicy::new(
        args.max_retries,
        Duration::from_millis(args.retry_wait_ms),
    );

    // Create use case with injected dependencies
    let use_case = RunCheckUseCase::new(
        barcode_reader,
        credential_provider,
        catalog_client,
        report_writer,
        progress_reporter,
        retry_policy,
    );

    let request = CheckRequest::new(args.input, output_path);
    use_case.execute(request).await
}

/// Reports are always CSV; add the extension when the user left it off.
fn ensure_csv_extension(path: PathBuf) -> PathBuf {
    let has_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if has_csv {
        path
    } else {
        let mut with_ext = path.into_os_string();
        with_ext.push(".csv");
        PathBuf::from(with_ext)
    }
}

fn init_tracing(debug: Option<&str>) -> Result<()> {
    let Some(destination) = debug else {
        return Ok(());
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shelfcheck=debug"));

    if destination == "-" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = std::fs::File::create(destination)
            .map_err(|e| anyhow::anyhow!("Cannot open trace file {}: {}", destination, e))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    Ok(())
}
