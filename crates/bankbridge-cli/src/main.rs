use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use bankbridge_cli::wiring::{build_state, listen_addr, load_settings, store_for};
use bankbridge_cli::{Command, Config};
use bankbridge_core::{assemble, AppError, RecordStore};
use bankbridge_server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    // Parse command line arguments
    let cli = Config::parse();

    // Setup logging (stderr to keep stdout clean for JSON output)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let settings = load_settings(&cli)?;
    let store = store_for(cli.command, &settings)?;

    match cli.command {
        Command::Serve => {
            let addr = listen_addr(&settings)?;
            let state = build_state(&settings, store)?;
            bankbridge_server::serve(state, addr)
                .await
                .with_context(|| format!("Server on {} failed", addr))?;
        }
        Command::Local => {
            print_local(&store)?;
        }
        Command::Remote => {
            let state = build_state(&settings, store)?;
            return print_remote(&state).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Print the seeded table as the same JSON array `/v1/banks/all` serves
fn print_local(store: &RecordStore) -> anyhow::Result<()> {
    let records = store.all_entries();
    write_json(&assemble(&records)?)?;
    info!("Printed {} local banks", records.len());
    Ok(())
}

/// Run one aggregation and print it as `/v2/banks/all` would
async fn print_remote(state: &AppState) -> anyhow::Result<ExitCode> {
    let result = match state.aggregator.aggregate(&state.directory).await {
        Ok(result) => result,
        Err(e) => {
            report(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    write_json(&assemble(result.records())?)?;

    eprintln!(
        "\n{} of {} providers answered",
        result.successful_count(),
        state.directory.len()
    );
    for label in result.failed_labels() {
        eprintln!("  ✗ {}", label);
    }

    Ok(ExitCode::SUCCESS)
}

fn report(e: &AppError) {
    error!("{}", e);
    eprintln!("\n{}\n", e.user_message());
}

fn write_json(body: &[u8]) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(body)?;
    writeln!(stdout)?;
    Ok(())
}
