use std::process::ExitCode;

use clap::Parser;
use csv_table_loader::app::{init_tracing, run};
use csv_table_loader::cli::Cli;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let report = match run(cli.run_options()).await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "Load aborted");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to render summary: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Read {} CSV rows", report.rows_read);
        for table in &report.tables {
            println!("  {}: {} rows inserted", table.table, table.inserted);
        }
    }

    ExitCode::SUCCESS
}
