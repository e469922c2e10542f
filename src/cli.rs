use clap::Parser;
use std::path::PathBuf;

use crate::app::RunOptions;
use crate::infrastructure::config::DEFAULT_CONFIG_FILE;

#[derive(Debug, Parser)]
#[command(name = "csv-table-loader")]
#[command(about = "Load CSV records into meta_table and finance_table through a column mapping.")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// CSV file to load, overrides csv.path
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Connection URL, overrides the database section
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Print the load summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            config_path: self.config.clone(),
            csv_path: self.csv.clone(),
            database_url: self.database_url.clone(),
        }
    }
}
