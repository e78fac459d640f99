use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use snow_tables::client::TableApiClient;
use snow_tables::config::{read_categories, read_credentials};
use snow_tables::export::{self, UNFILTERED_DIR};
use snow_tables::logging::init_logging;
use snow_tables::Result;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.verbose) {
        eprintln!("error: {error}");
    }
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::ListTables(args) => {
            let client = connect(&args.credentials)?;
            export::list_tables(&client, &args.output_file)?;
        }
        Command::ExportCsv(args) => {
            let client = connect(&args.credentials)?;
            export::export_csv(&client, &args.output_dir, args.table_limit)?;
        }
        Command::ExportCategorized(args) => {
            let categories = read_categories(&args.categories)?;
            let client = connect(&args.credentials)?;
            export::export_categorized(&client, &categories, Path::new(UNFILTERED_DIR))?;
        }
        Command::Filter(args) => {
            export::filter_workbooks(&args.input_dir, &args.output_dir)?;
        }
    }
    Ok(())
}

fn connect(credentials: &Path) -> Result<TableApiClient> {
    let credentials = read_credentials(credentials)?;
    TableApiClient::for_instance(&credentials)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Export platform tables to CSV or Excel and filter them by column markers."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write table names and descriptions to a workbook.
    ListTables(ListTablesArgs),
    /// Write every table to its own CSV file.
    ExportCsv(ExportCsvArgs),
    /// Write categorized workbooks with selection marker columns.
    ExportCategorized(ExportCategorizedArgs),
    /// Keep only the columns selected in exported workbooks.
    Filter(FilterArgs),
}

#[derive(clap::Args)]
struct ListTablesArgs {
    /// Path to the credentials file.
    #[arg(long, default_value = "credentials.txt")]
    credentials: PathBuf,

    /// Output workbook.
    #[arg(long = "output_file", default_value = "table_names.xlsx")]
    output_file: PathBuf,
}

#[derive(clap::Args)]
struct ExportCsvArgs {
    /// Path to the credentials file.
    #[arg(long, default_value = "credentials.txt")]
    credentials: PathBuf,

    /// Directory receiving the CSV files.
    #[arg(long = "output_dir", default_value = "./servicenow_tables")]
    output_dir: PathBuf,

    /// Limit the number of tables to process.
    #[arg(long = "table_limit")]
    table_limit: Option<usize>,
}

#[derive(clap::Args)]
struct ExportCategorizedArgs {
    /// Path to the credentials file.
    #[arg(long, default_value = "credentials.txt")]
    credentials: PathBuf,

    /// Path to the categories file.
    #[arg(long, default_value = "categories.txt")]
    categories: PathBuf,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Directory containing the exported workbooks.
    #[arg(long = "input_dir", default_value = UNFILTERED_DIR)]
    input_dir: PathBuf,

    /// Directory receiving the filtered workbooks.
    #[arg(long = "output_dir", default_value = "./filtered")]
    output_dir: PathBuf,
}
