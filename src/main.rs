use clap::{Parser, Subcommand};
use sheetmark::cli;
use sheetmark::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetmark")]
#[command(about = "Highlight campaign outlets and total video durations in a Google Sheet")]
#[command(long_about = "Sheetmark - campaign outlet highlighting for Google Sheets

The plan sheet holds one campaign per row (column A) and one outlet per
column (R through GN, outlet numbers in row 1).

COMMANDS:
  highlight - Mark the outlets from an Excel list green in the campaign's row
  query     - Total video duration by date, outlet type or outlet number
  locate    - Find the row of a campaign
  status    - Show the connected spreadsheet
  ingest    - Preview an Excel list without touching the sheet

EXAMPLES:
  sheetmark highlight outlets.xlsx
  sheetmark query дата 25.12.2024
  sheetmark query тип СМ тк 12345
  sheetmark locate \"Summer Sale\"
  sheetmark ingest outlets.xlsx --verbose")]
#[command(version)]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true, env = "SHEETMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Spreadsheet id (overrides the config file)
    #[arg(long, global = true, env = "SHEETMARK_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Bearer token for the Sheets API (overrides the config file)
    #[arg(long, global = true, env = "SHEETMARK_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Connection broker host used when no access token is given
    #[arg(long, global = true, env = "REPLIT_CONNECTORS_HOSTNAME")]
    connector_hostname: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Highlight outlets listed in an Excel file.

The file's first sheet holds the campaign name in column A and one outlet
number per row in column B. An optional header row (РК / ТК) is skipped.

The campaign row is found by case-insensitive match on column A, then every
listed outlet found in the header row is filled green in one batch. Outlets
missing from the header are reported, not treated as errors.")]
    /// Highlight the outlets from an Excel list
    Highlight {
        /// Path to .xlsx / .xls file
        file: PathBuf,
    },

    #[command(long_about = "Total video duration for the given filters.

FILTERS (any order, case-insensitive, combinable):
  дата ДД.ММ.ГГГГ   placements running on that date
  тип  ГМ|СМ|ГМ+СМ|Частично ГМ|Частично СМ
  тк   12345        placements marked in that outlet's column")]
    /// Total video duration by filters
    Query {
        /// Filter words, e.g. `дата 25.12.2024 тип ГМ`
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },

    /// Find the row of a campaign
    Locate {
        /// Campaign name as written in column A
        name: String,
    },

    /// Show the connected spreadsheet
    Status,

    /// Preview the campaign and outlets in an Excel list
    Ingest {
        /// Path to .xlsx / .xls file
        file: PathBuf,

        /// List every outlet token
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_or_default(self.config.as_deref())?;
        if let Some(id) = &self.spreadsheet_id {
            config.spreadsheet_id = Some(id.clone());
        }
        if let Some(token) = &self.access_token {
            config.access_token = Some(token.clone());
        }
        if let Some(host) = &self.connector_hostname {
            config.connector_hostname = Some(host.clone());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetmark=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    match cli.command {
        Commands::Highlight { file } => cli::highlight(&config, file).await?,
        Commands::Query { args } => cli::query(&config, args).await?,
        Commands::Locate { name } => cli::locate(&config, name).await?,
        Commands::Status => cli::status(&config).await?,
        Commands::Ingest { file, verbose } => cli::ingest(file, verbose)?,
    }
    Ok(())
}
