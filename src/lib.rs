pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod search;

mod records;
mod schema;
mod webhooks;
#[cfg(test)]
mod testing;

pub use client::{AirtableClient, ApiResponse, ListOptions, TableService};
pub use config::Config;
pub use directory::TableDirectory;
pub use error::{Error, Result};
pub use webhooks::{CreatedWebhook, Webhook};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use search::{FederatedParams, SearchParams};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "airbase",
    version,
    about = "Airtable base client with cached table resolution and federated search"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search one table, or the whole base with --all
    Search {
        query: String,

        /// Table name or id (defaults to AIRTABLE_DEFAULT_TABLE)
        #[arg(long)]
        table: Option<String>,

        /// Search every table in the base
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Per-table record cap
        #[arg(long, default_value_t = search::single::DEFAULT_MAX_RECORDS)]
        max_records: u32,

        /// Page size for the listing call
        #[arg(long)]
        page_size: Option<u32>,

        /// Continuation token from a previous page (single-table only)
        #[arg(long)]
        offset: Option<String>,

        /// Restrict matching to these fields (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// List the base's tables and their fields
    Tables,
    /// List bases visible to the credential
    Bases,
    /// Fetch one record by table and record id
    Get { table: String, record_id: String },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "airbase", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::from_env()?;
    let client = AirtableClient::new(&config)?;
    let directory = TableDirectory::new(config.table_allowlist.clone());

    match cli.command {
        Commands::Search {
            query,
            table,
            all,
            max_records,
            page_size,
            offset,
            fields,
        } => {
            if all {
                let mut params = FederatedParams::new(query);
                params.max_records_per_table = max_records;
                params.page_size = page_size;
                params.fields = fields;
                let hits = search::search_all_tables(&client, &directory, &params).await?;
                print_json(&hits)
            } else {
                let Some(table) = table.or(config.default_table) else {
                    println!(
                        "{}; pass --table, set AIRTABLE_DEFAULT_TABLE, or use --all",
                        Error::TableRequired
                    );
                    return Ok(());
                };
                let mut params = SearchParams::new(table, query);
                params.max_records = max_records;
                params.page_size = page_size;
                params.offset = offset;
                params.fields = fields;
                let page = search::search_table(&client, &directory, &params).await?;
                if let Some(next) = &page.next_offset {
                    eprintln!("next page: --offset {next}");
                }
                print_json(&page.hits)
            }
        }
        Commands::Tables => {
            let schema = client.base_schema().await?;
            print_json(&schema.tables)
        }
        Commands::Bases => {
            let bases = client.list_bases().await?;
            print_json(&bases)
        }
        Commands::Get { table, record_id } => {
            let table_id = directory.resolve(&client, &table).await?;
            let record = client.get_record(&table_id, &record_id).await?;
            print_json(&record)
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
