use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use racing_core::{ListFilter, ListOrder, Race};
use racing_sqlite::{RaceStore, StoreConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for race listings and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "races")]
#[command(about = "Seed and query a SQLite race store")]
struct Cli {
    /// Store configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file path (overrides the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Races table name (overrides the config file).
    #[arg(long, global = true)]
    table: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create and seed the races table. Does nothing if it already holds races.
    Init,
    /// List races with optional filters and ordering.
    List(ListArgs),
    /// Show a single race by id.
    Get(GetArgs),
    /// Show whether the races table exists and how many races it holds.
    Status,
    /// Print the effective store configuration as YAML.
    Config,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only races in these meetings (repeatable or comma-separated).
    #[arg(long = "meeting-id", value_delimiter = ',')]
    meeting_ids: Vec<String>,
    /// Only visible (`true`) or hidden (`false`) races.
    #[arg(long, action = clap::ArgAction::Set)]
    visible: Option<bool>,
    /// Column to order by (e.g. name, number, advertised_start_time).
    #[arg(long)]
    order_by: Option<String>,
    /// ASCENDING or DESCENDING. Other values fall back to the store default.
    #[arg(long)]
    direction: Option<String>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct GetArgs {
    /// Race id.
    id: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = resolve_config(&cli)?;
    debug!(database = %config.database.display(), table = %config.table, "Resolved store config");

    match cli.command {
        Command::Init => run_init(&config),
        Command::List(args) => run_list(&config, args),
        Command::Get(args) => run_get(&config, args),
        Command::Status => run_status(&config),
        Command::Config => run_config(&config),
    }
}

fn resolve_config(cli: &Cli) -> Result<StoreConfig, String> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    if let Some(table) = &cli.table {
        config.table = table.clone();
    }
    Ok(config)
}

/// Opens the store and runs its one-time seed, as a service would at startup.
fn open_initialized(config: &StoreConfig) -> Result<RaceStore, String> {
    let store = open_store(config)?;
    store.init().map_err(|e| e.to_string())?;
    Ok(store)
}

fn open_store(config: &StoreConfig) -> Result<RaceStore, String> {
    config.open_store().map_err(|e| {
        format!(
            "Failed to open store '{}': {e}",
            config.database.display()
        )
    })
}

fn run_init(config: &StoreConfig) -> Result<(), String> {
    let store = open_store(config)?;
    let report = store.init().map_err(|e| e.to_string())?;
    println!("Init complete:");
    println!(
        "  Table '{}' created: {}",
        store.table(),
        if report.table_created { "yes" } else { "no" }
    );
    println!("  Races inserted: {}", report.races_inserted);
    Ok(())
}

fn run_list(config: &StoreConfig, args: ListArgs) -> Result<(), String> {
    let store = open_initialized(config)?;
    let filter = ListFilter {
        meeting_ids: args.meeting_ids,
        visible: args.visible,
    };
    let order = if args.order_by.is_some() || args.direction.is_some() {
        Some(ListOrder {
            order_by: args.order_by,
            direction: args.direction,
        })
    } else {
        None
    };

    let races = store
        .list(Some(&filter), order.as_ref())
        .map_err(|e| e.to_string())?;
    print!("{}", render_races(&races, args.format)?);
    Ok(())
}

fn run_get(config: &StoreConfig, args: GetArgs) -> Result<(), String> {
    let store = open_initialized(config)?;
    let race = store.get(&args.id).map_err(|e| e.to_string())?;
    let output = match args.format {
        OutputFormat::Json => format!(
            "{}\n",
            serde_json::to_string_pretty(&race)
                .map_err(|e| format!("Failed to serialize race: {e}"))?
        ),
        OutputFormat::Yaml => serde_yaml::to_string(&race)
            .map_err(|e| format!("Failed to serialize race: {e}"))?,
        OutputFormat::Table => render_table(std::slice::from_ref(&race)),
    };
    print!("{output}");
    Ok(())
}

fn run_status(config: &StoreConfig) -> Result<(), String> {
    let store = open_store(config)?;
    let status = store
        .status()
        .map_err(|e| format!("Failed to get store status: {e}"))?;
    println!("Store Status:");
    println!("  Database: {}", config.database.display());
    println!(
        "  Table exists: {}",
        if status.table_exists { "yes" } else { "no" }
    );
    println!("  Race count: {}", status.race_count);
    Ok(())
}

fn run_config(config: &StoreConfig) -> Result<(), String> {
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;
    print!("{yaml}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn render_races(races: &[Race], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(races)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("Failed to serialize races: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(races).map_err(|e| format!("Failed to serialize races: {e}"))
        }
        OutputFormat::Table => Ok(render_table(races)),
    }
}

/// Renders races as an aligned plain-text table.
fn render_table(races: &[Race]) -> String {
    let header = ["ID", "MEETING", "NO", "NAME", "VISIBLE", "START (UTC)", "STATUS"];
    let rows: Vec<[String; 7]> = races
        .iter()
        .map(|race| {
            [
                race.id.clone(),
                race.meeting_id.clone(),
                race.number.to_string(),
                race.name.clone(),
                if race.visible { "yes" } else { "no" }.to_string(),
                race.advertised_start_time
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                race.status.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use racing_core::RaceStatus;

    fn race(id: &str, name: &str) -> Race {
        Race {
            id: id.to_string(),
            meeting_id: "3".to_string(),
            name: name.to_string(),
            number: 7,
            visible: false,
            advertised_start_time: Utc.with_ymd_and_hms(2021, 3, 2, 14, 30, 0).unwrap(),
            status: RaceStatus::Closed,
        }
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(&[race("1", "Cup"), race("12", "Guineas Prelude")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  MEETING  NO  NAME"));
        assert!(lines[1].starts_with("1   3        7   Cup"));
        assert!(lines[2].contains("Guineas Prelude  no       2021-03-02 14:30:00  CLOSED"));
    }

    #[test]
    fn test_render_table_empty_has_header_only() {
        let table = render_table(&[]);
        assert_eq!(table.lines().count(), 1);
    }

    #[test]
    fn test_render_races_json_is_array() {
        let json = render_races(&[race("1", "Cup")], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["status"], "CLOSED");
        assert_eq!(value[0]["visible"], false);
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let cli = Cli::parse_from(["races", "--db", "/tmp/x.db", "--table", "carnival", "status"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.table, "carnival");
    }

    #[test]
    fn test_list_args_split_meeting_ids() {
        let cli = Cli::parse_from([
            "races",
            "list",
            "--meeting-id",
            "1,2",
            "--meeting-id",
            "5",
            "--visible",
            "false",
        ]);
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.meeting_ids, vec!["1", "2", "5"]);
                assert_eq!(args.visible, Some(false));
                assert_eq!(args.format, OutputFormat::Table);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }
}
