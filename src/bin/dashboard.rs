use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use filming_locations::{
    config::DashboardConfig,
    dashboard::Dashboard,
    engine::{
        AddressField, GroupKey, LocationQueryEngine, MatchMode, SearchCriterion, SortOrder,
        TitlePartition,
    },
    loader::{load_jsonl, ColumnMapping},
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Query filming locations and print dashboard data as JSON",
    long_about = None
)]
struct Cli {
    /// JSON-lines file with one filming location per line
    #[arg(long)]
    data: PathBuf,

    /// Dashboard config (TOML). Built-in defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read the Korean column headers of the public export
    #[arg(long)]
    korean_columns: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and print the full dashboard report
    Search(SearchArgs),
    /// List program or artist names for the selection box
    Titles {
        #[arg(long)]
        artists: bool,
        #[arg(long)]
        ascending: bool,
    },
    /// Count locations per configured region over the whole dataset
    Regions {
        #[arg(long)]
        place_type: Option<String>,
    },
    /// Mean position per group (mediaType, placeType or title)
    Centroids {
        #[arg(long, default_value = "mediaType")]
        group_by: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false, id = "criterion")]
struct CriterionArgs {
    /// Part of an address, e.g. 강남구
    #[arg(long)]
    address: Option<String>,
    /// Program or artist name
    #[arg(long)]
    title: Option<String>,
    /// Every location
    #[arg(long)]
    all: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[command(flatten)]
    criterion: CriterionArgs,
    /// Match titles by substring instead of the configured mode
    #[arg(long)]
    substring: bool,
    /// Search the detailed address column
    #[arg(long)]
    detail_address: bool,
    /// Day used to pick today's recommendations (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if cli.korean_columns {
        config.columns = ColumnMapping::korean();
    }

    let dataset = load_jsonl(&cli.data, &config.columns)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    let engine = LocationQueryEngine::new(dataset)?;

    match cli.command {
        Command::Search(args) => {
            if args.detail_address {
                config.search.address_field = AddressField::DetailAddress;
            }
            if args.substring {
                config.search.title_match = MatchMode::Substring;
            }
            let dashboard = Dashboard::new(&engine, &config)?;
            let criterion = match &args.criterion {
                CriterionArgs { all: true, .. } => SearchCriterion::All,
                CriterionArgs {
                    address: Some(address),
                    ..
                } => dashboard.address_query(address),
                CriterionArgs {
                    title: Some(title), ..
                } => dashboard.title_query(title),
                _ => bail!("one of --address, --title or --all is required"),
            };
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            info!("Searching {:?} for {}", criterion, date);
            print_json(&dashboard.report(&criterion, date)?)
        }
        Command::Titles { artists, ascending } => {
            let partition = if artists {
                TitlePartition::Artists
            } else {
                TitlePartition::Programs
            };
            let order = if ascending {
                SortOrder::Ascending
            } else {
                config.search.title_order
            };
            print_json(&engine.distinct_titles(partition, order))
        }
        Command::Regions { place_type } => {
            let counts = engine.regional_counts(
                &engine.all(),
                config.regions.as_slice(),
                place_type.as_deref(),
            )?;
            print_json(&counts)
        }
        Command::Centroids { group_by } => {
            let key: GroupKey = group_by.parse()?;
            print_json(&engine.group_centroids(&engine.all(), key))
        }
    }
}
