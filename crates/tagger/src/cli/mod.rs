pub mod evaluate;
pub mod labels;
pub mod report;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tagger_lib::{
    snapshot, Config, JsonLabelStore, LabelScheme, Metric, PatternFilter, Result, Session,
    SortKey, SqliteDatabase,
};

#[derive(Parser)]
#[command(name = "tagger")]
#[command(
    about = "Score hand-written regular expressions against labelled records",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to database file")]
    pub db: Option<PathBuf>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, short = 'q', global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List labels with their current scores")]
    Labels {
        #[arg(long, value_enum, default_value = "tags", help = "Label scheme")]
        scheme: SchemeArg,

        #[arg(long, help = "Only labels whose name contains this text")]
        filter: Option<String>,

        #[arg(long, value_enum, default_value = "all", help = "Filter by pattern presence")]
        show: ShowArg,

        #[arg(long, value_enum, default_value = "frequency", help = "Sort column")]
        sort: SortArg,

        #[arg(long, help = "Sort ascending instead of descending")]
        ascending: bool,
    },

    #[command(about = "Evaluate a pattern for a label and commit it")]
    Evaluate {
        #[arg(help = "Label value or slug")]
        label: String,

        #[arg(long, short = 'i', help = "Include regular expression")]
        include: String,

        #[arg(long, short = 'e', help = "Exclude regular expression")]
        exclude: Option<String>,

        #[arg(long, value_enum, default_value = "tags", help = "Label scheme")]
        scheme: SchemeArg,

        #[arg(long, help = "Extrapolate to the population instead of previewing records")]
        population: bool,

        #[arg(long, help = "Matched population records to show")]
        sample_size: Option<usize>,

        #[arg(long, help = "Evaluate without committing")]
        dry_run: bool,
    },

    #[command(about = "Show the last flushed working table and recent commits")]
    Report {
        #[arg(long, value_enum, default_value = "tags", help = "Label scheme")]
        scheme: SchemeArg,

        #[arg(long, default_value_t = 20, help = "Number of commits to show")]
        limit: i32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    Tags,
    Icnptso,
}

impl From<SchemeArg> for LabelScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Tags => LabelScheme::Tags,
            SchemeArg::Icnptso => LabelScheme::Icnptso,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShowArg {
    All,
    With,
    Without,
}

impl From<ShowArg> for PatternFilter {
    fn from(arg: ShowArg) -> Self {
        match arg {
            ShowArg::All => PatternFilter::All,
            ShowArg::With => PatternFilter::With,
            ShowArg::Without => PatternFilter::Without,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Frequency,
    Name,
    F1,
    Precision,
    Recall,
    Accuracy,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Frequency => SortKey::Frequency,
            SortArg::Name => SortKey::Name,
            SortArg::F1 => SortKey::Metric(Metric::F1),
            SortArg::Precision => SortKey::Metric(Metric::Precision),
            SortArg::Recall => SortKey::Metric(Metric::Recall),
            SortArg::Accuracy => SortKey::Metric(Metric::Accuracy),
        }
    }
}

pub fn init_database(config: &Config) -> Result<SqliteDatabase> {
    config.ensure_db_directory()?;

    let mut db = SqliteDatabase::open(config.db_path()?)?;
    db.initialize()?;

    Ok(db)
}

/// Records, label store and snapshot database for one command.
pub fn open_session(config: &Config) -> Result<Session<JsonLabelStore>> {
    let records = snapshot::load_records(config.records_path()?)?;

    let mut store = JsonLabelStore::new();
    for scheme in [LabelScheme::Tags, LabelScheme::Icnptso] {
        if let Ok(path) = config.store_path(scheme) {
            store = store.with_path(scheme, path);
        }
    }

    let db = init_database(config)?;

    Ok(Session::new(records, store, config.session_options()).with_snapshots(db))
}
