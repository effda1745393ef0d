use crate::error::{Result, TaggerError};
use crate::labels::LabelScheme;
use crate::population::extrapolate::DEFAULT_SAMPLE_SIZE;
use crate::population::DEFAULT_POPULATION_CAP;
use crate::session::{SessionOptions, DEFAULT_ROWS_PER_OUTCOME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

pub const DB_ENV: &str = "TAGGER_DB";
pub const SAVE_ENABLED_ENV: &str = "TAGGER_SAVE_ENABLED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Labelled records snapshot.
    pub records: Option<PathBuf>,
    /// Unlabelled population snapshot.
    pub population: Option<PathBuf>,
    /// Universe counts per income band.
    pub universe: Option<PathBuf>,
    pub tags_store: Option<PathBuf>,
    pub icnptso_store: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub save_enabled: bool,
    pub sample_size: usize,
    pub population_cap: usize,
    pub rows_per_outcome: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records: None,
            population: None,
            universe: None,
            tags_store: None,
            icnptso_store: None,
            db_path: None,
            save_enabled: false,
            sample_size: DEFAULT_SAMPLE_SIZE,
            population_cap: DEFAULT_POPULATION_CAP,
            rows_per_outcome: DEFAULT_ROWS_PER_OUTCOME,
        }
    }
}

impl Config {
    /// Load from `path`, else the XDG config file, else defaults, then apply
    /// environment overrides and the `--db` flag.
    pub fn load(path: Option<&Path>, db_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => BaseDirectories::with_prefix("tagger")
                .ok()
                .and_then(|xdg| xdg.find_config_file("tagger.toml")),
        };

        let mut config = match &config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(db_override, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Relative paths in the file are taken relative to the file's directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| TaggerError::Config(format!("Failed to read config file: {}", e)))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| TaggerError::Config(format!("Failed to parse config TOML: {}", e)))?;

        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn resolve_relative(&mut self, base: &Path) {
        for path in [
            &mut self.records,
            &mut self.population,
            &mut self.universe,
            &mut self.tags_store,
            &mut self.icnptso_store,
            &mut self.db_path,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn apply_overrides<F>(&mut self, db_override: Option<PathBuf>, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = env(DB_ENV) {
            self.db_path = Some(PathBuf::from(db));
        }
        if let Some(db) = db_override {
            self.db_path = Some(db);
        }
        if let Some(value) = env(SAVE_ENABLED_ENV) {
            self.save_enabled = parse_bool(&value).ok_or_else(|| {
                TaggerError::Config(format!("Invalid {}: {}", SAVE_ENABLED_ENV, value))
            })?;
        }
        Ok(())
    }

    /// The configured database path, or the XDG data file.
    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let xdg = BaseDirectories::with_prefix("tagger").map_err(|e| {
            TaggerError::Config(format!("Failed to initialize XDG directories: {}", e))
        })?;
        xdg.place_data_file("tagger.db")
            .map_err(|e| TaggerError::Config(format!("Failed to create data directory: {}", e)))
    }

    pub fn ensure_db_directory(&self) -> Result<()> {
        if let Some(parent) = self.db_path()?.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            save_enabled: self.save_enabled,
            sample_size: self.sample_size,
            rows_per_outcome: self.rows_per_outcome,
        }
    }

    pub fn records_path(&self) -> Result<&Path> {
        required("records", &self.records)
    }

    pub fn population_path(&self) -> Result<&Path> {
        required("population", &self.population)
    }

    pub fn universe_path(&self) -> Result<&Path> {
        required("universe", &self.universe)
    }

    pub fn store_path(&self, scheme: LabelScheme) -> Result<&Path> {
        match scheme {
            LabelScheme::Tags => required("tags_store", &self.tags_store),
            LabelScheme::Icnptso => required("icnptso_store", &self.icnptso_store),
        }
    }
}

fn required<'a>(key: &str, value: &'a Option<PathBuf>) -> Result<&'a Path> {
    value
        .as_deref()
        .ok_or_else(|| TaggerError::Config(format!("'{}' is not set in the config file", key)))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
