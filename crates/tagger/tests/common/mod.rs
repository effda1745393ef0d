use std::path::{Path, PathBuf};
use tagger_lib::{
    JsonLabelStore, LabelScheme, LabelSourceEntry, LabelStore, RecordSet, Result, Session,
    SessionOptions, SqliteDatabase,
};
use tempfile::TempDir;

pub mod helpers;
pub use helpers::*;

pub struct TestFixture {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub tags_path: PathBuf,
    pub codes_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let db_path = temp_dir.path().join("test.db");
        let tags_path = temp_dir.path().join("tags.json");
        let codes_path = temp_dir.path().join("icnptso.json");

        write_entries(&tags_path, &tag_entries())?;
        write_entries(&codes_path, &code_entries())?;

        Ok(Self {
            temp_dir,
            db_path,
            tags_path,
            codes_path,
        })
    }

    pub fn store(&self) -> JsonLabelStore {
        JsonLabelStore::new()
            .with_path(LabelScheme::Tags, &self.tags_path)
            .with_path(LabelScheme::Icnptso, &self.codes_path)
    }

    pub fn session(&self, save_enabled: bool) -> Result<Session<JsonLabelStore>> {
        let options = SessionOptions {
            save_enabled,
            ..SessionOptions::default()
        };
        Ok(Session::new(RecordSet::new(sample_records()), self.store(), options)
            .with_snapshots(self.open_db()?))
    }

    /// A second connection to the session's database file.
    pub fn open_db(&self) -> Result<SqliteDatabase> {
        let mut db = SqliteDatabase::open(&self.db_path)?;
        db.initialize()?;
        Ok(db)
    }

    pub fn stored_entries(&self, scheme: LabelScheme) -> Result<Vec<LabelSourceEntry>> {
        self.store().fetch(scheme)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

pub fn setup_test_fixture() -> Result<TestFixture> {
    TestFixture::new()
}

pub fn write_entries(path: &Path, entries: &[LabelSourceEntry]) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}
