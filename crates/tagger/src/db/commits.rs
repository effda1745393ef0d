use crate::classify::Evaluation;
use crate::db::{CommitLogEntry, UpstreamStatus};
use crate::error::Result;
use crate::labels::LabelScheme;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;

pub trait CommitLog {
    fn log_commit(&mut self, entry: &CommitLogEntry) -> Result<i64>;
    fn recent_commits(&self, scheme: Option<LabelScheme>, limit: Option<i32>)
        -> Result<Vec<CommitLogEntry>>;
    fn commits_for_label(&self, scheme: LabelScheme, label: &str) -> Result<Vec<CommitLogEntry>>;
}

impl CommitLogEntry {
    pub fn from_evaluation(
        scheme: LabelScheme,
        evaluation: &Evaluation,
        upstream: UpstreamStatus,
    ) -> Self {
        let summary = &evaluation.summary;
        Self {
            id: 0,
            committed_at: Utc::now(),
            scheme: scheme.as_str().to_string(),
            label: evaluation.label.clone(),
            include_pattern: evaluation.pair.include.clone(),
            exclude_pattern: evaluation.pair.exclude().map(str::to_string),
            relevant: summary.relevant,
            selected: summary.selected,
            precision: summary.precision,
            recall: summary.recall,
            f1score: summary.f1score,
            accuracy: summary.accuracy,
            upstream,
        }
    }
}

const SELECT_COMMITS: &str = "SELECT id, committed_at, scheme, label,
        include_pattern, exclude_pattern, relevant, selected,
        precision, recall, f1score, accuracy, upstream
     FROM commit_log WHERE 1=1";

impl CommitLog for crate::db::SqliteDatabase {
    fn log_commit(&mut self, entry: &CommitLogEntry) -> Result<i64> {
        let conn = self.conn_mut();
        conn.execute(
            "INSERT INTO commit_log (
                committed_at, scheme, label, include_pattern, exclude_pattern,
                relevant, selected, precision, recall, f1score, accuracy, upstream
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                entry.committed_at.to_rfc3339(),
                &entry.scheme,
                &entry.label,
                &entry.include_pattern,
                &entry.exclude_pattern,
                entry.relevant as i64,
                entry.selected as i64,
                entry.precision,
                entry.recall,
                entry.f1score,
                entry.accuracy,
                entry.upstream.as_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn recent_commits(
        &self,
        scheme: Option<LabelScheme>,
        limit: Option<i32>,
    ) -> Result<Vec<CommitLogEntry>> {
        let mut query = SELECT_COMMITS.to_string();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(scheme) = scheme {
            query.push_str(" AND scheme = ?");
            params.push(Box::new(scheme.as_str()));
        }

        query.push_str(" ORDER BY id DESC");

        if let Some(lim) = limit {
            query.push_str(" LIMIT ?");
            params.push(Box::new(lim));
        }

        query_commits(self.conn(), &query, params)
    }

    fn commits_for_label(&self, scheme: LabelScheme, label: &str) -> Result<Vec<CommitLogEntry>> {
        let query = format!("{} AND scheme = ? AND label = ? ORDER BY id DESC", SELECT_COMMITS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        params.push(Box::new(scheme.as_str()));
        params.push(Box::new(label.to_string()));
        query_commits(self.conn(), &query, params)
    }
}

fn query_commits(
    conn: &rusqlite::Connection,
    query: &str,
    params: Vec<Box<dyn rusqlite::ToSql>>,
) -> Result<Vec<CommitLogEntry>> {
    let mut stmt = conn.prepare(query)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let entries = stmt
        .query_map(&param_refs[..], |row| {
            let upstream: String = row.get(12)?;
            Ok(CommitLogEntry {
                id: row.get(0)?,
                committed_at: row
                    .get::<_, String>(1)?
                    .parse::<DateTime<Utc>>()
                    .unwrap_or_else(|_| Utc::now()),
                scheme: row.get(2)?,
                label: row.get(3)?,
                include_pattern: row.get(4)?,
                exclude_pattern: row.get(5)?,
                relevant: row.get::<_, i64>(6)?.max(0) as u64,
                selected: row.get::<_, i64>(7)?.max(0) as u64,
                precision: row.get(8)?,
                recall: row.get(9)?,
                f1score: row.get(10)?,
                accuracy: row.get(11)?,
                upstream: UpstreamStatus::from_str(&upstream).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e))
                })?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{evaluate, Matcher, PatternPair};
    use crate::db::SqliteDatabase;
    use crate::records::{Record, RecordSet};

    fn create_test_db() -> SqliteDatabase {
        let mut db = SqliteDatabase::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn evaluation(label: &str, pattern: &str) -> Evaluation {
        let records = RecordSet::new(vec![
            Record::new("1", "Food Bank").with_tags(["Food"]),
            Record::new("2", "Choir").with_tags(["Music"]),
        ]);
        evaluate(
            &Matcher::default(),
            &records,
            LabelScheme::Tags.relevance(),
            label,
            &PatternPair::new(pattern),
        )
        .unwrap()
    }

    #[test]
    fn test_commit_log() {
        let mut db = create_test_db();

        let entry = CommitLogEntry::from_evaluation(
            LabelScheme::Tags,
            &evaluation("Food", "food"),
            UpstreamStatus::Disabled,
        );
        let id = db.log_commit(&entry).unwrap();
        assert!(id > 0);

        let entries = db.recent_commits(None, None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Food");
        assert_eq!(entries[0].include_pattern, "food");
        assert_eq!(entries[0].exclude_pattern, None);
        assert_eq!(entries[0].precision, Some(1.0));
        assert_eq!(entries[0].upstream, UpstreamStatus::Disabled);
    }

    #[test]
    fn test_commits_filtered_and_newest_first() {
        let mut db = create_test_db();
        for (label, pattern, status) in [
            ("Food", "food", UpstreamStatus::Saved),
            ("Music", "choir", UpstreamStatus::Failed),
            ("Food", "food|bank", UpstreamStatus::Saved),
        ] {
            let entry = CommitLogEntry::from_evaluation(
                LabelScheme::Tags,
                &evaluation(label, pattern),
                status,
            );
            db.log_commit(&entry).unwrap();
        }

        let food = db.commits_for_label(LabelScheme::Tags, "Food").unwrap();
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].include_pattern, "food|bank");

        let limited = db.recent_commits(Some(LabelScheme::Tags), Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].label, "Food");

        assert!(db
            .recent_commits(Some(LabelScheme::Icnptso), None)
            .unwrap()
            .is_empty());
    }
}
