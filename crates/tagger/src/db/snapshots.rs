//! Flat snapshot of a working table, rewritten after every commit.

use crate::error::Result;
use crate::labels::{LabelDefinition, LabelScheme, WorkingTable};
use rusqlite::{named_params, Connection};

/// Replace the stored snapshot for the table's scheme.
pub fn save_working_table(conn: &mut Connection, table: &WorkingTable) -> Result<()> {
    let scheme = table.scheme().as_str();
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM label_snapshots WHERE scheme = ?1", [scheme])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO label_snapshots (
                scheme, position, store_id, label, name, slug, frequency,
                include_pattern, exclude_pattern, precision, recall, f1score, accuracy
            ) VALUES (
                :scheme, :position, :store_id, :label, :name, :slug, :frequency,
                :include_pattern, :exclude_pattern, :precision, :recall, :f1score, :accuracy
            )",
        )?;

        for (position, row) in table.rows().iter().enumerate() {
            stmt.execute(named_params! {
                ":scheme": scheme,
                ":position": position as i64,
                ":store_id": &row.id,
                ":label": &row.label,
                ":name": &row.name,
                ":slug": &row.slug,
                ":frequency": row.frequency as i64,
                ":include_pattern": &row.include_pattern,
                ":exclude_pattern": &row.exclude_pattern,
                ":precision": row.precision,
                ":recall": row.recall,
                ":f1score": row.f1score,
                ":accuracy": row.accuracy,
            })?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// The last flushed snapshot, empty when nothing was flushed for the scheme.
pub fn load_working_table(conn: &Connection, scheme: LabelScheme) -> Result<WorkingTable> {
    let mut stmt = conn.prepare(
        "SELECT store_id, label, name, slug, frequency, include_pattern, exclude_pattern,
                precision, recall, f1score, accuracy
         FROM label_snapshots WHERE scheme = ?1 ORDER BY position",
    )?;

    let rows = stmt
        .query_map([scheme.as_str()], |row| {
            Ok(LabelDefinition {
                id: row.get(0)?,
                label: row.get(1)?,
                name: row.get(2)?,
                slug: row.get(3)?,
                frequency: row.get::<_, i64>(4)?.max(0) as u64,
                include_pattern: row.get(5)?,
                exclude_pattern: row.get(6)?,
                precision: row.get(7)?,
                recall: row.get(8)?,
                f1score: row.get(9)?,
                accuracy: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(WorkingTable::from_rows(scheme, rows))
}
