use crate::cli::labels::{label_table, metric_cell};
use crate::util::format::format_timestamp;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use tagger_lib::db::snapshots::load_working_table;
use tagger_lib::{CommitLog, LabelScheme, Result, SqliteDatabase, UpstreamStatus};

pub fn handle_report_command(db: &SqliteDatabase, scheme: LabelScheme, limit: i32) -> Result<()> {
    println!(
        "\n{}",
        style(format!("Tagger Report: {}", scheme.as_str())).bold().cyan()
    );
    println!("{}\n", style("═".repeat(80)).dim());

    println!("{}", style("Working Table").bold());
    println!("{}", style("─".repeat(80)).dim());

    let table = load_working_table(db.conn(), scheme)?;
    if table.is_empty() {
        println!("{}\n", style("No snapshot flushed yet").yellow());
    } else {
        let rows: Vec<_> = table.rows().iter().collect();
        println!("{}\n", label_table(&rows));
    }

    println!("{}", style("Recent Commits").bold());
    println!("{}", style("─".repeat(80)).dim());

    let commits = db.recent_commits(Some(scheme), Some(limit))?;
    if commits.is_empty() {
        println!("{}\n", style("No commits").yellow());
        return Ok(());
    }

    let mut commit_table = Table::new();
    commit_table.load_preset(UTF8_FULL);
    commit_table.set_header(vec![
        Cell::new("When").fg(Color::Cyan),
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("Pattern").fg(Color::Cyan),
        Cell::new("Exclude").fg(Color::Cyan),
        Cell::new("Precision").fg(Color::Cyan),
        Cell::new("Recall").fg(Color::Cyan),
        Cell::new("F1").fg(Color::Cyan),
        Cell::new("Upstream").fg(Color::Cyan),
    ]);

    for commit in &commits {
        let upstream_color = match commit.upstream {
            UpstreamStatus::Saved => Color::Green,
            UpstreamStatus::Failed => Color::Red,
            UpstreamStatus::Disabled | UpstreamStatus::Placeholder => Color::DarkGrey,
        };
        commit_table.add_row(vec![
            Cell::new(format_timestamp(&commit.committed_at)),
            Cell::new(&commit.label),
            Cell::new(&commit.include_pattern),
            Cell::new(commit.exclude_pattern.as_deref().unwrap_or("-")),
            metric_cell(commit.precision),
            metric_cell(commit.recall),
            metric_cell(commit.f1score),
            Cell::new(commit.upstream.as_str()).fg(upstream_color),
        ]);
    }

    println!("{}\n", commit_table);
    Ok(())
}
