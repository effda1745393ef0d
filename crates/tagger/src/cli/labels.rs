use crate::util::format::{format_count, format_ratio, metric_color};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use tagger_lib::{
    JsonLabelStore, LabelDefinition, LabelScheme, Result, Session, TableStats, ViewOptions,
    WorkingTable,
};

pub fn handle_labels_command(
    session: &mut Session<JsonLabelStore>,
    scheme: LabelScheme,
    options: ViewOptions,
    quiet: bool,
) -> Result<()> {
    let table = initialize_table(session, scheme, quiet)?;
    let rows = table.view(&options);

    if rows.is_empty() {
        println!("{}", style("No labels match").yellow());
    } else {
        println!("{}", label_table(&rows));
    }

    print_stats(rows.len(), &table.stats());
    Ok(())
}

/// Load and score the scheme's labels behind a spinner.
pub fn initialize_table(
    session: &mut Session<JsonLabelStore>,
    scheme: LabelScheme,
    quiet: bool,
) -> Result<WorkingTable> {
    let spinner = (!quiet).then(|| {
        crate::util::create_spinner(&format!("Scoring {} labels...", scheme.as_str()))
    });

    let table = session.initialize(scheme);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    table
}

pub fn label_table(rows: &[&LabelDefinition]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Freq").fg(Color::Cyan),
        Cell::new("Pattern").fg(Color::Cyan),
        Cell::new("Exclude").fg(Color::Cyan),
        Cell::new("Precision").fg(Color::Cyan),
        Cell::new("Recall").fg(Color::Cyan),
        Cell::new("F1").fg(Color::Cyan),
        Cell::new("Accuracy").fg(Color::Cyan),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.label),
            Cell::new(&row.name),
            Cell::new(format_count(row.frequency)),
            Cell::new(row.include_pattern.as_deref().unwrap_or("-")),
            Cell::new(row.exclude_pattern.as_deref().unwrap_or("-")),
            metric_cell(row.precision),
            metric_cell(row.recall),
            metric_cell(row.f1score),
            metric_cell(row.accuracy),
        ]);
    }

    table
}

pub fn metric_cell(value: Option<f64>) -> Cell {
    Cell::new(format_ratio(value)).fg(metric_color(value))
}

fn print_stats(shown: usize, stats: &TableStats) {
    println!(
        "Showing {} of {} labels ({} with a pattern, {} without)",
        style(shown).bold(),
        stats.total,
        style(stats.with_pattern).green(),
        style(stats.without_pattern).yellow()
    );
    println!(
        "Median F1 {}  precision {}  recall {}",
        format_ratio(stats.median_f1),
        format_ratio(stats.median_precision),
        format_ratio(stats.median_recall)
    );
}
