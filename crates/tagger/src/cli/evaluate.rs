use crate::cli::labels::{initialize_table, metric_cell};
use crate::util::format::{format_count, format_estimate, format_percent, highlight};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use tagger_lib::{
    snapshot, CompiledPair, Config, EvaluationMode, EvaluationRequest, EvaluationResponse,
    Extrapolation, JsonLabelStore, LabelScheme, MetricsSummary, OutcomeRows, Result, Session,
};

pub fn handle_evaluate_command(
    mut session: Session<JsonLabelStore>,
    config: &Config,
    scheme: LabelScheme,
    label: String,
    include: String,
    exclude: Option<String>,
    population: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let mut rng = rand::rng();

    if population {
        let loaded = snapshot::load_population(
            config.population_path()?,
            config.population_cap,
            &mut rng,
        )?;
        let universe = snapshot::load_universe(config.universe_path()?)?;
        session = session.with_population(loaded, universe);
    }

    let mut table = initialize_table(&mut session, scheme, quiet)?;

    let request = EvaluationRequest {
        label,
        include,
        exclude,
        mode: if population {
            EvaluationMode::Population
        } else {
            EvaluationMode::Sample
        },
        commit: !dry_run,
    };

    let response = session.handle(&mut table, &request, &mut rng)?;
    let compiled = session.matcher().compile(&request.pattern_pair())?;

    let name = table
        .get(&request.label)
        .map(|row| row.name.clone())
        .unwrap_or_else(|| request.label.clone());
    println!("\n{}", style(&name).bold().cyan());
    println!("{}\n", style("═".repeat(80)).dim());

    println!("{}\n", metrics_table(response.summary()));

    match &response {
        EvaluationResponse::Sample { rows_by_outcome, .. } => {
            for rows in rows_by_outcome {
                print_outcome(&session, scheme, &compiled, rows);
            }
        }
        EvaluationResponse::Population { extrapolation, .. } => {
            print_extrapolation(&session, &compiled, extrapolation);
        }
    }

    if dry_run {
        println!("{} Dry run, nothing committed", style(">>>").cyan());
    } else {
        println!(
            "{} Committed {} for {}",
            style("✓").green(),
            style(&request.include).bold(),
            name
        );
    }

    Ok(())
}

fn metrics_table(summary: &MetricsSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Relevant").fg(Color::Cyan),
        Cell::new("Selected").fg(Color::Cyan),
        Cell::new("Precision").fg(Color::Cyan),
        Cell::new("Recall").fg(Color::Cyan),
        Cell::new("F1").fg(Color::Cyan),
        Cell::new("Accuracy").fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new(format_count(summary.relevant)),
        Cell::new(format_count(summary.selected)),
        metric_cell(summary.precision),
        metric_cell(summary.recall),
        metric_cell(summary.f1score),
        metric_cell(summary.accuracy),
    ]);
    table
}

fn print_outcome(
    session: &Session<JsonLabelStore>,
    scheme: LabelScheme,
    compiled: &CompiledPair,
    rows: &OutcomeRows,
) {
    println!(
        "{} ({})",
        style(rows.outcome.description()).bold(),
        format_count(rows.count)
    );
    println!("{}", style("─".repeat(80)).dim());

    if rows.indices.is_empty() {
        println!("  {}\n", style("None").dim());
        return;
    }

    let relevance = scheme.relevance();
    for &index in &rows.indices {
        let (Some(record), Some(text)) = (
            session.records().get(index),
            session.records().corpus().get(index),
        ) else {
            continue;
        };
        let labels = relevance.labels_of(record).join(", ");
        println!("  {}", highlight(text, &compiled.highlight(text)));
        println!("    {}", style(labels).dim());
    }

    if rows.count > rows.indices.len() as u64 {
        println!(
            "  {}",
            style(format!("... and {} more", rows.count - rows.indices.len() as u64)).dim()
        );
    }
    println!();
}

fn print_extrapolation(
    session: &Session<JsonLabelStore>,
    compiled: &CompiledPair,
    extrapolation: &Extrapolation,
) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Income band").fg(Color::Cyan),
        Cell::new("Matched").fg(Color::Cyan),
        Cell::new("Sample").fg(Color::Cyan),
        Cell::new("Percentage").fg(Color::Cyan),
        Cell::new("Universe").fg(Color::Cyan),
        Cell::new("Estimated").fg(Color::Cyan),
    ]);

    for row in &extrapolation.table.rows {
        table.add_row(vec![
            Cell::new(row.bucket.to_string()),
            Cell::new(format_count(row.selected)),
            Cell::new(format_count(row.population)),
            Cell::new(format_percent(row.percentage)),
            Cell::new(row.universe.map(format_count).unwrap_or_else(|| "-".to_string())),
            Cell::new(format_estimate(row.estimated_total)),
        ]);
    }
    println!("{}\n", table);

    println!(
        "{} ({} matched)",
        style("Sample of matching records").bold(),
        format_count(extrapolation.matched as u64)
    );
    println!("{}", style("─".repeat(80)).dim());

    let Some(population) = session.population() else {
        return;
    };
    for &index in &extrapolation.sample {
        if let Some(text) = population.corpus().get(index) {
            println!("  {}", highlight(text, &compiled.highlight(text)));
        }
    }
    println!();
}
