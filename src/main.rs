// src/main.rs
use clap::{Parser, ValueEnum};
use std::collections::HashSet;

use epl_stats::extractors::TableExtractor;
use epl_stats::fbref;
use epl_stats::pipeline::{TableCleaner, TypedDataset};
use epl_stats::render::{self, ChartRenderer, StackedBarChart, SvgChartRenderer, TextChartRenderer};
use epl_stats::storage::{RunMetadata, StorageManager};
use epl_stats::utils::error::RenderError;
use epl_stats::utils::{self, AppError};

/// Command Line Interface for the EPL player statistics dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source page URL
    #[arg(long, default_value = fbref::DEFAULT_STATS_URL)]
    url: String,

    /// Output directory for CSV, chart and metadata files
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Team to include (repeatable; default: all teams)
    #[arg(short, long = "team")]
    teams: Vec<String>,

    /// Position code to include (repeatable; default: all positions)
    #[arg(short, long = "position")]
    positions: Vec<String>,

    /// Chart output format
    #[arg(long, value_enum, default_value_t = ChartFormat::Text)]
    chart: ChartFormat,

    /// Network timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Debug mode - save the raw page and extracted fragment
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartFormat {
    Text,
    Svg,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting run for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Fetch the stats page (single shot, bounded timeout, no retry)
    let html = fbref::fetch_stats_page(&args.url, args.timeout_secs).await?;
    let fetched_at = chrono::Utc::now().to_rfc3339();

    if args.debug {
        storage.save_debug_html("raw_page", &html)?;
    }

    // 5. Extract the comment-wrapped table
    let extractor = TableExtractor::new();
    if args.debug {
        if let Ok(fragment) = extractor.extract_fragment(&html) {
            storage.save_debug_html("table_fragment", &fragment)?;
        }
    }
    let raw = extractor.extract(&html)?;

    // 6. Clean and type the dataset
    let clean = TableCleaner::new().clean(&raw)?;
    let dataset = TypedDataset::from_clean(&clean)?;

    let all_teams = dataset.teams();
    let all_positions = dataset.positions();
    tracing::info!("Teams ({}): {}", all_teams.len(), all_teams.join(", "));
    tracing::info!("Positions ({}): {}", all_positions.len(), all_positions.join(", "));

    // 7. Apply the team/position selections (no flags = everything selected)
    let teams = selection(&args.teams, &all_teams, "team");
    let positions = selection(&args.positions, &all_positions, "position");
    let filtered = dataset.filter(&teams, &positions);
    tracing::info!("Selected {} of {} rows", filtered.len(), dataset.len());

    // 8. Render the filtered table and CSV export
    println!("{}", render::table::render(&filtered));
    storage.save_csv("players", &render::csv::to_csv(&filtered))?;

    // 9. Render the two distribution charts
    let renderer: Box<dyn ChartRenderer> = match args.chart {
        ChartFormat::Text => Box::new(TextChartRenderer::default()),
        ChartFormat::Svg => Box::new(SvgChartRenderer::default()),
    };
    let charts = [
        ("nationality_by_team", "EPL Player Nationality distribution By Team", "Nation"),
        ("age_by_team", "EPL Player Age distribution By Team", "Age"),
    ];
    for (name, title, stack) in charts {
        let groups = filtered.group_count(&["Squad", stack])?;
        match StackedBarChart::from_group_counts(title, stack, &groups) {
            Ok(chart) => {
                let rendered = renderer.render(&chart);
                if args.chart == ChartFormat::Text {
                    println!("{}", rendered);
                }
                storage.save_chart(name, renderer.file_extension(), &rendered)?;
            }
            // Recoverable: report, skip this chart, keep going.
            Err(RenderError::EmptySelection) => {
                tracing::error!(
                    "No data selected for {:?}. Select at least one team and one position.",
                    name
                );
            }
        }
    }

    // 10. Write run metadata
    let mut teams_selected: Vec<String> = teams.into_iter().collect();
    teams_selected.sort();
    let mut positions_selected: Vec<String> = positions.into_iter().collect();
    positions_selected.sort();
    storage.save_metadata(&RunMetadata {
        source_url: args.url.clone(),
        fetched_at,
        rows_total: dataset.len(),
        rows_selected: filtered.len(),
        teams_selected,
        positions_selected,
    })?;

    tracing::info!("Run finished.");
    Ok(())
}

/// Resolves a repeatable CLI selection against the values present in the
/// dataset. No flags means "all selected", matching the dashboard's
/// multiselect defaults.
fn selection(requested: &[String], available: &[String], what: &str) -> HashSet<String> {
    if requested.is_empty() {
        return available.iter().cloned().collect();
    }
    for name in requested {
        if !available.contains(name) {
            tracing::warn!("Unknown {} {:?} in selection", what, name);
        }
    }
    requested.iter().cloned().collect()
}
