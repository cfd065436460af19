//! Command implementations for the weather ingest CLI
//!
//! This module contains the command execution logic, logging setup and
//! result reporting for the CLI interface.

use crate::cli::args::{Args, Commands, ImportArgs, OutputFormat, ReportArgs};
use crate::models::IngestStats;
use crate::processor::Importer;
use crate::processor::writer::JsonLinesSink;
use crate::quality::{QualityRating, QualityReport, percent};
use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info};

/// Main command runner
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Import(import)) => run_import(import).await.map(|_| ()),
        Some(Commands::Report(report)) => run_report(report),
        None => Ok(()),
    }
}

/// Import a bucket, then print the summary and the quality report
pub async fn run_import(args: ImportArgs) -> Result<IngestStats> {
    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting weather ingest");
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config();
    let human = args.output_format == OutputFormat::Human && !args.quiet;

    if human {
        println!("{}", "Starting weather import".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), config.input_dir.display());
        println!("  {} {}", "Output:".bright_cyan(), config.output_dir.display());
    }

    let importer = Importer::new(config.clone())
        .context("Invalid import configuration")?
        .with_progress(args.show_progress());

    let stats = {
        let mut sink = JsonLinesSink::open(&config.output_dir).with_context(|| {
            format!("Failed to open collections in {}", config.output_dir.display())
        })?;
        importer.run(&mut sink).await.context("Import failed")?
    };

    let report = if config.quality_report {
        Some(
            QualityReport::from_output_dir(&config.output_dir)
                .context("Failed to build quality report")?,
        )
    } else {
        None
    };

    match args.output_format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "stats": stats, "quality": report });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human if !args.quiet => {
            print_summary(&stats);
            if let Some(report) = &report {
                print_quality_report(report);
            }
        }
        OutputFormat::Human => {}
    }

    Ok(stats)
}

/// Print the quality report of existing collections
pub fn run_report(args: ReportArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    let output_dir = args.output_dir();
    let report = QualityReport::from_output_dir(&output_dir)
        .with_context(|| format!("Failed to read collections in {}", output_dir.display()))?;

    match args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => print_quality_report(&report),
    }
    Ok(())
}

/// Set up structured logging
fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weatherhub_ingest={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn print_summary(stats: &IngestStats) {
    println!("\n{}", "Import Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {} of {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white(),
        stats.files_discovered
    );
    if stats.files_skipped > 0 {
        println!(
            "  {} {}",
            "Files skipped:".bright_yellow(),
            stats.files_skipped.to_string().bright_yellow()
        );
    }
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Rows processed:".bright_cyan(),
        stats.rows_processed.to_string().bright_white()
    );
    if stats.rows_failed > 0 {
        println!(
            "  {} {}",
            "Rows failed:".bright_red(),
            stats.rows_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Stations written:".bright_cyan(),
        stats.stations_written.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Weather documents:".bright_cyan(),
        stats.documents_written.to_string().bright_white().bold()
    );
}

fn print_quality_report(report: &QualityReport) {
    println!("\n{}", "Data Quality Report".bright_green().bold());
    println!(
        "  {} {}",
        "Total stations:".bright_cyan(),
        report.total_stations.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Total weather documents:".bright_cyan(),
        report.total_weather.to_string().bright_white()
    );

    println!("\n{}", "Stations by type".bright_yellow());
    for entry in &report.station_types {
        println!(
            "  {} {}: {} stations",
            "Type".bright_cyan(),
            entry.station_type.as_deref().unwrap_or("Unknown"),
            entry.count
        );
    }

    if !report.weather_underground_stations.is_empty() {
        println!("\n{}", "Weather Underground stations".bright_yellow());
        for station in &report.weather_underground_stations {
            println!(
                "  {} ({}) - {}",
                station.name.as_deref().unwrap_or("Unknown"),
                station.id.as_deref().unwrap_or("Unknown"),
                station.city.as_deref().unwrap_or("Unknown")
            );
        }
    }

    let stations = report.total_stations;
    if stations > 0 {
        let gaps = &report.station_gaps;
        println!("\n{}", "Station quality".bright_yellow());
        print_gap("Without id:", gaps.without_id, stations);
        print_gap("Without name:", gaps.without_name, stations);
        print_gap("Without coordinates:", gaps.without_coordinates, stations);
    }

    let weather = report.total_weather;
    if weather > 0 {
        let gaps = &report.weather_gaps;
        println!("\n{}", "Weather data quality".bright_yellow());
        print_gap("Without station_id:", gaps.without_station_id, weather);
        print_gap("Without date:", gaps.without_dh_utc, weather);
        print_gap("Without temperature:", gaps.without_temperature, weather);
        print_gap("Without pressure:", gaps.without_pressure, weather);
        print_gap("Without humidity:", gaps.without_humidity, weather);

        println!("\n{}", "Documents by source".bright_yellow());
        for source in &report.per_source {
            println!("  -> {}: {} documents", source.file_name, source.count);
        }
    }

    let rate = format!("{:.2}%", report.error_rate);
    let label = match report.rating {
        QualityRating::Excellent => report.rating.label().bright_green(),
        QualityRating::Acceptable => report.rating.label().bright_yellow(),
        QualityRating::NeedsImprovement => report.rating.label().bright_red(),
    };
    println!(
        "\n  {} {} ({})",
        "Global error rate:".bright_cyan(),
        rate.bright_white().bold(),
        label
    );

    match &report.top_precipitation {
        Some(top) => {
            let id = top.station_id.as_deref().unwrap_or("Unknown");
            println!(
                "  {} {} ({}): {:.2} mm",
                "Most precipitation:".bright_cyan(),
                top.name.as_deref().unwrap_or(id),
                id,
                top.total
            );
        }
        None => println!("  {}", "No precipitation data found".bright_black()),
    }
}

fn print_gap(label: &str, count: usize, total: usize) {
    println!(
        "  {} {} ({:.1}%)",
        label.bright_cyan(),
        count,
        percent(count, total)
    );
}
