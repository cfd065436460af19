use clap::Parser;
use std::process;
use weatherhub_ingest::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler: never interrupt
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Import interrupted by user"))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("WeatherHub Ingest - weather observation normalizer");
    println!("==================================================");
    println!();
    println!("Import exported weather station observations (CSV files with a JSON");
    println!("payload column) into normalized weather and station collections.");
    println!();
    println!("USAGE:");
    println!("    weatherhub_ingest <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Import an export bucket into the collections (main command)");
    println!("    report      Print the data-quality report of existing collections");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Import a bucket, replacing the existing collections:");
    println!("    weatherhub_ingest import /path/to/bucket --output /path/to/collections");
    println!();
    println!("    # Append a new export without clearing:");
    println!("    weatherhub_ingest import /path/to/bucket --keep-existing");
    println!();
    println!("    # Quality report as JSON:");
    println!("    weatherhub_ingest report --output /path/to/collections --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    weatherhub_ingest <COMMAND> --help");
}
