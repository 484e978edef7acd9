use cataid_rust::commands::{self, ExportOptions, InspectOptions};
use cataid_rust::{cli, config, error, export, scanner};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Table { paths, output, format } => {
            println!("cataid - catout table\n");

            let files = scanner::collect_catout_paths(&paths, &config.catout_pattern)?;
            if files.is_empty() {
                return Err(error::CataidError::NoCatoutFiles);
            }
            println!("✔ {} catout file(s)", files.len());

            let rows = export::load_rows(&files);
            println!("✔ {} item(s)", rows.len());

            let output = output.unwrap_or_else(|| PathBuf::from(&config.table_output));
            let written = export::write_table(
                &rows,
                format,
                &output,
                &config.table_output,
                config.image_height_px,
            )?;
            for path in written {
                println!("✔ Table written: {}", path.display());
            }
        }

        Commands::Inspect { page, show, hide, catalog } => {
            let report = commands::inspect_page(&page, &InspectOptions { show, hide, catalog })?;

            println!("{} ({} mode)", page.display(), report.mode);
            for row in &report.rows {
                let time = row
                    .time_position
                    .map(cli::format_time_position)
                    .unwrap_or_else(|| "-".repeat(12));
                let engaged = if row.engaged { "*" } else { " " };
                println!(
                    "  {:<6} {} {} {}",
                    row.display.class_name(),
                    time,
                    engaged,
                    row.label
                );
            }
            println!("\n{} of {} row(s) shown", report.shown(), report.rows.len());
        }

        Commands::Export { page, engage, variant, cataloger, output } => {
            let options = ExportOptions { engage, variant, cataloger };
            let report = commands::export_page(&page, &options, config.get_cataloger())?;

            let written = export::write_delivered(std::slice::from_ref(&report.file), &output)?;
            for path in written {
                println!(
                    "✔ Exported {} item(s): {}",
                    report.outcome.item_count,
                    path.display()
                );
            }
        }

        Commands::Config { set_cataloger, show } => {
            let mut config = config;

            if let Some(name) = set_cataloger {
                config.set_cataloger(name)?;
                println!("✔ Cataloger saved");
            }

            if show {
                println!("Settings ({}):", Config::config_path()?.display());
                println!(
                    "  cataloger: {}",
                    config.get_cataloger().unwrap_or_else(|| "(not set)".to_string())
                );
                println!("  catout pattern: {}", config.catout_pattern);
                println!("  table output: {}", config.table_output);
                println!("  image height: {}px", config.image_height_px);
            }
        }
    }

    Ok(())
}
