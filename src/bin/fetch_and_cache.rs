use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use log::{LevelFilter, info};

use krebstats::config::AppConfig;
use krebstats::export::CacheExporter;
use krebstats::models::Partition;

/// Pulls every dataset from the database and saves it as static JSON.
#[derive(Parser, Debug)]
#[command(name = "fetch_and_cache", version)]
struct Args {
    /// Output root; defaults to CACHE_OUTPUT_DIR.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Static query root; defaults to QUERIES_DIR.
    #[arg(long)]
    queries_dir: Option<PathBuf>,

    /// Partition to export (repeatable). Both when omitted.
    #[arg(long = "gender", value_parser = parse_partition)]
    genders: Vec<Partition>,

    /// Log the extracted CTE details and the formatted statement.
    #[arg(long)]
    debug: bool,
}

fn parse_partition(raw: &str) -> Result<Partition, String> {
    raw.parse().map_err(|e: krebstats::errors::StatsError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    krebstats::init_logging(if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let mut config = AppConfig::from_env()?;
    if let Some(dir) = args.queries_dir {
        config.queries_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.cache_output_dir = dir;
    }
    let partitions = if args.genders.is_empty() {
        Partition::ALL.to_vec()
    } else {
        args.genders
    };

    info!("Started at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    let exporter = CacheExporter::new(krebstats::stats_from_config(&config), &config.cache_output_dir)
        .with_debug(args.debug);
    let summary = exporter.run(&partitions).await?;

    info!(
        "{}/{} exports succeeded, data saved to {}",
        summary.succeeded,
        summary.total,
        exporter.output_dir().display()
    );
    if !summary.all_succeeded() {
        bail!("{} export(s) failed", summary.failures.len());
    }
    Ok(())
}
