//! Batch export of every dataset to static JSON documents.
//!
//! Layout under the output root:
//! `<partition>/<file>.json` per dataset plus a root `manifest.json` listing
//! the files written by the run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{error, info, warn};
use serde_json::{Value, json};
use sqlformat::{FormatOptions, Indent, QueryParams};

use crate::datasets::Dataset;
use crate::errors::StatsError;
use crate::models::{Partition, QuerySpec};
use crate::stats::StatsQueries;

pub const MANIFEST_FILE: &str = "manifest.json";

/// One file produced per partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportJob {
    /// Team offensive efficiency with or without the percentile columns.
    TeamEfficiency { include_percentiles: bool },
    Dataset(Dataset),
    PlayTypes,
    Teams,
}

impl ExportJob {
    pub const ALL: [ExportJob; 10] = [
        ExportJob::TeamEfficiency {
            include_percentiles: true,
        },
        ExportJob::TeamEfficiency {
            include_percentiles: false,
        },
        ExportJob::Dataset(Dataset::TeamShotLocationFrequency),
        ExportJob::Dataset(Dataset::TeamPlayTypeShotFrequency),
        ExportJob::Dataset(Dataset::PlayerOffensiveEfficiency),
        ExportJob::Dataset(Dataset::PlayerShotLocationEfficiency),
        ExportJob::Dataset(Dataset::PlayerShotLocationFrequency),
        ExportJob::Dataset(Dataset::PlayerPlayTypeShotFrequency),
        ExportJob::PlayTypes,
        ExportJob::Teams,
    ];

    pub fn file_name(&self) -> String {
        match self {
            ExportJob::TeamEfficiency {
                include_percentiles: true,
            } => format!("{}.json", Dataset::TeamOffensiveEfficiency.key()),
            ExportJob::TeamEfficiency {
                include_percentiles: false,
            } => format!(
                "{}-no-percentiles.json",
                Dataset::TeamOffensiveEfficiency.key()
            ),
            ExportJob::Dataset(dataset) => format!("{}.json", dataset.key()),
            ExportJob::PlayTypes => "play-types.json".to_string(),
            ExportJob::Teams => "teams.json".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub succeeded: usize,
    pub total: usize,
    /// Paths relative to the output root, in write order.
    pub written: Vec<String>,
    /// `(relative path, error message)` per failed job.
    pub failures: Vec<(String, String)>,
}

impl ExportSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct CacheExporter {
    stats: StatsQueries,
    output_dir: PathBuf,
    debug: bool,
}

impl CacheExporter {
    pub fn new(stats: StatsQueries, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            stats,
            output_dir: output_dir.into(),
            debug: false,
        }
    }

    /// Logs the extracted table, the preamble tail and the formatted
    /// statement before the team efficiency export.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Exports every job for each partition. A failed job is logged and
    /// counted; only output-directory and manifest failures abort the run.
    pub async fn run(&self, partitions: &[Partition]) -> Result<ExportSummary, StatsError> {
        info!(
            "Exporting {} partition(s) to {}",
            partitions.len(),
            self.output_dir.display()
        );
        let mut summary = ExportSummary::default();

        for &partition in partitions {
            fs::create_dir_all(self.output_dir.join(partition.as_str()))?;
            info!("Processing {}", partition);

            for job in ExportJob::ALL {
                summary.total += 1;
                let relative = format!("{}/{}", partition, job.file_name());

                let outcome = match self.document(partition, job).await {
                    Ok(document) => self.write_json(&relative, &document),
                    Err(e) => Err(e),
                };

                match outcome {
                    Ok(()) => {
                        info!("Saved {}", relative);
                        summary.succeeded += 1;
                        summary.written.push(relative);
                    }
                    Err(e) => {
                        error!("Export of {} failed: {}", relative, e);
                        summary.failures.push((relative, e.to_string()));
                    }
                }
            }
        }

        let manifest = json!({
            "last_updated": timestamp(),
            "datasets": summary.written,
        });
        self.write_json(MANIFEST_FILE, &manifest)?;

        if summary.all_succeeded() {
            info!("Complete: {}/{} exports succeeded", summary.succeeded, summary.total);
        } else {
            warn!("Complete: {}/{} exports succeeded", summary.succeeded, summary.total);
        }
        Ok(summary)
    }

    async fn document(&self, partition: Partition, job: ExportJob) -> Result<Value, StatsError> {
        match job {
            ExportJob::TeamEfficiency {
                include_percentiles,
            } => {
                let dataset = Dataset::TeamOffensiveEfficiency;
                let spec = QuerySpec::default().include_derived(include_percentiles);
                let compiled = self.stats.compile(partition, dataset, Some(&spec))?;
                if self.debug {
                    log_compiled(&compiled);
                }
                let data = self.stats.execute(&compiled).await?;
                Ok(json!({
                    "success": true,
                    "gender": partition.as_str(),
                    "query": dataset.key(),
                    "include_percentiles": include_percentiles,
                    "fetched_at": timestamp(),
                    "row_count": data.len(),
                    "data": data,
                }))
            }
            ExportJob::Dataset(dataset) => {
                let data = self.stats.run(partition, dataset, None).await?;
                Ok(json!({
                    "success": true,
                    "gender": partition.as_str(),
                    "query": dataset.key(),
                    "description": dataset.description(),
                    "fetched_at": timestamp(),
                    "row_count": data.len(),
                    "data": data,
                }))
            }
            ExportJob::PlayTypes => {
                let play_types = self.stats.available_play_types(partition).await?;
                Ok(json!({
                    "success": true,
                    "gender": partition.as_str(),
                    "fetched_at": timestamp(),
                    "play_types": play_types,
                }))
            }
            ExportJob::Teams => {
                let teams = self.stats.available_teams(partition).await?;
                Ok(json!({
                    "success": true,
                    "gender": partition.as_str(),
                    "fetched_at": timestamp(),
                    "teams": teams,
                }))
            }
        }
    }

    fn write_json(&self, relative: &str, document: &Value) -> Result<(), StatsError> {
        let path = self.output_dir.join(relative);
        let body = serde_json::to_string_pretty(document)?;
        fs::write(&path, body)?;
        Ok(())
    }
}

fn timestamp() -> String {
    Local::now().to_rfc3339()
}

fn log_compiled(compiled: &crate::stats::CompiledQuery) {
    let preamble = &compiled.fragment.preamble;
    info!(
        "DEBUG {} [{}]: preamble {} chars, result table {:?}",
        compiled.dataset,
        compiled.partition,
        preamble.len(),
        compiled.fragment.result_table_name
    );
    info!("DEBUG preamble ends with: ...{}", tail(preamble, 100));

    let options = FormatOptions {
        indent: Indent::Spaces(4),
        uppercase: Some(true),
        ..Default::default()
    };
    info!(
        "DEBUG combined statement:\n{}",
        sqlformat::format(&compiled.inline_sql(), &QueryParams::None, &options)
    );
}

/// Last `max_chars` characters of `text`.
fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let start = text
        .char_indices()
        .nth(count - max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &text[start..]
}
