use anyhow::{Context, Result};
use serde::Serializer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use refrain_core::history::load_all_users;
use refrain_core::model::{EnrichedEvent, PlayEvent};
use refrain_etl::{Config, EnrichmentPipeline, LyricsSource};

pub const COMBINED_FILE: &str = "combined_streaming_data.json";
pub const ENRICHED_FILE: &str = "combined_streaming_with_sentiment.json";

pub fn run_enrich(config: &Config) -> Result<()> {
    log::info!("Loading streaming history from {}", config.data_dir.display());
    let events = load_all_users(&config.data_dir)
        .with_context(|| format!("Failed to load history from {}", config.data_dir.display()))?;

    if events.is_empty() {
        println!("No plays found in {}", config.data_dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    let combined_path = config.output_dir.join(COMBINED_FILE);
    write_combined(&combined_path, &events)?;
    println!("Wrote {} plays to {}", events.len(), combined_path.display());

    let mut pipeline = EnrichmentPipeline::from_config(config)?;
    let enriched_path = config.output_dir.join(ENRICHED_FILE);
    let scored = write_enriched(&enriched_path, &mut pipeline, events)?;

    println!("Wrote {} scored plays to {}", scored, enriched_path.display());
    log::info!("Lyrics cache: {}", pipeline.stats());

    Ok(())
}

pub fn write_combined(path: &Path, events: &[PlayEvent]) -> Result<()> {
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, events)?;
    writer.flush()?;
    Ok(())
}

/// Stream enriched events to `path` as they are produced; returns how many
/// received a score.
pub fn write_enriched<S: LyricsSource>(
    path: &Path,
    pipeline: &mut EnrichmentPipeline<S>,
    events: Vec<PlayEvent>,
) -> Result<usize> {
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );

    let mut scored = 0;
    let rows = pipeline.enrich(events).inspect(|enriched: &EnrichedEvent| {
        if enriched.sentiment_score.is_some() {
            scored += 1;
        }
    });

    let mut serializer = serde_json::Serializer::pretty(&mut writer);
    (&mut serializer)
        .collect_seq(rows)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;

    Ok(scored)
}
