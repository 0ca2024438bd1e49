use anyhow::{Context, Result};
use std::io::Read;

use refrain_etl::{Config, ScoreLyrics, SentimentScorer};

/// Score `text`, or stdin when no text is given, and print the result.
pub fn run_score(config: &Config, text: Option<String>) -> Result<()> {
    let lyrics = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read lyrics from stdin")?;
            buffer
        }
    };

    let scorer = SentimentScorer::from_config(config)?;
    log::debug!("Scoring {} bytes with the {} strategy", lyrics.len(), scorer.kind());
    println!("{}", scorer.score(&lyrics));

    Ok(())
}
