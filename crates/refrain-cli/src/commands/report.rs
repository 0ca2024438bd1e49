use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

use refrain_core::history::load_all_users;
use refrain_core::model::EnrichedEvent;
use refrain_core::report::{
    label_counts, listening_by_hour, mean_sentiment_by_user, top_artists, ArtistPlays,
    HourlyListening,
};
use refrain_etl::Config;

use crate::commands::enrich::ENRICHED_FILE;

pub fn show_report(config: &Config, top: usize) -> Result<()> {
    let events = load_all_users(&config.data_dir)
        .with_context(|| format!("Failed to load history from {}", config.data_dir.display()))?;

    println!("\nListening by hour ({} plays)\n", events.len());
    print!("{}", render_hourly(&listening_by_hour(&events)));

    println!("\nTop {} artists\n", top);
    print!("{}", render_top_artists(&top_artists(&events, top)));

    let enriched_path = config.output_dir.join(ENRICHED_FILE);
    if enriched_path.exists() {
        let enriched = read_enriched(&enriched_path)?;
        println!("\nSentiment ({})\n", enriched_path.display());
        print!("{}", render_sentiment(&enriched));
    } else {
        log::debug!("No enriched export at {}", enriched_path.display());
        println!("\nRun `refrain enrich` to add lyrics sentiment to this report.");
    }

    Ok(())
}

fn read_enriched(path: &Path) -> Result<Vec<EnrichedEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn render_hourly(by_hour: &HourlyListening) -> String {
    let users: BTreeSet<&str> = by_hour
        .values()
        .flat_map(|per_user| per_user.keys().map(String::as_str))
        .collect();

    let header = std::iter::once(format!("{:>4}", "hour"))
        .chain(users.iter().map(|user| format!("{user:>10}")))
        .collect::<Vec<_>>()
        .join(" ");

    let rows = by_hour.iter().map(|(hour, per_user)| {
        std::iter::once(format!("{hour:>4}"))
            .chain(users.iter().map(|user| {
                let plays = per_user.get(*user).copied().unwrap_or(0);
                format!("{plays:>10}")
            }))
            .collect::<Vec<_>>()
            .join(" ")
    });

    std::iter::once(header)
        .chain(rows)
        .map(|line| line + "\n")
        .collect()
}

fn render_top_artists(ranked: &[ArtistPlays]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(rank, artist)| {
            let breakdown: Vec<String> = artist
                .per_user
                .iter()
                .map(|(user, plays)| format!("{user}: {plays}"))
                .collect();
            format!(
                "{:>3}. {} ({} plays; {})\n",
                rank + 1,
                artist.artist,
                artist.total,
                breakdown.join(", ")
            )
        })
        .collect()
}

fn render_sentiment(enriched: &[EnrichedEvent]) -> String {
    let scored = enriched
        .iter()
        .filter(|e| e.sentiment_score.is_some())
        .count();

    let mut lines = vec![format!("  scored plays: {scored} of {}", enriched.len())];
    lines.extend(
        mean_sentiment_by_user(enriched)
            .into_iter()
            .map(|(user, mean)| format!("  {user}: mean compound {mean:+.3}")),
    );
    lines.extend(
        label_counts(enriched)
            .into_iter()
            .map(|(label, count)| format!("  {label}: {count}")),
    );
    lines.into_iter().map(|line| line + "\n").collect()
}
