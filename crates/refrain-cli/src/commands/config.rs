use anyhow::Result;
use refrain_etl::{config, Config};

fn or_unset(value: Option<String>) -> String {
    value.unwrap_or_else(|| String::from("<not set>"))
}

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!(
        "  genius_api_token: {}",
        if config.genius_api_token.is_some() { "<set>" } else { "<not set>" }
    );
    println!("  genius_base_url: {}", config.genius_base_url);
    println!(
        "  request_timeout_secs: {}",
        or_unset(config.request_timeout_secs.map(|s| s.to_string()))
    );
    println!(
        "  requests_per_second: {}",
        or_unset(config.requests_per_second.map(|r| r.to_string()))
    );
    println!("  scorer: {}", config.scorer);
    println!(
        "  lexicon_path: {}",
        or_unset(config.lexicon_path.as_ref().map(|p| p.display().to_string()))
    );
    println!(
        "  vectorizer_path: {}",
        or_unset(config.vectorizer_path.as_ref().map(|p| p.display().to_string()))
    );
    println!(
        "  model_path: {}",
        or_unset(config.model_path.as_ref().map(|p| p.display().to_string()))
    );
    println!("  data_dir: {}", config.data_dir.display());
    println!("  output_dir: {}", config.output_dir.display());
    println!("  logging.level: {}", config.logging.level);
    println!("  logging.coloured: {}", config.logging.coloured);

    println!("\nPriority: CLI args > ENV vars (REFRAIN_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure refrain.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
