use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;
use std::path::Path;

use socialgraph::config::Config;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(explicit: Option<&Path>, force: bool) -> Result<()> {
    println!();
    println!("{}", style(" socialgraph - Initialization ").bold().reverse());
    println!();

    let config_path = Config::resolve_path(explicit)?;

    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let config_content = toml::to_string_pretty(&Config::default())?;
    fs::write(&config_path, config_content).context("Failed to write config file")?;

    println!(
        "{}Created configuration at {}",
        CHECK,
        style(config_path.display()).cyan()
    );

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!("{}Next steps:", ROCKET);
    println!();
    println!("  Point {} at your graph service, then:", style("[api] base_url").yellow());
    println!("    {} socialgraph stats", style("$").dim());
    println!("    {} socialgraph explore", style("$").dim());
    println!();

    Ok(())
}
