use anyhow::Result;
use console::{Emoji, style};

use socialgraph::api::{GraphService, HttpGraphClient};
use socialgraph::config::Config;
use socialgraph::graph::UserId;

use super::spinner;

static PEOPLE: Emoji<'_, '_> = Emoji("👥 ", "");

pub async fn run(config: Config, user: u64) -> Result<()> {
    let client = HttpGraphClient::new(&config.api)?;
    let user = UserId(user);

    let spinner = spinner("Fetching friends...")?;
    let neighbors = client.fetch_neighbors(user).await;
    spinner.finish_and_clear();
    let neighbors = neighbors?;

    if neighbors.is_empty() {
        println!("{}", style(format!("User {} has no friends in the graph.", user)).yellow());
        return Ok(());
    }

    println!(
        "{}User {} has {} friends",
        PEOPLE,
        style(user).cyan().bold(),
        style(neighbors.len()).green().bold()
    );
    println!();
    for id in &neighbors {
        println!("  {} {}", style("•").dim(), style(id).cyan());
    }
    println!();

    Ok(())
}
