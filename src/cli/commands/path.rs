use anyhow::Result;
use console::{Emoji, style};

use socialgraph::api::{GraphService, HttpGraphClient};
use socialgraph::config::Config;
use socialgraph::graph::UserId;

use super::spinner;

static ROUTE: Emoji<'_, '_> = Emoji("🛤️  ", "");

pub async fn run(config: Config, start: u64, end: u64) -> Result<()> {
    println!();
    println!("{}", style(" socialgraph - Shortest Path ").bold().reverse());
    println!();

    let client = HttpGraphClient::new(&config.api)?;
    let (start, end) = (UserId(start), UserId(end));

    let spinner = spinner("Finding shortest path...")?;
    let path = client.shortest_path(start, end).await;
    spinner.finish_and_clear();
    let path = path?;

    println!(
        "{}Finding path: {} {} {}",
        ROUTE,
        style(start).cyan().bold(),
        style("→").dim(),
        style(end).cyan().bold()
    );
    println!();

    if path.is_empty() {
        println!("{}", style("No path found between these users.").yellow());
        println!();
        return Ok(());
    }

    let last = path.len() - 1;
    for (i, id) in path.iter().enumerate() {
        if i == 0 || i == last {
            println!("  {} {}", style("●").green().bold(), style(id).cyan().bold());
        } else {
            println!("  {} {}", style("◦").dim(), style(id).cyan());
        }
        if i != last {
            println!("  {}", style("│").dim());
        }
    }

    println!();
    println!("  Path length: {} hops", style(last).green().bold());
    println!();
    Ok(())
}
