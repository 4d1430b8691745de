use anyhow::Result;
use console::{Emoji, style};

use socialgraph::api::{GraphService, HttpGraphClient};
use socialgraph::config::Config;

use super::spinner;

static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");

pub async fn run(config: Config) -> Result<()> {
    println!();
    println!("{}", style(" socialgraph - Graph Statistics ").bold().reverse());
    println!();

    let client = HttpGraphClient::new(&config.api)?;

    let spinner = spinner("Querying graph service...")?;
    let (stats, dataset) =
        futures::future::join(client.fetch_stats(), client.fetch_dataset()).await;
    spinner.finish_and_clear();

    let stats = stats?;
    println!("{}Service Graph ({})", CHART, style(client.base_url()).dim());
    println!();
    println!(
        "  {} Users:       {}",
        style("•").cyan(),
        style(stats.num_vertices).green().bold()
    );
    println!(
        "  {} Friendships: {}",
        style("•").cyan(),
        style(stats.num_edges).green().bold()
    );

    println!();
    println!("{}Displayable Dataset ({})", GRAPH, style(&config.api.dataset_path).dim());
    println!();
    match dataset {
        Ok(dataset) => {
            let summary = dataset.summary();
            println!(
                "  {} Nodes:       {}",
                style("•").cyan(),
                style(summary.node_count).green().bold()
            );
            println!(
                "  {} Edges:       {}",
                style("•").cyan(),
                style(summary.edge_count).green().bold()
            );
        }
        Err(err) => {
            println!("  {} {}", style("•").cyan(), style(err).yellow());
        }
    }
    println!();

    Ok(())
}
