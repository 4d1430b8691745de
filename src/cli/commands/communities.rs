use anyhow::Result;
use console::{Emoji, style};

use socialgraph::api::{GraphService, HttpGraphClient};
use socialgraph::config::Config;

use super::spinner;

static PEOPLE: Emoji<'_, '_> = Emoji("👥 ", "");
static COMMUNITY: Emoji<'_, '_> = Emoji("🏘️  ", "");

const SHOWN_MEMBERS: usize = 20;

pub async fn run(config: Config) -> Result<()> {
    println!();
    println!("{}", style(" socialgraph - Communities ").bold().reverse());
    println!();

    let client = HttpGraphClient::new(&config.api)?;

    let spinner = spinner("Detecting communities...")?;
    let communities = client.communities().await;
    spinner.finish_and_clear();
    let mut communities = communities?;

    if communities.is_empty() {
        println!("{}", style("No communities detected (empty graph).").yellow());
        return Ok(());
    }

    communities.sort_by(|a, b| b.len().cmp(&a.len()));
    let members: usize = communities.iter().map(Vec::len).sum();
    println!(
        "{}Detected {} communities covering {} users",
        COMMUNITY,
        style(communities.len()).green().bold(),
        style(members).cyan(),
    );
    println!();

    for (i, community) in communities.iter().enumerate() {
        let header = style(format!("Community {} ({} members)", i, community.len())).bold();
        let header = match i % 6 {
            0 => header.red(),
            1 => header.blue(),
            2 => header.green(),
            3 => header.yellow(),
            4 => header.magenta(),
            _ => header.cyan(),
        };
        println!("{}{}", PEOPLE, header);

        for id in community.iter().take(SHOWN_MEMBERS) {
            println!("    {} {}", style("•").dim(), style(id).cyan());
        }
        if community.len() > SHOWN_MEMBERS {
            println!(
                "    {} ... and {} more",
                style("•").dim(),
                style(community.len() - SHOWN_MEMBERS).dim()
            );
        }
        println!();
    }

    Ok(())
}
