use anyhow::Result;
use console::{Emoji, style};

use socialgraph::ExplorerError;
use socialgraph::api::HttpGraphClient;
use socialgraph::config::Config;
use socialgraph::explorer::{ResultsPage, load_results};
use socialgraph::graph::UserId;

use super::spinner;

static STAR: Emoji<'_, '_> = Emoji("⭐ ", "");

pub async fn run(config: Config, user: u64, count: Option<usize>) -> Result<()> {
    println!();
    println!("{}", style(" socialgraph - Friend Recommendations ").bold().reverse());
    println!();

    let client = HttpGraphClient::new(&config.api)?;
    let count = count.unwrap_or(config.explorer.recommendation_count);

    let spinner = spinner("Fetching recommendations...")?;
    let page = load_results(&client, UserId(user), Some(count)).await;
    spinner.finish_and_clear();

    match page {
        Ok(page) => print_page(&page),
        Err(ExplorerError::NotFound(id)) => {
            println!("{}", style(format!("User {} does not exist.", id)).yellow());
            println!();
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Print a results page; shared with the interactive session.
pub fn print_page(page: &ResultsPage) {
    if page.is_empty() {
        println!(
            "{}",
            style(format!("No recommendations for user {}.", page.user_id)).yellow()
        );
        println!();
        return;
    }

    println!(
        "{}Recommendations for user {}",
        STAR,
        style(page.user_id).cyan().bold()
    );
    println!();
    for (i, item) in page.recommendations.iter().enumerate() {
        let bar = "█".repeat((item.mutual_friends_count as usize).min(30));
        println!(
            "  {:>2}. user {:<10} {} {} mutual",
            i + 1,
            style(item.user_id).cyan().bold(),
            style(&bar).magenta(),
            style(item.mutual_friends_count).dim(),
        );
        if !item.mutual_friends.is_empty() {
            let mutual: Vec<String> = item.mutual_friends.iter().map(|id| id.to_string()).collect();
            println!("      {} {}", style("via").dim(), style(mutual.join(", ")).dim());
        }
    }
    println!();
}
