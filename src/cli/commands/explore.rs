use anyhow::Result;
use console::{Emoji, style};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use socialgraph::api::HttpGraphClient;
use socialgraph::config::Config;
use socialgraph::explorer::{
    Completion, ExplorerOptions, ExplorerView, ForceLayoutFactory, GraphExplorer, InteractionKind,
    LoadStatus, RecommendationPanel, Route, SearchOutcome, load_results,
};
use socialgraph::graph::UserId;

use super::recommend::print_page;

static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

type Explorer = GraphExplorer<HttpGraphClient, ForceLayoutFactory>;

/// One line of input in the interactive session.
#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    Search(String),
    Tap(InteractionKind, String),
    Click(f64, f64),
    Reload,
    Show,
    Back,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb, rest.as_slice()) {
        // The raw text goes through the explorer's own validation.
        ("search", _) => ReplCommand::Search(rest.join(" ")),
        ("tap", ["node", id]) => ReplCommand::Tap(InteractionKind::Node, id.to_string()),
        ("tap", ["edge", id]) => ReplCommand::Tap(InteractionKind::Edge, id.to_string()),
        ("tap", _) => return Err("usage: tap node <id> | tap edge <id>".to_string()),
        ("click", [x, y]) => {
            let x = x.parse().map_err(|_| format!("'{}' is not a coordinate", x))?;
            let y = y.parse().map_err(|_| format!("'{}' is not a coordinate", y))?;
            ReplCommand::Click(x, y)
        }
        ("click", _) => return Err("usage: click <x> <y>".to_string()),
        ("reload", []) => ReplCommand::Reload,
        ("show", []) => ReplCommand::Show,
        ("back", []) => ReplCommand::Back,
        ("help" | "?", []) => ReplCommand::Help,
        ("quit" | "exit", []) => ReplCommand::Quit,
        _ => return Err(format!("unknown command '{}', try 'help'", line.trim())),
    };
    Ok(Some(command))
}

pub async fn run(config: Config) -> Result<()> {
    println!();
    println!("{}", style(" socialgraph - Explorer ").bold().reverse());
    println!();

    let client = HttpGraphClient::new(&config.api)?;
    let options = ExplorerOptions::from_config(&config.explorer);
    let factory = ForceLayoutFactory::new(config.layout.clone());
    let explorer = GraphExplorer::new(client, factory, options);

    reload(&explorer).await;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(command)) => execute(&explorer, command).await,
            Ok(None) => {}
            Err(message) => println!("{}{}", WARN, style(message).yellow()),
        }
        prompt()?;
    }

    explorer.teardown();
    println!();
    Ok(())
}

fn prompt() -> Result<()> {
    print!("{} ", style("explore>").green().bold());
    std::io::stdout().flush()?;
    Ok(())
}

async fn execute(explorer: &Explorer, command: ReplCommand) {
    match command {
        ReplCommand::Search(text) => search(explorer, &text).await,
        ReplCommand::Tap(kind, id) => {
            if explorer.select_from_interaction(kind, &id) {
                print_selection(&explorer.view());
            } else {
                println!("{}", style(format!("Nothing to tap at '{}'", id)).yellow());
            }
        }
        ReplCommand::Click(x, y) => {
            if explorer.pointer_tap(x, y) == 0 {
                println!("{}", style("Nothing under the pointer").dim());
            } else {
                print_selection(&explorer.view());
            }
        }
        ReplCommand::Reload => reload(explorer).await,
        ReplCommand::Show => print_view(&explorer.view()),
        ReplCommand::Back => {
            explorer.leave_results();
            println!("{}Back to the graph", GRAPH);
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
}

async fn reload(explorer: &Explorer) {
    match explorer.reload().await {
        Ok(Completion::Applied(summary)) => {
            println!(
                "{}Loaded {} nodes and {} edges",
                GRAPH,
                style(summary.node_count).green().bold(),
                style(summary.edge_count).green().bold()
            );
            if let Some(err) = explorer.view().visualization_error {
                println!("{}{}", WARN, style(err).yellow());
            }
        }
        Ok(Completion::Superseded) => {}
        Err(err) => println!("{}Failed to load graph data: {}", WARN, style(err).red()),
    }
}

async fn search(explorer: &Explorer, text: &str) {
    match explorer.search(text).await {
        Ok(Completion::Applied(SearchOutcome::Recommendations(result))) => {
            println!(
                "{}User {} found, {} recommendations",
                SEARCH,
                style(result.for_user_id).cyan().bold(),
                style(result.items.len()).green()
            );
            print_view(&explorer.view());
        }
        Ok(Completion::Applied(SearchOutcome::Navigate(route))) => {
            println!("{}{}", SEARCH, style(route).dim());
            let page = load_results(
                explorer.service(),
                route_user(&route),
                explorer.options().recommendation_count,
            )
            .await;
            match page {
                Ok(page) => print_page(&page),
                Err(err) => println!("{}{}", WARN, style(err).yellow()),
            }
            println!("  Type {} to return to the graph", style("back").yellow());
        }
        Ok(Completion::Superseded) => {}
        Err(err) => println!("{}{}", WARN, style(err).yellow()),
    }
}

fn route_user(route: &Route) -> UserId {
    match route {
        Route::SearchResults(id) => *id,
    }
}

fn print_selection(view: &ExplorerView) {
    match &view.selection.selected {
        Some(id) => println!("  {} {}", style("selected").dim(), style(id).cyan().bold()),
        None => println!("  {} {}", style("selected").dim(), style("none").dim()),
    }
    let highlighted: Vec<&str> = view.rendered_highlight.iter().map(String::as_str).collect();
    println!(
        "  {} {}",
        style("highlighted").dim(),
        style(highlighted.join(", ")).magenta()
    );
}

fn print_view(view: &ExplorerView) {
    println!();
    let load = match &view.load {
        LoadStatus::Idle => style("idle".to_string()).dim(),
        LoadStatus::Loading => style("loading".to_string()).yellow(),
        LoadStatus::Ready(summary) => style(format!(
            "ready ({} nodes, {} edges)",
            summary.node_count, summary.edge_count
        ))
        .green(),
        LoadStatus::Failed(err) => style(format!("failed: {}", err)).red(),
    };
    println!("  {} {}", style("graph").dim(), load);
    if let Some(err) = &view.visualization_error {
        println!("  {} {}", style("render").dim(), style(err).red());
    }
    print_selection(view);

    match &view.recommendations {
        RecommendationPanel::Idle => {}
        RecommendationPanel::Loading(id) => {
            println!("  {} loading for {}", style("recommendations").dim(), id)
        }
        RecommendationPanel::Failed(err) => {
            println!("  {} {}", style("recommendations").dim(), style(err).yellow())
        }
        RecommendationPanel::Ready(result) => {
            println!("  {}", style("recommendations").dim());
            for item in &result.items {
                println!(
                    "    {} user {} ({} mutual)",
                    style("•").dim(),
                    style(item.user_id).cyan(),
                    item.mutual_friends_count
                );
            }
        }
    }
    if let Some(route) = &view.route {
        println!("  {} {}", style("route").dim(), route);
    }
    println!();
}

fn print_help() {
    println!();
    println!("  {} <id>        look a user up", style("search").cyan());
    println!("  {} <id>      select a node", style("tap node").cyan());
    println!("  {} <id>      highlight an edge", style("tap edge").cyan());
    println!("  {} <x> <y>     tap what is under a screen position", style("click").cyan());
    println!(
        "  {} | {} | {} | {}",
        style("reload").cyan(),
        style("show").cyan(),
        style("back").cyan(),
        style("quit").cyan()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_keeps_raw_text() {
        assert_eq!(
            parse_command("search  42 ").unwrap(),
            Some(ReplCommand::Search("42".to_string()))
        );
        assert_eq!(
            parse_command("search").unwrap(),
            Some(ReplCommand::Search(String::new()))
        );
    }

    #[test]
    fn test_parse_taps_and_clicks() {
        assert_eq!(
            parse_command("tap node 7").unwrap(),
            Some(ReplCommand::Tap(InteractionKind::Node, "7".to_string()))
        );
        assert_eq!(
            parse_command("tap edge 7-9").unwrap(),
            Some(ReplCommand::Tap(InteractionKind::Edge, "7-9".to_string()))
        );
        assert_eq!(
            parse_command("click 400 300.5").unwrap(),
            Some(ReplCommand::Click(400.0, 300.5))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_command("tap 7").is_err());
        assert!(parse_command("click here").is_err());
        assert!(parse_command("dance").is_err());
        assert_eq!(parse_command("   ").unwrap(), None);
    }
}
