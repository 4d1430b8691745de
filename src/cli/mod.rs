pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use socialgraph::config::Config;

#[derive(Parser)]
#[command(name = "socialgraph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Explore a social graph service: force-directed view, search and friend recommendations",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/socialgraph/config.toml)
    #[arg(long, global = true, env = "SOCIALGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the graph service, overriding the configuration file
    #[arg(long, global = true, env = "SOCIALGRAPH_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())
            .context("Failed to load configuration. Run 'socialgraph init' to create one.")?;
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Show service-side graph counters and the size of the displayable dataset
    Stats,

    /// List the direct friends of a user
    Neighbors {
        /// User id
        user: u64,
    },

    /// Show friend recommendations for a user
    Recommend {
        /// User id
        user: u64,

        /// Number of recommendations to request
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Find the shortest friendship chain between two users
    Path {
        /// Starting user id
        start: u64,

        /// Target user id
        end: u64,
    },

    /// List detected communities and their members
    Communities,

    /// Interactive exploration session over the graph view
    #[command(long_about = "Interactive exploration session.\n\n\
        Loads the dataset, lays it out with a force-directed simulation and\n\
        accepts commands on standard input:\n\n  \
        search <id>      look a user up and show recommendations\n  \
        tap node <id>    select a node and highlight its neighborhood\n  \
        tap edge <id>    highlight an edge and its endpoints\n  \
        click <x> <y>    tap whatever node or edge is under a screen position\n  \
        reload           fetch the dataset again\n  \
        show             print the current view state\n  \
        back             leave the results view\n  \
        quit             end the session")]
    Explore,
}
