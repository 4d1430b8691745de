pub mod communities;
pub mod explore;
pub mod init;
pub mod neighbors;
pub mod path;
pub mod recommend;
pub mod stats;

use anyhow::Result;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

static NETWORK: Emoji<'_, '_> = Emoji("🌐 ", "");

/// Steady-ticking spinner used while waiting on the graph service.
pub(crate) fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", NETWORK))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}
