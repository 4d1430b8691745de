//! Interactive social graph explorer.
//!
//! The library holds the exploration controller ([`explorer::GraphExplorer`])
//! and its collaborators: the remote graph client in [`api`], the dataset model
//! in [`graph`], and a headless force-directed engine. The `socialgraph` binary
//! is a terminal front end over the same types.

pub mod api;
pub mod config;
pub mod error;
pub mod explorer;
pub mod graph;

pub use error::{ExplorerError, Result};
