pub mod dataset;

pub use dataset::{DatasetSummary, EdgeRecord, GraphDataset, NodeRecord, UserId};
