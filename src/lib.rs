pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod server;

pub use catalog::{build_tree, load_tags, CatalogNode, CatalogTree, TagRecord};
pub use error::{CatalogError, Result};
