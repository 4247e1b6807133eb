//! Tag catalog core: discovering catalog files on disk and normalizing them.
//!
//! The [`indexer`] walks the catalog root once at startup and produces an
//! immutable [`CatalogTree`]. The [`loader`] reads a single file on demand and
//! turns whichever of the supported [`shape`]s it was authored in into a flat
//! list of [`TagRecord`]s.

pub mod indexer;
pub mod loader;
pub mod record;
pub mod shape;
pub mod tree;

pub use indexer::{build_tree, CatalogIndexer};
pub use loader::{load_tags, parse_catalog, CatalogLoader};
pub use record::TagRecord;
pub use shape::{RawCatalog, ShapeError};
pub use tree::{CatalogNode, CatalogTree, ScanWarning};
