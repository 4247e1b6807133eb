use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::tree::{CatalogNode, CatalogTree, ScanWarning};
use crate::constants::{CATALOG_EXTENSION, DEFAULT_MAX_DEPTH};
use crate::metrics::ScanMetrics;

/// Scan `root` with the default extension and depth limit.
pub fn build_tree(root: impl AsRef<Path>) -> CatalogTree {
    CatalogIndexer::new(root.as_ref()).build()
}

/// Walks a catalog root and builds the [`CatalogTree`].
///
/// Directories without any catalog file below them are pruned. A directory
/// that cannot be listed, or that resolves to one of its own ancestors through
/// a symlink, is logged and treated as empty, so a scan always completes.
#[derive(Debug, Clone)]
pub struct CatalogIndexer {
    root: PathBuf,
    extension: String,
    max_depth: usize,
}

impl CatalogIndexer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: CATALOG_EXTENSION.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(&self) -> CatalogTree {
        let span = tracing::info_span!("catalog_scan", root = %self.root.display());
        let _enter = span.enter();

        let mut warnings = Vec::new();
        let mut ancestors = Vec::new();
        let children = self.scan_dir(&self.root, "", 0, &mut ancestors, &mut warnings);
        let tree = CatalogTree::new(children, warnings);

        let files = tree.file_count();
        ScanMetrics::record_scan(files, tree.warnings().len());
        info!(
            files,
            warnings = tree.warnings().len(),
            "Catalog scan finished"
        );
        tree
    }

    fn scan_dir(
        &self,
        dir: &Path,
        rel_path: &str,
        depth: usize,
        ancestors: &mut Vec<PathBuf>,
        warnings: &mut Vec<ScanWarning>,
    ) -> BTreeMap<String, CatalogNode> {
        let mut result = BTreeMap::new();

        if depth > self.max_depth {
            record_warning(
                warnings,
                dir,
                format!("maximum depth {} exceeded, not descending", self.max_depth),
            );
            return result;
        }

        // Canonical directories on the current recursion path
        let canonical = match fs::canonicalize(dir) {
            Ok(canonical) => canonical,
            Err(e) => {
                record_warning(warnings, dir, format!("error reading directory: {}", e));
                return result;
            }
        };
        if ancestors.contains(&canonical) {
            record_warning(
                warnings,
                dir,
                format!("symlink cycle back to {}, not descending", canonical.display()),
            );
            return result;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                record_warning(warnings, dir, format!("error reading directory: {}", e));
                return result;
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => match entry.file_name().into_string() {
                    Ok(name) => names.push(name),
                    Err(raw) => record_warning(
                        warnings,
                        &dir.join(&raw),
                        "skipping entry with non UTF-8 name".to_string(),
                    ),
                },
                Err(e) => {
                    record_warning(warnings, dir, format!("error reading entry: {}", e));
                }
            }
        }
        names.sort();

        ancestors.push(canonical);
        for name in names {
            let full_path = dir.join(&name);
            let item_rel_path = if rel_path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", rel_path, name)
            };

            // Follows symlinks
            let metadata = match fs::metadata(&full_path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!(path = %full_path.display(), "Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if metadata.is_dir() {
                let children =
                    self.scan_dir(&full_path, &item_rel_path, depth + 1, ancestors, warnings);
                if !children.is_empty() {
                    result.insert(
                        name.clone(),
                        CatalogNode::Directory {
                            name,
                            path: item_rel_path,
                            children,
                        },
                    );
                }
            } else if metadata.is_file() && name.ends_with(&self.extension) {
                result.insert(
                    name.clone(),
                    CatalogNode::File {
                        name,
                        path: item_rel_path,
                    },
                );
            }
        }
        ancestors.pop();

        result
    }
}

fn record_warning(warnings: &mut Vec<ScanWarning>, path: &Path, message: String) {
    warn!(path = %path.display(), "{}", message);
    warnings.push(ScanWarning {
        path: path.to_path_buf(),
        message,
    });
}
