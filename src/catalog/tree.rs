use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One entry of the catalog tree.
///
/// Serializes as `{"type": "directory", "path": ..., "children": {...}}` or
/// `{"type": "file", "path": ...}`. The entry name is the key in the parent's
/// `children` mapping and is not repeated in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogNode {
    Directory {
        #[serde(skip)]
        name: String,
        path: String,
        children: BTreeMap<String, CatalogNode>,
    },
    File {
        #[serde(skip)]
        name: String,
        path: String,
    },
}

impl CatalogNode {
    pub fn name(&self) -> &str {
        match self {
            CatalogNode::Directory { name, .. } | CatalogNode::File { name, .. } => name,
        }
    }

    /// Forward-slash path relative to the catalog root.
    pub fn path(&self) -> &str {
        match self {
            CatalogNode::Directory { path, .. } | CatalogNode::File { path, .. } => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, CatalogNode::Directory { .. })
    }

    pub fn children(&self) -> Option<&BTreeMap<String, CatalogNode>> {
        match self {
            CatalogNode::Directory { children, .. } => Some(children),
            CatalogNode::File { .. } => None,
        }
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            CatalogNode::File { path, .. } => out.push(path),
            CatalogNode::Directory { children, .. } => {
                for child in children.values() {
                    child.collect_files(out);
                }
            }
        }
    }
}

/// A subdirectory that could not be fully listed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// The scanned catalog, rooted at an unnamed directory.
///
/// Built once by the indexer and shared read-only afterwards. Only the root's
/// children are stored; the root itself has no name or path. Serializes as
/// that `children` mapping.
#[derive(Debug, Clone)]
pub struct CatalogTree {
    children: BTreeMap<String, CatalogNode>,
    warnings: Vec<ScanWarning>,
}

impl CatalogTree {
    pub(crate) fn new(children: BTreeMap<String, CatalogNode>, warnings: Vec<ScanWarning>) -> Self {
        Self { children, warnings }
    }

    pub fn empty() -> Self {
        Self::new(BTreeMap::new(), Vec::new())
    }

    pub fn children(&self) -> &BTreeMap<String, CatalogNode> {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Problems encountered while scanning; the affected subtrees are empty.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Look up a node by its forward-slash relative path.
    pub fn get(&self, relative_path: &str) -> Option<&CatalogNode> {
        let mut parts = relative_path.split('/').filter(|p| !p.is_empty());
        let mut node = self.children.get(parts.next()?)?;
        for part in parts {
            node = node.children()?.get(part)?;
        }
        Some(node)
    }

    /// Relative paths of every catalog file, depth-first in tree order.
    pub fn file_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for child in self.children.values() {
            child.collect_files(&mut out);
        }
        out
    }

    pub fn file_count(&self) -> usize {
        self.file_paths().len()
    }
}

impl Serialize for CatalogTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.children.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> CatalogTree {
        let mut nested = BTreeMap::new();
        nested.insert(
            "fox.yaml".to_string(),
            CatalogNode::File {
                name: "fox.yaml".to_string(),
                path: "animals/fox.yaml".to_string(),
            },
        );
        let mut children = BTreeMap::new();
        children.insert(
            "animals".to_string(),
            CatalogNode::Directory {
                name: "animals".to_string(),
                path: "animals".to_string(),
                children: nested,
            },
        );
        children.insert(
            "colors.yaml".to_string(),
            CatalogNode::File {
                name: "colors.yaml".to_string(),
                path: "colors.yaml".to_string(),
            },
        );
        CatalogTree::new(children, Vec::new())
    }

    #[test]
    fn test_tree_serializes_as_children_mapping() {
        let value = serde_json::to_value(sample_tree()).unwrap();
        assert_eq!(
            value,
            json!({
                "animals": {
                    "type": "directory",
                    "path": "animals",
                    "children": {
                        "fox.yaml": {"type": "file", "path": "animals/fox.yaml"}
                    }
                },
                "colors.yaml": {"type": "file", "path": "colors.yaml"}
            })
        );
    }

    #[test]
    fn test_lookup_by_relative_path() {
        let tree = sample_tree();
        let fox = tree.get("animals/fox.yaml").unwrap();
        assert!(!fox.is_directory());
        assert_eq!(fox.name(), "fox.yaml");
        assert!(tree.get("animals").unwrap().is_directory());
        assert!(tree.get("animals/cat.yaml").is_none());
        assert!(tree.get("colors.yaml/nested").is_none());
    }

    #[test]
    fn test_file_paths_in_tree_order() {
        let tree = sample_tree();
        assert_eq!(tree.file_paths(), vec!["animals/fox.yaml", "colors.yaml"]);
        assert_eq!(tree.file_count(), 2);
    }

    #[test]
    fn test_empty_tree() {
        let tree = CatalogTree::empty();
        assert!(tree.is_empty());
        assert!(tree.get("").is_none());
        assert_eq!(serde_json::to_value(&tree).unwrap(), json!({}));
    }
}
