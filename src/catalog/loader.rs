use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::debug;

use crate::catalog::record::TagRecord;
use crate::catalog::shape::RawCatalog;
use crate::error::{CatalogError, Result};
use crate::metrics::LoadMetrics;

/// Load and normalize one catalog file below `root`.
pub fn load_tags(root: impl AsRef<Path>, relative_path: &str) -> Result<Vec<TagRecord>> {
    CatalogLoader::new(root.as_ref()).load(relative_path)
}

/// Parse catalog text and normalize it. `relative_path` is only used in errors.
pub fn parse_catalog(relative_path: &str, text: &str) -> Result<Vec<TagRecord>> {
    let document: Value = if is_blank_document(text) {
        Value::Null
    } else {
        let mut yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| CatalogError::parse(relative_path, e))?;
        // Resolve `<<: *anchor` merge keys before looking at the shape
        yaml.apply_merge()
            .map_err(|e| CatalogError::parse(relative_path, e))?;
        serde_json::to_value(yaml).map_err(|e| CatalogError::parse(relative_path, e))?
    };

    let raw = RawCatalog::classify(document).map_err(|e| CatalogError::parse(relative_path, e))?;
    let shape = raw.shape_name();
    let records = raw
        .normalize()
        .map_err(|e| CatalogError::parse(relative_path, e))?;
    debug!(file = relative_path, shape, records = records.len(), "Catalog file normalized");
    Ok(records)
}

/// Reads catalog files relative to a fixed root. Holds no other state, so it
/// can be shared freely between concurrent requests.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    root: PathBuf,
}

impl CatalogLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, relative_path: &str) -> Result<Vec<TagRecord>> {
        let started = Instant::now();
        let result = self
            .read(relative_path)
            .and_then(|text| parse_catalog(relative_path, &text));

        match &result {
            Ok(records) => {
                LoadMetrics::record_load_success(started.elapsed().as_secs_f64(), records.len())
            }
            Err(e) => LoadMetrics::record_load_error(e.kind()),
        }
        result
    }

    /// Map a client-supplied relative path onto a file below the root.
    ///
    /// Absolute paths, `..` segments and symlinks leading outside the root are
    /// all reported as not found.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let not_found = || CatalogError::NotFound(relative_path.to_string());

        if relative_path.is_empty() {
            return Err(not_found());
        }
        let rel = Path::new(relative_path);
        if !rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(not_found());
        }

        let root = self.root.canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(),
            _ => CatalogError::io(self.root.display().to_string(), e),
        })?;
        let candidate = root.join(rel).canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(),
            _ => CatalogError::io(relative_path, e),
        })?;

        if !candidate.starts_with(&root) {
            return Err(not_found());
        }
        Ok(candidate)
    }

    fn read(&self, relative_path: &str) -> Result<String> {
        let path = self.resolve(relative_path)?;
        fs::read_to_string(&path).map_err(|e| CatalogError::io(relative_path, e))
    }
}

/// True when the text holds no YAML node at all (empty or comments only).
fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    fn catalog(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (rel, body) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        dir
    }

    fn values(records: Vec<TagRecord>) -> Vec<Value> {
        records.into_iter().map(TagRecord::into_value).collect()
    }

    #[test]
    fn test_mapping_shape_prepends_key_to_alias() {
        let dir = catalog(&[("animals/fox.yaml", "fox:\n  alias:\n    - kitsune\n")]);
        let records = load_tags(dir.path(), "animals/fox.yaml").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].aliases(), vec!["fox", "kitsune"]);
        assert!(records[0].name().is_none());
    }

    #[test]
    fn test_mapping_shape_without_alias() {
        let dir = catalog(&[("cat.yaml", "cat: {}\n")]);
        let records = load_tags(dir.path(), "cat.yaml").unwrap();
        assert_eq!(values(records), vec![json!({"alias": ["cat"]})]);
    }

    #[test]
    fn test_list_shape_returned_unchanged() {
        let dir = catalog(&[(
            "dogs.yaml",
            "- name: dog\n  alias: [dog, puppy]\n",
        )]);
        let records = load_tags(dir.path(), "dogs.yaml").unwrap();
        assert_eq!(
            values(records),
            vec![json!({"name": "dog", "alias": ["dog", "puppy"]})]
        );
    }

    #[test]
    fn test_wrapped_list_shape_returned_unchanged() {
        let dir = catalog(&[("wrapped.yaml", "content:\n  - a: 1\n")]);
        let records = load_tags(dir.path(), "wrapped.yaml").unwrap();
        assert_eq!(values(records), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_wrapped_mapping_drops_file_metadata() {
        let body = "name: Colors\ncategory: palette\ncontent:\n  red:\n    alias: [crimson]\n  blue: {}\n";
        let dir = catalog(&[("colors.yaml", body)]);
        let records = load_tags(dir.path(), "colors.yaml").unwrap();
        assert_eq!(
            values(records),
            vec![
                json!({"alias": ["red", "crimson"]}),
                json!({"alias": ["blue"]}),
            ]
        );
    }

    #[test]
    fn test_empty_and_comment_only_files_yield_nothing() {
        let dir = catalog(&[
            ("empty.yaml", ""),
            ("comments.yaml", "# nothing here yet\n\n"),
            ("null.yaml", "~\n"),
        ]);
        assert!(load_tags(dir.path(), "empty.yaml").unwrap().is_empty());
        assert!(load_tags(dir.path(), "comments.yaml").unwrap().is_empty());
        assert!(load_tags(dir.path(), "null.yaml").unwrap().is_empty());
    }

    #[test]
    fn test_nonexistent_path_is_not_found() {
        let dir = catalog(&[("cat.yaml", "cat: {}\n")]);
        for path in ["missing.yaml", "nested/missing.yaml", ""] {
            let err = load_tags(dir.path(), path).unwrap_err();
            assert!(matches!(err, CatalogError::NotFound(_)), "{}: {:?}", path, err);
        }
    }

    #[test]
    fn test_paths_escaping_root_are_not_found() {
        let outer = catalog(&[("secret.yaml", "key: {}\n"), ("data/cat.yaml", "cat: {}\n")]);
        let root = outer.path().join("data");
        let absolute = outer.path().join("secret.yaml");

        for path in ["../secret.yaml", "./../secret.yaml", absolute.to_str().unwrap()] {
            let err = load_tags(&root, path).unwrap_err();
            assert!(matches!(err, CatalogError::NotFound(_)), "{}: {:?}", path, err);
        }
        assert!(load_tags(&root, "./cat.yaml").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_root_is_not_found() {
        let outer = catalog(&[("secret.yaml", "key: {}\n"), ("data/cat.yaml", "cat: {}\n")]);
        let root = outer.path().join("data");
        std::os::unix::fs::symlink(outer.path().join("secret.yaml"), root.join("link.yaml"))
            .unwrap();

        let err = load_tags(&root, "link.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = catalog(&[("broken.yaml", "cat: [unclosed\n")]);
        let err = load_tags(dir.path(), "broken.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_scalar_document_is_parse_error() {
        let dir = catalog(&[("scalar.yaml", "just a sentence\n")]);
        let err = load_tags(dir.path(), "scalar.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = catalog(&[("animals/fox.yaml", "fox: {}\n")]);
        let err = load_tags(dir.path(), "animals").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }), "{:?}", err);
    }

    #[test]
    fn test_parse_catalog_without_filesystem() {
        let records = parse_catalog("inline.yaml", "owl:\n  alias: fukurou\n  note: nocturnal\n").unwrap();
        assert_eq!(
            values(records),
            vec![json!({"alias": ["owl", "fukurou"], "note": "nocturnal"})]
        );
    }

    #[test]
    fn test_merge_keys_are_resolved() {
        let text = "base: &b {alias: [x], weight: 1}\nderived:\n  <<: *b\n  weight: 2\n";
        let records = parse_catalog("merge.yaml", text).unwrap();
        assert_eq!(
            values(records),
            vec![
                json!({"alias": ["base", "x"], "weight": 1}),
                json!({"alias": ["derived", "x"], "weight": 2}),
            ]
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_the_path() {
        let dir = catalog(&[("cat.yaml", "cat: {}\n"), (" dog.yaml", "dog: {}\n")]);

        let err = load_tags(dir.path(), " cat.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)), "{:?}", err);

        let records = load_tags(dir.path(), " dog.yaml").unwrap();
        assert_eq!(records[0].aliases(), vec!["dog"]);
    }

    #[test]
    fn test_blank_document_detection() {
        assert!(is_blank_document(""));
        assert!(is_blank_document("  \n# comment\n---\n"));
        assert!(!is_blank_document("cat: {}"));
    }
}
