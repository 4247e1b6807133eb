/// Constants shared by the CLI, config defaults and the HTTP layer

// URL prefix the bundled browser UI fetches from
pub const DEFAULT_PREFIX: &str = "/extensions/ComfyUI-prompt-builder";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8188;

// Catalog layout on disk
pub const DEFAULT_DATA_DIR: &str = "data";
pub const CATALOG_EXTENSION: &str = ".yaml";
pub const DEFAULT_MAX_DEPTH: usize = 32;

// Static assets and logs
pub const DEFAULT_WEB_DIR: &str = "web";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "tag_catalog.log";

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

// Environment overrides (a `.env` file is honored via dotenv)
pub const ENV_HOST: &str = "TAG_CATALOG_HOST";
pub const ENV_PORT: &str = "TAG_CATALOG_PORT";
pub const ENV_PREFIX: &str = "TAG_CATALOG_PREFIX";
pub const ENV_DATA_DIR: &str = "TAG_CATALOG_DATA_DIR";
pub const ENV_WEB_DIR: &str = "TAG_CATALOG_WEB_DIR";
pub const ENV_LOG_DIR: &str = "TAG_CATALOG_LOG_DIR";

/// Key whose value holds the tag payload in wrapped catalog files
pub const CONTENT_KEY: &str = "content";
/// Per-tag field holding alternate spellings
pub const ALIAS_KEY: &str = "alias";

/// Normalize a URL prefix to `/segment[/segment...]` form, or `""` for the root.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("tags"), "/tags");
        assert_eq!(normalize_prefix("/extensions/tags/"), "/extensions/tags");
        assert_eq!(normalize_prefix(DEFAULT_PREFIX), DEFAULT_PREFIX);
    }
}
