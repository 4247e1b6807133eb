use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse catalog file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CatalogError {
    pub fn parse(path: impl Into<String>, message: impl ToString) -> Self {
        CatalogError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "not_found",
            CatalogError::Parse { .. } => "parse",
            CatalogError::Io { .. } => "io",
            CatalogError::Config(_) | CatalogError::Toml(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
