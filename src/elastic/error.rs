use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElasticError {
    /// Not enough input to resolve versions or a mapping.
    #[error("{0}")]
    Configuration(String),

    #[error("More than one index found for alias \"{alias}\": {indices:?}")]
    MoreThanOneIndexFoundForAlias { alias: String, indices: Vec<String> },

    /// The mapping lacks the synonym filter scaffolding or references a synonym file.
    #[error("{0}")]
    Schema(String),

    #[error("Elasticsearch request failed: {0}")]
    Transport(#[from] elasticsearch::Error),

    #[error("Elasticsearch responded with status {status} to {operation}: {body}")]
    Response {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The alias update failed and deleting the freshly created index failed as well,
    /// so `index` is left behind without an alias.
    #[error("{source} (rollback of index \"{index}\" failed: {rollback})")]
    RollbackFailed {
        index: String,
        source: Box<ElasticError>,
        rollback: Box<ElasticError>,
    },

    #[error("Could not read \"{path}\": {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in \"{path}\": {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

impl ElasticError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// True for failures reported by the store itself, as opposed to input problems.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Response { .. } | Self::RollbackFailed { .. }
        )
    }
}

pub type ElasticResult<T> = Result<T, ElasticError>;
