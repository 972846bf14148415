use crate::elastic::error::{ElasticError, ElasticResult};
use crate::elastic::index_definition::IndexDefinition;
use crate::elastic::mapping::Mapping;
use crate::elastic::synonyms::Synonyms;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Reads index definitions from a directory holding `<index>.json` (the mapping) and
/// optionally `<index>.synonyms.json` (`{"synonyms": [..], "preSynonyms": [..]}`).
pub struct IndexDefinitionLoader {
    directory: PathBuf,
    index_prefix: String,
}

impl IndexDefinitionLoader {
    pub fn new(directory: impl Into<PathBuf>, index_prefix: impl Into<String>) -> Self {
        IndexDefinitionLoader {
            directory: directory.into(),
            index_prefix: index_prefix.into(),
        }
    }

    pub fn get_definition(&self, index_name: &str) -> IndexDefinition {
        IndexDefinition::new(index_name, self.index_prefix.as_str())
    }

    pub async fn load_mapping(&self, index_definition: &IndexDefinition) -> ElasticResult<Mapping> {
        let path = self.directory.join(format!("{}.json", index_definition.index_name()));
        read_json(&path).await
    }

    /// `None` when there is no synonyms file for the index.
    pub async fn load_synonyms(
        &self,
        index_definition: &IndexDefinition,
    ) -> ElasticResult<Option<Synonyms>> {
        let path = self
            .directory
            .join(format!("{}.synonyms.json", index_definition.index_name()));

        if !fs::try_exists(&path).await.map_err(|source| io_error(&path, source))? {
            debug!("No synonyms file at {}", path.display());
            return Ok(None);
        }

        read_json(&path).await.map(Some)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> ElasticResult<T> {
    debug!("Reading {}", path.display());
    let data_definition = fs::read_to_string(path)
        .await
        .map_err(|source| io_error(path, source))?;

    serde_json::from_str(&data_definition).map_err(|source| ElasticError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> ElasticError {
    ElasticError::Io {
        path: path.display().to_string(),
        source,
    }
}
