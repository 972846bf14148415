use super::index_definition::DEFAULT_PREFIX;
use super::mapping::Mapping;
use super::synonyms::Synonyms;
use serde::{Deserialize, Serialize};

/// Configuration of one upgrade run.
///
/// Unset fields are resolved against the cluster by the upgrade, which hands the
/// options back fully resolved. A field counts as set when it is `Some`, so an
/// explicit version `0` is respected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradeOptions {
    /// Alias name prefix, `feeder-` by default.
    pub prefix: String,
    /// Version the alias currently points to. Looked up from the alias when unset.
    pub current_version: Option<u32>,
    /// Version of the index to create. Highest existing version + 1 when unset.
    pub target_version: Option<u32>,
    /// Payload of the new index. Copied from the current index when unset.
    pub mapping: Option<Mapping>,
    pub synonyms: Option<Synonyms>,
    /// Copy the synonyms of the current index when `synonyms` is unset.
    pub use_existing_synonyms: bool,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        UpgradeOptions {
            prefix: DEFAULT_PREFIX.to_string(),
            current_version: None,
            target_version: None,
            mapping: None,
            synonyms: None,
            use_existing_synonyms: false,
        }
    }
}

impl UpgradeOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_current_version(mut self, version: u32) -> Self {
        self.current_version = Some(version);
        self
    }

    pub fn with_target_version(mut self, version: u32) -> Self {
        self.target_version = Some(version);
        self
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn with_synonyms(mut self, synonyms: Synonyms) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    pub fn with_existing_synonyms(mut self, use_existing_synonyms: bool) -> Self {
        self.use_existing_synonyms = use_existing_synonyms;
        self
    }
}
