use super::error::{ElasticError, ElasticResult};
use super::index_store::IndexStore;
use super::mapping::Mapping;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ResolveAliasVersion(String),
    ListIndexVersions(String),
    GetMapping(String),
    CreateIndex(String, Mapping),
    DeleteIndex(String),
    UpdateAlias(String, Option<String>, String),
}

/// In-memory store that records every call and answers with canned data.
#[derive(Default)]
pub struct MockIndexStore {
    pub alias_version: Option<u32>,
    pub index_versions: Vec<u32>,
    /// Answers of consecutive `get_mapping` calls, `None` once exhausted.
    pub mappings: Mutex<VecDeque<Option<Mapping>>>,
    pub fail_list_index_versions: bool,
    pub fail_create_index: bool,
    pub fail_update_alias: bool,
    pub fail_delete_index: bool,
    pub calls: Mutex<Vec<Call>>,
}

impl MockIndexStore {
    pub fn with_mappings(self, mappings: impl IntoIterator<Item = Option<Mapping>>) -> Self {
        *self.mappings.lock().unwrap() = mappings.into_iter().collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn failure(operation: &'static str) -> ElasticError {
    ElasticError::Response {
        operation,
        status: 500,
        body: "failed".to_string(),
    }
}

#[async_trait]
impl IndexStore for MockIndexStore {
    async fn resolve_alias_version(&self, index_alias: &str) -> ElasticResult<Option<u32>> {
        self.record(Call::ResolveAliasVersion(index_alias.to_string()));
        Ok(self.alias_version)
    }

    async fn list_index_versions(&self, index_name: &str) -> ElasticResult<Vec<u32>> {
        self.record(Call::ListIndexVersions(index_name.to_string()));
        if self.fail_list_index_versions {
            return Err(failure("cat_indices"));
        }
        Ok(self.index_versions.clone())
    }

    async fn get_mapping(&self, index_name: &str) -> ElasticResult<Option<Mapping>> {
        self.record(Call::GetMapping(index_name.to_string()));
        Ok(self.mappings.lock().unwrap().pop_front().flatten())
    }

    async fn create_index(&self, index_name: &str, mapping: &Mapping) -> ElasticResult<()> {
        self.record(Call::CreateIndex(index_name.to_string(), mapping.clone()));
        if self.fail_create_index {
            return Err(failure("create_index"));
        }
        Ok(())
    }

    async fn delete_index(&self, index_name: &str) -> ElasticResult<()> {
        self.record(Call::DeleteIndex(index_name.to_string()));
        if self.fail_delete_index {
            return Err(failure("delete_index"));
        }
        Ok(())
    }

    async fn update_alias(
        &self,
        index_alias: &str,
        current_index_name: Option<&str>,
        next_index_name: &str,
    ) -> ElasticResult<()> {
        self.record(Call::UpdateAlias(
            index_alias.to_string(),
            current_index_name.map(str::to_string),
            next_index_name.to_string(),
        ));
        if self.fail_update_alias {
            return Err(failure("update_aliases"));
        }
        Ok(())
    }
}
