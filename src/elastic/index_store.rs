use super::error::ElasticResult;
use super::mapping::Mapping;
use async_trait::async_trait;

/// Administrative operations the upgrade needs from the search engine.
///
/// [`IndexRepository`](super::index_repository::IndexRepository) implements it on top
/// of the Elasticsearch client. Every call is attempted once, nothing is retried.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Version of the single index bound to `index_alias`.
    ///
    /// `None` when the alias does not exist or the bound index has no `-v<N>` suffix.
    /// Fails with [`ElasticError::MoreThanOneIndexFoundForAlias`](super::error::ElasticError::MoreThanOneIndexFoundForAlias)
    /// when several indices share the alias.
    async fn resolve_alias_version(&self, index_alias: &str) -> ElasticResult<Option<u32>>;

    /// Versions of all `<index_name>-v<N>` indices, highest first.
    async fn list_index_versions(&self, index_name: &str) -> ElasticResult<Vec<u32>>;

    /// Settings and mappings of `index_name`, ready to be used as a creation payload.
    async fn get_mapping(&self, index_name: &str) -> ElasticResult<Option<Mapping>>;

    async fn create_index(&self, index_name: &str, mapping: &Mapping) -> ElasticResult<()>;

    async fn delete_index(&self, index_name: &str) -> ElasticResult<()>;

    /// Binds `index_alias` to `next_index_name` and, when given, unbinds it from
    /// `current_index_name` in one atomic request.
    async fn update_alias(
        &self,
        index_alias: &str,
        current_index_name: Option<&str>,
        next_index_name: &str,
    ) -> ElasticResult<()>;
}
