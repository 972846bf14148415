//! Zero-downtime index upgrades behind a stable Elasticsearch alias.
//!
//! The alias (`feeder-<index>` by default) points at one versioned index
//! `<index>-v<N>`. [`upgrade`] creates `<index>-v<N+1>` from the current mapping,
//! optionally with new inline synonyms, and swaps the alias onto it in one request.

pub mod config;
pub mod elastic;

pub use elastic::error::{ElasticError, ElasticResult};
pub use elastic::index_facade::IndexFacade;
pub use elastic::index_repository::IndexRepository;
pub use elastic::index_store::IndexStore;
pub use elastic::mapping::Mapping;
pub use elastic::synonyms::{apply_synonyms, Synonyms};
pub use elastic::upgrade_options::UpgradeOptions;

/// Upgrades `index_name` on `index_store` and returns the effective options.
pub async fn upgrade<S: IndexStore + ?Sized>(
    index_store: &S,
    index_name: &str,
    options: UpgradeOptions,
) -> ElasticResult<UpgradeOptions> {
    IndexFacade::new(index_store).upgrade(index_name, options).await
}
