use super::error::{ElasticError, ElasticResult};
use super::index_definition::IndexDefinition;
use super::index_store::IndexStore;
use super::mapping::Mapping;
use super::synonyms::{apply_synonyms, extract_synonyms, Synonyms};
use super::upgrade_options::UpgradeOptions;
use tracing::{debug, error, info, warn};

pub struct IndexFacade<'a, S: IndexStore + ?Sized> {
    index_store: &'a S,
}

impl<'a, S: IndexStore + ?Sized> IndexFacade<'a, S> {
    pub fn new(index_store: &'a S) -> Self {
        IndexFacade { index_store }
    }

    /// Creates the next version of `index_name` and moves the alias onto it.
    ///
    /// The new index is only reachable through the alias once the alias update
    /// succeeded. If the update fails the new index is deleted again and the update
    /// error is returned. Upgrades of the same index must not run concurrently.
    pub async fn upgrade(
        &self,
        index_name: &str,
        mut options: UpgradeOptions,
    ) -> ElasticResult<UpgradeOptions> {
        let index_definition = IndexDefinition::new(index_name, options.prefix.as_str());
        let index_alias = index_definition.get_index_alias();

        if options.current_version.is_none() {
            options.current_version = self.index_store.resolve_alias_version(&index_alias).await?;
        }

        if options.current_version.is_none() && options.mapping.is_none() {
            return Err(ElasticError::configuration(format!(
                "Mapping must be provided, if there is no existing {} alias to retrieve the mapping from.",
                options.prefix
            )));
        }

        let target_version = match options.target_version {
            Some(target_version) => target_version,
            None => self.resolve_target_version(&index_definition).await?,
        };
        options.target_version = Some(target_version);

        let current_index_name = options
            .current_version
            .map(|version| index_definition.get_versioned_index_name(version));
        let next_index_name = index_definition.get_versioned_index_name(target_version);

        info!(
            "Upgrading \"{}\" from {:?} to \"{}\"",
            index_alias, current_index_name, next_index_name
        );

        let mut mapping = match options.mapping.take() {
            Some(mapping) => mapping,
            None => self.fetch_mapping(current_index_name.as_deref()).await?,
        };

        if options.synonyms.is_none() && options.use_existing_synonyms {
            if let Some(current_index_name) = current_index_name.as_deref() {
                options.synonyms = self.find_existing_synonyms(current_index_name).await?;
            }
        }

        if let Some(synonyms) = &options.synonyms {
            apply_synonyms(&mut mapping, synonyms)?;
        }

        self.index_store.create_index(&next_index_name, &mapping).await?;
        info!("Created index \"{}\"", next_index_name);
        options.mapping = Some(mapping);

        self.switch_alias(&index_alias, current_index_name.as_deref(), &next_index_name)
            .await?;
        info!("Alias \"{}\" now points to \"{}\"", index_alias, next_index_name);

        Ok(options)
    }

    /// Always one past the highest existing index, whatever the alias points to, so
    /// indices created next to a lagging alias are never overwritten.
    async fn resolve_target_version(&self, index_definition: &IndexDefinition) -> ElasticResult<u32> {
        let versions = self
            .index_store
            .list_index_versions(index_definition.index_name())
            .await?;
        debug!("Existing versions of \"{}\": {:?}", index_definition.index_name(), versions);

        match versions.first() {
            None => Ok(1),
            Some(highest) => highest.checked_add(1).ok_or_else(|| {
                ElasticError::configuration(format!("No version left after {highest}"))
            }),
        }
    }

    async fn fetch_mapping(&self, current_index_name: Option<&str>) -> ElasticResult<Mapping> {
        let mapping = match current_index_name {
            Some(current_index_name) => {
                debug!("Copying mapping of \"{}\"", current_index_name);
                self.index_store.get_mapping(current_index_name).await?
            }
            None => None,
        };

        mapping.ok_or_else(|| ElasticError::configuration("No mapping found."))
    }

    // Fetched again on purpose: the mapping in use may come from the caller.
    async fn find_existing_synonyms(
        &self,
        current_index_name: &str,
    ) -> ElasticResult<Option<Synonyms>> {
        let synonyms = self
            .index_store
            .get_mapping(current_index_name)
            .await?
            .as_ref()
            .and_then(extract_synonyms);

        match &synonyms {
            Some(_) => debug!("Reusing synonyms of \"{}\"", current_index_name),
            None => debug!("\"{}\" has no synonyms to reuse", current_index_name),
        }

        Ok(synonyms)
    }

    async fn switch_alias(
        &self,
        index_alias: &str,
        current_index_name: Option<&str>,
        next_index_name: &str,
    ) -> ElasticResult<()> {
        let Err(update_error) = self
            .index_store
            .update_alias(index_alias, current_index_name, next_index_name)
            .await
        else {
            return Ok(());
        };

        warn!(
            "Updating alias \"{}\" failed, deleting \"{}\": {}",
            index_alias, next_index_name, update_error
        );

        if let Err(rollback_error) = self.index_store.delete_index(next_index_name).await {
            error!(
                "Could not delete \"{}\", it is left without alias: {}",
                next_index_name, rollback_error
            );
            return Err(ElasticError::RollbackFailed {
                index: next_index_name.to_string(),
                source: Box::new(update_error),
                rollback: Box::new(rollback_error),
            });
        }

        Err(update_error)
    }
}
