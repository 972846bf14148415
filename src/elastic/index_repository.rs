use crate::elastic::error::{ElasticError, ElasticResult};
use crate::elastic::index_definition::{parse_index_version, IndexDefinition};
use crate::elastic::index_store::IndexStore;
use crate::elastic::mapping::Mapping;
use async_trait::async_trait;
use elasticsearch::cat::CatIndicesParts;
use elasticsearch::http::response::Response;
use elasticsearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesGetAliasParts, IndicesGetParts,
};
use elasticsearch::Elasticsearch;
use serde_json::{json, Value};
use tracing::debug;

const NOT_FOUND: u16 = 404;

#[derive(Clone)]
pub struct IndexRepository {
    pub(crate) client: Elasticsearch,
}

impl IndexRepository {
    pub fn new(client: Elasticsearch) -> Self {
        IndexRepository { client }
    }

    /**
     * All index names the alias points to, or None if there is no such alias.
     *
     * Directly from ES API: /_alias/{alias}
     */
    async fn find_index_names_for_alias(
        &self,
        index_alias: &str,
    ) -> ElasticResult<Option<Vec<String>>> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&[index_alias]))
            .send()
            .await?;

        if response.status_code().as_u16() == NOT_FOUND {
            debug!("Alias \"{}\" does not exist", index_alias);
            return Ok(None);
        }

        let body = expect_success("get_alias", response)
            .await?
            .json::<Value>()
            .await?;

        Ok(Some(index_names_from_alias_response(&body)))
    }

    pub async fn find_current_index_name_for_alias(
        &self,
        index_alias: &str,
    ) -> ElasticResult<Option<String>> {
        let indexes_with_alias = self.find_index_names_for_alias(index_alias).await?;

        current_index_name(index_alias, indexes_with_alias)
    }

    /**
     * CAT api is mainly for plain/text results, with 'format(json)' it returns one
     * record per index matching the pattern.
     * CAT API: https://www.elastic.co/guide/en/elasticsearch/reference/7.17/cat.html
     */
    async fn find_index_names_by_pattern(&self, pattern: &str) -> ElasticResult<Value> {
        let response = self
            .client
            .cat()
            .indices(CatIndicesParts::Index(&[pattern]))
            .format("json")
            .h(&["index"])
            .send()
            .await?;

        Ok(expect_success("cat_indices", response)
            .await?
            .json::<Value>()
            .await?)
    }
}

#[async_trait]
impl IndexStore for IndexRepository {
    async fn resolve_alias_version(&self, index_alias: &str) -> ElasticResult<Option<u32>> {
        let index_name = self.find_current_index_name_for_alias(index_alias).await?;
        debug!("Alias \"{}\" points to {:?}", index_alias, index_name);

        Ok(index_name.as_deref().and_then(parse_index_version))
    }

    async fn list_index_versions(&self, index_name: &str) -> ElasticResult<Vec<u32>> {
        let definition = IndexDefinition::new(index_name, "");
        let records = self
            .find_index_names_by_pattern(&definition.get_versioned_index_pattern())
            .await?;

        Ok(versions_from_cat_records(&definition, &records))
    }

    async fn get_mapping(&self, index_name: &str) -> ElasticResult<Option<Mapping>> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[index_name]))
            .send()
            .await?;

        if response.status_code().as_u16() == NOT_FOUND {
            debug!("Index \"{}\" does not exist", index_name);
            return Ok(None);
        }

        let body = expect_success("get_index", response)
            .await?
            .json::<Value>()
            .await?;

        Ok(mapping_from_index_response(index_name, body))
    }

    async fn create_index(&self, index_name: &str, mapping: &Mapping) -> ElasticResult<()> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(mapping)
            .send()
            .await?;

        expect_success("create_index", response).await?;
        Ok(())
    }

    async fn delete_index(&self, index_name: &str) -> ElasticResult<()> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index_name]))
            .send()
            .await?;

        expect_success("delete_index", response).await?;
        Ok(())
    }

    async fn update_alias(
        &self,
        index_alias: &str,
        current_index_name: Option<&str>,
        next_index_name: &str,
    ) -> ElasticResult<()> {
        let response = self
            .client
            .indices()
            .update_aliases()
            .body(alias_actions(index_alias, current_index_name, next_index_name))
            .send()
            .await?;

        expect_success("update_aliases", response).await?;
        Ok(())
    }
}

async fn expect_success(operation: &'static str, response: Response) -> ElasticResult<Response> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ElasticError::Response {
        operation,
        status: status.as_u16(),
        body,
    })
}

/*
Sample data:
    Object {
        "enrise.nl-nl-v2": Object {
            "aliases": Object {
                "feeder-enrise.nl-nl": Object {},
            },
        },
    }
*/
fn index_names_from_alias_response(body: &Value) -> Vec<String> {
    body.as_object()
        .map(|indices| indices.keys().cloned().collect())
        .unwrap_or_default()
}

/// The single index bound to the alias. A missing alias has no current index.
fn current_index_name(
    index_alias: &str,
    indexes_with_alias: Option<Vec<String>>,
) -> ElasticResult<Option<String>> {
    let Some(mut indexes_with_alias) = indexes_with_alias else {
        return Ok(None);
    };

    if indexes_with_alias.len() > 1 {
        return Err(ElasticError::MoreThanOneIndexFoundForAlias {
            alias: index_alias.to_string(),
            indices: indexes_with_alias,
        });
    }

    Ok(indexes_with_alias.pop())
}

fn versions_from_cat_records(definition: &IndexDefinition, records: &Value) -> Vec<u32> {
    let mut versions: Vec<u32> = records
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|record| record["index"].as_str())
        .filter_map(|index_name| definition.parse_own_version(index_name))
        .collect();

    versions.sort_unstable_by(|a, b| b.cmp(a));
    versions.dedup();
    versions
}

/// Only settings and mappings are kept, aliases are managed by the upgrade itself.
fn mapping_from_index_response(index_name: &str, mut body: Value) -> Option<Mapping> {
    let indices = body.as_object_mut()?;
    // Asked for by alias the response is keyed by the concrete index name.
    let mut index = match indices.remove(index_name) {
        Some(index) => index,
        None if indices.len() == 1 => {
            let (concrete_index_name, index) = indices.iter_mut().next()?;
            debug!("\"{}\" resolved to index \"{}\"", index_name, concrete_index_name);
            index.take()
        }
        None => return None,
    };

    let mut section = |name: &str| index.get_mut(name).map(Value::take).unwrap_or_default();
    let mut mapping = Mapping::new(section("settings"), section("mappings"));
    mapping.strip_store_assigned_settings();
    Some(mapping)
}

fn alias_actions(
    index_alias: &str,
    current_index_name: Option<&str>,
    next_index_name: &str,
) -> Value {
    let mut actions = vec![json!({ "add": { "index": next_index_name, "alias": index_alias } })];

    if let Some(current_index_name) = current_index_name {
        actions.push(json!({ "remove": { "index": current_index_name, "alias": index_alias } }));
    }

    json!({ "actions": actions })
}
