use super::error::{ElasticError, ElasticResult};
use super::mapping::Mapping;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

pub const SYNONYMS_FILTER: &str = "synonyms";

/// Accepted names of the pre-processing synonym filter, in lookup order.
pub const PRE_SYNONYMS_FILTERS: [&str; 3] =
    ["pre_synonyms", "pre_synonyms_search", "pre_synonyms_index"];

/// Inline synonym lists for the `synonyms` and `pre_synonyms*` filters.
/// A missing list leaves the corresponding filters as they are.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synonyms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(default, alias = "preFile", skip_serializing_if = "Option::is_none")]
    pub pre_synonyms: Option<Vec<String>>,
}

impl Synonyms {
    pub fn new(synonyms: Option<Vec<String>>, pre_synonyms: Option<Vec<String>>) -> Self {
        Synonyms {
            synonyms,
            pre_synonyms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_none() && self.pre_synonyms.is_none()
    }
}

/// Overwrites the inline `synonyms` of the synonym filters the mapping already declares.
///
/// Filters are never created: the `synonyms` filter and at least one of the
/// [`PRE_SYNONYMS_FILTERS`] must exist, carry a `synonyms` property and no
/// `synonyms_path`. Every filter is checked before anything is written, so on error
/// the mapping is left untouched.
pub fn apply_synonyms(mapping: &mut Mapping, synonyms: &Synonyms) -> ElasticResult<()> {
    let empty = Map::new();
    let filters = mapping.analysis_filters().unwrap_or(&empty);

    check_synonym_filter(filters, SYNONYMS_FILTER)?;

    let pre_synonyms_filters: Vec<&'static str> = PRE_SYNONYMS_FILTERS
        .into_iter()
        .filter(|name| is_present(filters.get(*name)))
        .collect();
    if pre_synonyms_filters.is_empty() {
        return Err(ElasticError::schema(format!(
            "No pre_synonyms filter found (expected one of {})",
            PRE_SYNONYMS_FILTERS.join(", ")
        )));
    }
    for name in &pre_synonyms_filters {
        check_synonym_filter(filters, name)?;
    }

    // Checked above, so the container exists whenever there is something to write.
    let Some(filters) = mapping.analysis_filters_mut() else {
        return Ok(());
    };
    if let Some(list) = &synonyms.synonyms {
        set_synonyms(filters, SYNONYMS_FILTER, list);
    }
    if let Some(list) = &synonyms.pre_synonyms {
        for name in pre_synonyms_filters {
            set_synonyms(filters, name, list);
        }
    }

    Ok(())
}

/// Reads the inline lists of the `synonyms` filter and the first declared
/// `pre_synonyms*` filter. `None` when neither carries a list.
pub fn extract_synonyms(mapping: &Mapping) -> Option<Synonyms> {
    let filters = mapping.analysis_filters()?;

    let synonyms = read_synonyms(filters, SYNONYMS_FILTER);
    let pre_synonyms = PRE_SYNONYMS_FILTERS
        .into_iter()
        .find(|name| is_present(filters.get(*name)))
        .and_then(|name| read_synonyms(filters, name));

    let extracted = Synonyms::new(synonyms, pre_synonyms);
    (!extracted.is_empty()).then_some(extracted)
}

fn check_synonym_filter(filters: &Map<String, Value>, name: &str) -> ElasticResult<()> {
    let Some(filter) = filters.get(name).filter(|filter| !filter.is_null()) else {
        return Err(ElasticError::schema(format!("No {name} filter found")));
    };
    if is_present(filter.get("synonyms_path")) {
        return Err(ElasticError::schema(format!(
            "synonyms_path property is not allowed on {name} filter"
        )));
    }
    if !is_present(filter.get("synonyms")) {
        return Err(ElasticError::schema(format!(
            "No synonyms property found on {name} filter"
        )));
    }
    Ok(())
}

fn set_synonyms(filters: &mut Map<String, Value>, name: &str, list: &[String]) {
    if let Some(filter) = filters.get_mut(name).and_then(Value::as_object_mut) {
        filter.insert("synonyms".to_string(), Value::from(list.to_vec()));
    }
}

fn read_synonyms(filters: &Map<String, Value>, name: &str) -> Option<Vec<String>> {
    let value = filters.get(name)?.get("synonyms")?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(list) => Some(list),
        Err(error) => {
            warn!("Ignoring synonyms of filter \"{}\" that are not a list of strings: {}", name, error);
            None
        }
    }
}

fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filters() -> Value {
        json!({
            "synonyms": { "synonyms": [""] },
            "pre_synonyms": { "synonyms": [""] },
            "other_filter": {}
        })
    }

    /// Mapping as written in a definition file.
    fn file_mapping() -> Mapping {
        Mapping::new(json!({ "analysis": { "filter": filters() } }), Value::Null)
    }

    /// Mapping as read back from an index.
    fn index_mapping() -> Mapping {
        Mapping::new(
            json!({ "index": { "analysis": { "filter": filters() } } }),
            Value::Null,
        )
    }

    fn input() -> Synonyms {
        Synonyms::new(
            Some(vec!["some,synonyms".to_string()]),
            Some(vec!["pre_some,pre_synonyms".to_string()]),
        )
    }

    fn set(mapping: &mut Mapping, filter: &str, key: Option<&str>, value: Value) {
        let filters = mapping.analysis_filters_mut().unwrap();
        match key {
            Some(key) => {
                filters[filter][key] = value;
            }
            None => {
                filters.insert(filter.to_string(), value);
            }
        }
    }

    fn schema_message(result: ElasticResult<()>) -> String {
        match result {
            Err(ElasticError::Schema(message)) => message,
            other => panic!("expected a schema error, got {other:?}"),
        }
    }

    #[test]
    fn fails_without_synonyms_filter() {
        let mut mapping = file_mapping();
        set(&mut mapping, "synonyms", None, Value::Null);

        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert_eq!(message, "No synonyms filter found");
    }

    #[test]
    fn fails_without_any_pre_synonyms_filter() {
        let mut mapping = file_mapping();
        set(&mut mapping, "pre_synonyms", None, Value::Null);

        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert!(message.starts_with("No pre_synonyms filter found"), "{message}");
        for name in PRE_SYNONYMS_FILTERS {
            assert!(message.contains(name), "{message}");
        }
    }

    #[test]
    fn fails_without_filter_container() {
        let mut mapping = Mapping::new(json!({ "number_of_shards": 1 }), Value::Null);

        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert_eq!(message, "No synonyms filter found");
    }

    #[test]
    fn rejects_synonyms_path() {
        let mut mapping = file_mapping();
        set(&mut mapping, "synonyms", Some("synonyms_path"), json!("../some_synonym_file.txt"));
        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert_eq!(message, "synonyms_path property is not allowed on synonyms filter");

        let mut mapping = file_mapping();
        set(&mut mapping, "pre_synonyms", Some("synonyms_path"), json!("../some_synonym_file.txt"));
        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert_eq!(message, "synonyms_path property is not allowed on pre_synonyms filter");
    }

    #[test]
    fn requires_existing_synonyms_property() {
        let mut mapping = file_mapping();
        set(&mut mapping, "synonyms", Some("synonyms"), Value::Null);
        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert_eq!(message, "No synonyms property found on synonyms filter");

        let mut mapping = file_mapping();
        set(&mut mapping, "pre_synonyms", Some("synonyms"), Value::Null);
        let message = schema_message(apply_synonyms(&mut mapping, &input()));
        assert_eq!(message, "No synonyms property found on pre_synonyms filter");
    }

    #[test]
    fn leaves_mapping_untouched_on_error() {
        let mut mapping = file_mapping();
        set(&mut mapping, "pre_synonyms", Some("synonyms_path"), json!("file.txt"));
        let before = mapping.clone();

        assert!(apply_synonyms(&mut mapping, &input()).is_err());
        assert_eq!(mapping, before);
    }

    #[test]
    fn sets_synonyms_on_file_mapping() {
        let mut mapping = file_mapping();
        apply_synonyms(&mut mapping, &input()).unwrap();

        assert_eq!(
            mapping.settings["analysis"]["filter"],
            json!({
                "synonyms": { "synonyms": ["some,synonyms"] },
                "pre_synonyms": { "synonyms": ["pre_some,pre_synonyms"] },
                "other_filter": {}
            })
        );
    }

    #[test]
    fn sets_synonyms_on_index_mapping() {
        let mut mapping = index_mapping();
        apply_synonyms(&mut mapping, &input()).unwrap();

        assert_eq!(
            mapping.settings["index"]["analysis"]["filter"],
            json!({
                "synonyms": { "synonyms": ["some,synonyms"] },
                "pre_synonyms": { "synonyms": ["pre_some,pre_synonyms"] },
                "other_filter": {}
            })
        );
    }

    #[test]
    fn sets_every_pre_synonyms_variant() {
        let mut mapping = Mapping::new(
            json!({
                "analysis": {
                    "filter": {
                        "synonyms": { "synonyms": [] },
                        "pre_synonyms_search": { "synonyms": ["x"] },
                        "pre_synonyms_index": { "synonyms": ["y"] }
                    }
                }
            }),
            Value::Null,
        );
        apply_synonyms(&mut mapping, &input()).unwrap();

        let filters = mapping.analysis_filters().unwrap();
        assert_eq!(filters["pre_synonyms_search"]["synonyms"], json!(["pre_some,pre_synonyms"]));
        assert_eq!(filters["pre_synonyms_index"]["synonyms"], json!(["pre_some,pre_synonyms"]));
        assert!(!filters.contains_key("pre_synonyms"));
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut mapping = file_mapping();
        apply_synonyms(&mut mapping, &Synonyms::default()).unwrap();
        assert_eq!(mapping, file_mapping());

        let mut mapping = index_mapping();
        apply_synonyms(&mut mapping, &Synonyms::default()).unwrap();
        assert_eq!(mapping, index_mapping());
    }

    #[test]
    fn partial_input_updates_one_filter() {
        let mut mapping = file_mapping();
        let synonyms = Synonyms::new(None, Some(vec!["pre".to_string()]));
        apply_synonyms(&mut mapping, &synonyms).unwrap();

        let filters = mapping.analysis_filters().unwrap();
        assert_eq!(filters["synonyms"]["synonyms"], json!([""]));
        assert_eq!(filters["pre_synonyms"]["synonyms"], json!(["pre"]));
    }

    #[test]
    fn extracts_existing_synonyms() {
        let mapping = Mapping::new(
            json!({
                "index": {
                    "analysis": {
                        "filter": {
                            "synonyms": { "synonyms": ["some,synonyms"] },
                            "pre_synonyms_index": { "synonyms": ["pre_some,pre_synonyms"] }
                        }
                    }
                }
            }),
            Value::Null,
        );

        assert_eq!(extract_synonyms(&mapping), Some(input()));
    }

    #[test]
    fn extracts_nothing_without_lists() {
        assert_eq!(extract_synonyms(&Mapping::default()), None);

        let mapping = Mapping::new(
            json!({ "analysis": { "filter": { "other_filter": {} } } }),
            Value::Null,
        );
        assert_eq!(extract_synonyms(&mapping), None);
    }

    #[test]
    fn accepts_legacy_pre_file_field() {
        let synonyms: Synonyms =
            serde_json::from_value(json!({ "synonyms": ["a"], "preFile": ["b"] })).unwrap();

        assert_eq!(
            synonyms,
            Synonyms::new(Some(vec!["a".to_string()]), Some(vec!["b".to_string()]))
        );
        assert_eq!(
            serde_json::to_value(&synonyms).unwrap(),
            json!({ "synonyms": ["a"], "preSynonyms": ["b"] })
        );
    }
}
