use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Settings assigned by Elasticsearch on creation. They are rejected when sent back
/// as part of a create index request.
const STORE_ASSIGNED_SETTINGS: [&str; 4] = ["creation_date", "uuid", "provided_name", "version"];

/// Locations of the analysis filter container, in lookup order. Mappings read from an
/// index nest settings under `index`, hand written mapping files usually don't.
const FILTER_CONTAINERS: [&str; 2] = ["/index/analysis/filter", "/analysis/filter"];

/// Creation payload of an index: `settings` and `mappings`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub settings: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub mappings: Value,
}

impl Mapping {
    pub fn new(settings: Value, mappings: Value) -> Self {
        Mapping { settings, mappings }
    }

    /// Removes `creation_date`, `uuid`, `provided_name` and `version` from the index
    /// settings, both in nested (`index.uuid`) and flat (`"index.uuid"`) form.
    pub fn strip_store_assigned_settings(&mut self) {
        if let Some(index) = self.settings.get_mut("index").and_then(Value::as_object_mut) {
            for key in STORE_ASSIGNED_SETTINGS {
                index.remove(key);
            }
        }

        if let Some(settings) = self.settings.as_object_mut() {
            settings.retain(|name, _| !is_flat_store_assigned_setting(name));
        }
    }

    pub fn analysis_filters(&self) -> Option<&Map<String, Value>> {
        let pointer = self.filter_container()?;
        self.settings.pointer(pointer)?.as_object()
    }

    pub fn analysis_filters_mut(&mut self) -> Option<&mut Map<String, Value>> {
        let pointer = self.filter_container()?;
        self.settings.pointer_mut(pointer)?.as_object_mut()
    }

    fn filter_container(&self) -> Option<&'static str> {
        FILTER_CONTAINERS
            .into_iter()
            .find(|pointer| self.settings.pointer(pointer).is_some_and(Value::is_object))
    }
}

fn is_flat_store_assigned_setting(name: &str) -> bool {
    let Some(name) = name.strip_prefix("index.") else {
        return false;
    };
    STORE_ASSIGNED_SETTINGS.iter().any(|key| {
        name.strip_prefix(key)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}
