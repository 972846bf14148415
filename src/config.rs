use crate::elastic::error::{ElasticError, ElasticResult};
use crate::elastic::upgrade_options::UpgradeOptions;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

/// Settings of the `feeder_upgrade` binary, read from the environment (and `.env`).
///
/// | variable | meaning |
/// |---|---|
/// | `ELASTICSEARCH_URL` | cluster address, `http://localhost:9200` by default |
/// | `FEEDER_INDEX` | base name of the index to upgrade, required |
/// | `FEEDER_PREFIX` | alias prefix, `feeder-` by default |
/// | `FEEDER_CURRENT_VERSION` | version the alias points to, looked up when unset |
/// | `FEEDER_TARGET_VERSION` | version to create, highest existing + 1 when unset |
/// | `FEEDER_DEFINITIONS_DIR` | directory with `<index>.json` and `<index>.synonyms.json` |
/// | `FEEDER_USE_EXISTING_SYNONYMS` | copy synonyms of the current index |
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub elasticsearch_url: String,
    pub index_name: String,
    pub definitions_directory: Option<PathBuf>,
    pub options: UpgradeOptions,
}

impl Config {
    pub fn from_env() -> ElasticResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ElasticResult<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let index_name = var("FEEDER_INDEX")
            .ok_or_else(|| ElasticError::configuration("FEEDER_INDEX must be set"))?;

        let mut options = UpgradeOptions::default();
        if let Some(prefix) = var("FEEDER_PREFIX") {
            options.prefix = prefix;
        }
        options.current_version = var("FEEDER_CURRENT_VERSION")
            .map(|value| parse_version("FEEDER_CURRENT_VERSION", &value))
            .transpose()?;
        options.target_version = var("FEEDER_TARGET_VERSION")
            .map(|value| parse_version("FEEDER_TARGET_VERSION", &value))
            .transpose()?;
        options.use_existing_synonyms = var("FEEDER_USE_EXISTING_SYNONYMS")
            .map(|value| parse_flag("FEEDER_USE_EXISTING_SYNONYMS", &value))
            .transpose()?
            .unwrap_or(false);

        Ok(Config {
            elasticsearch_url: var("ELASTICSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_ELASTICSEARCH_URL.to_string()),
            index_name,
            definitions_directory: var("FEEDER_DEFINITIONS_DIR").map(PathBuf::from),
            options,
        })
    }
}

fn parse_version(key: &str, value: &str) -> ElasticResult<u32> {
    value.trim().parse().map_err(|_| {
        ElasticError::configuration(format!("{key} must be a version number, got \"{value}\""))
    })
}

fn parse_flag(key: &str, value: &str) -> ElasticResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ElasticError::configuration(format!(
            "{key} must be true or false, got \"{value}\""
        ))),
    }
}
