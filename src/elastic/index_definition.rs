/// Prefix of the alias consumers query, unless the caller picks another one.
pub const DEFAULT_PREFIX: &str = "feeder-";

const VERSION_SEPARATOR: &str = "-v";

#[derive(Clone, Debug, PartialEq)]
pub struct IndexDefinition {
    pub(crate) index_name: String,
    pub(crate) index_prefix: String,
}

impl IndexDefinition {
    pub fn new(index_name: impl Into<String>, index_prefix: impl Into<String>) -> Self {
        IndexDefinition {
            index_name: index_name.into(),
            index_prefix: index_prefix.into(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn get_index_alias(&self) -> String {
        format!("{}{}", self.index_prefix, self.index_name)
    }

    pub fn get_versioned_index_name(&self, version: u32) -> String {
        format!("{}{}{}", self.index_name, VERSION_SEPARATOR, version)
    }

    /// Wildcard matching every versioned index of this definition.
    pub fn get_versioned_index_pattern(&self) -> String {
        format!("{}{}*", self.index_name, VERSION_SEPARATOR)
    }

    /// Version of `index_name` if it is exactly `<index_name>-v<digits>`.
    pub fn parse_own_version(&self, index_name: &str) -> Option<u32> {
        index_name
            .strip_prefix(self.index_name.as_str())?
            .strip_prefix(VERSION_SEPARATOR)
            .and_then(parse_digits)
    }
}

/// Trailing `-v<digits>` version of any index name.
pub fn parse_index_version(index_name: &str) -> Option<u32> {
    let (_, suffix) = index_name.rsplit_once(VERSION_SEPARATOR)?;
    parse_digits(suffix)
}

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
