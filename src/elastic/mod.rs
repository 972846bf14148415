pub mod error;
pub mod index_definition;
pub mod index_definition_loader;
pub mod index_facade;
pub mod index_repository;
pub mod index_store;
pub mod mapping;
pub mod synonyms;
pub mod upgrade_options;

#[cfg(test)]
pub(crate) mod test_support;
