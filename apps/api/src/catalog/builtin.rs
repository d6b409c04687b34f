use crate::catalog::{parse_catalog_str, Catalog, CatalogError};

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// Loads the catalog and role templates compiled into the binary.
pub fn load_builtin() -> Result<Catalog, CatalogError> {
    parse_catalog_str(BUILTIN_CATALOG_JSON)
}
