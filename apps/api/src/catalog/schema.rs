use serde::Deserialize;

/// On-disk shape of a skill catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDef {
    /// Categories in declaration order.
    pub categories: Vec<CategoryDef>,
    #[serde(default)]
    pub roles: Vec<RoleTemplateDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleTemplateDef {
    pub title: String,
    pub must_have: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}
