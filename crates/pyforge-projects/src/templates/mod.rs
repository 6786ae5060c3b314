//! Project template catalog.
//!
//! Templates are static data compiled into the binary from
//! `templates/project-templates.yaml` and loaded once per process.

pub mod render;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;

pub use render::{render_string, TemplateVars};

/// A parameterized project blueprint
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectTemplate {
    pub description: String,
    /// Base packages the generated project depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Relative file path -> parameterized text body
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// Environment variable name -> default or placeholder value
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
}

/// The full catalog as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateCatalog {
    pub version: String,
    templates: BTreeMap<String, ProjectTemplate>,
}

impl TemplateCatalog {
    /// Load the catalog embedded at compile time
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(include_str!("../../templates/project-templates.yaml"))
    }

    /// Parse a catalog from YAML text (tests, alternate catalogs)
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Look up a template by id
    pub fn get(&self, name: &str) -> Option<&ProjectTemplate> {
        self.templates.get(name)
    }

    /// All template ids, sorted
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Iterate (id, template) pairs, sorted by id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProjectTemplate)> {
        self.templates
            .iter()
            .map(|(name, template)| (name.as_str(), template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = TemplateCatalog::embedded().unwrap();
        assert!(catalog.get("basic").is_some());
        assert!(catalog.get("fastapi").is_some());
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn test_basic_template_contents() {
        let catalog = TemplateCatalog::embedded().unwrap();
        let basic = catalog.get("basic").unwrap();

        assert!(basic.dependencies.is_empty());
        assert!(basic.files.contains_key("main.py"));
        assert!(basic.files.contains_key("README.md"));
        assert_eq!(
            basic.env_vars.get("ENVIRONMENT").map(String::as_str),
            Some("development")
        );
    }

    #[test]
    fn test_fastapi_template_dependencies() {
        let catalog = TemplateCatalog::embedded().unwrap();
        let fastapi = catalog.get("fastapi").unwrap();

        assert!(fastapi.dependencies.contains(&"fastapi".to_string()));
        assert!(fastapi
            .dependencies
            .contains(&"uvicorn[standard]".to_string()));
    }

    #[test]
    fn test_from_yaml_defaults() {
        let catalog = TemplateCatalog::from_yaml(
            r#"
version: "1.0"
templates:
  minimal:
    description: Nothing but a description
"#,
        )
        .unwrap();

        let minimal = catalog.get("minimal").unwrap();
        assert!(minimal.dependencies.is_empty());
        assert!(minimal.files.is_empty());
        assert!(minimal.env_vars.is_empty());
    }

    #[test]
    fn test_names_are_sorted() {
        let catalog = TemplateCatalog::embedded().unwrap();
        let names = catalog.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
