//! Template rendering with `{placeholder}` substitution.
//!
//! Deliberately plain string replacement over a fixed parameter set; any
//! other braces in template bodies pass through untouched, so Python
//! source needs no escaping.

use pyforge_core::types::{snake_name, title_name};

/// The fixed parameter set every template file is rendered against
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub project_name: String,
    pub project_name_snake: String,
    pub project_name_title: String,
    pub description: String,
    pub python_version: String,
}

impl TemplateVars {
    /// Derive all naming forms from the raw project name
    pub fn new(project_name: &str, description: &str, python_version: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            project_name_snake: snake_name(project_name),
            project_name_title: title_name(project_name),
            description: description.to_string(),
            python_version: python_version.to_string(),
        }
    }
}

/// Substitute every known placeholder in a template body
pub fn render_string(template: &str, vars: &TemplateVars) -> String {
    template
        .replace("{project_name}", &vars.project_name)
        .replace("{project_name_snake}", &vars.project_name_snake)
        .replace("{project_name_title}", &vars.project_name_title)
        .replace("{description}", &vars.description)
        .replace("{python_version}", &vars.python_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars::new("My Project", "A demo project", "3.11.7")
    }

    #[test]
    fn test_name_forms() {
        let vars = vars();
        assert_eq!(vars.project_name, "My Project");
        assert_eq!(vars.project_name_snake, "my_project");
        assert_eq!(vars.project_name_title, "My Project");
    }

    #[test]
    fn test_render_substitutes_all_parameters() {
        let rendered = render_string(
            "{project_name}|{project_name_snake}|{project_name_title}|{description}|{python_version}",
            &vars(),
        );
        assert_eq!(
            rendered,
            "My Project|my_project|My Project|A demo project|3.11.7"
        );
    }

    #[test]
    fn test_render_leaves_unknown_braces_alone() {
        let rendered = render_string(
            r#"print("Hello, {project_name}!")  # dict: {"key": 1}"#,
            &vars(),
        );
        assert_eq!(
            rendered,
            r#"print("Hello, My Project!")  # dict: {"key": 1}"#
        );
    }

    #[test]
    fn test_render_hyphenated_name() {
        let vars = TemplateVars::new("data-pipeline", "etl", "3.12.1");
        let rendered = render_string("# {project_name_title}\nmodule {project_name_snake}", &vars);
        assert!(rendered.contains("# Data Pipeline"));
        assert!(rendered.contains("module data_pipeline"));
    }
}
