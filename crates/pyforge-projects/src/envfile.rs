//! `.env` file generation.
//!
//! Template-declared variables are written one `KEY=value` per line.
//! Sensitive-looking keys that still carry a known placeholder value get a
//! freshly generated random secret instead of the placeholder.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use rand::Rng;

use crate::error::Result;

const ENV_HEADER: &str = "# Environment variables for the project";

/// Placeholder values that must never survive into a generated file
const SECRET_PLACEHOLDERS: &[&str] = &[
    "your-secret-key-here",
    "django-insecure-change-me",
    "django-insecure-change-me-in-production",
];

const SECRET_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Length of generated secret values
pub const SECRET_LENGTH: usize = 50;

/// Write `<project>/.env` from the template's variable map
pub fn write_env_file(
    project_path: &Utf8Path,
    env_vars: &BTreeMap<String, String>,
) -> Result<Utf8PathBuf> {
    let env_path = project_path.join(".env");
    std::fs::write(&env_path, render_env(env_vars))?;
    Ok(env_path)
}

/// Render the file body. Split from the write for testability.
pub fn render_env(env_vars: &BTreeMap<String, String>) -> String {
    let mut lines = vec![ENV_HEADER.to_string(), String::new()];

    for (key, value) in env_vars {
        let value = if is_sensitive(key) && SECRET_PLACEHOLDERS.contains(&value.as_str()) {
            generate_secret(SECRET_LENGTH)
        } else {
            value.clone()
        };
        lines.push(format!("{key}={value}"));
    }

    lines.join("\n") + "\n"
}

/// Keys that look like they hold credentials
fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("secret") || key.contains("key")
}

/// Random secret over letters, digits, and a handful of symbols
pub fn generate_secret(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let index = rng.random_range(0..SECRET_CHARSET.len());
            SECRET_CHARSET[index] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_values_pass_through() {
        let body = render_env(&env_vars(&[("ENVIRONMENT", "development"), ("PORT", "8000")]));
        assert!(body.starts_with(ENV_HEADER));
        assert!(body.contains("ENVIRONMENT=development\n"));
        assert!(body.contains("PORT=8000\n"));
    }

    #[test]
    fn test_secret_placeholder_is_replaced() {
        let body = render_env(&env_vars(&[("SECRET_KEY", "your-secret-key-here")]));

        assert!(!body.contains("your-secret-key-here"));

        let value = body
            .lines()
            .find_map(|line| line.strip_prefix("SECRET_KEY="))
            .unwrap();
        assert_eq!(value.len(), SECRET_LENGTH);
        assert!(value
            .bytes()
            .all(|byte| SECRET_CHARSET.contains(&byte)));
    }

    #[test]
    fn test_sensitive_key_with_real_value_is_kept() {
        // Only known placeholders are replaced; a deliberate value stays
        let body = render_env(&env_vars(&[("API_KEY", "abc123")]));
        assert!(body.contains("API_KEY=abc123\n"));
    }

    #[test]
    fn test_non_sensitive_placeholder_is_kept() {
        let body = render_env(&env_vars(&[("GREETING", "your-secret-key-here")]));
        assert!(body.contains("GREETING=your-secret-key-here\n"));
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(generate_secret(32), generate_secret(32));
    }

    #[test]
    fn test_write_env_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let project = camino::Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

        let path = write_env_file(&project, &env_vars(&[("ENVIRONMENT", "development")])).unwrap();

        assert_eq!(path, project.join(".env"));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("ENVIRONMENT=development"));
    }
}
