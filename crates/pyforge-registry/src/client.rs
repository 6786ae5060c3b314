//! Registry HTTP client.
//!
//! Talks to PyPI's per-package JSON endpoints. Every network path has a
//! request timeout and degrades gracefully: search falls back to the
//! curated table, version listing falls back to `latest`, and validation
//! is permissive on transport failures.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::known;

const DEFAULT_BASE_URL: &str = "https://pypi.org/pypi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest description carried in search results
const DESCRIPTION_LIMIT: usize = 100;

/// Package metadata surfaced by search and info lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: Option<String>,
}

/// PyPI metadata client with an in-memory search cache
pub struct RegistryClient {
    base_url: String,
    http: reqwest::Client,
    /// query string -> results; the only cache in the system
    search_cache: Mutex<HashMap<String, Vec<PackageSummary>>>,
}

impl RegistryClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternate registry endpoint (tests, mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("HTTP client construction cannot fail with static options");
        Self {
            base_url: base_url.into(),
            http,
            search_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Free-text search: curated table first, then one live lookup for the
    /// literal query, capped to `limit` overall.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<PackageSummary> {
        let query = query.trim().to_lowercase();
        if query.len() < 2 || limit == 0 {
            return Vec::new();
        }

        if let Ok(cache) = self.search_cache.lock() {
            if let Some(results) = cache.get(&query) {
                return results.clone();
            }
        }

        let mut results = known::match_known(&query, limit);

        if results.len() < limit {
            if let Some(live) = self.info(&query).await {
                let already_present = results
                    .iter()
                    .any(|result| result.name.eq_ignore_ascii_case(&live.name));
                if !already_present {
                    results.insert(0, live);
                    results.truncate(limit);
                }
            }
        }

        if let Ok(mut cache) = self.search_cache.lock() {
            cache.insert(query, results.clone());
        }
        results
    }

    /// Live metadata for one package. None when absent or unreachable.
    pub async fn info(&self, package: &str) -> Option<PackageSummary> {
        let value = match self.fetch_metadata(package).await {
            Ok(value) => value,
            Err(err) => {
                debug!("registry lookup for '{package}' failed: {err}");
                return None;
            }
        };

        let info = value.get("info")?;
        let description = info
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or("No description available");
        Some(PackageSummary {
            name: info
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(package)
                .to_string(),
            version: info
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            description: description.chars().take(DESCRIPTION_LIMIT).collect(),
            author: info
                .get("author")
                .and_then(Value::as_str)
                .filter(|author| !author.is_empty())
                .map(str::to_string),
        })
    }

    /// Published versions, newest first by plain string ordering, capped
    /// to `limit`. Versions without downloadable files are excluded.
    /// An unreachable registry degrades to `["latest"]`.
    ///
    /// String ordering mis-sorts pairs like 3.9/3.10; accepted and
    /// documented, see DESIGN.md.
    pub async fn versions(&self, package: &str, limit: usize) -> Vec<String> {
        let value = match self.fetch_metadata(package).await {
            Ok(value) => value,
            Err(err) => {
                warn!("could not fetch versions for {package}: {err}");
                return vec!["latest".to_string()];
            }
        };

        let mut versions = collect_release_versions(&value);
        versions.truncate(limit);
        versions
    }

    /// Partition identifiers into (valid, invalid) by registry presence.
    ///
    /// Version qualifiers are stripped before the check. A failed lookup
    /// that is not a definitive miss counts as valid: false positives are
    /// cheaper than blocking on registry flakiness, and the installer
    /// reports the real error anyway.
    pub async fn validate(&self, identifiers: &[String]) -> (Vec<String>, Vec<String>) {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for identifier in identifiers {
            let name = strip_version_qualifier(identifier);
            match self.fetch_metadata(name).await {
                Ok(_) => valid.push(identifier.clone()),
                Err(err) if err.is_definitive_miss() => invalid.push(identifier.clone()),
                Err(err) => {
                    debug!("registry unavailable for '{name}' ({err}); assuming valid");
                    valid.push(identifier.clone());
                }
            }
        }

        (valid, invalid)
    }

    async fn fetch_metadata(&self, package: &str) -> Result<Value> {
        let url = format!("{}/{}/json", self.base_url, package);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                package: package.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Unavailable {
                package: package.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Versions that have at least one downloadable file, newest first by
/// plain string comparison
fn collect_release_versions(metadata: &Value) -> Vec<String> {
    let mut versions: Vec<String> = metadata
        .get("releases")
        .and_then(Value::as_object)
        .map(|releases| {
            releases
                .iter()
                .filter(|(_, files)| files.as_array().is_some_and(|files| !files.is_empty()))
                .map(|(version, _)| version.clone())
                .collect()
        })
        .unwrap_or_default();
    versions.sort_by(|a, b| b.cmp(a));
    versions
}

/// Drop a version qualifier suffix (`==`, `>=`, `<=`, `~=`, `!=`) from a
/// requirement identifier
fn strip_version_qualifier(identifier: &str) -> &str {
    const QUALIFIERS: &[&str] = &["==", ">=", "<=", "~=", "!="];
    let mut name = identifier;
    for qualifier in QUALIFIERS {
        if let Some(index) = name.find(qualifier) {
            name = &name[..index];
        }
    }
    name.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_version_qualifier() {
        assert_eq!(strip_version_qualifier("requests==2.31.0"), "requests");
        assert_eq!(strip_version_qualifier("numpy>=1.20"), "numpy");
        assert_eq!(strip_version_qualifier("pandas~=2.1"), "pandas");
        assert_eq!(strip_version_qualifier("flask!=3.0.0"), "flask");
        assert_eq!(strip_version_qualifier("plain"), "plain");
    }

    #[test]
    fn test_release_filtering_and_ordering() {
        // Same JSON shape PyPI returns
        let value: Value = serde_json::from_str(
            r#"{
                "releases": {
                    "1.0.0": [{"filename": "a.whl"}],
                    "1.2.0": [{"filename": "b.whl"}],
                    "1.1.0": [],
                    "0.9.0": [{"filename": "c.tar.gz"}]
                }
            }"#,
        )
        .unwrap();

        // 1.1.0 has no files and is dropped; order is descending lexical
        assert_eq!(
            collect_release_versions(&value),
            ["1.2.0", "1.0.0", "0.9.0"]
        );
    }

    #[test]
    fn test_lexical_ordering_quirk_is_preserved() {
        // Plain string comparison puts 3.9 after 3.10; accepted limitation
        let value: Value = serde_json::from_str(
            r#"{
                "releases": {
                    "3.9": [{"filename": "a.whl"}],
                    "3.10": [{"filename": "b.whl"}]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(collect_release_versions(&value), ["3.9", "3.10"]);
    }

    #[tokio::test]
    async fn test_short_queries_return_nothing() {
        let client = RegistryClient::with_base_url("http://127.0.0.1:1/pypi");
        assert!(client.search("a", 10).await.is_empty());
        assert!(client.search("  ", 10).await.is_empty());
    }
}
