//! Curated table of widely used packages.
//!
//! Search consults this table first so common queries answer instantly and
//! offline; the live registry lookup only supplements it.

use crate::client::PackageSummary;

pub(crate) struct KnownPackage {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

pub(crate) const KNOWN_PACKAGES: &[KnownPackage] = &[
    // Web frameworks
    KnownPackage {
        name: "fastapi",
        version: "0.104.1",
        description: "FastAPI framework, high performance, easy to learn",
        category: "web",
    },
    KnownPackage {
        name: "flask",
        version: "3.0.0",
        description: "A simple framework for building complex web applications",
        category: "web",
    },
    KnownPackage {
        name: "django",
        version: "4.2.7",
        description: "High-level Python web framework",
        category: "web",
    },
    // HTTP clients
    KnownPackage {
        name: "requests",
        version: "2.31.0",
        description: "Python HTTP for Humans",
        category: "http",
    },
    KnownPackage {
        name: "httpx",
        version: "0.25.2",
        description: "Next generation HTTP client",
        category: "http",
    },
    KnownPackage {
        name: "aiohttp",
        version: "3.9.1",
        description: "Async HTTP client/server framework",
        category: "http",
    },
    // Data science
    KnownPackage {
        name: "pandas",
        version: "2.1.4",
        description: "Powerful data structures for data analysis",
        category: "data",
    },
    KnownPackage {
        name: "numpy",
        version: "1.26.2",
        description: "Fundamental package for array computing",
        category: "data",
    },
    KnownPackage {
        name: "matplotlib",
        version: "3.8.2",
        description: "Comprehensive library for creating visualizations",
        category: "data",
    },
    KnownPackage {
        name: "seaborn",
        version: "0.13.0",
        description: "Statistical data visualization library",
        category: "data",
    },
    KnownPackage {
        name: "scikit-learn",
        version: "1.3.2",
        description: "Machine learning library",
        category: "ml",
    },
    // Databases
    KnownPackage {
        name: "sqlalchemy",
        version: "2.0.23",
        description: "SQL toolkit and ORM",
        category: "database",
    },
    KnownPackage {
        name: "pymongo",
        version: "4.6.0",
        description: "MongoDB driver",
        category: "database",
    },
    KnownPackage {
        name: "redis",
        version: "5.0.1",
        description: "Redis client library",
        category: "database",
    },
    // Testing
    KnownPackage {
        name: "pytest",
        version: "7.4.3",
        description: "Testing framework",
        category: "testing",
    },
    // CLI
    KnownPackage {
        name: "typer",
        version: "0.9.0",
        description: "Modern library for building CLI applications",
        category: "cli",
    },
    KnownPackage {
        name: "click",
        version: "8.1.7",
        description: "Command line interface creation kit",
        category: "cli",
    },
    KnownPackage {
        name: "rich",
        version: "13.7.0",
        description: "Library for rich text and beautiful formatting",
        category: "cli",
    },
    // Utilities
    KnownPackage {
        name: "python-dotenv",
        version: "1.0.0",
        description: "Environment variable loader",
        category: "config",
    },
    KnownPackage {
        name: "pydantic",
        version: "2.5.1",
        description: "Data validation using Python type annotations",
        category: "validation",
    },
    KnownPackage {
        name: "loguru",
        version: "0.7.2",
        description: "Logging library",
        category: "logging",
    },
];

/// Staged matching against the curated table. Earlier stages take
/// priority for ordering; each stage appends only unseen names. The
/// result never exceeds `limit`.
pub(crate) fn match_known(query: &str, limit: usize) -> Vec<PackageSummary> {
    let mut matched: Vec<&KnownPackage> = Vec::new();

    // Stage 1: exact name match
    if let Some(package) = KNOWN_PACKAGES.iter().find(|p| p.name == query) {
        matched.push(package);
    }

    // Stage 2: query is a substring of the name
    for package in KNOWN_PACKAGES {
        if package.name.contains(query) && !matched.iter().any(|m| m.name == package.name) {
            matched.push(package);
        }
    }

    // Stage 3: token overlap with description or category
    let words: Vec<&str> = query.split_whitespace().collect();
    for package in KNOWN_PACKAGES {
        if matched.iter().any(|m| m.name == package.name) {
            continue;
        }
        let description = package.description.to_lowercase();
        let hit = words
            .iter()
            .any(|word| description.contains(word) || package.category.contains(word))
            || description.contains(query)
            || package.category.contains(query);
        if hit {
            matched.push(package);
        }
    }

    matched.truncate(limit);
    matched
        .into_iter()
        .map(|package| PackageSummary {
            name: package.name.to_string(),
            version: package.version.to_string(),
            description: package.description.to_string(),
            author: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_comes_first() {
        let results = match_known("flask", 10);
        assert_eq!(results[0].name, "flask");
    }

    #[test]
    fn test_substring_match() {
        let results = match_known("dot", 10);
        assert!(results.iter().any(|r| r.name == "python-dotenv"));
    }

    #[test]
    fn test_category_match() {
        let results = match_known("web", 10);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"fastapi"));
        assert!(names.contains(&"flask"));
        assert!(names.contains(&"django"));
    }

    #[test]
    fn test_description_token_match() {
        let results = match_known("http humans", 10);
        assert!(results.iter().any(|r| r.name == "requests"));
    }

    #[test]
    fn test_no_duplicates_across_stages() {
        // "pytest" matches exactly AND by substring AND by category token
        let results = match_known("pytest", 10);
        let count = results.iter().filter(|r| r.name == "pytest").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_limit_is_respected() {
        let results = match_known("data", 2);
        assert!(results.len() <= 2);
    }

    #[test]
    fn test_unknown_query_matches_nothing() {
        assert!(match_known("zzqqxx", 10).is_empty());
    }
}
