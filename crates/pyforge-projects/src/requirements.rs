//! Requirements file generation.
//!
//! Dependencies are de-duplicated and written sorted, one per line, with a
//! trailing newline. Duplicates between a template's base list and the
//! user's additional packages collapse here, at write time.

use std::collections::BTreeSet;

use camino::Utf8Path;

use crate::error::Result;

/// Render the file body: sorted, de-duplicated, newline-joined
pub fn render_requirements<'a, I>(dependencies: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let unique: BTreeSet<&str> = dependencies.into_iter().map(String::as_str).collect();
    let mut body = unique.into_iter().collect::<Vec<_>>().join("\n");
    body.push('\n');
    body
}

/// Write a requirements file at `path`
pub fn write_requirements(path: &Utf8Path, dependencies: &[String]) -> Result<()> {
    std::fs::write(path, render_requirements(dependencies))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        // Template declares a and b, the user adds b and c
        let mut combined = deps(&["a", "b"]);
        combined.extend(deps(&["b", "c"]));

        assert_eq!(render_requirements(&combined), "a\nb\nc\n");
    }

    #[test]
    fn test_single_dependency() {
        assert_eq!(render_requirements(&deps(&["requests"])), "requests\n");
    }

    #[test]
    fn test_qualified_identifiers_are_kept_verbatim() {
        let body = render_requirements(&deps(&["uvicorn[standard]", "fastapi==0.104.1"]));
        assert!(body.contains("uvicorn[standard]\n"));
        assert!(body.contains("fastapi==0.104.1\n"));
    }

    #[test]
    fn test_write_requirements() {
        let temp = tempfile::TempDir::new().unwrap();
        let path =
            camino::Utf8PathBuf::from_path_buf(temp.path().join("requirements.txt")).unwrap();

        write_requirements(&path, &deps(&["b", "a", "b"])).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\nb\n");
    }
}
