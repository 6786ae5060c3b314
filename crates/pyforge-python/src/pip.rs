//! The pip front-end.
//!
//! A [`PipClient`] is bound to a [`PackageScope`] and turns batch
//! operations into one pip invocation per package, each with its own
//! timeout and its own success/failure record. One package failing never
//! aborts the batch.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use pyforge_core::reporter::Reporter;
use pyforge_core::types::{InstallOptions, InstallReport, InstalledPackage, PackageScope};

use crate::error::{Error, Result};
use crate::process;

/// Time limit applied to each individual install invocation
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

#[cfg(windows)]
const GLOBAL_PYTHON: &str = "python";
#[cfg(not(windows))]
const GLOBAL_PYTHON: &str = "python3";

/// Accepted git identifier shapes. Anything else is rejected before pip
/// ever sees it.
static GIT_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https://github\.com/[\w.-]+/[\w.-]+(?:\.git)?$",
        r"^https://gitlab\.com/[\w.-]+/[\w.-]+(?:\.git)?$",
        r"^https://bitbucket\.org/[\w.-]+/[\w.-]+(?:\.git)?$",
        r"^git@[\w.-]+:[\w.-]+/[\w.-]+(?:\.git)?$",
        r"^ssh://git@[\w.-]+/[\w.-]+/[\w.-]+(?:\.git)?$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("git url pattern is valid"))
    .collect()
});

/// Whether a git repository URL matches the host whitelist
pub fn is_valid_git_url(url: &str) -> bool {
    GIT_URL_PATTERNS.iter().any(|pattern| pattern.is_match(url))
}

/// Installer executable candidates inside a virtual environment,
/// platform-dependent
pub fn pip_candidates(venv: &Utf8Path) -> Vec<Utf8PathBuf> {
    if cfg!(windows) {
        vec![venv.join("Scripts/pip.exe"), venv.join("Scripts/pip3.exe")]
    } else {
        vec![venv.join("bin/pip"), venv.join("bin/pip3")]
    }
}

/// First existing installer executable inside a virtual environment
pub fn venv_pip_path(venv: &Utf8Path) -> Option<Utf8PathBuf> {
    pip_candidates(venv).into_iter().find(|path| path.exists())
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
    version: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Deserialize)]
struct OutdatedEntry {
    name: String,
    latest_version: String,
}

/// pip client bound to a target scope
#[derive(Debug, Clone)]
pub struct PipClient {
    scope: PackageScope,
    install_timeout: Duration,
}

impl PipClient {
    pub fn new(scope: PackageScope) -> Self {
        Self {
            scope,
            install_timeout: INSTALL_TIMEOUT,
        }
    }

    /// Override the per-package timeout (tests)
    pub fn with_timeout(scope: PackageScope, install_timeout: Duration) -> Self {
        Self {
            scope,
            install_timeout,
        }
    }

    pub fn scope(&self) -> &PackageScope {
        &self.scope
    }

    /// The invocation prefix for this scope. Four mutually exclusive
    /// cases; the venv case resolves the installer inside the environment.
    pub fn command_prefix(&self) -> Vec<String> {
        match &self.scope {
            PackageScope::Conda { env } => vec![
                "conda".to_string(),
                "run".to_string(),
                "-n".to_string(),
                env.clone(),
                "pip".to_string(),
            ],
            PackageScope::Venv { path } => {
                let pip = venv_pip_path(path)
                    .unwrap_or_else(|| pip_candidates(path).swap_remove(0));
                vec![pip.to_string()]
            }
            PackageScope::Global => vec![
                GLOBAL_PYTHON.to_string(),
                "-m".to_string(),
                "pip".to_string(),
            ],
            PackageScope::Current => vec!["pip".to_string()],
        }
    }

    /// Full argv for installing one package. Kept separate from execution
    /// so update/install equivalence is checkable without running pip.
    pub fn install_invocation(
        &self,
        package: &str,
        options: &InstallOptions,
    ) -> Result<Vec<String>> {
        let mut argv = self.command_prefix();
        argv.push("install".to_string());

        if options.upgrade {
            argv.push("--upgrade".to_string());
        }
        if options.force_reinstall {
            argv.push("--force-reinstall".to_string());
            argv.push("--no-deps".to_string());
        }

        if options.from_git || package.contains("git+") {
            let bare = package.strip_prefix("git+").unwrap_or(package);
            if !is_valid_git_url(bare) {
                return Err(Error::InvalidGitUrl {
                    url: package.to_string(),
                });
            }
            if options.editable {
                argv.push("-e".to_string());
            }
            if package.starts_with("git+") {
                argv.push(package.to_string());
            } else {
                argv.push(format!("git+{package}"));
            }
        } else if options.include_extras && !package.contains('[') {
            argv.push(format!("{package}[all]"));
        } else {
            argv.push(package.to_string());
        }

        Ok(argv)
    }

    /// Install packages one at a time, sequentially. Every package gets an
    /// individual outcome; the batch always runs to the end.
    pub async fn install(
        &self,
        packages: &[String],
        options: &InstallOptions,
        reporter: &dyn Reporter,
    ) -> InstallReport {
        let mut report = InstallReport::new();

        for package in packages {
            reporter.detail(&format!("installing {package}"));

            let argv = match self.install_invocation(package, options) {
                Ok(argv) => argv,
                Err(err) => {
                    reporter.warn(&format!("{package}: {err}"));
                    report.record_failure(package.as_str(), err.to_string());
                    continue;
                }
            };

            match self.run_argv(&argv, Some(self.install_timeout)).await {
                Ok(output) if output.status.success() => {
                    reporter.success(&format!("{package} installed"));
                    report.record_success(package.as_str());
                }
                Ok(output) => {
                    let reason = process::failure_reason(&output);
                    reporter.warn(&format!("failed to install {package}: {reason}"));
                    report.record_failure(package.as_str(), reason);
                }
                Err(err) => {
                    reporter.warn(&format!("failed to install {package}: {err}"));
                    report.record_failure(package.as_str(), err.to_string());
                }
            }
        }

        report
    }

    /// Uninstall packages one at a time. Aggregate success requires every
    /// package to succeed.
    pub async fn uninstall(&self, packages: &[String], reporter: &dyn Reporter) -> InstallReport {
        let mut report = InstallReport::new();

        for package in packages {
            let mut argv = self.command_prefix();
            argv.extend([
                "uninstall".to_string(),
                package.clone(),
                "-y".to_string(),
            ]);

            match self.run_argv(&argv, None).await {
                Ok(output) if output.status.success() => {
                    reporter.success(&format!("{package} uninstalled"));
                    report.record_success(package.as_str());
                }
                Ok(output) => {
                    let reason = process::failure_reason(&output);
                    reporter.warn(&format!("failed to uninstall {package}: {reason}"));
                    report.record_failure(package.as_str(), reason);
                }
                Err(err) => {
                    reporter.warn(&format!("failed to uninstall {package}: {err}"));
                    report.record_failure(package.as_str(), err.to_string());
                }
            }
        }

        report
    }

    /// Update is installation with upgrade semantics, nothing more
    pub async fn update(&self, packages: &[String], reporter: &dyn Reporter) -> InstallReport {
        let options = InstallOptions {
            upgrade: true,
            ..Default::default()
        };
        self.install(packages, &options, reporter).await
    }

    /// Structured package listing. When `outdated` is set, a second query
    /// merges the latest known version onto each entry by name; a merge
    /// failure degrades to the base listing.
    pub async fn list(&self, outdated: bool) -> Result<Vec<InstalledPackage>> {
        let mut argv = self.command_prefix();
        argv.extend(["list".to_string(), "--format=json".to_string()]);

        let output = self.run_argv(&argv, None).await?;
        if !output.status.success() {
            return Err(Error::command_failed(
                argv.join(" "),
                process::failure_reason(&output),
            ));
        }

        let entries: Vec<ListEntry> = serde_json::from_slice(&output.stdout)?;
        let mut packages: Vec<InstalledPackage> = entries
            .into_iter()
            .map(|entry| InstalledPackage {
                name: entry.name,
                version: entry.version,
                latest: None,
                location: entry.location,
            })
            .collect();

        if outdated {
            let mut argv = self.command_prefix();
            argv.extend([
                "list".to_string(),
                "--outdated".to_string(),
                "--format=json".to_string(),
            ]);
            match self.run_argv(&argv, None).await {
                Ok(output) if output.status.success() => {
                    apply_outdated(&mut packages, &output.stdout);
                }
                Ok(output) => {
                    debug!(
                        "outdated listing failed, returning base listing: {}",
                        process::failure_reason(&output)
                    );
                }
                Err(err) => {
                    debug!("outdated listing unavailable: {err}");
                }
            }
        }

        Ok(packages)
    }

    /// Key/value details for an installed package, parsed from `pip show`.
    /// Returns None (not an error) when the package is absent.
    pub async fn show(&self, package: &str) -> Result<Option<BTreeMap<String, String>>> {
        let mut argv = self.command_prefix();
        argv.extend(["show".to_string(), package.to_string()]);

        let output = self.run_argv(&argv, None).await?;
        if !output.status.success() {
            return Ok(None);
        }

        let text = process::stdout_str(&output);
        let info = parse_show_output(&text);
        if info.is_empty() {
            Ok(None)
        } else {
            Ok(Some(info))
        }
    }

    async fn run_argv(
        &self,
        argv: &[String],
        limit: Option<Duration>,
    ) -> Result<std::process::Output> {
        let args: Vec<&str> = argv[1..].iter().map(String::as_str).collect();
        process::run(&argv[0], &args, None, limit).await
    }
}

/// Merge `pip list --outdated` output into a base listing by name.
/// Parse failures are ignored; the base listing stands.
fn apply_outdated(packages: &mut [InstalledPackage], outdated_json: &[u8]) {
    let entries: Vec<OutdatedEntry> = match serde_json::from_slice(outdated_json) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("could not parse outdated listing: {err}");
            return;
        }
    };

    let latest: BTreeMap<&str, &str> = entries
        .iter()
        .map(|entry| (entry.name.as_str(), entry.latest_version.as_str()))
        .collect();

    for package in packages {
        package.latest = Some(
            latest
                .get(package.name.as_str())
                .map(|version| (*version).to_string())
                .unwrap_or_else(|| package.version.clone()),
        );
    }
}

/// Parse `pip show` output into normalized keys:
/// lowercased, `-` replaced with `_`.
fn parse_show_output(text: &str) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();
    for line in text.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_lowercase().replace('-', "_");
            info.insert(key, value.trim().to_string());
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(scope: PackageScope) -> PipClient {
        PipClient::new(scope)
    }

    #[test]
    fn test_prefix_conda() {
        let prefix = client(PackageScope::Conda {
            env: "ml".to_string(),
        })
        .command_prefix();
        assert_eq!(prefix, ["conda", "run", "-n", "ml", "pip"]);
    }

    #[test]
    fn test_prefix_global() {
        let prefix = client(PackageScope::Global).command_prefix();
        assert_eq!(prefix.len(), 3);
        assert_eq!(prefix[1], "-m");
        assert_eq!(prefix[2], "pip");
    }

    #[test]
    fn test_prefix_current() {
        assert_eq!(client(PackageScope::Current).command_prefix(), ["pip"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_prefix_venv_defaults_to_first_candidate() {
        let prefix = client(PackageScope::Venv {
            path: "/srv/app/.venv".into(),
        })
        .command_prefix();
        assert_eq!(prefix, ["/srv/app/.venv/bin/pip"]);
    }

    #[test]
    fn test_install_invocation_plain() {
        let argv = client(PackageScope::Current)
            .install_invocation("requests", &InstallOptions::default())
            .unwrap();
        assert_eq!(argv, ["pip", "install", "requests"]);
    }

    #[test]
    fn test_install_invocation_upgrade_and_force() {
        let options = InstallOptions {
            upgrade: true,
            force_reinstall: true,
            ..Default::default()
        };
        let argv = client(PackageScope::Current)
            .install_invocation("requests", &options)
            .unwrap();
        assert_eq!(
            argv,
            ["pip", "install", "--upgrade", "--force-reinstall", "--no-deps", "requests"]
        );
    }

    #[test]
    fn test_install_invocation_extras() {
        let options = InstallOptions {
            include_extras: true,
            ..Default::default()
        };
        let c = client(PackageScope::Current);
        let argv = c.install_invocation("httpx", &options).unwrap();
        assert_eq!(argv, ["pip", "install", "httpx[all]"]);

        // Already qualified identifiers are left alone
        let argv = c.install_invocation("uvicorn[standard]", &options).unwrap();
        assert_eq!(argv, ["pip", "install", "uvicorn[standard]"]);
    }

    #[test]
    fn test_install_invocation_git() {
        let options = InstallOptions {
            from_git: true,
            editable: true,
            ..Default::default()
        };
        let argv = client(PackageScope::Current)
            .install_invocation("https://github.com/psf/requests", &options)
            .unwrap();
        assert_eq!(
            argv,
            ["pip", "install", "-e", "git+https://github.com/psf/requests"]
        );
    }

    #[test]
    fn test_install_invocation_git_already_prefixed() {
        let argv = client(PackageScope::Current)
            .install_invocation(
                "git+https://github.com/psf/requests.git",
                &InstallOptions::default(),
            )
            .unwrap();
        assert_eq!(
            argv,
            ["pip", "install", "git+https://github.com/psf/requests.git"]
        );
    }

    #[test]
    fn test_install_invocation_rejects_unknown_git_host() {
        let options = InstallOptions {
            from_git: true,
            ..Default::default()
        };
        let result = client(PackageScope::Current)
            .install_invocation("https://evil.example.com/a/b", &options);
        assert!(matches!(result, Err(Error::InvalidGitUrl { .. })));
    }

    #[test]
    fn test_update_equals_install_with_upgrade() {
        let c = client(PackageScope::Conda {
            env: "ml".to_string(),
        });
        let upgrade = InstallOptions {
            upgrade: true,
            ..Default::default()
        };
        // update() delegates to install() with exactly these options, so
        // the invocation argv is the equivalence to check
        let install_argv = c.install_invocation("requests", &upgrade).unwrap();
        assert_eq!(
            install_argv,
            ["conda", "run", "-n", "ml", "pip", "install", "--upgrade", "requests"]
        );
    }

    #[test]
    fn test_valid_git_urls() {
        assert!(is_valid_git_url("https://github.com/psf/requests"));
        assert!(is_valid_git_url("https://github.com/psf/requests.git"));
        assert!(is_valid_git_url("https://gitlab.com/group/project"));
        assert!(is_valid_git_url("https://bitbucket.org/team/repo.git"));
        assert!(is_valid_git_url("git@github.com:psf/requests.git"));
        assert!(is_valid_git_url("ssh://git@github.com/psf/requests"));
    }

    #[test]
    fn test_invalid_git_urls() {
        assert!(!is_valid_git_url("https://example.com/a/b"));
        assert!(!is_valid_git_url("http://github.com/psf/requests"));
        assert!(!is_valid_git_url("github.com/psf/requests"));
        assert!(!is_valid_git_url("ftp://github.com/psf/requests"));
        assert!(!is_valid_git_url(""));
    }

    #[test]
    fn test_parse_show_output() {
        let text = "Name: requests\nVersion: 2.31.0\nHome-page: https://requests.readthedocs.io\nRequires-Dist: urllib3\n";
        let info = parse_show_output(text);
        assert_eq!(info.get("name").map(String::as_str), Some("requests"));
        assert_eq!(info.get("version").map(String::as_str), Some("2.31.0"));
        // hyphens are normalized to underscores
        assert!(info.contains_key("home_page"));
        assert!(info.contains_key("requires_dist"));
    }

    #[test]
    fn test_apply_outdated_merges_by_name() {
        let mut packages = vec![
            InstalledPackage {
                name: "requests".to_string(),
                version: "2.30.0".to_string(),
                latest: None,
                location: None,
            },
            InstalledPackage {
                name: "flask".to_string(),
                version: "3.0.0".to_string(),
                latest: None,
                location: None,
            },
        ];
        let outdated = br#"[{"name": "requests", "latest_version": "2.31.0"}]"#;

        apply_outdated(&mut packages, outdated);

        assert_eq!(packages[0].latest.as_deref(), Some("2.31.0"));
        // Up-to-date packages report their own version as latest
        assert_eq!(packages[1].latest.as_deref(), Some("3.0.0"));
    }

    #[test]
    fn test_apply_outdated_ignores_garbage() {
        let mut packages = vec![InstalledPackage {
            name: "requests".to_string(),
            version: "2.30.0".to_string(),
            latest: None,
            location: None,
        }];

        apply_outdated(&mut packages, b"not json at all");

        assert_eq!(packages[0].latest, None);
    }
}
