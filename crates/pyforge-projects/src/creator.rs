//! The project creation pipeline.
//!
//! Stages run strictly in order: directory, environment (optional), file
//! generation, requirements files, dependency installation (best-effort),
//! repository initialization (optional). Directory and template failures
//! abort immediately and leave partial state on disk; per-package install
//! failures are collected and reported; git failures are logged and
//! swallowed. Nothing is rolled back.

use camino::Utf8PathBuf;
use tracing::{debug, warn};

use pyforge_core::reporter::Reporter;
use pyforge_core::types::{
    EnvKind, EnvironmentDescriptor, EnvironmentKind, InstallOptions, InstallReport, PackageScope,
    ProjectSpec,
};
use pyforge_python::{provision, PipClient, PythonDiscovery};

use crate::envfile;
use crate::error::{Error, Result};
use crate::git;
use crate::requirements;
use crate::templates::{render_string, TemplateCatalog, TemplateVars};

/// Fixed `.gitignore` written into every project
const GITIGNORE: &str = "\
# Byte-compiled / optimized / DLL files
__pycache__/
*.py[cod]
*$py.class

# Virtual environments
.venv/
venv/
ENV/

# Environment variables
.env
.env.local

# IDE
.vscode/
.idea/
*.swp
*.swo

# OS
.DS_Store
Thumbs.db

# Distribution / packaging
build/
dist/
*.egg-info/
";

/// Everything that happened during one creation run, for the final
/// structured summary. Expected failure modes land here instead of in an
/// error.
#[derive(Debug)]
pub struct CreationSummary {
    pub project_path: Utf8PathBuf,
    /// Project-relative paths of files written
    pub created_files: Vec<String>,
    /// Environment descriptor when one was provisioned
    pub environment: Option<EnvironmentDescriptor>,
    /// Per-package outcome of the main dependency installation
    pub install: Option<InstallReport>,
    /// Per-package outcome of the dev dependency installation
    pub dev_install: Option<InstallReport>,
    /// None when not requested, otherwise whether init succeeded
    pub git_initialized: Option<bool>,
    /// Recoverable problems encountered along the way
    pub warnings: Vec<String>,
}

impl CreationSummary {
    fn new(project_path: Utf8PathBuf) -> Self {
        Self {
            project_path,
            created_files: Vec::new(),
            environment: None,
            install: None,
            dev_install: None,
            git_initialized: None,
            warnings: Vec::new(),
        }
    }
}

/// Sequences one project creation from an immutable spec
pub struct ProjectCreator<'a> {
    spec: &'a ProjectSpec,
    discovery: &'a PythonDiscovery,
    catalog: &'a TemplateCatalog,
    reporter: &'a dyn Reporter,
}

impl<'a> ProjectCreator<'a> {
    pub fn new(
        spec: &'a ProjectSpec,
        discovery: &'a PythonDiscovery,
        catalog: &'a TemplateCatalog,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            spec,
            discovery,
            catalog,
            reporter,
        }
    }

    /// Run the whole pipeline
    pub async fn create(&self) -> Result<CreationSummary> {
        let project_path = self.spec.project_path();

        // Stage: directory. Fatal on failure.
        self.reporter
            .step(&format!("Creating project directory: {project_path}"));
        std::fs::create_dir_all(&project_path)
            .map_err(|err| Error::directory_create(project_path.as_str(), err.to_string()))?;

        // Stage: template lookup. Fatal on failure.
        let template = self.catalog.get(&self.spec.template).ok_or_else(|| {
            Error::template_not_found(self.spec.template.as_str(), self.catalog.names().join(", "))
        })?;

        let mut summary = CreationSummary::new(project_path.clone());

        // Stage: environment. Fatal when one was requested.
        if self.spec.env != EnvKind::None {
            self.reporter.step("Setting up Python environment");
            let descriptor =
                provision(self.spec, &project_path, self.discovery, self.reporter).await?;
            summary.environment = Some(descriptor);
        }

        // Stage: file generation. Per-file failures are reported and the
        // rest of the template still renders.
        self.reporter.step("Generating project files");
        let vars = self.template_vars(&summary).await;
        for (relative, body) in &template.files {
            let target = project_path.join(relative);
            if let Err(err) = write_rendered(&target, body, &vars) {
                self.reporter
                    .warn(&format!("failed to create {relative}: {err}"));
                summary
                    .warnings
                    .push(format!("failed to create {relative}: {err}"));
                continue;
            }
            self.reporter.success(&format!("created {relative}"));
            summary.created_files.push(relative.clone());
        }

        if self.spec.write_env_file && !template.env_vars.is_empty() {
            match envfile::write_env_file(&project_path, &template.env_vars) {
                Ok(_) => {
                    self.reporter.success("created .env");
                    summary.created_files.push(".env".to_string());
                }
                Err(err) => {
                    self.reporter.warn(&format!("failed to create .env: {err}"));
                    summary.warnings.push(format!("failed to create .env: {err}"));
                }
            }
        }

        match std::fs::write(project_path.join(".gitignore"), GITIGNORE) {
            Ok(()) => summary.created_files.push(".gitignore".to_string()),
            Err(err) => {
                self.reporter
                    .warn(&format!("failed to create .gitignore: {err}"));
                summary
                    .warnings
                    .push(format!("failed to create .gitignore: {err}"));
            }
        }

        // Stage: requirements files
        let main_deps = self.main_dependencies(template.dependencies.as_slice());
        if !main_deps.is_empty() {
            self.write_requirements_file(&mut summary, "requirements.txt", &main_deps);
        }
        if !self.spec.dev_packages.is_empty() {
            let dev = self.spec.dev_packages.clone();
            self.write_requirements_file(&mut summary, "requirements-dev.txt", &dev);
        }

        // Stage: dependency installation. Never fatal; skipped entirely
        // without an environment to install into.
        self.install_dependencies(&mut summary, &main_deps).await;

        // Stage: repository initialization. Last, and never fatal.
        if self.spec.init_git {
            self.reporter.step("Initializing git repository");
            match git::init_repository(&project_path).await {
                Ok(()) => {
                    self.reporter.success("git repository initialized");
                    summary.git_initialized = Some(true);
                }
                Err(err) => {
                    warn!("git initialization failed: {err}");
                    self.reporter
                        .warn(&format!("git initialization failed: {err}"));
                    summary.git_initialized = Some(false);
                }
            }
        }

        Ok(summary)
    }

    /// Template dependencies first, then the user's additions, order kept
    fn main_dependencies(&self, template_deps: &[String]) -> Vec<String> {
        let mut deps = template_deps.to_vec();
        deps.extend(self.spec.packages.iter().cloned());
        deps
    }

    async fn template_vars(&self, summary: &CreationSummary) -> TemplateVars {
        let python_version = match &summary.environment {
            Some(environment) => environment.version.clone(),
            None => match &self.spec.python {
                Some(install) => install.version.clone(),
                None => self
                    .discovery
                    .current_version()
                    .await
                    .unwrap_or_else(|| "3".to_string()),
            },
        };
        TemplateVars::new(&self.spec.name, &self.spec.description, &python_version)
    }

    fn write_requirements_file(
        &self,
        summary: &mut CreationSummary,
        file_name: &str,
        deps: &[String],
    ) {
        let path = summary.project_path.join(file_name);
        match requirements::write_requirements(&path, deps) {
            Ok(()) => {
                self.reporter.success(&format!("created {file_name}"));
                summary.created_files.push(file_name.to_string());
            }
            Err(err) => {
                self.reporter
                    .warn(&format!("failed to create {file_name}: {err}"));
                summary
                    .warnings
                    .push(format!("failed to create {file_name}: {err}"));
            }
        }
    }

    /// Install template + additional packages, then dev packages, into the
    /// provisioned environment. Per-package outcomes land in the summary.
    async fn install_dependencies(&self, summary: &mut CreationSummary, main_deps: &[String]) {
        let Some(environment) = &summary.environment else {
            debug!("no environment provisioned, skipping dependency installation");
            return;
        };
        if main_deps.is_empty() && self.spec.dev_packages.is_empty() {
            return;
        }

        let scope = match environment.kind {
            EnvironmentKind::Conda => PackageScope::Conda {
                env: environment.locator.clone(),
            },
            _ => {
                if environment.pip.is_none() {
                    self.reporter.warn(
                        "no package installer available; skipping dependency installation",
                    );
                    summary.warnings.push(
                        "dependency installation skipped: no package installer found".to_string(),
                    );
                    return;
                }
                PackageScope::Venv {
                    path: Utf8PathBuf::from(environment.locator.clone()),
                }
            }
        };

        let client = PipClient::new(scope);

        // Freshen pip itself first; failure here is not fatal
        let upgrade = InstallOptions {
            upgrade: true,
            ..Default::default()
        };
        let pip_report = client
            .install(&["pip".to_string()], &upgrade, self.reporter)
            .await;
        if !pip_report.all_succeeded() {
            debug!("pip self-upgrade failed, continuing with the bundled version");
        }

        if !main_deps.is_empty() {
            self.reporter.step("Installing dependencies");
            let report = client
                .install(main_deps, &InstallOptions::default(), self.reporter)
                .await;
            summary.install = Some(report);
        }

        if !self.spec.dev_packages.is_empty() {
            self.reporter.step("Installing development dependencies");
            let report = client
                .install(&self.spec.dev_packages, &InstallOptions::default(), self.reporter)
                .await;
            summary.dev_install = Some(report);
        }
    }
}

/// Render one template file and write it, creating parent directories
fn write_rendered(
    target: &camino::Utf8Path,
    body: &str,
    vars: &TemplateVars,
) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, render_string(body, vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyforge_core::reporter::NullReporter;
    use tempfile::TempDir;

    fn spec_in(parent: &TempDir, name: &str) -> ProjectSpec {
        ProjectSpec {
            name: name.to_string(),
            parent_dir: Utf8PathBuf::from_path_buf(parent.path().to_path_buf()).unwrap(),
            template: "basic".to_string(),
            python: None,
            description: "A test project".to_string(),
            packages: vec![],
            dev_packages: vec![],
            env: EnvKind::None,
            conda_env_name: None,
            init_git: false,
            write_env_file: true,
        }
    }

    #[tokio::test]
    async fn test_unknown_template_is_fatal() {
        let temp = TempDir::new().unwrap();
        let mut spec = spec_in(&temp, "demo");
        spec.template = "no-such-template".to_string();

        let discovery = PythonDiscovery::without_managers();
        let catalog = TemplateCatalog::embedded().unwrap();
        let creator = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter);

        let result = creator.create().await;

        assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
        // The directory stage already ran; partial state stays on disk
        assert!(spec.project_path().exists());
    }

    #[tokio::test]
    async fn test_requirements_union_written_once() {
        let temp = TempDir::new().unwrap();
        let mut spec = spec_in(&temp, "demo");
        spec.template = "fastapi".to_string();
        spec.packages = vec!["uvicorn[standard]".to_string(), "httpx".to_string()];

        let discovery = PythonDiscovery::without_managers();
        let catalog = TemplateCatalog::embedded().unwrap();
        let creator = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter);

        let summary = creator.create().await.unwrap();

        let body =
            std::fs::read_to_string(summary.project_path.join("requirements.txt")).unwrap();
        // fastapi + uvicorn[standard] from the template, httpx from the
        // user; the duplicate uvicorn collapses
        assert_eq!(body, "fastapi\nhttpx\nuvicorn[standard]\n");
    }
}
