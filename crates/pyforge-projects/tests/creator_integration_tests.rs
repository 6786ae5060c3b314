//! End-to-end creation runs against a temporary directory, with no
//! environment and no git so nothing external is required.

use camino::Utf8PathBuf;
use tempfile::TempDir;

use pyforge_core::reporter::NullReporter;
use pyforge_core::types::{EnvKind, ProjectSpec};
use pyforge_projects::{ProjectCreator, TemplateCatalog};
use pyforge_python::PythonDiscovery;

fn plain_spec(parent: &TempDir, name: &str, template: &str) -> ProjectSpec {
    ProjectSpec {
        name: name.to_string(),
        parent_dir: Utf8PathBuf::from_path_buf(parent.path().to_path_buf()).unwrap(),
        template: template.to_string(),
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
async fn basic_project_without_environment_or_git() {
    let temp = TempDir::new().unwrap();
    let spec = plain_spec(&temp, "My Project", "basic");

    let discovery = PythonDiscovery::without_managers();
    let catalog = TemplateCatalog::embedded().unwrap();
    let summary = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter)
        .create()
        .await
        .unwrap();

    let project = summary.project_path.clone();
    assert!(project.ends_with("My Project"));
    assert!(project.join("main.py").exists());
    assert!(project.join("README.md").exists());
    assert!(project.join(".gitignore").exists());
    assert!(!project.join(".venv").exists());
    assert!(!project.join(".git").exists());

    // The raw project name flows into the rendered entry point
    let main_py = std::fs::read_to_string(project.join("main.py")).unwrap();
    assert!(main_py.contains("Hello, My Project!"));

    // README uses the title-cased form and the description
    let readme = std::fs::read_to_string(project.join("README.md")).unwrap();
    assert!(readme.contains("# My Project"));
    assert!(readme.contains("A test project"));

    // No installation and no git ran
    assert!(summary.install.is_none());
    assert!(summary.git_initialized.is_none());
    assert!(summary.warnings.is_empty());
}

#[tokio::test]
async fn env_file_secret_placeholder_never_survives() {
    let temp = TempDir::new().unwrap();
    let spec = plain_spec(&temp, "secure-app", "fastapi");

    let discovery = PythonDiscovery::without_managers();
    let catalog = TemplateCatalog::embedded().unwrap();
    let summary = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter)
        .create()
        .await
        .unwrap();

    let env_body = std::fs::read_to_string(summary.project_path.join(".env")).unwrap();
    assert!(env_body.contains("ENVIRONMENT=development"));
    assert!(env_body.contains("SECRET_KEY="));
    assert!(!env_body.contains("your-secret-key-here"));
}

#[tokio::test]
async fn env_file_can_be_disabled() {
    let temp = TempDir::new().unwrap();
    let mut spec = plain_spec(&temp, "no-env", "fastapi");
    spec.write_env_file = false;

    let discovery = PythonDiscovery::without_managers();
    let catalog = TemplateCatalog::embedded().unwrap();
    let summary = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter)
        .create()
        .await
        .unwrap();

    assert!(!summary.project_path.join(".env").exists());
}

#[tokio::test]
async fn dev_requirements_are_separate() {
    let temp = TempDir::new().unwrap();
    let mut spec = plain_spec(&temp, "tested-app", "basic");
    spec.dev_packages = vec!["pytest".to_string(), "black".to_string()];

    let discovery = PythonDiscovery::without_managers();
    let catalog = TemplateCatalog::embedded().unwrap();
    let summary = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter)
        .create()
        .await
        .unwrap();

    let dev = std::fs::read_to_string(summary.project_path.join("requirements-dev.txt")).unwrap();
    assert_eq!(dev, "black\npytest\n");
    // basic has no base dependencies and none were added
    assert!(!summary.project_path.join("requirements.txt").exists());
}

#[tokio::test]
async fn git_initialization_runs_last_and_is_reported() {
    let temp = TempDir::new().unwrap();
    let mut spec = plain_spec(&temp, "versioned-app", "basic");
    spec.init_git = true;

    let discovery = PythonDiscovery::without_managers();
    let catalog = TemplateCatalog::embedded().unwrap();
    let summary = ProjectCreator::new(&spec, &discovery, &catalog, &NullReporter)
        .create()
        .await
        .unwrap();

    match summary.git_initialized {
        Some(true) => assert!(summary.project_path.join(".git").exists()),
        // A failed init is a swallowed failure, not an error
        Some(false) => {}
        None => panic!("git was requested but not attempted"),
    }
}
