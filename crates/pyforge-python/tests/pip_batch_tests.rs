//! Batch install behavior against a stub pip executable.
//!
//! The stub fails for `pkg-a` and succeeds for everything else, which is
//! enough to exercise per-package isolation without a real Python
//! toolchain.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;

use camino::Utf8PathBuf;
use tempfile::TempDir;

use pyforge_core::reporter::NullReporter;
use pyforge_core::types::{InstallOptions, PackageScope};
use pyforge_python::PipClient;

const STUB_PIP: &str = r#"#!/bin/sh
for arg do last=$arg; done
case "$last" in
    pkg-a) echo "no matching distribution found for pkg-a" >&2; exit 1 ;;
    *) exit 0 ;;
esac
"#;

fn stub_venv(temp: &TempDir) -> Utf8PathBuf {
    let venv = Utf8PathBuf::from_path_buf(temp.path().join("venv")).unwrap();
    std::fs::create_dir_all(venv.join("bin")).unwrap();
    let pip = venv.join("bin/pip");
    std::fs::write(&pip, STUB_PIP).unwrap();
    let mut perms = std::fs::metadata(&pip).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&pip, perms).unwrap();
    venv
}

#[tokio::test]
async fn one_failure_does_not_abort_the_batch() {
    let temp = TempDir::new().unwrap();
    let client = PipClient::new(PackageScope::Venv {
        path: stub_venv(&temp),
    });

    let packages = vec!["pkg-a".to_string(), "pkg-b".to_string()];
    let report = client
        .install(&packages, &InstallOptions::default(), &NullReporter)
        .await;

    assert_eq!(report.total(), packages.len());
    assert!(!report.all_succeeded());
    assert_eq!(report.succeeded(), ["pkg-b".to_string()]);
    assert_eq!(report.failed().len(), 1);
    assert_eq!(report.failed()[0].package, "pkg-a");
    assert!(report.failed()[0].reason.contains("no matching distribution"));
}

#[tokio::test]
async fn successful_batch_reports_every_package() {
    let temp = TempDir::new().unwrap();
    let client = PipClient::new(PackageScope::Venv {
        path: stub_venv(&temp),
    });

    let packages = vec!["requests".to_string(), "flask".to_string()];
    let report = client
        .install(&packages, &InstallOptions::default(), &NullReporter)
        .await;

    assert!(report.all_succeeded());
    assert_eq!(report.succeeded().len(), 2);
}

#[tokio::test]
async fn uninstall_aggregates_per_package_outcomes() {
    let temp = TempDir::new().unwrap();
    let client = PipClient::new(PackageScope::Venv {
        path: stub_venv(&temp),
    });

    // The stub inspects the last argument; for uninstall that is "-y",
    // so every uninstall succeeds here
    let packages = vec!["requests".to_string()];
    let report = client.uninstall(&packages, &NullReporter).await;

    assert!(report.all_succeeded());
    assert_eq!(report.total(), 1);
}

#[tokio::test]
async fn invalid_git_url_is_rejected_without_invoking_pip() {
    let temp = TempDir::new().unwrap();
    let client = PipClient::new(PackageScope::Venv {
        path: stub_venv(&temp),
    });

    let options = InstallOptions {
        from_git: true,
        ..Default::default()
    };
    let packages = vec!["https://evil.example.com/a/b".to_string()];
    let report = client.install(&packages, &options, &NullReporter).await;

    assert_eq!(report.total(), 1);
    assert!(!report.all_succeeded());
    assert!(report.failed()[0].reason.contains("Invalid git repository URL"));
}
