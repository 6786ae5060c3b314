//! # pyforge-core
//!
//! Core library for the pyforge CLI providing:
//! - Project specification and generated-artifact types
//! - Environment and installer scope descriptors
//! - Per-package installation reporting
//! - The `Reporter` trait used for progress output

pub mod reporter;
pub mod types;

pub use reporter::{NullReporter, Reporter};
pub use types::{
    EnvKind, EnvironmentDescriptor, EnvironmentKind, InstallOptions, InstallReport,
    InstalledPackage, InterpreterSelection, PackageFailure, PackageScope, ProjectSpec,
    PythonInstall,
};
