//! # pyforge-python
//!
//! Everything that touches a Python toolchain on the host:
//! - interpreter and environment discovery (system, conda, pyenv)
//! - environment provisioning (project venvs and named conda environments)
//! - the pip front-end used for install/uninstall/list/show
//!
//! External tools are probed once into capabilities; a missing tool is
//! never an error, it just narrows what discovery can report.

pub mod conda;
pub mod discovery;
pub mod error;
pub mod pip;
mod process;
pub mod provision;
pub mod pyenv;

pub use conda::{CondaCli, CondaEnv};
pub use discovery::{EnvironmentSurvey, InstallMethod, PythonDiscovery};
pub use error::{Error, Result};
pub use pip::PipClient;
pub use provision::provision;
pub use pyenv::PyenvCli;
