//! # pyforge-projects
//!
//! Project scaffolding: the template catalog and renderer, generated
//! artifact writers (requirements files, `.env`, `.gitignore`), git
//! repository initialization, and the [`creator::ProjectCreator`] pipeline
//! that sequences all of it.

pub mod creator;
pub mod envfile;
pub mod error;
pub mod git;
pub mod requirements;
pub mod templates;

pub use creator::{CreationSummary, ProjectCreator};
pub use error::{Error, Result};
pub use templates::{ProjectTemplate, TemplateCatalog};
