//! # pyforge-registry
//!
//! Read-only PyPI metadata client: free-text package search over a curated
//! table plus a live lookup, published version listing, and identifier
//! validation.
//!
//! Everything here degrades rather than fails: an unreachable registry
//! narrows results instead of erroring, and validation treats lookup
//! failures as valid so the installer produces the real error.

mod client;
pub mod error;
mod known;

pub use client::{PackageSummary, RegistryClient};
pub use error::{Error, Result};
