//! Rezup - install-resolution-and-cache pipeline for rez
//!
//! Resolves a (repository, ref) pair to a cached rez install, fetching
//! and installing from a GitHub source archive on a miss, and exposes
//! the resulting executable and library paths to the environment.

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod install;
pub mod manifest;
pub mod probe;
pub mod rez;
pub mod store;
pub mod strategy;
pub mod ui;

pub use error::{RezupError, RezupResult};
