pub use anyhow::{anyhow, Result};

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod layout;
pub mod paths;

#[cfg(test)]
pub(crate) mod tests;
