pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConfiguredRepository, HttpCustomerRepository, InMemoryCustomerRepository};
pub use config::cli::LocalStorage;
pub use config::toml_config::ImportConfig;
pub use core::{format::SourceFormat, runner::ImportRunner};
pub use utils::error::{ImportError, Result};
