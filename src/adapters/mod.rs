// Adapters layer: concrete customer stores behind the `CustomerRepository` port.

pub mod http;
pub mod memory;

use crate::config::toml_config::{RepositoryConfig, RepositoryKind};
use crate::domain::model::{CanonicalCustomer, Customer};
use crate::domain::ports::CustomerRepository;
use crate::utils::error::{RepositoryError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub use http::HttpCustomerRepository;
pub use memory::InMemoryCustomerRepository;

/// The store selected by configuration.
pub enum ConfiguredRepository {
    Http(HttpCustomerRepository),
    Memory(InMemoryCustomerRepository),
}

impl ConfiguredRepository {
    /// Dry runs always get a fresh in-memory store.
    pub fn from_config(config: &RepositoryConfig, dry_run: bool) -> Result<Self> {
        if dry_run {
            tracing::info!("🧪 Dry run: customers are saved to an in-memory store only");
            return Ok(ConfiguredRepository::Memory(InMemoryCustomerRepository::new()));
        }

        match config.kind {
            RepositoryKind::Memory => {
                tracing::warn!("Repository type is 'memory'; imported customers are not persisted");
                Ok(ConfiguredRepository::Memory(InMemoryCustomerRepository::new()))
            }
            RepositoryKind::Http => {
                let endpoint = crate::utils::validation::validate_required_field(
                    "repository.endpoint",
                    &config.endpoint,
                )?;
                let repository = HttpCustomerRepository::new(
                    endpoint,
                    Duration::from_secs(config.timeout_seconds()),
                    &config.headers.clone().unwrap_or_default(),
                )?;
                Ok(ConfiguredRepository::Http(repository))
            }
        }
    }
}

#[async_trait]
impl CustomerRepository for ConfiguredRepository {
    async fn get(&self, email: &str) -> std::result::Result<Customer, RepositoryError> {
        match self {
            ConfiguredRepository::Http(repository) => repository.get(email).await,
            ConfiguredRepository::Memory(repository) => repository.get(email).await,
        }
    }

    async fn save(
        &self,
        customer: &CanonicalCustomer,
    ) -> std::result::Result<Customer, RepositoryError> {
        match self {
            ConfiguredRepository::Http(repository) => repository.save(customer).await,
            ConfiguredRepository::Memory(repository) => repository.save(customer).await,
        }
    }
}
