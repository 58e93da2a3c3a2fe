use crate::domain::model::{CanonicalCustomer, Customer, ImportProfile};
use crate::utils::error::{RepositoryError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Resolves the profile selected on the command line.
    fn profile(&self, name: &str) -> Result<ImportProfile>;
}

/// The customer store. `get` must report absence as `RepositoryError::NotFound`
/// and nothing else.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get(&self, email: &str) -> std::result::Result<Customer, RepositoryError>;
    async fn save(&self, customer: &CanonicalCustomer)
        -> std::result::Result<Customer, RepositoryError>;
}
