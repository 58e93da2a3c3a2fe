use crate::domain::model::Customer;
use crate::domain::ports::CustomerRepository;
use crate::utils::error::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Customer),
    NotFound,
    LookupFailed(String),
}

/// 依 email 查詢既有客戶，區分「不存在」與「查詢失敗」
pub async fn resolve<R>(email: &str, repository: &R) -> Lookup
where
    R: CustomerRepository + ?Sized,
{
    match repository.get(email).await {
        Ok(customer) => Lookup::Found(customer),
        Err(RepositoryError::NotFound { .. }) => Lookup::NotFound,
        Err(e) => {
            tracing::debug!("Lookup for {} failed: {}", email, e);
            Lookup::LookupFailed(e.to_string())
        }
    }
}
