use crate::domain::model::{CanonicalCustomer, Customer};
use crate::domain::ports::CustomerRepository;
use crate::utils::error::RepositoryError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process customer store. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<Mutex<Vec<Customer>>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.customers.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.customers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.customers.lock().await.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get(&self, email: &str) -> Result<Customer, RepositoryError> {
        let customers = self.customers.lock().await;
        customers
            .iter()
            .find(|c| c.data.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                email: email.to_string(),
            })
    }

    async fn save(&self, customer: &CanonicalCustomer) -> Result<Customer, RepositoryError> {
        let mut customers = self.customers.lock().await;
        if customers.iter().any(|c| c.data.email == customer.email) {
            return Err(RepositoryError::Rejected(format!(
                "a customer with email {} already exists",
                customer.email
            )));
        }

        let stored = Customer {
            id: customers.len() as u64 + 1,
            data: customer.clone(),
        };
        customers.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(email: &str) -> CanonicalCustomer {
        CanonicalCustomer {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: email.to_string(),
            website_id: 1,
            group_id: 1,
        }
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        tokio_test::block_on(async {
            let repository = InMemoryCustomerRepository::new();
            let first = repository.save(&customer("a@x.com")).await.unwrap();
            let second = repository.save(&customer("b@x.com")).await.unwrap();

            assert_eq!(first.id, 1);
            assert_eq!(second.id, 2);
            assert_eq!(repository.len().await, 2);
        });
    }

    #[test]
    fn test_get_missing_is_not_found() {
        tokio_test::block_on(async {
            let repository = InMemoryCustomerRepository::new();
            assert_eq!(
                repository.get("a@x.com").await,
                Err(RepositoryError::NotFound {
                    email: "a@x.com".to_string()
                })
            );
        });
    }

    #[test]
    fn test_duplicate_save_rejected() {
        tokio_test::block_on(async {
            let repository = InMemoryCustomerRepository::new();
            repository.save(&customer("a@x.com")).await.unwrap();
            let err = repository.save(&customer("a@x.com")).await.unwrap_err();
            assert!(matches!(err, RepositoryError::Rejected(_)));
        });
    }
}
