use crate::domain::model::{CanonicalCustomer, Customer};
use crate::domain::ports::CustomerRepository;
use crate::utils::error::{ImportError, RepositoryError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;

/// Customer store reached over a REST API.
///
/// * `GET  {endpoint}/customers?email=...` answers 200 with the customer or 404.
/// * `POST {endpoint}/customers` takes the canonical customer and answers
///   200/201 with the stored customer.
pub struct HttpCustomerRepository {
    endpoint: String,
    client: Client,
}

impl HttpCustomerRepository {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        headers: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ImportError::InvalidConfigValueError {
                    field: "repository.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ImportError::InvalidConfigValueError {
                    field: format!("repository.headers.{}", name),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                }
            })?;
            header_map.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(header_map)
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn customers_url(&self) -> String {
        format!("{}/customers", self.endpoint)
    }
}

#[async_trait]
impl CustomerRepository for HttpCustomerRepository {
    async fn get(&self, email: &str) -> std::result::Result<Customer, RepositoryError> {
        tracing::debug!("GET {} email={}", self.customers_url(), email);
        let response = self
            .client
            .get(self.customers_url())
            .query(&[("email", email)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => response
                .json::<Customer>()
                .await
                .map_err(|e| RepositoryError::Unavailable(format!("invalid customer payload: {}", e))),
            StatusCode::NOT_FOUND => Err(RepositoryError::NotFound {
                email: email.to_string(),
            }),
            status => Err(RepositoryError::Unavailable(format!(
                "lookup returned HTTP {}",
                status
            ))),
        }
    }

    async fn save(
        &self,
        customer: &CanonicalCustomer,
    ) -> std::result::Result<Customer, RepositoryError> {
        tracing::debug!("POST {} email={}", self.customers_url(), customer.email);
        let response = self
            .client
            .post(self.customers_url())
            .json(customer)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Customer>()
                .await
                .map_err(|e| RepositoryError::Unavailable(format!("invalid customer payload: {}", e)));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Could not read error body from {}: {}", self.customers_url(), e);
                String::new()
            }
        };
        if status.is_client_error() {
            Err(RepositoryError::Rejected(format!("HTTP {}: {}", status, body)))
        } else {
            Err(RepositoryError::Unavailable(format!("HTTP {}: {}", status, body)))
        }
    }
}
