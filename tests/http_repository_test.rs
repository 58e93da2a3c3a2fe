use anyhow::Result;
use customer_import::core::CustomerRepository;
use customer_import::domain::model::{CanonicalCustomer, FailureStage, RecordOutcome};
use customer_import::utils::error::RepositoryError;
use customer_import::{HttpCustomerRepository, ImportConfig, ImportRunner, LocalStorage};
use httpmock::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn repository(server: &MockServer) -> HttpCustomerRepository {
    HttpCustomerRepository::new(&server.base_url(), Duration::from_secs(5), &HashMap::new())
        .expect("client should build")
}

fn ann() -> CanonicalCustomer {
    CanonicalCustomer {
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        email: "a@x.com".to_string(),
        website_id: 1,
        group_id: 1,
    }
}

#[tokio::test]
async fn test_get_existing_customer() -> Result<()> {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "a@x.com");
            then.status(200).json_body(serde_json::json!({
                "id": 42,
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "a@x.com",
                "website_id": 1,
                "group_id": 1
            }));
        })
        .await;

    let customer = repository(&server).get("a@x.com").await?;

    lookup.assert_async().await;
    assert_eq!(customer.id, 42);
    assert_eq!(customer.data, ann());
    Ok(())
}

#[tokio::test]
async fn test_get_404_is_not_found_and_500_is_unavailable() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "new@x.com");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "a@x.com");
            then.status(503);
        })
        .await;

    let repository = repository(&server);

    assert_eq!(
        repository.get("new@x.com").await,
        Err(RepositoryError::NotFound {
            email: "new@x.com".to_string()
        })
    );
    assert!(matches!(
        repository.get("a@x.com").await,
        Err(RepositoryError::Unavailable(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_save_posts_canonical_customer() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/customers").json_body(serde_json::json!({
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "a@x.com",
                "website_id": 1,
                "group_id": 1
            }));
            then.status(201).json_body(serde_json::json!({
                "id": 7,
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "a@x.com",
                "website_id": 1,
                "group_id": 1
            }));
        })
        .await;

    let stored = repository(&server).save(&ann()).await?;

    create.assert_async().await;
    assert_eq!(stored.id, 7);
    Ok(())
}

#[tokio::test]
async fn test_save_client_error_is_rejected() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/customers");
            then.status(422).body("email is invalid");
        })
        .await;

    let err = repository(&server).save(&ann()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Rejected(ref msg) if msg.contains("email is invalid")));
    Ok(())
}

#[tokio::test]
async fn test_configured_headers_are_sent() -> Result<()> {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/customers")
                .header("Authorization", "Bearer secret");
            then.status(404);
        })
        .await;

    let headers = HashMap::from([("Authorization".to_string(), "Bearer secret".to_string())]);
    let repository = HttpCustomerRepository::new(
        &format!("{}/", server.base_url()),
        Duration::from_secs(5),
        &headers,
    )?;

    assert!(matches!(
        repository.get("a@x.com").await,
        Err(RepositoryError::NotFound { .. })
    ));
    lookup.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_lookup_failure_never_reaches_save() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("customers.csv");
    std::fs::write(
        &source,
        "emailaddress,fname,lname\na@x.com,Ann,Lee\nb@x.com,Bob,Ray\n",
    )?;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "a@x.com");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "b@x.com");
            then.status(404);
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/customers");
            then.status(201).json_body(serde_json::json!({
                "id": 2,
                "first_name": "Bob",
                "last_name": "Ray",
                "email": "b@x.com",
                "website_id": 1,
                "group_id": 1
            }));
        })
        .await;

    let runner = ImportRunner::new(
        LocalStorage::default(),
        repository(&server),
        ImportConfig::default(),
    );
    let summary = runner.run("default", source.to_str().unwrap()).await?;

    assert!(summary.records[0].outcome.is_failed());
    assert_eq!(summary.records[1].outcome, RecordOutcome::Created { id: 2 });
    assert_eq!(create.hits_async().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_lookup_timeout_fails_only_that_record() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("customers.csv");
    std::fs::write(
        &source,
        "emailaddress,fname,lname\nslow@x.com,Sam,Low\nb@x.com,Bob,Ray\n",
    )?;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "slow@x.com");
            then.status(404).delay(Duration::from_secs(3));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/customers").query_param("email", "b@x.com");
            then.status(404);
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/customers");
            then.status(201).json_body(serde_json::json!({
                "id": 9,
                "first_name": "Bob",
                "last_name": "Ray",
                "email": "b@x.com",
                "website_id": 1,
                "group_id": 1
            }));
        })
        .await;

    let repository =
        HttpCustomerRepository::new(&server.base_url(), Duration::from_secs(1), &HashMap::new())?;
    let runner = ImportRunner::new(LocalStorage::default(), repository, ImportConfig::default());
    let summary = runner.run("default", source.to_str().unwrap()).await?;

    assert!(matches!(
        summary.records[0].outcome,
        RecordOutcome::Failed {
            stage: FailureStage::Lookup,
            ..
        }
    ));
    assert_eq!(summary.records[1].outcome, RecordOutcome::Created { id: 9 });
    assert_eq!(create.hits_async().await, 1);
    Ok(())
}
