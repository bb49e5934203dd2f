//! Real transport failures for classification tests

use std::time::Duration;

use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

use crate::error::ClientError;

/// A request that outlives its client timeout
pub async fn timeout_error() -> ClientError {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    match client.get(server.uri()).send().await {
        Err(e) => ClientError::from(e),
        Ok(_) => panic!("request should have timed out"),
    }
}

/// A request to a port nothing listens on
pub async fn transport_error() -> ClientError {
    match reqwest::get("http://127.0.0.1:1/").await {
        Err(e) => ClientError::from(e),
        Ok(_) => panic!("connection should have been refused"),
    }
}
