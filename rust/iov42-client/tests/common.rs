#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use iov42_client::{Client, ClientConfig};
use iov42_credentials::{EcdsaCredentials, Ed25519Credentials};
use iov42_protocol::{Identity, PublicCredentials};
use wiremock::MockServer;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, ResponseTemplate};

pub const SUMMARY: &str =
    r#"{"requestId":"r1","resources":["/api/v1/identities/alice"],"proof":"/api/v1/proofs/r1"}"#;

pub fn ecdsa(id: &str, seed: u8) -> Identity {
    Identity::new(id, Arc::new(EcdsaCredentials::import(&[seed; 32]).unwrap()))
}

pub fn ed25519(id: &str, seed: u8) -> Identity {
    Identity::new(id, Arc::new(Ed25519Credentials::import(&[seed; 32]).unwrap()))
}

pub fn keys(identities: &[&Identity]) -> HashMap<String, PublicCredentials> {
    identities
        .iter()
        .map(|identity| (identity.id().to_string(), identity.public_credentials()))
        .collect()
}

pub fn config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}/api/v1", mock_server.uri())).with_timeout(5)
}

pub fn create_test_client(mock_server: &MockServer, identity: Identity) -> Client {
    Client::new(config(mock_server), identity).expect("failed to create client")
}

/// Accept any write and answer with a processed summary.
pub async fn accept_writes(mock_server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path_regex("^/api/v1/requests/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SUMMARY))
        .mount(mock_server)
        .await;
}

pub fn header_value<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
}

pub async fn requests_with_method(mock_server: &MockServer, verb: &str) -> Vec<wiremock::Request> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == verb)
        .collect()
}
