//! Session operations against a mocked node, checked with real keys.

mod common;

use std::time::{Duration, Instant};

use common::*;
use iov42_client::{Client, IdentityInfo, Paging, ResponseResult, TransportError};
use iov42_credentials::ProtocolVerifier;
use iov42_protocol::headers::{
    AUTHENTICATION, AUTHORISATIONS, CLAIMS, decode_authentication, decode_authorisations,
};
use iov42_protocol::request::Transfer;
use iov42_protocol::{
    AuthenticationHeader, Authorisation, DecodeError, ProtocolId, SignatureVerifier, claim_hash,
    endorsement_content, verify_authentication, verify_authorisations, verify_disclosure,
    verify_read_authentication,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use testresult::TestResult;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn only_put(mock_server: &MockServer) -> wiremock::Request {
    let mut puts = requests_with_method(mock_server, "PUT").await;
    assert_eq!(puts.len(), 1);
    puts.remove(0)
}

fn signed_headers(
    request: &wiremock::Request,
) -> Result<(Vec<Authorisation>, AuthenticationHeader), DecodeError> {
    let authorisations = header_value(request, AUTHORISATIONS).unwrap_or_default();
    let authentication = header_value(request, AUTHENTICATION).unwrap_or_default();
    Ok((
        decode_authorisations(authorisations)?,
        decode_authentication(authentication)?,
    ))
}

fn signer_ids(authorisations: &[Authorisation]) -> Vec<&str> {
    authorisations
        .iter()
        .map(|authorisation| authorisation.identity_id.as_str())
        .collect()
}

#[tokio::test]
async fn test_issue_identity_is_self_signed() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let alice = ecdsa("alice", 1);
    let mut client = create_test_client(&mock_server, alice.clone());
    client.use_delegator("company");
    client.issue_identity().await?;

    let put = only_put(&mock_server).await;
    let body: Value = serde_json::from_slice(&put.body)?;
    assert_eq!(body["_type"], "IssueIdentityRequest");
    assert_eq!(body["identityId"], "alice");
    assert_eq!(body["publicCredentials"]["protocolId"], "SHA256WithECDSA");
    assert_eq!(
        put.url.path(),
        format!("/api/v1/requests/{}", body["requestId"].as_str().unwrap_or_default())
    );
    assert_eq!(header_value(&put, "content-type"), Some("application/json"));
    assert!(header_value(&put, CLAIMS).is_none());

    let (authorisations, authentication) = signed_headers(&put)?;
    assert_eq!(authorisations.len(), 1);
    assert_eq!(authorisations[0].identity_id, "alice");
    assert_eq!(authorisations[0].delegate_identity_id, None);
    assert_eq!(authentication.identity_id, "alice");

    let keys = keys(&[&alice]);
    assert!(verify_authorisations(&put.body, &authorisations, &keys, &ProtocolVerifier)?);
    assert!(verify_authentication(&authentication, &authorisations, &keys, &ProtocolVerifier)?);
    Ok(())
}

#[tokio::test]
async fn test_add_delegate_is_authorised_by_both_parties() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let company = ecdsa("company", 1);
    let employee = ed25519("employee", 2);
    let mut client = create_test_client(&mock_server, company.clone());
    client.add_delegate(&employee).await?;

    let put = only_put(&mock_server).await;
    let body: Value = serde_json::from_slice(&put.body)?;
    assert_eq!(body["_type"], "AddDelegateRequest");
    assert_eq!(body["delegatorIdentityId"], "company");
    assert_eq!(body["delegateIdentityId"], "employee");

    let (authorisations, _) = signed_headers(&put)?;
    assert_eq!(signer_ids(&authorisations), ["company", "employee"]);
    assert!(verify_authorisations(
        &put.body,
        &authorisations,
        &keys(&[&company, &employee]),
        &ProtocolVerifier
    )?);
    Ok(())
}

#[tokio::test]
async fn test_delegated_transfer() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let employee = ed25519("employee", 2);
    let mut client = create_test_client(&mock_server, employee.clone());
    client.use_delegator("company");
    assert_eq!(client.delegator(), Some("company"));

    let transfer = Transfer::Ownership {
        asset_id: "car-1".into(),
        asset_type_id: "cars".into(),
        from_identity_id: "company".into(),
        to_identity_id: "bob".into(),
    };
    client
        .transfer(vec![transfer], std::slice::from_ref(&employee))
        .await?;

    let put = only_put(&mock_server).await;
    let (authorisations, authentication) = signed_headers(&put)?;
    assert_eq!(authorisations[0].identity_id, "company");
    assert_eq!(authorisations[0].delegate_identity_id.as_deref(), Some("employee"));
    assert_eq!(authentication.identity_id, "company");
    assert_eq!(authentication.delegate_identity_id.as_deref(), Some("employee"));

    let keys = keys(&[&employee]);
    assert!(verify_authorisations(&put.body, &authorisations, &keys, &ProtocolVerifier)?);
    assert!(verify_authentication(&authentication, &authorisations, &keys, &ProtocolVerifier)?);

    client.stop_using_delegator();
    assert_eq!(client.delegator(), None);
    Ok(())
}

#[tokio::test]
async fn test_co_signed_transfer_keeps_signer_order() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let alice = ecdsa("alice", 1);
    let bob = ed25519("bob", 2);
    let mut client = create_test_client(&mock_server, alice.clone());
    let transfer = Transfer::Quantity {
        asset_type_id: "euro".into(),
        from_asset_id: "alice-account".into(),
        to_asset_id: "bob-account".into(),
        quantity: "100".into(),
    };
    client
        .transfer(vec![transfer], &[alice.clone(), bob.clone()])
        .await?;

    let put = only_put(&mock_server).await;
    let (authorisations, authentication) = signed_headers(&put)?;
    assert_eq!(signer_ids(&authorisations), ["alice", "bob"]);
    assert_eq!(authentication.identity_id, "alice");

    let keys = keys(&[&alice, &bob]);
    assert!(verify_authentication(&authentication, &authorisations, &keys, &ProtocolVerifier)?);
    let reversed: Vec<_> = authorisations.iter().rev().cloned().collect();
    assert!(!verify_authentication(&authentication, &reversed, &keys, &ProtocolVerifier)?);
    Ok(())
}

#[tokio::test]
async fn test_claims_are_disclosed_beside_their_hashes() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let mut client = create_test_client(&mock_server, ecdsa("alice", 1));
    client
        .create_identity_claims("alice", ["name: Alice", "born: 1990"])
        .await?;

    let put = only_put(&mock_server).await;
    let body: Value = serde_json::from_slice(&put.body)?;
    assert_eq!(body["_type"], "CreateIdentityClaimsRequest");
    assert_eq!(body["subjectId"], "alice");
    assert_eq!(
        body["claims"],
        serde_json::json!([claim_hash("name: Alice").as_str(), claim_hash("born: 1990").as_str()])
    );

    let disclosed = verify_disclosure(header_value(&put, CLAIMS).unwrap_or_default())?;
    let mut plaintext: Vec<_> = disclosed.iter().map(|c| c.plaintext.as_str()).collect();
    plaintext.sort();
    assert_eq!(plaintext, ["born: 1990", "name: Alice"]);
    Ok(())
}

#[tokio::test]
async fn test_asset_endorsements_sign_typed_content() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let owner = ecdsa("owner", 1);
    let notary = ed25519("notary", 3);
    let mut client = create_test_client(&mock_server, owner.clone());
    client
        .endorse_asset_claims("car-1", "cars", ["colour: red"], &notary)
        .await?;

    let put = only_put(&mock_server).await;
    let body: Value = serde_json::from_slice(&put.body)?;
    assert_eq!(body["_type"], "CreateAssetEndorsementsRequest");
    assert_eq!(body["endorserId"], "notary");
    assert_eq!(body["subjectTypeId"], "cars");

    let hash = claim_hash("colour: red");
    let signature = serde_json::from_value(body["endorsements"][hash.as_str()].clone())?;
    let content = endorsement_content("car-1", Some("cars"), &hash);
    assert!(ProtocolVerifier.verify(
        ProtocolId::Ed25519,
        &notary.public_credentials().key,
        &signature,
        content.as_bytes(),
    )?);

    let (authorisations, authentication) = signed_headers(&put)?;
    assert_eq!(authorisations[0].identity_id, "notary");
    assert_eq!(authentication.identity_id, "owner");
    assert!(verify_authentication(
        &authentication,
        &authorisations,
        &keys(&[&owner, &notary]),
        &ProtocolVerifier
    )?);
    assert!(header_value(&put, CLAIMS).is_some());
    Ok(())
}

#[tokio::test]
async fn test_identity_endorsements_omit_subject_type() -> TestResult {
    let mock_server = MockServer::start().await;
    accept_writes(&mock_server).await;

    let notary = ecdsa("notary", 3);
    let mut client = create_test_client(&mock_server, notary.clone());
    client
        .endorse_identity_claims("alice", ["over 18"], &notary)
        .await?;

    let put = only_put(&mock_server).await;
    let body: Value = serde_json::from_slice(&put.body)?;
    assert_eq!(body["_type"], "CreateIdentityEndorsementsRequest");
    assert!(body.get("subjectTypeId").is_none());

    let hash = claim_hash("over 18");
    let signature = serde_json::from_value(body["endorsements"][hash.as_str()].clone())?;
    assert!(ProtocolVerifier.verify(
        ProtocolId::Sha256WithEcdsa,
        &notary.public_credentials().key,
        &signature,
        endorsement_content("alice", None, &hash).as_bytes(),
    )?);
    Ok(())
}

#[tokio::test]
async fn test_reads_are_signed_over_path_and_query() -> TestResult {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/identities/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"identityId":"alice","publicCredentials":[]}"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/identities/alice/claims"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let alice = ecdsa("alice", 1);
    let mut client = create_test_client(&mock_server, alice.clone());
    let identity = client.get_identity("alice").await?;
    assert_eq!(
        identity.value,
        Some(IdentityInfo {
            identity_id: "alice".into(),
            public_credentials: vec![],
        })
    );

    let claims: ResponseResult<Vec<Value>> = client
        .read("identities/alice/claims", &Paging::limit(20).with_next("cursor"))
        .await?;
    assert_eq!(claims.value, Some(vec![]));

    let keys = keys(&[&alice]);
    let gets = requests_with_method(&mock_server, "GET").await;
    let expected = [
        "/api/v1/identities/alice",
        "/api/v1/identities/alice/claims?limit=20&next=cursor",
    ];
    for (request, path_and_query) in gets.iter().zip(expected) {
        let header = header_value(request, AUTHENTICATION).unwrap_or_default();
        let authentication = decode_authentication(header)?;
        assert!(verify_read_authentication(
            &authentication,
            path_and_query,
            &keys,
            &ProtocolVerifier
        )?);
    }
    Ok(())
}

#[tokio::test]
async fn test_first_read_after_write_is_delayed_once() -> TestResult {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SUMMARY)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/node-info"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"nodeId":"node-1"}"#))
        .mount(&mock_server)
        .await;

    let delay = Duration::from_millis(500);
    let mut client = Client::new(
        config(&mock_server).with_consistency_delay(delay),
        ecdsa("alice", 1),
    )?;

    client.issue_identity().await?;
    assert!(client.consistency_window().is_pending());

    let started = Instant::now();
    let node = client.node_info().await?;
    assert!(started.elapsed() >= delay);
    assert_eq!(node.value.map(|info| info.node_id), Some("node-1".to_string()));
    assert!(!client.consistency_window().is_pending());
    Ok(())
}

#[tokio::test]
async fn test_committed_write_with_unreadable_body_still_opens_window() -> TestResult {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server, ecdsa("alice", 1));
    let result = client.issue_identity().await;

    assert!(matches!(result, Err(TransportError::Decode { status: 200, .. })));
    assert!(client.consistency_window().is_pending());
    Ok(())
}
