//! Paginated search tests against an in-memory directory.
//!
//! These tests cover:
//! - Default port and page size
//! - Cookie round-trips across pages and the last-page conditions
//! - Result cap, coercion and attribute order
//! - Cancellation between and during page requests
//! - Failure reporting and connection release on every path

mod common;

use std::time::Duration;

use common::*;
use dirtasks_connector::prelude::*;
use tokio_util::sync::CancellationToken;

fn users_spec() -> SearchRequestSpec {
    SearchRequestSpec::new(
        "OU=Users,DC=example,DC=com",
        Scope::Subtree,
        "(objectClass=user)",
    )
}

fn guid_for(index: u8) -> String {
    format!("001122{:02x}-4455-6677-8899-aabbccddeeff", index)
}

#[tokio::test]
async fn test_port_zero_connects_on_389() {
    let client = FakeDirectory::new().with_paged_entries(user_entries(1), 10);
    let recorder = client.recorder();

    let config = test_config().with_port(0);
    search_objects(client, &config, &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.connects, vec!["ldap://dc01.example.com:389".to_string()]);
}

#[tokio::test]
async fn test_ldaps_url_keeps_explicit_port() {
    let client = FakeDirectory::new();
    let recorder = client.recorder();

    let config = test_config()
        .with_tls_mode(TlsMode::Ldaps)
        .with_port(636);
    search_objects(client, &config, &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        recorder.lock().unwrap().connects,
        vec!["ldaps://dc01.example.com:636".to_string()]
    );
}

#[tokio::test]
async fn test_non_positive_page_size_uses_default() {
    for page_size in [0, -5] {
        let client = FakeDirectory::new().with_paged_entries(user_entries(3), 3);
        let recorder = client.recorder();

        let spec = users_spec().with_page_size(page_size);
        search_objects(client, &test_config(), &spec, &CancellationToken::new())
            .await
            .unwrap();

        let recorder = recorder.lock().unwrap();
        assert_eq!(recorder.pages.len(), 1);
        assert_eq!(recorder.pages[0].page_size, DEFAULT_PAGE_SIZE);
    }
}

#[tokio::test]
async fn test_collects_all_pages_in_order() {
    let client = FakeDirectory::new().with_paged_entries(user_entries(7), 3);
    let recorder = client.recorder();

    let spec = users_spec().with_page_size(3);
    let outcome = search_objects(client, &test_config(), &spec, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.entries.len(), 7);
    let dns: Vec<_> = outcome
        .entries
        .iter()
        .map(|e| e.distinguished_name.as_str())
        .collect();
    assert_eq!(dns[0], "CN=User 1,OU=Users,DC=example,DC=com");
    assert_eq!(dns[6], "CN=User 7,OU=Users,DC=example,DC=com");

    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.pages.len(), 3);
    // The first request carries an empty cookie; later ones echo the server's.
    assert!(recorder.pages[0].cookie.is_empty());
    assert_eq!(recorder.pages[1].cookie, b"cookie-1".to_vec());
    assert_eq!(recorder.pages[2].cookie, b"cookie-2".to_vec());
    assert!(recorder.pages.iter().all(|p| p.page_size == 3));
}

#[tokio::test]
async fn test_search_is_repeatable() {
    let spec = users_spec()
        .with_page_size(2)
        .with_attribute(AttributeSpec::guid("objectGUID"));

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let client = FakeDirectory::new().with_paged_entries(user_entries(5), 2);
        outcomes.push(
            search_objects(client, &test_config(), &spec, &CancellationToken::new())
                .await
                .unwrap(),
        );
    }

    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn test_missing_paging_control_ends_search() {
    let client = FakeDirectory::new()
        .with_page(PageResponse {
            entries: user_entries(2),
            cursor: None,
        })
        .with_paged_entries(user_entries(2), 2);
    let recorder = client.recorder();

    let outcome = search_objects(client, &test_config(), &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(recorder.lock().unwrap().pages.len(), 1);
}

#[tokio::test]
async fn test_empty_result_set() {
    let client = FakeDirectory::new().with_page(PageResponse {
        entries: vec![],
        cursor: Some(PageCursor::start()),
    });

    let outcome = search_objects(client, &test_config(), &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.entries.is_empty());
}

#[tokio::test]
async fn test_max_results_stops_paging() {
    let client = FakeDirectory::new().with_paged_entries(user_entries(9), 3);
    let recorder = client.recorder();

    let spec = users_spec().with_page_size(3).with_max_results(4);
    let outcome = search_objects(client, &test_config(), &spec, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.entries.len(), 4);
    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.pages.len(), 2);
    assert_eq!(recorder.closes, 1);
}

#[tokio::test]
async fn test_cancel_after_first_page_issues_no_more_requests() {
    let token = CancellationToken::new();
    let client = FakeDirectory::new()
        .with_paged_entries(user_entries(9), 3)
        .cancelling_after_page(1, token.clone());
    let recorder = client.recorder();

    let spec = users_spec().with_page_size(3);
    let err = search_objects(client, &test_config(), &spec, &token)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.pages.len(), 1);
    assert_eq!(recorder.closes, 1);
}

#[tokio::test]
async fn test_cancel_during_in_flight_page() {
    let token = CancellationToken::new();
    let client = FakeDirectory::new()
        .with_paged_entries(user_entries(6), 3)
        .hanging_on_page(2);
    let recorder = client.recorder();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let spec = users_spec().with_page_size(3);
    let err = tokio::time::timeout(
        Duration::from_secs(5),
        search_objects(client, &test_config(), &spec, &token),
    )
    .await
    .expect("search did not observe cancellation")
    .unwrap_err();

    assert!(err.is_cancelled());
    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.pages.len(), 2);
    assert_eq!(recorder.closes, 1);
}

#[tokio::test]
async fn test_cancelled_before_start_never_connects() {
    let token = CancellationToken::new();
    token.cancel();

    let client = FakeDirectory::new().with_paged_entries(user_entries(3), 3);
    let recorder = client.recorder();

    let err = search_objects(client, &test_config(), &users_spec(), &token)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(recorder.lock().unwrap().connects.is_empty());
}

#[tokio::test]
async fn test_empty_host_fails_before_connect() {
    let client = FakeDirectory::new();
    let recorder = client.recorder();

    let config = ConnectionConfig::new("").with_credentials("user", "pass");
    let err = search_objects(client, &config, &users_spec(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    let recorder = recorder.lock().unwrap();
    assert!(recorder.connects.is_empty());
    assert_eq!(recorder.closes, 0);
}

#[tokio::test]
async fn test_missing_password_fails_before_connect() {
    let client = FakeDirectory::new();
    let recorder = client.recorder();

    let mut config = test_config();
    config.password = None;
    let err = search_objects(client, &config, &users_spec(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid configuration: password is missing");
    assert!(recorder.lock().unwrap().connects.is_empty());
}

#[tokio::test]
async fn test_anonymous_bind_sends_no_credentials() {
    let client = FakeDirectory::new();
    let recorder = client.recorder();

    let config = ConnectionConfig::new("dc01.example.com").with_anonymous_bind();
    search_objects(client, &config, &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        recorder.lock().unwrap().binds,
        vec![BindCredentials::Anonymous]
    );
}

#[tokio::test]
async fn test_bind_failure_is_reported_and_connection_closed() {
    let client = FakeDirectory::new()
        .failing_bind(|| ConnectorError::authentication_failed("invalid credentials (rc=49)"));
    let recorder = client.recorder();

    let outcome = search_objects(client, &test_config(), &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.entries.is_empty());
    assert_eq!(
        outcome.error.as_deref(),
        Some("authentication failed: invalid credentials (rc=49)")
    );
    let recorder = recorder.lock().unwrap();
    assert!(recorder.pages.is_empty());
    assert_eq!(recorder.closes, 1);
}

#[tokio::test]
async fn test_connect_failure_is_reported() {
    let client = FakeDirectory::new()
        .failing_connect(|| ConnectorError::connection_failed("connection refused"));
    let recorder = client.recorder();

    let outcome = search_objects(client, &test_config(), &users_spec(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("connection failed: connection refused"));
    let recorder = recorder.lock().unwrap();
    assert!(recorder.binds.is_empty());
    assert_eq!(recorder.closes, 1);
}

#[tokio::test]
async fn test_mid_search_failure_discards_partial_entries() {
    let client = FakeDirectory::new()
        .with_paged_entries(user_entries(6), 2)
        .failing_page(2, || ConnectorError::operation_failed("busy (rc=51)"));
    let recorder = client.recorder();

    let spec = users_spec().with_page_size(2);
    let outcome = search_objects(client, &test_config(), &spec, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.entries.is_empty());
    assert_eq!(recorder.lock().unwrap().closes, 1);
}

#[tokio::test]
async fn test_malformed_guid_fails_search() {
    let entry = RawEntry {
        dn: "CN=Broken,DC=example,DC=com".to_string(),
        attributes: vec![RawAttribute::new("objectGUID", vec![vec![0x01, 0x02]])],
    };
    let client = FakeDirectory::new().with_page(PageResponse {
        entries: vec![entry],
        cursor: None,
    });

    let spec = users_spec().with_attribute(AttributeSpec::guid("objectGUID"));
    let outcome = search_objects(client, &test_config(), &spec, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("objectGUID"));
}

#[tokio::test]
async fn test_requested_attributes_and_filter_reach_client() {
    let client = FakeDirectory::new();
    let recorder = client.recorder();

    let spec = SearchRequestSpec::new("DC=example,DC=com", Scope::OneLevel, "  ")
        .with_attribute(AttributeSpec::string("cn"))
        .with_attribute(AttributeSpec::bytes("objectSid"));
    search_objects(client, &test_config(), &spec, &CancellationToken::new())
        .await
        .unwrap();

    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.pages[0].filter, "(objectClass=*)");
    assert_eq!(recorder.pages[0].attributes, vec!["cn", "objectSid"]);
    assert_eq!(recorder.pages[0].search_base, "DC=example,DC=com");
}

#[tokio::test]
async fn test_end_to_end_five_entries_in_pages_of_two() {
    let client = FakeDirectory::new().with_paged_entries(user_entries(5), 2);
    let recorder = client.recorder();

    let spec = users_spec()
        .with_page_size(2)
        .with_attribute(AttributeSpec::string("cn"))
        .with_attribute(AttributeSpec::string("memberOf"))
        .with_attribute(AttributeSpec::guid("objectGUID"));
    let config = ConnectionConfig::new("dc.example.com")
        .with_port(0)
        .with_credentials("u", "p");
    let outcome = search_objects(client, &config, &spec, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.entries.len(), 5);

    for (idx, entry) in outcome.entries.iter().enumerate() {
        let index = (idx + 1) as u8;
        let keys: Vec<_> = entry.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["cn", "memberOf", "objectGUID"]);

        assert_eq!(
            entry.get("cn").and_then(AttributeValue::as_scalar),
            Some(format!("User {}", index).as_str())
        );
        assert_eq!(entry.get("memberof").unwrap().as_strings().len(), 2);
        assert_eq!(
            entry.get("objectGUID").and_then(AttributeValue::as_scalar),
            Some(guid_for(index).as_str())
        );
    }

    let recorder = recorder.lock().unwrap();
    let page_numbers: Vec<u32> = recorder.pages.iter().map(|p| p.page_number).collect();
    assert_eq!(page_numbers, vec![1, 2, 3]);
    assert!(recorder.pages.iter().all(|p| p.page_size == 2));
    assert_eq!(recorder.connects, vec!["ldap://dc.example.com:389".to_string()]);
    assert_eq!(recorder.binds.len(), 1);
    assert_eq!(recorder.closes, 1);
}
