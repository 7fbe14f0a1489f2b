use graphlink_core::{
    ErrorCode, GraphPlugin, GraphPluginOptions, GraphQueryOptions, LinkedAccount,
    MemoryAccountStore, ODataQuery, Session, MICROSOFT_PROVIDER_ID,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plugin_for(server: &MockServer) -> GraphPlugin {
    let store = Arc::new(MemoryAccountStore::new());
    store.insert(LinkedAccount::new("user-1", MICROSOFT_PROVIDER_ID).with_access_token("t"));
    GraphPlugin::new(
        GraphPluginOptions {
            debug_logs: false,
            base_url: server.uri(),
        },
        store,
    )
    .unwrap()
}

#[tokio::test]
async fn me_messages_decodes_typed_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "m1", "subject": "first", "isRead": true},
                {"id": "m2", "subject": "second", "isRead": false}
            ]
        })))
        .mount(&server)
        .await;

    let plugin = plugin_for(&server);
    let session = Session::authenticated("user-1");
    let result = plugin.me_messages(&session, None).await;

    assert!(result.success);
    assert_eq!(result.status_code, 200);
    let messages = result.data.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].subject.as_deref(), Some("first"));
    assert_eq!(messages[1].is_read, Some(false));
}

#[tokio::test]
async fn me_decodes_typed_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "displayName": "Ada Lovelace",
            "mail": "ada@example.com"
        })))
        .mount(&server)
        .await;

    let plugin = plugin_for(&server);
    let session = Session::authenticated("user-1");
    let result = plugin.me(&session, None).await;

    assert!(result.success);
    let user = result.data.unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(user.mail.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn me_drive_hits_drive_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/drive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d1",
            "driveType": "personal"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plugin = plugin_for(&server);
    let session = Session::authenticated("user-1");
    let result = plugin.me_drive(&session, None).await;

    assert!(result.success);
    assert_eq!(result.data.unwrap().drive_type.as_deref(), Some("personal"));
}

#[tokio::test]
async fn precondition_failures_surface_through_operations() {
    let server = MockServer::start().await;
    let plugin = plugin_for(&server);

    let result = plugin.me_events(&Session::anonymous(), None).await;
    assert!(!result.success);
    assert_eq!(result.status_code, 401);
    assert_eq!(result.error.unwrap().code, ErrorCode::AccountNotFound);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_options_yield_envelope_not_panic() {
    let server = MockServer::start().await;
    let plugin = plugin_for(&server);
    let session = Session::authenticated("user-1");

    let options = GraphQueryOptions {
        query: Some(ODataQuery {
            top: Some(0),
            ..Default::default()
        }),
        headers: None,
    };
    let result = plugin.me_contacts(&session, Some(options)).await;

    assert!(!result.success);
    assert_eq!(result.status_code, 400);
    let error = result.error.unwrap();
    assert_eq!(error.code, ErrorCode::GraphApiError);
    assert!(error.message.contains("$top"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn call_raw_dispatches_by_operation_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/calendar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c1"})))
        .mount(&server)
        .await;

    let plugin = plugin_for(&server);
    let session = Session::authenticated("user-1");

    let result = plugin
        .call_raw("me_calendar", &session, None)
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.data, Some(json!({"id": "c1"})));

    assert!(plugin.call_raw("me_inbox", &session, None).await.is_none());
}

#[tokio::test]
async fn upstream_auth_failures_map_per_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/contacts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let plugin = plugin_for(&server);
    let session = Session::authenticated("user-1");
    let result = plugin.me_contacts(&session, None).await;

    assert!(!result.success);
    assert_eq!(result.status_code, 401);
    assert_eq!(result.error.unwrap().code, ErrorCode::TokenExpired);
}
