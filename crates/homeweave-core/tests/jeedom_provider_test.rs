#![allow(clippy::unwrap_used)]
// End-to-end: registry-created adapter over HTTP against a mock controller.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use homeweave_core::{
    Capability, CapabilityParams, ConnectionConfig, CoreError, ProviderRegistry, StateSource,
};

const RPC: &str = "/core/api/jeeApi.php";

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": "1", "result": result }))
}

async fn mount(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(RPC))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ok(result))
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("test-key".to_string()),
    )
}

#[tokio::test]
async fn test_list_and_drive_a_light() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eqLogic::all",
        json!([{ "id": "13", "name": "Salon", "eqType_name": "virtual", "isEnable": "1", "isVisible": "1" }]),
    )
    .await;
    mount(
        &server,
        "cmd::byEqLogicId",
        json!([
            { "id": "101", "name": "On", "type": "action", "subType": "other", "generic_type": "LIGHT_ON" },
            { "id": "102", "name": "Etat", "type": "info", "subType": "binary", "generic_type": "LIGHT_STATE" },
            { "id": "105", "name": "Intensité", "type": "action", "subType": "slider",
              "generic_type": "LIGHT_SLIDER", "configuration": { "minValue": 0, "maxValue": 99 } }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(RPC))
        .and(body_partial_json(json!({
            "method": "cmd::execCmd",
            "params": { "apikey": "test-key", "id": 105, "options": { "slider": 50 } }
        })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC))
        .and(body_partial_json(json!({ "method": "cmd::execCmd", "params": { "id": 102 } })))
        .respond_with(ok(json!("1")))
        .mount(&server)
        .await;

    let provider = ProviderRegistry::default()
        .create("jeedom", config(&server))
        .unwrap();

    assert!(provider.connect().await);

    let devices = provider.list_devices().await;
    assert_eq!(devices.len(), 1);
    assert!(devices[0].capabilities.dim);
    assert!(!devices[0].capabilities.toggle);

    let invocation = provider
        .execute_capability("13", Capability::Dim, &CapabilityParams::with_value(50))
        .await
        .unwrap();
    assert_eq!(invocation.command_id, "105");
    assert_eq!(invocation.slider, Some(50));

    let state = provider.get_device_state("13").await;
    assert_eq!(state.on, Some(true));
    assert_eq!(state.source, Some(StateSource::ExecCmd));
}

#[tokio::test]
async fn test_controller_errors_surface_on_execute() {
    let server = MockServer::start().await;
    mount(
        &server,
        "cmd::byEqLogicId",
        json!([{ "id": "101", "name": "On", "type": "action", "generic_type": "LIGHT_ON" }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(RPC))
        .and(body_partial_json(json!({ "method": "cmd::execCmd" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": "1",
            "error": { "code": -32001, "message": "Vous n'êtes pas autorisé" }
        })))
        .mount(&server)
        .await;

    let provider = ProviderRegistry::default()
        .create("jeedom", config(&server))
        .unwrap();

    let err = provider
        .execute_capability("13", Capability::On, &CapabilityParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Transport { ref message } if message.contains("-32001")));
}

#[tokio::test]
async fn test_unreachable_controller_connect_is_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = ProviderRegistry::default()
        .create("jeedom", config(&server))
        .unwrap();

    assert!(!provider.connect().await);
    assert!(provider.list_devices().await.is_empty());
    assert!(provider.get_device_state("13").await.is_unknown());
}
