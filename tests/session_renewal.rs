#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{Value, json};
use std::net::TcpListener;
use std::sync::Arc;
use userhub::client::{ConfigOverrides, ConsoleConfig, Gateway};
use userhub::features::auth::{SessionState, SessionStore};
use userhub::features::mfa::{EnrollmentStep, MfaEnrollment};
use userhub::features::roles::RolesScreen;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVER_CODES: [&str; 8] = [
    "AAAA-1111", "BBBB-2222", "CCCC-3333", "DDDD-4444", "EEEE-5555", "FFFF-6666", "GGGG-7777",
    "HHHH-8888",
];

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn store_for(server: &MockServer) -> SessionStore {
    let config = ConsoleConfig::load(ConfigOverrides {
        api_base_url: Some(server.uri()),
        timeout_seconds: Some(5),
    });
    let state = Arc::new(SessionState::default());
    let gateway = Gateway::new(config, state.clone()).expect("gateway");
    SessionStore::with_parts(Arc::new(gateway), state)
}

fn me() -> Value {
    json!({
        "data": {
            "id": "u-1", "username": "ada", "email": "ada@example.com",
            "roles": ["ADMIN"], "status": "ACTIVE", "mfaEnabled": false
        }
    })
}

#[tokio::test]
async fn expired_session_is_renewed_transparently() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=rotated; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "content": [{ "id": "r-1", "name": "ADMIN", "system": true, "priority": 100 }],
                "totalElements": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let mut roles = RolesScreen::new();
    roles.refresh(store.gateway()).await?;

    assert_eq!(roles.roles().len(), 1);
    assert!(!store.take_login_redirect());
    Ok(())
}

#[tokio::test]
async fn failed_renewal_sends_the_operator_back_to_login() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/permissions"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.check_auth().await;
    assert!(store.is_authenticated());

    let result = store.gateway().get::<Value>("/permissions?page=0&size=100").await;
    assert!(result.is_err());
    assert!(!store.is_authenticated());
    assert!(store.take_login_redirect());
    Ok(())
}

#[tokio::test]
async fn mfa_enrollment_with_server_codes() -> anyhow::Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/mfa/setup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "secret": "JBSWY3DPEHPK3PXP", "qrUrl": "otpauth://totp/UserHub:ada?secret=JBSWY3DPEHPK3PXP" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/mfa/verify"))
        .and(body_json(json!({ "code": "123456", "secret": "JBSWY3DPEHPK3PXP" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "recoveryCodes": SERVER_CODES }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let mut enrollment = MfaEnrollment::begin(store.gateway()).await?;
    assert_eq!(enrollment.step(), EnrollmentStep::Setup);

    enrollment.confirm_scanned()?;
    enrollment.input_code("12 34 56 78");
    assert_eq!(enrollment.code(), "123456");
    enrollment.submit(store.gateway()).await?;

    assert_eq!(enrollment.step(), EnrollmentStep::Complete);
    assert_eq!(enrollment.recovery_codes(), SERVER_CODES);
    Ok(())
}
