mod common;

use std::time::Duration;

use common::{client_for, TestEnvironment, BEARER};
use mcp_mealie::MealieError;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[test_log::test(tokio::test)]
async fn test_api_key_sent_as_bearer_header() {
    let env = TestEnvironment::new().await;

    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .and(header("Authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "username": "chef" })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let user = env.client.get_current_user().await.unwrap();
    assert_eq!(user["username"], "chef");
}

#[test_log::test(tokio::test)]
async fn test_rejected_key_reports_unauthorized() {
    let env = TestEnvironment::new().await;

    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Not authenticated" })),
        )
        .mount(&env.mealie)
        .await;

    let err = env.client.get_current_user().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Not authenticated"));
}

#[test_log::test(tokio::test)]
async fn test_connection_check_reads_about_endpoint() {
    let env = TestEnvironment::new().await;

    Mock::given(method("GET"))
        .and(path("/api/app/about"))
        .and(header("Authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "v2.8.0" })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    env.server.check_connection().await.unwrap();
}

#[test_log::test(tokio::test)]
async fn test_connection_check_fails_when_unreachable() {
    // Nothing listens on the discard port.
    let client = client_for("http://127.0.0.1:9", Duration::from_secs(2));
    let err = client.about().await.unwrap_err();
    assert!(matches!(err, MealieError::Network { .. } | MealieError::Timeout { .. }));
}

#[test_log::test(tokio::test)]
async fn test_base_url_path_prefix_is_kept() {
    let env = TestEnvironment::new().await;
    let client = client_for(&format!("{}/mealie/", env.mealie.uri()), Duration::from_secs(5));

    Mock::given(method("GET"))
        .and(path("/mealie/api/groups/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "slug": "home" })))
        .expect(1)
        .mount(&env.mealie)
        .await;

    let group = client.get_current_group().await.unwrap();
    assert_eq!(group["slug"], "home");
}
