#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use mcp_mealie::client::auth::ApiKey;
use mcp_mealie::{MealieClient, MealieMcpServer};
use rmcp::model::CallToolResult;
use serde_json::Value;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const BEARER: &str = "Bearer test-api-key";

/// A mock Mealie instance plus a client and MCP server pointed at it.
pub struct TestEnvironment {
    pub mealie: MockServer,
    pub client: Arc<MealieClient>,
    pub server: MealieMcpServer,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5)).await
    }

    pub async fn with_timeout(timeout: Duration) -> Self {
        let mealie = MockServer::start().await;
        let client = Arc::new(client_for(&mealie.uri(), timeout));
        let server = MealieMcpServer::new(client.clone());
        Self {
            mealie,
            client,
            server,
        }
    }
}

pub fn client_for(base_url: &str, timeout: Duration) -> MealieClient {
    let url: url::Url = base_url.parse().expect("mock server URI should parse");
    MealieClient::new(&url, ApiKey::new(TEST_API_KEY), timeout)
        .expect("client should build")
}

pub fn reply_json(result: &CallToolResult) -> Value {
    serde_json::to_value(result).expect("tool result should serialize")
}

pub fn is_error(result: &CallToolResult) -> bool {
    reply_json(result)["isError"] == Value::Bool(true)
}

/// Parses the JSON carried in the first text content of a tool reply.
pub fn reply_body(result: &CallToolResult) -> Value {
    let reply = reply_json(result);
    let text = reply["content"][0]["text"]
        .as_str()
        .expect("tool reply should carry text content");
    serde_json::from_str(text).expect("tool reply text should be JSON")
}
