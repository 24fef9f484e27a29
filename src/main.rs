use mcp_mealie::config::{MealieConfig, Transport};
use mcp_mealie::server::MealieMcpServer;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout carries the stdio transport.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match MealieConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::error!("Please verify:");
            tracing::error!("  - MEALIE_BASE_URL points at your Mealie instance");
            tracing::error!("  - MEALIE_API_KEY holds an API token from your Mealie profile");
            tracing::error!("  - or both are provided in mealie-mcp.toml / MEALIE_MCP_CONFIG");
            std::process::exit(1);
        }
    };

    let server = MealieMcpServer::from_config(&config)?;

    tracing::info!("Checking connection to {}...", config.base_url);
    if let Err(e) = server.check_connection().await {
        tracing::warn!("Connection check failed: {}", e);
        tracing::warn!("Starting anyway; tool calls will fail until Mealie is reachable.");
    }

    match config.transport {
        Transport::Stdio => {
            tracing::info!("Starting Mealie MCP server on stdio");
            let service = server.serve(stdio()).await.inspect_err(|e| {
                tracing::error!("MCP serve error: {:?}", e);
            })?;
            service.waiting().await?;
        }
        Transport::Sse => {
            let sse_config = SseServerConfig {
                bind: config.bind_addr,
                sse_path: "/sse".to_string(),
                post_path: "/message".to_string(),
                ct: tokio_util::sync::CancellationToken::new(),
                sse_keep_alive: None,
            };

            tracing::info!("Mealie MCP server listening on {}", sse_config.bind);

            let sse_server = SseServer::serve_with_config(sse_config).await?;
            // Sessions share the one HTTP client behind the server's Arc.
            let ct = sse_server.with_service(move || server.clone());

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down...");
            ct.cancel();
        }
    }

    Ok(())
}
