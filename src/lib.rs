//! # Mealie MCP Library
//!
//! Exposes a [Mealie](https://mealie.io) recipe manager to AI assistants
//! through the Model Context Protocol (MCP).
//!
//! ## Client Module
//!
//! The [`client`] module is a direct HTTP client for the Mealie REST API:
//! recipes, foods, meal plans, shopping lists, the current user and group.
//!
//! ## Server Module
//!
//! The [`server`] module implements an MCP server that exposes the client as
//! tools, plus the prompts from [`prompts`].
//!
//! ## Configuration
//!
//! [`config::MealieConfig`] reads `MEALIE_BASE_URL` and `MEALIE_API_KEY`
//! (required) from the environment or a `mealie-mcp.toml` settings file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_mealie::{MealieConfig, MealieMcpServer};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = MealieConfig::load()?;
//! let server = MealieMcpServer::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prompts;
pub mod server;

pub use client::MealieClient;
pub use config::MealieConfig;
pub use error::MealieError;
pub use server::MealieMcpServer;
