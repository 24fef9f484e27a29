//! # Mealie HTTP Client
//!
//! A direct client for the Mealie REST API. Every method issues one request
//! (a few composite helpers issue a short fixed sequence) and hands back the
//! response body as JSON.
//!
//! ## Modules
//!
//! - [`auth`] - API key credential and the bearer header built from it
//! - [`client`] - The HTTP client and all endpoint methods
//! - [`types`] - Request payloads, filters and the typed recipe views
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use mcp_mealie::client::{auth::ApiKey, MealieClient, RecipeFilter};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let base_url = "https://mealie.example.com".parse()?;
//! let client = MealieClient::new(&base_url, ApiKey::new("token"), Duration::from_secs(30))?;
//!
//! let filter = RecipeFilter { search: Some("pasta".into()), ..Default::default() };
//! let recipes = client.get_recipes(&filter).await?;
//! println!("{}", serde_json::to_string_pretty(&recipes)?);
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod types;

pub use client::MealieClient;
pub use types::*;
