//! Async typed client for the Notion REST API.
//!
//! The crate is organised as a validated, retry-aware request pipeline:
//! a [`Request`] describes one logical operation, [`NotionClient`] executes
//! it against the API with bounded exponential backoff, and the response
//! body is validated into a typed record before it reaches the caller.
//!
//! ```no_run
//! use notion_client::{Config, NotionClient, Request};
//! use serde_json::Value;
//!
//! # async fn run() -> Result<(), notion_client::Error> {
//! let client = NotionClient::new(&Config::from_env()?)?;
//! let me: Value = client.execute(Request::get("/v1/users/me")).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod boxed;
pub mod config;
pub mod environment;
pub mod error;
pub mod models;

pub use api::{NotionClient, Request, RetryConfig};
pub use config::{Config, Token};
pub use error::Error;
pub use models::ObjectList;
