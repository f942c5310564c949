//! Request pipeline: descriptors, retry policy and the HTTP client.

pub mod client;
pub mod request;
pub mod retry;

pub use client::NotionClient;
pub use request::Request;
pub use retry::RetryConfig;
