//! Upstream Social Intelligence API client

mod client;
pub mod fallback;

pub use client::{HttpUpstreamClient, UpstreamClient, UpstreamConfig, API_KEY_HEADER};

#[cfg(test)]
pub use client::mock::MockUpstreamClient;
