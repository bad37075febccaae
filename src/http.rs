//! Shared construction of outbound HTTP clients
//!
//! Every external call in the pipeline goes through a client built here:
//! a bounded per-call timeout and an explicit transient-retry policy,
//! both taken from configuration rather than library defaults.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

const USER_AGENT: &str = concat!("TripSmith/", env!("CARGO_PKG_VERSION"));

/// Build an outbound client with a per-call timeout and bounded retry
///
/// `max_retries` counts retries after the first attempt; transient
/// failures (5xx, timeouts, connect errors) are retried with backoff,
/// everything else fails immediately.
pub fn build_client(timeout_seconds: u64, max_retries: u32) -> Result<ClientWithMiddleware> {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
