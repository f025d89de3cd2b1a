//! HTTP client configuration for the LLM backend

use reqwest::Client;
use std::time::Duration;

/// Connection-level settings for the shared `reqwest` client.
///
/// The client is built once at startup and handed to the LLM backend;
/// `reqwest::Client` is internally reference-counted, so clones share the
/// same connection pool.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Some(Duration::from_secs(60)),
        }
    }
}

impl HttpConfig {
    /// Settings derived from the overall request timeout
    pub fn with_request_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            connect_timeout: request_timeout.min(Duration::from_secs(10)),
            ..Default::default()
        }
    }

    /// Build a client from this configuration
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .use_rustls_tls()
            .user_agent(format!("promptlift/{}", env!("CARGO_PKG_VERSION")));

        if let Some(keepalive) = self.tcp_keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }

        builder.build()
    }
}
