use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::error::{DrTerpError, Result};

/// Per-host rate limiter using a simple last-request-time tracking approach.
/// Ensures at most `requests_per_second` requests per host.
pub struct RateLimiter {
    last_request: Mutex<HashMap<String, Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Result<Self> {
        if !(requests_per_second > 0.0) {
            return Err(DrTerpError::Config(format!(
                "requests_per_second must be positive, got {}",
                requests_per_second
            )));
        }
        let min_interval = Duration::try_from_secs_f64(1.0 / requests_per_second).map_err(|e| {
            DrTerpError::Config(format!(
                "requests_per_second {} is out of range: {}",
                requests_per_second, e
            ))
        })?;
        Ok(Self {
            last_request: Mutex::new(HashMap::new()),
            min_interval,
        })
    }

    /// Wait until enough time has elapsed since the last request to the same host.
    pub async fn wait_for_host(&self, url: &str) -> Result<()> {
        let host = Url::parse(url)
            .map_err(|e| DrTerpError::Http(format!("Failed to parse URL '{}': {}", url, e)))?
            .host_str()
            .ok_or_else(|| DrTerpError::Http(format!("No host in URL: {}", url)))?
            .to_string();

        // Reserve the slot before sleeping so concurrent callers queue up
        // behind each other instead of all waking at the same instant.
        let sleep_duration = {
            let mut map = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
            let now = Instant::now();
            let slot = match map.get(&host) {
                Some(last) if *last + self.min_interval > now => *last + self.min_interval,
                _ => now,
            };
            map.insert(host, slot);
            slot.saturating_duration_since(now)
        };

        if !sleep_duration.is_zero() {
            debug!("Rate limiting: sleeping {:?}", sleep_duration);
            tokio::time::sleep(sleep_duration).await;
        }
        Ok(())
    }
}

/// Build `<base>/<path>?k=v&...` with every value percent-encoded.
pub fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    for (i, (key, value)) in params.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

/// Rate-limited JSON client for the professor/grades API and the catalog.
pub struct ApiHttpClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl ApiHttpClient {
    /// Create a client from the configured user agent, timeout and rate.
    /// The config is validated first, so hand-built values are checked too.
    pub fn new(config: &Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| DrTerpError::Config(format!("{:#}", e)))?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DrTerpError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second)?,
        })
    }

    /// Fetch a URL and parse the body as JSON.
    /// Non-2xx statuses are errors; the body is not inspected in that case.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.rate_limiter.wait_for_host(url).await?;

        info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DrTerpError::Http(format!("Failed to fetch '{}': {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DrTerpError::Http(format!(
                "HTTP error fetching '{}': {} {}",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DrTerpError::Http(format!("Invalid JSON from '{}': {}", url, e)))
    }
}
