use crate::shared::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Attempts per request before a transport failure is reported
pub const MAX_ATTEMPTS: u32 = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base delay between attempts; attempt `n` waits `n` times this
const RETRY_DELAY: Duration = Duration::from_millis(200);

/// Builds the shared async HTTP client with the tool's user agent
pub fn build_client() -> Result<reqwest::Client> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Runs `operation` up to [`MAX_ATTEMPTS`] times with linear backoff
///
/// Only `Err` results are retried; HTTP statuses the caller inspects are
/// returned on the first answer.
pub async fn with_retry<T, F, Fut>(label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS => {
                debug!(request = %label, attempt, error = %e, "request failed, retrying");
                tokio::time::sleep(RETRY_DELAY * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e.context(format!("{} failed after {} attempts", label, attempt))),
        }
    }
}

/// Trims trailing slashes from a configured base URL
pub fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
