// src/events/providers/mod.rs
pub mod aljazeera_rss;
pub mod reddit;
pub mod wikimedia;

use anyhow::{bail, Context, Result};

/// Where a provider reads its payload from.
pub(crate) enum Mode {
    // Own copy, so fixtures need not be 'static.
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

/// GET an upstream body, treating non-2xx as an error.
pub(crate) async fn fetch_body(client: &reqwest::Client, url: &str, provider: &str) -> Result<String> {
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target: "events", error = ?e, provider, "provider http error");
            return Err(e).with_context(|| format!("{provider} http get()"));
        }
    };
    let status = resp.status();
    if !status.is_success() {
        bail!("{provider} responded with status {status}");
    }
    resp.text()
        .await
        .with_context(|| format!("{provider} http .text()"))
}
