use anyhow::{Context, Result};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const TIMEOUT_SECS: u64 = 15;

/// Build the blocking client every provider shares. An empty proxy address
/// means direct connection.
pub fn client(proxy_addr: &str) -> Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(TIMEOUT_SECS));

    if !proxy_addr.is_empty() {
        let proxy = reqwest::Proxy::all(proxy_addr)
            .with_context(|| format!("Invalid proxy address: {}", proxy_addr))?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("Failed to build HTTP client")
}

/// GET a page and return its body, treating non-2xx statuses as errors that
/// carry the upstream code.
pub fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Transport(anyhow::Error::new(e)))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response
        .text()
        .map_err(|e| FetchError::Transport(anyhow::Error::new(e)))
}

/// Fetch failure split by what the dispatcher should report: the upstream
/// status code when we got one, 502 otherwise.
#[derive(Debug)]
pub enum FetchError {
    Status(u16),
    Transport(anyhow::Error),
}

impl FetchError {
    pub fn code(&self) -> u16 {
        match self {
            FetchError::Status(code) => *code,
            FetchError::Transport(_) => 502,
        }
    }

    pub fn message(&self) -> String {
        match self {
            FetchError::Status(code) => format!("upstream returned {}", code),
            FetchError::Transport(err) => format!("{:#}", err),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for FetchError {}
