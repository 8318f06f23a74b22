use serde::Deserialize;
use urlencoding::encode;

use crate::http;
use crate::provider::{Outcome, Payload, PreviewVideo, ProviderError, ProviderResult};

const API_URL: &str = "https://api.avgle.com/v1/search";

pub struct Avgle {
    client: reqwest::blocking::Client,
}

impl Avgle {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Avgle { client }
    }

    fn fetch_pv(&self, id: &str) -> ProviderResult {
        let url = format!("{}/{}/0?limit=1", API_URL, encode(id));
        tracing::debug!("Querying search API: {}", url);
        let body = http::get_text(&self.client, &url)?;

        let preview = parse_preview_url(&body)
            .map_err(|e| ProviderError::Transport(format!("bad API response: {}", e)))?
            .ok_or_else(|| ProviderError::not_found(format!("no video matching {}", id)))?;
        Ok(Payload::Text(preview))
    }
}

impl PreviewVideo for Avgle {
    fn pv_by_id(&self, id: &str) -> Outcome {
        Outcome::from_result(self.fetch_pv(id))
    }
}

#[derive(Deserialize)]
struct SearchReply {
    success: bool,
    response: Option<SearchResponse>,
}

#[derive(Deserialize)]
struct SearchResponse {
    videos: Vec<Video>,
}

#[derive(Deserialize)]
struct Video {
    preview_url: Option<String>,
}

fn parse_preview_url(body: &str) -> Result<Option<String>, serde_json::Error> {
    let reply: SearchReply = serde_json::from_str(body)?;
    if !reply.success {
        return Ok(None);
    }
    Ok(reply
        .response
        .and_then(|r| r.videos.into_iter().next())
        .and_then(|v| v.preview_url))
}
