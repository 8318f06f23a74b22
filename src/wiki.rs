use std::collections::HashMap;

use serde::Deserialize;

use crate::http;
use crate::translate::{NameTranslator, Translation};

const API_URL: &str = "https://zh.wikipedia.org/w/api.php";

/// Translation collaborator backed by Wikipedia language links: look the name
/// up on zh-wiki and take the linked ja-wiki page title.
pub struct WikiTranslator {
    client: reqwest::blocking::Client,
}

impl WikiTranslator {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        WikiTranslator { client }
    }
}

impl NameTranslator for WikiTranslator {
    fn to_japanese(&self, name: &str) -> Option<Translation> {
        let url = format!(
            "{}?action=query&format=json&prop=langlinks&lllang=ja&redirects=1&titles={}",
            API_URL,
            urlencoding::encode(name)
        );
        tracing::debug!("Querying langlinks: {}", url);
        match http::get_text(&self.client, &url) {
            Ok(body) => parse_langlink(&body),
            Err(err) => {
                // Non-fatal: the caller falls back to the original name.
                tracing::debug!("Translation lookup failed: {}", err);
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct QueryReply {
    query: Option<Query>,
}

#[derive(Deserialize)]
struct Query {
    pages: HashMap<String, Page>,
}

#[derive(Deserialize)]
struct Page {
    langlinks: Option<Vec<LangLink>>,
}

#[derive(Deserialize)]
struct LangLink {
    lang: String,
    #[serde(rename = "*")]
    title: String,
}

fn parse_langlink(body: &str) -> Option<Translation> {
    let reply: QueryReply = serde_json::from_str(body).ok()?;
    reply
        .query?
        .pages
        .into_values()
        .filter_map(|page| page.langlinks)
        .flatten()
        .next()
        .map(|link| Translation {
            title: link.title,
            lang: link.lang,
        })
}
