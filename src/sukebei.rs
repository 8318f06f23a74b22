use scraper::{Html, Selector};
use urlencoding::encode;

use crate::http;
use crate::provider::{IdLookup, Outcome, Payload, ProviderError, ProviderResult};

const BASE_URL: &str = "https://sukebei.nyaa.si";

pub struct Sukebei {
    client: reqwest::blocking::Client,
}

impl Sukebei {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Sukebei { client }
    }

    fn fetch_av(&self, id: &str, nice_only: bool, uncensored_only: bool) -> ProviderResult {
        let url = format!("{}/?f=0&c=0_0&q={}", BASE_URL, encode(id));
        tracing::debug!("Searching torrents: {}", url);
        let html = http::get_text(&self.client, &url)?;

        let rows = filter_rows(parse_rows(&html), nice_only, uncensored_only);
        if rows.is_empty() {
            return Err(ProviderError::not_found(format!("no torrents for {}", id)));
        }

        Ok(Payload::Lines(
            rows.iter()
                .map(|row| format!("{} | {} | {}", row.name, row.size, row.magnet))
                .collect(),
        ))
    }
}

impl IdLookup for Sukebei {
    fn av_by_id(&self, id: &str, nice_only: bool, uncensored_only: bool) -> Outcome {
        Outcome::from_result(self.fetch_av(id, nice_only, uncensored_only))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TorrentRow {
    name: String,
    size: String,
    magnet: String,
}

fn parse_rows(html: &str) -> Vec<TorrentRow> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table.torrent-list tbody tr").unwrap();
    let name_selector = Selector::parse("td[colspan='2'] a:not(.comments)").unwrap();
    let magnet_selector = Selector::parse("a[href^='magnet']").unwrap();
    let cell_selector = Selector::parse("td.text-center").unwrap();

    let mut rows = Vec::new();
    for tr in document.select(&row_selector) {
        let name = match tr.select(&name_selector).next() {
            Some(a) => a
                .value()
                .attr("title")
                .map(|t| t.to_string())
                .unwrap_or_else(|| a.text().collect::<String>().trim().to_string()),
            None => continue,
        };
        let magnet = match tr
            .select(&magnet_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => href.to_string(),
            None => continue,
        };
        // Column order varies with the comment cell, so pick the cell that
        // looks like a size instead of counting columns.
        let size = tr
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .find(|text| text.ends_with("iB") || text.ends_with(" B"))
            .unwrap_or_default();
        rows.push(TorrentRow { name, size, magnet });
    }
    rows
}

fn filter_rows(rows: Vec<TorrentRow>, nice_only: bool, uncensored_only: bool) -> Vec<TorrentRow> {
    rows.into_iter()
        .filter(|row| !nice_only || is_nice(&row.name))
        .filter(|row| !uncensored_only || is_uncensored(&row.name))
        .collect()
}

fn is_nice(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    name.contains("字幕") || lower.contains("1080") || lower.contains("hd")
}

fn is_uncensored(name: &str) -> bool {
    name.contains("無碼")
        || name.contains("无码")
        || name.to_ascii_lowercase().contains("uncensored")
}
