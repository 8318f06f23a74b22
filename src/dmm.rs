use regex::Regex;
use scraper::{Html, Selector};
use urlencoding::encode;

use crate::http;
use crate::provider::{Outcome, Payload, ProviderError, ProviderResult, PreviewVideo, StarRanking, StarSearch};

const SEARCH_URL: &str = "https://www.dmm.co.jp/digital/videoa/-/list/search/=/searchstr=";
const RANKING_URL: &str = "https://www.dmm.co.jp/digital/videoa/-/ranking/=/term=monthly/type=actress/";
const FREEPV_HOST: &str = "https://cc3001.dmm.co.jp/litevideo/freepv";

/// Preview qualities in descending order; the first URL that exists wins.
const PV_SUFFIXES: [&str; 6] = ["dmb_w", "dmb", "dm_w", "dm", "sm_w", "sm"];

const RANKING_LIMIT: usize = 25;
const WORKS_LIMIT: usize = 20;

pub struct Dmm {
    client: reqwest::blocking::Client,
}

impl Dmm {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Dmm { client }
    }

    fn fetch_top_rated(&self, name: &str) -> ProviderResult {
        let url = format!("{}{}/sort=ranking/", SEARCH_URL, encode(name));
        tracing::debug!("Searching ranked works: {}", url);
        let html = http::get_text(&self.client, &url)?;

        let works = parse_works(&html);
        if works.is_empty() {
            return Err(ProviderError::not_found(format!("no works found for {}", name)));
        }
        Ok(Payload::Lines(
            works
                .into_iter()
                .take(WORKS_LIMIT)
                .map(|work| format!("{} | {}", work.cid, work.title))
                .collect(),
        ))
    }

    fn fetch_ranking(&self) -> ProviderResult {
        tracing::debug!("Fetching actress ranking: {}", RANKING_URL);
        let html = http::get_text(&self.client, RANKING_URL)?;

        let names = parse_ranking(&html);
        if names.is_empty() {
            return Err(ProviderError::not_found("ranking page had no entries"));
        }
        Ok(Payload::Lines(
            names
                .into_iter()
                .take(RANKING_LIMIT)
                .enumerate()
                .map(|(i, name)| format!("{}. {}", i + 1, name))
                .collect(),
        ))
    }

    fn fetch_pv(&self, id: &str) -> ProviderResult {
        let cid = normalize_cid(id)
            .ok_or_else(|| ProviderError::not_found(format!("cannot derive cid from {}", id)))?;

        for url in candidate_urls(&cid) {
            tracing::debug!("Probing preview: {}", url);
            let exists = self
                .client
                .head(&url)
                .send()
                .map(|resp| resp.status().is_success())
                .unwrap_or(false);
            if exists {
                return Ok(Payload::Text(url));
            }
        }
        Err(ProviderError::not_found(format!("no preview video for {}", id)))
    }
}

impl StarSearch for Dmm {
    fn avs_by_star(&self, name: &str) -> Outcome {
        Outcome::from_result(self.fetch_top_rated(name))
    }
}

impl StarRanking for Dmm {
    fn top_stars(&self) -> Outcome {
        Outcome::from_result(self.fetch_ranking())
    }
}

impl PreviewVideo for Dmm {
    fn pv_by_id(&self, id: &str) -> Outcome {
        Outcome::from_result(self.fetch_pv(id))
    }
}

#[derive(Debug, PartialEq)]
struct Work {
    cid: String,
    title: String,
}

/// Turn a catalog id like `ABC-123` into the DMM content id `abc00123`.
fn normalize_cid(id: &str) -> Option<String> {
    let re = Regex::new(r"^([0-9]*[a-z]+)-?0*([0-9]+)$").unwrap();
    let cleaned = id.trim().to_ascii_lowercase().replace(' ', "");
    let captures = re.captures(&cleaned)?;
    let prefix = captures.get(1)?.as_str();
    let number = captures.get(2)?.as_str();
    Some(format!("{}{:0>5}", prefix, number))
}

fn candidate_urls(cid: &str) -> Vec<String> {
    let first = &cid[..1];
    let first3 = &cid[..cid.len().min(3)];
    PV_SUFFIXES
        .iter()
        .map(|suffix| format!("{}/{}/{}/{}/{}_{}.mp4", FREEPV_HOST, first, first3, cid, cid, suffix))
        .collect()
}

fn parse_works(html: &str) -> Vec<Work> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("p.tmb a").unwrap();
    let img_selector = Selector::parse("img").unwrap();
    let cid_re = Regex::new(r"/cid=([a-z0-9_]+)").unwrap();

    let mut works = Vec::new();
    for link in document.select(&link_selector) {
        let href = match link.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let cid = match cid_re.captures(href).and_then(|c| c.get(1)) {
            Some(m) => m.as_str().to_string(),
            None => continue,
        };
        let title = link
            .select(&img_selector)
            .next()
            .and_then(|img| img.value().attr("alt"))
            .unwrap_or_default()
            .trim()
            .to_string();
        if !works.iter().any(|w: &Work| w.cid == cid) {
            works.push(Work { cid, title });
        }
    }
    works
}

fn parse_ranking(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let name_selector = Selector::parse(".name a, .name").unwrap();

    let mut names = Vec::new();
    for el in document.select(&name_selector) {
        let name = el.text().collect::<String>().trim().to_string();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
