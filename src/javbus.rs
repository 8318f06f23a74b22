use regex::Regex;
use scraper::{Html, Selector};
use urlencoding::encode;

use crate::http;
use crate::provider::{IdLookup, Outcome, Payload, ProviderError, ProviderResult, StarSearch};

const BASE_URL: &str = "https://www.javbus.com";
const MAGNET_AJAX_URL: &str = "https://www.javbus.com/ajax/uncledatoolsbyajax.php";

pub struct JavBus {
    client: reqwest::blocking::Client,
}

impl JavBus {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        JavBus { client }
    }

    fn fetch_av(&self, id: &str, nice_only: bool, uncensored_only: bool) -> ProviderResult {
        let url = format!("{}/{}", BASE_URL, id.to_uppercase());
        tracing::debug!("Fetching detail page: {}", url);
        let html = http::get_text(&self.client, &url)?;

        let detail = parse_detail(&html)
            .ok_or_else(|| ProviderError::not_found(format!("no entry for id {}", id)))?;

        // Magnets are loaded by the site through a separate ajax endpoint
        // whose parameters sit in an inline script on the detail page.
        let magnets = match extract_magnet_params(&html) {
            Some(params) => {
                let ajax_url = format!(
                    "{}?gid={}&img={}&uc={}&lang=zh",
                    MAGNET_AJAX_URL,
                    params.gid,
                    encode(&params.img),
                    params.uc
                );
                tracing::debug!("Fetching magnet list: {}", ajax_url);
                parse_magnets(&http::get_text(&self.client, &ajax_url)?)
            }
            None => Vec::new(),
        };
        let magnets = filter_magnets(magnets, nice_only, uncensored_only);

        let mut lines = vec![detail.title];
        if let Some(date) = detail.date {
            lines.push(format!("發行日期: {}", date));
        }
        if !detail.stars.is_empty() {
            lines.push(format!("演員: {}", detail.stars.join(", ")));
        }
        for magnet in &magnets {
            lines.push(format!("{} | {} | {}", magnet.name, magnet.size, magnet.link));
        }
        Ok(Payload::Lines(lines))
    }

    fn fetch_new_ids(&self, name: &str) -> ProviderResult {
        let search_url = format!("{}/searchstar/{}", BASE_URL, encode(name));
        tracing::debug!("Searching performer: {}", search_url);
        let html = http::get_text(&self.client, &search_url)?;

        let star_path = parse_star_link(&html)
            .ok_or_else(|| ProviderError::not_found(format!("no performer matching {}", name)))?;
        let star_url = if star_path.starts_with("http") {
            star_path
        } else {
            format!("{}{}", BASE_URL, star_path)
        };

        tracing::debug!("Fetching performer page: {}", star_url);
        let page = http::get_text(&self.client, &star_url)?;
        let ids = parse_movie_ids(&page);
        if ids.is_empty() {
            return Err(ProviderError::not_found(format!("no works listed for {}", name)));
        }
        Ok(Payload::Lines(ids))
    }
}

impl IdLookup for JavBus {
    fn av_by_id(&self, id: &str, nice_only: bool, uncensored_only: bool) -> Outcome {
        Outcome::from_result(self.fetch_av(id, nice_only, uncensored_only))
    }
}

impl StarSearch for JavBus {
    fn avs_by_star(&self, name: &str) -> Outcome {
        Outcome::from_result(self.fetch_new_ids(name))
    }
}

struct AvDetail {
    title: String,
    date: Option<String>,
    stars: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Magnet {
    name: String,
    size: String,
    link: String,
}

struct MagnetParams {
    gid: String,
    img: String,
    uc: String,
}

fn parse_detail(html: &str) -> Option<AvDetail> {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("div.container h3").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;
    if title.is_empty() {
        return None;
    }

    let info_selector = Selector::parse("div.info p").unwrap();
    let date = document
        .select(&info_selector)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains("發行日期"))
        .and_then(|text| {
            text.split(':')
                .last()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        });

    let star_selector = Selector::parse("div.star-name a").unwrap();
    let stars = document
        .select(&star_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    Some(AvDetail { title, date, stars })
}

fn extract_magnet_params(html: &str) -> Option<MagnetParams> {
    let gid_re = Regex::new(r"var gid = (\d+);").unwrap();
    let img_re = Regex::new(r"var img = '([^']*)';").unwrap();
    let uc_re = Regex::new(r"var uc = (\d+);").unwrap();

    let gid = gid_re.captures(html)?.get(1)?.as_str().to_string();
    let img = img_re
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let uc = uc_re
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "0".to_string());

    Some(MagnetParams { gid, img, uc })
}

/// The ajax endpoint returns bare table rows, one per magnet.
fn parse_magnets(fragment: &str) -> Vec<Magnet> {
    let document = Html::parse_fragment(fragment);
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a[href^='magnet']").unwrap();

    let mut magnets = Vec::new();
    for row in document.select(&row_selector) {
        let link = match row.select(&link_selector).next() {
            Some(a) => match a.value().attr("href") {
                Some(href) => href.to_string(),
                None => continue,
            },
            None => continue,
        };
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().replace('\t', " "))
            .collect();
        let name = cells.first().cloned().unwrap_or_default();
        let size = cells.get(1).cloned().unwrap_or_default();
        magnets.push(Magnet { name, size, link });
    }
    magnets
}

fn filter_magnets(magnets: Vec<Magnet>, nice_only: bool, uncensored_only: bool) -> Vec<Magnet> {
    magnets
        .into_iter()
        .filter(|m| !nice_only || is_nice(&m.name))
        .filter(|m| !uncensored_only || is_uncensored(&m.name))
        .collect()
}

fn is_nice(name: &str) -> bool {
    name.contains("字幕") || name.to_ascii_lowercase().contains("hd")
}

fn is_uncensored(name: &str) -> bool {
    name.contains("無碼") || name.contains("无码") || name.to_ascii_lowercase().contains("uncensored")
}

fn parse_star_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a.avatar-box").unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.to_string())
}

/// Performer pages list works as movie boxes; the first `<date>` tag inside
/// each box is the catalog id.
fn parse_movie_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let box_selector = Selector::parse("a.movie-box").unwrap();
    let date_selector = Selector::parse("date").unwrap();

    let mut ids = Vec::new();
    for movie_box in document.select(&box_selector) {
        if let Some(id) = movie_box
            .select(&date_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
        {
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
