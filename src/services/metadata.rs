use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult};

/// Best-effort description of a page, used to pre-fill a draft bookmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }
}

/// Turn user input into an absolute http(s) URL, assuming `https://` when no
/// scheme is given.
pub fn normalize_target_url(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("url is required".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).map_err(|_| AppError::InvalidUrl)?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(AppError::InvalidUrl),
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(AppError::InvalidUrl),
    }

    Ok(candidate)
}

/// Fetch `url` and extract metadata from its HTML.
///
/// Never fails: timeouts, network errors and non-HTML responses yield empty
/// metadata. The body of an error response is still parsed.
pub async fn fetch_metadata(url: &str, user_agent: &str, timeout: Duration) -> Metadata {
    let client = match reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to build HTTP client: {}", e);
            return Metadata::default();
        }
    };

    let response = match client
        .get(url)
        .header(ACCEPT, "text/html,application/xhtml+xml")
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            debug!("Failed to fetch metadata from {}: {}", url, e);
            return Metadata::default();
        }
    };

    if !response.status().is_success() {
        debug!("Status {} for {}, parsing body anyway", response.status(), url);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if !content_type.is_empty() && !content_type.contains("text/html") {
        debug!("Skipping non-HTML content type {} for {}", content_type, url);
        return Metadata::default();
    }

    match response.text().await {
        Ok(html) => extract_metadata(&html),
        Err(e) => {
            debug!("Failed to read body from {}: {}", url, e);
            Metadata::default()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `<meta>` contents keyed by lowercased `property` (or `name`). Later tags
/// overwrite earlier ones.
fn meta_tags(document: &Html) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    let Ok(selector) = Selector::parse("meta[content]") else {
        return tags;
    };

    for element in document.select(&selector) {
        let attrs = element.value();
        let key = attrs
            .attr("property")
            .filter(|k| !k.is_empty())
            .or_else(|| attrs.attr("name"))
            .map(|k| k.trim().to_lowercase())
            .unwrap_or_default();
        if key.is_empty() {
            continue;
        }
        if let Some(content) = attrs.attr("content").and_then(non_empty) {
            tags.insert(key, content);
        }
    }

    tags
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| non_empty(&el.text().collect::<String>()))
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .and_then(non_empty)
}

pub fn extract_metadata(html: &str) -> Metadata {
    let document = Html::parse_document(html);
    let meta = meta_tags(&document);
    let pick = |keys: &[&str]| keys.iter().find_map(|k| meta.get(*k).cloned());

    Metadata {
        title: pick(&["og:title", "twitter:title"]).or_else(|| first_text(&document, "title")),
        description: pick(&["og:description", "twitter:description", "description"]),
        site_name: pick(&["og:site_name", "application-name"]),
        image: pick(&["og:image", "twitter:image"]),
        language: first_attr(&document, "html[lang]", "lang"),
    }
}
