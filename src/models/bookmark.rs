use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DataFile;
use crate::error::{AppError, AppResult};

/// A saved URL with its metadata, as persisted in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Tags as supplied by a caller: either a list or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    pub fn normalize(&self) -> Vec<String> {
        match self {
            TagsInput::List(tags) => normalize_tags(tags),
            TagsInput::Text(text) => normalize_tags([text]),
        }
    }
}

impl From<&str> for TagsInput {
    fn from(text: &str) -> Self {
        TagsInput::Text(text.to_string())
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(tags: Vec<String>) -> Self {
        TagsInput::List(tags)
    }
}

/// Fields for a bookmark that does not exist yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
    pub notes: Option<String>,
    pub site_name: Option<String>,
    pub image: Option<String>,
    pub language: Option<String>,
}

/// A partial update. `None` leaves a field alone; for the optional text
/// fields `Some("")` clears them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookmarkUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
    pub notes: Option<String>,
    pub site_name: Option<String>,
    pub image: Option<String>,
    pub language: Option<String>,
}

/// Split every element on commas, trim the pieces and drop empty ones.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .flat_map(|tag| {
            tag.as_ref()
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn apply_optional(value: Option<String>, existing: Option<String>) -> Option<String> {
    match value {
        None => existing,
        Some(v) => optional_text(Some(v)),
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A fresh timestamp that never sorts before `floor`.
fn timestamp_not_before(floor: &str) -> String {
    let now = timestamp();
    if now.as_str() < floor {
        floor.to_string()
    } else {
        now
    }
}

/// Whether the bookmark's searchable text contains `needle`, which must
/// already be trimmed and lowercased.
pub fn matches_query(bookmark: &Bookmark, needle: &str) -> bool {
    let tags = bookmark.tags.join(" ");
    let haystack = [
        bookmark.title.as_str(),
        bookmark.url.as_str(),
        bookmark.description.as_deref().unwrap_or(""),
        bookmark.notes.as_deref().unwrap_or(""),
        bookmark.site_name.as_deref().unwrap_or(""),
        tags.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    haystack.contains(needle)
}

/// Keep the bookmarks matching `query`, in their original order.
pub fn filter_bookmarks(bookmarks: Vec<Bookmark>, query: &str) -> Vec<Bookmark> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return bookmarks;
    }
    bookmarks
        .into_iter()
        .filter(|b| matches_query(b, &needle))
        .collect()
}

pub fn list(file: &DataFile) -> AppResult<Vec<Bookmark>> {
    Ok(file.load()?.bookmarks)
}

pub fn find_by_id(file: &DataFile, id: &str) -> AppResult<Option<Bookmark>> {
    Ok(file.load()?.bookmarks.into_iter().find(|b| b.id == id))
}

pub fn search(file: &DataFile, query: &str) -> AppResult<Vec<Bookmark>> {
    Ok(filter_bookmarks(list(file)?, query))
}

pub fn create(file: &DataFile, input: NewBookmark) -> AppResult<Bookmark> {
    let url = input.url.trim();
    let title = input.title.trim();
    if url.is_empty() || title.is_empty() {
        return Err(AppError::Validation(
            "url and title are required".to_string(),
        ));
    }

    let mut doc = file.load()?;
    let now = timestamp();

    let bookmark = Bookmark {
        id: Uuid::new_v4().to_string(),
        url: url.to_string(),
        title: title.to_string(),
        description: optional_text(input.description),
        tags: input.tags.map(|t| t.normalize()).unwrap_or_default(),
        notes: optional_text(input.notes),
        site_name: optional_text(input.site_name),
        image: optional_text(input.image),
        language: optional_text(input.language),
        created_at: now.clone(),
        updated_at: now,
    };

    doc.bookmarks.insert(0, bookmark.clone());
    file.persist(&doc)?;

    Ok(bookmark)
}

pub fn update(file: &DataFile, id: &str, input: BookmarkUpdate) -> AppResult<Bookmark> {
    if matches!(&input.url, Some(url) if url.trim().is_empty()) {
        return Err(AppError::Validation("URL is required".to_string()));
    }
    if matches!(&input.title, Some(title) if title.trim().is_empty()) {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let mut doc = file.load()?;
    let existing = doc
        .bookmarks
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or(AppError::BookmarkNotFound)?;

    if let Some(url) = input.url {
        existing.url = url.trim().to_string();
    }
    if let Some(title) = input.title {
        existing.title = title.trim().to_string();
    }
    if let Some(tags) = input.tags {
        existing.tags = tags.normalize();
    }
    existing.description = apply_optional(input.description, existing.description.take());
    existing.notes = apply_optional(input.notes, existing.notes.take());
    existing.site_name = apply_optional(input.site_name, existing.site_name.take());
    existing.image = apply_optional(input.image, existing.image.take());
    existing.language = apply_optional(input.language, existing.language.take());
    existing.updated_at = timestamp_not_before(&existing.created_at);

    let updated = existing.clone();
    file.persist(&doc)?;

    Ok(updated)
}

pub fn delete(file: &DataFile, id: &str) -> AppResult<bool> {
    let mut doc = file.load()?;
    let before = doc.bookmarks.len();
    doc.bookmarks.retain(|b| b.id != id);

    if doc.bookmarks.len() == before {
        return Ok(false);
    }

    file.persist(&doc)?;
    Ok(true)
}
