use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::bookmark::{self, Bookmark};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub q: String,
}

/// Template-friendly view of a bookmark: absent fields are empty strings.
pub struct BookmarkView {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub tags_text: String,
    pub notes: String,
    pub site_name: String,
    pub image: String,
    pub language: String,
    pub created_on: String,
    pub updated_on: String,
}

impl From<Bookmark> for BookmarkView {
    fn from(b: Bookmark) -> Self {
        let day = |ts: &str| ts.get(..10).unwrap_or(ts).to_string();
        let created_on = day(&b.created_at);
        let updated_on = day(&b.updated_at);
        BookmarkView {
            tags_text: b.tags.join(", "),
            id: b.id,
            url: b.url,
            title: b.title,
            description: b.description.unwrap_or_default(),
            tags: b.tags,
            notes: b.notes.unwrap_or_default(),
            site_name: b.site_name.unwrap_or_default(),
            image: b.image.unwrap_or_default(),
            language: b.language.unwrap_or_default(),
            created_on,
            updated_on,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub bookmarks: Vec<BookmarkView>,
    pub query: String,
    pub data_path: String,
}

impl IntoResponse for IndexTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}

pub async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> AppResult<IndexTemplate> {
    let q = query.q.trim().to_string();
    let needle = q.clone();
    let bookmarks = state
        .store
        .run(move |file| bookmark::search(file, &needle))
        .await??;

    Ok(IndexTemplate {
        bookmarks: bookmarks.into_iter().map(Into::into).collect(),
        query: q,
        data_path: state.config.data_path.display().to_string(),
    })
}

/// Bookmarks per page on the "all bookmarks" view.
pub const ALL_PAGE_SIZE: usize = 12;

#[derive(Debug, Deserialize)]
pub struct AllQuery {
    #[serde(default)]
    pub page: String,
}

/// One page of a list. `start` and `end` are 1-based and inclusive for
/// display; both are 0 when the list is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    /// Clamp `requested` into `1..=total_pages`. An empty list has one page.
    pub fn new(requested: i64, total: usize, page_size: usize) -> Self {
        let total_pages = total.div_ceil(page_size).max(1);
        let page = usize::try_from(requested.max(1))
            .unwrap_or(1)
            .min(total_pages);

        let offset = (page - 1) * page_size;
        let end = (offset + page_size).min(total);
        let start = if total == 0 { 0 } else { offset + 1 };

        PageWindow {
            page,
            total_pages,
            total,
            start,
            end,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn prev_page(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        (self.page + 1).min(self.total_pages)
    }
}

#[derive(Template)]
#[template(path = "all.html")]
pub struct AllTemplate {
    pub bookmarks: Vec<BookmarkView>,
    pub window: PageWindow,
}

impl IntoResponse for AllTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}

impl AllTemplate {
    pub fn from_bookmarks(bookmarks: Vec<Bookmark>, requested: i64) -> Self {
        let window = PageWindow::new(requested, bookmarks.len(), ALL_PAGE_SIZE);
        let skip = window.start.saturating_sub(1);
        let take = window.end - skip;

        AllTemplate {
            bookmarks: bookmarks
                .into_iter()
                .skip(skip)
                .take(take)
                .map(Into::into)
                .collect(),
            window,
        }
    }
}

pub async fn all_page(
    State(state): State<AppState>,
    Query(query): Query<AllQuery>,
) -> AppResult<AllTemplate> {
    let requested = query.page.trim().parse::<i64>().unwrap_or(1);
    let bookmarks = state.store.run(bookmark::list).await??;

    Ok(AllTemplate::from_bookmarks(bookmarks, requested))
}
