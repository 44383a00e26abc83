use crate::models::bookmark::{Bookmark, BookmarkUpdate, NewBookmark, TagsInput};
use crate::services::Metadata;

/// Fields in the order the terminal UI prompts for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Title,
    Description,
    Tags,
    Notes,
    SiteName,
    Image,
    Language,
}

pub const FIELD_ORDER: [Field; 8] = [
    Field::Url,
    Field::Title,
    Field::Description,
    Field::Tags,
    Field::Notes,
    Field::SiteName,
    Field::Image,
    Field::Language,
];

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Url => "url",
            Field::Title => "title",
            Field::Description => "description",
            Field::Tags => "tags (comma separated)",
            Field::Notes => "notes",
            Field::SiteName => "site name",
            Field::Image => "image url",
            Field::Language => "language",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Field::Url | Field::Title)
    }
}

/// In-progress field values collected by the terminal UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub notes: String,
    pub site_name: String,
    pub image: String,
    pub language: String,
}

impl Draft {
    pub fn from_bookmark(b: &Bookmark) -> Self {
        Draft {
            url: b.url.clone(),
            title: b.title.clone(),
            description: b.description.clone().unwrap_or_default(),
            tags: b.tags.join(", "),
            notes: b.notes.clone().unwrap_or_default(),
            site_name: b.site_name.clone().unwrap_or_default(),
            image: b.image.clone().unwrap_or_default(),
            language: b.language.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Url => &self.url,
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Tags => &self.tags,
            Field::Notes => &self.notes,
            Field::SiteName => &self.site_name,
            Field::Image => &self.image,
            Field::Language => &self.language,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Url => self.url = value,
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Tags => self.tags = value,
            Field::Notes => self.notes = value,
            Field::SiteName => self.site_name = value,
            Field::Image => self.image = value,
            Field::Language => self.language = value,
        }
    }

    /// Fill blank fields from fetched metadata. Returns whether a title was found.
    pub fn apply_metadata(&mut self, meta: &Metadata) -> bool {
        let pairs = [
            (Field::Title, &meta.title),
            (Field::Description, &meta.description),
            (Field::SiteName, &meta.site_name),
            (Field::Image, &meta.image),
            (Field::Language, &meta.language),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                if self.get(field).is_empty() {
                    self.set(field, value.as_str());
                }
            }
        }
        meta.title.is_some()
    }

    pub fn into_new_bookmark(self) -> NewBookmark {
        let optional = |v: String| (!v.trim().is_empty()).then_some(v);
        NewBookmark {
            url: self.url,
            title: self.title,
            description: optional(self.description),
            tags: optional(self.tags).map(TagsInput::Text),
            notes: optional(self.notes),
            site_name: optional(self.site_name),
            image: optional(self.image),
            language: optional(self.language),
        }
    }

    /// Every field is sent, so a blank optional field clears it.
    pub fn into_update(self) -> BookmarkUpdate {
        BookmarkUpdate {
            url: Some(self.url),
            title: Some(self.title),
            description: Some(self.description),
            tags: Some(TagsInput::Text(self.tags)),
            notes: Some(self.notes),
            site_name: Some(self.site_name),
            image: Some(self.image),
            language: Some(self.language),
        }
    }
}
