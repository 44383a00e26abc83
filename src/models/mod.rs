pub mod bookmark;

pub use bookmark::{Bookmark, BookmarkUpdate, NewBookmark, TagsInput};
