pub mod metadata;

pub use metadata::{extract_metadata, fetch_metadata, normalize_target_url, Metadata};
