pub mod bookmark;
pub mod health;
pub mod metadata;
pub mod pages;

use crate::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound
}
