//! Data models for Shelf

mod document;
mod user;

pub use document::{slugify, Document, DocumentId};
pub use user::User;
