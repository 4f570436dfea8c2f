//! Storage module for report photos
//!
//! Writes uploaded photos to the local upload folder and hands back the
//! public `/uploads/...` reference stored on the report.

mod local_storage;

pub use local_storage::{LocalPhotoStorage, UPLOADS_URL_PREFIX};
