//! File references for operation inputs and results.
//!
//! A [`FileRef`] points at a local file, an in-memory or network reader, or
//! a URL the service fetches itself. Operation results are [`FileRef`]s
//! backed by a temporary artifact that can be consumed once.

pub mod file_ref;
pub mod media_type;

pub use file_ref::{BoxReader, FileRef, FileSource};
pub use media_type::{extension_for_media_type, media_type_for_extension};
