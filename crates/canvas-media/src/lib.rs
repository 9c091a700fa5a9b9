//! # canvas-media
//!
//! Turns a raw upload into a published, watermarked artwork image.
//!
//! Uploads are staged in a scratch directory, decoded, stamped with a centered
//! `© {artist}` overlay, written as PNG into the asset directory, and the scratch
//! file is removed. Decoding and compositing run on the blocking thread pool.

mod error;
mod store;
mod watermark;

pub use error::MediaError;
pub use store::{ArtworkStore, StoredImage};
pub use watermark::{apply_watermark, watermark_file, watermark_text, DEFAULT_ATTRIBUTION};
