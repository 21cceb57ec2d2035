//! Identity document retrieval.
//!
//! - [`DocumentReference`] names a document and the text to watermark it with
//! - [`DocumentFetcher`] retrieves it through the authenticated proxy
//! - [`RenderStrategy`] picks the image or first-page PDF path from the content type
//! - [`DownloadAction`] saves the raw bytes under a fixed naming pattern

pub mod dispatch;
pub mod download;
pub mod fetcher;
pub mod reference;

pub use dispatch::RenderStrategy;
pub use download::{download_file_name, DownloadAction, DownloadError, SavedDocument};
pub use fetcher::{DocumentFetcher, DocumentSource, FetchError};
pub use reference::{DocumentBlob, DocumentReference};
