//! Error types for the compras-core library.

use thiserror::Error;

/// Main error type for the compras library.
#[derive(Error, Debug)]
pub enum ComprasError {
    /// Receipt page could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Receipt page was fetched but yielded no usable items.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Store precondition or persistence error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// QR code decoding error.
    #[error("QR error: {0}")]
    Qr(#[from] QrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while fetching a receipt page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL is empty or not an http(s) address.
    #[error("invalid receipt URL: {0:?}")]
    InvalidUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Connection failure, timeout, or body read failure.
    #[error("failed to reach {url}: {reason}")]
    Network { url: String, reason: String },

    /// The portal answered with a non-2xx status.
    #[error("receipt portal returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Errors raised while turning a fetched page into a purchase.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Every candidate row was filtered out, or none were found.
    #[error("no purchased items found in {url}; the receipt page format was not recognized")]
    NoItems { url: String },
}

/// Errors related to the purchase store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Import attempted before any shopping list exists.
    #[error("no shopping list exists; create one first")]
    NoList,

    /// Named list does not exist.
    #[error("shopping list not found: {0}")]
    ListNotFound(String),

    /// A list with this name already exists.
    #[error("shopping list already exists: {0}")]
    ListExists(String),

    /// List or category name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// Item position is outside the list.
    #[error("item {index} is out of range for list {list} ({len} items)")]
    ItemOutOfRange { list: String, index: usize, len: usize },

    /// Category label is not part of the category set.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The default bucket is permanent.
    #[error("the default category {0:?} cannot be removed")]
    DefaultCategory(String),

    /// Snapshot could not be read or written.
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON in any known shape.
    #[error("store snapshot at {path} is malformed: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors related to QR code decoding.
#[derive(Error, Debug)]
pub enum QrError {
    /// Image could not be opened or decoded.
    #[error("failed to open image: {0}")]
    Image(#[from] image::ImageError),

    /// No QR grid was detected in the image.
    #[error("no QR code detected in image")]
    NotFound,

    /// A grid was found but its payload could not be read.
    #[error("failed to decode QR code: {0}")]
    Decode(String),
}

/// Result type for the compras library.
pub type Result<T> = std::result::Result<T, ComprasError>;
