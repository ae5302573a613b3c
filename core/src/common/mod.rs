pub mod errors;
pub mod http;

pub use errors::{ImageLoadError, ManifestError, StorageError};
pub use http::{absolute_url, build_http_client};
