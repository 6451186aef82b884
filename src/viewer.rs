//! Remote image viewer: list a prefix, then download, decode and display
//! each object in listing order.

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, ErrorKind};
use crate::ports::{ImageDisplay, ObjectStore};
use crate::retry::RetryPolicy;

/// An object that could not be shown.
#[derive(Debug)]
pub struct ItemFailure {
    /// Full object path.
    pub path: String,
    /// Why it failed.
    pub error: Error,
}

/// Outcome of a batch view.
#[derive(Debug, Default)]
pub struct ViewReport {
    /// Paths displayed, in display order.
    pub shown: Vec<String>,
    /// Paths that failed, in encounter order.
    pub failures: Vec<ItemFailure>,
}

/// Join a listing prefix and an object name into a full object path.
#[must_use]
pub fn object_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Decode `bytes` as an image and hand it to `display`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a recognised image format,
/// or whatever the display reports.
pub fn decode_and_display(
    display: &dyn ImageDisplay,
    name: &str,
    bytes: &[u8],
) -> Result<(), Error> {
    let image =
        image::load_from_memory(bytes).map_err(|e| Error::Decode(format!("{name}: {e}")))?;
    display.show(name, &image)
}

/// Download and display a single object.
///
/// # Errors
///
/// Any failure is returned as is.
#[instrument(skip(store, display, retry))]
pub async fn view_object(
    store: &dyn ObjectStore,
    display: &dyn ImageDisplay,
    retry: &RetryPolicy,
    bucket: &str,
    path: &str,
) -> Result<(), Error> {
    let bytes = retry.run(path, || store.download(bucket, path)).await?;
    decode_and_display(display, path, &bytes.data)
}

/// Display every object under `prefix`.
///
/// Per-object failures are collected in the report and the loop moves on.
/// Only a failed listing or an authentication failure ends the batch early.
///
/// # Errors
///
/// Returns the listing error, or [`Error::Authentication`] if the session is
/// rejected partway through.
#[instrument(skip(store, display, retry))]
pub async fn view_prefix(
    store: &dyn ObjectStore,
    display: &dyn ImageDisplay,
    retry: &RetryPolicy,
    bucket: &str,
    prefix: &str,
) -> Result<ViewReport, Error> {
    let listing = retry.run(prefix, || store.list(bucket, prefix)).await?;
    info!(count = listing.len(), "listed prefix");

    let mut report = ViewReport::default();
    for descriptor in listing.iter().filter(|d| !d.is_folder()) {
        let path = object_path(prefix, &descriptor.name);
        debug!(%path, size = ?descriptor.size, "fetching object");
        match view_object(store, display, retry, bucket, &path).await {
            Ok(()) => report.shown.push(path),
            Err(e) if e.kind() == ErrorKind::Authentication => return Err(e),
            Err(error) => {
                warn!(%path, %error, "skipping object");
                report.failures.push(ItemFailure { path, error });
            }
        }
    }
    Ok(report)
}
