//! Streaming transfers against pre-signed asset URIs.
//!
//! Neither direction carries credentials: the URI itself is the grant.

use crate::{ServiceClient, client::service_error};
use futures_util::StreamExt as _;
use pdfops_types::{PdfOpsError, Result};
use reqwest::{Body, header::CONTENT_TYPE};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWriteExt as _};
use tokio_util::io::ReaderStream;

impl ServiceClient {
    /// Streams `reader` to a pre-signed upload URI with a `PUT`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Http`] on transport failure and a service error
    /// on a non-success status.
    pub async fn upload<R>(&self, uri: &str, media_type: &str, reader: R) -> Result<()>
    where
        R: AsyncRead + Send + 'static,
    {
        let body = Body::wrap_stream(ReaderStream::new(reader));
        let resp = self
            .http()
            .put(uri)
            .header(CONTENT_TYPE, media_type)
            .body(body)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            tracing::debug!(media_type, "asset uploaded");
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(service_error(
            format!("asset upload failed: {text}"),
            pdfops_types::error::REQUEST_ID_UNAVAILABLE.to_string(),
            status.as_u16(),
            None,
        ))
    }

    /// Streams the content at `uri` into a new file at `dest`, returning the
    /// number of bytes written.
    ///
    /// A partially written file is removed on failure.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Io`] if `dest` cannot be written, plus the
    /// same transport and status errors as [`ServiceClient::upload`].
    pub async fn download(&self, uri: &str, dest: &Path) -> Result<u64> {
        let resp = self.http().get(uri).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(service_error(
                format!("asset download failed with status {status}"),
                pdfops_types::error::REQUEST_ID_UNAVAILABLE.to_string(),
                status.as_u16(),
                None,
            ));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        let mut stream = resp.bytes_stream();
        let copied: Result<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = copied {
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
            return Err(e);
        }
        tracing::debug!(path = %dest.display(), bytes = written, "asset downloaded");
        Ok(written)
    }
}

/// Extracts a transfer URI from a service response field.
///
/// # Errors
///
/// Returns [`PdfOpsError::ServiceApi`] when the field is missing or blank.
pub fn require_uri(uri: Option<&str>, what: &str) -> Result<String> {
    match uri.map(str::trim) {
        Some(u) if !u.is_empty() => Ok(u.to_string()),
        _ => Err(PdfOpsError::service_api(
            format!("service response is missing the {what} uri"),
            None,
            None,
            None,
        )),
    }
}
