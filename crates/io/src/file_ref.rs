//! [`FileRef`]: a handle to operation input or output content.

use crate::media_type::{extension_for_media_type, media_type_for_extension};
use pdfops_types::{PdfOpsError, Result};
use regex::Regex;
use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tokio::{
    fs::{self, OpenOptions},
    io::{AsyncRead, AsyncWrite, AsyncWriteExt as _},
};

static URL_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"(https?://.)?(www\.)?[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_+.~#?&/=]*)",
    )
});

/// A boxed reader handed out by [`FileRef::as_stream`].
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;

/// Where the content of a [`FileRef`] lives.
pub enum FileSource {
    LocalFile(PathBuf),
    /// `None` once the reader has been taken.
    Stream(Option<BoxReader>),
    Url(String),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile(p) => f.debug_tuple("LocalFile").field(p).finish(),
            Self::Stream(r) => f
                .debug_tuple("Stream")
                .field(&if r.is_some() { "<reader>" } else { "<taken>" })
                .finish(),
            Self::Url(u) => f.debug_tuple("Url").field(u).finish(),
        }
    }
}

/// Input or output content of an operation.
///
/// Results produced by an operation are backed by a temporary file and may be
/// consumed exactly once, via [`FileRef::save_as_file`] or
/// [`FileRef::write_to_stream`]. Dropping an unconsumed result deletes the
/// temporary file.
#[derive(Debug)]
pub struct FileRef {
    source: FileSource,
    media_type: Option<String>,
    extension: Option<String>,
    operation_result: bool,
}

impl FileRef {
    /// References a file on disk. Without an explicit media type, it is
    /// derived from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if `path` or an explicit
    /// `media_type` is empty.
    pub fn from_local_file(path: impl AsRef<Path>, media_type: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let mut errors = Vec::new();
        if path.as_os_str().is_empty() {
            errors.push("local file path must not be empty".to_string());
        }
        if media_type.is_some_and(|m| m.trim().is_empty()) {
            errors.push("media type must not be empty when provided".to_string());
        }
        if !errors.is_empty() {
            return Err(PdfOpsError::Validation(errors));
        }

        let (media_type, extension) = match media_type {
            Some(m) => (
                Some(m.to_string()),
                extension_for_media_type(m).map(str::to_string),
            ),
            None => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                let media = ext
                    .as_deref()
                    .and_then(media_type_for_extension)
                    .map(str::to_string);
                (media, ext)
            }
        };
        Ok(Self {
            source: FileSource::LocalFile(path.to_path_buf()),
            media_type,
            extension,
            operation_result: false,
        })
    }

    /// Wraps a reader. The media type is mandatory since there is no name
    /// to derive it from.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if `media_type` is empty.
    pub fn from_stream<R>(reader: R, media_type: &str) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        if media_type.trim().is_empty() {
            return Err(PdfOpsError::validation(
                "media type must be provided for a stream",
            ));
        }
        Ok(Self {
            source: FileSource::Stream(Some(Box::new(reader))),
            media_type: Some(media_type.to_string()),
            extension: extension_for_media_type(media_type).map(str::to_string),
            operation_result: false,
        })
    }

    /// References content the service fetches itself.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Validation`] if `url` is empty or does not look
    /// like a URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PdfOpsError::validation("input url must not be empty"));
        }
        let pattern = URL_PATTERN
            .as_ref()
            .map_err(|e| PdfOpsError::validation(format!("url pattern unavailable: {e}")))?;
        if !pattern.is_match(url) {
            return Err(PdfOpsError::validation(format!(
                "invalid url {url} provided for the operation"
            )));
        }
        Ok(Self {
            source: FileSource::Url(url.to_string()),
            media_type: None,
            extension: None,
            operation_result: false,
        })
    }

    /// Wraps a downloaded artifact as a single-use operation result.
    #[must_use]
    pub fn from_operation_result(path: PathBuf, media_type: &str) -> Self {
        Self {
            source: FileSource::LocalFile(path),
            media_type: Some(media_type.to_string()),
            extension: extension_for_media_type(media_type).map(str::to_string),
            operation_result: true,
        }
    }

    #[must_use]
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.source {
            FileSource::Url(u) => Some(u),
            _ => None,
        }
    }

    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::LocalFile(p) => Some(p),
            _ => None,
        }
    }

    /// `true` until the result has been saved or written out.
    #[must_use]
    pub fn is_operation_result(&self) -> bool {
        self.operation_result
    }

    /// Opens the content for reading.
    ///
    /// A local file can be opened repeatedly; a stream is handed out once.
    ///
    /// # Errors
    ///
    /// - [`PdfOpsError::Usage`] for URL references and already-taken streams.
    /// - [`PdfOpsError::Io`] if the local file cannot be opened.
    pub async fn as_stream(&mut self) -> Result<BoxReader> {
        match &mut self.source {
            FileSource::LocalFile(path) => {
                let file = fs::File::open(path.as_path()).await?;
                Ok(Box::new(file))
            }
            FileSource::Stream(reader) => reader
                .take()
                .ok_or_else(|| PdfOpsError::usage("stream has already been consumed")),
            FileSource::Url(_) => Err(PdfOpsError::usage(
                "url references cannot be read locally",
            )),
        }
    }

    /// Moves the result artifact to `dest`, with the extension replaced by the
    /// result's own, and returns the path written.
    ///
    /// An existing file at the target path is never overwritten.
    ///
    /// # Errors
    ///
    /// - [`PdfOpsError::Usage`] if this is not an unconsumed operation result.
    /// - [`PdfOpsError::Io`] if the target exists or the move fails.
    pub async fn save_as_file(&mut self, dest: impl AsRef<Path>) -> Result<PathBuf> {
        let src = self.result_path("save_as_file")?.to_path_buf();
        let dest = dest.as_ref();
        if dest.as_os_str().is_empty() {
            return Err(PdfOpsError::validation(
                "no destination path provided for saving file",
            ));
        }
        let target = match self.extension.as_deref() {
            Some(ext) => dest.with_extension(ext),
            None => dest.to_path_buf(),
        };
        tracing::info!(
            from = %src.display(),
            to = %target.display(),
            "moving result from temporary location"
        );
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        move_no_clobber(&src, &target).await?;
        self.operation_result = false;
        self.source = FileSource::LocalFile(target.clone());
        Ok(target)
    }

    /// Copies the result artifact into `writer`, then removes the temporary
    /// artifact. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`PdfOpsError::Usage`] if this is not an unconsumed operation result.
    /// - [`PdfOpsError::Io`] on read or write failure.
    pub async fn write_to_stream<W>(&mut self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let src = self.result_path("write_to_stream")?.to_path_buf();
        tracing::info!(from = %src.display(), "writing result from temporary location to stream");
        let mut file = fs::File::open(&src).await?;
        let written = tokio::io::copy(&mut file, writer).await?;
        writer.flush().await?;
        drop(file);
        self.operation_result = false;
        if let Err(e) = fs::remove_file(&src).await {
            tracing::warn!(path = %src.display(), error = %e, "failed to remove temporary result");
        }
        Ok(written)
    }

    fn result_path(&self, op: &str) -> Result<&Path> {
        match (&self.source, self.operation_result) {
            (FileSource::LocalFile(p), true) => Ok(p),
            _ => Err(PdfOpsError::usage(format!(
                "{op} can only be called once on an operation result"
            ))),
        }
    }
}

/// An operation result that was never saved or written out is discarded
/// together with its temporary artifact.
impl Drop for FileRef {
    fn drop(&mut self) {
        if let (FileSource::LocalFile(path), true) = (&self.source, self.operation_result) {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "discarded unconsumed result"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary result");
                }
            }
        }
    }
}

/// Moves `src` to `dst` without replacing an existing `dst`.
///
/// Hard-linking gives an atomic no-clobber rename on one filesystem; across
/// devices the content is copied into a freshly created file.
async fn move_no_clobber(src: &Path, dst: &Path) -> std::io::Result<()> {
    match fs::hard_link(src, dst).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "hard link failed, copying result instead");
            let mut from = fs::File::open(src).await?;
            let mut to = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dst)
                .await?;
            if let Err(e) = tokio::io::copy(&mut from, &mut to).await {
                drop(to);
                let _ = fs::remove_file(dst).await;
                return Err(e);
            }
            to.flush().await?;
        }
    }
    fs::remove_file(src).await
}
