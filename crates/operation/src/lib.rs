//! PDF operations.
//!
//! Every operation follows the same lifecycle: `create_new`, set its
//! input(s), then `execute` against an [`ExecutionContext`]. Execution
//! validates options and inputs before any network traffic, uploads local
//! inputs, submits the job, polls it to completion and returns the result as
//! a single-use [`pdfops_io::FileRef`].
//!
//! ```no_run
//! # async fn run() -> pdfops_types::Result<()> {
//! use pdfops_auth::Credentials;
//! use pdfops_config::ClientConfig;
//! use pdfops_io::FileRef;
//! use pdfops_operation::{CompressPdf, ExecutionContext};
//! use pdfops_options::{CompressPdfOptions, CompressionLevel};
//!
//! let credentials = Credentials::from_file("pdfops-credentials.json".as_ref())?;
//! let ctx = ExecutionContext::create(credentials, ClientConfig::default())?;
//!
//! let options = CompressPdfOptions::builder()
//!     .compression_level(CompressionLevel::Medium)
//!     .build();
//! let mut op = CompressPdf::create_new(options);
//! op.set_input(FileRef::from_local_file("input.pdf", None)?);
//! let mut result = op.execute(&ctx).await?;
//! result.save_as_file("output/compressed.pdf").await?;
//! # Ok(())
//! # }
//! ```

mod engine;

pub mod combine;
pub mod compress;
pub mod context;
pub mod create;
pub mod extract;
pub mod merge;
pub mod ocr;
pub mod pages;
pub mod properties;
pub mod protect;

pub use combine::{CombineFiles, CombineFilesInput};
pub use compress::CompressPdf;
pub use context::ExecutionContext;
pub use create::CreatePdf;
pub use extract::ExtractPdf;
pub use merge::DocumentMerge;
pub use ocr::OcrPdf;
pub use pages::PageManipulation;
pub use properties::PdfProperties;
pub use protect::ProtectPdf;
