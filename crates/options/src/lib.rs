//! Typed, validated options for every PDF operation.
//!
//! Each options type is assembled with a consuming builder, frozen on
//! `build()`, checked with [`Validate::validate`] and serialized as the
//! option part of the operation's request payload.

mod wire;

pub mod compress;
pub mod extract;
pub mod html;
pub mod merge;
pub mod ocr;
pub mod pages;
pub mod properties;
pub mod protect;

pub use compress::{CompressPdfOptions, CompressionLevel};
pub use extract::{
    ExtractElementType, ExtractPdfOptions, ExtractRenditionsElementType, TableStructureType,
};
pub use html::{CreatePdfFromHtmlOptions, PageLayout};
pub use merge::{DocumentMergeOptions, Fragments, OutputFormat};
pub use ocr::{OcrOptions, OcrSupportedLocale, OcrSupportedType};
pub use pages::{PageAction, PageActions, PageRange, PageRanges, RotationAngle};
pub use properties::PdfPropertiesOptions;
pub use protect::{
    ContentEncryption, EncryptionAlgorithm, PasswordProtectOptions, Permission, Permissions,
};
pub use wire::Validate;
