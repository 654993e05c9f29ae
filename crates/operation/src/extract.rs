use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{
    FileRef,
    media_type::{PDF, ZIP},
};
use pdfops_options::{ExtractPdfOptions, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "extract PDF",
    path: "extractpdf",
    accepts: &[PDF],
};

/// Extracts text, tables and figures from a PDF.
///
/// The result is a zip archive holding `structuredData.json` plus any
/// table and figure renditions that were requested.
#[derive(Debug)]
pub struct ExtractPdf {
    options: ExtractPdfOptions,
    input: Option<FileRef>,
}

impl ExtractPdf {
    #[must_use]
    pub fn create_new(options: ExtractPdfOptions) -> Self {
        Self {
            options,
            input: None,
        }
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    #[must_use]
    pub fn options(&self) -> &ExtractPdfOptions {
        &self.options
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        let mut input = engine::take_input(&ENDPOINT, self.options.violations(), self.input, false)?;
        engine::run_single(ctx, &ENDPOINT, &self.options, &mut input, ZIP).await
    }
}
