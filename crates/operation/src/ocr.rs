use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{FileRef, media_type::PDF};
use pdfops_options::{OcrOptions, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "OCR",
    path: "ocr",
    accepts: &[PDF],
};

/// Makes a scanned PDF searchable.
#[derive(Debug)]
pub struct OcrPdf {
    options: OcrOptions,
    input: Option<FileRef>,
}

impl OcrPdf {
    #[must_use]
    pub fn create_new(options: OcrOptions) -> Self {
        Self {
            options,
            input: None,
        }
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    #[must_use]
    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        let mut input = engine::take_input(&ENDPOINT, self.options.violations(), self.input, false)?;
        engine::run_single(ctx, &ENDPOINT, &self.options, &mut input, PDF).await
    }
}
