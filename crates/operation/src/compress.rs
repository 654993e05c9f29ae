use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{FileRef, media_type::PDF};
use pdfops_options::{CompressPdfOptions, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "compress PDF",
    path: "compresspdf",
    accepts: &[PDF],
};

/// Reduces the size of a PDF.
#[derive(Debug)]
pub struct CompressPdf {
    options: CompressPdfOptions,
    input: Option<FileRef>,
}

impl CompressPdf {
    #[must_use]
    pub fn create_new(options: CompressPdfOptions) -> Self {
        Self {
            options,
            input: None,
        }
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    #[must_use]
    pub fn options(&self) -> &CompressPdfOptions {
        &self.options
    }

    /// # Errors
    ///
    /// Validation errors for missing or unsupported input, then any
    /// service, timeout or I/O error from running the job.
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        let mut input = engine::take_input(&ENDPOINT, self.options.violations(), self.input, false)?;
        engine::run_single(ctx, &ENDPOINT, &self.options, &mut input, PDF).await
    }
}
