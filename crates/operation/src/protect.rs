use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{FileRef, media_type::PDF};
use pdfops_options::{PasswordProtectOptions, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "protect PDF",
    path: "protectpdf",
    accepts: &[PDF],
};

/// Encrypts a PDF with user and/or owner passwords.
#[derive(Debug)]
pub struct ProtectPdf {
    options: PasswordProtectOptions,
    input: Option<FileRef>,
}

impl ProtectPdf {
    #[must_use]
    pub fn create_new(options: PasswordProtectOptions) -> Self {
        Self {
            options,
            input: None,
        }
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    #[must_use]
    pub fn options(&self) -> &PasswordProtectOptions {
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
