use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{
    FileRef,
    media_type::{JSON, PDF},
};
use pdfops_options::{PdfPropertiesOptions, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "PDF properties",
    path: "pdfproperties",
    accepts: &[PDF],
};

/// Reads document (and optionally page-level) properties of a PDF.
///
/// The result is a JSON document.
#[derive(Debug)]
pub struct PdfProperties {
    options: PdfPropertiesOptions,
    input: Option<FileRef>,
}

impl PdfProperties {
    #[must_use]
    pub fn create_new(options: PdfPropertiesOptions) -> Self {
        Self {
            options,
            input: None,
        }
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        let mut input = engine::take_input(&ENDPOINT, self.options.violations(), self.input, false)?;
        engine::run_single(ctx, &ENDPOINT, &self.options, &mut input, JSON).await
    }
}
