use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{
    FileRef,
    media_type::{DOCX, PDF},
};
use pdfops_options::{DocumentMergeOptions, OutputFormat, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "document merge",
    path: "documentgeneration",
    accepts: &[DOCX],
};

/// Fills a Word template with JSON data, producing a PDF or DOCX.
#[derive(Debug)]
pub struct DocumentMerge {
    options: DocumentMergeOptions,
    input: Option<FileRef>,
}

impl DocumentMerge {
    #[must_use]
    pub fn create_new(options: DocumentMergeOptions) -> Self {
        Self {
            options,
            input: None,
        }
    }

    /// The `.docx` template.
    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    #[must_use]
    pub fn options(&self) -> &DocumentMergeOptions {
        &self.options
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        let mut input = engine::take_input(&ENDPOINT, self.options.violations(), self.input, false)?;
        let result_type = match self.options.output_format() {
            Some(OutputFormat::Docx) => DOCX,
            _ => PDF,
        };
        engine::run_single(ctx, &ENDPOINT, &self.options, &mut input, result_type).await
    }
}
