use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{
    FileRef,
    media_type::{PDF, ZIP},
};
use pdfops_options::{CreatePdfFromHtmlOptions, Validate as _};
use pdfops_types::Result;
use serde_json::json;

const HTML: &str = "text/html";

const FROM_DOCUMENT: Endpoint = Endpoint {
    name: "create PDF",
    path: "createpdf",
    accepts: &[
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-powerpoint",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "text/rtf",
        "text/plain",
        "image/bmp",
        "image/gif",
        "image/jpeg",
        "image/png",
        "image/tiff",
    ],
};

const FROM_HTML: Endpoint = Endpoint {
    name: "create PDF from HTML",
    path: "htmltopdf",
    accepts: &[HTML, ZIP],
};

/// Converts office documents, images, text or HTML into a PDF.
///
/// HTML may be a single file, a zip bundle with its assets, or a URL the
/// service fetches directly.
#[derive(Debug, Default)]
pub struct CreatePdf {
    html_options: Option<CreatePdfFromHtmlOptions>,
    input: Option<FileRef>,
}

impl CreatePdf {
    #[must_use]
    pub fn create_new() -> Self {
        Self::default()
    }

    /// Page layout, header/footer and template data for HTML inputs.
    pub fn set_options(&mut self, options: CreatePdfFromHtmlOptions) {
        self.html_options = Some(options);
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    fn is_html(input: Option<&FileRef>) -> bool {
        input.is_some_and(|i| i.url().is_some() || matches!(i.media_type(), Some(HTML | ZIP)))
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        if Self::is_html(self.input.as_ref()) {
            let options = self.html_options.unwrap_or_default();
            let mut input = engine::take_input(&FROM_HTML, options.violations(), self.input, true)?;
            return engine::run_single(ctx, &FROM_HTML, &options, &mut input, PDF).await;
        }

        let mut violations = Vec::new();
        if self.html_options.is_some() {
            violations.push("HTML options only apply to HTML inputs".to_string());
        }
        let mut input = engine::take_input(&FROM_DOCUMENT, violations, self.input, false)?;
        engine::run_single(ctx, &FROM_DOCUMENT, &json!({}), &mut input, PDF).await
    }
}
