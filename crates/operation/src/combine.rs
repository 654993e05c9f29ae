use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{FileRef, media_type::PDF};
use pdfops_options::{PageRanges, Validate as _};
use pdfops_types::Result;
use serde_json::{Value, json};

const ENDPOINT: Endpoint = Endpoint {
    name: "combine files",
    path: "combinepdf",
    accepts: &[PDF],
};

const MIN_INPUTS: usize = 2;

/// One PDF to combine, optionally restricted to some of its pages.
#[derive(Debug)]
pub struct CombineFilesInput {
    pub file: FileRef,
    pub page_ranges: Option<PageRanges>,
}

/// Concatenates PDFs (or page selections of them) into one document.
#[derive(Debug, Default)]
pub struct CombineFiles {
    inputs: Vec<CombineFilesInput>,
}

impl CombineFiles {
    #[must_use]
    pub fn create_new() -> Self {
        Self::default()
    }

    /// Appends an input; the output keeps the order inputs were added in.
    pub fn add_input(&mut self, file: FileRef, page_ranges: Option<PageRanges>) {
        self.inputs.push(CombineFilesInput { file, page_ranges });
    }

    #[must_use]
    pub fn inputs(&self) -> &[CombineFilesInput] {
        &self.inputs
    }

    fn violations(&self) -> Vec<String> {
        let mut v = Vec::new();
        if self.inputs.len() < MIN_INPUTS {
            v.push(format!(
                "combine files requires at least {MIN_INPUTS} inputs, got {}",
                self.inputs.len()
            ));
        }
        for (i, input) in self.inputs.iter().enumerate() {
            let mut own = Vec::new();
            engine::check_input(&ENDPOINT, Some(&input.file), false, &mut own);
            if let Some(ranges) = &input.page_ranges {
                own.extend(ranges.violations());
            }
            v.extend(own.into_iter().map(|m| format!("input {i}: {m}")));
        }
        v
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(mut self, ctx: &ExecutionContext) -> Result<FileRef> {
        engine::reject(self.violations())?;

        let mut assets: Vec<Value> = Vec::with_capacity(self.inputs.len());
        for input in &mut self.inputs {
            let mut asset = engine::resolve_input(ctx, &mut input.file).await?.to_json();
            if let (Some(ranges), Value::Object(obj)) = (&input.page_ranges, &mut asset) {
                obj.insert("pageRanges".to_string(), serde_json::to_value(ranges)?);
            }
            assets.push(asset);
        }
        engine::submit(ctx, &ENDPOINT, json!({ "assets": assets }), PDF).await
    }
}
