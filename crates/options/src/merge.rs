use crate::wire::{Validate, wire_enum};
use serde::Serialize;
use serde_json::Value;

wire_enum! {
    pub enum OutputFormat {
        Pdf => "pdf",
        Docx => "docx",
    }
}

/// Reusable template snippets referenced from the merge data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fragments(Vec<Value>);

impl Fragments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Each fragment is a JSON object mapping fragment names to template text.
    pub fn add_fragment(&mut self, fragment: Value) {
        self.0.push(fragment);
    }

    pub fn add_fragments(&mut self, fragments: impl IntoIterator<Item = Value>) {
        self.0.extend(fragments);
    }

    #[must_use]
    pub fn with(mut self, fragment: Value) -> Self {
        self.add_fragment(fragment);
        self
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMergeOptions {
    json_data_for_merge: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Fragments::is_empty")]
    fragments: Fragments,
}

impl DocumentMergeOptions {
    #[must_use]
    pub fn builder() -> DocumentMergeOptionsBuilder {
        DocumentMergeOptionsBuilder::default()
    }

    /// Shorthand for the common data-plus-format case.
    #[must_use]
    pub fn new(data: Value, output_format: OutputFormat) -> Self {
        Self::builder()
            .json_data_for_merge(data)
            .output_format(output_format)
            .build()
    }

    #[must_use]
    pub fn json_data_for_merge(&self) -> &Value {
        &self.json_data_for_merge
    }

    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    #[must_use]
    pub fn fragments(&self) -> &Fragments {
        &self.fragments
    }
}

impl Validate for DocumentMergeOptions {
    fn violations(&self) -> Vec<String> {
        let mut v = Vec::new();
        if !self.json_data_for_merge.is_object() {
            v.push("json data for merge must be a JSON object".to_string());
        }
        if self.output_format.is_none() {
            v.push("output format cannot be null".to_string());
        }
        for (i, f) in self.fragments.as_slice().iter().enumerate() {
            if !f.is_object() {
                v.push(format!("fragment {i} must be a JSON object"));
            }
        }
        v
    }
}

#[derive(Debug, Default)]
pub struct DocumentMergeOptionsBuilder {
    data: Value,
    output_format: Option<OutputFormat>,
    fragments: Fragments,
}

impl DocumentMergeOptionsBuilder {
    #[must_use]
    pub fn json_data_for_merge(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    #[must_use]
    pub fn fragments(mut self, fragments: Fragments) -> Self {
        self.fragments = fragments;
        self
    }

    #[must_use]
    pub fn build(self) -> DocumentMergeOptions {
        DocumentMergeOptions {
            json_data_for_merge: self.data,
            output_format: self.output_format,
            fragments: self.fragments,
        }
    }
}
