use crate::wire::{Validate, wire_enum};
use serde::Serialize;

wire_enum! {
    pub enum ExtractElementType {
        Text => "text",
        Tables => "tables",
    }
}

wire_enum! {
    /// Elements additionally exported as image renditions.
    pub enum ExtractRenditionsElementType {
        Tables => "tables",
        Figures => "figures",
    }
}

wire_enum! {
    pub enum TableStructureType {
        Csv => "csv",
        Xlsx => "xlsx",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPdfOptions {
    elements_to_extract: Vec<ExtractElementType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    renditions_to_extract: Vec<ExtractRenditionsElementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    get_char_bounds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table_output_format: Option<TableStructureType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_styling: Option<bool>,
}

impl ExtractPdfOptions {
    #[must_use]
    pub fn builder() -> ExtractPdfOptionsBuilder {
        ExtractPdfOptionsBuilder::default()
    }

    #[must_use]
    pub fn elements_to_extract(&self) -> &[ExtractElementType] {
        &self.elements_to_extract
    }

    #[must_use]
    pub fn renditions_to_extract(&self) -> &[ExtractRenditionsElementType] {
        &self.renditions_to_extract
    }

    #[must_use]
    pub fn char_bounds(&self) -> Option<bool> {
        self.get_char_bounds
    }

    #[must_use]
    pub fn table_output_format(&self) -> Option<TableStructureType> {
        self.table_output_format
    }

    #[must_use]
    pub fn include_styling(&self) -> Option<bool> {
        self.include_styling
    }
}

impl Validate for ExtractPdfOptions {
    fn violations(&self) -> Vec<String> {
        let mut v = Vec::new();
        if self.elements_to_extract.is_empty() {
            v.push("elements to extract cannot be null or empty".to_string());
        }
        v
    }
}

#[derive(Debug, Default)]
pub struct ExtractPdfOptionsBuilder {
    elements: Vec<ExtractElementType>,
    renditions: Vec<ExtractRenditionsElementType>,
    char_bounds: Option<bool>,
    table_output_format: Option<TableStructureType>,
    include_styling: Option<bool>,
}

impl ExtractPdfOptionsBuilder {
    /// Replaces the element list; duplicates are dropped.
    #[must_use]
    pub fn elements_to_extract(
        mut self,
        elements: impl IntoIterator<Item = ExtractElementType>,
    ) -> Self {
        self.elements.clear();
        for e in elements {
            if !self.elements.contains(&e) {
                self.elements.push(e);
            }
        }
        self
    }

    #[must_use]
    pub fn renditions_to_extract(
        mut self,
        renditions: impl IntoIterator<Item = ExtractRenditionsElementType>,
    ) -> Self {
        self.renditions.clear();
        for r in renditions {
            if !self.renditions.contains(&r) {
                self.renditions.push(r);
            }
        }
        self
    }

    #[must_use]
    pub fn char_bounds(mut self, enabled: bool) -> Self {
        self.char_bounds = Some(enabled);
        self
    }

    #[must_use]
    pub fn table_output_format(mut self, format: TableStructureType) -> Self {
        self.table_output_format = Some(format);
        self
    }

    #[must_use]
    pub fn include_styling(mut self, enabled: bool) -> Self {
        self.include_styling = Some(enabled);
        self
    }

    #[must_use]
    pub fn build(self) -> ExtractPdfOptions {
        ExtractPdfOptions {
            elements_to_extract: self.elements,
            renditions_to_extract: self.renditions,
            get_char_bounds: self.char_bounds,
            table_output_format: self.table_output_format,
            include_styling: self.include_styling,
        }
    }
}
