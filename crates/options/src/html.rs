use crate::wire::Validate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

const DEFAULT_PAGE_WIDTH: f64 = 8.5;
const DEFAULT_PAGE_HEIGHT: f64 = 11.0;

/// Page size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    page_width: f64,
    page_height: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
        }
    }
}

impl PageLayout {
    #[must_use]
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
        }
    }

    pub fn set_page_size(&mut self, page_width: f64, page_height: f64) {
        self.page_width = page_width;
        self.page_height = page_height;
    }

    #[must_use]
    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    #[must_use]
    pub fn page_height(&self) -> f64 {
        self.page_height
    }
}

/// The service expects the merge data as a JSON-encoded string.
fn as_json_string<S: Serializer>(value: &Value, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePdfFromHtmlOptions {
    include_header_footer: bool,
    page_layout: PageLayout,
    #[serde(rename = "json", serialize_with = "as_json_string")]
    data_to_merge: Value,
}

impl Default for CreatePdfFromHtmlOptions {
    fn default() -> Self {
        CreatePdfFromHtmlOptionsBuilder::default().build()
    }
}

impl CreatePdfFromHtmlOptions {
    #[must_use]
    pub fn builder() -> CreatePdfFromHtmlOptionsBuilder {
        CreatePdfFromHtmlOptionsBuilder::default()
    }

    #[must_use]
    pub fn include_header_footer(&self) -> bool {
        self.include_header_footer
    }

    #[must_use]
    pub fn page_layout(&self) -> PageLayout {
        self.page_layout
    }

    #[must_use]
    pub fn data_to_merge(&self) -> &Value {
        &self.data_to_merge
    }
}

impl Validate for CreatePdfFromHtmlOptions {
    fn violations(&self) -> Vec<String> {
        let mut v = Vec::new();
        let PageLayout {
            page_width,
            page_height,
        } = self.page_layout;
        if !(page_width.is_finite() && page_width > 0.0) {
            v.push(format!("page width must be a positive number, got {page_width}"));
        }
        if !(page_height.is_finite() && page_height > 0.0) {
            v.push(format!("page height must be a positive number, got {page_height}"));
        }
        if !self.data_to_merge.is_object() {
            v.push("data to merge must be a JSON object".to_string());
        }
        v
    }
}

#[derive(Debug)]
pub struct CreatePdfFromHtmlOptionsBuilder {
    include_header_footer: bool,
    page_layout: PageLayout,
    data_to_merge: Value,
}

impl Default for CreatePdfFromHtmlOptionsBuilder {
    fn default() -> Self {
        Self {
            include_header_footer: true,
            page_layout: PageLayout::default(),
            data_to_merge: Value::Object(Map::new()),
        }
    }
}

impl CreatePdfFromHtmlOptionsBuilder {
    #[must_use]
    pub fn include_header_footer(mut self, include: bool) -> Self {
        self.include_header_footer = include;
        self
    }

    #[must_use]
    pub fn page_layout(mut self, layout: PageLayout) -> Self {
        self.page_layout = layout;
        self
    }

    /// Data substituted into a dynamic HTML template.
    #[must_use]
    pub fn data_to_merge(mut self, data: Value) -> Self {
        self.data_to_merge = data;
        self
    }

    #[must_use]
    pub fn build(self) -> CreatePdfFromHtmlOptions {
        CreatePdfFromHtmlOptions {
            include_header_footer: self.include_header_footer,
            page_layout: self.page_layout,
            data_to_merge: self.data_to_merge,
        }
    }
}
