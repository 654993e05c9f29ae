use crate::wire::Validate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PdfPropertiesOptions {
    #[serde(rename = "pageLevel", skip_serializing_if = "Option::is_none")]
    page_level: Option<bool>,
}

impl PdfPropertiesOptions {
    #[must_use]
    pub fn builder() -> PdfPropertiesOptionsBuilder {
        PdfPropertiesOptionsBuilder::default()
    }

    #[must_use]
    pub fn include_page_level_properties(&self) -> bool {
        self.page_level.unwrap_or(false)
    }
}

impl Validate for PdfPropertiesOptions {
    fn violations(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct PdfPropertiesOptionsBuilder {
    page_level: Option<bool>,
}

impl PdfPropertiesOptionsBuilder {
    #[must_use]
    pub fn include_page_level_properties(mut self, include: bool) -> Self {
        self.page_level = Some(include);
        self
    }

    #[must_use]
    pub fn build(self) -> PdfPropertiesOptions {
        PdfPropertiesOptions {
            page_level: self.page_level,
        }
    }
}
