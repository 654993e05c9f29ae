use crate::wire::{Validate, wire_enum};
use serde::Serialize;

wire_enum! {
    /// How aggressively to trade quality for size.
    pub enum CompressionLevel {
        High => "HIGH",
        Medium => "MEDIUM",
        Low => "LOW",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressPdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    compression_level: Option<CompressionLevel>,
}

impl CompressPdfOptions {
    #[must_use]
    pub fn builder() -> CompressPdfOptionsBuilder {
        CompressPdfOptionsBuilder::default()
    }

    #[must_use]
    pub fn compression_level(&self) -> Option<CompressionLevel> {
        self.compression_level
    }
}

impl Validate for CompressPdfOptions {
    fn violations(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct CompressPdfOptionsBuilder {
    compression_level: Option<CompressionLevel>,
}

impl CompressPdfOptionsBuilder {
    #[must_use]
    pub fn compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = Some(level);
        self
    }

    #[must_use]
    pub fn build(self) -> CompressPdfOptions {
        CompressPdfOptions {
            compression_level: self.compression_level,
        }
    }
}
