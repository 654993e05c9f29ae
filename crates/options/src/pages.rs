//! Page selections and page-level edit actions.

use crate::wire::Validate;
use pdfops_types::{PdfOpsError, Result};
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A 1-based, inclusive page span. `end == None` means "to the last page".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    start: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<u32>,
}

impl PageRange {
    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<u32> {
        self.end
    }

    fn violation(&self) -> Option<String> {
        if self.start == 0 {
            return Some("page numbers start at 1".to_string());
        }
        match self.end {
            Some(end) if end < self.start => Some(format!(
                "page range {}-{end} ends before it starts",
                self.start
            )),
            _ => None,
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) if end == self.start => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{end}", self.start),
            None => write!(f, "{}-", self.start),
        }
    }
}

/// An ordered list of page spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageRanges(Vec<PageRange>);

impl PageRanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_single_page(&mut self, page: u32) {
        self.0.push(PageRange {
            start: page,
            end: Some(page),
        });
    }

    pub fn add_range(&mut self, start: u32, end: u32) {
        self.0.push(PageRange {
            start,
            end: Some(end),
        });
    }

    /// From `start` through the last page.
    pub fn add_all_from(&mut self, start: u32) {
        self.0.push(PageRange { start, end: None });
    }

    #[must_use]
    pub fn single_page(mut self, page: u32) -> Self {
        self.add_single_page(page);
        self
    }

    #[must_use]
    pub fn range(mut self, start: u32, end: u32) -> Self {
        self.add_range(start, end);
        self
    }

    #[must_use]
    pub fn all_from(mut self, start: u32) -> Self {
        self.add_all_from(start);
        self
    }

    #[must_use]
    pub fn ranges(&self) -> &[PageRange] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Validate for PageRanges {
    fn violations(&self) -> Vec<String> {
        if self.0.is_empty() {
            return vec!["page ranges cannot be empty".to_string()];
        }
        self.0.iter().filter_map(PageRange::violation).collect()
    }
}

/// Parses `"1,3-5,8-"`.
impl FromStr for PageRanges {
    type Err = PdfOpsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut ranges = Self::new();
        let bad = |part: &str| PdfOpsError::validation(format!("invalid page range '{part}'"));
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let num = |n: &str| n.trim().parse::<u32>().map_err(|_| bad(part));
            match part.split_once('-') {
                None => ranges.add_single_page(num(part)?),
                Some((start, "")) => ranges.add_all_from(num(start)?),
                Some((start, end)) => ranges.add_range(num(start)?, num(end)?),
            }
        }
        ranges.validate()?;
        Ok(ranges)
    }
}

/// Clockwise rotation applied to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAngle {
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl Serialize for RotationAngle {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_u16(self.degrees())
    }
}

impl fmt::Display for RotationAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FromStr for RotationAngle {
    type Err = PdfOpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "90" => Ok(Self::Deg90),
            "180" => Ok(Self::Deg180),
            "270" => Ok(Self::Deg270),
            other => Err(PdfOpsError::validation(format!(
                "invalid RotationAngle '{other}', expected one of: 90, 180, 270"
            ))),
        }
    }
}

/// One edit applied to a set of pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageAction {
    #[serde(rename_all = "camelCase")]
    Rotate {
        angle: RotationAngle,
        page_ranges: PageRanges,
    },
    #[serde(rename_all = "camelCase")]
    Delete { page_ranges: PageRanges },
}

impl PageAction {
    fn page_ranges(&self) -> &PageRanges {
        match self {
            Self::Rotate { page_ranges, .. } | Self::Delete { page_ranges } => page_ranges,
        }
    }
}

/// Ordered page edits, applied by the service in sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageActions {
    page_actions: Vec<PageAction>,
}

impl PageActions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rotate(mut self, page_ranges: PageRanges, angle: RotationAngle) -> Self {
        self.page_actions.push(PageAction::Rotate { angle, page_ranges });
        self
    }

    #[must_use]
    pub fn delete(mut self, page_ranges: PageRanges) -> Self {
        self.page_actions.push(PageAction::Delete { page_ranges });
        self
    }

    #[must_use]
    pub fn actions(&self) -> &[PageAction] {
        &self.page_actions
    }
}

impl Validate for PageActions {
    fn violations(&self) -> Vec<String> {
        if self.page_actions.is_empty() {
            return vec!["at least one page action is required".to_string()];
        }
        self.page_actions
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                a.page_ranges()
                    .violations()
                    .into_iter()
                    .map(move |m| format!("page action {i}: {m}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_page_ranges() {
        let r: PageRanges = "1, 3-5,8-".parse().unwrap();
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!([{"start": 1, "end": 1}, {"start": 3, "end": 5}, {"start": 8}])
        );
        assert_eq!(r.ranges()[1].to_string(), "3-5");
        assert!("0".parse::<PageRanges>().is_err());
        assert!("5-2".parse::<PageRanges>().is_err());
        assert!("a-b".parse::<PageRanges>().is_err());
        assert!("".parse::<PageRanges>().is_err());
    }

    #[test]
    fn test_page_actions_payload() {
        let actions = PageActions::new()
            .rotate(PageRanges::new().single_page(1), RotationAngle::Deg90)
            .delete(PageRanges::new().range(2, 3));
        assert!(actions.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&actions).unwrap(),
            json!({"pageActions": [
                {"rotate": {"angle": 90, "pageRanges": [{"start": 1, "end": 1}]}},
                {"delete": {"pageRanges": [{"start": 2, "end": 3}]}},
            ]})
        );
    }

    #[test]
    fn test_page_actions_violations_name_the_action() {
        let actions = PageActions::new()
            .delete(PageRanges::new())
            .rotate(PageRanges::new().range(4, 1), RotationAngle::Deg180);
        let msgs = actions.violations();
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].starts_with("page action 0"));
        assert!(msgs[1].starts_with("page action 1"));
        assert!(PageActions::new().validate().is_err());
    }

    #[test]
    fn test_rotation_angle_parse() {
        assert_eq!("270".parse::<RotationAngle>().unwrap(), RotationAngle::Deg270);
        assert!("45".parse::<RotationAngle>().is_err());
    }
}
