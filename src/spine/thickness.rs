//! Physical spine width for print editions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_PAGE_COUNT: u32 = 24;
pub const MAX_PAGE_COUNT: u32 = 828;
/// Below this many pages the spine is too narrow to carry text.
pub const MIN_PAGES_FOR_SPINE_TEXT: u32 = 79;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpineError {
    #[error("page count {pages} is outside the printable range {min}..={max}")]
    PageCountOutOfRange { pages: u32, min: u32, max: u32 },
    #[error("words per page must be positive")]
    ZeroWordsPerPage,
    #[error("unknown paper stock: {0}")]
    UnknownPaper(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaperStock {
    White,
    #[default]
    Cream,
    StandardColor,
    PremiumColor,
}

impl PaperStock {
    /// Caliper of one page, in inches.
    pub fn inches_per_page(self) -> f64 {
        match self {
            PaperStock::White => 0.002252,
            PaperStock::Cream => 0.0025,
            PaperStock::StandardColor => 0.002252,
            PaperStock::PremiumColor => 0.002347,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperStock::White => "white",
            PaperStock::Cream => "cream",
            PaperStock::StandardColor => "standard-color",
            PaperStock::PremiumColor => "premium-color",
        }
    }
}

impl fmt::Display for PaperStock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaperStock {
    type Err = SpineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(PaperStock::White),
            "cream" => Ok(PaperStock::Cream),
            "standard-color" => Ok(PaperStock::StandardColor),
            "premium-color" => Ok(PaperStock::PremiumColor),
            other => Err(SpineError::UnknownPaper(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpineDimensions {
    pub page_count: u32,
    pub paper: PaperStock,
    pub inches: f64,
    pub millimeters: f64,
    pub supports_spine_text: bool,
}

/// Estimated printed pages for a word count.
///
/// Rounded up to an even number (pages come in leaves) and clamped to the
/// printable minimum.
pub fn estimate_page_count(word_count: u64, words_per_page: u32) -> Result<u32, SpineError> {
    if words_per_page == 0 {
        return Err(SpineError::ZeroWordsPerPage);
    }
    let pages = word_count.div_ceil(u64::from(words_per_page));
    let pages = u32::try_from(pages).unwrap_or(u32::MAX);
    let even = pages.saturating_add(pages % 2);
    Ok(even.max(MIN_PAGE_COUNT))
}

pub fn spine_width(page_count: u32, paper: PaperStock) -> Result<SpineDimensions, SpineError> {
    if !(MIN_PAGE_COUNT..=MAX_PAGE_COUNT).contains(&page_count) {
        return Err(SpineError::PageCountOutOfRange {
            pages: page_count,
            min: MIN_PAGE_COUNT,
            max: MAX_PAGE_COUNT,
        });
    }

    let inches = f64::from(page_count) * paper.inches_per_page();
    Ok(SpineDimensions {
        page_count,
        paper,
        inches,
        millimeters: inches * MM_PER_INCH,
        supports_spine_text: page_count >= MIN_PAGES_FOR_SPINE_TEXT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cream_spine_for_three_hundred_pages() {
        let dims = spine_width(300, PaperStock::Cream).unwrap();
        assert!(close(dims.inches, 0.75));
        assert!(close(dims.millimeters, 19.05));
        assert!(dims.supports_spine_text);
    }

    #[test]
    fn test_thin_books_cannot_carry_spine_text() {
        let dims = spine_width(78, PaperStock::White).unwrap();
        assert!(!dims.supports_spine_text);
        assert!(spine_width(79, PaperStock::White).unwrap().supports_spine_text);
    }

    #[test]
    fn test_out_of_range_page_counts() {
        assert!(matches!(
            spine_width(23, PaperStock::Cream),
            Err(SpineError::PageCountOutOfRange { pages: 23, .. })
        ));
        assert!(spine_width(829, PaperStock::Cream).is_err());
        assert!(spine_width(828, PaperStock::Cream).is_ok());
    }

    #[test]
    fn test_page_estimate_rounds_up_to_even() {
        assert_eq!(estimate_page_count(25_001, 250).unwrap(), 102);
        assert_eq!(estimate_page_count(25_000, 250).unwrap(), 100);
        assert_eq!(estimate_page_count(24_750, 250).unwrap(), 100);
        assert_eq!(estimate_page_count(100, 250).unwrap(), MIN_PAGE_COUNT);
        assert_eq!(estimate_page_count(1, 0), Err(SpineError::ZeroWordsPerPage));
    }

    #[test]
    fn test_paper_names_parse() {
        assert_eq!("Premium-Color".parse::<PaperStock>().unwrap(), PaperStock::PremiumColor);
        assert!("glossy".parse::<PaperStock>().is_err());
    }
}
