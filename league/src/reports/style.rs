//! Style presets shared by both renderers.

use super::PODIUM_SIZE;

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// Concrete look of a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub bold: bool,
    pub alignment: Alignment,
    /// Solid background as `0xRRGGBB`
    pub fill: Option<u32>,
    /// Font color as `0xRRGGBB`; renderer default when `None`
    pub font_color: Option<u32>,
    /// Point size; renderer default when `None`
    pub font_size: Option<f64>,
}

/// Closed set of styles a report cell or line can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylePreset {
    /// Report title
    Heading,
    /// Column headers and section headings
    Subheading,
    /// Plain text cell
    Cell,
    /// Numeric or id cell
    CenteredCell,
    /// Summary rows and podium highlights
    Highlighted,
}

const HEADING_FILL: u32 = 0x0066CC;
const SUBHEADING_FILL: u32 = 0xD9E1F2;
const HIGHLIGHT_FILL: u32 = 0xFFF2CC;
const WHITE: u32 = 0xFFFFFF;

impl StylePreset {
    pub fn style(&self) -> Style {
        match self {
            StylePreset::Heading => Style {
                bold: true,
                alignment: Alignment::Center,
                fill: Some(HEADING_FILL),
                font_color: Some(WHITE),
                font_size: Some(14.0),
            },
            StylePreset::Subheading => Style {
                bold: true,
                alignment: Alignment::Center,
                fill: Some(SUBHEADING_FILL),
                font_color: None,
                font_size: Some(11.0),
            },
            StylePreset::Cell => Style {
                bold: false,
                alignment: Alignment::Left,
                fill: None,
                font_color: None,
                font_size: None,
            },
            StylePreset::CenteredCell => Style {
                bold: false,
                alignment: Alignment::Center,
                fill: None,
                font_color: None,
                font_size: None,
            },
            StylePreset::Highlighted => Style {
                bold: true,
                alignment: Alignment::Center,
                fill: Some(HIGHLIGHT_FILL),
                font_color: None,
                font_size: None,
            },
        }
    }
}

/// Whether the standings row at `index` (0-based) is on the podium
pub fn is_podium(index: usize) -> bool {
    index < PODIUM_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_is_white_on_blue() {
        let style = StylePreset::Heading.style();
        assert!(style.bold);
        assert_eq!(style.fill, Some(0x0066CC));
        assert_eq!(style.font_color, Some(0xFFFFFF));
        assert_eq!(style.alignment, Alignment::Center);
    }

    #[test]
    fn test_plain_cells_have_no_emphasis() {
        assert!(!StylePreset::Cell.style().bold);
        assert_eq!(StylePreset::Cell.style().alignment, Alignment::Left);
        assert_eq!(StylePreset::CenteredCell.style().alignment, Alignment::Center);
    }

    #[test]
    fn test_podium() {
        assert!(is_podium(0));
        assert!(is_podium(2));
        assert!(!is_podium(3));
    }
}
