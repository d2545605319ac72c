use crate::error::BubblexanError;
use crate::types::option::{IdDigit, OptionLetter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    #[serde(rename = "A4")]
    A4,
    #[serde(rename = "LETTER")]
    Letter,
}

impl PaperSize {
    /// Page size in points.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::A4 => (595, 842),
            Self::Letter => (612, 792),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::Letter => "LETTER",
        }
    }
}

impl FromStr for PaperSize {
    type Err = BubblexanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A4" => Ok(Self::A4),
            "LETTER" => Ok(Self::Letter),
            other => Err(BubblexanError::InvalidInput(format!(
                "paper-size must be one of: A4, LETTER (found '{other}')"
            ))),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdOrientation {
    Vertical,
    Horizontal,
}

impl FromStr for IdOrientation {
    type Err = BubblexanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(BubblexanError::InvalidInput(format!(
                "id-orientation must be one of: vertical, horizontal (found '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionBubble {
    pub option: OptionLetter,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitBubble {
    pub value: IdDigit,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBlock {
    pub number: u32,
    pub label_position: Point,
    pub bubbles: Vec<OptionBubble>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentIdColumn {
    pub digit_index: u32,
    pub label_position: Point,
    pub bubbles: Vec<DigitBubble>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Square,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentMarker {
    #[serde(rename = "type")]
    pub shape: MarkerShape,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl AlignmentMarker {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.size / 2.0,
            y: self.y + self.size / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    pub num_questions: u32,
    pub id_length: u32,
    pub student_id_orientation: IdOrientation,
    pub bubble_radius: f64,
    pub bubble_diameter: f64,
    pub question_row_height: f64,
    pub option_step: f64,
    pub option_label_gap: f64,
    pub id_vertical_step: f64,
    pub id_column_step: f64,
    pub question_column_spacing: f64,
    pub question_columns: u32,
    pub question_rows: u32,
    pub student_id_header_gap: f64,
    pub digit_label_gap: f64,
    pub content_left: f64,
    pub content_right: f64,
    pub margin: f64,
    pub question_area_top: f64,
    pub student_id_label_y: f64,
}

/// The solved sheet; serialized as the layout description read by scanners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub paper_size: PaperSize,
    pub dimensions: Dimensions,
    pub questions: Vec<QuestionBlock>,
    pub student_id: Vec<StudentIdColumn>,
    pub alignment_markers: Vec<AlignmentMarker>,
    pub metadata: LayoutMetadata,
}
