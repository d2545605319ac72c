use super::settings::LayoutSettings;
use crate::error::{BubblexanError, Result};
use crate::types::layout::{DigitBubble, IdOrientation, Point, StudentIdColumn};
use crate::types::option::IdDigit;

/// ID columns plus the y of the lowest bubble center.
pub struct StudentIdSection {
    pub columns: Vec<StudentIdColumn>,
    pub bottom_center_y: f64,
}

pub fn build_student_id_section(
    id_length: u32,
    area_left: f64,
    usable_width: f64,
    top_center_y: f64,
    orientation: IdOrientation,
    settings: &LayoutSettings,
) -> Result<StudentIdSection> {
    match orientation {
        IdOrientation::Vertical => {
            build_vertical(id_length, area_left, usable_width, top_center_y, settings)
        }
        IdOrientation::Horizontal => {
            build_horizontal(id_length, area_left, usable_width, top_center_y, settings)
        }
    }
}

fn build_vertical(
    id_length: u32,
    area_left: f64,
    usable_width: f64,
    top_center_y: f64,
    settings: &LayoutSettings,
) -> Result<StudentIdSection> {
    let total_width = f64::from(id_length.saturating_sub(1)) * settings.id_column_step
        + settings.bubble_diameter();
    if total_width > usable_width {
        return Err(BubblexanError::LayoutInfeasible(
            "student ID section does not fit horizontally; reduce id-length".to_string(),
        ));
    }
    let start_x = area_left + (usable_width - total_width) / 2.0;
    let label_y = top_center_y + settings.bubble_radius + settings.digit_label_gap;

    let columns = (0..id_length)
        .map(|digit_index| {
            let center_x =
                start_x + settings.bubble_radius + f64::from(digit_index) * settings.id_column_step;
            let bubbles = IdDigit::ALL
                .iter()
                .map(|&value| DigitBubble {
                    value,
                    x: center_x,
                    y: top_center_y - f64::from(value.value()) * settings.id_vertical_step,
                    radius: settings.bubble_radius,
                })
                .collect();
            StudentIdColumn {
                digit_index: digit_index + 1,
                label_position: Point {
                    x: center_x - settings.bubble_radius,
                    y: label_y,
                },
                bubbles,
            }
        })
        .collect();

    let rows = IdDigit::ALL.len() as f64;
    Ok(StudentIdSection {
        columns,
        bottom_center_y: top_center_y - (rows - 1.0) * settings.id_vertical_step,
    })
}

// Digits are stacked as rows; every row spans all ten values, so width
// depends on the value count rather than id_length.
fn build_horizontal(
    id_length: u32,
    area_left: f64,
    usable_width: f64,
    top_center_y: f64,
    settings: &LayoutSettings,
) -> Result<StudentIdSection> {
    let values = IdDigit::ALL.len() as f64;
    let total_width = (values - 1.0) * settings.id_column_step + settings.bubble_diameter();
    if total_width > usable_width {
        return Err(BubblexanError::LayoutInfeasible(
            "student ID section does not fit horizontally; choose a wider paper size".to_string(),
        ));
    }
    let start_x = area_left + (usable_width - total_width) / 2.0;
    let label_x = start_x - (settings.question_label_width / 2.0 + settings.option_label_gap);

    let columns = (0..id_length)
        .map(|digit_index| {
            let center_y = top_center_y - f64::from(digit_index) * settings.id_vertical_step;
            let bubbles = IdDigit::ALL
                .iter()
                .map(|&value| DigitBubble {
                    value,
                    x: start_x
                        + settings.bubble_radius
                        + f64::from(value.value()) * settings.id_column_step,
                    y: center_y,
                    radius: settings.bubble_radius,
                })
                .collect();
            StudentIdColumn {
                digit_index: digit_index + 1,
                label_position: Point {
                    x: label_x,
                    y: center_y - settings.bubble_radius / 2.0,
                },
                bubbles,
            }
        })
        .collect();

    Ok(StudentIdSection {
        columns,
        bottom_center_y: top_center_y
            - f64::from(id_length.saturating_sub(1)) * settings.id_vertical_step,
    })
}
