pub mod markers;
pub mod questions;
pub mod settings;
pub mod student_id;

use crate::error::{BubblexanError, Result};
use crate::types::layout::{Dimensions, IdOrientation, LayoutMetadata, PageLayout, PaperSize};
use settings::LayoutSettings;
use std::ops::RangeInclusive;

pub const QUESTIONS_RANGE: RangeInclusive<u32> = 1..=50;
pub const ID_LENGTH_RANGE: RangeInclusive<u32> = 4..=10;

pub fn validate_inputs(questions: u32, id_length: u32) -> Result<()> {
    if !QUESTIONS_RANGE.contains(&questions) {
        return Err(BubblexanError::InvalidInput(format!(
            "questions must be between {} and {} (found {questions})",
            QUESTIONS_RANGE.start(),
            QUESTIONS_RANGE.end()
        )));
    }
    if !ID_LENGTH_RANGE.contains(&id_length) {
        return Err(BubblexanError::InvalidInput(format!(
            "id-length must be between {} and {} (found {id_length})",
            ID_LENGTH_RANGE.start(),
            ID_LENGTH_RANGE.end()
        )));
    }
    Ok(())
}

/// Places markers, the student ID block and the question grid on one page.
///
/// The result is deterministic: identical inputs always produce identical
/// geometry, so the serialized layout can be regenerated for a scan batch.
pub fn solve_layout(
    questions: u32,
    id_length: u32,
    paper_size: PaperSize,
    orientation: IdOrientation,
    settings: &LayoutSettings,
) -> Result<PageLayout> {
    validate_inputs(questions, id_length)?;

    let (width, height) = paper_size.dimensions();
    let (page_width, page_height) = (f64::from(width), f64::from(height));
    let alignment_markers = markers::build_alignment_markers(page_width, page_height, settings);

    let (content_left, content_right) = markers::horizontal_safe_area(
        &alignment_markers,
        page_width,
        settings.margin,
        settings.alignment_clearance,
    )
    .ok_or_else(|| {
        BubblexanError::LayoutInfeasible(
            "alignment markers leave no usable width; decrease alignment clearance or use a larger paper size"
                .to_string(),
        )
    })?;
    let usable_width = content_right - content_left;

    let mut id_top_y = page_height - settings.margin - settings.title_block;
    if let Some(limit) = markers::top_clearance_limit(
        &alignment_markers,
        page_height,
        settings.student_id_marker_clearance,
    ) {
        id_top_y = id_top_y.min(limit - (settings.bubble_radius + settings.student_id_header_gap));
    }
    let student_id_label_y = id_top_y + settings.bubble_radius + settings.student_id_header_gap;

    let id_section = student_id::build_student_id_section(
        id_length,
        content_left,
        usable_width,
        id_top_y,
        orientation,
        settings,
    )?;

    let question_area_top =
        id_section.bottom_center_y - settings.bubble_radius - settings.section_gap;
    let question_section = questions::build_question_section(
        questions,
        question_area_top,
        content_left,
        usable_width,
        settings,
    )?;

    tracing::debug!(
        paper = %paper_size,
        columns = question_section.grid.columns,
        rows = question_section.grid.rows,
        "layout solved"
    );

    Ok(PageLayout {
        paper_size,
        dimensions: Dimensions { width, height },
        questions: question_section.blocks,
        student_id: id_section.columns,
        alignment_markers,
        metadata: LayoutMetadata {
            num_questions: questions,
            id_length,
            student_id_orientation: orientation,
            bubble_radius: settings.bubble_radius,
            bubble_diameter: settings.bubble_diameter(),
            question_row_height: settings.question_row_height,
            option_step: settings.option_step,
            option_label_gap: settings.option_label_gap,
            id_vertical_step: settings.id_vertical_step,
            id_column_step: settings.id_column_step,
            question_column_spacing: question_section.grid.column_spacing,
            question_columns: question_section.grid.columns,
            question_rows: question_section.grid.rows,
            student_id_header_gap: settings.student_id_header_gap,
            digit_label_gap: settings.digit_label_gap,
            content_left,
            content_right,
            margin: settings.margin,
            question_area_top,
            student_id_label_y,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::layout::AlignmentMarker;

    fn all_bubbles(layout: &PageLayout) -> Vec<(f64, f64, f64)> {
        let questions = layout
            .questions
            .iter()
            .flat_map(|block| block.bubbles.iter().map(|b| (b.x, b.y, b.radius)));
        let ids = layout
            .student_id
            .iter()
            .flat_map(|column| column.bubbles.iter().map(|b| (b.x, b.y, b.radius)));
        questions.chain(ids).collect()
    }

    fn inside_clearance(marker: &AlignmentMarker, clearance: f64, x: f64, y: f64) -> bool {
        x > marker.x - clearance
            && x < marker.x + marker.size + clearance
            && y > marker.y - clearance
            && y < marker.y + marker.size + clearance
    }

    #[test]
    fn every_valid_combination_stays_inside_margins_and_clear_of_markers() {
        let settings = LayoutSettings::default();
        for paper in [PaperSize::A4, PaperSize::Letter] {
            for orientation in [IdOrientation::Vertical, IdOrientation::Horizontal] {
                for id_length in ID_LENGTH_RANGE {
                    for questions in QUESTIONS_RANGE {
                        let layout = solve_layout(questions, id_length, paper, orientation, &settings)
                            .expect("default settings should fit every valid combination");
                        assert_eq!(layout.questions.len(), questions as usize);
                        assert_eq!(layout.student_id.len(), id_length as usize);

                        let width = f64::from(layout.dimensions.width);
                        let height = f64::from(layout.dimensions.height);
                        for (x, y, r) in all_bubbles(&layout) {
                            assert!(x - r >= settings.margin - 1e-9);
                            assert!(x + r <= width - settings.margin + 1e-9);
                            assert!(y - r >= settings.margin - 1e-9);
                            assert!(y + r <= height - settings.margin + 1e-9);
                            for marker in &layout.alignment_markers {
                                assert!(!inside_clearance(
                                    marker,
                                    settings.alignment_clearance,
                                    x,
                                    y
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn solve_layout_is_deterministic() {
        let settings = LayoutSettings::default();
        let first = solve_layout(37, 8, PaperSize::Letter, IdOrientation::Horizontal, &settings)
            .expect("layout should solve");
        let second = solve_layout(37, 8, PaperSize::Letter, IdOrientation::Horizontal, &settings)
            .expect("layout should solve");
        assert_eq!(
            serde_json::to_string(&first).expect("layout should serialize"),
            serde_json::to_string(&second).expect("layout should serialize")
        );
    }

    #[test]
    fn letter_with_fifty_questions_and_ten_digits_keeps_every_question() {
        let settings = LayoutSettings::default();
        let layout = solve_layout(50, 10, PaperSize::Letter, IdOrientation::Vertical, &settings)
            .expect("LETTER should hold the maximum sheet");
        assert_eq!(layout.questions.len(), 50);
        assert_eq!(layout.metadata.question_columns, 3);
        assert_eq!(layout.metadata.question_rows, 17);
        let numbers: Vec<u32> = layout.questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        let settings = LayoutSettings::default();
        for (questions, id_length) in [(0, 6), (51, 6), (10, 3), (10, 11)] {
            let result =
                solve_layout(questions, id_length, PaperSize::A4, IdOrientation::Vertical, &settings);
            assert!(matches!(result, Err(BubblexanError::InvalidInput(_))));
        }
    }

    #[test]
    fn oversized_bubbles_are_geometrically_infeasible() {
        let settings = LayoutSettings {
            question_row_height: 60.0,
            ..LayoutSettings::default()
        };
        let result = solve_layout(50, 10, PaperSize::Letter, IdOrientation::Vertical, &settings);
        assert!(matches!(result, Err(BubblexanError::LayoutInfeasible(_))));
    }

    #[test]
    fn metadata_describes_the_wire_contract() {
        let settings = LayoutSettings::default();
        let layout = solve_layout(20, 6, PaperSize::A4, IdOrientation::Vertical, &settings)
            .expect("layout should solve");
        let value = serde_json::to_value(&layout).expect("layout should serialize");

        assert_eq!(value["paper_size"], "A4");
        assert_eq!(value["dimensions"]["width"], 595);
        assert_eq!(value["questions"][0]["bubbles"][0]["option"], "A");
        assert_eq!(value["student_id"][0]["bubbles"][9]["value"], "9");
        assert_eq!(value["alignment_markers"][0]["type"], "square");
        assert_eq!(value["metadata"]["student_id_orientation"], "vertical");
        for key in [
            "num_questions",
            "id_length",
            "bubble_radius",
            "bubble_diameter",
            "question_row_height",
            "option_step",
            "id_vertical_step",
            "id_column_step",
            "question_columns",
            "question_rows",
            "content_left",
            "content_right",
            "margin",
        ] {
            assert!(value["metadata"].get(key).is_some(), "missing metadata key {key}");
        }
    }
}
