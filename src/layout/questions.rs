use super::settings::LayoutSettings;
use crate::error::{BubblexanError, Result};
use crate::types::layout::{OptionBubble, Point, QuestionBlock};
use crate::types::option::OptionLetter;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridShape {
    pub columns: u32,
    pub rows: u32,
    pub column_spacing: f64,
}

pub struct QuestionSection {
    pub blocks: Vec<QuestionBlock>,
    pub grid: GridShape,
}

pub fn question_block_width(settings: &LayoutSettings) -> f64 {
    let options = OptionLetter::ALL.len() as f64;
    settings.question_label_width
        + settings.bubble_diameter()
        + settings.option_step * (options - 1.0)
}

/// Widest grid whose columns fit the width and whose rows fit the height.
pub fn choose_grid(
    questions: u32,
    available_width: f64,
    available_height: f64,
    settings: &LayoutSettings,
) -> Result<GridShape> {
    if available_height <= settings.question_row_height {
        return Err(BubblexanError::LayoutInfeasible(
            "not enough vertical space for the questions section; reduce id-length".to_string(),
        ));
    }

    let block_width = question_block_width(settings);
    let max_rows_by_height =
        ((available_height / settings.question_row_height).floor() as u32).max(1);
    let max_columns_by_width = (((available_width + settings.question_column_spacing_min)
        / (block_width + settings.question_column_spacing_min))
        .floor() as u32)
        .max(1);
    let max_columns = questions.min(max_columns_by_width);

    for columns in (1..=max_columns).rev() {
        let Some(column_spacing) = spacing_for_columns(columns, block_width, available_width, settings)
        else {
            continue;
        };
        let rows = questions.div_ceil(columns);
        if rows <= max_rows_by_height {
            tracing::debug!(columns, rows, column_spacing, "question grid chosen");
            return Ok(GridShape {
                columns,
                rows,
                column_spacing,
            });
        }
    }

    Err(BubblexanError::LayoutInfeasible(
        "question grid cannot fit on the selected paper size; reduce questions or id-length"
            .to_string(),
    ))
}

fn spacing_for_columns(
    columns: u32,
    block_width: f64,
    available_width: f64,
    settings: &LayoutSettings,
) -> Option<f64> {
    if columns == 1 {
        return (block_width <= available_width).then_some(0.0);
    }
    let total_block_width = f64::from(columns) * block_width;
    if total_block_width > available_width {
        return None;
    }
    let max_spacing = (available_width - total_block_width) / f64::from(columns - 1);
    if max_spacing < settings.question_column_spacing_min {
        return None;
    }
    Some(settings.question_column_spacing.min(max_spacing))
}

/// Numbers questions column-major: down each column, then across.
pub fn build_question_section(
    questions: u32,
    area_top: f64,
    start_x: f64,
    available_width: f64,
    settings: &LayoutSettings,
) -> Result<QuestionSection> {
    let available_height = area_top - (settings.margin + settings.bubble_radius);
    let grid = choose_grid(questions, available_width, available_height, settings)?;
    let block_width = question_block_width(settings);

    let mut blocks = Vec::with_capacity(questions as usize);
    let mut number = 1;
    'columns: for column_index in 0..grid.columns {
        let column_x = start_x + f64::from(column_index) * (block_width + grid.column_spacing);
        for row_index in 0..grid.rows {
            if number > questions {
                break 'columns;
            }
            let center_y = area_top - f64::from(row_index) * settings.question_row_height;
            let first_bubble_x = column_x + settings.question_label_width + settings.bubble_radius;
            let bubbles = OptionLetter::ALL
                .iter()
                .enumerate()
                .map(|(index, &option)| OptionBubble {
                    option,
                    x: first_bubble_x + index as f64 * settings.option_step,
                    y: center_y,
                    radius: settings.bubble_radius,
                })
                .collect();
            blocks.push(QuestionBlock {
                number,
                label_position: Point {
                    x: column_x,
                    y: center_y,
                },
                bubbles,
            });
            number += 1;
        }
    }

    Ok(QuestionSection { blocks, grid })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_grid_prefers_most_columns_that_fit() {
        let settings = LayoutSettings::default();
        let grid = choose_grid(50, 456.0, 480.0, &settings).expect("grid should fit");
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.rows, 17);
        assert!(grid.column_spacing >= settings.question_column_spacing_min);
        assert!(grid.column_spacing <= settings.question_column_spacing);
    }

    #[test]
    fn choose_grid_never_uses_more_columns_than_questions() {
        let settings = LayoutSettings::default();
        let grid = choose_grid(2, 456.0, 480.0, &settings).expect("grid should fit");
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.rows, 1);
    }

    #[test]
    fn choose_grid_fails_without_room() {
        let settings = LayoutSettings::default();
        let result = choose_grid(50, 140.0, 200.0, &settings);
        assert!(matches!(result, Err(BubblexanError::LayoutInfeasible(_))));
        let result = choose_grid(1, 456.0, settings.question_row_height, &settings);
        assert!(matches!(result, Err(BubblexanError::LayoutInfeasible(_))));
    }

    #[test]
    fn questions_are_numbered_column_major() {
        let settings = LayoutSettings::default();
        let section = build_question_section(7, 500.0, 70.0, 456.0, &settings)
            .expect("section should build");
        assert_eq!(section.grid.columns, 3);
        assert_eq!(section.grid.rows, 3);
        assert_eq!(section.blocks.len(), 7);

        let second = &section.blocks[1];
        let fourth = &section.blocks[3];
        assert_eq!(second.number, 2);
        assert_eq!(second.label_position.x, section.blocks[0].label_position.x);
        assert!(fourth.label_position.x > second.label_position.x);
        assert_eq!(fourth.label_position.y, 500.0);

        let options: Vec<_> = second.bubbles.iter().map(|bubble| bubble.option).collect();
        assert_eq!(options, OptionLetter::ALL.to_vec());
    }
}
