pub const MM_TO_POINTS: f64 = 72.0 / 25.4;

pub fn mm_to_points(value: f64) -> f64 {
    value * MM_TO_POINTS
}

/// Physical sheet dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub margin: f64,
    pub bubble_radius: f64,
    pub question_label_width: f64,
    pub question_row_height: f64,
    pub question_column_spacing: f64,
    pub question_column_spacing_min: f64,
    pub option_step: f64,
    pub option_label_gap: f64,
    pub id_column_step: f64,
    pub id_vertical_step: f64,
    pub section_gap: f64,
    pub title_block: f64,
    pub student_id_header_gap: f64,
    pub digit_label_gap: f64,
    pub student_id_marker_clearance: f64,
    pub alignment_clearance: f64,
    pub marker_size: f64,
}

impl LayoutSettings {
    pub fn bubble_diameter(&self) -> f64 {
        self.bubble_radius * 2.0
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let bubble_diameter = mm_to_points(4.0);
        Self {
            margin: 36.0,
            bubble_radius: bubble_diameter / 2.0,
            question_label_width: mm_to_points(12.0),
            question_row_height: bubble_diameter + mm_to_points(4.0),
            question_column_spacing: mm_to_points(14.0),
            question_column_spacing_min: mm_to_points(6.0),
            option_step: bubble_diameter + mm_to_points(4.0),
            option_label_gap: mm_to_points(2.5),
            id_column_step: bubble_diameter + mm_to_points(6.0),
            id_vertical_step: bubble_diameter + mm_to_points(3.0),
            section_gap: mm_to_points(14.0),
            title_block: mm_to_points(18.0),
            student_id_header_gap: mm_to_points(8.0),
            digit_label_gap: mm_to_points(2.5),
            student_id_marker_clearance: mm_to_points(6.0),
            alignment_clearance: mm_to_points(6.0),
            marker_size: mm_to_points(12.0),
        }
    }
}
