pub mod json;
pub mod md;
pub mod tables;

use crate::error::BubblexanError;
use crate::types::report::{GradeReport, MissReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_grade(report: &GradeReport, format: OutputFormat) -> Result<String, BubblexanError> {
    match format {
        OutputFormat::Json => json::grade_to_json(report).map_err(BubblexanError::Json),
        OutputFormat::Md => Ok(md::grade_to_markdown(report)),
    }
}

pub fn render_misses(report: &MissReport, format: OutputFormat) -> Result<String, BubblexanError> {
    match format {
        OutputFormat::Json => json::misses_to_json(report).map_err(BubblexanError::Json),
        OutputFormat::Md => Ok(md::misses_to_markdown(report)),
    }
}
