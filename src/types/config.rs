use crate::error::BubblexanError;
use crate::types::layout::{IdOrientation, PaperSize};
use serde::Deserialize;

pub const DEFAULT_ID_LENGTH: u32 = 6;
pub const DEFAULT_MISS_THRESHOLD: f64 = 50.0;
pub const DEFAULT_PARTIAL_THRESHOLD: f64 = 1.0;
pub const DEFAULT_BUILD_ROOT: &str = "test_build";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BubblexanConfig {
    pub layout: Option<LayoutConfig>,
    pub analysis: Option<AnalysisConfig>,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub paper_size: Option<String>,
    pub id_length: Option<u32>,
    pub id_orientation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub miss_threshold: Option<f64>,
    pub partial_threshold: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub build_root: Option<String>,
}

impl BubblexanConfig {
    pub fn paper_size(&self) -> Result<PaperSize, BubblexanError> {
        match self.layout.as_ref().and_then(|layout| layout.paper_size.as_deref()) {
            Some(raw) => raw
                .parse()
                .map_err(|e: BubblexanError| BubblexanError::ConfigParse(format!("layout: {e}"))),
            None => Ok(PaperSize::A4),
        }
    }

    pub fn id_orientation(&self) -> Result<IdOrientation, BubblexanError> {
        match self
            .layout
            .as_ref()
            .and_then(|layout| layout.id_orientation.as_deref())
        {
            Some(raw) => raw
                .parse()
                .map_err(|e: BubblexanError| BubblexanError::ConfigParse(format!("layout: {e}"))),
            None => Ok(IdOrientation::Vertical),
        }
    }

    pub fn id_length(&self) -> u32 {
        self.layout
            .as_ref()
            .and_then(|layout| layout.id_length)
            .unwrap_or(DEFAULT_ID_LENGTH)
    }

    pub fn miss_threshold(&self) -> f64 {
        self.analysis
            .as_ref()
            .and_then(|analysis| analysis.miss_threshold)
            .unwrap_or(DEFAULT_MISS_THRESHOLD)
    }

    pub fn partial_threshold(&self) -> f64 {
        self.analysis
            .as_ref()
            .and_then(|analysis| analysis.partial_threshold)
            .unwrap_or(DEFAULT_PARTIAL_THRESHOLD)
    }

    pub fn build_root(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|session| session.build_root.as_deref())
            .unwrap_or(DEFAULT_BUILD_ROOT)
    }

    pub fn validate(&self) -> Result<(), BubblexanError> {
        self.paper_size()?;
        self.id_orientation()?;

        let id_length = self.id_length();
        if !(4..=10).contains(&id_length) {
            return Err(BubblexanError::ConfigParse(format!(
                "layout.id_length must be between 4 and 10 (found {id_length})"
            )));
        }

        let miss_threshold = self.miss_threshold();
        if miss_threshold < 0.0 {
            return Err(BubblexanError::ConfigParse(
                "analysis.miss_threshold cannot be negative".to_string(),
            ));
        }
        let partial_threshold = self.partial_threshold();
        if !(partial_threshold > 0.0 && partial_threshold <= 1.0) {
            return Err(BubblexanError::ConfigParse(
                "analysis.partial_threshold must be greater than 0.0 and at most 1.0".to_string(),
            ));
        }

        if self.build_root().trim().is_empty() {
            return Err(BubblexanError::ConfigParse(
                "session.build_root cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}
