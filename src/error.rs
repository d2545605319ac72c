use thiserror::Error;

#[derive(Error, Debug)]
pub enum BubblexanError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{file} missing column(s): {columns}")]
    MissingColumns { file: String, columns: String },

    #[error("layout infeasible: {0}")]
    LayoutInfeasible(String),

    #[error("question '{0}' not found in answer key")]
    QuestionNotInKey(String),

    #[error("question '{0}' not found in results columns")]
    QuestionNotInResults(String),

    #[error("refusing to overwrite existing file(s): {0}")]
    OutputExists(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BubblexanError>;
