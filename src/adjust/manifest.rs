use crate::types::report::AdjustmentRecord;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: String,
    pub sha256: String,
}

impl SourceFile {
    pub fn new(path: &Path, bytes: &[u8]) -> Self {
        Self {
            path: path.display().to_string(),
            sha256: sha256_hex(bytes),
        }
    }
}

/// Audit record written next to the adjusted outputs.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentManifest {
    pub timestamp: String,
    pub bubblexan_version: String,
    pub version_label: String,
    pub results: SourceFile,
    pub key: SourceFile,
    pub questions: Vec<String>,
    pub records: Vec<AdjustmentRecord>,
    pub outputs: Vec<String>,
}

impl AdjustmentManifest {
    pub fn new(
        version_label: &str,
        results: SourceFile,
        key: SourceFile,
        records: Vec<AdjustmentRecord>,
        outputs: Vec<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            bubblexan_version: env!("CARGO_PKG_VERSION").to_string(),
            version_label: version_label.to_string(),
            results,
            key,
            questions: records
                .iter()
                .map(|record| record.question_id.clone())
                .collect(),
            records,
            outputs,
        }
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}
