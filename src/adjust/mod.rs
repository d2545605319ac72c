pub mod manifest;

use crate::answer_key::{normalize_question_label, AnswerKey, KeyVariant};
use crate::error::{BubblexanError, Result};
use crate::grade::grade_responses;
use crate::report::tables::{self, to_bytes};
use crate::responses::{ResponseTable, SourceFormat};
use crate::table::RawTable;
use crate::types::report::{AdjustmentRecord, GradeReport};
use manifest::{AdjustmentManifest, SourceFile};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Version labels become file-name prefixes, so only `[A-Za-z0-9_-]` is allowed.
pub fn normalize_version(raw: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(BubblexanError::InvalidInput(
            "version label cannot be blank".to_string(),
        ));
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(BubblexanError::InvalidInput(format!(
            "version label '{text}' may only contain letters, numbers, underscores, or hyphens"
        )));
    }
    Ok(text.to_string())
}

/// `q1, Q3,q1` becomes `[Q1, Q3]`.
pub fn parse_question_list(raw: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let questions: Vec<String> = raw
        .split(',')
        .map(normalize_question_label)
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.clone()))
        .collect();
    if questions.is_empty() {
        return Err(BubblexanError::InvalidInput(
            "no valid question ids were supplied via --give-back".to_string(),
        ));
    }
    Ok(questions)
}

pub fn ensure_questions_exist(key: &AnswerKey, questions: &[String]) -> Result<()> {
    match questions.iter().find(|question| !key.contains(question)) {
        Some(missing) => Err(BubblexanError::QuestionNotInKey(missing.clone())),
        None => Ok(()),
    }
}

/// Versioned output locations for one give-back run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveBackPaths {
    pub results: PathBuf,
    pub graded_report: PathBuf,
    pub question_stats: PathBuf,
    pub manifest: PathBuf,
}

impl GiveBackPaths {
    pub fn new(output_dir: &Path, version: &str) -> Self {
        Self {
            results: output_dir.join(format!("{version}_results.csv")),
            graded_report: output_dir.join(format!("{version}_graded_report.csv")),
            question_stats: output_dir.join(format!("{version}_question_stats.csv")),
            manifest: output_dir.join(format!("{version}_adjustment.json")),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            &self.results,
            &self.graded_report,
            &self.question_stats,
            &self.manifest,
        ]
    }
}

pub fn ensure_outputs_available(paths: &[&Path]) -> Result<()> {
    let conflicts: Vec<String> = paths
        .iter()
        .filter(|path| path.exists())
        .map(|path| path.display().to_string())
        .collect();
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(BubblexanError::OutputExists(conflicts.join(", ")))
    }
}

/// Overwrites `selected_answers` in place for every row of each requested
/// question with the key's correct-answer cell, copied verbatim.
pub fn apply_give_backs(
    responses: &mut ResponseTable,
    key: &AnswerKey,
    questions: &[String],
) -> Result<Vec<AdjustmentRecord>> {
    ensure_questions_exist(key, questions)?;

    let mut records = Vec::with_capacity(questions.len());
    for question in questions {
        let Some(spec) = key.get(question) else {
            return Err(BubblexanError::QuestionNotInKey(question.clone()));
        };
        let mut row_count = 0;
        let mut students = BTreeSet::new();
        for row in responses
            .rows
            .iter_mut()
            .filter(|row| row.question_id == *question)
        {
            row.selected_answers = spec.correct_raw.clone();
            row_count += 1;
            students.insert(row.student_id.clone());
        }
        let record = AdjustmentRecord {
            question_id: question.clone(),
            row_count,
            student_count: students.len(),
        };
        tracing::info!("{}", record.describe());
        records.push(record);
    }
    Ok(records)
}

#[derive(Debug, Clone)]
pub struct GiveBackRequest {
    pub results: PathBuf,
    pub key: PathBuf,
    pub questions: Vec<String>,
    pub version: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GiveBackOutcome {
    pub paths: GiveBackPaths,
    pub records: Vec<AdjustmentRecord>,
    pub report: GradeReport,
    /// Lines suitable for the optional `--log` file.
    pub summary: Vec<String>,
}

/// Applies the give-backs, re-grades the adjusted table as a separate pass and
/// writes every artifact only once all of that has succeeded.
pub fn run_give_back(request: &GiveBackRequest) -> Result<GiveBackOutcome> {
    let version = normalize_version(&request.version)?;
    let paths = GiveBackPaths::new(&request.output_dir, &version);
    ensure_outputs_available(&paths.all())?;

    let key_bytes = read_source(&request.key)?;
    let key_source = request.key.display().to_string();
    let key_table = RawTable::from_reader(key_bytes.as_slice(), &key_source)?;
    let key = AnswerKey::from_table(&key_table, KeyVariant::Grading)?;
    ensure_questions_exist(&key, &request.questions)?;

    let results_bytes = read_source(&request.results)?;
    let results_source = request.results.display().to_string();
    let mut responses = ResponseTable::from_reader(results_bytes.as_slice(), &results_source)?;
    if responses.format != SourceFormat::Long {
        return Err(BubblexanError::InvalidInput(format!(
            "{results_source} must be in long format (student_id, question_id, selected_answers) for give-back"
        )));
    }

    let records = apply_give_backs(&mut responses, &key, &request.questions)?;
    let adjusted_bytes = responses.to_csv_bytes()?;

    // Grade what will actually be written, not the in-memory table.
    let adjusted_source = paths.results.display().to_string();
    let regraded = ResponseTable::from_reader(adjusted_bytes.as_slice(), &adjusted_source)?;
    let report = grade_responses(&regraded, &key)?;

    let graded_bytes = to_bytes(&report, |w, r| tables::write_graded_report(w, r))?;
    let stats_bytes = to_bytes(&report, |w, r| tables::write_question_stats(w, r))?;
    let outputs = paths
        .all()
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    let manifest = AdjustmentManifest::new(
        &version,
        SourceFile::new(&request.results, &results_bytes),
        SourceFile::new(&request.key, &key_bytes),
        records.clone(),
        outputs,
    );
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;

    tables::write_output(&paths.results, &adjusted_bytes)?;
    tables::write_output(&paths.graded_report, &graded_bytes)?;
    tables::write_output(&paths.question_stats, &stats_bytes)?;
    tables::write_output(&paths.manifest, &manifest_bytes)?;

    let mut summary = vec![
        format!("Version: {version}"),
        format!("Results source: {}", request.results.display()),
        format!("Answer key: {}", request.key.display()),
        format!("Adjusted results: {}", paths.results.display()),
        "Question adjustments:".to_string(),
    ];
    summary.extend(records.iter().map(|record| format!("  - {}", record.describe())));
    summary.push(format!("Graded CSV: {}", paths.graded_report.display()));
    summary.push(format!("Question stats: {}", paths.question_stats.display()));
    summary.push(format!("Manifest: {}", paths.manifest.display()));

    Ok(GiveBackOutcome {
        paths,
        records,
        report,
        summary,
    })
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(BubblexanError::PathNotFound(path.display().to_string()));
    }
    Ok(fs::read(path)?)
}
