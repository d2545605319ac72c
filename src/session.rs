use crate::error::{BubblexanError, Result};
use chrono::{Local, NaiveDateTime};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const ADJUSTMENT_PREFIX: &str = "adjustment";

/// Working folders inside a test session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Inputs,
    Scans,
    BubbleSheets,
    Tests,
    ScannedImages,
    Results,
    Grades,
    MissAnalysis,
    Adjustments,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Self::Inputs,
        Self::Scans,
        Self::BubbleSheets,
        Self::Tests,
        Self::ScannedImages,
        Self::Results,
        Self::Grades,
        Self::MissAnalysis,
        Self::Adjustments,
    ];

    pub fn relative_path(self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
            Self::Scans => "inputs/scans",
            Self::BubbleSheets => "bubble_sheets",
            Self::Tests => "tests",
            Self::ScannedImages => "scanned_images",
            Self::Results => "results",
            Self::Grades => "grades",
            Self::MissAnalysis => "miss_analysis",
            Self::Adjustments => "adjustments",
        }
    }
}

/// An explicit handle on one `<title>_<YYYYmmdd>_<HHMM>` test folder.
///
/// Every command that works inside a session receives one of these instead of
/// consulting process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSession {
    root: PathBuf,
    title: String,
    timestamp: String,
}

impl TestSession {
    pub fn create(build_root: &Path, title: &str) -> Result<Self> {
        Self::create_at(build_root, title, Local::now().naive_local())
    }

    pub fn create_at(build_root: &Path, title: &str, now: NaiveDateTime) -> Result<Self> {
        validate_title(title)?;
        if Self::list(build_root)?
            .iter()
            .any(|session| session.title == title)
        {
            return Err(BubblexanError::InvalidInput(format!(
                "a test named '{title}' already exists; choose a unique name"
            )));
        }

        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let root = build_root.join(format!("{title}_{timestamp}"));
        if root.exists() {
            return Err(BubblexanError::OutputExists(format!(
                "{} (wait a minute for a new timestamp)",
                root.display()
            )));
        }

        fs::create_dir_all(&root)?;
        for stage in Stage::ALL {
            fs::create_dir_all(root.join(stage.relative_path()))?;
        }
        tracing::info!(path = %root.display(), "test session created");

        Ok(Self {
            root,
            title: title.to_string(),
            timestamp,
        })
    }

    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BubblexanError::PathNotFound(dir.display().to_string()));
        }
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (title, timestamp) = split_folder_name(&name).ok_or_else(|| {
            BubblexanError::InvalidInput(format!(
                "'{name}' is not a test session folder (expected <title>_<YYYYmmdd>_<HHMM>)"
            ))
        })?;
        Ok(Self {
            root: dir.to_path_buf(),
            title: title.to_string(),
            timestamp: timestamp.to_string(),
        })
    }

    /// Sessions under `build_root` sorted by folder name; a repeated title keeps
    /// its first folder only.
    pub fn list(build_root: &Path) -> Result<Vec<Self>> {
        if !build_root.exists() {
            return Ok(Vec::new());
        }

        let mut folders: Vec<PathBuf> = WalkDir::new(build_root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .collect();
        folders.sort();

        let mut seen = BTreeSet::new();
        let mut sessions = Vec::new();
        for folder in folders {
            let Ok(session) = Self::open(&folder) else {
                continue;
            };
            if seen.insert(session.title.clone()) {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn dir(&self, stage: Stage) -> PathBuf {
        self.root.join(stage.relative_path())
    }

    pub fn layout_path(&self) -> PathBuf {
        self.dir(Stage::BubbleSheets)
            .join(format!("{}_layout.json", self.title))
    }

    pub fn answer_key_path(&self) -> PathBuf {
        self.dir(Stage::Tests)
            .join(format!("{}_answer_key.csv", self.title))
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir(Stage::Results).join("results.csv")
    }

    pub fn miss_report_path(&self) -> PathBuf {
        self.dir(Stage::MissAnalysis).join("miss_report.csv")
    }

    /// Version labels with a `<label>_results.csv` in `adjustments/`.
    pub fn adjustment_versions(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.dir(Stage::Adjustments)) else {
            return Vec::new();
        };
        let versions: BTreeSet<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.strip_suffix("_results.csv"))
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
            })
            .collect();
        versions.into_iter().collect()
    }

    /// `adjustment_<n+1>` where `n` is the highest existing numbered label.
    pub fn next_adjustment_version(&self) -> String {
        let highest = self
            .adjustment_versions()
            .iter()
            .filter_map(|label| {
                label
                    .strip_prefix(ADJUSTMENT_PREFIX)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .and_then(|number| number.parse::<u32>().ok())
            })
            .max()
            .unwrap_or(0);
        format!("{ADJUSTMENT_PREFIX}_{}", highest + 1)
    }
}

pub fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(BubblexanError::InvalidInput(
            "test name cannot be empty".to_string(),
        ));
    }
    if !title
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(BubblexanError::InvalidInput(format!(
            "test name '{title}' is invalid; use letters, numbers, underscores, or hyphens"
        )));
    }
    Ok(())
}

/// `midterm_1_20240305_0930` splits into `("midterm_1", "20240305_0930")`.
pub fn split_folder_name(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.rsplitn(3, '_');
    let time = parts.next()?;
    let date = parts.next()?;
    let title = parts.next()?;
    let digits =
        |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
    if title.is_empty() || !digits(date, 8) || !digits(time, 4) {
        return None;
    }
    Some((title, &name[title.len() + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("timestamp should be valid")
    }

    #[test]
    fn create_builds_every_stage_folder() {
        let dir = TempDir::new().expect("temp dir should be created");
        let session = TestSession::create_at(dir.path(), "midterm_1", at(9, 30))
            .expect("session should create");

        assert_eq!(session.title(), "midterm_1");
        assert_eq!(session.timestamp(), "20240305_0930");
        assert!(session.root().ends_with("midterm_1_20240305_0930"));
        for stage in Stage::ALL {
            assert!(session.dir(stage).is_dir(), "{stage:?} should exist");
        }
        assert!(session
            .layout_path()
            .ends_with("bubble_sheets/midterm_1_layout.json"));
    }

    #[test]
    fn titles_must_be_valid_and_unique() {
        let dir = TempDir::new().expect("temp dir should be created");
        assert!(TestSession::create_at(dir.path(), "bad name", at(9, 0)).is_err());
        assert!(TestSession::create_at(dir.path(), "", at(9, 0)).is_err());

        TestSession::create_at(dir.path(), "final", at(9, 0)).expect("first session should create");
        let err = TestSession::create_at(dir.path(), "final", at(10, 0))
            .expect_err("duplicate title should fail");
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn list_skips_folders_outside_the_naming_scheme() {
        let dir = TempDir::new().expect("temp dir should be created");
        TestSession::create_at(dir.path(), "quiz", at(8, 15)).expect("session should create");
        TestSession::create_at(dir.path(), "exam", at(8, 15)).expect("session should create");
        fs::create_dir_all(dir.path().join("scratch")).expect("folder should be created");
        fs::create_dir_all(dir.path().join("notes_2024_x")).expect("folder should be created");

        let titles: Vec<String> = TestSession::list(dir.path())
            .expect("list should succeed")
            .iter()
            .map(|session| session.title().to_string())
            .collect();
        assert_eq!(titles, vec!["exam", "quiz"]);
    }

    #[test]
    fn next_adjustment_version_counts_up() {
        let dir = TempDir::new().expect("temp dir should be created");
        let session =
            TestSession::create_at(dir.path(), "exam", at(8, 0)).expect("session should create");
        assert_eq!(session.next_adjustment_version(), "adjustment_1");

        let adjustments = session.dir(Stage::Adjustments);
        fs::write(adjustments.join("adjustment_3_results.csv"), "")
            .expect("file should be written");
        fs::write(adjustments.join("curve_results.csv"), "").expect("file should be written");
        assert_eq!(session.adjustment_versions(), vec!["adjustment_3", "curve"]);
        assert_eq!(session.next_adjustment_version(), "adjustment_4");
    }

    #[test]
    fn split_folder_name_requires_date_and_time() {
        assert_eq!(
            split_folder_name("midterm_1_20240305_0930"),
            Some(("midterm_1", "20240305_0930"))
        );
        assert_eq!(split_folder_name("midterm_0930"), None);
        assert_eq!(split_folder_name("_20240305_0930"), None);
    }
}
