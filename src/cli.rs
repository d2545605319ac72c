use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bubblexan",
    version,
    about = "Bubble-sheet layout, grading, miss analysis and give-back CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Test session folder used for default input and output locations
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Solve the sheet geometry and write `<prefix>_layout.json`
    Generate(GenerateCommand),
    /// Score responses against an answer key
    Grade(GradeCommand),
    /// Report per-question miss rates and partial credit
    Analyze(AnalyzeCommand),
    /// Credit every student for selected questions and re-grade
    GiveBack(GiveBackCommand),
    /// Build or check answer-key CSV files
    #[command(subcommand)]
    Key(KeyCommand),
    /// Create or list test session folders
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PaperArg {
    A4,
    Letter,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrientationArg {
    Vertical,
    Horizontal,
}

#[derive(Args)]
pub struct GenerateCommand {
    /// Number of questions (1-50)
    #[arg(long)]
    pub questions: u32,
    /// Student ID digits (4-10)
    #[arg(long)]
    pub id_length: Option<u32>,
    #[arg(long, value_enum, ignore_case = true)]
    pub id_orientation: Option<OrientationArg>,
    #[arg(long, value_enum, ignore_case = true)]
    pub paper_size: Option<PaperArg>,
    /// Output filename prefix; defaults to the session title
    #[arg(long)]
    pub output: Option<String>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct GradeCommand {
    /// Responses CSV (long or wide format)
    pub responses: Option<PathBuf>,
    /// Answer-key CSV with Question, Correct_Answer, Points
    pub key: Option<PathBuf>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AnalyzeCommand {
    #[arg(long)]
    pub results: Option<PathBuf>,
    #[arg(long)]
    pub key: Option<PathBuf>,
    /// Destination CSV for the miss report
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Flag questions missed by at least this percentage of students
    #[arg(long)]
    pub miss_threshold: Option<f64>,
    /// Minimum fraction of correct options that avoids counting as a miss
    #[arg(long)]
    pub partial_threshold: Option<f64>,
    /// Write warnings here instead of printing a count
    #[arg(long)]
    pub log: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct GiveBackCommand {
    #[arg(long)]
    pub results: Option<PathBuf>,
    #[arg(long)]
    pub key: Option<PathBuf>,
    /// Comma-separated question ids, e.g. Q1,Q3
    #[arg(long)]
    pub give_back: String,
    /// Label prefixed to every output file; defaults to the next
    /// `adjustment_<n>` inside a session
    #[arg(long = "version", id = "version_label")]
    pub version_label: Option<String>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Optional summary log
    #[arg(long)]
    pub log: Option<PathBuf>,
    /// Format of the re-graded summary printed after the adjustment
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Write an answer key from one `--answer` per question
    Build(KeyBuildCommand),
    /// Validate an answer key and print its questions
    Check(KeyCheckCommand),
}

#[derive(Args)]
pub struct KeyBuildCommand {
    /// Correct letters for the next question, e.g. `b` or `b,c,d`
    #[arg(long = "answer", required = true)]
    pub answers: Vec<String>,
    #[arg(long, default_value_t = 1.0)]
    pub points: f64,
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct KeyCheckCommand {
    pub path: PathBuf,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Create `<build_root>/<title>_<YYYYmmdd>_<HHMM>` with its stage folders
    New(SessionNewCommand),
    /// List existing sessions
    List(SessionListCommand),
}

#[derive(Args)]
pub struct SessionNewCommand {
    pub title: String,
    #[arg(long)]
    pub build_root: Option<PathBuf>,
}

#[derive(Args)]
pub struct SessionListCommand {
    #[arg(long)]
    pub build_root: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
