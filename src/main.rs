mod adjust;
mod analyze;
mod answer_key;
mod cli;
mod config;
mod error;
mod grade;
mod layout;
mod report;
mod responses;
mod session;
mod table;
mod types;

use crate::answer_key::{AnswerKey, KeyVariant};
use crate::error::{BubblexanError, Result};
use crate::report::tables::{self, to_bytes};
use crate::responses::ResponseTable;
use crate::session::{Stage, TestSession};
use crate::types::config::BubblexanConfig;
use crate::types::layout::{IdOrientation, PaperSize};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Explicit flag first, then the session default, else the flag is required.
fn resolve<T>(explicit: Option<T>, from_session: Option<T>, flag: &str) -> Result<T> {
    explicit.or(from_session).ok_or_else(|| {
        BubblexanError::InvalidInput(format!("{flag} is required when no --session is given"))
    })
}

fn output_format(format: &cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn run_generate(
    cmd: cli::GenerateCommand,
    cfg: &BubblexanConfig,
    session: Option<&TestSession>,
) -> Result<i32> {
    let paper_size = match cmd.paper_size {
        Some(cli::PaperArg::A4) => PaperSize::A4,
        Some(cli::PaperArg::Letter) => PaperSize::Letter,
        None => cfg.paper_size()?,
    };
    let orientation = match cmd.id_orientation {
        Some(cli::OrientationArg::Vertical) => IdOrientation::Vertical,
        Some(cli::OrientationArg::Horizontal) => IdOrientation::Horizontal,
        None => cfg.id_orientation()?,
    };
    let id_length = cmd.id_length.unwrap_or_else(|| cfg.id_length());
    let path = match (cmd.output, cmd.output_dir, session) {
        (None, None, Some(active)) => active.layout_path(),
        (output, output_dir, session) => {
            let prefix = resolve(output, session.map(|s| s.title().to_string()), "--output")?;
            output_dir
                .or_else(|| session.map(|s| s.dir(Stage::BubbleSheets)))
                .unwrap_or_else(|| PathBuf::from("output"))
                .join(format!("{prefix}_layout.json"))
        }
    };

    let page = layout::solve_layout(
        cmd.questions,
        id_length,
        paper_size,
        orientation,
        &layout::settings::LayoutSettings::default(),
    )?;
    let json = serde_json::to_string_pretty(&page)?;
    tables::write_output(&path, json.as_bytes())?;

    println!(
        "Layout: {} question(s) in {} column(s) x {} row(s) on {}",
        page.metadata.num_questions,
        page.metadata.question_columns,
        page.metadata.question_rows,
        page.paper_size
    );
    println!("Wrote {}", path.display());
    Ok(exit_code::SUCCESS)
}

fn run_grade(cmd: cli::GradeCommand, session: Option<&TestSession>) -> Result<i32> {
    let responses_path = resolve(
        cmd.responses,
        session.map(TestSession::results_path),
        "RESPONSES",
    )?;
    let key_path = resolve(cmd.key, session.map(TestSession::answer_key_path), "KEY")?;
    let output_dir = cmd
        .output_dir
        .or_else(|| session.map(|s| s.dir(Stage::Grades)))
        .unwrap_or_else(|| PathBuf::from("."));

    let key = AnswerKey::load(&key_path, KeyVariant::Grading)?;
    let responses = ResponseTable::load(&responses_path)?;
    let graded = grade::grade_responses(&responses, &key)?;

    let graded_bytes = to_bytes(&graded, |w, r| tables::write_graded_report(w, r))?;
    let stats_bytes = to_bytes(&graded, |w, r| tables::write_question_stats(w, r))?;
    let (graded_path, stats_path) = grade::grade_output_paths(&output_dir, "");
    tables::write_output(&graded_path, &graded_bytes)?;
    tables::write_output(&stats_path, &stats_bytes)?;

    println!("{}", report::render_grade(&graded, output_format(&cmd.format))?);
    println!("Wrote {} and {}", graded_path.display(), stats_path.display());
    Ok(exit_code::SUCCESS)
}

fn run_analyze(
    cmd: cli::AnalyzeCommand,
    cfg: &BubblexanConfig,
    session: Option<&TestSession>,
) -> Result<i32> {
    let results_path = resolve(
        cmd.results,
        session.map(TestSession::results_path),
        "--results",
    )?;
    let key_path = resolve(cmd.key, session.map(TestSession::answer_key_path), "--key")?;
    let output_path = resolve(
        cmd.output,
        session.map(TestSession::miss_report_path),
        "--output",
    )?;
    let miss_threshold = cmd.miss_threshold.unwrap_or_else(|| cfg.miss_threshold());
    let partial_threshold = cmd
        .partial_threshold
        .unwrap_or_else(|| cfg.partial_threshold());
    analyze::validate_thresholds(miss_threshold, partial_threshold)?;

    let responses = ResponseTable::load(&results_path)?;
    let key = AnswerKey::load(&key_path, KeyVariant::Analysis)?;
    let misses = analyze::analyze_misses(&responses, &key, miss_threshold, partial_threshold)?;

    let bytes = to_bytes(&misses, |w, r| tables::write_miss_report(w, r))?;
    tables::write_output(&output_path, &bytes)?;

    println!("{}", report::render_misses(&misses, output_format(&cmd.format))?);
    match cmd.log {
        Some(log_path) => {
            if tables::write_log(&log_path, &misses.warnings)? {
                println!(
                    "Wrote {} warning(s) to {}",
                    misses.warnings.len(),
                    log_path.display()
                );
            }
        }
        None if !misses.warnings.is_empty() => println!(
            "Note: {} warning(s) generated. Use --log to capture them.",
            misses.warnings.len()
        ),
        None => {}
    }
    if let Some(summary) = analyze::high_miss_summary(&misses) {
        println!("Warning: {summary}");
    }
    println!("Wrote miss report to {}", output_path.display());
    Ok(exit_code::SUCCESS)
}

fn run_give_back(cmd: cli::GiveBackCommand, session: Option<&TestSession>) -> Result<i32> {
    let questions = adjust::parse_question_list(&cmd.give_back)?;
    let version = resolve(
        cmd.version_label,
        session.map(TestSession::next_adjustment_version),
        "--version",
    )?;
    let request = adjust::GiveBackRequest {
        results: resolve(
            cmd.results,
            session.map(TestSession::results_path),
            "--results",
        )?,
        key: resolve(cmd.key, session.map(TestSession::answer_key_path), "--key")?,
        questions,
        version,
        output_dir: cmd
            .output_dir
            .or_else(|| session.map(|s| s.dir(Stage::Adjustments)))
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let outcome = adjust::run_give_back(&request)?;
    for record in &outcome.records {
        println!("{}", record.describe());
    }
    println!("{}", report::render_grade(&outcome.report, output_format(&cmd.format))?);
    for path in outcome.paths.all() {
        println!("Saved {}", path.display());
    }
    if let Some(log_path) = cmd.log {
        let mut text = outcome.summary.join("\n");
        text.push('\n');
        tables::write_output(&log_path, text.as_bytes())?;
        println!("Saved {}", log_path.display());
    }
    Ok(exit_code::SUCCESS)
}

fn run_key(cmd: cli::KeyCommand, session: Option<&TestSession>) -> Result<i32> {
    match cmd {
        cli::KeyCommand::Build(build) => {
            let output = resolve(
                build.output,
                session.map(TestSession::answer_key_path),
                "--output",
            )?;
            let entries = answer_key::writer::entries_from_answers(&build.answers, build.points)?;
            answer_key::writer::write_answer_key_file(&output, &entries)?;
            println!("Wrote {} question(s) to {}", entries.len(), output.display());
        }
        cli::KeyCommand::Check(check) => {
            let key = AnswerKey::load(&check.path, KeyVariant::Grading)?;
            for spec in key.entries() {
                println!(
                    "{}: {} ({:.2} pts{})",
                    spec.label,
                    spec.display,
                    spec.points_or_zero(),
                    if spec.is_multiple() { ", multi-select" } else { "" }
                );
            }
            println!(
                "{} question(s), {:.2} total point(s)",
                key.len(),
                key.total_points()
            );
        }
    }
    Ok(exit_code::SUCCESS)
}

fn run_session(cmd: cli::SessionCommand, cfg: &BubblexanConfig) -> Result<i32> {
    let build_root = |explicit: Option<PathBuf>| {
        explicit.unwrap_or_else(|| PathBuf::from(cfg.build_root()))
    };
    match cmd {
        cli::SessionCommand::New(new) => {
            let root = build_root(new.build_root);
            let created = TestSession::create(&root, &new.title)?;
            println!("Created {}", created.root().display());
        }
        cli::SessionCommand::List(list) => {
            let root = build_root(list.build_root);
            let sessions = TestSession::list(&root)?;
            if sessions.is_empty() {
                println!("no sessions found in {}", root.display());
            }
            for found in &sessions {
                println!(
                    "{}\t{}\t{}",
                    found.title(),
                    found.timestamp(),
                    found.root().display()
                );
            }
        }
    }
    Ok(exit_code::SUCCESS)
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir()?;
    let cfg = config::load_config(&cwd)?;
    let session = cli
        .session
        .as_deref()
        .map(TestSession::open)
        .transpose()?;
    if let Some(active) = &session {
        tracing::info!(session = %active.root().display(), "using test session");
    }

    match cli.command {
        cli::Commands::Generate(cmd) => run_generate(cmd, &cfg, session.as_ref()),
        cli::Commands::Grade(cmd) => run_grade(cmd, session.as_ref()),
        cli::Commands::Analyze(cmd) => run_analyze(cmd, &cfg, session.as_ref()),
        cli::Commands::GiveBack(cmd) => run_give_back(cmd, session.as_ref()),
        cli::Commands::Key(cmd) => run_key(cmd, session.as_ref()),
        cli::Commands::Session(cmd) => run_session(cmd, &cfg),
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::FAILURE);
        }
    }
}
