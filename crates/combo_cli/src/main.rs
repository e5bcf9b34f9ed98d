// crates/combo_cli/src/main.rs
//
// load session → one availability pass → report (stdout or --out DIR) → exit code.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, malformed JSON, unknown attribute, digest mismatch.
    pub const VALIDATION: i32 = 2;
    /// Read/write/path/limit failures.
    pub const IO: i32 = 4;
}

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args};
use combo_core::Selection;
use combo_engine::{run_session, EngineError, SessionInputs, SessionRun};
use combo_io::IoError;
use combo_report::{build_report, AvailabilityReport, ReportError, ReportInputs};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) | MainError::Render(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("combo: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_logging(&args);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("combo: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// Logs go to stderr; stdout carries only the report.
fn init_logging(args: &Args) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let inputs = match &args.manifest {
        Some(m) => SessionInputs::from_manifest(m),
        None => match (&args.catalog, &args.product) {
            (Some(c), Some(p)) => SessionInputs::from_paths(c, p, args.selection.as_deref()),
            _ => return Err(MainError::Validation("missing --catalog/--product".into())),
        },
    }
    .map_err(map_engine_err)?;

    let mut extra = Selection::new();
    for s in &args.select {
        extra.push(s.clone());
    }

    let run = run_session(&inputs, args.order, &extra).map_err(map_engine_err)?;
    let report = build_report(&report_inputs(&run));
    debug!(attributes = report.attributes.len(), "report built");

    match &args.out {
        Some(dir) => write_artifacts(args, dir, &report)?,
        None => print_reports(args, &report)?,
    }

    if !args.quiet {
        eprintln!(
            "combo: {} pass, {} enabled, {} disabled, {} untouched",
            report.pass_kind, report.totals.enabled, report.totals.disabled, report.totals.untouched
        );
        if let Some(err) = &run.catalog_error {
            eprintln!("combo: catalog unavailable: {err}");
        }
    }
    Ok(())
}

fn report_inputs(run: &SessionRun) -> ReportInputs<'_> {
    ReportInputs {
        product: &run.product,
        selection: &run.selection,
        order: run.order,
        pass: &run.pass,
        availability: &run.availability,
        catalog_id: run.catalog_id.as_ref(),
        catalog_error: run.catalog_error.as_deref(),
    }
}

fn print_reports(args: &Args, report: &AvailabilityReport) -> Result<(), MainError> {
    let mut stdout = std::io::stdout().lock();
    for r in args.renderers() {
        let text = render(r, report)?;
        stdout
            .write_all(text.as_bytes())
            .map_err(|e| MainError::Io(format!("write: {e}")))?;
    }
    Ok(())
}

/// `availability.json` is canonical JSON (atomic write); `availability.html` is plain text.
fn write_artifacts(args: &Args, dir: &Path, report: &AvailabilityReport) -> Result<(), MainError> {
    fs::create_dir_all(dir).map_err(|e| MainError::Io(format!("create {}: {e}", dir.display())))?;
    for r in args.renderers() {
        match r {
            #[cfg(feature = "report-json")]
            "json" => {
                let v = combo_report::report_value(report).map_err(map_report_err)?;
                let path = dir.join("availability.json");
                combo_io::canonical_json::write_canonical_file(&path, &v).map_err(map_io_err)?;
                debug!(path = %path.display(), "wrote report");
            }
            other => {
                let path = dir.join(format!("availability.{other}"));
                fs::write(&path, render(other, report)?)
                    .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
                debug!(path = %path.display(), "wrote report");
            }
        }
    }
    Ok(())
}

fn render(kind: &str, report: &AvailabilityReport) -> Result<String, MainError> {
    match kind {
        #[cfg(feature = "report-json")]
        "json" => combo_report::render_json(report).map_err(map_report_err),
        #[cfg(feature = "report-html")]
        "html" => combo_report::render_html(report).map_err(map_report_err),
        other => Err(MainError::Validation(format!("renderer not built into this binary: {other}"))),
    }
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Render(_) => IO,
    }
}

fn map_engine_err(e: EngineError) -> MainError {
    match e {
        EngineError::Io(io) => map_io_err(io),
        EngineError::CatalogAlreadyLoaded => MainError::Validation("catalog already loaded".into()),
        EngineError::Selection(m) => MainError::Validation(format!("selection: {m}")),
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Read(_) | IoError::Write(_) | IoError::Path(_) | IoError::Limit(_) => {
            MainError::Io(e.to_string())
        }
        IoError::Json { .. }
        | IoError::Manifest(_)
        | IoError::Expect(_)
        | IoError::Canon(_)
        | IoError::Hash(_)
        | IoError::Invalid(_) => MainError::Validation(e.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}
