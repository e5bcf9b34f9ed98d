// crates/combo_cli/src/args.rs
//
// Offline CLI argument surface.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - Exactly one of: --manifest  XOR  (--catalog + --product [+ --selection])
// - --select ATTR=V1,V2 is repeatable and applied in the order given,
//   on top of the selection file; ATTR= clears the attribute
// - Output: stdout by default, or --out DIR; --render [json|html]*

use clap::Parser;
use std::path::{Path, PathBuf};

use combo_core::{AttributeId, SelectedAttribute, SelectionOrder, ValueId};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "combo",
    disable_help_subcommand = true,
    about = "Offline availability check for a product's attribute combinations"
)]
pub struct Args {
    /// Session manifest JSON (mutually exclusive with explicit file flags).
    #[arg(long, conflicts_with_all = ["catalog", "product", "selection"])]
    pub manifest: Option<PathBuf>,

    /// Catalog JSON path (array of combinations).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Product layout JSON path.
    #[arg(long)]
    pub product: Option<PathBuf>,
    /// Selection JSON path.
    #[arg(long)]
    pub selection: Option<PathBuf>,

    /// Choose values for one attribute: ATTR=V1,V2 (ATTR= clears it). Repeatable.
    #[arg(long = "select", value_name = "ATTR=V1,V2", value_parser = parse_select)]
    pub select: Vec<SelectedAttribute>,

    /// Order in which attributes constrain each other.
    #[arg(long, value_name = "declared|touched", value_parser = parse_order)]
    pub order: Option<SelectionOrder>,

    /// Renderer(s) to emit. Choose up to 2 (json, html). Defaults to json.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Write rendered reports into this directory instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Debug logging on stderr (overrides RUST_LOG).
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress the stderr summary line.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Args {
    /// Requested renderers, deduplicated, `json` when none given.
    pub fn renderers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.render {
            if !out.contains(&r.as_str()) {
                out.push(r.as_str());
            }
        }
        if out.is_empty() {
            out.push("json");
        }
        out
    }
}

/// Errors surfaced by argument validation.
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    RendererDisabled(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            RendererDisabled(r) => write!(f, "renderer not built into this binary: {r}"),
        }
    }
}
impl std::error::Error for CliError {}

/// `ATTR=V1,V2` → one selected attribute. `ATTR=` selects nothing.
pub fn parse_select(s: &str) -> Result<SelectedAttribute, String> {
    let (attr, values) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ATTR=V1,V2, got {s:?}"))?;
    let attribute_id: AttributeId =
        attr.parse().map_err(|e| format!("attribute {attr:?}: {e}"))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<ValueId>().map_err(|e| format!("value {v:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SelectedAttribute::new(attribute_id, values))
}

pub fn parse_order(s: &str) -> Result<SelectionOrder, String> {
    s.parse().map_err(|_| format!("expected declared or touched, got {s:?}"))
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        args.manifest.as_deref(),
        args.catalog.as_deref(),
        args.product.as_deref(),
        args.selection.as_deref(),
        args.out.as_deref(),
    ]
    .into_iter()
    .flatten()
}

/// Parse from the process arguments, then validate.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Flag-combination and path checks that clap cannot express.
/// File existence is checked when the session loads.
pub fn validate(args: Args) -> Result<Args, CliError> {
    if args.manifest.is_none() {
        if args.catalog.is_none() {
            return Err(CliError::Missing("--catalog (or --manifest)"));
        }
        if args.product.is_none() {
            return Err(CliError::Missing("--product (or --manifest)"));
        }
    }
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }
    for r in args.renderers() {
        let built = match r {
            "json" => cfg!(feature = "report-json"),
            "html" => cfg!(feature = "report-html"),
            _ => false,
        };
        if !built {
            return Err(CliError::RendererDisabled(r.to_string()));
        }
    }
    Ok(args)
}
