//! Codepress CLI - Render a codebase into a printable PDF.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, Shell};
use codepress::builder::Codepress;
use codepress::errors::{exit_code, CodepressError};
use codepress::filter::DEFAULT_EXTENSIONS;
use codepress::layout::{PageSetup, PageSize, MM};
use codepress::metrics::{FontSpec, StandardFont};
use codepress::output::DEFAULT_OUTPUT;
use codepress::walker::{ScanEvent, WalkError};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "codepress")]
#[command(about = "Render a codebase into a printable PDF")]
#[command(version)]
struct Cli {
    /// Root directory to scan (defaults to the directory holding this executable)
    path: Option<PathBuf>,

    /// File suffixes to include
    #[arg(long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Additional directory names to skip
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Output PDF path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Honour .gitignore and .codepressignore files
    #[arg(long)]
    gitignore: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// Maximum directory depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Order files by path instead of traversal order
    #[arg(long)]
    sort: bool,

    /// Paper size
    #[arg(long, value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Page margin in millimetres
    #[arg(long, default_value_t = 20.0, value_parser = non_negative_f32)]
    margin_mm: f32,

    /// Distance between baselines in points
    #[arg(long, default_value_t = 10.0, value_parser = positive_f32)]
    line_height: f32,

    /// Body text size in points
    #[arg(long, default_value_t = 8.0, value_parser = positive_f32)]
    body_size: f32,

    /// Header text size in points
    #[arg(long, default_value_t = 10.0, value_parser = positive_f32)]
    header_size: f32,

    /// Font for file contents
    #[arg(long, value_enum, default_value = "courier")]
    body_font: FontArg,

    /// Font for file headers
    #[arg(long, value_enum, default_value = "helvetica-bold")]
    header_font: FontArg,

    /// Spaces per tab stop (0 turns each tab into one space)
    #[arg(long, default_value_t = 4)]
    tab_width: usize,

    /// Document title stored in the PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// Print a JSON summary instead of progress lines
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions and exit
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A4,
    Letter,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FontArg {
    Courier,
    CourierBold,
    HelveticaBold,
}

impl From<FontArg> for StandardFont {
    fn from(arg: FontArg) -> Self {
        match arg {
            FontArg::Courier => StandardFont::Courier,
            FontArg::CourierBold => StandardFont::CourierBold,
            FontArg::HelveticaBold => StandardFont::HelveticaBold,
        }
    }
}

fn parse_f32(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !value.is_finite() {
        return Err(format!("`{s}` is not a finite number"));
    }
    Ok(value)
}

fn positive_f32(s: &str) -> Result<f32, String> {
    let value = parse_f32(s)?;
    if value <= 0.0 {
        return Err(format!("must be greater than 0, got {s}"));
    }
    Ok(value)
}

fn non_negative_f32(s: &str) -> Result<f32, String> {
    let value = parse_f32(s)?;
    if value < 0.0 {
        return Err(format!("must not be negative, got {s}"));
    }
    Ok(value)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "codepress", &mut std::io::stdout());
        return;
    }

    let json_output = cli.json;
    if let Err(e) = run(cli) {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Directory holding the running executable.
fn executable_dir() -> Result<PathBuf, CodepressError> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn page_setup(cli: &Cli) -> PageSetup {
    let mut setup = PageSetup::for_size(cli.page_size.into());
    setup.margin = cli.margin_mm * MM;
    setup.line_height = cli.line_height;
    setup.body_font = FontSpec::new(cli.body_font.into(), cli.body_size);
    setup.header_font = FontSpec::new(cli.header_font.into(), cli.header_size);
    setup.tab_width = cli.tab_width;
    setup
}

/// Short cause of a walk failure, without the path the message already shows.
fn walk_reason(error: &WalkError) -> String {
    match error {
        WalkError::NotFound { .. } => "not found".to_string(),
        WalkError::PermissionDenied { .. } => "permission denied".to_string(),
        WalkError::Io { source, .. } => source.to_string(),
        WalkError::SymlinkLoop { .. } => "symlink loop".to_string(),
    }
}

fn run(cli: Cli) -> Result<(), CodepressError> {
    let root = match &cli.path {
        Some(path) => path.clone(),
        None => executable_dir()?,
    };
    if !root.exists() {
        return Err(CodepressError::PathNotFound(root));
    }

    let extensions: Vec<String> = if cli.extensions.is_empty() {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    } else {
        cli.extensions.clone()
    };

    // Margins that swallow the page only show up once combined with the paper size.
    let setup = page_setup(&cli);
    setup.validate()?;

    let mut builder = Codepress::new(&root)
        .extensions(&extensions)
        .exclude(cli.exclude.iter().cloned())
        .include_hidden(!cli.no_hidden)
        .respect_gitignore(cli.gitignore)
        .follow_symlinks(cli.follow_symlinks)
        .sort(cli.sort)
        .page_setup(setup);
    if let Some(depth) = cli.max_depth {
        builder = builder.max_depth(depth);
    }
    if let Some(title) = &cli.title {
        builder = builder.title(title);
    }

    let quiet = cli.json;
    if !quiet {
        println!("\n📋 List of files included in the PDF:\n{}", "-".repeat(40));
    }

    let result = builder.build_with(|event| {
        if quiet {
            return;
        }
        match event {
            ScanEvent::Included { path } => println!("✅ {}", path.display()),
            ScanEvent::Failed { path, error } => {
                println!("❌ Error reading {}: {}", path.display(), error)
            }
            ScanEvent::WalkFailed { error } => {
                println!("❌ Error reading {}: {}", error.path().display(), walk_reason(error))
            }
        }
    })?;

    result.write_pdf(&cli.output)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result.summary(Some(&cli.output)))
            .map_err(|e| CodepressError::Io(std::io::Error::other(e.to_string())))?;
        println!("{json}");
    } else {
        println!("\n📄 PDF successfully created: {}", cli.output.display());
    }

    Ok(())
}
