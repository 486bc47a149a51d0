mod config;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::info;

use fence::{CodeBlock, TextDocument, locate_adjacent_output_block, scan_blocks};
use runner::dispatch::{RouteError, Target};
use runner::{HttpBackend, RunError, RunReport, Settings, run_all, run_block};

use crate::config::{SettingsArgs, config_source, load_settings};

#[derive(Parser)]
#[command(
    name = "coderun",
    version,
    about = "Run fenced code blocks in markdown notes"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Settings file (default: $CONFIG_DIR/coderun/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a code block and write its output block into the file
    Run(RunArgs),

    /// List the fenced blocks in a file
    Blocks(BlocksArgs),

    /// Print the effective settings
    Config(ConfigArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Markdown file to run blocks in
    file: PathBuf,

    /// Run the block enclosing this 1-based line
    #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
    line: Option<usize>,

    /// Run every runnable block, top to bottom
    #[arg(long)]
    all: bool,

    /// Print the updated document instead of writing the file
    #[arg(long)]
    dry_run: bool,

    /// Don't echo run output to stdout
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(clap::Args)]
struct BlocksArgs {
    /// Markdown file to scan
    file: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(clap::Args)]
struct ConfigArgs {
    #[command(flatten)]
    settings: SettingsArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let config = cli.config.as_deref();

    let result = match &cli.command {
        Command::Run(args) => match load_settings(config, &args.settings) {
            Ok(settings) => do_run(args, &settings, color_choice).await,
            Err(error) => Err(error),
        },
        Command::Blocks(args) => {
            load_settings(config, &args.settings).and_then(|settings| do_blocks(args, &settings))
        }
        Command::Config(args) => load_settings(config, &args.settings).and_then(|settings| {
            if let Some(path) = config_source(config) {
                eprintln!("# from {}", path.display());
            }
            print!("{}", settings.masked().to_toml_string()?);
            Ok(0)
        }),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {:#}", error);
            process::exit(1);
        }
    }
}

fn read_document(path: &Path) -> anyhow::Result<(String, TextDocument)> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))?;
    let doc = TextDocument::new(&source);
    Ok((source, doc))
}

async fn do_run(
    args: &RunArgs,
    settings: &Settings,
    color_choice: ColorChoice,
) -> anyhow::Result<i32> {
    let (source, mut doc) = read_document(&args.file)?;
    let backend = HttpBackend::new(settings)?;

    let reports = if args.all {
        run_all(&mut doc, settings, &backend).await
    } else {
        let anchor = anchor_for_line(args.line.unwrap_or(1))?;
        match run_block(&mut doc, anchor, settings, &backend).await {
            Ok(report) => vec![report],
            Err(error) => {
                emit_run_error(&args.file, &doc, &error, color_choice);
                return Ok(1);
            }
        }
    };

    if reports.is_empty() {
        eprintln!("no runnable blocks in {}", args.file.display());
    }
    for report in &reports {
        print_report(report, args.quiet || args.dry_run);
    }

    let updated = doc.to_string();
    match write_back(&source, &updated, args.dry_run) {
        WriteBack::Print => print!("{}", updated),
        WriteBack::Write => {
            std::fs::write(&args.file, &updated)
                .with_context(|| format!("cannot write '{}'", args.file.display()))?;
            info!("wrote {}", args.file.display());
        }
        WriteBack::Unchanged => {}
    }
    Ok(0)
}

/// Zero-based anchor for a 1-based `--line`.
fn anchor_for_line(line: usize) -> anyhow::Result<usize> {
    if line == 0 {
        bail!("line numbers start at 1");
    }
    Ok(line - 1)
}

#[derive(Debug, PartialEq, Eq)]
enum WriteBack {
    Print,
    Write,
    Unchanged,
}

fn write_back(source: &str, updated: &str, dry_run: bool) -> WriteBack {
    if dry_run {
        WriteBack::Print
    } else if updated != source {
        WriteBack::Write
    } else {
        WriteBack::Unchanged
    }
}

fn print_report(report: &RunReport, quiet: bool) {
    let block = &report.block;
    let status = if report.outcome.is_error {
        "failed"
    } else {
        "ok"
    };
    eprintln!(
        "{} block at lines {}-{}: {}",
        block.language,
        block.start_line + 1,
        block.end_line + 1,
        status
    );
    if !quiet {
        println!("{}", report.outcome.text);
    }
}

fn do_blocks(args: &BlocksArgs, settings: &Settings) -> anyhow::Result<i32> {
    let (_, doc) = read_document(&args.file)?;

    for block in scan_blocks(&doc) {
        if !block.is_output() {
            println!("{}", block_row(&block, &doc, settings));
        }
    }
    Ok(0)
}

fn block_status(tag: &str, settings: &Settings) -> &'static str {
    match Target::resolve(tag, settings) {
        Ok(_) => "runnable",
        Err(RouteError::LanguageDisabled(_)) => "disabled",
        Err(RouteError::LanguageUnsupported(_)) => "unsupported",
    }
}

/// One `blocks` listing line: 1-based line range, tag, status, output marker.
fn block_row(block: &CodeBlock, doc: &TextDocument, settings: &Settings) -> String {
    let language = if block.language.is_empty() {
        "(none)"
    } else {
        block.language.as_str()
    };
    let output = if locate_adjacent_output_block(doc, block.end_line).is_some() {
        "has output"
    } else {
        ""
    };
    format!(
        "{:>5}-{:<5} {:<12} {:<12} {}",
        block.start_line + 1,
        block.end_line + 1,
        language,
        block_status(&block.language, settings),
        output
    )
    .trim_end()
    .to_string()
}

fn emit_run_error(
    path: &Path,
    doc: &TextDocument,
    error: &RunError,
    color_choice: ColorChoice,
) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.display().to_string(), doc.to_string());

    let diagnostic = match error {
        RunError::Locate(locate) => locate.to_diagnostic(file_id, doc),
        RunError::Route { block, source } => {
            let note = match source {
                RouteError::LanguageUnsupported(_) => {
                    "runnable languages: python, javascript (js), llm, agent"
                }
                RouteError::LanguageDisabled(_) => "enable it in the settings file",
            };
            Diagnostic::error()
                .with_message(error.to_string())
                .with_labels(vec![
                    Label::primary(file_id, doc.line_span(block.start_line))
                        .with_message("block opened here"),
                ])
                .with_notes(vec![note.to_string()])
        }
    };

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
}
