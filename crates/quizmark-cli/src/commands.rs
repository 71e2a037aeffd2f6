//! Subcommand handlers.
//!
//! Each handler returns the process exit status on success. Any `Err`
//! is an invocation or environment failure and maps to exit status 2.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use quizmark_core::config::CONFIG_FILE_NAME;
use quizmark_core::{Config, SeverityLevel};

use crate::cli::{Command, ConfigAction, ExportArgs, ValidateArgs};
use crate::pipeline;
use crate::report::{Report, EXIT_FAILURE, EXIT_ISSUES, EXIT_OK};

// ============================================================================
// Command dispatch
// ============================================================================

/// Run a parsed command.
pub async fn dispatch(config_path: Option<&Path>, command: Command) -> Result<u8> {
    match command {
        Command::Validate(args) => cmd_validate(config_path, args).await,
        Command::Export(args) => cmd_export(config_path, args).await,
        Command::Config { action } => match action {
            ConfigAction::Show { root } => cmd_config_show(config_path, &root),
            ConfigAction::Init { root, force } => cmd_config_init(&root, force),
        },
    }
}

// ============================================================================
// validate / export
// ============================================================================

/// Validate a document tree and print the report to stdout.
pub async fn cmd_validate(config_path: Option<&Path>, args: ValidateArgs) -> Result<u8> {
    let mut config = Config::load(config_path, &args.root)?;
    if let Some(format) = args.format {
        config.report.format = format.into();
    }
    if let Some(fail_on) = args.fail_on {
        config.report.fail_on = fail_on.into();
    }
    apply_jobs(&mut config, args.jobs)?;
    if args.no_links {
        config.validate.check_links = false;
    }

    let output = pipeline::run(&args.root, &config).await?;
    let report = Report::new(output.issues, output.discovered).interrupted(output.interrupted);

    let rendered = report
        .render(config.report.format)
        .context("failed to serialize report")?;
    write_stdout(&rendered)?;

    Ok(report.exit_code(config.report.fail_on))
}

/// Export the parsed documents as a JSON array sorted by path.
pub async fn cmd_export(config_path: Option<&Path>, args: ExportArgs) -> Result<u8> {
    let mut config = Config::load(config_path, &args.root)?;
    apply_jobs(&mut config, args.jobs)?;

    let output = pipeline::run(&args.root, &config).await?;
    if output.interrupted {
        eprintln!("Interrupted; nothing exported");
        return Ok(EXIT_FAILURE);
    }

    let mut json =
        serde_json::to_string_pretty(&output.documents).context("failed to serialize documents")?;
    json.push('\n');

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!(
                "Exported {} document(s) to {}",
                output.documents.len(),
                path.display()
            );
        }
        None => write_stdout(&json)?,
    }

    let report = Report::new(output.issues, output.discovered);
    if !report.issues().is_empty() {
        eprintln!("{}", report.summary());
    }
    if args.strict && report.exit_code(SeverityLevel::Error) != EXIT_OK {
        eprint!("{}", report.render_text());
        return Ok(EXIT_ISSUES);
    }
    Ok(EXIT_OK)
}

fn apply_jobs(config: &mut Config, jobs: Option<usize>) -> Result<()> {
    if let Some(jobs) = jobs {
        if jobs == 0 {
            bail!("--jobs must be at least 1");
        }
        config.loader.concurrency = jobs;
    }
    Ok(())
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write to stdout")
}

// ============================================================================
// config
// ============================================================================

/// Print the resolved configuration.
pub fn cmd_config_show(config_path: Option<&Path>, root: &Path) -> Result<u8> {
    match Config::resolve_path(config_path, root) {
        Some(path) => eprintln!("# from {}", path.display()),
        None => eprintln!("# defaults (no {CONFIG_FILE_NAME} found)"),
    }
    let config = Config::load(config_path, root)?;
    write_stdout(&config.to_toml_string()?)?;
    Ok(EXIT_OK)
}

/// Write a default configuration file into `root`.
pub fn cmd_config_init(root: &Path, force: bool) -> Result<u8> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::create_dir_all(root).with_context(|| format!("failed to create {}", root.display()))?;
    let toml_str = Config::default().to_toml_string()?;
    std::fs::write(&path, &toml_str)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Config file created at {}", path.display());
    Ok(EXIT_OK)
}
