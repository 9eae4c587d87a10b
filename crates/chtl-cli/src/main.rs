//! `chtl-simple`: the minimum CLI driver. Grounded on `dx-cli/src/main.rs`
//! for the tracing-init / anyhow-error-chain shape, generalized from a
//! multi-subcommand runtime orchestrator down to the single positional
//! `<input> [output]` contract the specification calls for.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

mod config;
mod emit;

use config::ProjectConfig;

/// The CHTL compiler: reads a `.chtl` source file and emits a single
/// HTML document embedding its generated CSS and JavaScript.
#[derive(Parser)]
#[command(name = "chtl-simple")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the `.chtl` source file
    input: PathBuf,

    /// Output path. `-` writes HTML to standard output. Defaults to
    /// `output.html` (or the `[build] output` path from `chtl.toml`).
    output: Option<String>,

    /// Enable verbose diagnostic logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", style("error:").red().bold(), err);
            for cause in err.chain().skip(1) {
                eprintln!("  {} {}", style("caused by:").red(), cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source_dir = cli.input.parent().unwrap_or_else(|| std::path::Path::new("."));
    let project = ProjectConfig::load_optional(source_dir)?;

    if let Ok(seeded) = std::env::var("CHTL_MODULE_PATH") {
        tracing::debug!(path = %seeded, "seeded compiler module path from CHTL_MODULE_PATH");
    }

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let file_name = cli.input.to_string_lossy().to_string();
    let document = emit::emit_document(&source, &file_name).map_err(|diagnostics| {
        let joined = diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
        anyhow::anyhow!("compilation failed:\n{joined}")
    })?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| project.map(|p| p.build.output).unwrap_or_else(|| "output.html".to_string()));

    if output == "-" {
        print!("{document}");
    } else {
        fs::write(&output, &document).with_context(|| format!("writing {output}"))?;
        tracing::info!(output = %output, "wrote compiled document");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).without_time().init();
}
