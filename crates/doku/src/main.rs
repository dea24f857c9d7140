//! Doku CLI - static documentation site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "doku")]
#[command(about = "Static documentation site generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with starter content
    New {
        /// Directory to create the project in
        dir: PathBuf,

        /// Project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Build a project into its res/ directory
    Build {
        /// Project directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, ignore_case = true, default_value_t = Format::Html)]
        format: Format,
    },

    /// Compile a single markdown file into a standalone HTML page
    Compile {
        /// Markdown source with optional frontmatter
        input: PathBuf,

        /// HTML file to write
        output: PathBuf,

        /// Markdown renderer
        #[arg(long, value_enum, ignore_case = true, default_value_t = Renderer::Full)]
        renderer: Renderer,
    },
}

/// Output format of `doku build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pre-rendered HTML document
    Html,
    /// HTML document plus raw .doku pages for the browser runtime
    Doku,
}

/// Renderer used by `doku compile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Renderer {
    /// Full CommonMark with syntax highlighting
    Full,
    /// Reduced rules matching the browser runtime
    Lite,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Some(Commands::New { dir, name }) => {
            commands::new::run(dir, name).await?;
        }
        Some(Commands::Build { dir, format }) => {
            commands::build::run(dir, format).await?;
        }
        Some(Commands::Compile {
            input,
            output,
            renderer,
        }) => {
            commands::compile::run(input, output, renderer).await?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
