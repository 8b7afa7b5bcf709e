//! XJST CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "xjst")]
#[command(version)]
#[command(about = "Merge, compile and bundle XJST templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one bundle from XJST template files
    Build {
        /// Template files, in the order they are merged
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory error paths are reported relative to (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Directory the bundle is written to (default: current directory)
        #[arg(short = 'o', long)]
        out_dir: Option<PathBuf>,

        /// Start from the options of a common template flavor
        #[arg(long, value_enum)]
        preset: Option<commands::build::Preset>,

        /// YAML file with target options, applied on top of the preset
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Target file name; `?` is replaced by the output directory's name
        #[arg(long)]
        target: Option<String>,

        /// Generate development-mode code
        #[arg(long)]
        dev_mode: bool,

        /// Let the compiler cache internally
        #[arg(long)]
        cache: bool,

        /// Name the bundle is exported under
        #[arg(long)]
        export_name: Option<String>,

        /// Name of the entry point function
        #[arg(long)]
        apply_func_name: Option<String>,

        /// Bundle the `vow` promise library
        #[arg(long, conflicts_with = "no_include_vow")]
        include_vow: bool,

        /// Expect `Vow` from the host instead of bundling `vow`
        #[arg(long)]
        no_include_vow: bool,

        /// Library made available through `this.require` (repeatable)
        #[arg(long = "require", value_name = "NAME")]
        requires: Vec<String>,

        /// Number of compile workers (default: available parallelism)
        #[arg(short = 'j', long)]
        jobs: Option<usize>,

        /// Processor script to run under Node.js instead of the bundled one
        #[arg(long)]
        processor: Option<PathBuf>,

        /// Print the bundle to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for --stdout output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xjst=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            files,
            root,
            out_dir,
            preset,
            config,
            target,
            dev_mode,
            cache,
            export_name,
            apply_func_name,
            include_vow,
            no_include_vow,
            requires,
            jobs,
            processor,
            stdout,
        } => commands::build::execute(commands::build::BuildArgs {
            files,
            root,
            out_dir,
            preset,
            config,
            target,
            dev_mode,
            cache,
            export_name,
            apply_func_name,
            include_vow,
            no_include_vow,
            requires,
            jobs,
            processor,
            stdout,
        }),
    }
}
