//! Build command - merge, compile and bundle XJST templates
//!
//! Options start from the preset (if any), the config file is applied on top
//! of it, then CLI flags override both.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use tracing::info;
use xjst_core::{JobQueue, ProcessCompiler, XjstOptions, XjstStage};

/// Named option sets for the common template flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Bemhtml,
    Bemtree,
}

impl Preset {
    fn options(self) -> XjstOptions {
        match self {
            Preset::Bemhtml => XjstOptions::bemhtml(),
            Preset::Bemtree => XjstOptions::bemtree(),
        }
    }
}

/// Arguments for the build command.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub files: Vec<PathBuf>,
    pub root: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub preset: Option<Preset>,
    pub config: Option<PathBuf>,
    pub target: Option<String>,
    pub dev_mode: bool,
    pub cache: bool,
    pub export_name: Option<String>,
    pub apply_func_name: Option<String>,
    pub include_vow: bool,
    pub no_include_vow: bool,
    pub requires: Vec<String>,
    pub jobs: Option<usize>,
    pub processor: Option<PathBuf>,
    pub stdout: bool,
}

/// Execute the build command.
pub fn execute(args: BuildArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_build(args))
}

async fn run_build(args: BuildArgs) -> Result<()> {
    let options = resolve_options(&args)?;
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let root = args.root.clone().unwrap_or_else(|| cwd.clone());
    let out_dir = args.out_dir.clone().unwrap_or(cwd);

    let compiler = ProcessCompiler::discover(args.processor.clone())
        .ok_or_else(|| anyhow!("Node.js not found. Set XJST_NODE or add node to PATH"))?
        .with_working_dir(&root);
    info!(node = %compiler.node().display(), "Using Node.js");

    let workers = args.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    });
    let queue = Arc::new(JobQueue::new(Arc::new(compiler), workers));
    let stage = XjstStage::new(options, queue.clone(), &root);

    let result = if args.stdout {
        stage
            .build(&args.files, &out_dir)
            .await
            .map(|module| print!("{}", module))
    } else {
        stage
            .build_to_target(&args.files, &out_dir)
            .await
            .map(|path| info!(path = %path.display(), "Build complete"))
    };

    // Queue workers exit once the last handle is gone
    drop(stage);
    if let Ok(queue) = Arc::try_unwrap(queue) {
        queue.shutdown().await;
    }

    Ok(result?)
}

/// Preset, then config file, then CLI flags.
fn resolve_options(args: &BuildArgs) -> Result<XjstOptions> {
    let mut options = args.preset.map(Preset::options).unwrap_or_default();
    if let Some(path) = &args.config {
        options = options.overlay(XjstOptions::from_yaml_file(path)?);
    }

    if let Some(target) = &args.target {
        options.target = Some(target.clone());
    }
    if args.dev_mode {
        options.dev_mode = Some(true);
    }
    if args.cache {
        options.cache = Some(true);
    }
    if let Some(name) = &args.export_name {
        options.export_name = Some(name.clone());
    }
    if let Some(name) = &args.apply_func_name {
        options.apply_func_name = Some(name.clone());
    }
    if args.include_vow {
        options.include_vow = Some(true);
    }
    if args.no_include_vow {
        options.include_vow = Some(false);
    }
    options.requires.extend(args.requires.iter().cloned());

    Ok(options)
}
