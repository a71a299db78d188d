//! One invocation: configuration, package loading, type resolution, then
//! the per-file workers.

use anyhow::Context;
use camino::Utf8Path;
use fillstruct_domain::{FillOptions, TargetSet};
use fillstruct_loader::{
    normalize_defaults, resolve_target_types, GoModule, Pattern, Program,
};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{self, ConfigMerger};
use crate::workers::{process_files, FileContext};

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files selected by the pattern, including ones that failed to parse.
    pub files: usize,
    pub changed: usize,
    /// Literals left untouched because a default could not be synthesized.
    pub site_errors: usize,
    /// Files that could not be parsed or printed.
    pub failed_files: usize,
    pub exit_code: u8,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.site_errors == 0 && self.failed_files == 0
    }
}

/// Run fillstruct as configured by `cli`, with relative paths taken from
/// `cwd`.
///
/// Resolution and specifier errors fail before any file is touched.
pub fn run(cli: &Cli, cwd: &Utf8Path) -> anyhow::Result<RunSummary> {
    let pattern = Pattern::parse(&cli.pattern, cwd).context("parse package pattern")?;
    let module = GoModule::discover(pattern.dir()).ok();
    let mut dirs: Vec<&Utf8Path> = Vec::with_capacity(2);
    if let Some(module) = &module {
        dirs.push(&module.root);
    }
    dirs.push(cwd);

    let file_config = config::load_or_default(cli.config.as_deref(), &dirs)
        .context("load fillstruct.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_cli(cli)?;
    debug!(
        "merged config: types={:?}, all={}, visibility={:?}, jobs={}",
        merged.types, merged.all, merged.visibility, merged.jobs
    );
    if !merged.has_targets() {
        info!("no target types given, nothing to do");
        return Ok(RunSummary::default());
    }

    let mut program = Program::load(&cli.pattern, cwd)
        .with_context(|| format!("failed to load packages: pattern = {}", cli.pattern))?;
    let targets = if merged.all {
        TargetSet::all()
    } else {
        resolve_target_types(&mut program, &merged.types)
            .context("resolving target types")?
    };
    let defaults = normalize_defaults(&mut program, &merged.defaults);
    let options = FillOptions {
        targets,
        defaults,
        visibility: merged.visibility,
    };

    let ctx = FileContext {
        program: &program,
        options: &options,
        mode: cli.output_mode(),
        cwd,
    };
    process_files(&ctx, merged.jobs)
}
