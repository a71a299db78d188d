//! Parallel per-file completion.
//!
//! Workers pull files from a shared index. Per-file failures are reported
//! and counted; a failed write stops every worker and fails the run.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use camino::Utf8Path;
use fillstruct_domain::{fill, CanonicalPrinter, FillOptions};
use fillstruct_loader::{FileRef, Program};
use fillstruct_types::FormatResult;
use fs_err as fs;
use tracing::{debug, info};

use crate::cli::OutputMode;
use crate::output::{display_path, render_diff, JsonReport};
use crate::run::RunSummary;

pub(crate) struct FileContext<'a> {
    pub(crate) program: &'a Program,
    pub(crate) options: &'a FillOptions,
    pub(crate) mode: OutputMode,
    pub(crate) cwd: &'a Utf8Path,
}

enum FileOutcome {
    Done { changed: bool, site_errors: usize },
    Failed { exit_code: u8 },
}

#[derive(Default)]
struct Counters {
    next: AtomicUsize,
    changed: AtomicUsize,
    site_errors: AtomicUsize,
    failed_files: AtomicUsize,
    exit_code: AtomicU8,
    aborted: AtomicBool,
}

impl Counters {
    fn record(&self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Done {
                changed,
                site_errors,
            } => {
                if changed {
                    self.changed.fetch_add(1, Ordering::Relaxed);
                }
                if site_errors > 0 {
                    self.site_errors.fetch_add(site_errors, Ordering::Relaxed);
                    self.exit_code.fetch_max(1, Ordering::Relaxed);
                }
            }
            FileOutcome::Failed { exit_code } => {
                self.failed_files.fetch_add(1, Ordering::Relaxed);
                self.exit_code.fetch_max(exit_code, Ordering::Relaxed);
            }
        }
    }
}

pub(crate) fn process_files(ctx: &FileContext<'_>, jobs: NonZeroUsize) -> anyhow::Result<RunSummary> {
    let roots = ctx.program.roots();
    let counters = Counters::default();
    let first_error: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    for broken in ctx.program.broken() {
        let message = format!("{}: {}", broken.path, broken.error);
        ctx.report_failure(&broken.path, &message)?;
        counters.record(FileOutcome::Failed { exit_code: 1 });
    }

    let workers = jobs.get().min(roots.len()).max(1);
    debug!(files = roots.len(), workers, "processing files");
    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                while !counters.aborted.load(Ordering::Relaxed) {
                    let index = counters.next.fetch_add(1, Ordering::Relaxed);
                    let Some(root) = roots.get(index) else {
                        break;
                    };
                    match ctx.process(root) {
                        Ok(outcome) => counters.record(outcome),
                        Err(err) => {
                            counters.aborted.store(true, Ordering::Relaxed);
                            first_error
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .get_or_insert(err);
                        }
                    }
                }
            });
        }
    });

    if let Some(err) = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        return Err(err);
    }
    Ok(RunSummary {
        files: roots.len() + ctx.program.broken().len(),
        changed: counters.changed.into_inner(),
        site_errors: counters.site_errors.into_inner(),
        failed_files: counters.failed_files.into_inner(),
        exit_code: counters.exit_code.into_inner(),
    })
}

impl FileContext<'_> {
    fn process(&self, root: &FileRef) -> anyhow::Result<FileOutcome> {
        let scope = self.program.scope(root).with_context(|| {
            format!("file {} of package {} is not loaded", root.index, root.package)
        })?;
        let file = scope.file();
        let result = match fill(
            &file.path,
            &file.text,
            &file.syntax(),
            &scope,
            self.options,
            &CanonicalPrinter,
        ) {
            Ok(result) => result,
            Err(err) => {
                self.report_failure(err.path(), &err.to_string())?;
                return Ok(FileOutcome::Failed {
                    exit_code: err.exit_code(),
                });
            }
        };

        if !result.errors.is_empty() {
            let mut stderr = io::stderr().lock();
            for error in &result.errors {
                writeln!(stderr, "{error}").context("write to stderr")?;
            }
        }
        self.emit(&file.text, &result)?;
        Ok(FileOutcome::Done {
            changed: result.changed,
            site_errors: result.errors.len(),
        })
    }

    /// Persist or print one result according to the output mode.
    fn emit(&self, original: &str, result: &FormatResult) -> anyhow::Result<()> {
        let shown = display_path(&result.path, self.cwd);
        match self.mode {
            OutputMode::Write => {
                if let Some(output) = &result.output {
                    fs::write(&result.path, output)
                        .with_context(|| format!("write {}", result.path))?;
                    info!(path = %shown, "completed struct literals");
                }
            }
            OutputMode::Diff => {
                if let Some(output) = &result.output {
                    let after = String::from_utf8_lossy(output);
                    let diff = render_diff(shown, original, &after);
                    io::stdout()
                        .lock()
                        .write_all(diff.as_bytes())
                        .context("write diff")?;
                }
            }
            OutputMode::List => {
                if result.changed {
                    writeln!(io::stdout().lock(), "{shown}").context("write file list")?;
                }
            }
            OutputMode::Json => {
                let line = JsonReport::from_result(shown, result).to_json()?;
                writeln!(io::stdout().lock(), "{line}").context("write json report")?;
            }
        }
        Ok(())
    }

    fn report_failure(&self, path: &Utf8Path, message: &str) -> anyhow::Result<()> {
        writeln!(io::stderr().lock(), "{message}").context("write to stderr")?;
        if self.mode == OutputMode::Json {
            let line = JsonReport::failed(display_path(path, self.cwd), message).to_json()?;
            writeln!(io::stdout().lock(), "{line}").context("write json report")?;
        }
        Ok(())
    }
}
