//! Command-line arguments.

use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use clap::Parser;
use fillstruct_domain::VisibilityMode;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "fillstruct",
    version,
    about = "Complete Go struct literals with default values for their missing fields."
)]
pub struct Cli {
    /// Packages to process: ./..., a directory, dir/..., or a single .go file.
    #[arg(default_value = "./...")]
    pub pattern: String,

    /// Target type (importpath.TypeName, pkg.TypeName or TypeName). Repeatable.
    #[arg(long = "type", value_name = "SPEC")]
    pub types: Vec<String>,

    /// Custom default (TypeSpec=ConstantName). Repeatable.
    #[arg(long = "default", value_name = "SPEC")]
    pub defaults: Vec<String>,

    /// Complete every struct literal, including anonymous structs.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Only fill exported fields (the default).
    #[arg(long, default_value_t = false, conflicts_with = "all_fields")]
    pub exported_only: bool,

    /// Fill unexported fields too. Only valid for code in the declaring package.
    #[arg(long, default_value_t = false)]
    pub all_fields: bool,

    /// Print unified diffs instead of writing files.
    #[arg(short, long, default_value_t = false, conflicts_with_all = ["list", "json"])]
    pub diff: bool,

    /// Print the paths of files that would change instead of writing them.
    #[arg(short, long, default_value_t = false, conflicts_with = "json")]
    pub list: bool,

    /// Print one JSON result per processed file instead of writing files.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Worker threads (default: available parallelism).
    #[arg(short, long, value_name = "N", env = "FILLSTRUCT_JOBS")]
    pub jobs: Option<NonZeroUsize>,

    /// Explicit fillstruct.toml (default: module root, then current directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

/// What happens to a file's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Write changed files in place.
    Write,
    Diff,
    List,
    Json,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.diff {
            OutputMode::Diff
        } else if self.list {
            OutputMode::List
        } else if self.json {
            OutputMode::Json
        } else {
            OutputMode::Write
        }
    }

    /// Visibility chosen on the command line, if any.
    pub fn visibility(&self) -> Option<VisibilityMode> {
        if self.all_fields {
            Some(VisibilityMode::All)
        } else if self.exported_only {
            Some(VisibilityMode::Exported)
        } else {
            None
        }
    }
}
