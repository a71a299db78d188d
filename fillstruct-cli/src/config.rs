//! Configuration file loading for fillstruct.
//!
//! Discovers `fillstruct.toml` at the module root, then in the current
//! directory, and merges it with CLI arguments (CLI takes precedence).

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fillstruct_domain::VisibilityMode;
use fillstruct_types::CustomDefaults;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "fillstruct.toml";

/// Top-level configuration from fillstruct.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillstructConfig {
    /// Target type specifiers.
    pub types: Vec<String>,

    /// Complete every struct literal.
    pub all: bool,

    pub visibility: Option<VisibilityMode>,

    /// Worker threads.
    pub jobs: Option<NonZeroUsize>,

    /// Custom defaults, `TypeSpec = "ConstantName"`.
    pub defaults: BTreeMap<String, String>,
}

/// Find the first `fillstruct.toml` among `dirs`.
pub fn discover_config(dirs: &[&Utf8Path]) -> Option<Utf8PathBuf> {
    for dir in dirs {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            debug!("found config file at {}", config_path);
            return Some(config_path);
        }
    }
    debug!("no config file found");
    None
}

/// Load and parse a fillstruct.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<FillstructConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<FillstructConfig> {
    let config: FillstructConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config if given, else the first one discovered in
/// `dirs`, else defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dirs: &[&Utf8Path],
) -> anyhow::Result<FillstructConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dirs) {
        Some(path) => load_config(&path),
        None => Ok(FillstructConfig::default()),
    }
}

/// Effective settings after merging the config file with CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub types: Vec<String>,
    pub all: bool,
    pub visibility: VisibilityMode,
    pub jobs: NonZeroUsize,
    pub defaults: CustomDefaults,
}

impl MergedConfig {
    /// Whether anything is selected for completion.
    pub fn has_targets(&self) -> bool {
        self.all || !self.types.is_empty()
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: FillstructConfig,
}

impl ConfigMerger {
    pub fn new(config: FillstructConfig) -> Self {
        Self { config }
    }

    /// CLI `--type` extends the config list; CLI `--default` overrides
    /// config defaults for the same type; CLI scalars win.
    ///
    /// Fails on a malformed default specifier from either source.
    pub fn merge_cli(self, cli: &Cli) -> anyhow::Result<MergedConfig> {
        let mut types = self.config.types;
        for spec in &cli.types {
            if !types.contains(spec) {
                types.push(spec.clone());
            }
        }

        let mut defaults = CustomDefaults::new();
        for (ty, replacement) in &self.config.defaults {
            let (ty, replacement) = CustomDefaults::parse_spec(&format!("{ty}={replacement}"))
                .context("invalid default in config file")?;
            defaults.insert(ty, replacement);
        }
        let cli_defaults =
            CustomDefaults::parse_specs(&cli.defaults).context("invalid --default")?;
        for (ty, replacement) in cli_defaults.iter() {
            defaults.insert(ty, replacement);
        }

        let jobs = cli
            .jobs
            .or(self.config.jobs)
            .or_else(|| std::thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN);

        Ok(MergedConfig {
            types,
            all: cli.all || self.config.all,
            visibility: cli
                .visibility()
                .or(self.config.visibility)
                .unwrap_or_default(),
            jobs,
            defaults,
        })
    }
}
