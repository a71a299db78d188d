//! Where the Go toolchain keeps the standard library and downloaded modules,
//! and which platform dependency files are selected for.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Toolchain locations and target platform.
///
/// [`GoEnv::default`] has no roots at all, so only module-local packages,
/// `vendor/` and the builtin declarations are available. [`GoEnv::from_env`]
/// asks the environment the way the `go` command does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoEnv {
    /// `$GOROOT`; the standard library lives under `src/`.
    pub goroot: Option<Utf8PathBuf>,
    /// `$GOMODCACHE`, holding `<module>@<version>` directories.
    pub gomodcache: Option<Utf8PathBuf>,
    pub goos: String,
    pub goarch: String,
}

impl Default for GoEnv {
    fn default() -> Self {
        Self {
            goroot: None,
            gomodcache: None,
            goos: host_os().to_string(),
            goarch: host_arch().to_string(),
        }
    }
}

impl GoEnv {
    /// Read `GOROOT`, `GOMODCACHE`, `GOPATH`, `GOOS` and `GOARCH`, falling
    /// back to `go env` and then to the `go` command's own defaults.
    pub fn from_env() -> Self {
        let goroot = var("GOROOT")
            .map(Utf8PathBuf::from)
            .or_else(|| go_env("GOROOT"));
        let gomodcache = var("GOMODCACHE")
            .map(Utf8PathBuf::from)
            .or_else(|| gopath().map(|gopath| gopath.join("pkg").join("mod")))
            .or_else(|| go_env("GOMODCACHE"))
            .or_else(|| {
                let home = dirs::home_dir()?;
                Utf8PathBuf::from_path_buf(home.join("go").join("pkg").join("mod")).ok()
            });
        let env = Self {
            goroot,
            gomodcache,
            goos: var("GOOS").unwrap_or_else(|| host_os().to_string()),
            goarch: var("GOARCH").unwrap_or_else(|| host_arch().to_string()),
        };
        debug!(
            goroot = ?env.goroot,
            gomodcache = ?env.gomodcache,
            goos = %env.goos,
            goarch = %env.goarch,
            "go environment"
        );
        env
    }

    /// Source directory of a standard-library package.
    pub fn std_dir(&self, import_path: &str) -> Option<Utf8PathBuf> {
        self.goroot
            .as_deref()
            .map(|root| root.join("src").join(import_path))
    }

    pub(crate) fn module_cache(&self) -> Option<&Utf8Path> {
        self.gomodcache.as_deref()
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// First entry of `$GOPATH`.
fn gopath() -> Option<Utf8PathBuf> {
    let value = var("GOPATH")?;
    let first = std::env::split_paths(&value).next()?;
    Utf8PathBuf::from_path_buf(first).ok()
}

/// `go env NAME`, when a `go` binary is on the path.
fn go_env(name: &str) -> Option<Utf8PathBuf> {
    let output = Command::new("go").args(["env", name]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| Utf8PathBuf::from(value))
}

fn host_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_has_no_roots() {
        let env = GoEnv::default();
        assert_eq!(env.goroot, None);
        assert_eq!(env.module_cache(), None);
        assert_eq!(env.std_dir("net/netip"), None);
        assert!(!env.goos.is_empty());
    }

    #[test]
    fn std_packages_live_under_src() {
        let env = GoEnv {
            goroot: Some(Utf8PathBuf::from("/usr/local/go")),
            ..GoEnv::default()
        };
        assert_eq!(
            env.std_dir("net/netip"),
            Some(Utf8PathBuf::from("/usr/local/go/src/net/netip"))
        );
    }
}
