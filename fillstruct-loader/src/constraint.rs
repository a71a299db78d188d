//! Build constraints deciding which dependency files belong to a build:
//! `_test.go` files, `_GOOS`/`_GOARCH` file name suffixes and `//go:build`
//! lines.

use crate::env::GoEnv;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Whether a non-test dependency file with this name and text is part of the
/// build for `env`.
pub(crate) fn selects(env: &GoEnv, file_name: &str, text: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".go") else {
        return false;
    };
    if stem.ends_with("_test") {
        return false;
    }
    name_matches(env, stem)
        && build_line(text).is_none_or(|expr| Expr::new(expr).eval(&|tag| tag_holds(env, tag)))
}

/// `name_GOOS`, `name_GOARCH` and `name_GOOS_GOARCH`. A bare `linux.go`
/// carries no constraint.
fn name_matches(env: &GoEnv, stem: &str) -> bool {
    let parts: Vec<&str> = stem.split('_').collect();
    let n = parts.len();
    if n >= 3 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
        return os_matches(env, parts[n - 2]) && parts[n - 1] == env.goarch;
    }
    if n >= 2 && KNOWN_OS.contains(&parts[n - 1]) {
        return os_matches(env, parts[n - 1]);
    }
    if n >= 2 && KNOWN_ARCH.contains(&parts[n - 1]) {
        return parts[n - 1] == env.goarch;
    }
    true
}

fn os_matches(env: &GoEnv, tag: &str) -> bool {
    tag == env.goos
        || (tag == "linux" && env.goos == "android")
        || (tag == "darwin" && env.goos == "ios")
        || (tag == "solaris" && env.goos == "illumos")
}

fn tag_holds(env: &GoEnv, tag: &str) -> bool {
    match tag {
        "unix" => UNIX_OS.contains(&env.goos.as_str()),
        "gc" => true,
        _ if tag.starts_with("go1.") => true,
        _ if KNOWN_OS.contains(&tag) => os_matches(env, tag),
        _ => tag == env.goarch,
    }
}

/// The expression of the `//go:build` line in the header, which ends at the
/// package clause.
fn build_line(text: &str) -> Option<&str> {
    let mut in_block = false;
    for line in text.lines() {
        let line = line.trim();
        if in_block {
            in_block = !line.contains("*/");
            continue;
        }
        if line.is_empty() {
            continue;
        }
        if let Some(expr) = line.strip_prefix("//go:build") {
            if expr.is_empty() || expr.starts_with([' ', '\t']) {
                return Some(expr.trim());
            }
            continue;
        }
        if line.starts_with("//") {
            continue;
        }
        if line.starts_with("/*") {
            in_block = !line.contains("*/");
            continue;
        }
        break;
    }
    None
}

/// `||`, `&&`, `!` and parentheses over build tags.
struct Expr<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Expr<'a> {
    fn new(text: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            let len = match c {
                ' ' | '\t' => {
                    rest = &rest[1..];
                    continue;
                }
                '(' | ')' | '!' => 1,
                _ if rest.starts_with("&&") || rest.starts_with("||") => 2,
                _ => rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
                    .unwrap_or(rest.len())
                    .max(c.len_utf8()),
            };
            tokens.push(&rest[..len]);
            rest = &rest[len..];
        }
        Self { tokens, pos: 0 }
    }

    /// Malformed expressions evaluate to false, leaving the file out.
    fn eval(mut self, holds: &dyn Fn(&str) -> bool) -> bool {
        let value = self.or(holds);
        value.is_some_and(|v| v && self.pos == self.tokens.len())
    }

    fn next_is(&mut self, token: &str) -> bool {
        let found = self.tokens.get(self.pos) == Some(&token);
        if found {
            self.pos += 1;
        }
        found
    }

    fn or(&mut self, holds: &dyn Fn(&str) -> bool) -> Option<bool> {
        let mut value = self.and(holds)?;
        while self.next_is("||") {
            value |= self.and(holds)?;
        }
        Some(value)
    }

    fn and(&mut self, holds: &dyn Fn(&str) -> bool) -> Option<bool> {
        let mut value = self.not(holds)?;
        while self.next_is("&&") {
            value &= self.not(holds)?;
        }
        Some(value)
    }

    fn not(&mut self, holds: &dyn Fn(&str) -> bool) -> Option<bool> {
        if self.next_is("!") {
            return self.not(holds).map(|v| !v);
        }
        if self.next_is("(") {
            let value = self.or(holds)?;
            return self.next_is(")").then_some(value);
        }
        let tag = *self.tokens.get(self.pos)?;
        if !tag.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            return None;
        }
        self.pos += 1;
        Some(holds(tag))
    }
}
