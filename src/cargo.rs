//! Cargo command construction and invocation
//!
//! Argument construction is a pure function of (platform, toolchain,
//! profile, target): same inputs, same ordered argv. The spawn itself is
//! kept separate on [`Invocation`] so tests can inspect the argv without
//! running anything.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::platform::Platform;

/// Linker flags appended on macOS so undefined dynamic symbols are
/// resolved at load time by the host process rather than at link time.
/// Without these the artifact cannot link against the embedding
/// runtime's symbols, which only exist inside the running host.
pub const MACOS_LINK_ARGS: &[&str] = &["--", "-C", "link-args=-Wl,-undefined,dynamic_lookup"];

/// Which toolchain installation runs the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toolchain {
    /// The ambient `cargo` on PATH
    Default,
    /// A named toolchain, multiplexed through `rustup run <name>`
    Named(String),
}

impl Toolchain {
    /// Parse a CLI toolchain selector ("default" means the ambient cargo)
    pub fn parse(s: &str) -> Self {
        if s == "default" {
            Toolchain::Default
        } else {
            Toolchain::Named(s.to_string())
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toolchain::Default => write!(f, "default"),
            Toolchain::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Build profile; debug is the toolchain's implicit default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Debug,
    Release,
}

impl Profile {
    pub fn from_release_flag(release: bool) -> Self {
        if release {
            Profile::Release
        } else {
            Profile::Debug
        }
    }

    /// Subdirectory of `target/` the toolchain writes this profile to
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Profile::Debug => "debug",
            Profile::Release => "release",
        }
    }
}

/// One build attempt, fully described; immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub toolchain: Toolchain,
    pub profile: Profile,
    /// Explicit target triple, or None for the toolchain host default
    pub target: Option<String>,
}

/// A concrete external command: program plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// The full command line as the user would type it
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Run the command rooted at `dir` with inherited stdio and block
    /// until it exits
    ///
    /// The toolchain's output streams straight through to the user; the
    /// exit status is the only thing observed.
    pub fn run_in(&self, dir: &Path) -> io::Result<ExitStatus> {
        Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
    }
}

/// Construct the cargo invocation for one build request
///
/// Shape: `[rustup run <tc>] (build|rustc) [--release] [mac link args]
/// [--target=<triple>]`. macOS uses the `rustc` subcommand because it is
/// the variant that accepts raw linker flags after `--`.
pub fn cargo_invocation(platform: Platform, request: &BuildRequest) -> Invocation {
    let macos = platform == Platform::MacOs;

    let (program, mut args) = match &request.toolchain {
        Toolchain::Default => ("cargo".to_string(), Vec::new()),
        Toolchain::Named(name) => (
            "rustup".to_string(),
            vec!["run".to_string(), name.clone()],
        ),
    };

    args.push(if macos { "rustc" } else { "build" }.to_string());

    if request.profile == Profile::Release {
        args.push("--release".to_string());
    }

    if macos {
        args.extend(MACOS_LINK_ARGS.iter().map(|s| s.to_string()));
    }

    if let Some(target) = &request.target {
        args.push(format!("--target={}", target));
    }

    Invocation { program, args }
}
