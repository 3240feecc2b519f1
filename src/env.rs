//! Process environment threaded explicitly into the pipeline
//!
//! Target resolution and command construction are pure functions of a
//! `BuildEnv` value rather than ad-hoc `std::env` reads, so they can be
//! exercised in tests with any platform/override combination.

use std::env;
use std::io;
use std::path::PathBuf;

use crate::platform::Platform;

/// Architecture override consulted on Windows, set by the npm install
/// machinery when cross-building for a different Node architecture
pub const ARCH_OVERRIDE_VAR: &str = "npm_config_arch";

/// Directory under the project root holding the native crate
pub const NATIVE_DIR: &str = "native";

/// Snapshot of the process environment relevant to one build
#[derive(Debug, Clone)]
pub struct BuildEnv {
    /// Host platform the build runs on
    pub platform: Platform,
    /// Value of [`ARCH_OVERRIDE_VAR`], if set
    pub arch_override: Option<String>,
    /// Project root containing the `native/` subdirectory
    pub project_root: PathBuf,
}

impl BuildEnv {
    pub fn new(
        platform: Platform,
        arch_override: Option<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform,
            arch_override,
            project_root: project_root.into(),
        }
    }

    /// Capture the real process environment
    pub fn from_process() -> io::Result<Self> {
        Ok(Self::new(
            Platform::current(),
            env::var(ARCH_OVERRIDE_VAR).ok(),
            env::current_dir()?,
        ))
    }

    /// The native crate directory (`<project_root>/native`)
    pub fn native_dir(&self) -> PathBuf {
        self.project_root.join(NATIVE_DIR)
    }

    /// Path of the native crate's build manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.native_dir().join("Cargo.toml")
    }
}

/// Explicit cargo target triple, when the host platform requires one
///
/// Windows carries both 32- and 64-bit toolchains, so the triple must be
/// selected explicitly: the arch override wins, otherwise the process's
/// native architecture. Everywhere else the toolchain's host default is
/// correct and no target flag is emitted.
pub fn explicit_target(env: &BuildEnv) -> Option<&'static str> {
    if env.platform != Platform::Windows {
        return None;
    }

    let arch = env.arch_override.as_deref().unwrap_or(host_arch());
    if arch == "ia32" {
        Some("i686-pc-windows-msvc")
    } else {
        Some("x86_64-pc-windows-msvc")
    }
}

/// Host architecture in Node's `process.arch` vocabulary
const fn host_arch() -> &'static str {
    if cfg!(target_arch = "x86") {
        "ia32"
    } else {
        "x64"
    }
}
