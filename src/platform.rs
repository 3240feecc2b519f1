//! Platform detection and shared-library naming conventions
//!
//! The toolchain names its shared-library output differently per platform
//! (`libfoo.so`, `libfoo.dylib`, `foo.dll`). This module is the single
//! source of truth for those conventions; everything else composes
//! `library_filename` instead of hardcoding prefixes or suffixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system family the build runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOs,
    FreeBsd,
    Windows,
}

/// Filename prefix and suffix for shared libraries on one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibConvention {
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl Platform {
    /// Every platform the pipeline knows how to publish for
    pub const ALL: [Platform; 4] = [
        Platform::Linux,
        Platform::MacOs,
        Platform::FreeBsd,
        Platform::Windows,
    ];

    /// Detect the current platform at compile time
    #[cfg(target_os = "linux")]
    pub const fn current() -> Self {
        Platform::Linux
    }

    #[cfg(target_os = "macos")]
    pub const fn current() -> Self {
        Platform::MacOs
    }

    #[cfg(target_os = "freebsd")]
    pub const fn current() -> Self {
        Platform::FreeBsd
    }

    #[cfg(target_os = "windows")]
    pub const fn current() -> Self {
        Platform::Windows
    }

    /// Returns the platform name as used in diagnostics
    pub const fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::FreeBsd => "freebsd",
            Platform::Windows => "windows",
        }
    }

    /// Shared-library naming convention for this platform
    ///
    /// Exhaustive by construction: adding a platform variant without a
    /// convention entry is a compile error.
    pub const fn lib_convention(&self) -> LibConvention {
        match self {
            Platform::Linux | Platform::FreeBsd => LibConvention {
                prefix: "lib",
                suffix: ".so",
            },
            Platform::MacOs => LibConvention {
                prefix: "lib",
                suffix: ".dylib",
            },
            Platform::Windows => LibConvention {
                prefix: "",
                suffix: ".dll",
            },
        }
    }

    /// The filename the toolchain produces for a library named `name`
    pub fn library_filename(&self, name: &str) -> String {
        let convention = self.lib_convention();
        format!("{}{}{}", convention.prefix, name, convention.suffix)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
